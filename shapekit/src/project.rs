//! Project files: a TOML document describing the contents of each layer.

use shapekit_core::state::layers::LayersPatch;

/// Read a project from disk. Layers missing from the file keep their defaults when loaded.
pub fn read_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<LayersPatch> {
    let string = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&string)?)
}

#[cfg(test)]
mod test {
    #[test]
    fn unknown_layer_rejected() {
        let dir = std::env::temp_dir().join(format!("shapekit-project-{}", std::process::id()));
        let _ = std::fs::create_dir(&dir);
        let good = dir.join("good.toml");
        let bad = dir.join("bad.toml");
        std::fs::write(&good, "[before]\nactive = true\n").unwrap();
        std::fs::write(&bad, "[middle]\nactive = true\n").unwrap();

        let patch = super::read_path(&good).unwrap();
        assert_eq!(patch.before.and_then(|layer| layer.active), Some(true));
        assert!(super::read_path(&bad).is_err());
        assert!(super::read_path(dir.join("missing.toml")).is_err());

        let _ = std::fs::remove_dir_all(dir);
    }
}
