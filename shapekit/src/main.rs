#![warn(clippy::pedantic)]

pub mod global;
pub mod project;

use anyhow::Result as AnyResult;
use shapekit_core::{
    state::{layers::LayerName, shape::Shape},
    Editor, InMemoryHost,
};

/// Describe a loaded project, one line per layer followed by one line per visible shape.
fn summarize(editor: &Editor<InMemoryHost>) -> String {
    use std::fmt::Write;
    use strum::IntoEnumIterator;

    let mut out = String::new();
    for name in LayerName::iter() {
        let status = if editor.is_layer_active(name.as_str()) {
            "active"
        } else {
            "inactive"
        };
        // Writing to a string can't fail.
        let _ = writeln!(
            out,
            "  {:<6} {status:<8} {} shapes",
            name.as_str(),
            editor.layer_shapes(name.as_str()).len()
        );
    }
    for shape in editor.visible_shapes() {
        let _ = writeln!(out, "  {}", describe(shape));
    }
    out
}
fn describe(shape: &Shape) -> String {
    let field = |length: Option<&shapekit_core::units::Length>| {
        length.map_or_else(|| "-".to_owned(), ToString::to_string)
    };
    format!(
        "{} at ({}, {}) size {} x {}, {} stops",
        shape.kind,
        field(shape.left.as_ref()),
        field(shape.top.as_ref()),
        field(shape.width.as_ref()),
        field(shape.height.as_ref()),
        shape.stops.len(),
    )
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let mut write_settings = false;
    // Args are a simple list of project paths, and flags.
    // Paths are OSStrings, let the system handle character encoding restrictions.
    let paths: Vec<std::path::PathBuf> = std::env::args_os()
        .skip(1)
        .filter(|arg| {
            if arg == "--write-settings" {
                write_settings = true;
                false
            } else {
                true
            }
        })
        .map(Into::into)
        .collect();

    let settings = global::settings::UserSettings::get();
    if settings.did_fail_to_load() {
        log::info!("Using default settings");
    }
    if write_settings {
        if let Err(e) = settings.save() {
            log::warn!("Failed to save settings:\n{e:?}");
        };
    }
    if paths.is_empty() {
        return Ok(());
    }

    let summaries: Vec<Option<String>> = {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        paths
            .par_iter()
            .map(|path| match project::read_path(path) {
                Err(e) => {
                    log::error!("failed to open file {path:?}: {e:#}");
                    None
                }
                Ok(patch) => {
                    let host = InMemoryHost::from_settings(&settings.settings);
                    let mut editor = Editor::from_settings(host, &settings.settings);
                    editor.set_shapes(patch);
                    Some(summarize(&editor))
                }
            })
            .collect()
    };

    let mut loading_succeeded = false;
    for (path, summary) in paths.iter().zip(summaries) {
        if let Some(summary) = summary {
            loading_succeeded = true;
            println!("{}:\n{summary}", path.display());
        }
    }
    // False if every file failed.
    if !loading_succeeded {
        anyhow::bail!("Failed to load any provided project.");
    }
    Ok(())
}
