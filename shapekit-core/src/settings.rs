//! User preferences that shape how a new editor behaves.

use crate::state::layers::LayerName;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Snap geometry to whole numbers after every move, resize, or update.
    pub round: bool,
    /// The layer new shapes go into when nothing else is selected.
    pub default_layer: LayerName,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            round: true,
            default_layer: LayerName::Main,
        }
    }
}
