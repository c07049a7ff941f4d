//! # Host
//!
//! The editor core does not persist projects, track selection, or show warnings itself. The application embedding it
//! provides those through a [`Host`].

use crate::state::{layers::LayerName, shape::ShapeID};

pub trait Host {
    /// The editor state changed in a way that should be saved. Fire-and-forget.
    fn update_project(&mut self);
    /// The shape currently selected in the UI, if any.
    fn selected_shape(&self) -> Option<ShapeID>;
    /// The layer currently selected in the UI. New shapes go here by default.
    fn selected_layer(&self) -> LayerName;
    /// Clear the UI selection.
    fn unselect_shape(&mut self);
    /// Report a recoverable anomaly to the user.
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}
impl<H: Host + ?Sized> Host for &mut H {
    fn update_project(&mut self) {
        (**self).update_project();
    }
    fn selected_shape(&self) -> Option<ShapeID> {
        (**self).selected_shape()
    }
    fn selected_layer(&self) -> LayerName {
        (**self).selected_layer()
    }
    fn unselect_shape(&mut self) {
        (**self).unselect_shape();
    }
    fn warn(&mut self, message: &str) {
        (**self).warn(message);
    }
}

/// A host that keeps the selection in memory and counts save requests rather than saving.
#[derive(Clone, Debug, Default)]
pub struct InMemoryHost {
    pub selected_shape: Option<ShapeID>,
    pub selected_layer: LayerName,
    saves: usize,
    warnings: Vec<String>,
}
impl InMemoryHost {
    #[must_use]
    pub fn from_settings(settings: &crate::settings::Settings) -> Self {
        Self {
            selected_layer: settings.default_layer,
            ..Default::default()
        }
    }
    /// How many times the project was asked to save.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
impl Host for InMemoryHost {
    fn update_project(&mut self) {
        self.saves += 1;
    }
    fn selected_shape(&self) -> Option<ShapeID> {
        self.selected_shape
    }
    fn selected_layer(&self) -> LayerName {
        self.selected_layer
    }
    fn unselect_shape(&mut self) {
        self.selected_shape = None;
    }
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
        self.warnings.push(message.to_owned());
    }
}
