//! # Layers
//!
//! Every editor has exactly three layers, rendered in the order `main`, `before`, `after`. Layers are never
//! created or destroyed, only toggled, filled, and drained.

use super::shape::{Shape, ShapeID};
use crate::id::IdSource;

/// Names of the three fixed layers, in aggregation order.
///
/// Anything that visits "every layer" must go through [`LayerName::iter`](strum::IntoEnumIterator::iter)
/// rather than a hand written list, so a layer can never be skipped or visited twice.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LayerName {
    #[default]
    Main,
    Before,
    After,
}
impl LayerName {
    /// Look up a layer by its name, as used by the UI and project files.
    pub fn from_name(name: &str) -> Result<Self, InvalidLayerError> {
        name.parse().map_err(|_| InvalidLayerError {
            name: name.to_owned(),
        })
    }
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
    /// Whether the layer is shown in a freshly created editor.
    #[must_use]
    pub fn active_by_default(self) -> bool {
        matches!(self, Self::Main)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no layer named {name:?}")]
pub struct InvalidLayerError {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Layer {
    /// Are this layer's shapes shown?
    pub active: bool,
    shapes: Vec<Shape>,
}
impl Layer {
    fn empty(name: LayerName) -> Self {
        Self {
            active: name.active_by_default(),
            shapes: Vec::new(),
        }
    }
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

/// The layer repository. Owns every committed shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Layers {
    main: Layer,
    before: Layer,
    after: Layer,
}
impl Default for Layers {
    fn default() -> Self {
        Self {
            main: Layer::empty(LayerName::Main),
            before: Layer::empty(LayerName::Before),
            after: Layer::empty(LayerName::After),
        }
    }
}
// Public methods for client
impl Layers {
    #[must_use]
    pub fn get(&self, name: LayerName) -> &Layer {
        match name {
            LayerName::Main => &self.main,
            LayerName::Before => &self.before,
            LayerName::After => &self.after,
        }
    }
    /// Iterate every layer, in aggregation order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerName, &Layer)> + '_ {
        <LayerName as strum::IntoEnumIterator>::iter().map(|name| (name, self.get(name)))
    }
    /// Shapes of the layer with the given name, or nothing if there is no such layer.
    #[must_use]
    pub fn query(&self, name: &str) -> &[Shape] {
        match LayerName::from_name(name) {
            Ok(name) => self.get(name).shapes(),
            Err(_) => &[],
        }
    }
    /// Whether the named layer is active. Unknown layers are never active.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        LayerName::from_name(name).is_ok_and(|name| self.get(name).active)
    }
    /// Concatenation of the shapes of every active layer, in aggregation order.
    pub fn active_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.iter()
            .filter(|(_, layer)| layer.active)
            .flat_map(|(_, layer)| layer.shapes.iter())
    }
    /// Find a committed shape by ID, searching layers in aggregation order.
    #[must_use]
    pub fn find(&self, id: ShapeID) -> Option<(LayerName, &Shape)> {
        self.iter().find_map(|(name, layer)| {
            layer
                .shapes
                .iter()
                .find(|shape| shape.id() == Some(id))
                .map(|shape| (name, shape))
        })
    }
}
// Private methods for the editor state
impl Layers {
    fn get_mut(&mut self, name: LayerName) -> &mut Layer {
        match name {
            LayerName::Main => &mut self.main,
            LayerName::Before => &mut self.before,
            LayerName::After => &mut self.after,
        }
    }
    pub(super) fn find_mut(&mut self, id: ShapeID) -> Option<&mut Shape> {
        [&mut self.main, &mut self.before, &mut self.after]
            .into_iter()
            .flat_map(|layer| layer.shapes.iter_mut())
            .find(|shape| shape.id() == Some(id))
    }
    /// Append a shape to the end of a layer, giving each of its stops an ID if it doesn't already have one.
    /// The shape's own ID is left untouched. Negative sizes are clamped to zero.
    pub(super) fn add_shape(
        &mut self,
        name: LayerName,
        mut shape: Shape,
        ids: &mut impl IdSource,
    ) -> &mut Shape {
        shape.assign_missing_stop_ids(ids);
        shape.clamp_sizes();
        let shapes = &mut self.get_mut(name).shapes;
        shapes.push(shape);
        // Just pushed, can't be empty.
        let last = shapes.len() - 1;
        &mut shapes[last]
    }
    /// Remove the first shape with the given ID. Returns the layer it was in and the shape, or `None` if no layer
    /// had such a shape.
    pub(super) fn remove_shape(&mut self, id: ShapeID) -> Option<(LayerName, Shape)> {
        <LayerName as strum::IntoEnumIterator>::iter().find_map(|name| {
            let shapes = &mut self.get_mut(name).shapes;
            let idx = shapes.iter().position(|shape| shape.id() == Some(id))?;
            Some((name, shapes.remove(idx)))
        })
    }
    /// Flip the activity of a layer, returning the new state.
    pub(super) fn toggle(&mut self, name: LayerName) -> bool {
        let layer = self.get_mut(name);
        layer.active = !layer.active;
        layer.active
    }
}

/// Partial layer data, merged over the defaults by [`Layers::from_patch`]. This is the shape of a project file.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayersPatch {
    #[serde(default)]
    pub main: Option<LayerPatch>,
    #[serde(default)]
    pub before: Option<LayerPatch>,
    #[serde(default)]
    pub after: Option<LayerPatch>,
}
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerPatch {
    /// Missing means the layer's default activity.
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}
impl Layers {
    /// Build a fresh set of layers, with any layers mentioned by `patch` replacing the defaults.
    ///
    /// Every shape comes out addressable: shapes without an ID, or repeating the ID of an earlier shape, are given a
    /// fresh one. Stops without IDs are given one too.
    pub fn from_patch(patch: LayersPatch, ids: &mut impl IdSource) -> Self {
        let LayersPatch {
            main,
            before,
            after,
        } = patch;
        let mut layers = Self::default();
        let mut seen = std::collections::HashSet::new();
        for (name, patch) in [
            (LayerName::Main, main),
            (LayerName::Before, before),
            (LayerName::After, after),
        ] {
            let Some(LayerPatch { active, shapes }) = patch else {
                continue;
            };
            if let Some(active) = active {
                layers.get_mut(name).active = active;
            }
            for mut shape in shapes {
                let id = match shape.id() {
                    Some(id) if !seen.contains(&id) => id,
                    existing => {
                        if let Some(duplicate) = existing {
                            log::warn!("Duplicate {duplicate} in {name}, reassigning");
                        }
                        let id = ShapeID::generate(ids);
                        shape.assign_id(id);
                        id
                    }
                };
                seen.insert(id);
                layers.add_shape(name, shape, ids);
            }
        }
        layers
    }
}
