//! # Editor
//!
//! Ties an [`EditorState`] to the outside world. The state itself knows nothing of selection or saving, the editor
//! composes state transitions with those side effects through a [`Host`].
//!
//! Many small operations can be batched with [`Editor::write_with`], which saves once at the end. The single-operation
//! methods on [`Editor`] are shorthand for a one-operation write.

pub mod host;
pub mod writer;

use crate::{
    id::{IdSource, RandomIds},
    settings::Settings,
    state::{
        geometry::{Direction, ResizeDiff, ResizeOrigin},
        layers::{LayerName, Layers, LayersPatch},
        shape::{Fields, Shape, ShapeID, ShapePatch},
        stops::{Stop, StopID, StopPatch},
        EditError, EditorState, ShapeRef, TargetError,
    },
    units::Length,
};
use host::Host;

pub struct Editor<H: Host, I: IdSource = RandomIds> {
    state: EditorState,
    host: H,
    ids: I,
}
impl<H: Host> Editor<H, RandomIds> {
    pub fn new(host: H) -> Self {
        Self::with_ids(host, RandomIds)
    }
    pub fn from_settings(host: H, settings: &Settings) -> Self {
        Self {
            state: EditorState::from_settings(settings),
            host,
            ids: RandomIds,
        }
    }
}
impl<H: Host, I: IdSource> Editor<H, I> {
    pub fn with_ids(host: H, ids: I) -> Self {
        Self {
            state: EditorState::default(),
            host,
            ids,
        }
    }
    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
    /// Perform any number of operations, saving at most once when `write` returns.
    pub fn write_with<F, T>(&mut self, write: F) -> T
    where
        F: FnOnce(&mut writer::EditorWriter<'_, H, I>) -> T,
    {
        let mut writer = writer::EditorWriter {
            state: &mut self.state,
            host: &mut self.host,
            ids: &mut self.ids,
            dirty: false,
        };
        // Saving happens in the writer's Drop, after `write` is done with it.
        write(&mut writer)
    }
}
// Single operations
impl<H: Host, I: IdSource> Editor<H, I> {
    /// Commit a shape and return it, with its new ID. See [`writer::EditorWriter::add_shape`].
    pub fn add_shape(
        &mut self,
        layer: Option<LayerName>,
        shape: Option<Shape>,
    ) -> Result<&Shape, EditError> {
        let id = self.write_with(|writer| writer.add_shape(layer, shape))?;
        Ok(self
            .state
            .shape(id.into())
            .ok_or(TargetError::NotFound(id))?)
    }
    pub fn add_new_stop(
        &mut self,
        target: impl Into<ShapeRef>,
        index: Option<usize>,
    ) -> Result<StopID, EditError> {
        self.write_with(|writer| writer.add_new_stop(target, index))
    }
    pub fn remove_shape(&mut self, id: ShapeID) -> Result<Shape, EditError> {
        self.write_with(|writer| writer.remove_shape(id))
    }
    pub fn remove_selected_shape(&mut self) -> Option<Shape> {
        self.write_with(|writer| writer.remove_selected_shape())
    }
    pub fn remove_stop(
        &mut self,
        target: impl Into<ShapeRef>,
        index: usize,
    ) -> Result<Stop, EditError> {
        self.write_with(|writer| writer.remove_stop(target, index))
    }
    pub fn move_shape(
        &mut self,
        target: impl Into<ShapeRef>,
        left: Option<&Length>,
        top: Option<&Length>,
    ) -> Result<Fields, EditError> {
        self.write_with(|writer| writer.move_shape(target, left, top))
    }
    pub fn move_shape_by(
        &mut self,
        target: impl Into<ShapeRef>,
        left: Option<&Length>,
        top: Option<&Length>,
    ) -> Result<Fields, EditError> {
        self.write_with(|writer| writer.move_shape_by(target, left, top))
    }
    pub fn resize_shape(
        &mut self,
        target: impl Into<ShapeRef>,
        direction: Direction,
        diff: ResizeDiff,
        origin: Option<&ResizeOrigin>,
    ) -> Result<Fields, EditError> {
        self.write_with(|writer| writer.resize_shape(target, direction, diff, origin))
    }
    pub fn round_shape_properties<'p>(
        &mut self,
        target: impl Into<ShapeRef>,
        paths: impl IntoIterator<Item = &'p str>,
    ) -> Result<(), EditError> {
        self.write_with(|writer| writer.round_shape_properties(target, paths))
    }
    pub fn set_shapes(&mut self, patch: LayersPatch) {
        self.write_with(|writer| writer.set_shapes(patch));
    }
    pub fn set_shape_to_be_added(&mut self, shape: &Shape) {
        self.write_with(|writer| writer.set_shape_to_be_added(shape));
    }
    pub fn unset_shape_to_be_added(&mut self) -> Option<Shape> {
        self.write_with(|writer| writer.unset_shape_to_be_added())
    }
    pub fn set_round(&mut self, round: bool) {
        self.write_with(|writer| writer.set_round(round));
    }
    pub fn toggle_layer(&mut self, name: &str) -> Result<bool, EditError> {
        self.write_with(|writer| writer.toggle_layer(name))
    }
    pub fn update_shape(
        &mut self,
        target: impl Into<ShapeRef>,
        patch: ShapePatch,
        round: bool,
    ) -> Result<Fields, EditError> {
        self.write_with(|writer| writer.update_shape(target, patch, round))
    }
    pub fn update_shape_stop(
        &mut self,
        target: impl Into<ShapeRef>,
        index: usize,
        patch: StopPatch,
    ) -> Result<(), EditError> {
        self.write_with(|writer| writer.update_shape_stop(target, index, patch))
    }
}
// Queries
impl<H: Host, I: IdSource> Editor<H, I> {
    #[must_use]
    pub fn all_layers(&self) -> &Layers {
        self.state.layers()
    }
    #[must_use]
    pub fn is_layer_active(&self, name: &str) -> bool {
        self.state.is_layer_active(name)
    }
    #[must_use]
    pub fn layer_shapes(&self, name: &str) -> &[Shape] {
        self.state.layer_shapes(name)
    }
    #[must_use]
    pub fn shape_to_be_added(&self) -> Option<&Shape> {
        self.state.shape_to_be_added()
    }
    pub fn active_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.state.active_shapes()
    }
    pub fn visible_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.state.visible_shapes()
    }
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.revision()
    }
}
