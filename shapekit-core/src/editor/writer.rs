//! # Writer
//!
//! All modifications go through an [`EditorWriter`], borrowed for the span of [`Editor::write_with`](super::Editor::write_with).
//! Operations that should be saved mark the writer dirty, and when the writer is dropped the host is asked to save
//! exactly once, no matter how many operations were performed.

use super::host::Host;
use crate::{
    id::IdSource,
    state::{
        geometry::{Direction, ResizeDiff, ResizeOrigin},
        layers::{LayerName, LayersPatch},
        shape::{Fields, Shape, ShapeID, ShapePatch},
        stops::{Stop, StopID, StopPatch},
        EditError, EditorState, ShapeRef, TargetError,
    },
    units::Length,
};

pub struct EditorWriter<'a, H: Host, I: IdSource> {
    pub(super) state: &'a mut EditorState,
    pub(super) host: &'a mut H,
    pub(super) ids: &'a mut I,
    pub(super) dirty: bool,
}
// Read access to the state at any point during the write.
impl<H: Host, I: IdSource> std::ops::Deref for EditorWriter<'_, H, I> {
    type Target = EditorState;
    fn deref(&self) -> &Self::Target {
        self.state
    }
}
impl<H: Host, I: IdSource> Drop for EditorWriter<'_, H, I> {
    fn drop(&mut self) {
        // Skip if nothing to save. If unwinding, the host may be in no state to save either.
        if !self.dirty || std::thread::panicking() {
            return;
        }
        log::trace!("Saving project at revision {}", self.state.revision());
        self.host.update_project();
    }
}
impl<H: Host, I: IdSource> EditorWriter<'_, H, I> {
    /// Will the project be saved when this writer is dropped?
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.dirty
    }
    /// Mark the result as needing a save, if it was successful.
    fn saving<T>(&mut self, result: Result<T, EditError>) -> Result<T, EditError> {
        if result.is_ok() {
            self.dirty = true;
        }
        result
    }
    /// Round the fields an operation wrote.
    fn round_written(&mut self, target: ShapeRef, written: Fields) -> Result<Fields, EditError> {
        self.state.round_shape_fields(target, written)?;
        Ok(written)
    }

    /// Commit a shape into a layer, giving it a fresh ID.
    ///
    /// `layer` defaults to the host's selected layer, and `shape` to the staged shape. The staging slot is cleared
    /// either way.
    pub fn add_shape(
        &mut self,
        layer: Option<LayerName>,
        shape: Option<Shape>,
    ) -> Result<ShapeID, EditError> {
        let layer = layer.unwrap_or_else(|| self.host.selected_layer());
        let shape = match shape {
            Some(shape) => {
                self.state.unset_shape_to_be_added();
                shape
            }
            None => self
                .state
                .unset_shape_to_be_added()
                .ok_or(TargetError::NothingStaged)?,
        };
        let id = self.state.commit_shape(layer, shape, &mut *self.ids);
        self.dirty = true;
        Ok(id)
    }
    pub fn add_new_stop(
        &mut self,
        target: impl Into<ShapeRef>,
        index: Option<usize>,
    ) -> Result<StopID, EditError> {
        let result = self.state.add_stop(target.into(), index, &mut *self.ids);
        self.saving(result)
    }
    pub fn remove_shape(&mut self, id: ShapeID) -> Result<Shape, EditError> {
        let result = self
            .state
            .remove_shape(id)
            .ok_or(TargetError::NotFound(id).into());
        self.saving(result)
    }
    /// Remove whichever shape the host has selected, and clear the selection.
    /// Returns the removed shape, or `None` if nothing was selected or the selection was stale.
    pub fn remove_selected_shape(&mut self) -> Option<Shape> {
        let removed = self
            .host
            .selected_shape()
            .and_then(|id| self.state.remove_shape(id));
        self.host.unselect_shape();
        self.dirty = true;
        removed
    }
    pub fn remove_stop(
        &mut self,
        target: impl Into<ShapeRef>,
        index: usize,
    ) -> Result<Stop, EditError> {
        let result = self.state.remove_stop(target.into(), index);
        self.saving(result)
    }
    /// Set the position, then round whichever axes were applied.
    pub fn move_shape(
        &mut self,
        target: impl Into<ShapeRef>,
        left: Option<&Length>,
        top: Option<&Length>,
    ) -> Result<Fields, EditError> {
        let target = target.into();
        let result = self
            .state
            .move_shape(target, left, top)
            .and_then(|written| self.round_written(target, written));
        self.saving(result)
    }
    /// Offset the position, then round whichever axes were applied.
    pub fn move_shape_by(
        &mut self,
        target: impl Into<ShapeRef>,
        left: Option<&Length>,
        top: Option<&Length>,
    ) -> Result<Fields, EditError> {
        let target = target.into();
        let result = self
            .state
            .move_shape_by(target, left, top)
            .and_then(|written| self.round_written(target, written));
        self.saving(result)
    }
    /// Drag edges of a shape, then round whichever fields were changed.
    /// See [`Shape::resize`] for the details and [`ResizeOrigin`] for multi-step gestures.
    pub fn resize_shape(
        &mut self,
        target: impl Into<ShapeRef>,
        direction: Direction,
        diff: ResizeDiff,
        origin: Option<&ResizeOrigin>,
    ) -> Result<Fields, EditError> {
        let target = target.into();
        let result = self
            .state
            .resize_shape(target, direction, diff, origin)
            .and_then(|written| self.round_written(target, written));
        self.saving(result)
    }
    /// Round properties by path. Paths that aren't geometry values are reported to the host, and skipped.
    /// Fails only if the target doesn't exist.
    pub fn round_shape_properties<'p>(
        &mut self,
        target: impl Into<ShapeRef>,
        paths: impl IntoIterator<Item = &'p str>,
    ) -> Result<(), EditError> {
        let target = target.into();
        for path in paths {
            match self.state.round_shape_property(target, path) {
                Ok(_) => (),
                Err(EditError::InvalidPropertyPath(err)) => {
                    self.host.warn(&err.to_string());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
    /// Replace the layers wholesale. Not saved, as this is how saved projects are loaded.
    pub fn set_shapes(&mut self, patch: LayersPatch) {
        self.state.replace_all(patch, &mut *self.ids);
    }
    pub fn set_shape_to_be_added(&mut self, shape: &Shape) {
        self.state.set_shape_to_be_added(shape);
    }
    pub fn unset_shape_to_be_added(&mut self) -> Option<Shape> {
        self.state.unset_shape_to_be_added()
    }
    pub fn set_round(&mut self, round: bool) {
        self.state.set_round(round);
    }
    /// Flip the activity of the named layer, returning the new state.
    pub fn toggle_layer(&mut self, name: &str) -> Result<bool, EditError> {
        let result = self.state.toggle_layer(name).map_err(Into::into);
        self.saving(result)
    }
    /// Merge `patch` over a shape. If `round` is set, the position is rounded afterwards.
    pub fn update_shape(
        &mut self,
        target: impl Into<ShapeRef>,
        patch: ShapePatch,
        round: bool,
    ) -> Result<Fields, EditError> {
        let target = target.into();
        let result = self.state.update_shape(target, patch, &mut *self.ids).and_then(|written| {
            if round {
                self.round_written(target, Fields::LEFT | Fields::TOP)?;
            }
            Ok(written)
        });
        self.saving(result)
    }
    pub fn update_shape_stop(
        &mut self,
        target: impl Into<ShapeRef>,
        index: usize,
        patch: StopPatch,
    ) -> Result<(), EditError> {
        let result = self.state.update_stop(target.into(), index, patch);
        self.saving(result)
    }
}
