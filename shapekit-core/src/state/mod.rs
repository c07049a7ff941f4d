//! # Editor state
//!
//! The authoritative model of one editor: the three [layers], the global rounding flag, and the staging slot for a
//! shape that is being previewed but not yet committed.
//!
//! Every method taking `&mut self` is a single atomic transition - it either fully applies, or returns an error and
//! leaves the state observably unchanged. There is no interior mutability, so writes are serialized by whoever owns
//! the state.

pub mod geometry;
pub mod layers;
pub mod shape;
pub mod stops;

use crate::id::IdSource;
use geometry::{Direction, InvalidPropertyPathError, ResizeDiff, ResizeError, ResizeOrigin};
use layers::{InvalidLayerError, LayerName, Layers, LayersPatch};
use shape::{Fields, PatchError, Shape, ShapeID, ShapePatch};
use stops::{IndexOutOfRangeError, Stop, StopID, StopPatch};

/// Which shape an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeRef {
    /// The shape to be added, while it's being previewed.
    Staged,
    /// A shape that has been committed into a layer.
    Committed(ShapeID),
}
impl From<ShapeID> for ShapeRef {
    fn from(value: ShapeID) -> Self {
        Self::Committed(value)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError {
    #[error("{0} not found in any layer")]
    NotFound(ShapeID),
    #[error("no shape is staged")]
    NothingStaged,
}

/// Any failure of an editor operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    InvalidLayer(#[from] InvalidLayerError),
    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRangeError),
    #[error(transparent)]
    InvalidPropertyPath(#[from] InvalidPropertyPathError),
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Target(#[from] TargetError),
}

#[derive(Clone, Debug)]
pub struct EditorState {
    layers: Layers,
    /// Snap geometry to whole numbers after it's changed?
    round: bool,
    shape_to_be_added: Option<Shape>,
    /// Bumped on every change, so observers can cheaply tell whether they're out of date.
    revision: u64,
}
impl Default for EditorState {
    fn default() -> Self {
        Self::new(true)
    }
}
// Public methods for client
impl EditorState {
    #[must_use]
    pub fn new(round: bool) -> Self {
        Self {
            layers: Layers::default(),
            round,
            shape_to_be_added: None,
            revision: 0,
        }
    }
    #[must_use]
    pub fn from_settings(settings: &crate::settings::Settings) -> Self {
        Self::new(settings.round)
    }
    #[must_use]
    pub fn layers(&self) -> &Layers {
        &self.layers
    }
    #[must_use]
    pub fn round(&self) -> bool {
        self.round
    }
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
    #[must_use]
    pub fn is_layer_active(&self, name: &str) -> bool {
        self.layers.is_active(name)
    }
    #[must_use]
    pub fn layer_shapes(&self, name: &str) -> &[Shape] {
        self.layers.query(name)
    }
    #[must_use]
    pub fn shape_to_be_added(&self) -> Option<&Shape> {
        self.shape_to_be_added.as_ref()
    }
    /// Every shape of every active layer, in layer order.
    pub fn active_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.layers.active_shapes()
    }
    /// The active shapes, followed by the staged shape once it has enough geometry to be drawn.
    pub fn visible_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        let staged = self
            .shape_to_be_added
            .as_ref()
            .filter(|shape| shape.is_placeable());
        self.active_shapes().chain(staged)
    }
    #[must_use]
    pub fn shape(&self, target: ShapeRef) -> Option<&Shape> {
        match target {
            ShapeRef::Staged => self.shape_to_be_added.as_ref(),
            ShapeRef::Committed(id) => self.layers.find(id).map(|(_, shape)| shape),
        }
    }
}
// Mutations
impl EditorState {
    fn shape_mut(&mut self, target: ShapeRef) -> Result<&mut Shape, TargetError> {
        match target {
            ShapeRef::Staged => self
                .shape_to_be_added
                .as_mut()
                .ok_or(TargetError::NothingStaged),
            ShapeRef::Committed(id) => self.layers.find_mut(id).ok_or(TargetError::NotFound(id)),
        }
    }
    /// Run a fallible edit on one shape, bumping the revision if it succeeds and the shape actually changed.
    fn edit<T, E>(
        &mut self,
        target: ShapeRef,
        edit: impl FnOnce(&mut Shape) -> Result<T, E>,
    ) -> Result<T, EditError>
    where
        EditError: From<E>,
    {
        let shape = self.shape_mut(target)?;
        let before = shape.clone();
        let result = edit(shape)?;
        if *shape != before {
            self.revision += 1;
        }
        Ok(result)
    }
    pub fn set_round(&mut self, round: bool) {
        self.round = round;
    }
    /// Append a shape to a layer. The shape keeps whatever ID it has, its stops are given IDs if they lack one.
    pub fn add_shape(&mut self, layer: LayerName, shape: Shape, ids: &mut impl IdSource) -> &Shape {
        self.revision += 1;
        self.layers.add_shape(layer, shape, ids)
    }
    /// Give `shape` a fresh ID and append it to `layer`.
    pub fn commit_shape(&mut self, layer: LayerName, mut shape: Shape, ids: &mut impl IdSource) -> ShapeID {
        let id = ShapeID::generate(ids);
        shape.assign_id(id);
        self.add_shape(layer, shape, ids);
        log::trace!("Committed {id} into {layer}");
        id
    }
    /// Remove the first shape with this ID, searching the layers in order. `None` if there was no such shape.
    pub fn remove_shape(&mut self, id: ShapeID) -> Option<Shape> {
        let (layer, shape) = self.layers.remove_shape(id)?;
        log::trace!("Removed {id} from {layer}");
        self.revision += 1;
        Some(shape)
    }
    /// Flip a layer's activity, returning the new state.
    pub fn toggle_layer(&mut self, name: &str) -> Result<bool, InvalidLayerError> {
        let name = LayerName::from_name(name)?;
        self.revision += 1;
        Ok(self.layers.toggle(name))
    }
    /// Replace every layer, with `patch` merged over the initial layout.
    pub fn replace_all(&mut self, patch: LayersPatch, ids: &mut impl IdSource) {
        self.layers = Layers::from_patch(patch, ids);
        log::debug!(
            "Loaded {} shapes into layers",
            self.layers.iter().map(|(_, layer)| layer.shapes().len()).sum::<usize>()
        );
        self.revision += 1;
    }
    /// Stage a detached copy of `shape`.
    pub fn set_shape_to_be_added(&mut self, shape: &Shape) {
        let mut staged = shape.clone();
        staged.clamp_sizes();
        self.shape_to_be_added = Some(staged);
        self.revision += 1;
    }
    /// Clear the staging slot, returning what was in it.
    pub fn unset_shape_to_be_added(&mut self) -> Option<Shape> {
        let staged = self.shape_to_be_added.take();
        if staged.is_some() {
            self.revision += 1;
        }
        staged
    }
    pub fn move_shape(
        &mut self,
        target: ShapeRef,
        left: Option<&crate::units::Length>,
        top: Option<&crate::units::Length>,
    ) -> Result<Fields, EditError> {
        self.edit(target, |shape| {
            Ok::<_, EditError>(shape.move_to(left, top))
        })
    }
    pub fn move_shape_by(
        &mut self,
        target: ShapeRef,
        left: Option<&crate::units::Length>,
        top: Option<&crate::units::Length>,
    ) -> Result<Fields, EditError> {
        self.edit(target, |shape| {
            Ok::<_, EditError>(shape.move_by(left, top))
        })
    }
    pub fn resize_shape(
        &mut self,
        target: ShapeRef,
        direction: Direction,
        diff: ResizeDiff,
        origin: Option<&ResizeOrigin>,
    ) -> Result<Fields, EditError> {
        self.edit(target, |shape| shape.resize(direction, diff, origin))
    }
    /// Merge a patch over a shape. Stops brought in by the patch are given IDs.
    pub fn update_shape(
        &mut self,
        target: ShapeRef,
        patch: ShapePatch,
        ids: &mut impl IdSource,
    ) -> Result<Fields, EditError> {
        self.edit(target, |shape| {
            let written = shape.apply_patch(patch)?;
            shape.assign_missing_stop_ids(ids);
            Ok::<_, EditError>(written)
        })
    }
    /// Round a geometry value by property path. Does nothing, successfully, when rounding is disabled.
    /// Returns whether rounding was performed.
    pub fn round_shape_property(&mut self, target: ShapeRef, path: &str) -> Result<bool, EditError> {
        if !self.round {
            // Still must be a real target.
            self.shape_mut(target)?;
            return Ok(false);
        }
        self.edit(target, |shape| shape.round_property(path).map(|()| true))
    }
    /// Round whole geometry fields, if rounding is enabled.
    pub fn round_shape_fields(&mut self, target: ShapeRef, fields: Fields) -> Result<(), EditError> {
        if !self.round || fields.is_empty() {
            self.shape_mut(target)?;
            return Ok(());
        }
        self.edit(target, |shape| {
            shape.round_fields(fields);
            Ok::<_, EditError>(())
        })
    }
    pub fn add_stop(
        &mut self,
        target: ShapeRef,
        index: Option<usize>,
        ids: &mut impl IdSource,
    ) -> Result<StopID, EditError> {
        self.edit(target, |shape| shape.add_stop(index, ids))
    }
    pub fn remove_stop(&mut self, target: ShapeRef, index: usize) -> Result<Stop, EditError> {
        self.edit(target, |shape| shape.remove_stop(index))
    }
    pub fn update_stop(
        &mut self,
        target: ShapeRef,
        index: usize,
        patch: StopPatch,
    ) -> Result<(), EditError> {
        self.edit(target, |shape| {
            shape.stop_mut(index).map(|stop| stop.apply_patch(patch))
        })
    }
}

#[cfg(test)]
mod test {
    use super::{EditError, EditorState, ShapeRef, TargetError};
    use crate::{
        id::SequentialIds,
        state::{
            geometry::{Direction, ResizeDiff},
            layers::{InvalidLayerError, LayerName},
            shape::{Shape, ShapeID, ShapePatch},
            stops::{IndexOutOfRangeError, Stop, Stops},
        },
        units::{Length, LengthPatch, Unit},
    };

    fn square() -> Shape {
        Shape::new(
            "box",
            Length::px(5.0),
            Length::px(5.0),
            Length::px(10.0),
            Length::px(10.0),
        )
    }

    #[test]
    fn add_then_resize() {
        let mut ids = SequentialIds::new();
        let mut state = EditorState::default();
        let id = state.commit_shape(LayerName::Main, square(), &mut ids);
        let active: Vec<_> = state.active_shapes().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), Some(id));

        state
            .resize_shape(
                id.into(),
                Direction::TOP | Direction::LEFT,
                ResizeDiff { left: 2.0, top: 3.0 },
                None,
            )
            .unwrap();
        let shape = state.shape(id.into()).unwrap();
        assert_eq!(shape.top, Some(Length::px(8.0)));
        assert_eq!(shape.left, Some(Length::px(7.0)));
        assert_eq!(shape.width, Some(Length::px(8.0)));
        assert_eq!(shape.height, Some(Length::px(7.0)));
    }
    #[test]
    fn staged_visibility() {
        let mut ids = SequentialIds::new();
        let mut state = EditorState::default();
        let mut staged = Shape::default();
        staged.left = Some(Length::px(1.0));
        state.set_shape_to_be_added(&staged);
        assert_eq!(state.visible_shapes().count(), 0);

        state
            .update_shape(
                ShapeRef::Staged,
                ShapePatch {
                    top: Some(Length::px(1.0).into()),
                    width: Some(Length::px(4.0).into()),
                    height: Some(Length::px(4.0).into()),
                    ..Default::default()
                },
                &mut ids,
            )
            .unwrap();
        let visible: Vec<_> = state.visible_shapes().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id(), None);
        // Staged shapes are only visible, never active.
        assert_eq!(state.active_shapes().count(), 0);
    }
    #[test]
    fn staging_is_detached() {
        let mut state = EditorState::default();
        let mut original = square();
        state.set_shape_to_be_added(&original);
        original.left = Some(Length::px(100.0));
        original
            .fields
            .insert("note".into(), toml::Value::String("changed".into()));

        let staged = state.shape_to_be_added().unwrap();
        assert_eq!(staged, &square());
        assert!(state.unset_shape_to_be_added().is_some());
        assert!(state.shape_to_be_added().is_none());
    }
    #[test]
    fn failures_change_nothing() {
        let mut ids = SequentialIds::new();
        let mut state = EditorState::default();
        let id = state.commit_shape(LayerName::Main, square(), &mut ids);
        let revision = state.revision();
        let missing = ShapeID::generate(&mut ids);

        assert_eq!(
            state.toggle_layer("active"),
            Err(InvalidLayerError {
                name: "active".into()
            })
        );
        assert_eq!(
            state.remove_stop(id.into(), 0),
            Err(EditError::IndexOutOfRange(IndexOutOfRangeError {
                index: 0,
                len: 0
            }))
        );
        assert_eq!(
            state.move_shape(missing.into(), Some(&Length::px(1.0)), None),
            Err(EditError::Target(TargetError::NotFound(missing)))
        );
        assert_eq!(
            state.move_shape(ShapeRef::Staged, Some(&Length::px(1.0)), None),
            Err(EditError::Target(TargetError::NothingStaged))
        );
        assert!(state.remove_shape(missing).is_none());
        assert_eq!(state.revision(), revision);
        assert_eq!(state.shape(id.into()), Some(&{
            let mut expected = square();
            expected.assign_id(id);
            expected
        }));
    }
    #[test]
    fn unit_mismatch_leaves_field() {
        let mut ids = SequentialIds::new();
        let mut state = EditorState::default();
        let id = state.commit_shape(LayerName::Main, square(), &mut ids);
        let em = Length::new(3.0, Unit::Em);
        let revision = state.revision();

        state.move_shape(id.into(), Some(&em), Some(&em)).unwrap();
        state.move_shape_by(id.into(), Some(&em), Some(&em)).unwrap();
        state
            .update_shape(
                id.into(),
                ShapePatch {
                    left: Some(em.into()),
                    top: Some(LengthPatch {
                        value: Some(1.0),
                        units: Some(Unit::Em),
                    }),
                    ..Default::default()
                },
                &mut ids,
            )
            .unwrap();
        let shape = state.shape(id.into()).unwrap();
        assert_eq!(shape.left, Some(Length::px(5.0)));
        assert_eq!(shape.top, Some(Length::px(5.0)));
        // Nothing was written, so nothing changed.
        assert_eq!(state.revision(), revision);

        state
            .move_shape(id.into(), Some(&Length::px(6.0)), None)
            .unwrap();
        assert_eq!(state.revision(), revision + 1);
    }
    #[test]
    fn patched_stops_get_ids() {
        let mut ids = SequentialIds::new();
        let mut state = EditorState::default();
        let id = state.commit_shape(LayerName::Main, square(), &mut ids);
        let mut stops = Stops::new();
        stops.push(Stop::with_color("red", "0%"));
        stops.push(Stop::with_color("blue", "100%"));
        state
            .update_shape(
                id.into(),
                ShapePatch {
                    stops: Some(stops),
                    ..Default::default()
                },
                &mut ids,
            )
            .unwrap();
        let shape = state.shape(id.into()).unwrap();
        assert_eq!(shape.stops.len(), 2);
        assert!(shape.stops.iter().all(|stop| stop.id().is_some()));
        assert_ne!(shape.stops[0].id(), shape.stops[1].id());
    }
    #[test]
    fn staging_clamps_sizes() {
        let mut state = EditorState::default();
        let mut shape = square();
        shape.height = Some(Length::px(-2.0));
        state.set_shape_to_be_added(&shape);
        let staged = state.shape_to_be_added().unwrap();
        assert_eq!(staged.height, Some(Length::px(0.0)));
        assert_eq!(staged.width, Some(Length::px(10.0)));
    }
    #[test]
    fn rounding_respects_flag() {
        let mut ids = SequentialIds::new();
        let mut state = EditorState::new(false);
        let id = state.commit_shape(LayerName::Main, square(), &mut ids);
        state
            .move_shape(id.into(), Some(&Length::px(1.5)), None)
            .unwrap();

        assert_eq!(state.round_shape_property(id.into(), "left"), Ok(false));
        assert_eq!(state.shape(id.into()).unwrap().left, Some(Length::px(1.5)));

        state.set_round(true);
        assert_eq!(state.round_shape_property(id.into(), "left"), Ok(true));
        assert_eq!(state.round_shape_property(id.into(), "left"), Ok(true));
        assert_eq!(state.shape(id.into()).unwrap().left, Some(Length::px(2.0)));
        assert!(matches!(
            state.round_shape_property(id.into(), "type"),
            Err(EditError::InvalidPropertyPath(_))
        ));
    }
}
