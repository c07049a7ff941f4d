//! # Gradient stops
//!
//! The ordered color stops of a gradient shape. Order is the interpolation order, and every list operation here
//! preserves the relative order of the stops it doesn't touch.

use super::shape::Shape;
use crate::id::IdSource;

pub type StopID = crate::id::Id<Stop>;
/// Gradients rarely have more than a handful of stops.
pub type Stops = smallvec::SmallVec<[Stop; 4]>;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<StopID>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub position: String,
}
impl Stop {
    /// A blank stop with a fresh ID.
    pub fn new(ids: &mut impl IdSource) -> Self {
        Self {
            id: Some(StopID::generate(ids)),
            ..Default::default()
        }
    }
    #[must_use]
    pub fn with_color(color: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: None,
            color: color.into(),
            position: position.into(),
        }
    }
    /// The stop's ID. Only stops read from outside the editor, and not yet committed, lack one.
    #[must_use]
    pub fn id(&self) -> Option<StopID> {
        self.id
    }
    /// Overwrite each field the patch provides. Stops have no composite fields, so there is nothing to merge.
    pub fn apply_patch(&mut self, patch: StopPatch) {
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StopPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("stop index {index} out of range for {len} stops")]
pub struct IndexOutOfRangeError {
    pub index: usize,
    pub len: usize,
}

impl Shape {
    /// Insert a blank stop at `index`, shifting later stops along, or append it if `index` is `None`.
    /// The stop receives its ID immediately.
    pub fn add_stop(
        &mut self,
        index: Option<usize>,
        ids: &mut impl IdSource,
    ) -> Result<StopID, IndexOutOfRangeError> {
        let len = self.stops.len();
        let index = index.unwrap_or(len);
        // Inserting *at* len is appending.
        if index > len {
            return Err(IndexOutOfRangeError { index, len });
        }
        let stop = Stop::new(ids);
        // Unwrap ok - just created with an ID.
        let id = stop.id.unwrap();
        self.stops.insert(index, stop);
        Ok(id)
    }
    pub fn remove_stop(&mut self, index: usize) -> Result<Stop, IndexOutOfRangeError> {
        let len = self.stops.len();
        if index >= len {
            return Err(IndexOutOfRangeError { index, len });
        }
        Ok(self.stops.remove(index))
    }
    pub fn stop_mut(&mut self, index: usize) -> Result<&mut Stop, IndexOutOfRangeError> {
        let len = self.stops.len();
        self.stops
            .get_mut(index)
            .ok_or(IndexOutOfRangeError { index, len })
    }
    /// Give every stop without an ID a fresh one. Returns how many were assigned.
    pub fn assign_missing_stop_ids(&mut self, ids: &mut impl IdSource) -> usize {
        let mut assigned = 0;
        for stop in self.stops.iter_mut().filter(|stop| stop.id.is_none()) {
            stop.id = Some(StopID::generate(ids));
            assigned += 1;
        }
        assigned
    }
}

#[cfg(test)]
mod test {
    use super::{IndexOutOfRangeError, Stop, StopPatch};
    use crate::{id::SequentialIds, state::shape::Shape};

    fn gradient(ids: &mut SequentialIds) -> Shape {
        let mut shape = Shape::default();
        for _ in 0..3 {
            shape.add_stop(None, ids).unwrap();
        }
        shape
    }
    fn stop_ids(shape: &Shape) -> Vec<super::StopID> {
        shape.stops.iter().map(|stop| stop.id().unwrap()).collect()
    }

    #[test]
    fn insert_preserves_order() {
        let mut ids = SequentialIds::new();
        let mut shape = gradient(&mut ids);
        let before = stop_ids(&shape);

        let new = shape.add_stop(Some(1), &mut ids).unwrap();
        assert_eq!(stop_ids(&shape), [before[0], new, before[1], before[2]]);
        assert_eq!(shape.stops[1].color, "");
        assert_eq!(shape.stops[1].position, "");

        // Insert at the very end is fine, past it is not.
        assert!(shape.add_stop(Some(4), &mut ids).is_ok());
        assert_eq!(
            shape.add_stop(Some(9), &mut ids),
            Err(IndexOutOfRangeError { index: 9, len: 5 })
        );
    }
    #[test]
    fn remove_then_add_gets_new_id() {
        let mut ids = SequentialIds::new();
        let mut shape = gradient(&mut ids);
        let before = stop_ids(&shape);

        let removed = shape.remove_stop(1).unwrap();
        assert_eq!(removed.id(), Some(before[1]));
        assert_eq!(stop_ids(&shape), [before[0], before[2]]);

        let new = shape.add_stop(Some(1), &mut ids).unwrap();
        assert_ne!(new, before[1]);
        assert_eq!(stop_ids(&shape), [before[0], new, before[2]]);
    }
    #[test]
    fn remove_out_of_range() {
        let mut shape = Shape::default();
        assert_eq!(
            shape.remove_stop(0),
            Err(IndexOutOfRangeError { index: 0, len: 0 })
        );
    }
    #[test]
    fn missing_ids_only() {
        let mut ids = SequentialIds::new();
        let mut shape = gradient(&mut ids);
        let existing = stop_ids(&shape);
        shape.stops.push(Stop::with_color("red", "0%"));

        assert_eq!(shape.assign_missing_stop_ids(&mut ids), 1);
        let after = stop_ids(&shape);
        assert_eq!(after[..3], existing[..]);
        assert_eq!(shape.assign_missing_stop_ids(&mut ids), 0);
    }
    #[test]
    fn patch_stop() {
        let mut stop = Stop::with_color("red", "0%");
        stop.apply_patch(StopPatch {
            position: Some("50%".into()),
            ..Default::default()
        });
        assert_eq!(stop, Stop::with_color("red", "50%"));
    }
}
