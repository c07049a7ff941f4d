//! # Geometry
//!
//! Moving, resizing, and rounding shapes. Every operation here is unit-safe: a supplied length is only applied to a
//! field with the same units, any other axis is silently left alone. Each operation reports the [`Fields`] it wrote.

use super::shape::{Fields, Shape};
use crate::units::Length;

bitflags::bitflags! {
    /// The edges a resize handle drags. Corner handles combine two.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        const TOP = 0b0001;
        const LEFT = 0b0010;
        const RIGHT = 0b0100;
        const BOTTOM = 0b1000;
    }
}
impl Direction {
    /// Check that the direction doesn't pull two opposing edges at once, which has no sensible meaning.
    pub fn validate(self) -> Result<Self, ResizeError> {
        if self.contains(Self::TOP | Self::BOTTOM) || self.contains(Self::LEFT | Self::RIGHT) {
            Err(ResizeError::OpposingEdges(self))
        } else {
            Ok(self)
        }
    }
}
impl std::str::FromStr for Direction {
    type Err = ResizeError;
    /// Parse a handle name, such as `"top-left"` or `"bottom"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('-')
            .map(|edge| match edge.trim_ascii() {
                "top" => Ok(Self::TOP),
                "left" => Ok(Self::LEFT),
                "right" => Ok(Self::RIGHT),
                "bottom" => Ok(Self::BOTTOM),
                other => Err(ResizeError::UnknownEdge(other.to_owned())),
            })
            .try_fold(Self::empty(), |acc, edge| Ok::<_, ResizeError>(acc | edge?))?
            .validate()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    #[error("resize direction {0:?} drags opposing edges")]
    OpposingEdges(Direction),
    #[error("unknown resize edge {0:?}")]
    UnknownEdge(String),
}

/// How far the pointer has travelled since the start of the resize gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResizeDiff {
    pub left: f64,
    pub top: f64,
}

/// The geometry of a shape at the start of a resize gesture.
///
/// A drag resizes in many small steps, and each step must be computed from where the gesture began, not from where
/// the previous step left the shape. Take one with [`Shape::resize_origin`] on pointer-down and hand the same one to
/// every step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResizeOrigin {
    pub left: Option<Length>,
    pub top: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("property {path:?} of shape is not a geometry value")]
pub struct InvalidPropertyPathError {
    pub path: String,
}

/// Apply `new` over `field` only if the units agree.
fn compatible_slot<'a>(
    field: &'a mut Option<Length>,
    new: Option<&Length>,
) -> Option<(&'a mut Length, Length)> {
    let new = *new?;
    let field = field.as_mut()?;
    field.is_compatible(&new).then_some((field, new))
}

/// Move one edge of an axis while the opposite edge stays put.
/// All four lengths must share units, as the position and size are summed.
fn anchored(
    origin_position: Option<Length>,
    origin_size: Option<Length>,
    position: &mut Option<Length>,
    size: &mut Option<Length>,
    delta: f64,
) -> bool {
    let (Some(origin_position), Some(origin_size), Some(position), Some(size)) =
        (origin_position, origin_size, position.as_mut(), size.as_mut())
    else {
        return false;
    };
    let units = origin_position.units;
    if [origin_size.units, position.units, size.units]
        .into_iter()
        .any(|other| other != units)
    {
        return false;
    }
    let far_edge = origin_position.value + origin_size.value;
    // May approach, but never cross, the far edge.
    position.value = (origin_position.value + delta).min(far_edge);
    size.value = far_edge - position.value;
    true
}

/// Stretch a size by `delta`, never below zero.
fn stretched(origin_size: Option<Length>, size: &mut Option<Length>, delta: f64) -> bool {
    let (Some(origin_size), Some(size)) = (origin_size, size.as_mut()) else {
        return false;
    };
    if !origin_size.is_compatible(size) {
        return false;
    }
    size.value = (origin_size.value + delta).max(0.0);
    true
}

impl Shape {
    /// Set the position. Each axis is replaced wholesale, if the units match.
    pub fn move_to(&mut self, left: Option<&Length>, top: Option<&Length>) -> Fields {
        let mut written = Fields::empty();
        if let Some((field, new)) = compatible_slot(&mut self.left, left) {
            *field = new;
            written |= Fields::LEFT;
        }
        if let Some((field, new)) = compatible_slot(&mut self.top, top) {
            *field = new;
            written |= Fields::TOP;
        }
        written
    }
    /// Offset the position. Each axis is offset, if the units match.
    pub fn move_by(&mut self, left: Option<&Length>, top: Option<&Length>) -> Fields {
        let mut written = Fields::empty();
        if let Some((field, delta)) = compatible_slot(&mut self.left, left) {
            field.value += delta.value;
            written |= Fields::LEFT;
        }
        if let Some((field, delta)) = compatible_slot(&mut self.top, top) {
            field.value += delta.value;
            written |= Fields::TOP;
        }
        written
    }
    /// Snapshot the geometry, for use as the origin of a resize gesture.
    #[must_use]
    pub fn resize_origin(&self) -> ResizeOrigin {
        ResizeOrigin {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }
    /// Drag the edges in `direction` by `diff`, relative to `origin` (or the shape as it is now, if `None`).
    ///
    /// Dragging `top` or `left` keeps the opposite edge fixed, and the dragged edge can't pass it.
    /// Dragging `right` or `bottom` stretches the size, clamped at zero.
    /// Axes whose units disagree are skipped.
    pub fn resize(
        &mut self,
        direction: Direction,
        diff: ResizeDiff,
        origin: Option<&ResizeOrigin>,
    ) -> Result<Fields, ResizeError> {
        let direction = direction.validate()?;
        let origin = origin.copied().unwrap_or_else(|| self.resize_origin());

        let mut written = Fields::empty();
        if direction.contains(Direction::TOP)
            && anchored(origin.top, origin.height, &mut self.top, &mut self.height, diff.top)
        {
            written |= Fields::TOP | Fields::HEIGHT;
        }
        if direction.contains(Direction::LEFT)
            && anchored(origin.left, origin.width, &mut self.left, &mut self.width, diff.left)
        {
            written |= Fields::LEFT | Fields::WIDTH;
        }
        // Right and bottom are driven by the horizontal and vertical pointer travel respectively.
        if direction.contains(Direction::RIGHT) && stretched(origin.width, &mut self.width, diff.left) {
            written |= Fields::WIDTH;
        }
        if direction.contains(Direction::BOTTOM) && stretched(origin.height, &mut self.height, diff.top) {
            written |= Fields::HEIGHT;
        }
        Ok(written)
    }
    /// Round each of the given geometry fields that is set.
    pub fn round_fields(&mut self, fields: Fields) {
        for field in [Fields::LEFT, Fields::TOP, Fields::WIDTH, Fields::HEIGHT] {
            if !fields.contains(field) {
                continue;
            }
            // Unwrap ok - single field.
            if let Some(length) = self.geometry_mut(field).unwrap() {
                length.value = crate::util::round_half_up(length.value);
            }
        }
    }
    /// Round the geometry value at a dotted property path, such as `"left"` or `"gradient.offset"`.
    ///
    /// Paths into the type-specific fields may step through tables by key and arrays by index, and must end at a
    /// table with a numeric `value`.
    pub fn round_property(&mut self, path: &str) -> Result<(), InvalidPropertyPathError> {
        let invalid = || InvalidPropertyPathError {
            path: path.to_owned(),
        };
        if let Some(field) = Fields::from_path(path) {
            if self.geometry(field).is_none() {
                return Err(invalid());
            }
            self.round_fields(field);
            return Ok(());
        }

        let segments = crate::util::path_segments(path).ok_or_else(invalid)?;
        let (first, rest) = segments.split_first().ok_or_else(invalid)?;
        let mut cursor = self.fields.get_mut(*first).ok_or_else(invalid)?;
        for segment in rest {
            cursor = match cursor {
                toml::Value::Table(table) => table.get_mut(*segment),
                toml::Value::Array(array) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| array.get_mut(index)),
                _ => None,
            }
            .ok_or_else(invalid)?;
        }
        match cursor.as_table_mut().and_then(|table| table.get_mut("value")) {
            Some(toml::Value::Float(value)) => {
                *value = crate::util::round_half_up(*value);
                Ok(())
            }
            // Already whole.
            Some(toml::Value::Integer(_)) => Ok(()),
            _ => Err(invalid()),
        }
    }
}
