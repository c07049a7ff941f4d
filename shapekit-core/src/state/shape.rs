//! # Shapes
//!
//! A shape is a positioned, sized box with a free-form type (`"linear-gradient"`, `"circle"`, ...) that the
//! editor itself never interprets. Gradient shapes additionally carry an ordered list of [stops](super::stops).

use super::stops::Stops;
use crate::units::{Length, LengthPatch};

pub type ShapeID = crate::id::Id<Shape>;

bitflags::bitflags! {
    /// A set of the geometry fields of a shape. Mutations report which fields they wrote, so only those get rounded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Fields: u8 {
        const LEFT = 0b0001;
        const TOP = 0b0010;
        const WIDTH = 0b0100;
        const HEIGHT = 0b1000;
    }
}
impl Fields {
    /// Property path of each field in the set, in declaration order.
    pub fn paths(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::LEFT, "left"),
            (Self::TOP, "top"),
            (Self::WIDTH, "width"),
            (Self::HEIGHT, "height"),
        ]
        .into_iter()
        .filter(move |(field, _)| self.contains(*field))
        .map(|(_, path)| path)
    }
    /// The field with the given property path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "left" => Some(Self::LEFT),
            "top" => Some(Self::TOP),
            "width" => Some(Self::WIDTH),
            "height" => Some(Self::HEIGHT),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    /// Assigned when the shape is committed into a layer. Staged shapes have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<ShapeID>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(default, skip_serializing_if = "smallvec::SmallVec::is_empty")]
    pub stops: Stops,
    /// Type specific properties.
    #[serde(flatten)]
    pub fields: toml::Table,
}
impl Shape {
    /// A shape of the given type with all four geometry fields set.
    #[must_use]
    pub fn new(kind: impl Into<String>, left: Length, top: Length, width: Length, height: Length) -> Self {
        Self {
            kind: kind.into(),
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }
    #[must_use]
    pub fn id(&self) -> Option<ShapeID> {
        self.id
    }
    pub(crate) fn assign_id(&mut self, id: ShapeID) {
        self.id = Some(id);
    }
    /// Get one geometry field. `None` if it's unset, or if `field` isn't exactly one field.
    #[must_use]
    pub fn geometry(&self, field: Fields) -> Option<&Length> {
        if field == Fields::LEFT {
            self.left.as_ref()
        } else if field == Fields::TOP {
            self.top.as_ref()
        } else if field == Fields::WIDTH {
            self.width.as_ref()
        } else if field == Fields::HEIGHT {
            self.height.as_ref()
        } else {
            None
        }
    }
    pub(crate) fn geometry_mut(&mut self, field: Fields) -> Option<&mut Option<Length>> {
        if field == Fields::LEFT {
            Some(&mut self.left)
        } else if field == Fields::TOP {
            Some(&mut self.top)
        } else if field == Fields::WIDTH {
            Some(&mut self.width)
        } else if field == Fields::HEIGHT {
            Some(&mut self.height)
        } else {
            None
        }
    }
    /// Sizes never go negative, however they're set.
    pub(crate) fn clamp_sizes(&mut self) {
        for size in [&mut self.width, &mut self.height].into_iter().flatten() {
            size.value = size.value.max(0.0);
        }
    }
    /// Does the shape have enough geometry to be drawn?
    #[must_use]
    pub fn is_placeable(&self) -> bool {
        self.left.is_some() && self.top.is_some() && self.width.is_some() && self.height.is_some()
    }
    /// Merge a partial shape over this one. See [`ShapePatch`] for the rules.
    ///
    /// On error, nothing is changed. Returns the geometry fields that were written.
    pub fn apply_patch(&mut self, patch: ShapePatch) -> Result<Fields, PatchError> {
        let ShapePatch {
            kind,
            left,
            top,
            width,
            height,
            stops,
            fields,
        } = patch;
        let geometry = [
            (Fields::LEFT, left),
            (Fields::TOP, top),
            (Fields::WIDTH, width),
            (Fields::HEIGHT, height),
        ];
        // Validate everything before touching anything.
        for (field, patch) in &geometry {
            if let Some(patch) = patch {
                if self.geometry(*field).is_none() && patch.complete().is_none() {
                    // Unwrap ok - single field.
                    let name = field.paths().next().unwrap();
                    return Err(PatchError::IncompleteLength { field: name });
                }
            }
        }

        let mut written = Fields::empty();
        for (field, patch) in geometry {
            let Some(patch) = patch else { continue };
            // Unwrap ok - single field.
            let slot = self.geometry_mut(field).unwrap();
            let accepted = match slot {
                Some(existing) => existing.merge(patch),
                None => {
                    // Checked above.
                    *slot = patch.complete();
                    true
                }
            };
            if accepted {
                written |= field;
            }
        }
        self.clamp_sizes();
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(stops) = stops {
            self.stops = stops;
        }
        for (key, value) in fields {
            match self.fields.entry(key) {
                toml::map::Entry::Vacant(vacant) => {
                    vacant.insert(value);
                }
                toml::map::Entry::Occupied(mut occupied) => match (occupied.get_mut(), value) {
                    (toml::Value::Table(existing), toml::Value::Table(new)) => existing.extend(new),
                    (existing, value) => *existing = value,
                },
            }
        }
        Ok(written)
    }
}

/// A partial [`Shape`], merged over an existing one.
///
/// Each field that is present is applied: composite values (geometry and tables) are merged key by key over the
/// existing value, anything else replaces it. This lets a caller set `left.value` without touching `left.units`.
/// A geometry patch naming different units than the existing field is ignored, as the two can't be combined.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapePatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<LengthPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<LengthPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LengthPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<LengthPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Stops>,
    #[serde(flatten)]
    pub fields: toml::Table,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("{field} is not set, so both a value and units are required")]
    IncompleteLength { field: &'static str },
}

#[cfg(test)]
mod test {
    use super::{Fields, PatchError, Shape, ShapePatch};
    use crate::units::{Length, LengthPatch, Unit};

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
    fn field_paths() {
        assert_eq!(
            (Fields::TOP | Fields::WIDTH).paths().collect::<Vec<_>>(),
            ["top", "width"]
        );
        assert_eq!(Fields::from_path("height"), Some(Fields::HEIGHT));
        assert_eq!(Fields::from_path("stops"), None);
    }
    #[test]
    fn patch_keeps_units() {
        let mut shape = square();
        let written = shape
            .apply_patch(ShapePatch {
                left: Some(LengthPatch::value(10.0)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(written, Fields::LEFT);
        assert_eq!(shape.left, Some(Length::px(10.0)));
    }
    #[test]
    fn patch_ignores_mismatched_units() {
        let mut shape = square();
        let written = shape
            .apply_patch(ShapePatch {
                top: Some(Length::new(50.0, Unit::Percent).into()),
                width: Some(LengthPatch::value(4.0)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(written, Fields::WIDTH);
        assert_eq!(shape.top, Some(Length::px(5.0)));
        assert_eq!(shape.width, Some(Length::px(4.0)));
    }
    #[test]
    fn patch_missing_geometry() {
        let mut shape = Shape::default();
        // Can't invent units.
        assert_eq!(
            shape.apply_patch(ShapePatch {
                left: Some(Length::px(1.0).into()),
                height: Some(LengthPatch::value(3.0)),
                ..Default::default()
            }),
            Err(PatchError::IncompleteLength { field: "height" })
        );
        // Nothing changed, including the valid left.
        assert_eq!(shape, Shape::default());

        shape
            .apply_patch(ShapePatch {
                width: Some(Length::px(-3.0).into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(shape.width, Some(Length::px(0.0)));
    }
    #[test]
    fn patch_merges_tables() {
        let mut shape: Shape = toml::from_str(
            r#"
            type = "linear-gradient"
            gradient = { angle = 45, repeat = false }
            label = "sky"
            "#,
        )
        .unwrap();
        let patch: ShapePatch = toml::from_str(
            r#"
            gradient = { angle = 90 }
            label = { text = "sea" }
            "#,
        )
        .unwrap();
        shape.apply_patch(patch).unwrap();

        let gradient = shape.fields.get("gradient").and_then(toml::Value::as_table).unwrap();
        assert_eq!(gradient.get("angle").and_then(toml::Value::as_integer), Some(90));
        assert_eq!(gradient.get("repeat").and_then(toml::Value::as_bool), Some(false));
        // Not composite before, so replaced.
        assert!(shape.fields.get("label").unwrap().is_table());
        assert_eq!(shape.kind, "linear-gradient");
    }
}
