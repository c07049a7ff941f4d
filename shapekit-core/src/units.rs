#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitParseError {
    #[error(transparent)]
    Value(#[from] std::num::ParseFloatError),
    #[error("unknown unit")]
    UnrecognizedUnit,
}

/// CSS measurement units understood by the editor.
///
/// No conversion between units is ever attempted - the editor has no idea how large the containing element is,
/// so two lengths may only be combined when their units are identical.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::Display,
)]
pub enum Unit {
    #[strum(serialize = "px")]
    Pixel,
    #[strum(serialize = "%")]
    Percent,
    #[strum(serialize = "em")]
    Em,
    #[strum(serialize = "rem")]
    Rem,
    #[strum(serialize = "vw")]
    ViewportWidth,
    #[strum(serialize = "vh")]
    ViewportHeight,
    #[strum(serialize = "vmin")]
    ViewportMin,
    #[strum(serialize = "vmax")]
    ViewportMax,
    #[strum(serialize = "ch")]
    Ch,
    #[strum(serialize = "ex")]
    Ex,
    #[strum(serialize = "cm")]
    Centimeter,
    #[strum(serialize = "mm")]
    Millimeter,
    #[strum(serialize = "in")]
    Inch,
    /// Typographic points, as defined by W3C.
    #[strum(serialize = "pt")]
    Point,
    #[strum(serialize = "pc")]
    Pica,
    #[strum(serialize = "deg")]
    Degree,
}
impl Unit {
    /// Fetch the CSS suffix of the unit.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        self.into()
    }
}
impl serde::Serialize for Unit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.suffix())
    }
}
impl<'de> serde::Deserialize<'de> for Unit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let suffix = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        suffix
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown unit {suffix:?}")))
    }
}

/// A geometry value: a number paired with the unit it is measured in.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Length {
    pub value: f64,
    pub units: Unit,
}
impl Length {
    #[must_use]
    pub const fn new(value: f64, units: Unit) -> Self {
        Self { value, units }
    }
    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Pixel)
    }
    /// Two lengths are compatible, and thus may be combined, only if they share units.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.units == other.units
    }
    /// Merge a partial length over this one, as long as the patch doesn't try to change units.
    /// Returns `true` if the patch was accepted.
    pub fn merge(&mut self, patch: LengthPatch) -> bool {
        if patch.units.is_some_and(|units| units != self.units) {
            return false;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        true
    }
}
impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.units)
    }
}

impl std::str::FromStr for Length {
    type Err = UnitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_ascii();
        // Units are all ascii, but the input may not be! Split at the last char that could be part of a number.
        let split = s
            .rfind(|c: char| c.is_ascii_digit() || c == '.')
            .map_or(0, |idx| idx + 1);
        let (value, unit) = s.split_at(split);
        let units = unit
            .trim_ascii()
            .parse()
            .map_err(|_| UnitParseError::UnrecognizedUnit)?;

        Ok(Self {
            value: value.trim_ascii().parse()?,
            units,
        })
    }
}

/// A partial [`Length`], for updating only the parts a caller cares about.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LengthPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Unit>,
}
impl LengthPatch {
    #[must_use]
    pub fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            units: None,
        }
    }
    /// Convert into a full length, if both halves are present.
    #[must_use]
    pub fn complete(self) -> Option<Length> {
        Some(Length {
            value: self.value?,
            units: self.units?,
        })
    }
}
impl From<Length> for LengthPatch {
    fn from(value: Length) -> Self {
        Self {
            value: Some(value.value),
            units: Some(value.units),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Length, LengthPatch, Unit, UnitParseError};

    #[test]
    fn parse_lengths() {
        assert_eq!("12.5px".parse(), Ok(Length::px(12.5)));
        assert_eq!(
            " -3 % ".parse(),
            Ok(Length::new(-3.0, Unit::Percent))
        );
        assert_eq!("4vmin".parse(), Ok(Length::new(4.0, Unit::ViewportMin)));
        assert_eq!(
            "4furlongs".parse::<Length>(),
            Err(UnitParseError::UnrecognizedUnit)
        );
        assert!(matches!(
            "..px".parse::<Length>(),
            Err(UnitParseError::Value(_))
        ));
        // Non-ascii must not panic.
        assert!("5😺".parse::<Length>().is_err());
    }
    #[test]
    fn display_round_trips_suffix() {
        for unit in <Unit as strum::IntoEnumIterator>::iter() {
            let length = Length::new(2.0, unit);
            assert_eq!(length.to_string().parse(), Ok(length));
        }
    }
    #[test]
    fn merge_refuses_other_units() {
        let mut length = Length::px(10.0);
        assert!(!length.merge(LengthPatch {
            value: Some(3.0),
            units: Some(Unit::Em),
        }));
        assert_eq!(length, Length::px(10.0));

        assert!(length.merge(LengthPatch::value(3.0)));
        assert_eq!(length, Length::px(3.0));
    }
}
