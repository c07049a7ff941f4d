//! Utility functions, used throughout the crate.

/// Round to the nearest integer, with halves rounding towards positive infinity.
///
/// `f64::round` rounds halves away from zero, which would make `-2.5` snap to `-3`. Editors that drag
/// through zero expect the same snapping on both sides, so `-2.5` becomes `-2`.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Split a dotted property path (`"gradient.stops.0"`) into its segments.
/// Returns `None` for an empty path or one with empty segments.
#[must_use]
pub fn path_segments(path: &str) -> Option<smallvec::SmallVec<[&str; 4]>> {
    let segments: smallvec::SmallVec<[&str; 4]> = path.split('.').collect();
    segments
        .iter()
        .all(|segment| !segment.is_empty())
        .then_some(segments)
}
