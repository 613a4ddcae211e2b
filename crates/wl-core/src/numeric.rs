//! Load rounding.
//!
//! Every stored load figure is an integer number of hours. Real-valued
//! intermediate results are rounded to the nearest integer with ties away
//! from zero, which is exactly `f64::round`.

/// Round a real-valued load to whole hours, ties away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_load(value: f64) -> i64 {
    value.round() as i64
}

/// Floor a real-valued load to whole hours.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn floor_load(value: f64) -> i64 {
    value.floor() as i64
}
