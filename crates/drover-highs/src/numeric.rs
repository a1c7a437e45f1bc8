//! Magnitude-adaptive normalization of decoded solution values.

/// Round `value` to `digits` decimal places.
fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Stabilize a decoded value.
///
/// The value is first rounded to `rounding_digits` decimal places, then
/// rounded again to `max(precision - floor(log10(|value| + 10^-precision)), 1)`
/// decimals. The offset inside the logarithm keeps zero legal. The effect
/// is that `precision` behaves as a significant-digit budget: large values
/// keep few decimals, small values keep many.
///
/// Never panics, for zero, negative, or extreme inputs.
pub fn normalize(value: f64, rounding_digits: i32, precision: i32) -> f64 {
    let rounded = round_to(value, rounding_digits);
    let base = (rounded.abs() + 10f64.powi(-precision)).log10().floor() as i32;
    let digits = (precision - base).max(1);
    round_to(rounded, digits)
}
