//! Shared utility functions.

/// Round to two decimal places, ties to even.
///
/// Rounds the exact binary value, so `0.125` becomes `0.12` while `0.135`
/// (stored slightly above the half) becomes `0.14`. Confidence values are
/// stored with this precision so they survive a JSON round-trip unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        // The product may have been rounded onto the half; the fused
        // residual says which side the exact value lies on.
        let residual = value.mul_add(100.0, -scaled);
        if residual > 0.0 {
            scaled.ceil()
        } else if residual < 0.0 {
            scaled.floor()
        } else {
            scaled.round_ties_even()
        }
    } else {
        scaled.round()
    };
    rounded / 100.0
}

/// Length of a string in characters (Unicode scalar values), not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
