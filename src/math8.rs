//! 8-bit fixed-point helpers used for brightness and fades

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// `scale8(v, 255) == v`, so a full-scale pass leaves colors untouched.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Progress (0-255) of step `step` out of `steps`
///
/// The last step always yields 255.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn step_progress8(step: u16, steps: u16) -> u8 {
    if steps == 0 || step >= steps {
        return 255;
    }
    ((step as u32 * 255) / steps as u32) as u8
}

/// Convert a 0.0-1.0 fraction to an 8-bit level, clamping out-of-range input
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fraction_to_level(fraction: f32) -> u8 {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    if fraction >= 1.0 {
        return 255;
    }
    (fraction * 255.0).round() as u8
}

/// Express `level` relative to `reference` (both absolute 0-255 levels)
///
/// Used to turn an absolute floor brightness into a scale factor for a frame
/// that is already scaled to `reference`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn relative_level(level: u8, reference: u8) -> u8 {
    if reference == 0 || level >= reference {
        return 255;
    }
    ((level as u16 * 255) / reference as u16) as u8
}
