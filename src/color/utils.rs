use crate::{color::Rgb, error::ConfigError, math8::scale8};

/// Scale every channel of a color by an 8-bit level
#[inline]
pub fn scale_color(color: Rgb, level: u8) -> Rgb {
    Rgb {
        r: scale8(color.r, level),
        g: scale8(color.g, level),
        b: scale8(color.b, level),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Parse a `#RRGGBB` (or `RRGGBB`) string
pub fn parse_hex_color(value: &str) -> Result<Rgb, ConfigError> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Color(value.to_owned()));
    }
    u32::from_str_radix(digits, 16)
        .map(rgb_from_u32)
        .map_err(|_| ConfigError::Color(value.to_owned()))
}

/// Format a color as `#RRGGBB`
pub fn to_hex_color(color: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}
