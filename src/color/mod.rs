mod order;
mod utils;

use smart_leds::RGB8;

pub use order::ColorOrder;
pub use utils::{parse_hex_color, rgb_from_u32, scale_color, to_hex_color};

pub type Rgb = RGB8;

/// All channels off
pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
