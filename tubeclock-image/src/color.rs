//! RGB565 colour packing and dimming
//!
//! Two dimming algorithms are kept on purpose: bitmaps are alpha blended
//! toward black in 5/6 bit space, packed images are scaled per channel in
//! 8 bit space. Both are monotonic in the factor and both are exact at 255,
//! but they do not produce identical pixels for the same factor.

/// RGB565 black
pub const BLACK: u16 = 0x0000;

/// Dimming factor meaning "unmodified"
pub const FULL_BRIGHTNESS: u8 = 255;

/// Pack 8 bit channels into RGB565 by truncation
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Unpack RGB565 into MSB-aligned 8 bit channels (low bits zero)
#[inline]
pub const fn unpack(color: u16) -> (u8, u8, u8) {
    let hi = (color >> 8) as u8;
    let lo = color as u8;
    let r = hi & 0xF8;
    let g = ((hi << 5) | (lo >> 3)) & 0xFC;
    let b = (lo << 3) & 0xF8;
    (r, g, b)
}

/// Blend `fg` over `bg` with weight `alpha` (255 = all `fg`)
///
/// Works on the native 5/6 bit channels doubled plus one, so that alpha 255
/// returns `fg` exactly.
#[inline]
pub fn alpha_blend(alpha: u8, fg: u16, bg: u16) -> u16 {
    let a = alpha as u32;
    let inv = 255 - a;

    let fg = fg as u32;
    let bg = bg as u32;

    let fg_r = ((fg >> 10) & 0x3E) + 1;
    let fg_g = ((fg >> 4) & 0x7E) + 1;
    let fg_b = ((fg << 1) & 0x3E) + 1;

    let bg_r = ((bg >> 10) & 0x3E) + 1;
    let bg_g = ((bg >> 4) & 0x7E) + 1;
    let bg_b = ((bg << 1) & 0x3E) + 1;

    // >> 9 drops the rounding bit and divides by 256
    let r = (fg_r * a + bg_r * inv) >> 9;
    let g = (fg_g * a + bg_g * inv) >> 9;
    let b = (fg_b * a + bg_b * inv) >> 9;

    ((r << 11) | (g << 5) | b) as u16
}

/// Dim a bitmap pixel: blend toward black
#[inline]
pub fn dim_blend(color: u16, factor: u8) -> u16 {
    if factor == FULL_BRIGHTNESS {
        color
    } else {
        alpha_blend(factor, color, BLACK)
    }
}

/// Dim a packed pixel: scale each 8 bit channel by `factor / 255`
#[inline]
pub fn dim_scale(color: u16, factor: u8) -> u16 {
    if factor == FULL_BRIGHTNESS {
        return color;
    }
    let (r, g, b) = unpack(color);
    rgb565(scale(r, factor), scale(g, factor), scale(b, factor))
}

#[inline]
fn scale(channel: u8, factor: u8) -> u8 {
    (channel as u16 * factor as u16 / 255) as u8
}
