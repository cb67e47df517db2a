//! EMU to pixel conversion.
//!
//! Slide geometry is stored in English Metric Units (914400 per inch). Pages
//! are laid out at 96 DPI, so one pixel is exactly 9525 EMU.

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Pixels per inch of the rendered pages.
pub const PX_PER_INCH: i64 = 96;

/// English Metric Units per pixel.
pub const EMU_PER_PX: i64 = EMU_PER_INCH / PX_PER_INCH;

/// Convert EMU to whole pixels, truncating toward zero.
///
/// Truncation is part of the output contract: two runs over the same deck
/// must place every rectangle on the same pixel.
pub fn emu_to_px(emu: i64) -> i64 {
    emu / EMU_PER_PX
}
