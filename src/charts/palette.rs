//! Chart colours shared by the interactive and static renderers.

/// RGB triple, converted to `egui::Color32` or `plotters::RGBColor` at use.
pub type Rgb = (u8, u8, u8);

pub const DISPOSED: Rgb = (0xFF, 0x61, 0x03);
pub const RECYCLED: Rgb = (0x00, 0xBF, 0xFF);
pub const LINE: Rgb = (0x1F, 0x77, 0xB4);
pub const BAR: Rgb = (0x1F, 0x77, 0xB4);
pub const UNDEFINED: Rgb = (0x80, 0x80, 0x80);

// Page theme
pub const BACKGROUND_DARK: Rgb = (0x37, 0x32, 0x32);
pub const BACKGROUND_LIGHT: Rgb = (0x69, 0xCC, 0xF7);
pub const CONTENT: Rgb = (0x54, 0x54, 0x54);

// Diverging coolwarm anchors
const COOL: Rgb = (59, 76, 192);
const NEUTRAL: Rgb = (221, 221, 221);
const WARM: Rgb = (180, 4, 38);

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Coolwarm colour for a correlation coefficient, scale fixed to [-1, 1].
pub fn coolwarm(value: f64) -> Rgb {
    if value.is_nan() {
        return UNDEFINED;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        lerp(NEUTRAL, COOL, -v)
    } else {
        lerp(NEUTRAL, WARM, v)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Rgb) -> Rgb {
    let luminance =
        0.299 * background.0 as f64 + 0.587 * background.1 as f64 + 0.114 * background.2 as f64;
    if luminance > 140.0 {
        (0, 0, 0)
    } else {
        (255, 255, 255)
    }
}
