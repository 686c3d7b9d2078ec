//! HSL colours and the RGB / hex / HSV conversions around them.
//!
//! Every conversion here is a pure function. Hue is in degrees, saturation,
//! luminance and value are percentages, alpha is a unit fraction.

use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;
use crate::geometry::clamp;

pub const MAX_HUE: f64 = 360.0;
pub const MAX_PERCENT: f64 = 100.0;

/// An HSLA colour. Hue wraps and the other channels are clamped on
/// construction, so two colours compare equal exactly when their normalised
/// channels are equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    hue: f64,
    saturation: f64,
    luminance: f64,
    alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self {
        hue: 0.0,
        saturation: 0.0,
        luminance: 0.0,
        alpha: 1.0,
    };

    pub const WHITE: Self = Self {
        hue: 0.0,
        saturation: 0.0,
        luminance: 100.0,
        alpha: 1.0,
    };

    pub fn new(hue: f64, saturation: f64, luminance: f64, alpha: f64) -> Self {
        Self {
            hue: wrap_hue(hue),
            saturation: clamp(saturation, 0.0, MAX_PERCENT),
            luminance: clamp(luminance, 0.0, MAX_PERCENT),
            alpha: clamp(alpha, 0.0, 1.0),
        }
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let (h, s, l) = rgb_to_hsl(rgb);
        Self::new(h, s, l, 1.0)
    }

    /// Build a colour from a sampled canvas pixel.
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        let (h, s, l) = rgb_to_hsl([rgba[0], rgba[1], rgba[2]]);
        Self::new(h, s, l, f64::from(rgba[3]) / 255.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        Ok(Self::from_rgb(hex_to_rgb(hex)?))
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn luminance(&self) -> f64 {
        self.luminance
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self::new(self.hue, self.saturation, self.luminance, alpha)
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        hsl_to_rgb(self.hue, self.saturation, self.luminance)
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, (self.alpha * 255.0).round() as u8]
    }

    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.to_rgb())
    }

    /// CSS `hsl()` notation, ignoring alpha.
    pub fn to_hsl_string(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.luminance)
    }

    /// CSS `hsla()` notation.
    pub fn to_hsla_string(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.luminance, self.alpha
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_rgba())
    }
}

impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba();
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

impl From<egui::Color32> for Color {
    fn from(color: egui::Color32) -> Self {
        Self::from_rgba(color.to_srgba_unmultiplied())
    }
}

/// Hue folded into `[0, 360)`, so 360° and 0° are the same colour.
fn wrap_hue(hue: f64) -> f64 {
    let hue = hue.rem_euclid(MAX_HUE);
    if hue.is_finite() && hue < MAX_HUE { hue } else { 0.0 }
}

fn chroma_to_rgb(hue: f64, chroma: f64, offset: f64) -> [u8; 3] {
    let sector = hue.rem_euclid(MAX_HUE) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let to_byte = |channel: f64| (clamp(channel + offset, 0.0, 1.0) * 255.0).round() as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}

fn hue_of(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    }
}

fn unit_channels(rgb: [u8; 3]) -> (f64, f64, f64) {
    (
        f64::from(rgb[0]) / 255.0,
        f64::from(rgb[1]) / 255.0,
        f64::from(rgb[2]) / 255.0,
    )
}

pub fn hsl_to_rgb(hue: f64, saturation: f64, luminance: f64) -> [u8; 3] {
    let s = saturation / MAX_PERCENT;
    let l = luminance / MAX_PERCENT;
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    chroma_to_rgb(hue, chroma, l - chroma / 2.0)
}

/// Returns `(hue, saturation, luminance)`.
pub fn rgb_to_hsl(rgb: [u8; 3]) -> (f64, f64, f64) {
    let (r, g, b) = unit_channels(rgb);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    (hue_of(r, g, b, max, delta), s * MAX_PERCENT, l * MAX_PERCENT)
}

pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [u8; 3] {
    let v = value / MAX_PERCENT;
    let chroma = v * saturation / MAX_PERCENT;
    chroma_to_rgb(hue, chroma, v - chroma)
}

/// Returns `(hue, saturation, value)`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> (f64, f64, f64) {
    let (r, g, b) = unit_channels(rgb);
    let max = r.max(g).max(b);
    let delta = max - r.min(g).min(b);
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (hue_of(r, g, b, max, delta), s * MAX_PERCENT, max * MAX_PERCENT)
}

pub fn hsl_to_hsv(hue: f64, saturation: f64, luminance: f64) -> (f64, f64, f64) {
    let s = saturation / MAX_PERCENT;
    let l = luminance / MAX_PERCENT;
    let v = l + s * l.min(1.0 - l);
    let sv = if v == 0.0 { 0.0 } else { 2.0 * (1.0 - l / v) };
    (hue, sv * MAX_PERCENT, v * MAX_PERCENT)
}

pub fn hsv_to_hsl(hue: f64, saturation: f64, value: f64) -> (f64, f64, f64) {
    let s = saturation / MAX_PERCENT;
    let v = value / MAX_PERCENT;
    let l = v * (1.0 - s / 2.0);
    let sl = if l == 0.0 || l == 1.0 {
        0.0
    } else {
        (v - l) / l.min(1.0 - l)
    };
    (hue, sl * MAX_PERCENT, l * MAX_PERCENT)
}

/// Parse `#rrggbb` or `rrggbb`, case-insensitive.
pub fn hex_to_rgb(hex: &str) -> Result<[u8; 3], ParseColorError> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return Err(ParseColorError::InvalidLength(hex.to_owned()));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseColorError::InvalidDigit(hex.to_owned()));
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or_default();
    Ok([channel(0), channel(2), channel(4)])
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

pub fn hex_to_hsl(hex: &str) -> Result<(f64, f64, f64), ParseColorError> {
    Ok(rgb_to_hsl(hex_to_rgb(hex)?))
}

pub fn hsl_to_hex(hue: f64, saturation: f64, luminance: f64) -> String {
    rgb_to_hex(hsl_to_rgb(hue, saturation, luminance))
}
