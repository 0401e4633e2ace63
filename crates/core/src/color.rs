//! Color types for the heatmap overlay.
//!
//! Comfort maps onto a hue wheel segment (red for uncomfortable, blue for
//! comfortable), and hues are turned into pixels through HSB.

/// Hue, in degrees, assigned to a comfort of 1.0. Comfort 0.0 maps to 0 degrees.
pub const COMFORT_HUE_SPAN: f64 = 210.0;

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Hue/saturation/brightness color. Hue in degrees, the rest in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub h: f64,
    pub s: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Opaque 8-bit RGBA bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

/// Hue in degrees for a comfort value: [0, 1] maps linearly onto [0, 210].
///
/// Input outside [0, 1] is clamped first, NaN reads as 0.
pub fn comfort_hue(comfort: f64) -> f64 {
    let c = if comfort.is_nan() {
        0.0
    } else {
        comfort.clamp(0.0, 1.0)
    };
    c * COMFORT_HUE_SPAN
}

/// Converts HSB to sRGB using the standard six-sector hexcone.
pub fn hsb_to_srgb(c: Hsb) -> Srgb {
    let h = c.h.rem_euclid(360.0) / 60.0;
    let s = c.s.clamp(0.0, 1.0);
    let v = c.b.clamp(0.0, 1.0);
    let chroma = v * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = v - chroma;
    Srgb {
        r: r + m,
        g: g + m,
        b: b + m,
    }
}
