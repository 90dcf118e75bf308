//! Color utilities shared by the effects.

use std::ops::{Add, Mul};

use ratatui::style::Color;

/// RGB color with float channels, nominally in `0.0..=1.0`.
///
/// Channels are allowed to exceed `1.0` while colors are being accumulated
/// with additive blending; [`Rgb::to_color`] clamps on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels.
    pub fn from_u8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Build a color from HSL, with the hue given in turns.
    ///
    /// The hue wraps, so `-0.1` and `0.9` are the same color. Saturation and
    /// lightness are clamped to `0.0..=1.0`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(1.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l);
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Linear interpolation toward `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Whether every channel is zero.
    pub fn is_black(self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Whether every channel is a finite number.
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Largest channel value.
    pub fn max_channel(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Convert to a terminal color, clamping each channel.
    pub fn to_color(self) -> Color {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::Rgb(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Recover a float color from a terminal color. Only `Color::Rgb` maps.
    pub fn from_color(color: Color) -> Option<Self> {
        match color {
            Color::Rgb(r, g, b) => Some(Self::from_u8([r, g, b])),
            _ => None,
        }
    }
}

impl Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: f32) -> Rgb {
        Rgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// Convert HSL (hue in degrees) to a terminal RGB color.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    Rgb::from_hsl(h / 360.0, s, l).to_color()
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(Rgb::from_hsl(1.0 / 3.0, 1.0, 0.5), Rgb::new(0.0, 1.0, 0.0)));
        assert!(close(Rgb::from_hsl(2.0 / 3.0, 1.0, 0.5), Rgb::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hue_wraps() {
        assert!(close(Rgb::from_hsl(-0.02, 1.0, 0.5), Rgb::from_hsl(0.98, 1.0, 0.5)));
        assert!(close(Rgb::from_hsl(1.25, 1.0, 0.5), Rgb::from_hsl(0.25, 1.0, 0.5)));
    }

    #[test]
    fn test_grey_without_saturation() {
        assert_eq!(Rgb::from_hsl(0.4, 0.0, 0.3), Rgb::new(0.3, 0.3, 0.3));
    }

    #[test]
    fn test_to_color_clamps() {
        assert_eq!(Rgb::new(1.7, -0.2, 0.5).to_color(), Color::Rgb(255, 0, 128));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_color_round_trip_through_terminal() {
        let back = Rgb::from_color(Color::Rgb(2, 2, 39)).unwrap();
        assert_eq!(back.to_color(), Color::Rgb(2, 2, 39));
        assert!(Rgb::from_color(Color::Reset).is_none());
    }
}
