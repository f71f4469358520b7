use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{MoodError, MoodResult};
use crate::foundation::math::{Lerp, mul_div255};

/// Opaque 24-bit sRGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or the `#rgb` shorthand, case-insensitive, `#` optional.
    pub fn from_hex(s: &str) -> MoodResult<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);

        fn nibble(c: u8) -> Option<u8> {
            (c as char).to_digit(16).map(|d| d as u8)
        }

        let bytes = digits.as_bytes();
        let parsed = match bytes.len() {
            6 => bytes
                .chunks_exact(2)
                .map(|pair| Some(nibble(pair[0])? << 4 | nibble(pair[1])?))
                .collect::<Option<Vec<u8>>>(),
            3 => bytes
                .iter()
                .map(|&c| nibble(c).map(|n| n << 4 | n))
                .collect::<Option<Vec<u8>>>(),
            _ => None,
        };

        match parsed.as_deref() {
            Some(&[r, g, b]) => Ok(Self::new(r, g, b)),
            _ => Err(MoodError::Color(s.to_owned())),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear blend. `t` is clamped; the endpoints are returned exactly.
    pub fn interpolate(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }
        fn channel(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }
        Self::new(
            channel(self.r, other.r, t),
            channel(self.g, other.g, t),
            channel(self.b, other.b, t),
        )
    }

    /// Multiplicative brightness change: `percent = -30` darkens every channel to 70%.
    pub fn shade(self, percent: f64) -> Self {
        let scale = 100.0 + percent.clamp(-100.0, 100.0);
        let channel = |c: u8| (f64::from(c) * scale / 100.0).trunc().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn complementary(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Premultiplied RGBA8 for this color at `alpha` (0..=1).
    pub fn premul(self, alpha: f32) -> [u8; 4] {
        let a = ((alpha.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
        [
            mul_div255(u16::from(self.r), a),
            mul_div255(u16::from(self.g), a),
            mul_div255(u16::from(self.b), a),
            a as u8,
        ]
    }
}

impl Lerp for Rgb {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.interpolate(*b, t)
    }
}

impl FromStr for Rgb {
    type Err = MoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
