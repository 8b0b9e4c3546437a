// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// Color type for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Red color.
    pub const RED: Color = Color(255, 0, 0);
    /// Green color (`#008000`).
    pub const GREEN: Color = Color(0, 128, 0);
    /// Blue color.
    pub const BLUE: Color = Color(0, 0, 255);
    /// Yellow color.
    pub const YELLOW: Color = Color(255, 255, 0);
    /// Purple color (`#800080`).
    pub const PURPLE: Color = Color(128, 0, 128);
    /// Orange color (`#ffa500`).
    pub const ORANGE: Color = Color(255, 165, 0);
    /// Black color.
    pub const BLACK: Color = Color(0, 0, 0);
    /// White color.
    pub const WHITE: Color = Color(255, 255, 255);
    /// Cyan color.
    pub const CYAN: Color = Color(0, 255, 255);
    /// Dark blue color (`#00008b`).
    pub const DARK_BLUE: Color = Color(0, 0, 139);

    /// Look up a color by its CSS/matplotlib name.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "purple" => Self::PURPLE,
            "orange" => Self::ORANGE,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "cyan" => Self::CYAN,
            "darkblue" => Self::DARK_BLUE,
            _ => return None,
        };
        Some(color)
    }
}

/// Linear color ramp from fully transparent black to an opaque color.
///
/// Every channel, alpha included, is interpolated, so the ramp value `t`
/// maps to `(t * r, t * g, t * b, t)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRamp {
    /// Color at the top of the ramp.
    pub color: Color,
}

impl ColorRamp {
    /// Ramp ending at `color`.
    pub const fn transparent_to(color: Color) -> Self {
        Self { color }
    }

    /// Straight (non-premultiplied) RGBA for `t` in [0, 1]. Values outside
    /// the range are clamped.
    pub fn sample(&self, t: f32) -> [f32; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Color(r, g, b) = self.color;
        [
            f32::from(r) / 255.0 * t,
            f32::from(g) / 255.0 * t,
            f32::from(b) / 255.0 * t,
            t,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Color::from_name("darkblue"), Some(Color::DARK_BLUE));
        assert_eq!(Color::from_name("Orange"), Some(Color::ORANGE));
        assert_eq!(Color::from_name("magenta-ish"), None);
    }

    #[test]
    fn test_ramp_endpoints() {
        let ramp = ColorRamp::transparent_to(Color::RED);
        assert_eq!(ramp.sample(0.0), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(1.0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ramp_midpoint_and_clamp() {
        let ramp = ColorRamp::transparent_to(Color::WHITE);
        let mid = ramp.sample(0.5);
        assert!(mid.iter().all(|&c| (c - 0.5).abs() < f32::EPSILON));
        assert_eq!(ramp.sample(7.0), ramp.sample(1.0));
        assert_eq!(ramp.sample(f32::NAN), ramp.sample(0.0));
    }
}
