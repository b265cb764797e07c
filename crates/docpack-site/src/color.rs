//! Accent color utilities.

/// Fallback accent color used when the configured color cannot be parsed.
pub const DEFAULT_PRIMARY: &str = "#D4AF37";
/// Lightened variant of [`DEFAULT_PRIMARY`].
pub const DEFAULT_LIGHT: &str = "#E8C547";
/// Darkened variant of [`DEFAULT_PRIMARY`].
pub const DEFAULT_DARK: &str = "#B89F2E";

/// Percentage applied when deriving light and dark variants.
pub const VARIATION_PERCENT: u8 = 20;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a six digit hex color, with or without a leading `#`.
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }

    /// Shift every channel toward 255 by `percent` of the full range.
    pub fn lighten(self, percent: u8) -> Self {
        let amount = shift_amount(percent);
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
        }
    }

    /// Shift every channel toward 0 by `percent` of the full range.
    pub fn darken(self, percent: u8) -> Self {
        let amount = shift_amount(percent);
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn shift_amount(percent: u8) -> u8 {
    (2.55 * f64::from(percent)).round().min(255.0) as u8
}

/// An accent color with its derived variants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ColorVariations {
    pub primary: String,
    pub light: String,
    pub dark: String,
}

impl ColorVariations {
    /// The gold palette used when the input color is invalid.
    pub fn fallback() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            light: DEFAULT_LIGHT.to_string(),
            dark: DEFAULT_DARK.to_string(),
        }
    }
}

/// Compute the primary, light and dark colors for an accent color.
///
/// Never fails: invalid input yields [`ColorVariations::fallback`].
pub fn generate_color_variations(hex: &str) -> ColorVariations {
    let Some(rgb) = Rgb::parse(hex) else {
        return ColorVariations::fallback();
    };

    let digits = hex.strip_prefix('#').unwrap_or(hex);
    ColorVariations {
        primary: format!("#{}", digits),
        light: rgb.lighten(VARIATION_PERCENT).to_hex(),
        dark: rgb.darken(VARIATION_PERCENT).to_hex(),
    }
}

/// Lighten a hex color. Unparseable input is returned unchanged.
pub fn lighten_hex(hex: &str, percent: u8) -> String {
    Rgb::parse(hex)
        .map(|rgb| rgb.lighten(percent).to_hex())
        .unwrap_or_else(|| hex.to_string())
}

/// Darken a hex color. Unparseable input is returned unchanged.
pub fn darken_hex(hex: &str, percent: u8) -> String {
    Rgb::parse(hex)
        .map(|rgb| rgb.darken(percent).to_hex())
        .unwrap_or_else(|| hex.to_string())
}
