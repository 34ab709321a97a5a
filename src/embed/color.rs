use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An embed sidebar color.
///
/// Discord expects a single packed `0xRRGGBB` integer on the wire, so every
/// input form (channels, hex string, packed integer) ends up here and is
/// serialized through [`Color::to_discord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(237, 66, 69);
    pub const GREEN: Self = Self::new(87, 242, 135);
    pub const BLUE: Self = Self::new(52, 152, 219);
    pub const YELLOW: Self = Self::new(254, 231, 92);
    pub const ORANGE: Self = Self::new(230, 126, 34);
    pub const PURPLE: Self = Self::new(155, 89, 182);
    pub const FUCHSIA: Self = Self::new(235, 69, 158);
    pub const BLURPLE: Self = Self::new(88, 101, 242);
    pub const GREYPLE: Self = Self::new(153, 170, 181);
    pub const DARK_BUT_NOT_BLACK: Self = Self::new(44, 47, 51);
    pub const NOT_QUITE_BLACK: Self = Self::new(35, 39, 42);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Splits a packed integer into its channels. Bits above the low 24 are dropped.
    #[must_use]
    pub const fn from_packed(value: u32) -> Self {
        let [_, r, g, b] = value.to_be_bytes();
        Self::new(r, g, b)
    }

    /// Parses `RRGGBB` or the short `RGB` form, with an optional leading `#`.
    ///
    /// Digits are case-insensitive. Any other length, or a character that is not
    /// a hex digit, gives [`Color::BLACK`] instead of an error.
    /// Only a single leading `#` is stripped: `"##F00"` is black, not red, unlike
    /// parsers that drop every `#` in the string.
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits: Option<Vec<u8>> = hex.chars().map(hex_digit).collect();
        match digits.as_deref() {
            Some(&[r, g, b]) => Self::new(r * 17, g * 17, b * 17),
            Some(&[r1, r2, g1, g2, b1, b2]) => {
                Self::new((r1 << 4) | r2, (g1 << 4) | g2, (b1 << 4) | b2)
            }
            _ => Self::BLACK,
        }
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }

    #[must_use]
    pub const fn to_discord(self) -> u32 {
        let r = self.r as u32;
        let g = self.g as u32;
        let b = self.b as u32;
        (r << 16) | (g << 8) | b
    }
}

#[allow(clippy::cast_possible_truncation)]
fn hex_digit(c: char) -> Option<u8> {
    // `to_digit(16)` is always below 16
    c.to_digit(16).map(|d| d as u8)
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_packed(value)
    }
}

impl From<&str> for Color {
    fn from(hex: &str) -> Self {
        Self::from_hex(hex)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_discord()
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_discord())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_packed)
    }
}
