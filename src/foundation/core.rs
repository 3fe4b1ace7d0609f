use crate::foundation::error::{KineError, KineResult};

pub use kurbo::{Point, Rect, Vec2};

/// Global frame counter. Frame `n` is taken at simulated time `n / fps`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Tick rate as a rational number of frames per simulated second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> KineResult<Self> {
        if den == 0 {
            return Err(KineError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(KineError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of ticks covering `secs`, rounded to the nearest frame so that
    /// sums like `0.1 + 0.2` do not gain a spurious extra tick.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Straight-alpha RGBA8 color. Serialized as `#rrggbb` / `#rrggbbaa`; named colors are
/// accepted on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const GREY: Self = Self::rgb(0x88, 0x88, 0x88);
    pub const BLUE: Self = Self::rgb(0x58, 0xc4, 0xdd);
    pub const ORANGE: Self = Self::rgb(0xff, 0x86, 0x2f);
    pub const YELLOW: Self = Self::rgb(0xff, 0xff, 0x00);
    pub const GREEN: Self = Self::rgb(0x83, 0xc1, 0x67);
    pub const RED: Self = Self::rgb(0xfc, 0x62, 0x55);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn named(name: &str) -> Option<Self> {
        let c = match name.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "grey" | "gray" => Self::GREY,
            "blue" => Self::BLUE,
            "orange" => Self::ORANGE,
            "yellow" => Self::YELLOW,
            "green" => Self::GREEN,
            "red" => Self::RED,
            _ => return None,
        };
        Some(c)
    }

    pub fn parse(s: &str) -> KineResult<Self> {
        let s = s.trim();
        if let Some(c) = Self::named(s) {
            return Ok(c);
        }
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| KineError::validation(format!("unknown color '{s}'")))?;
        let byte = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| KineError::validation(format!("malformed hex color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(KineError::validation(format!(
                "hex color '{s}' must have 6 or 8 digits"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Rgba {
    type Error = KineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgba::parse(&s)
    }
}

/// Anchor directions on a bounding box. `y` grows upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Center,
}

impl Direction {
    /// Components in `{-1, 0, 1}` per axis.
    pub fn to_vec2(self) -> Vec2 {
        let (x, y) = match self {
            Self::Up => (0.0, 1.0),
            Self::Down => (0.0, -1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::UpLeft => (-1.0, 1.0),
            Self::UpRight => (1.0, 1.0),
            Self::DownLeft => (-1.0, -1.0),
            Self::DownRight => (1.0, -1.0),
            Self::Center => (0.0, 0.0),
        };
        Vec2::new(x, y)
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::UpLeft => Self::DownRight,
            Self::UpRight => Self::DownLeft,
            Self::DownLeft => Self::UpRight,
            Self::DownRight => Self::UpLeft,
            Self::Center => Self::Center,
        }
    }
}

/// Point of `rect` selected by `dir`: face midpoints for the four sides, corners for the
/// diagonals, the center for [`Direction::Center`].
pub fn rect_anchor(rect: Rect, dir: Direction) -> Point {
    let v = dir.to_vec2();
    let c = rect.center();
    Point::new(
        c.x + v.x * rect.width() * 0.5,
        c.y + v.y * rect.height() * 0.5,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
