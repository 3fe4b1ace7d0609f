//! Render and logging configuration.

use crate::foundation::{
    core::{Fps, Rect},
    error::{KineError, KineResult},
};

/// Height of the visible frame in scene units. The width follows the pixel aspect ratio.
pub const DEFAULT_FRAME_HEIGHT: f64 = 8.0;

/// Output quality tiers: resolution and default tick rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// 854x480 at 15 fps.
    Low,
    /// 1280x720 at 30 fps.
    Medium,
    /// 1920x1080 at 60 fps.
    #[default]
    High,
    /// 2560x1440 at 60 fps.
    Production,
    /// 3840x2160 at 60 fps.
    FourK,
}

impl Quality {
    pub fn resolution(self) -> (u32, u32) {
        match self {
            Self::Low => (854, 480),
            Self::Medium => (1280, 720),
            Self::High => (1920, 1080),
            Self::Production => (2560, 1440),
            Self::FourK => (3840, 2160),
        }
    }

    pub fn default_fps(self) -> u32 {
        match self {
            Self::Low => 15,
            Self::Medium => 30,
            Self::High | Self::Production | Self::FourK => 60,
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = KineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(Self::Low),
            "medium" | "m" => Ok(Self::Medium),
            "high" | "h" => Ok(Self::High),
            "production" | "p" => Ok(Self::Production),
            "four_k" | "4k" | "k" => Ok(Self::FourK),
            other => Err(KineError::validation(format!("unknown quality '{other}'"))),
        }
    }
}

/// Everything the player needs besides the scene itself.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub quality: Quality,
    /// Overrides the quality tier's tick rate.
    pub fps: Option<u32>,
    /// Seconds of unchanged frames appended when the scene finishes.
    pub final_hold_secs: f64,
    pub frame_height: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            fps: None,
            final_hold_secs: 0.0,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> KineResult<()> {
        if self.fps == Some(0) {
            return Err(KineError::validation("fps must be > 0"));
        }
        if !(self.final_hold_secs.is_finite() && self.final_hold_secs >= 0.0) {
            return Err(KineError::validation(
                "final_hold_secs must be finite and >= 0",
            ));
        }
        if !(self.frame_height.is_finite() && self.frame_height > 0.0) {
            return Err(KineError::validation("frame_height must be finite and > 0"));
        }
        Ok(())
    }

    pub fn fps(&self) -> KineResult<Fps> {
        Fps::new(self.fps.unwrap_or_else(|| self.quality.default_fps()), 1)
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.quality.resolution()
    }

    /// Visible region in scene units, centered on the origin.
    pub fn frame_rect(&self) -> Rect {
        let (w, h) = self.resolution();
        let half_h = self.frame_height * 0.5;
        let half_w = half_h * f64::from(w) / f64::from(h);
        Rect::new(-half_w, -half_h, half_w, half_h)
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "kinegram=debug").
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
