use std::cell::Cell;

use crate::foundation::{
    core::{Point, Rect, Rgba, Vec2},
    error::{KineError, KineResult},
};

/// Non-owning handle into a [`SceneGraph`](crate::SceneGraph) arena.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Horizontal advance of one text glyph, as a fraction of the font size.
pub const TEXT_ADVANCE: f64 = 0.6;

/// Own geometry of a node, in coordinates relative to the node's center.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// No own geometry; bounds come from children only.
    Group,
    Rect {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Line {
        start: Vec2,
        end: Vec2,
    },
    Arrow {
        start: Vec2,
        end: Vec2,
        tip_length: f64,
    },
    /// Glyph shaping belongs to the rasterizer; layout uses a fixed-advance estimate.
    Text {
        content: String,
        font_size: f64,
        line_spacing: f64,
    },
    Image {
        source: String,
        width: f64,
        height: f64,
    },
}

impl Shape {
    pub fn local_bounds(&self) -> Option<Rect> {
        match self {
            Self::Group => None,
            Self::Rect { width, height } => Some(Rect::new(
                -width * 0.5,
                -height * 0.5,
                width * 0.5,
                height * 0.5,
            )),
            Self::Circle { radius } => Some(Rect::new(-radius, -radius, *radius, *radius)),
            Self::Line { start, end } => Some(Rect::from_points(start.to_point(), end.to_point())),
            Self::Arrow {
                start,
                end,
                tip_length,
            } => {
                let line = Rect::from_points(start.to_point(), end.to_point());
                let along = *end - *start;
                let len = along.hypot();
                if len == 0.0 || *tip_length == 0.0 {
                    return Some(line);
                }
                let dir = along / len;
                let normal = Vec2::new(-dir.y, dir.x);
                let base = *end - dir * tip_length.min(len);
                let half = tip_length * 0.5;
                let tip = Rect::from_points(
                    (base + normal * half).to_point(),
                    (base - normal * half).to_point(),
                );
                Some(line.union(tip))
            }
            Self::Text {
                content,
                font_size,
                line_spacing,
            } => {
                let (w, h) = text_extent(content, *font_size, *line_spacing);
                Some(Rect::new(-w * 0.5, -h * 0.5, w * 0.5, h * 0.5))
            }
            Self::Image { width, height, .. } => Some(Rect::new(
                -width * 0.5,
                -height * 0.5,
                width * 0.5,
                height * 0.5,
            )),
        }
    }

    /// Same shape uniformly scaled by `k` about the node center.
    pub fn scaled(&self, k: f64) -> Self {
        match self {
            Self::Group => Self::Group,
            Self::Rect { width, height } => Self::Rect {
                width: width * k,
                height: height * k,
            },
            Self::Circle { radius } => Self::Circle { radius: radius * k },
            Self::Line { start, end } => Self::Line {
                start: *start * k,
                end: *end * k,
            },
            Self::Arrow {
                start,
                end,
                tip_length,
            } => Self::Arrow {
                start: *start * k,
                end: *end * k,
                tip_length: tip_length * k,
            },
            Self::Text {
                content,
                font_size,
                line_spacing,
            } => Self::Text {
                content: content.clone(),
                font_size: font_size * k,
                line_spacing: *line_spacing,
            },
            Self::Image {
                source,
                width,
                height,
            } => Self::Image {
                source: source.clone(),
                width: width * k,
                height: height * k,
            },
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Line { .. } => "line",
            Self::Arrow { .. } => "arrow",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }
}

pub(crate) fn text_extent(content: &str, font_size: f64, line_spacing: f64) -> (f64, f64) {
    let mut lines = 0usize;
    let mut widest = 0usize;
    for line in content.split('\n') {
        lines += 1;
        widest = widest.max(line.chars().count());
    }
    let w = widest as f64 * TEXT_ADVANCE * font_size;
    let h = font_size * (1.0 + (lines.saturating_sub(1) as f64) * line_spacing);
    (w, h)
}

/// Resolved drawing style of one node.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub stroke_color: Rgba,
    pub stroke_width: f64, // px at the output resolution
    pub stroke_opacity: f64,
    pub fill_color: Rgba,
    pub fill_opacity: f64,
}

impl Style {
    /// Defaults for outlined shapes: white 4px stroke, no fill.
    pub const SHAPE: Self = Self {
        stroke_color: Rgba::WHITE,
        stroke_width: 4.0,
        stroke_opacity: 1.0,
        fill_color: Rgba::TRANSPARENT,
        fill_opacity: 0.0,
    };

    /// Defaults for text: solid white fill, no stroke.
    pub const TEXT: Self = Self {
        stroke_color: Rgba::WHITE,
        stroke_width: 0.0,
        stroke_opacity: 1.0,
        fill_color: Rgba::WHITE,
        fill_opacity: 1.0,
    };

    /// Groups carry no paint of their own.
    pub const NONE: Self = Self {
        stroke_color: Rgba::TRANSPARENT,
        stroke_width: 0.0,
        stroke_opacity: 0.0,
        fill_color: Rgba::TRANSPARENT,
        fill_opacity: 0.0,
    };
}

/// Every recognized style option for a construction call. Unset fields take the defaults
/// of the shape family being built ([`Style::SHAPE`] or [`Style::TEXT`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub stroke_color: Option<Rgba>,
    pub stroke_width: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub fill_color: Option<Rgba>,
    pub fill_opacity: Option<f64>,
}

impl StyleConfig {
    pub fn stroke(mut self, color: Rgba, width: f64) -> Self {
        self.stroke_color = Some(color);
        self.stroke_width = Some(width);
        self
    }

    pub fn fill(mut self, color: Rgba, opacity: f64) -> Self {
        self.fill_color = Some(color);
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn resolve(self, defaults: Style) -> KineResult<Style> {
        let style = Style {
            stroke_color: self.stroke_color.unwrap_or(defaults.stroke_color),
            stroke_width: self.stroke_width.unwrap_or(defaults.stroke_width),
            stroke_opacity: self.stroke_opacity.unwrap_or(defaults.stroke_opacity),
            fill_color: self.fill_color.unwrap_or(defaults.fill_color),
            fill_opacity: self.fill_opacity.unwrap_or(defaults.fill_opacity),
        };
        if !(style.stroke_width.is_finite() && style.stroke_width >= 0.0) {
            return Err(KineError::validation("stroke_width must be finite and >= 0"));
        }
        for (name, v) in [
            ("stroke_opacity", style.stroke_opacity),
            ("fill_opacity", style.fill_opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(KineError::validation(format!("{name} must be in [0, 1]")));
            }
        }
        Ok(style)
    }
}

/// How a node's `emphasis` is meant to be drawn by the rasterizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Emphasis scales opacity.
    #[default]
    Fade,
    /// Emphasis is the drawn fraction of the outline, fill follows.
    Create,
    /// Like `Create`, stroking glyph outlines first.
    Write,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum BoundsCache {
    Stale,
    Fresh(Option<Rect>),
}

/// One positioned, styled element of the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub(crate) name: Option<String>,
    pub(crate) center: Point,
    pub(crate) shape: Shape,
    pub(crate) style: Style,
    pub(crate) emphasis: f64,
    pub(crate) reveal: RevealMode,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) bounds_cache: Cell<BoundsCache>,
}

impl SceneNode {
    /// A detached node centered on the origin, fully emphasized.
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            name: None,
            center: Point::ORIGIN,
            shape,
            style,
            emphasis: 1.0,
            reveal: RevealMode::Fade,
            parent: None,
            children: Vec::new(),
            bounds_cache: Cell::new(BoundsCache::Stale),
        }
    }

    pub fn at(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn emphasis(&self) -> f64 {
        self.emphasis
    }

    pub fn reveal(&self) -> RevealMode {
        self.reveal
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Own geometry in absolute coordinates.
    pub fn own_bounds(&self) -> Option<Rect> {
        self.shape
            .local_bounds()
            .map(|r| r + self.center.to_vec2())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
