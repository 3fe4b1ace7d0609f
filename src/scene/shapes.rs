//! Constructors for the primitive node kinds.
//!
//! Each constructor takes an explicit [`StyleConfig`]; options left unset fall back to the
//! documented defaults of the shape family, never to ambient state. Sizes are validated here
//! so a malformed node never reaches the graph.

use std::path::Path;

use crate::{
    foundation::{
        core::{Direction, Point, Rect, Rgba, Vec2},
        error::{KineError, KineResult},
    },
    layout::solver::{Grid, arrange_in_grid},
    scene::{
        graph::SceneGraph,
        node::{NodeId, SceneNode, Shape, Style, StyleConfig},
    },
};

/// Default arrow tip length in scene units.
pub const DEFAULT_TIP_LENGTH: f64 = 0.25;
/// Default dot radius in scene units.
pub const DEFAULT_DOT_RADIUS: f64 = 0.08;

fn check_size(name: &str, v: f64) -> KineResult<()> {
    if !(v.is_finite() && v >= 0.0) {
        return Err(KineError::validation(format!(
            "{name} must be finite and >= 0, got {v}"
        )));
    }
    Ok(())
}

fn check_point(name: &str, p: Point) -> KineResult<()> {
    if !(p.x.is_finite() && p.y.is_finite()) {
        return Err(KineError::validation(format!("{name} must be finite")));
    }
    Ok(())
}

pub fn rectangle(width: f64, height: f64, style: StyleConfig) -> KineResult<SceneNode> {
    check_size("width", width)?;
    check_size("height", height)?;
    Ok(SceneNode::new(
        Shape::Rect { width, height },
        style.resolve(Style::SHAPE)?,
    ))
}

pub fn square(side: f64, style: StyleConfig) -> KineResult<SceneNode> {
    rectangle(side, side, style)
}

pub fn circle(radius: f64, style: StyleConfig) -> KineResult<SceneNode> {
    check_size("radius", radius)?;
    Ok(SceneNode::new(
        Shape::Circle { radius },
        style.resolve(Style::SHAPE)?,
    ))
}

/// Small filled circle; fill defaults to the stroke color at full opacity.
pub fn dot(radius: f64, style: StyleConfig) -> KineResult<SceneNode> {
    let color = style.fill_color.or(style.stroke_color).unwrap_or(Rgba::WHITE);
    let style = StyleConfig {
        fill_color: Some(color),
        fill_opacity: style.fill_opacity.or(Some(1.0)),
        stroke_width: style.stroke_width.or(Some(0.0)),
        ..style
    };
    circle(radius, style)
}

/// Straight segment; the node center is the segment midpoint.
pub fn line(start: Point, end: Point, style: StyleConfig) -> KineResult<SceneNode> {
    check_point("line start", start)?;
    check_point("line end", end)?;
    let mid = start.midpoint(end);
    Ok(SceneNode::new(
        Shape::Line {
            start: start - mid,
            end: end - mid,
        },
        style.resolve(Style::SHAPE)?,
    )
    .at(mid))
}

pub fn arrow(
    start: Point,
    end: Point,
    tip_length: f64,
    style: StyleConfig,
) -> KineResult<SceneNode> {
    check_point("arrow start", start)?;
    check_point("arrow end", end)?;
    check_size("tip_length", tip_length)?;
    let mid = start.midpoint(end);
    Ok(SceneNode::new(
        Shape::Arrow {
            start: start - mid,
            end: end - mid,
            tip_length,
        },
        style.resolve(Style::SHAPE)?,
    )
    .at(mid))
}

/// Text layout options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Line height in scene units.
    pub font_size: f64,
    /// Baseline distance as a multiple of `font_size`.
    pub line_spacing: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 0.5,
            line_spacing: 1.2,
        }
    }
}

pub fn text(
    content: impl Into<String>,
    cfg: TextConfig,
    style: StyleConfig,
) -> KineResult<SceneNode> {
    let content = content.into();
    check_size("font_size", cfg.font_size)?;
    check_size("line_spacing", cfg.line_spacing)?;
    Ok(SceneNode::new(
        Shape::Text {
            content,
            font_size: cfg.font_size,
            line_spacing: cfg.line_spacing,
        },
        style.resolve(Style::TEXT)?,
    ))
}

/// Image placeholder sized from the file header. `height` is in scene units and the width
/// follows the pixel aspect ratio. Relative sources resolve against `base_dir`.
pub fn image(source: &str, height: f64, base_dir: &Path) -> KineResult<SceneNode> {
    check_size("height", height)?;
    let path = base_dir.join(source);
    let (pw, ph) = ::image::image_dimensions(&path)
        .map_err(|e| KineError::resource(format!("image '{}': {e}", path.display())))?;
    if pw == 0 || ph == 0 {
        return Err(KineError::resource(format!(
            "image '{}' has zero size",
            path.display()
        )));
    }
    let width = height * f64::from(pw) / f64::from(ph);
    Ok(SceneNode::new(
        Shape::Image {
            source: source.to_string(),
            width,
            height,
        },
        Style::NONE,
    ))
}

/// Point at fraction `p` (clamped to [0, 1]) along a line or arrow, in absolute coordinates.
pub fn point_from_proportion(node: &SceneNode, p: f64) -> KineResult<Point> {
    let p = p.clamp(0.0, 1.0);
    match node.shape() {
        Shape::Line { start, end } | Shape::Arrow { start, end, .. } => {
            let local = *start + (*end - *start) * p;
            Ok(node.center() + local)
        }
        other => Err(KineError::validation(format!(
            "point_from_proportion needs a line or arrow, got {}",
            other.kind_name()
        ))),
    }
}

/// Options for [`table`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Horizontal gap between cell contents.
    pub h_buff: f64,
    /// Vertical gap between cell contents.
    pub v_buff: f64,
    pub include_outer_lines: bool,
    pub cell_alignment: Direction,
    pub text: TextConfig,
    pub line_style: StyleConfig,
    pub text_style: StyleConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            h_buff: 1.3,
            v_buff: 0.8,
            include_outer_lines: false,
            cell_alignment: Direction::Center,
            text: TextConfig::default(),
            line_style: StyleConfig::default(),
            text_style: StyleConfig::default(),
        }
    }
}

/// Build a table of text cells with rules between rows and columns.
///
/// Returns a group holding the cells group followed by the rule lines. Rows shorter than the
/// widest row are padded with empty cells.
pub fn table(g: &mut SceneGraph, rows: &[Vec<String>], cfg: &TableConfig) -> KineResult<NodeId> {
    let n_rows = rows.len();
    let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return Err(KineError::validation(
            "table needs at least one non-empty row",
        ));
    }
    check_size("h_buff", cfg.h_buff)?;
    check_size("v_buff", cfg.v_buff)?;

    let mut cells = Vec::with_capacity(n_rows * n_cols);
    for row in rows {
        for c in 0..n_cols {
            let content = row.get(c).map(String::as_str).unwrap_or("");
            cells.push(g.insert(text(content, cfg.text, cfg.text_style)?));
        }
    }
    let rects = arrange_in_grid(
        g,
        &cells,
        Grid {
            rows: n_rows,
            cols: n_cols,
            h_buffer: cfg.h_buff,
            v_buffer: cfg.v_buff,
            cell_alignment: cfg.cell_alignment,
        },
    )?;
    let cell_group = g.group(&cells)?;

    let outer = rects
        .iter()
        .copied()
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
        .inflate(cfg.h_buff * 0.5, cfg.v_buff * 0.5);

    let mut rules = Vec::new();
    for c in 1..n_cols {
        let x = (rects[c - 1].x1 + rects[c].x0) * 0.5;
        rules.push((Point::new(x, outer.y0), Point::new(x, outer.y1)));
    }
    for r in 1..n_rows {
        let y = (rects[(r - 1) * n_cols].y0 + rects[r * n_cols].y1) * 0.5;
        rules.push((Point::new(outer.x0, y), Point::new(outer.x1, y)));
    }
    if cfg.include_outer_lines {
        let (tl, tr) = (Point::new(outer.x0, outer.y1), Point::new(outer.x1, outer.y1));
        let (bl, br) = (Point::new(outer.x0, outer.y0), Point::new(outer.x1, outer.y0));
        rules.extend([(tl, tr), (tr, br), (br, bl), (bl, tl)]);
    }

    let mut members = vec![cell_group];
    for (a, b) in rules {
        members.push(g.insert(line(a, b, cfg.line_style)?));
    }
    g.group(&members)
}

/// Horizontal bar with evenly placed tick marks, as used for time axes.
pub fn tick_bar(
    g: &mut SceneGraph,
    length: f64,
    proportions: &[f64],
    tick_height: f64,
    style: StyleConfig,
) -> KineResult<NodeId> {
    check_size("length", length)?;
    check_size("tick_height", tick_height)?;
    let half = length * 0.5;
    let bar = line(Point::new(-half, 0.0), Point::new(half, 0.0), style)?;
    let mut ticks = Vec::with_capacity(proportions.len());
    for &p in proportions {
        let at = point_from_proportion(&bar, p)?;
        let off = Vec2::new(0.0, tick_height * 0.5);
        ticks.push(g.insert(line(at + off, at - off, style)?));
    }
    let bar = g.insert(bar);
    let tick_group = g.group(&ticks)?;
    g.group(&[bar, tick_group])
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shapes.rs"]
mod tests;
