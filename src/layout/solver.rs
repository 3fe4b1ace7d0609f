use crate::{
    foundation::{
        core::{Direction, Point, Rect, Vec2},
        error::{KineError, KineResult},
    },
    scene::{graph::SceneGraph, node::NodeId},
};

/// Default gap used by [`NextTo`] and [`Arrange`].
pub const DEFAULT_BUFFER: f64 = 0.25;
/// Default distance kept from the frame border by [`to_edge`] and [`to_corner`].
pub const DEFAULT_EDGE_BUFFER: f64 = 0.5;

/// Options for [`place_next_to`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NextTo {
    pub direction: Direction,
    pub buffer: f64,
    /// Face aligned with the reference on the orthogonal axis; centered when `None`.
    pub aligned_edge: Option<Direction>,
}

impl Default for NextTo {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            buffer: DEFAULT_BUFFER,
            aligned_edge: None,
        }
    }
}

impl NextTo {
    pub fn new(direction: Direction, buffer: f64) -> Self {
        Self {
            direction,
            buffer,
            aligned_edge: None,
        }
    }

    pub fn aligned(mut self, edge: Direction) -> Self {
        self.aligned_edge = Some(edge);
        self
    }
}

/// Options for [`arrange_in_grid`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    /// Gap between adjacent columns.
    pub h_buffer: f64,
    /// Gap between adjacent rows.
    pub v_buffer: f64,
    #[serde(default = "default_cell_alignment")]
    pub cell_alignment: Direction,
}

fn default_cell_alignment() -> Direction {
    Direction::Center
}

impl Grid {
    pub fn uniform(rows: usize, cols: usize, buffer: f64) -> Self {
        Self {
            rows,
            cols,
            h_buffer: buffer,
            v_buffer: buffer,
            cell_alignment: Direction::Center,
        }
    }

    pub fn cell_alignment(mut self, align: Direction) -> Self {
        self.cell_alignment = align;
        self
    }
}

/// Options for [`arrange`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Arrange {
    pub direction: Direction,
    pub buffer: f64,
    pub aligned_edge: Option<Direction>,
    /// Re-center the arranged nodes on the center of their previous union.
    pub center: bool,
}

impl Default for Arrange {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            buffer: DEFAULT_BUFFER,
            aligned_edge: None,
            center: true,
        }
    }
}

fn positioned(g: &SceneGraph, id: NodeId, role: &str) -> KineResult<Rect> {
    if !g.contains(id) {
        return Err(KineError::layout(format!("{role} {id} does not exist")));
    }
    g.bounds(id)
        .ok_or_else(|| KineError::layout(format!("{role} {id} has never been positioned")))
}

fn check_buffer(buffer: f64) -> KineResult<()> {
    if !buffer.is_finite() {
        return Err(KineError::layout("buffer must be finite"));
    }
    Ok(())
}

/// Bounding-box point selected by the sign of each component of `v`.
fn critical_point(rect: Rect, v: Vec2) -> Point {
    let c = rect.center();
    Point::new(
        c.x + sign(v.x) * rect.width() * 0.5,
        c.y + sign(v.y) * rect.height() * 0.5,
    )
}

fn sign(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v.signum() }
}

/// Place `node` beside `reference` so the facing sides along `direction` are exactly
/// `buffer` apart.
pub fn place_next_to(
    g: &mut SceneGraph,
    node: NodeId,
    reference: NodeId,
    opts: NextTo,
) -> KineResult<()> {
    check_buffer(opts.buffer)?;
    if g.contains(node) && g.contains(reference) && g.is_ancestor_or_self(node, reference) {
        return Err(KineError::layout(format!(
            "{node} cannot be placed next to its own descendant {reference}"
        )));
    }
    let target = positioned(g, reference, "reference")?;
    let mine = positioned(g, node, "node")?;
    let dir = opts.direction.to_vec2();
    let edge = opts.aligned_edge.map(Direction::to_vec2).unwrap_or(Vec2::ZERO);

    let target_point = critical_point(target, edge + dir);
    let own_point = critical_point(mine, edge - dir);
    let delta = target_point - own_point + dir * opts.buffer;
    g.shift(node, delta)
}

/// Match the `direction` face coordinate of `node` to that of `reference`, leaving the
/// orthogonal coordinate untouched.
pub fn align_to(
    g: &mut SceneGraph,
    node: NodeId,
    reference: NodeId,
    direction: Direction,
) -> KineResult<()> {
    let target = positioned(g, reference, "reference")?;
    let mine = positioned(g, node, "node")?;
    let dir = direction.to_vec2();
    let t = critical_point(target, dir);
    let m = critical_point(mine, dir);
    let delta = Vec2::new(
        if dir.x != 0.0 { t.x - m.x } else { 0.0 },
        if dir.y != 0.0 { t.y - m.y } else { 0.0 },
    );
    g.shift(node, delta)
}

/// Lay `nodes` out row-major in a `rows` x `cols` grid centered on their previous union.
///
/// Column widths and row heights are the largest member of each column/row, and adjacent
/// cells are exactly `h_buffer`/`v_buffer` apart. Returns the cell rectangle of each node.
pub fn arrange_in_grid(
    g: &mut SceneGraph,
    nodes: &[NodeId],
    grid: Grid,
) -> KineResult<Vec<Rect>> {
    if grid.rows == 0 || grid.cols == 0 {
        return Err(KineError::layout(
            "grid must have at least one row and one column",
        ));
    }
    let capacity = grid.rows.saturating_mul(grid.cols);
    if capacity < nodes.len() {
        return Err(KineError::layout(format!(
            "grid {}x{} holds {capacity} cells but {} nodes were given",
            grid.rows,
            grid.cols,
            nodes.len()
        )));
    }
    check_buffer(grid.h_buffer)?;
    check_buffer(grid.v_buffer)?;
    reject_overlapping_members(g, nodes)?;

    let mut sizes = Vec::with_capacity(nodes.len());
    let mut union: Option<Rect> = None;
    for &n in nodes {
        let b = positioned(g, n, "grid member")?;
        sizes.push(b);
        union = Some(union.map_or(b, |u| u.union(b)));
    }
    let Some(union) = union else {
        return Ok(Vec::new());
    };

    let mut col_w = vec![0.0f64; grid.cols];
    let mut row_h = vec![0.0f64; grid.rows];
    for (i, b) in sizes.iter().enumerate() {
        let (r, c) = (i / grid.cols, i % grid.cols);
        col_w[c] = col_w[c].max(b.width());
        row_h[r] = row_h[r].max(b.height());
    }
    let total_w = col_w.iter().sum::<f64>() + (grid.cols - 1) as f64 * grid.h_buffer;
    let total_h = row_h.iter().sum::<f64>() + (grid.rows - 1) as f64 * grid.v_buffer;

    let origin = union.center();
    let left = origin.x - total_w * 0.5;
    let top = origin.y + total_h * 0.5;

    let mut col_x = Vec::with_capacity(grid.cols);
    let mut x = left;
    for w in &col_w {
        col_x.push(x);
        x += w + grid.h_buffer;
    }
    let mut row_y = Vec::with_capacity(grid.rows);
    let mut y = top;
    for h in &row_h {
        row_y.push(y);
        y -= h + grid.v_buffer;
    }

    let align = grid.cell_alignment.to_vec2();
    let mut cells = Vec::with_capacity(nodes.len());
    for (i, (&n, b)) in nodes.iter().zip(&sizes).enumerate() {
        let (r, c) = (i / grid.cols, i % grid.cols);
        let cell = Rect::new(col_x[c], row_y[r] - row_h[r], col_x[c] + col_w[c], row_y[r]);
        let delta = critical_point(cell, align) - critical_point(*b, align);
        g.shift(n, delta)?;
        cells.push(cell);
    }
    Ok(cells)
}

/// Chain `nodes` one after another along `direction`, each `buffer` past the previous.
pub fn arrange(g: &mut SceneGraph, nodes: &[NodeId], opts: Arrange) -> KineResult<()> {
    check_buffer(opts.buffer)?;
    reject_overlapping_members(g, nodes)?;
    let mut union: Option<Rect> = None;
    for &n in nodes {
        let b = positioned(g, n, "arranged node")?;
        union = Some(union.map_or(b, |u| u.union(b)));
    }
    let Some(before) = union else {
        return Ok(());
    };

    let step = NextTo {
        direction: opts.direction,
        buffer: opts.buffer,
        aligned_edge: opts.aligned_edge,
    };
    for pair in nodes.windows(2) {
        place_next_to(g, pair[1], pair[0], step)?;
    }

    if opts.center {
        let mut after: Option<Rect> = None;
        for &n in nodes {
            let b = positioned(g, n, "arranged node")?;
            after = Some(after.map_or(b, |u| u.union(b)));
        }
        if let Some(after) = after {
            let delta = before.center() - after.center();
            for &n in nodes {
                g.shift(n, delta)?;
            }
        }
    }
    Ok(())
}

/// Put the `direction` face of `node` `buffer` away from the matching edge of `frame`.
pub fn to_edge(
    g: &mut SceneGraph,
    node: NodeId,
    direction: Direction,
    buffer: f64,
    frame: Rect,
) -> KineResult<()> {
    if !matches!(
        direction,
        Direction::Up | Direction::Down | Direction::Left | Direction::Right
    ) {
        return Err(KineError::layout(format!(
            "to_edge needs a side direction, got {direction:?}"
        )));
    }
    align_on_border(g, node, direction, buffer, frame)
}

/// Diagonal counterpart of [`to_edge`].
pub fn to_corner(
    g: &mut SceneGraph,
    node: NodeId,
    direction: Direction,
    buffer: f64,
    frame: Rect,
) -> KineResult<()> {
    if !matches!(
        direction,
        Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
    ) {
        return Err(KineError::layout(format!(
            "to_corner needs a diagonal direction, got {direction:?}"
        )));
    }
    align_on_border(g, node, direction, buffer, frame)
}

fn align_on_border(
    g: &mut SceneGraph,
    node: NodeId,
    direction: Direction,
    buffer: f64,
    frame: Rect,
) -> KineResult<()> {
    check_buffer(buffer)?;
    let mine = positioned(g, node, "node")?;
    let dir = direction.to_vec2();
    let border = critical_point(frame, dir);
    let own = critical_point(mine, dir);
    let delta = Vec2::new(
        if dir.x != 0.0 { border.x - own.x - dir.x * buffer } else { 0.0 },
        if dir.y != 0.0 { border.y - own.y - dir.y * buffer } else { 0.0 },
    );
    g.shift(node, delta)
}

fn reject_overlapping_members(g: &SceneGraph, nodes: &[NodeId]) -> KineResult<()> {
    for (i, &a) in nodes.iter().enumerate() {
        for &b in &nodes[i + 1..] {
            if g.is_ancestor_or_self(a, b) || g.is_ancestor_or_self(b, a) {
                return Err(KineError::layout(format!(
                    "{a} and {b} overlap in the hierarchy and cannot be laid out independently"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
