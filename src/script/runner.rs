use std::path::Path;

use crate::{
    animation::directive::Directive,
    config::RenderConfig,
    encode::sink::FrameSink,
    foundation::{
        core::{Point, Rect, Vec2},
        error::{KineError, KineResult},
    },
    layout::solver::{
        DEFAULT_BUFFER, DEFAULT_EDGE_BUFFER, Grid, NextTo, align_to, arrange, arrange_in_grid,
        place_next_to, to_corner, to_edge,
    },
    scene::{graph::SceneGraph, node::NodeId, shapes},
    script::model::{LayoutStep, NodeDef, PositionDef, SceneScript, ShapeDef, StepDef},
    session::scene::{PlayReport, Scene},
};

fn point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

/// Build every node of `script` into the scene graph, then run its layout steps.
pub fn build_scene<S: FrameSink>(
    script: &SceneScript,
    base_dir: &Path,
    scene: &mut Scene<S>,
) -> KineResult<()> {
    for def in &script.nodes {
        build_node(scene.graph_mut(), def, base_dir)?;
    }
    let frame = scene.frame_rect();
    for (i, step) in script.layout.iter().enumerate() {
        run_layout_step(scene.graph_mut(), step, frame).map_err(|e| match e {
            KineError::Layout(msg) => KineError::layout(format!("layout step {i}: {msg}")),
            other => other,
        })?;
    }
    tracing::debug!(
        nodes = script.nodes.len(),
        layout_steps = script.layout.len(),
        "scene built"
    );
    Ok(())
}

fn build_node(g: &mut SceneGraph, def: &NodeDef, base_dir: &Path) -> KineResult<NodeId> {
    let style = def.style;
    let node = match &def.shape {
        ShapeDef::Square { side } => shapes::square(*side, style)?,
        ShapeDef::Rectangle { width, height } => shapes::rectangle(*width, *height, style)?,
        ShapeDef::Circle { radius } => shapes::circle(*radius, style)?,
        ShapeDef::Dot { radius } => {
            shapes::dot(radius.unwrap_or(shapes::DEFAULT_DOT_RADIUS), style)?
        }
        ShapeDef::Line { start, end } => shapes::line(point(*start), point(*end), style)?,
        ShapeDef::Arrow {
            start,
            end,
            tip_length,
        } => shapes::arrow(
            point(*start),
            point(*end),
            tip_length.unwrap_or(shapes::DEFAULT_TIP_LENGTH),
            style,
        )?,
        ShapeDef::Text { content, text } => shapes::text(content.as_str(), *text, style)?,
        ShapeDef::Image { source, height } => shapes::image(source, *height, base_dir)?,
        ShapeDef::Table { rows, table } => {
            let id = shapes::table(g, rows, table)?;
            return finish_composite(g, def, id);
        }
        ShapeDef::TickBar {
            length,
            proportions,
            tick_height,
        } => {
            let id = shapes::tick_bar(g, *length, proportions, *tick_height, style)?;
            return finish_composite(g, def, id);
        }
        ShapeDef::Group { children } => {
            let mut ids = Vec::with_capacity(children.len());
            for c in children {
                ids.push(g.id_for_name(c).ok_or_else(|| {
                    KineError::validation(format!(
                        "group '{}' refers to unknown node '{c}'",
                        def.name
                    ))
                })?);
            }
            let id = g.group_named(def.name.as_str(), &ids)?;
            return place(g, def, id);
        }
    };
    let id = g.insert_named(def.name.as_str(), node)?;
    place(g, def, id)
}

/// Composite builders return an anonymous group; wrap it under the declared name.
fn finish_composite(g: &mut SceneGraph, def: &NodeDef, inner: NodeId) -> KineResult<NodeId> {
    let id = g.group_named(def.name.as_str(), &[inner])?;
    place(g, def, id)
}

fn place(g: &mut SceneGraph, def: &NodeDef, id: NodeId) -> KineResult<NodeId> {
    if let Some(k) = def.scale {
        g.scale(id, k)?;
    }
    if let Some(at) = def.at {
        g.move_to(id, point(at))?;
    }
    Ok(id)
}

fn lookup_layout(g: &SceneGraph, name: &str) -> KineResult<NodeId> {
    g.id_for_name(name)
        .ok_or_else(|| KineError::layout(format!("unknown node '{name}'")))
}

fn resolve_layout(g: &SceneGraph, p: &PositionDef) -> KineResult<Point> {
    match p {
        PositionDef::Coord(c) => Ok(point(*c)),
        PositionDef::Anchor { node, anchor } => {
            let id = lookup_layout(g, node)?;
            if g.bounds(id).is_none() {
                return Err(KineError::layout(format!("'{node}' has never been positioned")));
            }
            Ok(g.anchor_point(id, *anchor))
        }
    }
}

fn run_layout_step(g: &mut SceneGraph, step: &LayoutStep, frame: Rect) -> KineResult<()> {
    match step {
        LayoutStep::NextTo {
            node,
            reference,
            direction,
            buffer,
            aligned_edge,
        } => {
            let (n, r) = (lookup_layout(g, node)?, lookup_layout(g, reference)?);
            let opts = NextTo {
                direction: *direction,
                buffer: buffer.unwrap_or(DEFAULT_BUFFER),
                aligned_edge: *aligned_edge,
            };
            place_next_to(g, n, r, opts)
        }
        LayoutStep::AlignTo {
            node,
            reference,
            direction,
        } => {
            let (n, r) = (lookup_layout(g, node)?, lookup_layout(g, reference)?);
            align_to(g, n, r, *direction)
        }
        LayoutStep::Grid {
            nodes,
            rows,
            cols,
            buffer,
            cell_alignment,
        } => {
            let ids = nodes
                .iter()
                .map(|n| lookup_layout(g, n))
                .collect::<KineResult<Vec<_>>>()?;
            let mut grid = Grid::uniform(*rows, *cols, buffer.unwrap_or(DEFAULT_BUFFER));
            if let Some(a) = cell_alignment {
                grid = grid.cell_alignment(*a);
            }
            arrange_in_grid(g, &ids, grid).map(|_| ())
        }
        LayoutStep::Arrange { nodes, options } => {
            let ids = nodes
                .iter()
                .map(|n| lookup_layout(g, n))
                .collect::<KineResult<Vec<_>>>()?;
            arrange(g, &ids, *options)
        }
        LayoutStep::ToEdge {
            node,
            direction,
            buffer,
        } => {
            let n = lookup_layout(g, node)?;
            to_edge(g, n, *direction, buffer.unwrap_or(DEFAULT_EDGE_BUFFER), frame)
        }
        LayoutStep::ToCorner {
            node,
            direction,
            buffer,
        } => {
            let n = lookup_layout(g, node)?;
            to_corner(g, n, *direction, buffer.unwrap_or(DEFAULT_EDGE_BUFFER), frame)
        }
        LayoutStep::MoveTo { node, to } => {
            let n = lookup_layout(g, node)?;
            let p = resolve_layout(g, to)?;
            if g.bounds(n).is_none() {
                return Err(KineError::layout(format!("'{node}' has no bounds to move")));
            }
            g.move_to(n, p)
        }
        LayoutStep::Connect { node, from, to } => {
            let n = lookup_layout(g, node)?;
            let (a, b) = (resolve_layout(g, from)?, resolve_layout(g, to)?);
            g.put_start_and_end_on(n, a, b)
                .map_err(|e| KineError::layout(format!("connect '{node}': {e}")))
        }
        LayoutStep::Shift { node, by } => {
            let n = lookup_layout(g, node)?;
            g.shift(n, Vec2::new(by[0], by[1]))
        }
        LayoutStep::Scale { node, factor } => {
            let n = lookup_layout(g, node)?;
            g.scale(n, *factor)
        }
    }
}

fn lookup_target(g: &SceneGraph, name: &str) -> KineResult<NodeId> {
    g.id_for_name(name)
        .ok_or_else(|| KineError::directive(format!("unknown target '{name}'")))
}

fn resolve_target_point(g: &SceneGraph, p: &PositionDef) -> KineResult<Point> {
    match p {
        PositionDef::Coord(c) => Ok(point(*c)),
        PositionDef::Anchor { node, anchor } => {
            let id = lookup_target(g, node)?;
            if g.bounds(id).is_none() {
                return Err(KineError::directive(format!("'{node}' has no bounds")));
            }
            Ok(g.anchor_point(id, *anchor))
        }
    }
}

/// Resolve names and positions of `step` against the current graph.
pub fn to_directive(g: &SceneGraph, step: &StepDef) -> KineResult<Directive> {
    match step {
        StepDef::Appear {
            target,
            run_time,
            mode,
            ease,
        } => {
            let d = Directive::appear(lookup_target(g, target)?, *run_time, *mode)?;
            Ok(match ease {
                Some(e) => d.with_ease(*e),
                None => d,
            })
        }
        StepDef::Disappear {
            target,
            run_time,
            mode,
            ease,
        } => {
            let d = Directive::disappear(lookup_target(g, target)?, *run_time)?.with_mode(*mode);
            Ok(match ease {
                Some(e) => d.with_ease(*e),
                None => d,
            })
        }
        StepDef::Move {
            target,
            from,
            to,
            run_time,
            ease,
        } => {
            let id = lookup_target(g, target)?;
            let to = resolve_target_point(g, to)?;
            let d = match from {
                Some(p) => Directive::moving(id, resolve_target_point(g, p)?, to, *run_time)?,
                None => Directive::move_to(id, to, *run_time)?,
            };
            Ok(match ease {
                Some(e) => d.with_ease(*e),
                None => d,
            })
        }
        StepDef::Tween {
            target,
            tween,
            run_time,
            ease,
        } => {
            let d = Directive::tween(lookup_target(g, target)?, *tween, *run_time)?;
            Ok(match ease {
                Some(e) => d.with_ease(*e),
                None => d,
            })
        }
        StepDef::Wait { run_time } => Directive::wait(*run_time),
        StepDef::Sequential { steps } => Directive::sequential(
            steps
                .iter()
                .map(|s| to_directive(g, s))
                .collect::<KineResult<_>>()?,
        ),
        StepDef::Parallel { steps, lag_ratio } => Directive::parallel(
            steps
                .iter()
                .map(|s| to_directive(g, s))
                .collect::<KineResult<_>>()?,
            *lag_ratio,
        ),
        StepDef::Stretch { step, run_time } => {
            Directive::stretch(to_directive(g, step)?, *run_time)
        }
    }
}

/// Build, lay out and play `script` into `sink`, then finish the scene.
///
/// `config` wins over the script's own `config` section when given. Relative image sources
/// resolve against `base_dir`.
pub fn run_script<S: FrameSink>(
    script: &SceneScript,
    base_dir: &Path,
    config: Option<RenderConfig>,
    sink: S,
) -> KineResult<(S, Vec<PlayReport>)> {
    let cfg = config.or(script.config).unwrap_or_default();
    let mut scene = Scene::new(cfg, sink)?;
    build_scene(script, base_dir, &mut scene)?;

    let mut reports = Vec::with_capacity(script.timeline.len());
    for (i, step) in script.timeline.iter().enumerate() {
        let directive = to_directive(scene.graph(), step).map_err(|e| match e {
            KineError::InvalidDirective(msg) => {
                KineError::directive(format!("timeline step {i}: {msg}"))
            }
            other => other,
        })?;
        reports.push(scene.play(&directive)?);
    }
    Ok((scene.finish()?, reports))
}

#[cfg(test)]
#[path = "../../tests/unit/script/runner.rs"]
mod tests;
