//! JSON scene scripts.
//!
//! A script declares named nodes, a list of layout steps run once in order, and a timeline
//! whose top-level steps are played one after another. Nodes are referred to by name
//! everywhere; names resolve to ids when the script runs.

use std::path::Path;

use crate::{
    animation::{directive::Tween, ease::Ease},
    config::RenderConfig,
    foundation::{
        core::Direction,
        error::{KineError, KineResult},
    },
    layout::solver::Arrange,
    scene::{
        node::{RevealMode, StyleConfig},
        shapes::{TableConfig, TextConfig},
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneScript {
    #[serde(default)]
    pub config: Option<RenderConfig>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub layout: Vec<LayoutStep>,
    #[serde(default)]
    pub timeline: Vec<StepDef>,
}

impl SceneScript {
    pub fn from_json_str(s: &str) -> KineResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_path(path: &Path) -> KineResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| KineError::resource(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> KineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One named node. Groups may only refer to nodes declared before them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(flatten)]
    pub shape: ShapeDef,
    #[serde(default)]
    pub style: StyleConfig,
    /// Initial center; the origin when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<[f64; 2]>,
    /// Uniform scale applied after construction, about the node's center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDef {
    Square {
        side: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Dot {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
    },
    Line {
        start: [f64; 2],
        end: [f64; 2],
    },
    Arrow {
        start: [f64; 2],
        end: [f64; 2],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tip_length: Option<f64>,
    },
    Text {
        content: String,
        #[serde(default)]
        text: TextConfig,
    },
    Image {
        source: String,
        height: f64,
    },
    Table {
        rows: Vec<Vec<String>>,
        #[serde(default)]
        table: TableConfig,
    },
    TickBar {
        length: f64,
        proportions: Vec<f64>,
        tick_height: f64,
    },
    Group {
        children: Vec<String>,
    },
}

/// A position resolved when the step runs: a literal coordinate or an anchor of a node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PositionDef {
    Coord([f64; 2]),
    Anchor {
        node: String,
        #[serde(default = "center")]
        anchor: Direction,
    },
}

fn center() -> Direction {
    Direction::Center
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum LayoutStep {
    NextTo {
        node: String,
        reference: String,
        direction: Direction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        buffer: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aligned_edge: Option<Direction>,
    },
    AlignTo {
        node: String,
        reference: String,
        direction: Direction,
    },
    Grid {
        nodes: Vec<String>,
        rows: usize,
        cols: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        buffer: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cell_alignment: Option<Direction>,
    },
    Arrange {
        nodes: Vec<String>,
        #[serde(default)]
        options: Arrange,
    },
    ToEdge {
        node: String,
        direction: Direction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        buffer: Option<f64>,
    },
    ToCorner {
        node: String,
        direction: Direction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        buffer: Option<f64>,
    },
    MoveTo {
        node: String,
        to: PositionDef,
    },
    /// Re-seat a line or arrow between two positions.
    Connect {
        node: String,
        from: PositionDef,
        to: PositionDef,
    },
    Shift {
        node: String,
        by: [f64; 2],
    },
    Scale {
        node: String,
        factor: f64,
    },
}

/// Directive tree in script form. Durations are in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum StepDef {
    Appear {
        target: String,
        run_time: f64,
        #[serde(default)]
        mode: RevealMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<Ease>,
    },
    Disappear {
        target: String,
        run_time: f64,
        #[serde(default)]
        mode: RevealMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<Ease>,
    },
    /// Without `from` the move starts wherever the target is when the move begins.
    Move {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<PositionDef>,
        to: PositionDef,
        run_time: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<Ease>,
    },
    Tween {
        target: String,
        tween: Tween,
        run_time: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<Ease>,
    },
    Wait {
        run_time: f64,
    },
    Sequential {
        steps: Vec<StepDef>,
    },
    Parallel {
        steps: Vec<StepDef>,
        #[serde(default)]
        lag_ratio: f64,
    },
    Stretch {
        step: Box<StepDef>,
        run_time: f64,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
