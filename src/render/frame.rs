use crate::{
    foundation::{
        core::{FrameIndex, Point, Rect},
        error::KineResult,
    },
    scene::{
        graph::SceneGraph,
        node::{NodeId, RevealMode, Shape, Style},
    },
};

/// Drawable state of one on-stage node at one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub center: Point,
    pub bounds: Option<Rect>,
    pub shape: Shape,
    pub style: Style,
    pub emphasis: f64,
    pub reveal: RevealMode,
}

/// Everything a rasterizer needs to draw one frame: on-stage nodes in draw order (stage
/// order, each root followed by its descendants).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub index: FrameIndex,
    pub time_secs: f64,
    pub nodes: Vec<NodeSnapshot>,
}

impl Frame {
    pub fn capture(g: &SceneGraph, index: FrameIndex, time_secs: f64) -> KineResult<Self> {
        let mut nodes = Vec::new();
        for &root in g.stage() {
            for id in g.subtree(root)? {
                let n = g.get(id)?;
                nodes.push(NodeSnapshot {
                    id,
                    name: n.name().map(str::to_owned),
                    parent: n.parent(),
                    center: n.center(),
                    bounds: g.bounds(id),
                    shape: n.shape().clone(),
                    style: *n.style(),
                    emphasis: n.emphasis(),
                    reveal: n.reveal(),
                });
            }
        }
        Ok(Self {
            index,
            time_secs,
            nodes,
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_named(&self, name: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
