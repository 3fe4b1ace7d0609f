use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{Direction, Point, Rect, Vec2, rect_anchor},
        error::{KineError, KineResult},
    },
    scene::node::{BoundsCache, NodeId, RevealMode, SceneNode, Shape, Style},
};

/// Arena owning every node of a scene. Composition is a forest: each node has at most one
/// parent and no node is its own ancestor.
///
/// Ids are never reused, so a stale [`NodeId`] resolves to an error rather than to an
/// unrelated node.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Option<SceneNode>>,
    names: BTreeMap<String, NodeId>,
    stage: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an anonymous node as a new root.
    pub fn insert(&mut self, mut node: SceneNode) -> NodeId {
        node.name = None;
        self.push(node)
    }

    fn push(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        node.parent = None;
        node.children.clear();
        node.bounds_cache.set(BoundsCache::Stale);
        if let Some(name) = &node.name {
            self.names.insert(name.clone(), id);
        }
        self.slots.push(Some(node));
        id
    }

    /// Insert under a unique name that scripts and lookups can refer to.
    pub fn insert_named(
        &mut self,
        name: impl Into<String>,
        mut node: SceneNode,
    ) -> KineResult<NodeId> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(KineError::validation("node name must be non-empty"));
        }
        if self.names.contains_key(&name) {
            return Err(KineError::validation(format!("duplicate node name '{name}'")));
        }
        node.name = Some(name);
        Ok(self.push(node))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> KineResult<&SceneNode> {
        self.slot(id)
            .ok_or_else(|| KineError::validation(format!("unknown node {id}")))
    }

    pub fn id_for_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Live node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| NodeId(i as u32))
    }

    fn slot(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> KineResult<&mut SceneNode> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| KineError::validation(format!("unknown node {id}")))
    }

    /// `true` if `a` is `b` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, a: NodeId, b: NodeId) -> bool {
        let mut cur = Some(b);
        while let Some(id) = cur {
            if id == a {
                return true;
            }
            cur = self.slot(id).and_then(|n| n.parent);
        }
        false
    }

    /// Attach `child` as the last child of `parent`, detaching it from any previous parent.
    ///
    /// Stage entries inside the child's subtree are kept, unless `parent` is already drawn,
    /// in which case they fold into it.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> KineResult<()> {
        self.get(parent)?;
        self.get(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(KineError::validation(format!(
                "adding {child} under {parent} would create a cycle"
            )));
        }
        if let Some(old) = self.get(child)?.parent {
            self.remove_child(old, child)?;
        }
        let parent_shown = self.is_shown(parent);
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        if parent_shown {
            let folded: Vec<NodeId> = self
                .stage
                .iter()
                .copied()
                .filter(|&s| self.is_ancestor_or_self(child, s))
                .collect();
            self.stage.retain(|s| !folded.contains(s));
        }
        self.invalidate_up(parent);
        Ok(())
    }

    /// Detach `child` from `parent`; the child stays in the arena as a root.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> KineResult<()> {
        let p = self.node_mut(parent)?;
        let Some(pos) = p.children.iter().position(|&c| c == child) else {
            return Err(KineError::validation(format!(
                "{child} is not a child of {parent}"
            )));
        };
        p.children.remove(pos);
        self.node_mut(child)?.parent = None;
        self.invalidate_up(parent);
        Ok(())
    }

    /// Compose `children` under a new node with no own geometry.
    pub fn group(&mut self, children: &[NodeId]) -> KineResult<NodeId> {
        for &c in children {
            self.get(c)?;
        }
        let id = self.insert(SceneNode::new(Shape::Group, Style::NONE));
        for &c in children {
            self.add_child(id, c)?;
        }
        Ok(id)
    }

    /// [`group`](Self::group) under a unique name.
    pub fn group_named(
        &mut self,
        name: impl Into<String>,
        children: &[NodeId],
    ) -> KineResult<NodeId> {
        for &c in children {
            self.get(c)?;
        }
        let id = self.insert_named(name, SceneNode::new(Shape::Group, Style::NONE))?;
        for &c in children {
            self.add_child(id, c)?;
        }
        Ok(id)
    }

    /// Detach and free `id` together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> KineResult<()> {
        if let Some(parent) = self.get(id)?.parent {
            self.remove_child(parent, id)?;
        }
        for n in self.subtree(id)? {
            if let Some(node) = self.slots.get_mut(n.0 as usize).and_then(Option::take) {
                if let Some(name) = node.name {
                    self.names.remove(&name);
                }
            }
            self.stage.retain(|&s| s != n);
        }
        Ok(())
    }

    /// `id` followed by its descendants, depth-first in child order.
    pub fn subtree(&self, id: NodeId) -> KineResult<Vec<NodeId>> {
        self.get(id)?;
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Some(node) = self.slot(n) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Union of own geometry and all descendants. `None` for missing nodes and for groups
    /// with nothing positioned underneath.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.slot(id)?;
        if let BoundsCache::Fresh(b) = node.bounds_cache.get() {
            return b;
        }
        let mut acc = node.own_bounds();
        for &c in &node.children {
            if let Some(cb) = self.bounds(c) {
                acc = Some(match acc {
                    Some(a) => a.union(cb),
                    None => cb,
                });
            }
        }
        node.bounds_cache.set(BoundsCache::Fresh(acc));
        acc
    }

    /// Anchor on the bounding box; nodes without bounds anchor at the origin.
    pub fn anchor_point(&self, id: NodeId, dir: Direction) -> Point {
        self.bounds(id)
            .map(|b| rect_anchor(b, dir))
            .unwrap_or(Point::ORIGIN)
    }

    /// Center of the bounding box, the reference position used by moves.
    pub fn center(&self, id: NodeId) -> Option<Point> {
        self.bounds(id).map(|b| b.center())
    }

    pub fn shift(&mut self, id: NodeId, delta: Vec2) -> KineResult<()> {
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            return Err(KineError::validation("shift delta must be finite"));
        }
        for n in self.subtree(id)? {
            let node = self.node_mut(n)?;
            node.center += delta;
            node.bounds_cache.set(BoundsCache::Stale);
        }
        self.invalidate_up(id);
        Ok(())
    }

    /// Put the bounding-box center of `id` on `point`.
    pub fn move_to(&mut self, id: NodeId, point: Point) -> KineResult<()> {
        let center = self
            .center(id)
            .ok_or_else(|| KineError::layout(format!("{id} has no bounds to move")))?;
        self.shift(id, point - center)
    }

    /// Uniformly scale `id` about its bounding-box center. Stroke widths are untouched.
    pub fn scale(&mut self, id: NodeId, factor: f64) -> KineResult<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(KineError::validation("scale factor must be finite and > 0"));
        }
        let Some(pivot) = self.center(id) else {
            return Ok(());
        };
        for n in self.subtree(id)? {
            let node = self.node_mut(n)?;
            node.center = pivot + (node.center - pivot) * factor;
            node.shape = node.shape.scaled(factor);
            node.bounds_cache.set(BoundsCache::Stale);
        }
        self.invalidate_up(id);
        Ok(())
    }

    /// Re-seat a line or arrow so it runs from `start` to `end`, in absolute coordinates.
    pub fn put_start_and_end_on(
        &mut self,
        id: NodeId,
        start: Point,
        end: Point,
    ) -> KineResult<()> {
        if ![start.x, start.y, end.x, end.y].iter().all(|v| v.is_finite()) {
            return Err(KineError::validation("endpoints must be finite"));
        }
        let mid = start.midpoint(end);
        let node = self.node_mut(id)?;
        match &mut node.shape {
            Shape::Line { start: s, end: e } | Shape::Arrow { start: s, end: e, .. } => {
                *s = start - mid;
                *e = end - mid;
            }
            other => {
                let kind = other.kind_name();
                return Err(KineError::validation(format!(
                    "{id} is a {kind}, not a line or arrow"
                )));
            }
        }
        node.center = mid;
        node.bounds_cache.set(BoundsCache::Stale);
        self.invalidate_up(id);
        Ok(())
    }

    /// Edit the style of `id` itself (not its descendants).
    pub fn update_style(&mut self, id: NodeId, f: impl FnOnce(&mut Style)) -> KineResult<()> {
        f(&mut self.node_mut(id)?.style);
        Ok(())
    }

    /// Set emphasis over the whole subtree of `id`.
    pub fn set_emphasis(
        &mut self,
        id: NodeId,
        emphasis: f64,
        reveal: RevealMode,
    ) -> KineResult<()> {
        let e = emphasis.clamp(0.0, 1.0);
        for n in self.subtree(id)? {
            let node = self.node_mut(n)?;
            node.emphasis = e;
            node.reveal = reveal;
        }
        Ok(())
    }

    /// Put `id` on stage (drawn in frames). Idempotent; a node already drawn through an
    /// ancestor is left alone, and descendants listed separately fold into `id`.
    pub fn show(&mut self, id: NodeId) -> KineResult<()> {
        self.get(id)?;
        if self.is_shown(id) {
            return Ok(());
        }
        let folded: Vec<NodeId> = self
            .stage
            .iter()
            .copied()
            .filter(|&s| self.is_ancestor_or_self(id, s))
            .collect();
        self.stage.retain(|s| !folded.contains(s));
        self.stage.push(id);
        Ok(())
    }

    /// Take `id` off stage.
    ///
    /// When `id` is drawn through an ancestor, that ancestor's entry is replaced in place by
    /// the siblings along the path down to `id`, so everything else stays drawn in the same
    /// order.
    pub fn hide(&mut self, id: NodeId) -> KineResult<()> {
        self.get(id)?;
        if let Some(pos) = self.stage.iter().position(|&s| s == id) {
            self.stage.remove(pos);
            return Ok(());
        }
        let Some(pos) = self
            .stage
            .iter()
            .position(|&s| self.is_ancestor_or_self(s, id))
        else {
            return Ok(());
        };
        let mut rest = Vec::new();
        self.split_around(self.stage[pos], id, &mut rest);
        let tail = self.stage.split_off(pos + 1);
        self.stage.truncate(pos);
        self.stage.extend(rest);
        self.stage.extend(tail);
        Ok(())
    }

    /// Children of `root`, descending into the one on the path to `id` and leaving `id` out.
    fn split_around(&self, root: NodeId, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.slot(root) else {
            return;
        };
        for &c in &node.children {
            if c == id {
                continue;
            }
            if self.is_ancestor_or_self(c, id) {
                self.split_around(c, id, out);
            } else {
                out.push(c);
            }
        }
    }

    pub fn is_shown(&self, id: NodeId) -> bool {
        self.stage.iter().any(|&s| self.is_ancestor_or_self(s, id))
    }

    /// Drawn roots in draw order.
    pub fn stage(&self) -> &[NodeId] {
        &self.stage
    }

    fn invalidate_up(&self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let Some(node) = self.slot(n) else {
                return;
            };
            node.bounds_cache.set(BoundsCache::Stale);
            cur = node.parent;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
