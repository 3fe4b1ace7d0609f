use crate::{
    animation::{
        directive::{Directive, DirectiveKind, Tween, lagged_starts},
        ease::{Ease, Lerp},
    },
    foundation::{
        core::Point,
        error::{KineError, KineResult},
    },
    scene::{
        graph::SceneGraph,
        node::{NodeId, RevealMode},
    },
};

/// Slack used when comparing schedule times against tick times.
pub const TIME_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Active,
    Completed,
}

/// The change one leaf applies to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Appear { target: NodeId, mode: RevealMode },
    Disappear { target: NodeId, mode: RevealMode },
    /// `from` is filled in from the target's center when the move begins, if unset.
    Move {
        target: NodeId,
        from: Option<Point>,
        to: Point,
    },
    Tween { target: NodeId, tween: Tween },
}

impl Action {
    pub fn target(&self) -> NodeId {
        match *self {
            Self::Appear { target, .. }
            | Self::Disappear { target, .. }
            | Self::Move { target, .. }
            | Self::Tween { target, .. } => target,
        }
    }

    fn begin(&mut self, g: &mut SceneGraph) -> KineResult<()> {
        match *self {
            Self::Appear { target, mode } => {
                g.show(target)?;
                g.set_emphasis(target, 0.0, mode)
            }
            Self::Disappear { target, mode } => {
                g.show(target)?;
                g.set_emphasis(target, 1.0, mode)
            }
            Self::Move {
                target,
                from: None,
                to,
            } => {
                let here = g.center(target).ok_or_else(|| {
                    KineError::directive(format!("{target} has no bounds to move"))
                })?;
                *self = Self::Move {
                    target,
                    from: Some(here),
                    to,
                };
                Ok(())
            }
            Self::Move { .. } | Self::Tween { .. } => Ok(()),
        }
    }

    fn apply(&self, g: &mut SceneGraph, p: f64) -> KineResult<()> {
        match *self {
            Self::Appear { target, mode } => g.set_emphasis(target, p, mode),
            Self::Disappear { target, mode } => g.set_emphasis(target, 1.0 - p, mode),
            Self::Move { target, from, to } => {
                let from = from.unwrap_or(to);
                g.move_to(target, <Point as Lerp>::lerp(&from, &to, p))
            }
            Self::Tween { target, tween } => {
                for n in g.subtree(target)? {
                    g.update_style(n, |s| match tween {
                        Tween::FillOpacity { from, to } => {
                            s.fill_opacity = <f64 as Lerp>::lerp(&from, &to, p).clamp(0.0, 1.0)
                        }
                        Tween::StrokeOpacity { from, to } => {
                            s.stroke_opacity = <f64 as Lerp>::lerp(&from, &to, p).clamp(0.0, 1.0)
                        }
                        Tween::StrokeWidth { from, to } => {
                            s.stroke_width = <f64 as Lerp>::lerp(&from, &to, p).max(0.0)
                        }
                        Tween::FillColor { from, to } => s.fill_color = Lerp::lerp(&from, &to, p),
                        Tween::StrokeColor { from, to } => {
                            s.stroke_color = Lerp::lerp(&from, &to, p)
                        }
                    })?;
                }
                Ok(())
            }
        }
    }

    fn complete(&self, g: &mut SceneGraph) -> KineResult<()> {
        match *self {
            Self::Disappear { target, .. } => g.hide(target),
            Self::Appear { .. } | Self::Move { .. } | Self::Tween { .. } => Ok(()),
        }
    }
}

/// One scheduled leaf with its absolute window.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub start: f64,
    pub duration: f64,
    pub action: Action,
    pub ease: Ease,
    state: EntryState,
}

impl TimelineEntry {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    fn progress(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.ease.apply((t - self.start) / self.duration)
    }
}

/// A directive tree flattened into leaf entries with absolute start times, in tree order.
///
/// Waits occupy time but produce no entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    total: f64,
}

impl Timeline {
    pub fn compile(d: &Directive) -> Self {
        let mut entries = Vec::new();
        flatten(d, 0.0, 1.0, &mut entries);
        Self {
            entries,
            total: d.duration(),
        }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Reject entries whose targets are missing or cannot be acted on, and pairs of
    /// concurrent entries that would write the same node.
    ///
    /// Two entries conflict when their windows overlap for a positive length and one target
    /// is the other or an ancestor of it. Instantaneous entries never conflict.
    pub fn check(&self, g: &SceneGraph) -> KineResult<()> {
        for e in &self.entries {
            let target = e.action.target();
            if !g.contains(target) {
                return Err(KineError::directive(format!("unknown target {target}")));
            }
            if matches!(e.action, Action::Move { .. }) && g.bounds(target).is_none() {
                return Err(KineError::directive(format!(
                    "move target {target} has no bounds"
                )));
            }
        }
        for (i, a) in self.entries.iter().enumerate() {
            if a.duration <= 0.0 {
                continue;
            }
            for b in &self.entries[i + 1..] {
                if b.duration <= 0.0 {
                    continue;
                }
                let overlap = a.start < b.end() - TIME_EPS && b.start < a.end() - TIME_EPS;
                if !overlap {
                    continue;
                }
                let (ta, tb) = (a.action.target(), b.action.target());
                if g.is_ancestor_or_self(ta, tb) || g.is_ancestor_or_self(tb, ta) {
                    return Err(KineError::directive(format!(
                        "concurrent writes to {ta} and {tb} between {:.3}s and {:.3}s",
                        a.start.max(b.start),
                        a.end().min(b.end())
                    )));
                }
            }
        }
        Ok(())
    }

    /// Bring every entry up to local time `t`, in tree order. Returns how many entries
    /// completed during this call.
    pub fn advance(&mut self, g: &mut SceneGraph, t: f64) -> KineResult<usize> {
        let mut completed = 0;
        for e in &mut self.entries {
            if e.state == EntryState::Pending && e.start <= t + TIME_EPS {
                e.action.begin(g)?;
                e.state = EntryState::Active;
            }
            if e.state != EntryState::Active {
                continue;
            }
            if e.end() <= t + TIME_EPS {
                e.action.apply(g, e.ease.apply(1.0))?;
                e.action.complete(g)?;
                e.state = EntryState::Completed;
                completed += 1;
            } else {
                e.action.apply(g, e.progress(t))?;
            }
        }
        Ok(completed)
    }

    /// Complete every entry that has not completed yet, leaving the exact end state.
    pub fn finish(&mut self, g: &mut SceneGraph) -> KineResult<usize> {
        self.advance(g, self.total.max(self.latest_end()))
    }

    pub fn is_finished(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.state == EntryState::Completed)
    }

    fn latest_end(&self) -> f64 {
        self.entries.iter().map(TimelineEntry::end).fold(0.0, f64::max)
    }
}

fn flatten(d: &Directive, offset: f64, scale: f64, out: &mut Vec<TimelineEntry>) {
    let mut leaf = |duration: f64, action: Action, ease: Ease| {
        out.push(TimelineEntry {
            start: offset,
            duration: duration * scale,
            action,
            ease,
            state: EntryState::Pending,
        })
    };
    match d.kind() {
        DirectiveKind::Appear {
            target,
            duration,
            mode,
            ease,
        } => leaf(
            *duration,
            Action::Appear {
                target: *target,
                mode: *mode,
            },
            *ease,
        ),
        DirectiveKind::Disappear {
            target,
            duration,
            mode,
            ease,
        } => leaf(
            *duration,
            Action::Disappear {
                target: *target,
                mode: *mode,
            },
            *ease,
        ),
        DirectiveKind::Move {
            target,
            from,
            to,
            duration,
            ease,
        } => leaf(
            *duration,
            Action::Move {
                target: *target,
                from: *from,
                to: *to,
            },
            *ease,
        ),
        DirectiveKind::Tween {
            target,
            tween,
            duration,
            ease,
        } => leaf(
            *duration,
            Action::Tween {
                target: *target,
                tween: *tween,
            },
            *ease,
        ),
        DirectiveKind::Wait { .. } => {}
        DirectiveKind::Sequential { children } => {
            let mut at = offset;
            for c in children {
                flatten(c, at, scale, out);
                at += c.duration() * scale;
            }
        }
        DirectiveKind::Parallel {
            children,
            lag_ratio,
        } => {
            for (start, c) in lagged_starts(children, *lag_ratio).into_iter().zip(children) {
                flatten(c, offset + start * scale, scale, out);
            }
        }
        DirectiveKind::Stretch { inner, run_time } => {
            let k = if inner.duration() > 0.0 {
                run_time / inner.duration()
            } else {
                0.0
            };
            flatten(inner, offset, scale * k, out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
