//! Immutable directive trees.
//!
//! Leaves describe one timed change to one target; combinators place their children in time.
//! Every constructor validates its inputs and caches the total duration, so a built
//! [`Directive`] is always schedulable.

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Point, Rgba},
        error::{KineError, KineResult},
    },
    scene::node::{NodeId, RevealMode},
};

/// Style property interpolated by a [`Directive::tween`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "property", rename_all = "snake_case", deny_unknown_fields)]
pub enum Tween {
    FillOpacity { from: f64, to: f64 },
    StrokeOpacity { from: f64, to: f64 },
    StrokeWidth { from: f64, to: f64 },
    FillColor { from: Rgba, to: Rgba },
    StrokeColor { from: Rgba, to: Rgba },
}

impl Tween {
    fn validate(&self) -> KineResult<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(KineError::directive(format!("{name} must be in [0, 1], got {v}")))
            }
        };
        match *self {
            Self::FillOpacity { from, to } | Self::StrokeOpacity { from, to } => {
                unit("tween opacity", from)?;
                unit("tween opacity", to)
            }
            Self::StrokeWidth { from, to } => {
                if from.is_finite() && to.is_finite() && from >= 0.0 && to >= 0.0 {
                    Ok(())
                } else {
                    Err(KineError::directive(
                        "tween stroke width must be finite and >= 0",
                    ))
                }
            }
            Self::FillColor { .. } | Self::StrokeColor { .. } => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DirectiveKind {
    Appear {
        target: NodeId,
        duration: f64,
        mode: RevealMode,
        ease: Ease,
    },
    Disappear {
        target: NodeId,
        duration: f64,
        mode: RevealMode,
        ease: Ease,
    },
    /// `from: None` starts wherever the target is when the move begins.
    Move {
        target: NodeId,
        from: Option<Point>,
        to: Point,
        duration: f64,
        ease: Ease,
    },
    Tween {
        target: NodeId,
        tween: Tween,
        duration: f64,
        ease: Ease,
    },
    Wait {
        duration: f64,
    },
    Sequential {
        children: Vec<Directive>,
    },
    Parallel {
        children: Vec<Directive>,
        lag_ratio: f64,
    },
    /// Rescales `inner` so that it lasts `run_time`.
    Stretch {
        inner: Box<Directive>,
        run_time: f64,
    },
}

/// A validated directive with its total duration cached.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    kind: DirectiveKind,
    total: f64,
}

fn check_point(what: &str, p: Point) -> KineResult<()> {
    if !(p.x.is_finite() && p.y.is_finite()) {
        return Err(KineError::directive(format!("{what} must be finite")));
    }
    Ok(())
}

fn check_duration(what: &str, d: f64) -> KineResult<()> {
    if !(d.is_finite() && d >= 0.0) {
        return Err(KineError::directive(format!(
            "{what} duration must be finite and >= 0, got {d}"
        )));
    }
    Ok(())
}

fn check_children(what: &str, children: &[Directive]) -> KineResult<()> {
    if children.is_empty() {
        return Err(KineError::directive(format!("{what} needs at least one child")));
    }
    Ok(())
}

/// Start offsets of `children` under a lag ratio `lag`: each child starts `lag` times the
/// previous child's duration after the previous child's start.
pub fn lagged_starts(children: &[Directive], lag: f64) -> Vec<f64> {
    let mut starts = Vec::with_capacity(children.len());
    let mut at = 0.0;
    let mut prev: Option<f64> = None;
    for c in children {
        if let Some(p) = prev {
            at += lag * p;
        }
        starts.push(at);
        prev = Some(c.total);
    }
    starts
}

impl Directive {
    /// Put `target` on stage at start and raise its emphasis from 0 to 1.
    pub fn appear(target: NodeId, duration: f64, mode: RevealMode) -> KineResult<Self> {
        check_duration("appear", duration)?;
        Ok(Self {
            kind: DirectiveKind::Appear {
                target,
                duration,
                mode,
                ease: Ease::Smooth,
            },
            total: duration,
        })
    }

    /// Lower emphasis from 1 to 0, then take `target` off stage.
    pub fn disappear(target: NodeId, duration: f64) -> KineResult<Self> {
        check_duration("disappear", duration)?;
        Ok(Self {
            kind: DirectiveKind::Disappear {
                target,
                duration,
                mode: RevealMode::Fade,
                ease: Ease::Smooth,
            },
            total: duration,
        })
    }

    /// Move the bounds center of `target` along the straight path `from -> to`.
    pub fn moving(target: NodeId, from: Point, to: Point, duration: f64) -> KineResult<Self> {
        check_point("move start", from)?;
        Self::move_leaf(target, Some(from), to, duration)
    }

    /// Like [`moving`](Self::moving), starting from the target's bounds center at the moment
    /// the move becomes active.
    pub fn move_to(target: NodeId, to: Point, duration: f64) -> KineResult<Self> {
        Self::move_leaf(target, None, to, duration)
    }

    fn move_leaf(
        target: NodeId,
        from: Option<Point>,
        to: Point,
        duration: f64,
    ) -> KineResult<Self> {
        check_duration("move", duration)?;
        check_point("move end", to)?;
        Ok(Self {
            kind: DirectiveKind::Move {
                target,
                from,
                to,
                duration,
                ease: Ease::Linear,
            },
            total: duration,
        })
    }

    pub fn tween(target: NodeId, tween: Tween, duration: f64) -> KineResult<Self> {
        check_duration("tween", duration)?;
        tween.validate()?;
        Ok(Self {
            kind: DirectiveKind::Tween {
                target,
                tween,
                duration,
                ease: Ease::Smooth,
            },
            total: duration,
        })
    }

    pub fn wait(duration: f64) -> KineResult<Self> {
        check_duration("wait", duration)?;
        Ok(Self {
            kind: DirectiveKind::Wait { duration },
            total: duration,
        })
    }

    /// Children one after another; total is the sum of child durations.
    pub fn sequential(children: Vec<Directive>) -> KineResult<Self> {
        check_children("sequential", &children)?;
        let total = children.iter().map(|c| c.total).sum();
        Ok(Self {
            kind: DirectiveKind::Sequential { children },
            total,
        })
    }

    /// Children started in a staggered fan; `lag_ratio` 0 starts all together, 1 chains
    /// them end to start.
    pub fn parallel(children: Vec<Directive>, lag_ratio: f64) -> KineResult<Self> {
        check_children("parallel", &children)?;
        if !(0.0..=1.0).contains(&lag_ratio) {
            return Err(KineError::directive(format!(
                "lag_ratio must be in [0, 1], got {lag_ratio}"
            )));
        }
        let total = lagged_starts(&children, lag_ratio)
            .iter()
            .zip(&children)
            .map(|(s, c)| s + c.total)
            .fold(0.0, f64::max);
        Ok(Self {
            kind: DirectiveKind::Parallel {
                children,
                lag_ratio,
            },
            total,
        })
    }

    pub fn stretch(inner: Directive, run_time: f64) -> KineResult<Self> {
        check_duration("stretch", run_time)?;
        if inner.total == 0.0 && run_time > 0.0 {
            return Err(KineError::directive(
                "cannot stretch an instantaneous directive to a positive run time",
            ));
        }
        Ok(Self {
            kind: DirectiveKind::Stretch {
                inner: Box::new(inner),
                run_time,
            },
            total: run_time,
        })
    }

    /// Replace the rate function of a leaf. Waits and combinators are returned unchanged.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        match &mut self.kind {
            DirectiveKind::Appear { ease: e, .. }
            | DirectiveKind::Disappear { ease: e, .. }
            | DirectiveKind::Move { ease: e, .. }
            | DirectiveKind::Tween { ease: e, .. } => *e = ease,
            DirectiveKind::Wait { .. }
            | DirectiveKind::Sequential { .. }
            | DirectiveKind::Parallel { .. }
            | DirectiveKind::Stretch { .. } => {}
        }
        self
    }

    /// Replace the reveal mode of an appear or disappear leaf.
    pub fn with_mode(mut self, mode: RevealMode) -> Self {
        if let DirectiveKind::Appear { mode: m, .. } | DirectiveKind::Disappear { mode: m, .. } =
            &mut self.kind
        {
            *m = mode;
        }
        self
    }

    pub fn kind(&self) -> &DirectiveKind {
        &self.kind
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/directive.rs"]
mod tests;
