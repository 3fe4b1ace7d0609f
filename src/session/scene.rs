use crate::{
    animation::{directive::Directive, timeline::Timeline},
    config::RenderConfig,
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::{Fps, FrameIndex, Rect},
        error::KineResult,
    },
    render::frame::Frame,
    scene::graph::SceneGraph,
};

/// Outcome of one [`Scene::play`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayReport {
    /// Zero-based play counter within the scene.
    pub index: u64,
    /// Global index of the first frame emitted by this play.
    pub first_frame: FrameIndex,
    pub frames: u64,
    pub start_secs: f64,
    pub end_secs: f64,
    /// Scheduled leaf entries (waits excluded).
    pub entries: usize,
}

/// A scene being played into a sink.
///
/// Owns the node arena and two clocks: the scripted time consumed by plays so far, and the
/// index of the next frame. Plays run one at a time. Each ends on the frame nearest its
/// scripted end, so rounding never accumulates across plays.
pub struct Scene<S: FrameSink> {
    graph: SceneGraph,
    cfg: RenderConfig,
    fps: Fps,
    sink: S,
    next_frame: FrameIndex,
    elapsed_secs: f64,
    plays: u64,
}

impl<S: FrameSink> Scene<S> {
    /// Validate `cfg` and open `sink`.
    pub fn new(cfg: RenderConfig, mut sink: S) -> KineResult<Self> {
        cfg.validate()?;
        let fps = cfg.fps()?;
        let (width, height) = cfg.resolution();
        sink.begin(SinkConfig {
            width,
            height,
            fps,
            frame: cfg.frame_rect(),
        })?;
        Ok(Self {
            graph: SceneGraph::new(),
            cfg,
            fps,
            sink,
            next_frame: FrameIndex(0),
            elapsed_secs: 0.0,
            plays: 0,
        })
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn frame_rect(&self) -> Rect {
        self.cfg.frame_rect()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Index the next emitted frame will carry.
    pub fn next_frame(&self) -> FrameIndex {
        self.next_frame
    }

    /// Simulated time of the next frame.
    pub fn time_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.next_frame.0)
    }

    /// Scripted seconds consumed by plays and holds so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Snapshot of the current state, stamped with the next frame index.
    pub fn snapshot(&self) -> KineResult<Frame> {
        Frame::capture(&self.graph, self.next_frame, self.time_secs())
    }

    /// Run `directive` to completion.
    ///
    /// The play covers scripted time `[start, start + duration)` and emits the frames up to the
    /// one nearest its scripted end, at least one for a positive duration. Each frame samples
    /// local time `frame_time - start`, clamped at zero. When the play returns every entry has
    /// reached its end state.
    #[tracing::instrument(
        skip(self, directive),
        fields(play = self.plays, duration = directive.duration())
    )]
    pub fn play(&mut self, directive: &Directive) -> KineResult<PlayReport> {
        let mut timeline = Timeline::compile(directive);
        timeline.check(&self.graph)?;

        let total = timeline.total();
        let start_secs = self.elapsed_secs;
        let end_secs = start_secs + total;
        let first_frame = self.next_frame;
        let end_frame = self.fps.secs_to_frames_round(end_secs);
        let mut frames = end_frame.saturating_sub(first_frame.0);
        if total > 0.0 {
            frames = frames.max(1);
        }

        for k in 0..frames {
            let t = (self.fps.frames_to_secs(first_frame.0 + k) - start_secs).max(0.0);
            let completed = timeline.advance(&mut self.graph, t)?;
            if completed > 0 {
                tracing::trace!(local_secs = t, completed, "entries completed");
            }
            self.emit()?;
        }
        timeline.finish(&mut self.graph)?;
        self.elapsed_secs = end_secs;

        let report = PlayReport {
            index: self.plays,
            first_frame,
            frames,
            start_secs,
            end_secs,
            entries: timeline.entries().len(),
        };
        self.plays += 1;
        tracing::debug!(
            frames = report.frames,
            entries = report.entries,
            end_secs = report.end_secs,
            "play finished"
        );
        Ok(report)
    }

    /// Hold the current state for `secs`.
    pub fn wait(&mut self, secs: f64) -> KineResult<PlayReport> {
        self.play(&Directive::wait(secs)?)
    }

    /// Emit the configured final hold, close the sink and hand it back.
    pub fn finish(mut self) -> KineResult<S> {
        self.elapsed_secs += self.cfg.final_hold_secs;
        let end_frame = self.fps.secs_to_frames_round(self.elapsed_secs);
        while self.next_frame.0 < end_frame {
            self.emit()?;
        }
        self.sink.end()?;
        tracing::info!(
            frames = self.next_frame.0,
            plays = self.plays,
            secs = self.elapsed_secs,
            "scene finished"
        );
        Ok(self.sink)
    }

    fn emit(&mut self) -> KineResult<()> {
        let frame = self.snapshot()?;
        self.sink.push_frame(self.next_frame, &frame)?;
        self.next_frame = FrameIndex(self.next_frame.0 + 1);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scene.rs"]
mod tests;
