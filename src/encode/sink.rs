use std::io::Write;

use crate::{
    foundation::{
        core::{Fps, FrameIndex, Rect},
        error::{KineError, KineResult},
        math::Fnv1a64,
    },
    render::{
        fingerprint::{FrameFingerprint, StableHasher, fingerprint_frame},
        frame::Frame,
    },
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub fps: Fps,
    /// Visible region in scene units.
    pub frame: Rect,
}

/// Consumer of frame snapshots in timeline order.
///
/// Ordering contract: `push_frame` is called with strictly increasing, gap-free
/// `FrameIndex` values starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> KineResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> KineResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> KineResult<()>;
}

/// Keeps every frame; for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<Frame>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KineResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> KineResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> KineResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes the sink config, then one JSON object per frame, one per line.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
    frames: u64,
}

#[derive(serde::Serialize)]
struct HeaderLine<'a> {
    config: &'a SinkConfig,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: serde::Serialize>(&mut self, v: &T) -> KineResult<()> {
        serde_json::to_writer(&mut self.out, v)?;
        self.out
            .write_all(b"\n")
            .map_err(|e| KineError::sink(format!("write failed: {e}")))
    }
}

impl<W: Write + Send> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> KineResult<()> {
        self.frames = 0;
        self.write_line(&HeaderLine { config: &cfg })
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> KineResult<()> {
        self.write_line(frame)?;
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> KineResult<()> {
        self.out
            .flush()
            .map_err(|e| KineError::sink(format!("flush failed: {e}")))
    }
}

/// Summary of a whole frame stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamDigest {
    pub frames: u64,
    pub fingerprint: FrameFingerprint,
}

/// Folds every frame fingerprint into one running digest without keeping frames.
#[derive(Clone, Debug)]
pub struct DigestSink {
    hasher: StableHasher,
    frames: u64,
    last: Option<FrameFingerprint>,
}

impl Default for DigestSink {
    fn default() -> Self {
        Self {
            hasher: StableHasher::with_seeds(Fnv1a64::OFFSET_BASIS, !Fnv1a64::OFFSET_BASIS),
            frames: 0,
            last: None,
        }
    }
}

impl DigestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digest(&self) -> StreamDigest {
        StreamDigest {
            frames: self.frames,
            fingerprint: self.hasher.finish(),
        }
    }

    /// Fingerprint of the most recent frame.
    pub fn last_frame(&self) -> Option<FrameFingerprint> {
        self.last
    }
}

impl FrameSink for DigestSink {
    fn begin(&mut self, _cfg: SinkConfig) -> KineResult<()> {
        *self = Self::default();
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> KineResult<()> {
        let fp = fingerprint_frame(frame);
        self.hasher.write_u64(fp.hi);
        self.hasher.write_u64(fp.lo);
        self.frames += 1;
        self.last = Some(fp);
        Ok(())
    }

    fn end(&mut self) -> KineResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
