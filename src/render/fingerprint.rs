use crate::{
    foundation::{
        core::{Point, Rect, Rgba, Vec2},
        math::Fnv1a64,
    },
    render::frame::{Frame, NodeSnapshot},
    scene::node::{RevealMode, Shape, Style},
};

const LO_SEED: u64 = Fnv1a64::OFFSET_BASIS ^ 0x9e37_79b9_7f4a_7c15;

/// 128-bit content hash of a frame snapshot.
///
/// Hashes exact float bit patterns, so two frames fingerprint equal only when every
/// snapshot value is bit-identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Two independently seeded FNV-1a streams fed the same bytes.
#[derive(Clone, Debug)]
pub(crate) struct StableHasher {
    hi: Fnv1a64,
    lo: Fnv1a64,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self::with_seeds(Fnv1a64::OFFSET_BASIS, LO_SEED)
    }

    pub(crate) fn with_seeds(hi: u64, lo: u64) -> Self {
        Self {
            hi: Fnv1a64::new(hi),
            lo: Fnv1a64::new(lo),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.hi.write(bytes);
        self.lo.write(bytes);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Exact bit pattern, so `0.0` and `-0.0` differ.
    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    /// Length-prefixed so adjacent strings cannot run together.
    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    fn write_vec2(&mut self, v: Vec2) {
        self.write_f64(v.x);
        self.write_f64(v.y);
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_f64(r.x0);
        self.write_f64(r.y0);
        self.write_f64(r.x1);
        self.write_f64(r.y1);
    }

    fn write_rgba(&mut self, c: Rgba) {
        self.write_bytes(&[c.r, c.g, c.b, c.a]);
    }

    pub(crate) fn finish(&self) -> FrameFingerprint {
        FrameFingerprint {
            hi: self.hi.finish(),
            lo: self.lo.finish(),
        }
    }
}

pub fn fingerprint_frame(frame: &Frame) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(frame.index.0);
    h.write_f64(frame.time_secs);
    h.write_u64(frame.nodes.len() as u64);
    for n in &frame.nodes {
        write_node(&mut h, n);
    }
    h.finish()
}

fn write_node(h: &mut StableHasher, n: &NodeSnapshot) {
    h.write_u64(u64::from(n.id.0));
    match &n.name {
        Some(name) => {
            h.write_u8(1);
            h.write_str(name);
        }
        None => h.write_u8(0),
    }
    match n.parent {
        Some(p) => {
            h.write_u8(1);
            h.write_u64(u64::from(p.0));
        }
        None => h.write_u8(0),
    }
    h.write_point(n.center);
    match n.bounds {
        Some(b) => {
            h.write_u8(1);
            h.write_rect(b);
        }
        None => h.write_u8(0),
    }
    write_shape(h, &n.shape);
    write_style(h, &n.style);
    h.write_f64(n.emphasis);
    h.write_u8(match n.reveal {
        RevealMode::Fade => 0,
        RevealMode::Create => 1,
        RevealMode::Write => 2,
    });
}

fn write_shape(h: &mut StableHasher, s: &Shape) {
    match s {
        Shape::Group => h.write_u8(0),
        Shape::Rect { width, height } => {
            h.write_u8(1);
            h.write_f64(*width);
            h.write_f64(*height);
        }
        Shape::Circle { radius } => {
            h.write_u8(2);
            h.write_f64(*radius);
        }
        Shape::Line { start, end } => {
            h.write_u8(3);
            h.write_vec2(*start);
            h.write_vec2(*end);
        }
        Shape::Arrow {
            start,
            end,
            tip_length,
        } => {
            h.write_u8(4);
            h.write_vec2(*start);
            h.write_vec2(*end);
            h.write_f64(*tip_length);
        }
        Shape::Text {
            content,
            font_size,
            line_spacing,
        } => {
            h.write_u8(5);
            h.write_str(content);
            h.write_f64(*font_size);
            h.write_f64(*line_spacing);
        }
        Shape::Image {
            source,
            width,
            height,
        } => {
            h.write_u8(6);
            h.write_str(source);
            h.write_f64(*width);
            h.write_f64(*height);
        }
    }
}

fn write_style(h: &mut StableHasher, s: &Style) {
    h.write_rgba(s.stroke_color);
    h.write_f64(s.stroke_width);
    h.write_f64(s.stroke_opacity);
    h.write_rgba(s.fill_color);
    h.write_f64(s.fill_opacity);
}

#[cfg(test)]
#[path = "../../tests/unit/render/fingerprint.rs"]
mod tests;
