//! Kinegram lays out explanatory diagrams and plays scripted animations over them as a
//! deterministic stream of frame snapshots.
//!
//! - Build nodes with [`scene::shapes`] into a [`SceneGraph`] owned by a [`Scene`]
//! - Position them with the anchor-relative helpers in [`layout::solver`]
//! - Describe changes as [`Directive`] trees and [`Scene::play`] them into a [`FrameSink`]
//!
//! Scenes can also be declared as JSON [`SceneScript`]s and run with [`run_script`].
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod config;
pub mod encode;
pub mod layout;
pub mod logging;
pub mod render;
pub mod scene;
pub mod script;
pub mod session;

pub use crate::animation::directive::{Directive, DirectiveKind, Tween};
pub use crate::animation::ease::Ease;
pub use crate::config::{LoggingConfig, Quality, RenderConfig};
pub use crate::encode::sink::{
    DigestSink, FrameSink, InMemorySink, JsonLinesSink, SinkConfig, StreamDigest,
};
pub use crate::foundation::core::{
    Direction, Fps, FrameIndex, Point, Rect, Rgba, Vec2, rect_anchor,
};
pub use crate::foundation::error::{KineError, KineResult};
pub use crate::render::fingerprint::{FrameFingerprint, fingerprint_frame};
pub use crate::render::frame::{Frame, NodeSnapshot};
pub use crate::scene::graph::SceneGraph;
pub use crate::scene::node::{NodeId, RevealMode, SceneNode, Shape, Style, StyleConfig};
pub use crate::script::model::SceneScript;
pub use crate::script::runner::run_script;
pub use crate::session::scene::{PlayReport, Scene};
