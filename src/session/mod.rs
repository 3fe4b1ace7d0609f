//! Scene playback session.

pub mod scene;
