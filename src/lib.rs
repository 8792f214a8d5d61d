//! lyricwipe renders karaoke-style lyric videos from word-level timings.
//!
//! A job takes a transcript of timed words, an audio file and a [`RenderConfig`], and produces
//! one video frame per `1 / fps` seconds of audio:
//!
//! - Load a [`WordTimeline`] (see [`load_timeline`])
//! - Group it into two-line [`Chunk`]s with [`build_chunks`]
//! - Render frames with a [`FrameCompositor`]; each word takes the color of its [`WordState`]
//! - Stream frames in order into a [`FrameSink`] with [`render_to_sink`], or straight to an MP4
//!   with [`render_to_mp4`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Transcript, font and audio-duration inputs.
pub mod assets;
/// Job configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Frame composition and the render loop.
pub mod render;
/// Text shaping and drawing.
pub mod text;
/// Word timeline, chunking and word state.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgb8};
pub use crate::foundation::error::{LyricError, LyricResult};

pub use crate::assets::font::{FontOrigin, FontSource, FontWarning, ResolvedFont, resolve_font};
pub use crate::assets::media::{DurationProbe, FfprobeDuration, FixedDuration, is_ffprobe_on_path};
pub use crate::assets::transcript::{Transcript, TranscriptWord, load_timeline};
pub use crate::config::{FontConfig, RenderConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::compositor::{FrameCompositor, FrameLines, describe_frame, render_frame};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pipeline::{
    Progress, RenderJob, RenderStats, RenderThreading, RenderToMp4Opts, render_to_mp4,
    render_to_sink, total_frames,
};
pub use crate::timeline::chunk::{
    Chunk, DEFAULT_GRACE_SECS, DEFAULT_LINE_WORDS, active_chunk, build_chunks,
};
pub use crate::timeline::color::{Palette, WordState, resolve};
pub use crate::timeline::word::{Word, WordTimeline};
