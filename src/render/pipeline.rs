use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::{
    assets::font::{ResolvedFont, resolve_font},
    assets::media::{DurationProbe, check_duration},
    config::RenderConfig,
    encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts},
    encode::sink::{AudioInputConfig, FrameSink, SinkConfig},
    foundation::core::{Fps, FrameIndex},
    foundation::error::{LyricError, LyricResult},
    render::compositor::FrameCompositor,
    render::frame::FrameRGBA,
    timeline::chunk::{Chunk, active_chunk, build_chunks},
    timeline::word::WordTimeline,
};

/// How frames are computed. Output order and bytes do not depend on these settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    /// Render batches of frames on a rayon pool.
    pub parallel: bool,
    /// Frames per parallel batch.
    pub batch_size: usize,
    /// Worker count; rayon's default when `None`.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            batch_size: 64,
            threads: None,
        }
    }
}

/// Advisory progress notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Frame just written.
    pub frame: FrameIndex,
    /// Frames in the whole job.
    pub total_frames: u64,
}

/// Summary of a finished job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// `ceil(duration * fps)`.
    pub frames_total: u64,
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Frames that showed a chunk.
    pub frames_with_lyrics: u64,
    /// Chunks built from the timeline.
    pub chunks: usize,
    /// Whether text fell back to the built-in bitmap font.
    pub builtin_font: bool,
}

/// Everything one rendering job reads. Borrowed for the duration of the job.
#[derive(Clone, Copy, Debug)]
pub struct RenderJob<'a> {
    /// Word timings to display.
    pub timeline: &'a WordTimeline,
    /// Length of the output, in seconds of audio.
    pub audio_duration_secs: f64,
    /// Audio track muxed by sinks that support it.
    pub audio: Option<&'a Path>,
    /// Immutable job configuration.
    pub config: &'a RenderConfig,
    /// Font resolved from `config.font`.
    pub font: &'a ResolvedFont,
}

/// Number of frames covering `duration_secs` at `fps`: `ceil(duration * fps)`.
///
/// Fails with [`LyricError::DurationUnavailable`] for non-finite or negative durations.
pub fn total_frames(duration_secs: f64, fps: Fps) -> LyricResult<u64> {
    let secs = check_duration(duration_secs)?;
    Ok(fps.secs_to_frames_ceil(secs))
}

/// Render every frame of `job` into `sink`, in order.
///
/// Input errors surface before [`FrameSink::begin`]. Any error after that stops the loop at once
/// and calls [`FrameSink::abort`]; no success result is returned.
#[tracing::instrument(skip_all, fields(words = job.timeline.len()))]
pub fn render_to_sink(
    job: &RenderJob<'_>,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
    on_progress: &mut dyn FnMut(Progress),
) -> LyricResult<RenderStats> {
    let cfg = job.config;
    cfg.validate()?;
    let total = total_frames(job.audio_duration_secs, cfg.fps)?;
    let chunks = build_chunks(job.timeline, cfg.line_words)?;
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };

    let mut compositor = FrameCompositor::new(cfg, &job.font.source);
    let mut stats = RenderStats {
        frames_total: total,
        chunks: chunks.len(),
        builtin_font: compositor.uses_builtin_font(),
        ..RenderStats::default()
    };

    tracing::info!(
        frames = total,
        chunks = chunks.len(),
        fps = %format!("{}/{}", cfg.fps.num, cfg.fps.den),
        parallel = threading.parallel,
        font = ?job.font.origin,
        "render started"
    );
    let started = Instant::now();

    sink.begin(SinkConfig {
        canvas: cfg.canvas,
        fps: cfg.fps,
        total_frames: total,
        background: cfg.palette.background,
        audio: job.audio.map(|p| AudioInputConfig {
            path: p.to_path_buf(),
        }),
    })?;

    let result = match &pool {
        Some(pool) => run_parallel(
            job,
            &chunks,
            total,
            pool,
            threading.batch_size,
            sink,
            &mut stats,
            on_progress,
        ),
        None => run_sequential(job, &chunks, total, &mut compositor, sink, &mut stats, on_progress),
    };
    if let Err(err) = result {
        tracing::warn!(frame = stats.frames_written, error = %err, "render failed");
        sink.abort();
        return Err(err);
    }

    sink.end()?;
    tracing::info!(
        frames = stats.frames_written,
        with_lyrics = stats.frames_with_lyrics,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "render finished"
    );
    Ok(stats)
}

fn run_sequential(
    job: &RenderJob<'_>,
    chunks: &[Chunk<'_>],
    total: u64,
    compositor: &mut FrameCompositor,
    sink: &mut dyn FrameSink,
    stats: &mut RenderStats,
    on_progress: &mut dyn FnMut(Progress),
) -> LyricResult<()> {
    let interval = job.config.progress_interval_frames();
    for f in 0..total {
        let (frame, visible) = render_one(compositor, chunks, job.config, f)?;
        write_frame(sink, f, &frame, visible, total, interval, stats, on_progress)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_parallel(
    job: &RenderJob<'_>,
    chunks: &[Chunk<'_>],
    total: u64,
    pool: &rayon::ThreadPool,
    batch_size: usize,
    sink: &mut dyn FrameSink,
    stats: &mut RenderStats,
    on_progress: &mut dyn FnMut(Progress),
) -> LyricResult<()> {
    let interval = job.config.progress_interval_frames();
    let batch = normalized_batch_size(batch_size);

    let mut batch_start = 0u64;
    while batch_start < total {
        let batch_end = (batch_start + batch).min(total);
        let indices: Vec<u64> = (batch_start..batch_end).collect();
        let rendered = pool.install(|| {
            indices
                .par_iter()
                .map_init(
                    || FrameCompositor::new(job.config, &job.font.source),
                    |compositor, &f| render_one(compositor, chunks, job.config, f),
                )
                .collect::<Vec<_>>()
        });

        for (f, item) in indices.into_iter().zip(rendered) {
            let (frame, visible) = item?;
            write_frame(sink, f, &frame, visible, total, interval, stats, on_progress)?;
        }
        batch_start = batch_end;
    }
    Ok(())
}

fn render_one(
    compositor: &mut FrameCompositor,
    chunks: &[Chunk<'_>],
    cfg: &RenderConfig,
    f: u64,
) -> LyricResult<(FrameRGBA, bool)> {
    let t = cfg.fps.frame_time_secs(FrameIndex(f));
    let chunk = active_chunk(chunks, t, cfg.grace_secs);
    let frame = compositor.render_frame(chunk, t)?;
    Ok((frame, chunk.is_some()))
}

#[allow(clippy::too_many_arguments)]
fn write_frame(
    sink: &mut dyn FrameSink,
    f: u64,
    frame: &FrameRGBA,
    visible: bool,
    total: u64,
    interval: u64,
    stats: &mut RenderStats,
    on_progress: &mut dyn FnMut(Progress),
) -> LyricResult<()> {
    sink.push_frame(FrameIndex(f), frame)?;
    stats.frames_written += 1;
    if visible {
        stats.frames_with_lyrics += 1;
    }
    if f.is_multiple_of(interval) {
        tracing::info!(frame = f, total, "progress");
        on_progress(Progress {
            frame: FrameIndex(f),
            total_frames: total,
        });
    }
    Ok(())
}

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// Encoder executable.
    pub encoder: PathBuf,
    /// Render threading/batching configuration.
    pub threading: RenderThreading,
    /// Font already resolved by the caller. When `None` it is resolved from `cfg.font`.
    pub font: Option<ResolvedFont>,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            overwrite: true,
            encoder: PathBuf::from("ffmpeg"),
            threading: RenderThreading::default(),
            font: None,
        }
    }
}

/// Render `timeline` over `audio` into an MP4 at `out_path`.
///
/// The audio duration comes from `probe` and fixes the frame count. Unless `opts.font` is set, the
/// font is resolved from `cfg.font` with fallbacks logged as warnings. On any failure the partial
/// output is removed.
pub fn render_to_mp4(
    timeline: &WordTimeline,
    audio: &Path,
    out_path: impl Into<PathBuf>,
    cfg: &RenderConfig,
    probe: &dyn DurationProbe,
    opts: &RenderToMp4Opts,
) -> LyricResult<RenderStats> {
    cfg.validate()?;
    let duration = probe.duration_secs(audio)?;
    let resolved;
    let font = match &opts.font {
        Some(font) => font,
        None => {
            resolved = resolve_font(&cfg.font);
            &resolved
        }
    };

    let mut sink_opts = FfmpegSinkOpts::new(out_path);
    sink_opts.overwrite = opts.overwrite;
    sink_opts.program = opts.encoder.clone();
    let mut sink = FfmpegSink::new(sink_opts);

    let job = RenderJob {
        timeline,
        audio_duration_secs: duration,
        audio: Some(audio),
        config: cfg,
        font,
    };
    render_to_sink(&job, &mut sink, &opts.threading, &mut |_| {})
}

fn build_thread_pool(threads: Option<usize>) -> LyricResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LyricError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LyricError::validation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_batch_size(batch_size: usize) -> u64 {
    if batch_size == 0 {
        1
    } else {
        batch_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
