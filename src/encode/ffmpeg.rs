use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LyricError, LyricResult};
use crate::foundation::math::flatten_premul_to_rgb24;
use crate::render::frame::FrameRGBA;

type StderrDrain = std::thread::JoinHandle<std::io::Result<Vec<u8>>>;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Encoder executable; `ffmpeg` resolved through `PATH` by default.
    pub program: PathBuf,
    /// x264 preset.
    pub preset: String,
    /// x264 constant rate factor.
    pub crf: u8,
    /// AAC bitrate, in ffmpeg notation.
    pub audio_bitrate: String,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            program: PathBuf::from("ffmpeg"),
            preset: "fast".to_string(),
            crf: 18,
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Sink that spawns the encoder process and streams RGB24 frames to its stdin.
///
/// The process handle is scoped: if the sink is dropped or aborted before a successful
/// [`FrameSink::end`], the child is killed and reaped and the partial output file is removed.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<StderrDrain>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Create a new sink that streams into the encoder.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Frames written to the encoder so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Reap the child after a failure, collect its stderr, and remove the partial output.
    fn fail(&mut self, cause: String) -> LyricError {
        drop(self.stdin.take());
        let status = self.child.take().and_then(|mut child| {
            match child.try_wait() {
                Ok(Some(status)) => Some(status),
                _ => {
                    let _ = child.kill();
                    child.wait().ok()
                }
            }
        });
        let stderr = join_stderr(self.stderr_drain.take());
        self.remove_partial_output();
        self.cfg = None;
        LyricError::encoder(describe_failure(&cause, status, &stderr))
    }

    fn remove_partial_output(&self) {
        if self.opts.out_path.exists() {
            match std::fs::remove_file(&self.opts.out_path) {
                Ok(()) => tracing::debug!(
                    path = %self.opts.out_path.display(),
                    "removed partial encoder output"
                ),
                Err(e) => tracing::warn!(
                    path = %self.opts.out_path.display(),
                    error = %e,
                    "failed to remove partial encoder output"
                ),
            }
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LyricResult<()> {
        if self.child.is_some() {
            return Err(LyricError::validation("ffmpeg sink already started"));
        }
        Fps::new(cfg.fps.num, cfg.fps.den)?;
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(LyricError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(LyricError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if let Some(audio) = cfg.audio.as_ref()
            && !audio.path.is_file()
        {
            return Err(LyricError::validation(format!(
                "audio file '{}' does not exist",
                audio.path.display()
            )));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(LyricError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut cmd = Command::new(&self.opts.program);
        cmd.args(encoder_args(&self.opts, &cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            LyricError::encoder(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                self.opts.program.display()
            ))
        })?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(mut stderr)) = (stdin, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LyricError::encoder("failed to open encoder stdio (unexpected)"));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::info!(
            program = %self.opts.program.display(),
            out = %self.opts.out_path.display(),
            width = cfg.canvas.width,
            height = cfg.canvas.height,
            fps = %format!("{}/{}", cfg.fps.num, cfg.fps.den),
            audio = cfg.audio.is_some(),
            "encoder started"
        );

        self.scratch = vec![0u8; cfg.canvas.rgb_len()];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LyricResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LyricError::validation("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LyricError::validation(format!(
                "ffmpeg sink received out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }

        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(LyricError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        if frame.data.len() != cfg.canvas.rgba_len() {
            return Err(LyricError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        let bg = cfg.background;
        self.last_idx = Some(idx);

        flatten_premul_to_rgb24(&mut self.scratch, &frame.data, [bg.r, bg.g, bg.b])?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LyricError::encoder("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&self.scratch) {
            return Err(self.fail(format!(
                "failed to write frame {} to encoder stdin: {e}",
                idx.0
            )));
        }
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> LyricResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| LyricError::validation("ffmpeg sink not started"))?;

        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => {
                self.child = Some(child);
                return Err(self.fail(format!("failed to wait for encoder to finish: {e}")));
            }
        };
        let stderr = join_stderr(self.stderr_drain.take());

        if !status.success() {
            self.remove_partial_output();
            self.cfg = None;
            return Err(LyricError::encoder(describe_failure(
                "encoder exited unsuccessfully",
                Some(status),
                &stderr,
            )));
        }

        if let Some(cfg) = self.cfg.take()
            && cfg.total_frames != self.frames_written
        {
            tracing::warn!(
                expected = cfg.total_frames,
                written = self.frames_written,
                "encoder received a different frame count than announced"
            );
        }
        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = self.frames_written,
            "encoder finished"
        );
        Ok(())
    }

    fn abort(&mut self) {
        if self.child.is_none() {
            return;
        }
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = join_stderr(self.stderr_drain.take());
        self.remove_partial_output();
        self.cfg = None;
        tracing::warn!(
            out = %self.opts.out_path.display(),
            frames = self.frames_written,
            "encoder aborted"
        );
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(40);
    let mut push = |a: &str| args.push(OsString::from(a));

    push(if opts.overwrite { "-y" } else { "-n" });
    push("-loglevel");
    push("error");

    // Raw RGB24 on stdin; `-r` before `-i` sets the input rate, rational as `num/den`.
    push("-f");
    push("rawvideo");
    push("-pix_fmt");
    push("rgb24");
    push("-s");
    push(&format!("{}x{}", cfg.canvas.width, cfg.canvas.height));
    push("-r");
    push(&format!("{}/{}", cfg.fps.num, cfg.fps.den));
    push("-i");
    push("pipe:0");

    if let Some(audio) = cfg.audio.as_ref() {
        args.push(OsString::from("-i"));
        args.push(audio.path.clone().into_os_string());
    }

    let mut push = |a: &str| args.push(OsString::from(a));
    push("-c:v");
    push("libx264");
    push("-preset");
    push(&opts.preset);
    push("-crf");
    push(&opts.crf.to_string());
    push("-pix_fmt");
    push("yuv420p");

    if cfg.audio.is_some() {
        push("-c:a");
        push("aac");
        push("-b:a");
        push(&opts.audio_bitrate);
        push("-shortest");
    } else {
        push("-an");
    }

    push("-movflags");
    push("+faststart");
    args.push(opts.out_path.clone().into_os_string());
    args
}

fn join_stderr(handle: Option<StderrDrain>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    match handle.join() {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Ok(Err(e)) => format!("<stderr read failed: {e}>"),
        Err(_) => "<stderr drain thread panicked>".to_string(),
    }
}

fn describe_failure(cause: &str, status: Option<ExitStatus>, stderr: &str) -> String {
    let mut msg = cause.to_string();
    if let Some(status) = status {
        msg.push_str(&format!(" (status {status})"));
    }
    if !stderr.is_empty() {
        msg.push_str(": ");
        msg.push_str(stderr);
    }
    msg
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> LyricResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
