use std::path::{Path, PathBuf};

use crate::foundation::error::{LyricError, LyricResult};

/// Source of an audio file's duration in seconds.
///
/// Implementations must return [`LyricError::DurationUnavailable`] for every failure: without a
/// duration there is no frame count, so the job cannot start.
pub trait DurationProbe {
    /// Duration of `audio` in seconds.
    fn duration_secs(&self, audio: &Path) -> LyricResult<f64>;
}

/// Probe durations with the system `ffprobe` binary.
#[derive(Clone, Debug)]
pub struct FfprobeDuration {
    /// Program to run; `ffprobe` from `PATH` by default.
    pub program: PathBuf,
}

impl Default for FfprobeDuration {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }
}

impl DurationProbe for FfprobeDuration {
    #[tracing::instrument(skip(self))]
    fn duration_secs(&self, audio: &Path) -> LyricResult<f64> {
        if !audio.is_file() {
            return Err(LyricError::duration(format!(
                "audio file '{}' does not exist",
                audio.display()
            )));
        }

        let out = std::process::Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(audio)
            .output()
            .map_err(|e| LyricError::duration(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(LyricError::duration(format!(
                "ffprobe failed for '{}': {}",
                audio.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        parse_duration(&String::from_utf8_lossy(&out.stdout))
    }
}

/// A duration that is already known, e.g. from the job request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedDuration(pub f64);

impl DurationProbe for FixedDuration {
    fn duration_secs(&self, _audio: &Path) -> LyricResult<f64> {
        check_duration(self.0)
    }
}

fn parse_duration(stdout: &str) -> LyricResult<f64> {
    let s = stdout.trim();
    let secs = s
        .parse::<f64>()
        .map_err(|_| LyricError::duration(format!("ffprobe printed '{s}', not a duration")))?;
    check_duration(secs)
}

/// Reject durations that cannot produce a frame count.
pub fn check_duration(secs: f64) -> LyricResult<f64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(LyricError::duration(format!(
            "audio duration {secs} is not a finite, non-negative number of seconds"
        )));
    }
    Ok(secs)
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    std::process::Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
