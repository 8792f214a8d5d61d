use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lyricwipe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a lyric video as MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the chunk plan of a transcript as JSON.
    Chunks(ChunksArgs),
}

#[derive(Args, Debug)]
struct JobArgs {
    /// Transcript JSON (`words.json`).
    #[arg(long)]
    words: PathBuf,

    /// Render config JSON; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lyric font file (TTF/OTF). Falls back to system fonts, then a built-in font.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Integer frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Print the resolved font (origin, family and SHA-256 of the font bytes).
    #[arg(long)]
    dump_font: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Audio track; its duration sets the video length.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Use this duration in seconds instead of probing the audio with `ffprobe`.
    #[arg(long)]
    duration: Option<f64>,

    /// Render frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Encoder executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Presentation time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ChunksArgs {
    /// Transcript JSON (`words.json`).
    #[arg(long)]
    words: PathBuf,

    /// Render config JSON; only `line_words` and `grace_secs` matter here.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct ChunkSummary {
    index: usize,
    words: usize,
    start: f64,
    end: f64,
    lines: [String; 2],
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Chunks(args) => cmd_chunks(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<lyricwipe::RenderConfig> {
    Ok(match path {
        Some(p) => lyricwipe::RenderConfig::from_json_file(p)?,
        None => lyricwipe::RenderConfig::default(),
    })
}

fn job_config(args: &JobArgs) -> anyhow::Result<lyricwipe::RenderConfig> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(font) = &args.font {
        cfg.font.path = Some(font.clone());
    }
    if let Some(fps) = args.fps {
        cfg.fps = lyricwipe::Fps::integer(fps)?;
    }
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = job_config(&args.job)?;
    let timeline = lyricwipe::load_timeline(&args.job.words)?;
    let font = lyricwipe::resolve_font(&cfg.font);
    if args.job.dump_font {
        dump_font(&font);
    }

    let probe: Box<dyn lyricwipe::DurationProbe> = match args.duration {
        Some(secs) => Box::new(lyricwipe::FixedDuration(secs)),
        None => Box::new(lyricwipe::FfprobeDuration::default()),
    };
    let opts = lyricwipe::RenderToMp4Opts {
        overwrite: true,
        encoder: args.ffmpeg,
        threading: lyricwipe::RenderThreading {
            parallel: args.parallel,
            threads: args.threads,
            ..lyricwipe::RenderThreading::default()
        },
        font: Some(font),
    };

    let stats = lyricwipe::render_to_mp4(
        &timeline,
        &args.audio,
        &args.out,
        &cfg,
        probe.as_ref(),
        &opts,
    )?;

    eprintln!(
        "wrote {} ({} frames, {} chunks)",
        args.out.display(),
        stats.frames_written,
        stats.chunks
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = job_config(&args.job)?;
    let timeline = lyricwipe::load_timeline(&args.job.words)?;
    let font = lyricwipe::resolve_font(&cfg.font);
    if args.job.dump_font {
        dump_font(&font);
    }

    let chunks = lyricwipe::build_chunks(&timeline, cfg.line_words)?;
    let chunk = lyricwipe::active_chunk(&chunks, args.time, cfg.grace_secs);
    let frame = lyricwipe::render_frame(chunk, args.time, &cfg, &font.source)?;
    let rgb = frame.to_rgb24(cfg.palette.background)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &rgb,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_chunks(args: ChunksArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let timeline = lyricwipe::load_timeline(&args.words)?;
    let chunks = lyricwipe::build_chunks(&timeline, cfg.line_words)?;

    let summary: Vec<ChunkSummary> = chunks
        .iter()
        .map(|c| {
            let (start, end) = c.window(cfg.grace_secs);
            let [top, bottom] = c.lines();
            ChunkSummary {
                index: c.index(),
                words: c.words().len(),
                start,
                end,
                lines: [line_text(top), line_text(bottom)],
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn line_text(words: &[lyricwipe::Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn dump_font(font: &lyricwipe::ResolvedFont) {
    eprintln!("font diagnostics:");
    eprintln!("  origin:  {:?}", font.origin);
    match &font.source {
        lyricwipe::FontSource::Outline {
            bytes,
            index,
            family,
        } => {
            eprintln!("  family:  {family}");
            eprintln!("  index:   {index}");
            eprintln!("  sha256:  {}", sha256_hex(bytes));
        }
        lyricwipe::FontSource::Builtin => eprintln!("  family:  built-in 5x7 bitmap"),
    }
    for w in &font.warnings {
        eprintln!("  warning: {w}");
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
