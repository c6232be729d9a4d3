use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bandwave::{Analyzer, BandSet, TrackAnalysis, WaveformRenderer};

#[derive(Parser, Debug)]
#[command(name = "bandwave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an audio file (requires `ffmpeg` and `audiowaveform` on PATH).
    Render(RenderArgs),
    /// Render from peak JSON files produced earlier by `audiowaveform`.
    Peaks(PeaksArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input audio file.
    input: PathBuf,

    /// Output image path; format follows the extension.
    #[arg(default_value = "waveform.png")]
    out: PathBuf,

    /// Image width in pixels.
    #[arg(default_value_t = 4000)]
    width: u32,

    /// Image height in pixels.
    #[arg(default_value_t = 350)]
    height: u32,
}

#[derive(Parser, Debug)]
struct PeaksArgs {
    /// Peaks of the unfiltered track.
    #[arg(long)]
    original: PathBuf,

    /// Peaks of the sub band (below 60 Hz).
    #[arg(long)]
    sub: PathBuf,

    /// Peaks of the bass band (60-250 Hz).
    #[arg(long)]
    bass: PathBuf,

    /// Peaks of the low-mid band (250-500 Hz).
    #[arg(long)]
    lowmid: PathBuf,

    /// Peaks of the mid band (500-2000 Hz).
    #[arg(long)]
    mid: PathBuf,

    /// Peaks of the high-mid band (2-6 kHz).
    #[arg(long)]
    highmid: PathBuf,

    /// Peaks of the high band (above 6 kHz).
    #[arg(long)]
    high: PathBuf,

    /// Title text; defaults to the original peaks file name without its extension.
    #[arg(long)]
    label: Option<String>,

    /// Output image path; format follows the extension.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 4000)]
    width: u32,

    #[arg(long, default_value_t = 350)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Peaks(args) => cmd_peaks(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    tracing::info!(
        input = %args.input.display(),
        out = %args.out.display(),
        width = args.width,
        height = args.height,
        "rendering"
    );

    let analysis = Analyzer::system()
        .analyze(&args.input)
        .with_context(|| format!("analyze '{}'", args.input.display()))?;
    tracing::info!(
        label = %analysis.label,
        duration_secs = analysis.duration_secs,
        "analyzed track"
    );

    write_image(&analysis, args.out, args.width, args.height)
}

fn cmd_peaks(args: PeaksArgs) -> anyhow::Result<()> {
    let bands = BandSet([
        args.sub,
        args.bass,
        args.lowmid,
        args.mid,
        args.highmid,
        args.high,
    ]);
    let label = args.label.unwrap_or_else(|| {
        args.original
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let analysis = TrackAnalysis::from_peak_files(&args.original, &bands, label)
        .with_context(|| "load peak files")?;

    write_image(&analysis, args.out, args.width, args.height)
}

fn write_image(
    analysis: &TrackAnalysis,
    out: PathBuf,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let req = analysis.render_request(out, width, height);
    WaveformRenderer::new()
        .render_to_file(&analysis.data, &req)
        .with_context(|| format!("render '{}'", req.out_path.display()))?;

    eprintln!("wrote {}", req.out_path.display());
    Ok(())
}
