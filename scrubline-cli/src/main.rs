use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use scrubline::{Evaluator, LayoutSnapshot, PageSession, PageSpec, ResolvedPage, SessionOpts};
use sha2::{Digest as _, Sha256};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "scrubline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a page manifest.
    Validate(ValidateArgs),
    /// Evaluate one frame and print it as JSON.
    Frame(FrameArgs),
    /// Evaluate evenly spaced frames over the whole scroll range.
    Sweep(SweepArgs),
    /// Print the snap target for a settled scroll position.
    Snap(SnapArgs),
    /// Write a built-in page manifest and its reference layout.
    Preset(PresetArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input page manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PageInput {
    /// Input page manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Layout snapshot JSON measured without pin spacers.
    #[arg(long)]
    layout: PathBuf,

    /// Session options JSON; overrides the manifest's `session` object.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: PageInput,

    /// Scroll offset in pixels.
    #[arg(long)]
    scroll: f64,

    /// Pretty-print the frame.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    input: PageInput,

    /// Number of frames, evenly spaced from 0 to the maximum scroll.
    #[arg(long, default_value_t = 60)]
    count: usize,

    /// Write frames as JSON lines here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print only a SHA-256 digest of the frames.
    #[arg(long, default_value_t = false)]
    digest: bool,
}

#[derive(Parser, Debug)]
struct SnapArgs {
    #[command(flatten)]
    input: PageInput,

    /// Settled position as a fraction of the scrollable distance.
    #[arg(long, conflicts_with = "px")]
    at: Option<f64>,

    /// Settled position in pixels.
    #[arg(long)]
    px: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Salon,
}

#[derive(Parser, Debug)]
struct PresetArgs {
    /// Preset to write.
    #[arg(value_enum)]
    name: Preset,

    /// Output manifest path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the preset's reference layout here.
    #[arg(long)]
    layout_out: Option<PathBuf>,

    /// Viewport width for the reference layout.
    #[arg(long, default_value_t = 1440.0)]
    width: f64,

    /// Viewport height for the reference layout.
    #[arg(long, default_value_t = 900.0)]
    height: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Snap(args) => cmd_snap(args),
        Command::Preset(args) => cmd_preset(args),
    }
}

fn load_page(path: &Path) -> anyhow::Result<PageSpec> {
    let page = PageSpec::from_path(path)
        .with_context(|| format!("load manifest '{}'", path.display()))?;
    tracing::debug!(sections = page.sections.len(), path = %path.display(), "manifest loaded");
    Ok(page)
}

fn load_layout(path: &Path) -> anyhow::Result<LayoutSnapshot> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read layout '{}'", path.display()))?;
    LayoutSnapshot::from_json(&s).with_context(|| format!("parse layout '{}'", path.display()))
}

impl PageInput {
    fn load(&self) -> anyhow::Result<(PageSpec, SessionOpts, LayoutSnapshot)> {
        let page = load_page(&self.in_path)?;
        let opts = match &self.config {
            Some(path) => SessionOpts::from_path(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => page.session_opts(),
        };
        let layout = load_layout(&self.layout)?;
        Ok((page, opts, layout))
    }

    fn resolve(&self) -> anyhow::Result<(ResolvedPage, SessionOpts)> {
        let (page, opts, layout) = self.load()?;
        let resolved =
            ResolvedPage::resolve(&page.sections, layout).context("resolve page layout")?;
        Ok((resolved, opts))
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let page = load_page(&args.in_path)?;
    let pinned = page
        .sections
        .iter()
        .filter(|s| s.pinned_binding().is_some())
        .count();
    println!("ok: {} sections, {} pinned", page.sections.len(), pinned);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (page, opts) = args.input.resolve()?;
    let frame = Evaluator::eval_at(&page, args.scroll, opts.nav_scrolled_threshold_px);
    let json = if args.pretty {
        serde_json::to_string_pretty(&frame)?
    } else {
        serde_json::to_string(&frame)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let (page, opts) = args.input.resolve()?;
    let frames = Evaluator::sweep(&page, args.count, opts.nav_scrolled_threshold_px);

    let mut lines = Vec::with_capacity(frames.len());
    for frame in &frames {
        lines.push(serde_json::to_string(frame)?);
    }

    if args.digest {
        let mut hasher = Sha256::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        println!("{:x}", hasher.finalize());
        return Ok(());
    }

    match &args.out {
        Some(path) => {
            let mut body = lines.join("\n");
            body.push('\n');
            std::fs::write(path, body)
                .with_context(|| format!("write frames '{}'", path.display()))?;
            eprintln!("wrote {} frames to {}", frames.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in &lines {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

fn cmd_snap(args: SnapArgs) -> anyhow::Result<()> {
    let (page, opts, layout) = args.input.load()?;
    let settle = opts.settle_delay();
    let mut session = PageSession::from_page(
        &PageSpec {
            session: Some(opts),
            ..page
        },
        Duration::ZERO,
    )
    .context("mount sections")?;
    session.set_layout(layout).context("apply layout")?;
    session.tick(0.0, Duration::ZERO);

    let max = session.max_scroll();
    let fraction = match (args.at, args.px) {
        (Some(v), _) => v,
        (None, Some(px)) if max > 0.0 => px / max,
        (None, Some(_)) => 0.0,
        (None, None) => anyhow::bail!("one of --at or --px is required"),
    };
    let target = session.snap_target(fraction);
    let tween = session.on_momentum_settled(fraction * max, settle);

    let report = serde_json::json!({
        "max_scroll": max,
        "from": fraction,
        "to": target,
        "to_px": target * max,
        "tween": tween,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_preset(args: PresetArgs) -> anyhow::Result<()> {
    let (page, layout) = match args.name {
        Preset::Salon => {
            let viewport = scrubline::Viewport::new(args.width, args.height)
                .context("reference viewport")?;
            (
                scrubline_std::salon::page().context("build salon page")?,
                scrubline_std::salon::reference_layout(viewport),
            )
        }
    };

    let json = page.to_json_pretty()?;
    match &args.out {
        Some(path) => {
            write_file(path, &json)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    if let Some(path) = &args.layout_out {
        write_file(path, &serde_json::to_string_pretty(&layout)?)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn write_file(path: &Path, body: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("write '{}'", path.display()))
}
