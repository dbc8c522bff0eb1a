use std::time::{Duration, Instant};

use anyhow::Context as _;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: f64,
    height: f64,
    frames: usize,
    warmup: u32,
    repeats: u32,
    snaps: usize,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    resolve: Duration,
    session_ticks: Duration,
    sweep: Duration,
    snap_queries: Duration,
    wall_total: Duration,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if !(args.width > 0.0 && args.height > 0.0) {
        anyhow::bail!("--width/--height must be > 0");
    }
    if args.frames < 2 {
        anyhow::bail!("--frames must be >= 2");
    }

    let page = scrubline_std::salon::page().context("build salon page")?;
    let viewport =
        scrubline::Viewport::new(args.width, args.height).context("bench viewport")?;
    let layout = scrubline_std::salon::reference_layout(viewport);

    if args.warmup > 0 {
        eprintln!("warmup: {} run(s)", args.warmup);
        for _ in 0..args.warmup {
            let _ = run_once(&args, &page, &layout)?;
        }
    }

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), {frames} frames/run, viewport {w}x{h}, {snaps} snap queries/run",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        frames = args.frames,
        w = args.width,
        h = args.height,
        snaps = args.snaps,
    );

    let mut runs = Vec::<RunMetrics>::with_capacity(args.repeats as usize);
    let mut digest: Option<String> = None;
    for i in 0..args.repeats {
        let (metrics, run_digest) = run_once(&args, &page, &layout)?;
        let first = digest.get_or_insert_with(|| run_digest.clone());
        if *first != run_digest {
            anyhow::bail!("run {i}: sweep digest {run_digest} differs from {first}");
        }
        runs.push(metrics);
    }

    if let Some(d) = &digest {
        eprintln!("sweep sha256: {d}");
    }
    report_percentiles(&runs);
    Ok(())
}

fn run_once(
    args: &BenchArgs,
    page: &scrubline::PageSpec,
    layout: &scrubline::LayoutSnapshot,
) -> anyhow::Result<(RunMetrics, String)> {
    let wall = Instant::now();
    let mut m = RunMetrics::default();

    let t = Instant::now();
    let resolved = scrubline::ResolvedPage::resolve(&page.sections, layout.clone())
        .context("resolve page")?;
    m.resolve = t.elapsed();

    let opts = page.session_opts();
    let max = resolved.max_scroll();
    let step = max / (args.frames - 1) as f64;

    // Scroll down and back up at a fixed 60 Hz tick.
    let t = Instant::now();
    let mut session =
        scrubline::PageSession::from_page(page, Duration::ZERO).context("mount sections")?;
    session
        .set_layout(layout.clone())
        .context("apply layout")?;
    let frame_dt = Duration::from_micros(16_667);
    let mut now = Duration::ZERO;
    for i in (0..args.frames).chain((0..args.frames).rev()) {
        let frame = session.tick(step * i as f64, now);
        std::hint::black_box(&frame);
        now += frame_dt;
    }
    m.session_ticks = t.elapsed();

    let t = Instant::now();
    let frames =
        scrubline::Evaluator::sweep(&resolved, args.frames, opts.nav_scrolled_threshold_px);
    m.sweep = t.elapsed();

    let mut hasher = sha2::Sha256::new();
    for frame in &frames {
        let line = serde_json::to_string(frame).context("serialize frame")?;
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hex(&hasher.finalize());

    let t = Instant::now();
    let denom = args.snaps.max(1) as f64;
    for i in 0..args.snaps {
        let v = i as f64 / denom;
        std::hint::black_box(session.snap_target(v));
    }
    m.snap_queries = t.elapsed();

    m.wall_total = wall.elapsed();
    Ok((m, digest))
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 1440.0,
        height: 900.0,
        frames: 600,
        warmup: 1,
        repeats: 100,
        snaps: 1000,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_f64(args.next(), "--width")?,
            "--height" => out.height = parse_f64(args.next(), "--height")?,
            "--frames" => out.frames = parse_usize(args.next(), "--frames")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--snaps" => out.snaps = parse_usize(args.next(), "--snaps")?,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"scrubline-bench

Drives the salon page through full scroll passes and reports p50/p90/p99 per stage.
Every run's stateless sweep is hashed; runs must agree.

Usage:
  cargo run -q -p scrubline-bench --release
  cargo run -q -p scrubline-bench --release -- --repeats 50 --frames 1200

Args:
  --width N     viewport width (default 1440)
  --height N    viewport height (default 900)
  --frames N    frames per scroll pass (default 600)
  --warmup N    (default 1)
  --repeats N   (default 100)
  --snaps N     snap target queries per run (default 1000)
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_usize(v: Option<String>, flag: &str) -> anyhow::Result<usize> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<usize>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_f64(v: Option<String>, flag: &str) -> anyhow::Result<f64> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<f64>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn report_percentiles(runs: &[RunMetrics]) {
    type Getter = fn(&RunMetrics) -> Duration;
    type Field = (&'static str, Getter);

    fn collect(runs: &[RunMetrics], f: fn(&RunMetrics) -> Duration) -> Vec<Duration> {
        let mut v = runs.iter().map(f).collect::<Vec<_>>();
        v.sort_by_key(|d| d.as_nanos());
        v
    }

    fn p(v: &[Duration], p: f64) -> Duration {
        if v.is_empty() {
            return Duration::ZERO;
        }
        let n = v.len();
        let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
        v[rank - 1]
    }

    fn fmt_ms(d: Duration) -> String {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    }

    let fields: &[Field] = &[
        ("resolve", |m| m.resolve),
        ("session_ticks", |m| m.session_ticks),
        ("sweep", |m| m.sweep),
        ("snap_queries", |m| m.snap_queries),
        ("wall_total", |m| m.wall_total),
    ];

    eprintln!("\npercentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let v = collect(runs, *getter);
        let p50 = p(&v, 0.50);
        let p90 = p(&v, 0.90);
        let p99 = p(&v, 0.99);
        eprintln!(
            "  {name:14} p50={p50:>10}  p90={p90:>10}  p99={p99:>10}",
            name = *name,
            p50 = fmt_ms(p50),
            p90 = fmt_ms(p90),
            p99 = fmt_ms(p99)
        );
    }
}
