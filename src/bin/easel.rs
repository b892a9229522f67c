use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use easel::{
    AutonomyOutcome, Canvas, CompletionEvent, DrawingEngine, EaselResult, EngineConfig,
    FeltState, ManualClock, StrategyRegistry, TickAction,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "easel", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the engine with a synthetic felt state.
    Simulate(SimulateArgs),
    /// Write the raster of a state file as a PNG.
    Export(ExportArgs),
    /// Print a JSON summary of a state file.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Number of ticks to run.
    #[arg(long, default_value_t = 2_000)]
    ticks: u64,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas state file (loaded if present, written periodically).
    #[arg(long)]
    state: Option<PathBuf>,

    /// Directory for finished drawings.
    #[arg(long)]
    drawings: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 1.0)]
    tick_secs: f64,

    /// Strategy to request before the first tick.
    #[arg(long)]
    era: Option<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[arg(long)]
    state: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[arg(long)]
    state: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Slowly drifting felt state; each channel is a sine with its own period.
fn synthetic_felt(t: f64) -> FeltState {
    let wave = |period: f64, phase: f64| 0.5 + 0.4 * (t / period + phase).sin();
    FeltState::new(
        wave(900.0, 0.0),
        wave(1_300.0, 1.0),
        wave(700.0, 2.0),
        wave(1_100.0, 3.0),
    )
    .with_light(Some(150.0 + 140.0 * (t / 3_600.0).sin()), 0.2)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.tick_secs.is_finite() && args.tick_secs > 0.0,
        "--tick-secs must be > 0"
    );
    let mut config = read_config(args.config.as_deref())?;
    if args.state.is_some() {
        config.state_path = args.state;
    }
    if args.drawings.is_some() {
        config.drawings_dir = args.drawings;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let clock = ManualClock::new(0.0);
    let mut engine =
        DrawingEngine::new(config, StrategyRegistry::with_builtin(), Box::new(clock.clone()))
            .context("start engine")?;

    let sessions: Arc<Mutex<Vec<CompletionEvent>>> = Arc::default();
    let sink = Arc::clone(&sessions);
    engine.add_observer(Box::new(move |e: &CompletionEvent| -> EaselResult<()> {
        if let Ok(mut v) = sink.lock() {
            v.push(e.clone());
        }
        Ok(())
    }));

    if let Some(era) = &args.era {
        let switch = engine.request_era(era)?;
        tracing::info!(era = %era, ?switch, "era requested");
    }

    let mut marks = 0u64;
    for tick in 0..args.ticks {
        let t = tick as f64 * args.tick_secs;
        let felt = synthetic_felt(t);
        if let TickAction::Drew(_) = engine.draw(&felt).action {
            marks += 1;
        }
        if let AutonomyOutcome::SaveFailed { reason } = engine.check_autonomy(&felt) {
            tracing::warn!(%reason, tick, "drawing could not be saved");
        }
        engine.persist_if_due().context("persist state")?;
        clock.advance(args.tick_secs);
    }
    engine.persist().context("persist state")?;

    let sessions = sessions.lock().map(|v| v.clone()).unwrap_or_default();
    let canvas = engine.canvas();
    let summary = serde_json::json!({
        "ticks": args.ticks,
        "marks": marks,
        "sessions_completed": sessions.len(),
        "sessions": sessions,
        "era": engine.era(),
        "current": {
            "pixels": canvas.pixel_count(),
            "phase": engine.dynamics().arc_phase(),
            "coherence": engine.dynamics().coherence(),
            "attention": engine.dynamics().attention(),
            "compositional_satisfaction": canvas.compositional_satisfaction(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_canvas(state: &Path, config: &EngineConfig) -> (Canvas, easel::LoadReport) {
    Canvas::load_from_disk(
        state,
        config.canvas_size(),
        config.canvas.recent_capacity,
        &config.default_era,
    )
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let (canvas, report) = load_canvas(&args.state, &config);
    anyhow::ensure!(
        report.status == easel::LoadStatus::Loaded,
        "no usable canvas state in '{}'",
        args.state.display()
    );
    let png = canvas.encode_png(config.canvas.background)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    println!("wrote {} ({} pixels)", args.out.display(), canvas.pixel_count());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let (canvas, report) = load_canvas(&args.state, &config);
    let session = canvas.session();
    let summary = serde_json::json!({
        "status": format!("{:?}", report.status).to_lowercase(),
        "issues": report.issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "pixels": canvas.pixel_count(),
        "marks": canvas.mark_count(),
        "drawings_saved": canvas.drawings_saved(),
        "era": canvas.era(),
        "pending_era_switch": canvas.pending_era_switch(),
        "phase": canvas.phase(),
        "attention": session.attention,
        "eisv": session.eisv,
        "coherence_samples": session.coherence_history.len(),
        "compositional_satisfaction": canvas.compositional_satisfaction(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
