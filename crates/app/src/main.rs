use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use magic_mirror_core::{
    AssetCatalog, CannedRater, Command, FrameEvent, FrameLoop, LandmarkSource, LoopOutcome,
    MirrorConfig, MirrorContext, MirrorState, ScriptedSource, StyleAdvisor,
};
use tracing_subscriber::EnvFilter;

fn main() -> magic_mirror_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => MirrorConfig::load(path)?,
        None => MirrorConfig::default(),
    };

    match cli.command {
        Commands::Demo => run_demo(config, cli.frames),
        Commands::Replay { input, summary } => run_replay(config, cli.frames, &input, summary.as_deref()),
        Commands::Catalog => print_catalog(),
    }
}

fn run_demo(config: MirrorConfig, frames: Option<u64>) -> magic_mirror_core::Result<()> {
    tracing::info!(?frames, "starting demo session");

    let catalog = AssetCatalog::builtin();
    let source = ScriptedSource::demo(&config, &catalog)?;
    let outcome = run_session(config, &catalog, source, frames, true)?;
    log_outcome(&outcome);
    Ok(())
}

fn run_replay(
    config: MirrorConfig,
    frames: Option<u64>,
    input: &Path,
    summary: Option<&Path>,
) -> magic_mirror_core::Result<()> {
    tracing::info!(?input, ?summary, "replaying landmark recording");

    let catalog = AssetCatalog::builtin();
    let source = ScriptedSource::load(input)?;
    let outcome = run_session(config, &catalog, source, frames, false)?;
    log_outcome(&outcome);

    if let Some(path) = summary {
        let report = serde_json::json!({
            "frames": outcome.frames,
            "score": outcome.state.score(),
            "category": outcome.state.category(),
            "stickers": outcome.state.snapshot().as_ref(),
        });
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(?path, "summary written");
    }
    Ok(())
}

fn run_session<S: LandmarkSource>(
    config: MirrorConfig,
    catalog: &AssetCatalog,
    source: S,
    frames: Option<u64>,
    rate_style: bool,
) -> magic_mirror_core::Result<LoopOutcome> {
    let mut frame_loop = FrameLoop::new(source, &config.frame)
        .with_video(config.viewport.width as u32, config.viewport.height as u32);
    if let Some(frames) = frames {
        frame_loop = frame_loop.with_max_frames(frames);
    }
    if rate_style {
        // The headless demo has no camera snapshot; rate the config instead.
        let snapshot = serde_json::to_vec(&config)?;
        let _ = frame_loop.commands().send(Command::RequestStyleRating(snapshot));
    }

    let mut advisor = StyleAdvisor::new(CannedRater);
    let mut ctx = MirrorContext::new(catalog).with_advisor(&mut advisor);
    let state = MirrorState::new(config, catalog);

    frame_loop.run(state, &mut ctx, |_, events| {
        for event in events {
            match event {
                FrameEvent::Swipe { .. } => tracing::debug!(?event, "frame event"),
                FrameEvent::StyleCritique { text } => tracing::info!(critique = %text, "style critique"),
                _ => tracing::info!(?event, "frame event"),
            }
        }
    })
}

fn log_outcome(outcome: &LoopOutcome) {
    let snapshot = outcome.state.snapshot();
    tracing::info!(
        frames = outcome.frames,
        reason = ?outcome.reason,
        stickers = snapshot.len(),
        score = outcome.state.score(),
        "session finished"
    );
    for sticker in snapshot.iter() {
        tracing::info!(
            id = %sticker.id,
            asset = %sticker.asset_id,
            anchor = sticker.binding.anchor.as_str(),
            x = sticker.transform.position.x,
            y = sticker.transform.position.y,
            "sticker"
        );
    }
}

fn print_catalog() -> magic_mirror_core::Result<()> {
    let catalog = AssetCatalog::builtin();
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Gesture-driven sticker mirror", long_about = None)]
struct Cli {
    /// JSON configuration file; missing fields use defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Stop after this many frames.
    #[arg(short, long, global = true)]
    frames: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the built-in synthetic session: pick a face, wear it, spawn effects.
    Demo,
    /// Replay a recorded landmark stream.
    Replay {
        /// JSON array of recorded frames.
        input: PathBuf,
        /// Where to write the final sticker snapshot.
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },
    /// Print the built-in asset catalog as JSON.
    Catalog,
}
