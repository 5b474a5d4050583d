//! Headless runner: drives the simulation at a fixed step, optionally from a
//! scripted command list, and writes the save on exit.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, LevelFilter};
use serde::Deserialize;

use wilds_sim::constants::HEADLESS_STEP;
use wilds_sim::events::GameEvent;
use wilds_sim::{EngineStatus, GameEngine, MoveInput, PlayerCommand, SimConfig};

/// Run the wilds simulation without a window
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save file to load from and write to
    #[arg(long)]
    save: Option<PathBuf>,

    /// Directory of JSON content definitions
    #[arg(long)]
    content: Option<PathBuf>,

    /// JSON list of timed commands: [{ "at": 1.5, "command": {...}, "move": {...} }]
    #[arg(long)]
    script: Option<PathBuf>,

    /// Turn on puffin profiling scopes
    #[arg(long)]
    profile: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// One scripted step. `move` replaces the held movement input from `at` on.
#[derive(Debug, Deserialize)]
struct ScriptEntry {
    at: f32,
    #[serde(default)]
    command: Option<PlayerCommand>,
    #[serde(default, rename = "move")]
    movement: Option<MoveInput>,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn load_config(args: &Args) -> Result<SimConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(save) = &args.save {
        config.save_path = Some(save.clone());
    }
    if let Some(content) = &args.content {
        config.content_dir = Some(content.clone());
    }
    config.validate()?;
    Ok(config)
}

fn load_script(args: &Args) -> Result<Vec<ScriptEntry>, Box<dyn Error>> {
    let Some(path) = &args.script else {
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)?;
    let mut script: Vec<ScriptEntry> = serde_json::from_str(&raw)?;
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    info!("loaded {} script entries from {}", script.len(), path.display());
    Ok(script)
}

#[derive(Default)]
struct Tally {
    kills: u32,
    quests: u32,
    level_ups: u32,
    defeats: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyDefeated { .. } => self.kills += 1,
            GameEvent::QuestCompleted { quest } => {
                info!("quest complete: {quest}");
                self.quests += 1;
            }
            GameEvent::LevelUp { .. } => self.level_ups += 1,
            GameEvent::PlayerDefeated { .. } => self.defeats += 1,
            _ => {}
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(args)?;
    let script = load_script(args)?;
    if args.profile {
        puffin::set_scopes_on(true);
    }

    let mut engine = GameEngine::new(config)?;
    let steps = (args.seconds.max(0.0) / HEADLESS_STEP).round() as u64;
    info!("running {steps} steps ({:.1}s simulated)", args.seconds);

    let mut held = MoveInput::default();
    let mut pending = script.into_iter().peekable();
    let mut tally = Tally::default();
    for step in 0..steps {
        if args.profile {
            puffin::GlobalProfiler::lock().new_frame();
        }
        let now = step as f32 * HEADLESS_STEP;
        let mut commands = Vec::new();
        while let Some(entry) = pending.next_if(|e| e.at <= now) {
            if let Some(movement) = entry.movement {
                held = movement;
            }
            commands.extend(entry.command);
        }

        let report = engine.frame(HEADLESS_STEP, held, &commands);
        for outcome in &report.outcomes {
            info!("t={:.2} {outcome:?}", report.time);
        }
        report.events.iter().for_each(|e| tally.record(e));
        if let EngineStatus::Errored { reason } = &report.status {
            error!("stopping at t={:.2}: {reason}", report.time);
            break;
        }
    }

    if let Some(view) = engine.player_view() {
        info!(
            "t={:.1} level {} ({} / {} xp), hp {:.0}/{:.0}, mana {:.0}/{:.0}, gold {}, in {}",
            engine.state.clock.time,
            view.level,
            view.xp,
            view.xp_to_next,
            view.health,
            view.max_health,
            view.mana,
            view.max_mana,
            view.gold,
            view.zone,
        );
    }
    info!(
        "{} kills, {} quests completed, {} level ups, {} defeats",
        tally.kills, tally.quests, tally.level_ups, tally.defeats
    );

    if engine.save()? {
        info!("final save written");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
