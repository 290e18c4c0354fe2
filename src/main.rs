use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::apple::ApplePlacement;
use grid_snake::config::{INPUT_POLL_MS, MAX_GRID_SIDE};
use grid_snake::engine::Engine;
use grid_snake::host::RngSource;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::renderer::{self, Overlay, View};
use grid_snake::score::{HighScore, scores_path};
use grid_snake::settings::{Settings, SettingsFile, load_settings, settings_path};
use grid_snake::terminal_host::TerminalHost;
use grid_snake::terminal_runtime::TerminalSession;
use grid_snake::ui::hud::HudInfo;
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Debug, Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
struct Cli {
    /// Grid width in cells
    #[arg(long, value_parser = clap::value_parser!(u16).range(4..=i64::from(MAX_GRID_SIDE)))]
    width: Option<u16>,

    /// Grid height in cells
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_GRID_SIDE)))]
    height: Option<u16>,

    /// How new apples are placed
    #[arg(long, value_enum)]
    placement: Option<Placement>,

    /// Seed for apple placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file to read instead of the default location
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Placement {
    /// Anywhere on the grid, possibly under the snake
    Independent,
    /// Only on cells the snake does not cover
    AvoidBody,
}

impl From<Placement> for ApplePlacement {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Independent => Self::Independent,
            Placement::AvoidBody => Self::AvoidBody,
        }
    }
}

/// Host-side screen flow around the engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Mode {
    Start,
    Playing,
    Paused,
    Finished,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_file = cli.settings.clone().unwrap_or_else(settings_path);
    let stored = load_settings(&settings_file)?;
    let settings = stored.merged_with(SettingsFile {
        width: cli.width,
        height: cli.height,
        placement: cli.placement.map(ApplePlacement::from),
        log_level: cli.log_level.clone(),
    });
    let settings = settings.resolve();

    let log_file = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_file, &settings.log_level)?;
    log::info!("starting with {settings:?}");

    run(&settings, cli.seed)
}

fn run(settings: &Settings, seed: Option<u64>) -> Result<()> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine = Engine::new(
        settings.grid,
        settings.placement,
        TerminalHost::new(),
        RngSource(rng),
    )?;

    let mut session = TerminalSession::enter().context("failed to set up the terminal")?;
    let size = session.terminal_mut().size()?;
    if !renderer::board_fits(size.width, size.height, engine.grid()) {
        let (columns, rows) = renderer::required_terminal_size(engine.grid());
        log::warn!(
            "terminal is {}x{} but the grid needs {columns}x{rows}",
            size.width,
            size.height
        );
    }
    let mut input = InputHandler::new(Duration::from_millis(INPUT_POLL_MS));
    let mut high_score = HighScore::load(scores_path());
    let mut previous_best = high_score.best();
    let mut mode = Mode::Start;
    let clock = Instant::now();
    let mut last_tick = Instant::now();

    loop {
        let overlay = match mode {
            Mode::Start => Overlay::Start,
            Mode::Playing => Overlay::None,
            Mode::Paused => Overlay::Paused,
            Mode::Finished => Overlay::Finished(engine.status()),
        };
        let host = engine.host();
        let view = View {
            frame: &host.frame,
            placement: engine.placement(),
            hud: HudInfo {
                score: host.score,
                high_score: high_score.best(),
                length: engine.body().len(),
                step_period_ms: host.step_period_ms,
            },
            previous_best,
            overlay,
        };
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, view))?;

        let size = session.terminal_mut().size()?;
        let fits = renderer::board_fits(size.width, size.height, engine.grid());
        if mode == Mode::Playing && !fits {
            log::info!("pausing, terminal shrank to {}x{}", size.width, size.height);
            mode = Mode::Paused;
        }

        if let Some(game_input) = input.poll_input()? {
            match (mode, game_input) {
                (_, GameInput::Quit) => break,
                (Mode::Start | Mode::Paused, _) if !fits => {}
                (Mode::Start, GameInput::Confirm) => {
                    mode = Mode::Playing;
                    last_tick = Instant::now();
                }
                (Mode::Finished, GameInput::Confirm) => {
                    engine.host_mut().clear_game();
                    engine.reset();
                    previous_best = high_score.best();
                    mode = Mode::Start;
                }
                (Mode::Playing, GameInput::Pause) => mode = Mode::Paused,
                (Mode::Paused, GameInput::Pause) => {
                    mode = Mode::Playing;
                    last_tick = Instant::now();
                }
                (Mode::Playing, GameInput::Direction(direction)) => {
                    engine.set_direction(direction);
                }
                _ => {}
            }
        }

        if mode == Mode::Playing && last_tick.elapsed() >= engine.step_interval() {
            last_tick = Instant::now();
            match engine.tick(clock.elapsed()) {
                Ok(report) if report.status.is_finished() => {
                    if high_score.record(engine.score()) {
                        log::info!("new high score {}", engine.score());
                    }
                    mode = Mode::Finished;
                }
                Ok(_) => {}
                Err(error) => {
                    log::warn!("{error}");
                    mode = Mode::Finished;
                }
            }
        }
    }

    log::info!("quitting");
    Ok(())
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("grid-snake");
    base.push("grid-snake.log");
    base
}

fn init_logging(path: &Path, level: &str) -> Result<()> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| anyhow::anyhow!("unknown log level {level:?}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    WriteLogger::init(level, Config::default(), file).context("failed to install logger")?;
    Ok(())
}
