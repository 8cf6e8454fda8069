//! Command-line host for the starcrawl core.
//!
//! # Responsibility
//! - Drive the starfield headlessly with a timer-based tick loop.
//! - Import, export and show the stored crawl text without the UI.

use clap::{Parser, Subcommand};
use log::info;
use starcrawl_core::db::{open_db, open_db_in_memory};
use starcrawl_core::{
    default_log_level, init_logging, CrawlConfig, DrawList, EditorSession, FrameOutcome,
    SqliteTextRepository,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

const DB_FILE_NAME: &str = "starcrawl.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "starcrawl", version, about = "Opening-crawl editor core")]
struct Cli {
    /// Text store location
    #[arg(long, global = true, env = "STARCRAWL_DB_PATH")]
    db: Option<PathBuf>,

    /// JSON file with (partial) crawl settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check core linkage
    Ping,

    /// Run the starfield for a number of ticks and report what it drew
    Simulate {
        #[arg(long, default_value_t = 800.0)]
        width: f32,

        #[arg(long, default_value_t = 600.0)]
        height: f32,

        /// Number of ticks to run
        #[arg(long, default_value_t = 120)]
        frames: u32,

        /// Milliseconds between ticks
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,

        /// Wheel deltaY fed before every tick
        #[arg(long, default_value_t = -8.0, allow_hyphen_values = true)]
        wheel: f64,

        /// Fixed RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Replace the stored text with a .txt or .md file
    Import {
        file: PathBuf,
    },

    /// Write the stored text to a timestamp-named file
    Export {
        /// Target directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the stored text
    Show {
        /// Print crawl rows instead of raw text
        #[arg(long)]
        lines: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    start_logging(cli.log_dir.as_deref(), cli.log_level.as_deref())?;
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Ping => {
            println!("starcrawl_core ping={}", starcrawl_core::ping());
            println!("starcrawl_core version={}", starcrawl_core::core_version());
            Ok(())
        }
        Command::Simulate {
            width,
            height,
            frames,
            tick_ms,
            wheel,
            seed,
        } => {
            let mut config = config;
            if seed.is_some() {
                config.starfield.seed = seed;
            }
            simulate(config, width, height, frames, tick_ms, wheel)
        }
        Command::Import { file } => {
            let mut session = open_session(cli.db, config)?;
            session.import_path(&file).map_err(|err| err.to_string())?;
            println!("imported {} ({} bytes)", file.display(), session.text().len());
            Ok(())
        }
        Command::Export { out_dir } => {
            let session = open_session(cli.db, config)?;
            let file = session.export_now();
            let target = out_dir.join(&file.file_name);
            std::fs::write(&target, &file.bytes)
                .map_err(|err| format!("cannot write {}: {err}", target.display()))?;
            println!("{}", target.display());
            Ok(())
        }
        Command::Show { lines } => {
            let session = open_session(cli.db, config)?;
            if lines {
                for line in session.lines() {
                    println!("{line}");
                }
            } else {
                println!("{}", session.text());
            }
            Ok(())
        }
    }
}

fn start_logging(log_dir: Option<&Path>, level: Option<&str>) -> Result<(), String> {
    let log_dir = resolve_log_dir(log_dir)?;
    let level = level.unwrap_or(default_log_level());
    init_logging(level, &log_dir.to_string_lossy(), true).map_err(|err| err.to_string())
}

/// Relative `--log-dir` values are taken from the working directory.
fn resolve_log_dir(log_dir: Option<&Path>) -> Result<PathBuf, String> {
    match log_dir {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .map_err(|err| format!("cannot resolve log dir {}: {err}", dir.display())),
        None => Ok(std::env::temp_dir().join("starcrawl-logs")),
    }
}

fn load_config(path: Option<&Path>) -> Result<CrawlConfig, String> {
    let Some(path) = path else {
        return Ok(CrawlConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    CrawlConfig::from_json_str(&raw).map_err(|err| format!("{}: {err}", path.display()))
}

fn open_session(
    db: Option<PathBuf>,
    config: CrawlConfig,
) -> Result<EditorSession<SqliteTextRepository>, String> {
    let path = db.unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
    let conn = open_db(&path).map_err(|err| format!("{}: {err}", path.display()))?;
    Ok(EditorSession::open(SqliteTextRepository::new(conn), config))
}

fn simulate(
    config: CrawlConfig,
    width: f32,
    height: f32,
    frames: u32,
    tick_ms: u64,
    wheel: f64,
) -> Result<(), String> {
    // Simulation never touches the user's stored text.
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let mut session = EditorSession::open(SqliteTextRepository::new(conn), config);
    session.mount(width, height);

    let tick = Duration::from_millis(tick_ms);
    let started = Instant::now();
    let mut list = DrawList::new();
    let (mut drawn, mut skipped, mut unavailable) = (0u32, 0u32, 0u32);

    for _ in 0..frames {
        session.on_wheel(wheel);
        list.begin_frame();
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        match session.on_frame(now_ms, Some(&mut list)) {
            FrameOutcome::Drawn { .. } => drawn += 1,
            FrameOutcome::Skipped => skipped += 1,
            FrameOutcome::Unavailable => unavailable += 1,
            FrameOutcome::Stopped => break,
        }
        thread::sleep(tick);
    }
    session.teardown();

    let field = session.animator().field();
    let [far, mid, near] = field.layer_counts();
    info!(
        "event=simulate module=cli status=ok frames={} drawn={} skipped={} elapsed_ms={}",
        frames,
        drawn,
        skipped,
        started.elapsed().as_millis()
    );
    println!("frames={frames} drawn={drawn} skipped={skipped} unavailable={unavailable}");
    println!(
        "stars={} far={far} mid={mid} near={near} last_frame_circles={}",
        field.len(),
        list.circle_count()
    );
    println!(
        "scalar={} logo_visible={} transform={}",
        session.scroll_scalar(),
        session.logo_visible(),
        session.transform().css()
    );
    Ok(())
}
