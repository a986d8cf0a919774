//! Maze Escape demo entry point
//!
//! Generates a maze and lets the autopilot play it through synthetic tilt
//! samples, in real time or on a simulated clock with `--fast`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use maze_escape::scores::ScoreBook;
use maze_escape::session::{RecordingNavigator, format_clock};
use maze_escape::sim::{next_step, seed_from_clock};
use maze_escape::{Session, SessionEvent, Settings, TiltSample};

/// Frame spacing of the synthetic sensor feed
const FRAME_MS: u64 = 50;
/// Tilt magnitude the autopilot applies
const AUTOPILOT_TILT: f32 = 6.0;

#[derive(Parser)]
#[command(name = "maze-escape", version, about = "Autopilot demo of the tilt maze")]
struct Args {
    /// Maze seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Score book JSON file, saved after the run
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Run on a simulated clock instead of real time
    #[arg(long)]
    fast: bool,
}

fn main() {
    env_logger::init();
    log::info!("Maze Escape (native) starting...");

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring settings file: {e}");
            Settings::default()
        }),
        None => Settings::default(),
    };

    let book = match &args.scores {
        Some(path) => ScoreBook::load(path)
            .unwrap_or_else(|e| {
                log::warn!("Starting a new score book: {e}");
                ScoreBook::new()
            })
            .with_autosave(path),
        None => ScoreBook::new(),
    };

    let seed = args.seed.unwrap_or_else(seed_from_clock);
    let mut session = match Session::new(settings, seed, book, RecordingNavigator::default()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("cannot start session: {e}");
            std::process::exit(1);
        }
    };

    println!("{}", session.maze());
    run(&mut session, args.fast);
    println!("{}", session.maze().render_with_token(Some(session.position())));

    if let Some(summary) = session.summary() {
        println!(
            "{:?}: score {} with {} left (seed {})",
            summary.reason,
            summary.score,
            format_clock(summary.remaining_secs),
            summary.seed
        );
    }
    if let Some(top) = session.sink().top_score() {
        println!("Best run: {top}");
    }
}

/// Drive the session frame by frame until it ends
fn run(session: &mut Session<ScoreBook, RecordingNavigator>, fast: bool) {
    let started = Instant::now();
    let mut clock_ms = 0u64;

    while session.is_running() {
        let previous_ms = clock_ms;
        if fast {
            clock_ms += FRAME_MS;
        } else {
            std::thread::sleep(Duration::from_millis(FRAME_MS));
            clock_ms = started.elapsed().as_millis() as u64;
        }

        if let Some(dir) = next_step(session.maze(), session.position()) {
            session.on_tilt(TiltSample::toward(dir, AUTOPILOT_TILT, clock_ms));
        }
        session.advance(clock_ms - previous_ms);

        for event in session.drain_events() {
            match event {
                SessionEvent::BonusCollected { at } => log::info!("Bonus at {at}"),
                SessionEvent::BombHit { at } => log::info!("Bomb at {at}"),
                SessionEvent::GoalReached { points } => log::info!("Goal! +{points}"),
                SessionEvent::TimedOut => log::info!("Time's up"),
                _ => {}
            }
        }
    }
}
