//! Timed game session
//!
//! `Session` owns the maze, token position and countdown, and is the only
//! writer of that state. Drivers feed it elapsed wall-clock time and tilt
//! samples in sequence; a driver running the timer and the sensor feed on
//! separate threads must wrap the session in a single `Mutex`.

use serde::{Deserialize, Serialize};

use crate::consts::GAME_NAME;
use crate::error::MazeError;
use crate::input::{Debouncer, TiltSample, direction_for};
use crate::scores::ScoreSink;
use crate::settings::Settings;
use crate::sim::{CellEffect, Direction, Maze, MoveOutcome, Position, generate, move_token};

/// Leaves the game screen; called at most once per session
pub trait Navigator {
    fn go_home(&mut self);
}

/// Navigator that only counts how often it was asked to leave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    pub calls: usize,
}

impl Navigator for RecordingNavigator {
    fn go_home(&mut self) {
        self.calls += 1;
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Maze generated, countdown not started
    Idle,
    Running,
    /// Countdown frozen, input ignored
    Paused,
    /// Terminal
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    GoalReached,
    TimedOut,
    /// User confirmed leaving; no score is submitted
    Exited,
}

/// Countdown, score and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub remaining_secs: u32,
    pub score: i32,
    pub phase: SessionPhase,
}

/// Gameplay events for presentation layers (sound, effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    Moved {
        from: Position,
        to: Position,
        dir: Direction,
    },
    Blocked {
        at: Position,
        dir: Direction,
    },
    BonusCollected {
        at: Position,
    },
    BombHit {
        at: Position,
    },
    GoalReached {
        points: i32,
    },
    TimedOut,
    Paused,
    Resumed,
    Restarted,
    Exited,
}

/// Final result of an ended session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: i32,
    pub remaining_secs: u32,
    pub reason: EndReason,
    pub seed: u64,
}

/// One timed play-through of a single generated maze
#[derive(Debug)]
pub struct Session<S, N> {
    settings: Settings,
    seed: u64,
    maze: Maze,
    /// Maze as generated, for restarts
    pristine: Maze,
    position: Position,
    state: SessionState,
    debouncer: Debouncer,
    /// Milliseconds toward the next countdown tick
    accumulator_ms: u64,
    end_reason: Option<EndReason>,
    navigated: bool,
    events: Vec<SessionEvent>,
    sink: S,
    navigator: N,
}

impl<S: ScoreSink, N: Navigator> Session<S, N> {
    /// Generate the maze and start the countdown
    pub fn new(settings: Settings, seed: u64, sink: S, navigator: N) -> Result<Self, MazeError> {
        let mut session = Self::idle(settings, seed, sink, navigator)?;
        session.start();
        Ok(session)
    }

    /// Generate the maze without starting the countdown
    pub fn idle(settings: Settings, seed: u64, sink: S, navigator: N) -> Result<Self, MazeError> {
        settings.validate()?;
        let maze = generate(settings.rows, settings.cols, seed)?;
        Ok(Self {
            seed,
            pristine: maze.clone(),
            position: maze.start(),
            maze,
            state: SessionState {
                remaining_secs: settings.time_budget_secs,
                score: 0,
                phase: SessionPhase::Idle,
            },
            debouncer: Debouncer::new(settings.debounce_ms),
            accumulator_ms: 0,
            end_reason: None,
            navigated: false,
            events: Vec::new(),
            settings,
            sink,
            navigator,
        })
    }

    /// Idle -> Running; false in any other phase
    pub fn start(&mut self) -> bool {
        if self.state.phase != SessionPhase::Idle {
            return false;
        }
        self.state.phase = SessionPhase::Running;
        self.events.push(SessionEvent::Started);
        log::info!(
            "Session started: {}x{} maze, seed {}, {}s",
            self.maze.rows(),
            self.maze.cols(),
            self.seed,
            self.state.remaining_secs
        );
        true
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn score(&self) -> i32 {
        self.state.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == SessionPhase::Running
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Result once the session has ended
    pub fn summary(&self) -> Option<GameSummary> {
        self.end_reason.map(|reason| GameSummary {
            score: self.state.score,
            remaining_secs: self.state.remaining_secs,
            reason,
            seed: self.seed,
        })
    }

    /// Feed elapsed wall-clock time; one second off the countdown per 1000 ms while running
    pub fn advance(&mut self, elapsed_ms: u64) {
        if !self.is_running() {
            return;
        }
        self.accumulator_ms += elapsed_ms;
        while self.accumulator_ms >= 1000 && self.is_running() {
            self.accumulator_ms -= 1000;
            self.tick_second();
        }
    }

    fn tick_second(&mut self) {
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        if self.state.remaining_secs == 0 {
            self.events.push(SessionEvent::TimedOut);
            self.finish(EndReason::TimedOut);
        }
    }

    /// Translate a raw sample into a debounced move
    pub fn on_tilt(&mut self, sample: TiltSample) -> Option<MoveOutcome> {
        if !self.is_running() {
            return None;
        }
        let dir = direction_for(&sample, self.settings.tilt_threshold)?;
        if !self.debouncer.accept(sample.timestamp_ms) {
            return None;
        }
        self.step(dir)
    }

    /// Apply one move; ignored unless running
    pub fn step(&mut self, dir: Direction) -> Option<MoveOutcome> {
        if !self.is_running() {
            return None;
        }

        let from = self.position;
        let outcome = move_token(&mut self.maze, from, dir, self.state.remaining_secs);
        self.position = outcome.position;
        self.state.score = self.state.score.saturating_add(outcome.score_delta);

        self.events.push(if outcome.moved {
            SessionEvent::Moved {
                from,
                to: outcome.position,
                dir,
            }
        } else {
            SessionEvent::Blocked { at: from, dir }
        });
        for effect in &outcome.effects {
            self.events.push(match *effect {
                CellEffect::Bonus => SessionEvent::BonusCollected {
                    at: outcome.position,
                },
                CellEffect::Bomb => SessionEvent::BombHit {
                    at: outcome.position,
                },
                CellEffect::Goal { points } => SessionEvent::GoalReached { points },
            });
        }

        if outcome.terminal {
            self.finish(EndReason::GoalReached);
        }
        Some(outcome)
    }

    /// Running <-> Paused; returns the resulting phase
    pub fn toggle_pause(&mut self) -> SessionPhase {
        match self.state.phase {
            SessionPhase::Running => {
                self.state.phase = SessionPhase::Paused;
                // A partial second never carries across a pause
                self.accumulator_ms = 0;
                self.events.push(SessionEvent::Paused);
            }
            SessionPhase::Paused => {
                self.state.phase = SessionPhase::Running;
                self.events.push(SessionEvent::Resumed);
            }
            SessionPhase::Idle | SessionPhase::Ended => {}
        }
        self.state.phase
    }

    /// Fresh run on the same maze: score, countdown, token and special cells reset
    pub fn restart(&mut self) -> bool {
        if self.state.phase == SessionPhase::Ended {
            return false;
        }
        self.maze.restore_roles(&self.pristine);
        self.position = self.maze.start();
        self.state.score = 0;
        self.state.remaining_secs = self.settings.restart_budget_secs;
        self.accumulator_ms = 0;
        self.debouncer.reset();
        self.events.push(SessionEvent::Restarted);
        log::info!("Session restarted ({}s)", self.state.remaining_secs);
        true
    }

    /// User confirmed leaving: end without submitting and navigate away
    pub fn exit(&mut self) {
        if self.state.phase != SessionPhase::Ended {
            self.state.phase = SessionPhase::Ended;
            self.end_reason = Some(EndReason::Exited);
            self.events.push(SessionEvent::Exited);
            log::info!("Session exited with score {}", self.state.score);
        }
        self.navigate_home();
    }

    fn finish(&mut self, reason: EndReason) {
        self.state.phase = SessionPhase::Ended;
        self.end_reason = Some(reason);
        let score = self.state.score;
        log::info!(
            "Session ended ({reason:?}): score {score}, {} left",
            format_clock(self.state.remaining_secs)
        );

        // Submission failures never keep the player on the screen
        match self.sink.submit(GAME_NAME, score) {
            Ok(()) => log::info!("{GAME_NAME} score submitted"),
            Err(e) => log::warn!("Error submitting {GAME_NAME} score: {e}"),
        }
        self.navigate_home();
    }

    fn navigate_home(&mut self) {
        if !self.navigated {
            self.navigated = true;
            self.navigator.go_home();
        }
    }
}

/// Countdown display as `MM:SS`
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BOMB_PENALTY, BONUS_POINTS, GOAL_POINTS};
    use crate::error::SubmitError;
    use crate::sim::shortest_path;

    #[derive(Debug, Default)]
    struct RecordingSink {
        submitted: Vec<(String, i32)>,
    }

    impl ScoreSink for RecordingSink {
        fn submit(&mut self, game: &str, score: i32) -> Result<(), SubmitError> {
            self.submitted.push((game.to_string(), score));
            Ok(())
        }
    }

    struct FailingSink;

    impl ScoreSink for FailingSink {
        fn submit(&mut self, _game: &str, _score: i32) -> Result<(), SubmitError> {
            Err(SubmitError::Rejected("offline".to_string()))
        }
    }

    type TestSession = Session<RecordingSink, RecordingNavigator>;

    fn session(seed: u64) -> TestSession {
        Session::new(
            Settings::default(),
            seed,
            RecordingSink::default(),
            RecordingNavigator::default(),
        )
        .unwrap()
    }

    fn solve(session: &mut TestSession) {
        let path =
            shortest_path(session.maze(), session.position(), session.maze().end()).unwrap();
        for dir in path {
            session.step(dir);
        }
    }

    /// Cells entered when following `route` from the start
    fn route_cells(maze: &Maze, route: &[Direction]) -> Vec<Position> {
        let mut pos = Position::START;
        route
            .iter()
            .map(|&dir| {
                pos = maze.neighbor(pos, dir).unwrap_or(pos);
                pos
            })
            .collect()
    }

    /// Score earned by entering `cells` once each on a fresh maze
    fn route_score(maze: &Maze, cells: &[Position]) -> i32 {
        cells
            .iter()
            .map(|&p| {
                let c = maze.cell(p);
                i32::from(c.is_extra_point) * BONUS_POINTS + i32::from(c.is_bomb) * BOMB_PENALTY
            })
            .sum()
    }

    #[test]
    fn test_new_session_is_running() {
        let s = session(1);
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.remaining_secs(), 180);
        assert_eq!(s.score(), 0);
        assert_eq!(s.position(), Position::START);
        assert_eq!(s.events(), &[SessionEvent::Started]);
    }

    #[test]
    fn test_idle_ignores_time_and_input() {
        let mut s: TestSession = Session::idle(
            Settings::default(),
            1,
            RecordingSink::default(),
            RecordingNavigator::default(),
        )
        .unwrap();
        s.advance(5_000);
        assert_eq!(s.remaining_secs(), 180);
        assert!(s.step(Direction::Right).is_none());
        assert_eq!(s.toggle_pause(), SessionPhase::Idle);
        assert!(s.start());
        assert!(!s.start());
        assert!(s.is_running());
    }

    #[test]
    fn test_countdown_accumulates() {
        let mut s = session(1);
        s.advance(400);
        s.advance(400);
        assert_eq!(s.remaining_secs(), 180);
        s.advance(400);
        assert_eq!(s.remaining_secs(), 179);
        s.advance(3_000);
        assert_eq!(s.remaining_secs(), 176);
    }

    #[test]
    fn test_timeout_submits_and_navigates_once() {
        let mut s = session(3);
        s.advance(180_000);
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(
            s.summary(),
            Some(GameSummary {
                score: 0,
                remaining_secs: 0,
                reason: EndReason::TimedOut,
                seed: 3,
            })
        );
        assert_eq!(s.sink().submitted, vec![(GAME_NAME.to_string(), 0)]);
        assert_eq!(s.navigator().calls, 1);

        // Further time, input and exits change nothing
        s.advance(10_000);
        assert!(s.step(Direction::Down).is_none());
        s.exit();
        assert_eq!(s.navigator().calls, 1);
        assert_eq!(s.sink().submitted.len(), 1);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = session(5);
        s.advance(900);
        assert_eq!(s.toggle_pause(), SessionPhase::Paused);
        s.advance(10_000);
        assert_eq!(s.remaining_secs(), 180);
        assert!(s.step(Direction::Right).is_none());
        assert!(s.on_tilt(TiltSample::toward(Direction::Down, 5.0, 0)).is_none());
        assert_eq!(s.position(), Position::START);

        assert_eq!(s.toggle_pause(), SessionPhase::Running);
        // The 900 ms before the pause were dropped
        s.advance(900);
        assert_eq!(s.remaining_secs(), 180);
        s.advance(100);
        assert_eq!(s.remaining_secs(), 179);
    }

    #[test]
    fn test_reaching_goal_scores_time_bonus() {
        let mut s = session(11);
        s.advance(20_000);
        let path = shortest_path(s.maze(), s.position(), s.maze().end()).unwrap();
        let (last, rest) = path.split_last().unwrap();
        for &dir in rest {
            s.step(dir);
        }
        let before = s.score();
        let outcome = s.step(*last).unwrap();
        assert!(outcome.terminal);
        assert_eq!(s.score(), before + outcome.score_delta);
        assert!(outcome.effects.contains(&CellEffect::Goal {
            points: GOAL_POINTS + 160
        }));
        assert_eq!(s.summary().map(|g| g.reason), Some(EndReason::GoalReached));
        assert_eq!(s.sink().submitted, vec![(GAME_NAME.to_string(), s.score())]);
        assert_eq!(s.navigator().calls, 1);
    }

    #[test]
    fn test_score_matches_event_trace() {
        let mut s = session(42);
        solve(&mut s);
        let expected: i32 = s
            .events()
            .iter()
            .map(|e| match e {
                SessionEvent::BonusCollected { .. } => BONUS_POINTS,
                SessionEvent::BombHit { .. } => BOMB_PENALTY,
                SessionEvent::GoalReached { points } => *points,
                _ => 0,
            })
            .sum();
        assert_eq!(s.score(), expected);
    }

    #[test]
    fn test_submission_failure_still_navigates() {
        let mut s = Session::new(
            Settings::default(),
            8,
            FailingSink,
            RecordingNavigator::default(),
        )
        .unwrap();
        s.advance(180_000);
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.navigator().calls, 1);
    }

    #[test]
    fn test_tilt_debounce() {
        let mut s = session(9);

        // Two samples 50 ms apart: only the first is applied
        let a = s.on_tilt(TiltSample::toward(Direction::Up, 5.0, 1_000));
        let b = s.on_tilt(TiltSample::toward(Direction::Up, 5.0, 1_050));
        assert!(a.is_some());
        assert!(b.is_none());

        // 250 ms apart: both applied
        let c = s.on_tilt(TiltSample::toward(Direction::Up, 5.0, 1_250));
        assert!(c.is_some());

        // Flat samples never count against the window
        assert!(s.on_tilt(TiltSample::new(0.0, 0.0, 1_300)).is_none());
        assert!(s.on_tilt(TiltSample::toward(Direction::Left, 5.0, 1_400)).is_none());
        assert!(s.on_tilt(TiltSample::toward(Direction::Left, 5.0, 1_500)).is_some());
    }

    #[test]
    fn test_restart_keeps_layout_and_restores_specials() {
        // A bonus cell whose route does not cross the goal
        let (mut s, bonus, route) = (21..)
            .find_map(|seed| {
                let s = session(seed);
                let maze = s.maze();
                let bonus = maze.positions().find(|&p| maze.cell(p).is_extra_point)?;
                let route = shortest_path(maze, Position::START, bonus)?;
                let crosses_goal = route_cells(maze, &route).contains(&maze.end());
                (!crosses_goal).then_some((s, bonus, route))
            })
            .unwrap();
        let layout = s.maze().clone();
        let expected = route_score(&layout, &route_cells(&layout, &route));
        let mut earned = 0;
        for dir in route {
            if let Some(outcome) = s.step(dir) {
                earned += outcome.score_delta;
            }
        }
        assert_eq!(s.score(), expected);
        assert_eq!(earned, expected);
        assert!(!s.maze().cell(bonus).is_extra_point);
        s.advance(30_000);

        assert!(s.restart());
        assert_eq!(s.score(), 0);
        assert_eq!(s.remaining_secs(), s.settings().restart_budget_secs);
        assert_eq!(s.position(), Position::START);
        assert_eq!(s.maze(), &layout);
        assert_eq!(s.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_bomb_only_route_goes_negative() {
        // A bomb reachable without passing a bonus cell or the goal
        let (mut s, bomb, route) = (1..)
            .find_map(|seed| {
                let s = session(seed);
                let found = {
                    let maze = s.maze();
                    let mut bombs = maze.positions().filter(|&p| maze.cell(p).is_bomb);
                    bombs.find_map(|bomb| {
                        let route = shortest_path(maze, Position::START, bomb)?;
                        let clean = route_cells(maze, &route)
                            .iter()
                            .all(|&p| !maze.cell(p).is_extra_point && p != maze.end());
                        clean.then_some((bomb, route))
                    })
                };
                found.map(|(bomb, route)| (s, bomb, route))
            })
            .unwrap();
        let bombs_on_route = route_cells(s.maze(), &route)
            .iter()
            .filter(|&&p| s.maze().cell(p).is_bomb)
            .count() as i32;
        for dir in route {
            s.step(dir);
        }

        assert_eq!(s.position(), bomb);
        assert_eq!(s.score(), bombs_on_route * BOMB_PENALTY);
        assert!(s.score() < 0);
        assert!(s.is_running());
        assert!(s.events().contains(&SessionEvent::BombHit { at: bomb }));
        assert!(s.sink().submitted.is_empty());
    }

    #[test]
    fn test_restart_while_paused_stays_paused() {
        let mut s = session(4);
        s.toggle_pause();
        assert!(s.restart());
        assert_eq!(s.phase(), SessionPhase::Paused);
    }

    #[test]
    fn test_restart_after_end_refused() {
        let mut s = session(6);
        solve(&mut s);
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert!(!s.restart());
    }

    #[test]
    fn test_exit_navigates_without_submitting() {
        let mut s = session(10);
        s.exit();
        assert_eq!(s.phase(), SessionPhase::Ended);
        assert_eq!(s.summary().map(|g| g.reason), Some(EndReason::Exited));
        assert!(s.sink().submitted.is_empty());
        assert_eq!(s.navigator().calls, 1);
        s.exit();
        assert_eq!(s.navigator().calls, 1);
    }

    #[test]
    fn test_drain_events() {
        let mut s = session(12);
        s.toggle_pause();
        let events = s.drain_events();
        assert_eq!(events, vec![SessionEvent::Started, SessionEvent::Paused]);
        assert!(s.events().is_empty());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180), "03:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(3_725), "62:05");
    }
}
