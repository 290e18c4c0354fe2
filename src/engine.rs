use std::time::Duration;

use thiserror::Error;

use crate::apple::ApplePlacement;
use crate::body::{Body, Position};
use crate::config::{
    GridSize, INITIAL_LENGTH, INITIAL_REWARD, INITIAL_STEP_PERIOD_MS, MAX_GRID_SIDE,
    MIN_STEP_PERIOD_MS, REWARD_INCREMENT, STEP_PERIOD_DECREMENT_MS,
};
use crate::host::{Host, RandomSource, Scene};
use crate::input::Direction;

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Current high-level engine state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EngineStatus {
    Running,
    GameOver(DeathReason),
    /// The body covers every cell of the grid.
    Victory,
}

impl EngineStatus {
    #[must_use]
    pub fn is_finished(self) -> bool {
        self != Self::Running
    }
}

/// Result of one successful tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickReport {
    pub ate_apple: bool,
    pub status: EngineStatus,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum EngineError {
    #[error("grid {width}x{height} is too small for the starting snake")]
    GridTooSmall { width: u16, height: u16 },
    #[error("grid {width}x{height} is too large, each side must be at most {max}")]
    GridTooLarge { width: u16, height: u16, max: u16 },
    #[error("the game has already ended ({0:?}); reset before ticking again")]
    Finished(EngineStatus),
}

/// The snake simulation, advanced once per external tick.
///
/// The engine owns all game state. Repaints and notifications go to the
/// injected [`Host`]; apple positions come from the injected
/// [`RandomSource`].
#[derive(Debug)]
pub struct Engine<H, R> {
    grid: GridSize,
    placement: ApplePlacement,
    body: Body,
    apple: Position,
    direction: Direction,
    step_period_ms: u32,
    score: u32,
    next_reward: u32,
    status: EngineStatus,
    host: H,
    random: R,
}

impl<H: Host, R: RandomSource> Engine<H, R> {
    /// Initializes a game on `grid`.
    ///
    /// Notifies the host of the initial score and paints the first frame.
    pub fn new(
        grid: GridSize,
        placement: ApplePlacement,
        host: H,
        random: R,
    ) -> Result<Self, EngineError> {
        if grid.width > MAX_GRID_SIDE || grid.height > MAX_GRID_SIDE {
            return Err(EngineError::GridTooLarge {
                width: grid.width,
                height: grid.height,
                max: MAX_GRID_SIDE,
            });
        }
        if usize::from(grid.width) < INITIAL_LENGTH || grid.total_cells() <= INITIAL_LENGTH {
            return Err(EngineError::GridTooSmall {
                width: grid.width,
                height: grid.height,
            });
        }

        let mut engine = Self {
            grid,
            placement,
            body: Body::starting(INITIAL_LENGTH, grid.total_cells()),
            apple: Position::default(),
            direction: Direction::Right,
            step_period_ms: INITIAL_STEP_PERIOD_MS,
            score: 0,
            next_reward: INITIAL_REWARD,
            status: EngineStatus::Running,
            host,
            random,
        };
        engine.start();
        Ok(engine)
    }

    /// Puts the engine back into its starting configuration on the same grid.
    pub fn reset(&mut self) {
        self.body = Body::starting(INITIAL_LENGTH, self.grid.total_cells());
        self.direction = Direction::Right;
        self.step_period_ms = INITIAL_STEP_PERIOD_MS;
        self.score = 0;
        self.next_reward = INITIAL_REWARD;
        self.status = EngineStatus::Running;
        self.start();
    }

    fn start(&mut self) {
        self.relocate_apple();
        log::info!(
            "game started on {}x{} grid, apple at {:?}",
            self.grid.width,
            self.grid.height,
            self.apple
        );
        self.host.score_changed(self.score);
        self.repaint();
    }

    /// Requests a new direction of travel.
    ///
    /// Reversals are ignored, as is any request once the game has ended. The
    /// latest accepted request before a tick wins.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.status.is_finished() {
            return;
        }

        if self.direction.is_opposite(requested) {
            log::debug!("ignoring reversal from {:?} to {requested:?}", self.direction);
            return;
        }

        self.direction = requested;
    }

    /// Advances the simulation by one step.
    ///
    /// `timestamp` is the host clock reading and only feeds the trace log.
    pub fn tick(&mut self, timestamp: Duration) -> Result<TickReport, EngineError> {
        if self.status.is_finished() {
            return Err(EngineError::Finished(self.status));
        }

        log::trace!("tick at {timestamp:?} heading {:?}", self.direction);

        let ate_apple = self.body.next_head(self.direction) == self.apple;
        if ate_apple {
            self.body.grow(self.direction);
            self.relocate_apple();
            self.speed_up();
            self.score = self.score.saturating_add(self.next_reward);
            self.next_reward = self.next_reward.saturating_add(REWARD_INCREMENT);
            log::debug!(
                "apple eaten, score {} length {}, next apple at {:?}",
                self.score,
                self.body.len(),
                self.apple
            );
            self.host.score_changed(self.score);
        } else {
            self.body.advance(self.direction);
        }

        if let Some(reason) = self.collision() {
            log::info!("game over: {reason:?} at {:?}, score {}", self.body.head(), self.score);
            self.status = EngineStatus::GameOver(reason);
            self.host.game_over(reason);
        } else if self.body.is_full() {
            log::info!("board filled, score {}", self.score);
            self.status = EngineStatus::Victory;
        }

        self.repaint();

        Ok(TickReport {
            ate_apple,
            status: self.status,
        })
    }

    fn collision(&self) -> Option<DeathReason> {
        if self.body.is_out_of_bounds(self.grid) {
            Some(DeathReason::WallCollision)
        } else if self.body.head_overlaps_body() {
            Some(DeathReason::SelfCollision)
        } else {
            None
        }
    }

    fn relocate_apple(&mut self) {
        self.apple = self
            .placement
            .place(&mut self.random, self.grid, &self.body);
    }

    fn speed_up(&mut self) {
        if self.step_period_ms > MIN_STEP_PERIOD_MS {
            self.step_period_ms = self
                .step_period_ms
                .saturating_sub(STEP_PERIOD_DECREMENT_MS)
                .max(MIN_STEP_PERIOD_MS);
            log::debug!("step period now {} ms", self.step_period_ms);
            self.host.step_period_changed(self.step_period_ms);
        }
    }

    fn repaint(&mut self) {
        let scene = Scene {
            grid: self.grid,
            body: &self.body,
            apple: self.apple,
        };
        self.host.repaint(&scene);
    }
}

impl<H, R> Engine<H, R> {
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn apple(&self) -> Position {
        self.apple
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Reward the next apple will grant.
    #[must_use]
    pub fn next_reward(&self) -> u32 {
        self.next_reward
    }

    /// Interval between ticks in milliseconds.
    #[must_use]
    pub fn step_period(&self) -> u32 {
        self.step_period_ms
    }

    #[must_use]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.step_period_ms))
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn placement(&self) -> ApplePlacement {
        self.placement
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::apple::ApplePlacement;
    use crate::body::Position;
    use crate::config::GridSize;
    use crate::host::{HostEvent, Recorder, ScriptedRandom};
    use crate::input::Direction;

    use super::{DeathReason, Engine, EngineError, EngineStatus};

    type TestEngine = Engine<Recorder, ScriptedRandom>;

    fn engine(grid: GridSize, apple_script: &[usize]) -> TestEngine {
        Engine::new(
            grid,
            ApplePlacement::Independent,
            Recorder::new(),
            ScriptedRandom::new(apple_script.iter().copied()),
        )
        .expect("grid should be large enough")
    }

    fn tick(engine: &mut TestEngine) -> super::TickReport {
        engine.tick(Duration::ZERO).expect("engine should be running")
    }

    #[test]
    fn initialize_sets_starting_configuration() {
        let engine = engine(GridSize::new(40, 40), &[17, 23]);

        assert_eq!(
            engine.body().cells().collect::<Vec<_>>(),
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0)
            ]
        );
        assert_eq!(engine.body().head_index(), 3);
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.step_period(), 300);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.next_reward(), 10);
        assert_eq!(engine.apple(), Position::new(17, 23));
        assert_eq!(engine.body().capacity(), 1600);
        assert_eq!(
            engine.host().events,
            vec![
                HostEvent::ScoreChanged(0),
                HostEvent::Repaint {
                    body: engine.body().cells().collect(),
                    apple: Position::new(17, 23),
                },
            ]
        );
    }

    #[test]
    fn too_small_grid_is_rejected() {
        let result = Engine::new(
            GridSize::new(3, 10),
            ApplePlacement::Independent,
            Recorder::new(),
            ScriptedRandom::default(),
        );
        assert_eq!(
            result.err(),
            Some(EngineError::GridTooSmall {
                width: 3,
                height: 10
            })
        );

        let result = Engine::new(
            GridSize::new(4, 1),
            ApplePlacement::Independent,
            Recorder::new(),
            ScriptedRandom::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn oversized_grid_is_rejected_before_allocating() {
        let result = Engine::new(
            GridSize::new(u16::MAX, u16::MAX),
            ApplePlacement::Independent,
            Recorder::new(),
            ScriptedRandom::default(),
        );
        assert_eq!(
            result.err(),
            Some(EngineError::GridTooLarge {
                width: u16::MAX,
                height: u16::MAX,
                max: 256
            })
        );

        let result = Engine::new(
            GridSize::new(40, 257),
            ApplePlacement::Independent,
            Recorder::new(),
            ScriptedRandom::default(),
        );
        assert!(matches!(result, Err(EngineError::GridTooLarge { .. })));

        let largest = Engine::new(
            GridSize::new(256, 256),
            ApplePlacement::Independent,
            Recorder::new(),
            ScriptedRandom::default(),
        )
        .expect("largest grid should be accepted");
        assert_eq!(largest.body().capacity(), 65_536);
    }

    #[test]
    fn opposite_direction_is_rejected() {
        let mut engine = engine(GridSize::new(10, 10), &[9, 9]);

        engine.set_direction(Direction::Left);
        assert_eq!(engine.direction(), Direction::Right);

        engine.set_direction(Direction::Down);
        assert_eq!(engine.direction(), Direction::Down);

        engine.set_direction(Direction::Up);
        assert_eq!(engine.direction(), Direction::Down);

        engine.set_direction(Direction::Left);
        assert_eq!(engine.direction(), Direction::Left);
    }

    #[test]
    fn last_direction_before_tick_wins() {
        let mut engine = engine(GridSize::new(10, 10), &[9, 9]);

        engine.set_direction(Direction::Down);
        engine.set_direction(Direction::Right);
        tick(&mut engine);

        assert_eq!(engine.body().head(), Position::new(4, 0));
    }

    #[test]
    fn reversal_is_checked_against_the_latest_request() {
        let mut engine = engine(GridSize::new(10, 10), &[9, 9]);

        engine.set_direction(Direction::Down);
        engine.set_direction(Direction::Up);
        tick(&mut engine);

        assert_eq!(engine.direction(), Direction::Down);
        assert_eq!(engine.body().head(), Position::new(3, 1));
    }

    #[test]
    fn plain_tick_moves_without_growing() {
        let mut engine = engine(GridSize::new(10, 10), &[9, 9]);
        engine.host_mut().take();

        let report = tick(&mut engine);

        assert!(!report.ate_apple);
        assert_eq!(report.status, EngineStatus::Running);
        assert_eq!(engine.body().len(), 4);
        assert_eq!(engine.body().head(), Position::new(4, 0));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.host().repaint_count(), 1);
        assert!(engine.host().scores().is_empty());
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut engine = engine(GridSize::new(10, 10), &[4, 0, 7, 7]);
        engine.host_mut().take();

        let report = tick(&mut engine);

        assert!(report.ate_apple);
        assert_eq!(engine.body().len(), 5);
        assert_eq!(engine.body().head(), Position::new(4, 0));
        assert_eq!(engine.apple(), Position::new(7, 7));
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.next_reward(), 20);
        assert_eq!(engine.step_period(), 275);
        assert_eq!(
            engine.host().events,
            vec![
                HostEvent::StepPeriodChanged(275),
                HostEvent::ScoreChanged(10),
                HostEvent::Repaint {
                    body: engine.body().cells().collect(),
                    apple: Position::new(7, 7),
                },
            ]
        );
    }

    #[test]
    fn score_and_reward_progression() {
        // Apples lined up along the top row, each relocated one cell ahead.
        let mut engine = engine(GridSize::new(10, 10), &[4, 0, 5, 0, 6, 0, 9, 9]);

        let mut progression = Vec::new();
        for _ in 0..3 {
            assert!(tick(&mut engine).ate_apple);
            progression.push((engine.score(), engine.next_reward()));
        }

        assert_eq!(progression, vec![(10, 20), (30, 30), (60, 40)]);
        assert_eq!(engine.host().scores(), vec![0, 10, 30, 60]);
    }

    #[test]
    fn score_and_reward_saturate_instead_of_wrapping() {
        let mut engine = engine(GridSize::new(10, 10), &[4, 0, 9, 9]);
        engine.score = u32::MAX - 5;
        engine.next_reward = u32::MAX - 1;

        assert!(tick(&mut engine).ate_apple);

        assert_eq!(engine.score(), u32::MAX);
        assert_eq!(engine.next_reward(), u32::MAX);
        assert_eq!(engine.host().scores().last(), Some(&u32::MAX));
    }

    #[test]
    fn step_period_stops_at_floor() {
        // Twelve apples in a row on a 20 wide grid.
        let mut script = Vec::new();
        for x in 4..16 {
            script.extend([x, 0]);
        }
        script.extend([19, 19]);
        let mut engine = engine(GridSize::new(20, 20), &script);

        let mut periods = vec![engine.step_period()];
        for _ in 0..12 {
            assert!(tick(&mut engine).ate_apple);
            periods.push(engine.step_period());
        }

        assert_eq!(
            periods,
            vec![300, 275, 250, 225, 200, 175, 150, 125, 100, 75, 50, 50, 50]
        );
        assert_eq!(
            engine.host().step_periods(),
            vec![275, 250, 225, 200, 175, 150, 125, 100, 75, 50]
        );
        assert_eq!(engine.step_interval(), Duration::from_millis(50));
    }

    #[test]
    fn leaving_the_grid_ends_the_game() {
        let mut engine = engine(GridSize::new(6, 6), &[5, 5]);
        engine.set_direction(Direction::Up);

        let report = tick(&mut engine);

        assert_eq!(
            report.status,
            EngineStatus::GameOver(DeathReason::WallCollision)
        );
        assert_eq!(
            engine.host().game_overs(),
            vec![DeathReason::WallCollision]
        );
        // The final frame is still painted.
        assert_eq!(engine.host().repaint_count(), 2);
    }

    #[test]
    fn biting_the_body_ends_the_game() {
        // Grow to length 5 first, then curl back into the body.
        let mut engine = engine(GridSize::new(10, 10), &[4, 0, 9, 9]);
        tick(&mut engine);

        engine.set_direction(Direction::Down);
        tick(&mut engine);
        engine.set_direction(Direction::Left);
        tick(&mut engine);
        engine.set_direction(Direction::Up);
        let report = tick(&mut engine);

        assert_eq!(
            report.status,
            EngineStatus::GameOver(DeathReason::SelfCollision)
        );
        assert_eq!(engine.body().head(), Position::new(3, 0));
    }

    #[test]
    fn finished_engine_refuses_ticks_and_directions() {
        let mut engine = engine(GridSize::new(6, 6), &[5, 5]);
        engine.set_direction(Direction::Up);
        tick(&mut engine);
        let events_after_game_over = engine.host().events.len();

        let error = engine.tick(Duration::ZERO).unwrap_err();
        engine.set_direction(Direction::Left);

        assert_eq!(
            error,
            EngineError::Finished(EngineStatus::GameOver(DeathReason::WallCollision))
        );
        assert_eq!(engine.direction(), Direction::Up);
        assert_eq!(engine.host().events.len(), events_after_game_over);
        assert_eq!(engine.host().game_overs().len(), 1);
    }

    #[test]
    fn reset_restores_starting_state() {
        let mut engine = engine(GridSize::new(6, 6), &[4, 0, 5, 5, 2, 3]);
        tick(&mut engine);
        engine.set_direction(Direction::Up);
        tick(&mut engine);
        assert!(engine.status().is_finished());

        engine.reset();

        assert_eq!(engine.status(), EngineStatus::Running);
        assert_eq!(engine.body().len(), 4);
        assert_eq!(engine.body().head(), Position::new(3, 0));
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.next_reward(), 10);
        assert_eq!(engine.step_period(), 300);
        assert_eq!(engine.apple(), Position::new(2, 3));
        assert_eq!(engine.host().scores().last(), Some(&0));
    }

    #[test]
    fn filling_the_board_is_a_victory() {
        // 5x1 grid: one apple away from covering every cell.
        let mut engine = engine(GridSize::new(5, 1), &[4, 0]);

        let report = tick(&mut engine);

        assert!(report.ate_apple);
        assert_eq!(report.status, EngineStatus::Victory);
        assert!(engine.body().is_full());
        assert!(engine.host().game_overs().is_empty());
        assert!(matches!(
            engine.tick(Duration::ZERO),
            Err(EngineError::Finished(EngineStatus::Victory))
        ));
    }
}
