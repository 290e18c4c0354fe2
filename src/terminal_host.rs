use crate::body::Position;
use crate::config::{GridSize, INITIAL_STEP_PERIOD_MS};
use crate::engine::DeathReason;
use crate::host::{Host, Scene};

/// Last frame the engine asked to paint, kept for the terminal renderer.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub grid: GridSize,
    /// Live cells from head to tail.
    pub body: Vec<Position>,
    pub apple: Position,
}

impl Frame {
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }
}

/// [`Host`] for the terminal front end.
///
/// The engine's repaint requests land in a [`Frame`] that the ratatui
/// renderer draws on its own schedule; notifications update the HUD values.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    pub frame: Frame,
    pub score: u32,
    pub step_period_ms: u32,
}

impl TerminalHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: Frame::default(),
            score: 0,
            step_period_ms: INITIAL_STEP_PERIOD_MS,
        }
    }

    /// Clears per-game values before the engine is reset.
    pub fn clear_game(&mut self) {
        self.step_period_ms = INITIAL_STEP_PERIOD_MS;
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for TerminalHost {
    fn repaint(&mut self, scene: &Scene<'_>) {
        self.frame.grid = scene.grid;
        self.frame.body.clear();
        self.frame.body.extend(scene.body.segments());
        self.frame.apple = scene.apple;
    }

    fn score_changed(&mut self, score: u32) {
        log::info!("score {score}");
        self.score = score;
    }

    fn step_period_changed(&mut self, period_ms: u32) {
        log::info!("step period {period_ms} ms");
        self.step_period_ms = period_ms;
    }

    fn game_over(&mut self, reason: DeathReason) {
        log::info!("game over ({reason:?})");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::apple::ApplePlacement;
    use crate::body::Position;
    use crate::config::GridSize;
    use crate::engine::Engine;
    use crate::host::ScriptedRandom;
    use crate::input::Direction;

    use super::TerminalHost;

    #[test]
    fn host_mirrors_engine_frames_and_notifications() {
        let mut engine = Engine::new(
            GridSize::new(8, 8),
            ApplePlacement::Independent,
            TerminalHost::new(),
            ScriptedRandom::new([4, 0, 6, 6]),
        )
        .expect("grid should be large enough");
        assert_eq!(engine.host().frame.head(), Some(Position::new(3, 0)));
        assert_eq!(engine.host().frame.apple, Position::new(4, 0));

        engine.tick(Duration::ZERO).expect("engine should be running");

        let host = engine.host();
        assert_eq!(host.score, 10);
        assert_eq!(host.step_period_ms, 275);
        assert_eq!(
            host.frame.body,
            vec![
                Position::new(4, 0),
                Position::new(3, 0),
                Position::new(2, 0),
                Position::new(1, 0),
                Position::new(0, 0)
            ]
        );
        assert_eq!(host.frame.apple, Position::new(6, 6));
        assert_eq!(host.frame.grid, GridSize::new(8, 8));

        engine.set_direction(Direction::Up);
        engine.tick(Duration::ZERO).expect("engine should be running");
        // The final frame keeps the off-grid head.
        assert_eq!(engine.host().frame.head(), Some(Position::new(4, -1)));

        engine.host_mut().clear_game();
        engine.reset();
        assert_eq!(engine.host().score, 0);
        assert_eq!(engine.host().step_period_ms, 300);
        assert_eq!(engine.host().frame.head(), Some(Position::new(3, 0)));
    }
}
