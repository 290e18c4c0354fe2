//! Capabilities the engine consumes from whatever drives it.
//!
//! The engine never draws, reports or rolls dice on its own. It calls a
//! [`Host`] for repaints and notifications and a [`RandomSource`] for apple
//! placement, both handed over at construction.

use std::collections::VecDeque;

use rand::Rng;

use crate::body::{Body, Position};
use crate::config::GridSize;
use crate::engine::DeathReason;

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub grid: GridSize,
    pub body: &'a Body,
    pub apple: Position,
}

/// Repaint and notification sink for the engine.
///
/// Notification methods default to no-ops so hosts only implement what they
/// care about.
pub trait Host {
    /// Draws the background, every body cell and the apple, then commits.
    fn repaint(&mut self, scene: &Scene<'_>);

    /// Called once on initialization with 0 and once per apple eaten.
    fn score_changed(&mut self, _score: u32) {}

    /// Called only when the step period actually decreases.
    fn step_period_changed(&mut self, _period_ms: u32) {}

    /// Called on the tick that ends the game.
    fn game_over(&mut self, _reason: DeathReason) {}
}

/// Uniform integers for apple placement.
pub trait RandomSource {
    /// Returns a value in `[0, bound)`. `bound` is never zero.
    fn random_int(&mut self, bound: usize) -> usize;
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn random_int(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// Replays a fixed sequence of values, then yields zeros.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<usize>,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn random_int(&mut self, _bound: usize) -> usize {
        self.values.pop_front().unwrap_or(0)
    }
}

/// One recorded host call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum HostEvent {
    Repaint {
        body: Vec<Position>,
        apple: Position,
    },
    ScoreChanged(u32),
    StepPeriodChanged(u32),
    GameOver(DeathReason),
}

/// Host double that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<HostEvent>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the recorded events.
    pub fn take(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn repaint_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Repaint { .. }))
            .count()
    }

    #[must_use]
    pub fn scores(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::ScoreChanged(score) => Some(*score),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn step_periods(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::StepPeriodChanged(period) => Some(*period),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn game_overs(&self) -> Vec<DeathReason> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::GameOver(reason) => Some(*reason),
                _ => None,
            })
            .collect()
    }
}

impl Host for Recorder {
    fn repaint(&mut self, scene: &Scene<'_>) {
        self.events.push(HostEvent::Repaint {
            body: scene.body.cells().collect(),
            apple: scene.apple,
        });
    }

    fn score_changed(&mut self, score: u32) {
        self.events.push(HostEvent::ScoreChanged(score));
    }

    fn step_period_changed(&mut self, period_ms: u32) {
        self.events.push(HostEvent::StepPeriodChanged(period_ms));
    }

    fn game_over(&mut self, reason: DeathReason) {
        self.events.push(HostEvent::GameOver(reason));
    }
}
