use serde::{Deserialize, Serialize};

use crate::body::{Body, Position};
use crate::config::GridSize;
use crate::host::RandomSource;

/// How a new apple position is chosen.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplePlacement {
    /// Both axes drawn independently; the apple may land under the body.
    #[default]
    Independent,
    /// Drawn among free cells only, falling back to independent placement
    /// when the body covers the grid.
    AvoidBody,
}

impl ApplePlacement {
    /// Picks a new apple position inside `bounds`.
    pub fn place<R: RandomSource + ?Sized>(
        self,
        random: &mut R,
        bounds: GridSize,
        body: &Body,
    ) -> Position {
        match self {
            Self::Independent => independent_position(random, bounds),
            Self::AvoidBody => free_position(random, bounds, body)
                .unwrap_or_else(|| independent_position(random, bounds)),
        }
    }
}

/// Draws x then y uniformly, ignoring the body.
pub fn independent_position<R: RandomSource + ?Sized>(
    random: &mut R,
    bounds: GridSize,
) -> Position {
    let x = draw_below(random, usize::from(bounds.width));
    let y = draw_below(random, usize::from(bounds.height));
    Position::new(to_coordinate(x), to_coordinate(y))
}

/// Draws among cells the body does not occupy; `None` when there are none.
pub fn free_position<R: RandomSource + ?Sized>(
    random: &mut R,
    bounds: GridSize,
    body: &Body,
) -> Option<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(body.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position::new(x, y);
            if !body.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = draw_below(random, candidates.len());
    Some(candidates[index])
}

fn draw_below<R: RandomSource + ?Sized>(random: &mut R, bound: usize) -> usize {
    let value = random.random_int(bound);
    if value >= bound {
        log::warn!("random source returned {value} for bound {bound}, reducing");
    }
    value % bound
}

fn to_coordinate(value: usize) -> i32 {
    // Grid axes are u16, so every in-range value fits.
    i32::try_from(value).unwrap_or(i32::MAX)
}
