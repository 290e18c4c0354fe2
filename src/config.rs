use ratatui::style::Color;

/// Logical grid dimensions passed through the engine as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Creates a grid size from width and height.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 40;

/// Largest accepted grid side, keeping the body buffer and a full-board
/// scan for free cells small.
pub const MAX_GRID_SIDE: u16 = 256;

/// Body length right after initialization.
pub const INITIAL_LENGTH: usize = 4;

/// Step period at the start of a game, in milliseconds.
pub const INITIAL_STEP_PERIOD_MS: u32 = 300;

/// Amount the step period shrinks per apple eaten.
pub const STEP_PERIOD_DECREMENT_MS: u32 = 25;

/// The step period never drops below this value.
pub const MIN_STEP_PERIOD_MS: u32 = 50;

/// Reward granted for the first apple.
pub const INITIAL_REWARD: u32 = 10;

/// Increase of the reward after every apple.
pub const REWARD_INCREMENT: u32 = 10;

/// Terminal colors for the three things the board ever shows.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub snake: Color,
    pub snake_head: Color,
    pub apple: Color,
    pub border: Color,
    pub hud: Color,
}

/// Black board, green snake, red apple.
pub const PALETTE: Palette = Palette {
    background: Color::Black,
    snake: Color::Green,
    snake_head: Color::LightGreen,
    apple: Color::Red,
    border: Color::DarkGray,
    hud: Color::White,
};

/// Terminal columns used to draw one grid cell, keeping cells roughly square.
pub const CELL_COLUMNS: u16 = 2;

/// Poll timeout for input between frames.
pub const INPUT_POLL_MS: u64 = 16;
