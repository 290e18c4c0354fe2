use crate::config::GridSize;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }
}

/// Snake body stored in a buffer sized to the whole grid.
///
/// Slots `0..len` hold live cells and `head` indexes the most recent one.
/// Moving without growth overwrites the slot after `head` (wrapping at
/// `len`), which always holds the tail. Growth opens a gap right after
/// `head` by shifting the later live slots one to the right. The buffer is
/// never reallocated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Body {
    cells: Box<[Position]>,
    head: usize,
    len: usize,
}

impl Body {
    /// Creates a body from live cells in buffer order.
    ///
    /// # Panics
    ///
    /// Panics when `cells` is empty, longer than `capacity`, or `head` is not
    /// a live index.
    #[must_use]
    pub fn from_cells(cells: &[Position], head: usize, capacity: usize) -> Self {
        assert!(!cells.is_empty(), "body must contain at least one cell");
        assert!(
            cells.len() <= capacity,
            "body of {} cells does not fit capacity {capacity}",
            cells.len(),
        );
        assert!(head < cells.len(), "head index {head} is not a live slot");

        let mut buffer = vec![Position::default(); capacity].into_boxed_slice();
        buffer[..cells.len()].copy_from_slice(cells);

        Self {
            cells: buffer,
            head,
            len: cells.len(),
        }
    }

    /// Creates the straight starting body along the top row, heading right.
    #[must_use]
    pub fn starting(length: usize, capacity: usize) -> Self {
        let cells: Vec<Position> = (0..).take(length).map(|x| Position::new(x, 0)).collect();
        Self::from_cells(&cells, length - 1, capacity)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.cells[self.head]
    }

    /// Returns the buffer index of the head.
    #[must_use]
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Returns the head position after one step in `direction`.
    #[must_use]
    pub fn next_head(&self, direction: Direction) -> Position {
        self.head().step(direction)
    }

    /// Moves one cell in `direction` keeping the length constant.
    pub fn advance(&mut self, direction: Direction) {
        let next = self.next_head(direction);
        self.head = if self.head == self.len - 1 {
            0
        } else {
            self.head + 1
        };
        self.cells[self.head] = next;
    }

    /// Moves one cell in `direction` without dropping the tail.
    ///
    /// # Panics
    ///
    /// Panics when the buffer is already full.
    pub fn grow(&mut self, direction: Direction) {
        assert!(!self.is_full(), "cannot grow a body filling the whole grid");

        let next = self.next_head(direction);
        if self.head == self.len - 1 {
            self.cells[self.len] = next;
            self.head = self.len;
        } else {
            self.cells.copy_within(self.head + 1..self.len, self.head + 2);
            self.head += 1;
            self.cells[self.head] = next;
        }
        self.len += 1;
    }

    /// Returns true if the head overlaps any other live cell.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.live()
            .iter()
            .enumerate()
            .any(|(index, cell)| index != self.head && *cell == head)
    }

    /// Returns true if the head left the grid.
    #[must_use]
    pub fn is_out_of_bounds(&self, bounds: GridSize) -> bool {
        !self.head().is_within_bounds(bounds)
    }

    /// Returns true if any live cell occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.live().contains(&position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a body keeps at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Iterates over live cells in buffer order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.live().iter().copied()
    }

    /// Iterates over live cells from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        let (before, after) = self.live().split_at(self.head + 1);
        before.iter().rev().chain(after.iter().rev()).copied()
    }

    fn live(&self) -> &[Position] {
        &self.cells[..self.len]
    }
}
