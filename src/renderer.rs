use ratatui::Frame as TerminalFrame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::apple::ApplePlacement;
use crate::body::Position;
use crate::config::{CELL_COLUMNS, GridSize, PALETTE, Palette};
use crate::terminal_host::Frame;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{Popup, PopupFacts, render_popup};

pub use crate::ui::menu::Overlay;

/// Everything the renderer reads for one terminal frame.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub frame: &'a Frame,
    pub placement: ApplePlacement,
    pub hud: HudInfo,
    pub previous_best: u32,
    pub overlay: Overlay,
}

/// Terminal `(columns, rows)` needed to show `grid` with its border and HUD.
#[must_use]
pub fn required_terminal_size(grid: GridSize) -> (u16, u16) {
    let columns = grid.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let rows = grid.height.saturating_add(3);
    (columns, rows)
}

/// Returns true when a `columns` x `rows` terminal can show the whole grid.
#[must_use]
pub fn board_fits(columns: u16, rows: u16, grid: GridSize) -> bool {
    let (needed_columns, needed_rows) = required_terminal_size(grid);
    columns >= needed_columns && rows >= needed_rows
}

/// Renders the last painted board, the HUD and any overlay.
///
/// A terminal smaller than the grid gets a resize notice instead of a
/// clipped board.
pub fn render(terminal_frame: &mut TerminalFrame<'_>, view: View<'_>) {
    let area = terminal_frame.area();
    let grid = view.frame.grid;
    if !board_fits(area.width, area.height, grid) {
        let notice = Popup::terminal_too_small(
            grid,
            required_terminal_size(grid),
            (area.width, area.height),
        );
        render_popup(terminal_frame, area, &notice);
        return;
    }

    let board_area = render_hud(terminal_frame, area, view.hud, &PALETTE);

    let block = Block::bordered().border_style(Style::new().fg(PALETTE.border));
    let inner = block.inner(board_area);
    terminal_frame.render_widget(block, board_area);

    paint_board(terminal_frame.buffer_mut(), inner, view.frame, &PALETTE);

    let facts = PopupFacts {
        grid,
        placement: view.placement,
        hud: view.hud,
        previous_best: view.previous_best,
    };
    if let Some(popup) = Popup::for_overlay(view.overlay, &facts) {
        render_popup(terminal_frame, board_area, &popup);
    }
}

/// Clears the board, then fills every body cell and finally the apple.
///
/// The head, the first cell of `frame.body`, gets its own color.
pub fn paint_board(buffer: &mut Buffer, inner: Rect, frame: &Frame, palette: &Palette) {
    let background = Style::new().bg(palette.background);
    for y in 0..frame.grid.height {
        for x in 0..frame.grid.width {
            let position = Position::new(i32::from(x), i32::from(y));
            fill_cell(buffer, inner, frame.grid, position, background);
        }
    }

    let snake = Style::new().bg(palette.snake);
    for cell in &frame.body {
        fill_cell(buffer, inner, frame.grid, *cell, snake);
    }
    if let Some(head) = frame.head() {
        fill_cell(buffer, inner, frame.grid, head, Style::new().bg(palette.snake_head));
    }

    let apple = Style::new().bg(palette.apple);
    fill_cell(buffer, inner, frame.grid, frame.apple, apple);
}

fn fill_cell(buffer: &mut Buffer, inner: Rect, grid: GridSize, position: Position, style: Style) {
    let Some((x, y)) = logical_to_terminal(inner, grid, position) else {
        return;
    };

    for column in 0..CELL_COLUMNS {
        let x = x.saturating_add(column);
        if x < inner.right() {
            buffer.set_string(x, y, " ", style);
        }
    }
}

fn logical_to_terminal(inner: Rect, grid: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(grid) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
