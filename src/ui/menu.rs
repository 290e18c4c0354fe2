use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::apple::ApplePlacement;
use crate::config::GridSize;
use crate::engine::{DeathReason, EngineStatus};
use crate::ui::hud::HudInfo;

/// Which popup, if any, sits over the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Overlay {
    None,
    Start,
    Paused,
    Finished(EngineStatus),
}

/// Game values the popups describe.
#[derive(Debug, Clone, Copy)]
pub struct PopupFacts {
    pub grid: GridSize,
    pub placement: ApplePlacement,
    pub hud: HudInfo,
    /// Best score before the current game started.
    pub previous_best: u32,
}

/// A bordered, centered box of text sized to its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: &'static str,
    pub accent: Color,
    pub lines: Vec<Line<'static>>,
}

impl Popup {
    /// Builds the popup for `overlay`, or `None` while playing.
    #[must_use]
    pub fn for_overlay(overlay: Overlay, facts: &PopupFacts) -> Option<Self> {
        match overlay {
            Overlay::None => None,
            Overlay::Start => Some(Self::start(facts)),
            Overlay::Paused => Some(Self::paused(facts)),
            Overlay::Finished(status) => Some(Self::finished(status, facts)),
        }
    }

    /// Shown instead of the board when the terminal cannot hold the grid.
    #[must_use]
    pub fn terminal_too_small(grid: GridSize, needed: (u16, u16), actual: (u16, u16)) -> Self {
        Self {
            title: " resize ",
            accent: Color::Yellow,
            lines: vec![
                Line::from(format!(
                    "terminal too small for {}x{} grid",
                    grid.width, grid.height
                )),
                Line::from(format!(
                    "need {}x{}, have {}x{}",
                    needed.0, needed.1, actual.0, actual.1
                )),
                hint("enlarge the window or pick a smaller grid"),
            ],
        }
    }

    fn start(facts: &PopupFacts) -> Self {
        Self {
            title: " grid snake ",
            accent: Color::Green,
            lines: vec![
                board_line(facts),
                Line::from(format!("one step every {} ms", facts.hud.step_period_ms)),
                Line::from(format!("high score {}", facts.hud.high_score)),
                Line::from(""),
                Line::from("[Enter]/[Space] start  [Q]/[Esc] quit"),
                hint("steer with arrows, WASD or hjkl"),
            ],
        }
    }

    fn paused(facts: &PopupFacts) -> Self {
        Self {
            title: " paused ",
            accent: Color::Yellow,
            lines: vec![
                Line::from(format!(
                    "score {}  length {}",
                    facts.hud.score, facts.hud.length
                )),
                Line::from(format!("one step every {} ms", facts.hud.step_period_ms)),
                board_line(facts),
                Line::from(""),
                Line::from("[P] resume  [Q]/[Esc] quit"),
            ],
        }
    }

    fn finished(status: EngineStatus, facts: &PopupFacts) -> Self {
        let score = facts.hud.score;
        let (title, accent, outcome) = match status {
            EngineStatus::Victory => (" victory ", Color::Green, "the snake fills the board"),
            EngineStatus::GameOver(DeathReason::WallCollision) => {
                (" game over ", Color::Red, "ran into the wall")
            }
            EngineStatus::GameOver(DeathReason::SelfCollision) => {
                (" game over ", Color::Red, "bit its own body")
            }
            EngineStatus::Running => (" game over ", Color::Red, ""),
        };

        let mut lines = vec![
            Line::from(outcome),
            Line::from(format!(
                "score {score}  length {}  on {}x{}",
                facts.hud.length, facts.grid.width, facts.grid.height
            )),
        ];
        if score > facts.previous_best {
            lines.push(
                Line::from(format!("new high score, was {}", facts.previous_best))
                    .style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            );
        } else {
            lines.push(Line::from(format!("high score {}", facts.previous_best)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("[Enter]/[Space] play again  [Q]/[Esc] quit"));

        Self {
            title,
            accent,
            lines,
        }
    }

    fn size(&self) -> (u16, u16) {
        let text_width = self.lines.iter().map(Line::width).max().unwrap_or(0);
        let width = u16::try_from(text_width)
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        (width, height)
    }
}

fn board_line(facts: &PopupFacts) -> Line<'static> {
    let apples = match facts.placement {
        ApplePlacement::Independent => "apples anywhere",
        ApplePlacement::AvoidBody => "apples on free cells",
    };
    Line::from(format!(
        "{}x{} grid, {apples}",
        facts.grid.width, facts.grid.height
    ))
}

fn hint(text: &'static str) -> Line<'static> {
    Line::from(text).style(Style::new().fg(Color::DarkGray))
}

/// Draws `popup` centered in `area`, clipped to it.
pub fn render_popup(frame: &mut Frame<'_>, area: Rect, popup: &Popup) {
    let (width, height) = popup.size();
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);

    let accent = Style::new().fg(popup.accent);
    let block = Block::bordered()
        .title(popup.title)
        .title_style(accent.add_modifier(Modifier::BOLD))
        .border_style(accent);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(popup.lines.clone()).centered().block(block),
        rect,
    );
}
