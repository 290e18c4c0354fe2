use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::Palette;

const SEPARATOR: &str = " │ ";

/// Values shown on the HUD row below the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HudInfo {
    pub score: u32,
    pub high_score: u32,
    pub length: usize,
    pub step_period_ms: u32,
}

/// Renders the one-line HUD and returns the remaining area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: HudInfo, palette: &Palette) -> Rect {
    let [board_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(info_line(info, usize::from(hud_area.width), palette.hud))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        hud_area,
    );

    board_area
}

fn info_line(info: HudInfo, available_width: usize, value_color: Color) -> Line<'static> {
    let compact = line_width(&labels(info, false)) > available_width;
    let value_style = Style::default().fg(value_color).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    for (index, (label, value)) in labels(info, compact).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::raw(format!("{label}: ")));
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}

fn labels(info: HudInfo, compact: bool) -> [(&'static str, String); 4] {
    let (score, length, period, high) = if compact {
        ("S", "L", "T", "H")
    } else {
        ("Score", "Length", "Step", "Hi")
    };

    [
        (score, info.score.to_string()),
        (length, info.length.to_string()),
        (period, format!("{}ms", info.step_period_ms)),
        (high, info.score.max(info.high_score).to_string()),
    ]
}

fn line_width(labels: &[(&'static str, String)]) -> usize {
    let separators = SEPARATOR.width() * labels.len().saturating_sub(1);
    labels
        .iter()
        .map(|(label, value)| label.width() + 2 + value.width())
        .sum::<usize>()
        + separators
}
