//! Status bar — bottom line with presence state, last update and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{rgb, style_muted, C_MODE_NORMAL};

const KEYS: &str = " p portfolio  d discord  r reset tilt  K keys  ? help  q quit";

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let view = state.view();
    let updated = match state.presence_updated_at {
        Some(at) => format!("updated {}", at.format("%H:%M:%S")),
        None => "waiting for presence".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            " CARD ",
            Style::default()
                .fg(C_MODE_NORMAL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "●",
            Style::default()
                .fg(rgb(view.status_color))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(view.status.label(), Style::default().fg(rgb(view.status_color))),
        Span::styled(format!("  {updated} "), style_muted()),
        Span::styled(KEYS, style_muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
