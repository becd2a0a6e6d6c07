//! Card component — the identity card itself.
//!
//! Layout inside a rounded border, top to bottom:
//! banner + badge | avatar, status, clock | handle | tagline | note |
//! activity box | avatar/art url | link buttons.
//!
//! The card owns the tilt engine. Pointer moves over the untilted card
//! rectangle feed the springs; the smoothed transform is rendered as a small
//! parallax shift, a lit edge on the pointer side and a brightness scale on
//! every colour.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use card_proto::config::TiltConfig;
use card_proto::tilt::{Surface, TiltEngine, TiltTransform};
use card_proto::view::{ActivityKind, PresenceView};

use crate::{
    action::{Action, LinkTarget},
    app_state::AppState,
    component::Component,
    theme::{
        lit, mix, rgb, C_ACCENT, C_ACTIVITY_BG, C_AVATAR_BG, C_BANNER, C_BANNER_FADE,
        C_BUTTON_BG, C_BUTTON_HOVER_BG, C_BUTTON_HOVER_FG, C_CARD_BG, C_CARD_BORDER, C_DISCORD,
        C_GLARE, C_MUTED, C_OPEN_TO_WORK, C_PRIMARY, C_SECONDARY, C_VERIFIED,
    },
};

pub const CARD_WIDTH: u16 = 48;
pub const CARD_HEIGHT: u16 = 22;

const MAX_SHIFT_COLS: f64 = 2.0;
const MAX_SHIFT_ROWS: f64 = 1.0;
/// Below this angle the lit edge is not drawn.
const GLARE_MIN_DEG: f64 = 2.0;

pub struct Card {
    tilt: TiltEngine,
    max_rotation_deg: f64,
    frame_secs: f64,
    pointer_inside: bool,
    hovered: Option<LinkTarget>,
    /// Untilted card rectangle from the last draw.
    surface: Rect,
    /// Button rectangles as drawn (after the tilt shift).
    buttons: Vec<(LinkTarget, Rect)>,
}

impl Card {
    pub fn new(config: &TiltConfig) -> Self {
        Self {
            tilt: TiltEngine::new(config),
            max_rotation_deg: config.max_rotation_deg.max(f64::EPSILON),
            frame_secs: config.frame_interval().as_secs_f64(),
            pointer_inside: false,
            hovered: None,
            surface: Rect::default(),
            buttons: Vec::new(),
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.tilt.is_settled()
    }

    /// Advance the springs by one animation frame. Returns `true` while the
    /// card is still moving.
    pub fn animate(&mut self) -> bool {
        self.tilt.step(self.frame_secs)
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_inside = false;
        self.hovered = None;
        self.tilt.pointer_leave();
    }

    pub fn reset_tilt(&mut self) {
        self.tilt.reset();
    }

    pub fn transform(&self) -> TiltTransform {
        self.tilt.transform()
    }

    fn button_at(&self, col: u16, row: u16) -> Option<LinkTarget> {
        self.buttons
            .iter()
            .find(|(_, r)| hit(*r, col, row))
            .map(|(target, _)| *target)
    }
}

impl Component for Card {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        let (col, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                // Cell centre, so the middle cell of an odd extent is exactly 0.
                let (px, py) = (f64::from(col) + 0.5, f64::from(row) + 0.5);
                let surface = surface_of(self.surface);
                if self.surface.width > 0 && surface.contains(px, py) {
                    self.tilt.pointer_move(surface, px, py);
                    self.pointer_inside = true;
                    self.hovered = self.button_at(col, row);
                } else if self.pointer_inside {
                    self.pointer_leave();
                }
                vec![]
            }
            MouseEventKind::Down(MouseButton::Left) => match self.button_at(col, row) {
                Some(target) => vec![Action::OpenLink(target)],
                None => vec![],
            },
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if *action == Action::ResetTilt {
            self.reset_tilt();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.surface = surface_rect(area);
        let t = self.tilt.transform();
        let (dx, dy) = tilt_offset(&t, self.max_rotation_deg);
        let card = shifted(self.surface, dx, dy, area);
        let b = t.brightness;
        let view = state.view();

        frame.render_widget(Clear, card);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(lit(C_CARD_BORDER, b)))
            .style(Style::default().bg(lit(C_CARD_BG, b)));
        let inner = block.inner(card);
        frame.render_widget(block, card);
        draw_edge_glare(frame, card, &t, self.max_rotation_deg, b);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // banner
                Constraint::Length(4), // avatar | status | clock
                Constraint::Length(1), // handle
                Constraint::Length(2), // tagline
                Constraint::Length(1), // note
                Constraint::Length(1),
                Constraint::Length(4), // activity box
                Constraint::Length(1), // url line
                Constraint::Length(3), // buttons
                Constraint::Min(0),
            ])
            .split(inner);

        draw_banner(frame, rows[0], state, b);
        draw_identity_row(frame, rows[1], state, &view, b);
        draw_handle(frame, rows[2], state, b);

        frame.render_widget(
            Paragraph::new(state.profile.tagline.as_str())
                .style(Style::default().fg(lit(C_SECONDARY, b)))
                .wrap(Wrap { trim: true }),
            pad(rows[3]),
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                truncate(&state.profile.note, pad(rows[4]).width as usize),
                Style::default()
                    .fg(lit(C_MUTED, b))
                    .add_modifier(Modifier::ITALIC),
            )),
            pad(rows[4]),
        );

        draw_activity(frame, pad(rows[6]), &view, b);
        draw_url_line(frame, pad(rows[7]), &view, b);
        self.buttons = draw_buttons(frame, pad(rows[8]), self.hovered, b);
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

fn surface_of(r: Rect) -> Surface {
    Surface::new(
        f64::from(r.x),
        f64::from(r.y),
        f64::from(r.width),
        f64::from(r.height),
    )
}

/// The untilted card, centred in `area` and shrunk to fit.
pub fn surface_rect(area: Rect) -> Rect {
    let w = CARD_WIDTH.min(area.width);
    let h = CARD_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Parallax shift in cells for a transform: the card drifts towards the
/// pointer by up to two columns and one row.
pub fn tilt_offset(t: &TiltTransform, max_deg: f64) -> (i16, i16) {
    let dx = (t.rotate_y_deg / max_deg * MAX_SHIFT_COLS).round() as i16;
    let dy = (-t.rotate_x_deg / max_deg * MAX_SHIFT_ROWS).round() as i16;
    (dx, dy)
}

fn shifted(r: Rect, dx: i16, dy: i16, bounds: Rect) -> Rect {
    let max_x = bounds.x + bounds.width.saturating_sub(r.width);
    let max_y = bounds.y + bounds.height.saturating_sub(r.height);
    let x = (i32::from(r.x) + i32::from(dx)).clamp(i32::from(bounds.x), i32::from(max_x));
    let y = (i32::from(r.y) + i32::from(dy)).clamp(i32::from(bounds.y), i32::from(max_y));
    Rect {
        x: x as u16,
        y: y as u16,
        ..r
    }
}

fn pad(r: Rect) -> Rect {
    Rect {
        x: r.x + 1,
        width: r.width.saturating_sub(2),
        ..r
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Cut `s` to at most `max` display columns, ending in `…` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn draw_edge_glare(frame: &mut Frame, card: Rect, t: &TiltTransform, max_deg: f64, b: f64) {
    if card.width < 3 || card.height < 3 {
        return;
    }
    let bg = lit(C_CARD_BG, b);
    let glare = |deg: f64| {
        let strength = (deg.abs() / max_deg).clamp(0.0, 1.0);
        Style::default()
            .fg(lit(mix(C_CARD_BORDER, C_GLARE, strength), b))
            .bg(bg)
    };

    if t.rotate_y_deg.abs() >= GLARE_MIN_DEG {
        let x = if t.rotate_y_deg > 0.0 {
            card.x + card.width - 1
        } else {
            card.x
        };
        let edge = Rect::new(x, card.y + 1, 1, card.height - 2);
        let lines: Vec<Line> = (0..edge.height)
            .map(|_| Line::from(Span::styled("│", glare(t.rotate_y_deg))))
            .collect();
        frame.render_widget(Paragraph::new(lines), edge);
    }

    if t.rotate_x_deg.abs() >= GLARE_MIN_DEG {
        // Positive X rotation means the pointer is above centre.
        let y = if t.rotate_x_deg > 0.0 {
            card.y
        } else {
            card.y + card.height - 1
        };
        let edge = Rect::new(card.x + 1, y, card.width - 2, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "─".repeat(edge.width as usize),
                glare(t.rotate_x_deg),
            )),
            edge,
        );
    }
}

fn draw_banner(frame: &mut Frame, area: Rect, state: &AppState, b: f64) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let badge = if state.profile.open_to_work {
        Line::from(vec![
            Span::styled("● ", Style::default().fg(lit(C_OPEN_TO_WORK, b))),
            Span::styled(
                "OPEN TO WORK ",
                Style::default()
                    .fg(lit(C_OPEN_TO_WORK, b))
                    .add_modifier(Modifier::BOLD),
            ),
        ])
        .alignment(Alignment::Right)
    } else {
        Line::from("")
    };
    frame.render_widget(
        Paragraph::new(badge).style(Style::default().bg(lit(C_BANNER, b))),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new("").style(Style::default().bg(lit(C_BANNER_FADE, b))),
        rows[1],
    );
}

fn draw_identity_row(frame: &mut Frame, area: Rect, state: &AppState, view: &PresenceView, b: f64) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(9),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .split(area);

    // Avatar tile: initial + image format, status dot on the corner.
    let avatar_area = cols[1];
    let avatar = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(lit(C_CARD_BORDER, b)))
        .style(Style::default().bg(lit(C_AVATAR_BG, b)));
    let avatar_inner = avatar.inner(avatar_area);
    frame.render_widget(avatar, avatar_area);
    let initial = avatar_initial(view.display_name.as_deref(), &state.profile.handle);
    let format = if view.animated_avatar { "gif" } else { "png" };
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                initial.to_string(),
                Style::default()
                    .fg(lit(C_PRIMARY, b))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format, Style::default().fg(lit(C_MUTED, b)))),
        ])
        .alignment(Alignment::Center),
        avatar_inner,
    );
    if avatar_area.width >= 2 && avatar_area.height >= 2 {
        let dot = Rect::new(
            avatar_area.x + avatar_area.width - 2,
            avatar_area.y + avatar_area.height - 1,
            1,
            1,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "●",
                Style::default().fg(lit(rgb(view.status_color), b)),
            )),
            dot,
        );
    }

    // Status + provider name.
    let status_color = lit(rgb(view.status_color), b);
    let mut status_lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("● ", Style::default().fg(status_color)),
            Span::styled(view.status.label(), Style::default().fg(status_color)),
        ]),
    ];
    if let Some(name) = &view.display_name {
        status_lines.push(Line::from(Span::styled(
            truncate(name, cols[3].width as usize),
            Style::default().fg(lit(C_SECONDARY, b)),
        )));
    }
    frame.render_widget(Paragraph::new(status_lines), cols[3]);

    // Location + clock, bottom-right aligned.
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                state.location_label.to_uppercase(),
                Style::default()
                    .fg(lit(C_MUTED, b))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                state.clock.clone(),
                Style::default()
                    .fg(lit(C_PRIMARY, b))
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Right),
        cols[4],
    );
}

fn avatar_initial(display_name: Option<&str>, handle: &str) -> char {
    display_name
        .unwrap_or(handle)
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

fn draw_handle(frame: &mut Frame, area: Rect, state: &AppState, b: f64) {
    let area = pad(area);
    let handle = truncate(&state.profile.handle, (area.width as usize).saturating_sub(2));
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                handle,
                Style::default()
                    .fg(lit(C_PRIMARY, b))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("✔", Style::default().fg(lit(C_VERIFIED, b))),
        ])),
        area,
    );
}

fn draw_activity(frame: &mut Frame, area: Rect, view: &PresenceView, b: f64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(lit(C_CARD_BORDER, b)))
        .style(Style::default().bg(lit(C_ACTIVITY_BG, b)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let (icon, icon_color) = match view.activity_kind {
        ActivityKind::Listening => (" ♫", C_OPEN_TO_WORK),
        ActivityKind::Activity | ActivityKind::Idle => (" </>", C_MUTED),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(icon, Style::default().fg(lit(icon_color, b)))),
        cols[0],
    );

    let width = cols[1].width as usize;
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                truncate(&view.primary, width),
                Style::default()
                    .fg(lit(C_PRIMARY, b))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate(&view.secondary, width),
                Style::default().fg(lit(C_MUTED, b)),
            )),
        ]),
        cols[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled("●", Style::default().fg(lit(C_ACCENT, b)))),
        cols[2],
    );
}

fn draw_url_line(frame: &mut Frame, area: Rect, view: &PresenceView, b: f64) {
    let (label, url) = match &view.art_url {
        Some(art) => ("art ", art.as_str()),
        None => ("avatar ", view.avatar_url.as_str()),
    };
    let room = (area.width as usize).saturating_sub(label.len());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(label, Style::default().fg(lit(C_MUTED, b))),
            Span::styled(
                truncate(url, room),
                Style::default()
                    .fg(lit(C_MUTED, b))
                    .add_modifier(Modifier::DIM),
            ),
        ])),
        area,
    );
}

fn draw_buttons(
    frame: &mut Frame,
    area: Rect,
    hovered: Option<LinkTarget>,
    b: f64,
) -> Vec<(LinkTarget, Rect)> {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(78),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let buttons = [
        (LinkTarget::Portfolio, cols[0], "VIEW PORTFOLIO ↗", C_PRIMARY, C_BUTTON_BG),
        (LinkTarget::Profile, cols[2], "DISCORD", C_DISCORD, C_BUTTON_BG),
    ];

    let mut drawn = Vec::with_capacity(buttons.len());
    for (target, rect, label, fg, bg) in buttons {
        if rect.width < 3 || rect.height < 3 {
            continue;
        }
        let is_hovered = hovered == Some(target);
        let (fg, bg, border) = match (is_hovered, target) {
            (true, LinkTarget::Portfolio) => (C_BUTTON_HOVER_FG, C_BUTTON_HOVER_BG, C_BUTTON_HOVER_BG),
            (true, LinkTarget::Profile) => (C_PRIMARY, C_DISCORD, C_DISCORD),
            (false, LinkTarget::Profile) => (fg, bg, C_DISCORD),
            (false, LinkTarget::Portfolio) => (fg, bg, C_CARD_BORDER),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(lit(border, b)))
            .style(Style::default().bg(lit(bg, b)));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        frame.render_widget(
            Paragraph::new(Span::styled(
                truncate(label, inner.width as usize),
                Style::default()
                    .fg(lit(fg, b))
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            inner,
        );
        drawn.push((target, rect));
    }
    drawn
}
