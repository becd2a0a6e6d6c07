//! Color palette and style constants for the identity card.

use card_proto::view::Rgb;
use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(2, 2, 2);
pub const C_CARD_BG: Color = Color::Rgb(20, 20, 23);
pub const C_CARD_BORDER: Color = Color::Rgb(52, 52, 58);
pub const C_GLARE: Color = Color::Rgb(170, 200, 255);
pub const C_BANNER: Color = Color::Rgb(18, 30, 70);
pub const C_BANNER_FADE: Color = Color::Rgb(10, 12, 22);
pub const C_PRIMARY: Color = Color::Rgb(244, 244, 245);
pub const C_SECONDARY: Color = Color::Rgb(212, 212, 216);
pub const C_MUTED: Color = Color::Rgb(113, 113, 122);
pub const C_ACCENT: Color = Color::Rgb(96, 165, 250);
pub const C_VERIFIED: Color = Color::Rgb(0, 149, 246);
pub const C_OPEN_TO_WORK: Color = Color::Rgb(74, 222, 128);
pub const C_AVATAR_BG: Color = Color::Rgb(10, 10, 10);
pub const C_ACTIVITY_BG: Color = Color::Rgb(30, 30, 34);
pub const C_BUTTON_BG: Color = Color::Rgb(34, 34, 38);
pub const C_BUTTON_HOVER_BG: Color = Color::Rgb(244, 244, 245);
pub const C_BUTTON_HOVER_FG: Color = Color::Rgb(0, 0, 0);
pub const C_DISCORD: Color = Color::Rgb(88, 101, 242);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);

// ── Helpers ───────────────────────────────────────────────────────────────────

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Scale an RGB colour by `brightness` (1.0 = unchanged). Non-RGB colours
/// pass through.
pub fn lit(color: Color, brightness: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |v: u8| (f64::from(v) * brightness).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

/// Linear blend from `a` to `b`; `t` is clamped to [0, 1].
pub fn mix(a: Color, b: Color, t: f64) -> Color {
    match (a, b) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let t = t.clamp(0.0, 1.0);
            let ch = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
            Color::Rgb(ch(r1, r2), ch(g1, g2), ch(b1, b2))
        }
        _ => if t < 0.5 { a } else { b },
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_label() -> Style {
    Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit_scales_and_clamps() {
        assert_eq!(lit(Color::Rgb(100, 200, 250), 1.0), Color::Rgb(100, 200, 250));
        assert_eq!(lit(Color::Rgb(100, 200, 250), 1.2), Color::Rgb(120, 240, 255));
        assert_eq!(lit(Color::Reset, 1.2), Color::Reset);
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Color::Rgb(0, 100, 200);
        let b = Color::Rgb(100, 200, 0);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
        assert_eq!(mix(a, b, 0.5), Color::Rgb(50, 150, 100));
        assert_eq!(mix(a, b, 7.0), b);
    }
}
