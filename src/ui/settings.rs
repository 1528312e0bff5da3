use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::Palette;
use crate::app::App;
use crate::preferences::{PRESETS, SLIDER_MAX_SECS, SLIDER_MIN_SECS, SLIDER_STEP_SECS};

const PANEL_WIDTH: u16 = 46;
const PANEL_HEIGHT: u16 = 13;
const SLIDER_WIDTH: usize = 20;

/// Preferences overlay: durations as sliders, presets, theme
pub fn render_settings(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let panel = centered(area, PANEL_WIDTH, PANEL_HEIGHT);
    let prefs = app.preferences.current();
    let active = prefs.active_preset();

    let label = Style::default().fg(palette.dim);
    let value = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("View time      ", label),
            Span::styled(format!("{:>3}s ", prefs.durations.view_secs()), value),
            Span::raw(slider(prefs.durations.view_secs())),
        ]),
        Line::from(vec![
            Span::styled("Rebuild time   ", label),
            Span::styled(format!("{:>3}s ", prefs.durations.rebuild_secs()), value),
            Span::raw(slider(prefs.durations.rebuild_secs())),
        ]),
        Line::from(Span::styled(
            format!(
                "←/→ view  ↓/↑ rebuild  ({}s steps)",
                SLIDER_STEP_SECS
            ),
            label,
        )),
        Line::default(),
    ];

    lines.extend(PRESETS.iter().enumerate().map(|(i, preset)| {
        let style = if active == Some(preset) {
            value
        } else {
            Style::default().fg(palette.fg)
        };
        Line::from(Span::styled(
            format!(
                "({}) {:<9} {:>3}s / {:>3}s",
                i + 1,
                preset.name,
                preset.view_secs,
                preset.rebuild_secs
            ),
            style,
        ))
    }));

    lines.extend([
        Line::default(),
        Line::from(vec![
            Span::styled("Theme          ", label),
            Span::styled(prefs.theme.to_string(), value),
            Span::styled("  (t) toggle", label),
        ]),
    ]);

    Clear.render(panel, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Preferences")
                .border_style(Style::default().fg(palette.accent)),
        )
        .style(Style::default().bg(palette.bg).fg(palette.fg))
        .render(panel, buf);
}

/// Text slider: filled share of the track matches the position in range
pub fn slider(secs: u32) -> String {
    let clamped = secs.clamp(SLIDER_MIN_SECS, SLIDER_MAX_SECS);
    let span = (SLIDER_MAX_SECS - SLIDER_MIN_SECS) as usize;
    let filled = (clamped - SLIDER_MIN_SECS) as usize * SLIDER_WIDTH / span;
    format!("{}{}", "█".repeat(filled), "░".repeat(SLIDER_WIDTH - filled))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_bounds() {
        assert_eq!(slider(SLIDER_MIN_SECS), "░".repeat(SLIDER_WIDTH));
        assert_eq!(slider(SLIDER_MAX_SECS), "█".repeat(SLIDER_WIDTH));
        assert_eq!(slider(1), slider(SLIDER_MIN_SECS));
        assert_eq!(slider(500), slider(SLIDER_MAX_SECS));
    }

    #[test]
    fn centered_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        let panel = centered(area, PANEL_WIDTH, PANEL_HEIGHT);
        assert_eq!(panel.width, PANEL_WIDTH);
        assert_eq!(panel.x, (80 - PANEL_WIDTH) / 2);

        let tiny = centered(Rect::new(0, 0, 10, 4), PANEL_WIDTH, PANEL_HEIGHT);
        assert_eq!(tiny, Rect::new(0, 0, 10, 4));
    }
}
