pub mod scene;
pub mod settings;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, preferences::Theme, session::Phase};

const HORIZONTAL_MARGIN: u16 = 2;

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub disabled: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::Rgb(245, 245, 240),
                fg: Color::Rgb(30, 30, 30),
                dim: Color::Rgb(110, 110, 110),
                accent: Color::Rgb(0, 95, 175),
                disabled: Color::Rgb(190, 190, 190),
            },
            Theme::Dark => Self {
                bg: Color::Rgb(24, 24, 27),
                fg: Color::Rgb(230, 230, 230),
                dim: Color::Rgb(150, 150, 150),
                accent: Color::Rgb(255, 200, 60),
                disabled: Color::Rgb(80, 80, 80),
            },
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.theme());
        buf.set_style(area, Style::default().bg(palette.bg).fg(palette.fg));

        if self.controller.is_fullscreen() {
            render_focus(self, &palette, area, buf);
        } else {
            render_main(self, &palette, area, buf);
            if self.settings_open {
                settings::render_settings(self, &palette, area, buf);
            }
        }
    }
}

fn render_main(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let controller = &app.controller;
    let instructions = controller.instructions();
    let instruction_lines = wrapped_height(
        &instructions,
        area.width.saturating_sub(2 * HORIZONTAL_MARGIN + 2),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),                     // header
            Constraint::Min(3),                        // scene
            Constraint::Length(instruction_lines + 2), // instructions
            Constraint::Length(1),                     // timer
            Constraint::Length(1),                     // legend
        ])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let header = Line::from(vec![
        Span::styled("glimpse", bold.fg(palette.accent)),
        Span::styled(
            format!(
                "   round {}   {}   {} theme",
                controller.round(),
                controller.phase(),
                app.theme()
            ),
            Style::default().fg(palette.dim),
        ),
    ]);
    Paragraph::new(header).render(chunks[0], buf);

    let scene_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.dim));
    let scene_area = scene_block.inner(chunks[1]);
    scene_block.render(chunks[1], buf);
    if controller.image_visible() {
        if let Some(image) = controller.image() {
            scene::render_scene(&image.scene(), scene_area, buf);
        }
    } else if controller.phase() == Phase::Rebuilding {
        Paragraph::new(Span::styled("( eyes closed )", Style::default().fg(palette.dim)))
            .alignment(Alignment::Center)
            .render(centered_line(scene_area), buf);
    }

    Paragraph::new(Text::from(instructions))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.dim)),
        )
        .style(bold)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(controller.timer_text(), bold.fg(palette.accent)))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    legend(app, palette).render(chunks[4], buf);
}

fn render_focus(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let controller = &app.controller;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if controller.image_visible() {
        if let Some(image) = controller.image() {
            scene::render_scene(&image.scene(), chunks[0], buf);
        }
    } else {
        let text = if controller.phase() == Phase::Rebuilding {
            controller.instructions()
        } else {
            String::from("Press (r) to repeat.")
        };
        let height = wrapped_height(&text, chunks[0].width);
        let top = chunks[0].y + chunks[0].height.saturating_sub(height) / 2;
        let text_area = Rect::new(chunks[0].x, top, chunks[0].width, height.min(chunks[0].height));
        Paragraph::new(text)
            .style(Style::default().fg(palette.dim))
            .alignment(Alignment::Center)
            .render(text_area, buf);
    }

    if controller.fullscreen_timer_visible() {
        let text = controller.timer_text();
        let width = (text.width() as u16 + 4).min(area.width);
        let timer_area = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y,
            width,
            3.min(area.height),
        );
        Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().bg(palette.bg))
        .alignment(Alignment::Center)
        .render(timer_area, buf);
    }

    legend(app, palette).render(chunks[1], buf);
}

fn legend<'a>(app: &App, palette: &Palette) -> Paragraph<'a> {
    let controller = &app.controller;
    let enabled = Style::default()
        .fg(palette.fg)
        .add_modifier(Modifier::ITALIC);
    let disabled = Style::default().fg(palette.disabled);
    let sep = Span::styled(" / ", Style::default().fg(palette.dim));

    let mut spans = if controller.is_fullscreen() {
        vec![Span::styled(
            "(r)epeat",
            if controller.repeat_enabled() {
                enabled
            } else {
                disabled
            },
        )]
    } else {
        vec![
            Span::styled(
                format!("(s) {}", controller.start_label().to_lowercase()),
                enabled,
            ),
            sep.clone(),
            Span::styled(
                "(n)ext",
                if controller.next_enabled() {
                    enabled
                } else {
                    disabled
                },
            ),
            sep.clone(),
            Span::styled("(p)references", enabled),
        ]
    };

    spans.extend([
        sep.clone(),
        Span::styled(
            if controller.is_fullscreen() {
                "(f) leave focus"
            } else {
                "(f)ocus"
            },
            enabled,
        ),
        sep.clone(),
        Span::styled("(t)heme", enabled),
        sep.clone(),
        Span::styled("(o)pen", enabled),
        sep,
        Span::styled("(esc)ape", enabled),
    ]);

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// Rows a block of text needs at `width`, counting explicit line breaks
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    text.lines()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>()
        .max(1) as u16
}

fn centered_line(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1))
}
