use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::image::{Rgb, Scene};

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.0, c.1, c.2)
    }
}

/// Paint the scene into `area`, one cell per sample at the cell center
pub fn render_scene(scene: &Scene, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    for row in 0..area.height {
        let y = (f64::from(row) + 0.5) / f64::from(area.height);
        for col in 0..area.width {
            let x = (f64::from(col) + 0.5) / f64::from(area.width);
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol(" ");
                cell.set_bg(scene.color_at(x, y).into());
            }
        }
    }
}
