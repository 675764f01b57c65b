use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Clear, Widget},
};

use crate::{
    config::Palette,
    constants::game::{FIELD_HEIGHT, FIELD_WIDTH},
    game::surface::{DrawCommand, Paint},
};

/// Rasterizes a recorded frame onto terminal cells.
///
/// A cell takes a shape's colour when the cell centre lies inside the shape. The field is
/// scaled independently on both axes, so callers should hand in a rect from [`viewport`].
pub struct Scene<'a> {
    commands: &'a [DrawCommand],
    palette: &'a Palette,
}

impl<'a> Scene<'a> {
    pub fn new(commands: &'a [DrawCommand], palette: &'a Palette) -> Self {
        Self { commands, palette }
    }
}

/// Largest rect inside `area` with the field's shape, centred. Cells are about twice as tall as
/// they are wide, so the 2:3 field becomes 4:3 in cells.
pub fn viewport(area: Rect) -> Rect {
    let height = area.height.min(area.width.saturating_mul(3) / 4);
    let width = ((height as u32 * 4 / 3) as u16).min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// Cells whose centres fall in [start, start + len) once scaled.
fn span(start: f32, len: f32, scale: f32, cells: u16) -> Range<u16> {
    let limit = cells as f32;
    let lo = (start * scale - 0.5).ceil().clamp(0.0, limit);
    let hi = ((start + len) * scale - 0.5).ceil().clamp(0.0, limit);
    (lo as u16)..(hi as u16).max(lo as u16)
}

impl Scene<'_> {
    fn fill(&self, buf: &mut Buffer, area: Rect, x: u16, y: u16, paint: Paint) {
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(' ').set_bg(self.palette.color(paint));
        }
    }
}

impl Widget for Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        buf.set_style(area, Style::default().bg(self.palette.color(Paint::Sky)));
        if area.is_empty() {
            return;
        }

        let sx = area.width as f32 / FIELD_WIDTH;
        let sy = area.height as f32 / FIELD_HEIGHT;

        for command in self.commands {
            match command {
                DrawCommand::Rect { x, y, width, height, paint } => {
                    for row in span(*y, *height, sy, area.height) {
                        for col in span(*x, *width, sx, area.width) {
                            self.fill(buf, area, col, row, *paint);
                        }
                    }
                },
                DrawCommand::Circle { x, y, radius, paint } => {
                    let mut painted = false;
                    for row in span(y - radius, radius * 2.0, sy, area.height) {
                        for col in span(x - radius, radius * 2.0, sx, area.width) {
                            let dx = (col as f32 + 0.5) / sx - x;
                            let dy = (row as f32 + 0.5) / sy - y;
                            if dx * dx + dy * dy <= radius * radius {
                                self.fill(buf, area, col, row, *paint);
                                painted = true;
                            }
                        }
                    }
                    if !painted {
                        let (col, row) = ((x * sx).floor(), (y * sy).floor());
                        if col >= 0.0 && row >= 0.0 && col < area.width as f32 && row < area.height as f32 {
                            self.fill(buf, area, col as u16, row as u16, *paint);
                        }
                    }
                },
                DrawCommand::Text { x, y, text, paint } => {
                    // The glyphs sit on the row just above the baseline.
                    let row = ((y * sy).ceil() as i32 - 1).clamp(0, area.height as i32 - 1) as u16;
                    let col = (x * sx).floor().clamp(0.0, (area.width - 1) as f32) as u16;
                    let style = Style::default().fg(self.palette.color(*paint));
                    buf.set_stringn(area.x + col, area.y + row, text, (area.width - col) as usize, style);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        constants::game::{GROUND_HEIGHT, GROUND_LINE},
        game::surface::{DrawList, Surface},
    };

    fn palette() -> Palette {
        Palette(
            [
                (Paint::Sky, Color::Blue),
                (Paint::Bird, Color::Yellow),
                (Paint::Pipe, Color::Green),
                (Paint::Ground, Color::Gray),
                (Paint::Text, Color::Black),
                (Paint::Alert, Color::Red),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn render(list: &DrawList, width: u16, height: u16) -> Buffer {
        let palette = palette();
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        Scene::new(list, &palette).render(buf.area, &mut buf);
        buf
    }

    #[test]
    fn test_viewport_keeps_shape() {
        assert_eq!(viewport(Rect::new(0, 0, 40, 30)), Rect::new(0, 0, 40, 30));
        assert_eq!(viewport(Rect::new(0, 0, 100, 30)), Rect::new(30, 0, 40, 30));
        assert_eq!(viewport(Rect::new(0, 0, 40, 100)), Rect::new(0, 35, 40, 30));
        assert_eq!(viewport(Rect::new(5, 5, 0, 0)), Rect::new(5, 5, 0, 0));
    }

    #[test]
    fn test_span_uses_cell_centres() {
        // 40 columns over 320 units: cell i covers [8i, 8i + 8), centre 8i + 4.
        assert_eq!(span(0.0, 320.0, 0.125, 40), 0..40);
        assert_eq!(span(4.0, 8.0, 0.125, 40), 0..1);
        assert_eq!(span(4.1, 8.0, 0.125, 40), 1..2);
        assert_eq!(span(-400.0, 52.0, 0.125, 40), 0..0);
        assert_eq!(span(318.0, 52.0, 0.125, 40), 40..40);
    }

    #[test]
    fn test_sky_and_ground() {
        let mut list = DrawList::new();
        list.fill_rect(0.0, GROUND_LINE, FIELD_WIDTH, GROUND_HEIGHT, Paint::Ground);
        let buf = render(&list, 40, 30);

        assert_eq!(buf[(0, 22)].bg, Color::Blue);
        for x in 0..40 {
            for y in 23..30 {
                assert_eq!(buf[(x, y)].bg, Color::Gray, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_bird_covers_its_cells() {
        let mut list = DrawList::new();
        list.fill_circle(50.0, 150.0, 12.0, Paint::Bird);
        let buf = render(&list, 40, 30);

        let painted: Vec<(u16, u16)> = (0..30)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| buf[(x, y)].bg == Color::Yellow)
            .collect();
        assert_eq!(painted, vec![(5, 9), (6, 9), (7, 9)]);
    }

    #[test]
    fn test_tiny_circle_still_shows() {
        let mut list = DrawList::new();
        list.fill_circle(50.0, 150.0, 12.0, Paint::Bird);
        let buf = render(&list, 4, 3);
        assert_eq!(buf[(0, 0)].bg, Color::Yellow);
    }

    #[test]
    fn test_text_sits_on_baseline() {
        let mut list = DrawList::new();
        list.fill_text(80.0, 250.0, "Click to Start", Paint::Text);
        let buf = render(&list, 40, 30);

        let row: String = (10..24).map(|x| buf[(x, 15)].symbol().to_string()).collect();
        assert_eq!(row, "Click to Start");
        assert_eq!(buf[(10, 15)].fg, Color::Black);
        assert_eq!(buf[(10, 15)].bg, Color::Blue);
    }

    #[test]
    fn test_offscreen_shapes_are_clipped() {
        let mut list = DrawList::new();
        list.fill_rect(-100.0, -400.0, 52.0, 320.0, Paint::Pipe);
        list.fill_text(300.0, 470.0, "Best: 1234567", Paint::Text);
        let buf = render(&list, 40, 30);
        assert!(buf.content().iter().all(|cell| cell.bg != Color::Green));
    }
}
