use crate::terminal::Terminal;
use crossterm::style::Color;

const PANEL: Color = Color::Rgb { r: 30, g: 24, b: 28 };

/// Draw a centered help box over the back buffer.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let (width, height) = term.size();
    let lines: Vec<&str> = help_text.lines().collect();
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_w = inner + 4;
    let box_h = lines.len() + 2;

    let left = (width as usize).saturating_sub(box_w) / 2;
    let top = (height as usize).saturating_sub(box_h) / 2;
    let right = left + box_w - 1;
    let bottom = top + box_h - 1;

    for y in top..=bottom {
        for x in left..=right {
            term.paint(x as i32, y as i32, PANEL);
            let ch = match (x == left, x == right, y == top, y == bottom) {
                (true, _, true, _) => '┌',
                (_, true, true, _) => '┐',
                (true, _, _, true) => '└',
                (_, true, _, true) => '┘',
                (_, _, true, _) | (_, _, _, true) => '─',
                (true, _, _, _) | (_, true, _, _) => '│',
                _ => continue,
            };
            term.set(x as i32, y as i32, ch, Some(Color::White), false);
        }
    }

    for (i, line) in lines.iter().enumerate() {
        term.set_str((left + 2) as i32, (top + 1 + i) as i32, line, Some(Color::Grey), false);
    }
}
