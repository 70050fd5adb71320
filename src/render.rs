//! Scene drawing in world coordinates (320 × 480) and its mapping onto
//! terminal cells.

use crate::colors::{self, fade};
use crate::config::{GROUND_HEIGHT, WORLD_HEIGHT, WORLD_WIDTH};
use crate::game::Message;
use crate::input::Tool;
use crate::particles::Petal;
use crate::terminal::Terminal;
use crate::tree::{trunk_origin, TreeGeometry};
use crate::weather::{Raindrop, Snowflake, WeatherMode};
use crossterm::style::Color;
use std::f32::consts::PI;

/// Rows under the garden reserved for status text
pub const HUD_ROWS: u16 = 2;

/// Maps the world onto a block of terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    cols: u16,
    rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Play area for a terminal, leaving room for the HUD
    pub fn for_terminal(width: u16, height: u16) -> Self {
        Self::new(width, height.saturating_sub(HUD_ROWS))
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// World units covered by one cell
    pub fn cell_size(&self) -> (f32, f32) {
        (WORLD_WIDTH / self.cols as f32, WORLD_HEIGHT / self.rows as f32)
    }

    /// Centre of a cell in world space, clamped to the world
    pub fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        let (cw, ch) = self.cell_size();
        let x = (col as f32 + 0.5) * cw;
        let y = (row as f32 + 0.5) * ch;
        (x.clamp(0.0, WORLD_WIDTH), y.clamp(0.0, WORLD_HEIGHT))
    }

    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let (cw, ch) = self.cell_size();
        ((x / cw).floor() as i32, (y / ch).floor() as i32)
    }
}

/// Drawing primitives in world coordinates
pub trait Canvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: u32, color: Color);
    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, color: Color);
}

/// Everything needed to draw one frame
pub struct Scene<'a> {
    pub weather: WeatherMode,
    pub water_level: f64,
    pub tree_age: u64,
    pub tree: &'a TreeGeometry,
    pub petals: &'a [Petal],
    pub raindrops: &'a [Raindrop],
    pub snowflakes: &'a [Snowflake],
    pub shielded: bool,
    pub message: Option<&'a Message>,
}

pub fn draw_scene<C: Canvas>(canvas: &mut C, scene: &Scene) {
    let sky = scene.weather.background_color();
    canvas.fill_rect(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT, sky);
    canvas.fill_rect(
        0.0,
        WORLD_HEIGHT - GROUND_HEIGHT,
        WORLD_WIDTH,
        GROUND_HEIGHT,
        colors::GROUND,
    );

    if scene.tree_age == 0 {
        draw_seed(canvas);
    } else {
        draw_tree(canvas, scene.tree);
    }

    for petal in scene.petals {
        let color = fade(petal.color, sky, petal.life);
        canvas.ellipse(petal.x, petal.y, petal.size, petal.size * 1.5, petal.rotation, color);
    }

    match scene.weather {
        WeatherMode::Rain => {
            for drop in scene.raindrops {
                canvas.line((drop.x, drop.y), (drop.x, drop.y + 5.0), 1, colors::RAIN);
            }
        }
        WeatherMode::Snow => {
            for flake in scene.snowflakes {
                canvas.fill_rect(flake.x, flake.y, 2.0, 2.0, colors::SNOW);
            }
        }
        WeatherMode::Clear | WeatherMode::HeavyWind => {}
    }
}

fn draw_seed<C: Canvas>(canvas: &mut C) {
    let (x, y) = trunk_origin();
    canvas.ellipse(x, y + 5.0, 5.0, 5.0, 0.0, colors::SEED);
    canvas.line((x, y), (x, y - 10.0), 2, colors::SPROUT);
}

fn draw_tree<C: Canvas>(canvas: &mut C, tree: &TreeGeometry) {
    for branch in &tree.branches {
        canvas.line(branch.origin, branch.end, branch.thickness, colors::BARK);
    }
    for leaf in &tree.leaves {
        let color = colors::BLOSSOMS[leaf.color_index % colors::BLOSSOMS.len()];
        canvas.fill_rect(leaf.x - 2.0, leaf.y - 2.0, 4.0, 4.0, color);
    }
}

/// Status rows under the garden
pub fn draw_hud(term: &mut Terminal, viewport: &Viewport, scene: &Scene, tool: Tool) {
    let top = viewport.rows() as i32;
    let water = format!("Water {:>3}", scene.water_level.floor() as i64);
    let age = format!("Age {}d", scene.tree_age);

    let mut x = 1;
    term.set_str(x, top, &water, Some(colors::HUD_WATER), true);
    x += water.chars().count() as i32 + 2;
    term.set_str(x, top, &age, Some(colors::HUD_AGE), true);
    x += age.chars().count() as i32 + 2;
    term.set_str(x, top, scene.weather.description(), Some(colors::HUD_TEXT), false);
    x += scene.weather.description().len() as i32 + 2;

    let tool_label = format!("Tool: {}", tool.label());
    term.set_str(x, top, &tool_label, Some(colors::HUD_TEXT), false);
    x += tool_label.len() as i32 + 2;
    if scene.shielded {
        term.set_str(x, top, "[shielded]", Some(colors::HUD_WATER), false);
    }

    let hint = "? help";
    let hint_x = viewport.cols() as i32 - hint.len() as i32 - 1;
    term.set_str(hint_x, top, hint, Some(Color::DarkGrey), false);

    if let Some(message) = scene.message {
        let color = if message.is_error {
            colors::HUD_ERROR
        } else {
            colors::HUD_MESSAGE
        };
        term.set_str(1, top + 1, &message.text, Some(color), true);
    }
}

/// Canvas backed by the terminal's back buffer
pub struct TermCanvas<'t> {
    term: &'t mut Terminal,
    viewport: Viewport,
}

impl<'t> TermCanvas<'t> {
    pub fn new(term: &'t mut Terminal, viewport: Viewport) -> Self {
        Self { term, viewport }
    }

    fn in_play_area(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.viewport.cols() as i32 && row < self.viewport.rows() as i32
    }

    fn glyph(&mut self, col: i32, row: i32, ch: char, color: Color, bold: bool) {
        if self.in_play_area(col, row) {
            self.term.set(col, row, ch, Some(color), bold);
        }
    }
}

impl Canvas for TermCanvas<'_> {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (cw, ch) = self.viewport.cell_size();

        // Anything smaller than half a cell becomes a single glyph
        if w < cw / 2.0 || h < ch / 2.0 {
            let (col, row) = self.viewport.to_cell(x + w / 2.0, y + h / 2.0);
            self.glyph(col, row, '*', color, false);
            return;
        }

        let (c0, r0) = self.viewport.to_cell(x, y);
        let (c1, r1) = self.viewport.to_cell(x + w - 0.001, y + h - 0.001);
        for row in r0.max(0)..=r1.min(self.viewport.rows() as i32 - 1) {
            for col in c0.max(0)..=c1.min(self.viewport.cols() as i32 - 1) {
                self.term.paint(col, row, color);
            }
        }
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: u32, color: Color) {
        let (x0, y0) = self.viewport.to_cell(from.0, from.1);
        let (x1, y1) = self.viewport.to_cell(to.0, to.1);
        let ch = if thickness >= 5 {
            '█'
        } else {
            slope_char(x1 - x0, y1 - y0)
        };
        let bold = thickness >= 3;

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.glyph(x, y, ch, color, bold);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, color: Color) {
        let (cw, ch) = self.viewport.cell_size();
        let (col, row) = self.viewport.to_cell(cx, cy);

        if rx * 2.0 < cw || ry * 2.0 < ch {
            let glyph = if rotation == 0.0 { 'o' } else { tumble_char(rotation) };
            self.glyph(col, row, glyph, color, false);
            return;
        }

        let (c0, r0) = self.viewport.to_cell(cx - rx, cy - ry);
        let (c1, r1) = self.viewport.to_cell(cx + rx, cy + ry);
        for r in r0..=r1 {
            for c in c0..=c1 {
                let (wx, wy) = ((c as f32 + 0.5) * cw - cx, (r as f32 + 0.5) * ch - cy);
                if (wx / rx).powi(2) + (wy / ry).powi(2) <= 1.0 && self.in_play_area(c, r) {
                    self.term.paint(c, r, color);
                }
            }
        }
    }
}

/// Branch character for a line's overall direction (y grows downward)
fn slope_char(dx: i32, dy: i32) -> char {
    if dy == 0 || dx.abs() > dy.abs() * 2 {
        '~'
    } else if dx == 0 || dy.abs() > dx.abs() * 2 {
        '|'
    } else if dx.signum() == dy.signum() {
        '\\'
    } else {
        '/'
    }
}

/// Petal silhouette for its current spin
fn tumble_char(rotation: f32) -> char {
    const FRAMES: [char; 4] = ['-', '\\', '|', '/'];
    let quarter = (rotation.rem_euclid(PI) / (PI / 4.0)) as usize;
    FRAMES[quarter.min(FRAMES.len() - 1)]
}
