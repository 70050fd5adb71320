//! Palette for the garden scene

use crossterm::style::Color;

/// Helper to create RGB colors in const context
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

// Sky per weather
pub const SKY_CLEAR: Color = rgb(0xFF, 0xE5, 0xF0); // cherry blossom pink
pub const SKY_RAIN: Color = rgb(0x6B, 0x8E, 0x99);
pub const SKY_SNOW: Color = rgb(0xE8, 0xF4, 0xF8);
pub const SKY_WIND: Color = rgb(0xA8, 0xC5, 0xD1);

pub const GROUND: Color = rgb(0x8B, 0x6F, 0x47);
pub const BARK: Color = rgb(0x4A, 0x37, 0x28);
pub const SEED: Color = rgb(0x8B, 0x45, 0x13);
pub const SPROUT: Color = rgb(0x32, 0xCD, 0x32);

pub const BLOSSOMS: [Color; 5] = [
    rgb(0xFF, 0xB7, 0xD5), // light pink
    rgb(0xFF, 0x69, 0xB4), // hot pink
    rgb(0xFF, 0xF0, 0xF5), // lavender blush
    rgb(0xFF, 0xE4, 0xE1), // misty rose
    rgb(0xFA, 0xDA, 0xDD),
];

pub const PETAL_PINK: Color = rgb(0xFF, 0xB7, 0xD5);
pub const PETAL_WHITE: Color = rgb(0xFF, 0xF0, 0xF5);

pub const RAIN: Color = rgb(200, 220, 255);
pub const SNOW: Color = rgb(255, 255, 255);

// HUD
pub const HUD_TEXT: Color = Color::White;
pub const HUD_WATER: Color = Color::Cyan;
pub const HUD_AGE: Color = Color::Green;
pub const HUD_MESSAGE: Color = Color::Yellow;
pub const HUD_ERROR: Color = Color::Red;

/// Scale a color's brightness, used to fade dying petals into the sky
pub fn fade(color: Color, over: Color, alpha: f32) -> Color {
    match (color, over) {
        (Color::Rgb { r, g, b }, Color::Rgb { r: br, g: bg, b: bb }) => {
            let a = alpha.clamp(0.0, 1.0);
            let mix = |c: u8, base: u8| (base as f32 + (c as f32 - base as f32) * a).round() as u8;
            rgb(mix(r, br), mix(g, bg), mix(b, bb))
        }
        _ => color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_blends_toward_background() {
        let black = rgb(0, 0, 0);
        let white = rgb(255, 255, 255);
        assert_eq!(fade(white, black, 1.0), white);
        assert_eq!(fade(white, black, 0.0), black);
        assert_eq!(fade(white, black, 0.5), rgb(128, 128, 128));
    }

    #[test]
    fn fade_leaves_named_colors() {
        assert_eq!(fade(Color::Red, SKY_CLEAR, 0.2), Color::Red);
    }
}
