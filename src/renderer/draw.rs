//! Draw commands for 2D primitives
//!
//! A frame is a flat list of [`DrawCmd`] in canvas pixels, painted in order.

use glam::Vec2;

/// RGBA colour; alpha is 0..=1 like the canvas `rgba()` syntax
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Outline pen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One painting operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole canvas
    Clear(Color),
    /// Axis-aligned ellipse (circle when both radii match)
    Ellipse {
        center: Vec2,
        radii: Vec2,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Closed polygon (triangles, diamonds, bolts)
    Polygon { points: Vec<Vec2>, fill: Color },
    /// Rectangle with optional rounded corners
    Rect {
        min: Vec2,
        size: Vec2,
        radius: f32,
        fill: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    /// Circular arc between two angles (radians, clockwise from +x);
    /// filled arcs are drawn as a wedge from the centre
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

impl DrawCmd {
    pub fn circle(center: Vec2, diameter: f32, fill: Color) -> Self {
        DrawCmd::Ellipse {
            center,
            radii: Vec2::splat(diameter / 2.0),
            fill: Some(fill),
            stroke: None,
        }
    }

    pub fn ring(center: Vec2, diameter: f32, stroke: Stroke) -> Self {
        DrawCmd::Ellipse {
            center,
            radii: Vec2::splat(diameter / 2.0),
            fill: None,
            stroke: Some(stroke),
        }
    }

    pub fn triangle(a: Vec2, b: Vec2, c: Vec2, fill: Color) -> Self {
        DrawCmd::Polygon {
            points: vec![a, b, c],
            fill,
        }
    }

    pub fn rect(min: Vec2, size: Vec2, fill: Color) -> Self {
        DrawCmd::Rect {
            min,
            size,
            radius: 0.0,
            fill,
        }
    }

    pub fn text(text: impl Into<String>, pos: Vec2, size: f32, color: Color, align: TextAlign) -> Self {
        DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
            align,
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const SHIP: Color = Color::rgb(150, 150, 150);
    pub const COCKPIT: Color = Color::rgb(255, 0, 0);
    pub const SHIELD: Color = Color::rgba(255, 0, 255, 0.6);
    pub const STAR: Color = Color::rgb(255, 255, 0);
    pub const STAR_GLINT: Color = Color::rgba(255, 255, 0, 0.4);
    pub const ENEMY_SHOT: Color = Color::rgb(255, 0, 0);
    pub const CHASER: Color = Color::rgb(255, 0, 0);
    pub const SHOOTER: Color = Color::rgb(0, 0, 255);
    pub const ZIGZAG: Color = Color::rgb(255, 165, 0);
    pub const RAPID_FIRE: Color = Color::rgb(0, 255, 0);
    pub const TRIPLE_SHOT: Color = Color::rgb(0, 0, 255);
    pub const SHIELD_PICKUP: Color = Color::rgb(255, 0, 255);
    pub const BUTTON_START: Color = Color::rgb(0, 150, 255);
    pub const BUTTON_RESTART: Color = Color::rgb(0, 200, 255);
    pub const BUTTON_LEADERBOARD: Color = Color::rgb(200, 200, 0);
    pub const PANEL: Color = Color::rgba(0, 0, 0, 0.8);
    pub const PANEL_DARK: Color = Color::rgba(0, 0, 0, 0.9);
    pub const HIGHLIGHT: Color = Color::rgb(255, 255, 0);
    pub const HIGHLIGHT_ROW: Color = Color::rgba(255, 255, 0, 0.2);
    pub const MUTED: Color = Color::rgb(200, 200, 200);
    pub const RULE: Color = Color::rgb(150, 150, 150);
    pub const PROMPT: Color = Color::rgb(0, 255, 100);
    pub const ERROR: Color = Color::rgb(255, 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_string() {
        assert_eq!(Color::rgb(255, 0, 10).css(), "rgba(255,0,10,1.000)");
        assert_eq!(colors::SHIELD.with_alpha(2.0).a, 1.0);
    }
}
