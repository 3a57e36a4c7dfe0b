//! Screen layout shared by drawing and pointer hit-testing
//!
//! Positions are authored for the 400x600 reference canvas and scaled with
//! the arena.

use glam::Vec2;

use crate::sim::Arena;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict containment, so touching an edge is not a press
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.min + self.size;
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }
}

/// Buttons and panels for the current arena size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub scale: f32,
    pub start_button: Rect,
    pub leaderboard_button: Rect,
    pub name_panel: Rect,
    pub name_box: Rect,
    pub submit_button: Rect,
    pub board_panel: Rect,
    pub back_button: Rect,
}

impl Layout {
    pub fn new(arena: &Arena) -> Self {
        let s = arena.scale();
        let cx = arena.width / 2.0;
        let cy = arena.height / 2.0;
        Self {
            scale: s,
            start_button: Rect::new(cx - 60.0 * s, cy + 50.0 * s, 120.0 * s, 40.0 * s),
            leaderboard_button: Rect::new(cx - 80.0 * s, cy + 100.0 * s, 160.0 * s, 40.0 * s),
            name_panel: Rect::new(50.0 * s, 200.0 * s, 300.0 * s, 200.0 * s),
            name_box: Rect::new(70.0 * s, 260.0 * s, 260.0 * s, 40.0 * s),
            submit_button: Rect::new(150.0 * s, 320.0 * s, 100.0 * s, 40.0 * s),
            board_panel: Rect::new(50.0 * s, 100.0 * s, 300.0 * s, 400.0 * s),
            back_button: Rect::new(150.0 * s, 450.0 * s, 100.0 * s, 30.0 * s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layout() {
        let layout = Layout::new(&Arena::default());
        assert_eq!(layout.start_button, Rect::new(140.0, 350.0, 120.0, 40.0));
        assert_eq!(layout.leaderboard_button.center(), Vec2::new(200.0, 420.0));
    }

    #[test]
    fn test_layout_scales_with_arena() {
        let layout = Layout::new(&Arena {
            width: 200.0,
            height: 300.0,
        });
        assert_eq!(layout.scale, 0.5);
        assert_eq!(layout.name_box, Rect::new(35.0, 130.0, 130.0, 20.0));
    }

    #[test]
    fn test_rect_edges_are_outside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(5.0, 5.0)));
        assert!(!r.contains(Vec2::new(0.0, 5.0)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
    }
}
