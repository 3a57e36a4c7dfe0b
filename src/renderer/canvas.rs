//! Canvas 2D backend (WASM only)
//!
//! Paints a draw list onto a `CanvasRenderingContext2d`. The canvas backing
//! store may be larger than the arena (device pixel ratio); `pixel_ratio`
//! scales everything up.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::draw::{DrawCmd, Stroke, TextAlign};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    pixel_ratio: f64,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            ctx,
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
    }

    /// Paint one frame
    pub fn render(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_transform(self.pixel_ratio, 0.0, 0.0, self.pixel_ratio, 0.0, 0.0)?;

        for cmd in cmds {
            match cmd {
                DrawCmd::Clear(color) => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_rect(0.0, 0.0, self.width, self.height);
                }
                DrawCmd::Ellipse {
                    center,
                    radii,
                    fill,
                    stroke,
                } => {
                    ctx.begin_path();
                    ctx.ellipse(
                        center.x as f64,
                        center.y as f64,
                        radii.x.max(0.0) as f64,
                        radii.y.max(0.0) as f64,
                        0.0,
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    if let Some(fill) = fill {
                        ctx.set_fill_style_str(&fill.css());
                        ctx.fill();
                    }
                    if let Some(stroke) = stroke {
                        self.apply_stroke(stroke);
                        ctx.stroke();
                    }
                }
                DrawCmd::Polygon { points, fill } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.close_path();
                    ctx.set_fill_style_str(&fill.css());
                    ctx.fill();
                }
                DrawCmd::Rect {
                    min,
                    size,
                    radius,
                    fill,
                } => {
                    ctx.set_fill_style_str(&fill.css());
                    if *radius <= 0.0 {
                        ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                    } else {
                        self.rounded_rect_path(
                            min.x as f64,
                            min.y as f64,
                            size.x as f64,
                            size.y as f64,
                            *radius as f64,
                        )?;
                        ctx.fill();
                    }
                }
                DrawCmd::Line { from, to, stroke } => {
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    self.apply_stroke(stroke);
                    ctx.stroke();
                }
                DrawCmd::Arc {
                    center,
                    radius,
                    start,
                    end,
                    fill,
                    stroke,
                } => {
                    let (cx, cy) = (center.x as f64, center.y as f64);
                    if let Some(fill) = fill {
                        ctx.begin_path();
                        ctx.move_to(cx, cy);
                        ctx.arc(cx, cy, *radius as f64, *start as f64, *end as f64)?;
                        ctx.close_path();
                        ctx.set_fill_style_str(&fill.css());
                        ctx.fill();
                    }
                    if let Some(stroke) = stroke {
                        ctx.begin_path();
                        ctx.arc(cx, cy, *radius as f64, *start as f64, *end as f64)?;
                        self.apply_stroke(stroke);
                        ctx.stroke();
                    }
                }
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                    align,
                } => {
                    ctx.set_font(&format!("{}px sans-serif", size.round().max(1.0)));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    ctx.set_text_baseline("middle");
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        Ok(())
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.css());
        self.ctx.set_line_width(stroke.width as f64);
    }

    fn rounded_rect_path(&self, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<(), JsValue> {
        let r = r.min(w / 2.0).min(h / 2.0);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r)?;
        ctx.arc_to(x + w, y + h, x, y + h, r)?;
        ctx.arc_to(x, y + h, x, y, r)?;
        ctx.arc_to(x, y, x + w, y, r)?;
        ctx.close_path();
        Ok(())
    }
}
