//! PNG backend: rasterizes a [`RenderScene`] with the same geometry as SVG.
//!
//! Labels use a built-in 3×5 pixel font covering digits, `-`, `,`, `@`, the
//! arrow of event labels and the letters of the super-source label.

use std::io::{Cursor, Write};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::warn;

use crate::error::OpsResult;
use crate::render::{Frame, RenderHints, RenderScene, Renderer};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EDGE: Rgba<u8> = Rgba([0x55, 0x55, 0x55, 255]);
const OUTLINE: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 255]);
const TEXT: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Arrow head length in pixels before scaling.
const ARROW_LEN: f32 = 6.0;

/// PNG image of the scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRenderer;

impl Renderer for PngRenderer {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn render(
        &self,
        scene: &RenderScene,
        hints: &RenderHints,
        out: &mut dyn Write,
    ) -> OpsResult<()> {
        let frame = Frame::new(scene, hints);
        let node_fill = parse_color_or(&hints.node_color, "node_color");
        let source_fill = parse_color_or(&hints.super_source_color, "super_source_color");

        let mut canvas = Canvas::new(
            frame.width.ceil().max(1.0) as u32,
            frame.height.ceil().max(1.0) as u32,
        );

        let stroke = hints.scale.max(1.0);
        let head = ARROW_LEN * hints.scale;
        for (from, to) in Frame::edges(scene) {
            let Some((start, end)) = frame.segment(from, to) else {
                continue;
            };
            canvas.line(start, end, stroke, EDGE);
            canvas.arrow_head(start, end, head, EDGE);
        }

        let px = (frame.font / 5.0).round().max(1.0) as i64;
        for node in &scene.nodes {
            let (x, y) = frame.project(node.position);
            let r = frame.radius_of(node);
            let fill = if node.emphasized { source_fill } else { node_fill };
            canvas.disc(x, y, r, OUTLINE);
            canvas.disc(x, y, (r - stroke).max(0.0), fill);
            canvas.text(x, y, &node.label, px, TEXT);
        }

        let mut encoded = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(canvas.image).write_to(&mut encoded, ImageFormat::Png)?;
        out.write_all(&encoded.into_inner())?;
        Ok(())
    }
}

/// Parse `#rrggbb` or `#rgb`.
pub fn parse_color(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let [r, g, b] = match hex.len() {
        6 => [channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?],
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, i) in rgb.iter_mut().zip(0..3) {
                *slot = channel(&hex[i..i + 1])? * 17;
            }
            rgb
        }
        _ => return None,
    };
    Some(Rgba([r, g, b, 255]))
}

/// Parse a colour hint, falling back to mid grey with a warning.
fn parse_color_or(raw: &str, hint: &str) -> Rgba<u8> {
    parse_color(raw).unwrap_or_else(|| {
        warn!(hint, value = raw, "Unreadable colour for PNG output, using grey");
        Rgba([0xbb, 0xbb, 0xbb, 255])
    })
}

/// Pixel sink with clipping. Pixel `(x, y)` covers `[x, x+1) × [y, y+1)`.
struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, WHITE),
        }
    }

    fn set(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }

    fn disc(&mut self, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
        let r2 = r * r;
        for y in (cy - r).floor() as i64..=(cy + r).ceil() as i64 {
            for x in (cx - r).floor() as i64..=(cx + r).ceil() as i64 {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                if dx * dx + dy * dy <= r2 {
                    self.set(x, y, color);
                }
            }
        }
    }

    fn line(&mut self, (x1, y1): (f32, f32), (x2, y2): (f32, f32), width: f32, color: Rgba<u8>) {
        let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        let steps = (len * 2.0).ceil().max(1.0) as usize;
        let half = width / 2.0;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (x, y) = (x1 + (x2 - x1) * t, y1 + (y2 - y1) * t);
            if half < 0.75 {
                self.set(x.floor() as i64, y.floor() as i64, color);
            } else {
                self.disc(x, y, half, color);
            }
        }
    }

    /// Filled triangle pointing at `tip` along `start -> tip`.
    fn arrow_head(&mut self, start: (f32, f32), tip: (f32, f32), len: f32, color: Rgba<u8>) {
        let (dx, dy) = (tip.0 - start.0, tip.1 - start.1);
        let norm = (dx * dx + dy * dy).sqrt();
        if norm <= f32::EPSILON {
            return;
        }
        let (ux, uy) = (dx / norm, dy / norm);
        let base = (tip.0 - ux * len, tip.1 - uy * len);
        let half = len / 2.0;
        let left = (base.0 - uy * half, base.1 + ux * half);
        let right = (base.0 + uy * half, base.1 - ux * half);
        self.triangle(tip, left, right, color);
    }

    fn triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Rgba<u8>) {
        let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };
        let min_x = a.0.min(b.0).min(c.0).floor() as i64;
        let max_x = a.0.max(b.0).max(c.0).ceil() as i64;
        let min_y = a.1.min(b.1).min(c.1).floor() as i64;
        let max_y = a.1.max(b.1).max(c.1).ceil() as i64;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let (e0, e1, e2) = (edge(a, b, px, py), edge(b, c, px, py), edge(c, a, px, py));
                let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0)
                    || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
                if inside {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Draw `label` centred on `(cx, cy)` with `px`-sized font cells.
    fn text(&mut self, cx: f32, cy: f32, label: &str, px: i64, color: Rgba<u8>) {
        let count = label.chars().count() as i64;
        if count == 0 {
            return;
        }
        let width = count * 4 * px - px;
        let left = cx.round() as i64 - width / 2;
        let top = cy.round() as i64 - 5 * px / 2;
        for (i, c) in label.chars().enumerate() {
            let x0 = left + i as i64 * 4 * px;
            for (row, &bits) in glyph(c).iter().enumerate() {
                for col in 0..3 {
                    if (bits >> (2 - col)) & 1 == 1 {
                        self.block(x0 + col * px, top + row as i64 * px, px, color);
                    }
                }
            }
        }
    }

    fn block(&mut self, x: i64, y: i64, size: i64, color: Rgba<u8>) {
        for dy in 0..size {
            for dx in 0..size {
                self.set(x + dx, y + dy, color);
            }
        }
    }
}

/// Rows of a 3×5 glyph, most significant bit on the left.
fn glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '@' => [0b111, 0b101, 0b111, 0b100, 0b111],
        '→' | '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        ' ' => [0; 5],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010],
    }
}
