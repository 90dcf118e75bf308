//! Pixel raster backing the effects, and its terminal presentation.

use glam::Vec2;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use vitrine_core::Rgb;

use crate::surface::{PointGeometry, PointMaterial, PointRenderer, Surface2d, Viewport};
use crate::trail::Camera;

/// Channel level below which an overlay pixel is treated as empty.
const EMPTY_LEVEL: f32 = 1.0 / 255.0;

/// Row-major RGB raster.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    viewport: Viewport,
    pixels: Vec<Rgb>,
    clear_color: Rgb,
}

impl PixelCanvas {
    /// Raster cleared to black.
    pub fn new(viewport: Viewport) -> Self {
        Self::filled(viewport, Rgb::BLACK)
    }

    /// Raster cleared to `color`; resizing clears to the same color.
    pub fn filled(viewport: Viewport, color: Rgb) -> Self {
        let len = viewport.width as usize * viewport.height as usize;
        Self {
            viewport,
            pixels: vec![color; len],
            clear_color: color,
        }
    }

    pub fn width(&self) -> usize {
        self.viewport.width as usize
    }

    pub fn height(&self) -> usize {
        self.viewport.height as usize
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width() && y < self.height()).then(|| self.pixels[y * self.width() + x])
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.clear_color);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(y as usize * self.width() + x as usize)
    }

    fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn add(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = self.pixels[i] + color;
        }
    }

    /// Paint every pixel whose center lies within `radius` of `center`,
    /// plus the pixel containing `center`.
    fn stamp_disc(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.set(center.x.floor() as i64, center.y.floor() as i64, color);
        let (x0, x1) = ((center.x - radius).floor() as i64, (center.x + radius).ceil() as i64);
        let (y0, y1) = ((center.y - radius).floor() as i64, (center.y + radius).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pixel_center.distance(center) <= radius {
                    self.set(x, y, color);
                }
            }
        }
    }
}

impl Surface2d for PixelCanvas {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        *self = Self::filled(viewport, self.clear_color);
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgb, alpha: f32) {
        let x0 = origin.x.max(0.0).floor() as usize;
        let y0 = origin.y.max(0.0).floor() as usize;
        let x1 = ((origin.x + extent.x).ceil().max(0.0) as usize).min(self.width());
        let y1 = ((origin.y + extent.y).ceil().max(0.0) as usize).min(self.height());
        let width = self.width();
        for y in y0..y1 {
            for pixel in &mut self.pixels[y * width + x0.min(x1)..y * width + x1] {
                *pixel = pixel.lerp(color, alpha);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgb, width: f32) {
        let radius = width * 0.5;
        let steps = (from.distance(to) * 2.0).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.stamp_disc(from.lerp(to, t), radius, color);
        }
    }
}

impl PointRenderer for PixelCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_size(&mut self, viewport: Viewport) {
        Surface2d::resize(self, viewport);
    }

    fn render(&mut self, geometry: &mut PointGeometry, material: &PointMaterial, camera: &Camera) {
        self.clear();
        let viewport = self.viewport;

        for (&position, &color) in geometry.positions.iter().zip(&geometry.colors) {
            if color.is_black() {
                continue;
            }
            let Some((screen, depth)) = camera.world_to_screen(position, viewport) else {
                continue;
            };
            let size = if material.size_attenuation {
                material.size * (viewport.height as f32 * 0.5) / depth
            } else {
                material.size
            };
            // Keep tiny points at least two pixels wide so they never fall
            // between pixel centers.
            let half = (size * 0.5).max(1.0);
            let (x0, x1) = ((screen.x - half).floor() as i64, (screen.x + half).ceil() as i64);
            let (y0, y1) = ((screen.y - half).floor() as i64, (screen.y + half).ceil() as i64);
            for y in y0..y1 {
                for x in x0..x1 {
                    let u = (x as f32 + 0.5 - (screen.x - half)) / (2.0 * half);
                    let v = (y as f32 + 0.5 - (screen.y - half)) / (2.0 * half);
                    let alpha = material.sprite.sample(u, v);
                    if alpha > 0.0 {
                        self.add(x, y, color * alpha);
                    }
                }
            }
        }

        geometry.mark_uploaded();
    }
}

/// Widget drawing a [`PixelCanvas`] as `▀` cells, two pixels per cell.
///
/// In additive mode empty pixels leave the cell alone and lit pixels are
/// added to the cell's existing background, so the raster acts as a glowing
/// overlay. Cells holding text keep their symbol and only get tinted.
#[derive(Debug, Clone, Copy)]
pub struct HalfBlocks<'a> {
    canvas: &'a PixelCanvas,
    row_offset: usize,
    additive: bool,
}

impl<'a> HalfBlocks<'a> {
    pub fn new(canvas: &'a PixelCanvas) -> Self {
        Self {
            canvas,
            row_offset: 0,
            additive: false,
        }
    }

    /// Skip the first `rows` cell rows of the canvas.
    pub fn row_offset(mut self, rows: usize) -> Self {
        self.row_offset = rows;
        self
    }

    pub fn additive(mut self, additive: bool) -> Self {
        self.additive = additive;
        self
    }
}

impl Widget for HalfBlocks<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for y in area.top()..area.bottom() {
            let row = (self.row_offset + (y - area.y) as usize) * 2;
            for x in area.left()..area.right() {
                let column = (x - area.x) as usize;
                let (Some(top), Some(bottom)) =
                    (self.canvas.pixel(column, row), self.canvas.pixel(column, row + 1))
                else {
                    continue;
                };

                let cell = &mut buf[(x, y)];
                if !self.additive {
                    cell.set_symbol("▀").set_fg(top.to_color()).set_bg(bottom.to_color());
                    continue;
                }

                if top.max_channel() < EMPTY_LEVEL && bottom.max_channel() < EMPTY_LEVEL {
                    continue;
                }
                let base = Rgb::from_color(cell.bg).unwrap_or(Rgb::BLACK);
                if cell.symbol().trim().is_empty() {
                    cell.set_symbol("▀")
                        .set_fg((base + top).to_color())
                        .set_bg((base + bottom).to_color());
                } else {
                    cell.set_bg((base + (top + bottom) * 0.5).to_color());
                }
            }
        }
    }
}
