//! ---------------------------------------------------------------------------
//! Overhead map rasteriser (CPU)
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * The view follows one entity: it sits in the middle of the screen and
//!   its heading always points up.
//! * World +Y maps to screen-down before the heading rotation, so turning
//!   right (increasing yaw) spins the map anticlockwise.
//! ---------------------------------------------------------------------------

use glam::{Affine2, Vec2};

use crate::renderer::{Rgba, TagOverlay};
use crate::defs::TagFlags;
use crate::world::geometry::{Entity, Level};

pub const BACKGROUND: Rgba = 0x00_00_00_00;
pub const SOLID_WALL: Rgba = 0x00_FF_FF_FF;
pub const PORTAL: Rgba = 0x00_00_99_99;
pub const PLAYER: Rgba = 0x00_FF_00_00;
pub const HIGHLIGHT: Rgba = 0x00_40_40_10;
pub const SELECTION: Rgba = 0x00_20_50_20;

/// Player-centred top-down view.
pub struct Overhead {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    view: Affine2,
}

impl Default for Overhead {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            width: 0,
            height: 0,
            view: Affine2::IDENTITY,
        }
    }
}

impl Overhead {
    /// (Re)allocate for the requested resolution, clear, and centre the
    /// view on `eye` at `scale` pixels per map unit.
    pub fn begin_frame(&mut self, w: usize, h: usize, eye: &Entity, scale: f32) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, BACKGROUND);
        }
        self.scratch.fill(BACKGROUND);

        let centre = Vec2::new(w as f32, h as f32) * 0.5;
        self.view = Affine2::from_scale_angle_translation(
            Vec2::splat(scale),
            -eye.yaw.to_radians(),
            centre,
        ) * Affine2::from_translation(-eye.position);
    }

    /// Hand the finished buffer to `submit(&[Rgba], w, h)` exactly once.
    pub fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }

    #[inline]
    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        self.view.transform_point2(p)
    }

    /// Every linedef: one-sided walls white, portals teal.
    pub fn draw_level(&mut self, level: &Level) {
        for ld in level.linedefs() {
            let [Some(v0), Some(v1)] = ld.vertex else {
                continue;
            };
            let colour = if ld.is_portal() { PORTAL } else { SOLID_WALL };
            let a = self.to_screen(level.vertex(v0).pos);
            let b = self.to_screen(level.vertex(v1).pos);
            self.line(a, b, colour);
        }
    }

    /// Tagged flats and walls, flattened onto the map.  Walls collapse to
    /// their footprint, so only tagged flats show up as areas.
    pub fn draw_overlay(&mut self, overlay: &TagOverlay) {
        for t in &overlay.triangles {
            let colour = if t.tags.intersects(TagFlags::SELECTED) {
                SELECTION
            } else {
                HIGHLIGHT
            };
            let [a, b, c] = t.points.map(|p| self.to_screen(p.truncate()));
            self.fill_triangle(a, b, c, colour);
            if (b - a).perp_dot(c - a).abs() < 1.0 {
                // degenerate on screen: a wall seen from above
                self.line(a, b, colour | 0x00_80_80_00);
                self.line(b, c, colour | 0x00_80_80_00);
            }
        }
    }

    pub fn draw_entity(&mut self, e: &Entity, radius: f32, colour: Rgba) {
        let c = self.to_screen(e.position);
        let r = radius * self.view.matrix2.x_axis.length();
        const SEGMENTS: usize = 32;
        let at = |i: usize| {
            let phi = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            c + Vec2::new(phi.cos(), phi.sin()) * r
        };
        for i in 0..SEGMENTS {
            self.line(at(i), at(i + 1), colour);
        }
    }

    /*──────────────────────── primitives ─────────────────────────────*/

    #[inline]
    fn plot(&mut self, x: i32, y: i32, colour: Rgba) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.scratch[y as usize * self.width + x as usize] = colour;
        }
    }

    /// Bresenham, clipped per pixel.
    pub fn line(&mut self, a: Vec2, b: Vec2, colour: Rgba) {
        if !(a.is_finite() && b.is_finite()) {
            return;
        }
        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        // bail out of lines that are absurdly long after projection
        let limit = (self.width + self.height) as i32 * 8;
        for _ in 0..=(dx.max(-dy)).min(limit) {
            self.plot(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Scan-line fill using edge functions over the clipped bounding box.
    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, colour: Rgba) {
        let area = (b - a).perp_dot(c - a);
        if area.abs() < f32::EPSILON || !area.is_finite() {
            return;
        }
        let min = a.min(b).min(c).max(Vec2::ZERO);
        let max = a
            .max(b)
            .max(c)
            .min(Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0));
        if min.x > max.x || min.y > max.y {
            return;
        }

        for y in min.y.floor() as i32..=max.y.ceil() as i32 {
            for x in min.x.floor() as i32..=max.x.ceil() as i32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = (c - b).perp_dot(p - b) * area.signum();
                let w1 = (a - c).perp_dot(p - c) * area.signum();
                let w2 = (b - a).perp_dot(p - a) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.plot(x, y, colour);
                }
            }
        }
    }
}
