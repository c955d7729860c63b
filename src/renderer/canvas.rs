//! Display list for one frame
//!
//! The scene builder paints into a [`Frame`] in back-to-front order; the GPU
//! side replays its batches in the same order. Consecutive draws with the
//! same blend mode (or the same sprite) share one batch.

use std::ops::Range;

use glam::Vec2;

use super::color::Rgba;
use super::vertex::{SpriteVertex, Vertex};
use crate::assets::SpriteHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Alpha,
    /// Light-adding, for fire and glows
    Additive,
}

/// One GPU draw call
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    /// Range into [`Frame::vertices`]
    Shapes { blend: Blend, range: Range<u32> },
    /// Range into [`Frame::sprite_vertices`]
    Sprite {
        handle: SpriteHandle,
        range: Range<u32>,
    },
}

/// Timed-mode banners the shell may want to show as text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    pub incinerator: bool,
    pub jump: bool,
    pub two_lane: bool,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub clear: Rgba,
    pub vertices: Vec<Vertex>,
    pub sprite_vertices: Vec<SpriteVertex>,
    pub batches: Vec<Batch>,
    pub overlays: Overlays,
    offset: Vec2,
    blend: Blend,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            clear: super::color::BLACK,
            vertices: Vec::with_capacity(16 * 1024),
            sprite_vertices: Vec::new(),
            batches: Vec::new(),
            overlays: Overlays::default(),
            offset: Vec2::ZERO,
            blend: Blend::Alpha,
        }
    }

    /// Translate everything painted from now on (screen shake)
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    /// Append a triangle list
    pub fn fill(&mut self, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        let offset = self.offset;
        self.vertices.extend(vertices.into_iter().map(|mut v| {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
            v
        }));
        let end = self.vertices.len() as u32;

        let blend = self.blend;
        match self.batches.last_mut() {
            Some(Batch::Shapes { blend: b, range }) if *b == blend && range.end == start => {
                range.end = end;
            }
            _ => self.batches.push(Batch::Shapes {
                blend,
                range: start..end,
            }),
        }
    }

    /// Textured quad centred on `center`
    pub fn sprite(&mut self, handle: SpriteHandle, center: Vec2, size: Vec2, tint: Rgba) {
        self.sprite_rotated(handle, center, size, 0.0, tint);
    }

    pub fn sprite_rotated(
        &mut self,
        handle: SpriteHandle,
        center: Vec2,
        size: Vec2,
        angle: f32,
        tint: Rgba,
    ) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let rot = Vec2::from_angle(angle);
        let c = center + self.offset;
        let h = size / 2.0;
        let corner = |x: f32, y: f32, u: f32, v: f32| {
            let p = c + rot.rotate(Vec2::new(x, y));
            SpriteVertex::new(p.x, p.y, u, v, tint)
        };
        let tl = corner(-h.x, -h.y, 0.0, 0.0);
        let tr = corner(h.x, -h.y, 1.0, 0.0);
        let br = corner(h.x, h.y, 1.0, 1.0);
        let bl = corner(-h.x, h.y, 0.0, 1.0);

        let start = self.sprite_vertices.len() as u32;
        self.sprite_vertices.extend([tl, tr, br, tl, br, bl]);
        let end = self.sprite_vertices.len() as u32;

        match self.batches.last_mut() {
            Some(Batch::Sprite {
                handle: current,
                range,
            }) if *current == handle && range.end == start => {
                range.end = end;
            }
            _ => self.batches.push(Batch::Sprite {
                handle,
                range: start..end,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::color::WHITE;
    use crate::renderer::shapes;

    const HANDLE: SpriteHandle = SpriteHandle {
        id: 3,
        width: 8,
        height: 8,
    };

    #[test]
    fn test_same_blend_merges() {
        let mut frame = Frame::new();
        frame.fill(shapes::rect(0.0, 0.0, 1.0, 1.0, WHITE));
        frame.fill(shapes::rect(1.0, 0.0, 1.0, 1.0, WHITE));
        assert_eq!(
            frame.batches,
            vec![Batch::Shapes {
                blend: Blend::Alpha,
                range: 0..12
            }]
        );
    }

    #[test]
    fn test_order_is_preserved_across_kinds() {
        let mut frame = Frame::new();
        frame.fill(shapes::rect(0.0, 0.0, 1.0, 1.0, WHITE));
        frame.sprite(HANDLE, Vec2::ZERO, Vec2::ONE, WHITE);
        frame.fill(shapes::rect(0.0, 0.0, 1.0, 1.0, WHITE));
        frame.set_blend(Blend::Additive);
        frame.fill(shapes::rect(0.0, 0.0, 1.0, 1.0, WHITE));

        assert_eq!(frame.batches.len(), 4);
        assert!(matches!(frame.batches[1], Batch::Sprite { range: ref r, .. } if *r == (0..6)));
        assert!(matches!(
            frame.batches[2],
            Batch::Shapes { blend: Blend::Alpha, ref range } if *range == (6..12)
        ));
        assert!(matches!(
            frame.batches[3],
            Batch::Shapes {
                blend: Blend::Additive,
                ..
            }
        ));
    }

    #[test]
    fn test_offset_shifts_geometry() {
        let mut frame = Frame::new();
        frame.set_offset(Vec2::new(3.0, -2.0));
        frame.fill(shapes::rect(0.0, 0.0, 1.0, 1.0, WHITE));
        frame.sprite(HANDLE, Vec2::ZERO, Vec2::splat(2.0), WHITE);
        assert_eq!(frame.vertices[0].position, [3.0, -2.0]);
        assert_eq!(frame.sprite_vertices[0].position, [2.0, -3.0]);
    }

    #[test]
    fn test_degenerate_sprite_skipped() {
        let mut frame = Frame::new();
        frame.sprite(HANDLE, Vec2::ZERO, Vec2::new(0.0, 4.0), WHITE);
        assert!(frame.batches.is_empty());
    }
}
