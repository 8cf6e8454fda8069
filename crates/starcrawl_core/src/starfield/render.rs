//! Rendering-target seam.
//!
//! The simulator never talks to a canvas directly. It paints through
//! `RenderTarget`, and hosts either implement the trait over their own
//! surface or collect a `DrawList` and replay it.

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color, alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White at `alpha`, clamped into `[0, 1]`.
    pub fn white(alpha: f32) -> Self {
        Self::new(255, 255, 255, alpha.clamp(0.0, 1.0))
    }
}

/// 2D surface the starfield paints onto.
pub trait RenderTarget {
    /// Erases the whole `width` x `height` surface.
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);
}

/// One retained paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgba,
    },
}

/// Retained command buffer.
///
/// `begin_frame` truncates without releasing capacity, so a steady-state
/// frame performs no allocation once the buffer has grown to the field size.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.commands.capacity()
    }

    /// Number of `FillCircle` commands, i.e. stars drawn this frame.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::FillCircle { .. }))
            .count()
    }
}

impl RenderTarget for DrawList {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            x,
            y,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, DrawList, RenderTarget, Rgba};

    #[test]
    fn begin_frame_keeps_capacity() {
        let mut list = DrawList::with_capacity(4);
        for _ in 0..4 {
            list.fill_circle(1.0, 2.0, 0.5, Rgba::white(0.5));
        }
        let capacity = list.capacity();
        list.begin_frame();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), capacity);
    }

    #[test]
    fn white_clamps_alpha() {
        assert_eq!(Rgba::white(1.7).a, 1.0);
        assert_eq!(Rgba::white(-0.2).a, 0.0);
        assert_eq!(Rgba::white(0.5), Rgba::new(255, 255, 255, 0.5));
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let json = serde_json::to_string(&DrawCommand::Clear {
            width: 2.0,
            height: 3.0,
        })
        .expect("draw command should serialize");
        assert_eq!(json, r#"{"op":"clear","width":2.0,"height":3.0}"#);
    }
}
