//! Draw-call contract between the simulation and whatever paints it.
//!
//! The game only ever issues filled circles, filled rectangles and text in world units. A
//! [`DrawList`] records those calls so the terminal frontend (or a test) can consume them.

use derive_deref::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Semantic colour of a draw call. The frontend maps these to real colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Paint {
    Sky,
    Bird,
    Pipe,
    Ground,
    Text,
    Alert,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle { x: f32, y: f32, radius: f32, paint: Paint },
    Rect { x: f32, y: f32, width: f32, height: f32, paint: Paint },
    // `y` is the text baseline.
    Text { x: f32, y: f32, text: String, paint: Paint },
}

pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, paint: Paint);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint);
    fn fill_text(&mut self, x: f32, y: f32, text: &str, paint: Paint);
}

#[derive(Debug, Default, Clone, Deref, DerefMut)]
pub struct DrawList(pub Vec<DrawCommand>);

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.0.clear();
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, paint: Paint) {
        self.push(DrawCommand::Circle { x, y, radius, paint });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        self.push(DrawCommand::Rect { x, y, width, height, paint });
    }

    fn fill_text(&mut self, x: f32, y: f32, text: &str, paint: Paint) {
        self.push(DrawCommand::Text { x, y, text: text.to_string(), paint });
    }
}
