// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Drawing primitives the compositor emits.

use crate::palette::Rgba;
use crate::projection::ScreenPoint;

/// Horizontal placement of text relative to its anchor. The anchor is always
/// the top edge of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Something the compositor can draw on.
pub trait Surface {
    /// Wipe the whole surface.
    fn clear(&mut self);

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgba, width: f32);

    fn circle_filled(&mut self, center: ScreenPoint, radius: f32, color: Rgba);

    fn text(&mut self, anchor: ScreenPoint, text: &str, size: f32, color: Rgba, align: TextAlign);
}

/// A recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Rgba,
        width: f32,
    },
    Circle {
        center: ScreenPoint,
        radius: f32,
        color: Rgba,
    },
    Text {
        anchor: ScreenPoint,
        text: String,
        size: f32,
        color: Rgba,
        align: TextAlign,
    },
}

impl DrawCommand {
    /// Issue this command on a surface.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self {
            Self::Line {
                from,
                to,
                color,
                width,
            } => surface.line(*from, *to, *color, *width),
            Self::Circle {
                center,
                radius,
                color,
            } => surface.circle_filled(*center, *radius, *color),
            Self::Text {
                anchor,
                text,
                size,
                color,
                align,
            } => surface.text(*anchor, text, *size, *color, *align),
        }
    }
}

/// Surface that records every call; used for headless rendering and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    pub clears: usize,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    /// Text of every label drawn, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn circle_filled(&mut self, center: ScreenPoint, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, anchor: ScreenPoint, text: &str, size: f32, color: Rgba, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            anchor,
            text: text.to_owned(),
            size,
            color,
            align,
        });
    }
}
