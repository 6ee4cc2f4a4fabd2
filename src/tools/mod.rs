use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::fill::MAX_TOLERANCE;

mod freehand;
mod machine;
mod shape;

pub use machine::{StrokeSession, ToolOutcome, ToolStateMachine};

/// Glyphs offered by the emoji picker
pub const EMOJI_PALETTE: [&str; 12] = [
    "✨", "❤️", "😍", "⭐", "🌈", "🎨", "💫", "🦋", "🌸", "😊", "👍", "💡",
];

/// Enum representing all available tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Spray,
    Shape,
    Line,
    Text,
    Emoji,
    Fill,
    /// Placeholder with no implementation; pressing reports `NotImplemented`
    Ai,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        Self::Pencil,
        Self::Eraser,
        Self::Spray,
        Self::Shape,
        Self::Line,
        Self::Text,
        Self::Emoji,
        Self::Fill,
        Self::Ai,
    ];

    /// Return the name of the tool
    pub fn name(self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Eraser => "eraser",
            Self::Spray => "spray",
            Self::Shape => "shape",
            Self::Line => "line",
            Self::Text => "text",
            Self::Emoji => "emoji",
            Self::Fill => "fill",
            Self::Ai => "ai",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pencil => "✏",
            Self::Eraser => "⌫",
            Self::Spray => "💨",
            Self::Shape => "◻",
            Self::Line => "╱",
            Self::Text => "🅰",
            Self::Emoji => "☺",
            Self::Fill => "🪣",
            Self::Ai => "✨",
        }
    }

    /// Tools that keep a session open between press and release
    pub fn has_drag_phase(self) -> bool {
        matches!(
            self,
            Self::Pencil | Self::Eraser | Self::Spray | Self::Shape | Self::Line
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Line,
}

/// Per-tool parameters, passed explicitly to every pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ToolConfig {
    pub active_tool: ToolKind,
    pub color: Color32,
    /// Always positive
    pub stroke_size: f32,
    pub shape_kind: ShapeKind,
    pub shape_fill: bool,
    pub shape_stroke: bool,
    /// `0..=100`
    pub fill_tolerance: u8,
    pub active_emoji: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            active_tool: ToolKind::Pencil,
            color: Color32::from_rgb(0x8b, 0x5c, 0xf6),
            stroke_size: 5.0,
            shape_kind: ShapeKind::Rectangle,
            shape_fill: false,
            shape_stroke: true,
            fill_tolerance: 30,
            active_emoji: EMOJI_PALETTE[0].to_owned(),
        }
    }
}

impl ToolConfig {
    pub const MIN_STROKE_SIZE: f32 = 0.5;

    /// Clamps fields that may have come from older or hand-edited state.
    pub fn sanitized(mut self) -> Self {
        if !self.stroke_size.is_finite() || self.stroke_size < Self::MIN_STROKE_SIZE {
            self.stroke_size = Self::MIN_STROKE_SIZE;
        }
        self.fill_tolerance = self.fill_tolerance.min(MAX_TOLERANCE);
        if self.active_emoji.is_empty() {
            self.active_emoji = EMOJI_PALETTE[0].to_owned();
        }
        self
    }

    /// Stroke is forced on when a shape would otherwise be invisible.
    pub fn effective_shape_stroke(&self) -> bool {
        self.shape_stroke || !self.shape_fill
    }

    pub fn text_px(&self) -> f32 {
        (self.stroke_size * 2.5).max(12.0)
    }

    pub fn emoji_px(&self) -> f32 {
        self.stroke_size * 3.0
    }

    pub fn eraser_width(&self) -> f32 {
        self.stroke_size * 1.5
    }
}

/// Supplies the string for the text tool.
///
/// Called synchronously on press; `None` or an empty string cancels the stamp.
pub trait TextPrompt {
    fn request_text(&mut self) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn request_text(&mut self) -> Option<String> {
        self()
    }
}

/// Prompt that never supplies text
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl TextPrompt for NoPrompt {
    fn request_text(&mut self) -> Option<String> {
        None
    }
}
