#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod export;
pub mod fill;
pub mod glyph;
pub mod history;
pub mod panels;
mod raster;
pub mod surface;
pub mod tools;

pub use app::PaintApp;
pub use config::{SizeMode, SurfaceSettings};
pub use editor::Editor;
pub use error::{ConfigError, SurfaceError, SurfaceResult};
pub use event::{EditorEvent, EventBus, EventHandler, SubscriptionId};
pub use export::{ExportFormat, Frame, NoShare, SharePayload, ShareTarget};
pub use fill::{FillOutcome, FloodFill};
pub use history::{HistoryManager, Snapshot};
pub use surface::PixelSurface;
pub use tools::{ShapeKind, TextPrompt, ToolConfig, ToolKind, ToolOutcome, ToolStateMachine};
