//! The editor ties the surface, tools and history together.
//!
//! Hosts forward pointer events and toolbar actions here; every mutation of
//! the surface goes through this type so history and events stay in step
//! with the pixels.

use std::path::Path;

use egui::{Color32, Pos2};

use crate::config::SurfaceSettings;
use crate::error::{SurfaceError, SurfaceResult};
use crate::event::{EditorEvent, EventBus, EventHandler, SubscriptionId};
use crate::export::{self, ExportFormat, Frame, SharePayload, ShareTarget};
use crate::fill::MAX_TOLERANCE;
use crate::history::HistoryManager;
use crate::surface::PixelSurface;
use crate::tools::{NoPrompt, ShapeKind, TextPrompt, ToolConfig, ToolKind, ToolOutcome, ToolStateMachine};

pub struct Editor {
    surface: PixelSurface,
    history: HistoryManager,
    machine: ToolStateMachine,
    config: ToolConfig,
    settings: SurfaceSettings,
    events: EventBus,
    prompt: Box<dyn TextPrompt>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("surface", &self.surface)
            .field("history", &self.history)
            .field("machine", &self.machine)
            .field("config", &self.config)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Creates the surface and records it as the first history entry.
    pub fn new(settings: SurfaceSettings) -> SurfaceResult<Self> {
        let surface = PixelSurface::from_settings(&settings)?;
        let mut history = HistoryManager::with_limit(settings.history_limit);
        history.reset_to(surface.snapshot());
        log::debug!("Editor ready with a {}x{} surface", surface.width(), surface.height());
        Ok(Self {
            surface,
            history,
            machine: ToolStateMachine::new().with_fill_iteration_factor(settings.fill_iteration_factor),
            config: ToolConfig::default(),
            settings,
            events: EventBus::new(),
            prompt: Box::new(NoPrompt),
        })
    }

    /// Makes spray output reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.machine =
            ToolStateMachine::with_seed(seed).with_fill_iteration_factor(self.settings.fill_iteration_factor);
        self
    }

    pub fn with_text_prompt(mut self, prompt: impl TextPrompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    pub fn with_config(mut self, config: ToolConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) -> SubscriptionId {
        self.events.subscribe(Box::new(handler))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn tool_state_name(&self) -> &'static str {
        self.machine.current_state_name()
    }

    /// True while a press is waiting for its release
    pub fn is_busy(&self) -> bool {
        !self.machine.is_idle()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn press(&mut self, point: Pos2) -> SurfaceResult<ToolOutcome> {
        // A press without the previous release still records the earlier stroke on its own
        self.finish_session();
        let result = self
            .machine
            .on_press(point, &self.config, &mut self.surface, self.prompt.as_mut());
        match result {
            Ok(outcome) => {
                self.settle(outcome);
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("{} tool failed: {}", self.config.active_tool.name(), err);
                self.events.emit(EditorEvent::Failed { message: err.to_string() });
                Err(err)
            }
        }
    }

    pub fn move_to(&mut self, point: Pos2) -> ToolOutcome {
        self.machine.on_move(point, &self.config, &mut self.surface)
    }

    pub fn release(&mut self) -> ToolOutcome {
        let outcome = self.machine.on_release(&self.config, &mut self.surface);
        self.settle(outcome);
        outcome
    }

    /// Switches tools, finishing or discarding any open session first.
    pub fn set_tool(&mut self, tool: ToolKind) {
        let old = self.config.active_tool;
        if old == tool {
            return;
        }
        self.finish_session();
        self.config.active_tool = tool;
        log::debug!("Tool changed from {} to {}", old.name(), tool.name());
        self.events.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    pub fn set_color(&mut self, color: Color32) {
        self.config.color = color;
    }

    pub fn set_stroke_size(&mut self, size: f32) {
        self.config.stroke_size = size;
        self.config = std::mem::take(&mut self.config).sanitized();
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.config.shape_kind = kind;
    }

    pub fn set_shape_fill(&mut self, fill: bool) {
        self.config.shape_fill = fill;
    }

    pub fn set_shape_stroke(&mut self, stroke: bool) {
        self.config.shape_stroke = stroke;
    }

    pub fn set_fill_tolerance(&mut self, tolerance: u8) {
        self.config.fill_tolerance = tolerance.min(MAX_TOLERANCE);
    }

    /// Empty strings are ignored.
    pub fn set_emoji(&mut self, emoji: impl Into<String>) {
        let emoji = emoji.into();
        if !emoji.is_empty() {
            self.config.active_emoji = emoji;
        }
    }

    /// Replaces every tool parameter at once, e.g. from a settings panel.
    pub fn apply_config(&mut self, config: ToolConfig) {
        let config = config.sanitized();
        self.set_tool(config.active_tool);
        self.config = config;
    }

    /// Returns `false` when only the initial state remains.
    pub fn undo(&mut self) -> bool {
        self.finish_session();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.surface.restore(snapshot);
        self.sync_rescaled_current();
        log::debug!("Undo; undo depth {}", self.history.undo_len());
        self.events.emit(EditorEvent::Undone {
            undo_depth: self.history.undo_len(),
            redo_depth: self.history.redo_len(),
        });
        true
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.finish_session();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.surface.restore(snapshot);
        self.sync_rescaled_current();
        log::debug!("Redo; undo depth {}", self.history.undo_len());
        self.events.emit(EditorEvent::Redone {
            undo_depth: self.history.undo_len(),
            redo_depth: self.history.redo_len(),
        });
        true
    }

    /// Paints the whole surface with the background colour as an undoable edit.
    pub fn clear(&mut self) {
        self.finish_session();
        self.surface.clear();
        self.events.emit(EditorEvent::Cleared);
        self.record();
    }

    /// Resizes the surface, rescaling the current drawing into it.
    ///
    /// Resizing is not an edit of its own; history entries taken at other
    /// sizes are rescaled when they are restored.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.finish_session();
        let before = self.surface.dimensions();
        self.surface.resize(width, height);
        let (width, height) = self.surface.dimensions();
        if (width, height) != before {
            self.sync_rescaled_current();
            self.events.emit(EditorEvent::Resized { width, height });
        }
    }

    /// Encodes the current pixels, optionally inside the decorative frame.
    pub fn export(&self, format: ExportFormat, framed: bool) -> SurfaceResult<Vec<u8>> {
        let result = if framed {
            let frame = Frame::new(self.config.color, self.settings.caption.clone());
            let image = export::framed(self.surface.image(), &frame, self.surface.glyphs());
            export::encode(&image, format)
        } else {
            export::encode(self.surface.image(), format)
        };
        result.inspect_err(|err| self.events.emit(EditorEvent::Failed { message: err.to_string() }))
    }

    /// Writes an export to `path`, choosing the format from its extension.
    pub fn export_to_path(&self, path: impl AsRef<Path>, framed: bool) -> SurfaceResult<ExportFormat> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path)
            .inspect_err(|err| self.events.emit(EditorEvent::Failed { message: err.to_string() }))?;
        let bytes = self.export(format, framed)?;
        std::fs::write(path, bytes)
            .inspect_err(|err| self.events.emit(EditorEvent::Failed { message: err.to_string() }))?;
        log::info!("Saved {}", path.display());
        Ok(format)
    }

    /// Encodes a PNG and hands it to `target`.
    ///
    /// Fails with `UnsupportedCapability` when the host cannot share images.
    pub fn share(&self, target: &mut dyn ShareTarget) -> SurfaceResult<()> {
        let format = ExportFormat::Png;
        if !target.can_share(format.mime_type()) {
            let err = SurfaceError::UnsupportedCapability(
                "sharing is not supported here; save the image instead".to_owned(),
            );
            self.events.emit(EditorEvent::Failed { message: err.to_string() });
            return Err(err);
        }
        let payload = SharePayload {
            file_name: format.file_name(),
            mime_type: format.mime_type(),
            title: "My Doodlepad artwork".to_owned(),
            text: self.settings.caption.clone(),
            bytes: self.export(format, false)?,
            image: self.surface.image().clone(),
        };
        target
            .share(&payload)
            .inspect_err(|err| self.events.emit(EditorEvent::Failed { message: err.to_string() }))?;
        log::info!("Shared {}", payload.file_name);
        Ok(())
    }

    /// Keeps the top of the undo stack equal to the live pixels after a rescale.
    fn sync_rescaled_current(&mut self) {
        let stale = self
            .history
            .current()
            .is_some_and(|current| current.dimensions() != self.surface.dimensions());
        if stale {
            self.history.replace_current(self.surface.snapshot());
        }
    }

    fn finish_session(&mut self) {
        let outcome = self.machine.cancel(&mut self.surface);
        self.settle(outcome);
    }

    fn settle(&mut self, outcome: ToolOutcome) {
        match outcome {
            ToolOutcome::Commit => {
                self.record();
            }
            ToolOutcome::Unchanged => self.events.emit(EditorEvent::Unchanged {
                tool: self.config.active_tool,
            }),
            ToolOutcome::Idle | ToolOutcome::Pending => {}
        }
    }

    fn record(&mut self) -> bool {
        let recorded = self.history.commit(self.surface.snapshot());
        if recorded {
            self.events.emit(EditorEvent::Committed {
                undo_depth: self.history.undo_len(),
            });
        } else {
            self.events.emit(EditorEvent::Unchanged {
                tool: self.config.active_tool,
            });
        }
        recorded
    }
}
