use std::cell::RefCell;
use std::rc::Rc;

use egui::{ColorImage, Pos2, Rect, TextureHandle, TextureOptions, Vec2};

use crate::config::{SizeMode, SurfaceSettings};
use crate::editor::Editor;
use crate::error::{SurfaceError, SurfaceResult};
use crate::event::EditorEvent;
use crate::export::{ExportFormat, SharePayload, ShareTarget};
use crate::panels::{central_panel, tools_panel};
use crate::tools::ToolConfig;

/// The part of the UI state that survives restarts.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PersistedState {
    pub tools: ToolConfig,
    pub size_mode: SizeMode,
    pub export_format: ExportFormat,
    pub framed_export: bool,
}

pub struct PaintApp {
    pub(crate) editor: Editor,
    pub(crate) size_mode: SizeMode,
    pub(crate) export_format: ExportFormat,
    pub(crate) framed_export: bool,
    /// Read by the text tool on press
    pub(crate) text_input: Rc<RefCell<String>>,
    pub(crate) status: Rc<RefCell<String>>,
    texture: Option<TextureHandle>,
    texture_revision: Option<u64>,
    last_viewport: Option<Vec2>,
    pointer_down: bool,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: SurfaceSettings) -> SurfaceResult<Self> {
        let persisted: PersistedState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_state(settings, persisted)
    }

    pub fn with_state(settings: SurfaceSettings, persisted: PersistedState) -> SurfaceResult<Self> {
        let text_input = Rc::new(RefCell::new(String::from("Hello")));
        let prompt_text = Rc::clone(&text_input);
        let editor = Editor::new(settings)?
            .with_config(persisted.tools)
            .with_text_prompt(move || Some(prompt_text.borrow().clone()));

        let status = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&status);
        editor.subscribe(move |event: &EditorEvent| {
            if let Some(message) = status_message(event) {
                *sink.borrow_mut() = message;
            }
        });

        Ok(Self {
            editor,
            size_mode: persisted.size_mode,
            export_format: persisted.export_format,
            framed_export: persisted.framed_export,
            text_input,
            status,
            texture: None,
            texture_revision: None,
            last_viewport: None,
            pointer_down: false,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub(crate) fn cycle_size_mode(&mut self) {
        self.size_mode = self.size_mode.cycle();
        self.last_viewport = None;
    }

    pub(crate) fn save_export(&mut self) {
        let file_name = self.export_format.file_name();
        match self.editor.export_to_path(&file_name, self.framed_export) {
            Ok(_) => *self.status.borrow_mut() = format!("Saved {file_name}"),
            Err(err) => log::error!("Export failed: {}", err),
        }
    }

    pub(crate) fn share(&mut self, ctx: &egui::Context) {
        let mut clipboard = ClipboardShare { ctx: ctx.clone() };
        match self.editor.share(&mut clipboard) {
            Ok(()) => *self.status.borrow_mut() = "Copied to clipboard".to_owned(),
            Err(err) => log::warn!("Share failed: {}", err),
        }
    }

    /// Resizes the surface when the viewport or size preset changed.
    pub(crate) fn fit_to_viewport(&mut self, viewport: Vec2) {
        if self.last_viewport == Some(viewport) {
            return;
        }
        self.last_viewport = Some(viewport);
        let (width, height) = self
            .size_mode
            .dimensions(viewport, self.editor.settings().min_dimension);
        self.editor.resize(width, height);
    }

    /// Uploads the surface pixels when they changed since the last frame.
    pub(crate) fn surface_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let surface = self.editor.surface();
        let revision = surface.revision();
        if self.texture.is_none() || self.texture_revision != Some(revision) {
            let image = ColorImage::from_rgba_unmultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.image().as_raw(),
            );
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::NEAREST),
                None => self.texture = Some(ctx.load_texture("surface", image, TextureOptions::NEAREST)),
            }
            self.texture_revision = Some(revision);
        }
        self.texture.as_ref().map(TextureHandle::id)
    }

    /// Forwards pointer activity over `rect` to the editor in surface coordinates.
    pub(crate) fn handle_pointer(&mut self, ctx: &egui::Context, rect: Rect, hovered: bool) {
        let (pressed, released, moved, position) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != Vec2::ZERO,
                i.pointer.interact_pos(),
            )
        });
        let Some(position) = position else {
            return;
        };
        let point = self.to_surface(rect, position);

        if pressed && hovered && rect.contains(position) {
            // Errors are reported through the event bus
            if self.editor.press(point).is_ok() {
                self.pointer_down = self.editor.is_busy();
            }
        } else if self.pointer_down && moved {
            self.editor.move_to(point);
        }

        if released && self.pointer_down {
            self.pointer_down = false;
            self.editor.release();
        }
    }

    fn to_surface(&self, rect: Rect, position: Pos2) -> Pos2 {
        let (width, height) = self.editor.surface().dimensions();
        let scale_x = width as f32 / rect.width().max(1.0);
        let scale_y = height as f32 / rect.height().max(1.0);
        let local = position - rect.min;
        Pos2::new(local.x * scale_x, local.y * scale_y)
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input_mut(|i| {
            let redo = i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z);
            let undo = i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z);
            (undo, redo)
        });
        if redo {
            self.editor.redo();
        } else if undo {
            self.editor.undo();
        }
    }
}

/// Shares by placing the image on the system clipboard.
struct ClipboardShare {
    ctx: egui::Context,
}

impl ShareTarget for ClipboardShare {
    fn can_share(&self, mime_type: &str) -> bool {
        mime_type.starts_with("image/")
    }

    fn share(&mut self, payload: &SharePayload) -> SurfaceResult<()> {
        let (width, height) = payload.image.dimensions();
        if width == 0 || height == 0 {
            return Err(SurfaceError::UnreadableBuffer { width, height, len: payload.image.len() });
        }
        let image = ColorImage::from_rgba_unmultiplied([width as usize, height as usize], payload.image.as_raw());
        self.ctx.copy_image(image);
        Ok(())
    }
}

fn status_message(event: &EditorEvent) -> Option<String> {
    match event {
        EditorEvent::Committed { .. } => Some(String::new()),
        EditorEvent::Undone { .. } => Some("Undone".to_owned()),
        EditorEvent::Redone { .. } => Some("Redone".to_owned()),
        EditorEvent::Cleared => Some("Cleared".to_owned()),
        EditorEvent::Resized { width, height } => Some(format!("{width} x {height}")),
        EditorEvent::Failed { message } => Some(message.clone()),
        EditorEvent::Unchanged { .. } | EditorEvent::ToolChanged { .. } => None,
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            tools: self.editor.config().clone(),
            size_mode: self.size_mode,
            export_format: self.export_format,
            framed_export: self.framed_export,
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
