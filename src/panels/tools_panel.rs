use crate::PaintApp;
use crate::fill::MAX_TOLERANCE;
use crate::tools::{EMOJI_PALETTE, ShapeKind, ToolKind};

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.editor.config().active_tool;
            for tool in ToolKind::ALL {
                let label = format!("{} {}", tool.icon(), tool.name());
                if ui.selectable_label(active == tool, label).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    app.editor.set_tool(tool);
                }
            }
            ui.label(format!("State: {}", app.editor.tool_state_name()));
            ui.separator();

            tool_options(app, ui);
            ui.separator();

            ui.horizontal(|ui| {
                if ui.add_enabled(app.editor.can_undo(), egui::Button::new("Undo")).clicked() {
                    app.editor.undo();
                }
                if ui.add_enabled(app.editor.can_redo(), egui::Button::new("Redo")).clicked() {
                    app.editor.redo();
                }
                if ui.button("Clear").clicked() {
                    app.editor.clear();
                }
            });
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", app.editor.history().undo_len()));
                ui.label(format!("Redo stack size: {}", app.editor.history().redo_len()));
            });
            ui.separator();

            if ui.button(format!("Size: {}", app.size_mode.label())).clicked() {
                app.cycle_size_mode();
            }
            ui.horizontal(|ui| {
                let format_label = app.export_format.extension().to_uppercase();
                if ui.button(format_label).clicked() {
                    app.export_format = app.export_format.cycle();
                }
                ui.checkbox(&mut app.framed_export, "Frame");
                if ui.button("Save").clicked() {
                    app.save_export();
                }
                if ui.button("Share").clicked() {
                    app.share(ui.ctx());
                }
            });

            let status = app.status.borrow().clone();
            if !status.is_empty() {
                ui.separator();
                ui.label(status);
            }
        });
}

fn tool_options(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Tool Options");
    let config = app.editor.config().clone();

    let mut color = config.color;
    if ui.color_edit_button_srgba(&mut color).changed() {
        app.editor.set_color(color);
    }

    let mut size = config.stroke_size;
    if ui.add(egui::Slider::new(&mut size, 1.0..=50.0).text("Size")).changed() {
        app.editor.set_stroke_size(size);
    }

    match config.active_tool {
        ToolKind::Shape => {
            ui.horizontal(|ui| {
                for (kind, label) in [
                    (ShapeKind::Rectangle, "Rectangle"),
                    (ShapeKind::Circle, "Circle"),
                    (ShapeKind::Line, "Line"),
                ] {
                    if ui.selectable_label(config.shape_kind == kind, label).clicked() {
                        app.editor.set_shape_kind(kind);
                    }
                }
            });
            let mut fill = config.shape_fill;
            if ui.checkbox(&mut fill, "Fill").changed() {
                app.editor.set_shape_fill(fill);
            }
            let mut stroke = config.shape_stroke;
            if ui.checkbox(&mut stroke, "Stroke").changed() {
                app.editor.set_shape_stroke(stroke);
            }
        }
        ToolKind::Fill => {
            let mut tolerance = config.fill_tolerance;
            if ui
                .add(egui::Slider::new(&mut tolerance, 0..=MAX_TOLERANCE).text("Tolerance"))
                .changed()
            {
                app.editor.set_fill_tolerance(tolerance);
            }
        }
        ToolKind::Emoji => {
            egui::Grid::new("emoji_palette").show(ui, |ui| {
                for (i, emoji) in EMOJI_PALETTE.iter().enumerate() {
                    if ui.selectable_label(config.active_emoji == *emoji, *emoji).clicked() {
                        app.editor.set_emoji(*emoji);
                    }
                    if i % 4 == 3 {
                        ui.end_row();
                    }
                }
            });
        }
        ToolKind::Text => {
            ui.text_edit_singleline(&mut *app.text_input.borrow_mut());
        }
        ToolKind::Pencil
        | ToolKind::Eraser
        | ToolKind::Spray
        | ToolKind::Line
        | ToolKind::Ai => {}
    }
}
