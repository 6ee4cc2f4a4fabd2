use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        app.fit_to_viewport(ctx.screen_rect().size());

        let (width, height) = app.editor().surface().dimensions();
        let size = egui::vec2(width as f32, height as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
        let rect = response.rect;

        if let Some(texture) = app.surface_texture(ctx) {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture, rect, uv, egui::Color32::WHITE);
        }

        app.handle_pointer(ctx, rect, response.hovered());
    });
}
