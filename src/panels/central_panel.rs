use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(egui::Color32::from_gray(60)))
        .show(ctx, |ui| {
            let [width, height] = app.context().base().size();
            let canvas_size = egui::vec2(width as f32, height as f32);
            let (canvas_rect, _response) = ui.allocate_exact_size(canvas_size, egui::Sense::click_and_drag());

            // Handle input before painting so this frame shows its result
            app.handle_input(ctx, canvas_rect);

            if let Some((base, preview)) = app.textures(ctx) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                let painter = ui.painter_at(canvas_rect);
                painter.image(base.id(), canvas_rect, uv, egui::Color32::WHITE);
                painter.image(preview.id(), canvas_rect, uv, egui::Color32::WHITE);
            }
        });
}
