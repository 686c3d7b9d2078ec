use crate::PaintApp;
use crate::color::Color;
use crate::components::ToolButton;
use crate::config::{FillStyle, ToolSettings};
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.context().tool_kind();
            ui.horizontal_wrapped(|ui| {
                for kind in ToolKind::ALL {
                    if ToolButton::new(kind, kind == active).show(ui).clicked() && kind != active {
                        log::info!("Tool selected from UI: {}", kind.label());
                        app.set_tool(kind);
                    }
                }
            });
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let history = app.context().history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });
            let history = app.context().history();
            ui.label(format!(
                "Undo stack size: {}  Redo stack size: {}",
                history.past_size(),
                history.redo_size()
            ));
            ui.separator();

            colors_section(app, ui);
            ui.separator();

            settings_section(app, ui);
            ui.separator();

            document_section(app, ui);

            if let Some(err) = app.last_error() {
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_RED, err);
            }
        });
}

fn colors_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    let palette = app.context().palette();
    let mut primary = egui::Color32::from(palette.primary());
    let mut secondary = egui::Color32::from(palette.secondary());
    let history: Vec<Color> = palette.history().copied().collect();

    ui.horizontal(|ui| {
        ui.label("Primary");
        if ui.color_edit_button_srgba(&mut primary).changed() {
            app.context_mut().palette_mut().set_primary(Color::from(primary));
        }
        ui.label("Secondary");
        if ui.color_edit_button_srgba(&mut secondary).changed() {
            app.context_mut().palette_mut().set_secondary(Color::from(secondary));
        }
        if ui.small_button("⇄").on_hover_text("Swap colours").clicked() {
            app.context_mut().palette_mut().swap();
        }
    });

    ui.horizontal_wrapped(|ui| {
        for color in history {
            let swatch = egui::Button::new("").fill(egui::Color32::from(color)).min_size(egui::vec2(16.0, 16.0));
            if ui.add(swatch).on_hover_text(color.to_hex()).clicked() {
                app.context_mut().palette_mut().set_primary(color);
            }
        }
    });
}

fn settings_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    let mut settings = app.context().settings().clone();
    let kind = app.context().tool_kind();

    ui.heading("Tool Options");
    match kind {
        ToolKind::Pencil | ToolKind::Line | ToolKind::Rectangle | ToolKind::Ellipse => {
            let (lo, hi) = ToolSettings::LINE_WIDTH_RANGE;
            ui.add(egui::Slider::new(&mut settings.line_width, lo..=hi).text("Line width"));
        }
        ToolKind::Eraser => {
            let (lo, hi) = ToolSettings::ERASER_SIZE_RANGE;
            ui.add(egui::Slider::new(&mut settings.eraser_size, lo..=hi).text("Eraser size"));
        }
        ToolKind::PaintBucket => {
            ui.add(egui::Slider::new(&mut settings.tolerance, 0.0..=100.0).text("Tolerance %"));
            ui.checkbox(&mut settings.contiguous, "Contiguous");
        }
        ToolKind::Selection => {
            ui.label("Drag to select. Shift keeps the ratio while resizing a corner.");
        }
    }
    if matches!(kind, ToolKind::Rectangle | ToolKind::Ellipse) {
        egui::ComboBox::from_label("Fill")
            .selected_text(format!("{:?}", settings.fill_style))
            .show_ui(ui, |ui| {
                for style in [FillStyle::Outline, FillStyle::Fill, FillStyle::FillAndOutline] {
                    ui.selectable_value(&mut settings.fill_style, style, format!("{style:?}"));
                }
            });
    }
    if kind == ToolKind::Line {
        ui.checkbox(&mut settings.show_junctions, "Junctions");
        let (lo, hi) = ToolSettings::JUNCTION_RANGE;
        ui.add(egui::Slider::new(&mut settings.junction_diameter, lo..=hi).text("Junction size"));
    }

    if &settings != app.context().settings() {
        app.context_mut().set_settings(settings);
    }
}

fn document_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    let [width, height] = app.context().base().size();
    ui.label(format!("Canvas {width} x {height}"));
    ui.horizontal(|ui| {
        if ui.button("New").clicked() {
            app.new_document(width, height);
        }
        if ui.button("Wider").on_hover_text("Add 100 px on the right").clicked() {
            app.resize_canvas(width + 100, height);
        }
        if ui.button("Taller").on_hover_text("Add 100 px at the bottom").clicked() {
            app.resize_canvas(width, height + 100);
        }
    });
    if let Some(metadata) = app.latest_snapshot().metadata() {
        ui.label(format!("Last snapshot: {} commands", metadata.command_count));
    }
}
