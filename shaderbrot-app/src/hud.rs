use eframe::egui;

use shaderbrot_core::ZoomReport;
use shaderbrot_render::ViewportUniforms;

use crate::app::{ShaderbrotApp, HUD_CORNER_RADIUS, HUD_MARGIN};

const HUD_ALPHA: u8 = 166;

impl ShaderbrotApp {
    pub(crate) fn show_hud(&self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }

        let report = ZoomReport::capture(&self.viewport, self.bridge.fps());
        let bounds = report.bounds;

        // -- Top-left: viewport info --
        egui::Area::new(egui::Id::new("hud_viewport"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        ui.label(format!("FPS: {}", report.fps));
                        ui.label(format!(
                            "X: {:.15} .. {:.15}",
                            bounds.min_x(),
                            bounds.max_x()
                        ));
                        ui.label(format!(
                            "Y: {:.15} .. {:.15}",
                            bounds.min_y(),
                            bounds.max_y()
                        ));
                        ui.label(format!("Zoom: {:.3e}", report.zoom));
                        ui.label(format!("Iterations: {}", report.iterations));

                        if ViewportUniforms::from_state(&self.viewport).exceeds_f32_precision() {
                            ui.colored_label(
                                egui::Color32::from_rgb(255, 180, 50),
                                "Beyond GPU float precision: image will be flat",
                            );
                        }
                        if let Some(ref status) = self.snapshot_status {
                            ui.label(status);
                        }
                    });
            });

        // -- Bottom-left: controls --
        egui::Area::new(egui::Id::new("hud_controls"))
            .anchor(egui::Align2::LEFT_BOTTOM, [HUD_MARGIN, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(6))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(180, 180, 180));
                        ui.small(
                            "Pointer off-centre: drift  \u{b7}  Scroll: zoom  \u{b7}  Space: reset  \
                             \u{b7}  P: snapshot  \u{b7}  H: HUD  \u{b7}  Esc: quit",
                        );
                    });
            });
    }
}
