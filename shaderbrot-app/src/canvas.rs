use std::sync::Arc;

use eframe::{egui, egui_glow};
use tracing::error;

use shaderbrot_render::{RenderError, ShaderBackend, ViewportUniforms};

use crate::gl_program::FractalProgram;

/// Draws the fractal program into an egui rect through a paint callback.
///
/// `draw` queues the callback; the GL work itself runs when egui paints the
/// frame, so a GL failure there is logged and only that frame is lost.
pub(crate) struct CanvasBackend<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    program: Arc<FractalProgram>,
    pending: Option<ViewportUniforms>,
}

impl<'a> CanvasBackend<'a> {
    pub(crate) fn new(painter: &'a egui::Painter, rect: egui::Rect, program: Arc<FractalProgram>) -> Self {
        Self {
            painter,
            rect,
            program,
            pending: None,
        }
    }
}

impl ShaderBackend for CanvasBackend<'_> {
    fn set_viewport_uniforms(&mut self, uniforms: &ViewportUniforms) -> shaderbrot_render::Result<()> {
        self.pending = Some(*uniforms);
        Ok(())
    }

    fn draw(&mut self) -> shaderbrot_render::Result<()> {
        let uniforms = self.pending.take().ok_or(RenderError::UniformsNotSet)?;
        let program = Arc::clone(&self.program);
        let callback = egui_glow::CallbackFn::new(move |_info, painter| {
            if let Err(e) = program.paint(painter.gl(), &uniforms) {
                error!("Fractal draw failed: {e}");
            }
        });
        self.painter.add(egui::PaintCallback {
            rect: self.rect,
            callback: Arc::new(callback),
        });
        Ok(())
    }
}
