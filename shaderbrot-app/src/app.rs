use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use tracing::{debug, info, trace, warn};

use shaderbrot_core::{
    InputEvent, InputTranslator, Key, PointerSample, ScreenGeometry, ViewportState,
};
use shaderbrot_render::{RenderBridge, RenderError};

use crate::canvas::CanvasBackend;
use crate::events::FrameInput;
use crate::gl_program::FractalProgram;
use crate::preferences::AppPreferences;
use crate::snapshot::{
    snapshot_pixel_size, spawn_snapshot_worker, SnapshotRequest, SnapshotResponse,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct ShaderbrotApp {
    // Navigation state
    pub(crate) viewport: ViewportState,
    pub(crate) translator: InputTranslator,
    pub(crate) canvas_size: [u32; 2],
    pub(crate) pointer_centered: bool,

    // Rendering
    pub(crate) bridge: RenderBridge,
    pub(crate) program: Arc<FractalProgram>,

    // Snapshot worker
    pub(crate) snapshot_tx: mpsc::Sender<SnapshotRequest>,
    pub(crate) snapshot_rx: mpsc::Receiver<SnapshotResponse>,
    pub(crate) snapshot_status: Option<String>,

    // UI state
    pub(crate) show_hud: bool,
    pub(crate) prefs: AppPreferences,
}

// ---------------------------------------------------------------------------
// Constructor
// ---------------------------------------------------------------------------

impl ShaderbrotApp {
    pub(crate) fn new(
        cc: &eframe::CreationContext<'_>,
        prefs: &AppPreferences,
    ) -> shaderbrot_render::Result<Self> {
        let gl = cc.gl.as_ref().ok_or_else(|| {
            RenderError::Unavailable("eframe did not provide a glow context".into())
        })?;
        let program = Arc::new(FractalProgram::new(gl)?);

        let w = prefs.window_width as u32;
        let h = prefs.window_height as u32;
        let translator =
            InputTranslator::new(ScreenGeometry::new(w, h)?).with_pan_damping(prefs.pan_damping);
        let viewport = ViewportState::new(prefs.viewport_defaults());

        let (snapshot_tx, snapshot_rx) = spawn_snapshot_worker()?;

        info!(
            iterations = viewport.iterations(),
            zoom_ratio = viewport.defaults().zoom_ratio,
            "Viewer initialised"
        );

        Ok(Self {
            viewport,
            translator,
            canvas_size: [w, h],
            pointer_centered: false,

            bridge: RenderBridge::new(Instant::now()),
            program,

            snapshot_tx,
            snapshot_rx,
            snapshot_status: None,

            show_hud: prefs.show_hud,
            prefs: prefs.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Frame steps
// ---------------------------------------------------------------------------

impl ShaderbrotApp {
    /// Continuous pan from the pointer's offset to the canvas centre.
    fn pan_toward_pointer(&mut self, pointer: Option<PointerSample>) {
        let Some(pointer) = pointer else {
            return;
        };
        if let Err(e) = self.translator.apply_pan(&mut self.viewport, pointer) {
            trace!("Pan skipped: {e}");
        }
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        match ScreenGeometry::new(width, height) {
            Ok(geometry) => {
                self.translator.set_geometry(geometry);
                self.canvas_size = [width, height];
                debug!(width, height, "Canvas resized");
            }
            Err(e) => warn!("Ignoring resize: {e}"),
        }
    }

    fn apply_event(&mut self, ctx: &egui::Context, event: InputEvent, input: &FrameInput) {
        match event {
            // Applied before panning so the frame maps input with the new size.
            InputEvent::Resize { .. } => {}
            InputEvent::Scroll { direction } => {
                let pointer = input
                    .pointer
                    .unwrap_or_else(|| self.translator.geometry().center());
                if let Err(e) = self
                    .translator
                    .apply_scroll(&mut self.viewport, pointer, direction)
                {
                    warn!("Zoom step refused: {e}");
                }
                self.bridge.report_zoom(&self.viewport);
            }
            InputEvent::KeyPress { key: Key::Reset } => {
                let warp = self.translator.apply_reset(&mut self.viewport);
                warp_pointer(ctx, warp);
                info!("View reset");
            }
            InputEvent::KeyPress { key: Key::ToggleHud } => {
                self.show_hud = !self.show_hud;
            }
            InputEvent::KeyPress { key: Key::Snapshot } => {
                self.request_snapshot(ctx.pixels_per_point());
            }
            InputEvent::KeyPress { key: Key::Exit } => {
                info!("Exit requested");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn request_snapshot(&mut self, pixels_per_point: f32) {
        let [width, height] = snapshot_pixel_size(self.canvas_size, pixels_per_point);
        let request = SnapshotRequest {
            state: self.viewport,
            width,
            height,
            dir: crate::app_dir::images_directory(),
        };
        if self.snapshot_tx.send(request).is_err() {
            warn!("Snapshot worker is gone; snapshot dropped");
            self.snapshot_status = Some("Snapshot unavailable".into());
        } else {
            self.snapshot_status = Some("Saving snapshot\u{2026}".into());
        }
    }

    fn poll_snapshot_responses(&mut self) {
        while let Ok(resp) = self.snapshot_rx.try_recv() {
            self.snapshot_status = Some(match resp {
                SnapshotResponse::Saved(path) => format!("Saved {}", path.display()),
                SnapshotResponse::Failed(e) => format!("Snapshot failed: {e}"),
            });
        }
    }
}

fn warp_pointer(ctx: &egui::Context, to: PointerSample) {
    ctx.send_viewport_cmd(egui::ViewportCommand::CursorPosition(egui::pos2(
        to.x as f32,
        to.y as f32,
    )));
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for ShaderbrotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_snapshot_responses();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();

                // Poll input.
                let input = FrameInput::gather(ctx, rect);
                let events = input.events(self.canvas_size);
                for event in &events {
                    if let InputEvent::Resize { width, height } = *event {
                        self.apply_resize(width, height);
                    }
                }

                if !self.pointer_centered {
                    warp_pointer(ctx, self.translator.geometry().center());
                    self.pointer_centered = true;
                }

                // Continuous pan, then push state and draw.
                self.pan_toward_pointer(input.pointer);
                let mut backend =
                    CanvasBackend::new(ui.painter(), rect, Arc::clone(&self.program));
                // A failed frame is already logged by the bridge.
                let _ = self
                    .bridge
                    .render_frame(&self.viewport, &mut backend, Instant::now());

                // Discrete events.
                for event in events {
                    self.apply_event(ctx, event, &input);
                }
            });

        self.show_hud(ctx);
        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        if let Some(gl) = gl {
            self.program.destroy(gl);
        }
        if self.prefs.show_hud != self.show_hud {
            self.prefs.show_hud = self.show_hud;
            self.prefs.save();
        }
        info!(
            frames = self.bridge.frames_drawn(),
            dropped = self.bridge.frames_failed(),
            "Viewer closed"
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Shaderbrot");

    let prefs = AppPreferences::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shaderbrot")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        vsync: prefs.vsync,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Shaderbrot",
        options,
        Box::new(move |cc| {
            let app = ShaderbrotApp::new(cc, &prefs)?;
            Ok(Box::new(app))
        }),
    )
}
