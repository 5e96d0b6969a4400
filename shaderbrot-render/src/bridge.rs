use std::time::Instant;

use tracing::{info, trace, warn};

use shaderbrot_core::{FrameCounter, ViewportState, ZoomReport};

use crate::backend::{ShaderBackend, ViewportUniforms};

/// Pushes the viewport state to a [`ShaderBackend`] once per frame and keeps
/// the frame statistics the diagnostics report needs.
///
/// A failed push or draw only costs that frame: it is logged and counted,
/// and the next frame pushes fresh values.
#[derive(Debug, Clone)]
pub struct RenderBridge {
    frames: FrameCounter,
    frames_drawn: u64,
    frames_failed: u64,
    last_pushed: Option<ViewportUniforms>,
}

impl RenderBridge {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: FrameCounter::new(now),
            frames_drawn: 0,
            frames_failed: 0,
            last_pushed: None,
        }
    }

    /// Count the frame, push the uniforms, and draw.
    pub fn render_frame<B: ShaderBackend + ?Sized>(
        &mut self,
        state: &ViewportState,
        backend: &mut B,
        now: Instant,
    ) -> crate::Result<()> {
        if self.frames.tick(now) {
            trace!(fps = self.frames.fps(), "Frame rate updated");
        }

        let uniforms = ViewportUniforms::from_state(state);
        let outcome = backend
            .set_viewport_uniforms(&uniforms)
            .and_then(|()| backend.draw());

        match outcome {
            Ok(()) => {
                self.frames_drawn += 1;
                self.last_pushed = Some(uniforms);
                Ok(())
            }
            Err(e) => {
                self.frames_failed += 1;
                warn!(failed = self.frames_failed, "Frame dropped: {e}");
                Err(e)
            }
        }
    }

    /// Frames per second over the last completed second.
    pub fn fps(&self) -> u32 {
        self.frames.fps()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_failed(&self) -> u64 {
        self.frames_failed
    }

    /// The uniforms of the last frame that drew successfully.
    pub fn last_pushed(&self) -> Option<ViewportUniforms> {
        self.last_pushed
    }

    /// Build the diagnostics report for `state` and emit it to the log.
    pub fn report_zoom(&self, state: &ViewportState) -> ZoomReport {
        let report = ZoomReport::capture(state, self.fps());
        info!(
            fps = report.fps,
            zoom = report.zoom,
            iterations = report.iterations,
            "\n{report}"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::RenderError;

    /// Records every call so tests can check ordering and values.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<&'static str>,
        pushed: Vec<ViewportUniforms>,
        fail_push: bool,
    }

    impl ShaderBackend for RecordingBackend {
        fn set_viewport_uniforms(&mut self, uniforms: &ViewportUniforms) -> crate::Result<()> {
            self.calls.push("set_viewport_uniforms");
            if self.fail_push {
                return Err(RenderError::Unavailable("not ready".into()));
            }
            self.pushed.push(*uniforms);
            Ok(())
        }

        fn draw(&mut self) -> crate::Result<()> {
            self.calls.push("draw");
            Ok(())
        }
    }

    #[test]
    fn pushes_uniforms_then_draws() {
        let now = Instant::now();
        let mut bridge = RenderBridge::new(now);
        let mut backend = RecordingBackend::default();
        let state = ViewportState::default();

        bridge.render_frame(&state, &mut backend, now).unwrap();

        assert_eq!(backend.calls, vec!["set_viewport_uniforms", "draw"]);
        assert_eq!(backend.pushed, vec![ViewportUniforms::from_state(&state)]);
        assert_eq!(bridge.frames_drawn(), 1);
        assert_eq!(bridge.last_pushed(), Some(ViewportUniforms::from_state(&state)));
    }

    #[test]
    fn failed_push_skips_draw_and_next_frame_recovers() {
        let now = Instant::now();
        let mut bridge = RenderBridge::new(now);
        let mut backend = RecordingBackend {
            fail_push: true,
            ..Default::default()
        };
        let mut state = ViewportState::default();

        assert!(bridge.render_frame(&state, &mut backend, now).is_err());
        assert_eq!(backend.calls, vec!["set_viewport_uniforms"]);
        assert_eq!(bridge.frames_failed(), 1);
        assert_eq!(bridge.last_pushed(), None);

        backend.fail_push = false;
        state.zoom_in().unwrap();
        bridge.render_frame(&state, &mut backend, now).unwrap();
        assert_eq!(backend.pushed.len(), 1);
        assert_eq!(backend.pushed[0].iterations, 52);
    }

    #[test]
    fn report_uses_published_fps() {
        let start = Instant::now();
        let mut bridge = RenderBridge::new(start);
        let mut backend = RecordingBackend::default();
        let state = ViewportState::default();
        for i in 1..=30u64 {
            let t = start + Duration::from_millis(i * 1000 / 30);
            bridge.render_frame(&state, &mut backend, t).unwrap();
        }
        let report = bridge.report_zoom(&state);
        assert_eq!(report.fps, 30);
        assert_eq!(report.iterations, 50);
        assert!((report.zoom - 1.0).abs() < 1e-12);
    }
}
