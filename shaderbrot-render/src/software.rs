use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use shaderbrot_core::ScreenGeometry;

use crate::backend::{ShaderBackend, ViewportUniforms};
use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::shader::{escape_time, shade};

/// Runs the fractal program on the CPU, one Rayon task per row.
///
/// Samples pixel centres exactly like the GPU quad's interpolated `v_uv`,
/// with row 0 at the top of the image (the maximum Y bound).
pub struct SoftwareBackend {
    geometry: ScreenGeometry,
    uniforms: Option<ViewportUniforms>,
    buffer: RenderBuffer,
    last_elapsed: Duration,
}

impl SoftwareBackend {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        let geometry = ScreenGeometry::new(width, height)?;
        Ok(Self {
            geometry,
            uniforms: None,
            buffer: RenderBuffer::new(width, height),
            last_elapsed: Duration::ZERO,
        })
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// Wall time of the most recent draw.
    pub fn last_elapsed(&self) -> Duration {
        self.last_elapsed
    }
}

impl ShaderBackend for SoftwareBackend {
    fn set_viewport_uniforms(&mut self, uniforms: &ViewportUniforms) -> crate::Result<()> {
        self.uniforms = Some(*uniforms);
        Ok(())
    }

    fn draw(&mut self) -> crate::Result<()> {
        let u = self.uniforms.ok_or(RenderError::UniformsNotSet)?;
        let start = Instant::now();
        let width = self.geometry.width() as f64;
        let height = self.geometry.height() as f64;
        let stride = self.buffer.stride();
        let span_x = u.max_x - u.min_x;
        let span_y = u.max_y - u.min_y;

        self.buffer
            .pixels
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(py, row)| {
                let v = 1.0 - (py as f64 + 0.5) / height;
                let cy = u.min_y + v * span_y;
                for (px, out) in row.chunks_exact_mut(4).enumerate() {
                    let h = (px as f64 + 0.5) / width;
                    let cx = u.min_x + h * span_x;
                    let n = escape_time(cx, cy, u.iterations);
                    out.copy_from_slice(&shade(n, u.iterations));
                }
            });

        self.last_elapsed = start.elapsed();
        debug!(
            width = self.geometry.width(),
            height = self.geometry.height(),
            iterations = u.iterations,
            elapsed_ms = self.last_elapsed.as_secs_f64() * 1000.0,
            "Software draw complete"
        );
        Ok(())
    }
}
