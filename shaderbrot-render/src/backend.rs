use shaderbrot_core::ViewportState;

/// The values pushed to the fractal program before each draw.
///
/// Kept in `f64`; a GPU backend narrows to `f32` when it uploads, which is
/// where visible precision runs out long before the viewport state does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportUniforms {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub iterations: u32,
}

impl ViewportUniforms {
    pub fn from_state(state: &ViewportState) -> Self {
        let b = state.bounds();
        Self {
            min_x: b.min_x(),
            max_x: b.max_x(),
            min_y: b.min_y(),
            max_y: b.max_y(),
            iterations: state.iterations(),
        }
    }

    /// Bounds as uploaded to a single-precision shader.
    pub fn as_f32(&self) -> [f32; 4] {
        [
            self.min_x as f32,
            self.max_x as f32,
            self.min_y as f32,
            self.max_y as f32,
        ]
    }

    /// True when narrowing to `f32` collapses either span, so a GPU draw
    /// would show a flat image.
    pub fn exceeds_f32_precision(&self) -> bool {
        let [min_x, max_x, min_y, max_y] = self.as_f32();
        max_x <= min_x || max_y <= min_y
    }
}

/// Anything that can run the fractal program: set its uniforms, then draw.
///
/// Implemented by the GPU paint path in the app and by
/// [`SoftwareBackend`](crate::SoftwareBackend) for headless use.
pub trait ShaderBackend {
    fn set_viewport_uniforms(&mut self, uniforms: &ViewportUniforms) -> crate::Result<()>;

    fn draw(&mut self) -> crate::Result<()>;
}
