//! Translation of raw pointer and scroll input into viewport operations.

use crate::error::CoreError;
use crate::range::try_rescale;
use crate::viewport::ViewportState;

/// Multiplier `k` in the pan damping `k * log10(iterations)`.
pub const DEFAULT_PAN_DAMPING: f64 = 0.001;

// ---------------------------------------------------------------------------
// Screen-side value types
// ---------------------------------------------------------------------------

/// Pixel dimensions of the drawing surface used for input mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    width: u32,
    height: u32,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The centre of the surface in pixel coordinates.
    pub fn center(&self) -> PointerSample {
        PointerSample::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// One pointer reading in pixel space; `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which way a single scroll notch zooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Classify a vertical scroll delta by its sign: positive (wheel away from
    /// the user) zooms in, anything else zooms out.
    pub fn from_scroll_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            Self::In
        } else {
            Self::Out
        }
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// Converts pointer positions and scroll notches into pan/zoom calls on a
/// [`ViewportState`].
///
/// Panning is a function of the pointer's distance from the screen centre,
/// applied every frame: holding the pointer off-centre drifts the view
/// continuously, and the centre is a dead zone. The drift is damped by
/// `k * log10(iterations)` so deep zooms navigate more finely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputTranslator {
    geometry: ScreenGeometry,
    pan_damping: f64,
}

impl InputTranslator {
    pub fn new(geometry: ScreenGeometry) -> Self {
        Self {
            geometry,
            pan_damping: DEFAULT_PAN_DAMPING,
        }
    }

    pub fn with_pan_damping(mut self, pan_damping: f64) -> Self {
        self.pan_damping = pan_damping;
        self
    }

    pub fn geometry(&self) -> ScreenGeometry {
        self.geometry
    }

    pub fn pan_damping(&self) -> f64 {
        self.pan_damping
    }

    /// Adopt new surface dimensions. The plane rectangle is left as-is.
    pub fn set_geometry(&mut self, geometry: ScreenGeometry) {
        self.geometry = geometry;
    }

    /// Plane-space pan step for the current pointer position.
    pub fn pan_delta(
        &self,
        state: &ViewportState,
        pointer: PointerSample,
    ) -> crate::Result<(f64, f64)> {
        let half_w = self.geometry.width as f64 / 2.0;
        let half_h = self.geometry.height as f64 / 2.0;
        let bounds = state.bounds();
        let half_span_x = bounds.span_x() / 2.0;
        let half_span_y = bounds.span_y() / 2.0;

        let offset_x = pointer.x - half_w;
        let offset_y = pointer.y - half_h;

        let scaling = self.pan_damping * (state.iterations() as f64).log10();
        let dx = try_rescale(offset_x, -half_w, half_w, -half_span_x, half_span_x)?;
        // Swapped source endpoints: pixel y grows downward, plane y upward.
        let dy = try_rescale(offset_y, half_h, -half_h, -half_span_y, half_span_y)?;
        Ok((dx * scaling, dy * scaling))
    }

    /// Apply one frame of continuous pan.
    pub fn apply_pan(&self, state: &mut ViewportState, pointer: PointerSample) -> crate::Result<()> {
        let (dx, dy) = self.pan_delta(state, pointer)?;
        state.pan(dx, dy)
    }

    /// The plane point under the pointer, using the current bounds.
    pub fn pointer_to_plane(
        &self,
        state: &ViewportState,
        pointer: PointerSample,
    ) -> crate::Result<(f64, f64)> {
        let bounds = state.bounds();
        let width = self.geometry.width as f64;
        let height = self.geometry.height as f64;
        let x = try_rescale(pointer.x, 0.0, width, bounds.min_x(), bounds.max_x())?;
        let y = try_rescale(pointer.y, height, 0.0, bounds.min_y(), bounds.max_y())?;
        Ok((x, y))
    }

    /// Handle one scroll notch: centre the view on the pointer, then zoom.
    ///
    /// If the zoom step itself is refused (precision exhausted) the recenter
    /// has still been applied, matching what the user pointed at.
    pub fn apply_scroll(
        &self,
        state: &mut ViewportState,
        pointer: PointerSample,
        direction: ZoomDirection,
    ) -> crate::Result<()> {
        let (cx, cy) = self.pointer_to_plane(state, pointer)?;
        state.recenter(cx, cy)?;
        match direction {
            ZoomDirection::In => state.zoom_in(),
            ZoomDirection::Out => state.zoom_out(),
        }
    }

    /// Reset the view and return where the pointer should be warped to.
    pub fn apply_reset(&self, state: &mut ViewportState) -> PointerSample {
        state.reset();
        self.geometry.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Bounds;

    const EPSILON: f64 = 1e-12;

    fn translator() -> InputTranslator {
        InputTranslator::new(ScreenGeometry::new(800, 800).unwrap())
    }

    #[test]
    fn geometry_rejects_zero_dimensions() {
        assert!(ScreenGeometry::new(0, 600).is_err());
        assert!(ScreenGeometry::new(800, 0).is_err());
        let g = ScreenGeometry::new(800, 600).unwrap();
        assert_eq!(g.center(), PointerSample::new(400.0, 300.0));
    }

    #[test]
    fn scroll_direction_by_sign() {
        assert_eq!(ZoomDirection::from_scroll_delta(1.0), ZoomDirection::In);
        assert_eq!(ZoomDirection::from_scroll_delta(0.25), ZoomDirection::In);
        assert_eq!(ZoomDirection::from_scroll_delta(-1.0), ZoomDirection::Out);
        assert_eq!(ZoomDirection::from_scroll_delta(-40.0), ZoomDirection::Out);
    }

    #[test]
    fn pointer_at_center_does_not_pan() {
        let t = translator();
        let state = ViewportState::default();
        let (dx, dy) = t.pan_delta(&state, PointerSample::new(400.0, 400.0)).unwrap();
        assert!(dx.abs() < EPSILON);
        assert!(dy.abs() < EPSILON);
    }

    #[test]
    fn pan_delta_is_damped_by_iterations() {
        let t = translator();
        let state = ViewportState::default();
        // Right edge, vertically centred: full half-span before damping.
        let (dx, dy) = t.pan_delta(&state, PointerSample::new(800.0, 400.0)).unwrap();
        let expected = 2.0 * 0.001 * 50f64.log10();
        assert!((dx - expected).abs() < EPSILON);
        assert!(dy.abs() < EPSILON);
    }

    #[test]
    fn pointer_above_center_pans_up() {
        let t = translator();
        let state = ViewportState::default();
        let (_, dy) = t.pan_delta(&state, PointerSample::new(400.0, 0.0)).unwrap();
        assert!(dy > 0.0, "pointer near the top should move the view up the plane");
        let (_, dy) = t.pan_delta(&state, PointerSample::new(400.0, 800.0)).unwrap();
        assert!(dy < 0.0);
    }

    #[test]
    fn holding_pointer_off_center_drifts_every_frame() {
        let t = translator();
        let mut state = ViewportState::default();
        let pointer = PointerSample::new(600.0, 400.0);
        let mut last = state.bounds().min_x();
        for _ in 0..10 {
            t.apply_pan(&mut state, pointer).unwrap();
            assert!(state.bounds().min_x() > last);
            last = state.bounds().min_x();
        }
        assert!((state.bounds().span_x() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn single_iteration_budget_freezes_pan() {
        let t = translator();
        let defaults =
            crate::viewport::ViewportDefaults::new(Bounds::DEFAULT, 1, 0.75).unwrap();
        let mut state = ViewportState::new(defaults);
        t.apply_pan(&mut state, PointerSample::new(0.0, 0.0)).unwrap();
        assert_eq!(state.bounds(), Bounds::DEFAULT);
    }

    #[test]
    fn pointer_to_plane_maps_corners() {
        let t = translator();
        let state = ViewportState::default();
        let (x, y) = t.pointer_to_plane(&state, PointerSample::new(0.0, 0.0)).unwrap();
        assert!((x - (-2.0)).abs() < EPSILON);
        assert!((y - 2.0).abs() < EPSILON);
        let (x, y) = t.pointer_to_plane(&state, PointerSample::new(800.0, 800.0)).unwrap();
        assert!((x - 2.0).abs() < EPSILON);
        assert!((y - (-2.0)).abs() < EPSILON);
    }

    #[test]
    fn scroll_recenters_on_pointer_then_zooms() {
        let t = translator();
        let mut state = ViewportState::default();
        // Pixel (600, 200) sits on plane point (1, 1).
        t.apply_scroll(&mut state, PointerSample::new(600.0, 200.0), ZoomDirection::In)
            .unwrap();
        let b = state.bounds();
        let (cx, cy) = b.center();
        assert!((cx - 1.0).abs() < EPSILON);
        assert!((cy - 1.0).abs() < EPSILON);
        assert!((b.span_x() - 3.0).abs() < EPSILON);
        assert_eq!(state.iterations(), 52);
    }

    #[test]
    fn scroll_out_grows_span() {
        let t = translator();
        let mut state = ViewportState::default();
        t.apply_scroll(&mut state, PointerSample::new(400.0, 400.0), ZoomDirection::Out)
            .unwrap();
        assert!((state.bounds().span_x() - 4.0 / 0.75).abs() < EPSILON);
        assert_eq!(state.iterations(), 47);
    }

    #[test]
    fn resize_changes_mapping_but_not_bounds() {
        let mut t = translator();
        let state = ViewportState::default();
        t.set_geometry(ScreenGeometry::new(400, 200).unwrap());
        assert_eq!(state.bounds(), Bounds::DEFAULT);
        let (x, y) = t.pointer_to_plane(&state, PointerSample::new(400.0, 0.0)).unwrap();
        assert!((x - 2.0).abs() < EPSILON);
        assert!((y - 2.0).abs() < EPSILON);
    }

    #[test]
    fn reset_returns_screen_center() {
        let t = translator();
        let mut state = ViewportState::default();
        state.zoom_in().unwrap();
        let warp = t.apply_reset(&mut state);
        assert_eq!(warp, PointerSample::new(400.0, 400.0));
        assert_eq!(state, ViewportState::default());
    }

    #[test]
    fn non_finite_pointer_leaves_state_untouched() {
        let t = translator();
        let mut state = ViewportState::default();
        let before = state;
        assert!(t.apply_pan(&mut state, PointerSample::new(f64::NAN, 0.0)).is_err());
        assert!(t
            .apply_scroll(&mut state, PointerSample::new(f64::INFINITY, 0.0), ZoomDirection::In)
            .is_err());
        assert_eq!(state, before);
    }
}
