use crate::input::ZoomDirection;

/// Discrete user actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Close the window after the current frame.
    Exit,
    /// Restore the initial view and warp the pointer to the screen centre.
    Reset,
    /// Show or hide the diagnostics overlay.
    ToggleHud,
    /// Write the current view to a PNG file.
    Snapshot,
}

/// One input occurrence gathered at the top of a frame.
///
/// The frame loop polls the windowing layer once, turns what it finds into a
/// list of these, and consumes them synchronously in that same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Resize { width: u32, height: u32 },
    Scroll { direction: ZoomDirection },
    KeyPress { key: Key },
}
