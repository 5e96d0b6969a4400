use eframe::egui;

use shaderbrot_core::{InputEvent, Key, PointerSample, ZoomDirection};

/// Everything the frame loop reads from the windowing layer in one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FrameInput {
    /// Canvas size in points, each axis at least 1.
    pub(crate) canvas_size: [u32; 2],
    /// Pointer position relative to the canvas' top-left corner.
    pub(crate) pointer: Option<PointerSample>,
    pub(crate) scroll_y: f32,
    pub(crate) exit: bool,
    pub(crate) reset: bool,
    pub(crate) toggle_hud: bool,
    pub(crate) snapshot: bool,
}

impl FrameInput {
    pub(crate) fn gather(ctx: &egui::Context, canvas: egui::Rect) -> Self {
        let canvas_size = [
            canvas.width().max(1.0) as u32,
            canvas.height().max(1.0) as u32,
        ];
        ctx.input(|i| Self {
            canvas_size,
            pointer: i.pointer.latest_pos().map(|pos| {
                PointerSample::new((pos.x - canvas.min.x) as f64, (pos.y - canvas.min.y) as f64)
            }),
            scroll_y: i.raw_scroll_delta.y,
            exit: i.key_pressed(egui::Key::Escape),
            reset: i.key_pressed(egui::Key::Space),
            toggle_hud: i.key_pressed(egui::Key::H),
            snapshot: i.key_pressed(egui::Key::P),
        })
    }

    /// Translate this poll into the frame's discrete events.
    ///
    /// A resize is reported when the canvas differs from `previous_size`.
    /// Any non-zero vertical scroll in the frame counts as one zoom notch,
    /// its sign choosing the direction. Exit comes last so the other events
    /// of the final frame are still handled.
    pub(crate) fn events(&self, previous_size: [u32; 2]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.canvas_size != previous_size {
            events.push(InputEvent::Resize {
                width: self.canvas_size[0],
                height: self.canvas_size[1],
            });
        }
        if self.scroll_y != 0.0 {
            events.push(InputEvent::Scroll {
                direction: ZoomDirection::from_scroll_delta(self.scroll_y as f64),
            });
        }
        let keys = [
            (self.reset, Key::Reset),
            (self.toggle_hud, Key::ToggleHud),
            (self.snapshot, Key::Snapshot),
            (self.exit, Key::Exit),
        ];
        events.extend(
            keys.into_iter()
                .filter(|(pressed, _)| *pressed)
                .map(|(_, key)| InputEvent::KeyPress { key }),
        );
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FrameInput {
        FrameInput {
            canvas_size: [800, 800],
            ..Default::default()
        }
    }

    #[test]
    fn quiet_frame_has_no_events() {
        assert!(input().events([800, 800]).is_empty());
    }

    #[test]
    fn size_change_reports_resize() {
        let events = input().events([640, 480]);
        assert_eq!(
            events,
            vec![InputEvent::Resize {
                width: 800,
                height: 800
            }]
        );
    }

    #[test]
    fn scroll_sign_picks_direction() {
        let up = FrameInput {
            scroll_y: 50.0,
            ..input()
        };
        assert_eq!(
            up.events([800, 800]),
            vec![InputEvent::Scroll {
                direction: ZoomDirection::In
            }]
        );
        let down = FrameInput {
            scroll_y: -0.5,
            ..input()
        };
        assert_eq!(
            down.events([800, 800]),
            vec![InputEvent::Scroll {
                direction: ZoomDirection::Out
            }]
        );
    }

    #[test]
    fn exit_is_ordered_last() {
        let frame = FrameInput {
            exit: true,
            reset: true,
            scroll_y: 1.0,
            ..input()
        };
        let events = frame.events([800, 800]);
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], InputEvent::KeyPress { key: Key::Reset });
        assert_eq!(events[2], InputEvent::KeyPress { key: Key::Exit });
    }

    #[test]
    fn gather_reads_key_presses() {
        let ctx = egui::Context::default();
        let raw = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Space,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let mut gathered = FrameInput::default();
        let _ = ctx.run(raw, |ctx| {
            let canvas = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(320.0, 200.0));
            gathered = FrameInput::gather(ctx, canvas);
        });
        assert!(gathered.reset);
        assert!(!gathered.exit);
        assert_eq!(gathered.canvas_size, [320, 200]);
        assert_eq!(gathered.pointer, None);
    }
}
