//! Yaw-only globe rotation: continuous auto-rotation plus a persistent drag offset.
//!
//! - Auto-rotation advances every frame while no drag is active.
//! - Horizontal drags add an offset that stays in place after release, so
//!   successive drags accumulate instead of springing back.
//! - The effective rotation is always `auto_angle + drag_offset`; nothing else
//!   writes it.

use runtime::Frame;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Baseline auto-rotation step, tuned for a ~60 fps renderer.
pub const DEFAULT_AUTO_ROTATE_RAD_PER_FRAME: f64 = 0.003;

/// Pixels of horizontal drag per radian of rotation.
pub const DEFAULT_DRAG_PX_PER_RADIAN: f64 = 200.0;

/// How fast the globe turns on its own.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum AutoRotation {
    /// Fixed step per rendered frame; speed follows the frame rate.
    PerFrame { radians: f64 },
    /// Scaled by the frame's `dt`; speed is independent of the frame rate.
    PerSecond { radians: f64 },
}

impl Default for AutoRotation {
    fn default() -> Self {
        AutoRotation::PerFrame {
            radians: DEFAULT_AUTO_ROTATE_RAD_PER_FRAME,
        }
    }
}

impl AutoRotation {
    /// Angle to add for `frame`.
    pub fn step(self, frame: &Frame) -> f64 {
        match self {
            AutoRotation::PerFrame { radians } => radians,
            AutoRotation::PerSecond { radians } => radians * frame.dt_s,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            AutoRotation::PerFrame { radians } | AutoRotation::PerSecond { radians } => {
                radians.is_finite()
            }
        }
    }
}

/// Horizontal pointer input that drives the drag offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DragEvent {
    Down { x_px: f64 },
    Move { x_px: f64 },
    Up,
    Leave,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        /// `pointer_x - drag_offset_px` at press time.
        anchor_px: f64,
        /// Pointer x at press time.
        start_px: f64,
    },
}

/// What a [`DragEvent`] did to the state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Transition {
    Started,
    Moved { offset_rad: f64 },
    Ended { offset_rad: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    /// Accumulated auto-rotation (radians).
    auto_angle: f64,
    /// Persisted manual rotation (radians).
    drag_offset: f64,
    /// Persisted manual rotation in pointer pixels.
    drag_offset_px: f64,
    phase: DragPhase,
    px_per_radian: f64,
    /// Largest horizontal distance from the press point in the latest drag.
    last_drag_travel_px: f64,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_PX_PER_RADIAN)
    }
}

impl RotationState {
    /// Fresh state. Non-positive or non-finite sensitivities fall back to the default.
    pub fn new(px_per_radian: f64) -> Self {
        let px_per_radian = if px_per_radian.is_finite() && px_per_radian > 0.0 {
            px_per_radian
        } else {
            DEFAULT_DRAG_PX_PER_RADIAN
        };
        Self {
            auto_angle: 0.0,
            drag_offset: 0.0,
            drag_offset_px: 0.0,
            phase: DragPhase::Idle,
            px_per_radian,
            last_drag_travel_px: 0.0,
        }
    }

    pub fn auto_angle(&self) -> f64 {
        self.auto_angle
    }

    pub fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    pub fn drag_offset_px(&self) -> f64 {
        self.drag_offset_px
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Anchor of the active drag, if any.
    pub fn drag_anchor(&self) -> Option<f64> {
        match self.phase {
            DragPhase::Dragging { anchor_px, .. } => Some(anchor_px),
            DragPhase::Idle => None,
        }
    }

    pub fn last_drag_travel_px(&self) -> f64 {
        self.last_drag_travel_px
    }

    pub fn effective_rotation(&self) -> f64 {
        self.auto_angle + self.drag_offset
    }

    /// Per-frame update. Auto-rotation is held while dragging.
    pub fn advance(&mut self, frame: &Frame, rate: AutoRotation, enabled: bool) {
        if !enabled || self.is_dragging() {
            return;
        }
        let step = rate.step(frame);
        if step.is_finite() {
            self.auto_angle += step;
        }
    }

    /// Apply one pointer event. Returns `None` when the event is ignored in the
    /// current phase (moves and releases while idle).
    pub fn transition(&mut self, event: DragEvent) -> Option<Transition> {
        match (self.phase, event) {
            (_, DragEvent::Down { x_px }) => {
                if !x_px.is_finite() {
                    return None;
                }
                // Anchoring against the persisted pixel offset makes the next
                // drag continue from where the last one left off.
                self.phase = DragPhase::Dragging {
                    anchor_px: x_px - self.drag_offset_px,
                    start_px: x_px,
                };
                self.last_drag_travel_px = 0.0;
                debug!(x_px, offset_px = self.drag_offset_px, "drag started");
                Some(Transition::Started)
            }
            (DragPhase::Dragging { anchor_px, start_px }, DragEvent::Move { x_px }) => {
                if !x_px.is_finite() {
                    return None;
                }
                let delta = x_px - anchor_px;
                self.drag_offset_px = delta;
                self.drag_offset = delta / self.px_per_radian;
                self.last_drag_travel_px = self.last_drag_travel_px.max((x_px - start_px).abs());
                Some(Transition::Moved {
                    offset_rad: self.drag_offset,
                })
            }
            (DragPhase::Dragging { .. }, DragEvent::Up | DragEvent::Leave) => {
                self.phase = DragPhase::Idle;
                debug!(
                    offset_rad = self.drag_offset,
                    travel_px = self.last_drag_travel_px,
                    "drag ended"
                );
                Some(Transition::Ended {
                    offset_rad: self.drag_offset,
                })
            }
            (DragPhase::Idle, DragEvent::Move { .. } | DragEvent::Up | DragEvent::Leave) => None,
        }
    }

    /// Value-style form of [`RotationState::transition`].
    pub fn step(mut self, event: DragEvent) -> (Self, Option<Transition>) {
        let transition = self.transition(event);
        (self, transition)
    }
}

#[cfg(test)]
mod tests {
    use super::{AutoRotation, DragEvent, DragPhase, RotationState, Transition};
    use runtime::Frame;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn run_frames(state: &mut RotationState, n: usize) {
        let mut frame = Frame::default();
        for _ in 0..n {
            state.advance(&frame, AutoRotation::default(), true);
            frame = frame.next();
        }
    }

    #[test]
    fn auto_rotation_advances_per_frame() {
        let mut s = RotationState::default();
        run_frames(&mut s, 10);
        assert_close(s.auto_angle(), 0.03, 1e-12);
        assert_close(s.effective_rotation(), 0.03, 1e-12);
    }

    #[test]
    fn disabled_auto_rotation_holds_angle() {
        let mut s = RotationState::default();
        s.advance(&Frame::default(), AutoRotation::default(), false);
        assert_eq!(s.auto_angle(), 0.0);
    }

    #[test]
    fn per_second_rate_scales_with_dt() {
        let mut s = RotationState::default();
        let rate = AutoRotation::PerSecond { radians: 0.18 };
        s.advance(&Frame::first(0.5), rate, true);
        assert_close(s.auto_angle(), 0.09, 1e-12);
    }

    #[test]
    fn press_anchors_and_suspends_auto_rotation() {
        let mut s = RotationState::default();
        assert_eq!(s.transition(DragEvent::Down { x_px: 300.0 }), Some(Transition::Started));
        assert!(s.is_dragging());
        assert_eq!(s.drag_anchor(), Some(300.0));

        run_frames(&mut s, 5);
        assert_eq!(s.auto_angle(), 0.0);
    }

    #[test]
    fn drag_of_200px_is_one_radian() {
        let mut s = RotationState::default();
        s.transition(DragEvent::Down { x_px: 100.0 });
        let t = s.transition(DragEvent::Move { x_px: 300.0 });
        assert_eq!(t, Some(Transition::Moved { offset_rad: 1.0 }));
        assert_eq!(s.drag_offset_px(), 200.0);
        assert_eq!(s.effective_rotation(), 1.0);
    }

    #[test]
    fn release_keeps_offset_and_clears_anchor() {
        let mut s = RotationState::default();
        s.transition(DragEvent::Down { x_px: 0.0 });
        s.transition(DragEvent::Move { x_px: -100.0 });
        assert_eq!(s.transition(DragEvent::Leave), Some(Transition::Ended { offset_rad: -0.5 }));
        assert_eq!(s.phase(), DragPhase::Idle);
        assert_eq!(s.drag_anchor(), None);
        assert_eq!(s.drag_offset(), -0.5);
    }

    #[test]
    fn successive_drags_accumulate() {
        let mut s = RotationState::default();
        s.transition(DragEvent::Down { x_px: 100.0 });
        s.transition(DragEvent::Move { x_px: 300.0 });
        s.transition(DragEvent::Up);

        // Second drag starts elsewhere; anchor compensates for the 200px already applied.
        s.transition(DragEvent::Down { x_px: 500.0 });
        assert_eq!(s.drag_anchor(), Some(300.0));
        s.transition(DragEvent::Move { x_px: 600.0 });
        s.transition(DragEvent::Up);

        assert_eq!(s.drag_offset_px(), 300.0);
        assert_eq!(s.drag_offset(), 1.5);
    }

    #[test]
    fn auto_rotation_resumes_on_top_of_drag_offset() {
        let mut s = RotationState::default();
        run_frames(&mut s, 3);
        s.transition(DragEvent::Down { x_px: 0.0 });
        s.transition(DragEvent::Move { x_px: 200.0 });
        s.transition(DragEvent::Up);

        let after_release = s.effective_rotation();
        assert_close(after_release, 0.009 + 1.0, 1e-12);

        let mut previous = after_release;
        let mut frame = Frame::default();
        for _ in 0..20 {
            s.advance(&frame, AutoRotation::default(), true);
            frame = frame.next();
            assert!(s.effective_rotation() > previous);
            assert_eq!(s.drag_offset(), 1.0);
            previous = s.effective_rotation();
        }
    }

    #[test]
    fn idle_moves_and_releases_are_ignored() {
        let mut s = RotationState::default();
        assert_eq!(s.transition(DragEvent::Move { x_px: 50.0 }), None);
        assert_eq!(s.transition(DragEvent::Up), None);
        assert_eq!(s, RotationState::default());
    }

    #[test]
    fn tracks_drag_travel_from_press_point() {
        let mut s = RotationState::default();
        s.transition(DragEvent::Down { x_px: 100.0 });
        s.transition(DragEvent::Move { x_px: 140.0 });
        s.transition(DragEvent::Move { x_px: 90.0 });
        s.transition(DragEvent::Up);
        assert_eq!(s.last_drag_travel_px(), 40.0);

        s.transition(DragEvent::Down { x_px: 0.0 });
        assert_eq!(s.last_drag_travel_px(), 0.0);
    }

    #[test]
    fn custom_sensitivity_and_fallback() {
        let (s, _) = RotationState::new(100.0)
            .step(DragEvent::Down { x_px: 0.0 })
            .0
            .step(DragEvent::Move { x_px: 50.0 });
        assert_eq!(s.drag_offset(), 0.5);

        let (s, _) = RotationState::new(0.0)
            .step(DragEvent::Down { x_px: 0.0 })
            .0
            .step(DragEvent::Move { x_px: 200.0 });
        assert_eq!(s.drag_offset(), 1.0);
    }

    #[test]
    fn non_finite_pointer_positions_are_ignored() {
        let mut s = RotationState::default();
        assert_eq!(s.transition(DragEvent::Down { x_px: f64::NAN }), None);
        s.transition(DragEvent::Down { x_px: 10.0 });
        assert_eq!(s.transition(DragEvent::Move { x_px: f64::INFINITY }), None);
        assert_eq!(s.drag_offset(), 0.0);
    }
}
