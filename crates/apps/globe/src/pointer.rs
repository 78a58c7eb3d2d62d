use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::globe_controller::{DragEvent, RotationState, Transition};

/// On-screen rectangle of the globe canvas, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square canvas at the origin, the layout the globe renders into.
    pub fn square(size: f64) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    pub fn is_usable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Map a pointer position to `[-1, 1]` on both axes with +y up.
    ///
    /// `None` for zero-sized rects or non-finite positions.
    pub fn normalize(&self, x: f64, y: f64) -> Option<Vec2> {
        if !self.is_usable() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let nx = (x - self.left) / self.width * 2.0 - 1.0;
        let ny = -((y - self.top) / self.height * 2.0 - 1.0);
        Some(Vec2::new(nx, ny))
    }
}

/// Raw pointer input in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    /// Pointer left the canvas; ends a drag like a release.
    Leave,
    Click { x: f64, y: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    Rotation(Transition),
    /// A click to hit-test, in normalized canvas coordinates.
    Click(Vec2),
}

/// Routes pointer events to the rotation state machine and normalizes clicks.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerController {
    rect: CanvasRect,
    click_drag_threshold_px: Option<f64>,
}

impl PointerController {
    pub fn new(rect: CanvasRect, click_drag_threshold_px: Option<f64>) -> Self {
        Self {
            rect,
            click_drag_threshold_px,
        }
    }

    pub fn rect(&self) -> CanvasRect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: CanvasRect) {
        self.rect = rect;
    }

    pub fn handle(&mut self, rotation: &mut RotationState, event: PointerEvent) -> PointerOutcome {
        let drag = match event {
            PointerEvent::Down { x, .. } => DragEvent::Down { x_px: x },
            PointerEvent::Move { x, .. } => DragEvent::Move { x_px: x },
            PointerEvent::Up => DragEvent::Up,
            PointerEvent::Leave => DragEvent::Leave,
            PointerEvent::Click { x, y } => return self.click(rotation, x, y),
        };
        match rotation.transition(drag) {
            Some(t) => PointerOutcome::Rotation(t),
            None => PointerOutcome::Ignored,
        }
    }

    fn click(&self, rotation: &RotationState, x: f64, y: f64) -> PointerOutcome {
        if self
            .click_drag_threshold_px
            .is_some_and(|limit| rotation.last_drag_travel_px() > limit)
        {
            return PointerOutcome::Ignored;
        }
        match self.rect.normalize(x, y) {
            Some(n) => PointerOutcome::Click(n),
            None => PointerOutcome::Ignored,
        }
    }
}
