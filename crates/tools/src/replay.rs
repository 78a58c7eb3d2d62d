use std::cell::RefCell;
use std::rc::Rc;

use datasets::DatasetSource;
use globe::{GlobeConfig, GlobeView, PointerEvent, RecordingBackend};
use scene::{LinkedRecord, ViewMode};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A recorded interaction session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub canvas: Option<Canvas>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Canvas {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Frames {
        #[serde(default = "default_frame_count")]
        count: u32,
        #[serde(default = "default_dt")]
        dt: f64,
    },
    Pointer {
        event: PointerEvent,
    },
    Mode {
        mode: ViewMode,
    },
    AutoRotate {
        enabled: bool,
    },
}

fn default_frame_count() -> u32 {
    1
}

fn default_dt() -> f64 {
    1.0 / runtime::NOMINAL_FPS
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Index of the step that produced it.
    pub step: usize,
    pub mode: ViewMode,
    pub title: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub selections: Vec<Selection>,
    pub final_mode: ViewMode,
    pub final_rotation: f64,
    pub frames_rendered: usize,
    pub summary: serde_json::Value,
}

pub fn parse_script(raw: &str) -> Result<Script, String> {
    serde_json::from_str(raw).map_err(|e| format!("parse replay script: {e}"))
}

/// Drive a headless globe through `script`.
pub fn run(
    config: GlobeConfig,
    datasets: Box<dyn DatasetSource>,
    script: &Script,
) -> Result<ReplayReport, String> {
    let mut view =
        GlobeView::new(config, datasets, RecordingBackend::new()).map_err(|e| e.to_string())?;
    if let Some(c) = script.canvas {
        view.resize(c.left, c.top, c.width);
    }

    let picked: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&picked);
    view.set_click_handler(move |r: &LinkedRecord| sink.borrow_mut().push(r.title().to_string()));

    let mut selections = Vec::new();
    for (step_idx, step) in script.steps.iter().enumerate() {
        match step {
            Step::Frames { count, dt } => {
                for _ in 0..*count {
                    view.frame(*dt);
                }
            }
            Step::Pointer { event } => {
                let before = picked.borrow().len();
                let resolution = view.handle_pointer(*event);
                let title = picked.borrow().get(before).cloned();
                if let (Some(res), Some(title)) = (resolution, title) {
                    selections.push(Selection {
                        step: step_idx,
                        mode: view.mode(),
                        title,
                        distance: res.distance,
                    });
                }
            }
            Step::Mode { mode } => view.set_mode(*mode).map_err(|e| e.to_string())?,
            Step::AutoRotate { enabled } => view.set_auto_rotate(*enabled),
        }
    }

    let metrics = view.metrics().snapshot();
    let events: Vec<_> = view
        .events()
        .events()
        .iter()
        .map(|e| json!({ "frame": e.frame_index, "kind": e.kind.as_str(), "message": e.message }))
        .collect();
    let summary = json!({
        "counters": metrics.counters.iter().map(|(k, v)| (k.to_string(), json!(v))).collect::<serde_json::Map<_, _>>(),
        "gauges": metrics.gauges.iter().map(|(k, v)| (k.to_string(), json!(v))).collect::<serde_json::Map<_, _>>(),
        "events": events,
    });

    let final_mode = view.mode();
    let final_rotation = view.rotation().effective_rotation();
    let backend = view.close().map_err(|e| e.to_string())?;

    Ok(ReplayReport {
        selections,
        final_mode,
        final_rotation,
        frames_rendered: backend.frames.len(),
        summary,
    })
}
