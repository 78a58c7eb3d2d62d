use crate::frame::Frame;

/// What happened. Kept as a closed set so replays can be compared exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    ModeChanged,
    AutoRotateChanged,
    DragStarted,
    DragEnded,
    Click,
    Pick,
    Miss,
    Teardown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ModeChanged => "mode",
            EventKind::AutoRotateChanged => "auto_rotate",
            EventKind::DragStarted => "drag_start",
            EventKind::DragEnded => "drag_end",
            EventKind::Click => "click",
            EventKind::Pick => "pick",
            EventKind::Miss => "miss",
            EventKind::Teardown => "teardown",
        }
    }
}

/// Frame-stamped event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
