//! Notification sink.
//!
//! Engine code fires `NotificationEvent`s and never cares how they are shown;
//! the UI reads `NotificationLog`. Error notices persist until dismissed,
//! lower priorities auto-expire.

use bevy::prelude::*;

/// Notice priority, from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoticePriority {
    /// Failed commits and other recoverable errors. Persists until dismissed.
    Error,
    Warning,
    Info,
    /// Good news (e.g. a placement confirmed).
    Positive,
}

impl NoticePriority {
    /// Auto-dismiss delay in seconds. `None` means persist until dismissed.
    pub fn auto_dismiss_secs(self) -> Option<f32> {
        match self {
            NoticePriority::Error => None,
            NoticePriority::Warning => Some(6.0),
            NoticePriority::Info => Some(4.0),
            NoticePriority::Positive => Some(4.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoticePriority::Error => "ERROR",
            NoticePriority::Warning => "WARNING",
            NoticePriority::Info => "INFO",
            NoticePriority::Positive => "OK",
        }
    }
}

/// Fire-and-forget notification request.
#[derive(Event, Debug, Clone)]
pub struct NotificationEvent {
    pub text: String,
    pub priority: NoticePriority,
}

impl NotificationEvent {
    pub fn new(text: impl Into<String>, priority: NoticePriority) -> Self {
        Self {
            text: text.into(),
            priority,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub priority: NoticePriority,
    /// Seconds since the notice was raised.
    pub age: f32,
}

/// Active notices, newest last.
#[derive(Resource, Default)]
pub struct NotificationLog {
    pub active: Vec<Notice>,
    next_id: u64,
}

impl NotificationLog {
    pub fn push(&mut self, text: impl Into<String>, priority: NoticePriority) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Notice {
            id,
            text: text.into(),
            priority,
            age: 0.0,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.active.retain(|n| n.id != id);
    }

    fn tick(&mut self, dt: f32) {
        for notice in &mut self.active {
            notice.age += dt;
        }
        self.active.retain(|n| match n.priority.auto_dismiss_secs() {
            Some(ttl) => n.age < ttl,
            None => true,
        });
    }
}

pub fn collect_notifications(
    mut events: EventReader<NotificationEvent>,
    mut log: ResMut<NotificationLog>,
) {
    for event in events.read() {
        info!("notice [{}]: {}", event.priority.label(), event.text);
        log.push(event.text.clone(), event.priority);
    }
}

pub fn expire_notices(time: Res<Time>, mut log: ResMut<NotificationLog>) {
    log.tick(time.delta_secs());
}
