//! Haptics sink. Touch drags emit fire-and-forget pulses; the default
//! consumer just logs them, a platform layer may subscribe instead.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    Start,
    Success,
    Error,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct HapticPulse {
    pub kind: HapticKind,
}

impl HapticPulse {
    pub fn new(kind: HapticKind) -> Self {
        Self { kind }
    }
}

pub fn log_haptic_pulses(mut events: EventReader<HapticPulse>) {
    for event in events.read() {
        debug!("haptic pulse: {:?}", event.kind);
    }
}
