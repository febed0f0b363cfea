use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

use crate::models::TimeEntry;

/// Notifications emitted by the library about time entries and the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LibraryEvent {
    TimeEntryList { entries: Vec<TimeEntry> },
    RunningTimerState { entry: TimeEntry },
    StoppedTimerState,
}

/// Latest known time-entry list and timer state, built up from
/// [`LibraryEvent`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    pub time_entries: Vec<TimeEntry>,
    pub running_entry: Option<TimeEntry>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_entry.is_some()
    }

    pub fn apply(&mut self, event: LibraryEvent) {
        match event {
            LibraryEvent::TimeEntryList { entries } => self.time_entries = entries,
            LibraryEvent::RunningTimerState { entry } => self.running_entry = Some(entry),
            LibraryEvent::StoppedTimerState => self.running_entry = None,
        }
    }

    /// Apply every event currently queued on `rx`. Returns how many were applied.
    pub fn drain(&mut self, rx: &Receiver<LibraryEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(guid: &str) -> TimeEntry {
        TimeEntry {
            guid: guid.to_string(),
            description: String::new(),
            billable: false,
            start: 0,
            stop: None,
            project_id: None,
        }
    }

    #[test]
    fn running_then_stopped() {
        let mut state = TimerState::new();
        state.apply(LibraryEvent::RunningTimerState { entry: entry("a") });
        assert!(state.is_running());
        assert_eq!(state.running_entry.as_ref().unwrap().guid, "a");
        state.apply(LibraryEvent::StoppedTimerState);
        assert!(!state.is_running());
        assert!(state.running_entry.is_none());
    }

    #[test]
    fn drain_applies_queued_events_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(LibraryEvent::TimeEntryList {
            entries: vec![entry("a"), entry("b")],
        })
        .unwrap();
        tx.send(LibraryEvent::RunningTimerState { entry: entry("c") })
            .unwrap();
        let mut state = TimerState::new();
        assert_eq!(state.drain(&rx), 2);
        assert_eq!(state.time_entries.len(), 2);
        assert!(state.is_running());
        assert_eq!(state.drain(&rx), 0);
    }

    #[test]
    fn event_json_is_tagged() {
        let json = serde_json::to_value(LibraryEvent::StoppedTimerState).unwrap();
        assert_eq!(json["type"], "StoppedTimerState");
    }
}
