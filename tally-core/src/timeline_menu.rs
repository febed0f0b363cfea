//! Context menu for a pair of overlapping entries on the timeline.

use serde::{Deserialize, Serialize};

use crate::models::TimeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineMenuAction {
    ChangeFirstEntryStopTime,
    ChangeLastEntryStartTime,
}

impl TimelineMenuAction {
    pub fn title(&self) -> &'static str {
        match self {
            TimelineMenuAction::ChangeFirstEntryStopTime => "Change first entry stop time",
            TimelineMenuAction::ChangeLastEntryStartTime => "Change last entry start time",
        }
    }
}

/// Menu items in display order.
pub fn menu_items() -> [TimelineMenuAction; 2] {
    [
        TimelineMenuAction::ChangeFirstEntryStopTime,
        TimelineMenuAction::ChangeLastEntryStartTime,
    ]
}

/// Resolve the overlap between `first` and the entry that follows it.
///
/// Returns the adjusted `(first, last)` pair.
pub fn apply(
    action: TimelineMenuAction,
    first: &TimeEntry,
    last: &TimeEntry,
) -> Result<(TimeEntry, TimeEntry), String> {
    let first_stop = first
        .stop
        .ok_or_else(|| format!("Time entry {} is still running", first.guid))?;

    let mut first = first.clone();
    let mut last = last.clone();
    match action {
        TimelineMenuAction::ChangeFirstEntryStopTime => {
            if last.start < first.start {
                return Err(format!(
                    "Time entry {} would stop before it starts",
                    first.guid
                ));
            }
            first.stop = Some(last.start);
        }
        TimelineMenuAction::ChangeLastEntryStartTime => {
            if matches!(last.stop, Some(stop) if stop < first_stop) {
                return Err(format!(
                    "Time entry {} would start after it stops",
                    last.guid
                ));
            }
            last.start = first_stop;
        }
    }
    log::debug!("{}: {} / {}", action.title(), first.guid, last.guid);
    Ok((first, last))
}
