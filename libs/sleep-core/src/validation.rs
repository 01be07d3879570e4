//! Ordering rules checked before a new entry is stored.

use crate::error::{Result, ValidationError};
use crate::time::time_to_minutes;
use crate::types::{EntryType, TimeEntry};

/// Check a new entry against the last stored entry for the same date.
///
/// `last` is the date's final entry in stored (time-ascending) order, or
/// `None` for the first entry of a day, which may be of either type.
pub fn validate_new_entry(last: Option<&TimeEntry>, entry_type: EntryType, time: &str) -> Result<()> {
    let minutes = time_to_minutes(time)?;

    let Some(last) = last else {
        return Ok(());
    };

    if last.entry_type == entry_type {
        return Err(ValidationError::Alternation { entry_type }.into());
    }

    // Equal times are allowed across a type change.
    if minutes < time_to_minutes(&last.time)? {
        return Err(ValidationError::OutOfOrder {
            time: time.to_string(),
            last_time: last.time.clone(),
        }
        .into());
    }

    Ok(())
}
