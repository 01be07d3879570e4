//! Daily sleep metrics.
//!
//! A day's entries alternate between woke-up and fell-asleep. Adjacent pairs
//! become awake or sleep periods; the evening's last fell-asleep paired with
//! the next morning's first woke-up becomes night sleep.

use std::borrow::Borrow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::FormatError;
use crate::time::{minutes_of_day, time_to_minutes, wrapped_duration, MINUTES_PER_DAY};
use crate::types::{
    DayDurations, EntryType, NextScheduledSleep, ScheduledSleepKind, SleepMetrics, SleepSettings,
    TimeEntry,
};

/// Sleep and awake totals from a day's adjacent entry pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub sleep_minutes: u32,
    pub awake_minutes: u32,
}

/// Sum the awake and sleep periods between adjacent entries.
///
/// Fewer than two entries yields zero for both.
pub fn period_totals<E: Borrow<TimeEntry>>(entries: &[E]) -> Result<PeriodTotals, FormatError> {
    let mut totals = PeriodTotals::default();

    for pair in entries.windows(2) {
        let (a, b): (&TimeEntry, &TimeEntry) = (pair[0].borrow(), pair[1].borrow());
        let duration = wrapped_duration(time_to_minutes(&a.time)?, time_to_minutes(&b.time)?);

        match (a.entry_type, b.entry_type) {
            (EntryType::WokeUp, EntryType::FellAsleep) => totals.awake_minutes += duration,
            (EntryType::FellAsleep, EntryType::WokeUp) => totals.sleep_minutes += duration,
            // Alternation is enforced on insert.
            _ => {}
        }
    }

    Ok(totals)
}

/// Night sleep from the day's last fell-asleep to the next day's first
/// woke-up.
///
/// When the next day has no wake entry, falls back to a same-day
/// approximation: if the day starts with a woke-up and ends with a
/// fell-asleep, the gap from the last entry around midnight to the first
/// one is used. This is a heuristic for incomplete logs and can misattribute
/// irregular data.
pub fn night_sleep<E, F>(day: &[E], next_day: &[F]) -> Result<u32, FormatError>
where
    E: Borrow<TimeEntry>,
    F: Borrow<TimeEntry>,
{
    let last_fell_asleep = day
        .iter()
        .rev()
        .map(Borrow::<TimeEntry>::borrow)
        .find(|e| e.entry_type == EntryType::FellAsleep);
    let next_wake = next_day
        .iter()
        .map(Borrow::<TimeEntry>::borrow)
        .find(|e| e.entry_type == EntryType::WokeUp);

    let mut night = 0;
    if let (Some(asleep), Some(wake)) = (last_fell_asleep, next_wake) {
        night = (MINUTES_PER_DAY - time_to_minutes(&asleep.time)?) + time_to_minutes(&wake.time)?;
    }

    if night == 0 {
        if let (Some(first), Some(last)) = (day.first(), day.last()) {
            let (first, last): (&TimeEntry, &TimeEntry) = (first.borrow(), last.borrow());
            if first.entry_type == EntryType::WokeUp && last.entry_type == EntryType::FellAsleep {
                night = wrapped_duration(time_to_minutes(&last.time)?, time_to_minutes(&first.time)?);
            }
        }
    }

    Ok(night)
}

/// Sleep, awake and night-sleep minutes for one day.
pub fn day_durations<E, F>(day: &[E], next_day: &[F]) -> Result<DayDurations, FormatError>
where
    E: Borrow<TimeEntry>,
    F: Borrow<TimeEntry>,
{
    if day.len() < 2 {
        return Ok(DayDurations::default());
    }

    let totals = period_totals(day)?;
    Ok(DayDurations {
        total_sleep_minutes: totals.sleep_minutes,
        total_awake_minutes: totals.awake_minutes,
        night_sleep_minutes: night_sleep(day, next_day)?,
    })
}

/// Percentage of the target reached, clamped to 100. `None` unless the
/// target is positive.
pub fn completion_percentage(total_sleep_minutes: u32, required_sleep_minutes: i32) -> Option<u32> {
    if required_sleep_minutes <= 0 {
        return None;
    }
    let pct = (100.0 * total_sleep_minutes as f64 / required_sleep_minutes as f64).round();
    Some((pct as u32).min(100))
}

/// Minutes still missing to reach the target.
pub fn remaining_minutes(total_sleep_minutes: u32, required_sleep_minutes: u32) -> u32 {
    required_sleep_minutes.saturating_sub(total_sleep_minutes)
}

/// Minutes slept beyond the target.
pub fn excess_minutes(total_sleep_minutes: u32, required_sleep_minutes: u32) -> u32 {
    total_sleep_minutes.saturating_sub(required_sleep_minutes)
}

/// Minutes from `now` until the clock time `target`, rolling into tomorrow
/// when it has already passed. Always in `1..=1440`.
pub fn minutes_until(target: &str, now: NaiveTime) -> Result<u32, FormatError> {
    let target = time_to_minutes(target)? as i64;
    let mut delta = target - minutes_of_day(now) as i64;
    if delta <= 0 {
        delta += MINUTES_PER_DAY as i64;
    }
    Ok(delta as u32)
}

/// The nearer of the scheduled nap and bedtime. Ties go to the nap.
pub fn next_scheduled_sleep(
    nap: Option<&str>,
    bedtime: Option<&str>,
    now: NaiveTime,
) -> Result<Option<NextScheduledSleep>, FormatError> {
    let nap = nap
        .map(|t| minutes_until(t, now))
        .transpose()?
        .map(|minutes| NextScheduledSleep {
            minutes,
            kind: ScheduledSleepKind::Nap,
        });
    let bedtime = bedtime
        .map(|t| minutes_until(t, now))
        .transpose()?
        .map(|minutes| NextScheduledSleep {
            minutes,
            kind: ScheduledSleepKind::Bedtime,
        });

    Ok(match (nap, bedtime) {
        (Some(n), Some(b)) => Some(if b.minutes < n.minutes { b } else { n }),
        (n, b) => n.or(b),
    })
}

/// Everything needed to compute one day's metrics.
#[derive(Debug)]
pub struct DailyInput<'a, E> {
    pub date: NaiveDate,
    /// The day's entries, ascending by time.
    pub entries: &'a [E],
    /// Entries of the following calendar day, ascending by time.
    pub next_day: &'a [E],
    /// Target already resolved from settings, see [`crate::target`].
    pub required_sleep_minutes: Option<i32>,
    pub settings: Option<&'a SleepSettings>,
    /// Local wall-clock time of the request.
    pub now: NaiveDateTime,
}

/// Compute the full [`SleepMetrics`] for one day.
pub fn daily_metrics<E: Borrow<TimeEntry>>(input: DailyInput<'_, E>) -> Result<SleepMetrics, FormatError> {
    let durations = day_durations(input.entries, input.next_day)?;

    let sleep_completion_percentage = if input.entries.len() < 2 {
        Some(0)
    } else {
        input
            .required_sleep_minutes
            .and_then(|required| completion_percentage(durations.total_sleep_minutes, required))
    };

    let positive_target = input
        .required_sleep_minutes
        .filter(|r| *r > 0)
        .map(|r| r as u32);

    let time_to_next_scheduled_sleep = match input.settings {
        Some(settings) if input.date == input.now.date() => next_scheduled_sleep(
            settings.scheduled_nap_time.as_deref(),
            settings.scheduled_bedtime.as_deref(),
            input.now.time(),
        )?,
        _ => None,
    };

    Ok(SleepMetrics {
        date: input.date,
        total_sleep_minutes: durations.total_sleep_minutes,
        total_awake_minutes: durations.total_awake_minutes,
        night_sleep_minutes: durations.night_sleep_minutes,
        required_sleep_minutes: input.required_sleep_minutes,
        sleep_completion_percentage,
        remaining_sleep_minutes: positive_target
            .map(|r| remaining_minutes(durations.total_sleep_minutes, r)),
        excess_sleep_minutes: positive_target.map(|r| excess_minutes(durations.total_sleep_minutes, r)),
        time_to_next_scheduled_sleep,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entries(date: NaiveDate, items: &[(EntryType, &str)]) -> Vec<TimeEntry> {
        items
            .iter()
            .enumerate()
            .map(|(i, (entry_type, time))| TimeEntry {
                id: i as i64 + 1,
                entry_type: *entry_type,
                time: time.to_string(),
                date,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn settings(nap: Option<&str>, bedtime: Option<&str>) -> SleepSettings {
        SleepSettings {
            id: 1,
            required_sleep_minutes: 720,
            scheduled_nap_time: nap.map(str::to_string),
            scheduled_bedtime: bedtime.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    use EntryType::{FellAsleep, WokeUp};

    #[test]
    fn full_day_scenario() {
        let today = day(2024, 1, 1);
        let today_entries = entries(
            today,
            &[(WokeUp, "07:00"), (FellAsleep, "12:00"), (WokeUp, "14:00"), (FellAsleep, "20:30")],
        );
        let tomorrow = entries(day(2024, 1, 2), &[(WokeUp, "06:45")]);

        let durations = day_durations(&today_entries, &tomorrow).unwrap();
        assert_eq!(
            durations,
            DayDurations {
                total_sleep_minutes: 120,
                total_awake_minutes: 690,
                night_sleep_minutes: 615,
            }
        );
    }

    #[test]
    fn overnight_sleep_into_next_day() {
        let today = entries(day(2024, 1, 1), &[(WokeUp, "07:00"), (FellAsleep, "23:30")]);
        let tomorrow = entries(day(2024, 1, 2), &[(WokeUp, "07:00")]);
        assert_eq!(night_sleep(&today, &tomorrow).unwrap(), 450);
    }

    #[test]
    fn night_sleep_uses_last_fell_asleep_not_last_entry() {
        let today = entries(
            day(2024, 1, 1),
            &[(FellAsleep, "01:00"), (WokeUp, "02:00")],
        );
        let tomorrow = entries(day(2024, 1, 2), &[(FellAsleep, "00:30"), (WokeUp, "06:00")]);
        // 01:00 -> next day's first woke-up at 06:00, always taken as overnight.
        assert_eq!(night_sleep(&today, &tomorrow).unwrap(), 1440 - 60 + 360);
    }

    #[test]
    fn night_sleep_falls_back_to_same_day() {
        let today = entries(
            day(2024, 1, 1),
            &[(WokeUp, "07:00"), (FellAsleep, "12:00"), (WokeUp, "14:00"), (FellAsleep, "20:00")],
        );
        let none: Vec<TimeEntry> = Vec::new();
        // 20:00 around midnight to 07:00.
        assert_eq!(night_sleep(&today, &none).unwrap(), 660);
    }

    #[test]
    fn no_fallback_when_day_ends_awake() {
        let today = entries(
            day(2024, 1, 1),
            &[(WokeUp, "07:00"), (FellAsleep, "12:00"), (WokeUp, "14:00")],
        );
        let none: Vec<TimeEntry> = Vec::new();
        assert_eq!(night_sleep(&today, &none).unwrap(), 0);
    }

    #[test]
    fn fewer_than_two_entries_is_zero() {
        let date = day(2024, 1, 1);
        let tomorrow = entries(day(2024, 1, 2), &[(WokeUp, "06:00")]);
        for items in [vec![], vec![(FellAsleep, "20:00")]] {
            let today = entries(date, &items);
            let metrics = daily_metrics(DailyInput {
                date,
                entries: &today,
                next_day: &tomorrow,
                required_sleep_minutes: Some(720),
                settings: None,
                now: at(day(2024, 2, 1), 12, 0),
            })
            .unwrap();
            assert_eq!(metrics.total_sleep_minutes, 0);
            assert_eq!(metrics.total_awake_minutes, 0);
            assert_eq!(metrics.night_sleep_minutes, 0);
            assert_eq!(metrics.sleep_completion_percentage, Some(0));
        }
    }

    #[test]
    fn completion_percentage_rounds_and_clamps() {
        assert_eq!(completion_percentage(600, 720), Some(83));
        assert_eq!(completion_percentage(800, 720), Some(100));
        assert_eq!(completion_percentage(360, 720), Some(50));
        assert_eq!(completion_percentage(100, 0), None);
        assert_eq!(completion_percentage(100, -3), None);
    }

    #[test]
    fn remaining_and_excess() {
        assert_eq!(remaining_minutes(600, 720), 120);
        assert_eq!(remaining_minutes(800, 720), 0);
        assert_eq!(excess_minutes(800, 720), 80);
        assert_eq!(excess_minutes(600, 720), 0);
    }

    #[test]
    fn minutes_until_wraps_forward() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(minutes_until("13:30", noon).unwrap(), 90);
        assert_eq!(minutes_until("11:00", noon).unwrap(), 1380);
        assert_eq!(minutes_until("12:00", noon).unwrap(), 1440);
    }

    #[test]
    fn next_scheduled_picks_nearest() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            next_scheduled_sleep(Some("13:00"), Some("19:30"), noon).unwrap(),
            Some(NextScheduledSleep {
                minutes: 60,
                kind: ScheduledSleepKind::Nap
            })
        );

        let evening = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        assert_eq!(
            next_scheduled_sleep(Some("13:00"), Some("19:30"), evening).unwrap(),
            Some(NextScheduledSleep {
                minutes: 270,
                kind: ScheduledSleepKind::Bedtime
            })
        );

        assert_eq!(
            next_scheduled_sleep(None, Some("19:30"), noon).unwrap().map(|n| n.kind),
            Some(ScheduledSleepKind::Bedtime)
        );
        assert_eq!(next_scheduled_sleep(None, None, noon).unwrap(), None);
    }

    #[test]
    fn nap_wins_a_tie_with_bedtime() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            next_scheduled_sleep(Some("13:00"), Some("13:00"), noon).unwrap(),
            Some(NextScheduledSleep {
                minutes: 60,
                kind: ScheduledSleepKind::Nap
            })
        );
    }

    #[test]
    fn countdown_only_for_today() {
        let date = day(2024, 1, 1);
        let today = entries(date, &[(WokeUp, "07:00"), (FellAsleep, "12:00")]);
        let none: Vec<TimeEntry> = Vec::new();
        let settings = settings(Some("13:00"), Some("19:30"));

        let input = |now| DailyInput {
            date,
            entries: &today,
            next_day: &none,
            required_sleep_minutes: Some(720),
            settings: Some(&settings),
            now,
        };

        let same_day = daily_metrics(input(at(date, 12, 30))).unwrap();
        assert_eq!(
            same_day.time_to_next_scheduled_sleep,
            Some(NextScheduledSleep {
                minutes: 30,
                kind: ScheduledSleepKind::Nap
            })
        );

        let later = daily_metrics(input(at(day(2024, 1, 5), 12, 30))).unwrap();
        assert_eq!(later.time_to_next_scheduled_sleep, None);
    }

    #[test]
    fn daily_metrics_reports_target_fields() {
        let date = day(2024, 1, 1);
        let today = entries(
            date,
            &[(FellAsleep, "00:00"), (WokeUp, "10:00"), (FellAsleep, "20:00")],
        );
        let none: Vec<TimeEntry> = Vec::new();

        let metrics = daily_metrics(DailyInput {
            date,
            entries: &today,
            next_day: &none,
            required_sleep_minutes: Some(720),
            settings: None,
            now: at(day(2024, 3, 1), 8, 0),
        })
        .unwrap();

        assert_eq!(metrics.total_sleep_minutes, 600);
        assert_eq!(metrics.sleep_completion_percentage, Some(83));
        assert_eq!(metrics.remaining_sleep_minutes, Some(120));
        assert_eq!(metrics.excess_sleep_minutes, Some(0));
        assert_eq!(metrics.required_sleep_minutes, Some(720));
    }

    #[test]
    fn no_target_means_no_percentage() {
        let date = day(2024, 1, 1);
        let today = entries(date, &[(WokeUp, "07:00"), (FellAsleep, "12:00")]);
        let none: Vec<TimeEntry> = Vec::new();

        let metrics = daily_metrics(DailyInput {
            date,
            entries: &today,
            next_day: &none,
            required_sleep_minutes: None,
            settings: None,
            now: at(day(2024, 3, 1), 8, 0),
        })
        .unwrap();
        assert_eq!(metrics.sleep_completion_percentage, None);
        assert_eq!(metrics.remaining_sleep_minutes, None);
    }
}
