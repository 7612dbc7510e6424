//! Cumulative balance across a day / week / month / all-time range.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::task::Task;
use crate::tracker::ledger::{compute_activity_for_date, DayActivity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
    All,
}

/// Longest range a timeline will materialize, in days (roughly ten years).
pub const MAX_TIMELINE_DAYS: i64 = 3_660;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.succ_opt()).take_while(move |d| *d <= end)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineDay {
    pub date: NaiveDate,
    pub activity: DayActivity,
    /// Sum of `net_change` from the start of the range up to and including this day.
    pub running_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub view: ViewMode,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<TimelineDay>,
    pub total_net_change: f64,
}

/// Resolves the range a view covers around `anchor`.
///
/// Weeks run Monday to Sunday. `All` spans every date any task currently sits
/// on or originated from. Ranges that fall off the calendar or exceed
/// [`MAX_TIMELINE_DAYS`] are rejected.
pub fn date_range(
    view: ViewMode,
    anchor: NaiveDate,
    all_tasks: &[Task],
) -> Result<DateRange, AppError> {
    let range = match view {
        ViewMode::Day => DateRange {
            start: anchor,
            end: anchor,
        },
        ViewMode::Week => {
            let offset = u64::from(anchor.weekday().num_days_from_monday());
            let start = anchor
                .checked_sub_days(Days::new(offset))
                .ok_or_else(|| out_of_calendar(anchor))?;
            let end = start
                .checked_add_days(Days::new(6))
                .ok_or_else(|| out_of_calendar(anchor))?;
            DateRange { start, end }
        }
        ViewMode::Month => {
            let start = anchor.with_day(1).unwrap_or(anchor);
            // Only December of the last representable year has no successor month.
            let end = first_of_next_month(start)
                .and_then(|d| d.pred_opt())
                .unwrap_or(NaiveDate::MAX);
            DateRange { start, end }
        }
        ViewMode::All => {
            let dates: Vec<NaiveDate> = all_tasks
                .iter()
                .flat_map(|t| std::iter::once(t.date).chain(t.original_date()))
                .collect();
            DateRange {
                start: dates.iter().min().copied().unwrap_or(anchor),
                end: dates.iter().max().copied().unwrap_or(anchor),
            }
        }
    };

    if range.len_days() > MAX_TIMELINE_DAYS {
        return Err(AppError::Validation(format!(
            "timeline from {} to {} spans {} days; the limit is {MAX_TIMELINE_DAYS}",
            range.start,
            range.end,
            range.len_days()
        )));
    }
    Ok(range)
}

fn out_of_calendar(anchor: NaiveDate) -> AppError {
    AppError::Validation(format!("week around {anchor} falls outside the supported calendar"))
}

fn first_of_next_month(first: NaiveDate) -> Option<NaiveDate> {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
}

/// Computes every day of `range` independently and accumulates the running
/// balance in chronological order from a baseline of 0.
pub fn build_timeline(
    view: ViewMode,
    range: DateRange,
    all_tasks: &[Task],
    reference_now: DateTime<Utc>,
) -> Timeline {
    let mut running_balance = 0.0;
    let days: Vec<TimelineDay> = range
        .days()
        .map(|date| {
            let activity = compute_activity_for_date(date, all_tasks, reference_now);
            running_balance += activity.net_change;
            TimelineDay {
                date,
                activity,
                running_balance,
            }
        })
        .collect();

    Timeline {
        view,
        start: range.start,
        end: range.end,
        days,
        total_net_change: running_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::ledger::fixtures::{day, moved, now, task};

    #[test]
    fn test_week_range_is_monday_to_sunday() {
        // 2026-03-12 is a Thursday.
        let range = date_range(ViewMode::Week, day(12), &[]).unwrap();
        assert_eq!(range.start, day(9));
        assert_eq!(range.end, day(15));
        assert_eq!(range.days().count(), 7);
    }

    #[test]
    fn test_month_range_covers_calendar_month() {
        let range = date_range(ViewMode::Month, day(12), &[]).unwrap();
        assert_eq!(range.start, day(1));
        assert_eq!(range.end, day(31));

        let december = NaiveDate::from_ymd_opt(2026, 12, 5).unwrap();
        let range = date_range(ViewMode::Month, december, &[]).unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_all_range_includes_original_dates() {
        let tasks = vec![task(day(10), false), moved(day(3), day(20), false)];
        let range = date_range(ViewMode::All, day(15), &tasks).unwrap();
        assert_eq!(range.start, day(3));
        assert_eq!(range.end, day(20));
    }

    #[test]
    fn test_all_range_without_tasks_is_anchor() {
        let range = date_range(ViewMode::All, day(15), &[]).unwrap();
        assert_eq!(range.start, day(15));
        assert_eq!(range.end, day(15));
    }

    #[test]
    fn test_week_total_equals_sum_of_days_in_any_order() {
        let tasks = vec![
            task(day(9), true),
            task(day(10), false),
            task(day(11), true),
            task(day(11), false),
            moved(day(12), day(13), true),
            task(day(14), false),
        ];
        let range = date_range(ViewMode::Week, day(12), &tasks).unwrap();
        let timeline = build_timeline(ViewMode::Week, range, &tasks, now());

        let forward: f64 = range
            .days()
            .map(|d| compute_activity_for_date(d, &tasks, now()).net_change)
            .sum();
        let mut reversed: Vec<NaiveDate> = range.days().collect();
        reversed.reverse();
        let backward: f64 = reversed
            .into_iter()
            .map(|d| compute_activity_for_date(d, &tasks, now()).net_change)
            .sum();

        assert_eq!(timeline.total_net_change, forward);
        assert_eq!(forward, backward);
        assert_eq!(
            timeline.days.last().map(|d| d.running_balance),
            Some(timeline.total_net_change)
        );
    }

    #[test]
    fn test_running_balance_is_chronological() {
        let tasks = vec![task(day(9), true), task(day(10), false)];
        let range = DateRange {
            start: day(9),
            end: day(10),
        };
        let timeline = build_timeline(ViewMode::Day, range, &tasks, now());

        // Day 9: 1 credit + 5 bonus. Day 10: 1 debit + 5 penalty.
        assert_eq!(timeline.days[0].running_balance, 6.0);
        assert_eq!(timeline.days[1].running_balance, 0.0);
        assert_eq!(timeline.total_net_change, 0.0);
    }

    #[test]
    fn test_view_mode_deserializes_snake_case() {
        let view: ViewMode = serde_json::from_str(r#""month""#).unwrap();
        assert_eq!(view, ViewMode::Month);
    }

    #[test]
    fn test_week_at_end_of_calendar_is_rejected() {
        // NaiveDate::MAX is a Monday, so its week would end past the calendar.
        let result = date_range(ViewMode::Week, NaiveDate::MAX, &[]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_week_at_start_of_calendar_is_rejected() {
        let result = date_range(ViewMode::Week, NaiveDate::MIN, &[]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_month_at_end_of_calendar_ends_on_last_date() {
        let range = date_range(ViewMode::Month, NaiveDate::MAX, &[]).unwrap();
        assert_eq!(range.end, NaiveDate::MAX);
        assert_eq!(range.days().last(), Some(NaiveDate::MAX));
        assert_eq!(range.days().count(), 31);
    }

    #[test]
    fn test_all_range_beyond_limit_is_rejected() {
        let first = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let tasks = vec![task(first, false), task(last, false)];
        let result = date_range(ViewMode::All, day(15), &tasks);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_all_range_at_limit_is_accepted() {
        let first = day(1);
        let last = first + chrono::Duration::days(MAX_TIMELINE_DAYS - 1);
        let tasks = vec![task(first, false), task(last, false)];
        let range = date_range(ViewMode::All, first, &tasks).unwrap();
        assert_eq!(range.len_days(), MAX_TIMELINE_DAYS);
    }
}
