//! Daily activity ledger: turns the task state of one calendar day into a
//! credit/debit balance sheet.
//!
//! Rules for a day `D`:
//! 1. Completed tasks dated `D` are credits.
//! 2. Incomplete tasks dated `D` are debits, but only once `D` is today or in the past.
//! 3. Tasks that originated on `D` and now live on another day are debits on `D`.
//! 4. +5 credit bonus when completed / total ≥ 0.8.
//! 5. +5 debit penalty when missed / total ≥ 0.5, past or current days only.
//!
//! The ledger is a pure projection of current task state: nothing here is cached
//! or persisted, and no input is mutated.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::task::Task;

pub const COMPLETION_BONUS: f64 = 5.0;
pub const MISS_PENALTY: f64 = 5.0;

// Thresholds as integer fractions so the boundaries compare exactly.
// Completion bonus: completed / total >= 8 / 10.
const BONUS_NUMERATOR: usize = 8;
const BONUS_DENOMINATOR: usize = 10;
// Miss penalty: missed / total >= 1 / 2.
const PENALTY_NUMERATOR: usize = 1;
const PENALTY_DENOMINATOR: usize = 2;

/// Ledger output for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayActivity {
    /// `None` only for the zero-valued result of an empty day.
    pub date: Option<NaiveDate>,
    pub credits: f64,
    pub debits: f64,
    pub net_change: f64,
    pub completed_tasks_list: Vec<Task>,
    /// Missed tasks plus tasks rescheduled away from this day.
    pub missed_tasks_list: Vec<Task>,
    /// The rescheduled-away subset of `missed_tasks_list`, for display.
    pub rescheduled_tasks_list: Vec<Task>,
    pub bonus: f64,
    pub penalty: f64,
}

/// Computes the ledger for the day shared by `tasks_for_day`.
///
/// The day is taken from the first task; an empty slice yields a zero-valued
/// `DayActivity` with no date. `all_tasks` must be the owner's full collection.
pub fn compute_day_activity(
    tasks_for_day: &[Task],
    all_tasks: &[Task],
    reference_now: DateTime<Utc>,
) -> DayActivity {
    match tasks_for_day.first() {
        Some(first) => tally(first.date, tasks_for_day, all_tasks, reference_now),
        None => DayActivity::default(),
    }
}

/// Computes the ledger for an explicit `date`.
///
/// Unlike [`compute_day_activity`], a day whose tasks were all moved elsewhere
/// still reports the debits for those moves.
pub fn compute_activity_for_date(
    date: NaiveDate,
    all_tasks: &[Task],
    reference_now: DateTime<Utc>,
) -> DayActivity {
    let tasks_for_day: Vec<Task> = all_tasks.iter().filter(|t| t.date == date).cloned().collect();
    if tasks_for_day.is_empty() {
        return tally(date, &[], all_tasks, reference_now);
    }
    compute_day_activity(&tasks_for_day, all_tasks, reference_now)
}

fn tally(
    day: NaiveDate,
    tasks_for_day: &[Task],
    all_tasks: &[Task],
    reference_now: DateTime<Utc>,
) -> DayActivity {
    let is_past_or_today = day <= reference_now.date_naive();

    let (completed, remainder): (Vec<&Task>, Vec<&Task>) =
        tasks_for_day.iter().partition(|t| t.completed);

    // Future incomplete tasks are never missed.
    let missed: Vec<&Task> = if is_past_or_today {
        remainder
    } else {
        Vec::new()
    };

    // A task still dated `day` is accounted by its current state alone, which
    // keeps a task moved away and back again from landing in both buckets.
    let rescheduled_away: Vec<&Task> = all_tasks
        .iter()
        .filter(|t| t.original_date() == Some(day) && t.date != day)
        .collect();

    let mut seen: HashSet<Uuid> = HashSet::new();
    let missed_and_rescheduled: Vec<&Task> = missed
        .iter()
        .chain(rescheduled_away.iter())
        .copied()
        .filter(|t| seen.insert(t.id))
        .collect();

    let completed_count = completed.len();
    let debit_count = missed_and_rescheduled.len();
    let total = completed_count + debit_count;

    let bonus = if total > 0 && completed_count * BONUS_DENOMINATOR >= total * BONUS_NUMERATOR {
        COMPLETION_BONUS
    } else {
        0.0
    };
    let penalty = if is_past_or_today
        && total > 0
        && debit_count * PENALTY_DENOMINATOR >= total * PENALTY_NUMERATOR
    {
        MISS_PENALTY
    } else {
        0.0
    };

    let credits = completed_count as f64 + bonus;
    let debits = debit_count as f64 + penalty;

    DayActivity {
        date: Some(day),
        credits,
        debits,
        net_change: credits - debits,
        completed_tasks_list: completed.into_iter().cloned().collect(),
        missed_tasks_list: missed_and_rescheduled.into_iter().cloned().collect(),
        rescheduled_tasks_list: rescheduled_away.into_iter().cloned().collect(),
        bonus,
        penalty,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{day, moved, now, task};
    use super::*;

    #[test]
    fn test_empty_input_is_zero_valued() {
        let activity = compute_day_activity(&[], &[], now());
        assert_eq!(activity, DayActivity::default());
        assert_eq!(activity.credits, 0.0);
        assert_eq!(activity.debits, 0.0);
        assert_eq!(activity.net_change, 0.0);
        assert_eq!(activity.bonus, 0.0);
        assert_eq!(activity.penalty, 0.0);
        assert!(activity.date.is_none());
    }

    #[test]
    fn test_all_completed_day_earns_bonus_and_no_debits() {
        let tasks = vec![task(day(10), true), task(day(10), true), task(day(10), true)];
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.debits, 0.0);
        assert_eq!(activity.credits, 3.0 + COMPLETION_BONUS);
        assert_eq!(activity.completed_tasks_list.len(), 3);
    }

    #[test]
    fn test_four_of_five_completed_in_past() {
        let mut tasks: Vec<Task> = (0..4).map(|_| task(day(10), true)).collect();
        tasks.push(task(day(10), false));

        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.credits, 9.0);
        assert_eq!(activity.debits, 1.0);
        assert_eq!(activity.net_change, 8.0);
        assert_eq!(activity.bonus, COMPLETION_BONUS);
        assert_eq!(activity.penalty, 0.0);
    }

    #[test]
    fn test_future_incomplete_tasks_are_not_missed() {
        let tasks = vec![task(day(20), false), task(day(20), false)];
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert!(activity.missed_tasks_list.is_empty());
        assert_eq!(activity.debits, 0.0);
        assert_eq!(activity.penalty, 0.0);
    }

    #[test]
    fn test_future_day_still_counts_rescheduled_away_tasks() {
        let for_day = vec![task(day(20), false), task(day(20), false)];
        let away = moved(day(20), day(22), false);
        let mut all = for_day.clone();
        all.push(away.clone());

        let activity = compute_day_activity(&for_day, &all, now());
        assert_eq!(activity.debits, 1.0);
        assert_eq!(activity.missed_tasks_list, vec![away.clone()]);
        assert_eq!(activity.rescheduled_tasks_list, vec![away]);
        // Penalty applies only to past or current days.
        assert_eq!(activity.penalty, 0.0);
    }

    #[test]
    fn test_rescheduled_task_debits_origin_and_credits_destination() {
        let origin_other = task(day(8), true);
        let shifted = moved(day(8), day(9), true);
        let all = vec![origin_other.clone(), shifted.clone()];

        let origin = compute_day_activity(&[origin_other], &all, now());
        assert!(origin.missed_tasks_list.iter().any(|t| t.id == shifted.id));
        assert!(origin.completed_tasks_list.iter().all(|t| t.id != shifted.id));

        let destination = compute_day_activity(&[shifted.clone()], &all, now());
        assert!(destination.completed_tasks_list.iter().any(|t| t.id == shifted.id));
        assert!(destination.missed_tasks_list.is_empty());
        assert_eq!(destination.debits, 0.0);
    }

    #[test]
    fn test_task_moved_back_to_origin_is_not_double_counted() {
        let reverted = moved(day(10), day(10), false);
        let tasks = vec![reverted];
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.missed_tasks_list.len(), 1);
        assert!(activity.rescheduled_tasks_list.is_empty());
        // 1 missed of 1 → penalty on top of the single debit.
        assert_eq!(activity.debits, 1.0 + MISS_PENALTY);
    }

    #[test]
    fn test_duplicate_ids_are_counted_once() {
        let missed = task(day(10), false);
        let tasks = vec![missed.clone(), missed];
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.missed_tasks_list.len(), 1);
    }

    #[test]
    fn test_penalty_triggers_at_exactly_half_missed() {
        let tasks = vec![
            task(day(10), true),
            task(day(10), true),
            task(day(10), false),
            task(day(10), false),
        ];
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.penalty, MISS_PENALTY);
        assert_eq!(activity.debits, 2.0 + MISS_PENALTY);
        assert_eq!(activity.bonus, 0.0);
    }

    #[test]
    fn test_penalty_not_triggered_just_below_half() {
        let mut tasks: Vec<Task> = (0..501).map(|_| task(day(10), true)).collect();
        tasks.extend((0..499).map(|_| task(day(10), false)));
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.penalty, 0.0);
        assert_eq!(activity.debits, 499.0);
    }

    #[test]
    fn test_bonus_not_triggered_just_below_eighty_percent() {
        let mut tasks: Vec<Task> = (0..799).map(|_| task(day(10), true)).collect();
        tasks.extend((0..201).map(|_| task(day(10), false)));
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.bonus, 0.0);
    }

    #[test]
    fn test_today_counts_as_past() {
        let tasks = vec![task(day(15), false)];
        let activity = compute_day_activity(&tasks, &tasks, now());
        assert_eq!(activity.missed_tasks_list.len(), 1);
        assert_eq!(activity.penalty, MISS_PENALTY);
    }

    #[test]
    fn test_explicit_date_counts_day_with_only_moved_tasks() {
        let away = moved(day(11), day(12), false);
        let all = vec![away];

        assert_eq!(compute_day_activity(&[], &all, now()), DayActivity::default());

        let activity = compute_activity_for_date(day(11), &all, now());
        assert_eq!(activity.date, Some(day(11)));
        assert_eq!(activity.debits, 1.0 + MISS_PENALTY);
        assert_eq!(activity.net_change, -6.0);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let tasks = vec![task(day(10), false), moved(day(10), day(11), false)];
        let snapshot = tasks.clone();
        let _ = compute_day_activity(&tasks[..1], &tasks, now());
        assert_eq!(tasks, snapshot);
    }
}
