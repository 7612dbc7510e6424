//! Outbound notifications (Telegram / WhatsApp).
//!
//! Senders never return errors: failures are logged and reported through
//! `SendOutcome::success = false`.

use std::fmt::Write;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tracker::ledger::DayActivity;

pub mod http;

pub use http::HttpNotifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum Destination {
    Telegram { chat_id: String },
    #[serde(rename = "whatsapp")]
    WhatsApp { phone: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Carried in `AppState` as `Arc<dyn NotificationSender>`.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: &str, destination: &Destination) -> SendOutcome;
}

/// Renders a day's ledger as a plain-text summary.
pub fn format_day_summary(date: NaiveDate, activity: &DayActivity) -> String {
    let mut out = format!("SwitchBuddy daily summary for {}\n", date.format("%a %d %b %Y"));
    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "Net change: {:+} (credits {}, debits {})",
        activity.net_change, activity.credits, activity.debits
    );
    if activity.bonus > 0.0 {
        let _ = writeln!(out, "Completion bonus: +{}", activity.bonus);
    }
    if activity.penalty > 0.0 {
        let _ = writeln!(out, "Missed-task penalty: -{}", activity.penalty);
    }

    if !activity.completed_tasks_list.is_empty() {
        out.push_str("\nCompleted:\n");
        for task in &activity.completed_tasks_list {
            let _ = writeln!(out, "  [x] {}", task.title);
        }
    }

    let rescheduled_ids: Vec<_> = activity.rescheduled_tasks_list.iter().map(|t| t.id).collect();
    if !activity.missed_tasks_list.is_empty() {
        out.push_str("\nMissed:\n");
        for task in &activity.missed_tasks_list {
            if rescheduled_ids.contains(&task.id) {
                let _ = writeln!(out, "  [>] {} (moved to {})", task.title, task.date);
            } else {
                let _ = writeln!(out, "  [ ] {}", task.title);
            }
        }
    }

    if activity.completed_tasks_list.is_empty() && activity.missed_tasks_list.is_empty() {
        out.push_str("\nNo tasks recorded for this day.\n");
    }
    out
}
