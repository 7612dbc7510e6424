// Daily task tracker: task CRUD, rescheduling bookkeeping, and the
// credit/debit activity ledger with its day / week / month timelines.

pub mod handlers;
pub mod ledger;
pub mod reschedule;
pub mod service;
pub mod store;
pub mod timeline;
