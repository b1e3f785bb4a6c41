//! Shared data model for the runtime console: the execution-record types that
//! make up one session's activity log, and the runtime events that produce
//! them.
//!
//! This crate is deliberately free of I/O and rendering concerns; it only
//! defines the types exchanged between the runtime adapter and the log.

mod event;
mod record;

pub use event::RuntimeEvent;
pub use event::StreamName;
pub use record::ActivityId;
pub use record::ErrorMessageRecord;
pub use record::ExecutionId;
pub use record::ExecutionRecord;
pub use record::HtmlRecord;
pub use record::InputRecord;
pub use record::InputState;
pub use record::OutputMessageRecord;
pub use record::PlotRecord;
pub use record::PromptRecord;
pub use record::RecordKind;
pub use record::StreamRecord;
