//! Activity log for one runtime console session.
//!
//! [`ActivityLog`] keeps the authoritative, display-ordered view of a
//! session's execution activity and applies a single merge policy on every
//! insertion: adjacent stdout/stderr chunks from the same execution are
//! coalesced in place, and a provisional input echo is replaced once the
//! runtime confirms the submission. Consumers always observe an
//! already-minimal sequence and key entries by [`console_protocol::ActivityId`].
//!
//! [`SessionActivity`] is the in-process adapter half: it owns one log and
//! maps typed [`console_protocol::RuntimeEvent`]s onto it. Transport to the
//! runtime process and rendering both live elsewhere.

mod error;
mod log;
mod session;

pub use error::ActivityError;
pub use log::ActivityLog;
pub use session::SessionActivity;
