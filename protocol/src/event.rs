use serde::Deserialize;
use serde::Serialize;

use crate::record::ExecutionId;

/// Which standard stream a chunk of text arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StreamName {
    Stdout,
    Stderr,
}

/// An execution event delivered by the runtime, in the order the runtime
/// produced it. The transport that carries these (sockets, comm channels) is
/// outside this crate; by the time an event is constructed it has already
/// been validated, so every variant maps to exactly one activity-log
/// operation and none of them can fail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    /// The runtime acknowledged a submission and started executing it.
    ExecuteInput {
        execution_id: ExecutionId,
        code: String,
    },
    /// A chunk of stdout or stderr text.
    Stream {
        execution_id: ExecutionId,
        stream: StreamName,
        text: String,
    },
    /// The discrete result of the evaluated expression.
    ExecuteResult {
        execution_id: ExecutionId,
        text: String,
        data: Option<serde_json::Value>,
    },
    /// An uncaught error raised by the execution.
    ExecutionError {
        execution_id: ExecutionId,
        message: String,
        traceback: Vec<String>,
    },
    /// Rendered HTML output.
    DisplayHtml {
        execution_id: ExecutionId,
        html: String,
    },
    /// A rendered graphical artifact.
    DisplayPlot {
        execution_id: ExecutionId,
        mime_type: String,
        data: String,
    },
    /// The runtime is requesting interactive input from the user.
    InputRequest {
        execution_id: ExecutionId,
        prompt: String,
        password: bool,
    },
    /// The execution turn finished, successfully or not.
    ExecutionFinished { execution_id: ExecutionId },
}

impl RuntimeEvent {
    /// The execution turn this event belongs to.
    pub fn execution_id(&self) -> &ExecutionId {
        match self {
            RuntimeEvent::ExecuteInput { execution_id, .. } => execution_id,
            RuntimeEvent::Stream { execution_id, .. } => execution_id,
            RuntimeEvent::ExecuteResult { execution_id, .. } => execution_id,
            RuntimeEvent::ExecutionError { execution_id, .. } => execution_id,
            RuntimeEvent::DisplayHtml { execution_id, .. } => execution_id,
            RuntimeEvent::DisplayPlot { execution_id, .. } => execution_id,
            RuntimeEvent::InputRequest { execution_id, .. } => execution_id,
            RuntimeEvent::ExecutionFinished { execution_id } => execution_id,
        }
    }
}
