use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Identifier of one record inside an activity log. Assigned by the log when
/// the record enters it; unique for the lifetime of the log, never reused,
/// and stable across stream coalescing (a coalesced chunk keeps the id of the
/// record it merged into).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub u64);

impl ActivityId {
    pub const ZERO: ActivityId = ActivityId(0);
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation id of one execution turn, assigned by the runtime. All records
/// produced by the same submission carry the same `ExecutionId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(pub String);

impl ExecutionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExecutionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle of an echoed input. An input is echoed optimistically as
/// `Provisional` when the user submits it, replaced by an `Executing` record
/// once the runtime acknowledges it, and marked `Completed` when the turn
/// finishes. Transitions only move forward.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputState {
    Provisional,
    Executing,
    Completed,
}

/// One entry in the activity log. Exactly one variant per record kind; all
/// matches over this enum are exhaustive so a new kind forces every consumer
/// to handle it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExecutionRecord {
    Input(InputRecord),
    OutputStream(StreamRecord),
    ErrorStream(StreamRecord),
    OutputMessage(OutputMessageRecord),
    ErrorMessage(ErrorMessageRecord),
    OutputHtml(HtmlRecord),
    OutputPlot(PlotRecord),
    Prompt(PromptRecord),
}

/// Discriminant-only view of [`ExecutionRecord`], for logging and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    Input,
    OutputStream,
    ErrorStream,
    OutputMessage,
    ErrorMessage,
    OutputHtml,
    OutputPlot,
    Prompt,
}

/// Echo of source code submitted for execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub state: InputState,
    pub code: String,
}

/// A run of stdout or stderr text. Chunks arriving while this record is the
/// last entry of the log are appended in place rather than creating new
/// entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub text: String,
}

impl StreamRecord {
    /// Append a further chunk to the accumulated text.
    pub fn append_chunk(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// The accumulated text split into lines, for consumers that render
    /// line-by-line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// A discrete structured result, e.g. the value of the evaluated expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputMessageRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub text: String,
    /// Optional structured representation bundle as produced by the runtime.
    pub data: Option<serde_json::Value>,
}

/// A discrete error message, e.g. an uncaught exception.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessageRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub message: String,
    pub traceback: Vec<String>,
}

/// Rendered HTML emitted by the runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HtmlRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub html: String,
}

/// Reference to a rendered graphical artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

/// An interactive input request from the runtime, awaiting a reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: ActivityId,
    pub parent_id: ExecutionId,
    pub prompt: String,
    pub password: bool,
    /// The reply, once given. Withheld (left `None`) for password prompts
    /// even after they are answered; see `answered`.
    pub answer: Option<String>,
    pub answered: bool,
}

impl ExecutionRecord {
    pub fn id(&self) -> ActivityId {
        match self {
            ExecutionRecord::Input(r) => r.id,
            ExecutionRecord::OutputStream(r) => r.id,
            ExecutionRecord::ErrorStream(r) => r.id,
            ExecutionRecord::OutputMessage(r) => r.id,
            ExecutionRecord::ErrorMessage(r) => r.id,
            ExecutionRecord::OutputHtml(r) => r.id,
            ExecutionRecord::OutputPlot(r) => r.id,
            ExecutionRecord::Prompt(r) => r.id,
        }
    }

    pub fn parent_id(&self) -> &ExecutionId {
        match self {
            ExecutionRecord::Input(r) => &r.parent_id,
            ExecutionRecord::OutputStream(r) => &r.parent_id,
            ExecutionRecord::ErrorStream(r) => &r.parent_id,
            ExecutionRecord::OutputMessage(r) => &r.parent_id,
            ExecutionRecord::ErrorMessage(r) => &r.parent_id,
            ExecutionRecord::OutputHtml(r) => &r.parent_id,
            ExecutionRecord::OutputPlot(r) => &r.parent_id,
            ExecutionRecord::Prompt(r) => &r.parent_id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            ExecutionRecord::Input(_) => RecordKind::Input,
            ExecutionRecord::OutputStream(_) => RecordKind::OutputStream,
            ExecutionRecord::ErrorStream(_) => RecordKind::ErrorStream,
            ExecutionRecord::OutputMessage(_) => RecordKind::OutputMessage,
            ExecutionRecord::ErrorMessage(_) => RecordKind::ErrorMessage,
            ExecutionRecord::OutputHtml(_) => RecordKind::OutputHtml,
            ExecutionRecord::OutputPlot(_) => RecordKind::OutputPlot,
            ExecutionRecord::Prompt(_) => RecordKind::Prompt,
        }
    }

    /// Return the same record with its id rewritten. Used by the log when a
    /// record enters it.
    pub fn with_id(self, id: ActivityId) -> ExecutionRecord {
        match self {
            ExecutionRecord::Input(mut r) => {
                r.id = id;
                ExecutionRecord::Input(r)
            }
            ExecutionRecord::OutputStream(mut r) => {
                r.id = id;
                ExecutionRecord::OutputStream(r)
            }
            ExecutionRecord::ErrorStream(mut r) => {
                r.id = id;
                ExecutionRecord::ErrorStream(r)
            }
            ExecutionRecord::OutputMessage(mut r) => {
                r.id = id;
                ExecutionRecord::OutputMessage(r)
            }
            ExecutionRecord::ErrorMessage(mut r) => {
                r.id = id;
                ExecutionRecord::ErrorMessage(r)
            }
            ExecutionRecord::OutputHtml(mut r) => {
                r.id = id;
                ExecutionRecord::OutputHtml(r)
            }
            ExecutionRecord::OutputPlot(mut r) => {
                r.id = id;
                ExecutionRecord::OutputPlot(r)
            }
            ExecutionRecord::Prompt(mut r) => {
                r.id = id;
                ExecutionRecord::Prompt(r)
            }
        }
    }
}
