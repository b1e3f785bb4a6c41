use console_protocol::ActivityId;
use console_protocol::ErrorMessageRecord;
use console_protocol::ExecutionId;
use console_protocol::ExecutionRecord;
use console_protocol::HtmlRecord;
use console_protocol::InputRecord;
use console_protocol::InputState;
use console_protocol::OutputMessageRecord;
use console_protocol::PlotRecord;
use console_protocol::PromptRecord;
use console_protocol::RuntimeEvent;
use console_protocol::StreamName;
use console_protocol::StreamRecord;
use tracing::debug;

use crate::error::ActivityError;
use crate::log::ActivityLog;

/// Adapter between one runtime session and its [`ActivityLog`]. Events are
/// delivered strictly serialized over an ordered channel; each one maps to
/// exactly one log operation.
#[derive(Clone, Debug, Default)]
pub struct SessionActivity {
    log: ActivityLog,
}

impl SessionActivity {
    pub fn new() -> Self {
        Self {
            log: ActivityLog::new(),
        }
    }

    /// Optimistically echo code the user just submitted, before the runtime
    /// has acknowledged it. The echo is replaced once the matching
    /// [`RuntimeEvent::ExecuteInput`] arrives.
    pub fn echo_input(&mut self, execution_id: ExecutionId, code: impl Into<String>) -> ActivityId {
        self.log.append(ExecutionRecord::Input(InputRecord {
            id: ActivityId::ZERO,
            parent_id: execution_id,
            state: InputState::Provisional,
            code: code.into(),
        }))
    }

    /// Apply one runtime event to the log. Returns the id of the record the
    /// event landed in, or `None` for events that only advance lifecycle
    /// state.
    pub fn handle_event(&mut self, event: RuntimeEvent) -> Option<ActivityId> {
        match event {
            RuntimeEvent::ExecuteInput { execution_id, code } => {
                Some(self.log.append(ExecutionRecord::Input(InputRecord {
                    id: ActivityId::ZERO,
                    parent_id: execution_id,
                    state: InputState::Executing,
                    code,
                })))
            }
            RuntimeEvent::Stream {
                execution_id,
                stream,
                text,
            } => {
                let chunk = StreamRecord {
                    id: ActivityId::ZERO,
                    parent_id: execution_id,
                    text,
                };
                let record = match stream {
                    StreamName::Stdout => ExecutionRecord::OutputStream(chunk),
                    StreamName::Stderr => ExecutionRecord::ErrorStream(chunk),
                };
                Some(self.log.append(record))
            }
            RuntimeEvent::ExecuteResult {
                execution_id,
                text,
                data,
            } => Some(
                self.log
                    .append(ExecutionRecord::OutputMessage(OutputMessageRecord {
                        id: ActivityId::ZERO,
                        parent_id: execution_id,
                        text,
                        data,
                    })),
            ),
            RuntimeEvent::ExecutionError {
                execution_id,
                message,
                traceback,
            } => Some(
                self.log
                    .append(ExecutionRecord::ErrorMessage(ErrorMessageRecord {
                        id: ActivityId::ZERO,
                        parent_id: execution_id,
                        message,
                        traceback,
                    })),
            ),
            RuntimeEvent::DisplayHtml { execution_id, html } => {
                Some(self.log.append(ExecutionRecord::OutputHtml(HtmlRecord {
                    id: ActivityId::ZERO,
                    parent_id: execution_id,
                    html,
                })))
            }
            RuntimeEvent::DisplayPlot {
                execution_id,
                mime_type,
                data,
            } => Some(self.log.append(ExecutionRecord::OutputPlot(PlotRecord {
                id: ActivityId::ZERO,
                parent_id: execution_id,
                mime_type,
                data,
            }))),
            RuntimeEvent::InputRequest {
                execution_id,
                prompt,
                password,
            } => Some(self.log.append(ExecutionRecord::Prompt(PromptRecord {
                id: ActivityId::ZERO,
                parent_id: execution_id,
                prompt,
                password,
                answer: None,
                answered: false,
            }))),
            RuntimeEvent::ExecutionFinished { execution_id } => {
                if !self
                    .log
                    .update_input_state(&execution_id, InputState::Completed)
                {
                    debug!("execution {execution_id} finished without a live input record");
                }
                None
            }
        }
    }

    /// Record the user's reply to an interactive prompt. The reply text is
    /// withheld for password prompts.
    pub fn answer_prompt(&mut self, id: ActivityId, answer: &str) -> Result<(), ActivityError> {
        let Some(ExecutionRecord::Prompt(prompt)) = self.log.get_mut(id) else {
            return Err(ActivityError::UnknownPrompt(id));
        };
        if prompt.answered {
            return Err(ActivityError::PromptAlreadyAnswered(id));
        }
        prompt.answered = true;
        if !prompt.password {
            prompt.answer = Some(answer.to_string());
        }
        Ok(())
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Whole-session clear.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}
