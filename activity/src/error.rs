use console_protocol::ActivityId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActivityError {
    #[error("no prompt with id {0} in this session")]
    UnknownPrompt(ActivityId),

    #[error("prompt {0} was already answered")]
    PromptAlreadyAnswered(ActivityId),
}
