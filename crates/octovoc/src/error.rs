use crate::api::ApiError;
use octovoc_core::{BatteryId, WordId};
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("No battery has been started")]
    NoBattery,
    #[error("Battery {0} has no words")]
    EmptyBattery(BatteryId),
    #[error("Word {0} is not the current question")]
    NotCurrentWord(WordId),
    #[error("Word {word_id} is not part of battery {battery_id}")]
    UnknownWord {
        word_id: WordId,
        battery_id: BatteryId,
    },
}
