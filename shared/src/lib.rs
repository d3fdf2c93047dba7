use thiserror::Error;

pub mod client_msg;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod game_state;
pub mod server_msg;
pub mod session;
pub mod simulation;

use event::Event;

#[derive(Debug, Error)]
pub enum DeserializeMessageError {
    #[error("empty message")]
    EmptyMessage,
    #[error("invalid amount of bytes")]
    InvalidByteCount,
    #[error("message is not terminated by a delimiter")]
    MissingDelimiter,
    #[error("unrecognised event tag {0}")]
    UnrecognisedEventTag(u8),
    #[error("event {0:?} may not be sent by a client")]
    EventNotAllowed(Event),
    #[error("invalid ball position")]
    InvalidBallPosition,
    #[error("invalid paddle position")]
    InvalidPaddlePosition,
    #[error("table does not match the local configuration")]
    TableMismatch,
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}

fn validate_byte_count(slice: &[u8], exp_len: usize) -> Result<(), DeserializeMessageError> {
    if slice.len() != exp_len {
        Err(DeserializeMessageError::InvalidByteCount)
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_deserialize {
    ($type:ty, $bytes:expr, $expected:pat $(,)?) => {{
        let bytes: &[u8] = &$bytes;
        let result = <$type as TryFrom<&[u8]>>::try_from(bytes);
        assert!(matches!(result, $expected), "unexpected result: {:?}", result);
    }};
}
