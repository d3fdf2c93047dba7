use crate::{config::GameConfig, game_state::Game, DeserializeMessageError};

/// this byte is appended to the end of every server message to indicate termination.
/// compact json escapes newlines inside strings, so a record never contains this byte.
pub const SERVER_MESSAGE_DELIMITER: u8 = b'\n';

/// upper bound on a record, delimiter included. a real snapshot is a few hundred bytes.
pub const MAX_SERVER_MESSAGE_SIZE: usize = 4096;

/// the full game as the server saw it at the end of a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotMessage {
    pub game: Game,
}

impl SnapshotMessage {
    /// encodes the snapshot as one delimited json record.
    pub fn serialize(game: &Game) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec(game)?;
        bytes.push(SERVER_MESSAGE_DELIMITER);
        Ok(bytes)
    }

    /// `value` is a single record with its delimiter already stripped. the decoded game must
    /// fit the table described by `config`.
    pub fn deserialize(value: &[u8], config: &GameConfig) -> Result<Self, DeserializeMessageError> {
        if value.is_empty() {
            return Err(DeserializeMessageError::EmptyMessage);
        }
        if value.len() >= MAX_SERVER_MESSAGE_SIZE {
            return Err(DeserializeMessageError::InvalidByteCount);
        }
        let game: Game = serde_json::from_slice(value)?;
        game.validate(config)?;
        Ok(Self { game })
    }
}
