use crate::{event::Event, validate_byte_count, DeserializeMessageError};

/// terminates every event the client sends.
pub const CLIENT_MESSAGE_DELIMITER: u8 = b'\n';

/// one event tag followed by the delimiter.
pub const CLIENT_MESSAGE_SIZE: usize = 2;

/// a bat movement sent by the client. the client only ever controls the right bat, so anything
/// else arriving on the wire is a protocol violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientEventMessage(Event);

impl ClientEventMessage {
    pub fn event(self) -> Event {
        self.0
    }
}

impl TryFrom<Event> for ClientEventMessage {
    type Error = DeserializeMessageError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        match event {
            Event::RightBatUp | Event::RightBatDown => Ok(Self(event)),
            event => Err(DeserializeMessageError::EventNotAllowed(event)),
        }
    }
}

impl From<ClientEventMessage> for [u8; CLIENT_MESSAGE_SIZE] {
    fn from(value: ClientEventMessage) -> Self {
        [value.0.tag(), CLIENT_MESSAGE_DELIMITER]
    }
}

impl TryFrom<&[u8]> for ClientEventMessage {
    type Error = DeserializeMessageError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(DeserializeMessageError::EmptyMessage);
        }
        validate_byte_count(value, CLIENT_MESSAGE_SIZE)?;
        // the tag is checked before the delimiter so a forbidden event is reported as such.
        let message = Self::try_from(Event::try_from(value[0])?)?;
        if value[1] != CLIENT_MESSAGE_DELIMITER {
            return Err(DeserializeMessageError::MissingDelimiter);
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        assert_deserialize,
        client_msg::{ClientEventMessage, CLIENT_MESSAGE_SIZE},
        event::Event,
        DeserializeMessageError,
    };

    #[test]
    fn serialize() {
        let up = ClientEventMessage::try_from(Event::RightBatUp).unwrap();
        assert_eq!(<[u8; CLIENT_MESSAGE_SIZE]>::from(up), [2, b'\n']);
        let down = ClientEventMessage::try_from(Event::RightBatDown).unwrap();
        assert_eq!(<[u8; CLIENT_MESSAGE_SIZE]>::from(down), [3, b'\n']);
    }

    #[test]
    fn deserialize_ok() {
        assert_deserialize!(
            ClientEventMessage,
            [2, b'\n'],
            Ok(ClientEventMessage(Event::RightBatUp))
        );
        assert_deserialize!(
            ClientEventMessage,
            [3, b'\n'],
            Ok(ClientEventMessage(Event::RightBatDown))
        );
    }

    #[test]
    fn deserialize_err() {
        // empty message.
        assert_deserialize!(
            ClientEventMessage,
            [],
            Err(DeserializeMessageError::EmptyMessage)
        );
        // tag with no delimiter.
        assert_deserialize!(
            ClientEventMessage,
            [2],
            Err(DeserializeMessageError::InvalidByteCount)
        );
        // wrong delimiter.
        assert_deserialize!(
            ClientEventMessage,
            [2, b'\r'],
            Err(DeserializeMessageError::MissingDelimiter)
        );
        // the left bat belongs to the server.
        assert_deserialize!(
            ClientEventMessage,
            [0, b'\n'],
            Err(DeserializeMessageError::EventNotAllowed(Event::LeftBatUp))
        );
        // clients never score.
        assert_deserialize!(
            ClientEventMessage,
            [5, b'\n'],
            Err(DeserializeMessageError::EventNotAllowed(
                Event::RightPlayerScores
            ))
        );
        // not an event at all.
        assert_deserialize!(
            ClientEventMessage,
            [42, b'\n'],
            Err(DeserializeMessageError::UnrecognisedEventTag(42))
        );
    }

    #[test]
    fn only_right_bat_events_can_be_sent() {
        assert!(ClientEventMessage::try_from(Event::LeftBatDown).is_err());
        assert!(ClientEventMessage::try_from(Event::BallStrikesBat).is_err());
        assert_eq!(
            ClientEventMessage::try_from(Event::RightBatUp).map(ClientEventMessage::event).ok(),
            Some(Event::RightBatUp)
        );
    }
}
