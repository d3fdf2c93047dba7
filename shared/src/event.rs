use crate::{game_state::Side, DeserializeMessageError};

/// every mutation of a running game is one of these. the discriminant doubles as the wire tag
/// the client sends, so variants must never be reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    LeftBatUp = 0,
    LeftBatDown = 1,
    RightBatUp = 2,
    RightBatDown = 3,
    LeftPlayerScores = 4,
    RightPlayerScores = 5,
    LeftPlayerWon = 6,
    RightPlayerWon = 7,
    BallStrikesBat = 8,
}

impl Event {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn bat_up(side: Side) -> Self {
        match side {
            Side::Left => Event::LeftBatUp,
            Side::Right => Event::RightBatUp,
        }
    }

    pub fn bat_down(side: Side) -> Self {
        match side {
            Side::Left => Event::LeftBatDown,
            Side::Right => Event::RightBatDown,
        }
    }

    pub fn scores(side: Side) -> Self {
        match side {
            Side::Left => Event::LeftPlayerScores,
            Side::Right => Event::RightPlayerScores,
        }
    }

    pub fn won(side: Side) -> Self {
        match side {
            Side::Left => Event::LeftPlayerWon,
            Side::Right => Event::RightPlayerWon,
        }
    }
}

impl TryFrom<u8> for Event {
    type Error = DeserializeMessageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Event::LeftBatUp,
            1 => Event::LeftBatDown,
            2 => Event::RightBatUp,
            3 => Event::RightBatDown,
            4 => Event::LeftPlayerScores,
            5 => Event::RightPlayerScores,
            6 => Event::LeftPlayerWon,
            7 => Event::RightPlayerWon,
            8 => Event::BallStrikesBat,
            tag => return Err(DeserializeMessageError::UnrecognisedEventTag(tag)),
        })
    }
}
