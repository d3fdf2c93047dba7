use serde::{Deserialize, Serialize};

use crate::{config::GameConfig, DeserializeMessageError};

/// which edge of the table a bat or player belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub table: Table,
    pub left_player: Player,
    pub right_player: Player,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub width: i32,
    pub height: i32,
    pub left_bat: Bat,
    pub right_bat: Bat,
    pub ball: Ball,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bat {
    pub x: i32,
    pub y: i32,
    pub length: i32,
    /// vertical impulse for the next tick. never replicated, the client only draws positions.
    #[serde(skip)]
    pub y_speed: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub x_speed: i32,
    pub y_speed: i32,
}

/// a player's bat is not stored here; it is looked up on the table by [`Side`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            table: Table::new(config),
            left_player: Player::new("Left Player"),
            right_player: Player::new("Right Player"),
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Left => &self.left_player,
            Side::Right => &self.right_player,
        }
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Left => &mut self.left_player,
            Side::Right => &mut self.right_player,
        }
    }

    /// checks the invariants a replicated snapshot must satisfy before it replaces the local view.
    /// the table must have the shape `config` describes, so positions can be checked without
    /// overflow and every entity fits on the screen sized for it.
    pub fn validate(&self, config: &GameConfig) -> Result<(), DeserializeMessageError> {
        let table = &self.table;
        if table.width != config.table_width || table.height != config.table_height {
            return Err(DeserializeMessageError::TableMismatch);
        }
        for (bat, x) in [(&table.left_bat, 0), (&table.right_bat, table.width)] {
            if bat.x != x
                || bat.length != config.bat_length
                || bat.y < 0
                || bat.y > table.height - bat.length
            {
                return Err(DeserializeMessageError::InvalidPaddlePosition);
            }
        }
        let ball = &table.ball;
        if !(0..=table.width).contains(&ball.x) || !(0..=table.height).contains(&ball.y) {
            return Err(DeserializeMessageError::InvalidBallPosition);
        }
        Ok(())
    }
}

impl Table {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            width: config.table_width,
            height: config.table_height,
            left_bat: Bat::new(0, config),
            right_bat: Bat::new(config.table_width, config),
            ball: Ball::new(config),
        }
    }

    pub fn bat_mut(&mut self, side: Side) -> &mut Bat {
        match side {
            Side::Left => &mut self.left_bat,
            Side::Right => &mut self.right_bat,
        }
    }
}

impl Bat {
    fn new(x: i32, config: &GameConfig) -> Self {
        Self {
            x,
            y: config.table_height / 2 - config.bat_length / 2,
            length: config.bat_length,
            y_speed: 0,
        }
    }

    /// inclusive on both ends, so a ball level with the bat's last cell is still returned.
    pub fn touches(&self, impact_y: i32) -> bool {
        self.y <= impact_y && impact_y <= self.y + self.length
    }
}

impl Ball {
    fn new(config: &GameConfig) -> Self {
        Self {
            x: config.table_width / 2,
            y: config.table_height / 2,
            x_speed: config.ball_base_speed,
            y_speed: config.ball_base_speed,
        }
    }
}

impl Player {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            score: 0,
        }
    }
}
