pub const DEFAULT_PORT: u16 = 4242;
pub const DEFAULT_IP: &str = "127.0.0.1";

/// the number of commands that may be waiting on the dispatcher before producers block.
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub table_width: i32,
    pub table_height: i32,
    pub bat_length: i32,
    /// vertical distance a bat covers in the tick after a move key is pressed.
    pub bat_speed: i32,
    pub ball_base_speed: i32,
    pub ball_max_speed: i32,
    pub win_score: u32,
    /// probability, per axis, that a strike adds one unit of speed to the ball.
    pub speed_up_chance: f64,
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            table_width: 100,
            table_height: 40,
            bat_length: 7,
            bat_speed: 1,
            ball_base_speed: 1,
            ball_max_speed: 3,
            win_score: 10,
            speed_up_chance: 0.1,
            fps: 25,
        }
    }
}

impl GameConfig {
    /// the terminal needs room for the border column and the score rows.
    pub fn required_screen_size(&self) -> (u16, u16) {
        (
            (self.table_width + 3) as u16,
            (self.table_height + 3) as u16,
        )
    }
}
