use rand::Rng;

use crate::{
    config::GameConfig,
    event::Event,
    game_state::{Ball, Bat, Game, Side, Table},
};

/// advances the game by one step and returns the events the step raised, in the order they
/// were raised. the caller is responsible for applying them.
///
/// the horizontal axis is resolved before the vertical one, so a ball arriving in a corner
/// bounces off the bat first and the table edge second within the same tick.
pub fn tick(game: &mut Game) -> Vec<Event> {
    let mut raised = Vec::new();
    let table = &mut game.table;
    if let Some(event) = move_ball_x(table) {
        raised.push(event);
    }
    move_ball_y(&mut table.ball, table.height);
    move_bat(&mut table.left_bat, table.height);
    move_bat(&mut table.right_bat, table.height);
    raised
}

fn move_ball_x(table: &mut Table) -> Option<Event> {
    let width = table.width;
    let ball = &mut table.ball;
    ball.x += ball.x_speed;
    let facing = if ball.x < 0 {
        Side::Left
    } else if ball.x > width {
        Side::Right
    } else {
        return None;
    };
    // half-step look-ahead: where the ball sits vertically midway through this tick.
    let impact_y = ball.y + ball.y_speed / 2;
    let bat = match facing {
        Side::Left => &table.left_bat,
        Side::Right => &table.right_bat,
    };
    if !bat.touches(impact_y) {
        // the score handler puts the ball back on the table.
        return Some(Event::scores(facing.opponent()));
    }
    // the bat fills the edge column, so the ball rebounds off its outer face.
    ball.x = match facing {
        Side::Left => -ball.x - 1,
        Side::Right => 2 * width + 1 - ball.x,
    };
    ball.x_speed = -ball.x_speed;
    Some(Event::BallStrikesBat)
}

fn move_ball_y(ball: &mut Ball, height: i32) {
    ball.y += ball.y_speed;
    if ball.y > height {
        ball.y = height - (ball.y - height);
        ball.y_speed = -ball.y_speed;
    }
    if ball.y < 0 {
        ball.y = -ball.y;
        ball.y_speed = -ball.y_speed;
    }
}

/// a bat's speed is an impulse: it moves once and stops.
fn move_bat(bat: &mut Bat, height: i32) {
    bat.y += bat.y_speed;
    bat.y_speed = 0;
    let lowest = height - bat.length;
    if bat.y > lowest || bat.y < 0 {
        bat.y = bat.y.clamp(0, lowest);
        bat.y_speed = 0;
    }
}

/// serves a new ball from the middle of the table, away from the direction it was last going.
pub fn reset_ball_position<R: Rng>(table: &mut Table, config: &GameConfig, rng: &mut R) {
    let ball = &mut table.ball;
    ball.x = table.width / 2;
    ball.y = table.height / 2;
    ball.x_speed = if ball.x_speed < 0 {
        config.ball_base_speed
    } else {
        -config.ball_base_speed
    };
    ball.y_speed = if rng.gen_bool(0.5) {
        config.ball_base_speed
    } else {
        -config.ball_base_speed
    };
}

/// each axis independently gains one unit of speed with a small probability, never beyond the
/// configured cap. a stationary axis stays stationary.
pub fn speed_up_ball<R: Rng>(ball: &mut Ball, config: &GameConfig, rng: &mut R) {
    for speed in [&mut ball.x_speed, &mut ball.y_speed] {
        if rng.gen_bool(config.speed_up_chance) {
            *speed = speed_up(*speed, config.ball_max_speed);
        }
    }
}

fn speed_up(speed: i32, max_speed: i32) -> i32 {
    if speed == 0 || speed.abs() >= max_speed {
        return speed.clamp(-max_speed, max_speed);
    }
    speed + speed.signum()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        config::GameConfig,
        event::Event,
        game_state::Game,
        simulation::{reset_ball_position, speed_up, speed_up_ball, tick},
    };

    fn game() -> Game {
        Game::new(&GameConfig::default())
    }

    #[test]
    fn ball_moves_by_its_speed() {
        let mut game = game();
        let before = game.table.ball.clone();

        let raised = tick(&mut game);

        let ball = &game.table.ball;
        assert_eq!(ball.x, before.x + before.x_speed);
        assert_eq!(ball.y, before.y + before.y_speed);
        assert!(raised.is_empty());
    }

    #[test]
    fn ball_at_rest_is_unchanged() {
        let mut game = game();
        game.table.ball.x_speed = 0;
        game.table.ball.y_speed = 0;
        let before = game.clone();

        assert!(tick(&mut game).is_empty());
        assert_eq!(game, before);
    }

    #[test]
    fn left_bat_returns_ball_in_corner() {
        let mut game = game();
        game.table.left_bat.y = 0;
        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (0, 0, -1, -1);

        let raised = tick(&mut game);

        let ball = &game.table.ball;
        assert_eq!((ball.x, ball.y), (0, 1));
        assert_eq!((ball.x_speed, ball.y_speed), (1, 1));
        assert_eq!(raised, vec![Event::BallStrikesBat]);
    }

    #[test]
    fn right_bat_returns_ball() {
        let mut game = game();
        game.table.right_bat.y = 10;
        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (99, 12, 3, 2);

        let raised = tick(&mut game);

        let ball = &game.table.ball;
        assert_eq!((ball.x, ball.y), (99, 14));
        assert_eq!((ball.x_speed, ball.y_speed), (-3, 2));
        assert_eq!(raised, vec![Event::BallStrikesBat]);
    }

    #[test]
    fn missed_ball_scores_for_opponent() {
        let mut game = game();
        game.table.left_bat.y = 20;
        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (-1, 0, -1, 1);

        assert_eq!(tick(&mut game), vec![Event::RightPlayerScores]);
        // horizontal position is left for the score handler.
        assert_eq!(game.table.ball.x, -2);
        assert_eq!(game.table.ball.x_speed, -1);

        let mut game = self::game();
        game.table.right_bat.y = 0;
        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (100, 30, 1, -1);
        assert_eq!(tick(&mut game), vec![Event::LeftPlayerScores]);
    }

    #[test]
    fn impact_uses_half_step_look_ahead() {
        let mut game = game();
        game.table.left_bat.y = 10;
        let ball = &mut game.table.ball;
        // the ball itself is above the bat, but half a step later it reaches its top cell.
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (0, 9, -1, 3);
        assert_eq!(tick(&mut game), vec![Event::BallStrikesBat]);

        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (0, 9, -1, 1);
        assert_eq!(tick(&mut game), vec![Event::RightPlayerScores]);
    }

    #[test]
    fn ball_bounces_off_table_edges() {
        let mut game = game();
        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (50, 39, 1, 3);
        assert!(tick(&mut game).is_empty());
        let ball = &game.table.ball;
        assert_eq!((ball.y, ball.y_speed), (38, -3));

        let ball = &mut game.table.ball;
        (ball.y, ball.y_speed) = (1, -2);
        tick(&mut game);
        let ball = &game.table.ball;
        assert_eq!((ball.y, ball.y_speed), (1, 2));
    }

    #[test]
    fn bat_speed_is_an_impulse() {
        let mut game = game();
        let initial = game.table.left_bat.y;
        game.table.left_bat.y_speed = 1;
        game.table.right_bat.y_speed = -1;

        tick(&mut game);
        assert_eq!(game.table.left_bat.y, initial + 1);
        assert_eq!(game.table.right_bat.y, initial - 1);
        assert_eq!(game.table.left_bat.y_speed, 0);

        tick(&mut game);
        assert_eq!(game.table.left_bat.y, initial + 1);
    }

    #[test]
    fn bats_are_clamped_to_table() {
        let mut game = game();
        game.table.left_bat.y = 0;
        game.table.left_bat.y_speed = -1;
        game.table.right_bat.y = 33;
        game.table.right_bat.y_speed = 1;

        tick(&mut game);

        assert_eq!(game.table.left_bat.y, 0);
        assert_eq!(game.table.right_bat.y, 33);
        assert_eq!(game.table.right_bat.y_speed, 0);
    }

    #[test]
    fn reset_serves_from_centre_in_reverse() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = game();
        let ball = &mut game.table.ball;
        (ball.x, ball.y, ball.x_speed, ball.y_speed) = (-2, 5, -3, 2);

        reset_ball_position(&mut game.table, &config, &mut rng);
        let ball = &game.table.ball;
        assert_eq!((ball.x, ball.y), (50, 20));
        assert_eq!(ball.x_speed, 1);
        assert_eq!(ball.y_speed.abs(), 1);

        reset_ball_position(&mut game.table, &config, &mut rng);
        assert_eq!(game.table.ball.x_speed, -1);
    }

    #[test]
    fn reset_vertical_direction_uses_both_sides() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = game();
        let mut seen = [false; 2];
        for _ in 0..64 {
            reset_ball_position(&mut game.table, &config, &mut rng);
            seen[(game.table.ball.y_speed > 0) as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn speed_up_keeps_sign_and_cap() {
        assert_eq!(speed_up(1, 3), 2);
        assert_eq!(speed_up(-2, 3), -3);
        assert_eq!(speed_up(3, 3), 3);
        assert_eq!(speed_up(-3, 3), -3);
        assert_eq!(speed_up(0, 3), 0);
    }

    #[test]
    fn speed_up_ball_is_certain_at_full_chance() {
        let config = GameConfig {
            speed_up_chance: 1.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = game();
        let ball = &mut game.table.ball;
        (ball.x_speed, ball.y_speed) = (-1, 2);

        speed_up_ball(ball, &config, &mut rng);
        assert_eq!((ball.x_speed, ball.y_speed), (-2, 3));
        speed_up_ball(ball, &config, &mut rng);
        assert_eq!((ball.x_speed, ball.y_speed), (-3, 3));

        let config = GameConfig {
            speed_up_chance: 0.0,
            ..Default::default()
        };
        ball.x_speed = 1;
        speed_up_ball(ball, &config, &mut rng);
        assert_eq!(ball.x_speed, 1);
    }
}
