use std::collections::VecDeque;

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::GameConfig,
    event::Event,
    game_state::{Game, Side},
    simulation,
};

/// the unit of work the dispatcher consumes. physics steps travel through the same queue as
/// input so the game only ever has one writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Apply(Event),
    Tick,
}

impl From<Event> for Command {
    fn from(event: Event) -> Self {
        Command::Apply(event)
    }
}

/// the events a single command ended up applying, in application order. returned only once
/// every follow-up event has been applied, so the game is settled when the caller sees it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Settled {
    pub applied: Vec<Event>,
}

impl Settled {
    pub fn winner(&self) -> Option<Side> {
        self.applied.iter().find_map(|event| match event {
            Event::LeftPlayerWon => Some(Side::Left),
            Event::RightPlayerWon => Some(Side::Right),
            _ => None,
        })
    }
}

/// sole owner of the authoritative game.
pub struct Dispatcher<R = StdRng> {
    game: Game,
    config: GameConfig,
    rng: R,
    pending: VecDeque<Event>,
}

impl Dispatcher<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Dispatcher<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self::from_game(Game::new(&config), config, rng)
    }

    pub fn from_game(game: Game, config: GameConfig, rng: R) -> Self {
        Self {
            game,
            config,
            rng,
            pending: VecDeque::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn execute(&mut self, command: Command) -> Settled {
        match command {
            Command::Apply(event) => self.pending.push_back(event),
            Command::Tick => {
                let raised = simulation::tick(&mut self.game);
                self.pending.extend(raised);
            }
        }
        let mut settled = Settled::default();
        while let Some(event) = self.pending.pop_front() {
            self.apply(event);
            settled.applied.push(event);
        }
        settled
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::LeftBatUp => self.set_bat_speed(Side::Left, -self.config.bat_speed),
            Event::LeftBatDown => self.set_bat_speed(Side::Left, self.config.bat_speed),
            Event::RightBatUp => self.set_bat_speed(Side::Right, -self.config.bat_speed),
            Event::RightBatDown => self.set_bat_speed(Side::Right, self.config.bat_speed),
            Event::LeftPlayerScores => self.score(Side::Left),
            Event::RightPlayerScores => self.score(Side::Right),
            // the scores were reset by the handler that raised it.
            Event::LeftPlayerWon | Event::RightPlayerWon => {}
            Event::BallStrikesBat => {
                simulation::speed_up_ball(&mut self.game.table.ball, &self.config, &mut self.rng)
            }
        }
    }

    fn set_bat_speed(&mut self, side: Side, speed: i32) {
        self.game.table.bat_mut(side).y_speed = speed;
    }

    fn score(&mut self, side: Side) {
        let player = self.game.player_mut(side);
        player.score += 1;
        let score = player.score;
        debug!("{} scores, now on {score}", player.name);
        simulation::reset_ball_position(&mut self.game.table, &self.config, &mut self.rng);
        if score >= self.config.win_score {
            self.game.left_player.score = 0;
            self.game.right_player.score = 0;
            self.pending.push_back(Event::won(side));
        }
    }
}
