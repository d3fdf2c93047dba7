use std::{
    fs::File,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, sync_channel, Sender},
        Arc,
    },
    thread::Builder,
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use client::ClientSession;
use env_logger::{Env, Target};
use log::{error, info};
use server::{tcp_server, ServerSession};
use shared::{
    config::{GameConfig, COMMAND_QUEUE_CAPACITY, DEFAULT_IP, DEFAULT_PORT},
    game_state::Side,
    session::{Quit, SessionError},
};
use terminal::Screen;

mod input;
mod terminal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Server,
    Client,
}

/// Two player ping-pong in the terminal, played over TCP.
#[derive(Debug, Parser)]
#[command(name = "ping-pong")]
struct Cli {
    /// Host a match and play the left bat, or join one and play the right bat.
    #[arg(long, value_enum, default_value_t = Mode::Server)]
    mode: Mode,
    /// Port the server listens on and the client connects to.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// IP address or host name of the server (client mode only).
    #[arg(long, default_value = DEFAULT_IP)]
    ip: String,
    /// Frames per second: game ticks on the server, redraws on the client.
    #[arg(long, default_value_t = GameConfig::default().fps)]
    fps: u32,
    /// Score that wins a game (server mode only).
    #[arg(long, default_value_t = GameConfig::default().win_score)]
    win_score: u32,
    /// Write logs to this file. Logging is off otherwise, since the game owns the terminal.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            fps: self.fps,
            win_score: self.win_score,
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = cli.game_config();

    // the screen is restored when it goes out of scope, before anything is reported.
    let quit = {
        let screen = Screen::enter().context("failed to prepare the terminal")?;
        screen.check_size(config.required_screen_size())?;
        play(&cli, config, &screen)?
    };

    report(quit)
}

/// a hang-up by the other side reads differently from a broken match, but both are failures.
fn report(quit: Quit) -> anyhow::Result<()> {
    match quit {
        Quit::Requested => Ok(()),
        Quit::Failed(SessionError::PeerClosed) => {
            info!("opponent left the match");
            bail!("opponent left the match")
        }
        Quit::Failed(err) => {
            error!("match ended: {err}");
            Err(err).context("match ended")
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let mut builder = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(Env::default().default_filter_or("off")),
    };
    builder.init();
    Ok(())
}

/// runs one match and blocks until it is over.
fn play(cli: &Cli, config: GameConfig, screen: &Screen) -> anyhow::Result<Quit> {
    let running = Arc::new(AtomicBool::new(true));
    let (quit_tx, quit_rx) = channel();
    let (frames_tx, frames_rx) = sync_channel(1);
    terminal::spawn_renderer(frames_rx, Arc::clone(&running))?;

    match cli.mode {
        Mode::Server => {
            let listener = tcp_server::bind(cli.port)?;
            screen.status(&format!(
                "waiting for a client on port {}, press esc to quit",
                cli.port
            ))?;
            let (commands_tx, commands_rx) = sync_channel(COMMAND_QUEUE_CAPACITY);
            input::spawn_key_listener(Side::Left, commands_tx.clone(), quit_tx.clone())?;
            let session = ServerSession {
                config,
                commands: (commands_tx, commands_rx),
                frames: frames_tx,
                quit: quit_tx.clone(),
                running: Arc::clone(&running),
            };
            spawn_session("server_session", quit_tx, move || session.run(listener))?;
        }
        Mode::Client => {
            screen.status(&format!("connecting to {}:{}", cli.ip, cli.port))?;
            let (events_tx, events_rx) = sync_channel(COMMAND_QUEUE_CAPACITY);
            input::spawn_key_listener(Side::Right, events_tx, quit_tx.clone())?;
            let session = ClientSession {
                config,
                events: events_rx,
                frames: frames_tx,
                quit: quit_tx.clone(),
                running: Arc::clone(&running),
            };
            let server_addr = (cli.ip.clone(), cli.port);
            spawn_session("client_session", quit_tx, move || session.run(server_addr))?;
        }
    }

    // every sender lives on a thread that outlives this call, so the channel cannot close first.
    let quit = quit_rx.recv().unwrap_or(Quit::Requested);
    running.store(false, Ordering::SeqCst);
    Ok(quit)
}

fn spawn_session<F>(name: &str, quit: Sender<Quit>, session: F) -> std::io::Result<()>
where
    F: FnOnce() -> Result<(), SessionError> + Send + 'static,
{
    Builder::new().name(name.to_owned()).spawn(move || {
        if let Err(err) = session() {
            let _ = quit.send(err.into());
        }
    })?;
    Ok(())
}
