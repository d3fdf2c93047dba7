use std::{
    io::{self, stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
        Arc,
    },
    thread::{Builder, JoinHandle},
};

use anyhow::bail;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::warn;
use shared::game_state::{Bat, Game};

const BALL: char = '*';
const BAT: char = '#';
const BORDER: char = '.';

/// owns the terminal for the lifetime of a match. dropping it hands the terminal back.
pub struct Screen;

impl Screen {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let screen = Screen;
        execute!(stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(screen)
    }

    /// fails when the terminal cannot fit the table plus its border and score rows.
    pub fn check_size(&self, required: (u16, u16)) -> anyhow::Result<()> {
        check_size(size()?, required)
    }

    pub fn status(&self, text: &str) -> io::Result<()> {
        let mut stdout = stdout().lock();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0), Print(text))
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        // the renderer never draws once it has seen the stop flag under this lock.
        let mut stdout = stdout().lock();
        let _ = execute!(stdout, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

fn check_size(actual: (u16, u16), required: (u16, u16)) -> anyhow::Result<()> {
    let ((width, height), (min_width, min_height)) = (actual, required);
    if width < min_width || height < min_height {
        bail!(
            "screen size is not sufficient: {min_width}x{min_height} is required, \
             {width}x{height} is available"
        );
    }
    Ok(())
}

/// draws every frame it receives until `running` is cleared.
pub fn spawn_renderer(
    frames: Receiver<Game>,
    running: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    Builder::new().name("renderer".to_owned()).spawn(move || {
        for game in frames {
            let mut stdout = stdout().lock();
            if !running.load(Ordering::SeqCst) {
                return;
            }
            if let Err(err) = draw(&mut stdout, &game) {
                warn!("failed to draw frame: {err}");
            }
        }
    })
}

fn draw<W: Write>(w: &mut W, game: &Game) -> io::Result<()> {
    let table = &game.table;
    for row in 0..=table.height + 2 {
        queue!(w, MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
    }

    for row in 0..=table.height {
        queue!(w, MoveTo((table.width + 1) as u16, row as u16), Print(BORDER))?;
    }
    queue!(
        w,
        MoveTo(0, (table.height + 1) as u16),
        Print(BORDER.to_string().repeat((table.width + 2) as usize))
    )?;

    draw_bat(w, &table.left_bat)?;
    draw_bat(w, &table.right_bat)?;
    queue!(w, MoveTo(table.ball.x as u16, table.ball.y as u16), Print(BALL))?;

    let left = format!("{} {}", game.left_player.name, game.left_player.score);
    let right = format!("{} {}", game.right_player.score, game.right_player.name);
    let right_column = (table.width + 1 - right.len() as i32).max(0);
    queue!(
        w,
        MoveTo(0, (table.height + 2) as u16),
        Print(left),
        MoveTo(right_column as u16, (table.height + 2) as u16),
        Print(right)
    )?;
    w.flush()
}

fn draw_bat<W: Write>(w: &mut W, bat: &Bat) -> io::Result<()> {
    for y in bat.y..bat.y + bat.length {
        queue!(w, MoveTo(bat.x as u16, y as u16), Print(BAT))?;
    }
    Ok(())
}
