//! Terminal session and the single-queue event loop.
//!
//! Two self-rescheduling timer tasks and one input thread feed a single
//! channel; the loop applies each event in arrival order and redraws.

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyEventKind},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{
        self, BeginSynchronizedUpdate, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use sim_core::SimConfig;
use sim_runtime::{App, AppState, Control, Event};
use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{keymap, view};

/// Raw mode plus alternate screen; restored on drop.
struct Session;

impl Session {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )
        .context("entering alternate screen")?;
        Ok(Session)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            EnableLineWrap,
            cursor::Show,
            LeaveAlternateScreen,
            ResetColor
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Map a terminal event onto the simulation's event type.
pub fn translate(ev: TermEvent) -> Event {
    match ev {
        TermEvent::Key(k) if k.kind == KeyEventKind::Press => Event::Key(keymap::action_for(k.code)),
        TermEvent::Resize(width, height) => Event::Resize { width, height },
        _ => Event::Other,
    }
}

fn spawn_ticker(tx: mpsc::Sender<Event>, every: Duration, event: Event) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(every).await;
            if tx.send(event.clone()).await.is_err() {
                break;
            }
        }
    });
}

fn spawn_input(tx: mpsc::Sender<Event>) {
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.blocking_send(translate(ev)).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!(%err, "terminal input closed");
                break;
            }
        }
    });
}

fn draw(out: &mut impl Write, state: &AppState, cfg: &SimConfig) -> io::Result<()> {
    let blink = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() % 2 == 0)
        .unwrap_or(false);
    let frame = view::frame(state, cfg, blink);
    queue!(out, BeginSynchronizedUpdate)?;
    for (row, line) in frame.split('\n').enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(
            out,
            cursor::MoveTo(0, row),
            Print(line),
            terminal::Clear(ClearType::UntilNewLine)
        )?;
    }
    queue!(out, EndSynchronizedUpdate)?;
    out.flush()
}

/// Run the interactive game until the player quits.
pub async fn run(app: &App) -> Result<()> {
    let session = Session::enter()?;
    let cadence = app.config().cadence.clone();

    let (tx, mut rx) = mpsc::channel(64);
    spawn_ticker(tx.clone(), cadence.sim_tick(), Event::SimTick);
    spawn_ticker(tx.clone(), cadence.frame_tick(), Event::FrameTick);
    spawn_input(tx);

    let (width, height) = terminal::size().context("querying terminal size")?;
    let mut state = app
        .update(&app.initial_state(), &Event::Resize { width, height })
        .0;
    let mut out = io::stdout();
    draw(&mut out, &state, app.config())?;

    while let Some(event) = rx.recv().await {
        let (next, control) = app.update(&state, &event);
        if state.scene != next.scene {
            info!(from = ?state.scene, to = ?next.scene, "scene changed");
        }
        state = next;
        if control == Control::Quit {
            break;
        }
        draw(&mut out, &state, app.config()).context("drawing frame")?;
    }
    drop(session);
    info!(scene = ?state.scene, cash = state.ledger.cash, "session closed");
    Ok(())
}
