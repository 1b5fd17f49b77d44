//! Terminal puzzle runner (default binary).
//!
//! Move the cursor with arrows/hjkl/wasd, pick a tile up with space or Enter,
//! then press an arrow (or select a neighbour) to swap. Tab shows a hint,
//! `r` starts a new board, `q` quits.
//!
//! Logging goes to `CASCADE_LOG_FILE` when set, never to the terminal.

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tile_cascade::adapter::session_config_from_env;
use tile_cascade::core::{
    CascadeEngine, EventCounts, SessionConfig, SessionSnapshot, SwapOutcome,
};
use tile_cascade::engine::best_swap;
use tile_cascade::input::{handle_key_event, should_quit, CursorState, InputAction};
use tile_cascade::term::{FrameBuffer, GameView, Overlay, TerminalRenderer, Viewport};
use tile_cascade::types::Pos;

const POLL_MS: u64 = 250;

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("CASCADE_LOG_FILE") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("cannot open log file {}", path))?;
    let filter = EnvFilter::try_from_env("CASCADE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

struct Game {
    config: SessionConfig,
    engine: CascadeEngine<EventCounts>,
    cursor: CursorState,
    hint: Option<(Pos, Pos)>,
    status: String,
}

impl Game {
    fn new(config: SessionConfig) -> Result<Self> {
        let engine = CascadeEngine::with_sink(config, EventCounts::default())?;
        info!(seed = config.seed, "new board");
        Ok(Self {
            config,
            engine,
            cursor: CursorState::new(config.width, config.height),
            hint: None,
            status: String::new(),
        })
    }

    fn restart(&mut self) -> Result<()> {
        let seed = self.engine.seed().wrapping_add(1);
        *self = Self::new(self.config.with_seed(seed))?;
        Ok(())
    }

    fn show_hint(&mut self) {
        match best_swap(&self.engine) {
            Some(h) => {
                self.hint = Some((h.from, h.to));
                self.cursor.jump_to(h.from);
                self.status = format!("hint: {} tiles", h.report.tiles_destroyed);
            }
            None => self.status = "no moves".to_string(),
        }
    }

    fn apply(&mut self, action: InputAction) -> Result<()> {
        match action {
            InputAction::Restart => return self.restart(),
            InputAction::Hint => {
                self.show_hint();
                return Ok(());
            }
            _ => {}
        }

        let Some(req) = self.cursor.apply(action) else {
            return Ok(());
        };
        self.hint = None;

        let (x1, y1) = req.from;
        let (x2, y2) = req.to;
        self.status = match self.engine.request_swap(x1, y1, x2, y2) {
            Ok(SwapOutcome::Resolved { path, report }) => {
                format!("{}: {} tiles", path.as_str(), report.tiles_destroyed)
            }
            Ok(SwapOutcome::Rejected(reason)) => reason.code().replace('_', " "),
            Err(e) => e.code().replace('_', " "),
        };

        let counts = std::mem::take(self.engine.sink_mut());
        debug!(
            destroyed = counts.destroyed,
            spawned = counts.spawned,
            moved = counts.moved,
            "swap events"
        );
        Ok(())
    }

    fn overlay(&self) -> Overlay<'_> {
        Overlay {
            cursor: Some(self.cursor.cursor()),
            selected: self.cursor.selected(),
            hint: self.hint,
            status: Some(self.status.as_str()),
        }
    }
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut game = Game::new(session_config_from_env())?;

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.engine.snapshot_into(&mut snap);
        view.render_into(&snap, &game.overlay(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(Duration::from_millis(POLL_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    game.apply(action)?;
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
