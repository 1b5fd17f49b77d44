//! Cascade engine - the session object
//!
//! [`CascadeEngine`] owns the board, the blocker tracker, the colour source and
//! the session counters. A move runs to completion inside one call:
//!
//! 1. validate and resolve the swap ([`crate::swap`])
//! 2. consume one move
//! 3. drain the effect queue: destroy tiles, damage neighbouring blockers,
//!    trigger specials (which enqueue further effects)
//! 4. place the round's special spawns
//! 5. collapse every column and refill from the top
//! 6. rescan; any new runs start the next round
//! 7. once settled, check the move budget
//!
//! Because every mutating method takes `&mut self`, no second swap can be
//! requested while a cascade is in progress.
//!
//! # Effects
//!
//! | Effect       | Destroys                                   | Blocker damage |
//! |--------------|--------------------------------------------|----------------|
//! | `Destroy`    | one matched or colour-cleared cell         | neighbours     |
//! | `LineClear`  | a whole row or column                      | cells in line  |
//! | `ColorClear` | every `Colored` tile of one colour         | neighbours     |
//! | `Consume`    | a special used up by the swap, no trigger  | none           |
//!
//! Destroying a line tile enqueues its line clear. Destroying a wildcard
//! enqueues a colour clear for the first `Colored` neighbour found probing
//! +x, -x, +y, -y, or nothing when there is none.

use std::collections::VecDeque;

use tracing::{debug, info, instrument, trace, warn};

use crate::blockers::{BlockerHit, BlockerTracker};
use crate::board::Board;
use crate::config::SessionConfig;
use crate::error::EngineError;
use crate::events::{EventSink, NullSink};
use crate::matcher::{self, SpecialSpawn};
use crate::rng::TileGenerator;
use crate::snapshot::SessionSnapshot;
use crate::swap::{self, SwapPlan};
use crate::types::{
    ColorId, GameEvent, LineOrientation, Pos, ResolutionPath, SessionOutcome, SwapRejection, Tile,
    INITIAL_PLACEMENT_RETRIES,
};

/// Rounds after which a cascade is considered runaway and the session aborts
pub const MAX_CASCADE_ROUNDS: u32 = 1_000;

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub moves_remaining: u32,
    pub moves_made: u32,
    pub blockers_remaining: u32,
    pub outcome: SessionOutcome,
    /// Set when an internal check failed
    pub aborted: bool,
}

/// Totals for one settled cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub rounds: u32,
    /// Non-blocker tiles removed, including consumed specials
    pub tiles_destroyed: u32,
    pub blockers_destroyed: u32,
    pub specials_spawned: u32,
    pub tiles_refilled: u32,
}

/// Result of a swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Nothing changed
    Rejected(SwapRejection),
    Resolved {
        path: ResolutionPath,
        report: CascadeReport,
    },
}

impl SwapOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SwapOutcome::Resolved { .. })
    }

    pub fn rejection(&self) -> Option<SwapRejection> {
        match self {
            SwapOutcome::Rejected(r) => Some(*r),
            SwapOutcome::Resolved { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Destroy { pos: Pos, adjacency: bool },
    LineClear { through: Pos, orientation: LineOrientation },
    ColorClear { color: ColorId },
    Consume { pos: Pos },
}

fn plan_effects(plan: SwapPlan) -> (VecDeque<Effect>, Vec<SpecialSpawn>) {
    match plan {
        SwapPlan::Line {
            target,
            orientations,
            consumed,
        } => {
            let effects = consumed
                .into_iter()
                .map(|pos| Effect::Consume { pos })
                .chain(orientations.into_iter().map(|orientation| Effect::LineClear {
                    through: target,
                    orientation,
                }))
                .collect();
            (effects, Vec::new())
        }
        SwapPlan::Wildcard { wildcards, color } => {
            let effects = color
                .map(|color| Effect::ColorClear { color })
                .into_iter()
                .chain(wildcards.into_iter().map(|pos| Effect::Consume { pos }))
                .collect();
            (effects, Vec::new())
        }
        SwapPlan::Match(result) => {
            let (cells, spawns) = result.into_parts();
            (destroy_all(cells), spawns)
        }
    }
}

fn destroy_all(cells: Vec<Pos>) -> VecDeque<Effect> {
    cells
        .into_iter()
        .map(|pos| Effect::Destroy {
            pos,
            adjacency: true,
        })
        .collect()
}

/// One play session
#[derive(Debug, Clone)]
pub struct CascadeEngine<S: EventSink = Vec<GameEvent>> {
    board: Board,
    blockers: BlockerTracker,
    tiles: TileGenerator,
    state: SessionState,
    seed: u32,
    sink: S,
}

impl CascadeEngine<Vec<GameEvent>> {
    /// New session collecting events into a `Vec`
    pub fn new(config: SessionConfig) -> Result<Self, EngineError> {
        Self::with_sink(config, Vec::new())
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.sink)
    }
}

impl<S: EventSink> CascadeEngine<S> {
    /// Populate a fresh board from `config` and settle any accidental runs.
    ///
    /// Blockers fill the bottom `blocker_rows` rows; every other cell gets a
    /// colour that avoids completing a run with its left and lower neighbours
    /// when the generator can find one.
    pub fn with_sink(config: SessionConfig, sink: S) -> Result<Self, EngineError> {
        config.validate()?;

        let mut engine = Self {
            board: Board::new(config.width, config.height),
            blockers: BlockerTracker::new(),
            tiles: TileGenerator::seeded(config.seed, config.palette_size),
            state: SessionState {
                moves_remaining: config.move_budget,
                ..SessionState::default()
            },
            seed: config.seed,
            sink,
        };
        engine.populate(config.blocker_rows);

        let report = engine.stabilize()?;
        debug!(
            seed = config.seed,
            blockers = engine.state.blockers_remaining,
            settle_rounds = report.rounds,
            "session populated"
        );
        Ok(engine)
    }

    /// Start a session from a prepared board.
    ///
    /// The board is used as-is; call [`stabilize`](Self::stabilize) to clear
    /// runs it already contains. It must hold at least one blocker.
    pub fn from_board(
        board: Board,
        move_budget: u32,
        tiles: TileGenerator,
        sink: S,
    ) -> Result<Self, EngineError> {
        if move_budget == 0 {
            return Err(EngineError::InvalidConfig("move budget must be positive"));
        }
        if board.count_empty() > 0 {
            return Err(EngineError::InvalidLayout(
                "board must not contain empty cells".to_string(),
            ));
        }

        let blockers = BlockerTracker::from_board(&board);
        if blockers.remaining() == 0 {
            return Err(EngineError::InvalidLayout(
                "board must contain at least one blocker".to_string(),
            ));
        }
        Ok(Self {
            state: SessionState {
                moves_remaining: move_budget,
                blockers_remaining: blockers.remaining(),
                ..SessionState::default()
            },
            board,
            blockers,
            tiles,
            seed: 0,
            sink,
        })
    }

    fn populate(&mut self, blocker_rows: u8) {
        for pos in self.board.positions().collect::<Vec<_>>() {
            let tile = if pos.y < blocker_rows {
                self.blockers.register();
                Tile::Blocker
            } else {
                let color =
                    self.tiles
                        .next_non_matching(&self.board, pos, INITIAL_PLACEMENT_RETRIES);
                Tile::Colored(color)
            };
            self.board.set(pos, tile);
            self.sink.emit(GameEvent::TileSpawned { pos, tile });
        }
        self.state.blockers_remaining = self.blockers.remaining();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.state.outcome
    }

    pub fn moves_remaining(&self) -> u32 {
        self.state.moves_remaining
    }

    pub fn blockers_remaining(&self) -> u32 {
        self.state.blockers_remaining
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Copy of this session, colour source included, that discards events.
    ///
    /// A swap on the fork resolves exactly as it would on this session.
    pub fn fork(&self) -> CascadeEngine<NullSink> {
        CascadeEngine {
            board: self.board.clone(),
            blockers: self.blockers.clone(),
            tiles: self.tiles.clone(),
            state: self.state,
            seed: self.seed,
            sink: NullSink,
        }
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.copy_board(&self.board);
        out.moves_remaining = self.state.moves_remaining;
        out.moves_made = self.state.moves_made;
        out.blockers_remaining = self.state.blockers_remaining;
        out.outcome = self.state.outcome;
        out.seed = self.seed;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut out = SessionSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Swap the tiles at `(x1, y1)` and `(x2, y2)` and resolve the move.
    ///
    /// Coordinates outside the board are an error and change nothing. A
    /// refused swap is `Ok(SwapOutcome::Rejected(..))`. An `Err` from an
    /// accepted swap means the session was aborted.
    pub fn request_swap(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
    ) -> Result<SwapOutcome, EngineError> {
        let a = self.board.checked_pos(x1, y1)?;
        let b = self.board.checked_pos(x2, y2)?;
        self.swap(a, b)
    }

    /// [`request_swap`](Self::request_swap) with board positions
    #[instrument(level = "debug", skip(self))]
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<SwapOutcome, EngineError> {
        for p in [a, b] {
            if !self.board.contains(p) {
                return Err(EngineError::InvalidCoordinate {
                    x: p.x as i16,
                    y: p.y as i16,
                });
            }
        }

        if self.state.outcome.is_terminal() {
            return Ok(self.reject(a, b, SwapRejection::NotPlaying));
        }
        if self.state.moves_remaining == 0 {
            return Ok(self.reject(a, b, SwapRejection::NoMovesLeft));
        }

        let plan = match swap::attempt_swap(&mut self.board, a, b) {
            Ok(plan) => plan,
            Err(reason) => return Ok(self.reject(a, b, reason)),
        };
        let path = plan.path();
        debug!(path = path.as_str(), "swap accepted");

        self.sink.emit(GameEvent::TileMoved {
            from: a,
            to: b,
            tile: self.board.get(b),
        });
        self.sink.emit(GameEvent::TileMoved {
            from: b,
            to: a,
            tile: self.board.get(a),
        });

        self.state.moves_remaining -= 1;
        self.state.moves_made += 1;
        self.sink.emit(GameEvent::MoveConsumed {
            moves_remaining: self.state.moves_remaining,
        });

        let (effects, spawns) = plan_effects(plan);
        let report = self.run_cascade(effects, spawns)?;

        if self.state.outcome == SessionOutcome::Playing && self.state.moves_remaining == 0 {
            self.finish(SessionOutcome::Failed);
        }

        Ok(SwapOutcome::Resolved { path, report })
    }

    /// Clear runs already on the board without consuming a move
    pub fn stabilize(&mut self) -> Result<CascadeReport, EngineError> {
        let found = matcher::scan(&self.board);
        if found.is_empty() {
            return Ok(CascadeReport::default());
        }
        let (cells, spawns) = found.into_parts();
        self.run_cascade(destroy_all(cells), spawns)
    }

    fn reject(&mut self, a: Pos, b: Pos, reason: SwapRejection) -> SwapOutcome {
        debug!(from = %a, to = %b, reason = reason.code(), "swap rejected");
        self.sink.emit(GameEvent::SwapRejected {
            from: a,
            to: b,
            reason,
        });
        SwapOutcome::Rejected(reason)
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        self.state.outcome = outcome;
        info!(
            outcome = outcome.as_str(),
            moves_made = self.state.moves_made,
            blockers_remaining = self.state.blockers_remaining,
            "session ended"
        );
        self.sink.emit(GameEvent::SessionEnded { outcome });
    }

    fn run_cascade(
        &mut self,
        effects: VecDeque<Effect>,
        spawns: Vec<SpecialSpawn>,
    ) -> Result<CascadeReport, EngineError> {
        match self.resolve(effects, spawns) {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!(error = %err, "aborting session");
                self.state.aborted = true;
                if self.state.outcome == SessionOutcome::Playing {
                    self.finish(SessionOutcome::Failed);
                }
                Err(err)
            }
        }
    }

    fn resolve(
        &mut self,
        mut effects: VecDeque<Effect>,
        mut spawns: Vec<SpecialSpawn>,
    ) -> Result<CascadeReport, EngineError> {
        let mut report = CascadeReport::default();

        loop {
            if report.rounds == MAX_CASCADE_ROUNDS {
                return Err(EngineError::Invariant("cascade did not settle"));
            }
            report.rounds += 1;
            debug!(
                round = report.rounds,
                effects = effects.len(),
                spawns = spawns.len(),
                "cascade round"
            );

            while let Some(effect) = effects.pop_front() {
                trace!(?effect, "apply effect");
                self.apply(effect, &mut effects, &mut report)?;
            }

            self.place_spawns(&spawns, &mut report);
            self.collapse_and_refill(&mut report)?;

            let next = matcher::scan(&self.board);
            if next.is_empty() {
                break;
            }
            let (cells, next_spawns) = next.into_parts();
            effects = destroy_all(cells);
            spawns = next_spawns;
        }

        self.sink.emit(GameEvent::CascadeSettled {
            rounds: report.rounds,
        });
        debug!(?report, "cascade settled");
        Ok(report)
    }

    fn apply(
        &mut self,
        effect: Effect,
        queue: &mut VecDeque<Effect>,
        report: &mut CascadeReport,
    ) -> Result<(), EngineError> {
        match effect {
            Effect::Destroy { pos, adjacency } => self.destroy(pos, adjacency, queue, report),
            Effect::LineClear {
                through,
                orientation,
            } => {
                let line = match orientation {
                    LineOrientation::Row => self.board.row(through.y),
                    LineOrientation::Column => self.board.column(through.x),
                };
                for pos in line {
                    self.destroy(pos, false, queue, report)?;
                }
                Ok(())
            }
            Effect::ColorClear { color } => {
                let targets: Vec<Pos> = self
                    .board
                    .positions()
                    .filter(|p| self.board.get(*p) == Tile::Colored(color))
                    .collect();
                for pos in targets {
                    self.destroy(pos, true, queue, report)?;
                }
                Ok(())
            }
            Effect::Consume { pos } => {
                let tile = self.board.take(pos);
                if !tile.is_empty() {
                    self.sink.emit(GameEvent::TileDestroyed { pos, tile });
                    report.tiles_destroyed += 1;
                }
                Ok(())
            }
        }
    }

    fn destroy(
        &mut self,
        pos: Pos,
        adjacency: bool,
        queue: &mut VecDeque<Effect>,
        report: &mut CascadeReport,
    ) -> Result<(), EngineError> {
        let tile = self.board.get(pos);
        match tile {
            Tile::Empty => return Ok(()),
            Tile::Blocker => return self.hit_blocker(pos, report),
            _ => {}
        }

        self.board.set(pos, Tile::Empty);
        self.sink.emit(GameEvent::TileDestroyed { pos, tile });
        report.tiles_destroyed += 1;

        if let Some(orientation) = tile.line_orientation() {
            queue.push_back(Effect::LineClear {
                through: pos,
                orientation,
            });
        } else if tile == Tile::Wildcard {
            if let Some(color) = self.nearby_color(pos) {
                queue.push_back(Effect::ColorClear { color });
            }
        }

        if adjacency {
            for n in self.board.neighbors(pos) {
                self.hit_blocker(n, report)?;
            }
        }
        Ok(())
    }

    fn nearby_color(&self, pos: Pos) -> Option<ColorId> {
        self.board
            .neighbors(pos)
            .into_iter()
            .find_map(|n| self.board.get(n).color())
    }

    fn hit_blocker(&mut self, pos: Pos, report: &mut CascadeReport) -> Result<(), EngineError> {
        let hit = self.blockers.destroy(&mut self.board, pos)?;
        if !hit.destroyed() {
            return Ok(());
        }

        self.sink.emit(GameEvent::TileDestroyed {
            pos,
            tile: Tile::Blocker,
        });
        report.blockers_destroyed += 1;
        self.state.blockers_remaining = self.blockers.remaining();

        if hit == BlockerHit::Cleared && self.state.outcome == SessionOutcome::Playing {
            self.finish(SessionOutcome::Cleared);
        }
        Ok(())
    }

    fn place_spawns(&mut self, spawns: &[SpecialSpawn], report: &mut CascadeReport) {
        for (i, spawn) in spawns.iter().enumerate() {
            // a later spawn on the same cell replaces this one
            if spawns[i + 1..].iter().any(|later| later.pos == spawn.pos) {
                continue;
            }
            let tile = spawn.kind.tile();
            self.board.set(spawn.pos, tile);
            self.sink.emit(GameEvent::TileSpawned {
                pos: spawn.pos,
                tile,
            });
            report.specials_spawned += 1;
        }
    }

    fn collapse_and_refill(&mut self, report: &mut CascadeReport) -> Result<(), EngineError> {
        for x in 0..self.board.width() {
            for fall in self.board.collapse_column(x) {
                self.sink.emit(GameEvent::TileMoved {
                    from: fall.from,
                    to: fall.to,
                    tile: fall.tile,
                });
            }
            for pos in self.board.column(x) {
                if self.board.get(pos).is_empty() {
                    let tile = Tile::Colored(self.tiles.next_color());
                    self.board.set(pos, tile);
                    self.sink.emit(GameEvent::TileSpawned { pos, tile });
                    report.tiles_refilled += 1;
                }
            }
        }

        if self.board.count_empty() > 0 {
            return Err(EngineError::Invariant("empty cell survived refill"));
        }
        Ok(())
    }
}
