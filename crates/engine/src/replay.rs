//! Scripted replay
//!
//! A replay script is plain text, one swap per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! seed 42        # optional, overrides the config seed
//! 3 4 3 5        # x1 y1 x2 y2
//! ```
//!
//! Running a script against a [`SessionConfig`] produces a [`Transcript`]
//! recording every outcome plus the final snapshot. With the same seed the
//! transcript is identical on every run.

use std::fmt::Write as _;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::{
    CascadeEngine, EngineError, EventSink, NullSink, SessionConfig, SessionSnapshot, SwapOutcome,
};
use crate::hint::best_swap;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("line {line}: expected `x1 y1 x2 y2`, got {text:?}")]
    BadSwap { line: usize, text: String },

    #[error("line {line}: bad seed {text:?}")]
    BadSeed { line: usize, text: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One scripted swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStep {
    /// 1-based script line
    pub line: usize,
    pub from: (i16, i16),
    pub to: (i16, i16),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    pub seed: Option<u32>,
    pub steps: Vec<ReplayStep>,
}

impl Replay {
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let mut replay = Replay::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            if let Some(rest) = content.strip_prefix("seed") {
                let seed = rest.trim().parse::<u32>().map_err(|_| ReplayError::BadSeed {
                    line,
                    text: content.to_string(),
                })?;
                replay.seed = Some(seed);
                continue;
            }

            let nums: Vec<i16> = content
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|_| ReplayError::BadSwap {
                    line,
                    text: content.to_string(),
                })?;
            let &[x1, y1, x2, y2] = nums.as_slice() else {
                return Err(ReplayError::BadSwap {
                    line,
                    text: content.to_string(),
                });
            };
            replay.steps.push(ReplayStep {
                line,
                from: (x1, y1),
                to: (x2, y2),
            });
        }

        Ok(replay)
    }

    /// Format as a script that parses back to the same replay
    pub fn to_script(&self) -> String {
        let mut out = String::new();
        if let Some(seed) = self.seed {
            let _ = writeln!(out, "seed {}", seed);
        }
        for step in &self.steps {
            let _ = writeln!(
                out,
                "{} {} {} {}",
                step.from.0, step.from.1, step.to.0, step.to.1
            );
        }
        out
    }

    /// Config to run with: the script's seed wins over `base.seed`
    pub fn config(&self, base: SessionConfig) -> SessionConfig {
        match self.seed {
            Some(seed) => base.with_seed(seed),
            None => base,
        }
    }

    /// Run every step against a fresh session.
    ///
    /// Rejections are recorded and play continues. An aborted session stops
    /// the run and is recorded as the last entry.
    pub fn run<S: EventSink>(
        &self,
        base: SessionConfig,
        sink: S,
    ) -> Result<Transcript, ReplayError> {
        let mut engine = CascadeEngine::with_sink(self.config(base), sink)?;
        let mut entries = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let result = engine.request_swap(step.from.0, step.from.1, step.to.0, step.to.1);
            let aborted = matches!(&result, Err(e) if e.is_fatal());
            debug!(line = step.line, ?result, "replay step");

            entries.push(TranscriptEntry {
                step: *step,
                result,
                moves_remaining: engine.moves_remaining(),
                blockers_remaining: engine.blockers_remaining(),
                board_hash: engine.board().board_hash(),
            });
            if aborted {
                break;
            }
        }

        let last = engine.snapshot();
        info!(
            steps = entries.len(),
            outcome = last.outcome.as_str(),
            "replay finished"
        );
        Ok(Transcript { entries, last })
    }
}

/// Let the hint search play up to `max_moves` swaps from `base`.
///
/// Returns the moves as a replay script (seed included) together with the
/// transcript of running that script.
pub fn autoplay(base: SessionConfig, max_moves: usize) -> Result<(Replay, Transcript), ReplayError> {
    let mut engine = CascadeEngine::with_sink(base, NullSink)?;
    let mut replay = Replay {
        seed: Some(base.seed),
        steps: Vec::new(),
    };

    for i in 0..max_moves {
        let Some(hint) = best_swap(&engine) else {
            break;
        };
        engine.swap(hint.from, hint.to)?;
        replay.steps.push(ReplayStep {
            // line 1 holds the seed in `to_script` output
            line: i + 2,
            from: (hint.from.x as i16, hint.from.y as i16),
            to: (hint.to.x as i16, hint.to.y as i16),
        });
    }

    let transcript = replay.run(base, NullSink)?;
    Ok((replay, transcript))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub step: ReplayStep,
    pub result: Result<SwapOutcome, EngineError>,
    pub moves_remaining: u32,
    pub blockers_remaining: u32,
    pub board_hash: u64,
}

impl TranscriptEntry {
    /// Single-line summary, e.g. `3 4 -> 3 5 match rounds=1 tiles=3 blockers=0 moves=29`
    pub fn summary(&self) -> String {
        let (x1, y1) = self.step.from;
        let (x2, y2) = self.step.to;
        let head = format!("{} {} -> {} {}", x1, y1, x2, y2);
        match &self.result {
            Ok(SwapOutcome::Resolved { path, report }) => format!(
                "{} {} rounds={} tiles={} blockers={} moves={}",
                head,
                path.as_str(),
                report.rounds,
                report.tiles_destroyed,
                report.blockers_destroyed,
                self.moves_remaining
            ),
            Ok(SwapOutcome::Rejected(reason)) => format!("{} rejected {}", head, reason.code()),
            Err(err) => format!("{} error {}", head, err.code()),
        }
    }
}

/// Outcome of a replay run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
    /// Session state after the last step
    pub last: SessionSnapshot,
}

impl Transcript {
    pub fn accepted(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.result, Ok(SwapOutcome::Resolved { .. })))
            .count()
    }

    /// Full text report: one line per step, then the final board
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(out, "{:>3}: {}", i + 1, entry.summary());
        }
        let _ = writeln!(
            out,
            "outcome={} moves_made={} moves_remaining={} blockers_remaining={} hash={:016x}",
            self.last.outcome.as_str(),
            self.last.moves_made,
            self.last.moves_remaining,
            self.last.blockers_remaining,
            self.last.board_hash
        );
        for row in self.last.rows_top_down() {
            let _ = writeln!(out, "{}", row);
        }
        out
    }
}
