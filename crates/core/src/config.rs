//! Session configuration

use crate::error::EngineError;
use crate::types::{
    DEFAULT_BLOCKER_ROWS, DEFAULT_HEIGHT, DEFAULT_MOVE_BUDGET, DEFAULT_PALETTE_SIZE, DEFAULT_WIDTH,
    MAX_BOARD_DIM, MAX_PALETTE_SIZE, MIN_PALETTE_SIZE,
};

/// Parameters for a new session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: u8,
    pub height: u8,
    /// Bottom rows filled with blockers at population time
    pub blocker_rows: u8,
    pub move_budget: u32,
    pub palette_size: u8,
    pub seed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            blocker_rows: DEFAULT_BLOCKER_ROWS,
            move_budget: DEFAULT_MOVE_BUDGET,
            palette_size: DEFAULT_PALETTE_SIZE,
            seed: 1,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig("board dimensions must be non-zero"));
        }
        if self.width > MAX_BOARD_DIM || self.height > MAX_BOARD_DIM {
            return Err(EngineError::InvalidConfig("board dimension exceeds 32"));
        }
        if !(MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE).contains(&self.palette_size) {
            return Err(EngineError::InvalidConfig("palette size must be within 2..=8"));
        }
        if self.blocker_rows == 0 {
            return Err(EngineError::InvalidConfig("at least one blocker row is required"));
        }
        if self.blocker_rows >= self.height {
            return Err(EngineError::InvalidConfig("blocker rows must leave a playable row"));
        }
        if self.move_budget == 0 {
            return Err(EngineError::InvalidConfig("move budget must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.width, 8);
        assert_eq!(config.move_budget, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = SessionConfig::default();
        for bad in [
            SessionConfig { width: 0, ..base },
            SessionConfig { height: 40, ..base },
            SessionConfig { palette_size: 1, ..base },
            SessionConfig { palette_size: 9, ..base },
            SessionConfig { blocker_rows: 0, ..base },
            SessionConfig { blocker_rows: 8, ..base },
            SessionConfig { move_budget: 0, ..base },
        ] {
            assert!(
                matches!(bad.validate(), Err(EngineError::InvalidConfig(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
