use serde::{Deserialize, Serialize};
use strum::Display;

/// Discrete mode of the game. `Ready -> Playing -> Over -> Ready`, nothing else.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GamePhase {
    #[default]
    Ready,
    Playing,
    Over,
}

impl GamePhase {
    pub fn is_playing(self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    /// Ends the round if one is running. Returns whether this call flipped the phase, so that
    /// when several contacts happen in one frame only the first one counts.
    pub fn end_round(&mut self) -> bool {
        match self {
            GamePhase::Playing => {
                *self = GamePhase::Over;
                true
            },
            GamePhase::Ready | GamePhase::Over => false,
        }
    }
}
