mod game;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::game::GameAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
    Frame,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ToggleShowHelp,
    Error(String),
    Game(GameAction),
}

impl Action {
    /// Label shown in the help overlay.
    pub fn label(&self) -> String {
        match self {
            Action::Game(action) => action.to_string(),
            Action::ToggleShowHelp => "Help".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_plain_names() {
        assert_eq!(serde_plain::from_str::<Action>("Quit").unwrap(), Action::Quit);
        assert_eq!(serde_plain::from_str::<GameAction>("Activate").unwrap(), GameAction::Activate);
        assert!(serde_plain::from_str::<Action>("Fly").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Action::Game(GameAction::Activate).label(), "Activate");
        assert_eq!(Action::ToggleShowHelp.label(), "Help");
        assert_eq!(Action::Suspend.label(), "Suspend");
    }
}
