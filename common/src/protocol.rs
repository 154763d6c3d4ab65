use serde::{Deserialize, Serialize};

use crate::models::{CellView, Face, Pos, Status};

/// The operations an input layer may issue against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action")]
pub enum Command {
    #[serde(rename = "reveal")]
    Reveal { pos: Pos },
    #[serde(rename = "flag")]
    Flag { pos: Pos },
    #[serde(rename = "chord")]
    Chord { pos: Pos },
    #[serde(rename = "reset")]
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Press,
    Release,
}

impl Command {
    /// Maps a pointer event over a cell to the board operation it triggers.
    ///
    /// Reveal and chord fire on release, flag fires on press. Every other
    /// combination only affects the pressed face and yields `None`.
    pub fn from_pointer(button: PointerButton, action: PointerAction, pos: Pos) -> Option<Self> {
        match (button, action) {
            (PointerButton::Primary, PointerAction::Release) => Some(Self::Reveal { pos }),
            (PointerButton::Secondary, PointerAction::Press) => Some(Self::Flag { pos }),
            (PointerButton::Middle, PointerAction::Release) => Some(Self::Chord { pos }),
            _ => None,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub status: Status,
    pub face: Face,
    pub mines_remaining: i64,
    pub elapsed_seconds: u64,
    pub field: Vec<Vec<CellView>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_mapping_follows_button_and_phase() {
        let pos = Pos::new(2, 3);
        assert_eq!(
            Command::from_pointer(PointerButton::Primary, PointerAction::Release, pos),
            Some(Command::Reveal { pos })
        );
        assert_eq!(
            Command::from_pointer(PointerButton::Secondary, PointerAction::Press, pos),
            Some(Command::Flag { pos })
        );
        assert_eq!(
            Command::from_pointer(PointerButton::Middle, PointerAction::Release, pos),
            Some(Command::Chord { pos })
        );
        assert_eq!(
            Command::from_pointer(PointerButton::Primary, PointerAction::Press, pos),
            None
        );
        assert_eq!(
            Command::from_pointer(PointerButton::Secondary, PointerAction::Release, pos),
            None
        );
    }

    #[test]
    fn commands_are_tagged_by_action() {
        let json = r#"{"action":"chord","pos":{"x":1,"y":4}}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command, Command::Chord { pos: Pos::new(1, 4) });
        let command: Command = serde_json::from_str(r#"{"action":"reset"}"#).unwrap();
        assert_eq!(command, Command::Reset);
    }
}
