// ═══════════════════════════════════════════════════════════════════════
// Move protocol — JSON messages and the alternating-turn dispatcher
//
// Wire format:
//   {"assassins": ["monk", "hooker", "fishwoman"]}
//   {"actions": [["move", 9, 8, "W"], ["arrest", 3, 4, "N"], ["reveal", 5, 2]]}
//
// Action records are arrays: kind, row, column, and a direction for every
// kind except `reveal`. Coordinates may also arrive as numeric strings.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{GameError, MatchError, ProtocolError};
use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ── Action records ─────────────────────────────────────────────────────

fn coordinate(value: &Value) -> Result<u8, ProtocolError> {
    let n = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    n.filter(|&n| n < BOARD_SIZE as u64)
        .map(|n| n as u8)
        .ok_or_else(|| ProtocolError::MalformedAction(format!("bad coordinate {value}")))
}

fn direction(value: &Value) -> Result<Direction, ProtocolError> {
    value
        .as_str()
        .ok_or_else(|| ProtocolError::MalformedAction(format!("bad direction {value}")))?
        .parse()
        .map_err(ProtocolError::MalformedAction)
}

impl TryFrom<Vec<Value>> for Action {
    type Error = ProtocolError;

    fn try_from(record: Vec<Value>) -> Result<Self, Self::Error> {
        let kind = record
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::MalformedAction("missing action kind".into()))?;

        let expected = if kind == "reveal" { 3 } else { 4 };
        if record.len() != expected {
            return Err(ProtocolError::MalformedAction(format!(
                "{kind} takes {} arguments, got {}",
                expected - 1,
                record.len() - 1
            )));
        }

        let row = coordinate(&record[1])?;
        let col = coordinate(&record[2])?;
        let cell = Cell::new(row, col)
            .ok_or_else(|| ProtocolError::MalformedAction(format!("cell ({row},{col}) is off the board")))?;
        if kind == "reveal" {
            return Ok(Action::Reveal { at: cell });
        }

        let dir = direction(&record[3])?;
        match kind {
            "move" => Ok(Action::Move { from: cell, dir }),
            "arrest" => Ok(Action::Arrest { from: cell, dir }),
            "kill" => Ok(Action::Kill { from: cell, dir }),
            "attack" => Ok(Action::Attack { from: cell, dir }),
            other => Err(ProtocolError::MalformedAction(format!("unknown action {other:?}"))),
        }
    }
}

impl From<Action> for Vec<Value> {
    fn from(action: Action) -> Self {
        let origin = action.origin();
        let mut record = vec![
            Value::from(action.kind()),
            Value::from(origin.row()),
            Value::from(origin.col()),
        ];
        match action {
            Action::Move { dir, .. }
            | Action::Arrest { dir, .. }
            | Action::Kill { dir, .. }
            | Action::Attack { dir, .. } => record.push(Value::from(dir.letter().to_string())),
            Action::Reveal { .. } => {}
        }
        record
    }
}

impl Serialize for Action {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Vec::<Value>::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Vec::<Value>::deserialize(deserializer)?;
        Action::try_from(record).map_err(serde::de::Error::custom)
    }
}

// ── Messages ───────────────────────────────────────────────────────────

/// One player message: the opening assassin pick or a turn's actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Assassins { assassins: Vec<String> },
    Actions { actions: Vec<Action> },
}

impl Message {
    pub fn decode(raw: &str) -> Result<Message, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn encode(&self) -> String {
        // Strings, integers and arrays only: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ── Match dispatcher ───────────────────────────────────────────────────

/// Drives one game through alternating turns. The assassin side opens by
/// choosing its assassins; from then on the king side and the assassin
/// side alternate, starting with the king.
#[derive(Debug, Clone)]
pub struct Match {
    state: GameState,
    to_move: Side,
}

impl Match {
    pub fn new(state: GameState) -> Self {
        Match { state, to_move: Side::Assassins }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Submit a message on behalf of `side`. On error nothing changes and
    /// the same side is still to move.
    pub fn submit(&mut self, side: Side, message: Message) -> Result<(), MatchError> {
        if self.state.winner().is_some() {
            return Err(GameError::GameOver.into());
        }
        if side != self.to_move {
            return Err(GameError::NotYourTurn(side).into());
        }

        match (self.state.is_initial(), message) {
            (true, Message::Assassins { assassins }) => self.state.set_assassins(&assassins)?,
            (true, Message::Actions { .. }) => {
                return Err(ProtocolError::UnexpectedMessage { expected: "assassin selection" }.into())
            }
            (false, Message::Actions { actions }) => self.state.apply_turn(&actions, side)?,
            (false, Message::Assassins { .. }) => {
                return Err(ProtocolError::UnexpectedMessage { expected: "actions" }.into())
            }
        }

        self.to_move = side.opponent();
        debug!(next = %self.to_move, "turn passed");
        Ok(())
    }

    /// Decode and submit a raw JSON message from whoever is to move.
    pub fn apply_message(&mut self, raw: &str) -> Result<(), MatchError> {
        let message = Message::decode(raw)?;
        self.submit(self.to_move, message)
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner()
    }
}
