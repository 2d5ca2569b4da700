//! Translation from the engine's per-tick input snapshot to the fight
//! vocabulary consumed by the simulation.

use engine::{InputAction, InputSnapshot};

use super::types::FightInput;

/// Everything the simulation needs from the local player for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub direction: Option<FightInput>,
    pub blocking: bool,
    /// Directions currently held, fed to the recognizer every tick.
    pub held_directions: Vec<FightInput>,
    /// Attack buttons that went down since the previous tick.
    pub pressed_attacks: Vec<FightInput>,
}

impl TickInput {
    pub fn from_snapshot(snapshot: &InputSnapshot) -> Self {
        Self {
            direction: movement_direction(snapshot),
            blocking: is_blocking(snapshot),
            held_directions: held_directions(snapshot),
            pressed_attacks: pressed_attacks(snapshot),
        }
    }
}

/// Resolves the held directional keys to a single movement intent.
/// Simultaneous opposite holds cancel out; the vertical axis wins when both
/// axes are held.
pub fn movement_direction(snapshot: &InputSnapshot) -> Option<FightInput> {
    let left = snapshot.is_down(InputAction::Left);
    let right = snapshot.is_down(InputAction::Right);
    let up = snapshot.is_down(InputAction::Up);
    let down = snapshot.is_down(InputAction::Down);

    if up && !down {
        return Some(FightInput::Up);
    }
    if down && !up {
        return Some(FightInput::Down);
    }
    if left && !right {
        return Some(FightInput::Back);
    }
    if right && !left {
        return Some(FightInput::Forward);
    }
    None
}

pub fn is_blocking(snapshot: &InputSnapshot) -> bool {
    snapshot.is_down(InputAction::Block)
}

pub fn held_directions(snapshot: &InputSnapshot) -> Vec<FightInput> {
    const DIRECTIONS: [(InputAction, FightInput); 4] = [
        (InputAction::Left, FightInput::Back),
        (InputAction::Right, FightInput::Forward),
        (InputAction::Up, FightInput::Up),
        (InputAction::Down, FightInput::Down),
    ];
    DIRECTIONS
        .iter()
        .filter(|(action, _)| snapshot.is_down(*action))
        .map(|(_, input)| *input)
        .collect()
}

pub fn pressed_attacks(snapshot: &InputSnapshot) -> Vec<FightInput> {
    const ATTACKS: [(InputAction, FightInput); 4] = [
        (InputAction::PunchLight, FightInput::PunchLight),
        (InputAction::PunchHeavy, FightInput::PunchHeavy),
        (InputAction::KickLight, FightInput::KickLight),
        (InputAction::KickHeavy, FightInput::KickHeavy),
    ];
    ATTACKS
        .iter()
        .filter(|(action, _)| snapshot.was_pressed(*action))
        .map(|(_, input)| *input)
        .collect()
}
