//! Static move catalog: frame data, special-move command sequences, and the
//! single-button attack mappings.

use super::types::{FightInput, HitLevel, Move, MoveKind, MoveProperty};

pub const MOVES: &[Move] = &[
    Move {
        id: "jab",
        name: "Jab",
        kind: MoveKind::Jab,
        damage: 8,
        startup_frames: 10,
        active_frames: 2,
        recovery_frames: 8,
        block_stun: 3,
        hit_stun: 12,
        pushback: 20.0,
        hit_level: HitLevel::High,
        properties: &[],
        cancel_into: &["straight", "hook", "low_kick"],
    },
    Move {
        id: "straight",
        name: "Straight Punch",
        kind: MoveKind::Straight,
        damage: 12,
        startup_frames: 12,
        active_frames: 3,
        recovery_frames: 12,
        block_stun: 5,
        hit_stun: 15,
        pushback: 30.0,
        hit_level: HitLevel::Mid,
        properties: &[],
        cancel_into: &["uppercut", "mid_kick"],
    },
    Move {
        id: "hook",
        name: "Hook",
        kind: MoveKind::Hook,
        damage: 15,
        startup_frames: 14,
        active_frames: 4,
        recovery_frames: 16,
        block_stun: 6,
        hit_stun: 18,
        pushback: 25.0,
        hit_level: HitLevel::High,
        properties: &[],
        cancel_into: &["high_kick"],
    },
    Move {
        id: "uppercut",
        name: "Uppercut",
        kind: MoveKind::Uppercut,
        damage: 20,
        startup_frames: 16,
        active_frames: 3,
        recovery_frames: 20,
        block_stun: 8,
        hit_stun: 25,
        pushback: 40.0,
        hit_level: HitLevel::Mid,
        properties: &[MoveProperty::Launcher],
        cancel_into: &[],
    },
    Move {
        id: "low_kick",
        name: "Low Kick",
        kind: MoveKind::LowKick,
        damage: 10,
        startup_frames: 12,
        active_frames: 3,
        recovery_frames: 10,
        block_stun: 4,
        hit_stun: 14,
        pushback: 25.0,
        hit_level: HitLevel::Low,
        properties: &[],
        cancel_into: &["mid_kick"],
    },
    Move {
        id: "mid_kick",
        name: "Mid Kick",
        kind: MoveKind::MidKick,
        damage: 14,
        startup_frames: 14,
        active_frames: 4,
        recovery_frames: 14,
        block_stun: 6,
        hit_stun: 16,
        pushback: 35.0,
        hit_level: HitLevel::Mid,
        properties: &[],
        cancel_into: &["high_kick"],
    },
    Move {
        id: "high_kick",
        name: "High Kick",
        kind: MoveKind::HighKick,
        damage: 18,
        startup_frames: 16,
        active_frames: 4,
        recovery_frames: 18,
        block_stun: 8,
        hit_stun: 20,
        pushback: 40.0,
        hit_level: HitLevel::High,
        properties: &[],
        cancel_into: &[],
    },
    Move {
        id: "sweep",
        name: "Sweep",
        kind: MoveKind::Sweep,
        damage: 15,
        startup_frames: 18,
        active_frames: 5,
        recovery_frames: 22,
        block_stun: 6,
        hit_stun: 30,
        pushback: 50.0,
        hit_level: HitLevel::Low,
        properties: &[MoveProperty::Knockdown],
        cancel_into: &[],
    },
    Move {
        id: "launcher",
        name: "Launcher",
        kind: MoveKind::Launcher,
        damage: 22,
        startup_frames: 15,
        active_frames: 3,
        recovery_frames: 25,
        block_stun: 10,
        hit_stun: 35,
        pushback: 20.0,
        hit_level: HitLevel::Mid,
        properties: &[MoveProperty::Launcher],
        cancel_into: &[],
    },
    Move {
        id: "combo1",
        name: "Triple Strike",
        kind: MoveKind::Combo1,
        damage: 25,
        startup_frames: 12,
        active_frames: 15,
        recovery_frames: 20,
        block_stun: 8,
        hit_stun: 25,
        pushback: 45.0,
        hit_level: HitLevel::Mid,
        properties: &[],
        cancel_into: &["special"],
    },
    Move {
        id: "combo2",
        name: "Lightning Combo",
        kind: MoveKind::Combo2,
        damage: 30,
        startup_frames: 14,
        active_frames: 20,
        recovery_frames: 25,
        block_stun: 10,
        hit_stun: 30,
        pushback: 50.0,
        hit_level: HitLevel::Mid,
        properties: &[MoveProperty::CounterHit],
        cancel_into: &["special"],
    },
    Move {
        id: "combo3",
        name: "Demon Rush",
        kind: MoveKind::Combo3,
        damage: 35,
        startup_frames: 16,
        active_frames: 25,
        recovery_frames: 30,
        block_stun: 12,
        hit_stun: 35,
        pushback: 60.0,
        hit_level: HitLevel::Mid,
        properties: &[MoveProperty::Armor],
        cancel_into: &[],
    },
    Move {
        id: "special",
        name: "Dragon Fist",
        kind: MoveKind::Special,
        damage: 45,
        startup_frames: 20,
        active_frames: 5,
        recovery_frames: 35,
        block_stun: 15,
        hit_stun: 45,
        pushback: 80.0,
        hit_level: HitLevel::Mid,
        properties: &[MoveProperty::Invincible, MoveProperty::Knockdown],
        cancel_into: &[],
    },
];

/// Special-move command sequences, matched against the input-buffer suffix
/// in declaration order. First match wins, so longer sequences sharing a
/// suffix with shorter ones must come first.
pub const COMMANDS: &[(&str, &[FightInput])] = &[
    (
        "special",
        &[
            FightInput::Back,
            FightInput::Down,
            FightInput::Forward,
            FightInput::PunchLight,
            FightInput::PunchHeavy,
        ],
    ),
    (
        "launcher",
        &[
            FightInput::Down,
            FightInput::Forward,
            FightInput::Down,
            FightInput::Forward,
            FightInput::PunchHeavy,
        ],
    ),
    (
        "combo3",
        &[
            FightInput::Forward,
            FightInput::Back,
            FightInput::Forward,
            FightInput::PunchHeavy,
        ],
    ),
    (
        "straight",
        &[FightInput::Forward, FightInput::Forward, FightInput::PunchLight],
    ),
    (
        "uppercut",
        &[FightInput::Down, FightInput::Forward, FightInput::PunchHeavy],
    ),
    (
        "mid_kick",
        &[FightInput::Back, FightInput::Forward, FightInput::KickLight],
    ),
    (
        "sweep",
        &[FightInput::Down, FightInput::Back, FightInput::KickHeavy],
    ),
    (
        "combo1",
        &[FightInput::Down, FightInput::Forward, FightInput::PunchLight],
    ),
    (
        "combo2",
        &[FightInput::Down, FightInput::Back, FightInput::KickHeavy],
    ),
];

/// Single-button fallbacks when no command sequence matches.
pub const BASIC_ATTACKS: &[(FightInput, &str)] = &[
    (FightInput::PunchLight, "jab"),
    (FightInput::PunchHeavy, "hook"),
    (FightInput::KickLight, "low_kick"),
    (FightInput::KickHeavy, "high_kick"),
];

/// Variants selected when the button lands with a recent Down hold.
pub const BASIC_DOWN_ATTACKS: &[(FightInput, &str)] = &[
    (FightInput::PunchLight, "straight"),
    (FightInput::PunchHeavy, "uppercut"),
    (FightInput::KickLight, "sweep"),
    (FightInput::KickHeavy, "mid_kick"),
];

pub fn lookup(move_id: &str) -> Option<&'static Move> {
    MOVES.iter().find(|mv| mv.id == move_id)
}

pub fn basic_attack(input: FightInput) -> Option<&'static str> {
    BASIC_ATTACKS
        .iter()
        .find(|(button, _)| *button == input)
        .map(|(_, id)| *id)
}

pub fn basic_down_attack(input: FightInput) -> Option<&'static str> {
    BASIC_DOWN_ATTACKS
        .iter()
        .find(|(button, _)| *button == input)
        .map(|(_, id)| *id)
}
