//! Core data model for the fight simulation: moves, fighters, boxes, and
//! the stick-figure skeleton.

/// Arena bounds in surface coordinates. Fighters stand on `GROUND_Y`.
pub const LEFT_BOUND: f32 = 50.0;
pub const RIGHT_BOUND: f32 = 550.0;
pub const GROUND_Y: f32 = 300.0;
pub const CEILING_Y: f32 = 50.0;

pub const MAX_HEALTH: i32 = 100;
pub const MAX_METER: f32 = 100.0;

/// Every state a fighter can be in, including catalog attacks and the
/// involuntary reaction states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Idle,
    WalkForward,
    WalkBackward,
    Crouch,
    Jump,
    BlockStand,
    BlockCrouch,
    Jab,
    Straight,
    Hook,
    Uppercut,
    LowKick,
    MidKick,
    HighKick,
    Sweep,
    Launcher,
    Combo1,
    Combo2,
    Combo3,
    Special,
    HitStun,
    BlockStun,
    Knockdown,
    AirJuggle,
}

impl MoveKind {
    pub fn is_block(self) -> bool {
        matches!(self, MoveKind::BlockStand | MoveKind::BlockCrouch)
    }

    /// States from which voluntary movement is legal.
    pub fn is_free(self) -> bool {
        matches!(
            self,
            MoveKind::Idle
                | MoveKind::WalkForward
                | MoveKind::WalkBackward
                | MoveKind::Crouch
                | MoveKind::BlockStand
                | MoveKind::BlockCrouch
        )
    }

    /// Catalog attacks, i.e. states that can carry active hit frames.
    pub fn is_strike(self) -> bool {
        matches!(
            self,
            MoveKind::Jab
                | MoveKind::Straight
                | MoveKind::Hook
                | MoveKind::Uppercut
                | MoveKind::LowKick
                | MoveKind::MidKick
                | MoveKind::HighKick
                | MoveKind::Sweep
                | MoveKind::Launcher
                | MoveKind::Combo1
                | MoveKind::Combo2
                | MoveKind::Combo3
                | MoveKind::Special
        )
    }
}

/// Abstract input symbol fed to the command recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FightInput {
    Forward,
    Back,
    Up,
    Down,
    PunchLight,
    PunchHeavy,
    KickLight,
    KickHeavy,
    Block,
}

impl FightInput {
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            FightInput::Forward | FightInput::Back | FightInput::Up | FightInput::Down
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitLevel {
    High,
    Mid,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveProperty {
    Launcher,
    Knockdown,
    CounterHit,
    Unblockable,
    Armor,
    Invincible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Horizontal sign of "toward where I face".
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Player1 => 0,
            Side::Player2 => 1,
        }
    }
}

/// Immutable catalog entry for one attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: MoveKind,
    pub damage: i32,
    pub startup_frames: u32,
    pub active_frames: u32,
    pub recovery_frames: u32,
    pub block_stun: u32,
    pub hit_stun: u32,
    pub pushback: f32,
    pub hit_level: HitLevel,
    pub properties: &'static [MoveProperty],
    pub cancel_into: &'static [&'static str],
}

impl Move {
    pub fn total_frames(&self) -> u32 {
        self.startup_frames + self.active_frames + self.recovery_frames
    }

    pub fn has_property(&self, property: MoveProperty) -> bool {
        self.properties.contains(&property)
    }
}

/// One combatant. Owned by the simulation state and mutated only by the
/// combat engine during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,

    pub health: i32,
    pub meter: f32,
    pub move_kind: MoveKind,
    pub move_id: Option<&'static str>,
    pub move_frame: u32,

    pub facing: Facing,
    pub grounded: bool,
    pub crouching: bool,
    pub blocking: bool,
    pub stun_frames: u32,
    pub invincible_frames: u32,

    pub combo_count: u32,
    pub combo_damage: i32,
    pub combo_timer_ms: f32,
    pub last_move_id: Option<&'static str>,
}

impl Fighter {
    pub fn new(x: f32, facing: Facing) -> Self {
        Self {
            x,
            y: GROUND_Y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            health: MAX_HEALTH,
            meter: 0.0,
            move_kind: MoveKind::Idle,
            move_id: None,
            move_frame: 0,
            facing,
            grounded: true,
            crouching: false,
            blocking: false,
            stun_frames: 0,
            invincible_frames: 0,
            combo_count: 0,
            combo_damage: 0,
            combo_timer_ms: 0.0,
            last_move_id: None,
        }
    }
}

/// Axis-aligned hit/hurt rectangle; half-open on the far edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxRect {
    pub fn overlaps(&self, other: &BoxRect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Hit and hurt rectangles for one fighter on one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameBoxes {
    pub hit: Vec<BoxRect>,
    pub hurt: Vec<BoxRect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Joint {
    pub x: f32,
    pub y: f32,
}

impl Joint {
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Stick-figure pose relative to the fighter position (feet at the origin).
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub head: Joint,
    pub head_radius: f32,
    pub neck: Joint,
    pub spine: Joint,
    pub hips: Joint,

    pub left_shoulder: Joint,
    pub left_elbow: Joint,
    pub left_hand: Joint,
    pub right_shoulder: Joint,
    pub right_elbow: Joint,
    pub right_hand: Joint,

    pub left_hip: Joint,
    pub left_knee: Joint,
    pub left_foot: Joint,
    pub right_hip: Joint,
    pub right_knee: Joint,
    pub right_foot: Joint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Hit,
    Block,
    Launcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player1,
    Player2,
}
