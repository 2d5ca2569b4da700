//! The combat core: per-side input buffers with command recognition, move
//! execution, per-tick frame advancement and physics, hit detection, and
//! hit-effect application. Every operation is a total function over the
//! fighter state; unknown move ids degrade to no-ops.

use super::animation;
use super::catalog;
use super::types::{Facing, FightInput, Fighter, HitKind, HitLevel, MoveKind, MoveProperty, Side};
use super::types::{CEILING_Y, GROUND_Y, LEFT_BOUND, MAX_METER, RIGHT_BOUND};

/// Buffered inputs older than this are pruned on insert.
pub const INPUT_BUFFER_WINDOW_MS: u64 = 300;
/// A Down input at most this old selects the down-variant basic attacks.
pub const DOWN_VARIANT_WINDOW_MS: u64 = 100;
/// Follow-up window that extends a combo instead of restarting it.
pub const COMBO_WINDOW_MS: f32 = 500.0;
/// Fixed amount the combo timer loses per simulation tick.
pub const COMBO_TICK_MS: f32 = 16.0;

pub const WALK_SPEED: f32 = 3.0;
pub const JUMP_VELOCITY: f32 = -12.0;
pub const GRAVITY_PER_TICK: f32 = 0.8;
pub const FRICTION: f32 = 0.85;
pub const WAKEUP_INVINCIBLE_FRAMES: u32 = 30;

pub const BLOCK_DAMAGE_SCALE: f32 = 0.1;
pub const BLOCK_PUSHBACK_SCALE: f32 = 0.3;
pub const METER_GAIN_ATTACKER: f32 = 0.5;
pub const METER_GAIN_DEFENDER: f32 = 0.3;
pub const LAUNCH_VELOCITY: f32 = -15.0;
pub const KNOCKDOWN_VELOCITY: f32 = -8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct BufferedInput {
    input: FightInput,
    at_ms: u64,
}

#[derive(Debug, Default)]
struct InputBuffer {
    entries: Vec<BufferedInput>,
}

impl InputBuffer {
    fn push(&mut self, input: FightInput, now_ms: u64) {
        self.entries
            .retain(|entry| now_ms.saturating_sub(entry.at_ms) < INPUT_BUFFER_WINDOW_MS);
        self.entries.push(BufferedInput { input, at_ms: now_ms });
    }

    fn matches_suffix(&self, command: &[FightInput]) -> bool {
        if self.entries.len() < command.len() {
            return false;
        }
        let recent = &self.entries[self.entries.len() - command.len()..];
        recent
            .iter()
            .zip(command.iter())
            .all(|(entry, expected)| entry.input == *expected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub damage: i32,
    pub kind: HitKind,
}

/// State machine driving both combatants. Holds only the input buffers; all
/// fighter state lives in the simulation snapshot it is handed each tick.
#[derive(Debug, Default)]
pub struct CombatEngine {
    buffers: [InputBuffer; 2],
}

impl CombatEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps and appends one abstract input to the side's buffer.
    pub fn add_input(&mut self, side: Side, input: FightInput, now_ms: u64) {
        self.buffers[side.index()].push(input, now_ms);
    }

    /// Resolves the buffered inputs to a move id, if the fighter may act.
    /// Command sequences are tried in catalog order against the buffer
    /// suffix; a match consumes the whole buffer. The single-button fallback
    /// consumes only the triggering input.
    pub fn next_move(&mut self, fighter: &Fighter, side: Side, now_ms: u64) -> Option<&'static str> {
        let buffer = &mut self.buffers[side.index()];
        if buffer.entries.is_empty() {
            return None;
        }
        if fighter.stun_frames > 0 || fighter.move_kind != MoveKind::Idle {
            return None;
        }

        for (move_id, command) in catalog::COMMANDS.iter().copied() {
            if buffer.matches_suffix(command) {
                buffer.entries.clear();
                return Some(move_id);
            }
        }

        let last = *buffer.entries.last()?;
        let holding_down = buffer.entries.iter().any(|entry| {
            entry.input == FightInput::Down
                && now_ms.saturating_sub(entry.at_ms) < DOWN_VARIANT_WINDOW_MS
        });
        let move_id = if holding_down {
            catalog::basic_down_attack(last.input)
        } else {
            catalog::basic_attack(last.input)
        };
        if move_id.is_some() {
            buffer.entries.pop();
        }
        move_id
    }

    /// Starts a move. Combo bookkeeping carries over while the combo timer
    /// is still running and resets otherwise.
    pub fn execute_move(&self, fighter: &mut Fighter, move_id: &str) {
        let Some(mv) = catalog::lookup(move_id) else {
            return;
        };
        fighter.move_kind = mv.kind;
        fighter.move_id = Some(mv.id);
        fighter.move_frame = 0;
        fighter.last_move_id = Some(mv.id);

        if fighter.combo_timer_ms <= 0.0 {
            fighter.combo_count = 0;
            fighter.combo_damage = 0;
        }
        fighter.combo_timer_ms = COMBO_WINDOW_MS;
    }

    pub fn can_cancel(&self, current_move_id: &str, next_move_id: &str) -> bool {
        catalog::lookup(current_move_id)
            .map(|mv| mv.cancel_into.iter().any(|id| *id == next_move_id))
            .unwrap_or(false)
    }

    /// One tick of frame advancement, status countdowns, and physics.
    pub fn update_frame(&self, fighter: &mut Fighter) {
        if fighter.move_kind != MoveKind::Idle {
            fighter.move_frame += 1;
            if let Some(mv) = fighter.move_id.and_then(catalog::lookup) {
                if fighter.move_frame >= mv.total_frames() {
                    fighter.move_kind = MoveKind::Idle;
                    fighter.move_id = None;
                    fighter.move_frame = 0;
                }
            }
        }

        if fighter.stun_frames > 0 {
            fighter.stun_frames -= 1;
            if fighter.stun_frames == 0 {
                fighter.move_kind = MoveKind::Idle;
            }
        }

        if fighter.combo_timer_ms > 0.0 {
            fighter.combo_timer_ms -= COMBO_TICK_MS;
            if fighter.combo_timer_ms <= 0.0 {
                fighter.combo_count = 0;
                fighter.combo_damage = 0;
            }
        }

        if fighter.invincible_frames > 0 {
            fighter.invincible_frames -= 1;
        }

        fighter.x += fighter.velocity_x;
        fighter.y += fighter.velocity_y;

        if fighter.x < LEFT_BOUND {
            fighter.x = LEFT_BOUND;
            fighter.velocity_x = 0.0;
        } else if fighter.x > RIGHT_BOUND {
            fighter.x = RIGHT_BOUND;
            fighter.velocity_x = 0.0;
        }

        if !fighter.grounded {
            fighter.velocity_y += GRAVITY_PER_TICK;
        }

        if fighter.y >= GROUND_Y {
            fighter.y = GROUND_Y;
            fighter.grounded = true;
            fighter.velocity_y = 0.0;
            if fighter.move_kind == MoveKind::Knockdown {
                fighter.move_kind = MoveKind::Idle;
                fighter.invincible_frames = WAKEUP_INVINCIBLE_FRAMES;
            }
        }

        if fighter.y < CEILING_Y {
            fighter.y = CEILING_Y;
            fighter.velocity_y = 0.0;
        }

        fighter.velocity_x *= FRICTION;
    }

    /// Tests the attacker's active hit rectangles against the defender's
    /// hurt rectangles for the current frame.
    pub fn check_hits(&self, attacker: &Fighter, defender: &Fighter) -> Option<HitReport> {
        if defender.invincible_frames > 0 {
            return None;
        }

        let mv = attacker.move_id.and_then(catalog::lookup)?;
        if attacker.move_frame < mv.startup_frames
            || attacker.move_frame >= mv.startup_frames + mv.active_frames
        {
            return None;
        }

        let attack = animation::boxes(
            attacker.move_kind,
            attacker.move_frame,
            attacker.x,
            attacker.y,
            attacker.facing,
        );
        let defense = animation::boxes(
            defender.move_kind,
            defender.move_frame,
            defender.x,
            defender.y,
            defender.facing,
        );

        for hit_box in &attack.hit {
            for hurt_box in &defense.hurt {
                if hit_box.overlaps(hurt_box) {
                    let blocked = defender.move_kind.is_block()
                        && block_level_matches(mv.hit_level, defender.crouching);
                    let damage = if blocked {
                        (mv.damage as f32 * BLOCK_DAMAGE_SCALE).floor() as i32
                    } else {
                        mv.damage
                    };
                    let kind = if blocked {
                        HitKind::Block
                    } else if mv.has_property(MoveProperty::Launcher) {
                        HitKind::Launcher
                    } else {
                        HitKind::Hit
                    };
                    return Some(HitReport { damage, kind });
                }
            }
        }

        None
    }

    /// Applies a confirmed hit: damage, combo and meter bookkeeping, then
    /// the reaction state (stun, pushback, launch, knockdown).
    pub fn apply_hit(
        &self,
        attacker: &mut Fighter,
        defender: &mut Fighter,
        damage: i32,
        kind: HitKind,
    ) {
        let Some(mv) = attacker.move_id.and_then(catalog::lookup) else {
            return;
        };

        defender.health = (defender.health - damage).max(0);

        attacker.combo_count += 1;
        attacker.combo_damage += damage;
        attacker.combo_timer_ms = COMBO_WINDOW_MS;

        attacker.meter = (attacker.meter + damage as f32 * METER_GAIN_ATTACKER).min(MAX_METER);
        defender.meter = (defender.meter + damage as f32 * METER_GAIN_DEFENDER).min(MAX_METER);

        if kind == HitKind::Block {
            defender.stun_frames = mv.block_stun;
            defender.move_kind = MoveKind::BlockStun;
            defender.velocity_x = -mv.pushback * BLOCK_PUSHBACK_SCALE * attacker.facing.sign();
            return;
        }

        defender.stun_frames = mv.hit_stun;
        defender.move_kind = MoveKind::HitStun;
        defender.velocity_x = -mv.pushback * attacker.facing.sign();

        if mv.has_property(MoveProperty::Launcher) {
            defender.grounded = false;
            defender.velocity_y = LAUNCH_VELOCITY;
            defender.move_kind = MoveKind::AirJuggle;
        } else if mv.has_property(MoveProperty::Knockdown) {
            defender.move_kind = MoveKind::Knockdown;
            defender.velocity_x *= 2.0;
            defender.grounded = false;
            defender.velocity_y = KNOCKDOWN_VELOCITY;
        }
    }

    /// Voluntary movement; a no-op while stunned or outside the free states.
    pub fn handle_movement(&self, fighter: &mut Fighter, direction: Option<FightInput>) {
        if fighter.stun_frames > 0 {
            return;
        }
        if !fighter.move_kind.is_free() {
            return;
        }

        match direction {
            Some(FightInput::Forward) => {
                fighter.velocity_x = fighter.facing.sign() * WALK_SPEED;
                fighter.move_kind = MoveKind::WalkForward;
                fighter.blocking = false;
            }
            Some(FightInput::Back) => {
                fighter.velocity_x = -fighter.facing.sign() * WALK_SPEED;
                fighter.move_kind = MoveKind::WalkBackward;
                fighter.blocking = false;
            }
            Some(FightInput::Up) => {
                if fighter.grounded {
                    fighter.velocity_y = JUMP_VELOCITY;
                    fighter.grounded = false;
                    fighter.move_kind = MoveKind::Jump;
                    fighter.blocking = false;
                    fighter.crouching = false;
                }
            }
            Some(FightInput::Down) => {
                fighter.crouching = true;
                fighter.move_kind = MoveKind::Crouch;
                fighter.velocity_x = 0.0;
            }
            _ => {
                if !fighter.move_kind.is_block() {
                    fighter.move_kind = MoveKind::Idle;
                }
                fighter.crouching = false;
            }
        }
    }

    /// Whichever combatant is to the left faces right; recomputed every
    /// tick and overrides any prior facing, including mid-move.
    pub fn update_facing(player1: &mut Fighter, player2: &mut Fighter) {
        if player1.x < player2.x {
            player1.facing = Facing::Right;
            player2.facing = Facing::Left;
        } else {
            player1.facing = Facing::Left;
            player2.facing = Facing::Right;
        }
    }
}

/// Mid attacks are blockable in either stance; high only standing, low only
/// crouching.
fn block_level_matches(hit_level: HitLevel, is_crouching: bool) -> bool {
    match hit_level {
        HitLevel::Mid => true,
        HitLevel::High => !is_crouching,
        HitLevel::Low => is_crouching,
    }
}
