//! The match simulation: an explicit state struct advanced one fixed tick
//! at a time. No wall clock is consulted anywhere — the recognizer clock is
//! derived from the tick counter, so a match replays exactly from its seed
//! and input stream.

use tracing::{debug, info};

use super::ai::ScriptedOpponent;
use super::combat::CombatEngine;
use super::input::TickInput;
use super::types::{Facing, Fighter, HitKind, MoveKind, Side, Winner};

/// Logical tick length; also the round-timer decrement per tick.
pub const TICK_MS: f32 = 1000.0 / 60.0;
pub const ROUND_TIME_MS: f32 = 60_000.0;
pub const ROUNDS_TO_WIN: u32 = 2;
/// Freeze-frame ticks applied to the whole simulation on impact.
pub const HIT_STOP_TICKS: u32 = 8;
pub const PLAYER1_SPAWN_X: f32 = 200.0;
pub const PLAYER2_SPAWN_X: f32 = 400.0;

const EFFECT_LIFETIME_TICKS: u32 = 20;
const EFFECT_RISE_PX: f32 = 40.0;

/// Transient impact flourish drawn by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEffect {
    pub kind: HitKind,
    pub x: f32,
    pub y: f32,
    pub frame: u32,
}

#[derive(Debug)]
pub struct Simulation {
    pub fighters: [Fighter; 2],
    pub round: u32,
    pub round_timer_ms: f32,
    pub round_wins: [u32; 2],
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub frame_count: u64,
    pub hit_stop: u32,
    pub effects: Vec<HitEffect>,
    engine: CombatEngine,
    opponent: ScriptedOpponent,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        Self {
            fighters: [
                Fighter::new(PLAYER1_SPAWN_X, Facing::Right),
                Fighter::new(PLAYER2_SPAWN_X, Facing::Left),
            ],
            round: 1,
            round_timer_ms: ROUND_TIME_MS,
            round_wins: [0, 0],
            game_over: false,
            winner: None,
            frame_count: 0,
            hit_stop: 0,
            effects: Vec::new(),
            engine: CombatEngine::new(),
            opponent: ScriptedOpponent::new(seed),
        }
    }

    /// Advances the match by one fixed tick. Impact effects keep animating
    /// through hit-stop and after the match ends; everything else freezes.
    pub fn tick(&mut self, input: &TickInput) {
        self.advance_effects();

        if self.game_over {
            return;
        }
        if self.hit_stop > 0 {
            self.hit_stop -= 1;
            return;
        }

        self.frame_count += 1;
        let now_ms = sim_now_ms(self.frame_count);
        let [player1, player2] = &mut self.fighters;

        CombatEngine::update_facing(player1, player2);

        // Human side: movement, guard, then buffered inputs. Held
        // directions go in ahead of this tick's button edges so a basic
        // attack always resolves from the button itself.
        self.engine.handle_movement(player1, input.direction);
        apply_block_intent(player1, input.blocking);
        for direction in &input.held_directions {
            self.engine.add_input(Side::Player1, *direction, now_ms);
        }
        for attack in &input.pressed_attacks {
            self.engine.add_input(Side::Player1, *attack, now_ms);
        }
        if let Some(move_id) = self.engine.next_move(player1, Side::Player1, now_ms) {
            self.engine.execute_move(player1, move_id);
            debug!(side = "player1", move_id, "move_executed");
        }

        // Scripted side, through the exact same engine calls.
        if player2.stun_frames == 0 && player2.move_kind.is_free() {
            let decision = self.opponent.decide(player2, player1, self.frame_count);
            self.engine.handle_movement(player2, decision.movement);
            apply_block_intent(player2, decision.block);
            for fight_input in &decision.attack_inputs {
                self.engine.add_input(Side::Player2, *fight_input, now_ms);
            }
        }
        if let Some(move_id) = self.engine.next_move(player2, Side::Player2, now_ms) {
            self.engine.execute_move(player2, move_id);
            debug!(side = "player2", move_id, "move_executed");
        }

        self.engine.update_frame(player1);
        self.engine.update_frame(player2);

        if let Some(report) = self.engine.check_hits(player1, player2) {
            self.engine
                .apply_hit(player1, player2, report.damage, report.kind);
            self.hit_stop = HIT_STOP_TICKS;
            self.effects.push(HitEffect {
                kind: report.kind,
                x: player2.x,
                y: player2.y - EFFECT_RISE_PX,
                frame: 0,
            });
        }
        if let Some(report) = self.engine.check_hits(player2, player1) {
            self.engine
                .apply_hit(player2, player1, report.damage, report.kind);
            self.hit_stop = HIT_STOP_TICKS;
            self.effects.push(HitEffect {
                kind: report.kind,
                x: player1.x,
                y: player1.y - EFFECT_RISE_PX,
                frame: 0,
            });
        }

        self.round_timer_ms -= TICK_MS;
        self.resolve_round_end();
    }

    /// KO or timer expiry ends the round; the higher-health side takes it.
    /// The win count is committed before the match-end comparison reads it.
    fn resolve_round_end(&mut self) {
        let [player1, player2] = &self.fighters;
        let round_done =
            player1.health <= 0 || player2.health <= 0 || self.round_timer_ms <= 0.0;
        if !round_done {
            return;
        }

        let winner = if player1.health > player2.health {
            Winner::Player1
        } else {
            Winner::Player2
        };
        let winner_index = match winner {
            Winner::Player1 => 0,
            Winner::Player2 => 1,
        };
        self.round_wins[winner_index] += 1;
        info!(
            round = self.round,
            winner = ?winner,
            wins = self.round_wins[winner_index],
            "round_ended"
        );

        if self.round_wins[winner_index] >= ROUNDS_TO_WIN {
            self.game_over = true;
            self.winner = Some(winner);
            info!(winner = ?winner, rounds = self.round, "match_ended");
        } else {
            self.round += 1;
            self.round_timer_ms = ROUND_TIME_MS;
            self.fighters = [
                Fighter::new(PLAYER1_SPAWN_X, Facing::Right),
                Fighter::new(PLAYER2_SPAWN_X, Facing::Left),
            ];
            info!(round = self.round, "round_started");
        }
    }

    fn advance_effects(&mut self) {
        self.effects.retain_mut(|effect| {
            effect.frame += 1;
            effect.frame < EFFECT_LIFETIME_TICKS
        });
    }
}

/// Simulation clock in milliseconds, derived purely from the tick counter.
fn sim_now_ms(frame_count: u64) -> u64 {
    frame_count * 1000 / 60
}

/// Guard entry and release. Entering requires a neutral or crouching
/// fighter; releasing only ever leaves a guard state.
fn apply_block_intent(fighter: &mut Fighter, wants_block: bool) {
    if wants_block && matches!(fighter.move_kind, MoveKind::Idle | MoveKind::Crouch) {
        fighter.move_kind = if fighter.crouching {
            MoveKind::BlockCrouch
        } else {
            MoveKind::BlockStand
        };
        fighter.blocking = true;
    } else if !wants_block && fighter.move_kind.is_block() {
        fighter.move_kind = MoveKind::Idle;
        fighter.blocking = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight::types::{FightInput, MAX_HEALTH};

    fn press(attack: FightInput) -> TickInput {
        TickInput {
            pressed_attacks: vec![attack],
            ..TickInput::default()
        }
    }

    /// Parks the opponent: stunned fighters neither move nor act, but they
    /// can still be hit.
    fn pin_player2(sim: &mut Simulation, x: f32, stun: u32) {
        sim.fighters[1].x = x;
        sim.fighters[1].stun_frames = stun;
    }

    #[test]
    fn new_simulation_spawns_the_canonical_round_state() {
        let sim = Simulation::new(1);
        assert_eq!(sim.fighters[0].x, PLAYER1_SPAWN_X);
        assert_eq!(sim.fighters[1].x, PLAYER2_SPAWN_X);
        assert_eq!(sim.round, 1);
        assert_eq!(sim.round_timer_ms, ROUND_TIME_MS);
        assert!(!sim.game_over);
        assert_eq!(sim.hit_stop, 0);
    }

    #[test]
    fn jab_scenario_lands_for_eight_damage_with_stun_and_hit_stop() {
        let mut sim = Simulation::new(1);
        pin_player2(&mut sim, 235.0, 60);

        sim.tick(&press(FightInput::PunchLight));
        assert_eq!(sim.fighters[0].move_kind, MoveKind::Jab);

        let mut landed_at = None;
        for tick_index in 0..20u32 {
            if sim.fighters[1].health < MAX_HEALTH {
                landed_at = Some(tick_index);
                break;
            }
            sim.tick(&TickInput::default());
        }

        assert!(landed_at.is_some(), "jab never connected");
        assert_eq!(sim.fighters[1].health, 92);
        assert_eq!(sim.fighters[1].stun_frames, 12);
        assert_eq!(sim.fighters[1].move_kind, MoveKind::HitStun);
        assert_eq!(sim.hit_stop, HIT_STOP_TICKS);
        assert_eq!(sim.effects.len(), 1);
        assert_eq!(sim.effects[0].kind, HitKind::Hit);
    }

    #[test]
    fn hit_stop_freezes_the_simulation_while_counting_down() {
        let mut sim = Simulation::new(1);
        sim.hit_stop = 3;
        sim.fighters[0].velocity_x = 5.0;
        let frozen_x = sim.fighters[0].x;
        let frozen_frame = sim.frame_count;

        sim.tick(&TickInput::default());
        assert_eq!(sim.hit_stop, 2);
        assert_eq!(sim.fighters[0].x, frozen_x);
        assert_eq!(sim.frame_count, frozen_frame);

        sim.tick(&TickInput::default());
        sim.tick(&TickInput::default());
        assert_eq!(sim.hit_stop, 0);

        sim.tick(&TickInput::default());
        assert_eq!(sim.frame_count, frozen_frame + 1);
    }

    #[test]
    fn effects_keep_animating_through_hit_stop_and_expire() {
        let mut sim = Simulation::new(1);
        sim.hit_stop = 30;
        sim.effects.push(HitEffect {
            kind: HitKind::Hit,
            x: 300.0,
            y: 260.0,
            frame: 0,
        });

        for _ in 0..5 {
            sim.tick(&TickInput::default());
        }
        assert_eq!(sim.effects[0].frame, 5);

        for _ in 0..20 {
            sim.tick(&TickInput::default());
        }
        assert!(sim.effects.is_empty());
    }

    #[test]
    fn blocking_input_raises_and_releases_the_guard() {
        let mut sim = Simulation::new(1);
        let guard = TickInput {
            blocking: true,
            ..TickInput::default()
        };
        sim.tick(&guard);
        assert_eq!(sim.fighters[0].move_kind, MoveKind::BlockStand);
        assert!(sim.fighters[0].blocking);

        sim.tick(&TickInput::default());
        assert_eq!(sim.fighters[0].move_kind, MoveKind::Idle);
        assert!(!sim.fighters[0].blocking);
    }

    #[test]
    fn crouch_guard_comes_from_holding_down_and_block() {
        let mut sim = Simulation::new(1);
        let low_guard = TickInput {
            direction: Some(FightInput::Down),
            blocking: true,
            held_directions: vec![FightInput::Down],
            ..TickInput::default()
        };
        sim.tick(&low_guard);
        assert_eq!(sim.fighters[0].move_kind, MoveKind::BlockCrouch);
        assert!(sim.fighters[0].crouching);
    }

    #[test]
    fn round_timer_expiry_awards_the_healthier_side_and_resets() {
        let mut sim = Simulation::new(1);
        sim.round_timer_ms = TICK_MS * 0.5;
        sim.fighters[0].health = 80;
        sim.fighters[1].health = 50;

        sim.tick(&TickInput::default());
        assert_eq!(sim.round_wins, [1, 0]);
        assert_eq!(sim.round, 2);
        assert_eq!(sim.round_timer_ms, ROUND_TIME_MS);
        assert_eq!(sim.fighters[0].health, MAX_HEALTH);
        assert_eq!(sim.fighters[0].x, PLAYER1_SPAWN_X);
        assert_eq!(sim.fighters[1].x, PLAYER2_SPAWN_X);
        assert!(!sim.game_over);
    }

    #[test]
    fn second_round_win_ends_the_match() {
        let mut sim = Simulation::new(1);
        sim.round = 2;
        sim.round_wins = [1, 0];
        sim.round_timer_ms = TICK_MS * 0.5;
        sim.fighters[0].health = 60;
        sim.fighters[1].health = 10;

        sim.tick(&TickInput::default());
        assert!(sim.game_over);
        assert_eq!(sim.winner, Some(Winner::Player1));
        assert_eq!(sim.round_wins, [2, 0]);
    }

    #[test]
    fn match_end_reads_the_committed_win_count() {
        // One round each; the deciding round must end the match off the
        // freshly incremented count, never a stale snapshot.
        let mut sim = Simulation::new(1);
        sim.round = 3;
        sim.round_wins = [1, 1];
        sim.round_timer_ms = TICK_MS * 0.5;
        sim.fighters[0].health = 20;
        sim.fighters[1].health = 90;

        sim.tick(&TickInput::default());
        assert!(sim.game_over);
        assert_eq!(sim.winner, Some(Winner::Player2));
        assert_eq!(sim.round_wins, [1, 2]);
    }

    #[test]
    fn knockout_ends_the_round_immediately() {
        let mut sim = Simulation::new(1);
        sim.fighters[1].health = 0;
        sim.tick(&TickInput::default());
        assert_eq!(sim.round_wins, [1, 0]);
        assert_eq!(sim.round, 2);
    }

    #[test]
    fn game_over_freezes_everything_but_effects() {
        let mut sim = Simulation::new(1);
        sim.game_over = true;
        sim.effects.push(HitEffect {
            kind: HitKind::Block,
            x: 300.0,
            y: 260.0,
            frame: 0,
        });
        let frame_before = sim.frame_count;

        sim.tick(&press(FightInput::PunchLight));
        assert_eq!(sim.frame_count, frame_before);
        assert_eq!(sim.fighters[0].move_kind, MoveKind::Idle);
        assert_eq!(sim.effects[0].frame, 1);
    }

    #[test]
    fn facing_swaps_when_fighters_cross() {
        let mut sim = Simulation::new(1);
        sim.fighters[0].x = 500.0;
        sim.fighters[1].x = 100.0;
        sim.tick(&TickInput::default());
        assert_eq!(sim.fighters[0].facing, Facing::Left);
        assert_eq!(sim.fighters[1].facing, Facing::Right);
    }

    #[test]
    fn same_seed_and_inputs_replay_identically() {
        let script = |tick_index: u64| -> TickInput {
            match tick_index % 40 {
                0 => press(FightInput::PunchLight),
                7 => TickInput {
                    direction: Some(FightInput::Forward),
                    held_directions: vec![FightInput::Forward],
                    ..TickInput::default()
                },
                20 => press(FightInput::KickHeavy),
                _ => TickInput::default(),
            }
        };

        let mut first = Simulation::new(42);
        let mut second = Simulation::new(42);
        for tick_index in 0..600 {
            first.tick(&script(tick_index));
            second.tick(&script(tick_index));
        }

        assert_eq!(first.fighters, second.fighters);
        assert_eq!(first.round_wins, second.round_wins);
        assert_eq!(first.frame_count, second.frame_count);
    }

    #[test]
    fn sim_clock_advances_in_whole_milliseconds() {
        assert_eq!(sim_now_ms(0), 0);
        assert_eq!(sim_now_ms(60), 1000);
        assert_eq!(sim_now_ms(6), 100);
        assert!(sim_now_ms(7) - sim_now_ms(6) >= 16);
    }
}
