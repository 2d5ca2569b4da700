//! Scripted opponent. Distance-threshold footsies, a probabilistic attack
//! roll on a fixed frame cadence, and a reactive block against an incoming
//! strike. All randomness comes from a seeded stream, so a match replays
//! identically for the same seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::types::{Facing, FightInput, Fighter};

/// Tunable behavior parameters. Thresholds are cumulative probability cuts
/// over a single uniform roll.
pub const APPROACH_DISTANCE: f32 = 100.0;
pub const RETREAT_DISTANCE: f32 = 50.0;
pub const ATTACK_RANGE: f32 = 80.0;
pub const ATTACK_CADENCE_FRAMES: u64 = 30;
pub const LIGHT_PUNCH_THRESHOLD: f32 = 0.3;
pub const HEAVY_PUNCH_THRESHOLD: f32 = 0.5;
pub const LIGHT_KICK_THRESHOLD: f32 = 0.7;
pub const HEAVY_KICK_THRESHOLD: f32 = 0.85;
pub const BLOCK_REACTION_CHANCE: f32 = 0.3;

/// What the opponent wants to do this tick. The simulation applies it with
/// the same engine calls the human player goes through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub movement: Option<FightInput>,
    pub attack_inputs: Vec<FightInput>,
    pub block: bool,
}

#[derive(Debug)]
pub struct ScriptedOpponent {
    rng: ChaCha8Rng,
}

impl ScriptedOpponent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Called only while the opponent is free to act (idle or holding a
    /// block); the caller gates on stun and move state.
    pub fn decide(&mut self, me: &Fighter, foe: &Fighter, frame: u64) -> Decision {
        let mut decision = Decision::default();
        let distance = (foe.x - me.x).abs();

        if distance > APPROACH_DISTANCE {
            decision.movement = Some(self.approach_direction(me, foe));
        } else if distance < RETREAT_DISTANCE {
            decision.movement = Some(FightInput::Back);
        }

        if distance < ATTACK_RANGE && frame % ATTACK_CADENCE_FRAMES == 0 {
            decision.attack_inputs = self.roll_attack();
        }

        if foe.move_kind.is_strike() {
            decision.block =
                me.move_kind.is_block() || self.rng.gen::<f32>() < BLOCK_REACTION_CHANCE;
        }

        decision
    }

    /// Forward closes distance only when already facing the foe; otherwise
    /// back away until the facing update comes around.
    fn approach_direction(&self, me: &Fighter, foe: &Fighter) -> FightInput {
        let foe_is_right = foe.x > me.x;
        let facing_foe = (foe_is_right && me.facing == Facing::Right)
            || (!foe_is_right && me.facing == Facing::Left);
        if facing_foe {
            FightInput::Forward
        } else {
            FightInput::Back
        }
    }

    fn roll_attack(&mut self) -> Vec<FightInput> {
        let roll: f32 = self.rng.gen();
        if roll < LIGHT_PUNCH_THRESHOLD {
            vec![FightInput::PunchLight]
        } else if roll < HEAVY_PUNCH_THRESHOLD {
            vec![FightInput::PunchHeavy]
        } else if roll < LIGHT_KICK_THRESHOLD {
            vec![FightInput::KickLight]
        } else if roll < HEAVY_KICK_THRESHOLD {
            vec![FightInput::KickHeavy]
        } else {
            // Attempt the uppercut command.
            vec![FightInput::Down, FightInput::Forward, FightInput::PunchHeavy]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight::types::MoveKind;

    fn fighters_at(me_x: f32, foe_x: f32) -> (Fighter, Fighter) {
        let mut me = Fighter::new(me_x, Facing::Left);
        let foe = Fighter::new(foe_x, Facing::Right);
        if foe_x > me_x {
            me.facing = Facing::Right;
        }
        (me, foe)
    }

    #[test]
    fn same_seed_yields_identical_decision_streams() {
        let (me, foe) = fighters_at(400.0, 340.0);
        let mut first = ScriptedOpponent::new(7);
        let mut second = ScriptedOpponent::new(7);
        for frame in 0..240 {
            assert_eq!(
                first.decide(&me, &foe, frame),
                second.decide(&me, &foe, frame)
            );
        }
    }

    #[test]
    fn approaches_when_far_and_facing_the_foe() {
        let (me, foe) = fighters_at(400.0, 200.0);
        let mut ai = ScriptedOpponent::new(1);
        let decision = ai.decide(&me, &foe, 1);
        assert_eq!(decision.movement, Some(FightInput::Forward));
    }

    #[test]
    fn backs_off_when_facing_away_from_a_distant_foe() {
        let (mut me, foe) = fighters_at(400.0, 200.0);
        me.facing = Facing::Right;
        let mut ai = ScriptedOpponent::new(1);
        let decision = ai.decide(&me, &foe, 1);
        assert_eq!(decision.movement, Some(FightInput::Back));
    }

    #[test]
    fn retreats_when_too_close() {
        let (me, foe) = fighters_at(400.0, 370.0);
        let mut ai = ScriptedOpponent::new(1);
        let decision = ai.decide(&me, &foe, 1);
        assert_eq!(decision.movement, Some(FightInput::Back));
    }

    #[test]
    fn holds_ground_in_the_neutral_band() {
        let (me, foe) = fighters_at(400.0, 330.0);
        let mut ai = ScriptedOpponent::new(1);
        let decision = ai.decide(&me, &foe, 1);
        assert_eq!(decision.movement, None);
    }

    #[test]
    fn attacks_only_on_the_cadence_frame_and_in_range() {
        let (me, foe) = fighters_at(400.0, 340.0);
        let mut ai = ScriptedOpponent::new(2);

        for frame in 1..ATTACK_CADENCE_FRAMES {
            assert!(ai.decide(&me, &foe, frame).attack_inputs.is_empty());
        }
        assert!(!ai
            .decide(&me, &foe, ATTACK_CADENCE_FRAMES)
            .attack_inputs
            .is_empty());
    }

    #[test]
    fn never_attacks_from_outside_attack_range() {
        let (me, foe) = fighters_at(400.0, 310.0);
        let mut ai = ScriptedOpponent::new(3);
        for multiple in 1..=8u64 {
            let decision = ai.decide(&me, &foe, multiple * ATTACK_CADENCE_FRAMES);
            assert!(decision.attack_inputs.is_empty());
        }
    }

    #[test]
    fn rolled_attacks_end_with_a_button() {
        let (me, foe) = fighters_at(400.0, 340.0);
        let mut ai = ScriptedOpponent::new(4);
        for multiple in 1..=32u64 {
            let decision = ai.decide(&me, &foe, multiple * ATTACK_CADENCE_FRAMES);
            let last = decision.attack_inputs.last().expect("attack on cadence");
            assert!(!last.is_direction());
        }
    }

    #[test]
    fn blocks_only_against_an_active_strike() {
        let (me, mut foe) = fighters_at(400.0, 340.0);
        let mut ai = ScriptedOpponent::new(5);

        let calm = ai.decide(&me, &foe, 1);
        assert!(!calm.block);

        foe.move_kind = MoveKind::HighKick;
        let blocked_any = (0..60).any(|frame| ai.decide(&me, &foe, frame).block);
        assert!(blocked_any, "never rolled a block in 60 tries");
    }

    #[test]
    fn an_established_block_holds_while_the_strike_lasts() {
        let (mut me, mut foe) = fighters_at(400.0, 340.0);
        foe.move_kind = MoveKind::Jab;
        me.move_kind = MoveKind::BlockStand;
        let mut ai = ScriptedOpponent::new(6);
        for frame in 0..30 {
            assert!(ai.decide(&me, &foe, frame).block);
        }

        foe.move_kind = MoveKind::Idle;
        assert!(!ai.decide(&me, &foe, 31).block);
    }
}
