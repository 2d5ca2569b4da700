//! The fight scene: translates input snapshots into simulation ticks,
//! paints the arena, fighters, HUD and on-screen pad, and records match
//! results into the roster store.

use std::f32::consts::TAU;

use engine::{Canvas, Color, InputAction, InputSnapshot, PadButton, PadRect, Scene};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::animation;
use super::input::TickInput;
use super::roster::{self, KvStore, PlayerRecord};
use super::sim::{HitEffect, Simulation};
use super::types::{Fighter, HitKind, Winner, MAX_HEALTH, MAX_METER};

pub const SURFACE_WIDTH: u32 = 600;
pub const SURFACE_HEIGHT: u32 = 400;
/// The arena occupies the top of the surface; the pad strip sits below.
pub const ARENA_HEIGHT: i32 = 320;

const BACKGROUND_COLOR: Color = [240, 240, 240, 255];
const GRID_COLOR: Color = [221, 221, 221, 255];
const GRID_SPACING: i32 = 20;
const STAGE_COLOR: Color = [136, 136, 136, 255];
const PLAYER1_COLOR: Color = [0, 0, 0, 255];
const PLAYER2_COLOR: Color = [102, 102, 102, 255];
const HUD_BACKDROP_COLOR: Color = [0, 0, 0, 204];
const HUD_TEXT_COLOR: Color = [255, 255, 255, 255];
const COMBO_TEXT_COLOR: Color = [255, 215, 0, 255];
const HEALTH_OK_COLOR: Color = [74, 222, 128, 255];
const HEALTH_LOW_COLOR: Color = [239, 68, 68, 255];
const METER_COLOR: Color = [251, 191, 36, 255];
const BAR_BACKDROP_COLOR: Color = [255, 255, 255, 51];
const OVERLAY_COLOR: Color = [0, 0, 0, 230];
const PAD_STRIP_COLOR: Color = [31, 41, 55, 255];
const PAD_BUTTON_COLOR: Color = [75, 85, 99, 255];
const PAD_ATTACK_COLOR: Color = [153, 27, 27, 255];
const HURT_BOX_COLOR: Color = [0, 100, 255, 128];
const HIT_BOX_COLOR: Color = [255, 0, 0, 128];
const HIT_BOX_FILL_COLOR: Color = [255, 0, 0, 51];

const EFFECT_FADE_TICKS: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FightPhase {
    Ready,
    Playing,
    GameOver,
}

pub struct FightScene {
    store: Box<dyn KvStore>,
    rng: ChaCha8Rng,
    username: String,
    opponent_name: String,
    phase: FightPhase,
    sim: Simulation,
    show_boxes: bool,
}

impl FightScene {
    pub fn new(store: Box<dyn KvStore>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let username = roster::random_fighter_name(&mut rng);
        let opponent_name = roster::random_opponent(store.as_ref(), &mut rng)
            .map(|record| record.name)
            .unwrap_or_else(|| "CPU".to_string());
        let match_seed = rng.gen();
        Self {
            store,
            rng,
            username,
            opponent_name,
            phase: FightPhase::Ready,
            sim: Simulation::new(match_seed),
            show_boxes: false,
        }
    }

    fn start_match(&mut self) {
        self.sim = Simulation::new(self.rng.gen());
        self.phase = FightPhase::Playing;
        info!(
            fighter = %self.username,
            opponent = %self.opponent_name,
            "match_started"
        );
    }

    fn finish_match(&mut self) {
        let won = self.sim.winner == Some(Winner::Player1);
        if won {
            roster::record_wins(self.store.as_mut(), &self.username, 1);
        }
        roster::save_player(
            self.store.as_mut(),
            PlayerRecord {
                name: self.username.clone(),
                wins: u32::from(won),
                losses: u32::from(!won),
            },
        );
        self.phase = FightPhase::GameOver;
    }

    #[cfg(test)]
    fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }
}

impl Scene for FightScene {
    fn load(&mut self) {
        info!(
            fighter = %self.username,
            opponent = %self.opponent_name,
            "fight_scene_loaded"
        );
    }

    fn update(&mut self, input: &InputSnapshot) {
        if input.was_pressed(InputAction::ToggleBoxes) {
            self.show_boxes = !self.show_boxes;
            info!(show_boxes = self.show_boxes, "boxes_overlay_toggled");
        }

        match self.phase {
            FightPhase::Ready | FightPhase::GameOver => {
                if input.was_pressed(InputAction::PunchLight) {
                    self.start_match();
                }
            }
            FightPhase::Playing => {
                let tick_input = TickInput::from_snapshot(input);
                self.sim.tick(&tick_input);
                if self.sim.game_over {
                    self.finish_match();
                }
            }
        }
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        draw_backdrop(canvas);
        draw_stage(canvas);

        if self.phase != FightPhase::Ready {
            let [player1, player2] = &self.sim.fighters;
            draw_fighter(canvas, player1, PLAYER1_COLOR);
            draw_fighter(canvas, player2, PLAYER2_COLOR);

            if self.show_boxes {
                draw_boxes_overlay(canvas, player1);
                draw_boxes_overlay(canvas, player2);
            }
            for effect in &self.sim.effects {
                draw_hit_effect(canvas, effect);
            }
            draw_hud(
                canvas,
                &self.sim,
                &self.username,
                &self.opponent_name,
                self.show_boxes,
            );
        }

        draw_pad(canvas);

        match self.phase {
            FightPhase::Ready => draw_ready_overlay(canvas, &self.username, &self.opponent_name),
            FightPhase::GameOver => {
                draw_game_over_overlay(canvas, self.sim.winner == Some(Winner::Player1))
            }
            FightPhase::Playing => {}
        }
    }

    fn unload(&mut self) {
        info!(fighter = %self.username, "fight_scene_unloaded");
    }
}

/// Pad regions handed to the loop runner; labels live in `PAD_BUTTONS`.
pub fn pad_layout() -> Vec<PadButton> {
    PAD_BUTTONS.iter().map(|(button, _)| *button).collect()
}

const PAD_BUTTONS: &[(PadButton, &str)] = &[
    (
        PadButton {
            rect: PadRect {
                x: 52.0,
                y: 325.0,
                width: 40.0,
                height: 30.0,
            },
            action: InputAction::Up,
        },
        "UP",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 52.0,
                y: 365.0,
                width: 40.0,
                height: 30.0,
            },
            action: InputAction::Down,
        },
        "DN",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 8.0,
                y: 345.0,
                width: 40.0,
                height: 30.0,
            },
            action: InputAction::Left,
        },
        "BK",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 96.0,
                y: 345.0,
                width: 40.0,
                height: 30.0,
            },
            action: InputAction::Right,
        },
        "FW",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 255.0,
                y: 340.0,
                width: 90.0,
                height: 40.0,
            },
            action: InputAction::Block,
        },
        "BLOCK",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 430.0,
                y: 326.0,
                width: 75.0,
                height: 32.0,
            },
            action: InputAction::PunchLight,
        },
        "LP",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 513.0,
                y: 326.0,
                width: 75.0,
                height: 32.0,
            },
            action: InputAction::PunchHeavy,
        },
        "HP",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 430.0,
                y: 363.0,
                width: 75.0,
                height: 32.0,
            },
            action: InputAction::KickLight,
        },
        "LK",
    ),
    (
        PadButton {
            rect: PadRect {
                x: 513.0,
                y: 363.0,
                width: 75.0,
                height: 32.0,
            },
            action: InputAction::KickHeavy,
        },
        "HK",
    ),
];

fn draw_backdrop(canvas: &mut Canvas<'_>) {
    canvas.clear(BACKGROUND_COLOR);
    for x in (0..=SURFACE_WIDTH as i32).step_by(GRID_SPACING as usize) {
        canvas.line(x, 0, x, ARENA_HEIGHT, GRID_COLOR);
    }
    for y in (0..=ARENA_HEIGHT).step_by(GRID_SPACING as usize) {
        canvas.line(0, y, SURFACE_WIDTH as i32, y, GRID_COLOR);
    }
}

fn draw_stage(canvas: &mut Canvas<'_>) {
    canvas.fill_rect(0, 280, SURFACE_WIDTH as i32, 20, STAGE_COLOR);
}

fn draw_fighter(canvas: &mut Canvas<'_>, fighter: &Fighter, color: Color) {
    let skeleton = animation::pose(
        fighter.move_kind,
        fighter.move_frame,
        fighter.facing,
        fighter.grounded,
    );
    let ox = fighter.x;
    let oy = fighter.y;
    let px = |x: f32| (ox + x).round() as i32;
    let py = |y: f32| (oy + y).round() as i32;

    canvas.stroke_circle(
        px(skeleton.head.x),
        py(skeleton.head.y),
        skeleton.head_radius.round() as i32,
        color,
    );

    let segments = [
        (skeleton.neck, skeleton.spine),
        (skeleton.spine, skeleton.hips),
        (skeleton.left_shoulder, skeleton.left_elbow),
        (skeleton.left_elbow, skeleton.left_hand),
        (skeleton.right_shoulder, skeleton.right_elbow),
        (skeleton.right_elbow, skeleton.right_hand),
        (skeleton.left_hip, skeleton.left_knee),
        (skeleton.left_knee, skeleton.left_foot),
        (skeleton.right_hip, skeleton.right_knee),
        (skeleton.right_knee, skeleton.right_foot),
    ];
    for (from, to) in segments {
        canvas.line(px(from.x), py(from.y), px(to.x), py(to.y), color);
    }

    draw_status_bars(canvas, fighter, py(skeleton.head.y));
}

fn draw_status_bars(canvas: &mut Canvas<'_>, fighter: &Fighter, head_y: i32) {
    const BAR_WIDTH: i32 = 60;
    let bar_x = fighter.x.round() as i32 - BAR_WIDTH / 2;
    let bar_y = head_y - 20;

    let health_fraction = fighter.health as f32 / MAX_HEALTH as f32;
    let health_color = if health_fraction > 0.3 {
        HEALTH_OK_COLOR
    } else {
        HEALTH_LOW_COLOR
    };
    canvas.fill_rect(bar_x, bar_y, BAR_WIDTH, 6, BAR_BACKDROP_COLOR);
    canvas.fill_rect(
        bar_x,
        bar_y,
        (BAR_WIDTH as f32 * health_fraction) as i32,
        6,
        health_color,
    );

    let meter_y = bar_y + 8;
    canvas.fill_rect(bar_x, meter_y, BAR_WIDTH, 4, BAR_BACKDROP_COLOR);
    canvas.fill_rect(
        bar_x,
        meter_y,
        (BAR_WIDTH as f32 * fighter.meter / MAX_METER) as i32,
        4,
        METER_COLOR,
    );
}

fn draw_hud(
    canvas: &mut Canvas<'_>,
    sim: &Simulation,
    username: &str,
    opponent_name: &str,
    show_boxes: bool,
) {
    let width = SURFACE_WIDTH as i32;
    canvas.fill_rect(0, 0, width, 40, HUD_BACKDROP_COLOR);

    let seconds_left = (sim.round_timer_ms / 1000.0).ceil().max(0.0) as i32;
    canvas.text_centered(width / 2, 14, &seconds_left.to_string(), HUD_TEXT_COLOR);

    let left_label = format!("{username} [{}]", sim.round_wins[0]);
    canvas.text(10, 14, &left_label, HUD_TEXT_COLOR);
    let right_label = format!("[{}] {opponent_name}", sim.round_wins[1]);
    canvas.text_right(width - 10, 14, &right_label, HUD_TEXT_COLOR);

    let combo = &sim.fighters[0];
    if combo.combo_count > 1 {
        canvas.text_centered(
            width / 2,
            70,
            &format!("{} HIT COMBO!", combo.combo_count),
            COMBO_TEXT_COLOR,
        );
        canvas.text_centered(
            width / 2,
            90,
            &format!("{} DMG", combo.combo_damage),
            COMBO_TEXT_COLOR,
        );
    }

    if show_boxes {
        canvas.text_right(width - 10, ARENA_HEIGHT - 16, "BOXES ON", COMBO_TEXT_COLOR);
    }
}

fn draw_boxes_overlay(canvas: &mut Canvas<'_>, fighter: &Fighter) {
    let frame_boxes = animation::boxes(
        fighter.move_kind,
        fighter.move_frame,
        fighter.x,
        fighter.y,
        fighter.facing,
    );
    for hurt in &frame_boxes.hurt {
        canvas.stroke_rect(
            hurt.x.round() as i32,
            hurt.y.round() as i32,
            hurt.width.round() as i32,
            hurt.height.round() as i32,
            HURT_BOX_COLOR,
        );
    }
    for hit in &frame_boxes.hit {
        canvas.fill_rect(
            hit.x.round() as i32,
            hit.y.round() as i32,
            hit.width.round() as i32,
            hit.height.round() as i32,
            HIT_BOX_FILL_COLOR,
        );
        canvas.stroke_rect(
            hit.x.round() as i32,
            hit.y.round() as i32,
            hit.width.round() as i32,
            hit.height.round() as i32,
            HIT_BOX_COLOR,
        );
    }
}

fn draw_hit_effect(canvas: &mut Canvas<'_>, effect: &HitEffect) {
    let fade = (1.0 - effect.frame as f32 / EFFECT_FADE_TICKS).max(0.0);
    let alpha = (fade * 255.0) as u8;
    if alpha == 0 {
        return;
    }
    let x = effect.x.round() as i32;
    let y = effect.y.round() as i32;

    match effect.kind {
        HitKind::Hit => {
            let burst = (effect.frame * 4) as f32;
            for spoke in 0..8 {
                let angle = spoke as f32 / 8.0 * TAU;
                canvas.line(
                    x,
                    y,
                    x + (angle.cos() * burst) as i32,
                    y + (angle.sin() * burst) as i32,
                    [255, 255, 100, alpha],
                );
            }
        }
        HitKind::Block => {
            canvas.stroke_circle(x, y, 20 + effect.frame as i32 * 2, [100, 200, 255, alpha]);
        }
        HitKind::Launcher => {
            for column in -2i32..=2 {
                let line_x = x + column * 10;
                canvas.line(
                    line_x,
                    y,
                    line_x,
                    y - effect.frame as i32 * 5,
                    [255, 200, 0, alpha],
                );
            }
        }
    }
}

fn draw_pad(canvas: &mut Canvas<'_>) {
    canvas.fill_rect(
        0,
        ARENA_HEIGHT,
        SURFACE_WIDTH as i32,
        SURFACE_HEIGHT as i32 - ARENA_HEIGHT,
        PAD_STRIP_COLOR,
    );
    for (button, label) in PAD_BUTTONS {
        let rect = button.rect;
        let color = match button.action {
            InputAction::PunchLight
            | InputAction::PunchHeavy
            | InputAction::KickLight
            | InputAction::KickHeavy => PAD_ATTACK_COLOR,
            _ => PAD_BUTTON_COLOR,
        };
        let x = rect.x.round() as i32;
        let y = rect.y.round() as i32;
        let w = rect.width.round() as i32;
        let h = rect.height.round() as i32;
        canvas.fill_rect(x, y, w, h, color);
        canvas.stroke_rect(x, y, w, h, PAD_STRIP_COLOR);
        canvas.text_centered(x + w / 2, y + h / 2 - 5, label, HUD_TEXT_COLOR);
    }
}

fn draw_ready_overlay(canvas: &mut Canvas<'_>, username: &str, opponent_name: &str) {
    let width = SURFACE_WIDTH as i32;
    canvas.fill_rect(0, 0, width, ARENA_HEIGHT, OVERLAY_COLOR);
    canvas.text_centered(width / 2, 70, "STICKFIGHT", HUD_TEXT_COLOR);
    canvas.text_centered(width / 2, 110, &format!("FIGHTER: {username}"), HUD_TEXT_COLOR);
    canvas.text_centered(
        width / 2,
        130,
        &format!("VS: {opponent_name}"),
        HUD_TEXT_COLOR,
    );
    canvas.text_centered(width / 2, 170, "PRESS LP TO START", COMBO_TEXT_COLOR);
    canvas.text_centered(width / 2, 210, "MOVE: WASD  BLOCK: U", HUD_TEXT_COLOR);
    canvas.text_centered(
        width / 2,
        230,
        "PUNCH: J K  KICK: L ;",
        HUD_TEXT_COLOR,
    );
    canvas.text_centered(width / 2, 250, "BOXES: BACKQUOTE", HUD_TEXT_COLOR);
}

fn draw_game_over_overlay(canvas: &mut Canvas<'_>, player_won: bool) {
    let width = SURFACE_WIDTH as i32;
    canvas.fill_rect(0, 0, width, ARENA_HEIGHT, OVERLAY_COLOR);
    let verdict = if player_won { "YOU WIN!" } else { "YOU LOSE!" };
    canvas.text_centered(width / 2, 130, verdict, COMBO_TEXT_COLOR);
    canvas.text_centered(width / 2, 170, "PRESS LP FOR REMATCH", HUD_TEXT_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight::roster::MemoryStore;
    use engine::InputSnapshot;

    fn scene_with_empty_store() -> FightScene {
        FightScene::new(Box::new(MemoryStore::new()), 11)
    }

    fn punch_edge() -> InputSnapshot {
        InputSnapshot::empty().with_action_pressed(InputAction::PunchLight)
    }

    #[test]
    fn new_scene_waits_on_the_ready_screen() {
        let scene = scene_with_empty_store();
        assert_eq!(scene.phase, FightPhase::Ready);
        assert!(!scene.username.is_empty());
        assert_eq!(scene.opponent_name, "CPU");
    }

    #[test]
    fn opponent_name_comes_from_the_stored_roster() {
        let mut store = MemoryStore::new();
        roster::save_player(
            &mut store,
            PlayerRecord {
                name: "ShadowViper9".to_string(),
                wins: 2,
                losses: 1,
            },
        );
        let scene = FightScene::new(Box::new(store), 11);
        assert_eq!(scene.opponent_name, "ShadowViper9");
    }

    #[test]
    fn light_punch_starts_the_match() {
        let mut scene = scene_with_empty_store();
        scene.update(&punch_edge());
        assert_eq!(scene.phase, FightPhase::Playing);
        assert_eq!(scene.sim.round, 1);
    }

    #[test]
    fn playing_ticks_advance_the_simulation() {
        let mut scene = scene_with_empty_store();
        scene.update(&punch_edge());
        let before = scene.sim.frame_count;
        scene.update(&InputSnapshot::empty());
        assert_eq!(scene.sim.frame_count, before + 1);
    }

    #[test]
    fn box_overlay_toggle_is_edge_driven() {
        let mut scene = scene_with_empty_store();
        let toggle = InputSnapshot::empty().with_action_pressed(InputAction::ToggleBoxes);
        scene.update(&toggle);
        assert!(scene.show_boxes);
        scene.update(&toggle);
        assert!(!scene.show_boxes);

        let held_only = InputSnapshot::empty().with_action_down(InputAction::ToggleBoxes, true);
        scene.update(&held_only);
        assert!(!scene.show_boxes);
    }

    #[test]
    fn winning_the_match_records_roster_and_leaderboard() {
        let mut scene = scene_with_empty_store();
        scene.update(&punch_edge());
        {
            let sim = scene.simulation_mut();
            sim.round_wins = [1, 0];
            sim.round_timer_ms = 1.0;
            sim.fighters[0].health = 90;
            sim.fighters[1].health = 10;
        }
        scene.update(&InputSnapshot::empty());

        assert_eq!(scene.phase, FightPhase::GameOver);
        let board = roster::leaderboard(scene.store.as_ref());
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, scene.username);
        assert_eq!(board[0].wins, 1);

        let players = roster::stored_players(scene.store.as_ref());
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].wins, 1);
        assert_eq!(players[0].losses, 0);
    }

    #[test]
    fn losing_the_match_records_only_the_roster() {
        let mut scene = scene_with_empty_store();
        scene.update(&punch_edge());
        {
            let sim = scene.simulation_mut();
            sim.round_wins = [0, 1];
            sim.round_timer_ms = 1.0;
            sim.fighters[0].health = 10;
            sim.fighters[1].health = 90;
        }
        scene.update(&InputSnapshot::empty());

        assert_eq!(scene.phase, FightPhase::GameOver);
        assert!(roster::leaderboard(scene.store.as_ref()).is_empty());
        let players = roster::stored_players(scene.store.as_ref());
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].losses, 1);
    }

    #[test]
    fn rematch_resets_to_a_fresh_simulation() {
        let mut scene = scene_with_empty_store();
        scene.update(&punch_edge());
        {
            let sim = scene.simulation_mut();
            sim.round_wins = [0, 1];
            sim.round_timer_ms = 1.0;
            sim.fighters[0].health = 10;
        }
        scene.update(&InputSnapshot::empty());
        assert_eq!(scene.phase, FightPhase::GameOver);

        scene.update(&punch_edge());
        assert_eq!(scene.phase, FightPhase::Playing);
        assert_eq!(scene.sim.frame_count, 0);
        assert_eq!(scene.sim.fighters[0].health, MAX_HEALTH);
        assert_eq!(scene.sim.round_wins, [0, 0]);
    }

    #[test]
    fn pad_layout_covers_all_nine_controls_inside_the_strip() {
        let layout = pad_layout();
        assert_eq!(layout.len(), 9);
        for button in &layout {
            assert!(button.rect.y >= ARENA_HEIGHT as f32);
            assert!(button.rect.y + button.rect.height <= SURFACE_HEIGHT as f32);
            assert!(button.rect.x >= 0.0);
            assert!(button.rect.x + button.rect.width <= SURFACE_WIDTH as f32);
        }
    }

    #[test]
    fn pad_buttons_do_not_overlap() {
        let layout = pad_layout();
        for (index, a) in layout.iter().enumerate() {
            for b in &layout[index + 1..] {
                let disjoint = a.rect.x + a.rect.width <= b.rect.x
                    || b.rect.x + b.rect.width <= a.rect.x
                    || a.rect.y + a.rect.height <= b.rect.y
                    || b.rect.y + b.rect.height <= a.rect.y;
                assert!(disjoint, "{:?} overlaps {:?}", a.action, b.action);
            }
        }
    }

    #[test]
    fn render_smoke_test_in_every_phase() {
        let mut scene = scene_with_empty_store();
        let mut frame = vec![0u8; (SURFACE_WIDTH * SURFACE_HEIGHT * 4) as usize];

        {
            let mut canvas = Canvas::new(&mut frame, SURFACE_WIDTH, SURFACE_HEIGHT);
            scene.render(&mut canvas);
        }
        assert!(frame.iter().any(|byte| *byte != 0));

        scene.update(&punch_edge());
        scene.show_boxes = true;
        scene.simulation_mut().effects.push(HitEffect {
            kind: HitKind::Hit,
            x: 300.0,
            y: 260.0,
            frame: 2,
        });
        {
            let mut canvas = Canvas::new(&mut frame, SURFACE_WIDTH, SURFACE_HEIGHT);
            scene.render(&mut canvas);
        }

        scene.simulation_mut().game_over = true;
        scene.simulation_mut().winner = Some(Winner::Player2);
        scene.update(&InputSnapshot::empty());
        {
            let mut canvas = Canvas::new(&mut frame, SURFACE_WIDTH, SURFACE_HEIGHT);
            scene.render(&mut canvas);
        }
    }
}
