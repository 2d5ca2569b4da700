//! Procedural skeleton poses and hit/hurt rectangle generation. Both
//! functions are pure: identical inputs always produce identical geometry,
//! so replays and tests never need a live simulation.

use std::f32::consts::PI;

use super::types::{BoxRect, Facing, FrameBoxes, Joint, MoveKind, Skeleton};

const STICK_HEIGHT: f32 = 80.0;
const HEAD_RADIUS: f32 = 10.0;
const TORSO_LENGTH: f32 = 25.0;
const LEG_LENGTH: f32 = 30.0;
const AIRBORNE_LIFT: f32 = -20.0;

const HURT_BOX_WIDTH: f32 = 30.0;
const HURT_BOX_HEIGHT: f32 = 60.0;

/// Pose for one fighter on one frame, relative to the fighter position.
pub fn pose(kind: MoveKind, frame: u32, facing: Facing, grounded: bool) -> Skeleton {
    let flip = facing.sign();
    let base_y = if grounded { 0.0 } else { AIRBORNE_LIFT };
    let mut skeleton = base_pose(flip, base_y);

    let t = frame as f32 / 10.0;
    match kind {
        MoveKind::WalkForward => pose_walk_forward(&mut skeleton, t, flip),
        MoveKind::WalkBackward => pose_walk_backward(&mut skeleton, t),
        MoveKind::Crouch | MoveKind::BlockCrouch => pose_crouch(&mut skeleton, base_y),
        MoveKind::Jump => pose_jump(&mut skeleton, t, base_y),
        MoveKind::Jab => pose_jab(&mut skeleton, frame, flip),
        MoveKind::Straight => pose_straight(&mut skeleton, frame, flip),
        MoveKind::Hook => pose_hook(&mut skeleton, frame, flip),
        MoveKind::Uppercut | MoveKind::Launcher => pose_rising_punch(&mut skeleton, frame, flip),
        MoveKind::LowKick => pose_low_kick(&mut skeleton, frame, flip, base_y),
        MoveKind::MidKick => pose_mid_kick(&mut skeleton, frame, flip, base_y),
        MoveKind::HighKick => pose_high_kick(&mut skeleton, frame, flip, base_y),
        MoveKind::Sweep => pose_sweep(&mut skeleton, t, flip, base_y),
        MoveKind::Combo1 | MoveKind::Combo2 | MoveKind::Combo3 | MoveKind::Special => {
            pose_flurry(&mut skeleton, frame, flip)
        }
        MoveKind::HitStun | MoveKind::AirJuggle => pose_hit_stun(&mut skeleton, flip),
        MoveKind::BlockStun | MoveKind::BlockStand => pose_guard(&mut skeleton, flip),
        MoveKind::Knockdown => pose_knockdown(&mut skeleton, t, flip, base_y),
        MoveKind::Idle => {}
    }

    skeleton
}

/// Hit and hurt rectangles for one fighter on one frame, in surface
/// coordinates. The body hurtbox is constant; hit rectangles exist only
/// inside each move's frame windows.
pub fn boxes(kind: MoveKind, frame: u32, x: f32, y: f32, facing: Facing) -> FrameBoxes {
    let forward = facing == Facing::Right;
    let mut result = FrameBoxes {
        hit: Vec::new(),
        hurt: vec![BoxRect {
            x: x - HURT_BOX_WIDTH / 2.0,
            y: y - 70.0,
            width: HURT_BOX_WIDTH,
            height: HURT_BOX_HEIGHT,
        }],
    };

    let mut push = |offset_forward: f32, offset_back: f32, dy: f32, width: f32, height: f32| {
        result.hit.push(BoxRect {
            x: x + if forward { offset_forward } else { offset_back },
            y: y + dy,
            width,
            height,
        });
    };

    match kind {
        MoveKind::Jab if (10..=12).contains(&frame) => push(20.0, -40.0, -55.0, 20.0, 15.0),
        MoveKind::Straight if (12..=15).contains(&frame) => push(25.0, -50.0, -55.0, 25.0, 15.0),
        MoveKind::Hook if (14..=18).contains(&frame) => push(20.0, -45.0, -60.0, 25.0, 20.0),
        MoveKind::Uppercut if (16..=19).contains(&frame) => push(15.0, -35.0, -70.0, 20.0, 30.0),
        MoveKind::LowKick if (12..=15).contains(&frame) => push(30.0, -60.0, -15.0, 30.0, 20.0),
        MoveKind::MidKick if (14..=18).contains(&frame) => push(35.0, -70.0, -40.0, 35.0, 20.0),
        MoveKind::HighKick if (16..=20).contains(&frame) => push(30.0, -65.0, -65.0, 35.0, 25.0),
        MoveKind::Sweep if (18..=23).contains(&frame) => push(20.0, -70.0, -10.0, 50.0, 15.0),
        MoveKind::Launcher if (15..=18).contains(&frame) => push(15.0, -40.0, -80.0, 25.0, 40.0),
        MoveKind::Combo1 => {
            // Three staggered strikes walking forward and down.
            if (12..=15).contains(&frame) {
                push(20.0, -45.0, -55.0, 25.0, 20.0);
            } else if (18..=21).contains(&frame) {
                push(25.0, -50.0, -50.0, 25.0, 20.0);
            } else if (24..=27).contains(&frame) {
                push(30.0, -55.0, -45.0, 25.0, 25.0);
            }
        }
        MoveKind::Combo2 if (14..=34).contains(&frame) => {
            for (index, window_start) in [14u32, 20, 26, 32].into_iter().enumerate() {
                if frame >= window_start && frame <= window_start + 3 {
                    let shift = index as f32 * 5.0;
                    push(
                        25.0 + shift,
                        -(50.0 + shift),
                        -(60.0 - shift),
                        30.0,
                        25.0,
                    );
                }
            }
        }
        MoveKind::Combo3 if (16..=41).contains(&frame) && frame % 4 == 0 => {
            push(30.0, -60.0, -50.0, 30.0, 30.0)
        }
        MoveKind::Special if (20..=25).contains(&frame) => push(20.0, -70.0, -70.0, 50.0, 50.0),
        _ => {}
    }

    result
}

fn base_pose(flip: f32, base_y: f32) -> Skeleton {
    let crown = base_y - STICK_HEIGHT;
    Skeleton {
        head: Joint::at(0.0, crown),
        head_radius: HEAD_RADIUS,
        neck: Joint::at(0.0, crown + HEAD_RADIUS + 2.0),
        spine: Joint::at(0.0, crown + HEAD_RADIUS + TORSO_LENGTH),
        hips: Joint::at(0.0, base_y - LEG_LENGTH),

        left_shoulder: Joint::at(-5.0 * flip, crown + HEAD_RADIUS + 8.0),
        left_elbow: Joint::at(-12.0 * flip, crown + HEAD_RADIUS + 18.0),
        left_hand: Joint::at(-15.0 * flip, crown + HEAD_RADIUS + 28.0),
        right_shoulder: Joint::at(5.0 * flip, crown + HEAD_RADIUS + 8.0),
        right_elbow: Joint::at(12.0 * flip, crown + HEAD_RADIUS + 18.0),
        right_hand: Joint::at(15.0 * flip, crown + HEAD_RADIUS + 28.0),

        left_hip: Joint::at(-5.0, base_y - LEG_LENGTH),
        left_knee: Joint::at(-8.0, base_y - LEG_LENGTH / 2.0),
        left_foot: Joint::at(-10.0, base_y),
        right_hip: Joint::at(5.0, base_y - LEG_LENGTH),
        right_knee: Joint::at(8.0, base_y - LEG_LENGTH / 2.0),
        right_foot: Joint::at(10.0, base_y),
    }
}

fn pose_walk_forward(s: &mut Skeleton, t: f32, flip: f32) {
    let cycle = (t * PI * 2.0).sin();
    s.left_knee.x = -8.0 + cycle * 10.0;
    s.left_foot.x = -10.0 + cycle * 15.0;
    s.right_knee.x = 8.0 - cycle * 10.0;
    s.right_foot.x = 10.0 - cycle * 15.0;
    s.left_hand.x = -15.0 * flip - cycle * 5.0 * flip;
    s.right_hand.x = 15.0 * flip + cycle * 5.0 * flip;
}

fn pose_walk_backward(s: &mut Skeleton, t: f32) {
    let cycle = (t * PI * 2.0).sin();
    s.left_knee.x = -8.0 - cycle * 8.0;
    s.left_foot.x = -10.0 - cycle * 12.0;
    s.right_knee.x = 8.0 + cycle * 8.0;
    s.right_foot.x = 10.0 + cycle * 12.0;
}

fn pose_crouch(s: &mut Skeleton, base_y: f32) {
    s.spine.y += 10.0;
    s.hips.y = base_y - LEG_LENGTH + 15.0;
    s.left_knee = Joint::at(-15.0, base_y - 10.0);
    s.right_knee = Joint::at(15.0, base_y - 10.0);
    s.head.y = base_y - STICK_HEIGHT + 15.0;
    s.neck.y = base_y - STICK_HEIGHT + HEAD_RADIUS + 17.0;
}

fn pose_jump(s: &mut Skeleton, t: f32, base_y: f32) {
    let arc = (t * PI).sin();
    s.left_knee.y = base_y - LEG_LENGTH / 2.0 - arc * 10.0;
    s.left_foot.y = base_y - arc * 15.0;
    s.right_knee.y = base_y - LEG_LENGTH / 2.0 - arc * 10.0;
    s.right_foot.y = base_y - arc * 15.0;
    s.left_hand.y -= arc * 10.0;
    s.right_hand.y -= arc * 10.0;
}

fn pose_jab(s: &mut Skeleton, frame: u32, flip: f32) {
    if frame < 5 {
        s.right_elbow.x = 5.0 * flip;
        s.right_hand.x = 8.0 * flip;
    } else if frame < 7 {
        s.right_elbow.x = 25.0 * flip;
        s.right_hand.x = 45.0 * flip;
        s.right_hand.y -= 5.0;
    }
}

fn pose_straight(s: &mut Skeleton, frame: u32, flip: f32) {
    if frame < 6 {
        s.right_elbow.x = -5.0 * flip;
        s.right_hand.x = -10.0 * flip;
        s.spine.x = -3.0 * flip;
    } else if frame < 9 {
        s.right_elbow.x = 30.0 * flip;
        s.right_hand.x = 50.0 * flip;
        s.spine.x = 5.0 * flip;
    }
}

fn pose_hook(s: &mut Skeleton, frame: u32, flip: f32) {
    let swing = if frame < 7 { 0.0 } else { PI / 4.0 };
    s.right_elbow.x = 20.0 * flip * swing.cos();
    s.right_elbow.y -= 10.0 * swing.sin();
    s.right_hand.x = 40.0 * flip * (swing * 1.5).cos();
    s.right_hand.y -= 15.0 * (swing * 1.5).sin();
}

fn pose_rising_punch(s: &mut Skeleton, frame: u32, flip: f32) {
    if frame < 8 {
        s.spine.y += 10.0;
        s.right_hand.y += 15.0;
        s.right_hand.x = 5.0 * flip;
    } else if frame < 11 {
        s.spine.y -= 5.0;
        s.right_hand.y -= 35.0;
        s.right_hand.x = 25.0 * flip;
    }
}

fn pose_low_kick(s: &mut Skeleton, frame: u32, flip: f32, base_y: f32) {
    if frame < 6 {
        s.right_knee.x = 15.0 * flip;
        s.right_foot.x = 20.0 * flip;
    } else if frame < 9 {
        s.right_knee.x = 35.0 * flip;
        s.right_foot.x = 55.0 * flip;
        s.right_foot.y = base_y - 10.0;
    }
}

fn pose_mid_kick(s: &mut Skeleton, frame: u32, flip: f32, base_y: f32) {
    if frame < 7 {
        s.right_knee.y = base_y - LEG_LENGTH / 2.0 - 15.0;
        s.right_foot.y = base_y - 20.0;
    } else if frame < 11 {
        s.right_knee.x = 30.0 * flip;
        s.right_knee.y = base_y - LEG_LENGTH / 2.0 - 20.0;
        s.right_foot.x = 60.0 * flip;
        s.right_foot.y = base_y - 35.0;
    }
}

fn pose_high_kick(s: &mut Skeleton, frame: u32, flip: f32, base_y: f32) {
    let rotation = if frame < 8 {
        0.0
    } else {
        (frame - 8) as f32 * PI / 8.0
    };
    s.right_knee.x = 25.0 * flip * rotation.cos();
    s.right_knee.y = base_y - LEG_LENGTH / 2.0 - 30.0 * rotation.sin();
    s.right_foot.x = 50.0 * flip * rotation.cos();
    s.right_foot.y = base_y - 60.0 * rotation.sin();
    s.spine.x = -10.0 * flip;
}

fn pose_sweep(s: &mut Skeleton, t: f32, flip: f32, base_y: f32) {
    s.spine.y = base_y - 20.0;
    s.hips.y = base_y - 15.0;
    s.left_hand.y = base_y - 10.0;
    s.right_foot.x = 40.0 * flip * (t * PI).cos();
    s.right_foot.y = base_y;
    s.right_knee.x = 25.0 * flip * (t * PI).cos();
    s.right_knee.y = base_y - 5.0;
}

/// Shared pose for the multi-hit flurries: alternating fast punches.
fn pose_flurry(s: &mut Skeleton, frame: u32, flip: f32) {
    let lead_extends = (frame / 4) % 2 == 0;
    if lead_extends {
        s.right_elbow.x = 25.0 * flip;
        s.right_hand.x = 48.0 * flip;
        s.right_hand.y -= 8.0;
        s.left_hand.x = -8.0 * flip;
    } else {
        s.left_elbow.x = 22.0 * flip;
        s.left_hand.x = 45.0 * flip;
        s.left_hand.y -= 4.0;
        s.right_hand.x = 8.0 * flip;
    }
    s.spine.x = 4.0 * flip;
}

fn pose_hit_stun(s: &mut Skeleton, flip: f32) {
    s.spine.x = -10.0 * flip;
    s.head.x = -15.0 * flip;
    s.left_hand.x = -25.0 * flip;
    s.right_hand.x = 5.0 * flip;
}

fn pose_guard(s: &mut Skeleton, flip: f32) {
    s.left_hand.x = 10.0 * flip;
    s.left_hand.y -= 15.0;
    s.right_hand.x = 10.0 * flip;
    s.right_hand.y -= 15.0;
    s.spine.x = -5.0 * flip;
}

fn pose_knockdown(s: &mut Skeleton, t: f32, flip: f32, base_y: f32) {
    let fall = t.min(1.0);
    s.spine.y = base_y - 10.0 * (1.0 - fall);
    s.head.y = base_y - 15.0 * (1.0 - fall);
    s.spine.x = -20.0 * flip * fall;
    s.left_hand.y = base_y - 5.0 * (1.0 - fall);
    s.right_hand.y = base_y - 5.0 * (1.0 - fall);
    s.left_foot.x = -20.0 * fall;
    s.right_foot.x = 20.0 * fall;
}
