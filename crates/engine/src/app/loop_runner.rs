use std::time::{Duration, Instant};

use pixels::{Error as PixelsError, Pixels, SurfaceTexture, TextureError};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::canvas::Canvas;
use super::input::{ActionStates, InputAction};
use super::metrics::MetricsAccumulator;
use super::scene::{InputSnapshot, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Logical surface size in pixels; the simulation and all drawing use
    /// this coordinate space regardless of the window size.
    pub surface_width: u32,
    pub surface_height: u32,
    /// Initial window scale applied on top of the logical surface.
    pub window_scale: u32,
    pub target_tps: u32,
    pub metrics_log_interval: Duration,
    /// On-screen pad regions; pointer press-and-hold inside a region feeds
    /// the mapped action exactly like holding its key.
    pub pad: Vec<PadButton>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "StickFight".to_string(),
            surface_width: 600,
            surface_height: 400,
            window_scale: 2,
            target_tps: 60,
            metrics_log_interval: Duration::from_secs(1),
            pad: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PadRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadButton {
    pub rect: PadRect,
    pub action: InputAction,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize surface: {0}")]
    CreateSurface(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let scale = config.window_scale.max(1);
    let window: &'static winit::window::Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                (config.surface_width * scale) as f64,
                (config.surface_height * scale) as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    ));

    let inner = window.inner_size();
    let surface = SurfaceTexture::new(inner.width, inner.height, window);
    let mut pixels = Pixels::new(config.surface_width, config.surface_height, surface)
        .map_err(AppError::CreateSurface)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let surface_width = config.surface_width;
    let surface_height = config.surface_height;
    let mut input_collector = InputCollector::new(
        config.pad.clone(),
        (surface_width, surface_height),
        (inner.width, inner.height),
    );
    let mut tick_gate = TickGate::new(tick_interval_for(config.target_tps), Instant::now());
    let mut metrics_accumulator = MetricsAccumulator::new(config.metrics_log_interval);
    let mut last_frame_instant = Instant::now();

    scene.load();
    info!(
        target_tps = config.target_tps,
        surface_width, surface_height, "loop_config"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    input_collector.set_window_size(new_size.width, new_size.height);
                    if new_size.width > 0 && new_size.height > 0 {
                        if let Err(error) = resize_surface(&mut pixels, new_size.width, new_size.height)
                        {
                            warn!(error = %error, "surface_resize_failed");
                            window_target.exit();
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.clear_cursor_position();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if button == MouseButton::Left {
                        input_collector.handle_pointer_button(state);
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    if tick_gate.try_tick(now) {
                        let snapshot = input_collector.snapshot_for_tick();
                        scene.update(&snapshot);
                        metrics_accumulator.record_tick();
                    }

                    {
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, surface_width, surface_height);
                        scene.render(&mut canvas);
                    }
                    if let Err(error) = pixels.render() {
                        warn!(error = %error, "surface_present_failed");
                        window_target.exit();
                    }
                    metrics_accumulator.record_frame(raw_frame_dt);
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn resize_surface(
    pixels: &mut Pixels<'static>,
    width: u32,
    height: u32,
) -> Result<(), TextureError> {
    pixels.resize_surface(width, height)
}

fn tick_interval_for(target_tps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / target_tps.max(1) as f64)
}

/// Gate producing at most one simulation tick per frame callback. The timer
/// rebases on every fired tick, so backlog from a stalled frame is absorbed
/// rather than replayed.
#[derive(Debug)]
struct TickGate {
    interval: Duration,
    last_tick: Instant,
}

impl TickGate {
    fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    fn try_tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }
        self.last_tick = now;
        true
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    key_held: ActionStates,
    pad_held: ActionStates,
    pressed: ActionStates,
    pad: Vec<PadButton>,
    cursor_position_px: Option<(f32, f32)>,
    pointer_down: bool,
    surface_width: u32,
    surface_height: u32,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(pad: Vec<PadButton>, surface_size: (u32, u32), window_size: (u32, u32)) -> Self {
        Self {
            pad,
            surface_width: surface_size.0,
            surface_height: surface_size.1,
            window_width: window_size.0,
            window_height: window_size.1,
            ..Self::default()
        }
    }

    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let Some(action) = action_for_key(key_event.physical_key) else {
            return;
        };
        match key_event.state {
            ElementState::Pressed => {
                self.press_key_action(action);
                if action == InputAction::Quit {
                    self.quit_requested = true;
                }
            }
            ElementState::Released => self.key_held.set(action, false),
        }
    }

    fn press_key_action(&mut self, action: InputAction) {
        if !self.is_action_down(action) {
            self.pressed.set(action, true);
        }
        self.key_held.set(action, true);
    }

    fn handle_pointer_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pointer_down = true;
                self.refresh_pad_holds();
            }
            ElementState::Released => {
                self.pointer_down = false;
                self.pad_held.clear();
            }
        }
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some((x, y));
        if self.pointer_down {
            self.refresh_pad_holds();
        }
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
        if self.pointer_down {
            self.pad_held.clear();
        }
    }

    /// Press-and-hold semantics: the pad actions under the pointer are held,
    /// everything else on the pad is released.
    fn refresh_pad_holds(&mut self) {
        let cursor = self
            .cursor_position_px
            .map(|(x, y)| self.window_to_surface(x, y));
        let mut next = ActionStates::default();
        if let Some((sx, sy)) = cursor {
            for button in &self.pad {
                if button.rect.contains(sx, sy) {
                    next.set(button.action, true);
                }
            }
        }
        for button in &self.pad {
            let action = button.action;
            if next.is_down(action) && !self.is_action_down(action) {
                self.pressed.set(action, true);
            }
        }
        self.pad_held = next;
    }

    fn window_to_surface(&self, x: f32, y: f32) -> (f32, f32) {
        let scale_x = self.surface_width as f32 / self.window_width.max(1) as f32;
        let scale_y = self.surface_height as f32 / self.window_height.max(1) as f32;
        (x * scale_x, y * scale_y)
    }

    fn is_action_down(&self, action: InputAction) -> bool {
        self.key_held.is_down(action) || self.pad_held.is_down(action)
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let held = self.key_held.merged_with(&self.pad_held);
        let snapshot = InputSnapshot::new(self.quit_requested, held, self.pressed);
        self.pressed.clear();
        snapshot
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    match key {
        PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
            Some(InputAction::Left)
        }
        PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
            Some(InputAction::Right)
        }
        PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
            Some(InputAction::Up)
        }
        PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
            Some(InputAction::Down)
        }
        PhysicalKey::Code(KeyCode::KeyJ) => Some(InputAction::PunchLight),
        PhysicalKey::Code(KeyCode::KeyK) => Some(InputAction::PunchHeavy),
        PhysicalKey::Code(KeyCode::KeyL) => Some(InputAction::KickLight),
        PhysicalKey::Code(KeyCode::Semicolon) => Some(InputAction::KickHeavy),
        PhysicalKey::Code(KeyCode::KeyU) => Some(InputAction::Block),
        PhysicalKey::Code(KeyCode::Backquote) => Some(InputAction::ToggleBoxes),
        PhysicalKey::Code(KeyCode::Escape) => Some(InputAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector_with_pad(pad: Vec<PadButton>) -> InputCollector {
        InputCollector::new(pad, (600, 400), (600, 400))
    }

    fn single_button_pad() -> Vec<PadButton> {
        vec![PadButton {
            rect: PadRect {
                x: 100.0,
                y: 100.0,
                width: 50.0,
                height: 50.0,
            },
            action: InputAction::PunchLight,
        }]
    }

    #[test]
    fn tick_gate_holds_until_interval_elapses() {
        let start = Instant::now();
        let mut gate = TickGate::new(Duration::from_millis(16), start);

        assert!(!gate.try_tick(start + Duration::from_millis(10)));
        assert!(gate.try_tick(start + Duration::from_millis(17)));
    }

    #[test]
    fn tick_gate_fires_at_most_once_per_call_and_absorbs_backlog() {
        let start = Instant::now();
        let mut gate = TickGate::new(Duration::from_millis(16), start);

        // A 100 ms stall yields one tick, not six; the timer rebases.
        assert!(gate.try_tick(start + Duration::from_millis(100)));
        assert!(!gate.try_tick(start + Duration::from_millis(101)));
        assert!(gate.try_tick(start + Duration::from_millis(117)));
    }

    #[test]
    fn tick_interval_for_60_tps_is_one_sixtieth() {
        let interval = tick_interval_for(60);
        assert!((interval.as_secs_f64() - 1.0 / 60.0).abs() < 0.000_001);
        assert_eq!(tick_interval_for(0), Duration::from_secs(1));
    }

    #[test]
    fn held_key_produces_a_single_press_edge() {
        let mut collector = collector_with_pad(Vec::new());
        collector.press_key_action(InputAction::PunchLight);
        let first = collector.snapshot_for_tick();
        collector.press_key_action(InputAction::PunchLight);
        let second = collector.snapshot_for_tick();

        assert!(first.was_pressed(InputAction::PunchLight));
        assert!(!second.was_pressed(InputAction::PunchLight));
        assert!(second.is_down(InputAction::PunchLight));
    }

    #[test]
    fn release_then_press_retriggers_edge() {
        let mut collector = collector_with_pad(Vec::new());
        collector.press_key_action(InputAction::KickHeavy);
        let _ = collector.snapshot_for_tick();
        collector.key_held.set(InputAction::KickHeavy, false);
        collector.press_key_action(InputAction::KickHeavy);
        let snapshot = collector.snapshot_for_tick();
        assert!(snapshot.was_pressed(InputAction::KickHeavy));
    }

    #[test]
    fn pad_press_inside_region_holds_action() {
        let mut collector = collector_with_pad(single_button_pad());
        collector.set_cursor_position_px(120.0, 120.0);
        collector.handle_pointer_button(ElementState::Pressed);

        let snapshot = collector.snapshot_for_tick();
        assert!(snapshot.is_down(InputAction::PunchLight));
        assert!(snapshot.was_pressed(InputAction::PunchLight));
    }

    #[test]
    fn pad_release_clears_only_pad_holds() {
        let mut collector = collector_with_pad(single_button_pad());
        collector.press_key_action(InputAction::Left);
        collector.set_cursor_position_px(120.0, 120.0);
        collector.handle_pointer_button(ElementState::Pressed);
        collector.handle_pointer_button(ElementState::Released);

        let snapshot = collector.snapshot_for_tick();
        assert!(!snapshot.is_down(InputAction::PunchLight));
        assert!(snapshot.is_down(InputAction::Left));
    }

    #[test]
    fn pad_press_outside_region_is_a_noop() {
        let mut collector = collector_with_pad(single_button_pad());
        collector.set_cursor_position_px(10.0, 10.0);
        collector.handle_pointer_button(ElementState::Pressed);

        let snapshot = collector.snapshot_for_tick();
        assert!(!snapshot.is_down(InputAction::PunchLight));
    }

    #[test]
    fn dragging_off_a_pad_button_releases_it() {
        let mut collector = collector_with_pad(single_button_pad());
        collector.set_cursor_position_px(120.0, 120.0);
        collector.handle_pointer_button(ElementState::Pressed);
        assert!(collector.is_action_down(InputAction::PunchLight));

        collector.set_cursor_position_px(400.0, 10.0);
        assert!(!collector.is_action_down(InputAction::PunchLight));
    }

    #[test]
    fn held_pad_button_does_not_repeat_edges() {
        let mut collector = collector_with_pad(single_button_pad());
        collector.set_cursor_position_px(120.0, 120.0);
        collector.handle_pointer_button(ElementState::Pressed);
        let _ = collector.snapshot_for_tick();
        collector.set_cursor_position_px(121.0, 121.0);

        let snapshot = collector.snapshot_for_tick();
        assert!(snapshot.is_down(InputAction::PunchLight));
        assert!(!snapshot.was_pressed(InputAction::PunchLight));
    }

    #[test]
    fn cursor_maps_through_window_scale() {
        let mut collector = InputCollector::new(single_button_pad(), (600, 400), (1200, 800));
        collector.set_cursor_position_px(240.0, 240.0);
        collector.handle_pointer_button(ElementState::Pressed);

        // 240 window px maps to 120 surface px on both axes.
        assert!(collector.is_action_down(InputAction::PunchLight));
    }

    #[test]
    fn pad_rect_contains_is_half_open() {
        let rect = PadRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(9.9, 9.9));
        assert!(!rect.contains(10.0, 5.0));
        assert!(!rect.contains(5.0, 10.0));
    }
}
