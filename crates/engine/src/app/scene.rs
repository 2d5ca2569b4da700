use super::canvas::Canvas;
use super::input::{ActionStates, InputAction};

/// Per-tick view of collected input. Held state reflects what is down right
/// now; pressed state carries the edges that happened since the last tick
/// and is delivered exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    held: ActionStates,
    pressed: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, held: ActionStates, pressed: ActionStates) -> Self {
        Self {
            quit_requested,
            held,
            pressed,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.held.set(action, is_down);
        self
    }

    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.pressed.set(action, true);
        self
    }
}

/// A running game hosted by the loop runner. `update` is invoked at the
/// fixed logical tick rate, `render` once per presented frame.
pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, input: &InputSnapshot);
    fn render(&mut self, canvas: &mut Canvas<'_>);
    fn unload(&mut self);
}
