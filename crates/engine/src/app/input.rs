/// Abstract input vocabulary shared by keyboard keys and on-screen pad
/// buttons. Directions and Block are level-style (held), the four attack
/// buttons are consumed through per-tick press edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Left,
    Right,
    Up,
    Down,
    PunchLight,
    PunchHeavy,
    KickLight,
    KickHeavy,
    Block,
    ToggleBoxes,
    Quit,
}

const ACTION_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; ACTION_COUNT];
    }

    pub(crate) fn merged_with(&self, other: &ActionStates) -> ActionStates {
        let mut merged = *self;
        for (slot, is_down) in merged.down.iter_mut().zip(other.down.iter()) {
            *slot |= *is_down;
        }
        merged
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Left => 0,
            InputAction::Right => 1,
            InputAction::Up => 2,
            InputAction::Down => 3,
            InputAction::PunchLight => 4,
            InputAction::PunchHeavy => 5,
            InputAction::KickLight => 6,
            InputAction::KickHeavy => 7,
            InputAction::Block => 8,
            InputAction::ToggleBoxes => 9,
            InputAction::Quit => 10,
        }
    }
}
