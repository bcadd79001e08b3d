/// Physical keyboard keys the console listens to. Everything else maps to
/// `Key::None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    R,
    Space,
    Return,
    Escape,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    None,
}

impl Key {
    pub const COUNT: usize = Key::None as usize;
}

/// Gamepad buttons, following the SDL game controller layout.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    A,
    B,
    X,
    Y,
    Start,
    None,
}

impl PadButton {
    pub const COUNT: usize = PadButton::None as usize;
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MouseButton {
    Left,
    Right,
    Other,
}

/// Logical console buttons as seen by scripts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Confirm = 4,
    Menu = 5,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Confirm,
        Button::Menu,
    ];

    /// Script button code to logical button. Unknown codes have no button.
    pub fn from_code(code: i32) -> Option<Button> {
        match code {
            0 => Some(Button::Up),
            1 => Some(Button::Down),
            2 => Some(Button::Left),
            3 => Some(Button::Right),
            4 => Some(Button::Confirm),
            5 => Some(Button::Menu),
            _ => None,
        }
    }
}
