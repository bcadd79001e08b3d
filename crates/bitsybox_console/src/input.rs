use crate::compositor::Viewport;
use crate::{Button, Key, MouseButton, PadButton, VIDEO_SIZE};

/// Platform-neutral input event, one per tick at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Resized { width: u32, height: u32 },
    /// Render target contents were lost and surfaces need redrawing.
    RenderTargetsReset,
    KeyDown(Key),
    KeyUp(Key),
    PadDown(PadButton),
    PadUp(PadButton),
    MouseMotion { x: i32, y: i32 },
    MouseDown(MouseButton),
    MouseUp(MouseButton),
}

/// Mouse state in console pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    /// Cursor is over the console screen.
    pub hover: bool,
    /// Primary button held.
    pub down: bool,
    /// Secondary button held.
    pub alt: bool,
}

/// What the main loop has to act on after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub quit: bool,
    pub toggle_fullscreen: bool,
    pub resized: bool,
}

/// Live key, pad and mouse state, folded into the six logical buttons.
#[derive(Debug, Clone)]
pub struct InputAggregator {
    keys: [bool; Key::COUNT],
    pad: [bool; PadButton::COUNT],
    mouse_window: (i32, i32),
    mouse_left: bool,
    mouse_right: bool,
    viewport: Viewport,
    fullscreen_chord: bool,
    quit: bool,
}

impl InputAggregator {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            keys: [false; Key::COUNT],
            pad: [false; PadButton::COUNT],
            mouse_window: (0, 0),
            mouse_left: false,
            mouse_right: false,
            viewport: Viewport::fit(window_width, window_height),
            fullscreen_chord: false,
            quit: false,
        }
    }

    /// Apply at most one event, then re-evaluate the fullscreen chord.
    pub fn tick(&mut self, event: Option<InputEvent>) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if let Some(event) = event {
            match event {
                InputEvent::Quit => self.quit = true,
                InputEvent::Resized { width, height } => {
                    self.viewport = Viewport::fit(width, height);
                    outcome.resized = true;
                }
                InputEvent::RenderTargetsReset => outcome.resized = true,
                InputEvent::KeyDown(key) => self.set_key(key, true),
                InputEvent::KeyUp(key) => self.set_key(key, false),
                InputEvent::PadDown(button) => self.set_pad(button, true),
                InputEvent::PadUp(button) => self.set_pad(button, false),
                InputEvent::MouseMotion { x, y } => self.mouse_window = (x, y),
                InputEvent::MouseDown(button) => self.set_mouse(button, true),
                InputEvent::MouseUp(button) => self.set_mouse(button, false),
            }
        }

        let previous = self.fullscreen_chord;
        self.fullscreen_chord = self.any_alt() && self.key(Key::Return);
        outcome.toggle_fullscreen = self.fullscreen_chord && !previous;
        outcome.quit = self.quit;
        outcome
    }

    fn set_key(&mut self, key: Key, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(key as usize) {
            *slot = pressed;
        }
    }

    fn set_pad(&mut self, button: PadButton, pressed: bool) {
        if let Some(slot) = self.pad.get_mut(button as usize) {
            *slot = pressed;
        }
    }

    fn set_mouse(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.mouse_left = pressed,
            MouseButton::Right => self.mouse_right = pressed,
            MouseButton::Other => {}
        }
    }

    #[inline]
    fn key(&self, key: Key) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    #[inline]
    fn pad(&self, button: PadButton) -> bool {
        self.pad.get(button as usize).copied().unwrap_or(false)
    }

    fn any_alt(&self) -> bool {
        self.key(Key::LAlt) || self.key(Key::RAlt)
    }

    fn any_ctrl(&self) -> bool {
        self.key(Key::LCtrl) || self.key(Key::RCtrl)
    }

    pub fn button(&self, button: Button) -> bool {
        match button {
            Button::Up => self.key(Key::Up) || self.key(Key::W) || self.pad(PadButton::DPadUp),
            Button::Down => {
                self.key(Key::Down) || self.key(Key::S) || self.pad(PadButton::DPadDown)
            }
            Button::Left => {
                self.key(Key::Left) || self.key(Key::A) || self.pad(PadButton::DPadLeft)
            }
            Button::Right => {
                self.key(Key::Right) || self.key(Key::D) || self.pad(PadButton::DPadRight)
            }
            Button::Confirm => {
                // Alt+Enter belongs to the fullscreen toggle
                let face = [PadButton::A, PadButton::B, PadButton::X, PadButton::Y]
                    .into_iter()
                    .any(|b| self.pad(b));
                self.key(Key::Space) || (self.key(Key::Return) && !self.any_alt()) || face
            }
            Button::Menu => {
                self.key(Key::Escape)
                    || (self.any_ctrl() && self.key(Key::R))
                    || self.pad(PadButton::Start)
            }
        }
    }

    pub fn mouse(&self) -> MouseState {
        let (x, y) = self.viewport.to_console(self.mouse_window.0, self.mouse_window.1);
        let screen = 0..VIDEO_SIZE as i32;
        MouseState {
            x,
            y,
            hover: screen.contains(&x) && screen.contains(&y),
            down: self.mouse_left,
            alt: self.mouse_right,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputAggregator, key: Key) -> TickOutcome {
        input.tick(Some(InputEvent::KeyDown(key)))
    }

    #[test]
    fn logical_buttons_combine_keys_alternates_and_pad() {
        let mut input = InputAggregator::new(512, 512);
        assert!(!input.button(Button::Up));
        press(&mut input, Key::W);
        assert!(input.button(Button::Up));
        input.tick(Some(InputEvent::KeyUp(Key::W)));
        assert!(!input.button(Button::Up));

        input.tick(Some(InputEvent::PadDown(PadButton::DPadLeft)));
        assert!(input.button(Button::Left));
        input.tick(Some(InputEvent::PadDown(PadButton::Y)));
        assert!(input.button(Button::Confirm));
        input.tick(Some(InputEvent::PadDown(PadButton::Start)));
        assert!(input.button(Button::Menu));
    }

    #[test]
    fn menu_fires_on_ctrl_r_chord_only() {
        let mut input = InputAggregator::new(512, 512);
        press(&mut input, Key::R);
        assert!(!input.button(Button::Menu));
        press(&mut input, Key::RCtrl);
        assert!(input.button(Button::Menu));
    }

    #[test]
    fn alt_enter_toggles_fullscreen_on_the_rising_edge() {
        let mut input = InputAggregator::new(512, 512);
        assert!(!press(&mut input, Key::LAlt).toggle_fullscreen);
        assert!(press(&mut input, Key::Return).toggle_fullscreen);
        assert!(!input.button(Button::Confirm));
        // still held
        assert!(!input.tick(None).toggle_fullscreen);
        input.tick(Some(InputEvent::KeyUp(Key::Return)));
        assert!(press(&mut input, Key::Return).toggle_fullscreen);
    }

    #[test]
    fn one_event_per_tick() {
        let mut input = InputAggregator::new(512, 512);
        let events = [InputEvent::KeyDown(Key::Up), InputEvent::KeyDown(Key::Down)];
        input.tick(Some(events[0]));
        assert!(input.button(Button::Up));
        assert!(!input.button(Button::Down));
        input.tick(Some(events[1]));
        assert!(input.button(Button::Down));
    }

    #[test]
    fn mouse_is_reported_in_console_space() {
        let mut input = InputAggregator::new(512, 512);
        input.tick(Some(InputEvent::Resized {
            width: 1024,
            height: 512,
        }));
        input.tick(Some(InputEvent::MouseMotion { x: 256 + 40, y: 100 }));
        input.tick(Some(InputEvent::MouseDown(MouseButton::Right)));
        assert_eq!(
            input.mouse(),
            MouseState {
                x: 10,
                y: 25,
                hover: true,
                down: false,
                alt: true,
            }
        );
        input.tick(Some(InputEvent::MouseMotion { x: 10, y: 100 }));
        assert!(!input.mouse().hover);
    }

    #[test]
    fn quit_is_sticky() {
        let mut input = InputAggregator::new(1, 1);
        assert!(input.tick(Some(InputEvent::Quit)).quit);
        assert!(input.tick(None).quit);
        assert!(input.quit_requested());
    }
}
