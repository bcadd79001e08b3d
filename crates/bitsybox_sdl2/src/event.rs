use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;

use bitsybox_common::key::{Key, MouseButton, PadButton};
use bitsybox_console::InputEvent;

/// Translate an SDL event into the console's input vocabulary. Events the
/// console has no use for map to `None`.
pub fn map_event(event: &Event) -> Option<InputEvent> {
    match *event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::Window {
            win_event: WindowEvent::SizeChanged(width, height),
            ..
        } => Some(InputEvent::Resized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
        Event::RenderTargetsReset { .. } => Some(InputEvent::RenderTargetsReset),
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => known_key(keycode).map(InputEvent::KeyDown),
        Event::KeyUp {
            keycode: Some(keycode),
            ..
        } => known_key(keycode).map(InputEvent::KeyUp),
        Event::ControllerButtonDown { button, .. } => {
            known_pad_button(button).map(InputEvent::PadDown)
        }
        Event::ControllerButtonUp { button, .. } => known_pad_button(button).map(InputEvent::PadUp),
        Event::MouseMotion { x, y, .. } => Some(InputEvent::MouseMotion { x, y }),
        Event::MouseButtonDown { mouse_btn, .. } => {
            Some(InputEvent::MouseDown(map_mouse_button(mouse_btn)))
        }
        Event::MouseButtonUp { mouse_btn, .. } => {
            Some(InputEvent::MouseUp(map_mouse_button(mouse_btn)))
        }
        _ => None,
    }
}

fn known_key(keycode: Keycode) -> Option<Key> {
    Some(map_keycode(keycode)).filter(|key| *key != Key::None)
}

fn known_pad_button(button: sdl2::controller::Button) -> Option<PadButton> {
    Some(map_pad_button(button)).filter(|button| *button != PadButton::None)
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::W => Key::W,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::D => Key::D,
        Keycode::R => Key::R,
        Keycode::Space => Key::Space,
        Keycode::Return => Key::Return,
        Keycode::Escape => Key::Escape,
        Keycode::LCtrl => Key::LCtrl,
        Keycode::RCtrl => Key::RCtrl,
        Keycode::LAlt => Key::LAlt,
        Keycode::RAlt => Key::RAlt,
        _ => Key::None,
    }
}

pub fn map_pad_button(button: sdl2::controller::Button) -> PadButton {
    use sdl2::controller::Button;
    match button {
        Button::DPadUp => PadButton::DPadUp,
        Button::DPadDown => PadButton::DPadDown,
        Button::DPadLeft => PadButton::DPadLeft,
        Button::DPadRight => PadButton::DPadRight,
        Button::A => PadButton::A,
        Button::B => PadButton::B,
        Button::X => PadButton::X,
        Button::Y => PadButton::Y,
        Button::Start => PadButton::Start,
        _ => PadButton::None,
    }
}

pub fn map_mouse_button(button: sdl2::mouse::MouseButton) -> MouseButton {
    match button {
        sdl2::mouse::MouseButton::Left => MouseButton::Left,
        sdl2::mouse::MouseButton::Right => MouseButton::Right,
        _ => MouseButton::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_keys_produce_no_event() {
        let event = Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(Keycode::F1),
            scancode: None,
            keymod: sdl2::keyboard::Mod::NOMOD,
            repeat: false,
        };
        assert_eq!(map_event(&event), None);
    }

    #[test]
    fn resize_reports_new_window_size() {
        let event = Event::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::SizeChanged(800, 600),
        };
        assert_eq!(
            map_event(&event),
            Some(InputEvent::Resized {
                width: 800,
                height: 600
            })
        );
    }

    #[test]
    fn pad_and_keyboard_share_the_console_vocabulary() {
        assert_eq!(map_keycode(Keycode::Return), Key::Return);
        assert_eq!(map_pad_button(sdl2::controller::Button::Start), PadButton::Start);
        assert_eq!(
            map_pad_button(sdl2::controller::Button::Guide),
            PadButton::None
        );
    }
}
