//! Keyboard shortcut handling

use egui::{Key, KeyboardShortcut, Modifiers};
use quickimg_core::hotkey::{Hotkey, Key as HotkeyKey};

use crate::app::Action;

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// Collect the actions requested from the keyboard this frame.
pub fn shortcuts(ctx: &egui::Context, toggle: Option<KeyboardShortcut>) -> Vec<Action> {
    let mut actions = Vec::new();

    // Don't steal keys from the width/height fields
    if ctx.memory(|m| m.focused().is_some()) {
        return actions;
    }

    ctx.input_mut(|i| {
        if let Some(toggle) = toggle {
            if i.consume_shortcut(&toggle) {
                actions.push(Action::ToggleVisibility);
            }
        }
        // Redo first: Ctrl+Shift+Z would otherwise also match Ctrl+Z
        let redo_alt = KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z);
        if i.consume_shortcut(&redo_alt) || i.consume_shortcut(&REDO) {
            actions.push(Action::Redo);
        }
        if i.consume_shortcut(&UNDO) {
            actions.push(Action::Undo);
        }

        // Ctrl+V / Ctrl+C arrive as paste/copy events on most platforms
        for event in &i.events {
            match event {
                egui::Event::Paste(_) => actions.push(Action::LoadFromClipboard),
                egui::Event::Copy => actions.push(Action::Copy),
                _ => {}
            }
        }
    });

    actions
}

/// Map a configured hotkey onto an egui shortcut.
pub fn to_shortcut(hotkey: &Hotkey) -> Option<KeyboardShortcut> {
    let mut modifiers = Modifiers::NONE;
    if hotkey.modifiers.ctrl {
        modifiers = modifiers | Modifiers::CTRL;
    }
    if hotkey.modifiers.shift {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if hotkey.modifiers.alt {
        modifiers = modifiers | Modifiers::ALT;
    }
    if hotkey.modifiers.command {
        modifiers = modifiers | Modifiers::COMMAND;
    }

    let key = match hotkey.key {
        HotkeyKey::Char(c) if c.is_ascii_digit() => digit_key(c)?,
        HotkeyKey::Char(c) => Key::from_name(&c.to_ascii_uppercase().to_string())?,
        HotkeyKey::Function(n) => Key::from_name(&format!("F{n}"))?,
    };

    Some(KeyboardShortcut::new(modifiers, key))
}

fn digit_key(c: char) -> Option<Key> {
    Some(match c {
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hotkey_shortcut() {
        let hotkey: Hotkey = "ctrl+shift+b".parse().unwrap();
        let shortcut = to_shortcut(&hotkey).unwrap();

        assert_eq!(shortcut.logical_key, Key::B);
        assert!(shortcut.modifiers.ctrl);
        assert!(shortcut.modifiers.shift);
        assert!(!shortcut.modifiers.alt);
    }

    #[test]
    fn test_function_and_digit_keys() {
        let f5: Hotkey = "alt+f5".parse().unwrap();
        assert_eq!(to_shortcut(&f5).unwrap().logical_key, Key::F5);

        let seven: Hotkey = "ctrl+7".parse().unwrap();
        assert_eq!(to_shortcut(&seven).unwrap().logical_key, Key::Num7);
    }
}
