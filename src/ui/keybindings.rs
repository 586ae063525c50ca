//! Keyboard shortcuts for the wizard demo.
//!
//! Single source of truth for both the key dispatch in `App` and the help
//! line drawn under the wizard.

use crossterm::event::KeyCode;

/// What a key press asks the wizard to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Next,
    Prev,
    /// Jump through the indicator of this step
    Jump(usize),
    Toggle,
    Quit,
}

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative keys with the same meaning
    pub alt_keys: &'static [KeyCode],
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    pub action: WizardAction,
}

impl Shortcut {
    /// Format keys for display (e.g., "→/Enter/n")
    pub fn key_display(&self) -> String {
        std::iter::once(&self.key)
            .chain(self.alt_keys.iter())
            .map(format_keycode)
            .collect::<Vec<_>>()
            .join("/")
    }

    fn matches(&self, code: KeyCode) -> bool {
        self.key == code || self.alt_keys.contains(&code)
    }
}

/// Format a KeyCode for display
fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        _ => format!("{:?}", key),
    }
}

/// Static registry of the wizard's shortcuts. Digit jumps are handled
/// separately by [`key_action`].
pub static SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        key: KeyCode::Right,
        alt_keys: &[KeyCode::Enter, KeyCode::Char('n')],
        description: "Next step",
        action: WizardAction::Next,
    },
    Shortcut {
        key: KeyCode::Left,
        alt_keys: &[KeyCode::Char('p')],
        description: "Previous step",
        action: WizardAction::Prev,
    },
    Shortcut {
        key: KeyCode::Char(' '),
        alt_keys: &[],
        description: "Toggle",
        action: WizardAction::Toggle,
    },
    Shortcut {
        key: KeyCode::Char('q'),
        alt_keys: &[KeyCode::Esc],
        description: "Quit",
        action: WizardAction::Quit,
    },
];

/// Map a key press to a wizard action
pub fn key_action(code: KeyCode) -> Option<WizardAction> {
    if let KeyCode::Char(c @ '1'..='9') = code {
        return c.to_digit(10).map(|d| WizardAction::Jump(d as usize));
    }
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.matches(code))
        .map(|shortcut| shortcut.action)
}

/// One-line help text, e.g. "→/Enter/n Next step  ←/p Previous step ..."
pub fn help_line() -> String {
    let mut parts: Vec<String> = SHORTCUTS
        .iter()
        .map(|s| format!("{} {}", s.key_display(), s.description))
        .collect();
    parts.insert(2, "1-9 Jump to step".to_string());
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(!shortcut.description.is_empty());
        }
    }

    #[test]
    fn test_key_action_navigation() {
        assert_eq!(key_action(KeyCode::Right), Some(WizardAction::Next));
        assert_eq!(key_action(KeyCode::Enter), Some(WizardAction::Next));
        assert_eq!(key_action(KeyCode::Char('n')), Some(WizardAction::Next));
        assert_eq!(key_action(KeyCode::Left), Some(WizardAction::Prev));
        assert_eq!(key_action(KeyCode::Char('p')), Some(WizardAction::Prev));
        assert_eq!(key_action(KeyCode::Esc), Some(WizardAction::Quit));
        assert_eq!(key_action(KeyCode::Char(' ')), Some(WizardAction::Toggle));
        assert_eq!(key_action(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_digit_keys_jump() {
        assert_eq!(key_action(KeyCode::Char('1')), Some(WizardAction::Jump(1)));
        assert_eq!(key_action(KeyCode::Char('9')), Some(WizardAction::Jump(9)));
        assert_eq!(key_action(KeyCode::Char('0')), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(SHORTCUTS[0].key_display(), "→/Enter/n");
        assert_eq!(SHORTCUTS[2].key_display(), "Space");
    }

    #[test]
    fn test_help_line_mentions_every_shortcut() {
        let help = help_line();
        for shortcut in SHORTCUTS {
            assert!(help.contains(shortcut.description));
        }
        assert!(help.contains("1-9 Jump to step"));
    }
}
