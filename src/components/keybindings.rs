//! Keybinding registry for the storefront wizard
//!
//! Maps key presses to wizard actions and produces the navigation bar hints.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    Toggle,
    NextStep,
    PreviousStep,
    Checkout,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && event.modifiers.contains(self.modifiers)
    }
}

/// One entry of the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Keybinding registry
pub struct KeybindingContext {
    bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        Self {
            bindings: vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Navigate up"),
                Keybinding::new(KeyCode::Char('k'), KeyAction::NavigateUp, "K", "Navigate up"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Navigate down"),
                Keybinding::new(KeyCode::Char('j'), KeyAction::NavigateDown, "J", "Navigate down"),
                Keybinding::new(KeyCode::Char(' '), KeyAction::Toggle, "Space", "Select"),
                Keybinding::new(KeyCode::Enter, KeyAction::Toggle, "Enter", "Select"),
                Keybinding::new(KeyCode::Right, KeyAction::NextStep, "Right", "Next"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::NextStep, "N", "Next"),
                Keybinding::new(KeyCode::Left, KeyAction::PreviousStep, "Left", "Previous"),
                Keybinding::new(KeyCode::Char('p'), KeyAction::PreviousStep, "P", "Previous"),
                Keybinding::new(KeyCode::Char('c'), KeyAction::Checkout, "C", "Add to cart"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
                Keybinding::new(KeyCode::Esc, KeyAction::Quit, "Esc", "Quit"),
                Keybinding::with_modifiers(
                    KeyCode::Char('c'),
                    KeyModifiers::CONTROL,
                    KeyAction::Quit,
                    "Ctrl+C",
                    "Quit",
                ),
            ],
        }
    }

    /// Resolve a key press. Modifier bindings win over plain ones.
    pub fn action_for(&self, event: &KeyEvent) -> Option<KeyAction> {
        self.bindings
            .iter()
            .filter(|b| b.matches(event))
            .max_by_key(|b| b.modifiers.bits().count_ones())
            .map(|b| b.action)
    }

    /// All bindings for an action
    pub fn bindings_for(&self, action: KeyAction) -> Vec<&Keybinding> {
        self.bindings.iter().filter(|b| b.action == action).collect()
    }

    /// Navigation bar items, first binding of each action
    pub fn get_nav_items(&self) -> Vec<NavBarItem> {
        let order = [
            KeyAction::NavigateUp,
            KeyAction::Toggle,
            KeyAction::PreviousStep,
            KeyAction::NextStep,
            KeyAction::Checkout,
            KeyAction::Quit,
        ];

        order
            .into_iter()
            .filter_map(|action| {
                let binding = self.bindings.iter().find(|b| b.action == action)?;
                // Combine Up/Down into single item for cleaner display
                if action == KeyAction::NavigateUp {
                    return Some(NavBarItem {
                        key_display: "Up/Dn".to_string(),
                        action_label: "Navigate".to_string(),
                    });
                }
                Some(NavBarItem {
                    key_display: binding.display.clone(),
                    action_label: binding.description.clone(),
                })
            })
            .collect()
    }
}
