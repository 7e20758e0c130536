//! Keyboard input and the commands it maps to.
//!
//! Platform code converts native key events into a [`KeyCombo`]; the
//! resolvers here decide which symbolic command (if any) the combo means.
//! Combos that resolve to nothing are left to the platform's default
//! behavior.

use smol_str::SmolStr;

use crate::error::HookError;

/// Key values for keyboard input, as far as the hooks care about them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character key.
    Character(SmolStr),
    Backspace,
    Enter,
    Tab,
    /// Any other named key.
    Other(SmolStr),
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a `KeyboardEvent.key` value.
    pub fn parse(key: &str) -> Self {
        match key {
            "Backspace" => Self::Backspace,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            s if s.chars().count() == 1 => Self::Character(s.into()),
            s => Self::Other(s.into()),
        }
    }

    /// Check for a letter key, ignoring case (Shift may uppercase it).
    pub fn is_letter(&self, letter: char) -> bool {
        match self {
            Self::Character(s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
            }
            _ => false,
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META_SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: true,
    };

    /// Whether the platform's primary shortcut modifier is held.
    ///
    /// Cmd always counts; Ctrl counts off macOS.
    pub fn primary(&self, is_mac: bool) -> bool {
        self.meta || (!is_mac && self.ctrl)
    }
}

/// A key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn meta(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::META)
    }

    pub fn shift(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::SHIFT)
    }
}

/// Structural commands a keystroke inside a block can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockCommand {
    /// Backspace with the caret at offset 0 of the first cell.
    BackspaceFromStart,
    /// Shift+Enter: soft line break inside the block.
    SplitLine,
    /// Enter: split into two blocks.
    SplitBlock,
    ToggleBold,
    ToggleItalic,
}

impl BlockCommand {
    /// Outbound event name.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::BackspaceFromStart => "backspace_from_start",
            Self::SplitLine => "split_line",
            Self::SplitBlock => "split_block",
            Self::ToggleBold => "toggle.bold",
            Self::ToggleItalic => "toggle.italic",
        }
    }

    /// Resolve a keydown to a command. First match wins.
    ///
    /// `caret_at_start` is only consulted for Backspace, since computing it
    /// reads the live selection and may fail.
    pub fn resolve<F>(
        combo: &KeyCombo,
        is_mac: bool,
        caret_at_start: F,
    ) -> Result<Option<Self>, HookError>
    where
        F: FnOnce() -> Result<bool, HookError>,
    {
        let m = combo.modifiers;

        if combo.key == Key::Backspace && caret_at_start()? {
            return Ok(Some(Self::BackspaceFromStart));
        }

        if combo.key == Key::Enter {
            if m.shift && !m.meta {
                return Ok(Some(Self::SplitLine));
            }
            return Ok(Some(Self::SplitBlock));
        }

        if m.primary(is_mac) && !m.shift && !m.alt {
            if combo.key.is_letter('b') {
                return Ok(Some(Self::ToggleBold));
            }
            if combo.key.is_letter('i') {
                return Ok(Some(Self::ToggleItalic));
            }
        }

        Ok(None)
    }
}

/// Document-wide history shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

impl HistoryCommand {
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// Primary+Shift+Z and Primary+Y redo, Primary+Z undoes.
    pub fn resolve(combo: &KeyCombo, is_mac: bool) -> Option<Self> {
        let m = combo.modifiers;
        if !m.primary(is_mac) {
            return None;
        }
        if combo.key.is_letter('z') {
            return Some(if m.shift { Self::Redo } else { Self::Undo });
        }
        if combo.key.is_letter('y') {
            return Some(Self::Redo);
        }
        None
    }
}

/// Focus movement between sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationCommand {
    FocusPrevious,
    FocusNext,
}

impl NavigationCommand {
    pub fn event_name(self) -> &'static str {
        match self {
            Self::FocusPrevious => "focus_previous",
            Self::FocusNext => "focus_next",
        }
    }

    /// Tab moves forward, Shift+Tab backward. Cmd+Tab belongs to the OS.
    pub fn resolve(combo: &KeyCombo) -> Option<Self> {
        if combo.key != Key::Tab || combo.modifiers.meta {
            return None;
        }
        Some(if combo.modifiers.shift {
            Self::FocusPrevious
        } else {
            Self::FocusNext
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(combo: KeyCombo, at_start: bool) -> Option<BlockCommand> {
        BlockCommand::resolve(&combo, true, || Ok(at_start)).unwrap()
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(Key::parse("Backspace"), Key::Backspace);
        assert_eq!(Key::parse("b"), Key::character("b"));
        assert_eq!(Key::parse("ArrowLeft"), Key::Other("ArrowLeft".into()));
        assert!(Key::parse("Z").is_letter('z'));
        assert!(!Key::parse("zz").is_letter('z'));
    }

    #[test]
    fn test_backspace_at_start() {
        assert_eq!(
            resolve(KeyCombo::new(Key::Backspace), true),
            Some(BlockCommand::BackspaceFromStart)
        );
        assert_eq!(resolve(KeyCombo::new(Key::Backspace), false), None);
    }

    #[test]
    fn test_backspace_at_start_ignores_modifiers() {
        let all = Modifiers {
            ctrl: true,
            alt: true,
            shift: true,
            meta: true,
        };
        assert_eq!(
            resolve(KeyCombo::with_modifiers(Key::Backspace, all), true),
            Some(BlockCommand::BackspaceFromStart)
        );
    }

    #[test]
    fn test_caret_only_checked_for_backspace() {
        let result = BlockCommand::resolve(&KeyCombo::new(Key::Enter), true, || {
            Err(HookError::NoSelection)
        });
        assert_eq!(result, Ok(Some(BlockCommand::SplitBlock)));

        let result = BlockCommand::resolve(&KeyCombo::new(Key::Backspace), true, || {
            Err(HookError::NoSelection)
        });
        assert_eq!(result, Err(HookError::NoSelection));
    }

    #[test]
    fn test_enter_variants() {
        assert_eq!(resolve(KeyCombo::new(Key::Enter), false), Some(BlockCommand::SplitBlock));
        assert_eq!(resolve(KeyCombo::shift(Key::Enter), false), Some(BlockCommand::SplitLine));
        assert_eq!(
            resolve(KeyCombo::with_modifiers(Key::Enter, Modifiers::META_SHIFT), false),
            Some(BlockCommand::SplitBlock)
        );
    }

    #[test]
    fn test_formatting_toggles() {
        assert_eq!(
            resolve(KeyCombo::meta(Key::character("b")), false),
            Some(BlockCommand::ToggleBold)
        );
        assert_eq!(
            resolve(KeyCombo::meta(Key::character("i")), false),
            Some(BlockCommand::ToggleItalic)
        );
        assert_eq!(
            resolve(KeyCombo::with_modifiers(Key::character("b"), Modifiers::META_SHIFT), false),
            None
        );
        assert_eq!(resolve(KeyCombo::new(Key::character("b")), false), None);
    }

    #[test]
    fn test_ctrl_is_primary_off_mac() {
        let combo = KeyCombo::with_modifiers(Key::character("b"), Modifiers::CTRL);
        assert_eq!(BlockCommand::resolve(&combo, true, || Ok(false)), Ok(None));
        assert_eq!(
            BlockCommand::resolve(&combo, false, || Ok(false)),
            Ok(Some(BlockCommand::ToggleBold))
        );
    }

    #[test]
    fn test_command_event_names() {
        assert_eq!(BlockCommand::BackspaceFromStart.event_name(), "backspace_from_start");
        assert_eq!(BlockCommand::ToggleBold.event_name(), "toggle.bold");
        assert_eq!(BlockCommand::ToggleItalic.event_name(), "toggle.italic");
    }

    #[test]
    fn test_history_shortcuts() {
        let z = Key::character("z");
        assert_eq!(
            HistoryCommand::resolve(&KeyCombo::meta(z.clone()), true),
            Some(HistoryCommand::Undo)
        );
        assert_eq!(
            HistoryCommand::resolve(&KeyCombo::with_modifiers(Key::character("Z"), Modifiers::META_SHIFT), true),
            Some(HistoryCommand::Redo)
        );
        assert_eq!(
            HistoryCommand::resolve(&KeyCombo::with_modifiers(Key::character("y"), Modifiers::CTRL), false),
            Some(HistoryCommand::Redo)
        );
        assert_eq!(HistoryCommand::resolve(&KeyCombo::new(z), true), None);
    }

    #[test]
    fn test_navigation() {
        assert_eq!(
            NavigationCommand::resolve(&KeyCombo::new(Key::Tab)),
            Some(NavigationCommand::FocusNext)
        );
        assert_eq!(
            NavigationCommand::resolve(&KeyCombo::shift(Key::Tab)),
            Some(NavigationCommand::FocusPrevious)
        );
        assert_eq!(NavigationCommand::resolve(&KeyCombo::meta(Key::Tab)), None);
        assert_eq!(NavigationCommand::resolve(&KeyCombo::new(Key::Enter)), None);
    }
}
