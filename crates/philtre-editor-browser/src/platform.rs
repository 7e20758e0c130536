//! Browser/OS detection for platform-specific shortcuts.

use philtre_editor_core::{Key, KeyCombo, Modifiers};

/// Whether the browser runs on an Apple platform, where Cmd is the only
/// primary modifier.
pub fn is_mac() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let navigator = window.navigator();
    let platform = navigator.platform().unwrap_or_default();
    let user_agent = navigator.user_agent().unwrap_or_default();
    is_apple(&platform, &user_agent)
}

fn is_apple(platform: &str, user_agent: &str) -> bool {
    platform.starts_with("Mac")
        || platform.starts_with("iP")
        || user_agent.contains("Mac OS X")
        || user_agent.contains("iPhone")
        || user_agent.contains("iPad")
}

/// Key combination of a browser keydown.
pub fn key_combo(event: &web_sys::KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::parse(&event.key()),
        Modifiers {
            meta: event.meta_key(),
            ctrl: event.ctrl_key(),
            shift: event.shift_key(),
            alt: event.alt_key(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apple_detection() {
        assert!(is_apple("MacIntel", ""));
        assert!(is_apple("iPhone", ""));
        assert!(is_apple(
            "",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15"
        ));
        assert!(!is_apple("Win32", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"));
        assert!(!is_apple("Linux x86_64", "Mozilla/5.0 (X11; Linux x86_64)"));
    }
}
