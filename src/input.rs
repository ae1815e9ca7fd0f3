use std::collections::HashSet;

/// Keys the lessons react to. Everything else is dropped by the window layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F1,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleFullscreen,
}

/// Turns raw key state changes into commands, once per physical press.
///
/// Held keys report repeated presses without a release in between; those
/// are swallowed until the key goes up again.
#[derive(Debug, Default)]
pub struct Controls {
    held: HashSet<Key>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key(&mut self, key: Key, pressed: bool) -> Option<Command> {
        if !pressed {
            self.held.remove(&key);
            return None;
        }

        if !self.held.insert(key) {
            return None;
        }

        match key {
            Key::Escape => Some(Command::Quit),
            Key::F1 => Some(Command::ToggleFullscreen),
        }
    }

    #[cfg(test)]
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_maps_to_command() {
        let mut controls = Controls::new();

        assert_eq!(controls.on_key(Key::Escape, true), Some(Command::Quit));
        assert_eq!(
            controls.on_key(Key::F1, true),
            Some(Command::ToggleFullscreen)
        );
    }

    #[test]
    fn repeat_is_swallowed_until_release() {
        let mut controls = Controls::new();

        assert!(controls.on_key(Key::F1, true).is_some());
        assert!(controls.on_key(Key::F1, true).is_none());
        assert!(controls.on_key(Key::F1, true).is_none());
        assert!(controls.is_held(Key::F1));

        assert!(controls.on_key(Key::F1, false).is_none());
        assert!(!controls.is_held(Key::F1));
        assert!(controls.on_key(Key::F1, true).is_some());
    }

    #[test]
    fn release_without_press() {
        let mut controls = Controls::new();

        assert!(controls.on_key(Key::Escape, false).is_none());
        assert_eq!(controls.on_key(Key::Escape, true), Some(Command::Quit));
    }
}
