//! Global hotkey listener using rdev
//!
//! One process-wide key hook feeds a pressed-key set; when the configured
//! chord completes on a key press while registration is active, the toggle
//! callback fires. Registration is an owned resource: `register` and
//! `unregister` are idempotent flag flips, and `rebind` swaps the chord
//! under the same hook.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rdev::{EventType, Key};

use crate::domain::hotkey::{ChordKey, HotkeyChord};

/// Toggle callback invoked on every chord press
pub type ToggleFn = Box<dyn Fn() + Send + Sync>;

struct ListenerState {
    chord: Mutex<HotkeyChord>,
    active: AtomicBool,
    hook_installed: AtomicBool,
    on_toggle: ToggleFn,
}

/// Global hotkey listener
pub struct RdevHotkeyListener {
    state: Arc<ListenerState>,
}

impl RdevHotkeyListener {
    /// Create a listener for `chord`. Nothing is registered until
    /// `register` is called.
    pub fn new(chord: HotkeyChord, on_toggle: ToggleFn) -> Self {
        Self {
            state: Arc::new(ListenerState {
                chord: Mutex::new(chord),
                active: AtomicBool::new(false),
                hook_installed: AtomicBool::new(false),
                on_toggle,
            }),
        }
    }

    /// Create a listener whose OS hook is never installed. Chord matching
    /// and registration bookkeeping behave normally; used where no input
    /// devices are available (tests, headless CI).
    pub fn detached(chord: HotkeyChord, on_toggle: ToggleFn) -> Self {
        let listener = Self::new(chord, on_toggle);
        listener.state.hook_installed.store(true, Ordering::SeqCst);
        listener
    }

    /// The currently bound chord
    pub fn chord(&self) -> HotkeyChord {
        *self.state.chord.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a combination is currently live
    pub fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Register the chord. No-op if already registered. A hook that fails
    /// to install is logged and leaves the listener inactive; there is no
    /// automatic retry.
    pub fn register(&self) {
        if self.state.active.swap(true, Ordering::SeqCst) {
            return;
        }
        self.install_hook();
        tracing::info!(hotkey = %self.chord(), "hotkey registered");
    }

    /// Unregister the chord. Idempotent. The OS hook stays installed but
    /// stops delivering toggles.
    pub fn unregister(&self) {
        if self.state.active.swap(false, Ordering::SeqCst) {
            tracing::info!("hotkey unregistered");
        }
    }

    /// Swap the bound chord: unregister the current combination if active,
    /// store the new one, re-register.
    pub fn rebind(&self, chord: HotkeyChord) {
        self.unregister();
        {
            let mut current = self.state.chord.lock().unwrap_or_else(|e| e.into_inner());
            *current = chord;
        }
        self.register();
        tracing::info!(hotkey = %chord, "hotkey rebound");
    }

    fn install_hook(&self) {
        if self.state.hook_installed.swap(true, Ordering::SeqCst) {
            return;
        }

        let state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            let mut pressed: HashSet<Key> = HashSet::new();
            let callback_state = Arc::clone(&state);

            let result = rdev::listen(move |event| match event.event_type {
                EventType::KeyPress(key) => {
                    pressed.insert(key);
                    if callback_state.active.load(Ordering::SeqCst) {
                        let chord = *callback_state
                            .chord
                            .lock()
                            .unwrap_or_else(|e| e.into_inner());
                        if chord_matches(&chord, &pressed, key) {
                            tracing::info!(hotkey = %chord, "hotkey pressed");
                            (callback_state.on_toggle)();
                        }
                    }
                }
                EventType::KeyRelease(key) => {
                    pressed.remove(&key);
                }
                _ => {}
            });

            if let Err(e) = result {
                tracing::error!(?e, "failed to install global key hook");
                state.active.store(false, Ordering::SeqCst);
                state.hook_installed.store(false, Ordering::SeqCst);
            }
        });
    }
}

/// Whether `just_pressed` completes `chord` given the full held-key set.
/// Extra held keys beyond the chord's modifiers are ignored.
fn chord_matches(chord: &HotkeyChord, pressed: &HashSet<Key>, just_pressed: Key) -> bool {
    let Some(terminal) = to_rdev(chord.key) else {
        return false;
    };
    if just_pressed != terminal {
        return false;
    }

    let ctrl = pressed.contains(&Key::ControlLeft) || pressed.contains(&Key::ControlRight);
    let alt = pressed.contains(&Key::Alt) || pressed.contains(&Key::AltGr);
    let shift = pressed.contains(&Key::ShiftLeft) || pressed.contains(&Key::ShiftRight);
    let meta = pressed.contains(&Key::MetaLeft) || pressed.contains(&Key::MetaRight);

    (!chord.ctrl || ctrl)
        && (!chord.alt || alt)
        && (!chord.shift || shift)
        && (!chord.meta || meta)
}

/// Map a chord key to the rdev key it listens for
fn to_rdev(key: ChordKey) -> Option<Key> {
    let key = match key {
        ChordKey::Space => Key::Space,
        ChordKey::Escape => Key::Escape,
        ChordKey::Function(n) => match n {
            1 => Key::F1,
            2 => Key::F2,
            3 => Key::F3,
            4 => Key::F4,
            5 => Key::F5,
            6 => Key::F6,
            7 => Key::F7,
            8 => Key::F8,
            9 => Key::F9,
            10 => Key::F10,
            11 => Key::F11,
            12 => Key::F12,
            _ => return None,
        },
        ChordKey::Digit(c) => match c {
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
        },
        ChordKey::Letter(c) => match c {
            'a' => Key::KeyA,
            'b' => Key::KeyB,
            'c' => Key::KeyC,
            'd' => Key::KeyD,
            'e' => Key::KeyE,
            'f' => Key::KeyF,
            'g' => Key::KeyG,
            'h' => Key::KeyH,
            'i' => Key::KeyI,
            'j' => Key::KeyJ,
            'k' => Key::KeyK,
            'l' => Key::KeyL,
            'm' => Key::KeyM,
            'n' => Key::KeyN,
            'o' => Key::KeyO,
            'p' => Key::KeyP,
            'q' => Key::KeyQ,
            'r' => Key::KeyR,
            's' => Key::KeyS,
            't' => Key::KeyT,
            'u' => Key::KeyU,
            'v' => Key::KeyV,
            'w' => Key::KeyW,
            'x' => Key::KeyX,
            'y' => Key::KeyY,
            'z' => Key::KeyZ,
            _ => return None,
        },
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(combo: &str) -> HotkeyChord {
        combo.parse().unwrap()
    }

    fn held(keys: &[Key]) -> HashSet<Key> {
        keys.iter().copied().collect()
    }

    #[test]
    fn chord_matches_full_combination() {
        let c = chord("ctrl+alt+d");
        let pressed = held(&[Key::ControlLeft, Key::Alt, Key::KeyD]);
        assert!(chord_matches(&c, &pressed, Key::KeyD));
    }

    #[test]
    fn chord_requires_all_modifiers() {
        let c = chord("ctrl+alt+d");
        let pressed = held(&[Key::ControlLeft, Key::KeyD]);
        assert!(!chord_matches(&c, &pressed, Key::KeyD));
    }

    #[test]
    fn chord_only_fires_on_terminal_key() {
        let c = chord("ctrl+alt+d");
        let pressed = held(&[Key::ControlLeft, Key::Alt]);
        assert!(!chord_matches(&c, &pressed, Key::ControlLeft));
    }

    #[test]
    fn chord_accepts_right_hand_modifiers() {
        let c = chord("ctrl+shift+f5");
        let pressed = held(&[Key::ControlRight, Key::ShiftRight, Key::F5]);
        assert!(chord_matches(&c, &pressed, Key::F5));
    }

    #[test]
    fn extra_held_keys_are_ignored() {
        let c = chord("f9");
        let pressed = held(&[Key::ShiftLeft, Key::F9]);
        assert!(chord_matches(&c, &pressed, Key::F9));
    }

    #[test]
    fn to_rdev_maps_common_keys() {
        assert_eq!(to_rdev(ChordKey::Letter('d')), Some(Key::KeyD));
        assert_eq!(to_rdev(ChordKey::Digit('3')), Some(Key::Num3));
        assert_eq!(to_rdev(ChordKey::Function(12)), Some(Key::F12));
        assert_eq!(to_rdev(ChordKey::Space), Some(Key::Space));
    }

    #[test]
    fn register_and_unregister_are_idempotent() {
        let listener = RdevHotkeyListener::detached(chord("ctrl+alt+d"), Box::new(|| {}));

        assert!(!listener.is_active());
        listener.register();
        listener.register();
        assert!(listener.is_active());

        listener.unregister();
        assert!(!listener.is_active());
        listener.unregister();
        assert!(!listener.is_active());
    }

    #[test]
    fn rebind_swaps_chord_and_stays_active() {
        let listener = RdevHotkeyListener::detached(chord("ctrl+alt+d"), Box::new(|| {}));
        listener.register();

        listener.rebind(chord("ctrl+shift+r"));
        assert!(listener.is_active());
        assert_eq!(listener.chord(), chord("ctrl+shift+r"));
    }

    #[test]
    fn rebind_while_inactive_registers() {
        let listener = RdevHotkeyListener::detached(chord("ctrl+alt+d"), Box::new(|| {}));
        listener.rebind(chord("f9"));
        assert!(listener.is_active());
    }
}
