//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions like Exit or ToggleBloom.
//! Mouse input is NOT mapped here - it goes directly to the OrbitController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by special keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Reset camera to starting position (R key)
    ResetCamera,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Toggle the frame stats overlay (F3)
    ToggleStats,
    /// Toggle the bloom post-process (B key)
    ToggleBloom,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for bound keys on press, `None` otherwise
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::F3 => Some(InputAction::ToggleStats),
            KeyCode::KeyB => Some(InputAction::ToggleBloom),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_exits() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(action, Some(InputAction::Exit));
    }

    #[test]
    fn test_unbound_keys_not_mapped() {
        for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::Space, KeyCode::F1] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_key_release_ignored() {
        for key in [KeyCode::Escape, KeyCode::KeyB, KeyCode::F3] {
            assert_eq!(InputMapper::map_keyboard(key, ElementState::Released), None);
        }
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyR, ElementState::Pressed),
            Some(InputAction::ResetCamera)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyF, ElementState::Pressed),
            Some(InputAction::ToggleFullscreen)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::F3, ElementState::Pressed),
            Some(InputAction::ToggleStats)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyB, ElementState::Pressed),
            Some(InputAction::ToggleBloom)
        );
    }
}
