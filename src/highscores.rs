//! Snake high score persistence
//!
//! A single best-run value, persisted to LocalStorage.

use serde::{Deserialize, Serialize};

/// Best Glitch Snake run seen on this browser
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub bits: u32,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_arcade_snake_highscore";

    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// Record a finished run. Returns true if the score improved.
    pub fn submit(&mut self, bits: u32) -> bool {
        if bits > self.bits {
            self.bits = bits;
            return true;
        }
        false
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(score) = serde_json::from_str::<HighScore>(&json) {
                    log::info!("Loaded high score: {}", score.bits);
                    return score;
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::new()
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High score saved ({})", self.bits);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_keeps_best() {
        let mut score = HighScore::new();
        assert!(score.submit(5));
        assert!(!score.submit(3));
        assert!(!score.submit(5));
        assert_eq!(score.bits, 5);
        assert!(score.submit(8));
        assert_eq!(score.bits, 8);
    }

    #[test]
    fn test_roundtrip_json() {
        let score = HighScore { bits: 42 };
        let json = serde_json::to_string(&score).unwrap();
        let back: HighScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bits, 42);
    }
}
