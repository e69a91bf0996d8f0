//! Persisted best-score cell
//!
//! One integer in LocalStorage: read at startup, rewritten only when beaten.

/// The best score ever achieved on this machine
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_rush_high_score";

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether `score` would beat the stored best
    pub fn beats(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished session's score. Returns true (and persists) only
    /// when the best was beaten.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.beats(score) {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Load the stored best from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse::<u64>() {
                    log::info!("Loaded high score: {}", best);
                    return Self { best };
                }
                log::warn!("Ignoring unparseable high score entry: {:?}", raw);
            }
        }

        log::info!("No stored high score, starting fresh");
        Self::default()
    }

    /// Persist the stored best to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("High score saved: {}", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // In-memory only off the web
    }
}
