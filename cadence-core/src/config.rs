//! # Tracker Settings Module
//!
//! The one piece of configuration the tracker carries: the tap-count
//! auto-stop target and the rolling window size. Settings are read at
//! the moment a session begins and held fixed for that session.

use serde::{Deserialize, Serialize};

/// Default rolling window size in inter-tap intervals.
pub const DEFAULT_WINDOW: usize = 10;

/// Settings persisted as JSON by the application shell.
///
/// Missing fields deserialize to their defaults; a file that fails to
/// parse at all is treated as "use defaults" at the load site, never as
/// an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Tap count at which a session stops itself. 0 means unlimited.
    #[serde(default)]
    pub target_taps: u32,
    /// Rolling window W: how many inter-tap intervals are averaged into
    /// each BPM sample.
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            target_taps: 0,
            window: DEFAULT_WINDOW,
        }
    }
}

impl TrackerSettings {
    /// Returns a copy with the window forced into a usable shape: zero
    /// falls back to the default and an odd value is bumped to the next
    /// even one. The window must stay even so alternating two-key
    /// tapping converges to a stable reading instead of oscillating.
    pub fn normalized(&self) -> Self {
        let window = match self.window {
            0 => DEFAULT_WINDOW,
            w if w % 2 == 1 => w + 1,
            w => w,
        };
        Self {
            target_taps: self.target_taps,
            window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = TrackerSettings::default();
        assert_eq!(settings.target_taps, 0);
        assert_eq!(settings.window, 10);
    }

    #[test]
    fn normalized_fixes_degenerate_windows() {
        let zero = TrackerSettings {
            target_taps: 0,
            window: 0,
        };
        assert_eq!(zero.normalized().window, DEFAULT_WINDOW);

        let odd = TrackerSettings {
            target_taps: 0,
            window: 7,
        };
        assert_eq!(odd.normalized().window, 8);

        let even = TrackerSettings {
            target_taps: 5,
            window: 10,
        };
        assert_eq!(even.normalized(), even);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let settings: TrackerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, TrackerSettings::default());

        let settings: TrackerSettings = serde_json::from_str(r#"{"target_taps": 5}"#).unwrap();
        assert_eq!(settings.target_taps, 5);
        assert_eq!(settings.window, DEFAULT_WINDOW);
    }

    #[test]
    fn malformed_values_fall_back_to_unlimited() {
        // A non-numeric target fails to parse; the load site maps that
        // to the default (unlimited) rather than an error.
        let parsed = serde_json::from_str::<TrackerSettings>(r#"{"target_taps": "five"}"#);
        assert!(parsed.is_err());
        let settings = parsed.unwrap_or_default();
        assert_eq!(settings.target_taps, 0);
    }

    #[test]
    fn json_roundtrip() {
        let settings = TrackerSettings {
            target_taps: 40,
            window: 6,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed: TrackerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
