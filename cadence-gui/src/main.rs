//! # Cadence Tracker GUI
//!
//! Desktop front end for the cadence tracker. It measures tapping
//! cadence (BPM) from keyboard input and exports each finished session
//! as CSV.
//!
//! ## Architecture
//! - **Single thread**: strictly event-driven; the tracker runs
//!   synchronously in the Iced update loop, no workers or timers
//! - **Input**: keyboard press/release subscriptions, Escape cancels
//! - **Output**: the tracker's readout and sample log are snapshotted
//!   into plain display data after every event; the view only reads it

mod fault;
mod ui;

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::anyhow;
use cadence_core::TapReadout;
use cadence_core::config::TrackerSettings;
use cadence_core::export;
use cadence_core::tracker::CadenceTracker;
use iced::keyboard::{self, Key, key::Named};
use iced::{self, Element, Subscription, Theme};
use ui::main_display::create_main_view;

use crate::fault::{FaultKind, FaultPolicy};

/// Settings file kept next to the executable.
const SETTINGS_PATH: &str = "cadence_settings.json";

/// Offset added to named-key codes so they never collide with the
/// Unicode scalar values used for character keys.
const NAMED_KEY_BASE: u32 = 0x0100_0000;

/// Main entry point for the Cadence Tracker application.
///
/// Installs the panic hook, then runs the Iced application with dark
/// theme and the keyboard subscriptions.
pub fn main() -> iced::Result {
    eprintln!("[MAIN] Starting Cadence Tracker...");
    fault::install_panic_hook();
    let result = iced::application("Cadence Tracker", CadenceApp::update, CadenceApp::view)
        .subscription(CadenceApp::subscription)
        .theme(CadenceApp::theme)
        .run();
    eprintln!("[MAIN] Application finished with result: {:?}", result);
    result
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    // Keyboard input
    KeyPressed(u32),  // A non-cancel key went down
    KeyReleased(u32), // A non-cancel key came back up
    CancelPressed,    // Escape: stop recording, clear held keys

    // Transport buttons
    StartPressed,
    StopPressed,

    // Working tool visibility toggles
    ToggleReadout, // Show/hide the readout panel
    ToggleTapPlot, // Show/hide the tap plot panel

    // Settings persistence
    SaveSettings,
    LoadSettings,
}

/// UI-specific data needed for rendering the interface.
///
/// This struct contains only the data that the UI components need; it
/// is refreshed from the tracker after every message.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    pub recording: bool,
    pub readout: TapReadout,
    /// Per-sample BPM series for the tap plot, insertion order.
    pub bpm_series: Vec<f32>,

    // UI visibility states
    pub readout_visible: bool,
    pub plot_visible: bool,

    /// Where the last finished session was written, for the status line.
    pub last_export: Option<PathBuf>,
}

/// Main application state for the Cadence Tracker.
struct CadenceApp {
    tracker: CadenceTracker,
    settings: TrackerSettings,
    faults: FaultPolicy,

    // Single source of truth for all display data
    display_data: AppDisplayData,
}

impl Default for CadenceApp {
    fn default() -> Self {
        eprintln!("[MAIN] Creating CadenceApp...");
        let settings = match load_settings(SETTINGS_PATH) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("[MAIN] No usable settings at {SETTINGS_PATH} ({e}), using defaults");
                TrackerSettings::default()
            }
        };

        let tracker = CadenceTracker::new();
        let display_data = AppDisplayData {
            recording: false,
            readout: tracker.readout(),
            bpm_series: Vec::new(),
            readout_visible: true,
            plot_visible: true,
            last_export: None,
        };
        Self {
            tracker,
            settings,
            faults: FaultPolicy,
            display_data,
        }
    }
}

impl CadenceApp {
    /// Handles application state updates based on incoming messages.
    ///
    /// Every path out of a recording session (Stop button, Escape,
    /// tap-count target) funnels through `finish_session` so exactly one
    /// export happens per session.
    fn update(&mut self, message: Message) {
        match message {
            Message::KeyPressed(key) => {
                // Repeats carry no marker at this layer; the tracker's
                // held-key filter absorbs them.
                let was_recording = self.tracker.is_recording();
                self.tracker
                    .key_down(key, false, &self.settings, Instant::now());
                if was_recording && !self.tracker.is_recording() {
                    eprintln!("[MAIN] Tap target reached, session stopped");
                    self.finish_session();
                }
            }
            Message::KeyReleased(key) => {
                self.tracker.key_up(key);
            }
            Message::CancelPressed => {
                let was_recording = self.tracker.is_recording();
                self.tracker.cancel();
                if was_recording {
                    self.finish_session();
                }
            }
            Message::StartPressed => {
                self.tracker.begin_session(&self.settings, Instant::now());
                self.display_data.last_export = None;
            }
            Message::StopPressed => {
                let was_recording = self.tracker.is_recording();
                self.tracker.end_session();
                if was_recording {
                    self.finish_session();
                }
            }
            Message::ToggleReadout => {
                self.display_data.readout_visible = !self.display_data.readout_visible;
            }
            Message::ToggleTapPlot => {
                self.display_data.plot_visible = !self.display_data.plot_visible;
            }
            Message::SaveSettings => match save_settings(&self.settings, SETTINGS_PATH) {
                Ok(_) => eprintln!("[MAIN] Settings saved to {SETTINGS_PATH}"),
                Err(e) => self
                    .faults
                    .report(FaultKind::BestEffort, &anyhow!(e).context("saving settings")),
            },
            Message::LoadSettings => match load_settings(SETTINGS_PATH) {
                Ok(settings) => {
                    eprintln!("[MAIN] Settings loaded: {settings:?}");
                    self.settings = settings;
                }
                Err(e) => self
                    .faults
                    .report(FaultKind::BestEffort, &anyhow!(e).context("loading settings")),
            },
        }

        self.refresh_display();
    }

    /// Single exit path for a finished session: export the sample log
    /// and remember where it went for the status line.
    fn finish_session(&mut self) {
        match export::export_samples(self.tracker.samples(), Path::new(export::EXPORT_DIR)) {
            Ok(Some(path)) => {
                self.display_data.last_export = Some(path);
            }
            Ok(None) => {
                eprintln!("[MAIN] Session ended with no samples, nothing to export");
            }
            Err(e) => {
                self.faults
                    .report(FaultKind::BestEffort, &e.context("exporting session"));
            }
        }
    }

    /// Snapshots tracker output into the display data. The tracker
    /// never touches widgets; the view only reads this struct.
    fn refresh_display(&mut self) {
        let readout = self.tracker.readout();
        let samples = self.tracker.samples();
        if samples.len() > readout.tap_count {
            self.faults.report(
                FaultKind::Invariant,
                &anyhow!(
                    "sample log ({}) outran the tap count ({})",
                    samples.len(),
                    readout.tap_count
                ),
            );
        }
        self.display_data.recording = self.tracker.is_recording();
        self.display_data.bpm_series = samples.iter().map(|s| s.bpm as f32).collect();
        self.display_data.readout = readout;
    }

    /// Renders the main application interface.
    ///
    /// Delegates all UI rendering to the main_display module, keeping
    /// this function focused on application logic only.
    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    /// Keyboard subscriptions: presses and releases, with Escape mapped
    /// to the cancel request on press and swallowed on release.
    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::on_key_press(|key, _modifiers| {
                if key == Key::Named(Named::Escape) {
                    return Some(Message::CancelPressed);
                }
                key_code(&key).map(Message::KeyPressed)
            }),
            keyboard::on_key_release(|key, _modifiers| {
                if key == Key::Named(Named::Escape) {
                    return None;
                }
                key_code(&key).map(Message::KeyReleased)
            }),
        ])
    }

    /// Returns the application theme.
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Maps an Iced logical key to the integer identifier recorded with
/// each tap: character keys use their first Unicode scalar value, named
/// keys an offset code.
fn key_code(key: &Key) -> Option<u32> {
    match key {
        Key::Character(c) => c.chars().next().map(|ch| ch as u32),
        Key::Named(named) => Some(NAMED_KEY_BASE + *named as u32),
        Key::Unidentified => None,
    }
}

// --- Settings Save/Load Functions ---

/// Saves the tracker settings to a JSON file.
fn save_settings(settings: &TrackerSettings, path: &str) -> std::io::Result<()> {
    let json_string = serde_json::to_string_pretty(settings)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Loads tracker settings from a JSON file.
///
/// The caller treats any failure (missing file, malformed JSON, wrong
/// value types) as "use defaults" - a bad settings file must never take
/// the application down or surface as an error.
fn load_settings(path: &str) -> std::io::Result<TrackerSettings> {
    let mut file = File::open(path)?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    let settings: TrackerSettings = serde_json::from_str(&data)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_keys_map_to_unicode_scalars() {
        assert_eq!(key_code(&Key::Character("a".into())), Some('a' as u32));
        assert_eq!(key_code(&Key::Character("Z".into())), Some('Z' as u32));
    }

    #[test]
    fn named_keys_do_not_collide_with_characters() {
        let space = key_code(&Key::Named(Named::Space)).unwrap();
        assert!(space >= NAMED_KEY_BASE);
    }

    #[test]
    fn unidentified_keys_are_dropped() {
        assert_eq!(key_code(&Key::Unidentified), None);
    }
}
