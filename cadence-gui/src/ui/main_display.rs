//! # Main Display Module
//!
//! This module contains the main display components and layout logic
//! for the Cadence Tracker application.

use iced::widget::{Space, button, column, container, row, text};
use iced::{Alignment, Element, Length};

use super::tap_plot;

/// Configuration for a single button in the settings sidebar
#[derive(Debug, Clone)]
struct ButtonConfig {
    label: &'static str,
    message: crate::Message,
}

/// Static settings configuration - no need for a function
const SETTINGS_CONFIG: &[(&str, &[ButtonConfig])] = &[
    (
        "Tools",
        &[
            ButtonConfig {
                label: "Readout",
                message: crate::Message::ToggleReadout,
            },
            ButtonConfig {
                label: "Tap plot",
                message: crate::Message::ToggleTapPlot,
            },
        ],
    ),
    (
        "Program",
        &[
            ButtonConfig {
                label: "Save Settings",
                message: crate::Message::SaveSettings,
            },
            ButtonConfig {
                label: "Load Settings",
                message: crate::Message::LoadSettings,
            },
        ],
    ),
];

/// Creates the complete main application view
pub fn create_main_view(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let title = text("Cadence Tracker").size(28);

    // Build UI panels using dedicated helper methods
    let readout_panel = create_readout_panel(data);
    let plot_panel = create_plot_panel(data);

    let mut content = column![title, Space::with_height(20)]
        .width(Length::Fill)
        .spacing(10);
    if let Some(panel) = readout_panel {
        content = content.push(panel);
    }
    if let Some(panel) = plot_panel {
        content = content.push(panel);
    }
    content = content.push(create_transport_row(data));
    content = content.push(create_status_line(data));

    let main_content = row![content, Space::with_width(10), create_sidebar()]
        .align_y(Alignment::Start)
        .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Creates the readout panel: tap rate, BPM, and the running tap count.
fn create_readout_panel(data: &crate::AppDisplayData) -> Option<Element<'static, crate::Message>> {
    if !data.readout_visible {
        return None;
    }

    let readout = &data.readout;
    let (rate_text, bpm_text) = match (readout.taps_per_second, readout.bpm) {
        (Some(tps), Some(bpm)) => (format!("{tps:.1} Taps/s"), format!("{bpm:.0} BPM")),
        // Recording but not enough interval history for a sample yet.
        _ if data.recording => ("0 Taps/s".to_string(), "0 BPM".to_string()),
        _ => ("-- Taps/s".to_string(), "-- BPM".to_string()),
    };
    let count_text = format!("{} taps", readout.tap_count);

    let panel = container(
        column![
            text("Readout").size(18),
            Space::with_height(10),
            text(rate_text).size(24),
            text(bpm_text).size(32),
            text(count_text).size(14),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(190.0));

    Some(panel.into())
}

/// Creates the tap plot panel.
fn create_plot_panel(data: &crate::AppDisplayData) -> Option<Element<'static, crate::Message>> {
    if !data.plot_visible {
        return None;
    }

    let plot_content = container(tap_plot::TapPlot::new(data.bpm_series.clone()).view())
        .width(Length::Fill)
        .height(Length::Fill);

    let panel = container(
        column![
            text("Tap plot").size(18),
            Space::with_height(10),
            plot_content
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(220.0));

    Some(panel.into())
}

/// Creates the Start/Stop transport row. The Stop button turns red
/// while a session is recording.
fn create_transport_row(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let start = button(text("Start").size(14))
        .padding([6, 10])
        .on_press(crate::Message::StartPressed);

    let mut stop = button(text("Stop").size(14)).padding([6, 10]);
    if data.recording {
        stop = stop.style(|_theme, _status| {
            use iced::widget::button;
            button::Style {
                background: Some(iced::Background::Color(iced::Color::from_rgb(
                    0.8, 0.2, 0.2,
                ))),
                text_color: iced::Color::WHITE,
                ..button::Style::default()
            }
        });
    }
    let stop = stop.on_press(crate::Message::StopPressed);

    row![start, Space::with_width(10), stop]
        .align_y(Alignment::Center)
        .into()
}

/// Creates the status line under the transport row: "Recording" while a
/// session is active, the exported file path after a stop.
fn create_status_line(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let status = if data.recording {
        "Recording".to_string()
    } else if let Some(path) = &data.last_export {
        format!("Saved {}", path.display())
    } else {
        String::new()
    };
    text(status).size(14).into()
}

/// Creates the settings sidebar widget from the static section table.
fn create_sidebar() -> Element<'static, crate::Message> {
    let mut sections = column![].spacing(10);

    for (title, buttons) in SETTINGS_CONFIG {
        sections = sections.push(make_settings_section(title, buttons));
    }

    container(sections.padding(15))
        .width(Length::Fixed(220.0))
        .height(Length::Fill)
        .into()
}

/// Creates a sidebar button from its configuration.
fn make_button(config: &ButtonConfig) -> Element<'static, crate::Message> {
    button(text(config.label).size(14).width(Length::Fill))
        .padding([6, 10])
        .on_press(config.message.clone())
        .into()
}

/// Creates a settings section with title and buttons.
fn make_settings_section(
    title: &'static str,
    buttons: &[ButtonConfig],
) -> Element<'static, crate::Message> {
    let title_widget = text(title).size(18);

    let items_widget = buttons
        .iter()
        .fold(column![].spacing(8), |col, config| {
            col.push(make_button(config))
        });

    column![title_widget, Space::with_height(10), items_widget]
        .spacing(5)
        .into()
}
