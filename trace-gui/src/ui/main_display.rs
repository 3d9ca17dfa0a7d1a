//! # Main Display Module
//!
//! Layout for the PitchTrace window: the pitch readout and speed control
//! in the header, transient status banners, and the trace canvas filling
//! the rest of the window.

use iced::widget::{Space, column, container, horizontal_space, row, slider, text};
use iced::{Alignment, Element, Length};

use super::{detune_meter, trace_canvas};
use crate::{Message, TraceApp};

/// Creates the complete main application view.
pub fn create_main_view(app: &TraceApp) -> Element<'_, Message> {
    let title = text("PitchTrace").size(28);

    let header = row![
        title,
        Space::with_width(30),
        create_readout(app),
        horizontal_space(),
        create_speed_control(app.speed),
    ]
    .align_y(Alignment::Center);

    let mut content = column![header].spacing(10).padding(20);

    if let Some(banner) = status_banner(app) {
        content = content.push(banner);
    }

    content = content.push(trace_canvas::TraceCanvas::new(&app.marks, &app.trace_cache).view());

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// The live pitch readout: note name with octave, frequency, cents, and
/// the detune meter.
fn create_readout(app: &TraceApp) -> Element<'_, Message> {
    let (note_text, freq_text, cents) = match &app.estimate {
        Some(estimate) => (
            format!("{}{}", estimate.note_name, estimate.octave),
            format!("{:.2} Hz", estimate.frequency),
            Some(estimate.cents_offset),
        ),
        None => ("--".to_string(), "0.00 Hz".to_string(), None),
    };

    let cents_text = cents
        .map(|c| format!("{c:+.1} cents"))
        .unwrap_or_else(|| "-- cents".to_string());

    let rate_text = app
        .sample_rate
        .map(|rate| format!("{rate} Hz capture"))
        .unwrap_or_else(|| "no capture".to_string());

    row![
        text(note_text).size(36),
        Space::with_width(15),
        column![
            text(freq_text).size(16),
            text(cents_text).size(16),
            text(rate_text).size(12),
        ],
        Space::with_width(15),
        detune_meter::DetuneMeter::new(cents).view(),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// The trajectory speed slider, 1-100.
fn create_speed_control(speed: u8) -> Element<'static, Message> {
    row![
        text(format!("Speed {speed}")).size(14),
        Space::with_width(10),
        slider(1..=100u8, speed, Message::SpeedChanged).width(Length::Fixed(160.0)),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// The status banner: a persistent error when acquisition failed, or the
/// transient capture-started notification.
fn status_banner(app: &TraceApp) -> Option<Element<'_, Message>> {
    if let Some(error) = &app.audio_error {
        let banner = container(text(format!("Microphone unavailable: {error}")).size(16))
            .padding(8)
            .width(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(iced::Color::from_rgb(
                    0.8, 0.2, 0.2,
                ))),
                text_color: Some(iced::Color::WHITE),
                ..container::Style::default()
            });
        return Some(banner.into());
    }

    if app.notification.is_some() {
        let banner = container(text("Microphone connected - listening.").size(16))
            .padding(8)
            .width(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(iced::Color::from_rgb(
                    0.2, 0.6, 0.3,
                ))),
                text_color: Some(iced::Color::WHITE),
                ..container::Style::default()
            });
        return Some(banner.into());
    }

    None
}
