//! # Detune Meter Widget
//!
//! A horizontal bar growing from the center line toward the adjacent
//! note: right when the detected pitch is sharp, left when flat. Bar
//! length follows the detune percentage (50 cents = full deflection),
//! colored by accuracy.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Size, Theme, mouse};
use trace_core::tuning;

const METER_WIDTH: f32 = 160.0;
const METER_HEIGHT: f32 = 24.0;

/// Detune meter widget for displaying tuning accuracy.
pub struct DetuneMeter {
    /// Current cents deviation (None if no pitch detected yet)
    cents: Option<f32>,
}

impl DetuneMeter {
    pub fn new(cents: Option<f32>) -> Self {
        Self { cents }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fixed(METER_WIDTH))
                .height(iced::Length::Fixed(METER_HEIGHT)),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for DetuneMeter {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let background = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&background, Color::from_rgb8(0x30, 0x30, 0x30));

        let center_x = bounds.width / 2.0;

        if let Some(cents) = self.cents {
            let deflection = (tuning::detune_percent(cents).min(100.0) / 100.0) * center_x;

            let color = if cents.abs() < 5.0 {
                Color::from_rgb8(0x34, 0xDB, 0x98) // Green
            } else if cents.abs() < 20.0 {
                Color::from_rgb8(0xFF, 0xC3, 0x00) // Yellow
            } else {
                Color::from_rgb8(0xFF, 0x33, 0x33) // Red
            };

            let bar = if cents >= 0.0 {
                Path::rectangle(
                    Point::new(center_x, 2.0),
                    Size::new(deflection, bounds.height - 4.0),
                )
            } else {
                Path::rectangle(
                    Point::new(center_x - deflection, 2.0),
                    Size::new(deflection, bounds.height - 4.0),
                )
            };
            frame.fill(&bar, color);
        }

        let center_line = Path::line(
            Point::new(center_x, 0.0),
            Point::new(center_x, bounds.height),
        );
        frame.stroke(
            &center_line,
            Stroke::default().with_width(1.0).with_color(Color::WHITE),
        );

        vec![frame.into_geometry()]
    }
}
