//! # Trace Canvas Widget
//!
//! Renders the trailing pitch trajectory: one small mark per trajectory
//! tick, appended left to right (or right to left) as the cursor moves.
//! The mark list is append-only between resets, preserving the trail of
//! everything drawn so far.

use iced::widget::canvas::{self, Geometry, Path};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Size, Theme, mouse};

/// Width of one trajectory mark in logical pixels.
const MARK_WIDTH: f32 = 1.0;

/// Height of one trajectory mark in logical pixels.
const MARK_HEIGHT: f32 = 5.0;

/// One drawn mark of the trajectory.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    pub x: i32,
    pub y: i32,
}

/// Trace canvas widget displaying the accumulated marks.
///
/// Geometry is cached between frames; the application clears the cache
/// whenever the mark list changes.
pub struct TraceCanvas<'a> {
    marks: &'a [Mark],
    cache: &'a canvas::Cache,
}

impl<'a> TraceCanvas<'a> {
    pub fn new(marks: &'a [Mark], cache: &'a canvas::Cache) -> Self {
        Self { marks, cache }
    }

    pub fn view(self) -> Element<'a, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(crate::CANVAS_HEIGHT)),
        )
        .into()
    }
}

impl<'a, Message> canvas::Program<Message> for TraceCanvas<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let trace = self.cache.draw(renderer, bounds.size(), |frame| {
            let background = Path::rectangle(Point::ORIGIN, frame.size());
            frame.fill(&background, Color::from_rgb8(0x10, 0x10, 0x10));

            for mark in self.marks {
                let dot = Path::rectangle(
                    Point::new(mark.x as f32, mark.y as f32),
                    Size::new(MARK_WIDTH, MARK_HEIGHT),
                );
                frame.fill(&dot, Color::WHITE);
            }
        });

        vec![trace]
    }
}
