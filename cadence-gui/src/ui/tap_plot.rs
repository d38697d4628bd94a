//! # Tap Plot Widget
//!
//! Bar-chart view of the per-sample BPM series for the current session.
//! Each bar is one sample in insertion order, scaled to the session's
//! maximum BPM so the shape of a run stays readable as it grows.

use iced::widget::canvas::{self, Geometry, Path};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};

/// Tap plot widget for displaying the rolling BPM series.
pub struct TapPlot {
    /// Rolling-average BPM, one value per sample in insertion order
    data: Vec<f32>,
}

impl TapPlot {
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn view(self) -> Element<'static, super::super::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for TapPlot {
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

        if !bounds.width.is_finite() || !bounds.height.is_finite() || self.data.is_empty() {
            return vec![frame.into_geometry()];
        }

        let max_bpm = self.data.iter().fold(0.0f32, |max, &val| val.max(max));
        if max_bpm <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let bar_width = (bounds.width / self.data.len() as f32).max(1.0);

        for (i, &bpm) in self.data.iter().enumerate() {
            let height = (bpm / max_bpm * bounds.height).max(0.0);

            if height.is_finite() && height > 0.0 {
                let bar = Path::rectangle(
                    Point::new(i as f32 * bar_width, bounds.height - height),
                    Size::new(bar_width, height),
                );
                frame.fill(&bar, Color::from_rgb8(0x34, 0x98, 0xDB));
            }
        }

        vec![frame.into_geometry()]
    }
}
