use thiserror::Error;
use tracing::{debug, warn};

/// Month header label length meaning "the whole month name"
pub(crate) const FULL_LABEL: usize = usize::MAX;

/// Sizing profile for one drawing pass, chosen from the widget's width in
/// density-independent pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Format {
    pub(crate) month_header_label_length: usize,
    pub(crate) day_header_label_length: usize,
    pub(crate) header_text_relative_size: f32,
    pub(crate) day_cell_text_relative_size: f32,
}

impl Default for Format {
    fn default() -> Format {
        Format {
            month_header_label_length: FULL_LABEL,
            day_header_label_length: 3,
            header_text_relative_size: 1.0,
            day_cell_text_relative_size: 1.0,
        }
    }
}

impl Format {
    fn scaled(size: f32) -> Format {
        Format {
            header_text_relative_size: size,
            day_cell_text_relative_size: size,
            ..Format::default()
        }
    }

    pub(crate) fn for_width(width: i32) -> Format {
        match width {
            260.. => Format::scaled(1.2),
            240..260 => Format::scaled(1.1),
            220..240 => Format::default(),
            200..220 => Format::scaled(0.9),
            180..200 => Format::scaled(0.8),
            i32::MIN..180 => Format {
                month_header_label_length: 3,
                day_header_label_length: 1,
                ..Format::scaled(0.8)
            },
        }
    }

    /// Scales both text sizes by the text-size percentage: 40 keeps them
    /// as they are and each point away from it adds or removes a hundredth
    pub(crate) fn with_text_size(self, percentage: i64) -> Format {
        let points = u8::try_from(percentage.clamp(0, 100)).unwrap_or(100);
        let factor = f32::from(points + 60) / 100.0;
        Format {
            header_text_relative_size: self.header_text_relative_size * factor,
            day_cell_text_relative_size: self.day_cell_text_relative_size * factor,
            ..self
        }
    }

    /// Picks the format for the widget's current size, or the default one if
    /// the size cannot be determined
    pub(crate) fn resolve<M: WidgetMeasure + ?Sized>(measure: &M) -> Format {
        match measure_width(measure) {
            Ok(width) => {
                debug!(width, "resolved widget width");
                Format::for_width(width)
            }
            Err(e) => {
                warn!(error = %e, "could not measure widget; using default format");
                Format::default()
            }
        }
    }
}

fn measure_width<M: WidgetMeasure + ?Sized>(measure: &M) -> Result<i32, MeasureError> {
    match measure.orientation()? {
        Orientation::Landscape => measure.max_width(),
        Orientation::Portrait => measure.min_width(),
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("widget measurement unavailable: {0}")]
pub(crate) struct MeasureError(pub(crate) String);

/// Source of the widget's current dimensions
pub(crate) trait WidgetMeasure {
    fn orientation(&self) -> Result<Orientation, MeasureError>;

    fn min_width(&self) -> Result<i32, MeasureError>;

    fn max_width(&self) -> Result<i32, MeasureError>;
}

/// A measurement pinned to one width in either orientation
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedWidth(pub(crate) i32);

impl WidgetMeasure for FixedWidth {
    fn orientation(&self) -> Result<Orientation, MeasureError> {
        Ok(Orientation::Portrait)
    }

    fn min_width(&self) -> Result<i32, MeasureError> {
        Ok(self.0)
    }

    fn max_width(&self) -> Result<i32, MeasureError> {
        Ok(self.0)
    }
}
