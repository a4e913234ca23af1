use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors of the load → extract → aggregate → render pipeline.
#[derive(Debug, Error)]
pub enum PartsError {
    #[error("could not read {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data: {0}")]
    Format(String),

    #[error("invalid csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not draw the chart: {0}")]
    Plot(String),

    #[error("nothing to display, no panels were given")]
    NoPanels,
}

impl PartsError {
    pub fn format(message: impl Into<String>) -> Self {
        PartsError::Format(message.into())
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PartsError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PartsError::Plot(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PartsError>;
