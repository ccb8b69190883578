//! Source adapters and concurrent loading into a [`DataSession`]
//!
//! Both sources are read concurrently; parsing and aggregation start only
//! once both reads have completed.

pub mod file;
pub mod memory;

pub use file::*;
pub use memory::*;

use hydrotemp_core::{CoreError, DataSession, SessionSchema};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read {source_name}: {error}")]
    Unreadable {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Could not process data: {0}")]
    Core(#[from] CoreError),
}

impl LoadError {
    /// Message suitable for showing to the dashboard user
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Unreadable { source_name, .. } => {
                format!("Error loading data: {source_name} is unavailable. Please try again later.")
            }
            LoadError::Core(_) => {
                "Error loading data: the input files could not be processed.".to_string()
            }
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// A readable origin of delimited text
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Source name/identifier for messages
    fn name(&self) -> &str;

    /// Read the whole source as text
    async fn read_text(&self) -> LoadResult<String>;
}

/// Read both sources concurrently, then build a session from them
#[instrument(skip_all, fields(weather = weather.name(), water_quality = water_quality.name()))]
pub async fn load_session(
    weather: &dyn DataSource,
    water_quality: &dyn DataSource,
    schema: &SessionSchema,
) -> LoadResult<DataSession> {
    let (weather_text, water_text) =
        match tokio::try_join!(weather.read_text(), water_quality.read_text()) {
            Ok(texts) => texts,
            Err(e) => {
                warn!(error = %e, "Data load failed");
                return Err(e);
            }
        };

    info!(
        weather_bytes = weather_text.len(),
        water_quality_bytes = water_text.len(),
        "Sources read"
    );

    let session = DataSession::from_csv(&weather_text, &water_text, schema)?;
    Ok(session)
}
