use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Zone used to display elapses and to read start instants given
    /// without one.
    pub timezone: String,
    /// Number of elapses shown per expression.
    pub iterations: usize,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an
    /// optional `oncal.toml`. Environment variables take precedence over the
    /// file.
    ///
    /// ## Errors
    /// Returns an error if building or deserializing the configuration fails,
    /// or if the resulting values are out of range.
    pub fn load() -> CoreResult<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "warn")?
            .set_default("calendar.timezone", "UTC")?
            .set_default("calendar.iterations", 1)?
            .add_source(config::File::with_name("oncal.toml").required(false))
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values the deserializer cannot.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` when `calendar.iterations` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.calendar.iterations == 0 {
            return Err(CoreError::ValidationError(
                "calendar.iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        tracing::warn!(error = %e, "Failed to read .env file");
    }

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(iterations: usize) -> Settings {
        Settings {
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
            calendar: CalendarConfig {
                timezone: "UTC".to_string(),
                iterations,
            },
        }
    }

    #[test]
    fn test_validate_accepts_positive_iterations() {
        assert!(settings(3).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let err = settings(0).validate().expect_err("zero iterations");
        assert!(matches!(err, CoreError::ValidationError(_)));
    }
}
