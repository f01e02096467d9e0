//! Configuration loading from files (std only).

use core::fmt::Write;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::EngineConfig;

/// Load an engine configuration from a TOML file.
///
/// I/O failures carry the offending path in the error message.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use a4988_motion::load_config;
///
/// let config = load_config("motion.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let mut msg = heapless::String::<128>::new();
            // Long paths truncate; the String keeps what fits.
            let _ = write!(msg, "{}: {}", path.display(), e);
            return Err(Error::Config(ConfigError::IoError(msg)));
        }
    };

    parse_config(&content)
}

/// Parse and validate an engine configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(content).map_err(|e| {
        let mut msg = heapless::String::<128>::new();
        let _ = write!(msg, "{}", e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}
