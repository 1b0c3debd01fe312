use thiserror::Error;

/// Main error type for the Snapbooth library
#[derive(Error, Debug)]
pub enum BoothError {
    #[error("Filter processing error: {0}")]
    Filter(#[from] FilterError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Filter-specific errors
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown pixel effect: {name}")]
    UnknownEffect { name: String },

    #[error("Effect application failed: {effect} - {reason}")]
    EffectFailed { effect: String, reason: String },
}

/// Image decode/encode errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image: {reason}")]
    DecodeFailed { reason: String },

    #[error("Failed to encode image: {reason}")]
    EncodeFailed { reason: String },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Composition-specific errors
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("No photos supplied for composition")]
    NoPhotos,

    #[error("Output generation failed: {reason}")]
    OutputFailed { reason: String },

    #[error("Invalid composition parameters: {details}")]
    InvalidParameters { details: String },
}

/// Export/share errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write output file: {path}")]
    WriteFailed { path: String },

    #[error("Share target unavailable: {target}")]
    ShareUnavailable { target: String },

    #[error("All export strategies failed: {attempts} attempted")]
    AllStrategiesFailed { attempts: usize },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Unknown grid layout: {value}")]
    UnknownLayout { value: String },
}

/// Convenience type alias for Results using BoothError
pub type Result<T> = std::result::Result<T, BoothError>;

impl BoothError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (degrade instead of abort)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // A photo that fails to decode is skipped, not fatal
            Self::Image(ImageError::DecodeFailed { .. }) => true,
            // The export ladder has further rungs to try
            Self::Export(ExportError::ShareUnavailable { .. }) => true,
            // Most other errors are permanent
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(ImageError::DecodeFailed { .. }) => {
                "Could not read one of the photos. It may be corrupted; the unfiltered original will be used where possible.".to_string()
            }
            Self::Filter(FilterError::UnknownEffect { name }) => {
                format!(
                    "Filter '{}' is not a pixel effect. Available pixel effects: fisheye, glitch, crosshatch",
                    name
                )
            }
            Self::Export(ExportError::AllStrategiesFailed { .. }) => {
                "Unable to save or share the photos. Please try again later.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
