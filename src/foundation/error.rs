/// Convenience result type used across watermarq.
pub type WatermarkResult<T> = Result<T, WatermarkError>;

/// Top-level error taxonomy used by engine APIs.
///
/// There is no font variant: an unresolvable family falls back to `sans-serif`
/// inside the font book and never reaches the caller.
#[derive(thiserror::Error, Debug)]
pub enum WatermarkError {
    /// The resolved output canvas has a non-positive axis. Callers skip the image.
    #[error("invalid output dimension: {width}x{height}")]
    InvalidDimension {
        /// Resolved output width.
        width: i64,
        /// Resolved output height.
        height: i64,
    },

    /// Settings outside their documented ranges.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures inside the rasterization surface.
    #[error("render error: {0}")]
    Render(String),

    /// The output encoder rejected the composited raster.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatermarkError {
    /// Build a [`WatermarkError::InvalidDimension`] value.
    pub fn invalid_dimension(width: i64, height: i64) -> Self {
        Self::InvalidDimension { width, height }
    }

    /// Build a [`WatermarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WatermarkError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`WatermarkError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`WatermarkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the caller should skip this image rather than retry it.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::InvalidDimension { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
