pub type FarmResult<T> = Result<T, FarmError>;

/// Failures are reserved for configuration, assets and serialization;
/// blending and clipping are total and never produce an error.
#[derive(thiserror::Error, Debug)]
pub enum FarmError {
    #[error("invalid parameters: {0}")]
    Validation(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("raster error: {0}")]
    Raster(#[from] image::ImageError),

    #[error("annotation json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FarmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            FarmError::validation("x")
                .to_string()
                .contains("invalid parameters:")
        );
        assert!(FarmError::asset("x").to_string().contains("asset error:"));
    }
}
