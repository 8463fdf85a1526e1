use scheduler::SchedulerError;

/// Failures while building the panel groups from the asset provider.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("gallery image #{index} is missing or could not be decoded")]
    MissingAsset { index: usize },
    #[error("alpha mask is missing or could not be decoded")]
    MissingMask,
    #[error("gallery must contain at least one image")]
    EmptyGallery,
}

impl From<SchedulerError> for SceneError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::EmptyGallery => SceneError::EmptyGallery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewportError {
    #[error("invalid viewport dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Anything that can stop a [`crate::Stage`] from being assembled.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Viewport(#[from] ViewportError),
}
