use thiserror::Error;

/// Reasons the rig cannot act this frame.
///
/// These never leave [`crate::CameraRig::update`]; the rig retries next frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RigError {
    #[error("scene object '{0}' not found")]
    MissingObject(String),

    #[error("scene object '{0}' has no transform")]
    StaleHandle(String),
}
