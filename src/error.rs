//! Crate error type

use thiserror::Error;

use crate::assets::SpriteKey;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no compatible GPU adapter")]
    NoAdapter,

    #[error("failed to create render surface: {0}")]
    CreateSurface(String),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(String),

    #[error("asset {key:?} failed to load: {reason}")]
    AssetLoad { key: SpriteKey, reason: String },

    #[error("audio output unavailable")]
    AudioUnavailable,

    #[error("malformed stored data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
