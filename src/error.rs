use thiserror::Error;

/// Failures while asking the creature provider for a round.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("creature id {0} is outside 1..=151")]
    IdOutOfRange(u16),
    #[error("request to creature provider failed")]
    Request {
        #[from]
        source: reqwest::Error,
    },
    #[error("creature provider returned an unexpected payload")]
    Payload {
        #[from]
        source: serde_json::Error,
    },
    #[error("creature {name} has no official artwork")]
    MissingArtwork { name: String },
}

/// Failures while loading the artwork ahead of a reveal.
#[derive(Error, Debug)]
pub enum PreloadError {
    #[error("artwork download failed")]
    Request {
        #[from]
        source: reqwest::Error,
    },
    #[error("artwork could not be decoded")]
    Decode {
        #[from]
        source: image::ImageError,
    },
    #[error("artwork decoder task did not finish")]
    Worker {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Anything that stops a round from being published.
#[derive(Error, Debug)]
pub enum RoundError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Preload(#[from] PreloadError),
}

/// Cry playback failures. Never surfaced to the player.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("no async runtime to schedule playback on")]
    NoRuntime,
    #[error("cry download failed")]
    Request {
        #[from]
        source: reqwest::Error,
    },
    #[error("cry could not be decoded")]
    Decode {
        #[from]
        source: symphonia::core::errors::Error,
    },
    #[error("cry contains no audio track")]
    NoTrack,
    #[error("output device has no usable config")]
    DeviceConfig {
        #[from]
        source: cpal::DefaultStreamConfigError,
    },
    #[error("output stream could not be built")]
    BuildStream {
        #[from]
        source: cpal::BuildStreamError,
    },
    #[error("output stream could not be started")]
    PlayStream {
        #[from]
        source: cpal::PlayStreamError,
    },
    #[error("playback task did not finish")]
    Worker {
        #[from]
        source: tokio::task::JoinError,
    },
}
