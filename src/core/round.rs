/// Round data: which creature is being guessed and everything needed to show it
use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use rand::Rng;

use crate::error::ProviderError;

/// Lowest creature id in the pool (inclusive)
pub const MIN_CREATURE_ID: u16 = 1;
/// Highest creature id in the pool (inclusive)
pub const MAX_CREATURE_ID: u16 = 151;

/// A creature identifier guaranteed to be in `1..=151`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(u16);

impl CreatureId {
    pub fn new(id: u16) -> Result<Self, ProviderError> {
        if (MIN_CREATURE_ID..=MAX_CREATURE_ID).contains(&id) {
            Ok(Self(id))
        } else {
            Err(ProviderError::IdOutOfRange(id))
        }
    }

    /// Uniformly random id over the whole pool
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(MIN_CREATURE_ID..=MAX_CREATURE_ID))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the creature provider hands back for an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureRecord {
    pub name: String,
    pub artwork_url: String,
}

/// Fully decoded artwork, ready to draw without further I/O
#[derive(Debug, Clone)]
pub struct Artwork {
    image: Arc<RgbaImage>,
}

impl Artwork {
    pub fn new(image: RgbaImage) -> Self {
        Self { image: Arc::new(image) }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// One guessing round. Immutable once published; replaced wholesale by the next.
#[derive(Debug, Clone)]
pub struct Round {
    pub id: CreatureId,
    pub canonical_name: String,
    pub artwork_url: String,
    pub cry_url: String,
    pub artwork: Artwork,
}

impl Round {
    pub fn new(id: CreatureId, record: CreatureRecord, artwork: Artwork, cry_base: &str) -> Self {
        let canonical_name = record.name.to_lowercase();
        let cry_url = cry_url(cry_base, &canonical_name);
        Self {
            id,
            canonical_name,
            artwork_url: record.artwork_url,
            cry_url,
            artwork,
        }
    }
}

/// `{base}{name}.ogg`; nothing checks that the file exists.
pub fn cry_url(base: &str, canonical_name: &str) -> String {
    format!("{base}{canonical_name}.ogg")
}
