//! External collaborators the round controller drives. Each sits behind a trait so tests can swap in fakes.

pub mod artwork;
pub mod audio;
pub mod creature;

pub use artwork::{HttpImageLoader, ImageLoader};
pub use audio::{AudioPlayer, CryPlayer, MutedPlayer};
pub use creature::{CreatureProvider, PokeApiProvider};
