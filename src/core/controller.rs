/// Round controller: fetch → preload → publish, and guess scoring with the cry side effect
use std::sync::{Arc, Mutex, PoisonError};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};

use crate::core::round::{CreatureId, Round};
use crate::core::session::{GuessOutcome, Session};
use crate::error::RoundError;
use crate::services::audio::DEFAULT_CRY_BASE;
use crate::services::{AudioPlayer, CreatureProvider, ImageLoader};

pub struct RoundController {
    provider: Arc<dyn CreatureProvider>,
    loader: Arc<dyn ImageLoader>,
    audio: Arc<dyn AudioPlayer>,
    rng: Mutex<StdRng>,
    cry_base: String,
}

impl RoundController {
    pub fn new(
        provider: Arc<dyn CreatureProvider>,
        loader: Arc<dyn ImageLoader>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            provider,
            loader,
            audio,
            rng: Mutex::new(StdRng::from_os_rng()),
            cry_base: DEFAULT_CRY_BASE.to_string(),
        }
    }

    /// Deterministic id sequence, mostly for tests and `--seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_cry_base(mut self, cry_base: impl Into<String>) -> Self {
        self.cry_base = cry_base.into();
        self
    }

    pub fn pick_creature_id(&self) -> CreatureId {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        CreatureId::random(&mut *rng)
    }

    /// The suspending half of a round start. Does not touch the session.
    pub async fn load_round(&self, id: CreatureId) -> Result<Round, RoundError> {
        let record = self.provider.fetch(id).await?;
        let artwork = self.loader.load(&record.artwork_url).await?;
        Ok(Round::new(id, record, artwork, &self.cry_base))
    }

    /// Start a round and wait for it. The engine uses the split steps instead so it keeps
    /// handling input while the load is in flight.
    pub async fn start_round(&self, session: &mut Session) -> Result<(), RoundError> {
        session.begin_loading();
        let id = self.pick_creature_id();
        let result = self.load_round(id).await;
        self.finish_round(session, id, result)
    }

    /// Apply the outcome of `load_round` to the session.
    pub fn finish_round(
        &self,
        session: &mut Session,
        id: CreatureId,
        result: Result<Round, RoundError>,
    ) -> Result<(), RoundError> {
        match result {
            Ok(round) => {
                info!(%id, name = %round.canonical_name, "round ready");
                session.publish_round(round);
                Ok(())
            }
            Err(error) => {
                warn!(%id, %error, "round failed to load");
                session.fail_round(error.to_string());
                Err(error)
            }
        }
    }

    /// Score a guess. A correct one also fires the cry; playback errors are dropped here.
    pub fn submit_guess(&self, session: &mut Session, raw_input: &str) -> GuessOutcome {
        let outcome = session.apply_guess(raw_input);
        if outcome == GuessOutcome::Correct {
            if let Some(round) = session.round.as_ref() {
                if let Err(error) = self.audio.play(&round.cry_url) {
                    warn!(url = %round.cry_url, %error, "cry unavailable");
                }
            }
        }
        info!(?outcome, score = session.score, streak = session.streak, attempts = session.attempts, "guess");
        outcome
    }
}
