/// Session state for a single play session. Memory-only; nothing here is persisted.
use crate::core::round::Round;

pub const MSG_LOADING: &str = "Cargando...";
pub const MSG_CORRECT: &str = "¡Correcto!";
pub const MSG_INCORRECT: &str = "¡Incorrecto! Intenta de nuevo.";

/// Where the current round is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoundStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last load failed; a new round has to be requested
    Failed { reason: String },
}

/// The only feedback channel shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

impl Feedback {
    pub fn message(self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Correct => MSG_CORRECT,
            Feedback::Incorrect => MSG_INCORRECT,
        }
    }
}

/// Result of a guess submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
    /// No active round, or it was already solved; nothing changed
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub score: u32,
    pub attempts: u32,
    pub streak: u32,
    pub has_guessed_correctly: bool,
    pub feedback: Feedback,
    pub status: RoundStatus,
    pub revealed: bool,
    pub input: String,
    pub round: Option<Round>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.status == RoundStatus::Loading
    }

    /// The round that guesses are currently checked against, if any
    pub fn active_round(&self) -> Option<&Round> {
        match self.status {
            RoundStatus::Ready => self.round.as_ref(),
            _ => None,
        }
    }

    /// Enter `Loading`: hides the artwork and re-arms guessing for the next round.
    pub fn begin_loading(&mut self) {
        self.status = RoundStatus::Loading;
        self.revealed = false;
        self.has_guessed_correctly = false;
    }

    /// Publish a freshly preloaded round. Later publishes overwrite earlier ones.
    pub fn publish_round(&mut self, round: Round) {
        self.round = Some(round);
        self.status = RoundStatus::Ready;
        self.revealed = false;
        self.has_guessed_correctly = false;
        self.feedback = Feedback::None;
        self.input.clear();
    }

    /// Record a failed load. A stale failure never replaces a round that is already up.
    pub fn fail_round(&mut self, reason: impl Into<String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.status = RoundStatus::Failed { reason: reason.into() };
        true
    }

    /// Check `raw_input` against the active round and update the counters.
    pub fn apply_guess(&mut self, raw_input: &str) -> GuessOutcome {
        if self.has_guessed_correctly {
            return GuessOutcome::Ignored;
        }
        let Some(round) = self.active_round() else {
            return GuessOutcome::Ignored;
        };
        let matched = normalize_guess(raw_input) == round.canonical_name;

        self.attempts += 1;
        if matched {
            self.streak += 1;
            self.score += 1;
            self.revealed = true;
            self.has_guessed_correctly = true;
            self.feedback = Feedback::Correct;
            GuessOutcome::Correct
        } else {
            self.streak = 0;
            self.feedback = Feedback::Incorrect;
            GuessOutcome::Incorrect
        }
    }
}

/// Trim surrounding whitespace and case-fold
pub fn normalize_guess(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round::{Artwork, CreatureId, CreatureRecord};
    use image::RgbaImage;

    fn round(id: u16, name: &str) -> Round {
        Round::new(
            CreatureId::new(id).unwrap(),
            CreatureRecord {
                name: name.to_string(),
                artwork_url: format!("https://img.example/{id}.png"),
            },
            Artwork::new(RgbaImage::new(2, 2)),
            "https://cries.example/",
        )
    }

    fn session_with(id: u16, name: &str) -> Session {
        let mut session = Session::new();
        session.begin_loading();
        session.publish_round(round(id, name));
        session
    }

    #[test]
    fn guesses_without_round_are_ignored() {
        let mut session = Session::new();
        assert_eq!(session.apply_guess("pikachu"), GuessOutcome::Ignored);
        assert_eq!(session.attempts, 0);
    }

    #[test]
    fn guesses_while_loading_are_ignored() {
        let mut session = session_with(25, "pikachu");
        session.begin_loading();
        assert_eq!(session.apply_guess("pikachu"), GuessOutcome::Ignored);
        assert_eq!(session.attempts, 0);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn normalisation_accepts_case_and_whitespace_variants() {
        for guess in ["  Pikachu ", "pikachu", "PIKACHU"] {
            let mut session = session_with(25, "pikachu");
            assert_eq!(session.apply_guess(guess), GuessOutcome::Correct, "guess {guess:?}");
        }
    }

    #[test]
    fn repeated_mismatch_only_counts_attempts() {
        let mut session = session_with(4, "charmander");
        for n in 1..=5 {
            assert_eq!(session.apply_guess("squirtle"), GuessOutcome::Incorrect);
            assert_eq!(session.attempts, n);
            assert_eq!(session.score, 0);
        }
    }

    #[test]
    fn only_first_correct_guess_is_credited() {
        let mut session = session_with(1, "bulbasaur");
        assert_eq!(session.apply_guess("bulbasaur"), GuessOutcome::Correct);
        let (score, attempts) = (session.score, session.attempts);
        for _ in 0..3 {
            assert_eq!(session.apply_guess("bulbasaur"), GuessOutcome::Ignored);
            assert_eq!(session.apply_guess("ivysaur"), GuessOutcome::Ignored);
        }
        assert_eq!(session.score, score);
        assert_eq!(session.attempts, attempts);
    }

    #[test]
    fn streak_counts_consecutive_solved_rounds() {
        let rounds = [
            (1, "bulbasaur", "bulbasaur"),
            (4, "charmander", "charmander"),
            (7, "squirtle", "wartortle"),
            (25, "pikachu", "pikachu"),
        ];
        let mut session = Session::new();
        let mut streaks = Vec::new();
        for (id, name, guess) in rounds {
            session.begin_loading();
            session.publish_round(round(id, name));
            session.apply_guess(guess);
            streaks.push(session.streak);
        }
        assert_eq!(streaks, vec![1, 2, 0, 1]);
    }

    #[test]
    fn correct_guess_scenario() {
        let mut session = session_with(1, "bulbasaur");
        assert_eq!(session.apply_guess("bulbasaur"), GuessOutcome::Correct);
        assert_eq!(session.feedback.message(), MSG_CORRECT);
        assert_eq!(session.score, 1);
        assert!(session.revealed);
        assert!(session.has_guessed_correctly);

        let attempts = session.attempts;
        session.apply_guess("bulbasaur");
        assert_eq!(session.attempts, attempts);
    }

    #[test]
    fn incorrect_guess_scenario() {
        let mut session = session_with(4, "charmander");
        session.streak = 3;
        assert_eq!(session.apply_guess("charmender"), GuessOutcome::Incorrect);
        assert_eq!(session.feedback.message(), MSG_INCORRECT);
        assert_eq!(session.streak, 0);
        assert_eq!(session.score, 0);
        assert!(!session.revealed);
        assert!(!session.has_guessed_correctly);
        assert_eq!(session.active_round().map(|r| r.canonical_name.as_str()), Some("charmander"));

        assert_eq!(session.apply_guess("charmander"), GuessOutcome::Correct);
    }

    #[test]
    fn empty_guess_is_an_ordinary_miss() {
        let mut session = session_with(25, "pikachu");
        assert_eq!(session.apply_guess("   "), GuessOutcome::Incorrect);
        assert_eq!(session.attempts, 1);
    }

    #[test]
    fn begin_loading_resets_round_flags_but_keeps_totals() {
        let mut session = session_with(25, "pikachu");
        session.apply_guess("pikachu");
        session.begin_loading();
        assert!(session.is_loading());
        assert!(!session.revealed);
        assert!(!session.has_guessed_correctly);
        assert_eq!(session.score, 1);
        assert_eq!(session.streak, 1);
        assert_eq!(session.attempts, 1);
    }

    #[test]
    fn publish_clears_feedback_and_input() {
        let mut session = session_with(4, "charmander");
        session.input.push_str("charmender");
        session.apply_guess("charmender");
        session.begin_loading();
        session.publish_round(round(7, "squirtle"));
        assert_eq!(session.feedback, Feedback::None);
        assert!(session.input.is_empty());
        assert_eq!(session.status, RoundStatus::Ready);
    }

    #[test]
    fn later_publish_wins() {
        let mut session = Session::new();
        session.begin_loading();
        session.begin_loading();
        session.publish_round(round(1, "bulbasaur"));
        session.publish_round(round(4, "charmander"));
        assert_eq!(session.active_round().unwrap().canonical_name, "charmander");
    }

    #[test]
    fn failure_only_lands_while_loading() {
        let mut session = Session::new();
        session.begin_loading();
        assert!(session.fail_round("timeout"));
        assert!(!session.is_loading());
        assert_eq!(session.status, RoundStatus::Failed { reason: "timeout".into() });

        let mut session = session_with(25, "pikachu");
        assert!(!session.fail_round("stale"));
        assert_eq!(session.status, RoundStatus::Ready);
    }
}
