//! Guess-the-material rounds.
//!
//! A [`MysteryGame`] holds one hidden material. Starting a round replaces it;
//! guessing compares against it and always reveals the answer, leaving the
//! round open for further guesses.
//!
//! [`MysterySessions`] keeps one game per session id so concurrent players do
//! not overwrite each other. Callers that share [`DEFAULT_SESSION`] share a
//! single game and the last `start` wins.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{LabError, Result};
use crate::physics::Material;

/// Session used when the caller does not identify itself.
pub const DEFAULT_SESSION: &str = "global";

/// Reply to a started round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub status: &'static str,
}

impl Acknowledgement {
    pub const STARTED: Acknowledgement = Acknowledgement {
        status: "Mystery Mode Started",
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuessVerdict {
    #[serde(rename = "CORRECT")]
    Correct,
    #[serde(rename = "WRONG")]
    Wrong,
}

/// Result of a guess; the hidden material is revealed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuessOutcome {
    pub result: GuessVerdict,
    pub actual: Material,
}

/// One game context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MysteryGame {
    secret: Option<Material>,
}

impl MysteryGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a material uniformly at random, replacing any previous one.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Acknowledgement {
        self.secret = Material::ALL.choose(rng).copied();
        Acknowledgement::STARTED
    }

    pub fn is_active(&self) -> bool {
        self.secret.is_some()
    }

    /// Compare `guess` with the hidden material.
    pub fn submit_guess(&self, guess: Material) -> Result<GuessOutcome> {
        let actual = self.secret.ok_or(LabError::NoActiveGame)?;
        let result = if guess == actual {
            GuessVerdict::Correct
        } else {
            GuessVerdict::Wrong
        };
        Ok(GuessOutcome { result, actual })
    }
}

/// Upper bound on concurrently tracked sessions.
pub const MAX_SESSIONS: usize = 1024;

#[derive(Debug, Default)]
struct SessionTable {
    games: HashMap<String, MysteryGame>,
    /// Session ids, least recently started first
    order: VecDeque<String>,
}

/// Games keyed by session id.
///
/// Holds at most `limit` sessions. Starting a new session when full drops
/// the one whose round was started longest ago.
#[derive(Debug)]
pub struct MysterySessions {
    table: Mutex<SessionTable>,
    limit: usize,
}

impl Default for MysterySessions {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl MysterySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that keeps at most `limit` sessions (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            table: Mutex::new(SessionTable::default()),
            limit: limit.max(1),
        }
    }

    /// Start (or restart) the round for `session`.
    pub fn start<R: Rng + ?Sized>(&self, session: &str, rng: &mut R) -> Acknowledgement {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        let SessionTable { games, order } = &mut *table;

        if let Some(pos) = order.iter().position(|id| id == session) {
            order.remove(pos);
        } else {
            while games.len() >= self.limit {
                let Some(oldest) = order.pop_front() else { break };
                games.remove(&oldest);
                tracing::debug!(session = %oldest, "mystery session evicted");
            }
        }
        order.push_back(session.to_string());

        let ack = games.entry(session.to_string()).or_default().start(rng);
        tracing::info!(session, active = games.len(), "mystery round started");
        ack
    }

    /// Guess for `session`; fails with `NoActiveGame` if it never started
    /// or was evicted.
    pub fn submit_guess(&self, session: &str, guess: Material) -> Result<GuessOutcome> {
        let table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        let outcome = table
            .games
            .get(session)
            .ok_or(LabError::NoActiveGame)?
            .submit_guess(guess)?;
        tracing::info!(session, %guess, actual = %outcome.actual, "mystery guess");
        Ok(outcome)
    }
}
