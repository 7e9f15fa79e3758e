// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picks and fills message templates.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::templates::{self, NO_STREAK, STREAK};

/// Default shards quoted in the welcome text.
pub const DEFAULT_REFERRAL_SHARDS: u32 = 20;

/// Renders user-facing message text.
///
/// Template choice is a uniform random pick; the randomness source is owned
/// by the resolver so tests can seed it.
#[derive(Debug)]
pub struct MessageResolver {
    rng: Mutex<StdRng>,
    referral_shards: u32,
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageResolver {
    /// Resolver seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Resolver with a fixed seed; the same seed yields the same sequence
    /// of template choices.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            referral_shards: DEFAULT_REFERRAL_SHARDS,
        }
    }

    /// Overrides the shard reward mentioned in the welcome text.
    pub fn with_referral_shards(mut self, shards: u32) -> Self {
        self.referral_shards = shards;
        self
    }

    pub fn referral_shards(&self) -> u32 {
        self.referral_shards
    }

    /// Welcome text sent on `/start` and on new-user webhooks.
    pub fn welcome(&self, first_name: &str) -> String {
        templates::WELCOME
            .replace("{shards}", &self.referral_shards.to_string())
            .replace("{name}", first_name)
    }

    /// Daily challenge reminder.
    ///
    /// Streaks above zero pick from the streak family with both values
    /// substituted; anything else picks from the no-streak family.
    pub fn daily_reminder(&self, first_name: &str, streak: i64) -> String {
        if streak > 0 {
            let template = self.pick(STREAK);
            templates::render(template, first_name, Some(streak.min(u32::MAX as i64) as u32))
        } else {
            let template = self.pick(NO_STREAK);
            templates::render(template, first_name, None)
        }
    }

    fn pick(&self, family: &'static [&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        family.choose(&mut *rng).copied().unwrap_or_default()
    }
}

/// The raw "has streak" template family.
pub fn streak_templates() -> &'static [&'static str] {
    STREAK
}

/// The raw "no streak" template family.
pub fn no_streak_templates() -> &'static [&'static str] {
    NO_STREAK
}
