//! Random primitive provider.
//!
//! Stateless helpers producing the raw random material field generation is
//! built from: booleans, ranged integers and dates, email-shaped strings,
//! and short name-like strings. All helpers default to the process uniform
//! RNG; the helpers that take a `seed` switch to a linear-congruential
//! source applied independently per call, for deterministic reproduction.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;

const LCG_MULTIPLIER: u64 = 1664525;
const LCG_INCREMENT: u64 = 1013904223;
const LCG_MODULUS: u64 = 1 << 32;

/// 2023-01-01T00:00:00Z, the default lower date bound.
const DEFAULT_DATE_EPOCH_SECS: i64 = 1_672_531_200;

const NAME_TOKENS: &[&str] = &[
    "Ada", "Alfredo", "Alyce", "Braden", "Clara", "Dallas", "Daron", "Dorothea", "Elias",
    "Eliseo", "Ethel", "Frederic", "German", "Granville", "Irving", "Jamie", "Jerrell",
    "Khalid", "Kristopher", "Lennie", "Leonard", "Makenna", "Michael", "Nathen", "Odie",
    "Randy", "Rhea", "Ronaldo", "Sierra", "Thomas", "Tyreek", "Vinnie", "Wilburn",
];

const MAIL_DOMAINS: &[&str] = &["gmail.com", "hotmail.com", "yahoo.com", "example.com"];

/// One step of the seeded linear-congruential source, as a fraction in
/// [0, 1). Each call is independent; the stream is not stateful.
pub fn seeded_fraction(seed: u64) -> f64 {
    let next = seed.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT) % LCG_MODULUS;
    next as f64 / LCG_MODULUS as f64
}

/// Generate a random boolean.
pub fn random_bool() -> bool {
    rand::rng().random_bool(0.5)
}

/// Generate a random integer, within the inclusive range when one is given,
/// over the full `i64` width otherwise. Inverted ranges degrade to the lower
/// bound (warned).
pub fn int_in_range(range: Option<(i64, i64)>) -> i64 {
    match range {
        Some((lo, hi)) if lo > hi => {
            warn!("invalid integer range [{lo}, {hi}]: lower bound exceeds upper bound");
            lo
        }
        Some((lo, hi)) => rand::rng().random_range(lo..=hi),
        None => rand::rng().random(),
    }
}

/// Generate a random count within an inclusive range. With a seed, the
/// per-call LCG source is used instead of the uniform RNG.
pub fn count_in_range(range: (i64, i64), seed: Option<u64>) -> i64 {
    let (lo, hi) = range;
    if lo > hi {
        warn!("invalid count range [{lo}, {hi}]: lower bound exceeds upper bound");
        return lo;
    }
    match seed {
        Some(seed) => lo + (seeded_fraction(seed) * (hi - lo + 1) as f64) as i64,
        None => rand::rng().random_range(lo..=hi),
    }
}

/// Pick one element uniformly at random. Empty input yields `None`.
pub fn random_element<T>(items: &[T], seed: Option<u64>) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let idx = match seed {
        Some(seed) => (seeded_fraction(seed) * items.len() as f64) as usize,
        None => rand::rng().random_range(0..items.len()),
    };
    items.get(idx)
}

/// Generate a random date within the inclusive range, defaulting to
/// (2023-01-01T00:00:00Z, now). An inverted range degrades to its start.
pub fn date_in_range(range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> DateTime<Utc> {
    let (start, end) = range.unwrap_or_else(|| {
        let epoch = DateTime::from_timestamp(DEFAULT_DATE_EPOCH_SECS, 0).unwrap_or_default();
        (epoch, Utc::now())
    });

    let start_ts = start.timestamp();
    let end_ts = end.timestamp();
    if start_ts >= end_ts {
        return start;
    }

    let random_ts = rand::rng().random_range(start_ts..=end_ts);
    DateTime::from_timestamp(random_ts, 0).unwrap_or(start)
}

/// Generate an email-shaped string: a lowercased name token, two digits,
/// and a common mail domain.
pub fn email() -> String {
    let mut rng = rand::rng();
    let name = NAME_TOKENS[rng.random_range(0..NAME_TOKENS.len())].to_lowercase();
    let digits = rng.random_range(10..100);
    let domain = MAIL_DOMAINS[rng.random_range(0..MAIL_DOMAINS.len())];
    format!("{name}{digits}@{domain}")
}

/// Generate a short name-like string of space-joined tokens. The token
/// count is drawn from the inclusive range, defaulting to [1, 1].
pub fn words(count_range: Option<(i64, i64)>) -> String {
    let count = count_in_range(count_range.unwrap_or((1, 1)), None).max(0) as usize;
    let mut rng = rand::rng();
    (0..count)
        .map(|_| NAME_TOKENS[rng.random_range(0..NAME_TOKENS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}
