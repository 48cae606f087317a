//! Referral code generation.
//!
//! Codes are the human-shareable handle an agent gives to prospective
//! partners. A code is an uppercase base-36 encoding of the current
//! unix-epoch second followed by a random uppercase alphanumeric suffix,
//! which keeps codes typeable (~12 chars) while making collisions
//! astronomically unlikely. Generation is pure; uniqueness against
//! existing agents is verified at issuance time, with regeneration on
//! the (rare) collision.

use crate::{
    entities::{Agent, agent},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::prelude::*;
use tracing::warn;

/// Digits used by the base-36 time prefix, least significant last.
const BASE36_DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Alphabet for the random suffix.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random suffix appended to the time prefix.
const SUFFIX_LEN: usize = 6;

/// Bound on generate-and-check attempts before giving up.
const MAX_ISSUE_ATTEMPTS: u32 = 8;

/// Generates a referral code: time-based prefix + random suffix.
///
/// Pure generation with no store round-trip; callers persisting a code
/// must verify uniqueness first (see [`issue_unique_referral_code`]).
#[must_use]
pub fn generate_referral_code() -> String {
    let seconds = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
    let prefix = to_base36(seconds);

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!("{prefix}{suffix}")
}

/// Generates a referral code that no existing agent holds.
///
/// Checks the agent table for each candidate and regenerates on
/// collision, up to a small bounded number of attempts.
///
/// # Errors
/// Returns `Error::CodeGeneration` if every attempt collided, which in
/// practice indicates a broken random source rather than a full keyspace.
pub async fn issue_unique_referral_code(db: &DatabaseConnection) -> Result<String> {
    for _ in 0..MAX_ISSUE_ATTEMPTS {
        let code = generate_referral_code();

        let existing = Agent::find()
            .filter(agent::Column::ReferralCode.eq(&code))
            .one(db)
            .await?;

        if existing.is_none() {
            return Ok(code);
        }
        warn!(%code, "referral code collision, regenerating");
    }

    Err(Error::CodeGeneration {
        attempts: MAX_ISSUE_ATTEMPTS,
    })
}

/// Uppercase base-36 rendering of `value`.
fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.iter().map(|&b| b as char).collect()
}
