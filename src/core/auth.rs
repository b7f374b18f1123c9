//! Credential check and secret hashing.
//!
//! Secrets are stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>` (base64
//! salt and hash). Verification goes through `ring::pbkdf2::verify`, which
//! compares in constant time. Raw secrets never reach the logs.

use crate::core::session::PublicProfile;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::Collection;
use crate::models::person::Person;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use serde_json::json;
use std::num::NonZeroU32;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;
static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hash `secret` with a fresh random salt.
pub fn hash_secret(secret: &str, iterations: u32) -> AppResult<String> {
    let rounds = NonZeroU32::new(iterations)
        .ok_or_else(|| AppError::Config("kdf_iterations must be greater than zero".into()))?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| AppError::Other("Failed to generate salt".into()))?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(ALGORITHM, rounds, &salt, secret.as_bytes(), &mut hash);

    Ok(format!(
        "{}${}${}${}",
        SCHEME,
        rounds,
        STANDARD.encode(salt),
        STANDARD.encode(hash)
    ))
}

/// Check `secret` against a stored hash. Unreadable hashes never verify.
pub fn verify_secret(secret: &str, stored: &str) -> bool {
    let parts: Vec<&str> = stored.split('$').collect();
    let [scheme, rounds, salt, hash] = parts.as_slice() else {
        return false;
    };
    if *scheme != SCHEME {
        return false;
    }

    let Some(rounds) = rounds.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (STANDARD.decode(salt), STANDARD.decode(hash)) else {
        return false;
    };

    pbkdf2::verify(ALGORITHM, rounds, &salt, secret.as_bytes(), &hash).is_ok()
}

/// Plaintext comparison for imported documents, done on digests so the
/// comparison time does not depend on the secret's bytes.
fn legacy_matches(secret: &str, stored_plain: &str) -> bool {
    let a = digest::digest(&digest::SHA256, secret.as_bytes());
    let b = digest::digest(&digest::SHA256, stored_plain.as_bytes());
    a.as_ref() == b.as_ref()
}

/// Decide whether `(national_id, secret)` authorizes a session.
///
/// - no Person with that ID → `NotFound`
/// - secret does not verify → `InvalidCredential`
/// - otherwise the Person's public fields
///
/// A legacy plaintext `password` that matches is replaced by a hash.
pub fn check_credentials(
    store: &mut DocumentStore,
    national_id: &str,
    secret: &str,
    iterations: u32,
) -> AppResult<PublicProfile> {
    let national_id = national_id.trim();
    if national_id.is_empty() {
        return Err(AppError::InvalidInput("identifier is required".into()));
    }

    let matches = store.find_where_strict::<Person>("Cedula", &json!(national_id))?;
    let Some(found) = matches.first() else {
        return Err(AppError::NotFound(format!("member {}", national_id)));
    };

    if matches.len() > 1 {
        log::warn!(
            "{} Personas documents share ID {}; using the oldest ({})",
            matches.len(),
            national_id,
            found.id
        );
    }

    let person = &found.data;

    let ok = match (&person.password_hash, &person.legacy_password) {
        (Some(hash), _) => verify_secret(secret, hash),
        (None, Some(plain)) => {
            let ok = legacy_matches(secret, plain);
            if ok {
                upgrade_legacy_secret(store, &found.id, secret, iterations)?;
            }
            ok
        }
        (None, None) => false,
    };

    if !ok {
        return Err(AppError::InvalidCredential(national_id.to_string()));
    }

    Ok(PublicProfile::from_person(&found.id, person))
}

fn upgrade_legacy_secret(
    store: &mut DocumentStore,
    person_id: &str,
    secret: &str,
    iterations: u32,
) -> AppResult<()> {
    let hash = hash_secret(secret, iterations)?;
    store.update(Collection::Personas, person_id, json!({ "PasswordHash": hash }))?;
    store.delete_field(Collection::Personas, person_id, "password")?;
    log::info!("upgraded stored secret of {} to a hash", person_id);
    Ok(())
}
