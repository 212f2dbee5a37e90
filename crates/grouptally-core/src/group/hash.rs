//! Module: group::hash
//! Responsibility: stable hash derivation for projected grouping tuples.
//! Does not own: tuple equality; colliding hashes are resolved by the engine.

use crate::{
    project::ProjectedKey,
    value::{NumericKey, Value},
};
use xxhash_rust::xxh3::Xxh3;

/// Tuple-hash format version byte.
pub(crate) const KEY_HASH_VERSION: u8 = 1;

/// Stable XXH3 seed used by tuple hashing.
pub(crate) const KEY_HASH_SEED: u64 = 0;

///
/// StableHash
///
/// Fixed-width hash identifier used to bucket grouping tuples.
///

pub(crate) type StableHash = u64;

// Canonical slot tags; numbers share tags across Int/Uint/Float.
const TAG_ABSENT: u8 = 0x00;
const TAG_NULL: u8 = 0x01;
const TAG_BOOL: u8 = 0x02;
const TAG_INTEGER: u8 = 0x03;
const TAG_FRACTIONAL: u8 = 0x04;
const TAG_TEXT: u8 = 0x05;
const SLOT_SEPARATOR: u8 = 0xFF;

#[cfg(test)]
thread_local! {
    static TEST_HASH_OVERRIDE: std::cell::Cell<Option<StableHash>> =
        const { std::cell::Cell::new(None) };
}

#[cfg(test)]
fn test_hash_override() -> Option<StableHash> {
    TEST_HASH_OVERRIDE.with(std::cell::Cell::get)
}

// Execute one closure with a thread-local test hash override and always restore
// the previous override state, even if the closure panics.
#[cfg(test)]
pub(crate) fn with_test_hash_override<T>(
    override_hash: StableHash,
    f: impl FnOnce() -> T + std::panic::UnwindSafe,
) -> T {
    let previous = TEST_HASH_OVERRIDE.with(|cell| cell.replace(Some(override_hash)));
    let result = std::panic::catch_unwind(f);
    TEST_HASH_OVERRIDE.with(|cell| cell.set(previous));
    match result {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Hash one projected tuple.
///
/// Returns `None` when the tuple holds a value that never compares equal
/// (NaN, lists, maps); such tuples always open a new group.
#[must_use]
pub(crate) fn stable_hash_key(key: &ProjectedKey) -> Option<StableHash> {
    if !key.is_self_matching() {
        return None;
    }

    #[cfg(test)]
    if let Some(override_hash) = test_hash_override() {
        return Some(override_hash);
    }

    let mut h = Xxh3::with_seed(KEY_HASH_SEED);
    h.update(&[KEY_HASH_VERSION]);

    for slot in key.slots() {
        h.update(&[SLOT_SEPARATOR]);
        write_slot(&mut h, slot.as_ref());
    }

    Some(h.digest())
}

fn write_slot(h: &mut Xxh3, slot: Option<&Value>) {
    let Some(value) = slot else {
        h.update(&[TAG_ABSENT]);
        return;
    };

    match value {
        Value::Null => h.update(&[TAG_NULL]),
        Value::Bool(b) => h.update(&[TAG_BOOL, u8::from(*b)]),
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => match NumericKey::of(value) {
            Some(NumericKey::Integer(i)) => {
                h.update(&[TAG_INTEGER]);
                h.update(&i.to_be_bytes());
            }
            Some(NumericKey::Fractional(f)) => {
                h.update(&[TAG_FRACTIONAL]);
                h.update(&f.to_bits().to_be_bytes());
            }
            // NaN is filtered before hashing
            None => {}
        },
        Value::Text(s) => {
            h.update(&[TAG_TEXT]);
            h.update(&(s.len() as u64).to_be_bytes());
            h.update(s.as_bytes());
        }
        // nested values are filtered before hashing
        Value::List(_) | Value::Map(_) => {}
    }
}

///
/// TESTS
///
