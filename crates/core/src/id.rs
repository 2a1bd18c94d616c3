// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation abstractions
//!
//! Session ids are minted by an [`IdGen`]. The default [`UlidGen`] produces
//! 26-character Crockford base32 strings: a 48-bit millisecond timestamp
//! followed by 80 bits of randomness. Within one millisecond the random part
//! is incremented instead of redrawn, so ids from one generator are strictly
//! increasing in both byte order and generation order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use tracing::warn;

use crate::clock::{Clock, SystemClock};

/// Source of fresh session ids.
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const ULID_LEN: usize = 26;
const RANDOM_BITS: u32 = 80;
const RANDOM_MASK: u128 = (1 << RANDOM_BITS) - 1;
const TIMESTAMP_MAX: u64 = (1 << 48) - 1;

#[derive(Debug, Default)]
struct UlidState {
    last_ms: Option<u64>,
    last_random: u128,
}

/// Time-ordered, monotonic-within-timestamp id generator.
///
/// Clones share state, so a single generator handed to many tasks still
/// never repeats itself.
#[derive(Clone)]
pub struct UlidGen<C: Clock = SystemClock> {
    clock: C,
    state: Arc<Mutex<UlidState>>,
}

impl UlidGen<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for UlidGen<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> UlidGen<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock, state: Arc::new(Mutex::new(UlidState::default())) }
    }

    fn next_value(&self) -> u128 {
        let now = self.clock.epoch_ms().min(TIMESTAMP_MAX);
        let mut state = self.state.lock();

        // A clock that stalls or steps backwards keeps the last timestamp so
        // ordering holds; the random part is bumped instead, carrying into the
        // timestamp when it overflows.
        let ms = match state.last_ms {
            Some(last) if now <= last => {
                if state.last_random < RANDOM_MASK {
                    state.last_random += 1;
                    last
                } else if last < TIMESTAMP_MAX {
                    state.last_random = rand::rng().random::<u128>() & (RANDOM_MASK >> 1);
                    last + 1
                } else {
                    // Id space exhausted: hold at the maximum instead of going backwards.
                    warn!("ulid space exhausted, repeating the maximum id");
                    last
                }
            }
            _ => {
                state.last_random = rand::rng().random::<u128>() & RANDOM_MASK;
                now
            }
        };
        state.last_ms = Some(ms);

        (u128::from(ms) << RANDOM_BITS) | state.last_random
    }
}

impl<C: Clock> IdGen for UlidGen<C> {
    fn next(&self) -> String {
        encode_ulid(self.next_value())
    }
}

fn encode_ulid(mut value: u128) -> String {
    let mut buf = [b'0'; ULID_LEN];
    for slot in buf.iter_mut().rev() {
        *slot = CROCKFORD[(value & 0x1f) as usize];
        value >>= 5;
    }
    buf.iter().map(|&b| b as char).collect()
}

/// Extract the millisecond timestamp from an id minted by [`UlidGen`].
///
/// Returns `None` for anything that is not a 26-character Crockford string.
pub fn ulid_timestamp_ms(id: &str) -> Option<u64> {
    if id.len() != ULID_LEN {
        return None;
    }
    let mut value: u128 = 0;
    for c in id.bytes() {
        let digit = CROCKFORD.iter().position(|&d| d == c.to_ascii_uppercase())?;
        value = (value << 5) | digit as u128;
    }
    Some((value >> RANDOM_BITS) as u64)
}

/// Predictable `{prefix}-{n}` ids for tests.
///
/// Clones share the counter.
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counter: Arc::new(AtomicU64::new(0)) }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
