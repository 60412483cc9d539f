//! Randomness: uniform bigints, coprime sampling, prime generation.
//!
//! Every sampler here takes an explicit `R: RngCore + CryptoRng` rather than
//! reaching for a global RNG; callers normally pass `rand_core::OsRng` (the
//! process RNG must be seeded from the OS entropy pool) or, in tests, a
//! fixed-seed `ChaCha20Rng` for reproducibility. Every sampler is fallible:
//! the underlying RNG draw uses `try_fill_bytes` rather than `fill_bytes`, so
//! an exhausted or failing entropy source surfaces as a `rand_core::Error`
//! instead of panicking.
//!
//! GMP's own `RandState` is used for the actual bit generation, reseeded
//! from 256 bits drawn out of the caller's `R` before each draw. Reseeding
//! per-call rather than carrying a long-lived `RandState` keeps this module
//! free of self-referential state and lets every function stay a plain
//! `&mut R -> Result<BigInt, _>` mapping.

use rand_core::{CryptoRng, RngCore};
use rug::integer::Order;
use rug::rand::RandState;
use rug::Integer;

use crate::bigint::BigInt;

fn seeded_rand_state<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<RandState<'static>, rand_core::Error> {
    let mut seed_bytes = [0u8; 32];
    rng.try_fill_bytes(&mut seed_bytes)?;
    let seed = Integer::from_digits(&seed_bytes, Order::Msf);
    let mut state = RandState::new();
    state.seed(&seed);
    Ok(state)
}

/// Uniform random integer in `[0, 2^bits)`.
pub fn random_bits<R: RngCore + CryptoRng>(
    bits: u32,
    rng: &mut R,
) -> Result<BigInt, rand_core::Error> {
    let mut state = seeded_rand_state(rng)?;
    Ok(BigInt(Integer::from(Integer::random_bits(bits, &mut state))))
}

/// Uniform random integer in `[0, bound)`. Panics if `bound <= 0`.
pub fn random_below<R: RngCore + CryptoRng>(
    bound: &BigInt,
    rng: &mut R,
) -> Result<BigInt, rand_core::Error> {
    let mut state = seeded_rand_state(rng)?;
    Ok(BigInt(Integer::from(
        bound.as_rug().clone().random_below(&mut state),
    )))
}

/// Sample a uniform element of `Z*_n`: uniform in `(0, n)`, rejecting until
/// `gcd(candidate, n) == 1`.
///
/// A defensive `r >= n` re-roll would be redundant here: we sample directly
/// in `[0, n)` via [`random_below`], which already guarantees `r < n`, so no
/// extra re-roll is needed.
pub fn sample_coprime<R: RngCore + CryptoRng>(
    modulus: &BigInt,
    rng: &mut R,
) -> Result<BigInt, rand_core::Error> {
    loop {
        let candidate = random_below(modulus, rng)?;
        if candidate.is_zero() {
            continue;
        }
        if candidate.gcd(modulus) == BigInt::one() {
            return Ok(candidate);
        }
    }
}

/// Sample a probable prime of exactly `bits` bits: draw a uniform candidate
/// with the top and bottom bits forced on (so it has exactly `bits` bits and
/// is odd), then resample until GMP's Miller-Rabin test
/// ([`BigInt::is_probably_prime`]) accepts it.
pub fn random_prime<R: RngCore + CryptoRng>(
    bits: u32,
    rng: &mut R,
) -> Result<BigInt, rand_core::Error> {
    let top_bit = BigInt::one_shl(bits - 1);
    loop {
        let sample = random_bits(bits, rng)?;
        let forced = sample.as_rug().clone() | top_bit.as_rug().clone() | Integer::from(1);
        let candidate = BigInt(forced);
        if candidate.is_probably_prime() {
            return Ok(candidate);
        }
    }
}
