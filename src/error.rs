//! Tagged failures for every operation in the crate.
//!
//! Verification predicates ([`crate::signature::verify`],
//! [`crate::zkp::verify_zkp`]) fail closed by returning `false`/`Ok(false)`
//! instead of an error: a proof or signature that does not check out is not
//! a malformed call, it's the expected outcome of a dishonest prover.

use thiserror::Error;

/// Everything that can go wrong calling into this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// `bits` passed to [`crate::key::generate_keypair`] is too small or not
    /// byte-aligned.
    #[error("key bit length {bits} is invalid: must be >= {min} and a multiple of 8")]
    KeyBits {
        /// the rejected bit length
        bits: u32,
        /// minimum accepted bit length
        min: u32,
    },

    /// Vote codec dimensions (`num_choices`, `bits_per_choice`, `num_bins`,
    /// `bin`, `choice`) are out of range for each other.
    #[error("invalid vote codec parameters: {reason}")]
    BadCodecParameter {
        /// human-readable description of which constraint failed
        reason: String,
    },

    /// `m >= n` or `m < 0` in [`crate::paillier::encrypt`].
    #[error("plaintext is out of range for this key's modulus n")]
    BadPlaintext,

    /// `c >= n^2` in [`crate::paillier::decrypt`] or a homomorphic operator.
    #[error("ciphertext is out of range for this key's modulus n^2")]
    BadCiphertext,

    /// The prover asked [`crate::zkp::create_zkp`] to prove membership for a
    /// plaintext that is not in the declared valid set.
    #[error("plaintext is not a member of the declared valid set")]
    NotInValidSet,

    /// The commitment handed to [`crate::zkp::verify_zkp`] doesn't have `a`,
    /// `e` and `z` all the same length as the valid set.
    #[error(
        "malformed zkp commitment: expected {expected} entries per array, got a={a} e={e} z={z}"
    )]
    MalformedCommitment {
        /// length of the `a` array
        a: usize,
        /// length of the `e` array
        e: usize,
        /// length of the `z` array
        z: usize,
        /// the valid set's length, i.e. the length every array must match
        expected: usize,
    },

    /// A base64 big-endian bigint encoding failed to decode.
    #[error("invalid base64 bigint encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The OS random number generator failed. This is always fatal; there is
    /// no meaningful way to retry sampling cryptographic randomness.
    #[error("random number generator failure: {0}")]
    Rng(#[from] rand_core::Error),
}
