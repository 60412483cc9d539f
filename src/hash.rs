//! Deterministic hash of one or more bigints into a 256-bit challenge.
//!
//! The spec leaves the hash family as an implementation choice as long as
//! prover and verifier agree; this crate picks SHA-256, the same family the
//! pack's other Paillier/Fiat-Shamir code reaches for. The output width
//! fixes the Fiat-Shamir challenge modulus `M = 2^256` used throughout
//! [`crate::zkp`] — changing this hash changes `M`.

use digest::Digest;
use sha2::Sha256;

use crate::bigint::BigInt;

/// Bit width of [`hash_bigint`] and [`hash_bigints`]'s output, and of the
/// Fiat-Shamir challenge modulus `M` in the ZKP engine.
pub const HASH_BITS: u32 = 256;

/// `H(x)`: hash a single bigint's canonical big-endian bytes to a 256-bit
/// non-negative integer.
pub fn hash_bigint(x: &BigInt) -> BigInt {
    hash_bigints(std::iter::once(x))
}

/// `H(x_0, x_1, ..., x_{k-1})`: hash a sequence of bigints, in the given
/// order, to a single 256-bit non-negative integer. Used to derive the
/// Fiat-Shamir challenge `ε = H(a_0, ..., a_{k-1})` from the prover's
/// commitment.
pub fn hash_bigints<'a, I>(xs: I) -> BigInt
where
    I: IntoIterator<Item = &'a BigInt>,
{
    let mut hasher = Sha256::new();
    for x in xs {
        let bytes = x.to_be_bytes();
        // Length-prefix each element so that e.g. hashing `[1, 23]` cannot
        // collide with hashing `[123]`: both would otherwise share the byte
        // sequence `0x01 0x23`.
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(&bytes);
    }
    BigInt::from_be_bytes(&hasher.finalize())
}
