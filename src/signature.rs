//! Paillier-based digital signature scheme.
//!
//! Verification implicitly treats the 256-bit hash `H(m)` as an element of
//! `Z_{n^2}`; that's only unambiguous when `bits(n^2) > 256`, i.e. roughly
//! `bits(n) >= 256`. Callers using smaller keys get a signature scheme whose
//! verification is ill-defined rather than a silently truncated hash — this
//! crate documents the constraint instead of working around it.

use tracing::instrument;

use crate::bigint::BigInt;
use crate::hash::hash_bigint;
use crate::key::{l_function, PrivateKey, PublicKey};

/// A Paillier signature `(s1, s2)`, both reduced mod `n`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    s1: BigInt,
    s2: BigInt,
}

impl Signature {
    /// The `s1` component.
    pub fn s1(&self) -> &BigInt {
        &self.s1
    }

    /// The `s2` component.
    pub fn s2(&self) -> &BigInt {
        &self.s2
    }
}

/// Sign message `m` (as a bigint; callers hashing arbitrary byte messages
/// first should use [`crate::hash::hash_bigint`] on the byte-derived
/// integer themselves, or pass `m` already reduced to a representative
/// `BigInt`) under `(pk, sk)`.
///
/// `bits(n) >= 256` is required for [`verify`] to be well-defined against
/// the resulting signature (see module docs); this function itself never
/// fails, since the arithmetic is defined for any key size, but callers
/// with smaller keys accept that the result may not verify meaningfully.
#[instrument(skip(pk, sk))]
pub fn sign(m: &BigInt, pk: &PublicKey, sk: &PrivateKey) -> Signature {
    let h = hash_bigint(m);
    let h_lambda = h
        .pow_mod(sk.lambda(), pk.n_squared())
        .expect("n^2 is never zero");
    let s1 = l_function(&h_lambda, pk.n()).mul_mod(sk.mu(), pk.n());

    // g^{-s1} mod n^2, i.e. the modular inverse of g^s1.
    let g_s1 = BigInt::one()
        .add(&pk.n().mul(&s1))
        .modulo(pk.n_squared());
    let g_s1_inv = g_s1
        .invert(pk.n_squared())
        .expect("g is a unit mod n^2, so any power of it is too");
    let base = h.mul_mod(&g_s1_inv, pk.n_squared());

    let n_inv_lambda = pk
        .n()
        .invert(sk.lambda())
        .expect("n is coprime to lambda(n) for an RSA-like modulus");
    let s2 = base
        .pow_mod(&n_inv_lambda, pk.n())
        .expect("n is never zero");

    Signature { s1, s2 }
}

/// Verify that `signature` is a valid signature of `m` under `pk`.
///
/// Fails closed: any arithmetic anomaly (e.g. a malformed signature that
/// makes an intermediate `pow_mod` undefined) is treated as rejection,
/// never surfaced as an error — a bad signature is an expected outcome, not
/// a malformed call.
#[instrument(skip(pk))]
pub fn verify(m: &BigInt, signature: &Signature, pk: &PublicKey) -> bool {
    let h = hash_bigint(m);
    let lhs = {
        let g_s1 = BigInt::one().add(&pk.n().mul(&signature.s1)).modulo(pk.n_squared());
        let s2_n = match signature.s2.pow_mod(pk.n(), pk.n_squared()) {
            Some(v) => v,
            None => return false,
        };
        g_s1.mul_mod(&s2_n, pk.n_squared())
    };
    lhs == h
}
