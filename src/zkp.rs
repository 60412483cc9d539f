//! Non-interactive zero-knowledge proof that a Paillier ciphertext encrypts
//! one of a declared set of plaintexts, without revealing which.
//!
//! This is the Cramer-Damgard-Schoenmakers OR-combination of `k` Paillier
//! sigma-protocol legs, one per candidate plaintext, made non-interactive by
//! Fiat-Shamir. It follows the common `Data`/`PrivateData`/`Commitment`/
//! `Proof` shape used for sigma-protocol-plus-Fiat-Shamir relations,
//! generalized here to an OR of `k` clauses rather than a single one:
//! clause `kappa` (the real plaintext's index) carries an honestly computed
//! commitment, and every other clause carries a simulated one that the
//! Fiat-Shamir challenge is built to make indistinguishable from real.
//!
//! ## Example
//!
//! ```
//! use paillier_ballot_core::key::generate_keypair;
//! use paillier_ballot_core::bigint::BigInt;
//! use paillier_ballot_core::zkp::{encrypt_with_zkp, verify_zkp};
//! use rand_core::OsRng;
//!
//! let mut rng = OsRng;
//! let (pk, _sk) = generate_keypair(512, &mut rng).unwrap();
//! let valid_set: Vec<BigInt> = [1u64, 2, 3].into_iter().map(BigInt::from_u64).collect();
//!
//! let (c, commitment) = encrypt_with_zkp(&BigInt::from_u64(2), &valid_set, &pk, &mut rng).unwrap();
//! assert!(verify_zkp(&c, &valid_set, &commitment, &pk).unwrap());
//! ```

use rand_core::{CryptoRng, RngCore};
use tracing::instrument;

use crate::bigint::BigInt;
use crate::error::Error;
use crate::hash::{hash_bigints, HASH_BITS};
use crate::key::PublicKey;
use crate::paillier::{encrypt, encrypt_with_randomness, g_pow, Ciphertext};
use crate::rand::{random_bits, sample_coprime};

/// The prover's commitment: three equal-length sequences `a`, `e`, `z`, one
/// triple per candidate in the valid set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZkpCommitment {
    a: Vec<BigInt>,
    e: Vec<BigInt>,
    z: Vec<BigInt>,
}

impl ZkpCommitment {
    /// The `a` array, one entry per valid-set candidate.
    pub fn a(&self) -> &[BigInt] {
        &self.a
    }

    /// The `e` array (per-clause challenge shares); they sum to the
    /// Fiat-Shamir challenge mod `2^256`.
    pub fn e(&self) -> &[BigInt] {
        &self.e
    }

    /// The `z` array (per-clause responses).
    pub fn z(&self) -> &[BigInt] {
        &self.z
    }
}

/// `u_i = c * g^{-m_i} mod n^2`, the value each clause's sigma-protocol
/// operates on: if `m_i` is the real plaintext, `u_i` is `r^n mod n^2` for
/// the encryption randomness `r`, i.e. a valid `n`-th power; if not, `u_i`
/// is (overwhelmingly likely) not an `n`-th power, which is exactly the gap
/// each clause's commitment either bridges honestly (`kappa`) or simulates
/// (every other index).
fn clause_base(c: &Ciphertext, candidate: &BigInt, pk: &PublicKey) -> Result<BigInt, Error> {
    let g_m = g_pow(candidate, pk);
    let g_m_inv = g_m.invert(pk.n_squared()).ok_or(Error::BadCiphertext)?;
    Ok(c.as_bigint().mul_mod(&g_m_inv, pk.n_squared()))
}

/// Sample a simulated clause's response `z_i`: uniform in `Z*_n`, bounded to
/// `bit_length(n) - 1` bits so it is bounded the same way the real clause's
/// `z` value can ever be.
fn sample_simulated_z<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    rng: &mut R,
) -> Result<BigInt, rand_core::Error> {
    let bits = pk.bits().saturating_sub(1);
    loop {
        let candidate = random_bits(bits, rng)?;
        if candidate.is_zero() {
            continue;
        }
        if candidate.gcd(pk.n()) == BigInt::one() {
            return Ok(candidate);
        }
    }
}

/// Sample a simulated clause's challenge share `e_i`: uniform with bit
/// length `bit_length(n)/2 - 1`, bounded below `min(p, q)` so that
/// `u_i^{e_i}` lands on a uniform element of the relevant subgroup.
fn sample_simulated_e<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    rng: &mut R,
) -> Result<BigInt, rand_core::Error> {
    let bits = (pk.bits() / 2).saturating_sub(1);
    random_bits(bits, rng)
}

/// Create a membership proof that ciphertext `c` (encrypted under `pk` with
/// randomness `r`) encrypts `m`, and that `m` is one of `valid_set`.
///
/// `valid_set` must be presented in the same order the verifier will use:
/// clause `i` of the resulting commitment corresponds to `valid_set[i]`.
///
/// # Errors
///
/// Returns [`Error::NotInValidSet`] if `m` is not (exactly) equal to any
/// element of `valid_set`. Returns [`Error::Rng`] if the entropy source
/// backing `rng` fails mid-sample.
#[instrument(skip(r, pk, rng))]
pub fn create_zkp<R: RngCore + CryptoRng>(
    m: &BigInt,
    c: &Ciphertext,
    r: &BigInt,
    valid_set: &[BigInt],
    pk: &PublicKey,
    rng: &mut R,
) -> Result<ZkpCommitment, Error> {
    let kappa = valid_set
        .iter()
        .position(|candidate| candidate == m)
        .ok_or(Error::NotInValidSet)?;

    let omega = sample_coprime(pk.n(), rng)?;

    let mut a = Vec::with_capacity(valid_set.len());
    let mut e = Vec::with_capacity(valid_set.len());
    let mut z = Vec::with_capacity(valid_set.len());

    for (i, candidate) in valid_set.iter().enumerate() {
        let u_i = clause_base(c, candidate, pk)?;
        if i == kappa {
            // Placeholders; `a[kappa]` is filled in right after this loop,
            // and `e[kappa]`/`z[kappa]` once we know the other clauses'
            // `e_i` (needed to derive `e_kappa` from the Fiat-Shamir hash).
            a.push(BigInt::zero());
            e.push(BigInt::zero());
            z.push(BigInt::zero());
            continue;
        }
        let e_i = sample_simulated_e(pk, rng)?;
        let z_i = sample_simulated_z(pk, rng)?;
        let z_i_n = z_i.pow_mod(pk.n(), pk.n_squared()).ok_or(Error::BadCiphertext)?;
        let u_i_e_i = u_i.pow_mod(&e_i, pk.n_squared()).ok_or(Error::BadCiphertext)?;
        let u_i_e_i_inv = u_i_e_i.invert(pk.n_squared()).ok_or(Error::BadCiphertext)?;
        let a_i = z_i_n.mul_mod(&u_i_e_i_inv, pk.n_squared());
        a[i] = a_i;
        e[i] = e_i;
        z[i] = z_i;
    }
    a[kappa] = omega.pow_mod(pk.n(), pk.n_squared()).ok_or(Error::BadCiphertext)?;

    let epsilon = hash_bigints(a.iter());
    let modulus = BigInt::one_shl(HASH_BITS);

    let sum_others = e
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != kappa)
        .fold(BigInt::zero(), |acc, (_, e_i)| acc.add(e_i));
    // (epsilon - sum_others) mod M, kept non-negative by adding M before
    // subtracting rather than risking a negative intermediate.
    let e_kappa = modulus
        .add(&epsilon)
        .sub(&sum_others.modulo(&modulus))
        .modulo(&modulus);
    let z_kappa = omega.mul_mod(
        &r.pow_mod(&e_kappa, pk.n()).ok_or(Error::BadCiphertext)?,
        pk.n(),
    );

    e[kappa] = e_kappa;
    z[kappa] = z_kappa;

    Ok(ZkpCommitment { a, e, z })
}

/// Encrypt `m` under `pk` and immediately attach a membership proof that it
/// is one of `valid_set`. Equivalent to calling [`crate::paillier::encrypt`]
/// then [`create_zkp`], bundled since the two always go together in
/// practice.
///
/// # Errors
///
/// Returns [`Error::BadPlaintext`] if `m >= n`, [`Error::NotInValidSet`] if
/// `m` is not in `valid_set`, or [`Error::Rng`] if the entropy source
/// backing `rng` fails mid-sample.
pub fn encrypt_with_zkp<R: RngCore + CryptoRng>(
    m: &BigInt,
    valid_set: &[BigInt],
    pk: &PublicKey,
    rng: &mut R,
) -> Result<(Ciphertext, ZkpCommitment), Error> {
    let (c, r) = encrypt(m, pk, rng)?;
    let commitment = create_zkp(m, &c, &r, valid_set, pk, rng)?;
    Ok((c, commitment))
}

/// Verify that `commitment` proves ciphertext `c` encrypts some member of
/// `valid_set`, under `pk`.
///
/// Returns `Ok(false)` (not an error) for a structurally valid but
/// unconvincing commitment — only a commitment whose array lengths disagree
/// with `valid_set`'s length is an error: a real verifier needs to tell "the
/// prover cheated" apart from "the commitment wasn't even shaped right to
/// evaluate".
///
/// # Errors
///
/// Returns [`Error::MalformedCommitment`] if `commitment.a()`,
/// `commitment.e()` and `commitment.z()` don't all have exactly
/// `valid_set.len()` entries.
#[instrument(skip(pk))]
pub fn verify_zkp(
    c: &Ciphertext,
    valid_set: &[BigInt],
    commitment: &ZkpCommitment,
    pk: &PublicKey,
) -> Result<bool, Error> {
    let k = valid_set.len();
    if commitment.a.len() != k || commitment.e.len() != k || commitment.z.len() != k {
        return Err(Error::MalformedCommitment {
            a: commitment.a.len(),
            e: commitment.e.len(),
            z: commitment.z.len(),
            expected: k,
        });
    }

    let epsilon = hash_bigints(commitment.a.iter());
    let modulus = BigInt::one_shl(HASH_BITS);
    let sum_e = commitment
        .e
        .iter()
        .fold(BigInt::zero(), |acc, e_i| acc.add(e_i))
        .modulo(&modulus);
    if sum_e != epsilon {
        return Ok(false);
    }

    for i in 0..k {
        let u_i = clause_base(c, &valid_set[i], pk)?;
        let lhs = match commitment.z[i].pow_mod(pk.n(), pk.n_squared()) {
            Some(v) => v,
            None => return Ok(false),
        };
        let u_i_e_i = match u_i.pow_mod(&commitment.e[i], pk.n_squared()) {
            Some(v) => v,
            None => return Ok(false),
        };
        let rhs = commitment.a[i].mul_mod(&u_i_e_i, pk.n_squared());
        if lhs != rhs {
            return Ok(false);
        }
    }

    Ok(true)
}
