//! Paillier encrypt / decrypt and the three homomorphic operators.
//!
//! `encrypt` and `decrypt` use the closed-form identity
//! `g^m mod n^2 = (1 + n*m) mod n^2`, which holds because this crate fixes
//! `g = n + 1`. A generic `modPow` would be correct but quadratically
//! slower for large keys.

use rand_core::{CryptoRng, RngCore};
use tracing::instrument;

use crate::bigint::BigInt;
use crate::error::Error;
use crate::key::{l_function, PrivateKey, PublicKey};
use crate::rand::sample_coprime;

/// A Paillier ciphertext: an integer `0 <= c < n^2`. Deliberately not
/// paired with the key it was encrypted under — that pairing is the
/// caller's responsibility, so this type carries no key reference and
/// cannot accidentally be decrypted under the wrong one without the caller
/// passing both explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ciphertext(pub(crate) BigInt);

impl Ciphertext {
    /// Wrap a raw bigint as a ciphertext without validating it against any
    /// particular key. Used by callers deserializing a ciphertext off the
    /// wire; validity (`c < n^2`) is checked lazily by [`decrypt`] and the
    /// homomorphic operators.
    pub fn from_raw(c: BigInt) -> Self {
        Ciphertext(c)
    }

    /// The underlying integer value.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }
}

/// `g^m mod n^2`, computed via the closed-form identity rather than a
/// generic `modPow`. Exposed crate-internally so [`crate::zkp`] can compute
/// `u_i = c * g^{-m_i} mod n^2` for each valid-set candidate without
/// duplicating the identity.
pub(crate) fn g_pow(m: &BigInt, pk: &PublicKey) -> BigInt {
    // (1 + n*m) mod n^2
    BigInt::one().add(&pk.n().mul(m)).modulo(pk.n_squared())
}

/// Encrypt plaintext `m` under `pk`, sampling fresh randomness internally.
/// Returns both the ciphertext and the randomness `r` used, since the ZKP
/// prover ([`crate::zkp::create_zkp`]) needs `r` to complete its real
/// clause.
///
/// # Errors
///
/// Returns [`Error::BadPlaintext`] if `m >= n` (negative plaintexts can't
/// occur: [`BigInt`] is always non-negative). Returns [`Error::Rng`] if the
/// entropy source backing `rng` fails mid-sample.
#[instrument(skip(pk, rng))]
pub fn encrypt<R: RngCore + CryptoRng>(
    m: &BigInt,
    pk: &PublicKey,
    rng: &mut R,
) -> Result<(Ciphertext, BigInt), Error> {
    if m.ge(pk.n()) {
        return Err(Error::BadPlaintext);
    }
    let r = sample_coprime(pk.n(), rng)?;
    let c = encrypt_with_randomness(m, &r, pk)?;
    Ok((c, r))
}

/// Encrypt `m` under `pk` using caller-supplied randomness `r` (must satisfy
/// `gcd(r, n) == 1`, `0 < r < n`). Exposed so [`crate::zkp`] can recompute
/// `u_i = c * g^{-m_i} mod n^2` against specific, already-known randomness
/// without resampling.
pub(crate) fn encrypt_with_randomness(
    m: &BigInt,
    r: &BigInt,
    pk: &PublicKey,
) -> Result<Ciphertext, Error> {
    if m.ge(pk.n()) {
        return Err(Error::BadPlaintext);
    }
    let g_m = g_pow(m, pk);
    let r_n = r
        .pow_mod(pk.n(), pk.n_squared())
        .ok_or(Error::BadCiphertext)?;
    Ok(Ciphertext(g_m.mul_mod(&r_n, pk.n_squared())))
}

/// Decrypt ciphertext `c` under `(pk, sk)`.
///
/// # Errors
///
/// Returns [`Error::BadCiphertext`] if `c >= n^2`.
#[instrument(skip(pk, sk))]
pub fn decrypt(c: &Ciphertext, pk: &PublicKey, sk: &PrivateKey) -> Result<BigInt, Error> {
    if c.0.ge(pk.n_squared()) {
        return Err(Error::BadCiphertext);
    }
    let u = c
        .0
        .pow_mod(sk.lambda(), pk.n_squared())
        .ok_or(Error::BadCiphertext)?;
    let l = l_function(&u, pk.n());
    Ok(l.mul_mod(sk.mu(), pk.n()))
}

/// Homomorphic ciphertext addition: `decrypt(add_encrypted(E(m1), E(m2))) ==
/// (m1 + m2) mod n`.
///
/// # Errors
///
/// Returns [`Error::BadCiphertext`] if either input is `>= n^2`.
pub fn add_encrypted(c1: &Ciphertext, c2: &Ciphertext, pk: &PublicKey) -> Result<Ciphertext, Error> {
    if c1.0.ge(pk.n_squared()) || c2.0.ge(pk.n_squared()) {
        return Err(Error::BadCiphertext);
    }
    Ok(Ciphertext(c1.0.mul_mod(&c2.0, pk.n_squared())))
}

/// Homomorphic scalar addition: `decrypt(add_scalar(E(m), k)) == (m + k) mod
/// n`. Computed as `c * g^k mod n^2` using the same closed-form `g^k`
/// identity as [`encrypt`].
///
/// # Errors
///
/// Returns [`Error::BadCiphertext`] if `c >= n^2`.
pub fn add_scalar(c: &Ciphertext, k: &BigInt, pk: &PublicKey) -> Result<Ciphertext, Error> {
    if c.0.ge(pk.n_squared()) {
        return Err(Error::BadCiphertext);
    }
    let g_k = g_pow(k, pk);
    Ok(Ciphertext(c.0.mul_mod(&g_k, pk.n_squared())))
}

/// Homomorphic scalar multiplication: `decrypt(mul_scalar(E(m), k)) == (m *
/// k) mod n`.
///
/// # Errors
///
/// Returns [`Error::BadCiphertext`] if `c >= n^2`.
pub fn mul_scalar(c: &Ciphertext, k: &BigInt, pk: &PublicKey) -> Result<Ciphertext, Error> {
    if c.0.ge(pk.n_squared()) {
        return Err(Error::BadCiphertext);
    }
    let result = c.0.pow_mod(k, pk.n_squared()).ok_or(Error::BadCiphertext)?;
    Ok(Ciphertext(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::generate_keypair;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn test_key() -> (PublicKey, PrivateKey, ChaCha20Rng) {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let (pk, sk) = generate_keypair(256, &mut rng).unwrap();
        (pk, sk, rng)
    }

    #[test]
    fn roundtrips_small_and_large_plaintexts() {
        // S1, with a 256-bit key; the last value needs more than 64 bits.
        let (pk, sk, mut rng) = test_key();
        for m in [0u64, 1, 8572057275] {
            let m = BigInt::from_u64(m);
            let (c, _) = encrypt(&m, &pk, &mut rng).unwrap();
            assert_eq!(decrypt(&c, &pk, &sk).unwrap(), m);
        }
        let large: BigInt = "95477148500050043847142".parse().unwrap();
        let (c, _) = encrypt(&large, &pk, &mut rng).unwrap();
        assert_eq!(decrypt(&c, &pk, &sk).unwrap(), large);
    }

    #[test]
    fn rejects_plaintext_out_of_range() {
        let (pk, _, mut rng) = test_key();
        assert!(matches!(
            encrypt(pk.n(), &pk, &mut rng),
            Err(Error::BadPlaintext)
        ));
    }

    #[test]
    fn rejects_ciphertext_out_of_range() {
        let (pk, sk, _) = test_key();
        let bogus = Ciphertext::from_raw(pk.n_squared().add(&BigInt::one()));
        assert!(matches!(
            decrypt(&bogus, &pk, &sk),
            Err(Error::BadCiphertext)
        ));
    }

    #[test]
    fn add_encrypted_sums_plaintexts_mod_n() {
        let (pk, sk, mut rng) = test_key();
        let (c1, _) = encrypt(&BigInt::from_u64(12), &pk, &mut rng).unwrap();
        let (c2, _) = encrypt(&BigInt::from_u64(30), &pk, &mut rng).unwrap();
        let sum = add_encrypted(&c1, &c2, &pk).unwrap();
        assert_eq!(decrypt(&sum, &pk, &sk).unwrap(), BigInt::from_u64(42));
    }

    #[test]
    fn add_scalar_adds_a_plain_constant() {
        let (pk, sk, mut rng) = test_key();
        let (c, _) = encrypt(&BigInt::from_u64(12), &pk, &mut rng).unwrap();
        let added = add_scalar(&c, &BigInt::from_u64(30), &pk).unwrap();
        assert_eq!(decrypt(&added, &pk, &sk).unwrap(), BigInt::from_u64(42));
    }

    #[test]
    fn mul_scalar_multiplies_by_a_plain_constant() {
        let (pk, sk, mut rng) = test_key();
        let (c, _) = encrypt(&BigInt::from_u64(6), &pk, &mut rng).unwrap();
        let scaled = mul_scalar(&c, &BigInt::from_u64(7), &pk).unwrap();
        assert_eq!(decrypt(&scaled, &pk, &sk).unwrap(), BigInt::from_u64(42));
    }

    #[test]
    fn homomorphic_sum_of_a_hundred_powers_of_two() {
        let (pk, sk, mut rng) = test_key();
        let mut acc: Option<Ciphertext> = None;
        for i in 0..100u32 {
            let (c, _) = encrypt(&BigInt::one_shl(i), &pk, &mut rng).unwrap();
            acc = Some(match acc {
                None => c,
                Some(prev) => add_encrypted(&prev, &c, &pk).unwrap(),
            });
        }
        let decrypted = decrypt(&acc.unwrap(), &pk, &sk).unwrap();
        // sum_{i=0}^{99} 2^i == 2^100 - 1
        let expected = BigInt::one_shl(100).sub(&BigInt::one());
        assert_eq!(decrypted, expected);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::key::generate_keypair;
    use proptest::prelude::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn homomorphic_add_matches_plain_addition(seed in any::<u64>(), a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let (pk, sk) = generate_keypair(256, &mut rng).unwrap();
            let (ca, _) = encrypt(&BigInt::from_u64(a), &pk, &mut rng).unwrap();
            let (cb, _) = encrypt(&BigInt::from_u64(b), &pk, &mut rng).unwrap();
            let sum = add_encrypted(&ca, &cb, &pk).unwrap();
            let decrypted = decrypt(&sum, &pk, &sk).unwrap();
            prop_assert_eq!(decrypted, BigInt::from_u64(a + b));
        }

        #[test]
        fn scalar_mul_matches_plain_multiplication(seed in any::<u64>(), m in 0u64..10_000, k in 0u64..100) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let (pk, sk) = generate_keypair(256, &mut rng).unwrap();
            let (c, _) = encrypt(&BigInt::from_u64(m), &pk, &mut rng).unwrap();
            let scaled = mul_scalar(&c, &BigInt::from_u64(k), &pk).unwrap();
            let decrypted = decrypt(&scaled, &pk, &sk).unwrap();
            prop_assert_eq!(decrypted, BigInt::from_u64(m * k));
        }
    }
}
