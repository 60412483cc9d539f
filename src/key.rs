//! Paillier key material: [`PublicKey`], [`PrivateKey`], and
//! [`generate_keypair`].

use rand_core::{CryptoRng, RngCore};
use tracing::{info, instrument, trace};

use crate::bigint::BigInt;
use crate::error::Error;
use crate::rand::random_prime;

/// Minimum accepted key bit length. Below this the probability of an
/// accidental `p == q` collision and the margin for the ZKP simulator's
/// `e_i` sampling (bounded by `bit_length(n)/2 - 1`) both become too thin to
/// be meaningful.
pub const MIN_KEY_BITS: u32 = 160;

/// The Paillier public key `(n, g, n^2)`. Immutable after construction; `g`
/// is always `n + 1`, so it is not stored as a separate field that could
/// drift out of sync with `n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    n: BigInt,
    n_squared: BigInt,
}

/// The wire shape for [`PublicKey`]: `{n, g}`. `n_squared` is this struct's
/// own cached field, not part of the key's documented external form — it is
/// derived from `n` and recomputed on deserialize rather than sent over the
/// wire.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PublicKeyWire {
    n: BigInt,
    g: BigInt,
}

#[cfg(feature = "serde")]
impl serde::Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PublicKeyWire {
            n: self.n.clone(),
            g: self.g(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let wire = PublicKeyWire::deserialize(deserializer)?;
        if wire.g != wire.n.add(&BigInt::one()) {
            return Err(Error::custom("g does not equal n + 1"));
        }
        Ok(PublicKey::from_n(wire.n))
    }
}

impl PublicKey {
    /// The modulus `n = p * q`.
    pub fn n(&self) -> &BigInt {
        &self.n
    }

    /// `n^2`, cached at construction since every Paillier operation reduces
    /// modulo it.
    pub fn n_squared(&self) -> &BigInt {
        &self.n_squared
    }

    /// The generator `g = n + 1`, computed on demand rather than stored
    /// (`n` already determines it completely).
    pub fn g(&self) -> BigInt {
        self.n.add(&BigInt::one())
    }

    /// `bit_length(n)`, the key size in the sense the rest of this crate's
    /// API (and its own `bits` parameter) means it.
    pub fn bits(&self) -> u32 {
        self.n.bit_length()
    }

    fn from_n(n: BigInt) -> Self {
        let n_squared = n.square();
        PublicKey { n, n_squared }
    }
}

/// The Paillier private key `(lambda, mu)`. Does not retain `p`, `q`
/// individually; everything downstream (`decrypt`, `sign`) only needs
/// `lambda` and `mu`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrivateKey {
    lambda: BigInt,
    mu: BigInt,
}

impl PrivateKey {
    /// The Carmichael function `lambda(n) = lcm(p-1, q-1)`.
    pub fn lambda(&self) -> &BigInt {
        &self.lambda
    }

    /// `mu = L(g^lambda mod n^2)^-1 mod n`.
    pub fn mu(&self) -> &BigInt {
        &self.mu
    }
}

/// `L(u) = (u - 1) / n`, defined for `u` in `1 + n*Z_n`. Exact integer
/// division: callers only ever apply this where `u - 1` is guaranteed to be
/// a multiple of `n`.
pub(crate) fn l_function(u: &BigInt, n: &BigInt) -> BigInt {
    let numerator = u.sub(&BigInt::one());
    // GMP's `/` on non-negative integers truncates, which is exact division
    // here since `n` always divides `numerator` by construction.
    BigInt(numerator.as_rug().clone() / n.as_rug())
}

/// Generate a fresh Paillier keypair with a modulus of exactly `bits` bits.
///
/// Samples two distinct `bits/2`-bit primes `p != q` until their product has
/// exactly `bits` bits, then derives `n`, `g = n+1`, `lambda = lcm(p-1,
/// q-1)` and `mu = lambda^-1 mod n` via the closed form that follows from
/// `g = n+1`: since `g^lambda mod n^2 = 1 + n*lambda mod n^2`,
/// `L(g^lambda mod n^2)` reduces to `lambda mod n`, so `mu` is simply
/// `lambda`'s inverse mod `n`.
///
/// # Errors
///
/// Returns [`Error::KeyBits`] unless `bits >= 160` and `bits` is a multiple
/// of 8. Returns [`Error::Rng`] if the entropy source backing `rng` fails
/// mid-sample.
#[instrument(skip(rng), fields(bits))]
pub fn generate_keypair<R: RngCore + CryptoRng>(
    bits: u32,
    rng: &mut R,
) -> Result<(PublicKey, PrivateKey), Error> {
    if bits < MIN_KEY_BITS || bits % 8 != 0 {
        return Err(Error::KeyBits {
            bits,
            min: MIN_KEY_BITS,
        });
    }
    let half = bits / 2;

    let (p, q) = loop {
        let p = random_prime(half, rng)?;
        let q = random_prime(half, rng)?;
        if p == q {
            trace!("rejected prime pair: p == q");
            continue;
        }
        let n = p.mul(&q);
        if n.bit_length() != bits {
            trace!(
                got_bits = n.bit_length(),
                want_bits = bits,
                "rejected prime pair: product has the wrong bit length"
            );
            continue;
        }
        break (p, q);
    };

    let n = p.mul(&q);
    let p_minus_1 = p.sub(&BigInt::one());
    let q_minus_1 = q.sub(&BigInt::one());
    let lambda = p_minus_1.lcm(&q_minus_1);
    let mu = lambda
        .invert(&n)
        .expect("lambda is always invertible mod n for two distinct primes of equal bit length");

    info!(bits = n.bit_length(), "generated paillier keypair");

    Ok((PublicKey::from_n(n), PrivateKey { lambda, mu }))
}
