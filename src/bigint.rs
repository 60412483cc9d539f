//! Arbitrary-precision integer facade.
//!
//! Every other module in this crate talks in terms of [`BigInt`] rather than
//! the underlying [`rug::Integer`] directly, so the bignum backend stays an
//! implementation detail that could in principle be swapped out. [`BigInt`]
//! is always non-negative; the core never produces or consumes signed
//! values (plaintexts and ciphertexts both live in `Z_n`/`Z_{n^2}`).

use std::cmp::Ordering;
use std::fmt;

use base64::Engine;
use rug::integer::Order;
use rug::{Complete, Integer};

use crate::error::Error;

/// A non-negative arbitrary-precision integer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigInt(pub(crate) Integer);

impl BigInt {
    /// The integer 0.
    pub fn zero() -> Self {
        BigInt(Integer::new())
    }

    /// The integer 1.
    pub fn one() -> Self {
        BigInt(Integer::from(1))
    }

    /// Build a [`BigInt`] from a `u64`.
    pub fn from_u64(v: u64) -> Self {
        BigInt(Integer::from(v))
    }

    /// Build a [`BigInt`] from a `u32`.
    pub fn from_u32(v: u32) -> Self {
        BigInt(Integer::from(v))
    }

    /// `1 << shift`.
    pub fn one_shl(shift: u32) -> Self {
        BigInt(Integer::from(1) << shift)
    }

    /// Access the underlying [`rug::Integer`]. Escape hatch for code that
    /// genuinely needs GMP-level operations this facade doesn't expose.
    pub fn as_rug(&self) -> &Integer {
        &self.0
    }

    /// Number of bits needed to represent this integer, i.e. `floor(log2(self)) + 1`.
    /// Returns 0 for the integer 0, matching `rug::Integer::significant_bits`.
    pub fn bit_length(&self) -> u32 {
        self.0.significant_bits()
    }

    /// `self == 0`.
    pub fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    /// `self < other`.
    pub fn lt(&self, other: &BigInt) -> bool {
        self.0 < other.0
    }

    /// `self >= other`.
    pub fn ge(&self, other: &BigInt) -> bool {
        self.0 >= other.0
    }

    /// `self + other`.
    pub fn add(&self, other: &BigInt) -> BigInt {
        BigInt((&self.0 + &other.0).complete())
    }

    /// `self - other`. Panics if the result would be negative; callers in
    /// this crate only ever subtract smaller-or-equal values.
    pub fn sub(&self, other: &BigInt) -> BigInt {
        let r = (&self.0 - &other.0).complete();
        debug_assert!(r.cmp0() != Ordering::Less, "BigInt::sub underflow");
        BigInt(r)
    }

    /// `self * other`.
    pub fn mul(&self, other: &BigInt) -> BigInt {
        BigInt((&self.0 * &other.0).complete())
    }

    /// `self * self`.
    pub fn square(&self) -> BigInt {
        self.mul(self)
    }

    /// `self mod modulus`, always returning a value in `[0, modulus)`.
    ///
    /// `self` is always non-negative in this facade, so truncated and
    /// Euclidean remainder coincide here; this just uses `%`.
    pub fn modulo(&self, modulus: &BigInt) -> BigInt {
        BigInt((&self.0 % &modulus.0).complete())
    }

    /// `(self * other) mod modulus`.
    pub fn mul_mod(&self, other: &BigInt, modulus: &BigInt) -> BigInt {
        self.mul(other).modulo(modulus)
    }

    /// `(self + other) mod modulus`.
    pub fn add_mod(&self, other: &BigInt, modulus: &BigInt) -> BigInt {
        self.add(other).modulo(modulus)
    }

    /// `self^exponent mod modulus`. Returns `None` if `modulus` is zero, or
    /// if the exponent is negative and `self` has no inverse mod `modulus`
    /// (this facade never constructs negative exponents, so that branch is
    /// unreachable in practice).
    pub fn pow_mod(&self, exponent: &BigInt, modulus: &BigInt) -> Option<BigInt> {
        self.0
            .clone()
            .pow_mod(&exponent.0, &modulus.0)
            .ok()
            .map(BigInt)
    }

    /// Multiplicative inverse of `self` modulo `modulus`, or `None` if
    /// `gcd(self, modulus) != 1`.
    pub fn invert(&self, modulus: &BigInt) -> Option<BigInt> {
        self.0.clone().invert(&modulus.0).ok().map(BigInt)
    }

    /// `gcd(self, other)`.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        BigInt(self.0.clone().gcd(&other.0))
    }

    /// `lcm(self, other)`.
    pub fn lcm(&self, other: &BigInt) -> BigInt {
        BigInt(self.0.clone().lcm(&other.0))
    }

    /// `self >> shift`.
    pub fn shr(&self, shift: u32) -> BigInt {
        BigInt(self.0.clone() >> shift)
    }

    /// `self << shift`.
    pub fn shl(&self, shift: u32) -> BigInt {
        BigInt(self.0.clone() << shift)
    }

    /// Bitwise AND. Used by the vote codec to mask out a single bit-field.
    pub fn bitand(&self, other: &BigInt) -> BigInt {
        BigInt((&self.0 & &other.0).complete())
    }

    /// Probabilistic primality test (Miller-Rabin via GMP, 25 rounds,
    /// matching `rug::Integer::is_probably_prime`'s own default confidence
    /// recommendation for cryptographic use).
    pub fn is_probably_prime(&self) -> bool {
        !matches!(self.0.is_probably_prime(25), rug::integer::IsPrime::No)
    }

    /// Truncate to a `u64`, wrapping. Only meaningful when the caller has
    /// already bounded the value (e.g. a masked vote-codec field).
    pub fn to_u64_wrapping(&self) -> u64 {
        // `to_u64_wrapping` keeps the low 64 bits regardless of magnitude;
        // every call site already guarantees the value fits.
        self.0.to_u64_wrapping()
    }

    /// Canonical big-endian byte representation (no leading zero byte, `0`
    /// encodes as an empty slice), matching [`Self::from_be_bytes`].
    pub fn to_be_bytes(&self) -> Vec<u8> {
        if self.is_zero() {
            Vec::new()
        } else {
            self.0.to_digits::<u8>(Order::Msf)
        }
    }

    /// Parse a non-negative big-endian byte representation, the inverse of
    /// [`Self::to_be_bytes`].
    pub fn from_be_bytes(bytes: &[u8]) -> BigInt {
        if bytes.is_empty() {
            BigInt::zero()
        } else {
            BigInt(Integer::from_digits(bytes, Order::Msf))
        }
    }

    /// Standard (non-URL) base64 encoding of [`Self::to_be_bytes`], the
    /// wire format used by [`crate::key::PublicKey`],
    /// [`crate::key::PrivateKey`], ciphertexts, signatures and ZKP
    /// commitments.
    pub fn to_b64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.to_be_bytes())
    }

    /// Parse the base64 encoding produced by [`Self::to_b64`].
    pub fn from_b64(s: &str) -> Result<BigInt, Error> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(s)?;
        Ok(BigInt::from_be_bytes(&bytes))
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({})", self.0)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        BigInt::from_u64(v)
    }
}

impl From<u32> for BigInt {
    fn from(v: u32) -> Self {
        BigInt::from_u32(v)
    }
}

/// Parse a non-negative decimal string, e.g. for test vectors and
/// human-entered plaintexts too large for a `u64` literal.
impl std::str::FromStr for BigInt {
    type Err = rug::integer::ParseIntegerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Integer::parse(s).map(|parsed| BigInt(Integer::from(parsed)))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BigInt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_b64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BigInt {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigInt::from_b64(&s).map_err(serde::de::Error::custom)
    }
}
