//! Privacy-preserving ballot aggregation core: a Paillier
//! additively-homomorphic cryptosystem, a Paillier-based signature scheme, a
//! non-interactive zero-knowledge proof of ciphertext set membership, and a
//! positional bit-field vote codec that makes homomorphic addition of
//! encoded ballots decode to per-candidate tallies.
//!
//! # Modules
//!
//! - [`bigint`] — the arbitrary-precision integer facade every other module
//!   speaks in.
//! - [`rand`] — uniform bigint sampling, coprime sampling, prime generation.
//! - [`hash`] — the 256-bit Fiat-Shamir hash used by [`zkp`].
//! - [`key`] — [`key::PublicKey`], [`key::PrivateKey`], [`key::generate_keypair`].
//! - [`paillier`] — encrypt, decrypt, and the three homomorphic operators.
//! - [`signature`] — Paillier-based sign/verify.
//! - [`zkp`] — the multi-clause OR proof of set membership.
//! - [`codec`] — the bit-field vote encoder/decoder.
//!
//! # Example
//!
//! ```
//! use paillier_ballot_core::codec;
//! use paillier_ballot_core::key::generate_keypair;
//! use paillier_ballot_core::paillier::{add_encrypted, decrypt, encrypt};
//! use rand_core::OsRng;
//!
//! let mut rng = OsRng;
//! let (pk, sk) = generate_keypair(512, &mut rng).unwrap();
//!
//! // Two ballots voting for choice 0 and choice 2 out of 3 candidates.
//! let ballot_a = codec::encode_single(0, 3, 8, 0, 0).unwrap();
//! let ballot_b = codec::encode_single(2, 3, 8, 0, 0).unwrap();
//!
//! let (ca, _) = encrypt(&ballot_a, &pk, &mut rng).unwrap();
//! let (cb, _) = encrypt(&ballot_b, &pk, &mut rng).unwrap();
//! let tally_ciphertext = add_encrypted(&ca, &cb, &pk).unwrap();
//!
//! let tally_plaintext = decrypt(&tally_ciphertext, &pk, &sk).unwrap();
//! assert_eq!(codec::decode(&tally_plaintext, 3, 8).unwrap(), vec![1, 0, 1]);
//! ```

pub mod bigint;
pub mod codec;
pub mod error;
pub mod hash;
pub mod key;
pub mod paillier;
pub mod rand;
pub mod signature;
pub mod zkp;

pub use error::Error;
