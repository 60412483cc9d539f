//! End-to-end scenarios from the ballot core's acceptance tests: a full
//! organizer/aggregator/voter workflow built only out of the public API,
//! exercised the way an external crate consuming this one would.

use anyhow::Result;
use paillier_ballot_core::codec;
use paillier_ballot_core::key::generate_keypair;
use paillier_ballot_core::paillier::{add_encrypted, decrypt, encrypt};
use paillier_ballot_core::signature::{sign, verify};
use paillier_ballot_core::zkp::{encrypt_with_zkp, verify_zkp};
use paillier_ballot_core::bigint::BigInt;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

#[test]
fn small_key_roundtrip_scenario() -> Result<()> {
    // S1: 256-bit key; encrypt/decrypt a handful of representative plaintexts.
    let mut rng = ChaCha20Rng::seed_from_u64(10);
    let (pk, sk) = generate_keypair(256, &mut rng)?;
    for m in [0u64, 1, 8572057275] {
        let m = BigInt::from_u64(m);
        let (c, _) = encrypt(&m, &pk, &mut rng)?;
        assert_eq!(decrypt(&c, &pk, &sk)?, m);
    }
    Ok(())
}

#[test]
fn full_ballot_with_membership_proof_and_aggregation() -> Result<()> {
    // An organizer publishes a key and a valid set; a voter encrypts their
    // choice and attaches a membership proof; an aggregator sums ciphertexts
    // from several voters without ever seeing a plaintext choice; the
    // organizer decrypts the sum and recovers per-choice tallies (S3, S6).
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let (pk, sk) = generate_keypair(512, &mut rng)?;

    let num_choices = 3;
    let bits_per_choice = 8;
    let valid_set = codec::get_single_choice_permutations(num_choices, bits_per_choice, 0)?;

    let votes = [0u32, 2, 0];
    let mut tally_ciphertext = None;
    for &choice in &votes {
        let plaintext = codec::encode_single(choice, num_choices, bits_per_choice, 0, 0)?;
        let (c, commitment) = encrypt_with_zkp(&plaintext, &valid_set, &pk, &mut rng)?;
        assert!(verify_zkp(&c, &valid_set, &commitment, &pk)?);

        tally_ciphertext = Some(match tally_ciphertext {
            None => c,
            Some(acc) => add_encrypted(&acc, &c, &pk)?,
        });
    }

    let tally_plaintext = decrypt(&tally_ciphertext.unwrap(), &pk, &sk)?;
    let tally = codec::decode(&tally_plaintext, num_choices, bits_per_choice)?;
    assert_eq!(tally, vec![2, 0, 1]);
    Ok(())
}

#[test]
fn zkp_rejects_ciphertext_swap_and_non_member_plaintext() -> Result<()> {
    // S4, S5.
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let (pk, _sk) = generate_keypair(256, &mut rng)?;
    let valid_set: Vec<BigInt> = [1u64, 2, 3].into_iter().map(BigInt::from_u64).collect();

    let (_c, commitment) = encrypt_with_zkp(&BigInt::from_u64(2), &valid_set, &pk, &mut rng)?;
    let (swapped_c, _) = encrypt(&BigInt::from_u64(4), &pk, &mut rng)?;
    assert!(!verify_zkp(&swapped_c, &valid_set, &commitment, &pk)?);

    assert!(encrypt_with_zkp(&BigInt::from_u64(4), &valid_set, &pk, &mut rng).is_err());
    Ok(())
}

#[test]
fn signature_roundtrip_and_tamper_detection() -> Result<()> {
    // S9.
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let (pk, sk) = generate_keypair(256, &mut rng)?;
    let m = BigInt::from_u64(8572057275);
    let sig = sign(&m, &pk, &sk);
    assert!(verify(&m, &sig, &pk));
    assert!(!verify(&m.add(&BigInt::one()), &sig, &pk));
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn public_key_and_commitment_roundtrip_through_json() -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(14);
    let (pk, _sk) = generate_keypair(256, &mut rng)?;
    let valid_set: Vec<BigInt> = [1u64, 2, 3].into_iter().map(BigInt::from_u64).collect();
    let (c, commitment) = encrypt_with_zkp(&BigInt::from_u64(2), &valid_set, &pk, &mut rng)?;

    let pk_json = serde_json::to_string(&pk)?;
    let pk_value: serde_json::Value = serde_json::from_str(&pk_json)?;
    let pk_obj = pk_value.as_object().expect("public key serializes as an object");
    assert_eq!(pk_obj.len(), 2, "wire shape should be exactly {{n, g}}");
    assert!(pk_obj.contains_key("n"));
    assert!(pk_obj.contains_key("g"));
    assert!(!pk_obj.contains_key("n_squared"));
    let pk_back: paillier_ballot_core::key::PublicKey = serde_json::from_str(&pk_json)?;
    assert_eq!(pk, pk_back);

    let commitment_json = serde_json::to_string(&commitment)?;
    let commitment_back: paillier_ballot_core::zkp::ZkpCommitment =
        serde_json::from_str(&commitment_json)?;
    assert!(verify_zkp(&c, &valid_set, &commitment_back, &pk)?);
    Ok(())
}
