//! Positional bit-field ballot encoding.
//!
//! A choice occupies `bits_per_choice` bits at offset
//! `bits_per_choice * (bin * num_choices + choice)` inside one large
//! integer; summing `k` single-choice encodings (in plaintext, or
//! homomorphically then decrypting) yields an integer whose bit-fields hold
//! the per-choice tallies, as long as no field overflows and the total
//! width fits the key's modulus (the application's responsibility, not this
//! module's — see the doc comment on [`total_bits`]).
//!
//! Only the small positional parameters (`choice`, `num_choices`,
//! `bits_per_choice`, `bin`, `num_bins`) are plain `u32`s; the encoded value
//! itself is a [`BigInt`], since a realistic ballot configuration's combined
//! width (`num_choices * num_bins * bits_per_choice`) routinely exceeds 64
//! bits.

use crate::bigint::BigInt;
use crate::error::Error;

/// Minimum accepted number of choices.
pub const MIN_NUM_CHOICES: u32 = 2;
/// Minimum accepted bits per choice.
pub const MIN_BITS_PER_CHOICE: u32 = 2;

fn validate_dimensions(num_choices: u32, bits_per_choice: u32) -> Result<(), Error> {
    if num_choices < MIN_NUM_CHOICES {
        return Err(Error::BadCodecParameter {
            reason: format!("num_choices must be >= {MIN_NUM_CHOICES}, got {num_choices}"),
        });
    }
    if bits_per_choice < MIN_BITS_PER_CHOICE {
        return Err(Error::BadCodecParameter {
            reason: format!(
                "bits_per_choice must be >= {MIN_BITS_PER_CHOICE}, got {bits_per_choice}"
            ),
        });
    }
    Ok(())
}

fn validate_bin(bin: u32, num_bins: u32) -> Result<(), Error> {
    if num_bins > 0 && bin >= num_bins {
        return Err(Error::BadCodecParameter {
            reason: format!("bin {bin} is out of range for num_bins {num_bins}"),
        });
    }
    Ok(())
}

/// Bit offset of `choice`'s field within `bin` (`bin = 0` for an ungrouped
/// ballot), i.e. `bits_per_choice * (bin * num_choices + choice)`.
fn field_offset(choice: u32, num_choices: u32, bits_per_choice: u32, bin: u32) -> u32 {
    bits_per_choice * (bin * num_choices + choice)
}

/// Encode a single choice as `1 << field_offset(choice, ...)`.
///
/// # Errors
///
/// Returns [`Error::BadCodecParameter`] if `choice >= num_choices`,
/// `num_choices < 2`, `bits_per_choice < 2`, or (when grouped, `num_bins >
/// 0`) `bin >= num_bins`.
pub fn encode_single(
    choice: u32,
    num_choices: u32,
    bits_per_choice: u32,
    bin: u32,
    num_bins: u32,
) -> Result<BigInt, Error> {
    validate_dimensions(num_choices, bits_per_choice)?;
    validate_bin(bin, num_bins)?;
    if choice >= num_choices {
        return Err(Error::BadCodecParameter {
            reason: format!("choice {choice} is out of range for num_choices {num_choices}"),
        });
    }
    Ok(BigInt::one_shl(field_offset(
        choice,
        num_choices,
        bits_per_choice,
        bin,
    )))
}

/// Encode multiple choices by summing their [`encode_single`] encodings.
/// Repeated choices accumulate (no deduplication): encoding `[0, 0]` yields
/// a tally of 2 in field 0, not 1.
///
/// # Errors
///
/// Returns [`Error::BadCodecParameter`] under the same conditions as
/// [`encode_single`], for any of the given choices.
pub fn encode_multiple(
    choices: &[u32],
    num_choices: u32,
    bits_per_choice: u32,
    bin: u32,
    num_bins: u32,
) -> Result<BigInt, Error> {
    let mut sum = BigInt::zero();
    for &choice in choices {
        sum = sum.add(&encode_single(
            choice,
            num_choices,
            bits_per_choice,
            bin,
            num_bins,
        )?);
    }
    Ok(sum)
}

/// Extract the `bits_per_choice`-bit field at offset `i * bits_per_choice`
/// from `x`.
///
/// The mask is `2^(bits_per_choice - 1) - 1`, not `2^bits_per_choice - 1`:
/// the top bit of every field is reserved to signal overflow, so each field
/// carries `bits_per_choice - 1` usable tally bits despite the parameter's
/// name. A tally that would need the reserved bit is ambiguous; callers
/// must pick `bits_per_choice` large enough that no expected tally reaches
/// `2^(bits_per_choice - 1)`.
pub fn decode(x: &BigInt, num_choices: u32, bits_per_choice: u32) -> Result<Vec<u64>, Error> {
    validate_dimensions(num_choices, bits_per_choice)?;
    let mask = BigInt::one_shl(bits_per_choice - 1).sub(&BigInt::one());
    Ok((0..num_choices)
        .map(|i| {
            x.shr(i * bits_per_choice)
                .bitand(&mask)
                .to_u64_wrapping()
        })
        .collect())
}

/// Like [`decode`], but for a grouped encoding: field `i` of bin `bin` sits
/// at offset `(i + bin * num_choices) * bits_per_choice`. Returns one
/// `Vec<u64>` of length `num_choices` per bin.
pub fn decode_groups(
    x: &BigInt,
    num_choices: u32,
    bits_per_choice: u32,
    num_bins: u32,
) -> Result<Vec<Vec<u64>>, Error> {
    validate_dimensions(num_choices, bits_per_choice)?;
    let mask = BigInt::one_shl(bits_per_choice - 1).sub(&BigInt::one());
    Ok((0..num_bins.max(1))
        .map(|bin| {
            (0..num_choices)
                .map(|i| {
                    let offset = (i + bin * num_choices) * bits_per_choice;
                    x.shr(offset).bitand(&mask).to_u64_wrapping()
                })
                .collect()
        })
        .collect())
}

/// Total bit width a ballot configuration occupies:
/// `num_choices * max(num_bins, 1) * bits_per_choice`, or 0 if any dimension
/// is non-positive.
///
/// The codec's correctness (homomorphic addition of encoded ballots
/// decodes to per-choice tallies) requires this total to fit within
/// `bit_length(n)` of the Paillier key the ballots are encrypted under; the
/// caller, not this module, is responsible for choosing a key large enough.
pub fn total_bits(num_choices: u32, num_bins: u32, bits_per_choice: u32) -> u32 {
    if num_choices == 0 || bits_per_choice == 0 {
        return 0;
    }
    num_choices * num_bins.max(1) * bits_per_choice
}

/// Enumerate every single-choice encoding across all bins: all
/// `encode_single(choice, num_choices, bits_per_choice, bin, num_bins)` for
/// `choice` in `0..num_choices` and `bin` in `0..max(num_bins, 1)`. This is
/// the natural valid set to hand to [`crate::zkp::create_zkp`] when proving
/// a single ballot is well-formed.
///
/// # Errors
///
/// Returns [`Error::BadCodecParameter`] under the same conditions as
/// [`encode_single`].
pub fn get_single_choice_permutations(
    num_choices: u32,
    bits_per_choice: u32,
    num_bins: u32,
) -> Result<Vec<BigInt>, Error> {
    validate_dimensions(num_choices, bits_per_choice)?;
    let bins = num_bins.max(1);
    let mut out = Vec::with_capacity((num_choices * bins) as usize);
    for bin in 0..bins {
        for choice in 0..num_choices {
            out.push(encode_single(
                choice,
                num_choices,
                bits_per_choice,
                bin,
                num_bins,
            )?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_choice_encodings_match_spec_examples() {
        // encodeSingle(1,3,8) = 256; encodeSingle(2,3,8) = 65536 (S7)
        assert_eq!(
            encode_single(1, 3, 8, 0, 0).unwrap(),
            BigInt::from_u64(256)
        );
        assert_eq!(
            encode_single(2, 3, 8, 0, 0).unwrap(),
            BigInt::from_u64(65536)
        );
    }

    #[test]
    fn grouped_encoding_matches_spec_example() {
        // encodeSingle(1,2,8,bin=1,numBins=3) = 16777216 (S8)
        assert_eq!(
            encode_single(1, 2, 8, 1, 3).unwrap(),
            BigInt::from_u64(16777216)
        );
    }

    #[test]
    fn decode_of_single_encoding_is_a_one_hot_vector() {
        // decode(encodeSingle(choice, C, B))[choice] = 1; rest 0
        for choice in 0..3 {
            let x = encode_single(choice, 3, 8, 0, 0).unwrap();
            let decoded = decode(&x, 3, 8).unwrap();
            for (i, count) in decoded.iter().enumerate() {
                if i as u32 == choice {
                    assert_eq!(*count, 1);
                } else {
                    assert_eq!(*count, 0);
                }
            }
        }
    }

    #[test]
    fn tally_scenario_matches_spec_s6() {
        // S6: choices [0, 2, 0] -> tally [2, 0, 1]
        let sum = encode_multiple(&[0, 2, 0], 3, 8, 0, 0).unwrap();
        assert_eq!(decode(&sum, 3, 8).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn rejects_out_of_range_choice() {
        assert!(matches!(
            encode_single(3, 3, 8, 0, 0),
            Err(Error::BadCodecParameter { .. })
        ));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(matches!(
            encode_single(0, 1, 8, 0, 0),
            Err(Error::BadCodecParameter { .. })
        ));
        assert!(matches!(
            encode_single(0, 3, 1, 0, 0),
            Err(Error::BadCodecParameter { .. })
        ));
    }

    #[test]
    fn total_bits_accounts_for_grouping() {
        assert_eq!(total_bits(3, 0, 8), 24);
        assert_eq!(total_bits(3, 4, 8), 96);
        assert_eq!(total_bits(0, 4, 8), 0);
    }

    #[test]
    fn permutations_cover_every_choice_in_every_bin() {
        let perms = get_single_choice_permutations(3, 8, 2).unwrap();
        assert_eq!(perms.len(), 6);
        for (idx, p) in perms.iter().enumerate() {
            let bin = (idx / 3) as u32;
            let choice = (idx % 3) as u32;
            assert_eq!(*p, encode_single(choice, 3, 8, bin, 2).unwrap());
        }
    }
}
