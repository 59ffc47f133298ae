//! Stateless challenge derivation.
//!
//! A batch is a pure function of its nonce: each batch position strides
//! into the nonce, takes a short hex slice (treating the nonce as
//! circular), and reduces the parsed value modulo the kind table and a
//! per-kind variant table. Repeated calls on any machine return
//! byte-identical batches, which is what lets a fleet of verifier
//! replicas agree on the issued puzzle set from the nonce alone.
//!
//! No I/O, no mutable state; safe to call concurrently without locking.

use thiserror::Error;

use crate::constants::{SEED_HEX_SLICE, SEED_OFFSET_MULTIPLIER};
use crate::types::{ChallengeDescriptor, ChallengeKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("Nonce must be non-empty hex, got '{0}'")]
    MalformedNonce(String),

    #[error("Batch size must be at least 1")]
    EmptyBatch,
}

/// Derive an ordered challenge batch from a nonce.
///
/// Uppercase hex is accepted and normalized, so provers and verifiers
/// agree on the batch regardless of the casing their transport produced.
///
/// # Errors
///
/// Rejects empty or non-hex nonces and a zero batch size.
pub fn derive_batch(
    nonce: &str,
    batch_size: usize,
) -> Result<Vec<ChallengeDescriptor>, DeriveError> {
    if batch_size == 0 {
        return Err(DeriveError::EmptyBatch);
    }
    if nonce.is_empty() || !nonce.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DeriveError::MalformedNonce(nonce.to_string()));
    }

    let nonce = nonce.to_ascii_lowercase();
    let mut challenges = Vec::with_capacity(batch_size);

    for index in 0..batch_size {
        let offset = (index * SEED_OFFSET_MULTIPLIER) % nonce.len();
        let seed = circular_slice(&nonce, offset, SEED_HEX_SLICE);
        let value = u32::from_str_radix(&seed, 16).expect("seed slice is hex by construction");

        let kind = ChallengeKind::ALL[value as usize % ChallengeKind::ALL.len()];
        let prompt = render_prompt(kind, value, &seed);

        challenges.push(ChallengeDescriptor {
            index,
            kind,
            prompt,
            variant_seed: seed,
        });
    }

    Ok(challenges)
}

/// Take `len` characters starting at `offset`, wrapping past the end.
fn circular_slice(s: &str, offset: usize, len: usize) -> String {
    // Hex is ASCII, so byte-wise cycling is character-safe
    s.bytes()
        .cycle()
        .skip(offset)
        .take(len)
        .map(char::from)
        .collect()
}

/// Render the prompt for one challenge slot.
///
/// Each kind owns a small variant table; the seed value picks the variant
/// and parameterizes its operands, and the seed slice itself is woven in
/// as an anti-caching salt. Variant table sizes are a local decision and
/// only need to match between prover and verifier builds of this crate.
fn render_prompt(kind: ChallengeKind, value: u32, salt: &str) -> String {
    let v = value as u64;
    let a = 12 + v % 88;
    let b = 7 + v % 23;
    let c = 3 + v % 47;

    match kind {
        ChallengeKind::Math => match v % 4 {
            0 => format!("Compute {a} * {b} + {c}. Reply with the number only."),
            1 => format!("Compute ({a} + {b}) * {c}. Reply with the number only."),
            2 => format!("Compute {a} * {a} - {b}. Reply with the number only."),
            _ => format!(
                "Compute the remainder of {a} * {c} divided by {b}. Reply with the number only."
            ),
        },
        ChallengeKind::Logic => match v % 3 {
            0 => format!(
                "All zorfs are quints. The item tagged {salt} is a zorf. \
                 Is {salt} a quint? Answer yes or no."
            ),
            1 => format!(
                "Token {salt} is either red or blue. It is not red. \
                 Reply with its color only."
            ),
            _ => format!(
                "No quint is hollow. The item tagged {salt} is a quint. \
                 Is {salt} hollow? Answer yes or no."
            ),
        },
        ChallengeKind::Extraction => match v % 3 {
            0 => format!(
                "Extract the four-character code from this log line and reply \
                 with it only: 'relay={salt} gate={a} status=ok'"
            ),
            1 => format!(
                "The sentence below hides a hex token. Return it verbatim: \
                 'After {a} retries the beacon {salt} went quiet.'"
            ),
            _ => format!(
                "Return the value of the \"seed\" field only: \
                 {{\"attempt\":{a},\"seed\":\"{salt}\"}}"
            ),
        },
        ChallengeKind::Counting => match v % 3 {
            0 => format!(
                "How many characters are in the string '{salt}{salt}'? \
                 Reply with the number only."
            ),
            1 => format!("Count the decimal digits in '{salt}'. Reply with the number only."),
            _ => format!(
                "How many words are in this sentence: 'relay {salt} answered \
                 after {a} long cycles'? Reply with the number only."
            ),
        },
        ChallengeKind::Transformation => match v % 4 {
            0 => format!("Reverse the string '{salt}'. Reply with the result only."),
            1 => format!("Uppercase the string '{salt}'. Reply with the result only."),
            2 => format!(
                "Replace every decimal digit in '{salt}' with '#'. \
                 Reply with the result only."
            ),
            _ => format!(
                "Insert a dash between each pair of adjacent characters of \
                 '{salt}'. Reply with the result only."
            ),
        },
        ChallengeKind::MultiStep => match v % 3 {
            0 => format!(
                "Start with {a}. Double it, then add {b}. Give the result in \
                 lowercase hexadecimal with no prefix."
            ),
            1 => format!(
                "Reverse '{salt}', uppercase the result, then drop its first \
                 character. Reply with the final string only."
            ),
            _ => format!(
                "Compute {a} + {b}, multiply the sum by 2, then subtract {c}. \
                 Reply with the number only."
            ),
        },
        ChallengeKind::Pattern => {
            let step = 2 + v % 9;
            match v % 3 {
                0 => format!(
                    "What number comes next: {}, {}, {}, {}? Reply with the number only.",
                    a,
                    a + step,
                    a + 2 * step,
                    a + 3 * step
                ),
                1 => format!(
                    "What number comes next: {}, {}, {}, {}? Reply with the number only.",
                    b,
                    b * 2,
                    b * 4,
                    b * 8
                ),
                _ => format!(
                    "What number comes next: {}, {}, {}, {}? Reply with the number only.",
                    c,
                    c + 1,
                    c + 3,
                    c + 6
                ),
            }
        }
        ChallengeKind::Analysis => match v % 3 {
            0 => format!("Is the hexadecimal value {salt} even or odd? Reply 'even' or 'odd'."),
            1 => format!(
                "Which product is larger, {a} * {b} or {b} * {c}? \
                 Reply with the larger product as a number."
            ),
            _ => format!(
                "Does the string '{salt}' contain the letter 'e'? Answer yes or no."
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BATCH_SIZE;
    use pretty_assertions::assert_eq;

    const NONCE: &str = "9f86d081884c7d659a2feaa0c55ad015";

    #[test]
    fn test_batch_shape() {
        let batch = derive_batch(NONCE, BATCH_SIZE).unwrap();

        assert_eq!(batch.len(), BATCH_SIZE);
        for (i, challenge) in batch.iter().enumerate() {
            assert_eq!(challenge.index, i);
            assert_eq!(challenge.variant_seed.len(), SEED_HEX_SLICE);
            assert!(!challenge.prompt.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let first = derive_batch(NONCE, BATCH_SIZE).unwrap();
        let second = derive_batch(NONCE, BATCH_SIZE).unwrap();
        assert_eq!(first, second);

        // Byte-identical across serialization too
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_case_insensitive() {
        let lower = derive_batch(NONCE, BATCH_SIZE).unwrap();
        let upper = derive_batch(&NONCE.to_ascii_uppercase(), BATCH_SIZE).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_nonce_sensitivity() {
        // One flipped hex character reshapes the derived batch
        let batch = derive_batch("00000000000000000000000000000000", BATCH_SIZE).unwrap();
        let flipped = derive_batch("10000000000000000000000000000000", BATCH_SIZE).unwrap();
        assert_ne!(batch, flipped);
    }

    #[test]
    fn test_all_zero_nonce() {
        // Every slice of an all-zero nonce parses to 0: kind table entry 0,
        // variant 0 of its table.
        let batch = derive_batch("00000000000000000000000000000000", BATCH_SIZE).unwrap();
        for challenge in &batch {
            assert_eq!(challenge.kind, ChallengeKind::Math);
            assert_eq!(challenge.variant_seed, "0000");
        }
        assert!(batch[0].prompt.starts_with("Compute 12 * 7 + 3."));
    }

    #[test]
    fn test_all_ones_nonce() {
        // 0xffff % 8 == 7 selects the last registered kind
        let batch = derive_batch("ffffffffffffffffffffffffffffffff", 1).unwrap();
        assert_eq!(batch[0].kind, ChallengeKind::Analysis);
        assert_eq!(batch[0].variant_seed, "ffff");
    }

    #[test]
    fn test_wraparound_slice() {
        // 30 hex chars: position 4 strides to offset 28, and the 4-char
        // slice wraps past the end back to the front of the nonce.
        let nonce = "abcdef0123456789abcdef01234567";
        let batch = derive_batch(nonce, 5).unwrap();
        assert_eq!(batch[4].variant_seed, "67ab");
    }

    #[test]
    fn test_single_challenge_batch() {
        let batch = derive_batch(NONCE, 1).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].index, 0);
    }

    #[test]
    fn test_malformed_nonce_rejected() {
        assert!(matches!(
            derive_batch("", BATCH_SIZE),
            Err(DeriveError::MalformedNonce(_))
        ));
        assert!(matches!(
            derive_batch("xyz123", BATCH_SIZE),
            Err(DeriveError::MalformedNonce(_))
        ));
        assert!(matches!(derive_batch(NONCE, 0), Err(DeriveError::EmptyBatch)));
    }

    #[test]
    fn test_circular_slice() {
        assert_eq!(circular_slice("abcdef", 0, 4), "abcd");
        assert_eq!(circular_slice("abcdef", 4, 4), "efab");
        assert_eq!(circular_slice("ab", 1, 4), "baba");
    }
}
