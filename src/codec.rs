//! String keys for states.
//!
//! Two encodings are used by the search:
//! - the *ordered* key keeps tube order and round-trips through `decode`;
//!   it names a concrete state in parent links and path reconstruction.
//! - the *canonical* key sorts the tubes first, so states that only differ
//!   by tube relabeling share one key; it is only used for duplicate detection.
use crate::engine::{Slot, State, Tube};
use crate::error::ParseError;
use itertools::Itertools;
use std::fmt;

/// Separator between tube fragments. Never a slot character.
pub const TUBE_SEPARATOR: &str = "|";

/// Key preserving tube identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderedKey(String);

/// Key invariant under tube permutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl OrderedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Joins the tubes' key fragments in tube order.
///
/// # Examples
/// ```
/// use tubesort_solver::codec::{decode, encode_ordered};
///
/// let state = decode("1122|0000").unwrap();
/// assert_eq!(encode_ordered(&state).as_str(), "1122|0000");
/// ```
pub fn encode_ordered(state: &State) -> OrderedKey {
    OrderedKey(state.tubes().iter().map(Tube::to_key_string).join(TUBE_SEPARATOR))
}

/// Joins the tubes' key fragments after sorting them bytewise.
///
/// The input is left untouched; only the fragments are sorted.
pub fn encode_canonical(state: &State) -> CanonicalKey {
    CanonicalKey(
        state
            .tubes()
            .iter()
            .map(Tube::to_key_string)
            .sorted_unstable()
            .join(TUBE_SEPARATOR),
    )
}

/// Parses an ordered key back into a state.
///
/// # Errors
/// Returns a `ParseError` if a fragment contains a character outside the slot
/// alphabet or the fragments do not form a valid state.
pub fn decode(key: &str) -> Result<State, ParseError> {
    let tubes = key
        .split(TUBE_SEPARATOR)
        .enumerate()
        .map(|(tube, fragment)| parse_tube(tube, fragment))
        .collect::<Result<Vec<_>, _>>()?;
    State::from_tubes(tubes)
}

/// Parses one tube fragment; `tube` is only used for error reporting.
pub(crate) fn parse_tube(tube: usize, fragment: &str) -> Result<Vec<Slot>, ParseError> {
    fragment
        .chars()
        .enumerate()
        .map(|(slot, ch)| Slot::from_char(ch).ok_or(ParseError::InvalidSlot { ch, tube, slot }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encode_identity() {
        for key in ["1122|0000", "1", "12a0|b000|0000", "3333|2222|1111|0000"] {
            let state = decode(key).unwrap();
            assert_eq!(encode_ordered(&state).as_str(), key);
            assert_eq!(decode(encode_ordered(&state).as_str()).unwrap(), state);
        }
    }

    #[test]
    fn test_identity_holds_for_reachable_states() {
        let start = State::new_random_with_seed(3, 3, 2, 11);
        let mut layer = vec![start];
        for _ in 0..3 {
            let next: Vec<State> = layer
                .iter()
                .flat_map(|s| s.legal_moves().into_iter().map(|succ| succ.state))
                .collect();
            for s in &next {
                assert_eq!(&decode(encode_ordered(s).as_str()).unwrap(), s);
            }
            layer = next;
        }
    }

    #[test]
    fn test_decode_normalizes_upper_case() {
        let state = decode("AB00|0000").unwrap();
        assert_eq!(encode_ordered(&state).as_str(), "ab00|0000");
    }

    #[test]
    fn test_canonical_is_permutation_invariant() {
        let base = ["2110", "0000", "3322", "1300"];
        let expected = encode_canonical(&decode(&base.join("|")).unwrap());
        assert_eq!(expected.as_str(), "0000|1300|2110|3322");

        // Every rotation and the reversal of the tube list.
        for shift in 0..base.len() {
            let mut tubes = base.to_vec();
            tubes.rotate_left(shift);
            let rotated = decode(&tubes.join("|")).unwrap();
            assert_eq!(encode_canonical(&rotated), expected);
            tubes.reverse();
            let reversed = decode(&tubes.join("|")).unwrap();
            assert_eq!(encode_canonical(&reversed), expected);
        }
    }

    #[test]
    fn test_canonical_does_not_mutate_state() {
        let state = decode("2200|1100").unwrap();
        let _ = encode_canonical(&state);
        assert_eq!(encode_ordered(&state).as_str(), "2200|1100");
    }

    #[test]
    fn test_ordered_keys_differ_for_permutations() {
        let a = decode("1100|2200").unwrap();
        let b = decode("2200|1100").unwrap();
        assert_ne!(encode_ordered(&a), encode_ordered(&b));
        assert_eq!(encode_canonical(&a), encode_canonical(&b));
    }

    #[test]
    fn test_decode_rejects_malformed_keys() {
        assert_eq!(
            decode("11#0|0000").unwrap_err(),
            ParseError::InvalidSlot {
                ch: '#',
                tube: 0,
                slot: 2,
            }
        );
        assert_eq!(
            decode("1100|000").unwrap_err(),
            ParseError::UnequalTubes {
                tube: 1,
                expected: 4,
                found: 3,
            }
        );
        assert_eq!(decode("").unwrap_err(), ParseError::ZeroCapacity);
        assert!(matches!(decode("1-00|0000"), Err(ParseError::InvalidSlot { ch: '-', .. })));
    }
}
