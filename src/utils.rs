use crate::codec::parse_tube;
use crate::engine::State;
use crate::error::{LoadError, ParseError};
use std::fs;
use std::path::Path;

/// Parses an array of string slices into a `State`, one tube per slice.
///
/// Each string lists a tube's slots from the bottom up. Valid characters are:
/// - `'0'`: an empty slot
/// - `'1'`-`'9'`: colors 1 to 9
/// - `'a'`-`'z'` (or upper case): colors 10 to 35
///
/// Surrounding whitespace is trimmed from each line.
///
/// # Arguments
/// * `lines`: The tubes, in tube order.
///
/// # Returns
/// * `Ok(State)` if every tube parses and all tubes share a nonzero capacity.
/// * `Err(ParseError)` on an empty list, an unknown character, unequal tube
///   lengths, or a color above an empty slot.
///
/// # Examples
/// ```
/// use tubesort_solver::engine::Slot;
/// use tubesort_solver::utils::state_from_str_array;
///
/// let state = state_from_str_array(&["1120", "2210", "0000"]).unwrap();
/// assert_eq!(state.tube_count(), 3);
/// assert_eq!(state.capacity(), 4);
/// assert_eq!(state.tubes()[0].slots()[2], Slot::Color(2));
///
/// assert!(state_from_str_array(&["11?0", "0000"]).is_err());
/// assert!(state_from_str_array(&[]).is_err());
/// ```
pub fn state_from_str_array(lines: &[&str]) -> Result<State, ParseError> {
    let tubes = lines
        .iter()
        .enumerate()
        .map(|(tube, line)| parse_tube(tube, line.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    State::from_tubes(tubes)
}

/// Reads a puzzle file: one tube per line, blank lines ignored.
///
/// With `sort_tubes` the lines are sorted before parsing, so two files that
/// list the same tubes in a different order load as the same state.
pub fn load_state_file(path: &Path, sort_tubes: bool) -> Result<State, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if sort_tubes {
        lines.sort_unstable();
    }

    Ok(state_from_str_array(&lines)?)
}
