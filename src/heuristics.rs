use crate::engine::{GoalRule, State};
use fxhash::FxHashMap;

/// Lower bound on pours needed to consolidate every color into as few tubes
/// as it can occupy.
///
/// For each color `c`:
/// - `R` is the number of maximal runs of `c` across all tubes,
/// - `M` is the largest number of runs of `c` inside a single tube (the
///   consolidation target),
/// - `K` is the number of tubes `c` needs at minimum, `ceil(total / capacity)`.
///
/// Every run outside the target must be poured at least once, except for the
/// `K - 1` runs that may legitimately sit in other full tubes. A single pour
/// moves one run and merges at most one pair of runs, so the sum drops by at
/// most one per move: the estimate is admissible and consistent.
///
/// Runs are counted rather than segments because one pour moves a whole run;
/// counting segments overestimates when a run longer than one has to move.
///
/// Only meaningful under `GoalRule::Uniform`, where each color must end up
/// packed into full tubes.
///
/// # Examples
/// ```
/// use tubesort_solver::codec::decode;
/// use tubesort_solver::heuristics::misplacement;
///
/// // Color 1 is split over two tubes; color 2 is already in one run.
/// let state = decode("1122|1000|0000").unwrap();
/// assert_eq!(misplacement(&state), 1);
/// ```
pub fn misplacement(state: &State) -> u32 {
    #[derive(Default)]
    struct ColorRuns {
        total_segments: usize,
        total_runs: usize,
        max_runs_in_tube: usize,
    }

    let capacity = state.capacity().max(1);
    let mut per_color: FxHashMap<u8, ColorRuns> = FxHashMap::default();

    for tube in state.tubes() {
        let mut runs_here: FxHashMap<u8, usize> = FxHashMap::default();
        for (len, color) in tube.runs() {
            let entry = per_color.entry(color).or_default();
            entry.total_segments += len;
            entry.total_runs += 1;
            *runs_here.entry(color).or_default() += 1;
        }
        for (color, runs) in runs_here {
            let entry = per_color.entry(color).or_default();
            entry.max_runs_in_tube = entry.max_runs_in_tube.max(runs);
        }
    }

    per_color
        .values()
        .map(|c| {
            let tubes_needed = c.total_segments.div_ceil(capacity);
            let outside = c.total_runs - c.max_runs_in_tube;
            outside.saturating_sub(tubes_needed.saturating_sub(1)) as u32
        })
        .sum()
}

/// Counts adjacent color changes inside each tube, ignoring empty slots.
///
/// A sorted tube has none, and one pour removes at most one (the break under
/// the run it lifts) without creating any on the destination, so this never
/// overestimates under either goal rule.
///
/// # Examples
/// ```
/// use tubesort_solver::codec::decode;
/// use tubesort_solver::heuristics::discontinuity;
///
/// assert_eq!(discontinuity(&decode("1212|3300").unwrap()), 3);
/// ```
pub fn discontinuity(state: &State) -> u32 {
    state
        .tubes()
        .iter()
        .map(|tube| tube.runs().count().saturating_sub(1) as u32)
        .sum()
}

/// Heuristic selection for A*.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    /// `max(misplacement, discontinuity)` where both are admissible for the goal rule.
    #[default]
    Combined,
    /// Run consolidation bound alone.
    Misplacement,
    /// Tube break count alone.
    Discontinuity,
    /// Always zero; A* degenerates to uniform-cost search.
    Zero,
}

impl Heuristic {
    /// Estimates the remaining number of moves from `state` to a goal under `goal`.
    ///
    /// Under `GoalRule::Monochromatic` colors may stay split across tubes, so the
    /// misplacement term is not a lower bound there and contributes nothing.
    pub fn estimate(self, state: &State, goal: GoalRule) -> u32 {
        let consolidates = goal == GoalRule::Uniform;
        match self {
            Heuristic::Combined if consolidates => misplacement(state).max(discontinuity(state)),
            Heuristic::Combined | Heuristic::Discontinuity => discontinuity(state),
            Heuristic::Misplacement if consolidates => misplacement(state),
            Heuristic::Misplacement | Heuristic::Zero => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Combined => "combined",
            Heuristic::Misplacement => "misplacement",
            Heuristic::Discontinuity => "discontinuity",
            Heuristic::Zero => "zero",
        }
    }
}
