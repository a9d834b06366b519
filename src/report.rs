//! Text rendering of search outcomes for the binaries.

use crate::solver::{SearchResult, SearchStats, Solution};
use std::fmt::Write;

/// Renders the state progression of a solution.
///
/// Each state is printed as `Step k: <tubes>`; from the second state on it is
/// preceded by the move that produced it. With `color` every state is drawn
/// with `State::to_ansi_string` under its step header instead.
///
/// # Examples
/// ```
/// use tubesort_solver::codec::decode;
/// use tubesort_solver::report::render_solution;
/// use tubesort_solver::solver::solve_bfs;
///
/// let solution = solve_bfs(&decode("1122|0000").unwrap()).into_solution().unwrap();
/// let text = render_solution(&solution, false);
/// assert!(text.contains("  Move: from tube 1 to tube 2, count: 2\nStep 1: 1100 | 2200"));
/// ```
pub fn render_solution(solution: &Solution, color: bool) -> String {
    let mut out = String::from("State progression:\n");
    for (idx, state) in solution.path.iter().enumerate() {
        if let Some(mv) = idx.checked_sub(1).and_then(|k| solution.moves.get(k)) {
            let _ = writeln!(out, "  Move: {}", mv);
        }
        if color {
            let _ = writeln!(out, "Step {}:\n{}", idx, state.to_ansi_string());
        } else {
            let _ = writeln!(out, "Step {}: {}", idx, state);
        }
    }
    out
}

fn render_stats(stats: &SearchStats) -> String {
    format!(
        "expanded {} nodes, generated {} successors, frontier peak {}",
        stats.expanded, stats.generated, stats.frontier_high_water
    )
}

/// Renders a full result: a summary line, then the progression on success.
pub fn render_result(result: &SearchResult, color: bool) -> String {
    match result {
        SearchResult::Success(solution) => {
            let mut out = format!(
                "Solution found in {} moves ({})\n",
                solution.move_count,
                render_stats(&solution.stats)
            );
            out.push_str(&render_solution(solution, color));
            out
        }
        SearchResult::Failure { reason, stats } => {
            format!("No solution: {} ({})\n", reason, render_stats(stats))
        }
    }
}

/// Overall outcome of one or more runs on the same puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every run found a solution, all of this length.
    Solved(usize),
    /// Runs found solutions of different lengths.
    Disagreement,
    /// At least one run stopped without a solution, or nothing ran.
    Unsolved,
}

/// Combines the results of several strategies run on one puzzle.
///
/// Differing solution lengths take precedence over failures, since both
/// strategies are optimal and a mismatch means one of them is wrong.
pub fn verdict(results: &[SearchResult]) -> Verdict {
    let counts: Vec<usize> = results.iter().filter_map(SearchResult::move_count).collect();
    if counts.windows(2).any(|pair| pair[0] != pair[1]) {
        return Verdict::Disagreement;
    }
    match counts.first() {
        Some(&moves) if counts.len() == results.len() => Verdict::Solved(moves),
        _ => Verdict::Unsolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::engine::GoalRule;
    use crate::solver::{solve_astar, solve_bfs, solve_bfs_with, SearchConfig};

    #[test]
    fn test_render_solution_interleaves_moves() {
        let start = decode("2211|1122|0000").unwrap();
        let solution = solve_bfs(&start).into_solution().unwrap();
        let text = render_solution(&solution, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "State progression:");
        assert_eq!(lines[1], "Step 0: 2211 | 1122 | 0000");
        assert!(lines[2].starts_with("  Move: from tube "));
        assert!(lines[3].starts_with("Step 1: "));
        // header + one line per state + one line per move
        assert_eq!(lines.len(), 1 + solution.path.len() + solution.moves.len());
    }

    #[test]
    fn test_render_solution_zero_moves() {
        let solution = solve_bfs(&decode("1100|0000").unwrap()).into_solution().unwrap();
        assert_eq!(render_solution(&solution, false), "State progression:\nStep 0: 1100 | 0000\n");
    }

    #[test]
    fn test_render_solution_with_color() {
        let solution = solve_bfs(&decode("1122|0000").unwrap()).into_solution().unwrap();
        let text = render_solution(&solution, true);
        assert!(text.contains("Step 1:\n"));
        assert!(text.contains("\x1b["));
    }

    #[test]
    fn test_render_result_failure() {
        let config = SearchConfig {
            goal: GoalRule::Uniform,
            ..SearchConfig::default()
        };
        let result = solve_bfs_with(&decode("1122|0000").unwrap(), &config);
        let text = render_result(&result, false);
        assert!(text.starts_with("No solution: no solution found (expanded "));
        assert!(!text.contains("Step"));
    }

    #[test]
    fn test_render_result_success() {
        let result = solve_bfs(&decode("1122|0000").unwrap());
        let text = render_result(&result, false);
        assert!(text.starts_with("Solution found in 1 moves"));
        assert!(text.ends_with("Step 1: 1100 | 2200\n"));
    }

    #[test]
    fn test_verdict_solved_when_all_runs_agree() {
        let start = decode("2211|1122|0000").unwrap();
        let results = [solve_bfs(&start), solve_astar(&start)];
        assert_eq!(verdict(&results), Verdict::Solved(2));
        assert_eq!(verdict(&results[..1]), Verdict::Solved(2));
    }

    #[test]
    fn test_verdict_unsolved_on_any_failure() {
        let solved = solve_bfs(&decode("1122|0000").unwrap());
        let stuck = solve_bfs(&decode("12|21").unwrap());
        assert_eq!(verdict(&[stuck.clone()]), Verdict::Unsolved);
        assert_eq!(verdict(&[solved, stuck]), Verdict::Unsolved);
        assert_eq!(verdict(&[]), Verdict::Unsolved);
    }

    #[test]
    fn test_verdict_flags_mismatched_lengths() {
        // Stand-ins for two runs that disagree: a 1-move and a 2-move solution.
        let one = solve_bfs(&decode("1122|0000").unwrap());
        let two = solve_bfs(&decode("2211|1122|0000").unwrap());
        assert_eq!(two.move_count(), Some(2));
        assert_eq!(verdict(&[one.clone(), two.clone()]), Verdict::Disagreement);

        let stuck = solve_bfs(&decode("12|21").unwrap());
        assert_eq!(verdict(&[one, stuck, two]), Verdict::Disagreement);
    }
}
