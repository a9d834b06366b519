use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tubesort_solver::codec::decode;
use tubesort_solver::engine::{GoalRule, State};
use tubesort_solver::heuristics::Heuristic;
use tubesort_solver::report::{render_result, verdict, Verdict};
use tubesort_solver::solver::{
    solve, SearchConfig, SearchResult, Strategy, DEFAULT_MAX_ITERATIONS,
};
use tubesort_solver::utils::load_state_file;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    Bfs,
    Astar,
    /// Run both and compare the move counts.
    Both,
}

impl StrategyChoice {
    fn strategies(self) -> &'static [Strategy] {
        match self {
            StrategyChoice::Bfs => &[Strategy::Bfs],
            StrategyChoice::Astar => &[Strategy::AStar],
            StrategyChoice::Both => &[Strategy::Bfs, Strategy::AStar],
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the puzzle file (one tube per line, bottom slot first)
    #[clap(required_unless_present = "state", conflicts_with = "state")]
    puzzle_file: Option<PathBuf>,

    /// Inline puzzle key, tubes separated by '|' (e.g. 1122|0000)
    #[clap(short, long)]
    state: Option<String>,

    /// Search algorithm
    #[clap(long, value_enum, default_value_t = StrategyChoice::Both)]
    strategy: StrategyChoice,

    /// Heuristic used by A*
    #[clap(long, value_enum, default_value_t = Heuristic::Combined)]
    heuristic: Heuristic,

    /// When the puzzle counts as sorted
    #[clap(long, value_enum, default_value_t = GoalRule::Monochromatic)]
    goal: GoalRule,

    /// Maximum number of expanded nodes per search
    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Sort the tubes of the puzzle file before solving
    #[clap(long, conflicts_with = "state")]
    sort_tubes: bool,

    /// Draw states with terminal colors
    #[clap(long)]
    color: bool,
}

fn load_puzzle(args: &Args) -> Result<State, String> {
    if let Some(key) = &args.state {
        return decode(key.trim()).map_err(|e| format!("Invalid puzzle key: {}", e));
    }
    match &args.puzzle_file {
        Some(path) => load_state_file(path, args.sort_tubes).map_err(|e| e.to_string()),
        None => Err("No puzzle given".to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let start = match load_puzzle(&args) {
        Ok(state) => state,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let rendered = if args.color {
        start.to_ansi_string()
    } else {
        start.to_string()
    };
    println!("Initial state:\n{}\n", rendered);

    let config = SearchConfig {
        max_iterations: args.max_iterations,
        goal: args.goal,
        heuristic: args.heuristic,
        cancel: None,
    };

    let mut results: Vec<SearchResult> = Vec::new();
    for &strategy in args.strategy.strategies() {
        println!("Searching with {}...", strategy.name());
        let started = Instant::now();
        let result = solve(&start, strategy, &config);
        let elapsed = started.elapsed();

        print!("{}", render_result(&result, args.color));
        println!("Time taken: {:.2} seconds\n", elapsed.as_secs_f64());
        results.push(result);
    }

    match verdict(&results) {
        Verdict::Solved(moves) => {
            if results.len() > 1 {
                println!("BFS and A* agree: {} moves.", moves);
            }
            ExitCode::SUCCESS
        }
        Verdict::Disagreement => {
            let counts: Vec<Option<usize>> = results.iter().map(SearchResult::move_count).collect();
            log::error!("strategies disagree on the move count: {:?}", counts);
            eprintln!("Error: strategies found solutions of different lengths: {:?}", counts);
            ExitCode::FAILURE
        }
        Verdict::Unsolved => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_sort_tubes_rejected_with_inline_state() {
        let err = Args::try_parse_from(["tube_solver", "--state", "1122|0000", "--sort-tubes"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let args = Args::try_parse_from(["tube_solver", "puzzle.txt", "--sort-tubes"]).unwrap();
        assert!(args.sort_tubes);
        assert_eq!(args.strategy, StrategyChoice::Both);
    }

    #[test]
    fn test_puzzle_source_is_required() {
        assert!(Args::try_parse_from(["tube_solver"]).is_err());
        let args = Args::try_parse_from(["tube_solver", "-s", "1122|0000"]).unwrap();
        assert_eq!(load_puzzle(&args).unwrap().tube_count(), 2);
    }
}
