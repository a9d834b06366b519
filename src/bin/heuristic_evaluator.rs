use std::collections::HashMap;
use std::time::Instant;
use tubesort_solver::engine::{GoalRule, State};
use tubesort_solver::heuristics::Heuristic;
use tubesort_solver::solver::{solve_astar_with, solve_bfs_with, FailureReason, SearchConfig};

const NUM_RANDOM_PUZZLES_FOR_EVALUATION: usize = 20;
const START_SEED: u64 = 0;
const COLORS: u8 = 4;
const CAPACITY: usize = 4;
const EMPTY_TUBES: usize = 2;

#[derive(Default)]
struct Totals {
    solved: usize,
    expanded: usize,
    seconds: f64,
}

fn main() {
    env_logger::init();

    let heuristics = [
        Heuristic::Combined,
        Heuristic::Misplacement,
        Heuristic::Discontinuity,
        Heuristic::Zero,
    ];

    for goal in [GoalRule::Monochromatic, GoalRule::Uniform] {
        println!(
            "Starting heuristic evaluation for {} puzzles \
             ({} colors, capacity {}, {} empty tubes, goal {:?})...",
            NUM_RANDOM_PUZZLES_FOR_EVALUATION, COLORS, CAPACITY, EMPTY_TUBES, goal
        );

        let mut totals: HashMap<Heuristic, Totals> = HashMap::new();

        for puzzle_idx in 0..NUM_RANDOM_PUZZLES_FOR_EVALUATION {
            let seed = START_SEED + puzzle_idx as u64;
            let start = State::new_random_with_seed(COLORS, CAPACITY, EMPTY_TUBES, seed);
            println!("\nEvaluating Puzzle {} (Seed: {}): {}", puzzle_idx, seed, start);

            let base = SearchConfig {
                goal,
                ..SearchConfig::default()
            };
            let reference = solve_bfs_with(&start, &base);
            match reference.move_count() {
                Some(moves) => println!(
                    "  BFS: {} moves, {} expanded",
                    moves,
                    reference.stats().expanded
                ),
                None => println!(
                    "  BFS: {}",
                    reference
                        .failure_reason()
                        .unwrap_or(FailureReason::NoSolution)
                ),
            }

            for heuristic in heuristics {
                let config = SearchConfig {
                    heuristic,
                    ..base.clone()
                };
                let started = Instant::now();
                let result = solve_astar_with(&start, &config);
                let seconds = started.elapsed().as_secs_f64();

                let entry = totals.entry(heuristic).or_default();
                entry.expanded += result.stats().expanded;
                entry.seconds += seconds;
                if result.is_success() {
                    entry.solved += 1;
                }

                if reference.is_success() && result.move_count() != reference.move_count() {
                    eprintln!(
                        "Warning: heuristic {} found {:?} moves on seed {} where BFS found {:?}",
                        heuristic.name(),
                        result.move_count(),
                        seed,
                        reference.move_count()
                    );
                }
                println!(
                    "  Heuristic: {:<14} Moves: {:<6} Expanded: {}",
                    heuristic.name(),
                    result.move_count().map_or("-".to_string(), |m| m.to_string()),
                    result.stats().expanded
                );
            }
        }

        println!("\n--- Evaluation Complete ({:?}) ---", goal);
        println!("--- Average Expansions ---");

        let mut averages: Vec<(Heuristic, f64, &Totals)> = totals
            .iter()
            .map(|(h, t)| (*h, t.expanded as f64 / NUM_RANDOM_PUZZLES_FOR_EVALUATION as f64, t))
            .collect();
        averages.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (heuristic, avg, t) in averages {
            println!(
                "Heuristic {:<14}: Average Expanded = {:.1}, Solved = {}, Total Time = {:.2}s",
                heuristic.name(),
                avg,
                t.solved,
                t.seconds
            );
        }
        println!();
    }
}
