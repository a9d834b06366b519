//! # Tube Sort Solver Library
//!
//! This library provides the puzzle model for the tube sorting game (pour
//! colored segments between tubes until each tube holds a single color) and
//! two optimal solvers: breadth-first search and A*.
//!
//! It is used by two binaries:
//! - `tube_solver`: Takes a puzzle file or inline key and prints the shortest
//!   sequence of pours that sorts it.
//! - `heuristic_evaluator`: Compares the A* heuristics on seeded random puzzles.
//!
//! ## Modules
//! - `engine`: Slots, tubes, states, the goal rules and the move generator.
//! - `codec`: Ordered and canonical string keys for states.
//! - `heuristics`: Admissible move-count estimates for A*.
//! - `frontier`: FIFO and priority worklists behind a common `Frontier` trait.
//! - `solver`: The search driver (`solve_bfs`, `solve_astar`, `solve`).
//! - `utils`: Loading puzzles from string slices and files.
//! - `report`: Rendering search results as text.
//! - `error`: Parse and load errors.
//!
//! ## Example
//! ```
//! use tubesort_solver::utils::state_from_str_array;
//! use tubesort_solver::solver::solve_astar;
//!
//! let start = state_from_str_array(&["1122", "0000"]).unwrap();
//! let solution = solve_astar(&start).into_solution().unwrap();
//! assert_eq!(solution.move_count, 1);
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod report;
pub mod solver;
pub mod utils;
