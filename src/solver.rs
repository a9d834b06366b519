use crate::codec::{encode_canonical, encode_ordered, CanonicalKey, OrderedKey};
use crate::engine::{GoalRule, Move, State};
use crate::frontier::{AStarNode, BfsNode, FifoFrontier, Frontier, PriorityFrontier};
use crate::heuristics::Heuristic;
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default number of node expansions before a search gives up.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Upper bound for the initial capacity of the per-run tables.
const RESERVE_LIMIT: usize = 1 << 16;

/// Search algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    /// Breadth-first search; optimal in number of moves.
    Bfs,
    /// A* with the configured heuristic.
    #[default]
    #[value(name = "astar")]
    AStar,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::AStar => "A*",
        }
    }
}

/// Knobs shared by both search strategies.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Maximum number of expanded nodes. Stale frontier entries do not count.
    pub max_iterations: usize,
    pub goal: GoalRule,
    /// Only used by A*.
    pub heuristic: Heuristic,
    /// Checked once per iteration; setting it stops the search with
    /// `FailureReason::Cancelled`.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            goal: GoalRule::default(),
            heuristic: Heuristic::default(),
            cancel: None,
        }
    }
}

impl SearchConfig {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded (the iteration count).
    pub expanded: usize,
    /// Successor states produced by the move generator.
    pub generated: usize,
    /// Largest frontier size seen.
    pub frontier_high_water: usize,
}

/// A solved puzzle.
#[derive(Clone, Debug)]
pub struct Solution {
    pub move_count: usize,
    /// States from the start to the goal, both included. Always
    /// `move_count + 1` long.
    pub path: Vec<State>,
    /// The move taking `path[k]` to `path[k + 1]`.
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

/// Why a search ended without a solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The reachable state space was exhausted.
    NoSolution,
    /// `max_iterations` expansions were spent with nodes still pending.
    IterationCapReached,
    Cancelled,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FailureReason::NoSolution => "no solution found",
            FailureReason::IterationCapReached => "iteration limit reached",
            FailureReason::Cancelled => "search cancelled",
        };
        f.write_str(text)
    }
}

/// Outcome of a search.
#[derive(Clone, Debug)]
pub enum SearchResult {
    Success(Solution),
    Failure {
        reason: FailureReason,
        stats: SearchStats,
    },
}

impl SearchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchResult::Success(_))
    }

    pub fn move_count(&self) -> Option<usize> {
        self.solution().map(|s| s.move_count)
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchResult::Success(solution) => Some(solution),
            SearchResult::Failure { .. } => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SearchResult::Success(solution) => Some(solution),
            SearchResult::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            SearchResult::Success(_) => None,
            SearchResult::Failure { reason, .. } => Some(*reason),
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchResult::Success(solution) => &solution.stats,
            SearchResult::Failure { stats, .. } => stats,
        }
    }
}

/// Parent links for one search run, keyed by ordered key so the path
/// follows the exact tube order of the moves that were made.
struct SearchContext {
    parent: FxHashMap<OrderedKey, Option<OrderedKey>>,
    move_of: FxHashMap<OrderedKey, Move>,
}

impl SearchContext {
    fn with_capacity(capacity: usize) -> Self {
        SearchContext {
            parent: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            move_of: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    fn record_start(&mut self, key: OrderedKey) {
        self.parent.insert(key, None);
    }

    fn record(&mut self, child: OrderedKey, parent: OrderedKey, mv: Move) {
        self.move_of.insert(child.clone(), mv);
        self.parent.insert(child, Some(parent));
    }

    /// Walks parent links back from `goal` and replays the moves forward
    /// from `start`.
    fn reconstruct(&self, start: &State, goal: &OrderedKey) -> (Vec<State>, Vec<Move>) {
        let mut moves = Vec::new();
        let mut cursor = goal;
        while let Some(Some(parent)) = self.parent.get(cursor) {
            if let Some(mv) = self.move_of.get(cursor) {
                moves.push(*mv);
            }
            cursor = parent;
        }
        moves.reverse();

        let mut path = Vec::with_capacity(moves.len() + 1);
        path.push(start.clone());
        for mv in &moves {
            let next = path[path.len() - 1].pour(*mv);
            path.push(next);
        }
        debug_assert_eq!(path.last().map(encode_ordered).as_ref(), Some(goal));
        (path, moves)
    }

    fn into_solution(self, start: &State, goal: &OrderedKey, stats: SearchStats) -> SearchResult {
        let (path, moves) = self.reconstruct(start, goal);
        SearchResult::Success(Solution {
            move_count: moves.len(),
            path,
            moves,
            stats,
        })
    }
}

fn failure(reason: FailureReason, stats: SearchStats) -> SearchResult {
    SearchResult::Failure { reason, stats }
}

/// Runs `strategy` from `start`.
///
/// # Arguments
/// * `start`: The initial configuration.
/// * `strategy`: BFS or A*.
/// * `config`: Goal rule, heuristic, iteration cap and cancellation flag.
///
/// # Returns
/// A `SearchResult` with the move sequence on success, or the reason the
/// search stopped. Both carry the search counters.
///
/// # Examples
/// ```
/// use tubesort_solver::codec::decode;
/// use tubesort_solver::solver::{solve, SearchConfig, Strategy};
///
/// let start = decode("1122|0000").unwrap();
/// let result = solve(&start, Strategy::AStar, &SearchConfig::default());
/// assert_eq!(result.move_count(), Some(1));
/// ```
pub fn solve(start: &State, strategy: Strategy, config: &SearchConfig) -> SearchResult {
    match strategy {
        Strategy::Bfs => solve_bfs_with(start, config),
        Strategy::AStar => solve_astar_with(start, config),
    }
}

/// Breadth-first search with the default configuration.
pub fn solve_bfs(start: &State) -> SearchResult {
    solve_bfs_with(start, &SearchConfig::default())
}

/// A* with the default configuration.
pub fn solve_astar(start: &State) -> SearchResult {
    solve_astar_with(start, &SearchConfig::default())
}

/// Breadth-first search.
///
/// States are deduplicated by canonical key when they are generated, so
/// every canonical state enters the queue at most once, and the first goal
/// dequeued is at minimum depth.
pub fn solve_bfs_with(start: &State, config: &SearchConfig) -> SearchResult {
    let reserve = config.max_iterations.min(RESERVE_LIMIT);
    let mut context = SearchContext::with_capacity(reserve);
    let mut seen: FxHashSet<CanonicalKey> =
        FxHashSet::with_capacity_and_hasher(reserve, Default::default());
    let mut frontier = FifoFrontier::new();
    let mut stats = SearchStats::default();

    let start_key = encode_ordered(start);
    debug!("BFS starting from {} (goal: {:?})", start_key, config.goal);
    seen.insert(encode_canonical(start));
    context.record_start(start_key.clone());
    frontier.push(BfsNode {
        state: start.clone(),
        key: start_key,
        moves: 0,
    });

    while !frontier.is_empty() {
        if config.is_cancelled() {
            info!("BFS cancelled after {} iterations", stats.expanded);
            stats.frontier_high_water = frontier.high_water();
            return failure(FailureReason::Cancelled, stats);
        }
        if stats.expanded >= config.max_iterations {
            warn!("BFS reached maximum iterations limit ({})", config.max_iterations);
            stats.frontier_high_water = frontier.high_water();
            return failure(FailureReason::IterationCapReached, stats);
        }
        let Some(node) = frontier.pop() else { break };
        stats.expanded += 1;
        trace!("BFS expanding {} at depth {}", node.key, node.moves);

        if node.state.is_goal(config.goal) {
            info!("BFS found a {}-move solution after {} iterations", node.moves, stats.expanded);
            stats.frontier_high_water = frontier.high_water();
            return context.into_solution(start, &node.key, stats);
        }

        for successor in node.state.legal_moves() {
            stats.generated += 1;
            if !seen.insert(encode_canonical(&successor.state)) {
                continue;
            }
            let key = encode_ordered(&successor.state);
            context.record(key.clone(), node.key.clone(), successor.mv);
            frontier.push(BfsNode {
                state: successor.state,
                key,
                moves: node.moves + 1,
            });
        }
    }

    info!("BFS exhausted the state space after {} iterations", stats.expanded);
    stats.frontier_high_water = frontier.high_water();
    failure(FailureReason::NoSolution, stats)
}

/// A* search ordered by `g + h`, ties broken by insertion order.
///
/// `best_g` and the closed set are keyed by canonical key. A successor is
/// pushed only when it improves the best known cost of its canonical state;
/// older entries for that state are skipped when popped. With a consistent
/// heuristic a closed state is never improved on, so closed states are never
/// reopened.
pub fn solve_astar_with(start: &State, config: &SearchConfig) -> SearchResult {
    let reserve = config.max_iterations.min(RESERVE_LIMIT);
    let mut context = SearchContext::with_capacity(reserve);
    let mut best_g: FxHashMap<CanonicalKey, u32> =
        FxHashMap::with_capacity_and_hasher(reserve, Default::default());
    let mut closed: FxHashSet<CanonicalKey> =
        FxHashSet::with_capacity_and_hasher(reserve, Default::default());
    let mut frontier = PriorityFrontier::new();
    let mut stats = SearchStats::default();
    let heuristic = config.heuristic;

    let start_key = encode_ordered(start);
    let start_canonical = encode_canonical(start);
    let start_h = heuristic.estimate(start, config.goal);
    debug!(
        "A* starting from {} (goal: {:?}, heuristic: {}, h = {})",
        start_key,
        config.goal,
        heuristic.name(),
        start_h
    );
    best_g.insert(start_canonical.clone(), 0);
    context.record_start(start_key.clone());
    frontier.push(AStarNode {
        state: start.clone(),
        key: start_key,
        canonical: start_canonical,
        g: 0,
        h: start_h,
    });

    while let Some(node) = frontier.pop() {
        let stale = closed.contains(&node.canonical)
            || best_g.get(&node.canonical).is_some_and(|&best| node.g > best);
        if stale {
            continue;
        }
        if config.is_cancelled() {
            info!("A* cancelled after {} iterations", stats.expanded);
            stats.frontier_high_water = frontier.high_water();
            return failure(FailureReason::Cancelled, stats);
        }
        if stats.expanded >= config.max_iterations {
            warn!("A* reached maximum iterations limit ({})", config.max_iterations);
            stats.frontier_high_water = frontier.high_water();
            return failure(FailureReason::IterationCapReached, stats);
        }
        stats.expanded += 1;
        trace!("A* expanding {} with g = {}, h = {}", node.key, node.g, node.h);

        if node.state.is_goal(config.goal) {
            info!("A* found a {}-move solution after {} iterations", node.g, stats.expanded);
            stats.frontier_high_water = frontier.high_water();
            return context.into_solution(start, &node.key, stats);
        }
        closed.insert(node.canonical.clone());

        let tentative_g = node.g + 1;
        for successor in node.state.legal_moves() {
            stats.generated += 1;
            let canonical = encode_canonical(&successor.state);
            if closed.contains(&canonical) {
                continue;
            }
            if best_g.get(&canonical).is_some_and(|&best| best <= tentative_g) {
                continue;
            }
            best_g.insert(canonical.clone(), tentative_g);

            let key = encode_ordered(&successor.state);
            let h = heuristic.estimate(&successor.state, config.goal);
            context.record(key.clone(), node.key.clone(), successor.mv);
            frontier.push(AStarNode {
                state: successor.state,
                key,
                canonical,
                g: tentative_g,
                h,
            });
        }
    }

    info!("A* exhausted the state space after {} iterations", stats.expanded);
    stats.frontier_high_water = frontier.high_water();
    failure(FailureReason::NoSolution, stats)
}
