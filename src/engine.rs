//! Core puzzle model for the tube sorting game.
//!
//! This module defines the game's fundamental components:
//! - `Slot`: one position inside a tube, either empty or holding a color.
//! - `Tube`: a fixed-capacity stack of slots filled from the bottom up.
//! - `State`: an ordered list of tubes, plus move generation and goal checks.
//! - `Move`: a pour of the top run of one tube onto another.
use crate::error::ParseError;
use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

/// Largest color id a slot can hold; one base-36 digit per slot.
pub const MAX_COLOR: u8 = 35;

/// The content of a single tube position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Free capacity.
    Empty,
    /// A colored segment; ids run from 1 to `MAX_COLOR`.
    Color(u8),
}

impl Slot {
    /// Parses a slot from its key character.
    ///
    /// `0` is empty, `1`-`9` are colors 1-9 and `a`-`z` (either case) are
    /// colors 10-35. Anything else yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tubesort_solver::engine::Slot;
    /// assert_eq!(Slot::from_char('0'), Some(Slot::Empty));
    /// assert_eq!(Slot::from_char('3'), Some(Slot::Color(3)));
    /// assert_eq!(Slot::from_char('B'), Some(Slot::Color(11)));
    /// assert_eq!(Slot::from_char('|'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Slot> {
        match ch.to_digit(36)? {
            0 => Some(Slot::Empty),
            n => Some(Slot::Color(n as u8)),
        }
    }

    /// Converts the slot to its key character (lower case for colors above 9).
    pub fn to_char(self) -> char {
        match self {
            Slot::Empty => '0',
            Slot::Color(c) => char::from_digit(u32::from(c), 36).unwrap_or('?'),
        }
    }

    /// Returns the color id, or `None` for an empty slot.
    pub fn color(self) -> Option<u8> {
        match self {
            Slot::Empty => None,
            Slot::Color(c) => Some(c),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Slot::Empty
    }

    /// Returns the ANSI background color code used for terminal output.
    fn to_ansi_color_code(self) -> &'static str {
        const PALETTE: [&str; 14] = [
            "41", "42", "43", "44", "45", "46", "47", "101", "102", "103", "104", "105", "106",
            "107",
        ];
        match self {
            Slot::Empty => "40",
            Slot::Color(c) => PALETTE[usize::from(c.saturating_sub(1)) % PALETTE.len()],
        }
    }
}

/// Derived view of a tube's top: the color and length of its top run and the
/// number of free slots above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TubeSummary {
    /// Color of the topmost filled slot, `Slot::Empty` for an empty tube.
    pub top_color: Slot,
    /// Length of the contiguous run of `top_color` at the top.
    pub run_length: usize,
    /// Number of empty slots above the filled region.
    pub free_count: usize,
}

/// A fixed-capacity tube. Slot 0 is the bottom; empty slots only appear
/// above every colored slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tube {
    slots: Vec<Slot>,
}

impl Tube {
    /// Creates a tube of `capacity` empty slots.
    pub fn empty(capacity: usize) -> Self {
        Tube {
            slots: vec![Slot::Empty; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slots bottom to top.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of colored slots.
    pub fn filled(&self) -> usize {
        self.slots.iter().take_while(|s| !s.is_empty()).count()
    }

    /// `true` when the tube holds no color at all.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_empty())
    }

    /// Computes the tube summary by scanning down from the top: skip empty
    /// slots, then count the run of the first color found.
    pub fn summary(&self) -> TubeSummary {
        let free_count = self.slots.iter().rev().take_while(|s| s.is_empty()).count();
        let filled = self.capacity() - free_count;
        if filled == 0 {
            return TubeSummary {
                top_color: Slot::Empty,
                run_length: 0,
                free_count,
            };
        }
        let top_color = self.slots[filled - 1];
        let run_length = self.slots[..filled]
            .iter()
            .rev()
            .take_while(|&&s| s == top_color)
            .count();
        TubeSummary {
            top_color,
            run_length,
            free_count,
        }
    }

    /// Maximal same-color runs from bottom to top, as `(length, color)`.
    pub fn runs(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.slots.iter().filter_map(|s| s.color()).dedup_with_count()
    }

    /// `true` when every colored slot holds the same color. Empty tubes qualify.
    pub fn is_monochromatic(&self) -> bool {
        self.runs().count() <= 1
    }

    /// `true` when the tube is completely empty or completely full of one color.
    pub fn is_uniform(&self) -> bool {
        self.slots.iter().all_equal()
    }

    /// The tube's key fragment: one character per slot, bottom first.
    pub fn to_key_string(&self) -> String {
        self.slots.iter().map(|s| s.to_char()).collect()
    }
}

/// A pour of `count` segments from the top of tube `from` onto tube `to`.
/// Tube indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub count: usize,
}

impl fmt::Display for Move {
    /// Uses 1-based tube numbers, matching how puzzles are presented to players.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from tube {} to tube {}, count: {}",
            self.from + 1,
            self.to + 1,
            self.count
        )
    }
}

/// A successor state paired with the move that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Successor {
    pub state: State,
    pub mv: Move,
}

/// When a state counts as sorted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum GoalRule {
    /// Every tube holds at most one color; partially filled tubes are fine.
    #[default]
    Monochromatic,
    /// Every tube is either completely empty or completely full of one color.
    Uniform,
}

/// A puzzle configuration: an ordered list of tubes sharing one capacity.
///
/// Tube order is meaningful (it identifies the tube a move refers to); use
/// `codec::encode_canonical` to compare states up to tube relabeling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    tubes: Vec<Tube>,
}

impl State {
    /// Builds a state from per-tube slot lists, validating shape and packing.
    ///
    /// # Errors
    /// Returns a `ParseError` when there are no tubes, the capacity is zero,
    /// tube lengths differ, or a color sits above an empty slot.
    pub fn from_tubes(tubes: Vec<Vec<Slot>>) -> Result<Self, ParseError> {
        let capacity = tubes.first().ok_or(ParseError::NoTubes)?.len();
        if capacity == 0 {
            return Err(ParseError::ZeroCapacity);
        }
        for (tube, slots) in tubes.iter().enumerate() {
            if slots.len() != capacity {
                return Err(ParseError::UnequalTubes {
                    tube,
                    expected: capacity,
                    found: slots.len(),
                });
            }
            if let Some(pos) = slots.iter().position(|s| s.is_empty()) {
                if let Some(offset) = slots[pos..].iter().position(|s| !s.is_empty()) {
                    return Err(ParseError::FloatingColor {
                        tube,
                        slot: pos + offset,
                    });
                }
            }
        }
        Ok(State {
            tubes: tubes.into_iter().map(|slots| Tube { slots }).collect(),
        })
    }

    /// Deals a reproducible random puzzle.
    ///
    /// `colors` colors (clamped to `MAX_COLOR`) each get `capacity` segments;
    /// the segments are shuffled with a `SmallRng` seeded by `seed` and packed
    /// into `colors` full tubes, followed by `empty_tubes` empty ones. At least
    /// one tube is always produced and capacity is at least 1. The deal is not
    /// guaranteed to be solvable.
    pub fn new_random_with_seed(
        colors: u8,
        capacity: usize,
        empty_tubes: usize,
        seed: u64,
    ) -> Self {
        let colors = colors.min(MAX_COLOR);
        let capacity = capacity.max(1);
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut segments: Vec<Slot> = (1..=colors)
            .flat_map(|c| std::iter::repeat(Slot::Color(c)).take(capacity))
            .collect();
        segments.shuffle(&mut rng);

        let mut tubes: Vec<Tube> = segments
            .chunks(capacity)
            .map(|chunk| Tube {
                slots: chunk.to_vec(),
            })
            .collect();
        let empty_tubes = if tubes.is_empty() {
            empty_tubes.max(1)
        } else {
            empty_tubes
        };
        tubes.extend(std::iter::repeat_with(|| Tube::empty(capacity)).take(empty_tubes));
        State { tubes }
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Shared capacity of every tube.
    pub fn capacity(&self) -> usize {
        self.tubes.first().map_or(0, Tube::capacity)
    }

    /// Summaries of all tubes, in tube order.
    pub fn summaries(&self) -> Vec<TubeSummary> {
        self.tubes.iter().map(Tube::summary).collect()
    }

    /// Checks the goal condition under `rule`.
    pub fn is_goal(&self, rule: GoalRule) -> bool {
        match rule {
            GoalRule::Monochromatic => self.tubes.iter().all(Tube::is_monochromatic),
            GoalRule::Uniform => self.tubes.iter().all(Tube::is_uniform),
        }
    }

    /// Checks the default (monochromatic) goal condition.
    pub fn is_solved(&self) -> bool {
        self.is_goal(GoalRule::default())
    }

    /// Generates every legal pour and its resulting state.
    ///
    /// A pour from `i` to `j` is legal when `i` has something to move and `j`
    /// is either completely empty or shows the same top color with at least one
    /// free slot. Onto an empty tube the whole top run moves; otherwise as much
    /// of it as fits. Successors are emitted in `(from, to)` row-major order.
    pub fn legal_moves(&self) -> Vec<Successor> {
        let capacity = self.capacity();
        let summaries = self.summaries();
        let mut successors = Vec::new();

        for (from, src) in summaries.iter().enumerate() {
            if src.free_count == capacity || src.run_length == 0 {
                continue;
            }
            for (to, dst) in summaries.iter().enumerate() {
                if from == to {
                    continue;
                }
                let count = if dst.free_count == capacity {
                    src.run_length
                } else if dst.top_color == src.top_color && dst.free_count > 0 {
                    src.run_length.min(dst.free_count)
                } else {
                    continue;
                };
                let mv = Move { from, to, count };
                successors.push(Successor {
                    state: self.pour(mv),
                    mv,
                });
            }
        }
        successors
    }

    /// Applies `mv` if the rules allow it.
    ///
    /// Accepts any pour of `1..=run_length` segments that fits the destination,
    /// so every move produced by `legal_moves` is accepted. Returns `None`
    /// for out-of-range tubes, a zero count, or an incompatible destination.
    pub fn apply(&self, mv: Move) -> Option<State> {
        if mv.from == mv.to || mv.count == 0 {
            return None;
        }
        let src = self.tubes.get(mv.from)?.summary();
        let dst = self.tubes.get(mv.to)?.summary();
        let fits = mv.count <= dst.free_count
            && (dst.top_color.is_empty() || dst.top_color == src.top_color);
        if src.top_color.is_empty() || mv.count > src.run_length || !fits {
            return None;
        }
        Some(self.pour(mv))
    }

    /// Moves `mv.count` top segments of `mv.from` onto `mv.to` without
    /// checking legality. Callers pass moves recorded from `legal_moves`.
    pub(crate) fn pour(&self, mv: Move) -> State {
        let mut tubes = self.tubes.clone();
        let src_fill = tubes[mv.from].filled();
        let dst_fill = tubes[mv.to].filled();
        let color = tubes[mv.from].slots[src_fill - 1];
        for k in 0..mv.count {
            tubes[mv.from].slots[src_fill - 1 - k] = Slot::Empty;
            tubes[mv.to].slots[dst_fill + k] = color;
        }
        State { tubes }
    }

    /// Renders the state as colored terminal blocks, one tube per line,
    /// bottom slot first.
    pub fn to_ansi_string(&self) -> String {
        let mut output = String::new();
        for (idx, tube) in self.tubes.iter().enumerate() {
            output.push_str(&format!("{:>3} ", idx + 1));
            for slot in tube.slots() {
                output.push_str(&format!("\x1b[1;{};m  \x1b[m", slot.to_ansi_color_code()));
            }
            if idx + 1 < self.tubes.len() {
                output.push('\n');
            }
        }
        output
    }
}

impl fmt::Display for State {
    /// Formats the tubes in key characters separated by ` | `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tubes.iter().map(Tube::to_key_string).join(" | "))
    }
}
