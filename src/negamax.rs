//! Exhaustive game-tree search that labels every non-terminal position it
//! walks through with its exact result and best move.
//!
//! No pruning: every position visited becomes a training example.

use crate::board::{ActionSpace, Board, GameOutcome, MoveIndexError, Side};
use crate::dataset::Dataset;
use log::debug;

/// Result of solving one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution<M> {
    /// `1` if white wins with perfect play, `-1` if black does.
    pub score: i8,
    /// First move reaching `score`, `None` for terminal positions.
    pub best_move: Option<M>,
}

/// Solves `board` and appends one example per non-terminal position visited.
///
/// Children are searched in [`Board::legal_moves`] order and the first move
/// reaching the best score is kept, so the output is fully deterministic.
/// A position reachable by several move orders is emitted once per path, so the
/// dataset holds duplicates. Every distinct non-terminal position appears at
/// least once; deduplicate downstream if each should appear exactly once.
pub fn negamax<T: Board>(
    board: &T,
    dataset: &mut Dataset<T::Features>,
) -> Result<Solution<T::Move>, MoveIndexError> {
    let mover = board.side_to_move();
    if let GameOutcome::Won(winner) = board.outcome() {
        return Ok(Solution {
            score: white_score(winner),
            best_move: None,
        });
    }

    let mut best: Option<(i8, T::Move)> = None;
    for m in board.legal_moves() {
        let mut child = board.clone();
        child.apply_move(&m);
        let score = negamax(&child, dataset)?.score;

        let improves = match best {
            None => true,
            Some((best_score, _)) => match mover {
                Side::White => score > best_score,
                Side::Black => score < best_score,
            },
        };
        if improves {
            best = Some((score, m));
        }
    }

    let Some((score, best_move)) = best else {
        // In progress but nothing to play: the board broke its own contract.
        return Ok(Solution {
            score: white_score(mover.opponent()),
            best_move: None,
        });
    };

    let mut policy = vec![0.0; T::Actions::SIZE];
    policy[T::Actions::index_of(&best_move)?] = 1.0;
    let value = match mover {
        Side::White => score,
        Side::Black => -score,
    };
    dataset.push(board.encode(), policy, f32::from(value));

    Ok(Solution {
        score,
        best_move: Some(best_move),
    })
}

/// Runs [`negamax`] from `start` into a fresh dataset.
pub fn generate_dataset<T: Board>(
    start: &T,
) -> Result<(Solution<T::Move>, Dataset<T::Features>), MoveIndexError> {
    let mut dataset = Dataset::new();
    let solution = negamax(start, &mut dataset)?;
    debug!(
        "negamax: {} examples, root score {}, best move {:?}",
        dataset.len(),
        solution.score,
        solution.best_move
    );
    Ok((solution, dataset))
}

fn white_score(winner: Side) -> i8 {
    match winner {
        Side::White => 1,
        Side::Black => -1,
    }
}
