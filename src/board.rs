use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// The central trait of the library, defining the interface for a game state.
///
/// Search algorithms only talk to the game through this trait. Boards are cheap
/// to clone: every branch point in a search clones the state instead of undoing moves.
pub trait Board: Clone + Debug {
    /// A single move. Moves are only ever produced by [`Board::legal_moves`].
    type Move: Copy + PartialEq + Debug;

    /// Perspective-normalised encoding handed to an [`Evaluator`](crate::evaluator::Evaluator).
    type Features: Clone + Eq + Hash + Debug;

    /// Layout of the evaluator's policy output for this game.
    type Actions: ActionSpace<Move = Self::Move>;

    /// Returns the side whose turn it is.
    fn side_to_move(&self) -> Side;

    /// Returns every legal move for the side to move, in a fixed order.
    ///
    /// Does not check for terminal positions; call [`Board::outcome`] first.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies a move and passes the turn.
    ///
    /// The move must come from [`Board::legal_moves`] on this exact state,
    /// anything else leaves the board in an unspecified state.
    fn apply_move(&mut self, m: &Self::Move);

    /// Returns the current outcome of the game.
    fn outcome(&self) -> GameOutcome;

    /// Encodes the position as seen by the side to move.
    fn encode(&self) -> Self::Features;
}

/// A fixed bijection between move shapes and the evaluator's policy indices.
///
/// Kept apart from [`Board`] so the board mechanics never depend on the network layout.
pub trait ActionSpace {
    type Move;

    /// Number of policy outputs.
    const SIZE: usize;

    /// Maps a move onto its policy index.
    fn index_of(m: &Self::Move) -> Result<usize, MoveIndexError>;

    /// Maps a policy index back onto the move `side` would play.
    fn move_at(index: usize, side: Side) -> Option<Self::Move>;
}

/// The two players.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Side {
    /// Moves first.
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

/// Represents the possible outcomes of a game.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The game is over and the given side has won.
    Won(Side),
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameOutcome::Won(_))
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameOutcome::InProgress => None,
            GameOutcome::Won(side) => Some(side),
        }
    }
}

/// A move that has no slot in the policy layout.
///
/// The layout is total over every move a board can generate, so this is always a bug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveIndexError {
    #[error("move {from} -> {to} has no policy index")]
    Unmapped { from: u8, to: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_flips_side() {
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::Black.opponent(), Side::White);
    }

    #[test]
    fn outcome_reports_winner() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert_eq!(GameOutcome::InProgress.winner(), None);
        assert!(GameOutcome::Won(Side::Black).is_terminal());
        assert_eq!(GameOutcome::Won(Side::Black).winner(), Some(Side::Black));
    }
}
