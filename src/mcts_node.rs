use crate::board::{Board, GameOutcome};

/// Statistics for the move leading into a node.
///
/// Values are stored from the point of view of the side that made the move,
/// i.e. the side to move at the parent node.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<M> {
    /// The move taken from the parent. `None` for the synthetic edge above the root.
    pub prev_move: Option<M>,
    /// Visit count N.
    pub visits: u32,
    /// Prior probability P, renormalised over the parent's legal moves.
    pub prior: f64,
    /// Cumulative value W.
    pub total_value: f64,
    /// Mean value Q = W / N, 0 until the first visit.
    pub mean_value: f64,
}

impl<M> Edge<M> {
    pub fn new(prev_move: M, prior: f64) -> Self {
        Self {
            prev_move: Some(prev_move),
            visits: 0,
            prior,
            total_value: 0.0,
            mean_value: 0.0,
        }
    }

    /// The edge feeding the root. Starts with one visit so the root's children
    /// get a non-zero exploration term on the very first selection.
    pub fn root() -> Self {
        Self {
            prev_move: None,
            visits: 1,
            prior: 1.0,
            total_value: 0.0,
            mean_value: 0.0,
        }
    }

    /// Adds one backpropagated value.
    pub fn record(&mut self, value: f64) {
        self.visits += 1;
        self.total_value += value;
        self.mean_value = self.total_value / f64::from(self.visits);
    }

    /// PUCT score: `Q + c_puct * P * sqrt(parent_visits) / (N + 1)`.
    ///
    /// `parent_visits_sqrt` is the square root of the visit count of the edge
    /// leading into the parent node.
    #[inline]
    pub fn puct(&self, parent_visits_sqrt: f64, c_puct: f64) -> f64 {
        self.mean_value + c_puct * self.prior * parent_visits_sqrt / (f64::from(self.visits) + 1.0)
    }
}

/// Represents a single node in the search tree: one position plus the edge
/// that leads into it.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Board> {
    /// The depth of the node in the tree.
    pub height: u32,
    /// The game state that this node represents.
    pub board: T,
    /// The outcome of the game at this node, computed once on creation.
    pub outcome: GameOutcome,
    /// The incoming edge.
    pub edge: Edge<T::Move>,
}

impl<T: Board> MctsNode<T> {
    pub fn new_root(board: T) -> Self {
        let outcome = board.outcome();
        Self {
            height: 0,
            board,
            outcome,
            edge: Edge::root(),
        }
    }

    pub fn new_child(board: T, height: u32, edge: Edge<T::Move>) -> Self {
        let outcome = board.outcome();
        Self {
            height,
            board,
            outcome,
            edge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_value_is_zero_until_visited() {
        // arrange
        let mut edge = Edge::new(3u8, 0.5);
        assert_eq!(edge.mean_value, 0.0);

        // act
        edge.record(1.0);
        edge.record(-1.0);
        edge.record(1.0);

        // assert
        assert_eq!(edge.visits, 3);
        assert!((edge.total_value - 1.0).abs() < 1e-12);
        assert!((edge.mean_value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn root_edge_starts_with_one_visit() {
        let edge = Edge::<u8>::root();
        assert_eq!(edge.visits, 1);
        assert_eq!(edge.prev_move, None);
    }

    #[test]
    fn puct_score() {
        // arrange
        let mut edge = Edge::new(0u8, 0.5);
        for _ in 0..4 {
            edge.record(0.5);
        }

        // act: Q = 0.5, U = 2 * 0.5 * sqrt(100) / 5 = 2
        let score = edge.puct(10.0, 2.0);

        // assert
        assert!((score - 2.5).abs() < 1e-12);
    }

    #[test]
    fn unvisited_edge_is_pure_exploration() {
        let edge = Edge::new(0u8, 0.25);
        assert!((edge.puct(1.0, 1.0) - 0.25).abs() < 1e-12);
    }
}
