use crate::board::{Board, GameOutcome, Side};
use crate::boards::hexapawn_actions::HexapawnActions;
use std::fmt;

/// Length of [`HexapawnBoard::encode`]'s output: one plane for each side.
pub const FEATURE_LEN: usize = 18;

/// Perspective-normalised position: 9 cells of "mine", then 9 cells of "theirs".
pub type Features = [u8; FEATURE_LEN];

const SQUARES: usize = 9;
const WIDTH: usize = 3;

/// Diagonal capture destinations for a white pawn on each square.
const WHITE_CAPTURES: [&[u8]; SQUARES] = [&[], &[], &[], &[1], &[0, 2], &[1], &[4], &[3, 5], &[4]];
/// Diagonal capture destinations for a black pawn on each square.
const BLACK_CAPTURES: [&[u8]; SQUARES] = [&[4], &[3, 5], &[4], &[7], &[6, 8], &[7], &[], &[], &[]];

/// A pawn move from one square to another.
///
/// White pawns only move towards square 0 and black pawns towards square 8,
/// so the direction alone tells which side a move belongs to.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct HexapawnMove {
    pub from: u8,
    pub to: u8,
}

impl HexapawnMove {
    pub const fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }

    /// The side this move belongs to.
    pub fn side(&self) -> Side {
        if self.from > self.to {
            Side::White
        } else {
            Side::Black
        }
    }

    /// The same move seen from the other side of a board rotated by 180 degrees.
    ///
    /// Both squares must be on the board.
    pub fn mirrored(&self) -> Self {
        Self {
            from: 8 - self.from,
            to: 8 - self.to,
        }
    }
}

/// A 3x3 Hexapawn position.
///
/// Squares are numbered 0..9 row by row; black starts on 0..3 and white on 6..9.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct HexapawnBoard {
    side_to_move: Side,
    field: [Option<Side>; SQUARES],
}

impl HexapawnBoard {
    /// An empty board with white to move.
    pub fn empty() -> Self {
        Self {
            side_to_move: Side::White,
            field: [None; SQUARES],
        }
    }

    /// A board set up in the starting position.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        board.set_starting_position();
        board
    }

    /// Builds an arbitrary position. Mostly useful for tests and analysis.
    pub fn from_squares(field: [Option<Side>; SQUARES], side_to_move: Side) -> Self {
        Self {
            side_to_move,
            field,
        }
    }

    /// Resets to three black pawns on the top rank, three white pawns on the
    /// bottom rank and white to move.
    pub fn set_starting_position(&mut self) {
        self.field = [
            Some(Side::Black),
            Some(Side::Black),
            Some(Side::Black),
            None,
            None,
            None,
            Some(Side::White),
            Some(Side::White),
            Some(Side::White),
        ];
        self.side_to_move = Side::White;
    }

    pub fn squares(&self) -> &[Option<Side>; SQUARES] {
        &self.field
    }

    /// Rotates the board by 180 degrees and swaps colours and turn.
    ///
    /// The result is the same game seen from the opponent's chair.
    pub fn mirrored(&self) -> Self {
        let mut field = [None; SQUARES];
        for (i, cell) in field.iter_mut().enumerate() {
            *cell = self.field[SQUARES - 1 - i].map(Side::opponent);
        }
        Self {
            side_to_move: self.side_to_move.opponent(),
            field,
        }
    }

    fn has_pawn_on(&self, side: Side, squares: &[usize]) -> bool {
        squares.iter().any(|&i| self.field[i] == Some(side))
    }

    fn push_target(side: Side, square: usize) -> Option<usize> {
        match side {
            Side::White => square.checked_sub(WIDTH),
            Side::Black => Some(square + WIDTH).filter(|&to| to < SQUARES),
        }
    }

    fn capture_targets(side: Side, square: usize) -> &'static [u8] {
        match side {
            Side::White => WHITE_CAPTURES[square],
            Side::Black => BLACK_CAPTURES[square],
        }
    }
}

impl Default for HexapawnBoard {
    /// Creates a board in the starting position.
    fn default() -> Self {
        HexapawnBoard::starting()
    }
}

impl Board for HexapawnBoard {
    type Move = HexapawnMove;
    type Features = Features;
    type Actions = HexapawnActions;

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    fn legal_moves(&self) -> Vec<Self::Move> {
        let me = self.side_to_move;
        let mut moves = Vec::new();

        for square in 0..SQUARES {
            if self.field[square] != Some(me) {
                continue;
            }
            // A pawn with no square ahead sits on the last rank and has no captures either.
            let Some(ahead) = Self::push_target(me, square) else {
                continue;
            };

            if self.field[ahead].is_none() {
                moves.push(HexapawnMove::new(square as u8, ahead as u8));
            }
            for &target in Self::capture_targets(me, square) {
                if self.field[target as usize] == Some(me.opponent()) {
                    moves.push(HexapawnMove::new(square as u8, target));
                }
            }
        }

        moves
    }

    fn apply_move(&mut self, m: &Self::Move) {
        debug_assert!(
            self.legal_moves().contains(m),
            "illegal move {m:?} on {self:?}"
        );
        self.field[m.to as usize] = self.field[m.from as usize];
        self.field[m.from as usize] = None;
        self.side_to_move = self.side_to_move.opponent();
    }

    fn outcome(&self) -> GameOutcome {
        // A white pawn on the top rank wins outright, whatever the turn says.
        if self.has_pawn_on(Side::White, &[0, 1, 2]) {
            return GameOutcome::Won(Side::White);
        }
        if self.has_pawn_on(Side::Black, &[6, 7, 8]) {
            return GameOutcome::Won(Side::Black);
        }

        if self.legal_moves().is_empty() {
            GameOutcome::Won(self.side_to_move.opponent())
        } else {
            GameOutcome::InProgress
        }
    }

    fn encode(&self) -> Features {
        let me = self.side_to_move;
        let mut features = [0u8; FEATURE_LEN];
        for k in 0..SQUARES {
            // Black reads the board back to front, which rotates it by 180 degrees.
            let square = match me {
                Side::White => k,
                Side::Black => SQUARES - 1 - k,
            };
            let cell = self.field[square];
            features[k] = u8::from(cell == Some(me));
            features[SQUARES + k] = u8::from(cell == Some(me.opponent()));
        }

        features
    }
}

impl fmt::Display for HexapawnBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.field.chunks(WIDTH) {
            for cell in row {
                let c = match cell {
                    None => '.',
                    Some(Side::White) => 'W',
                    Some(Side::Black) => 'B',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{:?} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    const W: Option<Side> = Some(Side::White);
    const B: Option<Side> = Some(Side::Black);
    const E: Option<Side> = None;

    fn reachable_positions() -> Vec<HexapawnBoard> {
        let start = HexapawnBoard::starting();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut positions = Vec::new();
        while let Some(board) = queue.pop_front() {
            positions.push(board);
            if board.outcome().is_terminal() {
                continue;
            }
            for m in board.legal_moves() {
                let mut next = board;
                next.apply_move(&m);
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        positions
    }

    #[test]
    fn starting_position_moves() {
        // arrange
        let board = HexapawnBoard::starting();

        // act
        let moves = board.legal_moves();

        // assert
        assert_eq!(
            moves,
            vec![
                HexapawnMove::new(6, 3),
                HexapawnMove::new(7, 4),
                HexapawnMove::new(8, 5),
            ]
        );
        assert_eq!(board.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn captures_follow_the_diagonal_table() {
        // arrange
        let board = HexapawnBoard::from_squares([B, E, B, E, W, E, E, E, E], Side::White);

        // act
        let moves = board.legal_moves();

        // assert
        assert_eq!(
            moves,
            vec![
                HexapawnMove::new(4, 1),
                HexapawnMove::new(4, 0),
                HexapawnMove::new(4, 2),
            ]
        );
    }

    #[test]
    fn blocked_pawn_cannot_push() {
        let board = HexapawnBoard::from_squares([E, E, E, B, E, E, W, E, E], Side::White);
        assert!(board.legal_moves().is_empty());
        assert_eq!(board.outcome(), GameOutcome::Won(Side::Black));
    }

    #[test]
    fn apply_move_moves_piece_and_passes_turn() {
        // arrange
        let mut board = HexapawnBoard::starting();

        // act
        board.apply_move(&HexapawnMove::new(7, 4));

        // assert
        assert_eq!(board.squares(), &[B, B, B, E, W, E, W, E, W]);
        assert_eq!(board.side_to_move(), Side::Black);
    }

    #[test]
    fn white_on_top_rank_wins_regardless_of_turn() {
        for square in 0..3 {
            for side in [Side::White, Side::Black] {
                let mut field = [E, E, E, B, E, B, E, E, E];
                field[square] = W;
                let board = HexapawnBoard::from_squares(field, side);
                assert_eq!(board.outcome(), GameOutcome::Won(Side::White));
            }
        }
    }

    #[test]
    fn black_on_bottom_rank_wins() {
        let board = HexapawnBoard::from_squares([E, E, E, W, E, E, E, B, E], Side::White);
        assert_eq!(board.outcome(), GameOutcome::Won(Side::Black));
    }

    #[test]
    fn encoding_is_perspective_normalised() {
        // arrange
        let mut board = HexapawnBoard::starting();
        let white_view = board.encode();
        board.apply_move(&HexapawnMove::new(6, 3));

        // act
        let black_view = board.encode();

        // assert
        assert_eq!(
            white_view,
            [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0]
        );
        // Black sees its own pawns on the bottom rank and white's pushed pawn
        // on the right of the middle rank.
        assert_eq!(
            black_view,
            [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0]
        );
    }

    #[test]
    fn mirrored_positions_share_an_encoding() {
        for board in reachable_positions() {
            assert_eq!(board.encode(), board.mirrored().encode(), "{board}");
        }
    }

    #[test]
    fn move_generation_is_symmetric() {
        for board in reachable_positions() {
            let mut expected: Vec<_> = board.legal_moves().iter().map(|m| m.mirrored()).collect();
            let mut actual = board.mirrored().legal_moves();
            expected.sort_by_key(|m| (m.from, m.to));
            actual.sort_by_key(|m| (m.from, m.to));
            assert_eq!(actual, expected, "{board}");
        }
    }

    #[test]
    fn terminal_detection_is_exclusive() {
        for board in reachable_positions() {
            match board.outcome() {
                GameOutcome::InProgress => assert!(!board.legal_moves().is_empty(), "{board}"),
                GameOutcome::Won(winner) => {
                    let white_promoted = board.has_pawn_on(Side::White, &[0, 1, 2]);
                    let black_promoted = board.has_pawn_on(Side::Black, &[6, 7, 8]);
                    assert!(!(white_promoted && black_promoted), "{board}");
                    if white_promoted {
                        assert_eq!(winner, Side::White);
                    } else if black_promoted {
                        assert_eq!(winner, Side::Black);
                    } else {
                        assert!(board.legal_moves().is_empty());
                        assert_eq!(winner, board.side_to_move().opponent());
                    }
                }
            }
        }
    }

    #[test]
    fn move_side_follows_direction() {
        assert_eq!(HexapawnMove::new(7, 4).side(), Side::White);
        assert_eq!(HexapawnMove::new(1, 4).side(), Side::Black);
        assert_eq!(HexapawnMove::new(7, 3).mirrored(), HexapawnMove::new(1, 5));
    }
}
