use crate::board::{ActionSpace, MoveIndexError, Side};
use crate::boards::hexapawn::HexapawnMove;

/// Number of distinct move shapes once black moves are rotated onto white ones.
pub const ACTION_COUNT: usize = 14;

/// Every move shape white can play, in policy-index order.
///
/// Black moves are rotated onto their white counterpart before the lookup.
const WHITE_MOVES: [HexapawnMove; ACTION_COUNT] = [
    HexapawnMove::new(6, 3),
    HexapawnMove::new(7, 4),
    HexapawnMove::new(8, 5),
    HexapawnMove::new(3, 0),
    HexapawnMove::new(4, 1),
    HexapawnMove::new(5, 2),
    HexapawnMove::new(6, 4),
    HexapawnMove::new(7, 3),
    HexapawnMove::new(7, 5),
    HexapawnMove::new(8, 4),
    HexapawnMove::new(3, 1),
    HexapawnMove::new(4, 0),
    HexapawnMove::new(4, 2),
    HexapawnMove::new(5, 1),
];

/// The Hexapawn policy layout: 6 pushes followed by 8 captures.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexapawnActions;

/// Highest square index on the 3x3 board.
const LAST_SQUARE: u8 = 8;

impl HexapawnActions {
    /// `None` for squares off the board, which cannot be mirrored.
    fn canonical(m: &HexapawnMove) -> Option<HexapawnMove> {
        if m.from > LAST_SQUARE || m.to > LAST_SQUARE {
            return None;
        }
        Some(match m.side() {
            Side::White => *m,
            Side::Black => m.mirrored(),
        })
    }
}

impl ActionSpace for HexapawnActions {
    type Move = HexapawnMove;

    const SIZE: usize = ACTION_COUNT;

    fn index_of(m: &HexapawnMove) -> Result<usize, MoveIndexError> {
        Self::canonical(m)
            .and_then(|canonical| WHITE_MOVES.iter().position(|&candidate| candidate == canonical))
            .ok_or(MoveIndexError::Unmapped {
                from: m.from,
                to: m.to,
            })
    }

    fn move_at(index: usize, side: Side) -> Option<HexapawnMove> {
        let white_move = WHITE_MOVES.get(index)?;
        Some(match side {
            Side::White => *white_move,
            Side::Black => white_move.mirrored(),
        })
    }
}
