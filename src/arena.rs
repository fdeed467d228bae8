//! Pits an evaluator's raw policy against a uniformly random opponent.

use crate::board::{ActionSpace, Board, GameOutcome, Side};
use crate::evaluator::Evaluator;
use crate::mcts::SearchError;
use crate::random::RandomGenerator;
use log::debug;

/// Wins per side over a series of games.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub white_wins: u32,
    pub black_wins: u32,
}

impl Tally {
    pub fn record(&mut self, winner: Side) {
        match winner {
            Side::White => self.white_wins += 1,
            Side::Black => self.black_wins += 1,
        }
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::White => self.white_wins,
            Side::Black => self.black_wins,
        }
    }

    pub fn games(&self) -> u32 {
        self.white_wins + self.black_wins
    }
}

/// Picks the legal move the evaluator's policy rates highest, without any search.
/// The first move in generation order wins ties.
pub fn greedy_policy_move<T, E>(board: &T, evaluator: &E) -> Result<Option<T::Move>, SearchError>
where
    T: Board,
    E: Evaluator<T::Features>,
{
    let evaluation = evaluator.evaluate(&board.encode())?;
    evaluation.validate(T::Actions::SIZE)?;

    let mut best: Option<(f32, T::Move)> = None;
    for m in board.legal_moves() {
        let p = evaluation.policy[T::Actions::index_of(&m)?];
        if best.is_none_or(|(best_p, _)| p > best_p) {
            best = Some((p, m));
        }
    }
    Ok(best.map(|(_, m)| m))
}

/// Plays one game from `start`: `policy_side` follows [`greedy_policy_move`],
/// the other side plays uniformly random legal moves. Returns the winner.
pub fn play_random_vs_policy<T, E, K>(
    start: T,
    evaluator: &E,
    policy_side: Side,
    random: &mut K,
) -> Result<Side, SearchError>
where
    T: Board,
    E: Evaluator<T::Features>,
    K: RandomGenerator,
{
    let mut board = start;
    loop {
        if let GameOutcome::Won(winner) = board.outcome() {
            return Ok(winner);
        }

        let chosen = if board.side_to_move() == policy_side {
            greedy_policy_move(&board, evaluator)?
        } else {
            random.choose(&board.legal_moves()).copied()
        };
        match chosen {
            Some(m) => board.apply_move(&m),
            // Unreachable for a board whose outcome agrees with its move generator.
            None => return Ok(board.side_to_move().opponent()),
        }
    }
}

/// Plays `games` games of [`play_random_vs_policy`] and counts the winners.
pub fn play_matches<T, E, K>(
    start: &T,
    evaluator: &E,
    policy_side: Side,
    games: u32,
    random: &mut K,
) -> Result<Tally, SearchError>
where
    T: Board,
    E: Evaluator<T::Features>,
    K: RandomGenerator,
{
    let mut tally = Tally::default();
    for _ in 0..games {
        tally.record(play_random_vs_policy(start.clone(), evaluator, policy_side, random)?);
    }
    debug!(
        "arena: policy as {:?} won {} of {} games",
        policy_side,
        tally.wins(policy_side),
        games
    );
    Ok(tally)
}
