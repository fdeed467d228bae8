//! Plays complete games with a fresh search at every move and harvests
//! training examples from them.

use crate::board::{ActionSpace, Board, GameOutcome, Side};
use crate::config::MctsConfig;
use crate::dataset::Dataset;
use crate::evaluator::Evaluator;
use crate::mcts::{MonteCarloTreeSearch, SearchError};
use crate::random::RandomGenerator;
use log::{debug, trace};

/// One finished self-play game.
#[derive(Debug, Clone)]
pub struct SelfPlayGame<T: Board> {
    /// One example per position played from, in game order.
    pub dataset: Dataset<T::Features>,
    pub moves: Vec<T::Move>,
    pub winner: Side,
}

/// Drives self-play games against a single evaluator.
pub struct SelfPlay<'a, E, K: RandomGenerator> {
    evaluator: &'a E,
    random: K,
    config: MctsConfig,
}

impl<'a, E, K: RandomGenerator> SelfPlay<'a, E, K> {
    pub fn new(evaluator: &'a E, random: K) -> Self {
        Self {
            evaluator,
            random,
            config: MctsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    /// Plays one game from `start` to the end.
    ///
    /// Every move is sampled from the search's visit distribution rather than
    /// taken greedily, so the recorded games keep exploring.
    pub fn play_game<T>(&mut self, start: T) -> Result<SelfPlayGame<T>, SearchError>
    where
        T: Board,
        E: Evaluator<T::Features>,
    {
        let mut board = start;
        let mut positions = Vec::new();
        let mut policies = Vec::new();
        let mut movers = Vec::new();
        let mut moves = Vec::new();

        let winner = loop {
            if let GameOutcome::Won(winner) = board.outcome() {
                break winner;
            }

            let (candidates, policy) = {
                let mut mcts =
                    MonteCarloTreeSearch::builder(board.clone(), self.evaluator, &mut self.random)
                        .with_config(self.config.clone())
                        .build()?;
                let candidates = mcts.search()?;
                (candidates, mcts.root_policy_vector()?)
            };

            let index = sample_index(&policy, &mut self.random)
                .ok_or(SearchError::NoMatchingMove(T::Actions::SIZE))?;
            let mut chosen = None;
            for candidate in &candidates {
                if T::Actions::index_of(&candidate.mv)? == index {
                    chosen = Some(candidate.mv);
                    break;
                }
            }
            let chosen = chosen.ok_or(SearchError::NoMatchingMove(index))?;
            trace!(
                "ply {}: {:?} plays {:?} (p = {:.3})",
                moves.len(),
                board.side_to_move(),
                chosen,
                policy[index]
            );

            positions.push(board.encode());
            policies.push(policy);
            movers.push(board.side_to_move());
            moves.push(chosen);
            board.apply_move(&chosen);
        };

        // Sides alternate every ply, so this is the same as counting back
        // from the final position with alternating signs.
        let mut dataset = Dataset::new();
        for ((position, policy), mover) in positions.into_iter().zip(policies).zip(movers) {
            let value = if mover == winner { 1.0 } else { -1.0 };
            dataset.push(position, policy, value);
        }

        debug!("self-play game: {} plies, {:?} wins", moves.len(), winner);
        Ok(SelfPlayGame {
            dataset,
            moves,
            winner,
        })
    }

    /// Plays `games` games from `start` and concatenates their examples.
    pub fn play_games<T>(
        &mut self,
        start: &T,
        games: usize,
    ) -> Result<Dataset<T::Features>, SearchError>
    where
        T: Board,
        E: Evaluator<T::Features>,
    {
        let mut dataset = Dataset::new();
        for _ in 0..games {
            dataset.append(self.play_game(start.clone())?.dataset);
        }
        Ok(dataset)
    }
}

/// Draws an index from a categorical distribution.
///
/// Returns `None` only if every entry is zero.
pub fn sample_index<K: RandomGenerator>(distribution: &[f32], random: &mut K) -> Option<usize> {
    let r = random.next_unit() as f32;
    let mut cumulative = 0.0;
    for (i, &p) in distribution.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return Some(i);
        }
    }

    // Rounding can leave the total just under r.
    distribution.iter().rposition(|&p| p > 0.0)
}
