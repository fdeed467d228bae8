use crate::board::{ActionSpace, Board, GameOutcome, MoveIndexError};
use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::mcts_node::{Edge, MctsNode};
use crate::random::RandomGenerator;
use ego_tree::{NodeId, NodeRef, Tree};
use log::{debug, trace, warn};
use thiserror::Error;

/// Errors that can occur during a search.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("cannot search from a finished game")]
    TerminalRoot,

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("move index error: {0}")]
    MoveIndex(#[from] MoveIndexError),

    #[error("no legal move has policy index {0}")]
    NoMatchingMove(usize),
}

/// One root move in the search result.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveProbability<M> {
    pub mv: M,
    /// Share of `visits^(1/temperature)` among the root moves.
    pub probability: f64,
    pub visits: u32,
    pub mean_value: f64,
}

/// Monte Carlo tree search guided by a policy/value [`Evaluator`].
///
/// The tree lives for a single move decision: build a new search for every
/// position instead of reusing subtrees.
pub struct MonteCarloTreeSearch<'a, T: Board, E, K: RandomGenerator> {
    tree: Tree<MctsNode<T>>,
    root_id: NodeId,
    evaluator: &'a E,
    random: K,
    config: MctsConfig,
    next_action: MctsAction,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<'a, T: Board, E, K: RandomGenerator> {
    board: T,
    evaluator: &'a E,
    random: K,
    config: MctsConfig,
}

impl<'a, T, E, K> MonteCarloTreeSearchBuilder<'a, T, E, K>
where
    T: Board,
    E: Evaluator<T::Features>,
    K: RandomGenerator,
{
    pub fn new(board: T, evaluator: &'a E, random: K) -> Self {
        Self {
            board,
            evaluator,
            random,
            config: MctsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_simulations(mut self, n: u32) -> Self {
        self.config.simulations = n;
        self
    }

    pub fn with_c_puct(mut self, c: f64) -> Self {
        self.config.c_puct = c;
        self
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.config.temperature = t;
        self
    }

    /// Validates the configuration and the root position.
    pub fn build(self) -> Result<MonteCarloTreeSearch<'a, T, E, K>, SearchError> {
        self.config.validate()?;
        if self.board.outcome().is_terminal() {
            return Err(SearchError::TerminalRoot);
        }
        Ok(MonteCarloTreeSearch::new(
            self.board,
            self.evaluator,
            self.random,
            self.config,
        ))
    }
}

impl<'a, T, E, K> MonteCarloTreeSearch<'a, T, E, K>
where
    T: Board,
    E: Evaluator<T::Features>,
    K: RandomGenerator,
{
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(
        board: T,
        evaluator: &'a E,
        random: K,
    ) -> MonteCarloTreeSearchBuilder<'a, T, E, K> {
        MonteCarloTreeSearchBuilder::new(board, evaluator, random)
    }

    fn new(board: T, evaluator: &'a E, random: K, config: MctsConfig) -> Self {
        let tree = Tree::new(MctsNode::new_root(board));
        let root_id = tree.root().id();

        Self {
            tree,
            root_id,
            evaluator,
            random,
            config,
            next_action: MctsAction::Selection {
                backpropagated: vec![],
            },
        }
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns a reference to the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.node(self.root_id)
    }

    /// Returns the next MCTS action to be performed. Useful for debugging and visualization.
    pub fn get_next_mcts_action(&self) -> &MctsAction {
        &self.next_action
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Executes a single step of the search: selection, evaluation or backpropagation.
    pub fn execute_action(&mut self) -> Result<(), SearchError> {
        match self.next_action.clone() {
            MctsAction::Selection { .. } => {
                self.expand_root()?;
                let leaf = self.select_leaf();
                self.next_action = MctsAction::Evaluation { leaf };
            }
            MctsAction::Evaluation { leaf } => {
                let value = self.expand_and_evaluate(leaf)?;
                self.next_action = MctsAction::Backpropagation { leaf, value };
            }
            MctsAction::Backpropagation { leaf, value } => {
                let backpropagated = self.backpropagate(leaf, value);
                trace!(
                    "simulation done: leaf height {}, value {}",
                    self.node(leaf).value().height,
                    value
                );
                self.next_action = MctsAction::Selection { backpropagated };
            }
        }
        Ok(())
    }

    /// Performs one full simulation.
    /// Returns every node whose incoming edge was updated, leaf first, with the value it received.
    pub fn do_iteration(&mut self) -> Result<Vec<(NodeId, f64)>, SearchError> {
        self.execute_action()?;
        while !matches!(self.next_action, MctsAction::Selection { .. }) {
            self.execute_action()?;
        }

        match &self.next_action {
            MctsAction::Selection { backpropagated } => Ok(backpropagated.clone()),
            _ => Ok(vec![]),
        }
    }

    /// Runs the given number of simulations.
    pub fn iterate_n_times(&mut self, n: u32) -> Result<(), SearchError> {
        for _ in 0..n {
            self.do_iteration()?;
        }
        Ok(())
    }

    /// Runs the configured number of simulations and returns the root policy.
    pub fn search(&mut self) -> Result<Vec<MoveProbability<T::Move>>, SearchError> {
        self.expand_root()?;
        self.iterate_n_times(self.config.simulations)?;

        let root = self.get_root();
        debug!(
            "search done: {} simulations, {} nodes, root {:?}",
            self.config.simulations,
            self.tree.nodes().count(),
            root.value().board.side_to_move()
        );
        Ok(self.root_policy())
    }

    /// The visit distribution over root moves, in move generation order.
    pub fn root_policy(&self) -> Vec<MoveProbability<T::Move>> {
        let edges: Vec<&Edge<T::Move>> = self
            .get_root()
            .children()
            .map(|child| &child.value().edge)
            .collect();

        let temperature = self.config.temperature;
        let weights: Vec<f64> = if temperature <= f64::EPSILON {
            let best = edges
                .iter()
                .enumerate()
                .fold(None::<(usize, u32)>, |best, (i, edge)| match best {
                    Some((_, visits)) if visits >= edge.visits => best,
                    _ => Some((i, edge.visits)),
                })
                .map(|(i, _)| i);
            (0..edges.len())
                .map(|i| if Some(i) == best { 1.0 } else { 0.0 })
                .collect()
        } else {
            // Scaled by the largest count so small temperatures cannot overflow to inf.
            let max_visits = edges.iter().map(|edge| edge.visits).max().unwrap_or(0);
            if max_visits == 0 {
                vec![0.0; edges.len()]
            } else {
                edges
                    .iter()
                    .map(|edge| {
                        (f64::from(edge.visits) / f64::from(max_visits)).powf(1.0 / temperature)
                    })
                    .collect()
            }
        };
        let total: f64 = weights.iter().sum();

        edges
            .iter()
            .zip(weights)
            .filter_map(|(edge, weight)| {
                Some(MoveProbability {
                    mv: edge.prev_move?,
                    probability: if total > 0.0 { weight / total } else { 0.0 },
                    visits: edge.visits,
                    mean_value: edge.mean_value,
                })
            })
            .collect()
    }

    /// [`Self::root_policy`] scattered onto the full policy layout.
    pub fn root_policy_vector(&self) -> Result<Vec<f32>, MoveIndexError> {
        let mut policy = vec![0.0; T::Actions::SIZE];
        for entry in self.root_policy() {
            policy[T::Actions::index_of(&entry.mv)?] = entry.probability as f32;
        }
        Ok(policy)
    }

    fn node(&self, id: NodeId) -> NodeRef<'_, MctsNode<T>> {
        self.tree
            .get(id)
            .expect("node ids are only taken from this tree")
    }

    fn expand_root(&mut self) -> Result<(), SearchError> {
        if !self.tree.root().has_children() {
            self.expand(self.root_id)?;
        }
        Ok(())
    }

    /// Walks from the root to a leaf, maximising the PUCT score at every step.
    /// Ties between equally scored children are broken at random.
    fn select_leaf(&mut self) -> NodeId {
        let c_puct = self.config.c_puct;
        let mut current = self.root_id;

        loop {
            let node = self
                .tree
                .get(current)
                .expect("node ids are only taken from this tree");
            if !node.has_children() {
                return current;
            }

            // Exploration is scaled by the visits of the edge leading into this node.
            let parent_visits_sqrt = f64::from(node.value().edge.visits).sqrt();
            let scored: Vec<(NodeId, f64)> = node
                .children()
                .map(|child| (child.id(), child.value().edge.puct(parent_visits_sqrt, c_puct)))
                .collect();
            let max_score = scored
                .iter()
                .map(|&(_, score)| score)
                .fold(f64::NEG_INFINITY, f64::max);
            let best: Vec<NodeId> = scored
                .into_iter()
                .filter(|&(_, score)| score == max_score)
                .map(|(id, _)| id)
                .collect();

            match self.random.choose(&best) {
                Some(&next) => current = next,
                None => return current,
            }
        }
    }

    /// Returns the leaf's value from the point of view of the side that moved into it.
    fn expand_and_evaluate(&mut self, leaf: NodeId) -> Result<f64, SearchError> {
        let node = self.node(leaf).value();
        if let GameOutcome::Won(winner) = node.outcome {
            // The turn has already passed: the side to move here did not just move.
            return Ok(if winner == node.board.side_to_move() {
                -1.0
            } else {
                1.0
            });
        }

        let value = self.expand(leaf)?;
        Ok(-f64::from(value))
    }

    /// Adds one child per legal move, with priors taken from the evaluator and
    /// renormalised over the legal moves. Returns the evaluator's value.
    fn expand(&mut self, node_id: NodeId) -> Result<f32, SearchError> {
        let (board, height) = {
            let node = self.node(node_id).value();
            (node.board.clone(), node.height)
        };

        let evaluation = self.evaluator.evaluate(&board.encode())?;
        evaluation.validate(T::Actions::SIZE)?;

        let moves = board.legal_moves();
        let mut priors = moves
            .iter()
            .map(|m| Ok(f64::from(evaluation.policy[T::Actions::index_of(m)?])))
            .collect::<Result<Vec<f64>, MoveIndexError>>()?;

        let legal_mass: f64 = priors.iter().sum();
        if legal_mass > 0.0 {
            for prior in &mut priors {
                *prior /= legal_mass;
            }
        } else {
            warn!(
                "evaluator gave no mass to any of {} legal moves, using uniform priors",
                moves.len()
            );
            priors.fill(1.0 / moves.len() as f64);
        }

        let mut parent = self
            .tree
            .get_mut(node_id)
            .expect("node ids are only taken from this tree");
        for (m, prior) in moves.into_iter().zip(priors) {
            let mut child = board.clone();
            child.apply_move(&m);
            parent.append(MctsNode::new_child(child, height + 1, Edge::new(m, prior)));
        }

        Ok(evaluation.value)
    }

    /// Adds `value` to the leaf's incoming edge and alternating-sign values to
    /// every edge above it, up to and including the root's synthetic edge.
    fn backpropagate(&mut self, leaf: NodeId, value: f64) -> Vec<(NodeId, f64)> {
        let mut path = Vec::new();
        let mut current = Some(leaf);
        let mut value = value;

        while let Some(id) = current {
            let parent = self.node(id).parent().map(|p| p.id());
            if let Some(mut node) = self.tree.get_mut(id) {
                node.value().edge.record(value);
            }
            path.push((id, value));
            value = -value;
            current = parent;
        }

        path
    }
}

/// Convenience function to run a single search.
pub fn run_mcts<T, E, K>(
    board: T,
    evaluator: &E,
    config: MctsConfig,
    random: K,
) -> Result<Vec<MoveProbability<T::Move>>, SearchError>
where
    T: Board,
    E: Evaluator<T::Features>,
    K: RandomGenerator,
{
    MonteCarloTreeSearch::builder(board, evaluator, random)
        .with_config(config)
        .build()?
        .search()
}

/// Represents the stages of one simulation.
#[derive(Debug, PartialEq, Clone)]
pub enum MctsAction {
    /// **Selection**: walk from the root to a leaf.
    Selection {
        /// Nodes updated by the previous backpropagation, leaf first.
        backpropagated: Vec<(NodeId, f64)>,
    },
    /// **Expansion and evaluation**: score the leaf, expanding it if the game goes on.
    Evaluation {
        /// The selected leaf.
        leaf: NodeId,
    },
    /// **Backpropagation**: push the leaf's value up to the root.
    Backpropagation {
        leaf: NodeId,
        /// Value from the point of view of the side that moved into `leaf`.
        value: f64,
    },
}

impl MctsAction {
    /// Returns the name of the current MCTS action as a string.
    pub fn get_name(&self) -> &'static str {
        match self {
            MctsAction::Selection { .. } => "Selection",
            MctsAction::Evaluation { .. } => "Evaluation",
            MctsAction::Backpropagation { .. } => "Backpropagation",
        }
    }
}
