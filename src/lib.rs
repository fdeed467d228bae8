//! Training-data generation for Hexapawn in the AlphaZero style.
//!
//! Two producers fill the same [`dataset::Dataset`] of
//! `(encoded position, move distribution, value)` examples:
//!
//! * [`negamax`] walks the whole game tree and labels every position with
//!   its exact result and best move.
//! * [`self_play`] plays games with a fresh Monte Carlo tree search per move,
//!   guided by a policy/value [`evaluator::Evaluator`].
//!
//! # Example
//!
//! ```rust
//! use hexapawn_zero::boards::hexapawn::HexapawnBoard;
//! use hexapawn_zero::boards::hexapawn_actions::ACTION_COUNT;
//! use hexapawn_zero::config::MctsConfig;
//! use hexapawn_zero::evaluator::UniformEvaluator;
//! use hexapawn_zero::mcts::MonteCarloTreeSearch;
//! use hexapawn_zero::random::CustomNumberGenerator;
//!
//! let evaluator = UniformEvaluator::new(ACTION_COUNT);
//!
//! // Search the opening position
//! let mut mcts = MonteCarloTreeSearch::builder(
//!     HexapawnBoard::starting(),
//!     &evaluator,
//!     CustomNumberGenerator::default(),
//! )
//! .with_config(MctsConfig::default().with_simulations(200))
//! .build()
//! .unwrap();
//!
//! let policy = mcts.search().unwrap();
//! for entry in &policy {
//!     println!("{:?}: {:.2} ({} visits)", entry.mv, entry.probability, entry.visits);
//! }
//! ```

/// Random games against an evaluator's greedy policy.
pub mod arena;
/// Contains the `Board` trait and related types that define the interface for a game.
pub mod board;
/// Contains the Hexapawn implementation of the `Board` trait.
pub mod boards;
pub mod config;
/// Parallel columns of training examples.
pub mod dataset;
/// Policy/value oracles used to guide the search.
pub mod evaluator;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` and `Edge` types stored in the search tree.
pub mod mcts_node;
pub mod negamax;
/// Contains traits and implementations for random number generation.
pub mod random;
pub mod self_play;
