//! Contains implementations of the `Board` trait.

/// A `Board` implementation for 3x3 Hexapawn.
pub mod hexapawn;
/// The policy-index layout for Hexapawn moves.
pub mod hexapawn_actions;
