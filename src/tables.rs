//! Font table parsing.

/// Structures shared by Apple Advanced Typography tables.
pub mod aat;
pub mod kerx;
