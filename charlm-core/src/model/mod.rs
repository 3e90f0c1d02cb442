//! Top-level module for the sliding-window language model.
//!
//! - Per-window character distributions (`FrequencyList`)
//! - The window → distribution mapping, training and generation (`LanguageModel`)
//! - Random generator seeding (`SeedMode`)

/// Ordered per-window character statistics.
///
/// Accumulates occurrence counts during training, then computes probability
/// and cumulative probability for Monte Carlo sampling.
pub mod frequency_list;

/// Window length, window → frequency list mapping, training and generation.
pub mod language_model;

/// Fixed or random seeding of a model's generator.
pub mod seed;
