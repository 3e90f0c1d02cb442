//! Character-level sliding-window language model.
//!
//! This crate provides:
//! - A frequency list per context window (`FrequencyList`)
//! - A language model that learns window statistics from a corpus and
//!   samples new text from them (`LanguageModel`)
//! - Seeding control for reproducible or random generation (`SeedMode`)
//! - Corpus loading helpers
//!
//! ```
//! use charlm_core::model::language_model::LanguageModel;
//! use charlm_core::model::seed::SeedMode;
//!
//! let mut model = LanguageModel::new(2, SeedMode::Fixed(20)).unwrap();
//! model.train("ababab");
//! assert_eq!(model.generate("ab", 6).unwrap(), "ababab");
//! ```

/// Frequency lists, the language model and its seeding.
pub mod model;

/// Crate error type.
pub mod error;

/// I/O utilities (corpus loading, directory listing).
pub mod io;

pub use error::{ModelError, Result};
pub use model::frequency_list::{CharRecord, FrequencyList};
pub use model::language_model::LanguageModel;
pub use model::seed::{SeedMode, DEFAULT_SEED};
