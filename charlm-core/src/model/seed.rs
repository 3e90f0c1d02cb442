use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Deserialize;

use crate::error::ModelError;

/// Seed used by `SeedMode::fixed_default`, the historical reproducible run.
pub const DEFAULT_SEED: u64 = 20;

/// How a model's random generator is seeded.
///
/// # Variants
/// - `Fixed(u64)`: reproducible runs, the same seed yields the same text.
/// - `Random`: a fresh seed is drawn when the model is built.
///
/// Parses from `"random"`, `"fixed"` (uses [`DEFAULT_SEED`]), `"fixed:<n>"`
/// or a bare integer.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum SeedMode {
	Fixed(u64),
	#[default]
	Random,
}

impl SeedMode {
	pub fn fixed_default() -> Self {
		SeedMode::Fixed(DEFAULT_SEED)
	}

	/// Resolves the mode to a concrete seed value.
	pub(crate) fn resolve(self) -> u64 {
		match self {
			SeedMode::Fixed(seed) => seed,
			SeedMode::Random => rand::rng().random(),
		}
	}
}

impl FromStr for SeedMode {
	type Err = ModelError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let value = s.trim().to_lowercase();
		match value.as_str() {
			"random" => Ok(SeedMode::Random),
			"fixed" => Ok(SeedMode::fixed_default()),
			_ => {
				let number = value.strip_prefix("fixed:").unwrap_or(&value);
				number
					.parse::<u64>()
					.map(SeedMode::Fixed)
					.map_err(|_| ModelError::InvalidSeedMode(s.to_owned()))
			}
		}
	}
}

impl TryFrom<String> for SeedMode {
	type Error = ModelError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl fmt::Display for SeedMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SeedMode::Fixed(seed) => write!(f, "fixed:{}", seed),
			SeedMode::Random => write!(f, "random"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_all_forms() {
		assert_eq!("random".parse::<SeedMode>().unwrap(), SeedMode::Random);
		assert_eq!("RANDOM".parse::<SeedMode>().unwrap(), SeedMode::Random);
		assert_eq!("fixed".parse::<SeedMode>().unwrap(), SeedMode::Fixed(DEFAULT_SEED));
		assert_eq!("fixed:7".parse::<SeedMode>().unwrap(), SeedMode::Fixed(7));
		assert_eq!("42".parse::<SeedMode>().unwrap(), SeedMode::Fixed(42));
	}

	#[test]
	fn rejects_garbage() {
		assert!(matches!("sometimes".parse::<SeedMode>(), Err(ModelError::InvalidSeedMode(_))));
		assert!(matches!("fixed:".parse::<SeedMode>(), Err(ModelError::InvalidSeedMode(_))));
		assert!(matches!("-3".parse::<SeedMode>(), Err(ModelError::InvalidSeedMode(_))));
	}

	#[test]
	fn display_parses_back() {
		let mode = SeedMode::Fixed(99);
		assert_eq!(mode.to_string().parse::<SeedMode>().unwrap(), mode);
	}

	#[test]
	fn fixed_resolves_to_itself() {
		assert_eq!(SeedMode::Fixed(5).resolve(), 5);
	}
}
