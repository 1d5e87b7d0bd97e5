use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Page size applied when a request does not specify a limit.
	pub default_limit: i64,
	/// Hard cap on the page size a caller may request.
	pub max_limit: i64,
	/// Regex recognizing identifier-shaped tokens in the search text. Tokens
	/// matching it are matched against person identifiers instead of names.
	pub identifier_pattern: String,
	pub weights: Weights,
}

/// Score weights for each scorable source. Validation enforces the relative
/// ordering the ranking depends on: primary name above primary alias, above
/// related-entity name, above related-entity alias, above identifier, above
/// the county bonus.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Weights {
	pub primary_name: TierWeights,
	pub primary_alias: TierWeights,
	pub secondary_name: TierWeights,
	pub secondary_alias: TierWeights,
	pub identifier_exact: f64,
	pub identifier_partial: f64,
	pub county_bonus: f64,
}

/// Weights for the first-match-wins ladder within one source. `exact` is a
/// whole-query equality match, `phrase` a whole-query substring match,
/// `pairing` an adjacent-term pairing match, `all_terms` every term matching
/// individually, and `term` the weak single-term fallback.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TierWeights {
	pub exact: f64,
	pub phrase: f64,
	pub pairing: f64,
	pub all_terms: f64,
	pub term: f64,
}

impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: 25,
			max_limit: 100,
			identifier_pattern: default_identifier_pattern(),
			weights: Weights::default(),
		}
	}
}

impl Default for Weights {
	fn default() -> Self {
		Self {
			primary_name: TierWeights {
				exact: 36.0,
				phrase: 30.0,
				pairing: 24.0,
				all_terms: 16.0,
				term: 10.0,
			},
			primary_alias: TierWeights {
				exact: 18.0,
				phrase: 15.0,
				pairing: 12.0,
				all_terms: 8.0,
				term: 5.0,
			},
			secondary_name: TierWeights {
				exact: 8.0,
				phrase: 7.0,
				pairing: 6.0,
				all_terms: 4.0,
				term: 3.0,
			},
			secondary_alias: TierWeights {
				exact: 4.0,
				phrase: 3.5,
				pairing: 3.0,
				all_terms: 2.5,
				term: 2.0,
			},
			identifier_exact: 1.5,
			identifier_partial: 1.0,
			county_bonus: 0.5,
		}
	}
}

impl Default for TierWeights {
	fn default() -> Self {
		Self { exact: 5.0, phrase: 4.0, pairing: 3.0, all_terms: 2.0, term: 1.0 }
	}
}

pub(crate) fn default_identifier_pattern() -> String {
	// Alphanumeric tokens carrying at least one digit, e.g. badge numbers.
	r"^[a-z0-9-]*[0-9][a-z0-9-]*$".to_string()
}
