mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Search, Service, Storage, TierWeights, Weights};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Invalid {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Invalid {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Invalid {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit <= 0 {
		return Err(Error::Invalid {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit < cfg.search.default_limit {
		return Err(Error::Invalid {
			message: "search.max_limit must be at least search.default_limit.".to_string(),
		});
	}
	if let Err(err) = regex::Regex::new(&cfg.search.identifier_pattern) {
		return Err(Error::Invalid {
			message: format!("search.identifier_pattern is not a valid regex: {err}."),
		});
	}

	validate_weights(&cfg.search.weights)?;

	Ok(())
}

fn validate_weights(weights: &Weights) -> Result<()> {
	for (label, tier) in [
		("primary_name", &weights.primary_name),
		("primary_alias", &weights.primary_alias),
		("secondary_name", &weights.secondary_name),
		("secondary_alias", &weights.secondary_alias),
	] {
		validate_tier(label, tier)?;
	}

	// Sources must stay in rank order so a weaker source can never present a
	// stronger top score than the source above it.
	let ladder = [
		("primary_name", weights.primary_name.exact),
		("primary_alias", weights.primary_alias.exact),
		("secondary_name", weights.secondary_name.exact),
		("secondary_alias", weights.secondary_alias.exact),
		("identifier_exact", weights.identifier_exact),
		("identifier_partial", weights.identifier_partial),
		("county_bonus", weights.county_bonus),
	];

	for pair in ladder.windows(2) {
		let [(upper_label, upper), (lower_label, lower)] = pair else {
			continue;
		};

		if lower > upper {
			return Err(Error::Invalid {
				message: format!(
					"search.weights.{lower_label} must not exceed search.weights.{upper_label}."
				),
			});
		}
	}
	if weights.county_bonus <= 0.0 {
		return Err(Error::Invalid {
			message: "search.weights.county_bonus must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_tier(label: &str, tier: &TierWeights) -> Result<()> {
	let rungs = [
		("exact", tier.exact),
		("phrase", tier.phrase),
		("pairing", tier.pairing),
		("all_terms", tier.all_terms),
		("term", tier.term),
	];

	for (rung_label, value) in rungs {
		if !value.is_finite() {
			return Err(Error::Invalid {
				message: format!("search.weights.{label}.{rung_label} must be a finite number."),
			});
		}
		if value <= 0.0 {
			return Err(Error::Invalid {
				message: format!("search.weights.{label}.{rung_label} must be greater than zero."),
			});
		}
	}
	for pair in rungs.windows(2) {
		let [(upper_label, upper), (lower_label, lower)] = pair else {
			continue;
		};

		if lower > upper {
			return Err(Error::Invalid {
				message: format!(
					"search.weights.{label}.{lower_label} must not exceed search.weights.{label}.{upper_label}."
				),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.search.identifier_pattern.trim().is_empty() {
		cfg.search.identifier_pattern = types::default_identifier_pattern();
	}
}
