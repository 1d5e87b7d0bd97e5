pub mod access;
pub mod search;

pub use access::AccessPrincipal;
pub use search::{
	GroupingRow, PageRequest, PersonRow, SearchPage, SearchRequest, search_groupings,
	search_persons,
};

use casebook_config::Config;
use casebook_domain::RegexRecognizer;
use casebook_storage::db::Db;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
	/// The caller sent something unusable (bad pagination, mostly). Raised
	/// before any storage round trip.
	InvalidArgument { message: String },
	/// The backing store could not be reached. Retryable from the caller's
	/// point of view.
	StorageUnavailable { message: String },
	/// Anything else that went wrong while running a search.
	SearchFailed { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidArgument { message } => write!(f, "Invalid argument: {message}"),
			Self::StorageUnavailable { message } => write!(f, "Storage unavailable: {message}"),
			Self::SearchFailed { message } => write!(f, "Search failed: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		match err {
			sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) =>
				Self::StorageUnavailable { message: err.to_string() },
			_ => Self::SearchFailed { message: err.to_string() },
		}
	}
}

impl From<casebook_storage::Error> for ServiceError {
	fn from(err: casebook_storage::Error) -> Self {
		match err {
			casebook_storage::Error::Sqlx(err) => Self::from(err),
		}
	}
}

pub struct CasebookService {
	pub cfg: Config,
	pub db: Db,
	recognizer: RegexRecognizer,
}

impl CasebookService {
	pub fn new(cfg: Config, db: Db) -> ServiceResult<Self> {
		let recognizer = RegexRecognizer::new(&cfg.search.identifier_pattern).map_err(|err| {
			ServiceError::InvalidArgument {
				message: format!("Identifier pattern does not compile: {err}."),
			}
		})?;

		Ok(Self { cfg, db, recognizer })
	}

	/// Connects to Postgres, bootstraps the schema, and returns a ready
	/// service.
	pub async fn connect(cfg: Config) -> ServiceResult<Self> {
		let db = Db::connect(&cfg.storage.postgres)
			.await
			.map_err(|err| ServiceError::StorageUnavailable { message: err.to_string() })?;

		db.ensure_schema().await?;

		Self::new(cfg, db)
	}

	pub(crate) fn recognizer(&self) -> &RegexRecognizer {
		&self.recognizer
	}
}

#[cfg(test)]
mod tests {
	use super::ServiceError;

	#[test]
	fn pool_exhaustion_maps_to_storage_unavailable() {
		let err = ServiceError::from(sqlx::Error::PoolTimedOut);

		assert!(matches!(err, ServiceError::StorageUnavailable { .. }));
	}

	#[test]
	fn storage_errors_reuse_the_sqlx_mapping() {
		let err = ServiceError::from(casebook_storage::Error::Sqlx(sqlx::Error::RowNotFound));

		assert!(matches!(err, ServiceError::SearchFailed { .. }));
	}
}
