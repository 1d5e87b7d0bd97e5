use casebook_config::Postgres;
use casebook_storage::{db::Db, queries};
use casebook_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASEBOOK_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = casebook_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set CASEBOOK_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	// Bootstrapping twice must be a no-op.
	db.ensure_schema().await.expect("Failed to re-ensure schema.");

	for table in ["persons", "person_aliases", "groupings", "search_log"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Expected table {table} to exist.");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASEBOOK_PG_DSN to run."]
async fn seed_helpers_round_trip() {
	let Some(base_dsn) = casebook_testkit::env_dsn() else {
		eprintln!("Skipping seed_helpers_round_trip; set CASEBOOK_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let person_id = queries::insert_person(&db, "Jill Braaten", true, false, false)
		.await
		.expect("Failed to insert person.");

	queries::insert_person_alias(&db, person_id, "JB").await.expect("Failed to insert alias.");
	queries::insert_person_identifier(&db, person_id, "4281", "badge")
		.await
		.expect("Failed to insert identifier.");

	let grouping_id = queries::insert_grouping(&db, "Precinct 9", true, false, false)
		.await
		.expect("Failed to insert grouping.");

	queries::insert_person_grouping(&db, person_id, grouping_id, "command", Default::default())
		.await
		.expect("Failed to link person to grouping.");

	let aliases: i64 = sqlx::query_scalar("SELECT count(*) FROM person_aliases")
		.fetch_one(&db.pool)
		.await
		.expect("Failed to count aliases.");

	assert_eq!(aliases, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
