use sqlx::{Postgres, QueryBuilder};

/// The confidentiality-relevant facts about the caller. Everything the row
/// filters need is carried here; the service never consults a session.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct AccessPrincipal {
	#[serde(default)]
	pub is_administrator: bool,
	#[serde(default)]
	pub is_superuser: bool,
	#[serde(default)]
	pub is_host: bool,
	#[serde(default)]
	pub organization_id: Option<i64>,
}

/// Names the tables and columns one entity kind uses for confidentiality
/// filtering, so the same predicate builder serves persons and groupings.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VisibilityTarget {
	/// Alias of the entity row in the enclosing query, e.g. `p`.
	pub(crate) alias: &'static str,
	pub(crate) access_table: &'static str,
	pub(crate) key_column: &'static str,
}

pub(crate) const PERSON_VISIBILITY: VisibilityTarget = VisibilityTarget {
	alias: "p",
	access_table: "person_access_orgs",
	key_column: "person_id",
};

pub(crate) const GROUPING_VISIBILITY: VisibilityTarget = VisibilityTarget {
	alias: "g",
	access_table: "grouping_access_orgs",
	key_column: "grouping_id",
};

/// Appends the row-visibility predicate for `target` as seen by `principal`.
/// Superusers see everything. Everyone else is gated by the `admin_only` and
/// `host_only` flags and by the per-organization restriction rows; a caller
/// who is both an administrator and a host bypasses organization restrictions
/// but not the flags they lack.
pub(crate) fn push_visibility<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	principal: &AccessPrincipal,
	target: VisibilityTarget,
) {
	if principal.is_superuser {
		builder.push("TRUE");

		return;
	}

	let VisibilityTarget { alias, access_table, key_column } = target;
	let mut first = true;

	if !principal.is_administrator {
		builder.push(format!("NOT {alias}.admin_only"));

		first = false;
	}
	if !principal.is_host {
		if !first {
			builder.push(" AND ");
		}

		builder.push(format!("NOT {alias}.host_only"));

		first = false;
	}
	if !(principal.is_administrator && principal.is_host) {
		if !first {
			builder.push(" AND ");
		}

		let unrestricted = format!(
			"NOT EXISTS (SELECT 1 FROM {access_table} ar WHERE ar.{key_column} = {alias}.{key_column})"
		);

		match principal.organization_id {
			Some(organization_id) => {
				builder.push("(").push(unrestricted).push(
					format!(
						" OR EXISTS (SELECT 1 FROM {access_table} ar WHERE ar.{key_column} = {alias}.{key_column} AND ar.organization_id = "
					),
				);
				builder.push_bind(organization_id);
				builder.push("))");
			},
			None => {
				builder.push(unrestricted);
			},
		}

		first = false;
	}
	if first {
		builder.push("TRUE");
	}
}

#[cfg(test)]
mod tests {
	use sqlx::{Postgres, QueryBuilder};

	use super::{AccessPrincipal, PERSON_VISIBILITY, push_visibility};

	fn rendered(principal: &AccessPrincipal) -> String {
		let mut builder = QueryBuilder::<Postgres>::new("");

		push_visibility(&mut builder, principal, PERSON_VISIBILITY);

		builder.sql().to_string()
	}

	#[test]
	fn superuser_sees_everything() {
		let principal = AccessPrincipal { is_superuser: true, ..Default::default() };

		assert_eq!(rendered(&principal), "TRUE");
	}

	#[test]
	fn plain_member_is_gated_on_both_flags_and_restrictions() {
		let sql = rendered(&AccessPrincipal::default());

		assert!(sql.contains("NOT p.admin_only"));
		assert!(sql.contains("NOT p.host_only"));
		assert!(sql.contains("NOT EXISTS (SELECT 1 FROM person_access_orgs"));
		assert!(!sql.contains("organization_id ="), "no org arm without an organization");
	}

	#[test]
	fn organization_member_gets_the_membership_arm() {
		let principal = AccessPrincipal { organization_id: Some(7), ..Default::default() };
		let sql = rendered(&principal);

		assert!(sql.contains("ar.organization_id = $1"));
	}

	#[test]
	fn administrator_skips_only_the_admin_flag() {
		let principal = AccessPrincipal { is_administrator: true, ..Default::default() };
		let sql = rendered(&principal);

		assert!(!sql.contains("admin_only"));
		assert!(sql.contains("NOT p.host_only"));
		assert!(sql.contains("NOT EXISTS"));
	}

	#[test]
	fn administrator_host_bypasses_org_restrictions_but_not_superuser() {
		let principal =
			AccessPrincipal { is_administrator: true, is_host: true, ..Default::default() };

		assert_eq!(rendered(&principal), "TRUE");
	}
}
