use casebook_config::TierWeights;
use casebook_domain::{SearchCriteria, Term, normalize::squeeze};
use casebook_storage::fold::{escape_like, folded, folded_squeezed};
use sqlx::{Postgres, QueryBuilder};

/// Appends the first-match-wins scoring ladder for one text column. The rungs
/// run from strongest to weakest: the whole query as an equality match, the
/// whole query as a substring, any adjacent-term pairing, every term matching
/// individually, and finally any single multi-letter term. Each rung tests
/// both the folded
/// column and its squeezed variant so doubled letters on either side still
/// match.
///
/// With no terms the ladder collapses to a constant zero; the pairing and
/// all-terms rungs are omitted when they have nothing to test.
pub(crate) fn push_ladder<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	column: &str,
	weights: &TierWeights,
	criteria: &SearchCriteria,
) {
	if criteria.terms.is_empty() {
		builder.push("0::float8");

		return;
	}

	let plain = folded(column);
	let squeezed = folded_squeezed(column);

	builder.push("(CASE WHEN ");
	push_exact(builder, &plain, &squeezed, &criteria.text);
	builder.push(" THEN ");
	builder.push_bind(weights.exact);
	builder.push(" WHEN ");
	push_contains(builder, &plain, &squeezed, &criteria.text);
	builder.push(" THEN ");
	builder.push_bind(weights.phrase);

	if !criteria.pairings.is_empty() {
		builder.push(" WHEN (");

		for (index, pairing) in criteria.pairings.iter().enumerate() {
			if index > 0 {
				builder.push(" OR ");
			}

			push_contains(builder, &plain, &squeezed, pairing);
		}

		builder.push(") THEN ");
		builder.push_bind(weights.pairing);
	}
	if criteria.terms.len() > 1 {
		builder.push(" WHEN (");

		for (index, term) in criteria.terms.iter().enumerate() {
			if index > 0 {
				builder.push(" AND ");
			}

			push_term(builder, &plain, &squeezed, term);
		}

		builder.push(") THEN ");
		builder.push_bind(weights.all_terms);
	}

	// Initials stay out of the weak fallback; a lone "o" would otherwise match
	// every name containing the letter. They still count in the pairing and
	// all-terms rungs above.
	let weak: Vec<&Term> =
		criteria.terms.iter().filter(|term| term.text.chars().count() > 1).collect();
	let weak: Vec<&Term> =
		if weak.is_empty() { criteria.terms.iter().collect() } else { weak };

	builder.push(" WHEN (");

	for (index, term) in weak.iter().enumerate() {
		if index > 0 {
			builder.push(" OR ");
		}

		push_term(builder, &plain, &squeezed, term);
	}

	builder.push(") THEN ");
	builder.push_bind(weights.term);
	builder.push(" ELSE 0::float8 END)");
}

fn push_exact<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	plain: &str,
	squeezed: &str,
	text: &str,
) {
	builder.push("(").push(plain).push(" = ");
	builder.push_bind(text.to_string());
	builder.push(" OR ").push(squeezed).push(" = ");
	builder.push_bind(squeeze(text));
	builder.push(")");
}

fn push_contains<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	plain: &str,
	squeezed: &str,
	text: &str,
) {
	builder.push("(").push(plain).push(" LIKE '%' || ");
	builder.push_bind(escape_like(text));
	builder.push(" || '%' OR ").push(squeezed).push(" LIKE '%' || ");
	builder.push_bind(escape_like(&squeeze(text)));
	builder.push(" || '%')");
}

fn push_term<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	plain: &str,
	squeezed: &str,
	term: &Term,
) {
	builder.push("(").push(plain).push(" LIKE '%' || ");
	builder.push_bind(escape_like(&term.text));
	builder.push(" || '%' OR ").push(squeezed).push(" LIKE '%' || ");
	builder.push_bind(escape_like(&term.squeezed));
	builder.push(" || '%')");
}

#[cfg(test)]
mod tests {
	use casebook_config::TierWeights;
	use casebook_domain::{RegexRecognizer, SearchCriteria};
	use sqlx::{Postgres, QueryBuilder};

	use super::push_ladder;

	fn criteria(raw: &str) -> SearchCriteria {
		let recognizer = RegexRecognizer::new(r"^[a-z0-9-]*[0-9][a-z0-9-]*$")
			.expect("Failed to compile identifier pattern.");

		SearchCriteria::parse(raw, &recognizer)
	}

	fn rendered(raw: &str) -> String {
		let mut builder = QueryBuilder::<Postgres>::new("");

		push_ladder(&mut builder, "p.name", &TierWeights::default(), &criteria(raw));

		builder.sql().to_string()
	}

	#[test]
	fn empty_criteria_scores_zero() {
		assert_eq!(rendered(""), "0::float8");
		assert_eq!(rendered("4281"), "0::float8", "identifier-only queries have no name terms");
	}

	#[test]
	fn full_query_builds_every_rung_in_strength_order() {
		let sql = rendered("roger hobbes");

		let exact = sql.find(" = $1").expect("exact rung");
		let all_terms = sql.find(" AND ").expect("all-terms rung");
		let fallback = sql.rfind(" OR ").expect("single-term rung");

		assert!(exact < all_terms && all_terms < fallback);
		assert!(sql.contains("unaccent(p.name)"));
		assert!(sql.ends_with("ELSE 0::float8 END)"));
	}

	#[test]
	fn single_term_query_skips_pairing_and_all_terms_rungs() {
		let sql = rendered("hobbes");

		assert!(!sql.contains(" AND "));
		// exact, phrase, term weights plus their match binds.
		assert_eq!(sql.matches("THEN").count(), 3);
	}

	#[test]
	fn initials_stay_out_of_the_weak_fallback_rung() {
		let sql = rendered("o connell");
		let start = sql.rfind(" WHEN (").expect("fallback rung");
		let tail = &sql[start..];

		// One term, two folded forms. The "o" only participates via pairings.
		assert_eq!(tail.matches("LIKE").count(), 2);
	}

	#[test]
	fn pairings_are_tested_against_the_squeezed_column_too() {
		let sql = rendered("joe o connell");

		assert!(sql.contains(r"'(.)\1+'"));
	}
}
