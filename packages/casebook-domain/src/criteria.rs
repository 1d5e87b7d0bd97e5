use serde::Serialize;

use crate::{
	identifier::{self, IdentifierRecognizer},
	normalize::normalize,
	tokenize::{self, Term},
};

/// The fully parsed form of one raw search string: normalized text, name
/// terms with their adjacent pairings, and any extracted identifiers. This is
/// what the query builders consume and what the audit log records.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchCriteria {
	pub raw: String,
	/// Normalized name text with identifier tokens removed.
	pub text: String,
	pub terms: Vec<Term>,
	pub pairings: Vec<String>,
	pub identifiers: Vec<String>,
}

impl SearchCriteria {
	pub fn parse(raw: &str, recognizer: &dyn IdentifierRecognizer) -> Self {
		let normalized = normalize(raw);
		let (text, identifiers) = identifier::extract(&normalized, recognizer);
		let parsed = tokenize::tokenize(&text);

		Self {
			raw: raw.to_string(),
			text,
			terms: parsed.terms,
			pairings: parsed.pairings,
			identifiers,
		}
	}

	/// A blank search has nothing to match on and falls back to the
	/// most-recently-added ordering.
	pub fn is_blank(&self) -> bool {
		self.terms.is_empty() && self.identifiers.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::SearchCriteria;
	use crate::identifier::RegexRecognizer;

	fn recognizer() -> RegexRecognizer {
		RegexRecognizer::new(r"^[a-z0-9-]*[0-9][a-z0-9-]*$")
			.expect("Failed to compile identifier pattern.")
	}

	#[test]
	fn parses_names_and_identifiers_together() {
		let criteria = SearchCriteria::parse("Roger E. Hobbes #4281", &recognizer());

		assert_eq!(criteria.text, "roger e hobbes");
		assert_eq!(criteria.identifiers, vec!["4281".to_string()]);
		assert!(criteria.pairings.contains(&"roger e".to_string()));
		assert!(!criteria.is_blank());
	}

	#[test]
	fn blank_and_punctuation_only_queries_are_blank() {
		assert!(SearchCriteria::parse("", &recognizer()).is_blank());
		assert!(SearchCriteria::parse("  --  ", &recognizer()).is_blank());
	}

	#[test]
	fn serializes_for_the_audit_log() {
		let criteria = SearchCriteria::parse("Jill Braaten", &recognizer());
		let value = serde_json::to_value(&criteria).expect("Failed to serialize criteria.");

		assert_eq!(value["text"], "jill braaten");
		assert_eq!(value["terms"][1]["squeezed"], "braten");
	}
}
