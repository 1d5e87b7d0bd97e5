use serde::Serialize;

use crate::normalize::squeeze;

/// One search term together with its squeezed (repeated-letter-collapsed)
/// variant. Both forms are tested by the match predicates.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Term {
	pub text: String,
	pub squeezed: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SearchTerms {
	pub terms: Vec<Term>,
	/// Adjacent-term concatenations, in query order. Single-letter terms are
	/// initials and additionally pair tightly with their neighbor ("o" +
	/// "connell" also yields "oconnell").
	pub pairings: Vec<String>,
}

pub fn tokenize(normalized: &str) -> SearchTerms {
	let words: Vec<&str> = normalized.split_whitespace().collect();
	let mut terms = Vec::with_capacity(words.len());

	for word in &words {
		let term = Term { text: (*word).to_string(), squeezed: squeeze(word) };

		if !terms.contains(&term) {
			terms.push(term);
		}
	}

	let mut pairings = Vec::new();

	for pair in words.windows(2) {
		let [left, right] = pair else {
			continue;
		};

		push_unique(&mut pairings, format!("{left} {right}"));

		if is_initial(left) || is_initial(right) {
			push_unique(&mut pairings, format!("{left}{right}"));
		}
	}

	SearchTerms { terms, pairings }
}

fn is_initial(word: &str) -> bool {
	word.chars().count() == 1
}

fn push_unique(out: &mut Vec<String>, value: String) {
	if !out.contains(&value) {
		out.push(value);
	}
}
