use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Canonical search form of a piece of text: lowercased, diacritics folded,
/// apostrophes and periods removed, remaining punctuation mapped to spaces,
/// whitespace runs collapsed.
///
/// The storage layer applies the same folding to stored values at comparison
/// time (`lower`/`unaccent`/`regexp_replace`), so both sides of every match
/// predicate see text in this form.
pub fn normalize(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut pending_space = false;

	for ch in raw.nfd() {
		if is_combining_mark(ch) {
			continue;
		}
		// Apostrophes and periods join rather than split: "O'Connell" and
		// "E." must fold to "oconnell" and "e".
		if matches!(ch, '\'' | '\u{2019}' | '.') {
			continue;
		}

		let ch = ch.to_ascii_lowercase();

		if ch.is_alphanumeric() {
			if pending_space && !out.is_empty() {
				out.push(' ');
			}
			pending_space = false;

			out.push(ch);
		} else {
			pending_space = true;
		}
	}

	out
}

/// Collapses runs of a repeated character to a single occurrence, so a query
/// missing a doubled letter ("Braten") still matches the stored doubled form
/// ("Braaten") once both sides are squeezed.
pub fn squeeze(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut last: Option<char> = None;

	for ch in text.chars() {
		if last == Some(ch) {
			continue;
		}

		last = Some(ch);

		out.push(ch);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::{normalize, squeeze};

	#[test]
	fn lowercases_and_collapses_whitespace() {
		assert_eq!(normalize("  Jill   Braaten "), "jill braaten");
	}

	#[test]
	fn folds_diacritics() {
		assert_eq!(normalize("café"), "cafe");
		assert_eq!(normalize("Hernández"), "hernandez");
	}

	#[test]
	fn removes_apostrophes_and_periods() {
		assert_eq!(normalize("Joe O'Connell"), "joe oconnell");
		assert_eq!(normalize("Joe O\u{2019}Connell"), "joe oconnell");
		assert_eq!(normalize("Roger E. Hobbes"), "roger e hobbes");
	}

	#[test]
	fn maps_hyphens_to_spaces() {
		assert_eq!(normalize("Jane Alreyashi-Watson"), "jane alreyashi watson");
	}

	#[test]
	fn empty_input_yields_empty_output() {
		assert_eq!(normalize(""), "");
		assert_eq!(normalize("  .  "), "");
	}

	#[test]
	fn squeeze_collapses_repeated_letters() {
		assert_eq!(squeeze("braaten"), "braten");
		assert_eq!(squeeze("connell"), "conel");
		assert_eq!(squeeze("abc"), "abc");
	}
}
