//! SQL text-folding expressions. These mirror `casebook_domain::normalize`
//! exactly: stored values are folded at comparison time into the same
//! canonical form the query text is parsed into, so neither side of a match
//! predicate sees accents, apostrophes, periods, or punctuation separators.

/// Folded form of a column: lowercased, diacritics removed via `unaccent`,
/// apostrophes and periods stripped, remaining non-alphanumeric runs mapped
/// to single spaces, trimmed.
pub fn folded(column: &str) -> String {
	format!(
		"btrim(regexp_replace(regexp_replace(lower(unaccent({column})), '[''\u{2019}.]', '', 'g'), '[^a-z0-9]+', ' ', 'g'))"
	)
}

/// Folded form with repeated-character runs collapsed, the SQL counterpart
/// of `casebook_domain::normalize::squeeze`.
pub fn folded_squeezed(column: &str) -> String {
	format!("regexp_replace({}, '(.)\\1+', '\\1', 'g')", folded(column))
}

/// Escapes LIKE metacharacters in a bound term so user text is always matched
/// literally. Callers wrap the result in `%` themselves.
pub fn escape_like(term: &str) -> String {
	let mut out = String::with_capacity(term.len());

	for ch in term.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
