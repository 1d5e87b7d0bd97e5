use regex::Regex;

/// Recognizes identifier-shaped tokens (badge/ID numbers) in search text.
/// The shape is deployment-specific, so the recognizer is a seam rather than
/// a fixed pattern.
pub trait IdentifierRecognizer {
	fn is_identifier(&self, token: &str) -> bool;
}

pub struct RegexRecognizer {
	pattern: Regex,
}
impl RegexRecognizer {
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self { pattern: Regex::new(pattern)? })
	}
}
impl IdentifierRecognizer for RegexRecognizer {
	fn is_identifier(&self, token: &str) -> bool {
		self.pattern.is_match(token)
	}
}

/// Splits identifier-shaped tokens out of normalized search text. Returns the
/// remaining name text and the extracted identifiers, both in input order.
pub fn extract(text: &str, recognizer: &dyn IdentifierRecognizer) -> (String, Vec<String>) {
	let mut names = Vec::new();
	let mut identifiers = Vec::new();

	for token in text.split_whitespace() {
		if recognizer.is_identifier(token) {
			if !identifiers.iter().any(|existing| existing == token) {
				identifiers.push(token.to_string());
			}
		} else {
			names.push(token);
		}
	}

	(names.join(" "), identifiers)
}
