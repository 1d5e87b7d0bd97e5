pub mod criteria;
pub mod identifier;
pub mod normalize;
pub mod tokenize;

pub use criteria::SearchCriteria;
pub use identifier::{IdentifierRecognizer, RegexRecognizer};
pub use tokenize::{SearchTerms, Term};
