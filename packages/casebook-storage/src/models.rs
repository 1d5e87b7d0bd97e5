use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct Person {
	pub person_id: i64,
	pub name: String,
	pub is_law_enforcement: bool,
	pub admin_only: bool,
	pub host_only: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PersonAlias {
	pub alias_id: i64,
	pub person_id: i64,
	pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PersonIdentifier {
	pub identifier_id: i64,
	pub person_id: i64,
	pub identifier: String,
	pub identifier_type: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PersonTitle {
	pub person_title_id: i64,
	pub person_id: i64,
	pub title_id: i64,
	pub start_year: i16,
	pub start_month: i16,
	pub start_day: i16,
	pub end_year: i16,
	pub end_month: i16,
	pub end_day: i16,
	pub at_least_since: bool,
}
impl PersonTitle {
	/// A title is current when every end-date component is unset.
	pub fn is_current(&self) -> bool {
		self.end_year == 0 && self.end_month == 0 && self.end_day == 0
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct Grouping {
	pub grouping_id: i64,
	pub name: String,
	pub is_law_enforcement: bool,
	pub admin_only: bool,
	pub host_only: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GroupingAlias {
	pub alias_id: i64,
	pub grouping_id: i64,
	pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PersonGrouping {
	pub person_grouping_id: i64,
	pub person_id: i64,
	pub grouping_id: i64,
	pub r#type: String,
	pub start_year: i16,
	pub start_month: i16,
	pub start_day: i16,
	pub end_year: i16,
	pub end_month: i16,
	pub end_day: i16,
	pub at_least_since: bool,
}
impl PersonGrouping {
	pub fn is_current(&self) -> bool {
		self.end_year == 0 && self.end_month == 0 && self.end_day == 0
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct County {
	pub county_id: i64,
	pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Title {
	pub title_id: i64,
	pub name: String,
}

#[cfg(test)]
mod tests {
	use super::PersonTitle;

	fn title(end_year: i16, end_month: i16, end_day: i16) -> PersonTitle {
		PersonTitle {
			person_title_id: 1,
			person_id: 1,
			title_id: 1,
			start_year: 2019,
			start_month: 3,
			start_day: 0,
			end_year,
			end_month,
			end_day,
			at_least_since: false,
		}
	}

	#[test]
	fn title_with_no_end_components_is_current() {
		assert!(title(0, 0, 0).is_current());
	}

	#[test]
	fn any_end_component_makes_a_title_historical() {
		assert!(!title(2021, 0, 0).is_current());
		assert!(!title(0, 6, 0).is_current());
		assert!(!title(0, 0, 12).is_current());
	}
}
