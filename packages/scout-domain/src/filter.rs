use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{NormalizedCode, SearchCriteria, geo, set_aside};

/// Definitive contracts, purchase orders, delivery orders, and BPA calls.
pub const CONTRACT_AWARD_TYPES: [&str; 4] = ["A", "B", "C", "D"];

pub const FISCAL_YEARS_SEARCHED: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
	pub start: Date,
	pub end: Date,
}
impl TimeWindow {
	/// The current federal fiscal year and the `years - 1` before it, ending today.
	pub fn trailing_fiscal_years(today: Date, years: i32) -> Self {
		let first_fiscal_year = fiscal_year(today) - (years - 1).max(0);
		let start = Date::from_calendar_date(first_fiscal_year - 1, Month::October, 1)
			.unwrap_or(today);

		Self { start, end: today }
	}

	pub fn start_string(&self) -> String {
		format_date(self.start)
	}

	pub fn end_string(&self) -> String {
		format_date(self.end)
	}
}

/// Structured query against the award search. Each widening step derives a new value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
	pub award_types: Vec<String>,
	pub time_window: TimeWindow,
	pub industry_codes: Option<Vec<String>>,
	pub set_aside_codes: Option<Vec<String>>,
	/// Place-of-performance state codes. `None` searches nationwide.
	pub locations: Option<Vec<String>>,
	pub product_service_code: Option<String>,
}
impl QueryFilter {
	/// Number of simultaneously active industry, set-aside, and location filters.
	pub fn active_filter_count(&self) -> usize {
		[
			self.industry_codes.as_ref().is_some_and(|codes| !codes.is_empty()),
			self.set_aside_codes.as_ref().is_some_and(|codes| !codes.is_empty()),
			self.locations.as_ref().is_some_and(|states| !states.is_empty()),
		]
		.into_iter()
		.filter(|active| *active)
		.count()
	}

	pub fn has_set_aside(&self) -> bool {
		self.set_aside_codes.as_ref().is_some_and(|codes| !codes.is_empty())
	}

	pub fn with_locations(&self, locations: Option<Vec<String>>) -> Self {
		Self { locations, ..self.clone() }
	}

	pub fn with_set_asides(&self, codes: Option<&[&str]>) -> Self {
		Self {
			set_aside_codes: codes.map(|codes| codes.iter().map(|code| code.to_string()).collect()),
			..self.clone()
		}
	}

	/// True when every code in `codes` is already part of the set-aside filter.
	pub fn covers_set_asides(&self, codes: &[&str]) -> bool {
		let current = self.set_aside_codes.as_deref().unwrap_or_default();

		codes.iter().all(|code| current.iter().any(|held| held == code))
	}

	/// Adds `codes` to the set-aside filter, keeping the existing codes first.
	pub fn with_added_set_asides(&self, codes: &[&str]) -> Self {
		let mut merged = self.set_aside_codes.clone().unwrap_or_default();

		for code in codes {
			if !merged.iter().any(|held| held == code) {
				merged.push(code.to_string());
			}
		}

		Self { set_aside_codes: Some(merged), ..self.clone() }
	}
}

/// Federal fiscal years start on 1 October of the previous calendar year.
pub fn fiscal_year(date: Date) -> i32 {
	if date.month() as u8 >= Month::October as u8 { date.year() + 1 } else { date.year() }
}

/// Translates the request into the initial (single-state) award query.
pub fn build_filter(
	criteria: &SearchCriteria,
	industry: Option<&NormalizedCode>,
	today: Date,
) -> QueryFilter {
	let set_asides = set_aside::codes_for(criteria);
	let product_service_code = if industry.is_none() {
		criteria.product_service_code().map(str::to_ascii_uppercase)
	} else {
		None
	};

	QueryFilter {
		award_types: CONTRACT_AWARD_TYPES.iter().map(|code| code.to_string()).collect(),
		time_window: TimeWindow::trailing_fiscal_years(today, FISCAL_YEARS_SEARCHED),
		industry_codes: industry.map(|code| code.leaf_codes.clone()),
		set_aside_codes: (!set_asides.is_empty()).then_some(set_asides),
		locations: criteria
			.zip()
			.and_then(geo::zip_to_state)
			.map(|state| vec![state.to_string()]),
		product_service_code,
	}
}

fn format_date(date: Date) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), date.month() as u8, date.day())
}
