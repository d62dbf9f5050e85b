use serde::{Deserialize, Serialize};

/// One award row as returned by an upstream source. Amounts are whole cents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRecord {
	pub award_id: Option<String>,
	pub awarding_agency: String,
	pub awarding_sub_agency: Option<String>,
	pub awarding_office: Option<String>,
	pub agency_slug: Option<String>,
	pub agency_id: Option<String>,
	pub agency_code: Option<String>,
	pub sub_agency_code: Option<String>,
	pub place_of_performance_state: Option<String>,
	pub amount_cents: i64,
	pub set_aside_type: Option<String>,
	pub offers_received: Option<u32>,
}

/// Rounds a dollar amount to whole cents. Non-finite input counts as zero.
pub fn dollars_to_cents(amount: f64) -> i64 {
	if amount.is_finite() { (amount * 100.0).round() as i64 } else { 0 }
}

pub fn cents_to_dollars(cents: i64) -> f64 {
	cents as f64 / 100.0
}
