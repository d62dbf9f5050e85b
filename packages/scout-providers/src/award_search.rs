use serde_json::{Value, json};

use crate::{Error, Result};
use scout_config::AwardSearchProviderConfig;
use scout_domain::{AwardRecord, QueryFilter, award};

const FIELDS: &[&str] = &[
	"Award ID",
	"Award Amount",
	"Awarding Agency",
	"Awarding Sub Agency",
	"Awarding Office",
	"Awarding Agency Code",
	"Awarding Sub Agency Code",
	"awarding_agency_id",
	"agency_slug",
	"Place of Performance State Code",
	"Type of Set Aside",
	"Number of Offers Received",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AwardPage {
	pub records: Vec<AwardRecord>,
	pub has_next: bool,
}

/// Fetches one page (1-based) of awards matching `filter`.
pub async fn search_page(
	cfg: &AwardSearchProviderConfig,
	filter: &QueryFilter,
	page: u32,
) -> Result<AwardPage> {
	let client = crate::client(cfg.timeout_ms, &cfg.default_headers)?;
	let url = format!("{}{}", cfg.api_base, cfg.search_path);
	let res = client.post(url).json(&search_body(filter, page, cfg.page_size)).send().await?;

	if !res.status().is_success() {
		return Err(Error::Status { status: res.status().as_u16() });
	}

	let json: Value = res.json().await?;

	parse_search_response(&json)
}

/// Estimated number of contract awards matching `filter`.
pub async fn count(cfg: &AwardSearchProviderConfig, filter: &QueryFilter) -> Result<u64> {
	let client = crate::client(cfg.timeout_ms, &cfg.default_headers)?;
	let url = format!("{}{}", cfg.api_base, cfg.count_path);
	let res = client.post(url).json(&json!({ "filters": filters_json(filter) })).send().await?;

	if !res.status().is_success() {
		return Err(Error::Status { status: res.status().as_u16() });
	}

	let json: Value = res.json().await?;

	parse_count_response(&json)
}

pub fn search_body(filter: &QueryFilter, page: u32, limit: u32) -> Value {
	json!({
		"filters": filters_json(filter),
		"fields": FIELDS,
		"page": page,
		"limit": limit,
		"sort": "Award Amount",
		"order": "desc",
		"subawards": false,
	})
}

pub fn filters_json(filter: &QueryFilter) -> Value {
	let mut filters = json!({
		"award_type_codes": filter.award_types,
		"time_period": [{
			"start_date": filter.time_window.start_string(),
			"end_date": filter.time_window.end_string(),
		}],
	});

	if let Some(codes) = filter.industry_codes.as_ref().filter(|codes| !codes.is_empty()) {
		filters["naics_codes"] = json!({ "require": codes });
	}
	if let Some(codes) = filter.set_aside_codes.as_ref().filter(|codes| !codes.is_empty()) {
		filters["set_aside_type_codes"] = json!(codes);
	}
	if let Some(states) = filter.locations.as_ref().filter(|states| !states.is_empty()) {
		filters["place_of_performance_locations"] = states
			.iter()
			.map(|state| json!({ "country": "USA", "state": state }))
			.collect::<Vec<_>>()
			.into();
	}
	if let Some(code) = filter.product_service_code.as_ref() {
		filters["psc_codes"] = json!({ "require": [[code]] });
	}

	filters
}

pub fn parse_search_response(json: &Value) -> Result<AwardPage> {
	let results = json.get("results").and_then(Value::as_array).ok_or_else(|| {
		Error::InvalidResponse { message: "Award search response is missing results array.".to_string() }
	})?;
	let records = results.iter().map(parse_record).collect::<Result<Vec<_>>>()?;
	let has_next = json
		.get("page_metadata")
		.and_then(|meta| meta.get("hasNext"))
		.and_then(Value::as_bool)
		.unwrap_or(false);

	Ok(AwardPage { records, has_next })
}

pub fn parse_count_response(json: &Value) -> Result<u64> {
	let results = json.get("results").ok_or_else(|| Error::InvalidResponse {
		message: "Award count response is missing results.".to_string(),
	})?;

	results.get("contracts").and_then(Value::as_u64).ok_or_else(|| Error::InvalidResponse {
		message: "Award count response is missing a contracts count.".to_string(),
	})
}

fn parse_record(item: &Value) -> Result<AwardRecord> {
	if !item.is_object() {
		return Err(Error::InvalidResponse {
			message: "Award search result must be an object.".to_string(),
		});
	}

	let amount = item.get("Award Amount").map(number_field).unwrap_or(Some(0.0)).ok_or_else(|| {
		Error::InvalidResponse { message: "Award Amount must be numeric.".to_string() }
	})?;

	Ok(AwardRecord {
		award_id: text_field(item, "Award ID"),
		awarding_agency: text_field(item, "Awarding Agency")
			.unwrap_or_else(|| "Unknown Agency".to_string()),
		awarding_sub_agency: text_field(item, "Awarding Sub Agency"),
		awarding_office: text_field(item, "Awarding Office"),
		agency_slug: text_field(item, "agency_slug"),
		agency_id: text_field(item, "awarding_agency_id"),
		agency_code: text_field(item, "Awarding Agency Code"),
		sub_agency_code: text_field(item, "Awarding Sub Agency Code"),
		place_of_performance_state: text_field(item, "Place of Performance State Code"),
		amount_cents: award::dollars_to_cents(amount),
		set_aside_type: text_field(item, "Type of Set Aside"),
		offers_received: item
			.get("Number of Offers Received")
			.and_then(number_field)
			.filter(|offers| *offers >= 0.0)
			.map(|offers| offers as u32),
	})
}

/// Non-blank string or number rendered as text. Numeric ids arrive unquoted.
fn text_field(item: &Value, key: &str) -> Option<String> {
	match item.get(key)? {
		Value::String(raw) => Some(raw.trim()).filter(|raw| !raw.is_empty()).map(str::to_string),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

/// Numbers may arrive as JSON numbers or numeric strings. `null` counts as zero.
fn number_field(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(raw) => raw.trim().parse().ok(),
		Value::Null => Some(0.0),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_records_and_pagination() {
		let json = json!({
			"results": [
				{
					"Award ID": "N0002423C1234",
					"Award Amount": 1250000.5,
					"Awarding Agency": "Department of Defense",
					"Awarding Sub Agency": "Department of the Navy",
					"Awarding Office": null,
					"awarding_agency_id": 1173,
					"agency_slug": "department-of-defense",
					"Awarding Agency Code": "097",
					"Place of Performance State Code": "VA",
					"Number of Offers Received": "3"
				},
				{ "Awarding Agency": "  ", "Award Amount": null }
			],
			"page_metadata": { "page": 1, "hasNext": true }
		});
		let page = parse_search_response(&json).expect("parse failed");

		assert!(page.has_next);
		assert_eq!(page.records.len(), 2);
		assert_eq!(page.records[0].amount_cents, 125_000_050);
		assert_eq!(page.records[0].awarding_office, None);
		assert_eq!(page.records[0].agency_id.as_deref(), Some("1173"));
		assert_eq!(page.records[0].offers_received, Some(3));
		assert_eq!(page.records[1].awarding_agency, "Unknown Agency");
		assert_eq!(page.records[1].amount_cents, 0);
	}

	#[test]
	fn rejects_non_numeric_amounts() {
		let json = json!({ "results": [{ "Award Amount": "a lot" }] });

		assert!(parse_search_response(&json).is_err());
	}

	#[test]
	fn missing_results_is_invalid() {
		let err = parse_search_response(&json!({ "detail": "throttled" }))
			.expect_err("Expected invalid response.");

		assert!(!err.is_transport());
	}

	#[test]
	fn parses_contract_counts() {
		let json = json!({ "results": { "contracts": 42, "idvs": 7, "grants": 0 } });

		assert_eq!(parse_count_response(&json).expect("parse failed"), 42);
		assert!(parse_count_response(&json!({ "results": {} })).is_err());
	}
}
