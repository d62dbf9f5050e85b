//! Collapses award rows into ranked purchasing-office entries.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use scout_domain::{AwardRecord, commands};

/// Identity of a purchasing office within one result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfficeKey {
	/// Agency slug, else agency id, else agency name.
	pub agency: String,
	pub sub_agency: String,
	/// Office name, else the sub-agency name.
	pub office: String,
}
impl OfficeKey {
	pub fn for_record(record: &AwardRecord) -> Self {
		let agency = record
			.agency_slug
			.as_deref()
			.or(record.agency_id.as_deref())
			.unwrap_or(record.awarding_agency.as_str());
		let sub_agency = record.awarding_sub_agency.as_deref().unwrap_or_default();
		let office = record.awarding_office.as_deref().unwrap_or(sub_agency);

		Self {
			agency: agency.trim().to_string(),
			sub_agency: sub_agency.trim().to_string(),
			office: office.trim().to_string(),
		}
	}
}

/// Where the office-level detail of an entry came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentSource {
	#[default]
	None,
	Registry,
	StaticTable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeAggregate {
	pub key: OfficeKey,
	pub name: String,
	pub office: Option<String>,
	pub sub_agency: Option<String>,
	pub agency: String,
	pub has_specific_office: bool,
	pub agency_code: Option<String>,
	pub sub_agency_code: Option<String>,
	/// Place-of-performance state of the first contributing award.
	pub location: Option<String>,
	pub total_spend_cents: i64,
	pub contract_count: u64,
	pub enrichment: EnrichmentSource,
}
impl OfficeAggregate {
	fn from_record(key: OfficeKey, record: &AwardRecord) -> Self {
		let office = record.awarding_office.clone();
		let name = office
			.clone()
			.or_else(|| record.awarding_sub_agency.clone())
			.unwrap_or_else(|| record.awarding_agency.clone());

		Self {
			key,
			name,
			has_specific_office: office.is_some(),
			office,
			sub_agency: record.awarding_sub_agency.clone(),
			agency: record.awarding_agency.clone(),
			agency_code: record.agency_code.clone(),
			sub_agency_code: record.sub_agency_code.clone(),
			location: record.place_of_performance_state.clone(),
			total_spend_cents: 0,
			contract_count: 0,
			enrichment: EnrichmentSource::None,
		}
	}

	/// Recognized defense department this entry rolls up to, if any.
	pub fn defense_department(&self) -> Option<&'static str> {
		self.sub_agency
			.as_deref()
			.and_then(commands::defense_department)
			.or_else(|| commands::defense_department(&self.agency))
	}

	/// A department-level entry with no office detail, eligible for command enrichment.
	pub fn is_generic_defense_entry(&self) -> bool {
		!self.has_specific_office && self.defense_department().is_some()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Aggregation {
	pub offices: Vec<OfficeAggregate>,
	pub total_spend_cents: i64,
	pub excluded_records: usize,
}

pub fn is_excluded(record: &AwardRecord, exclude_dod: bool) -> bool {
	exclude_dod
		&& commands::is_department_of_defense(&record.awarding_agency, record.agency_code.as_deref())
}

pub fn aggregate(records: &[AwardRecord], exclude_dod: bool) -> Aggregation {
	let mut offices: Vec<OfficeAggregate> = Vec::new();
	let mut index: HashMap<OfficeKey, usize> = HashMap::new();
	let mut excluded_records = 0;

	for record in records {
		if is_excluded(record, exclude_dod) {
			excluded_records += 1;

			continue;
		}

		let key = OfficeKey::for_record(record);
		let slot = match index.get(&key).copied() {
			Some(slot) => slot,
			None => {
				index.insert(key.clone(), offices.len());
				offices.push(OfficeAggregate::from_record(key, record));

				offices.len() - 1
			},
		};
		let entry = &mut offices[slot];

		entry.total_spend_cents += record.amount_cents;
		entry.contract_count += 1;

		if !entry.has_specific_office && record.awarding_office.is_some() {
			entry.has_specific_office = true;
			entry.office = record.awarding_office.clone();
		}
	}

	let (offices, total_spend_cents) = rank(offices);

	Aggregation { offices, total_spend_cents, excluded_records }
}

/// Stable sort by spend, largest first, with the total recomputed from the final list.
pub fn rank(mut offices: Vec<OfficeAggregate>) -> (Vec<OfficeAggregate>, i64) {
	offices.sort_by(|a, b| b.total_spend_cents.cmp(&a.total_spend_cents));

	let total = offices.iter().map(|office| office.total_spend_cents).sum();

	(offices, total)
}

/// Number of distinct offices the records would aggregate into.
pub fn distinct_office_count(records: &[AwardRecord], exclude_dod: bool) -> usize {
	records
		.iter()
		.filter(|record| !is_excluded(record, exclude_dod))
		.map(OfficeKey::for_record)
		.collect::<HashSet<_>>()
		.len()
}
