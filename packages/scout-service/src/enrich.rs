//! Splits department-level defense entries into command-level entries.
//!
//! Tiers, in order: live registry offices for the industry's leaf codes, then the built-in command
//! table, then the untouched entry. Each replacement set inherits the generic entry's spend and
//! contract count exactly, so enrichment never changes the result total.

use std::collections::HashMap;

use crate::{CommandRegistryProvider, EnrichmentSource, OfficeAggregate, OfficeKey, aggregate};
use scout_config::Config;
use scout_domain::{
	NormalizedCode,
	commands::{self, CommandTable},
};
use scout_providers::command_registry::RegistryOffice;

/// A command an entry can be split into, with the weight its share is computed from.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Replacement {
	name: String,
	weight: u64,
}

pub async fn enrich(
	registry: &dyn CommandRegistryProvider,
	cfg: &Config,
	table: &CommandTable,
	industry: Option<&NormalizedCode>,
	offices: Vec<OfficeAggregate>,
) -> (Vec<OfficeAggregate>, i64) {
	let generic_count = offices.iter().filter(|office| office.is_generic_defense_entry()).count();

	if !cfg.enrichment.enabled || generic_count == 0 {
		return aggregate::rank(offices);
	}

	let codes: Vec<&str> = industry
		.map(|code| {
			code.precise_leaf_codes().take(cfg.enrichment.max_registry_codes as usize).collect()
		})
		.unwrap_or_default();
	let registry_commands = if codes.is_empty() {
		None
	} else {
		registry_commands(registry, cfg, &codes).await
	};
	let use_registry = registry_commands.as_ref().is_some_and(|by_department| {
		by_department.values().map(Vec::len).sum::<usize>() >= generic_count
	});

	if !use_registry {
		tracing::warn!(
			generic_entries = generic_count,
			"Registry data unavailable or too sparse. Using the built-in command table."
		);
	}

	let max_commands = cfg.enrichment.max_commands_per_entry as usize;
	let mut merged: Vec<OfficeAggregate> = Vec::with_capacity(offices.len());
	let mut index: HashMap<OfficeKey, usize> = HashMap::new();

	for office in offices {
		let Some(department) = office.defense_department().filter(|_| !office.has_specific_office)
		else {
			push_or_merge(&mut merged, &mut index, office);

			continue;
		};
		let from_registry = registry_commands
			.as_ref()
			.filter(|_| use_registry)
			.and_then(|by_department| by_department.get(department))
			.filter(|commands| !commands.is_empty());
		let (source, replacements) = match from_registry {
			Some(found) => (EnrichmentSource::Registry, found.clone()),
			None => (
				EnrichmentSource::StaticTable,
				static_replacements(table, department, max_commands),
			),
		};

		for replacement in split(&office, &replacements, max_commands, source) {
			push_or_merge(&mut merged, &mut index, replacement);
		}
	}

	aggregate::rank(merged)
}

/// Registry offices for `codes`, merged by name and grouped by defense department. `None` when
/// any lookup fails.
async fn registry_commands(
	registry: &dyn CommandRegistryProvider,
	cfg: &Config,
	codes: &[&str],
) -> Option<HashMap<&'static str, Vec<Replacement>>> {
	let provider_cfg = &cfg.providers.command_registry;
	let mut offices: Vec<RegistryOffice> = Vec::new();

	for code in codes.iter().copied() {
		match registry.lookup(provider_cfg, code, provider_cfg.result_cap).await {
			Ok(result) => {
				tracing::debug!(naics = code, offices = result.offices.len(), "Registry lookup done.");

				for office in result.offices {
					let seen =
						offices.iter_mut().find(|seen| seen.name.eq_ignore_ascii_case(&office.name));

					match seen {
						Some(seen) => {
							seen.total_cents += office.total_cents;
							seen.contract_count += office.contract_count;
						},
						None => offices.push(office),
					}
				}
			},
			Err(err) => {
				tracing::warn!(error = %err, naics = code, "Registry lookup failed.");

				return None;
			},
		}
	}

	let mut by_department: HashMap<&'static str, Vec<(i64, Replacement)>> = HashMap::new();

	for office in offices {
		let Some(department) = office
			.department
			.as_deref()
			.and_then(commands::defense_department)
			.or_else(|| office.agency.as_deref().and_then(commands::defense_department))
		else {
			continue;
		};

		by_department.entry(department).or_default().push((
			office.total_cents,
			Replacement { weight: office.total_cents.max(0) as u64, name: office.name },
		));
	}

	Some(
		by_department
			.into_iter()
			.map(|(department, mut found)| {
				found.sort_by(|a, b| b.0.cmp(&a.0));

				(
					department,
					found.into_iter().map(|(_, replacement)| replacement).collect::<Vec<_>>(),
				)
			})
			.collect(),
	)
}

fn static_replacements(table: &CommandTable, department: &str, max: usize) -> Vec<Replacement> {
	table
		.commands_for(department, max)
		.iter()
		.map(|name| Replacement { name: name.clone(), weight: 1 })
		.collect()
}

/// Replaces `office` with up to `max` command entries sharing its spend and contract count. An
/// entry with nothing to split into comes back unchanged.
fn split(
	office: &OfficeAggregate,
	replacements: &[Replacement],
	max: usize,
	source: EnrichmentSource,
) -> Vec<OfficeAggregate> {
	let take = replacements.len().min(max).min(office.contract_count as usize);

	if take == 0 {
		return vec![office.clone()];
	}

	let chosen = &replacements[..take];
	let mut weights: Vec<u64> = chosen.iter().map(|replacement| replacement.weight).collect();

	if weights.iter().all(|weight| *weight == 0) {
		weights = vec![1; take];
	}

	let spend = apportion(office.total_spend_cents, &weights);
	let counts = apportion(office.contract_count as i64, &vec![1; take]);

	chosen
		.iter()
		.zip(spend)
		.zip(counts)
		.map(|((replacement, total_spend_cents), contract_count)| OfficeAggregate {
			key: OfficeKey {
				agency: office.key.agency.clone(),
				sub_agency: office.key.sub_agency.clone(),
				office: replacement.name.clone(),
			},
			name: replacement.name.clone(),
			office: Some(replacement.name.clone()),
			has_specific_office: true,
			total_spend_cents,
			contract_count: contract_count as u64,
			enrichment: source,
			..office.clone()
		})
		.collect()
}

fn push_or_merge(
	merged: &mut Vec<OfficeAggregate>,
	index: &mut HashMap<OfficeKey, usize>,
	office: OfficeAggregate,
) {
	match index.get(&office.key).copied() {
		Some(slot) => {
			merged[slot].total_spend_cents += office.total_spend_cents;
			merged[slot].contract_count += office.contract_count;
		},
		None => {
			index.insert(office.key.clone(), merged.len());
			merged.push(office);
		},
	}
}

/// Splits `total` across `weights` (largest remainder). Shares always sum to `total`.
fn apportion(total: i64, weights: &[u64]) -> Vec<i64> {
	if total < 0 {
		return apportion(-total, weights).into_iter().map(|share| -share).collect();
	}

	let sum: u128 = weights.iter().map(|weight| *weight as u128).sum();

	if sum == 0 {
		return vec![0; weights.len()];
	}

	let total = total as u128;
	let mut shares: Vec<u128> =
		weights.iter().map(|weight| total * *weight as u128 / sum).collect();
	let remainders: Vec<u128> =
		weights.iter().map(|weight| total * *weight as u128 % sum).collect();
	let mut order: Vec<usize> = (0..weights.len()).collect();

	order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]));

	let assigned: u128 = shares.iter().sum();

	for slot in order.into_iter().take((total - assigned) as usize) {
		shares[slot] += 1;
	}

	shares.into_iter().map(|share| share as i64).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn apportion_conserves_totals() {
		assert_eq!(apportion(100, &[1, 1, 1]), [34, 33, 33]);
		assert_eq!(apportion(1_000, &[3, 1]), [750, 250]);
		assert_eq!(apportion(-101, &[1, 1]), [-51, -50]);
		assert_eq!(apportion(7, &[0, 0]), [0, 0]);

		let shares = apportion(999_999, &[7, 13, 29, 0]);

		assert_eq!(shares.iter().sum::<i64>(), 999_999);
		assert_eq!(shares[3], 0);
	}

	#[test]
	fn split_caps_commands_at_contract_count() {
		let office = OfficeAggregate {
			key: OfficeKey {
				agency: "department-of-defense".to_string(),
				sub_agency: "Department of the Army".to_string(),
				office: "Department of the Army".to_string(),
			},
			name: "Department of the Army".to_string(),
			office: None,
			sub_agency: Some("Department of the Army".to_string()),
			agency: "Department of Defense".to_string(),
			has_specific_office: false,
			agency_code: Some("097".to_string()),
			sub_agency_code: Some("2100".to_string()),
			location: Some("VA".to_string()),
			total_spend_cents: 1_001,
			contract_count: 2,
			enrichment: EnrichmentSource::None,
		};
		let replacements =
			static_replacements(&CommandTable::default(), "Department of the Army", 4);
		let entries = split(&office, &replacements, 4, EnrichmentSource::StaticTable);

		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].total_spend_cents + entries[1].total_spend_cents, 1_001);
		assert_eq!(entries[0].contract_count + entries[1].contract_count, 2);
		assert!(entries.iter().all(|entry| entry.has_specific_office));
		assert!(entries.iter().all(|entry| entry.enrichment == EnrichmentSource::StaticTable));
		assert_eq!(entries[0].agency_code.as_deref(), Some("097"));
	}
}
