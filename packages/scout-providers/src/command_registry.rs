use serde_json::Value;

use crate::{Error, Result};
use scout_config::CommandRegistryProviderConfig;
use scout_domain::award;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryResult {
	pub award_count: usize,
	pub offices: Vec<RegistryOffice>,
}

/// A purchasing office reported by the registry, with its spend inside the requested code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryOffice {
	pub name: String,
	pub department: Option<String>,
	pub agency: Option<String>,
	pub total_cents: i64,
	pub contract_count: u64,
}

pub async fn lookup(
	cfg: &CommandRegistryProviderConfig,
	naics: &str,
	cap: u32,
) -> Result<RegistryResult> {
	let client = crate::client(cfg.timeout_ms, &cfg.default_headers)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.get(url)
		.query(&[("naics", naics.to_string()), ("limit", cap.to_string())])
		.send()
		.await?;

	if !res.status().is_success() {
		return Err(Error::Status { status: res.status().as_u16() });
	}

	let json: Value = res.json().await?;

	parse_registry_response(&json)
}

/// Accepts `offices` either as an array of office objects or as an object keyed by office name.
pub fn parse_registry_response(json: &Value) -> Result<RegistryResult> {
	let award_count = json.get("awards").and_then(Value::as_array).map(Vec::len).unwrap_or(0);
	let offices = match json.get("offices") {
		Some(Value::Array(items)) =>
			items.iter().map(|item| parse_office(None, item)).collect::<Result<Vec<_>>>()?,
		Some(Value::Object(map)) => map
			.iter()
			.map(|(name, item)| parse_office(Some(name), item))
			.collect::<Result<Vec<_>>>()?,
		Some(Value::Null) | None => Vec::new(),
		Some(_) =>
			return Err(Error::InvalidResponse {
				message: "Registry offices must be an array or an object.".to_string(),
			}),
	};

	Ok(RegistryResult { award_count, offices: offices.into_iter().flatten().collect() })
}

/// Offices without a usable name are skipped.
fn parse_office(key: Option<&String>, item: &Value) -> Result<Option<RegistryOffice>> {
	if !item.is_object() {
		return Err(Error::InvalidResponse {
			message: "Registry office entries must be objects.".to_string(),
		});
	}

	let name = text(item, "name").or_else(|| key.map(|key| key.trim().to_string()));
	let Some(name) = name.filter(|name| !name.is_empty()) else {
		return Ok(None);
	};
	let total = match item.get("total_amount") {
		Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
		Some(Value::String(raw)) => raw.trim().parse().map_err(|_| Error::InvalidResponse {
			message: format!("Registry office {name} has a non-numeric total_amount."),
		})?,
		_ => 0.0,
	};

	Ok(Some(RegistryOffice {
		department: text(item, "department"),
		agency: text(item, "agency"),
		total_cents: award::dollars_to_cents(total),
		contract_count: item.get("contract_count").and_then(Value::as_u64).unwrap_or(0),
		name,
	}))
}

fn text(item: &Value, key: &str) -> Option<String> {
	item.get(key)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|raw| !raw.is_empty())
		.map(str::to_string)
}
