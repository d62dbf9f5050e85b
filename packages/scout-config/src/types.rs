use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub discovery: Discovery,
	#[serde(default)]
	pub normalizer: Normalizer,
	#[serde(default)]
	pub enrichment: Enrichment,
	#[serde(default)]
	pub suggestions: Suggestions,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub award_search: AwardSearchProviderConfig,
	pub command_registry: CommandRegistryProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct AwardSearchProviderConfig {
	pub api_base: String,
	#[serde(default = "default_search_path")]
	pub search_path: String,
	#[serde(default = "default_count_path")]
	pub count_path: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// Pause between consecutive page requests of one fetch pass.
	#[serde(default = "default_page_delay_ms")]
	pub page_delay_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRegistryProviderConfig {
	pub api_base: String,
	#[serde(default = "default_registry_path")]
	pub path: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Maximum number of awards requested per industry code.
	#[serde(default = "default_registry_result_cap")]
	pub result_cap: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Discovery {
	/// Distinct contracting offices required before the search stops widening.
	pub diversity_target: u32,
	pub page_budget: PageBudget,
}
impl Default for Discovery {
	fn default() -> Self {
		Self { diversity_target: 20, page_budget: PageBudget::default() }
	}
}

/// Maximum pages fetched per pass, keyed by how many of {industry, set-aside, location} filters
/// are active at once.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageBudget {
	pub small: u32,
	pub medium: u32,
	pub large: u32,
}
impl Default for PageBudget {
	fn default() -> Self {
		Self { small: 3, medium: 5, large: 8 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Normalizer {
	pub max_suggestions: u32,
}
impl Default for Normalizer {
	fn default() -> Self {
		Self { max_suggestions: 5 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Enrichment {
	pub enabled: bool,
	pub max_registry_codes: u32,
	pub max_commands_per_entry: u32,
}
impl Default for Enrichment {
	fn default() -> Self {
		Self { enabled: true, max_registry_codes: 3, max_commands_per_entry: 4 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	pub max: u32,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self { max: 3 }
	}
}

fn default_search_path() -> String {
	"/api/v2/search/spending_by_award/".to_string()
}

fn default_count_path() -> String {
	"/api/v2/search/spending_by_award_count/".to_string()
}

fn default_registry_path() -> String {
	"/v1/awards".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_page_size() -> u32 {
	100
}

fn default_page_delay_ms() -> u64 {
	250
}

fn default_registry_result_cap() -> u32 {
	100
}
