use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use scout_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.expect("Template config must include the requested section.");
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("scout_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> scout_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = scout_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config should be valid.");

	assert_eq!(cfg.discovery.diversity_target, 20);
	assert_eq!(cfg.discovery.page_budget.large, 8);
	assert_eq!(cfg.providers.award_search.page_size, 100);
	assert_eq!(cfg.providers.award_search.timeout_ms, 30_000);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let payload = r#"
[service]
http_bind = "127.0.0.1:8080"
log_level = ""

[providers.award_search]
api_base = "https://api.usaspending.gov/"

[providers.command_registry]
api_base = "http://127.0.0.1:9400"
"#;
	let cfg = load_payload(payload.to_string()).expect("Minimal config should be valid.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.providers.award_search.api_base, "https://api.usaspending.gov");
	assert_eq!(cfg.providers.award_search.search_path, "/api/v2/search/spending_by_award/");
	assert_eq!(cfg.providers.award_search.page_delay_ms, 250);
	assert_eq!(cfg.discovery.diversity_target, 20);
	assert_eq!(cfg.discovery.page_budget.small, 3);
	assert_eq!(cfg.normalizer.max_suggestions, 5);
	assert!(cfg.enrichment.enabled);
	assert_eq!(cfg.enrichment.max_registry_codes, 3);
	assert_eq!(cfg.suggestions.max, 3);
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("scout_config_test_missing_file.toml");
	let err = scout_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind =".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}

#[test]
fn api_base_must_be_http() {
	expect_validation(
		sample_toml_with(
			&["providers", "award_search"],
			"api_base",
			Value::String("ftp://example.com".to_string()),
		),
		"providers.award_search.api_base must be an http or https URL.",
	);
}

#[test]
fn page_size_is_capped_at_one_hundred() {
	expect_validation(
		sample_toml_with(&["providers", "award_search"], "page_size", Value::Integer(500)),
		"providers.award_search.page_size must be in the range 1-100.",
	);
}

#[test]
fn diversity_target_must_be_positive() {
	expect_validation(
		sample_toml_with(&["discovery"], "diversity_target", Value::Integer(0)),
		"discovery.diversity_target must be greater than zero.",
	);
}

#[test]
fn page_budget_must_be_ordered() {
	expect_validation(
		sample_toml_with(&["discovery", "page_budget"], "medium", Value::Integer(2)),
		"discovery.page_budget must satisfy small <= medium <= large.",
	);
}

#[test]
fn enabled_enrichment_requires_registry_codes() {
	expect_validation(
		sample_toml_with(&["enrichment"], "max_registry_codes", Value::Integer(0)),
		"enrichment.max_registry_codes must be greater than zero when enabled.",
	);
}

#[test]
fn disabled_enrichment_skips_its_limits() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let enrichment = root
		.get_mut("enrichment")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [enrichment].");

	enrichment.insert("enabled".to_string(), Value::Boolean(false));
	enrichment.insert("max_registry_codes".to_string(), Value::Integer(0));

	let payload = toml::to_string(&root).expect("Failed to render template config.");

	load_payload(payload).expect("Disabled enrichment should not validate its limits.");
}

#[test]
fn default_headers_must_be_strings() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let headers = root
		.get_mut("providers")
		.and_then(|value| value.get_mut("award_search"))
		.and_then(|value| value.get_mut("default_headers"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include award_search default headers.");

	headers.insert("X-Retry".to_string(), Value::Integer(3));

	expect_validation(
		toml::to_string(&root).expect("Failed to render template config."),
		"Default header X-Retry must be a string.",
	);
}
