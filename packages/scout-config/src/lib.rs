mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AwardSearchProviderConfig, CommandRegistryProviderConfig, Config, Discovery, Enrichment,
	Normalizer, PageBudget, Providers, Service, Suggestions,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for (label, api_base) in [
		("providers.award_search.api_base", &cfg.providers.award_search.api_base),
		("providers.command_registry.api_base", &cfg.providers.command_registry.api_base),
	] {
		if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
			return Err(Error::Validation {
				message: format!("{label} must be an http or https URL."),
			});
		}
	}

	let search = &cfg.providers.award_search;

	if search.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.award_search.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if search.page_size == 0 || search.page_size > 100 {
		return Err(Error::Validation {
			message: "providers.award_search.page_size must be in the range 1-100.".to_string(),
		});
	}
	if cfg.providers.command_registry.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.command_registry.timeout_ms must be greater than zero."
				.to_string(),
		});
	}
	if cfg.providers.command_registry.result_cap == 0 {
		return Err(Error::Validation {
			message: "providers.command_registry.result_cap must be greater than zero."
				.to_string(),
		});
	}

	for (key, value) in
		search.default_headers.iter().chain(&cfg.providers.command_registry.default_headers)
	{
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("Default header {key} must be a string."),
			});
		}
	}

	if cfg.discovery.diversity_target == 0 {
		return Err(Error::Validation {
			message: "discovery.diversity_target must be greater than zero.".to_string(),
		});
	}

	let budget = &cfg.discovery.page_budget;

	if budget.small == 0 {
		return Err(Error::Validation {
			message: "discovery.page_budget.small must be greater than zero.".to_string(),
		});
	}
	if budget.medium < budget.small || budget.large < budget.medium {
		return Err(Error::Validation {
			message: "discovery.page_budget must satisfy small <= medium <= large.".to_string(),
		});
	}
	if cfg.normalizer.max_suggestions == 0 {
		return Err(Error::Validation {
			message: "normalizer.max_suggestions must be greater than zero.".to_string(),
		});
	}
	if cfg.enrichment.enabled {
		if cfg.enrichment.max_registry_codes == 0 {
			return Err(Error::Validation {
				message: "enrichment.max_registry_codes must be greater than zero when enabled."
					.to_string(),
			});
		}
		if cfg.enrichment.max_commands_per_entry == 0 {
			return Err(Error::Validation {
				message:
					"enrichment.max_commands_per_entry must be greater than zero when enabled."
						.to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in
		[&mut cfg.providers.award_search.api_base, &mut cfg.providers.command_registry.api_base]
	{
		let trimmed = api_base.trim().trim_end_matches('/');

		if trimmed.len() != api_base.len() {
			*api_base = trimmed.to_string();
		}
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
