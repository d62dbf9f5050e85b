pub mod aggregate;
pub mod enrich;
pub mod expansion;
pub mod fetch;
pub mod find;
pub mod suggest;

mod error;

pub use aggregate::{Aggregation, EnrichmentSource, OfficeAggregate, OfficeKey};
pub use error::{Error, Result};
pub use expansion::{ExpansionOutcome, ExpansionStep, Strategy};
pub use fetch::{FetchOutcome, FetchStop};
pub use find::FindAgenciesResponse;
pub use suggest::AlternativeSearch;

use std::{future::Future, pin::Pin, sync::Arc};

use scout_config::{AwardSearchProviderConfig, CommandRegistryProviderConfig, Config};
use scout_domain::{QueryFilter, commands::CommandTable};
use scout_providers::{
	award_search::{self, AwardPage},
	command_registry::{self, RegistryResult},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait AwardSearchProvider
where
	Self: Send + Sync,
{
	fn search_page<'a>(
		&'a self,
		cfg: &'a AwardSearchProviderConfig,
		filter: &'a QueryFilter,
		page: u32,
	) -> BoxFuture<'a, scout_providers::Result<AwardPage>>;

	fn count<'a>(
		&'a self,
		cfg: &'a AwardSearchProviderConfig,
		filter: &'a QueryFilter,
	) -> BoxFuture<'a, scout_providers::Result<u64>>;
}

pub trait CommandRegistryProvider
where
	Self: Send + Sync,
{
	fn lookup<'a>(
		&'a self,
		cfg: &'a CommandRegistryProviderConfig,
		naics: &'a str,
		cap: u32,
	) -> BoxFuture<'a, scout_providers::Result<RegistryResult>>;
}

#[derive(Clone)]
pub struct Providers {
	pub award_search: Arc<dyn AwardSearchProvider>,
	pub command_registry: Arc<dyn CommandRegistryProvider>,
}
impl Providers {
	pub fn new(
		award_search: Arc<dyn AwardSearchProvider>,
		command_registry: Arc<dyn CommandRegistryProvider>,
	) -> Self {
		Self { award_search, command_registry }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { award_search: provider.clone(), command_registry: provider }
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub providers: Providers,
	pub commands: CommandTable,
}
impl ScoutService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default(), commands: CommandTable::default() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers, commands: CommandTable::default() }
	}
}

struct DefaultProviders;
impl AwardSearchProvider for DefaultProviders {
	fn search_page<'a>(
		&'a self,
		cfg: &'a AwardSearchProviderConfig,
		filter: &'a QueryFilter,
		page: u32,
	) -> BoxFuture<'a, scout_providers::Result<AwardPage>> {
		Box::pin(award_search::search_page(cfg, filter, page))
	}

	fn count<'a>(
		&'a self,
		cfg: &'a AwardSearchProviderConfig,
		filter: &'a QueryFilter,
	) -> BoxFuture<'a, scout_providers::Result<u64>> {
		Box::pin(award_search::count(cfg, filter))
	}
}
impl CommandRegistryProvider for DefaultProviders {
	fn lookup<'a>(
		&'a self,
		cfg: &'a CommandRegistryProviderConfig,
		naics: &'a str,
		cap: u32,
	) -> BoxFuture<'a, scout_providers::Result<RegistryResult>> {
		Box::pin(command_registry::lookup(cfg, naics, cap))
	}
}
