use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AwardSearchProvider;
use scout_config::{AwardSearchProviderConfig, PageBudget};
use scout_domain::{AwardRecord, QueryFilter};

/// Why pagination of one pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStop {
	/// A short page or an explicit "no next page" marker.
	Exhausted,
	/// The page budget for this filter shape was used up.
	Budget,
	/// Non-2xx response or a body that could not be understood.
	Rejected,
	/// No HTTP response at all.
	Unreachable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOutcome {
	pub records: Vec<AwardRecord>,
	pub pages: u32,
	pub stop: FetchStop,
	/// True once any page of this pass got an HTTP response.
	pub reached: bool,
}

/// Narrower filters match fewer awards, so more of them fit the same page budget.
pub fn page_budget(budget: &PageBudget, filter: &QueryFilter) -> u32 {
	match filter.active_filter_count() {
		0 | 1 => budget.small,
		2 => budget.medium,
		_ => budget.large,
	}
}

/// Fetches pages sequentially until the result runs out, the budget is spent, or a page fails.
/// Failures truncate the pass instead of raising.
pub async fn fetch_all(
	provider: &dyn AwardSearchProvider,
	cfg: &AwardSearchProviderConfig,
	budget: &PageBudget,
	filter: &QueryFilter,
) -> FetchOutcome {
	let max_pages = page_budget(budget, filter);
	let mut records = Vec::new();
	let mut pages = 0;
	let mut reached = false;

	for page in 1..=max_pages {
		if page > 1 && cfg.page_delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(cfg.page_delay_ms)).await;
		}

		match provider.search_page(cfg, filter, page).await {
			Ok(result) => {
				let len = result.records.len();

				reached = true;
				pages += 1;

				records.extend(result.records);

				tracing::debug!(page, rows = len, has_next = result.has_next, "Fetched award page.");

				if len < cfg.page_size as usize || !result.has_next {
					return FetchOutcome { records, pages, stop: FetchStop::Exhausted, reached };
				}
			},
			Err(err) => {
				let stop =
					if err.is_transport() { FetchStop::Unreachable } else { FetchStop::Rejected };

				reached |= stop == FetchStop::Rejected;

				tracing::warn!(
					error = %err,
					page,
					kept_records = records.len(),
					"Award page failed. Keeping the pages fetched so far."
				);

				return FetchOutcome { records, pages, stop, reached };
			},
		}
	}

	FetchOutcome { records, pages, stop: FetchStop::Budget, reached }
}
