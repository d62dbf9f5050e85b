use serde::{Deserialize, Serialize};
use time::Date;

use crate::AwardSearchProvider;
use scout_config::Config;
use scout_domain::{
	Certification, NormalizedCode, SearchCriteria, VeteranStatus, filter, naics, set_aside,
};

/// A relaxed version of a search that came back empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeSearch {
	pub criteria: SearchCriteria,
	pub description: String,
	/// Contract awards the relaxed search would match. `None` when the count could not be fetched.
	pub estimated_count: Option<u64>,
}

/// Relaxations in the order they are offered, each only when it changes something.
pub fn proposals(
	criteria: &SearchCriteria,
	industry: Option<&NormalizedCode>,
) -> Vec<(SearchCriteria, String)> {
	let mut out = Vec::new();
	let has_set_aside = !set_aside::codes_for(criteria).is_empty();

	if let Some(zip) = criteria.zip() {
		out.push((
			SearchCriteria { zip: None, ..criteria.clone() },
			format!("Search nationwide instead of around ZIP {zip}."),
		));
	}
	if has_set_aside && !set_aside::is_broad_small_business(criteria) {
		let held = if criteria.certification == Certification::None {
			"veteran-owned"
		} else {
			criteria.certification.label()
		};

		out.push((
			SearchCriteria {
				certification: Certification::SmallBusiness,
				veteran_status: VeteranStatus::None,
				..criteria.clone()
			},
			format!("Include every small-business set-aside, not only {held} set-asides."),
		));
	}
	if has_set_aside {
		out.push((
			SearchCriteria {
				certification: Certification::None,
				veteran_status: VeteranStatus::None,
				..criteria.clone()
			},
			"Search all contract awards regardless of set-aside.".to_string(),
		));
	}
	if let Some(code) = industry.filter(|code| code.canonical.len() > 2)
		&& let Some(sector) = naics::sector_of(&code.canonical)
	{
		let title = naics::sector_title(sector).unwrap_or_default();

		out.push((
			SearchCriteria { industry_code: Some(sector.to_string()), ..criteria.clone() },
			format!("Widen industry code {} to its sector {sector} ({title}).", code.canonical),
		));
	}
	if criteria.industry_code().is_none()
		&& let Some(psc) = criteria.product_service_code()
	{
		out.push((
			SearchCriteria { product_service_code: None, ..criteria.clone() },
			format!("Search without product/service code {}.", psc.to_ascii_uppercase()),
		));
	}

	out
}

/// Builds up to `suggestions.max` alternatives, each with an estimated result count.
pub async fn suggest(
	provider: &dyn AwardSearchProvider,
	cfg: &Config,
	criteria: &SearchCriteria,
	industry: Option<&NormalizedCode>,
	today: Date,
) -> Vec<AlternativeSearch> {
	let mut out = Vec::new();

	for (relaxed, description) in
		proposals(criteria, industry).into_iter().take(cfg.suggestions.max as usize)
	{
		let estimated_count = estimate(provider, cfg, &relaxed, today).await;

		out.push(AlternativeSearch { criteria: relaxed, description, estimated_count });
	}

	out
}

async fn estimate(
	provider: &dyn AwardSearchProvider,
	cfg: &Config,
	criteria: &SearchCriteria,
	today: Date,
) -> Option<u64> {
	let industry = match criteria.industry_code() {
		Some(raw) => Some(naics::normalize(raw, &cfg.normalizer).ok()?),
		None => None,
	};
	let query = filter::build_filter(criteria, industry.as_ref(), today);

	match provider.count(&cfg.providers.award_search, &query).await {
		Ok(count) => Some(count),
		Err(err) => {
			tracing::warn!(error = %err, "Alternative search count failed.");

			None
		},
	}
}
