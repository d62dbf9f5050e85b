use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
	AlternativeSearch, Error, ExpansionStep, OfficeAggregate, Result, ScoutService, aggregate,
	enrich, expansion, suggest,
};
use scout_domain::{LocationTier, SearchCriteria, filter, geo, naics};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindAgenciesResponse {
	pub search_id: Uuid,
	pub offices: Vec<OfficeAggregate>,
	pub total_spend_cents: i64,
	pub naics_correction_message: Option<String>,
	pub fallback_messages: Vec<String>,
	pub location_tier: LocationTier,
	pub state: Option<String>,
	pub expansion_steps: Vec<ExpansionStep>,
	pub records_fetched: usize,
	pub excluded_records: usize,
	pub alternative_searches: Vec<AlternativeSearch>,
}

impl ScoutService {
	pub async fn find_agencies(&self, criteria: SearchCriteria) -> Result<FindAgenciesResponse> {
		self.find_agencies_on(criteria, OffsetDateTime::now_utc().date()).await
	}

	/// Same as [`ScoutService::find_agencies`] with the search window anchored at `today`.
	pub async fn find_agencies_on(
		&self,
		criteria: SearchCriteria,
		today: Date,
	) -> Result<FindAgenciesResponse> {
		validate(&criteria)?;

		let search_id = Uuid::new_v4();
		let industry = criteria
			.industry_code()
			.map(|raw| naics::normalize(raw, &self.cfg.normalizer))
			.transpose()?;

		tracing::info!(
			%search_id,
			certification = criteria.certification.as_str(),
			industry = industry.as_ref().map(|code| code.canonical.as_str()),
			has_zip = criteria.zip().is_some(),
			exclude_dod = criteria.exclude_dod,
			"Agency search started."
		);

		let initial = filter::build_filter(&criteria, industry.as_ref(), today);
		let expanded = expansion::expand(
			self.providers.award_search.as_ref(),
			&self.cfg,
			&criteria,
			initial,
		)
		.await?;
		let aggregation = aggregate::aggregate(&expanded.records, criteria.exclude_dod);
		let (offices, total_spend_cents) = enrich::enrich(
			self.providers.command_registry.as_ref(),
			&self.cfg,
			&self.commands,
			industry.as_ref(),
			aggregation.offices,
		)
		.await;
		let alternative_searches = if offices.is_empty() {
			suggest::suggest(
				self.providers.award_search.as_ref(),
				&self.cfg,
				&criteria,
				industry.as_ref(),
				today,
			)
			.await
		} else {
			Vec::new()
		};

		tracing::info!(
			%search_id,
			offices = offices.len(),
			location_tier = expanded.location_tier.number(),
			records = expanded.records.len(),
			excluded = aggregation.excluded_records,
			"Agency search finished."
		);

		Ok(FindAgenciesResponse {
			search_id,
			offices,
			total_spend_cents,
			naics_correction_message: industry.and_then(|code| code.correction_message),
			fallback_messages: expanded.messages,
			location_tier: expanded.location_tier,
			state: expanded.state,
			expansion_steps: expanded.steps,
			records_fetched: expanded.records.len(),
			excluded_records: aggregation.excluded_records,
			alternative_searches,
		})
	}
}

/// Shape checks that do not need any lookup table.
fn validate(criteria: &SearchCriteria) -> Result<()> {
	if let Some(zip) = criteria.zip()
		&& !geo::is_zip(zip)
	{
		return Err(Error::InvalidRequest {
			message: format!("zip must be a five-digit ZIP or ZIP+4 code, got '{zip}'."),
		});
	}
	if let Some(psc) = criteria.product_service_code()
		&& (psc.len() != 4 || !psc.bytes().all(|byte| byte.is_ascii_alphanumeric()))
	{
		return Err(Error::InvalidRequest {
			message: format!("product_service_code must be four letters or digits, got '{psc}'."),
		});
	}

	Ok(())
}
