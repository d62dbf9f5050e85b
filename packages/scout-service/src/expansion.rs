//! Progressive relaxation of the award query.
//!
//! The ladder is linear: each rung runs only while the adopted snapshot still has fewer distinct
//! offices than the configured target, and an adopted rung replaces the snapshot wholesale. Rungs
//! only ever widen the query, so the location tier never moves back toward the user's own state.

use serde::{Deserialize, Serialize};

use crate::{AwardSearchProvider, Error, Result, aggregate, fetch};
use scout_config::Config;
use scout_domain::{
	AwardRecord, Certification, LocationTier, QueryFilter, SearchCriteria, geo, set_aside,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	Initial,
	SetAsideBroadenState,
	BorderingStates,
	ExtendedRegion,
	Nationwide,
	SetAsideBroadenNationwide,
	DropSetAside,
}
impl Strategy {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Initial => "initial",
			Self::SetAsideBroadenState => "set_aside_broaden_state",
			Self::BorderingStates => "bordering_states",
			Self::ExtendedRegion => "extended_region",
			Self::Nationwide => "nationwide",
			Self::SetAsideBroadenNationwide => "set_aside_broaden_nationwide",
			Self::DropSetAside => "drop_set_aside",
		}
	}
}

/// One attempted rung, adopted or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionStep {
	pub strategy: Strategy,
	pub location_tier: LocationTier,
	pub records: usize,
	pub distinct_offices: usize,
	pub adopted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionOutcome {
	pub filter: QueryFilter,
	pub records: Vec<AwardRecord>,
	pub distinct_offices: usize,
	pub location_tier: LocationTier,
	/// State the ZIP resolved to, when it resolved.
	pub state: Option<String>,
	pub messages: Vec<String>,
	pub steps: Vec<ExpansionStep>,
}

#[derive(Clone, Debug)]
struct Snapshot {
	filter: QueryFilter,
	tier: LocationTier,
	records: Vec<AwardRecord>,
	distinct_offices: usize,
}

struct Ladder<'a> {
	provider: &'a dyn AwardSearchProvider,
	cfg: &'a Config,
	exclude_dod: bool,
	steps: Vec<ExpansionStep>,
	messages: Vec<String>,
}
impl Ladder<'_> {
	fn target(&self) -> usize {
		self.cfg.discovery.diversity_target as usize
	}

	/// Fetches `filter` and reports whether the upstream answered at all.
	async fn attempt(&self, filter: QueryFilter, tier: LocationTier) -> (Snapshot, bool) {
		let outcome = fetch::fetch_all(
			self.provider,
			&self.cfg.providers.award_search,
			&self.cfg.discovery.page_budget,
			&filter,
		)
		.await;
		let distinct_offices = aggregate::distinct_office_count(&outcome.records, self.exclude_dod);

		(Snapshot { filter, tier, records: outcome.records, distinct_offices }, outcome.reached)
	}

	/// Runs one rung and returns the snapshot to keep.
	async fn rung(
		&mut self,
		current: Snapshot,
		strategy: Strategy,
		filter: QueryFilter,
		tier: LocationTier,
		accept: impl Fn(&Snapshot, &Snapshot) -> bool,
		message: impl FnOnce(&Snapshot) -> String,
	) -> Snapshot {
		let (candidate, _) = self.attempt(filter, tier).await;
		let adopted = accept(&current, &candidate);

		self.steps.push(ExpansionStep {
			strategy,
			location_tier: tier,
			records: candidate.records.len(),
			distinct_offices: candidate.distinct_offices,
			adopted,
		});

		if !adopted {
			tracing::debug!(
				strategy = strategy.as_str(),
				distinct_offices = candidate.distinct_offices,
				"Expansion step not adopted."
			);

			return current;
		}

		tracing::info!(
			strategy = strategy.as_str(),
			location_tier = tier.number(),
			records = candidate.records.len(),
			distinct_offices = candidate.distinct_offices,
			"Expansion step adopted."
		);

		self.messages.push(message(&current));

		candidate
	}
}

fn keeps_diversity(current: &Snapshot, candidate: &Snapshot) -> bool {
	candidate.distinct_offices >= current.distinct_offices
}

fn has_records(_: &Snapshot, candidate: &Snapshot) -> bool {
	!candidate.records.is_empty()
}

fn scope_phrase(tier: LocationTier) -> &'static str {
	match tier {
		LocationTier::State => "in your state",
		LocationTier::Bordering => "in your state and bordering states",
		LocationTier::Regional => "in your extended region",
		LocationTier::Nationwide => "nationwide",
	}
}

fn plural(count: usize) -> &'static str {
	if count == 1 { "" } else { "s" }
}

/// Walks the relaxation ladder starting from `initial`.
///
/// Fails only when the very first page of the initial query gets no HTTP response.
pub async fn expand(
	provider: &dyn AwardSearchProvider,
	cfg: &Config,
	criteria: &SearchCriteria,
	initial: QueryFilter,
) -> Result<ExpansionOutcome> {
	let state = criteria.zip().and_then(geo::zip_to_state).map(str::to_string);
	let mut ladder = Ladder {
		provider,
		cfg,
		exclude_dod: criteria.exclude_dod,
		steps: Vec::new(),
		messages: Vec::new(),
	};
	let tier =
		if initial.locations.is_some() { LocationTier::State } else { LocationTier::Nationwide };
	let (mut current, reached) = ladder.attempt(initial, tier).await;

	if !reached {
		return Err(Error::SearchFailed {
			message: "The award search service could not be reached.".to_string(),
		});
	}

	ladder.steps.push(ExpansionStep {
		strategy: Strategy::Initial,
		location_tier: tier,
		records: current.records.len(),
		distinct_offices: current.distinct_offices,
		adopted: true,
	});

	let target = ladder.target();

	if current.distinct_offices < target
		&& current.filter.has_set_aside()
		&& !current.filter.covers_set_asides(set_aside::GENERIC_SMALL_BUSINESS)
	{
		let filter = current.filter.with_added_set_asides(set_aside::GENERIC_SMALL_BUSINESS);
		let tier = current.tier;
		let label = if criteria.certification == Certification::None {
			"veteran-owned"
		} else {
			criteria.certification.label()
		};

		current = ladder
			.rung(
				current,
				Strategy::SetAsideBroadenState,
				filter,
				tier,
				keeps_diversity,
				|prev| {
					format!(
						"Only {} office{} matched your {label} set-aside {}; also including general small-business set-asides.",
						prev.distinct_offices,
						plural(prev.distinct_offices),
						scope_phrase(prev.tier),
					)
				},
			)
			.await;
	}

	if let Some(home) = state.as_deref() {
		for (strategy, tier) in [
			(Strategy::BorderingStates, LocationTier::Bordering),
			(Strategy::ExtendedRegion, LocationTier::Regional),
			(Strategy::Nationwide, LocationTier::Nationwide),
		] {
			if current.distinct_offices >= target {
				break;
			}

			let locations = geo::tier_states(home, tier);

			// States without neighbors have nothing new to add at this tier.
			if locations == current.filter.locations {
				continue;
			}

			let filter = current.filter.with_locations(locations);

			current = ladder
				.rung(current, strategy, filter, tier, has_records, |prev| {
					format!(
						"Only {} office{} found {}; expanded search to {}.",
						prev.distinct_offices,
						plural(prev.distinct_offices),
						scope_phrase(prev.tier),
						tier.label(),
					)
				})
				.await;
		}
	}

	if current.distinct_offices < target
		&& criteria.certification.is_socioeconomic()
		&& current.filter.has_set_aside()
	{
		let filter = current
			.filter
			.with_added_set_asides(set_aside::ALL_SMALL_BUSINESS)
			.with_locations(None);
		let label = criteria.certification.label();

		current = ladder
			.rung(
				current,
				Strategy::SetAsideBroadenNationwide,
				filter,
				LocationTier::Nationwide,
				keeps_diversity,
				|prev| {
					format!(
						"Only {} office{} matched {label} set-asides; broadened to all small-business set-asides nationwide.",
						prev.distinct_offices,
						plural(prev.distinct_offices),
					)
				},
			)
			.await;
	}

	if current.distinct_offices < target && current.filter.has_set_aside() {
		let filter = current.filter.with_set_asides(None).with_locations(None);

		current = ladder
			.rung(
				current,
				Strategy::DropSetAside,
				filter,
				LocationTier::Nationwide,
				keeps_diversity,
				|prev| {
					format!(
						"Only {} office{} found with set-aside filters; showing all contract awards for your industry nationwide.",
						prev.distinct_offices,
						plural(prev.distinct_offices),
					)
				},
			)
			.await;
	}

	let Ladder { steps, messages, .. } = ladder;

	Ok(ExpansionOutcome {
		filter: current.filter,
		distinct_offices: current.distinct_offices,
		location_tier: current.tier,
		records: current.records,
		state,
		messages,
		steps,
	})
}
