use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use scout_api::{routes, state::AppState};
use scout_config::{
	AwardSearchProviderConfig, CommandRegistryProviderConfig, Config, Discovery, Enrichment,
	Normalizer, Service, Suggestions,
};
use scout_domain::{AwardRecord, QueryFilter};
use scout_providers::{award_search::AwardPage, command_registry::RegistryResult};
use scout_service::{AwardSearchProvider, BoxFuture, CommandRegistryProvider, Providers};

struct FixedSearch {
	reachable: bool,
	offices: usize,
}
impl AwardSearchProvider for FixedSearch {
	fn search_page<'a>(
		&'a self,
		_cfg: &'a AwardSearchProviderConfig,
		_filter: &'a QueryFilter,
		_page: u32,
	) -> BoxFuture<'a, scout_providers::Result<AwardPage>> {
		let result = if self.reachable {
			Ok(AwardPage { records: (0..self.offices).map(record).collect(), has_next: false })
		} else {
			Err(scout_providers::Error::Unreachable { message: "connection refused".to_string() })
		};

		Box::pin(async move { result })
	}

	fn count<'a>(
		&'a self,
		_cfg: &'a AwardSearchProviderConfig,
		_filter: &'a QueryFilter,
	) -> BoxFuture<'a, scout_providers::Result<u64>> {
		Box::pin(async move { Ok(0) })
	}
}

struct EmptyRegistry;
impl CommandRegistryProvider for EmptyRegistry {
	fn lookup<'a>(
		&'a self,
		_cfg: &'a CommandRegistryProviderConfig,
		_naics: &'a str,
		_cap: u32,
	) -> BoxFuture<'a, scout_providers::Result<RegistryResult>> {
		Box::pin(async move { Ok(RegistryResult::default()) })
	}
}

fn record(i: usize) -> AwardRecord {
	AwardRecord {
		award_id: Some(format!("AWD-{i}")),
		awarding_agency: "Department of Energy".to_string(),
		awarding_sub_agency: Some("Office of Science".to_string()),
		awarding_office: Some(format!("Field Office {i}")),
		agency_slug: Some("department-of-energy".to_string()),
		agency_id: None,
		agency_code: Some("089".to_string()),
		sub_agency_code: None,
		place_of_performance_state: Some("TN".to_string()),
		amount_cents: 10_000 * (i as i64 + 1),
		set_aside_type: None,
		offers_received: Some(2),
	}
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		providers: scout_config::Providers {
			award_search: AwardSearchProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				search_path: "/api/v2/search/spending_by_award/".to_string(),
				count_path: "/api/v2/search/spending_by_award_count/".to_string(),
				timeout_ms: 1_000,
				page_size: 100,
				page_delay_ms: 0,
				default_headers: Map::new(),
			},
			command_registry: CommandRegistryProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				path: "/v1/awards".to_string(),
				timeout_ms: 1_000,
				result_cap: 100,
				default_headers: Map::new(),
			},
		},
		discovery: Discovery::default(),
		normalizer: Normalizer::default(),
		enrichment: Enrichment::default(),
		suggestions: Suggestions::default(),
	}
}

fn app(search: FixedSearch) -> Router {
	let providers = Providers::new(Arc::new(search), Arc::new(EmptyRegistry));

	routes::router(AppState::with_providers(test_config(), providers))
}

async fn post_search(app: Router, body: &str) -> (StatusCode, Value) {
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/agencies/search")
				.header("content-type", "application/json")
				.body(Body::from(body.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call search.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let response = app(FixedSearch { reachable: true, offices: 0 })
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_returns_ranked_offices() {
	let (status, json) = post_search(
		app(FixedSearch { reachable: true, offices: 3 }),
		r#"{ "industry_code": "541512", "certification": "none" }"#,
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["offices"].as_array().map(Vec::len), Some(3));
	assert_eq!(json["offices"][0]["name"], "Field Office 2");
	assert_eq!(json["offices"][0]["enrichment"], "none");
	assert_eq!(json["total_spend_cents"], 60_000);
	assert_eq!(json["location_tier"], "nationwide");
	assert_eq!(json["expansion_steps"][0]["strategy"], "initial");
	assert!(json["search_id"].is_string());
}

#[tokio::test]
async fn unknown_industry_code_lists_suggestions() {
	let (status, json) = post_search(
		app(FixedSearch { reachable: true, offices: 3 }),
		r#"{ "industry_code": "9999" }"#,
	)
	.await;

	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(json["error_code"], "invalid_industry_code");
	assert!(json["suggestions"].as_array().is_some_and(|suggestions| !suggestions.is_empty()));
	assert!(json["suggestions"][0]["code"].is_string());
}

#[tokio::test]
async fn non_ascii_digits_are_an_unknown_industry_code() {
	let (status, json) = post_search(
		app(FixedSearch { reachable: true, offices: 3 }),
		r#"{ "industry_code": "१२" }"#,
	)
	.await;

	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(json["error_code"], "invalid_industry_code");
	assert!(json["suggestions"].as_array().is_some_and(|suggestions| !suggestions.is_empty()));
}

#[tokio::test]
async fn malformed_bodies_are_invalid_requests() {
	let bodies = [
		r#"{ "industry_code": "#,
		r#"{ "certification": "platinum" }"#,
		r#"{ "zip": "2019" }"#,
		r#"{ "zip": "20191-12" }"#,
	];

	for body in bodies {
		let (status, json) =
			post_search(app(FixedSearch { reachable: true, offices: 1 }), body).await;

		assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
		assert_eq!(json["error_code"], "invalid_request");
		assert!(json.get("suggestions").is_none());
	}
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
	let (status, json) = post_search(
		app(FixedSearch { reachable: false, offices: 0 }),
		r#"{ "industry_code": "541512", "zip": "20191" }"#,
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "search_failed");
}
