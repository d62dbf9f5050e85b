use time::macros::date;

use scout_domain::{
	Certification, CodeLevel, LocationTier, SearchCriteria, filter, geo, naics, set_aside,
};

fn normalizer() -> scout_config::Normalizer {
	scout_config::Normalizer { max_suggestions: 3 }
}

#[test]
fn small_business_software_search_in_virginia() {
	let criteria = SearchCriteria {
		certification: Certification::SmallBusiness,
		industry_code: Some("5417".to_string()),
		zip: Some("20191".to_string()),
		..Default::default()
	};
	let code = naics::normalize(criteria.industry_code().unwrap_or_default(), &normalizer())
		.expect("5417 should normalize.");
	let filter = filter::build_filter(&criteria, Some(&code), date!(2026 - 10 - 19));

	assert_eq!(code.canonical, "541");
	assert_eq!(code.level, CodeLevel::Subsector);
	assert_eq!(filter.industry_codes.as_ref().map(Vec::len), Some(code.leaf_codes.len()));
	assert_eq!(filter.locations, Some(vec!["VA".to_string()]));
	assert!(set_aside::is_broad_small_business(&criteria));

	let state = geo::zip_to_state("20191").expect("20191 should resolve.");
	let bordering = geo::tier_states(state, LocationTier::Bordering).expect("Expected states.");

	assert!(bordering.contains(&"MD".to_string()));
	assert!(bordering.contains(&"DC".to_string()));
}

#[test]
fn invalid_code_suggestions_are_bounded() {
	let err = naics::normalize("9999", &normalizer()).expect_err("9999 is not a real code.");

	assert_eq!(err.code, "9999");
	assert_eq!(err.suggestions.len(), 3);
	assert_eq!(err.to_string(), "Industry code '9999' is not recognized.");
}

#[test]
fn socioeconomic_certifications_exclude_plain_size_status() {
	assert!(Certification::EightA.is_socioeconomic());
	assert!(Certification::Wosb.is_socioeconomic());
	assert!(!Certification::SmallBusiness.is_socioeconomic());
	assert!(!Certification::None.is_socioeconomic());
}
