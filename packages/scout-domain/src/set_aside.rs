use crate::{Certification, SearchCriteria, VeteranStatus};

/// Total and partial small-business set-asides.
pub const GENERIC_SMALL_BUSINESS: &[&str] = &["SBA", "SBP"];

/// Every set-aside type reserved for some class of small business.
pub const ALL_SMALL_BUSINESS: &[&str] = &[
	"SBA", "SBP", "8A", "8AN", "HZC", "HZS", "SDVOSBC", "SDVOSBS", "WOSB", "WOSBSS", "EDWOSB",
	"EDWOSBSS", "VSA", "VSS",
];

pub fn certification_codes(certification: Certification) -> &'static [&'static str] {
	match certification {
		Certification::None => &[],
		Certification::SmallBusiness => GENERIC_SMALL_BUSINESS,
		Certification::EightA => &["8A", "8AN"],
		Certification::Hubzone => &["HZC", "HZS"],
		Certification::Wosb => &["WOSB", "WOSBSS"],
		Certification::Edwosb => &["EDWOSB", "EDWOSBSS"],
		Certification::Sdvosb => &["SDVOSBC", "SDVOSBS"],
	}
}

pub fn veteran_codes(status: VeteranStatus) -> &'static [&'static str] {
	match status {
		VeteranStatus::None => &[],
		VeteranStatus::Veteran => &["VSA", "VSS"],
		VeteranStatus::ServiceDisabledVeteran => &["SDVOSBC", "SDVOSBS"],
	}
}

/// Certification codes followed by veteran codes. Repeats are kept; the award search tolerates them.
pub fn codes_for(criteria: &SearchCriteria) -> Vec<String> {
	certification_codes(criteria.certification)
		.iter()
		.chain(veteran_codes(criteria.veteran_status))
		.map(|code| code.to_string())
		.collect()
}

/// True when the request is already a plain small-business search.
pub fn is_broad_small_business(criteria: &SearchCriteria) -> bool {
	criteria.certification == Certification::SmallBusiness
		&& criteria.veteran_status == VeteranStatus::None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn concatenates_certification_and_veteran_codes() {
		let criteria = SearchCriteria {
			certification: Certification::Sdvosb,
			veteran_status: VeteranStatus::ServiceDisabledVeteran,
			..Default::default()
		};

		assert_eq!(codes_for(&criteria), ["SDVOSBC", "SDVOSBS", "SDVOSBC", "SDVOSBS"]);
	}

	#[test]
	fn no_inputs_means_no_set_aside() {
		assert!(codes_for(&SearchCriteria::default()).is_empty());
	}

	#[test]
	fn every_mapped_code_is_a_small_business_code() {
		for certification in [
			Certification::SmallBusiness,
			Certification::EightA,
			Certification::Hubzone,
			Certification::Wosb,
			Certification::Edwosb,
			Certification::Sdvosb,
		] {
			for code in certification_codes(certification) {
				assert!(ALL_SMALL_BUSINESS.contains(code), "{code} is missing.");
			}
		}
	}
}
