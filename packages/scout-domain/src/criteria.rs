use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Business certification the searching contractor holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Certification {
	#[default]
	None,
	#[serde(alias = "small business", alias = "Small Business")]
	SmallBusiness,
	#[serde(rename = "8a", alias = "8(a)")]
	EightA,
	#[serde(alias = "HUBZone")]
	Hubzone,
	#[serde(alias = "WOSB")]
	Wosb,
	#[serde(alias = "EDWOSB")]
	Edwosb,
	#[serde(alias = "SDVOSB")]
	Sdvosb,
}
impl Certification {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::SmallBusiness => "small_business",
			Self::EightA => "8a",
			Self::Hubzone => "hubzone",
			Self::Wosb => "wosb",
			Self::Edwosb => "edwosb",
			Self::Sdvosb => "sdvosb",
		}
	}

	pub const fn label(self) -> &'static str {
		match self {
			Self::None => "no certification",
			Self::SmallBusiness => "Small Business",
			Self::EightA => "8(a)",
			Self::Hubzone => "HUBZone",
			Self::Wosb => "Women-Owned Small Business",
			Self::Edwosb => "Economically Disadvantaged Women-Owned Small Business",
			Self::Sdvosb => "Service-Disabled Veteran-Owned Small Business",
		}
	}

	/// Certifications tied to a specific socioeconomic program rather than plain size status.
	pub const fn is_socioeconomic(self) -> bool {
		matches!(self, Self::EightA | Self::Hubzone | Self::Wosb | Self::Edwosb | Self::Sdvosb)
	}
}
impl fmt::Display for Certification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Certification {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
			"" | "none" => Ok(Self::None),
			"small_business" | "sb" => Ok(Self::SmallBusiness),
			"8a" | "8(a)" => Ok(Self::EightA),
			"hubzone" => Ok(Self::Hubzone),
			"wosb" => Ok(Self::Wosb),
			"edwosb" => Ok(Self::Edwosb),
			"sdvosb" => Ok(Self::Sdvosb),
			other => Err(format!("Unknown certification '{other}'.")),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VeteranStatus {
	#[default]
	None,
	Veteran,
	ServiceDisabledVeteran,
}
impl VeteranStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Veteran => "veteran",
			Self::ServiceDisabledVeteran => "service_disabled_veteran",
		}
	}
}
impl fmt::Display for VeteranStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for VeteranStatus {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
			"" | "none" => Ok(Self::None),
			"veteran" | "vosb" => Ok(Self::Veteran),
			"service_disabled_veteran" | "service_disabled" | "sdvosb" => {
				Ok(Self::ServiceDisabledVeteran)
			},
			other => Err(format!("Unknown veteran status '{other}'.")),
		}
	}
}

/// One discovery request. Blank strings are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
	pub certification: Certification,
	pub industry_code: Option<String>,
	pub zip: Option<String>,
	pub veteran_status: VeteranStatus,
	pub product_service_code: Option<String>,
	pub exclude_dod: bool,
}
impl SearchCriteria {
	pub fn industry_code(&self) -> Option<&str> {
		non_blank(self.industry_code.as_deref())
	}

	pub fn zip(&self) -> Option<&str> {
		non_blank(self.zip.as_deref())
	}

	pub fn product_service_code(&self) -> Option<&str> {
		non_blank(self.product_service_code.as_deref())
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_sparse_criteria() {
		let criteria: SearchCriteria = serde_json::from_value(serde_json::json!({
			"certification": "8a",
			"industry_code": " 5417 ",
			"zip": ""
		}))
		.expect("Failed to parse criteria.");

		assert_eq!(criteria.certification, Certification::EightA);
		assert_eq!(criteria.industry_code(), Some("5417"));
		assert_eq!(criteria.zip(), None);
		assert_eq!(criteria.veteran_status, VeteranStatus::None);
		assert!(!criteria.exclude_dod);
	}

	#[test]
	fn parses_certification_labels() {
		assert_eq!("Small Business".parse::<Certification>(), Ok(Certification::SmallBusiness));
		assert_eq!("8(a)".parse::<Certification>(), Ok(Certification::EightA));
		assert!("platinum".parse::<Certification>().is_err());
		assert_eq!(
			"service-disabled-veteran".parse::<VeteranStatus>(),
			Ok(VeteranStatus::ServiceDisabledVeteran)
		);
	}
}
