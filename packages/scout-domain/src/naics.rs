//! Industry code normalization.
//!
//! Users type industry codes loosely: a six-digit code padded with zeros usually means "anything
//! in this group". Normalization validates the code, collapses padding to the most specific real
//! prefix, and expands that prefix to the concrete six-digit codes the award search understands.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

const CODE_PATTERN: &str = r"^[0-9]{2,6}$";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeLevel {
	Sector,
	Subsector,
	NationalIndustry,
}
impl CodeLevel {
	pub const fn for_length(len: usize) -> Self {
		match len {
			0..=2 => Self::Sector,
			3..=5 => Self::Subsector,
			_ => Self::NationalIndustry,
		}
	}

	pub const fn label(self) -> &'static str {
		match self {
			Self::Sector => "sector",
			Self::Subsector => "subsector",
			Self::NationalIndustry => "industry",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCode {
	pub input: String,
	pub canonical: String,
	pub level: CodeLevel,
	pub title: String,
	pub leaf_codes: Vec<String>,
	pub correction_message: Option<String>,
}
impl NormalizedCode {
	/// Leaf codes precise enough for registries indexed by six-digit codes only.
	pub fn precise_leaf_codes(&self) -> impl Iterator<Item = &str> {
		self.leaf_codes.iter().map(String::as_str).filter(|code| code.len() == 6)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSuggestion {
	pub code: String,
	pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidIndustryCode {
	pub code: String,
	pub suggestions: Vec<CodeSuggestion>,
}
impl fmt::Display for InvalidIndustryCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Industry code '{}' is not recognized.", self.code)
	}
}
impl std::error::Error for InvalidIndustryCode {}

/// Trailing-zero collapse rule: a code of `length` digits ending in `zeros` zeros keeps its first
/// `keep` digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollapseRule {
	pub length: usize,
	pub zeros: usize,
	pub keep: usize,
}
impl CollapseRule {
	pub fn matches(&self, code: &str) -> bool {
		code.len() == self.length && code.bytes().rev().take(self.zeros).all(|b| b == b'0')
	}

	pub fn apply<'a>(&self, code: &'a str) -> &'a str {
		&code[..self.keep]
	}
}

/// Evaluated in order; the first matching rule wins each round.
pub const COLLAPSE_RULES: [CollapseRule; 6] = [
	CollapseRule { length: 6, zeros: 3, keep: 3 },
	CollapseRule { length: 6, zeros: 2, keep: 4 },
	CollapseRule { length: 5, zeros: 3, keep: 2 },
	CollapseRule { length: 5, zeros: 2, keep: 3 },
	CollapseRule { length: 4, zeros: 2, keep: 2 },
	CollapseRule { length: 4, zeros: 1, keep: 3 },
];

struct Subsector {
	code: &'static str,
	title: &'static str,
	leaves: &'static [&'static str],
}

const SECTORS: &[(&str, &str)] = &[
	("11", "Agriculture, Forestry, Fishing and Hunting"),
	("21", "Mining, Quarrying, and Oil and Gas Extraction"),
	("22", "Utilities"),
	("23", "Construction"),
	("31", "Manufacturing"),
	("32", "Manufacturing"),
	("33", "Manufacturing"),
	("42", "Wholesale Trade"),
	("44", "Retail Trade"),
	("45", "Retail Trade"),
	("48", "Transportation and Warehousing"),
	("49", "Transportation and Warehousing"),
	("51", "Information"),
	("52", "Finance and Insurance"),
	("53", "Real Estate and Rental and Leasing"),
	("54", "Professional, Scientific, and Technical Services"),
	("55", "Management of Companies and Enterprises"),
	("56", "Administrative and Support and Waste Management and Remediation Services"),
	("61", "Educational Services"),
	("62", "Health Care and Social Assistance"),
	("71", "Arts, Entertainment, and Recreation"),
	("72", "Accommodation and Food Services"),
	("81", "Other Services (except Public Administration)"),
	("92", "Public Administration"),
];

const SUBSECTORS: &[Subsector] = &[
	Subsector {
		code: "221",
		title: "Utilities",
		leaves: &[
			"221111", "221112", "221113", "221114", "221115", "221116", "221117", "221118",
			"221121", "221122", "221210", "221310", "221320", "221330",
		],
	},
	Subsector {
		code: "236",
		title: "Construction of Buildings",
		leaves: &["236115", "236116", "236117", "236118", "236210", "236220"],
	},
	Subsector {
		code: "237",
		title: "Heavy and Civil Engineering Construction",
		leaves: &["237110", "237120", "237130", "237210", "237310", "237990"],
	},
	Subsector {
		code: "238",
		title: "Specialty Trade Contractors",
		leaves: &[
			"238110", "238120", "238130", "238140", "238150", "238160", "238170", "238190",
			"238210", "238220", "238290", "238310", "238320", "238330", "238340", "238350",
			"238390", "238910", "238990",
		],
	},
	Subsector {
		code: "334",
		title: "Computer and Electronic Product Manufacturing",
		leaves: &[
			"334111", "334112", "334118", "334210", "334220", "334290", "334310", "334412",
			"334413", "334416", "334417", "334418", "334419", "334510", "334511", "334512",
			"334513", "334514", "334515", "334516", "334517", "334519", "334610",
		],
	},
	Subsector {
		code: "336",
		title: "Transportation Equipment Manufacturing",
		leaves: &[
			"336411", "336412", "336413", "336414", "336415", "336419", "336611", "336612",
			"336992",
		],
	},
	Subsector {
		code: "423",
		title: "Merchant Wholesalers, Durable Goods",
		leaves: &["423430", "423450", "423490", "423610", "423690", "423840"],
	},
	Subsector {
		code: "424",
		title: "Merchant Wholesalers, Nondurable Goods",
		leaves: &["424120", "424210", "424410", "424690", "424720"],
	},
	Subsector {
		code: "484",
		title: "Truck Transportation",
		leaves: &["484110", "484121", "484122", "484210", "484220", "484230"],
	},
	Subsector {
		code: "488",
		title: "Support Activities for Transportation",
		leaves: &[
			"488190", "488210", "488310", "488320", "488330", "488390", "488410", "488490",
			"488510", "488991", "488999",
		],
	},
	Subsector {
		code: "493",
		title: "Warehousing and Storage",
		leaves: &["493110", "493120", "493130", "493190"],
	},
	Subsector {
		code: "513",
		title: "Publishing Industries",
		leaves: &["513110", "513120", "513130", "513140", "513191", "513199", "513210"],
	},
	Subsector {
		code: "517",
		title: "Telecommunications",
		leaves: &["517111", "517112", "517121", "517122", "517410", "517810"],
	},
	Subsector {
		code: "518",
		title: "Computing Infrastructure Providers, Data Processing, Web Hosting, and Related Services",
		leaves: &["518210"],
	},
	Subsector {
		code: "519",
		title: "Web Search Portals, Libraries, Archives, and Other Information Services",
		leaves: &["519210", "519290"],
	},
	Subsector {
		code: "524",
		title: "Insurance Carriers and Related Activities",
		leaves: &[
			"524113", "524114", "524126", "524127", "524128", "524130", "524210", "524291",
			"524292", "524298",
		],
	},
	Subsector {
		code: "531",
		title: "Real Estate",
		leaves: &[
			"531110", "531120", "531130", "531190", "531210", "531311", "531312", "531320",
			"531390",
		],
	},
	Subsector {
		code: "532",
		title: "Rental and Leasing Services",
		leaves: &["532111", "532112", "532120", "532411", "532412", "532420", "532490"],
	},
	Subsector {
		code: "541",
		title: "Professional, Scientific, and Technical Services",
		leaves: &[
			"541110", "541120", "541191", "541199", "541211", "541213", "541214", "541219",
			"541310", "541320", "541330", "541340", "541350", "541360", "541370", "541380",
			"541410", "541420", "541430", "541490", "541511", "541512", "541513", "541519",
			"541611", "541612", "541613", "541614", "541618", "541620", "541690", "541713",
			"541714", "541715", "541720", "541810", "541820", "541830", "541840", "541850",
			"541860", "541870", "541890", "541910", "541921", "541922", "541930", "541940",
			"541990",
		],
	},
	Subsector {
		code: "561",
		title: "Administrative and Support Services",
		leaves: &[
			"561110", "561210", "561311", "561312", "561320", "561330", "561410", "561421",
			"561422", "561431", "561439", "561440", "561450", "561491", "561492", "561499",
			"561510", "561520", "561591", "561599", "561611", "561612", "561613", "561621",
			"561622", "561710", "561720", "561730", "561740", "561790", "561910", "561920",
			"561990",
		],
	},
	Subsector {
		code: "562",
		title: "Waste Management and Remediation Services",
		leaves: &[
			"562111", "562112", "562119", "562211", "562212", "562213", "562219", "562910",
			"562920", "562991", "562998",
		],
	},
	Subsector {
		code: "611",
		title: "Educational Services",
		leaves: &[
			"611110", "611210", "611310", "611410", "611420", "611430", "611511", "611512",
			"611513", "611519", "611610", "611620", "611630", "611691", "611692", "611699",
			"611710",
		],
	},
	Subsector {
		code: "621",
		title: "Ambulatory Health Care Services",
		leaves: &[
			"621111", "621112", "621210", "621310", "621320", "621330", "621340", "621391",
			"621399", "621410", "621420", "621491", "621492", "621493", "621498", "621511",
			"621512", "621610", "621910", "621991", "621999",
		],
	},
	Subsector { code: "622", title: "Hospitals", leaves: &["622110", "622210", "622310"] },
	Subsector {
		code: "624",
		title: "Social Assistance",
		leaves: &[
			"624110", "624120", "624190", "624210", "624221", "624229", "624230", "624310",
			"624410",
		],
	},
	Subsector {
		code: "721",
		title: "Accommodation",
		leaves: &["721110", "721120", "721191", "721199", "721211", "721214", "721310"],
	},
	Subsector {
		code: "722",
		title: "Food Services and Drinking Places",
		leaves: &["722310", "722320", "722330", "722511", "722513", "722514", "722515"],
	},
	Subsector {
		code: "811",
		title: "Repair and Maintenance",
		leaves: &[
			"811111", "811114", "811121", "811122", "811191", "811192", "811198", "811210",
			"811310", "811411", "811412", "811420", "811430", "811490",
		],
	},
	Subsector {
		code: "812",
		title: "Personal and Laundry Services",
		leaves: &[
			"812111", "812112", "812113", "812191", "812199", "812210", "812220", "812310",
			"812320", "812331", "812332", "812910", "812921", "812922", "812930", "812990",
		],
	},
	Subsector {
		code: "813",
		title: "Religious, Grantmaking, Civic, Professional, and Similar Organizations",
		leaves: &[
			"813110", "813211", "813212", "813219", "813311", "813312", "813319", "813410",
			"813910", "813920", "813930", "813940", "813990",
		],
	},
	Subsector { code: "814", title: "Private Households", leaves: &["814110"] },
];

/// Validates and expands a user-supplied industry code.
pub fn normalize(
	raw: &str,
	cfg: &scout_config::Normalizer,
) -> Result<NormalizedCode, InvalidIndustryCode> {
	let input = raw.trim();

	if !is_valid(input) {
		return Err(InvalidIndustryCode {
			code: input.to_string(),
			suggestions: suggest(input, cfg.max_suggestions as usize),
		});
	}

	let canonical = resolve_prefix(input);
	let level = CodeLevel::for_length(canonical.len());
	let title = title_for(&canonical);
	let leaf_codes = leaves_for_prefix(&canonical)
		.map(|leaves| leaves.into_iter().map(str::to_string).collect::<Vec<_>>())
		.filter(|leaves| !leaves.is_empty())
		.unwrap_or_else(|| vec![canonical.clone()]);
	let correction_message = (canonical != input).then(|| {
		format!(
			"Industry code {input} was interpreted as {} {canonical} ({title}); searching {} related industry code{}.",
			level.label(),
			leaf_codes.len(),
			if leaf_codes.len() == 1 { "" } else { "s" },
		)
	});

	Ok(NormalizedCode {
		input: input.to_string(),
		canonical,
		level,
		title,
		leaf_codes,
		correction_message,
	})
}

pub fn is_valid(code: &str) -> bool {
	if !Regex::new(CODE_PATTERN).map(|re| re.is_match(code)).unwrap_or(false) {
		return false;
	}
	if sector_of(code).is_none() {
		return false;
	}

	code.len() < 6 || is_leaf(code) || code.ends_with("00")
}

pub fn is_leaf(code: &str) -> bool {
	SUBSECTORS.iter().any(|subsector| subsector.leaves.contains(&code))
}

/// A prefix is real when it names a sector, a subsector, or the start of a known leaf code.
pub fn is_real_prefix(code: &str) -> bool {
	match code.len() {
		2 => sector_title(code).is_some(),
		3 => subsector(code).is_some(),
		_ => SUBSECTORS
			.iter()
			.flat_map(|subsector| subsector.leaves.iter())
			.any(|leaf| leaf.starts_with(code)),
	}
}

pub fn sector_title(code: &str) -> Option<&'static str> {
	SECTORS.iter().find(|(sector, _)| *sector == code).map(|(_, title)| *title)
}

/// Expands a two- or three-digit prefix to its leaf codes. `None` means the table has no mapping.
pub fn leaves_for_prefix(prefix: &str) -> Option<Vec<&'static str>> {
	match prefix.len() {
		3 => subsector(prefix).map(|subsector| subsector.leaves.to_vec()),
		2 => {
			let leaves: Vec<&'static str> = SUBSECTORS
				.iter()
				.filter(|subsector| subsector.code.starts_with(prefix))
				.flat_map(|subsector| subsector.leaves.iter().copied())
				.collect();

			(!leaves.is_empty()).then_some(leaves)
		},
		_ => None,
	}
}

/// The sector a code belongs to, when it is at least two digits long.
pub fn sector_of(code: &str) -> Option<&str> {
	code.get(..2).filter(|sector| sector_title(sector).is_some())
}

fn subsector(code: &str) -> Option<&'static Subsector> {
	SUBSECTORS.iter().find(|subsector| subsector.code == code)
}

fn resolve_prefix(code: &str) -> String {
	if code.len() == 6 && is_leaf(code) {
		return code.to_string();
	}

	let mut current = code;

	while let Some(rule) = COLLAPSE_RULES.iter().find(|rule| rule.matches(current)) {
		current = rule.apply(current);

		if is_real_prefix(current) {
			break;
		}
	}

	match current.len() {
		4 | 5 => {
			let subsector_code = &current[..3];

			if subsector(subsector_code).is_some() {
				subsector_code.to_string()
			} else {
				current[..2].to_string()
			}
		},
		3 if subsector(current).is_none() => current[..2].to_string(),
		_ => current.to_string(),
	}
}

fn title_for(code: &str) -> String {
	let title = match code.len() {
		2 => sector_title(code),
		_ => subsector(&code[..3])
			.map(|subsector| subsector.title)
			.or_else(|| sector_title(&code[..2])),
	};

	title.unwrap_or("Unclassified").to_string()
}

fn suggest(input: &str, max: usize) -> Vec<CodeSuggestion> {
	let digits: String = input.chars().filter(char::is_ascii_digit).take(6).collect();
	let mut scored: Vec<(usize, CodeSuggestion)> = Vec::new();

	for subsector in SUBSECTORS {
		for leaf in subsector.leaves {
			scored.push((
				common_prefix_len(&digits, leaf),
				CodeSuggestion { code: leaf.to_string(), title: subsector.title.to_string() },
			));
		}

		scored.push((
			common_prefix_len(&digits, subsector.code),
			CodeSuggestion { code: subsector.code.to_string(), title: subsector.title.to_string() },
		));
	}
	for (code, title) in SECTORS {
		scored.push((
			common_prefix_len(&digits, code),
			CodeSuggestion { code: code.to_string(), title: title.to_string() },
		));
	}

	let best = scored.iter().map(|(score, _)| *score).max().unwrap_or(0);

	if best == 0 {
		return SECTORS
			.iter()
			.take(max.max(1))
			.map(|(code, title)| CodeSuggestion { code: code.to_string(), title: title.to_string() })
			.collect();
	}

	scored.sort_by(|(lhs, _), (rhs, _)| rhs.cmp(lhs));

	scored.into_iter().take(max.max(1)).map(|(_, suggestion)| suggestion).collect()
}

fn common_prefix_len(lhs: &str, rhs: &str) -> usize {
	lhs.bytes().zip(rhs.bytes()).take_while(|(l, r)| l == r).count()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cfg() -> scout_config::Normalizer {
		scout_config::Normalizer { max_suggestions: 5 }
	}

	#[test]
	fn collapse_rules_match_by_length_and_padding() {
		assert!(COLLAPSE_RULES[0].matches("541000"));
		assert!(!COLLAPSE_RULES[0].matches("541500"));
		assert!(COLLAPSE_RULES[1].matches("541500"));
		assert!(COLLAPSE_RULES[2].matches("81000"));
		assert!(COLLAPSE_RULES[3].matches("81100"));
		assert!(COLLAPSE_RULES[4].matches("5400"));
		assert!(COLLAPSE_RULES[5].matches("5410"));
		assert!(!COLLAPSE_RULES[5].matches("5417"));
		assert_eq!(COLLAPSE_RULES[1].apply("541500"), "5415");
	}

	#[test]
	fn leaf_codes_pass_through() {
		let normalized = normalize("541512", &cfg()).expect("Expected a valid code.");

		assert_eq!(normalized.canonical, "541512");
		assert_eq!(normalized.level, CodeLevel::NationalIndustry);
		assert_eq!(normalized.leaf_codes, vec!["541512".to_string()]);
		assert_eq!(normalized.correction_message, None);
	}

	#[test]
	fn four_digit_codes_map_to_their_subsector() {
		let normalized = normalize("5417", &cfg()).expect("Expected a valid code.");

		assert_eq!(normalized.canonical, "541");
		assert_eq!(normalized.level, CodeLevel::Subsector);
		assert!(normalized.leaf_codes.contains(&"541715".to_string()));
		assert!(normalized.leaf_codes.iter().all(|code| code.starts_with("541")));
		assert!(normalized.correction_message.is_some());
	}

	#[test]
	fn padded_five_digit_code_collapses_to_sector() {
		let normalized = normalize("81000", &cfg()).expect("Expected a valid code.");

		assert_eq!(normalized.canonical, "81");
		assert_eq!(normalized.level, CodeLevel::Sector);
		assert!(normalized.leaf_codes.contains(&"811111".to_string()));
		assert!(normalized.leaf_codes.contains(&"813990".to_string()));

		let message = normalized.correction_message.expect("Expected a correction message.");

		assert!(message.contains("sector 81"), "Unexpected message: {message}");
		assert!(message.contains("Other Services"), "Unexpected message: {message}");
	}

	#[test]
	fn padded_six_digit_code_stops_at_first_real_prefix() {
		assert_eq!(normalize("541500", &cfg()).map(|code| code.canonical), Ok("541".to_string()));
		assert_eq!(normalize("236000", &cfg()).map(|code| code.canonical), Ok("236".to_string()));
		assert_eq!(normalize("230000", &cfg()).map(|code| code.canonical), Ok("23".to_string()));
	}

	#[test]
	fn unmapped_three_digit_code_falls_back_to_sector() {
		let normalized = normalize("542", &cfg()).expect("Expected a valid code.");

		assert_eq!(normalized.canonical, "54");
		assert!(!normalized.leaf_codes.is_empty());
	}

	#[test]
	fn sector_without_table_mapping_uses_the_code_itself() {
		let normalized = normalize("92", &cfg()).expect("Expected a valid code.");

		assert_eq!(normalized.leaf_codes, vec!["92".to_string()]);
		assert_eq!(normalized.correction_message, None);
	}

	#[test]
	fn unknown_codes_carry_suggestions() {
		for raw in ["99", "5", "abc", "541999", "1234567"] {
			let err = normalize(raw, &cfg()).expect_err("Expected an invalid code.");

			assert!(!err.suggestions.is_empty(), "No suggestions for {raw}.");
			assert!(err.suggestions.len() <= 5);
		}

		let err = normalize("541999", &cfg()).expect_err("Expected an invalid code.");

		assert_eq!(err.suggestions[0].code, "541990");
	}

	#[test]
	fn non_ascii_digits_are_rejected_with_suggestions() {
		for raw in ["१२", "５４１５１２", "54١"] {
			assert!(!is_valid(raw), "{raw} should not be valid.");

			let err = normalize(raw, &cfg()).expect_err("Expected an invalid code.");

			assert!(!err.suggestions.is_empty(), "No suggestions for {raw}.");
		}
	}

	#[test]
	fn every_valid_prefix_resolves_to_leaf_codes() {
		for (sector, _) in SECTORS {
			for suffix in ["", "0", "00", "000", "0000", "1", "10", "100", "1000"] {
				let code = format!("{sector}{suffix}");

				if !is_valid(&code) {
					continue;
				}

				let normalized = normalize(&code, &cfg()).expect("Valid code must normalize.");

				assert!(!normalized.leaf_codes.is_empty(), "Empty expansion for {code}.");
			}
		}
	}
}
