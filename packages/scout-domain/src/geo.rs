use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How far the place-of-performance filter has been widened from the user's own state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTier {
	State,
	Bordering,
	Regional,
	Nationwide,
}
impl LocationTier {
	pub const fn number(self) -> u8 {
		match self {
			Self::State => 1,
			Self::Bordering => 2,
			Self::Regional => 3,
			Self::Nationwide => 4,
		}
	}

	pub const fn label(self) -> &'static str {
		match self {
			Self::State => "your state",
			Self::Bordering => "your state and bordering states",
			Self::Regional => "your extended region",
			Self::Nationwide => "nationwide",
		}
	}
}

/// Inclusive ZIP3 ranges. Military and unassigned prefixes are absent.
const ZIP3_RANGES: &[(u16, u16, &str)] = &[
	(5, 5, "NY"),
	(6, 7, "PR"),
	(8, 8, "VI"),
	(9, 9, "PR"),
	(10, 27, "MA"),
	(28, 29, "RI"),
	(30, 38, "NH"),
	(39, 49, "ME"),
	(50, 54, "VT"),
	(55, 55, "MA"),
	(56, 59, "VT"),
	(60, 69, "CT"),
	(70, 89, "NJ"),
	(100, 149, "NY"),
	(150, 196, "PA"),
	(197, 199, "DE"),
	(200, 200, "DC"),
	(201, 201, "VA"),
	(202, 205, "DC"),
	(206, 219, "MD"),
	(220, 246, "VA"),
	(247, 268, "WV"),
	(270, 289, "NC"),
	(290, 299, "SC"),
	(300, 319, "GA"),
	(320, 349, "FL"),
	(350, 369, "AL"),
	(370, 385, "TN"),
	(386, 397, "MS"),
	(398, 399, "GA"),
	(400, 427, "KY"),
	(430, 459, "OH"),
	(460, 479, "IN"),
	(480, 499, "MI"),
	(500, 528, "IA"),
	(530, 549, "WI"),
	(550, 567, "MN"),
	(569, 569, "DC"),
	(570, 577, "SD"),
	(580, 588, "ND"),
	(590, 599, "MT"),
	(600, 629, "IL"),
	(630, 658, "MO"),
	(660, 679, "KS"),
	(680, 693, "NE"),
	(700, 714, "LA"),
	(716, 729, "AR"),
	(730, 732, "OK"),
	(733, 733, "TX"),
	(734, 749, "OK"),
	(750, 799, "TX"),
	(800, 816, "CO"),
	(820, 831, "WY"),
	(832, 838, "ID"),
	(840, 847, "UT"),
	(850, 865, "AZ"),
	(870, 884, "NM"),
	(885, 885, "TX"),
	(889, 898, "NV"),
	(900, 961, "CA"),
	(967, 968, "HI"),
	(969, 969, "GU"),
	(970, 979, "OR"),
	(980, 994, "WA"),
	(995, 999, "AK"),
];

const NEIGHBORS: &[(&str, &[&str])] = &[
	("AK", &[]),
	("AL", &["FL", "GA", "MS", "TN"]),
	("AR", &["LA", "MO", "MS", "OK", "TN", "TX"]),
	("AZ", &["CA", "CO", "NM", "NV", "UT"]),
	("CA", &["AZ", "NV", "OR"]),
	("CO", &["AZ", "KS", "NE", "NM", "OK", "UT", "WY"]),
	("CT", &["MA", "NY", "RI"]),
	("DC", &["MD", "VA"]),
	("DE", &["MD", "NJ", "PA"]),
	("FL", &["AL", "GA"]),
	("GA", &["AL", "FL", "NC", "SC", "TN"]),
	("GU", &[]),
	("HI", &[]),
	("IA", &["IL", "MN", "MO", "NE", "SD", "WI"]),
	("ID", &["MT", "NV", "OR", "UT", "WA", "WY"]),
	("IL", &["IA", "IN", "KY", "MO", "WI"]),
	("IN", &["IL", "KY", "MI", "OH"]),
	("KS", &["CO", "MO", "NE", "OK"]),
	("KY", &["IL", "IN", "MO", "OH", "TN", "VA", "WV"]),
	("LA", &["AR", "MS", "TX"]),
	("MA", &["CT", "NH", "NY", "RI", "VT"]),
	("MD", &["DC", "DE", "PA", "VA", "WV"]),
	("ME", &["NH"]),
	("MI", &["IN", "OH", "WI"]),
	("MN", &["IA", "ND", "SD", "WI"]),
	("MO", &["AR", "IA", "IL", "KS", "KY", "NE", "OK", "TN"]),
	("MS", &["AL", "AR", "LA", "TN"]),
	("MT", &["ID", "ND", "SD", "WY"]),
	("NC", &["GA", "SC", "TN", "VA"]),
	("ND", &["MN", "MT", "SD"]),
	("NE", &["CO", "IA", "KS", "MO", "SD", "WY"]),
	("NH", &["MA", "ME", "VT"]),
	("NJ", &["DE", "NY", "PA"]),
	("NM", &["AZ", "CO", "OK", "TX", "UT"]),
	("NV", &["AZ", "CA", "ID", "OR", "UT"]),
	("NY", &["CT", "MA", "NJ", "PA", "VT"]),
	("OH", &["IN", "KY", "MI", "PA", "WV"]),
	("OK", &["AR", "CO", "KS", "MO", "NM", "TX"]),
	("OR", &["CA", "ID", "NV", "WA"]),
	("PA", &["DE", "MD", "NJ", "NY", "OH", "WV"]),
	("PR", &["VI"]),
	("RI", &["CT", "MA"]),
	("SC", &["GA", "NC"]),
	("SD", &["IA", "MN", "MT", "ND", "NE", "WY"]),
	("TN", &["AL", "AR", "GA", "KY", "MO", "MS", "NC", "VA"]),
	("TX", &["AR", "LA", "NM", "OK"]),
	("UT", &["AZ", "CO", "ID", "NM", "NV", "WY"]),
	("VA", &["DC", "KY", "MD", "NC", "TN", "WV"]),
	("VI", &["PR"]),
	("VT", &["MA", "NH", "NY"]),
	("WA", &["ID", "OR"]),
	("WI", &["IA", "IL", "MI", "MN"]),
	("WV", &["KY", "MD", "OH", "PA", "VA"]),
	("WY", &["CO", "ID", "MT", "NE", "SD", "UT"]),
];

/// True for a five-digit ZIP, optionally followed by `-` and four more digits.
pub fn is_zip(zip: &str) -> bool {
	let zip = zip.trim();
	let Some(five) = zip.get(..5) else {
		return false;
	};

	if !five.bytes().all(|b| b.is_ascii_digit()) {
		return false;
	}

	match zip.get(5..) {
		None | Some("") => true,
		Some(rest) => rest.strip_prefix('-').is_some_and(|plus_four| {
			plus_four.len() == 4 && plus_four.bytes().all(|b| b.is_ascii_digit())
		}),
	}
}

/// Resolves a five-digit ZIP (optionally ZIP+4) to a postal state code.
pub fn zip_to_state(zip: &str) -> Option<&'static str> {
	if !is_zip(zip) {
		return None;
	}

	let five = zip.trim().get(..5)?;
	let prefix: u16 = five[..3].parse().ok()?;

	ZIP3_RANGES
		.iter()
		.find(|(start, end, _)| (*start..=*end).contains(&prefix))
		.map(|(_, _, state)| *state)
}

pub fn neighbors(state: &str) -> &'static [&'static str] {
	NEIGHBORS.iter().find(|(code, _)| *code == state).map(|(_, list)| *list).unwrap_or(&[])
}

/// States covered by `tier` around `state`, with the home state first and the rest sorted.
/// `None` means no location restriction.
pub fn tier_states(state: &str, tier: LocationTier) -> Option<Vec<String>> {
	let hops = match tier {
		LocationTier::State => 0,
		LocationTier::Bordering => 1,
		LocationTier::Regional => 2,
		LocationTier::Nationwide => return None,
	};
	let mut reached = BTreeSet::new();
	let mut frontier = vec![state];

	for _ in 0..hops {
		let mut next = Vec::new();

		for current in frontier {
			for neighbor in neighbors(current) {
				if *neighbor != state && reached.insert(*neighbor) {
					next.push(*neighbor);
				}
			}
		}

		frontier = next;
	}

	let mut states = Vec::with_capacity(reached.len() + 1);

	states.push(state.to_string());
	states.extend(reached.into_iter().map(str::to_string));

	Some(states)
}
