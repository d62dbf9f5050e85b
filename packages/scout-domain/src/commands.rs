//! Static knowledge about defense purchasing structure.

pub const DEPARTMENT_OF_DEFENSE: &str = "Department of Defense";

/// Toptier agency codes the award search uses for the Department of Defense.
const DEPARTMENT_OF_DEFENSE_CODES: &[&str] = &["097", "9700"];

/// Defense components whose awards often arrive without office-level detail.
pub const DEFENSE_DEPARTMENTS: &[&str] = &[
	"Department of the Navy",
	"Department of the Army",
	"Department of the Air Force",
	"Defense Logistics Agency",
];

const BUILTIN_COMMANDS: &[(&str, &[&str])] = &[
	(
		"Department of the Navy",
		&[
			"Naval Sea Systems Command",
			"Naval Air Systems Command",
			"Naval Supply Systems Command",
			"Naval Facilities Engineering Systems Command",
			"Naval Information Warfare Systems Command",
			"Office of Naval Research",
			"Military Sealift Command",
			"Marine Corps Systems Command",
		],
	),
	(
		"Department of the Army",
		&[
			"Army Contracting Command",
			"U.S. Army Corps of Engineers",
			"Army Materiel Command",
			"Mission and Installation Contracting Command",
			"Army Medical Command",
			"Army Futures Command",
		],
	),
	(
		"Department of the Air Force",
		&[
			"Air Force Life Cycle Management Center",
			"Air Force Materiel Command",
			"Air Force Installation Contracting Center",
			"Air Force Research Laboratory",
			"Air Force Sustainment Center",
			"Air Force Nuclear Weapons Center",
		],
	),
	(
		"Defense Logistics Agency",
		&[
			"DLA Troop Support",
			"DLA Land and Maritime",
			"DLA Aviation",
			"DLA Energy",
			"DLA Distribution",
		],
	),
];

/// Canonical spelling of a defense department name, matched case-insensitively.
pub fn defense_department(name: &str) -> Option<&'static str> {
	let name = name.trim();

	DEFENSE_DEPARTMENTS.iter().copied().find(|department| department.eq_ignore_ascii_case(name))
}

pub fn is_department_of_defense(agency_name: &str, agency_code: Option<&str>) -> bool {
	agency_name.trim().eq_ignore_ascii_case(DEPARTMENT_OF_DEFENSE)
		|| agency_code.is_some_and(|code| DEPARTMENT_OF_DEFENSE_CODES.contains(&code.trim()))
}

/// Read-only department → command lookup used when no live office data is available.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandTable {
	entries: Vec<(String, Vec<String>)>,
}
impl CommandTable {
	pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
		Self { entries }
	}

	/// Up to `max` commands for `department`; empty when the department is unknown.
	pub fn commands_for(&self, department: &str, max: usize) -> &[String] {
		let department = department.trim();

		self.entries
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(department))
			.map(|(_, commands)| &commands[..commands.len().min(max)])
			.unwrap_or(&[])
	}
}
impl Default for CommandTable {
	fn default() -> Self {
		Self::new(
			BUILTIN_COMMANDS
				.iter()
				.map(|(department, commands)| {
					(
						department.to_string(),
						commands.iter().map(|command| command.to_string()).collect(),
					)
				})
				.collect(),
		)
	}
}
