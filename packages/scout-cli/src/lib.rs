use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

/// Version string shared by every binary in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default() | Effects::BOLD)
		.usage(AnsiColor::Green.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_matches_the_package() {
		assert!(!VERSION.is_empty());
		assert!(VERSION.split('.').all(|part| part.parse::<u32>().is_ok()));
	}
}
