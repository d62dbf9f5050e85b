use std::{io, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scout_config::Config;
use scout_domain::{Certification, SearchCriteria, VeteranStatus};
use scout_service::ScoutService;

#[derive(Debug, Parser)]
#[command(
	version = scout_cli::VERSION,
	rename_all = "kebab",
	styles = scout_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Industry code, two to six digits.
	#[arg(long, value_name = "CODE")]
	pub naics: Option<String>,
	#[arg(long, value_name = "ZIP")]
	pub zip: Option<String>,
	#[arg(long, value_name = "KIND", default_value_t = Certification::None)]
	pub certification: Certification,
	#[arg(long, value_name = "STATUS", default_value_t = VeteranStatus::None)]
	pub veteran_status: VeteranStatus,
	/// Product/service code, used only when no industry code is given.
	#[arg(long, value_name = "CODE")]
	pub psc: Option<String>,
	#[arg(long)]
	pub exclude_dod: bool,
}
impl Args {
	pub fn criteria(&self) -> SearchCriteria {
		SearchCriteria {
			certification: self.certification,
			industry_code: self.naics.clone(),
			zip: self.zip.clone(),
			veteran_status: self.veteran_status,
			product_service_code: self.psc.clone(),
			exclude_dod: self.exclude_dod,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = scout_config::load(&args.config)?;

	init_tracing(&config);

	let service = ScoutService::new(config);
	let response = service.find_agencies(args.criteria()).await?;

	println!("{}", serde_json::to_string_pretty(&response)?);

	Ok(())
}

fn init_tracing(config: &Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
