use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = scout_find::Args::parse();

	scout_find::run(args).await
}
