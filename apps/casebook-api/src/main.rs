use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = casebook_api::Args::parse();
	casebook_api::run(args).await
}
