use reddit_reader::ReadOnly as _;

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	pretty_env_logger::init();

	// Read the credentials from the config file in the project root and authenticate with them
	let client = reddit_reader::load_client(reddit_reader::DEFAULT_CONFIG_FILENAME).await?;

	log::info!("Reddit API client is ready (read-only: {})", client.is_read_only());

	Ok(())
}
