/// Name of the configuration file read when no other is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.yaml";

/// A client handle that can report whether it is restricted to non-mutating operations.
pub trait ReadOnly
{
	fn is_read_only(&self) -> bool;
}

/// The capability to construct an API client from credentials.
///
/// [crate::reddit_api::Connector] is the implementation talking to Reddit. Other implementations
/// can stand in for it where no network access is wanted.
pub trait Connect
{
	type Client: ReadOnly;

	/// Construct a client with an application-only session, which grants read-only access.
	fn connect(&self, credentials: &crate::Credentials)
		-> impl std::future::Future<Output = Result<Self::Client, crate::Error>> + Send;
}

/// Read the Reddit API credentials from a configuration file in the project root and construct
/// a read-only Reddit API client with them.
///
/// # Arguments
/// `config_filename`: Name of the configuration file in YAML format, relative to the project root
/// (usually [DEFAULT_CONFIG_FILENAME]).
///
/// This has to be awaited on a tokio runtime, as the client is built on `reqwest`.
pub async fn load_client(config_filename: &str) -> Result<crate::reddit_api::Client, crate::Error>
{
	let project_root = crate::paths::project_root()?;
	let connector = crate::reddit_api::Connector::default();

	load_client_from(project_root, config_filename, &connector).await
}

/// Read the API credentials from a configuration file and construct a read-only client with them.
///
/// Every call reads the file anew and constructs an independent client.
///
/// # Arguments
/// - `project_root`: The directory `config_filename` is resolved against.
/// - `config_filename`: Name of the configuration file in YAML format.
/// - `connector`: Constructs the client from the credentials read.
pub async fn load_client_from<P, C>(project_root: P, config_filename: &str, connector: &C)
	-> Result<C::Client, crate::Error>
where
	P: AsRef<std::path::Path>,
	C: Connect,
{
	let config_path = std::path::absolute(project_root.as_ref().join(config_filename))
		.map_err(crate::Error::ResolveConfigPath)?;

	if !config_path.exists()
	{
		return Err(crate::Error::ConfigNotFound{path: config_path});
	}

	log::debug!("reading Reddit API credentials from {}", config_path.display());

	let contents = std::fs::read_to_string(&config_path).map_err(crate::Error::ReadConfigFile)?;
	let document = parse_document(&contents)?;
	let credentials = crate::Credentials::from_document(&document)?;

	let client = connector.connect(&credentials).await
		.map_err(Box::new).map_err(crate::Error::InitializeClient)?;

	if !client.is_read_only()
	{
		return Err(crate::Error::InitializeClient(Box::new(crate::Error::ClientNotReadOnly)));
	}

	Ok(client)
}

/// Parse the configuration file’s contents, treating a document without any content as null.
#[doc(hidden)]
fn parse_document(contents: &str) -> Result<serde_yaml::Value, crate::Error>
{
	// serde_yaml rejects documents holding nothing but whitespace, comments or markers
	let is_empty = contents.lines()
		.map(str::trim)
		.all(|line| line.is_empty() || line.starts_with('#') || line == "---" || line == "...");

	if is_empty
	{
		return Ok(serde_yaml::Value::Null);
	}

	serde_yaml::from_str(contents).map_err(crate::Error::ParseConfigFile)
}
