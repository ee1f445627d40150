/// All errors that may occur while loading credentials or talking to the Reddit API.
#[derive(Debug, thiserror::Error)]
pub enum Error
{
	#[error("could not determine project root")]
	DetermineProjectRoot(#[source] std::io::Error),
	#[error("could not resolve config file path")]
	ResolveConfigPath(#[source] std::io::Error),

	#[error("config file not found at {}", path.display())]
	ConfigNotFound
	{
		path: std::path::PathBuf,
	},
	#[error("could not read config file")]
	ReadConfigFile(#[source] std::io::Error),
	#[error("could not parse config file")]
	ParseConfigFile(#[source] serde_yaml::Error),
	#[error("missing required key in config: {0}")]
	MissingConfigKey(crate::ConfigKey),
	#[error("config key {0} must hold a string")]
	InvalidConfigValue(crate::ConfigKey),

	#[error("could not initialize Reddit API client")]
	InitializeClient(#[source] Box<crate::Error>),
	#[error("Reddit API client is not read-only, check credentials")]
	ClientNotReadOnly,

	#[error("could not create HTTP client")]
	CreateHttpClient(#[source] reqwest::Error),
	#[error("could not obtain Reddit API access token")]
	ObtainAccessToken(#[source] Box<crate::Error>),

	#[error("could not parse URL")]
	ParseUrl(#[source] url::ParseError),
	#[error("could not make Reddit API request")]
	MakeRedditApiRequest(#[source] reqwest_middleware::Error),
	#[error("received Reddit API client error (status code {status_code}): {response_body}")]
	ReceivedRedditApiClientError
	{
		status_code: reqwest::StatusCode,
		url: url::Url,
		response_body: String,
	},
	#[error("could not decode Reddit API response body")]
	DecodeRedditApiResponseBody(#[source] serde_json::Error),
}
