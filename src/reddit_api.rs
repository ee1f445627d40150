/// Constructs read-only Reddit API clients using Reddit’s application-only OAuth flow.
///
/// The client authenticates as the app itself (client credentials grant) instead of as a user.
/// Reddit grants such sessions read-only access to public data.
#[derive(Clone, Debug)]
pub struct Connector
{
	/// Base URL of the server issuing access tokens, with a trailing slash.
	auth_base_url: url::Url,
	/// Base URL of the OAuth API server, with a trailing slash.
	api_base_url: url::Url,
}

impl Connector
{
	/// Use other servers than Reddit’s own, such as a local test server.
	///
	/// # Arguments
	/// - `auth_base_url`: Base URL of the server issuing access tokens, with a trailing slash.
	/// - `api_base_url`: Base URL of the API server, with a trailing slash.
	pub fn with_base_urls(auth_base_url: url::Url, api_base_url: url::Url) -> Self
	{
		Self
		{
			auth_base_url,
			api_base_url,
		}
	}
}

impl Default for Connector
{
	fn default() -> Self
	{
		Self::with_base_urls(
			url::Url::parse("https://www.reddit.com/")
				.expect("this call is infallible because we know the URL to be well-formed"),
			url::Url::parse("https://oauth.reddit.com/")
				.expect("this call is infallible because we know the URL to be well-formed"))
	}
}

impl crate::Connect for Connector
{
	type Client = Client;

	fn connect(&self, credentials: &crate::Credentials)
		-> impl std::future::Future<Output = Result<Self::Client, crate::Error>> + Send
	{
		Client::new(self.clone(), credentials.clone())
	}
}

/// A read-only Reddit API client authenticated with an application-only access token.
///
/// The access token is requested when the client is constructed, so invalid credentials are
/// detected early. The client refreshes the token shortly before it expires and once more if a
/// request is rejected as unauthorized. Requests that failed for reasons such as network issues
/// are retried for a total of up to five minutes.
///
/// The client can safely be shared between tasks, as all clones use the same access token.
#[derive(Clone)]
pub struct Client
{
	#[doc(hidden)]
	connector: std::sync::Arc<Connector>,
	#[doc(hidden)]
	credentials: std::sync::Arc<crate::Credentials>,
	#[doc(hidden)]
	reqwest_client: reqwest_middleware::ClientWithMiddleware,
	#[doc(hidden)]
	// Readers don’t block each other. Writers take precedence over readers with tokio’s lock, so
	// a refresh isn’t starved by tasks still using the old token
	access_token: std::sync::Arc<tokio::sync::RwLock<AccessToken>>,
}

impl Client
{
	/// Initialize a new client and obtain its first access token.
	async fn new(connector: Connector, credentials: crate::Credentials) -> Result<Self, crate::Error>
	{
		let reqwest_client = reqwest::ClientBuilder::new()
			// Reddit throttles or blocks generic user agents, so always send the configured one
			.user_agent(credentials.user_agent.as_str())
			.build().map_err(crate::Error::CreateHttpClient)?;

		let retry_policy = reqwest_retry::policies::ExponentialBackoff::builder()
			.backoff_exponent(2)
			.retry_bounds(std::time::Duration::from_secs(1), std::time::Duration::from_secs(60))
			.build_with_total_retry_duration(std::time::Duration::from_secs(5 * 60));
		let retry_transient_middleware =
			reqwest_retry::RetryTransientMiddleware::new_with_policy(retry_policy);

		let reqwest_client = reqwest_middleware::ClientBuilder::new(reqwest_client)
			.with(retry_transient_middleware)
			.build();

		log::info!("requesting application-only Reddit API access token");
		let access_token = AccessToken::new(&connector, &credentials, &reqwest_client).await?;

		Ok(Self
		{
			connector: std::sync::Arc::new(connector),
			credentials: std::sync::Arc::new(credentials),
			reqwest_client,
			access_token: std::sync::Arc::new(tokio::sync::RwLock::new(access_token)),
		})
	}

	/// Make an HTTP GET request to the Reddit API.
	///
	/// # Arguments
	/// `endpoint`: The API endpoint (without host and leading slash, example: `r/rust/about`).
	pub async fn get<S, R>(&self, endpoint: S) -> Result<R, crate::Error>
	where
		S: AsRef<str>,
		R: serde::de::DeserializeOwned,
	{
		let endpoint = endpoint.as_ref();
		let access_token = self.current_access_token().await?;

		match request(&self.connector, &self.reqwest_client, endpoint, &access_token).await
		{
			// The token may have been revoked before its announced expiry, so retry once with a
			// fresh one
			Err(crate::Error::ReceivedRedditApiClientError{status_code, ..})
				if status_code == reqwest::StatusCode::UNAUTHORIZED =>
			{
				let access_token =
				{
					let mut access_token_locked = self.access_token.write().await;

					// Another task may have refreshed the token in the meantime
					if *access_token_locked == access_token
					{
						log::info!("Reddit API access token was rejected, requesting a fresh one");
						*access_token_locked = self.request_access_token().await?;
					}

					access_token_locked.clone()
				};

				request(&self.connector, &self.reqwest_client, endpoint, &access_token).await
			},
			result => result,
		}
	}

	/// Return the access token, refreshing it first if it is about to expire.
	async fn current_access_token(&self) -> Result<AccessToken, crate::Error>
	{
		{
			let access_token = self.access_token.read().await;

			if !access_token.is_expired()
			{
				return Ok(access_token.clone());
			}
		}

		let mut access_token = self.access_token.write().await;

		// Check again, as another task may have refreshed the token while we were waiting
		if access_token.is_expired()
		{
			log::info!("Reddit API access token expires soon, requesting a fresh one");
			*access_token = self.request_access_token().await?;
		}

		Ok(access_token.clone())
	}

	async fn request_access_token(&self) -> Result<AccessToken, crate::Error>
	{
		AccessToken::new(&self.connector, &self.credentials, &self.reqwest_client).await
	}
}

impl crate::ReadOnly for Client
{
	fn is_read_only(&self) -> bool
	{
		// This client only ever holds application-only tokens, which carry no user context
		true
	}
}

/// Internal method for making authenticated GET requests.
#[doc(hidden)]
async fn request<S, R>(
	connector: &Connector,
	reqwest_client: &reqwest_middleware::ClientWithMiddleware,
	endpoint: S,
	access_token: &AccessToken)
	-> Result<R, crate::Error>
where
	S: AsRef<str>,
	R: serde::de::DeserializeOwned,
{
	let url = connector.api_base_url.join(endpoint.as_ref()).map_err(crate::Error::ParseUrl)?;

	let response = reqwest_client.request(reqwest::Method::GET, url)
		.bearer_auth(&access_token.value)
		.send().await.map_err(crate::Error::MakeRedditApiRequest)?;

	decode_response(response).await
}

/// Turn client errors into [crate::Error::ReceivedRedditApiClientError] and decode the body of
/// successful responses from JSON.
#[doc(hidden)]
async fn decode_response<R>(response: reqwest::Response) -> Result<R, crate::Error>
where
	R: serde::de::DeserializeOwned,
{
	let map_reqwest_error =
		|error| crate::Error::MakeRedditApiRequest(reqwest_middleware::Error::Reqwest(error));

	if response.status().is_client_error()
	{
		let status_code = response.status();
		let url = response.url().to_owned();

		// Decode the body for debugging purposes
		let response_body = response.text().await.map_err(map_reqwest_error)?;

		return Err(crate::Error::ReceivedRedditApiClientError{status_code, url, response_body});
	}

	let response_body = response
		.error_for_status().map_err(map_reqwest_error)?
		.bytes().await.map_err(map_reqwest_error)?;

	serde_json::from_slice(&response_body).map_err(crate::Error::DecodeRedditApiResponseBody)
}

/// Access tokens are considered expired this long before Reddit’s announced expiry.
#[doc(hidden)]
const ACCESS_TOKEN_EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Lifetime assumed for access tokens when Reddit doesn’t announce one.
#[doc(hidden)]
const DEFAULT_ACCESS_TOKEN_LIFETIME_SECONDS: i64 = 60 * 60;

/// Longest lifetime accepted for access tokens.
#[doc(hidden)]
const MAX_ACCESS_TOKEN_LIFETIME_SECONDS: i64 = 365 * 24 * 60 * 60;

#[doc(hidden)]
#[derive(Clone, Eq, PartialEq)]
struct AccessToken
{
	value: String,
	expires_at: chrono::DateTime<chrono::Utc>,
}

impl AccessToken
{
	async fn new(
		connector: &Connector,
		credentials: &crate::Credentials,
		reqwest_client: &reqwest_middleware::ClientWithMiddleware)
		-> Result<Self, crate::Error>
	{
		let requested_at = chrono::Utc::now();

		let response: AccessTokenResponse =
			request_access_token(connector, credentials, reqwest_client).await
				.map_err(Box::new).map_err(crate::Error::ObtainAccessToken)?;

		// The lifetime comes from the server, so keep it within a range chrono can represent
		let lifetime = response.expires_in.unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME_SECONDS)
			.clamp(0, MAX_ACCESS_TOKEN_LIFETIME_SECONDS);

		log::info!("successfully obtained Reddit API access token valid for {lifetime} seconds");

		Ok(Self
		{
			value: response.access_token,
			expires_at: requested_at
				+ chrono::Duration::seconds(lifetime - ACCESS_TOKEN_EXPIRY_MARGIN_SECONDS),
		})
	}

	fn is_expired(&self) -> bool
	{
		chrono::Utc::now() >= self.expires_at
	}
}

#[doc(hidden)]
async fn request_access_token(
	connector: &Connector,
	credentials: &crate::Credentials,
	reqwest_client: &reqwest_middleware::ClientWithMiddleware)
	-> Result<AccessTokenResponse, crate::Error>
{
	let url = connector.auth_base_url.join("api/v1/access_token").map_err(crate::Error::ParseUrl)?;

	// Reddit expects the app’s credentials via basic authentication and the grant type as a form
	let response = reqwest_client.request(reqwest::Method::POST, url)
		.basic_auth(&credentials.client_id, Some(credentials.client_secret.unsecure()))
		.header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
		.body("grant_type=client_credentials")
		.send().await.map_err(crate::Error::MakeRedditApiRequest)?;

	decode_response(response).await
}

/// Response from a request to obtain an application-only access token.
#[doc(hidden)]
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
struct AccessTokenResponse
{
	pub access_token: String,
	/// Lifetime of the token in seconds.
	pub expires_in: Option<i64>,
	// We don’t need the token type or scope, so ignore them
}
