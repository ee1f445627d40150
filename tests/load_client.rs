//! Load credentials from a config file and authenticate against a local stand-in for Reddit.

use reddit_reader::ReadOnly as _;

fn project_with_config(contents: &str) -> tempfile::TempDir
{
	let tmp = tempfile::TempDir::new().expect("tmp");
	std::fs::write(tmp.path().join(reddit_reader::DEFAULT_CONFIG_FILENAME), contents)
		.expect("write");
	tmp
}

fn connector_for(server: &mockito::Server) -> reddit_reader::reddit_api::Connector
{
	let base_url = url::Url::parse(&format!("{}/", server.url())).expect("valid URL");

	reddit_reader::reddit_api::Connector::with_base_urls(base_url.clone(), base_url)
}

#[tokio::test]
async fn authenticates_with_configured_credentials()
{
	let mut server = mockito::Server::new_async().await;
	let token_mock = server.mock("POST", "/api/v1/access_token")
		// "abc:xyz" in base64
		.match_header("authorization", "Basic YWJjOnh5eg==")
		.match_header("user-agent", "test-agent")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"access_token": "token-1", "token_type": "bearer", "expires_in": 86400,
			"scope": "*"}"#)
		.create_async().await;
	let listing_mock = server.mock("GET", "/r/rust/new")
		.match_header("authorization", "Bearer token-1")
		.with_status(200)
		.with_body(r#"{"kind": "Listing", "data": {"children": []}}"#)
		.create_async().await;

	let project = project_with_config(
		"reddit:\n  client_id: \"abc\"\n  client_secret: \"xyz\"\n  user_agent: \"test-agent\"\n");

	let client = reddit_reader::load_client_from(project.path(),
		reddit_reader::DEFAULT_CONFIG_FILENAME, &connector_for(&server)).await.expect("client");

	assert!(client.is_read_only());
	token_mock.assert_async().await;

	let listing: serde_json::Value = client.get("r/rust/new").await.expect("listing");

	listing_mock.assert_async().await;
	assert_eq!(listing["kind"], "Listing");
}

#[tokio::test]
async fn rejected_credentials_surface_as_initialization_error()
{
	let mut server = mockito::Server::new_async().await;
	let _token_mock = server.mock("POST", "/api/v1/access_token")
		.with_status(401)
		.with_body(r#"{"message": "Unauthorized", "error": 401}"#)
		.create_async().await;

	let project = project_with_config(
		"reddit:\n  client_id: abc\n  client_secret: wrong\n  user_agent: test-agent\n");

	let result = reddit_reader::load_client_from(project.path(),
		reddit_reader::DEFAULT_CONFIG_FILENAME, &connector_for(&server)).await;

	match result
	{
		Err(reddit_reader::Error::InitializeClient(source)) =>
			assert!(matches!(*source, reddit_reader::Error::ObtainAccessToken(_))),
		Err(other) => panic!("expected initialization error, got {other:?}"),
		Ok(_) => panic!("expected initialization error, got a client"),
	}
}

#[tokio::test]
async fn config_errors_are_reported_before_any_request()
{
	let mut server = mockito::Server::new_async().await;
	let token_mock = server.mock("POST", "/api/v1/access_token")
		.expect(0)
		.create_async().await;

	let project = project_with_config("reddit:\n  client_id: abc\n  client_secret: xyz\n");

	let result = reddit_reader::load_client_from(project.path(),
		reddit_reader::DEFAULT_CONFIG_FILENAME, &connector_for(&server)).await;

	let error = match result
	{
		Err(error) => error,
		Ok(_) => panic!("expected missing key error, got a client"),
	};

	assert!(matches!(error,
		reddit_reader::Error::MissingConfigKey(reddit_reader::ConfigKey::UserAgent)));
	assert_eq!(error.to_string(), "missing required key in config: user_agent");
	token_mock.assert_async().await;
}
