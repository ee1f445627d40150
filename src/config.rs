/// Keys read from the configuration file, as named in YAML.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigKey
{
	/// The top-level section holding all Reddit API credentials.
	Reddit,
	ClientId,
	ClientSecret,
	UserAgent,
}

impl ConfigKey
{
	pub fn as_str(&self) -> &'static str
	{
		match self
		{
			Self::Reddit => "reddit",
			Self::ClientId => "client_id",
			Self::ClientSecret => "client_secret",
			Self::UserAgent => "user_agent",
		}
	}
}

impl std::fmt::Display for ConfigKey
{
	fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		write!(formatter, "{}", self.as_str())
	}
}

/// Credentials of a Reddit app as registered at <https://www.reddit.com/prefs/apps>.
///
/// The configuration file is expected to hold them in a `reddit` section:
///
/// ```yaml
/// reddit:
///   client_id: <string>
///   client_secret: <string>
///   user_agent: <string>
/// ```
#[derive(Clone, Debug)]
pub struct Credentials
{
	/// The app’s client ID, shown below the app name.
	pub client_id: String,
	/// The app’s secret. Zeroed on drop and redacted when printed.
	pub client_secret: secstr::SecUtf8,
	/// The user agent sent with every request. Reddit asks for something unique and descriptive,
	/// such as `<platform>:<app ID>:<version> (by /u/<username>)`.
	pub user_agent: String,
}

impl Credentials
{
	pub fn new<I, S, U>(client_id: I, client_secret: S, user_agent: U) -> Self
	where
		I: Into<String>,
		S: Into<String>,
		U: Into<String>,
	{
		Self
		{
			client_id: client_id.into(),
			client_secret: secstr::SecUtf8::from(client_secret.into()),
			user_agent: user_agent.into(),
		}
	}

	/// Extract and validate the credentials from a parsed configuration document.
	///
	/// Keys are checked in the order `client_id`, `client_secret`, `user_agent`, and the first
	/// one absent is reported. A key holding null counts as absent.
	///
	/// # Arguments
	/// `document`: The configuration file’s contents as parsed from YAML.
	pub fn from_document(document: &serde_yaml::Value) -> Result<Self, crate::Error>
	{
		// A root or section that isn’t a mapping can’t contain the keys we look for
		let section = document.get(ConfigKey::Reddit.as_str())
			.filter(|section| section.as_mapping().is_some())
			.ok_or(crate::Error::MissingConfigKey(ConfigKey::Reddit))?;

		let client_id = required_string(section, ConfigKey::ClientId)?;
		let client_secret = required_string(section, ConfigKey::ClientSecret)?;
		let user_agent = required_string(section, ConfigKey::UserAgent)?;

		Ok(Self::new(client_id, client_secret, user_agent))
	}
}

#[doc(hidden)]
fn required_string(section: &serde_yaml::Value, key: ConfigKey) -> Result<String, crate::Error>
{
	use serde_yaml::Value;

	match section.get(key.as_str())
	{
		None | Some(Value::Null) => Err(crate::Error::MissingConfigKey(key)),
		Some(Value::String(value)) => Ok(value.clone()),
		// Unquoted IDs may be read as numbers or booleans, so accept them as written
		Some(Value::Number(value)) => Ok(value.to_string()),
		Some(Value::Bool(value)) => Ok(value.to_string()),
		Some(_) => Err(crate::Error::InvalidConfigValue(key)),
	}
}
