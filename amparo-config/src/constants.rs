use std::time::Duration;

/// Deep link the provider embeds in password-reset emails.
pub const DEFAULT_PASSWORD_RESET_REDIRECT: &str = "myapp://reset-password";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How long before expiry the access token gets refreshed.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

pub const SESSION_FILE_NAME: &str = "session.json";

/// Qualifier/organization/application triple for platform directories.
pub const PROJECT_DIRS: (&str, &str, &str) = ("app", "amparo", "amparo");

pub const ENV_CONFIG_PATH: &str = "AMPARO_CONFIG";
