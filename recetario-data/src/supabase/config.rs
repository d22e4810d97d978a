//! Connection settings for a Supabase-style backend.

use std::time::Duration;

use thiserror::Error;

/// Default user agent for backend requests.
pub const DEFAULT_USER_AGENT: &str = "recetario/0.1";

/// Collection holding recipe rows.
pub const DEFAULT_TABLE: &str = "recetas";

/// Bucket holding recipe photos.
pub const DEFAULT_BUCKET: &str = "recetas-fotos";

/// Errors raised while constructing backend clients.
#[derive(Debug, Error)]
pub enum BackendBuildError {
    /// The base URL could not be parsed or cannot carry a path.
    #[error("invalid backend URL {url}: {message}")]
    InvalidBaseUrl {
        /// URL as supplied.
        url: String,
        /// Reason it was rejected.
        message: String,
    },
    /// The anon key was empty.
    #[error("backend anon key must not be empty")]
    MissingAnonKey,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Configuration for the Supabase collection and storage clients.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use recetario_data::SupabaseConfig;
///
/// let config = SupabaseConfig::new("https://abc.supabase.co", "anon-key")
///     .with_access_token("user-jwt")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.table, "recetas");
/// assert_eq!(config.bearer_token(), "user-jwt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`.
    pub base_url: String,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
    /// Session token of the signed-in user, if any.
    pub access_token: Option<String>,
    /// Collection holding recipe rows.
    pub table: String,
    /// Bucket holding recipe photos.
    pub bucket: String,
    /// Request timeout; `None` leaves the transport's defaults in place.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl SupabaseConfig {
    /// Create a configuration for the project at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            access_token: None,
            table: DEFAULT_TABLE.to_owned(),
            bucket: DEFAULT_BUCKET.to_owned(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Authenticate requests as a signed-in user.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Use a different collection.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Use a different bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Token sent in the `Authorization` header: the user's session token
    /// when present, otherwise the anon key.
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_target_recipe_table_and_bucket() {
        let config = SupabaseConfig::new("https://abc.supabase.co", "anon");
        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.bucket, DEFAULT_BUCKET);
        assert_eq!(config.timeout, None);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.access_token, None);
    }

    #[rstest]
    #[case(None, "anon")]
    #[case(Some("session"), "session")]
    fn bearer_prefers_session_token(#[case] token: Option<&str>, #[case] expected: &str) {
        let base = SupabaseConfig::new("https://abc.supabase.co", "anon");
        let config = match token {
            Some(token) => base.with_access_token(token),
            None => base,
        };
        assert_eq!(config.bearer_token(), expected);
    }

    #[rstest]
    fn builder_overrides_every_field() {
        let config = SupabaseConfig::new("http://localhost:54321", "anon")
            .with_table("recipes")
            .with_bucket("photos")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.table, "recipes");
        assert_eq!(config.bucket, "photos");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
