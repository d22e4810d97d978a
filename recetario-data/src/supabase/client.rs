//! Shared HTTP plumbing for the collection and storage clients.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use recetario_core::{BlobError, CollectionError};

use super::config::{BackendBuildError, SupabaseConfig};

const APIKEY: &str = "apikey";

/// Authenticated HTTP client for one backend project.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base: Url,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Validate `config` and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Fails when the base URL is not an absolute `http(s)` URL, when the
    /// anon key is empty, or when the HTTP client cannot be built.
    pub fn new(config: SupabaseConfig) -> Result<Self, BackendBuildError> {
        let base = parse_base_url(&config.base_url)?;
        if config.anon_key.trim().is_empty() {
            return Err(BackendBuildError::MissingAnonKey);
        }
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder.build().map_err(BackendBuildError::HttpClient)?;
        Ok(Self {
            client,
            base,
            config,
        })
    }

    /// Settings this client was built from.
    #[must_use]
    pub const fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    pub(crate) const fn http(&self) -> &Client {
        &self.client
    }

    /// Project URL with `segments` appended, each percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Attach the `apikey` and bearer headers.
    pub(crate) fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(APIKEY, self.config.anon_key.as_str())
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.config.bearer_token()),
            )
    }

    /// Send `request`, classifying transport failures.
    ///
    /// Non-success statuses are returned as responses for the caller to
    /// interpret.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Response, TransportFailure> {
        self.authorise(request)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportFailure {
        if error.is_timeout() {
            return TransportFailure::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.map_or(0, |timeout| timeout.as_secs()),
            };
        }

        if let Some(status) = error.status() {
            return TransportFailure::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportFailure::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, BackendBuildError> {
    let invalid = |message: &str| BackendBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        message: message.to_owned(),
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path"));
    }
    Ok(url)
}

/// Request failures that happen before a status is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Http {
        url: String,
        status: u16,
        message: String,
    },
    Network {
        url: String,
        message: String,
    },
    Timeout {
        url: String,
        timeout_secs: u64,
    },
}

impl From<TransportFailure> for CollectionError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Http {
                url,
                status,
                message,
            } => Self::Http {
                url,
                status,
                message,
            },
            TransportFailure::Network { url, message } => Self::Network { url, message },
            TransportFailure::Timeout { url, timeout_secs } => Self::Timeout { url, timeout_secs },
        }
    }
}

impl From<TransportFailure> for BlobError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Http {
                url,
                status,
                message,
            } => Self::Http {
                url,
                status,
                message,
            },
            TransportFailure::Network { url, message } => Self::Network { url, message },
            TransportFailure::Timeout { url, timeout_secs } => Self::Timeout { url, timeout_secs },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> SupabaseClient {
        SupabaseClient::new(SupabaseConfig::new("https://abc.supabase.co/", "anon"))
            .expect("client should build")
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://abc.supabase.co")]
    #[case("mailto:chef@example.com")]
    fn rejects_unusable_base_urls(#[case] url: &str) {
        let err = SupabaseClient::new(SupabaseConfig::new(url, "anon"))
            .expect_err("base URL should be rejected");
        assert!(matches!(err, BackendBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn rejects_blank_anon_key() {
        let err = SupabaseClient::new(SupabaseConfig::new("https://abc.supabase.co", "  "))
            .expect_err("anon key should be required");
        assert!(matches!(err, BackendBuildError::MissingAnonKey));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Duration::from_secs(5)))]
    fn builds_with_and_without_a_timeout(#[case] timeout: Option<Duration>) {
        let base = SupabaseConfig::new("https://abc.supabase.co", "anon");
        let config = match timeout {
            Some(timeout) => base.with_timeout(timeout),
            None => base,
        };
        let client = SupabaseClient::new(config).expect("client should build");
        assert_eq!(client.config().timeout, timeout);
    }

    #[rstest]
    fn endpoint_appends_encoded_segments(client: SupabaseClient) {
        let url = client.endpoint(&["rest", "v1", "recetas"]);
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/recetas");

        let url = client.endpoint(&["storage", "v1", "object", "b", "a b.jpg"]);
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/b/a%20b.jpg"
        );
    }

    #[rstest]
    fn endpoint_keeps_base_path() {
        let client = SupabaseClient::new(SupabaseConfig::new("http://localhost:8000/api", "anon"))
            .expect("client should build");
        let url = client.endpoint(&["rest", "v1", "recetas"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/rest/v1/recetas");
    }

    #[rstest]
    #[case(None, "Bearer anon")]
    #[case(Some("jwt"), "Bearer jwt")]
    fn authorise_sets_key_and_bearer(#[case] token: Option<&str>, #[case] expected: &str) {
        let base = SupabaseConfig::new("https://abc.supabase.co", "anon");
        let config = match token {
            Some(token) => base.with_access_token(token),
            None => base,
        };
        let client = SupabaseClient::new(config).expect("client should build");
        let request = client
            .authorise(client.http().get("https://abc.supabase.co/rest/v1/recetas"))
            .build()
            .expect("request should build");
        assert_eq!(request.headers()["apikey"], "anon");
        assert_eq!(request.headers()[AUTHORIZATION], expected);
    }

    #[rstest]
    fn transport_failures_map_onto_both_error_types() {
        let failure = TransportFailure::Timeout {
            url: "https://abc.supabase.co/rest/v1/recetas".to_owned(),
            timeout_secs: 30,
        };
        assert!(matches!(
            CollectionError::from(failure.clone()),
            CollectionError::Timeout {
                timeout_secs: 30,
                ..
            }
        ));
        assert!(matches!(
            BlobError::from(failure),
            BlobError::Timeout {
                timeout_secs: 30,
                ..
            }
        ));
    }
}
