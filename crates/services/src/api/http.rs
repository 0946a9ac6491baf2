use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use quiz_core::ProtocolViolation;
use quiz_core::model::{Category, QuizResult, SessionId};

use super::wire::{AnswerRequest, AnswerResponse, QuestionResponse, ResultResponse, StartResponse};
use super::{AnswerOutcome, QuestionFetch, QuizApi};
use crate::error::{ApiError, ConfigError};

/// Characters `encodeURIComponent` leaves alone; everything else is escaped (space -> `%20`).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How the session id reaches the server on question/answer/result calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionMode {
    /// Rely on the `quiz_session` cookie set by `/api/start`.
    Cookie,
    /// Send `?sid=<session_id>`; the server prefers it over the cookie.
    #[default]
    Explicit,
}

impl FromStr for SessionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cookie" => Ok(Self::Cookie),
            "explicit" | "query" => Ok(Self::Explicit),
            _ => Err(ConfigError::SessionMode(s.to_owned())),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Cookie => f.write_str("cookie"),
            SessionMode::Explicit => f.write_str("explicit"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct QuizApiConfig {
    base_url: Url,
    pub session_mode: SessionMode,
    pub timeout: Option<Duration>,
}

impl QuizApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000";

    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` does not parse as an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            session_mode: SessionMode::default(),
            timeout: None,
        })
    }

    /// Reads `QUIZ_BASE_URL`, `QUIZ_SESSION_MODE` and `QUIZ_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to something unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("QUIZ_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(&base_url)?;
        if let Ok(mode) = env::var("QUIZ_SESSION_MODE") {
            config.session_mode = mode.parse()?;
        }
        if let Ok(raw) = env::var("QUIZ_TIMEOUT_SECS") {
            config.timeout = Some(parse_timeout(&raw)?);
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` does not parse as an http(s) URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_session_mode(mut self, session_mode: SessionMode) -> Self {
        self.session_mode = session_mode;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(path)?;
        if query.is_empty() {
            url.set_query(None);
        } else {
            let encoded = query
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(key, QUERY_COMPONENT),
                        utf8_percent_encode(value, QUERY_COMPONENT)
                    )
                })
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    fn session_endpoint(&self, path: &str, session: &SessionId) -> Result<Url, url::ParseError> {
        match self.session_mode {
            SessionMode::Cookie => self.endpoint(path, &[]),
            SessionMode::Explicit => self.endpoint(path, &[("sid", session.as_str())]),
        }
    }
}

/// Parses whole seconds; `0` is rejected since reqwest would fail every request.
///
/// # Errors
///
/// Returns `ConfigError::Timeout` for anything else.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Timeout(raw.to_owned())),
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::BaseUrl {
        raw: raw.to_owned(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Scheme(raw.to_owned()));
    }
    // endpoints are joined relative to the base, so it must read as a directory
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// `QuizApi` over HTTP.
///
/// The client keeps a cookie store so `SessionMode::Cookie` works against servers that
/// hand out a session cookie on start.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    config: QuizApiConfig,
}

impl HttpQuizApi {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: QuizApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &QuizApiConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let url = response.url().path().to_owned();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("{url} answered {status}");
            return Err(ApiError::status(status, body));
        }

        let body = response.text().await?;
        log::trace!("{url} -> {body}");
        serde_json::from_str(&body)
            .map_err(|err| ApiError::Protocol(ProtocolViolation::Malformed(err.to_string())))
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn start(&self, category: Option<&Category>) -> Result<SessionId, ApiError> {
        let url = match category {
            Some(category) => self
                .config
                .endpoint("api/start", &[("category", category.as_str())])?,
            None => self.config.endpoint("api/start", &[])?,
        };
        log::debug!("POST {url}");
        let body: StartResponse = self.send(self.client.post(url)).await?;
        Ok(SessionId::try_from(body)?)
    }

    async fn question(&self, session: &SessionId) -> Result<QuestionFetch, ApiError> {
        let url = self.config.session_endpoint("api/question", session)?;
        log::debug!("GET {url}");
        let body: QuestionResponse = self.send(self.client.get(url)).await?;
        Ok(QuestionFetch::try_from(body)?)
    }

    async fn answer(&self, session: &SessionId, choice: usize) -> Result<AnswerOutcome, ApiError> {
        let url = self.config.session_endpoint("api/answer", session)?;
        log::debug!("POST {url} choice={choice}");
        let request = self.client.post(url).json(&AnswerRequest { choice });
        let body: AnswerResponse = self.send(request).await?;
        Ok(AnswerOutcome::try_from(body)?)
    }

    async fn result(&self, session: &SessionId) -> Result<QuizResult, ApiError> {
        let url = self.config.session_endpoint("api/result", session)?;
        log::debug!("GET {url}");
        let body: ResultResponse = self.send(self.client.get(url)).await?;
        Ok(QuizResult::try_from(body)?)
    }
}
