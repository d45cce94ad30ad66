//! `analyzeSyntax` requests over a caller-supplied transport
//!
//! Credentials are configuration values handed to the client, never
//! process-wide state. The HTTP layer (authentication, TLS, retries) belongs
//! to the [`Transport`] the caller provides.

use crate::adapter::ConvertError;
use crate::document::Document;
use crate::google::adapter::document_from_response;
use crate::google::response::AnalyzeSyntaxResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://language.googleapis.com/v1/documents:analyzeSyntax";

/// Environment variable holding the service-account key file path
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable holding an API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Unit in which the API reports text offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncodingType {
    /// No offsets; sentences are then split by dependency roots
    None,
    #[default]
    Utf8,
    Utf16,
    Utf32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    #[default]
    PlainText,
    Html,
}

/// Request body of `documents:analyzeSyntax`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSyntaxRequest {
    pub document: RequestDocument,
    pub encoding_type: EncodingType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDocument {
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Client settings
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service-account key file, passed to the transport for authentication
    pub credentials_path: Option<PathBuf>,
    /// API key appended to the request URL
    pub api_key: Option<String>,
    pub endpoint: String,
    pub encoding_type: EncodingType,
    /// Language hint; the API detects the language when unset
    pub language: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials_path: None,
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            encoding_type: EncodingType::default(),
            language: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read [`CREDENTIALS_ENV`] and [`API_KEY_ENV`] from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            credentials_path: non_empty(CREDENTIALS_ENV).map(PathBuf::from),
            api_key: non_empty(API_KEY_ENV),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_encoding_type(mut self, encoding_type: EncodingType) -> Self {
        self.encoding_type = encoding_type;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Endpoint URL, including the API key when one is configured
    pub fn request_url(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let separator = if self.endpoint.contains('?') { '&' } else { '?' };
                format!("{}{}key={}", self.endpoint, separator, key)
            }
            None => self.endpoint.clone(),
        }
    }
}

// The API key stays out of logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credentials_path", &self.credentials_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("encoding_type", &self.encoding_type)
            .field("language", &self.language)
            .finish()
    }
}

/// HTTP layer supplied by the caller
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    /// POST a JSON body and return the response body
    fn post_json(
        &self,
        url: &str,
        credentials: Option<&Path>,
        body: &str,
    ) -> Result<String, Self::Error>;
}

/// Error calling the API
#[derive(Debug, Error)]
pub enum ClientError<E: std::error::Error + 'static> {
    #[error("transport error: {0}")]
    Transport(#[source] E),

    #[error("API error {code} ({status}): {message}")]
    Api {
        code: i32,
        status: String,
        message: String,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiStatus,
}

#[derive(Deserialize)]
#[serde(default)]
struct ApiStatus {
    code: i32,
    status: String,
    message: String,
}

impl Default for ApiStatus {
    fn default() -> Self {
        Self {
            code: 0,
            status: "UNKNOWN".to_string(),
            message: String::new(),
        }
    }
}

/// Client for the Natural Language `analyzeSyntax` method
#[derive(Debug)]
pub struct LanguageServiceClient<T> {
    config: ClientConfig,
    transport: T,
}

/// Construct a client from explicit configuration
pub fn create_client<T: Transport>(config: ClientConfig, transport: T) -> LanguageServiceClient<T> {
    LanguageServiceClient::new(config, transport)
}

impl<T: Transport> LanguageServiceClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request(&self, text: &str, document_type: DocumentType) -> AnalyzeSyntaxRequest {
        AnalyzeSyntaxRequest {
            document: RequestDocument {
                document_type,
                content: text.to_string(),
                language: self.config.language.clone(),
            },
            encoding_type: self.config.encoding_type,
        }
    }

    /// Send `text` for analysis and return the raw response
    pub fn analyze_syntax(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<AnalyzeSyntaxResponse, ClientError<T::Error>> {
        let body = serde_json::to_string(&self.request(text, document_type))?;
        tracing::debug!(
            endpoint = %self.config.endpoint,
            bytes = body.len(),
            "sending analyzeSyntax request"
        );

        let reply = self
            .transport
            .post_json(
                &self.config.request_url(),
                self.config.credentials_path.as_deref(),
                &body,
            )
            .map_err(ClientError::Transport)?;

        if let Ok(ErrorEnvelope { error }) = serde_json::from_str::<ErrorEnvelope>(&reply) {
            tracing::debug!(code = error.code, status = %error.status, "analyzeSyntax failed");
            return Err(ClientError::Api {
                code: error.code,
                status: error.status,
                message: error.message,
            });
        }

        let response: AnalyzeSyntaxResponse = serde_json::from_str(&reply)?;
        tracing::debug!(
            sentences = response.sentences.len(),
            tokens = response.tokens.len(),
            "received analyzeSyntax response"
        );
        Ok(response)
    }

    /// Analyze `text` and convert the response into a [`Document`]
    pub fn analyze_document(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Document, ClientError<T::Error>> {
        let response = self.analyze_syntax(text, document_type)?;
        Ok(document_from_response(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Refused;

    /// Records every call and answers with a canned body
    struct CannedTransport {
        reply: Result<String, ()>,
        calls: RefCell<Vec<(String, Option<PathBuf>, Value)>>,
    }

    impl CannedTransport {
        fn replying(body: Value) -> Self {
            Self {
                reply: Ok(body.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for &CannedTransport {
        type Error = Refused;

        fn post_json(
            &self,
            url: &str,
            credentials: Option<&Path>,
            body: &str,
        ) -> Result<String, Self::Error> {
            self.calls.borrow_mut().push((
                url.to_string(),
                credentials.map(Path::to_path_buf),
                serde_json::from_str(body).unwrap(),
            ));
            self.reply.clone().map_err(|_| Refused)
        }
    }

    fn dogs_bark() -> Value {
        json!({
            "sentences": [{"text": {"content": "Dogs bark.", "beginOffset": 0}}],
            "tokens": [
                {
                    "text": {"content": "Dogs", "beginOffset": 0},
                    "partOfSpeech": {"tag": "NOUN"},
                    "dependencyEdge": {"headTokenIndex": 1, "label": "NSUBJ"},
                    "lemma": "Dog"
                },
                {
                    "text": {"content": "bark", "beginOffset": 5},
                    "partOfSpeech": {"tag": "VERB"},
                    "dependencyEdge": {"headTokenIndex": 1, "label": "ROOT"},
                    "lemma": "bark"
                }
            ],
            "language": "en"
        })
    }

    #[test]
    fn test_request_body() {
        let transport = CannedTransport::replying(dogs_bark());
        let config = ClientConfig::new()
            .with_credentials("/secrets/key.json")
            .with_language("en");
        let client = create_client(config, &transport);

        client.analyze_syntax("Dogs bark.", DocumentType::PlainText).unwrap();

        let calls = transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (url, credentials, body) = &calls[0];
        assert_eq!(url, DEFAULT_ENDPOINT);
        assert_eq!(credentials.as_deref(), Some(Path::new("/secrets/key.json")));
        assert_eq!(
            body,
            &json!({
                "document": {"type": "PLAIN_TEXT", "content": "Dogs bark.", "language": "en"},
                "encodingType": "UTF8"
            })
        );
    }

    #[test]
    fn test_request_omits_unset_language() {
        let transport = CannedTransport::failing();
        let client = create_client(
            ClientConfig::new().with_encoding_type(EncodingType::Utf16),
            &transport,
        );
        let body = serde_json::to_value(client.request("<p>Hi</p>", DocumentType::Html)).unwrap();

        assert_eq!(
            body,
            json!({
                "document": {"type": "HTML", "content": "<p>Hi</p>"},
                "encodingType": "UTF16"
            })
        );
    }

    #[test]
    fn test_analyze_document() {
        let transport = CannedTransport::replying(dogs_bark());
        let client = create_client(ClientConfig::new(), &transport);
        let doc = client
            .analyze_document("Dogs bark.", DocumentType::PlainText)
            .unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.sentences()[0].root().content(), "bark");
    }

    #[test]
    fn test_api_key_in_url() {
        let config = ClientConfig::new().with_api_key("secret");

        assert_eq!(config.request_url(), format!("{}?key=secret", DEFAULT_ENDPOINT));
        assert!(!format!("{:?}", config).contains("secret"));

        let config = config.with_endpoint("http://localhost/analyze?alt=json");
        assert_eq!(config.request_url(), "http://localhost/analyze?alt=json&key=secret");
    }

    #[test]
    fn test_transport_error_passes_through() {
        let transport = CannedTransport::failing();
        let client = create_client(ClientConfig::new(), &transport);
        let err = client
            .analyze_syntax("Dogs bark.", DocumentType::PlainText)
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(Refused)));
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_api_error_passes_through() {
        let transport = CannedTransport::replying(json!({
            "error": {
                "code": 400,
                "message": "The language sq is not supported for syntax analysis.",
                "status": "INVALID_ARGUMENT"
            }
        }));
        let client = create_client(ClientConfig::new(), &transport);

        match client.analyze_syntax("Përshëndetje", DocumentType::PlainText) {
            Err(ClientError::Api { code, status, .. }) => {
                assert_eq!(code, 400);
                assert_eq!(status, "INVALID_ARGUMENT");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_reply_fails_conversion() {
        let transport = CannedTransport::replying(json!({"language": "en"}));
        let client = create_client(ClientConfig::new(), &transport);
        let err = client
            .analyze_document("", DocumentType::PlainText)
            .unwrap_err();

        assert!(matches!(err, ClientError::Convert(ConvertError::EmptyResponse)));
    }

    #[test]
    fn test_config_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (CREDENTIALS_ENV, "/etc/gcloud/key.json"),
            (API_KEY_ENV, ""),
        ]);
        let config = ClientConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(
            config.credentials_path,
            Some(PathBuf::from("/etc/gcloud/key.json"))
        );
        assert_eq!(config.api_key, None);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.encoding_type, EncodingType::Utf8);
    }
}
