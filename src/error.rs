//! Error types returned by the configuration layer, the API client and the checks.

use fantoccini::error::{CmdError, NewSessionError};
use hyper::Error as HError;
use hyper_util::client::legacy::Error as ClientError;
use std::error::Error;
use std::fmt;
use std::io::Error as IOError;
use url::ParseError;

/// An error occurred while assembling [`Settings`](crate::Settings).
#[derive(Debug)]
pub enum ConfigError {
    /// A required setting was not provided.
    Missing(&'static str),
    /// A setting that should hold a URL could not be parsed as one.
    BadUrl(&'static str, ParseError),
    /// A setting was present but its value is not acceptable.
    Invalid(&'static str, String),
    /// The configuration file could not be read.
    Io(IOError),
    /// The configuration file is not valid TOML for these settings.
    Toml(toml::de::Error),
}

impl Error for ConfigError {
    fn description(&self) -> &str {
        match *self {
            ConfigError::Missing(..) => "required setting is missing",
            ConfigError::BadUrl(..) => "setting is not a valid url",
            ConfigError::Invalid(..) => "setting has an invalid value",
            ConfigError::Io(..) => "configuration file could not be read",
            ConfigError::Toml(..) => "configuration file is malformed",
        }
    }

    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ConfigError::BadUrl(_, ref e) => Some(e),
            ConfigError::Io(ref e) => Some(e),
            ConfigError::Toml(ref e) => Some(e),
            ConfigError::Missing(..) | ConfigError::Invalid(..) => None,
        }
    }
}

impl fmt::Display for ConfigError {
    #[allow(deprecated)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.description())?;
        match *self {
            ConfigError::Missing(key) => write!(f, "{}", key),
            ConfigError::BadUrl(key, ref e) => write!(f, "{} ({})", key, e),
            ConfigError::Invalid(key, ref msg) => write!(f, "{} ({})", key, msg),
            ConfigError::Io(ref e) => write!(f, "{}", e),
            ConfigError::Toml(ref e) => write!(f, "{}", e),
        }
    }
}

impl From<IOError> for ConfigError {
    fn from(e: IOError) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

/// An error occurred while talking to the Employees API.
///
/// Note that an HTTP error status is *not* an `ApiError`: the response is handed back to the
/// caller so the status itself can be asserted on.
#[derive(Debug)]
pub enum ApiError {
    /// A request URL could not be constructed.
    BadUrl(ParseError),
    /// The request could not be assembled (for example, an invalid header value).
    BadRequest(http::Error),
    /// The API server could not be reached.
    Failed(ClientError),
    /// The connection was lost while reading the response body.
    Lost(HError),
    /// The TLS backend could not be initialized.
    Tls(IOError),
    /// A request or response body was not the expected JSON.
    Json(serde_json::Error),
}

impl Error for ApiError {
    fn description(&self) -> &str {
        match *self {
            ApiError::BadUrl(..) => "bad url provided",
            ApiError::BadRequest(..) => "request could not be built",
            ApiError::Failed(..) => "api server could not be reached",
            ApiError::Lost(..) => "api connection lost",
            ApiError::Tls(..) => "tls backend could not be initialized",
            ApiError::Json(..) => "api returned incoherent response",
        }
    }

    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ApiError::BadUrl(ref e) => Some(e),
            ApiError::BadRequest(ref e) => Some(e),
            ApiError::Failed(ref e) => Some(e),
            ApiError::Lost(ref e) => Some(e),
            ApiError::Tls(ref e) => Some(e),
            ApiError::Json(ref e) => Some(e),
        }
    }
}

impl fmt::Display for ApiError {
    #[allow(deprecated)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.description())?;
        match *self {
            ApiError::BadUrl(ref e) => write!(f, "{}", e),
            ApiError::BadRequest(ref e) => write!(f, "{}", e),
            ApiError::Failed(ref e) => write!(f, "{}", e),
            ApiError::Lost(ref e) => write!(f, "{}", e),
            ApiError::Tls(ref e) => write!(f, "{}", e),
            ApiError::Json(ref e) => write!(f, "{}", e),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        ApiError::BadUrl(e)
    }
}

impl From<http::Error> for ApiError {
    fn from(e: http::Error) -> Self {
        ApiError::BadRequest(e)
    }
}

impl From<ClientError> for ApiError {
    fn from(e: ClientError) -> Self {
        ApiError::Failed(e)
    }
}

impl From<HError> for ApiError {
    fn from(e: HError) -> Self {
        ApiError::Lost(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Json(e)
    }
}

/// A verification scenario did not hold.
#[derive(Debug)]
pub enum CheckError {
    /// An expectation about the application's behavior was violated.
    Assertion(String),
    /// The API could not be exercised.
    Api(ApiError),
    /// A browser command failed, or a wait on the page timed out.
    Ui(CmdError),
    /// A browser session could not be started.
    Session(NewSessionError),
}

impl CheckError {
    /// Returns true if this error is a violated expectation rather than an infrastructure
    /// failure.
    pub fn is_assertion(&self) -> bool {
        matches!(self, CheckError::Assertion(..))
    }
}

impl Error for CheckError {
    fn description(&self) -> &str {
        match *self {
            CheckError::Assertion(..) => "check failed",
            CheckError::Api(..) => "api request failed",
            CheckError::Ui(..) => "browser command failed",
            CheckError::Session(..) => "browser session could not be started",
        }
    }

    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CheckError::Assertion(..) => None,
            CheckError::Api(ref e) => Some(e),
            CheckError::Ui(ref e) => Some(e),
            CheckError::Session(ref e) => Some(e),
        }
    }
}

impl fmt::Display for CheckError {
    #[allow(deprecated)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.description())?;
        match *self {
            CheckError::Assertion(ref msg) => write!(f, "{}", msg),
            CheckError::Api(ref e) => write!(f, "{}", e),
            CheckError::Ui(ref e) => write!(f, "{}", e),
            CheckError::Session(ref e) => write!(f, "{}", e),
        }
    }
}

impl From<ApiError> for CheckError {
    fn from(e: ApiError) -> Self {
        CheckError::Api(e)
    }
}

impl From<CmdError> for CheckError {
    fn from(e: CmdError) -> Self {
        CheckError::Ui(e)
    }
}

impl From<NewSessionError> for CheckError {
    fn from(e: NewSessionError) -> Self {
        CheckError::Session(e)
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(e: serde_json::Error) -> Self {
        CheckError::Api(ApiError::Json(e))
    }
}
