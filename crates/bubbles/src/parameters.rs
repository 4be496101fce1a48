//! The optional, external parameters that can tweak a running engine.
//!
//! Right now the only recognised parameter is the emission rate:
//!
//! ```json
//! { "emitFrequency": 80 }
//! ```
//!
//! The parameters are fetched exactly once, before the first frame. Nothing that goes wrong here
//! is fatal: a missing file, a network error, a non-2xx response or broken JSON all just mean
//! the engine runs with its built-in emission rate.

use snafu::{OptionExt as _, ResultExt as _};

/// Everything that can go wrong while loading parameters.
#[derive(Debug, snafu::Snafu)]
#[non_exhaustive]
pub enum ParametersError {
    #[snafu(display("Couldn't read parameters file {}", path.display()))]
    /// The parameters file couldn't be read.
    Read {
        /// Path of the file
        path: std::path::PathBuf,
        /// The parent error type
        source: std::io::Error,
    },

    #[snafu(display("Couldn't fetch parameters from {url}"))]
    /// The HTTP request itself failed.
    Fetch {
        /// The requested URL
        url: String,
        /// The parent error type
        source: reqwest::Error,
    },

    #[snafu(display("Parameters request to {url} returned HTTP {status}"))]
    /// The server answered, but not with a success status.
    Status {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    #[snafu(display("Parameters aren't valid JSON"))]
    /// The response wasn't JSON.
    Parse {
        /// The parent error type
        source: serde_json::Error,
    },

    #[snafu(display("Parameters location has no usable base directory: {location}"))]
    /// A relative file location was given without anywhere to resolve it against.
    Location {
        /// The location as given
        location: String,
    },
}

/// Runtime overrides for the engine's preset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[non_exhaustive]
pub struct Parameters {
    /// Particles emitted per second. `None` means "use the preset's rate".
    pub emit_frequency: Option<f64>,
}

impl Parameters {
    /// Parameters that only say how often to emit.
    #[must_use]
    pub const fn with_emit_frequency(emit_frequency: f64) -> Self {
        Self {
            emit_frequency: Some(emit_frequency),
        }
    }

    /// Parse parameters from JSON text.
    ///
    /// Anything that isn't a number where a number is expected is treated as missing, and unknown
    /// keys are ignored. Only text that isn't JSON at all is an error.
    pub fn from_json(text: &str) -> Result<Self, ParametersError> {
        let value: serde_json::Value = serde_json::from_str(text).context(ParseSnafu)?;
        let emit_frequency = value
            .get("emitFrequency")
            .and_then(serde_json::Value::as_f64);
        Ok(Self { emit_frequency })
    }

    /// The emission rate to use, falling back to the given default. Never negative.
    #[must_use]
    pub fn emit_rate(&self, default: f64) -> f64 {
        self.emit_frequency.unwrap_or(default).max(0.0)
    }
}

/// Where the parameters live.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParameterSource {
    /// A JSON file on disk.
    File(std::path::PathBuf),
    /// A JSON document served over HTTP(S).
    Url(reqwest::Url),
}

impl ParameterSource {
    /// Resolve a location the way a relative URL is resolved against a page: absolute URLs and
    /// absolute paths are used as they are, anything else is relative to `base`.
    pub fn resolve(
        location: &str,
        base: Option<&std::path::Path>,
    ) -> Result<Self, ParametersError> {
        let is_remote = location.starts_with("http://") || location.starts_with("https://");
        if is_remote {
            if let Ok(url) = reqwest::Url::parse(location) {
                return Ok(Self::Url(url));
            }
        }

        let path = std::path::PathBuf::from(location);
        if path.is_absolute() {
            return Ok(Self::File(path));
        }

        let directory = base.context(LocationSnafu { location })?;
        Ok(Self::File(directory.join(path)))
    }

    /// Fetch and parse the parameters. Errors are returned as they are, see [`Self::load`] for
    /// the forgiving version.
    pub async fn fetch(&self) -> Result<Parameters, ParametersError> {
        let text = match self {
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .context(ReadSnafu { path: path.clone() })?,
            Self::Url(url) => Self::fetch_url(url).await?,
        };

        Parameters::from_json(&text)
    }

    /// Fetch the parameters, falling back to just the default emission rate on any failure.
    pub async fn load(&self, default_emit_frequency: f64) -> Parameters {
        tracing::debug!("Loading parameters from {self:?}");
        match self.fetch().await {
            Ok(parameters) => {
                tracing::debug!("Loaded parameters: {parameters:?}");
                parameters
            }
            Err(error) => {
                tracing::warn!("Using default parameters: {error}");
                Parameters::with_emit_frequency(default_emit_frequency)
            }
        }
    }

    /// GET a URL, always asking caches to revalidate.
    async fn fetch_url(url: &reqwest::Url) -> Result<String, ParametersError> {
        let url_string = url.to_string();
        let client = reqwest::Client::builder()
            .user_agent(format!("bubbles/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context(FetchSnafu {
                url: url_string.clone(),
            })?;

        let response = client
            .get(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .context(FetchSnafu {
                url: url_string.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu {
                url: url_string,
                status: status.as_u16(),
            }
            .fail();
        }

        response.text().await.context(FetchSnafu { url: url_string })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_emit_frequency() {
        let parameters = Parameters::from_json(r#"{"emitFrequency": 80, "other": true}"#).unwrap();
        assert_eq!(parameters, Parameters::with_emit_frequency(80.0));
    }

    #[test]
    fn odd_but_valid_json_means_no_override() {
        for text in ["{}", "null", "5", r#"{"emitFrequency": "fast"}"#, "[]"] {
            let parameters = Parameters::from_json(text).unwrap();
            assert_eq!(parameters, Parameters::default(), "for {text}");
            assert!((parameters.emit_rate(120.0) - 120.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn broken_json_is_an_error() {
        let error = Parameters::from_json("{emitFrequency:").unwrap_err();
        assert!(matches!(error, ParametersError::Parse { .. }));
    }

    #[test]
    fn negative_rates_are_floored() {
        let parameters = Parameters::with_emit_frequency(-10.0);
        assert!(parameters.emit_rate(120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resolving_locations() {
        let base = std::path::Path::new("/etc/bubbles");
        assert_eq!(
            ParameterSource::resolve("parameter.json", Some(base)).unwrap(),
            ParameterSource::File(base.join("parameter.json"))
        );
        assert_eq!(
            ParameterSource::resolve("/tmp/p.json", None).unwrap(),
            ParameterSource::File("/tmp/p.json".into())
        );
        assert!(matches!(
            ParameterSource::resolve("https://example.com/assets/parameter.json", None).unwrap(),
            ParameterSource::Url(_)
        ));
        assert!(matches!(
            ParameterSource::resolve("parameter.json", None).unwrap_err(),
            ParametersError::Location { .. }
        ));
    }

    #[tokio::test]
    async fn file_parameters() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("parameter.json");
        std::fs::write(&path, r#"{"emitFrequency": 33.5}"#).unwrap();

        let source = ParameterSource::File(path);
        assert_eq!(
            source.load(120.0).await,
            Parameters::with_emit_frequency(33.5)
        );
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_the_default_rate() {
        let directory = tempfile::tempdir().unwrap();
        let source = ParameterSource::File(directory.path().join("nope.json"));

        let error = source.fetch().await.unwrap_err();
        assert!(matches!(error, ParametersError::Read { .. }));
        assert_eq!(
            source.load(120.0).await,
            Parameters::with_emit_frequency(120.0)
        );
    }

    #[tokio::test]
    async fn not_found_over_http_falls_back_to_the_default_rate() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/assets/parameter.json"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let location = format!("{}/assets/parameter.json", server.uri());
        let source = ParameterSource::resolve(&location, None).unwrap();

        let error = source.fetch().await.unwrap_err();
        assert!(matches!(error, ParametersError::Status { status: 404, .. }));
        assert_eq!(
            source.load(120.0).await,
            Parameters::with_emit_frequency(120.0)
        );
    }

    #[tokio::test]
    async fn http_requests_bypass_caches() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header("cache-control", "no-cache"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"emitFrequency": 7}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let location = format!("{}/parameter.json", server.uri());
        let source = ParameterSource::resolve(&location, None).unwrap();
        assert_eq!(source.load(120.0).await, Parameters::with_emit_frequency(7.0));
    }
}
