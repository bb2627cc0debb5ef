//! Configuration for the observatory server.
//!
//! Configuration can be loaded from multiple sources with the following precedence (highest to
//! lowest):
//!
//! 1. Environment variables (prefixed with `OBS__`)
//! 2. YAML configuration file (specified via `-c` or `--config` flag)
//! 3. Defaults
//!
//! See [`Config`] for a description of all configuration fields and their defaults.
//!
//! # Environment Variables
//!
//! Environment variables use `OBS__` as a prefix and double underscores (`__`) to denote nested
//! configuration structures. For example:
//!
//! - `OBS__HTTP_ADDR=0.0.0.0:8080` sets the HTTP server address
//! - `OBS__ENDPOINTS__SLOW_DELAY=2s` shortens the delay of `/slow`
//!
//! # YAML Configuration File
//!
//! The above configuration in YAML format would look like this:
//!
//! ```yaml
//! http_addr: 0.0.0.0:8080
//!
//! endpoints:
//!   slow_delay: 2s
//! ```

use std::borrow::Cow;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use secrecy::{CloneableSecret, SecretBox, SerializableSecret, zeroize::Zeroize};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "OBS__";

/// Newtype around `String` that may protect against accidental
/// logging of secrets in our configuration struct. Use with
/// [`secrecy::SecretBox`].
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigSecret(String);

impl ConfigSecret {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ConfigSecret {
    fn from(str: &str) -> Self {
        ConfigSecret(str.to_string())
    }
}

impl fmt::Debug for ConfigSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[redacted]")
    }
}

impl CloneableSecret for ConfigSecret {}
impl SerializableSecret for ConfigSecret {}
impl Zeroize for ConfigSecret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Runtime configuration for the Tokio async runtime.
///
/// Used in: [`Config::runtime`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Runtime {
    /// Number of worker threads for the server runtime.
    ///
    /// # Default
    ///
    /// Defaults to the available parallelism of the host, or `1` if that cannot be determined.
    ///
    /// # Environment Variable
    ///
    /// `OBS__RUNTIME__WORKER_THREADS`
    pub worker_threads: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// [Sentry](https://sentry.io/) error tracking configuration.
///
/// Sentry is disabled by default and only enabled when a DSN is provided.
///
/// Used in: [`Config::sentry`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Sentry {
    /// Sentry DSN (Data Source Name).
    ///
    /// # Environment Variable
    ///
    /// `OBS__SENTRY__DSN`
    pub dsn: Option<SecretBox<ConfigSecret>>,

    /// Environment name for this deployment, such as `production`.
    ///
    /// # Environment Variable
    ///
    /// `OBS__SENTRY__ENVIRONMENT`
    pub environment: Option<Cow<'static, str>>,

    /// Server name or identifier, usually the hostname.
    ///
    /// # Environment Variable
    ///
    /// `OBS__SENTRY__SERVER_NAME`
    pub server_name: Option<Cow<'static, str>>,

    /// Error event sampling rate between `0.0` and `1.0`.
    ///
    /// # Default
    ///
    /// `1.0` (send all errors)
    pub sample_rate: f32,

    /// Performance trace sampling rate between `0.0` and `1.0`.
    ///
    /// # Default
    ///
    /// `0.01` (send 1% of traces)
    pub traces_sample_rate: f32,

    /// Enable Sentry SDK debug output on stderr.
    pub debug: bool,
}

impl Sentry {
    /// Returns whether Sentry integration is enabled.
    pub fn is_enabled(&self) -> bool {
        self.dsn.is_some()
    }
}

impl Default for Sentry {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            server_name: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.01,
            debug: false,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted. The format can be explicitly specified or
/// auto-detected based on whether output is to a TTY.
///
/// Parsing is case-insensitive, and an empty string selects [`LogFormat::Auto`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LogFormat {
    /// Auto detect the best format.
    ///
    /// This chooses [`LogFormat::Pretty`] for TTY, otherwise [`LogFormat::Simplified`].
    Auto,

    /// Pretty printing with colors.
    ///
    /// ```text
    ///  INFO  observatory_server::endpoints > Health check endpoint accessed
    /// ```
    Pretty,

    /// Simplified plain text output.
    ///
    /// ```text
    /// 2020-12-04T12:10:32Z INFO observatory_server::endpoints: Health check endpoint accessed
    /// ```
    Simplified,

    /// Dump out JSON lines.
    ///
    /// ```text
    /// {"timestamp":"2020-12-04T12:11:08.729716Z","level":"INFO","fields":{"message":"Health check endpoint accessed"},"target":"observatory_server::endpoints::demo"}
    /// ```
    Json,
}

/// The logging format parse error.
#[derive(Clone, Debug)]
pub struct FormatParseError(String);

impl fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"error parsing "{}" as format: expected one of "auto", "pretty", "simplified", "json""#,
            self.0
        )
    }
}

impl std::str::FromStr for LogFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let result = match s {
            "" => LogFormat::Auto,
            s if s.eq_ignore_ascii_case("auto") => LogFormat::Auto,
            s if s.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            s if s.eq_ignore_ascii_case("simplified") => LogFormat::Simplified,
            s if s.eq_ignore_ascii_case("json") => LogFormat::Json,
            s => return Err(FormatParseError(s.into())),
        };

        Ok(result)
    }
}

impl std::error::Error for FormatParseError {}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Auto => "auto",
            LogFormat::Pretty => "pretty",
            LogFormat::Simplified => "simplified",
            LogFormat::Json => "json",
        })
    }
}

mod display_fromstr {
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: std::fmt::Display,
    {
        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: std::str::FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Display,
    {
        use serde::Deserialize;
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Logging configuration.
///
/// Logs are always written to stderr.
///
/// Used in: [`Config::logging`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Minimum log level to output.
    ///
    /// Valid levels in increasing severity: TRACE, DEBUG, INFO, WARN, ERROR, OFF. The `RUST_LOG`
    /// environment variable provides more granular control per module if needed.
    ///
    /// # Default
    ///
    /// `INFO`
    ///
    /// # Environment Variable
    ///
    /// `OBS__LOGGING__LEVEL`
    #[serde(with = "display_fromstr")]
    pub level: LevelFilter,

    /// Log output format. See [`LogFormat`] for available options.
    ///
    /// # Default
    ///
    /// `Auto` (pretty for TTY, simplified otherwise)
    ///
    /// # Environment Variable
    ///
    /// `OBS__LOGGING__FORMAT`
    #[serde(with = "display_fromstr")]
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

/// Behavior of the demo endpoints.
///
/// Used in: [`Config::endpoints`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoints {
    /// How long `/slow` waits before responding.
    ///
    /// # Default
    ///
    /// `5s`
    ///
    /// # Environment Variable
    ///
    /// `OBS__ENDPOINTS__SLOW_DELAY`
    #[serde(with = "humantime_serde")]
    pub slow_delay: Duration,

    /// Probability between `0.0` and `1.0` that `/unstable` responds with a failure.
    ///
    /// # Default
    ///
    /// `0.4`
    ///
    /// # Environment Variable
    ///
    /// `OBS__ENDPOINTS__UNSTABLE_FAILURE_RATE`
    pub unstable_failure_rate: f64,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            slow_delay: Duration::from_secs(5),
            unstable_failure_rate: 0.4,
        }
    }
}

/// Main configuration struct for the observatory server.
///
/// Configuration is loaded with the following precedence (highest to lowest):
/// 1. Environment variables (prefixed with `OBS__`)
/// 2. YAML configuration file (if provided via `-c` flag)
/// 3. Default values
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server bind address.
    ///
    /// # Default
    ///
    /// `0.0.0.0:5000` (listens on all network interfaces, port 5000)
    ///
    /// # Environment Variable
    ///
    /// `OBS__HTTP_ADDR`
    pub http_addr: SocketAddr,

    /// Configuration of the internal task runtime.
    pub runtime: Runtime,

    /// Logging configuration.
    pub logging: Logging,

    /// Sentry error tracking configuration.
    pub sentry: Sentry,

    /// Behavior of the demo endpoints.
    pub endpoints: Endpoints,

    /// Seed for the random source that drives `/unstable`.
    ///
    /// When unset, a thread-local RNG seeded from the operating system is used. A fixed seed
    /// makes the sequence of failures reproducible across runs.
    ///
    /// # Environment Variable
    ///
    /// `OBS__RANDOM_SEED`
    pub random_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            runtime: Runtime::default(),
            logging: Logging::default(),
            sentry: Sentry::default(),
            endpoints: Endpoints::default(),
            random_seed: None,
        }
    }
}

impl Config {
    /// Loads configuration from the provided arguments.
    ///
    /// Configuration is merged in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. YAML configuration file (if provided in `args`)
    /// 3. Environment variables (prefixed with `OBS__`)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The YAML configuration file cannot be read or parsed
    /// - Environment variables contain invalid values
    /// - The failure rate of `/unstable` is outside of `0.0..=1.0`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        let rate = config.endpoints.unstable_failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("unstable_failure_rate must be between 0.0 and 1.0, got {rate}");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load(None).unwrap();

            assert_eq!(config.http_addr, "0.0.0.0:5000".parse().unwrap());
            assert_eq!(config.endpoints.slow_delay, Duration::from_secs(5));
            assert_eq!(config.endpoints.unstable_failure_rate, 0.4);
            assert_eq!(config.logging.level, LevelFilter::INFO);
            assert_eq!(config.logging.format, LogFormat::Auto);
            assert!(!config.sentry.is_enabled());
            assert!(config.random_seed.is_none());

            Ok(())
        });
    }

    #[test]
    fn configurable_via_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OBS__HTTP_ADDR", "127.0.0.1:8080");
            jail.set_env("OBS__ENDPOINTS__SLOW_DELAY", "250ms");
            jail.set_env("OBS__ENDPOINTS__UNSTABLE_FAILURE_RATE", "0.9");
            jail.set_env("OBS__LOGGING__LEVEL", "debug");
            jail.set_env("OBS__LOGGING__FORMAT", "json");
            jail.set_env("OBS__RANDOM_SEED", "42");
            jail.set_env("OBS__SENTRY__DSN", "abcde");
            jail.set_env("OBS__SENTRY__SAMPLE_RATE", "0.5");
            jail.set_env("OBS__SENTRY__ENVIRONMENT", "production");

            let config = Config::load(None).unwrap();

            assert_eq!(config.http_addr, "127.0.0.1:8080".parse().unwrap());
            assert_eq!(config.endpoints.slow_delay, Duration::from_millis(250));
            assert_eq!(config.endpoints.unstable_failure_rate, 0.9);
            assert_eq!(config.logging.level, LevelFilter::DEBUG);
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.random_seed, Some(42));

            assert_eq!(config.sentry.dsn.unwrap().expose_secret().as_str(), "abcde");
            assert_eq!(config.sentry.environment.as_deref(), Some("production"));
            assert_eq!(config.sentry.sample_rate, 0.5);

            Ok(())
        });
    }

    #[test]
    fn configurable_via_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            http_addr: 127.0.0.1:9000
            endpoints:
                slow_delay: 1s
            logging:
                format: simplified
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|_jail| {
            let config = Config::load(Some(tempfile.path())).unwrap();

            assert_eq!(config.http_addr, "127.0.0.1:9000".parse().unwrap());
            assert_eq!(config.endpoints.slow_delay, Duration::from_secs(1));
            // Fields not in the file keep their defaults.
            assert_eq!(config.endpoints.unstable_failure_rate, 0.4);
            assert_eq!(config.logging.format, LogFormat::Simplified);

            Ok(())
        });
    }

    #[test]
    fn configured_with_env_and_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            http_addr: 127.0.0.1:9000
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|jail| {
            jail.set_env("OBS__HTTP_ADDR", "127.0.0.1:9001");

            let config = Config::load(Some(tempfile.path())).unwrap();
            // Env should overwrite the yaml config
            assert_eq!(config.http_addr, "127.0.0.1:9001".parse().unwrap());

            Ok(())
        });
    }

    #[test]
    fn rejects_out_of_range_failure_rate() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OBS__ENDPOINTS__UNSTABLE_FAILURE_RATE", "1.5");

            let err = Config::load(None).unwrap_err();
            assert!(err.to_string().contains("unstable_failure_rate"));

            Ok(())
        });
    }

    #[test]
    fn sentry_dsn_is_redacted() {
        let sentry = Sentry {
            dsn: Some(SecretBox::new(Box::new(ConfigSecret::from("secret-dsn")))),
            ..Default::default()
        };

        let debug = format!("{sentry:?}");
        assert!(!debug.contains("secret-dsn"));
    }

    #[test]
    fn log_format_is_case_insensitive() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OBS__LOGGING__FORMAT", "JSON");
            let config = Config::load(None).unwrap();
            assert_eq!(config.logging.format, LogFormat::Json);

            jail.set_env("OBS__LOGGING__FORMAT", "xml");
            let err = Config::load(None).unwrap_err();
            assert!(format!("{err:#}").contains("as format"));

            Ok(())
        });
    }

    #[test]
    fn parse_log_format() {
        assert_eq!("".parse::<LogFormat>().unwrap(), LogFormat::Auto);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());

        for format in [
            LogFormat::Auto,
            LogFormat::Pretty,
            LogFormat::Simplified,
            LogFormat::Json,
        ] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }
}
