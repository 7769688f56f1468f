use anyhow::Error;
use confique::Config;
use std::{
    net::IpAddr,
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

#[derive(Debug, Config)]
pub struct DataProbeConfig {
    #[config(env = "DATAPROBE_PORT", default = 3000)]
    pub port: u16,
    #[config(env = "DATAPROBE_ENDPOINT", default = "127.0.0.1")]
    pub endpoint: IpAddr,

    #[config(env = "DATAPROBE_HTTP_SERVER_TIMEOUT_SECONDS", default = 60)]
    pub http_server_timeout_seconds: u64,

    /// Timeout of each request made to a remote resource
    #[config(env = "DATAPROBE_FETCH_TIMEOUT_SECONDS", default = 30)]
    pub fetch_timeout_seconds: u64,

    #[config(env = "DATAPROBE_DEFAULT_SAMPLE_ROWS", default = 80)]
    pub default_sample_rows: usize,

    /// Upper bound on sampled rows, also used when the caller asks for all rows
    #[config(env = "DATAPROBE_MAX_SAMPLE_ROWS", default = 5000)]
    pub max_sample_rows: usize,

    #[config(env = "DATAPROBE_CSV_MAX_LINES", default = 1000)]
    pub csv_max_lines: usize,

    #[config(env = "DATAPROBE_MAX_INFERENCE_ROWS", default = 30)]
    pub max_inference_rows: usize,

    #[config(
        env = "DATAPROBE_INE_BASE_URL",
        default = "https://servicios.ine.es/wstempus/js/es"
    )]
    pub ine_base_url: String,

    #[config(env = "DATAPROBE_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl DataProbeConfig {
    pub fn load() -> Result<DataProbeConfig, Error> {
        let c = DataProbeConfig::builder()
            .env()
            .file("settings.toml")
            .load()?;

        Ok(c)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Configured user agent, or the crate name and version.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("dataprobe/{}", env!("CARGO_PKG_VERSION")))
    }
}

static DATAPROBE_CONFIG: OnceLock<Arc<DataProbeConfig>> = OnceLock::new();

pub fn get() -> Result<Arc<DataProbeConfig>, Error> {
    DATAPROBE_CONFIG.get().cloned().ok_or_else(|| {
        Error::msg(
            "Configuration not loaded. Please call load_configuration() before using the configuration",
        )
    })
}

pub fn load_configuration() -> Result<(), Error> {
    if DATAPROBE_CONFIG.get().is_some() {
        return Ok(());
    }

    let config = DataProbeConfig::load()?;
    DATAPROBE_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}

static TEST_CONFIG_INIT: Mutex<()> = Mutex::new(());

/// Loads the configuration once for the whole test run.
/// Safe to call from concurrently running tests.
pub fn load_configuration_for_tests() -> Result<(), Error> {
    let _guard = TEST_CONFIG_INIT
        .lock()
        .map_err(|_| Error::msg("Test configuration lock poisoned"))?;

    if DATAPROBE_CONFIG.get().is_some() {
        return Ok(());
    }

    let config = DataProbeConfig::load()?;
    DATAPROBE_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_config() {
        let config = DataProbeConfig::load().unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.endpoint, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.default_sample_rows, 80);
        assert_eq!(config.max_sample_rows, 5000);
        assert_eq!(config.csv_max_lines, 1000);
        assert_eq!(config.max_inference_rows, 30);
        assert_eq!(config.ine_base_url, "https://servicios.ine.es/wstempus/js/es");

        temp_env::with_var("DATAPROBE_PORT", Some("8080"), || {
            let config = DataProbeConfig::load().unwrap();
            assert_eq!(config.port, 8080);
        });
    }

    #[test]
    #[serial]
    fn test_fetch_timeout() {
        temp_env::with_var("DATAPROBE_FETCH_TIMEOUT_SECONDS", Some("5"), || {
            let config = DataProbeConfig::load().unwrap();
            assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        });
    }

    #[test]
    #[serial]
    fn test_user_agent() {
        temp_env::with_var_unset("DATAPROBE_USER_AGENT", || {
            let config = DataProbeConfig::load().unwrap();
            assert!(config.user_agent().starts_with("dataprobe/"));
        });
        temp_env::with_var("DATAPROBE_USER_AGENT", Some("probe-test"), || {
            let config = DataProbeConfig::load().unwrap();
            assert_eq!(config.user_agent(), "probe-test");
        });
    }

    #[test]
    #[serial]
    fn test_global_configuration() {
        load_configuration_for_tests().unwrap();
        let config = get().unwrap();
        assert!(config.max_sample_rows > 0);
    }
}
