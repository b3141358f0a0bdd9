use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub history: HistorySettings,
    pub console: ConsoleSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            host: "broker.hivemq.com".to_string(),
            port: 1883,
            client_id: format!("esp32-telemetry-{}", std::process::id()),
            keep_alive_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistorySettings {
    /// Samples retained per numeric channel and for the shared time axis.
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConsoleSettings {
    pub refresh_secs: u64,
    /// Most recent samples shown in the chart summary.
    pub window: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            refresh_secs: 1,
            window: 20,
        }
    }
}

/// Built-in defaults cover the public test broker; the file only needs to
/// exist when overriding them.
pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
