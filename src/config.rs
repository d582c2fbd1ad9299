use crate::messages::Locale;

/// Options recognized by the gate.
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    /// Path prefixes exempt from any window, e.g. monitoring endpoints.
    pub excludes: Vec<String>,
    /// Channels to ask the remote authority about.
    pub kanaler: Vec<String>,
    /// Error page the gate forwards to while a blocking window is ongoing.
    pub sida: String,
    /// Identity of the calling system, passed to the remote lookup.
    pub system: String,
    /// Margin in minutes, forwarded to the remote lookup.
    pub marginal: u32,
    /// Forced message locale; absent means derive per response/request.
    pub lang: Option<Locale>,
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self {
            excludes: parse_excludes(std::env::var("DRIFTAVBROTT_EXCLUDES").ok().as_deref()),
            kanaler: parse_kanaler(std::env::var("DRIFTAVBROTT_KANALER").ok().as_deref()),
            sida: std::env::var("DRIFTAVBROTT_SIDA").unwrap_or_else(|_| "/avbrott".to_string()),
            system: std::env::var("DRIFTAVBROTT_SYSTEM").unwrap_or_default(),
            marginal: parse_marginal(std::env::var("DRIFTAVBROTT_MARGINAL").ok().as_deref()),
            lang: std::env::var("DRIFTAVBROTT_LANG").ok().as_deref().and_then(Locale::parse),
        }
    }
}

/// Demo binary configuration on top of the gate options.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub service_url: String,
    pub gate: GateConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut gate = GateConfig::from_env();
        // The demo keeps its health endpoint reachable during a window unless
        // excludes are configured explicitly.
        if std::env::var("DRIFTAVBROTT_EXCLUDES").is_err() {
            gate.excludes = vec!["/actuator/health".to_string()];
        }
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            service_url: std::env::var("DRIFTAVBROTT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/driftavbrott-service".to_string()),
            gate,
        }
    }
}

/// Space-separated exclude prefixes. Never yields empty entries.
pub fn parse_excludes(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Comma-separated channel names.
pub fn parse_kanaler(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|kanal| !kanal.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Margin in minutes; anything unparseable falls back to 0.
pub fn parse_marginal(value: Option<&str>) -> u32 {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return 0;
    };
    match raw.trim().parse() {
        Ok(minutes) => minutes,
        Err(_) => {
            tracing::debug!("could not parse marginal value '{raw}' as minutes, using 0");
            0
        }
    }
}
