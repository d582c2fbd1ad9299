use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display format for window bounds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Restriction level, derived from the channel name and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Blocking,
    Warn,
    Info,
}

impl Severity {
    /// Case-insensitive suffix classification: `warn` and `info` mark
    /// announce-only windows, anything else blocks.
    pub fn from_kanal(kanal: &str) -> Self {
        let lower = kanal.to_lowercase();
        if lower.ends_with("warn") {
            Severity::Warn
        } else if lower.ends_with("info") {
            Severity::Info
        } else {
            Severity::Blocking
        }
    }

    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Blocking)
    }
}

/// A maintenance window as reported by the remote authority; bounds arrive
/// margin-adjusted (`start <= slut`) and are replaced wholesale on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driftavbrott {
    pub kanal: String,
    pub start: NaiveDateTime,
    pub slut: NaiveDateTime,
    #[serde(default)]
    pub meddelande_sv: String,
    #[serde(default)]
    pub meddelande_en: String,
}

impl Driftavbrott {
    pub fn severity(&self) -> Severity {
        Severity::from_kanal(&self.kanal)
    }

    pub fn start_text(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn slut_text(&self) -> String {
        self.slut.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_channel_suffix() {
        assert_eq!(Severity::from_kanal("ladok.uppgradering.warn"), Severity::Warn);
        assert_eq!(Severity::from_kanal("ladok.produktionssattning.info"), Severity::Info);
        assert_eq!(Severity::from_kanal("ladok.produktionssattning"), Severity::Blocking);
        assert_eq!(Severity::from_kanal(""), Severity::Blocking);
    }

    #[test]
    fn severity_suffix_is_case_insensitive() {
        assert_eq!(Severity::from_kanal("x.WARN"), Severity::Warn);
        assert_eq!(Severity::from_kanal("x.Info"), Severity::Info);
    }

    #[test]
    fn bounds_render_in_display_format() {
        let avbrott = Driftavbrott {
            kanal: "sys.uppgradering".to_string(),
            start: "2024-01-01T10:00:00".parse().unwrap(),
            slut: "2024-01-01T12:30:00".parse().unwrap(),
            meddelande_sv: String::new(),
            meddelande_en: String::new(),
        };
        assert_eq!(avbrott.start_text(), "2024-01-01 10:00:00");
        assert_eq!(avbrott.slut_text(), "2024-01-01 12:30:00");
    }
}
