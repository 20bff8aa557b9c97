//! Uptime monitor API client for the admin /status command.
//!
//! Calls the UptimeRobot v2 `getMonitors` endpoint with the configured API
//! key. Any failure maps to `None`; the /status handler turns that into an
//! "unreachable" reply instead of an error.

use serde::Deserialize;
use std::time::Duration;

/// One monitor as reported by the uptime API.
#[derive(Debug, Clone)]
pub struct MonitorStatus {
    pub name: String,
    pub state: &'static str,
    pub uptime_ratio: Option<String>,
}

#[derive(Deserialize)]
struct MonitorsResponse {
    stat: String,
    #[serde(default)]
    monitors: Vec<MonitorEntry>,
}

#[derive(Deserialize)]
struct MonitorEntry {
    friendly_name: String,
    status: i64,
    #[serde(default)]
    custom_uptime_ratio: Option<String>,
}

/// Maps the API's numeric monitor status to a label.
fn status_label(status: i64) -> &'static str {
    match status {
        0 => "paused",
        1 => "not checked yet",
        2 => "up",
        8 => "seems down",
        9 => "down",
        _ => "unknown",
    }
}

/// Fetches the current status of all monitors on the account.
pub async fn fetch_monitors(api_key: &str) -> Option<Vec<MonitorStatus>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .ok()?;

    let response = client
        .post("https://api.uptimerobot.com/v2/getMonitors")
        .form(&[
            ("api_key", api_key),
            ("format", "json"),
            ("custom_uptime_ratios", "30"),
        ])
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        log::warn!("Uptime API returned HTTP {}", response.status());
        return None;
    }

    let body: MonitorsResponse = response.json().await.ok()?;
    if body.stat != "ok" {
        log::warn!("Uptime API returned stat={}", body.stat);
        return None;
    }

    Some(
        body.monitors
            .into_iter()
            .map(|m| MonitorStatus {
                name: m.friendly_name,
                state: status_label(m.status),
                uptime_ratio: m.custom_uptime_ratio,
            })
            .collect(),
    )
}

/// Formats monitor statuses into the admin-facing reply.
pub fn format_status_report(monitors: &[MonitorStatus]) -> String {
    if monitors.is_empty() {
        return "No monitors configured.".to_string();
    }

    let mut report = String::from("📡 Uptime monitors:\n");
    for m in monitors {
        report.push_str(&format!("\n• {} — {}", m.name, m.state));
        if let Some(ratio) = &m.uptime_ratio {
            report.push_str(&format!(" ({}% / 30d)", ratio));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(status_label(2), "up");
        assert_eq!(status_label(9), "down");
        assert_eq!(status_label(42), "unknown");
    }

    #[test]
    fn report_includes_ratio_when_present() {
        let monitors = vec![
            MonitorStatus {
                name: "bot".into(),
                state: "up",
                uptime_ratio: Some("99.98".into()),
            },
            MonitorStatus {
                name: "web".into(),
                state: "down",
                uptime_ratio: None,
            },
        ];
        let report = format_status_report(&monitors);
        assert!(report.contains("bot — up (99.98% / 30d)"));
        assert!(report.contains("web — down"));
    }

    #[test]
    fn empty_report() {
        assert_eq!(format_status_report(&[]), "No monitors configured.");
    }
}
