//! Terminal status snapshot

use super::record::{StatusField, StatusRecord};
use crate::config::ValidatedConfig;
use crate::console::{Color, Console};
use crate::result::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardSettings {
    active: bool,
    refresh_interval: u64,
}

/// Fixed-layout dashboard; subsystem lines appear only for configured subsystems
#[derive(Debug, Clone)]
pub struct Dashboard {
    console: Console,
    active: bool,
    refresh_interval: Duration,
    show_mineflayer: bool,
    show_tunnel: bool,
    show_relay: bool,
}

impl Dashboard {
    pub fn from_config(config: &ValidatedConfig) -> Result<Self> {
        let settings: DashboardSettings = config.section("dashboard")?;
        Ok(Self {
            console: Console::new(),
            active: settings.active,
            refresh_interval: Duration::from_millis(settings.refresh_interval),
            show_mineflayer: config.bool_at("mineflayer.active").unwrap_or(false),
            show_tunnel: config.bool_at("tunnel.active").unwrap_or(false),
            show_relay: config.bool_at("coordination.active").unwrap_or(false),
        })
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Whether snapshots are rendered at all
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn render(&self, identity: &str, record: &StatusRecord) -> String {
        let mut rows = vec![
            ("Position", record.get(StatusField::Position), Color::Cyan),
            ("ETA", record.get(StatusField::Eta), Color::Cyan),
            ("Restart", record.get(StatusField::Restart), Color::Yellow),
            ("In queue", record.get(StatusField::InQueue), Color::Dim),
            ("Controller", record.get(StatusField::Controller), Color::Green),
        ];
        if self.show_mineflayer {
            rows.push(("Mineflayer", record.get(StatusField::Mineflayer), Color::Dim));
        }
        if self.show_tunnel {
            rows.push(("Tunnel", record.get(StatusField::TunnelUrl), Color::Dim));
        }
        if self.show_relay {
            rows.push(("Relay", record.get(StatusField::LivechatRelay), Color::Dim));
        }

        let title = format!("queuekeeper · {identity}");
        let mut out = format!("{}\n{}\n", self.console.colorize(&title, Color::Bold), self.console.rule());
        for (label, value, color) in rows {
            out.push_str(&format!(
                "{:<12}{}\n",
                format!("{label}:"),
                self.console.colorize(value, color)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use serde_json::json;

    fn dashboard(raw: serde_json::Value) -> Dashboard {
        let config = ConfigLoader::validate(&raw).unwrap();
        Dashboard::from_config(&config)
            .unwrap()
            .with_console(Console::no_colors().with_max_width(20))
    }

    #[test]
    fn test_default_layout() {
        let dashboard = dashboard(json!({"account": {"username": "Alice123"}}));
        let mut record = StatusRecord::new();
        record.set(StatusField::Position, "5".to_string());

        assert_eq!(
            dashboard.render("Alice123", &record),
            "queuekeeper · Alice123\n\
             ────────────────────\n\
             Position:   5\n\
             ETA:        unknown\n\
             Restart:    unknown\n\
             In queue:   unknown\n\
             Controller: unknown\n\
             Mineflayer: unknown\n"
        );
    }

    #[test]
    fn test_subsystem_lines_follow_config() {
        let dashboard = dashboard(json!({
            "account": {"username": "Alice123"},
            "mineflayer": {"active": false},
            "tunnel": {"active": true},
            "coordination": {"active": true}
        }));
        let out = dashboard.render("Alice123", &StatusRecord::new());
        assert!(!out.contains("Mineflayer:"));
        assert!(out.contains("Tunnel:"));
        assert!(out.contains("Relay:"));
    }

    #[test]
    fn test_settings() {
        let dashboard = dashboard(json!({
            "account": {"username": "Alice123"},
            "dashboard": {"active": false, "refreshInterval": 250}
        }));
        assert!(!dashboard.is_active());
        assert_eq!(dashboard.refresh_interval(), Duration::from_millis(250));
    }
}
