use chrono::{DateTime, Utc};

mod notifier;
mod scheduler;
mod source;

pub use notifier::{LogNotifier, NotificationError, Notifier};
pub use review_status::QueryError;
pub use scheduler::serve;
pub use source::{BacklogSource, ProjectBacklog};

/// Configuration of the recurring first-stage backlog check.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AlertConfig {
    /// Client whose projects are checked each cycle.
    pub client_ref: String,
    /// Recipients of every alert, in delivery order.
    pub recipients: Vec<String>,
    /// Backlog size at or above which an alert fires.
    #[serde(default = "AlertConfig::default_threshold")]
    pub threshold: u64,
    /// Length of the rolling window over item timestamps, ending at the
    /// evaluation instant.
    #[serde(default = "AlertConfig::default_window", with = "humantime_serde")]
    pub window: std::time::Duration,
    /// Interval between evaluation cycles.
    #[serde(default = "AlertConfig::default_window", with = "humantime_serde")]
    pub interval: std::time::Duration,
}

impl AlertConfig {
    pub fn new(client_ref: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            client_ref: client_ref.into(),
            recipients,
            threshold: Self::default_threshold(),
            window: Self::default_window(),
            interval: Self::default_window(),
        }
    }

    fn default_threshold() -> u64 {
        200
    }

    // The check interval defaults to the window length, so consecutive
    // windows tile the timeline without gaps or overlap.
    fn default_window() -> std::time::Duration {
        std::time::Duration::from_secs(30 * 60)
    }
}

/// Rolling evaluation window over item timestamps, inclusive on both ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// The window of `length` ending at `end`. Lengths which would reach
    /// past the representable range saturate to the beginning of time,
    /// which selects everything.
    pub fn ending_at(end: DateTime<Utc>, length: std::time::Duration) -> Self {
        let start = chrono::Duration::from_std(length)
            .ok()
            .and_then(|length| end.checked_sub_signed(length))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A project whose first-stage backlog reached the threshold within one
/// evaluation cycle. Ephemeral: alert events live only for the cycle which
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub project_name: String,
    pub backlog: u64,
    pub window: Window,
}

impl AlertEvent {
    /// Human-readable alert body.
    pub fn message(&self, threshold: u64) -> String {
        format!(
            "The project \"{}\" has exceeded {} tweets awaiting first stage review \
             in the last {} minutes.",
            self.project_name,
            threshold,
            self.window.minutes(),
        )
    }
}

/// Selects the projects whose backlog is at or above `threshold`.
///
/// There is no suppression state: a project which stays at threshold
/// re-alerts on every cycle. This is the seam where a cool-down or
/// rising-edge policy would slot in.
pub fn evaluate(rows: Vec<ProjectBacklog>, threshold: u64, window: Window) -> Vec<AlertEvent> {
    rows.into_iter()
        .filter(|row| row.awaiting_first >= threshold)
        .map(|row| AlertEvent {
            project_name: row.name,
            backlog: row.awaiting_first,
            window,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn window() -> Window {
        Window::ending_at(
            "2024-07-26T12:00:00Z".parse().unwrap(),
            std::time::Duration::from_secs(30 * 60),
        )
    }

    fn backlog(reference: &str, name: &str, awaiting_first: u64) -> ProjectBacklog {
        ProjectBacklog {
            reference: reference.to_string(),
            name: name.to_string(),
            awaiting_first,
        }
    }

    #[test]
    fn window_bounds_and_minutes() {
        let window = window();
        let expected: DateTime<Utc> = "2024-07-26T11:30:00Z".parse().unwrap();
        assert_eq!(window.start, expected);
        assert_eq!(window.minutes(), 30);
    }

    #[test]
    fn window_length_beyond_representable_range_saturates() {
        // Config durations come from humantime, which accepts lengths far
        // beyond what chrono timestamps can span. Such a window must cover
        // all of history rather than panicking the scheduler.
        let end: DateTime<Utc> = "2024-07-26T12:00:00Z".parse().unwrap();
        let window = Window::ending_at(end, std::time::Duration::from_secs(u64::MAX));
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(window.end, end);

        // A representable but huge length also saturates instead of
        // underflowing the start bound.
        let window = Window::ending_at(end, std::time::Duration::from_secs(1 << 43));
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn evaluate_fires_at_threshold_and_not_below() {
        let rows = vec![
            backlog("p1", "Launch", 199),
            backlog("p2", "Survey", 200),
            backlog("p3", "Recall", 250),
        ];
        let events = evaluate(rows, 200, window());

        assert_eq!(
            events,
            vec![
                AlertEvent {
                    project_name: "Survey".to_string(),
                    backlog: 200,
                    window: window(),
                },
                AlertEvent {
                    project_name: "Recall".to_string(),
                    backlog: 250,
                    window: window(),
                },
            ],
        );
    }

    #[test]
    fn alert_message_names_project_threshold_and_window() {
        let event = AlertEvent {
            project_name: "Launch".to_string(),
            backlog: 250,
            window: window(),
        };
        assert_eq!(
            event.message(200),
            "The project \"Launch\" has exceeded 200 tweets awaiting first stage review \
             in the last 30 minutes.",
        );
    }

    #[test]
    fn config_defaults() {
        let config: AlertConfig = serde_json::from_value(serde_json::json!({
            "client_ref": "acme",
            "recipients": ["reviews@example.com"],
        }))
        .unwrap();

        assert_eq!(config.threshold, 200);
        assert_eq!(config.window, std::time::Duration::from_secs(30 * 60));
        assert_eq!(config.interval, std::time::Duration::from_secs(30 * 60));

        let config: AlertConfig = serde_json::from_value(serde_json::json!({
            "client_ref": "acme",
            "recipients": [],
            "threshold": 50,
            "window": "10m",
            "interval": "5m",
        }))
        .unwrap();

        assert_eq!(config.threshold, 50);
        assert_eq!(config.window, std::time::Duration::from_secs(10 * 60));
        assert_eq!(config.interval, std::time::Duration::from_secs(5 * 60));
    }
}
