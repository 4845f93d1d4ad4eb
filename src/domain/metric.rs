//! StatsD metric model and line formatting.
//!
//! A metric is rendered as `<prefix>.<name>:<value>|<type>`, one line per
//! datagram.

use std::fmt;

/// StatsD metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    #[default]
    Gauge,
}

impl MetricType {
    pub fn code(self) -> &'static str {
        match self {
            MetricType::Gauge => "g",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    pub kind: MetricType,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64, kind: MetricType) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
        }
    }

    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, MetricType::Gauge)
    }

    /// Render the wire line for this metric.
    pub fn line(&self, prefix: &str) -> String {
        format!(
            "{}.{}:{}|{}",
            prefix,
            self.name,
            format_value(self.value),
            self.kind
        )
    }
}

/// Format a value as a decimal float literal: `1013.0`, `40.2`, `-3.5`.
pub fn format_value(value: f64) -> String {
    let rendered = value.to_string();
    if value.is_finite() && !rendered.contains('.') {
        format!("{}.0", rendered)
    } else {
        rendered
    }
}
