//! Fire-and-forget StatsD transport over UDP.
//!
//! Every metric travels in its own datagram on its own socket. The socket is
//! bound, used and dropped inside a single `send`, bounded by the configured
//! timeout. Nothing is retried or queued: a collector that is unreachable
//! simply produces gaps in the series.

use crate::config::CollectorEnvConfig;
use crate::domain::metric::Metric;
use crate::domain::ports::MetricSink;
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{UdpSocket, lookup_host};
use tracing::{debug, warn};

pub struct StatsdEmitter {
    host: String,
    port: u16,
    timeout: Duration,
    prefix: String,
}

impl StatsdEmitter {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        timeout: Duration,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            prefix: prefix.into(),
        }
    }

    pub fn from_config(collector: &CollectorEnvConfig, prefix: &str) -> Self {
        Self::new(
            collector.host.clone(),
            collector.port,
            collector.timeout,
            prefix,
        )
    }

    async fn send_datagram(&self, payload: &[u8]) -> io::Result<usize> {
        let target = lookup_host((self.host.as_str(), self.port))
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} did not resolve to any address", self.host),
                )
            })?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        // Dropped (closed) when this function returns, whatever the outcome
        let socket = UdpSocket::bind(local).await?;
        socket.send_to(payload, target).await
    }
}

#[async_trait]
impl MetricSink for StatsdEmitter {
    async fn send(&self, metric: Metric) {
        if !metric.value.is_finite() {
            warn!("StatsD: Skipping non-finite value for {}", metric.name);
            return;
        }

        let line = metric.line(&self.prefix);
        match tokio::time::timeout(self.timeout, self.send_datagram(line.as_bytes())).await {
            Ok(Ok(_)) => debug!("StatsD: Sent {}", line),
            Ok(Err(e)) => debug!("StatsD: Dropped {}: {}", line, e),
            Err(_) => debug!("StatsD: Dropped {}: timed out after {:?}", line, self.timeout),
        }
    }
}
