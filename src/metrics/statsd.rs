//! DogStatsD UDP transport for the metrics sink.

use super::{MetricsSink, TagSet};
use crate::config::MetricsConfig;
use std::fmt::Write as _;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Fire-and-forget DogStatsD client.
///
/// Datagrams follow the DogStatsD line format
/// (`name:value|kind|#tag:value,...`). The socket is non-blocking; a send
/// that fails or would block drops the sample, which is an acceptable
/// failure mode for every metric in this application.
#[derive(Debug)]
pub struct DogstatsdSink {
    socket: UdpSocket,
    target: SocketAddr,
    global_tags: Vec<(String, String)>,
}

impl DogstatsdSink {
    /// Creates a sink sending to the configured agent address.
    ///
    /// The `service`, `env`, and `version` global tags are attached to every
    /// emission here, not by callers.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when the local socket cannot be bound or the
    /// agent address does not resolve.
    pub fn from_config(config: &MetricsConfig) -> io::Result<Self> {
        let target = (config.host.as_str(), config.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("no address for {}:{}", config.host, config.port),
                )
            })?;

        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;

        Ok(Self {
            socket,
            target,
            global_tags: vec![
                ("service".to_owned(), config.service.clone()),
                ("env".to_owned(), config.env.clone()),
                ("version".to_owned(), config.version.clone()),
            ],
        })
    }

    fn send(&self, name: &str, value: &str, kind: &str, tags: &TagSet) {
        let datagram = format_datagram(name, value, kind, &self.global_tags, tags);
        if let Err(err) = self.socket.send_to(datagram.as_bytes(), self.target) {
            // Best-effort by contract: dropping a sample is never an error
            // worth surfacing past debug logging.
            tracing::debug!(metric = name, error = %err, "dropped metric datagram");
        }
    }
}

impl MetricsSink for DogstatsdSink {
    fn increment(&self, name: &str, delta: u64, tags: TagSet) {
        self.send(name, &delta.to_string(), "c", &tags);
    }

    fn gauge(&self, name: &str, value: f64, tags: TagSet) {
        self.send(name, &value.to_string(), "g", &tags);
    }

    fn histogram(&self, name: &str, value: f64, tags: TagSet) {
        self.send(name, &value.to_string(), "h", &tags);
    }
}

fn format_datagram(
    name: &str,
    value: &str,
    kind: &str,
    global_tags: &[(String, String)],
    tags: &TagSet,
) -> String {
    let mut datagram = format!("{name}:{value}|{kind}");

    let mut separator = "|#";
    for (key, tag_value) in global_tags
        .iter()
        .map(|(key, tag_value)| (key.as_str(), tag_value.as_str()))
        .chain(tags.iter())
    {
        let _ = write!(datagram, "{separator}{key}:{tag_value}");
        separator = ",";
    }

    datagram
}
