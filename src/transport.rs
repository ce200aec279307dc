// HTTP transport
//
// Opens the long-lived stream request and exposes the two header values the
// extractors need: Content-Type and icy-metaint.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::Result;

/// One open stream
pub struct Connection {
    pub content_type: Option<String>,
    pub metaint: Option<String>,
    pub body: Box<dyn Read>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("content_type", &self.content_type)
            .field("metaint", &self.metaint)
            .finish_non_exhaustive()
    }
}

/// Opens connections to one stream URL
pub struct Transport {
    agent: Agent,
    url: String,
}

impl Transport {
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .build();
        Transport {
            agent: config.into(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and return the open body
    pub fn connect(&self) -> Result<Connection> {
        let response = self
            .agent
            .get(&self.url)
            .header("Icy-MetaData", "1")
            .call()?;

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header("content-type");
        let metaint = header("icy-metaint");
        debug!(?content_type, ?metaint, "connected");

        Ok(Connection {
            content_type,
            metaint,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}
