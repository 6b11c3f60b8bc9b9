// Page the selection was made on, exposed as template variables

use serde::Serialize;
use url::Url;

/// Location-style parts of the page URL, usable as `{href}`, `{hostname}`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub href: String,
    pub origin: String,
    pub protocol: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub hash: String,
}

impl PageContext {
    /// Variable names this context can fill in.
    ///
    /// Tokens are matched by prefix, so `{host` also finds `{hostname}`; the splice pass
    /// resolves that by preferring the well-formed occurrence.
    pub const VARIABLES: [&'static str; 8] = [
        "href", "origin", "protocol", "hostname", "host", "port", "pathname", "hash",
    ];

    pub fn from_url(page_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(page_url)?;

        let hostname = url.host_str().unwrap_or_default().to_string();
        let port = url.port().map(|p| p.to_string()).unwrap_or_default();
        let host = if port.is_empty() {
            hostname.clone()
        } else {
            format!("{}:{}", hostname, port)
        };

        Ok(Self {
            href: url.as_str().to_string(),
            origin: url.origin().ascii_serialization(),
            protocol: format!("{}:", url.scheme()),
            host,
            hostname,
            port,
            pathname: url.path().to_string(),
            hash: prefixed('#', url.fragment()),
        })
    }

    /// (name, value) pairs, in the same order as `VARIABLES`
    pub fn variables(&self) -> [(&'static str, &str); 8] {
        [
            ("href", &self.href),
            ("origin", &self.origin),
            ("protocol", &self.protocol),
            ("hostname", &self.hostname),
            ("host", &self.host),
            ("port", &self.port),
            ("pathname", &self.pathname),
            ("hash", &self.hash),
        ]
    }
}

// A bare "#" serializes to an empty string, as in the browser
fn prefixed(prefix: char, part: Option<&str>) -> String {
    match part {
        Some(value) if !value.is_empty() => format!("{}{}", prefix, value),
        _ => String::new(),
    }
}
