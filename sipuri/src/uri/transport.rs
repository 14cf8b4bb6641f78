use std::fmt;

const TP_UDP: &str = "UDP";
const TP_TCP: &str = "TCP";
const TP_TLS: &str = "TLS";
const TP_SCTP: &str = "SCTP";
const TP_WS: &str = "WS";

/// Default port for `UDP`, `TCP` and `SCTP`.
pub const DEFAULT_PORT: &str = "5060";
/// Default port for `TLS` and for `sips` URIs.
pub const DEFAULT_TLS_PORT: &str = "5061";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
/// The transport selected by a SIP URI.
pub enum Transport {
    #[default]
    /// `UDP` transport.
    Udp,
    /// `TCP` transport.
    Tcp,
    /// `WebSocket` transport.
    Ws,
    /// `TLS` transport.
    Tls,
    /// `SCTP` transport.
    Sctp,
    /// Any other transport, upper-cased.
    Other(String),
}

impl Transport {
    /// Returns the default port for the transport on a `sip` URI.
    ///
    /// - `UDP`, `TCP`, and `SCTP` use port `5060`.
    /// - `TLS` uses port `5061`.
    /// - Any other transport has no default.
    #[inline]
    pub fn default_port(&self) -> Option<&'static str> {
        match self {
            Transport::Udp | Transport::Tcp | Transport::Sctp => Some(DEFAULT_PORT),
            Transport::Tls => Some(DEFAULT_TLS_PORT),
            Transport::Ws | Transport::Other(_) => None,
        }
    }

    /// Returns the upper-cased transport name.
    pub fn as_str(&self) -> &str {
        match self {
            Transport::Udp => TP_UDP,
            Transport::Tcp => TP_TCP,
            Transport::Ws => TP_WS,
            Transport::Tls => TP_TLS,
            Transport::Sctp => TP_SCTP,
            Transport::Other(other) => other.as_str(),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Transport {
    fn from(s: &str) -> Self {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            TP_UDP => Transport::Udp,
            TP_TCP => Transport::Tcp,
            TP_WS => Transport::Ws,
            TP_TLS => Transport::Tls,
            TP_SCTP => Transport::Sctp,
            _ => Transport::Other(upper),
        }
    }
}
