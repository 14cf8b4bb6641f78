use std::fmt;

use super::Transport;

/// The `sip:` prefix.
pub const SIP_PREFIX: &str = "sip:";
/// The `sips:` prefix.
pub const SIPS_PREFIX: &str = "sips:";

#[derive(Debug, PartialEq, Eq, Clone, Default, Copy, Hash)]
/// A SIP URI scheme, either `sip` or `sips`.
pub enum Scheme {
    #[default]
    /// An Sip uri scheme.
    Sip,
    /// An Sips uri scheme.
    Sips,
}

impl Scheme {
    /// Returns the prefix, including the colon, that starts a URI of this scheme.
    pub const fn prefix(&self) -> &'static str {
        match self {
            Scheme::Sip => SIP_PREFIX,
            Scheme::Sips => SIPS_PREFIX,
        }
    }

    /// Returns `true` for `sips`.
    pub const fn is_secure(&self) -> bool {
        matches!(self, Scheme::Sips)
    }

    /// The transport used when the URI has no `transport` parameter.
    ///
    /// `UDP` for `sip` and `TCP` for `sips` (RFC 3261 §19.1.2).
    pub fn default_transport(&self) -> Transport {
        match self {
            Scheme::Sip => Transport::Udp,
            Scheme::Sips => Transport::Tcp,
        }
    }

    /// Strips a scheme prefix from `s`, returning the scheme and the remainder.
    pub fn strip(s: &str) -> Option<(Self, &str)> {
        if let Some(rest) = s.strip_prefix(SIP_PREFIX) {
            Some((Scheme::Sip, rest))
        } else {
            s.strip_prefix(SIPS_PREFIX).map(|rest| (Scheme::Sips, rest))
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Sip => f.write_str("sip"),
            Scheme::Sips => f.write_str("sips"),
        }
    }
}
