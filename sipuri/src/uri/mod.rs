//! The SIP URI record and its string representation.

use std::fmt;
use std::str::FromStr;

mod host;
mod scheme;
mod transport;

pub use host::*;
pub use scheme::*;
pub use transport::*;

use crate::error::{Error, HostPortError};
use crate::escape::{Encoding, escape};
use crate::parser::Parser;
use crate::store::KeyValueStore;

/// The URI parameter that selects the transport.
pub const TRANSPORT_PARAM: &str = "transport";

/// A SIP or SIPS URI split into its components.
///
/// A general SIP URI looks like:
///
/// ```text
/// sip:user:password@host:port;uri-parameters?headers
/// ```
///
/// User, password and host are kept decoded. Besides the components, the
/// URI remembers whether the `:`, `;` and `?` delimiters were present so
/// that [`Display`](fmt::Display) reproduces the original text even when the
/// password, parameters or headers were empty.
///
/// # Examples
///
/// ```
/// use sipuri::{Scheme, Uri};
///
/// let uri: Uri = "sips:alice@atlanta.com?subject=project%20x".parse().unwrap();
///
/// assert_eq!(uri.scheme(), Scheme::Sips);
/// assert_eq!(uri.headers().get("subject"), "project x");
/// assert_eq!(uri.transport().as_str(), "TCP");
/// assert_eq!(uri.to_string(), "sips:alice@atlanta.com?subject=project%20x");
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Uri {
    pub(crate) scheme: Scheme,
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) host: String,
    pub(crate) params: KeyValueStore,
    pub(crate) headers: KeyValueStore,
    pub(crate) had_password: bool,
    pub(crate) had_params: bool,
    pub(crate) had_headers: bool,
}

impl Uri {
    /// Creates a `sip` URI with the given user and host.
    ///
    /// An empty user yields a URI without user-info.
    pub fn new<U, H>(user: U, host: H) -> Self
    where
        U: Into<String>,
        H: Into<String>,
    {
        Uri {
            user: user.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Returns a builder for a URI with the given user and host.
    pub fn builder<U, H>(user: U, host: H) -> UriBuilder
    where
        U: Into<String>,
        H: Into<String>,
    {
        UriBuilder {
            uri: Uri::new(user, host),
        }
    }

    /// Returns the scheme of the uri.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns `true` if the URI uses the `sips` scheme.
    pub fn is_secure(&self) -> bool {
        self.scheme.is_secure()
    }

    /// Returns the decoded user.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the decoded password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the decoded host, including any port.
    ///
    /// See [`split_host_port`](Self::split_host_port) to separate them.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the uri parameters.
    pub fn params(&self) -> &KeyValueStore {
        &self.params
    }

    /// Returns the uri headers.
    pub fn headers(&self) -> &KeyValueStore {
        &self.headers
    }

    /// Returns `true` if a `:` followed the user, even with an empty password.
    pub fn had_password(&self) -> bool {
        self.had_password
    }

    /// Returns `true` if a `;` followed the host, even without parameters.
    pub fn had_params(&self) -> bool {
        self.had_params
    }

    /// Returns `true` if a `?` was present, even without headers.
    pub fn had_headers(&self) -> bool {
        self.had_headers
    }

    /// Splits the port from the host.
    pub fn split_host_port(&self) -> Result<(&str, Option<&str>), HostPortError> {
        split_host_port(&self.host)
    }

    /// Returns the transport that would be used to reach the host.
    ///
    /// The `transport` parameter when present, otherwise the scheme default.
    pub fn transport(&self) -> Transport {
        match self.params.get(TRANSPORT_PARAM) {
            "" => self.scheme.default_transport(),
            transport => Transport::from(transport),
        }
    }

    /// Returns the port of the host, or the default for the scheme and
    /// transport.
    ///
    /// `sips` defaults to `5061`. `sip` defaults to `5060` for `UDP`, `TCP`
    /// and `SCTP`, to `5061` for `TLS`, and has no default otherwise.
    pub fn port(&self) -> Option<&str> {
        if let Ok((_, Some(port))) = self.split_host_port() {
            return Some(port);
        }

        if self.scheme.is_secure() {
            return Some(DEFAULT_TLS_PORT);
        }

        self.transport().default_port()
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).parse()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme.prefix())?;

        if !self.user.is_empty() {
            f.write_str(&escape(&self.user, Encoding::UserInfo))?;
            if self.had_password || !self.password.is_empty() {
                f.write_str(":")?;
                f.write_str(&escape(&self.password, Encoding::UserInfo))?;
            }
            // Only present when the user is non-empty.
            f.write_str("@")?;
        }

        f.write_str(&escape(&self.host, Encoding::Host))?;

        if self.had_params || !self.params.is_empty() {
            write!(f, ";{}", self.params.encode_with(';'))?;
        }
        if self.had_headers || !self.headers.is_empty() {
            write!(f, "?{}", self.headers.encode_with('&'))?;
        }

        Ok(())
    }
}

/// Builder for creating a new SIP URI.
///
/// # Examples
///
/// ```
/// use sipuri::Uri;
///
/// let uri = Uri::builder("alice", "atlanta.com")
///     .password("secretword")
///     .params([("transport", "tcp")])
///     .build();
///
/// assert_eq!(uri.to_string(), "sip:alice:secretword@atlanta.com;transport=tcp");
/// ```
#[derive(Debug, Clone)]
pub struct UriBuilder {
    uri: Uri,
}

impl UriBuilder {
    /// Sets the password.
    ///
    /// Passwords in URIs are not advised and are inherently insecure.
    pub fn password<P>(mut self, password: P) -> Self
    where
        P: Into<String>,
    {
        self.uri.password = password.into();
        self.uri.had_password = true;
        self
    }

    /// Sets the uri parameters.
    pub fn params<S>(mut self, params: S) -> Self
    where
        S: Into<KeyValueStore>,
    {
        self.uri.params = params.into();
        self.uri.had_params = true;
        self
    }

    /// Sets the uri headers.
    pub fn headers<S>(mut self, headers: S) -> Self
    where
        S: Into<KeyValueStore>,
    {
        self.uri.headers = headers.into();
        self.uri.had_headers = true;
        self
    }

    /// Upgrades the uri to the `sips` scheme.
    pub fn secure(mut self) -> Self {
        self.uri.scheme = Scheme::Sips;
        self
    }

    /// Finalize the builder into a `Uri`.
    pub fn build(self) -> Uri {
        self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValuePairs;

    #[test]
    fn test_new() {
        let uri = Uri::builder("user", "host:port")
            .password("password")
            .params([("uri-parameters", "")])
            .headers([("headers", "")])
            .build();

        assert_eq!(uri.scheme(), Scheme::Sip);
        assert_eq!(uri.user(), "user");
        assert_eq!(uri.password(), "password");
        assert_eq!(uri.host(), "host:port");
        assert_eq!(uri.to_string(), "sip:user:password@host:port;uri-parameters=?headers=");
    }

    #[test]
    fn test_new_without_options_has_no_delimiters() {
        let uri = Uri::new("alice", "atlanta.com");

        assert!(!uri.had_password());
        assert!(!uri.had_params());
        assert!(!uri.had_headers());
        assert_eq!(uri.to_string(), "sip:alice@atlanta.com");
    }

    #[test]
    fn test_supplied_empty_values_keep_delimiters() {
        let uri = Uri::builder("alice", "atlanta.com")
            .password("")
            .params(KeyValuePairs::new())
            .headers(KeyValueStore::Empty)
            .secure()
            .build();

        assert_eq!(uri.to_string(), "sips:alice:@atlanta.com;?");
    }

    #[test]
    fn test_user_info_is_escaped() {
        let uri = Uri::builder("j@s0n", "example.com").password("a:b").build();

        assert_eq!(uri.to_string(), "sip:j%40s0n:a%3Ab@example.com");
    }

    #[test]
    fn test_missing_user_drops_user_info() {
        let uri = Uri::builder("", "atlanta.com").password("secret").build();

        assert_eq!(uri.to_string(), "sip:atlanta.com");
    }

    #[test]
    fn test_transport() {
        assert_eq!(Uri::new("a", "b").transport(), Transport::Udp);
        assert_eq!(Uri::builder("a", "b").secure().build().transport(), Transport::Tcp);

        let uri = Uri::builder("a", "b").params([("transport", "tls")]).build();
        assert_eq!(uri.transport().to_string(), "TLS");
    }

    #[test]
    fn test_port_defaults() {
        let port = |uri: Uri| uri.port().map(str::to_owned);

        assert_eq!(port(Uri::new("a", "b")), Some("5060".into()));
        assert_eq!(port(Uri::new("a", "b:8001")), Some("8001".into()));
        assert_eq!(port(Uri::new("a", "[::1]:5070")), Some("5070".into()));
        assert_eq!(port(Uri::builder("a", "b").secure().build()), Some("5061".into()));
        assert_eq!(
            port(Uri::builder("a", "b").params([("transport", "sctp")]).build()),
            Some("5060".into())
        );
        assert_eq!(
            port(Uri::builder("a", "b").params([("transport", "tls")]).build()),
            Some("5061".into())
        );
        assert_eq!(port(Uri::builder("a", "b").params([("transport", "ws")]).build()), None);
        assert_eq!(
            port(Uri::builder("a", "b").secure().params([("transport", "ws")]).build()),
            Some("5061".into())
        );
    }
}
