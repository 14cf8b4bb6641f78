//! SIP URI Parser
//!
//! The module provides the [`Parser`] struct that splits a `sip:` or `sips:`
//! URI into its components. Splitting is a single left to right pass on
//! fixed delimiters:
//!
//! ```text
//! sip:user:password@host:port;uri-parameters?headers
//!                  ^         ^              ^
//!          first '@'   first ';'     first '?'
//! ```
//!
//! The first structural violation found fails the parse, and no partially
//! populated [`Uri`] is ever returned.

use crate::error::{ComponentError, Error, EscapeError, MalformCause, MalformedUriError, Result};
use crate::escape::unescape;
use crate::store::KeyValueStore;
use crate::uri::{Scheme, Uri, split_host_port};

// ---------------------------------------------------------------------
// Parser constants
// ---------------------------------------------------------------------
/// Separates the user-info from the host.
const AT: char = '@';
/// Separates the user from the password.
const COLON: char = ':';
/// Starts the parameters and separates them.
const SEMI: char = ';';
/// Starts the headers.
const QUESTION: char = '?';
/// Separates the headers.
const AMPERSAND: char = '&';

/// A SIP URI parser.
///
/// # Examples
///
/// ```
/// use sipuri::Parser;
///
/// let uri = Parser::new("sip:+1-212-555-1212:1234@gateway.com;user=phone")
///     .lazy(true)
///     .parse()
///     .unwrap();
///
/// assert_eq!(uri.user(), "+1-212-555-1212");
/// assert_eq!(uri.password(), "1234");
/// assert_eq!(uri.params().get("user"), "phone");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    input: &'a str,
    lazy: bool,
}

impl<'a> Parser<'a> {
    /// Creates a new `Parser` for `input`, decoding parameters and headers
    /// eagerly.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, lazy: false }
    }

    /// Defers decoding of parameters and headers until first access.
    ///
    /// Malformed escapes are still reported by [`parse`](Self::parse).
    #[inline]
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Parses the input into a [`Uri`].
    pub fn parse(&self) -> Result<Uri> {
        match self.parse_uri() {
            Ok(uri) => {
                log::trace!("Parsed uri {:?} (lazy: {})", self.input, self.lazy);
                Ok(uri)
            }
            Err(err) => {
                log::debug!("Failed to parse uri {:?}: {}", self.input, err);
                Err(err)
            }
        }
    }

    fn parse_uri(&self) -> Result<Uri> {
        // "sip:" [ userinfo "@" ] hostport [ ";" uri-parameters ] [ "?" headers ]
        let (scheme, rest) = Scheme::strip(self.input).ok_or(Error::InvalidScheme)?;

        // '@' must be escaped in the rest of the uri, so the first one ends the
        // user-info.
        let (user_info, postfix) = match rest.split_once(AT) {
            // §19.1.1 "If the @ sign is present in a SIP or SIPS URI, the user
            // field MUST NOT be empty."
            Some(("", _)) => return Err(malformed(MalformCause::MissingUser)),
            Some((user_info, postfix)) => (user_info, postfix),
            None => ("", rest),
        };

        if postfix.is_empty() {
            return Err(malformed(MalformCause::MissingHost));
        }

        let (prefix, headers) = split_delimited(postfix, QUESTION);
        let (host, params) = split_delimited(prefix, SEMI);

        // §19.1.2 host mandatory in all contexts.
        if host.is_empty() {
            return Err(malformed(MalformCause::MissingHost));
        }

        // ':' must be escaped in the user and password, split on the first.
        let (user, password) = split_delimited(user_info, COLON);
        let had_password = password.is_some();
        // §19.1.1 the '@' is present here, so the user field must not be
        // empty even when a password follows.
        if user.is_empty() && had_password {
            return Err(malformed(MalformCause::MissingUser));
        }

        let user = unescape(user).map_err(|err| malformed_by(MalformCause::MalformedUser, err))?;
        let password = unescape(password.unwrap_or_default())
            .map_err(|err| malformed_by(MalformCause::MalformedUser, err))?;

        // The host rarely holds escaped characters but the grammar allows it.
        let host = unescape(host).map_err(|err| malformed_by(MalformCause::MalformedHost, err))?;
        split_host_port(&host).map_err(|err| malformed_by(MalformCause::MalformedHost, err))?;

        let decoded_params = self
            .decode_store(params, SEMI)
            .map_err(|err| malformed_by(MalformCause::MalformedParams, err))?;
        let decoded_headers = self
            .decode_store(headers, AMPERSAND)
            .map_err(|err| malformed_by(MalformCause::MalformedHeaders, err))?;

        Ok(Uri {
            scheme,
            user: user.into_owned(),
            password: password.into_owned(),
            host: host.into_owned(),
            params: decoded_params,
            headers: decoded_headers,
            had_password,
            had_params: params.is_some(),
            had_headers: headers.is_some(),
        })
    }

    fn decode_store(
        &self,
        raw: Option<&str>,
        separator: char,
    ) -> std::result::Result<KeyValueStore, EscapeError> {
        match raw {
            None | Some("") => Ok(KeyValueStore::Empty),
            Some(raw) if self.lazy => KeyValueStore::lazy(raw, separator),
            Some(raw) => KeyValueStore::eager(raw, separator),
        }
    }
}

/// Splits `s` on the first `delimiter`, keeping whether it was present.
#[inline]
fn split_delimited(s: &str, delimiter: char) -> (&str, Option<&str>) {
    match s.split_once(delimiter) {
        Some((before, after)) => (before, Some(after)),
        None => (s, None),
    }
}

#[inline]
fn malformed(cause: MalformCause) -> Error {
    Error::MalformedUri(MalformedUriError::new(cause))
}

#[inline]
fn malformed_by<E>(cause: MalformCause, err: E) -> Error
where
    E: Into<ComponentError>,
{
    Error::MalformedUri(MalformedUriError::with_source(cause, err))
}

/// Parses `uri`, decoding parameters and headers eagerly.
///
/// # Examples
///
/// ```
/// let uri = sipuri::parse("sip:alice@atlanta.com").unwrap();
///
/// assert_eq!(uri.user(), "alice");
/// assert_eq!(uri.host(), "atlanta.com");
/// assert_eq!(uri.transport().as_str(), "UDP");
/// assert_eq!(uri.port(), Some("5060"));
/// ```
pub fn parse(uri: &str) -> Result<Uri> {
    Parser::new(uri).parse()
}

/// Parses `uri`, deferring the decoding of parameters and headers until they
/// are first read. Fails exactly when [`parse`] fails.
pub fn parse_lazy(uri: &str) -> Result<Uri> {
    Parser::new(uri).lazy(true).parse()
}
