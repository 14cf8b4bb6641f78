use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while parsing a SIP or SIPS URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input does not start with `sip:` or `sips:`.
    #[error("sip: scheme invalid")]
    InvalidScheme,

    #[error(transparent)]
    MalformedUri(#[from] MalformedUriError),
}

impl Error {
    /// Returns the malform cause, if this is a [`Error::MalformedUri`].
    pub fn malform_cause(&self) -> Option<MalformCause> {
        match self {
            Error::InvalidScheme => None,
            Error::MalformedUri(err) => Some(err.cause),
        }
    }

    /// Returns `true` if this is a malformed URI error matching `cause`.
    ///
    /// [`MalformCause::Unspecified`] matches any malformed URI error.
    pub fn is_malformed(&self, cause: MalformCause) -> bool {
        match self {
            Error::InvalidScheme => false,
            Error::MalformedUri(err) => err.is(cause),
        }
    }
}

/// Indicates what part of the URI failed to be parsed.
///
/// When several parts are broken, the cause relating to the earliest part of
/// the URI is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MalformCause {
    #[default]
    Unspecified,
    MissingUser,
    MissingHost,
    MalformedUser,
    MalformedHost,
    MalformedParams,
    MalformedHeaders,
}

impl MalformCause {
    /// Returns a short description of the cause.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MalformCause::Unspecified => "unspecified",
            MalformCause::MissingUser => "missing user",
            MalformCause::MissingHost => "missing host",
            MalformCause::MalformedUser => "malformed user",
            MalformCause::MalformedHost => "malformed host",
            MalformCause::MalformedParams => "malformed params",
            MalformCause::MalformedHeaders => "malformed headers",
        }
    }
}

impl fmt::Display for MalformCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A SIP URI that could not be split into its components.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub struct MalformedUriError {
    /// The part of the URI that failed.
    pub cause: MalformCause,
    /// The underlying failure, if any.
    #[source]
    pub source: Option<ComponentError>,
}

impl MalformedUriError {
    /// Creates an error without an underlying cause.
    pub fn new(cause: MalformCause) -> Self {
        Self { cause, source: None }
    }

    /// Creates an error wrapping the failure of a single component.
    pub fn with_source<E>(cause: MalformCause, source: E) -> Self
    where
        E: Into<ComponentError>,
    {
        Self {
            cause,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if `cause` is unspecified or equal to this error's cause.
    pub fn is(&self, cause: MalformCause) -> bool {
        cause == MalformCause::Unspecified || cause == self.cause
    }
}

impl fmt::Display for MalformedUriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sip: malformed uri")?;
        if self.cause != MalformCause::Unspecified {
            write!(f, ": {}", self.cause)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

/// Failure of an individual URI component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error(transparent)]
    Escape(#[from] EscapeError),

    #[error(transparent)]
    HostPort(#[from] HostPortError),
}

/// A byte triplet that has been incorrectly percent encoded.
///
/// The fragment is the offending `%`, `%X` or `%XY` text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("sip: invalid URL escape {fragment:?}")]
pub struct EscapeError {
    fragment: String,
}

impl EscapeError {
    /// Builds the error from the escape starting at byte `at` of `src`.
    ///
    /// The fragment keeps up to three characters as written in `src`.
    pub(crate) fn at(src: &str, at: usize) -> Self {
        let rest = src.get(at..).unwrap_or_default();
        let end = rest.char_indices().nth(3).map_or(rest.len(), |(end, _)| end);

        Self {
            fragment: rest[..end].to_owned(),
        }
    }

    /// Returns the offending fragment.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// Structural failure when splitting a `host[:port]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum HostPortError {
    #[error("missing port in address")]
    MissingPort,

    #[error("missing ']' in address")]
    MissingBracket,

    #[error("too many colons in address")]
    TooManyColons,

    #[error("unexpected '[' in address")]
    UnexpectedOpenBracket,

    #[error("unexpected ']' in address")]
    UnexpectedCloseBracket,
}
