//! # sipuri
//!
//! Parses SIP and SIPS URIs into their components and rebuilds them.
//!
//! ```text
//! sip:user:password@host:port;uri-parameters?headers
//! ```
//!
//! From <https://www.rfc-editor.org/rfc/rfc3261#section-19>. A parsed
//! [`Uri`] prints back as the text it was parsed from: the presence of the
//! `:`, `;` and `?` delimiters is kept even when what follows them is empty.
//!
//! # Examples
//!
//! ```
//! let uri = sipuri::parse("sip:alice:secretword@atlanta.com;transport=tcp").unwrap();
//!
//! assert_eq!(uri.user(), "alice");
//! assert_eq!(uri.password(), "secretword");
//! assert_eq!(uri.transport().as_str(), "TCP");
//! assert_eq!(uri.to_string(), "sip:alice:secretword@atlanta.com;transport=tcp");
//! ```

pub mod error;
pub mod escape;
pub mod parser;
pub mod store;
pub mod uri;

pub(crate) mod macros;

pub use error::{Error, MalformCause, MalformedUriError, Result};
pub use parser::{Parser, parse, parse_lazy};
pub use store::{KeyValuePairs, KeyValueStore, LazyStore};
pub use uri::{Scheme, Transport, Uri, UriBuilder, split_host_port};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
