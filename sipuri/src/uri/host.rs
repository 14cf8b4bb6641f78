use crate::error::HostPortError;

/// Splits a `host[:port]` string into the hostname and the optional port.
///
/// A host starting with `[` is a bracketed IPv6 literal. An IPv6 literal
/// holds an even number of colons, so a bracketed host with an even colon
/// count that ends in `]` has no port. Any other host with a colon is split
/// as `host:port`, where a bracketed host must be `[literal]:port`. The
/// brackets are not part of the returned hostname. An empty port is treated
/// as absent. The port itself is not validated.
///
/// # Examples
///
/// ```
/// use sipuri::split_host_port;
///
/// assert_eq!(split_host_port("atlanta.com"), Ok(("atlanta.com", None)));
/// assert_eq!(split_host_port("136.16.20.100:8001"), Ok(("136.16.20.100", Some("8001"))));
/// assert_eq!(split_host_port("[::1]:5060"), Ok(("::1", Some("5060"))));
/// assert!(split_host_port("[::1").is_err());
/// ```
pub fn split_host_port(host: &str) -> Result<(&str, Option<&str>), HostPortError> {
    let bracketed = host.starts_with('[');
    let colons = host.bytes().filter(|&c| c == b':').count();

    let has_port = if bracketed {
        colons % 2 == 1 || !host.ends_with(']')
    } else {
        colons > 0
    };

    if !has_port {
        let hostname = host
            .strip_prefix('[')
            .and_then(|literal| literal.strip_suffix(']'))
            .unwrap_or(host);
        return Ok((hostname, None));
    }

    let (hostname, port) = split_port(host)?;

    Ok((hostname, Some(port).filter(|port| !port.is_empty())))
}

/// Splits `hostport` on its last colon.
///
/// A bracketed host must close its bracket right before that colon.
fn split_port(hostport: &str) -> Result<(&str, &str), HostPortError> {
    let colon = hostport.rfind(':').ok_or(HostPortError::MissingPort)?;

    let (hostname, open, close) = if hostport.starts_with('[') {
        let end = hostport.find(']').ok_or(HostPortError::MissingBracket)?;
        match hostport.as_bytes().get(end + 1) {
            Some(_) if end + 1 == colon => {}
            Some(b':') => return Err(HostPortError::TooManyColons),
            _ => return Err(HostPortError::MissingPort),
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let hostname = &hostport[..colon];
        if hostname.contains(':') {
            return Err(HostPortError::TooManyColons);
        }
        (hostname, 0, 0)
    };

    if hostport[open..].contains('[') {
        return Err(HostPortError::UnexpectedOpenBracket);
    }
    if hostport[close..].contains(']') {
        return Err(HostPortError::UnexpectedCloseBracket);
    }

    Ok((hostname, &hostport[colon + 1..]))
}
