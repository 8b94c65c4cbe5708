//! Reference resolution per RFC 3986 section 5.
//!
//! The resolver transforms a (possibly relative) reference into a target
//! record against an absolute base. Components are carried over as whole
//! substrings; the only rewriting is the merge of relative paths and the
//! removal of dot segments.

use crate::error::UriError;
use crate::parser::parse_uri_reference;
use crate::uri::{format_uri, BaseUri, Uri, UriOrStr, UriParts};

/// Removes `.` and `..` segments from a path.
///
/// This is the stack algorithm of [RFC 3986 section 5.2.4]; it is
/// idempotent.
///
/// [RFC 3986 section 5.2.4]: https://tools.ietf.org/html/rfc3986#section-5.2.4
///
/// # Examples
///
/// ```
/// use uri_kit::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
/// assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
/// assert_eq!(remove_dot_segments("../../g"), "g");
/// ```
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            // `/./rest` becomes `/rest`.
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            // `/../rest` becomes `/rest`, dropping the last output segment.
            input = &input[3..];
            pop_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            // Move the first segment, including its leading `/` but not the
            // next one, from the input to the output.
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |i| start + i);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    output
}

/// Drops the output buffer's last segment along with its leading `/`.
fn pop_segment(output: &mut String) {
    match output.rfind('/') {
        Some(pos) => output.truncate(pos),
        None => output.clear(),
    }
}

/// Merges a reference path with the base path, per RFC 3986 section 5.2.3.
fn merge(base_has_authority: bool, base_path: &str, ref_path: &str) -> String {
    if base_has_authority && base_path.is_empty() {
        return format!("/{ref_path}");
    }
    match base_path.rfind('/') {
        Some(pos) => format!("{}{}", &base_path[..=pos], ref_path),
        None => ref_path.to_owned(),
    }
}

/// Builds the target record.
///
/// The authority bundle (authority, userinfo, host and its classification,
/// port) is carried wholesale from `authority_from`, which may also carry no
/// authority at all.
fn build_target(
    scheme: Option<&str>,
    authority_from: &Uri,
    path: String,
    query: Option<&str>,
    fragment: Option<&str>,
) -> Uri {
    let authority = authority_from.authority.clone();
    let relative = match authority.as_deref() {
        Some(authority) => format!("//{authority}{path}"),
        None => path.clone(),
    };
    let href = format_uri(&UriParts {
        scheme,
        authority: authority.as_deref(),
        path: &path,
        query,
        fragment,
    });
    Uri {
        href,
        scheme: scheme.map(Into::into),
        relative,
        authority,
        userinfo: authority_from.userinfo.clone(),
        host: authority_from.host.clone(),
        hostname: authority_from.hostname.clone(),
        ipv4: authority_from.ipv4.clone(),
        ipv6: authority_from.ipv6.clone(),
        ipv_future: authority_from.ipv_future.clone(),
        port: authority_from.port.clone(),
        path,
        query: query.map(Into::into),
        fragment: fragment.map(Into::into),
    }
}

/// The transform-references procedure of RFC 3986 section 5.2.2.
fn resolve(base: Option<&Uri>, reference: &Uri) -> Uri {
    let base = match base {
        Some(base) => base,
        None => {
            return build_target(
                reference.scheme(),
                reference,
                remove_dot_segments(reference.path()),
                reference.query(),
                reference.fragment(),
            )
        }
    };
    if reference.scheme.is_some() {
        build_target(
            reference.scheme(),
            reference,
            remove_dot_segments(reference.path()),
            reference.query(),
            reference.fragment(),
        )
    } else if reference.authority.is_some() {
        build_target(
            base.scheme(),
            reference,
            remove_dot_segments(reference.path()),
            reference.query(),
            reference.fragment(),
        )
    } else if reference.path.is_empty() {
        build_target(
            base.scheme(),
            base,
            base.path.clone(),
            reference.query().or(base.query()),
            reference.fragment(),
        )
    } else {
        let path = if reference.path.starts_with('/') {
            remove_dot_segments(reference.path())
        } else {
            let merged = merge(base.authority.is_some(), &base.path, &reference.path);
            remove_dot_segments(&merged)
        };
        build_target(
            base.scheme(),
            base,
            path,
            reference.query(),
            reference.fragment(),
        )
    }
}

/// Resolves a reference against a base URI.
///
/// Both arguments accept an already-parsed [`Uri`] or a string (parsed as a
/// URI reference first); the base may also be absent, in which case the
/// reference is returned with dot segments removed from its path.
///
/// Resolution itself is total: the only possible error is a parse failure
/// of a string argument.
///
/// # Examples
///
/// ```
/// use uri_kit::{parse_uri, resolve_uri, BaseUri};
///
/// let base = parse_uri("http://a/b/c/d;p?q")?;
/// assert_eq!(resolve_uri(&base, "../g")?.href(), "http://a/b/g");
/// assert_eq!(resolve_uri(&base, "g:h")?.href(), "g:h");
/// assert_eq!(resolve_uri(&base, "?y")?.href(), "http://a/b/c/d;p?y");
/// assert_eq!(resolve_uri(BaseUri::None, "a/./b")?.href(), "a/b");
/// # Ok::<_, uri_kit::UriError>(())
/// ```
pub fn resolve_uri<'a, B, R>(base: B, reference: R) -> Result<Uri, UriError>
where
    B: Into<BaseUri<'a>>,
    R: Into<UriOrStr<'a>>,
{
    let parsed_base;
    let base = match base.into() {
        BaseUri::None => None,
        BaseUri::Parsed(uri) => Some(uri),
        BaseUri::Raw(s) => {
            parsed_base = parse_uri_reference(s)?;
            Some(&parsed_base)
        }
    };
    let parsed_reference;
    let reference = match reference.into() {
        UriOrStr::Parsed(uri) => uri,
        UriOrStr::Raw(s) => {
            parsed_reference = parse_uri_reference(s)?;
            &parsed_reference
        }
    };
    Ok(resolve(base, reference))
}

impl Uri {
    /// Resolves this reference against the given base.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{parse_uri, parse_uri_reference};
    ///
    /// let base = parse_uri("http://example.com/base/")?;
    /// let reference = parse_uri_reference("../there")?;
    /// assert_eq!(reference.resolve_against(&base).href(), "http://example.com/there");
    /// # Ok::<_, uri_kit::UriError>(())
    /// ```
    #[must_use]
    pub fn resolve_against(&self, base: &Uri) -> Uri {
        resolve(Some(base), self)
    }
}
