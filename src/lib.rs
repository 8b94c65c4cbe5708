//! Parsers and processors for [RFC 3986 Uniform Resource Identifiers
//! (URIs)][RFC 3986], [RFC 3987 Internationalized Resource Identifiers
//! (IRIs)][RFC 3987], and [RFC 6570 URI Templates][RFC 6570] (Level 4,
//! plus a deep-object extension).
//!
//! # Capability
//!
//! This crate provides three features: parsing, reference resolution, and
//! template expansion.
//!
//! ## Parsing
//!
//! [`parse_uri`] and friends parse a string strictly against the RFC
//! grammar into a [`Uri`] record of owned component substrings. Nothing is
//! normalised: the parsed components are verbatim slices of the input, so
//! [`format_uri`] on a parsed record reproduces the input exactly. The
//! `*_iri` entry points accept the extra `ucschar` / `iprivate` code
//! points of RFC 3987; everything else is identical.
//!
//! ## Resolution
//!
//! [`resolve_uri`] implements the reference-resolution algorithm of RFC
//! 3986 section 5, including [`remove_dot_segments`]. No further
//! normalisation is performed (no case folding, no percent-encoding
//! canonicalisation, no IDN processing).
//!
//! ## Templates
//!
//! [`parse_uri_template`] parses an RFC 6570 template;
//! [`UriTemplate::expand`] expands it against [`Bindings`] holding
//! scalar, list, or associative [`Value`]s. All four specification levels
//! are supported, plus an opt-in deep-object form that flattens nested
//! associative values to `name[k1][k2]=v`.
//!
//! # Examples
//!
//! ```
//! use uri_kit::{parse_uri, resolve_uri, expand_uri_template, Context};
//!
//! let base = parse_uri("http://example.com/api/v1/")?;
//! let endpoint = resolve_uri(&base, "users/search")?;
//! assert_eq!(endpoint.href(), "http://example.com/api/v1/users/search");
//!
//! let mut context = Context::new();
//! context.insert("q", "kittens");
//! let url = expand_uri_template("http://example.com/search{?q}", &context)?;
//! assert_eq!(url, "http://example.com/search?q=kittens");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! [RFC 3986]: https://tools.ietf.org/html/rfc3986
//! [RFC 3987]: https://tools.ietf.org/html/rfc3987
//! [RFC 6570]: https://www.rfc-editor.org/rfc/rfc6570.html
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod chars;
pub mod error;
pub mod parser;
pub mod percent;
pub mod resolve;
pub mod template;
pub mod uri;

pub use self::chars::{
    is_alpha, is_digit, is_form_char, is_fragment_char, is_gen_delim, is_hex_char, is_host_char,
    is_iprivate_char, is_path_char, is_query_char, is_reserved_char, is_scheme_char, is_sub_delim,
    is_ucs_char, is_unreserved_char, is_uri_char, is_userinfo_char, CharSet,
};
pub use self::error::{UriError, UriErrorKind};
pub use self::parser::{
    is_valid_iri, is_valid_iri_reference, is_valid_uri, is_valid_uri_reference, parse_ipv4,
    parse_ipv6, parse_iri, parse_iri_reference, parse_uri, parse_uri_reference, try_parse_iri,
    try_parse_iri_reference, try_parse_uri, try_parse_uri_reference,
};
pub use self::percent::{
    hex_decode, hex_encode, is_pct_encoded, pct_encode, pct_encode_utf8, PctEncoded,
};
pub use self::resolve::{remove_dot_segments, resolve_uri};
pub use self::template::{
    expand_uri_expression, expand_uri_template, expand_uri_variable, format_uri_expression,
    format_uri_template, format_uri_variable, get_uri_template_variables, parse_uri_expression,
    parse_uri_template, parse_uri_variable, try_parse_uri_expression, try_parse_uri_template,
    try_parse_uri_variable, Bindings, CoerceFn, Context, Expression, FnBindings, Operator,
    TemplateOrStr, TemplatePart, UriTemplate, UriTemplateError, UriTemplateErrorKind, Value,
    Variable,
};
pub use self::uri::{
    format_uri, is_absolute_uri, is_relative_uri, BaseUri, Uri, UriOrStr, UriParts,
};
