//! Character classes for the URI / IRI grammar.
//!
//! Every class is a predicate on a Unicode scalar value. The ASCII-only
//! classes (`ALPHA`, `DIGIT`, `reserved`, `scheme`) ignore the IRI mode;
//! the component classes additionally admit `ucschar` (and, for queries,
//! `iprivate`) when the IRI flag is set.
//!
//! See [RFC 3986 section 2] and [RFC 3987 section 2.2].
//!
//! [RFC 3986 section 2]: https://tools.ietf.org/html/rfc3986#section-2
//! [RFC 3987 section 2.2]: https://tools.ietf.org/html/rfc3987#section-2.2

/// Tag for a closed set of "allowed through as-is" character classes.
///
/// The template expansion engine selects the set per operator (`unreserved`
/// for simple expansion, `reserved` for `+` and `#`), and the remaining tags
/// name the per-component classes of the URI grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharSet {
    /// `unreserved` only.
    Unreserved,
    /// `unreserved` plus `reserved` (`gen-delims` / `sub-delims`).
    Reserved,
    /// Characters allowed in `userinfo`.
    Userinfo,
    /// Characters allowed in a registered name.
    Host,
    /// Characters allowed in a path segment (`pchar`).
    Path,
    /// Characters allowed in a query.
    Query,
    /// Characters allowed in a fragment.
    Fragment,
    /// Characters safe in `application/x-www-form-urlencoded` style data.
    Form,
}

/// Checks if the given character matches `ALPHA`.
#[inline]
#[must_use]
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Checks if the given character matches `DIGIT`.
#[inline]
#[must_use]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Checks if the given character matches `HEXDIG`.
#[inline]
#[must_use]
pub fn is_hex_char(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Checks if the given character matches `sub-delims`.
#[inline]
#[must_use]
pub fn is_sub_delim(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

/// Checks if the given character matches `gen-delims`.
#[inline]
#[must_use]
pub fn is_gen_delim(c: char) -> bool {
    matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

/// Checks if the given character matches `reserved`.
#[inline]
#[must_use]
pub fn is_reserved_char(c: char) -> bool {
    is_gen_delim(c) || is_sub_delim(c)
}

/// Checks if the given character matches `ucschar`.
#[must_use]
pub fn is_ucs_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0xA0..=0xD7FF |
        0xF900..=0xFDCF |
        0xFDF0..=0xFFEF |
        0x1_0000..=0x1_FFFD |
        0x2_0000..=0x2_FFFD |
        0x3_0000..=0x3_FFFD |
        0x4_0000..=0x4_FFFD |
        0x5_0000..=0x5_FFFD |
        0x6_0000..=0x6_FFFD |
        0x7_0000..=0x7_FFFD |
        0x8_0000..=0x8_FFFD |
        0x9_0000..=0x9_FFFD |
        0xA_0000..=0xA_FFFD |
        0xB_0000..=0xB_FFFD |
        0xC_0000..=0xC_FFFD |
        0xD_0000..=0xD_FFFD |
        0xE_1000..=0xE_FFFD
    )
}

/// Checks if the given character matches `iprivate`.
#[must_use]
pub fn is_iprivate_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0xE000..=0xF8FF | 0xF_0000..=0xF_FFFD | 0x10_0000..=0x10_FFFD
    )
}

/// Checks if the given character matches `unreserved` (`iunreserved` in IRI
/// mode).
#[inline]
#[must_use]
pub fn is_unreserved_char(c: char, iri: bool) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~') || (iri && is_ucs_char(c))
}

/// Checks if the given character can appear in a scheme after its first
/// letter.
///
/// Schemes are ASCII-only even in IRI mode.
#[inline]
#[must_use]
pub fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// Checks if the given character can appear in `userinfo` (`iuserinfo`).
#[inline]
#[must_use]
pub fn is_userinfo_char(c: char, iri: bool) -> bool {
    is_unreserved_char(c, iri) || is_sub_delim(c) || c == ':'
}

/// Checks if the given character can appear in a registered name
/// (`reg-name` / `ireg-name`).
#[inline]
#[must_use]
pub fn is_host_char(c: char, iri: bool) -> bool {
    is_unreserved_char(c, iri) || is_sub_delim(c)
}

/// Checks if the given character matches `pchar` (`ipchar`).
#[inline]
#[must_use]
pub fn is_path_char(c: char, iri: bool) -> bool {
    is_unreserved_char(c, iri) || is_sub_delim(c) || matches!(c, ':' | '@')
}

/// Checks if the given character can appear in a query (`iquery`).
///
/// IRI mode additionally admits `iprivate` characters, which are allowed in
/// queries but nowhere else.
#[inline]
#[must_use]
pub fn is_query_char(c: char, iri: bool) -> bool {
    is_path_char(c, iri) || matches!(c, '/' | '?') || (iri && is_iprivate_char(c))
}

/// Checks if the given character can appear in a fragment (`ifragment`).
#[inline]
#[must_use]
pub fn is_fragment_char(c: char, iri: bool) -> bool {
    is_path_char(c, iri) || matches!(c, '/' | '?')
}

/// Checks if the given character is safe in form-encoded data.
#[inline]
#[must_use]
pub fn is_form_char(c: char, iri: bool) -> bool {
    is_unreserved_char(c, iri) || matches!(c, '/' | '+')
}

/// Checks the given character against the class named by `set`.
///
/// The `Reserved` tag admits `unreserved` as well; it is the
/// "everything a URI can carry verbatim" set used by the `+` and `#`
/// template operators.
#[must_use]
pub fn is_uri_char(c: char, set: CharSet, iri: bool) -> bool {
    match set {
        CharSet::Unreserved => is_unreserved_char(c, iri),
        CharSet::Reserved => is_unreserved_char(c, iri) || is_reserved_char(c),
        CharSet::Userinfo => is_userinfo_char(c, iri),
        CharSet::Host => is_host_char(c, iri),
        CharSet::Path => is_path_char(c, iri),
        CharSet::Query => is_query_char(c, iri),
        CharSet::Fragment => is_fragment_char(c, iri),
        CharSet::Form => is_form_char(c, iri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_classes() {
        assert!(is_alpha('a') && is_alpha('Z'));
        assert!(!is_alpha('1'));
        assert!(is_digit('0') && !is_digit('a'));
        assert!(is_hex_char('f') && is_hex_char('F') && is_hex_char('9'));
        assert!(!is_hex_char('g'));
        assert!(is_scheme_char('+') && is_scheme_char('.') && !is_scheme_char(':'));
    }

    #[test]
    fn reserved_split() {
        for c in ":/?#[]@".chars() {
            assert!(is_gen_delim(c), "{c:?}");
            assert!(!is_sub_delim(c), "{c:?}");
        }
        for c in "!$&'()*+,;=".chars() {
            assert!(is_sub_delim(c), "{c:?}");
            assert!(is_reserved_char(c), "{c:?}");
        }
        assert!(!is_reserved_char('%'));
    }

    #[test]
    fn iri_mode_admits_ucschar() {
        // U+03B1 GREEK SMALL LETTER ALPHA
        assert!(!is_unreserved_char('\u{03B1}', false));
        assert!(is_unreserved_char('\u{03B1}', true));
        assert!(is_path_char('\u{03B1}', true));
        // U+E000 is `iprivate`, valid in queries only.
        assert!(is_query_char('\u{E000}', true));
        assert!(!is_path_char('\u{E000}', true));
        assert!(!is_query_char('\u{E000}', false));
        // U+FFFD is in neither range.
        assert!(!is_ucs_char('\u{FFFD}'));
        assert!(!is_query_char('\u{FFFD}', true));
    }

    #[test]
    fn uri_char_dispatch() {
        assert!(is_uri_char('~', CharSet::Unreserved, false));
        assert!(!is_uri_char('/', CharSet::Unreserved, false));
        assert!(is_uri_char('/', CharSet::Reserved, false));
        assert!(is_uri_char('a', CharSet::Reserved, false));
        assert!(is_uri_char(':', CharSet::Userinfo, false));
        assert!(!is_uri_char('@', CharSet::Host, false));
        assert!(is_uri_char('@', CharSet::Path, false));
        assert!(is_uri_char('?', CharSet::Query, false));
        assert!(is_uri_char('?', CharSet::Fragment, false));
        assert!(is_uri_char('+', CharSet::Form, false));
        assert!(!is_uri_char('=', CharSet::Form, false));
    }
}
