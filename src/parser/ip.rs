//! IPv4, IPv6, and IPvFuture sub-parsers.
//!
//! The IPv6 parser is the delicate part: a hextet already consumed may turn
//! out to be the first octet of a trailing IPv4 address, so the parser
//! remembers at most one rewind position (the start of the current hextet)
//! and backtracks to it when a `.` follows. No general backtracking stack is
//! needed.

use super::Cursor;
use crate::chars::{is_sub_delim, is_unreserved_char};
use crate::error::{UriError, UriErrorKind};

/// Parses `IPv4address`: four `dec-octet`s separated by `.`.
///
/// Octets are 1–3 digits, at most 255, with no leading zero.
pub(crate) fn parse_ipv4_at(cur: &mut Cursor<'_>) -> Result<(), UriError> {
    for i in 0..4 {
        if i > 0 && !cur.eat(b'.') {
            return Err(cur.error(UriErrorKind::ExpectedDot));
        }
        let start = cur.offset;
        let mut value: u16 = 0;
        let mut digits = 0;
        while digits < 3 {
            match cur.peek() {
                Some(b @ b'0'..=b'9') => {
                    value = value * 10 + u16::from(b - b'0');
                    digits += 1;
                    cur.advance(1);
                }
                _ => break,
            }
        }
        if digits == 0 || value > 255 {
            return Err(cur.error_at(UriErrorKind::InvalidIpv4Octet, start));
        }
        if digits > 1 && cur.input.as_bytes()[start] == b'0' {
            // Leading zeros are not `dec-octet`.
            return Err(cur.error_at(UriErrorKind::InvalidIpv4Octet, start));
        }
    }
    Ok(())
}

/// Parses `IPv6address` up to the cursor's scan limit.
///
/// The grammar permits at most one `::` compression and an optional
/// trailing IPv4 address standing in for the last two hextets.
pub(crate) fn parse_ipv6_at(cur: &mut Cursor<'_>) -> Result<(), UriError> {
    let mut hextets = 0_u32;
    let mut compression = false;
    let mut ipv4_start: Option<usize> = None;

    // Leading hextets up to the compression (if any).
    while hextets < 8 {
        if cur.peek() == Some(b':') {
            cur.advance(1);
            if cur.eat(b':') {
                compression = true;
                break;
            }
            if hextets == 0 {
                // A lone `:` can only open a `::`.
                return Err(cur.error(UriErrorKind::ExpectedColon));
            }
        } else if let Some(start) = ipv4_start {
            // The hextet just read starts the IPv4 tail instead.
            cur.offset = start;
            break;
        } else if hextets > 0 {
            return Err(cur.error(UriErrorKind::ExpectedColon));
        }
        if hextets == 6 {
            ipv4_start = Some(cur.offset);
        }
        if cur.take_hexdigits(4) == 0 {
            if let Some(start) = ipv4_start {
                cur.offset = start;
                break;
            }
            return Err(cur.error(UriErrorKind::ExpectedHexDigit));
        }
        hextets += 1;
    }

    // Hextets after the compression.
    if compression && !cur.at_end() {
        loop {
            let start = cur.offset;
            if cur.take_hexdigits(4) == 0 {
                return Err(cur.error(UriErrorKind::ExpectedHexDigit));
            }
            hextets += 1;
            if cur.peek() == Some(b':') && hextets < 7 {
                cur.advance(1);
                continue;
            }
            if cur.peek() == Some(b'.') {
                cur.offset = start;
                ipv4_start = Some(start);
            }
            break;
        }
    }

    if ipv4_start == Some(cur.offset) {
        parse_ipv4_at(cur)?;
    }

    if !cur.at_end() {
        return Err(cur.error(UriErrorKind::UnexpectedChar));
    }
    Ok(())
}

/// Parses `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
/// up to the cursor's scan limit.
pub(crate) fn parse_ipv_future_at(cur: &mut Cursor<'_>) -> Result<(), UriError> {
    debug_assert_eq!(cur.peek(), Some(b'v'));
    cur.advance(1);
    if cur.take_hexdigits(usize::MAX) == 0 {
        return Err(cur.error(UriErrorKind::ExpectedHexDigit));
    }
    if !cur.eat(b'.') {
        return Err(cur.error(UriErrorKind::ExpectedDot));
    }
    let start = cur.offset;
    while cur
        .peek_char()
        .is_some_and(|c| is_unreserved_char(c, false) || is_sub_delim(c) || c == ':')
    {
        cur.advance(1);
    }
    if cur.offset == start || !cur.at_end() {
        return Err(cur.error(UriErrorKind::InvalidIpLiteral));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_ipv4, parse_ipv6};

    const OK_IPV4_LIST: &[&str] = &[
        "0.0.0.0",
        "9.9.9.9",
        "10.0.0.1",
        "127.0.0.1",
        "198.51.100.23",
        "255.255.255.255",
    ];

    const BAD_IPV4_LIST: &[&str] = &[
        "",
        "256.0.0.0",
        "01.0.0.0",
        "00.0.0.0",
        "1.2.3",
        "1.2.3.",
        "1.2.3.4.5",
        "1..3.4",
        "1.2.3.4a",
        "a.2.3.4",
        "1234.0.0.0",
    ];

    const OK_IPV6_LIST: &[&str] = &[
        "::",
        "::1",
        "1::",
        "0:0:0:0:0:0:0:0",
        "1:2:3:4:5:6:7:8",
        "2001:db8::1",
        "2001:db8:0123::cafe",
        "1:2:3:4:5:6:7::",
        "::1:2:3:4:5:6:7",
        "2001:db8::192.168.0.1",
        "::ffff:192.168.0.1",
        "::192.0.2.33",
        "64:ff9b::192.0.2.33",
        "2001:db8:122:c000:2:2100:192.0.2.33",
        "1:2:3:4:5:6:7.8.9.1",
    ];

    const BAD_IPV6_LIST: &[&str] = &[
        "",
        ":",
        ":1",
        "1",
        "1:2:3",
        "2001:db8:::1",
        "2001:db8::1::",
        "1:2::6::8",
        "2001:db8::192.168",
        "::00000",
        "12345::",
        "1:2:3:4:5:6:7",
        "1:2:3:4:5:6:7:8:9",
        "1:2:3:4:5:6:7:8::",
        "::1:2:3:4:5:6:7:8",
        "::127.0.0.1:",
        "::ffff:192.168.0.256",
        "fe80::1%25eth0",
    ];

    #[test]
    fn ipv4_accepts() {
        for s in OK_IPV4_LIST {
            assert_eq!(parse_ipv4(s), Ok(*s));
        }
    }

    #[test]
    fn ipv4_rejects() {
        for s in BAD_IPV4_LIST {
            assert!(parse_ipv4(s).is_err(), "{s:?}");
        }
    }

    #[test]
    fn ipv6_accepts() {
        for s in OK_IPV6_LIST {
            assert_eq!(parse_ipv6(s), Ok(*s));
        }
    }

    #[test]
    fn ipv6_rejects() {
        for s in BAD_IPV6_LIST {
            assert!(parse_ipv6(s).is_err(), "{s:?}");
        }
    }
}
