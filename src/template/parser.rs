//! Parsers for templates, expressions, and variable specifiers.
//!
//! The template scanner splits literals from `{...}` expressions. Literals
//! are filtered on the way in: URI-safe characters and percent triplets are
//! kept verbatim, while `ucschar` / `iprivate` characters are
//! percent-encoded immediately, so a parsed literal is always URI-safe
//! ASCII.

use memchr::memchr;

use crate::chars::{is_iprivate_char, is_reserved_char, is_ucs_char, is_unreserved_char};
use crate::percent::{is_pct_encoded, write_pct_encoded_char};
use crate::template::error::{UriTemplateError, UriTemplateErrorKind};
use crate::template::model::{Expression, Operator, TemplatePart, UriTemplate, Variable};

/// Parses a URI template string.
///
/// # Examples
///
/// ```
/// use uri_kit::parse_uri_template;
///
/// let template = parse_uri_template("http://example.com/~{username:9}/{file}{.suffix}")?;
/// assert_eq!(template.to_string(), "http://example.com/~{username:9}/{file}{.suffix}");
/// assert!(parse_uri_template("{unclosed").is_err());
/// # Ok::<_, uri_kit::UriTemplateError>(())
/// ```
pub fn parse_uri_template(input: &str) -> Result<UriTemplate, UriTemplateError> {
    let bytes = input.as_bytes();
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let b = bytes[offset];
        if b == b'{' {
            if !literal.is_empty() {
                parts.push(TemplatePart::Literal(core::mem::take(&mut literal)));
            }
            let close = match memchr(b'}', &bytes[offset + 1..]) {
                Some(pos) => offset + 1 + pos,
                None => {
                    return Err(UriTemplateError::new(
                        UriTemplateErrorKind::UnclosedExpression,
                        input,
                        offset,
                    ))
                }
            };
            let expression = parse_expression_body(input, offset + 1, close)?;
            parts.push(TemplatePart::Expression(expression));
            offset = close + 1;
        } else if b == b'%' {
            if !is_pct_encoded(&input[offset..]) {
                return Err(UriTemplateError::new(
                    UriTemplateErrorKind::InvalidPctEncoding,
                    input,
                    offset,
                ));
            }
            literal.push_str(&input[offset..offset + 3]);
            offset += 3;
        } else if b.is_ascii() {
            let c = b as char;
            if is_unreserved_char(c, false) || is_reserved_char(c) {
                literal.push(c);
                offset += 1;
            } else {
                return Err(UriTemplateError::new(
                    UriTemplateErrorKind::UnexpectedChar,
                    input,
                    offset,
                ));
            }
        } else {
            let c = input[offset..]
                .chars()
                .next()
                .expect("a non-empty suffix holds at least one scalar");
            if is_ucs_char(c) || is_iprivate_char(c) {
                write_pct_encoded_char(&mut literal, c)
                    .expect("writing to a `String` never fails");
                offset += c.len_utf8();
            } else {
                return Err(UriTemplateError::new(
                    UriTemplateErrorKind::UnexpectedChar,
                    input,
                    offset,
                ));
            }
        }
    }
    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }
    Ok(UriTemplate::new(parts))
}

/// Parses a URI template, returning `None` on failure.
#[inline]
#[must_use]
pub fn try_parse_uri_template(input: &str) -> Option<UriTemplate> {
    parse_uri_template(input).ok()
}

/// Parses a single `{...}` expression, braces included.
///
/// # Examples
///
/// ```
/// use uri_kit::{parse_uri_expression, Operator};
///
/// let expression = parse_uri_expression("{?page,per_page}")?;
/// assert_eq!(expression.operator(), Operator::FormQuery);
/// assert_eq!(expression.variables().len(), 2);
/// # Ok::<_, uri_kit::UriTemplateError>(())
/// ```
pub fn parse_uri_expression(input: &str) -> Result<Expression, UriTemplateError> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'{') {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::UnexpectedChar,
            input,
            0,
        ));
    }
    let close = match memchr(b'}', bytes) {
        Some(pos) => pos,
        None => {
            return Err(UriTemplateError::new(
                UriTemplateErrorKind::UnclosedExpression,
                input,
                0,
            ))
        }
    };
    if close != input.len() - 1 {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::UnexpectedChar,
            input,
            close + 1,
        ));
    }
    parse_expression_body(input, 1, close)
}

/// Parses an expression, returning `None` on failure.
#[inline]
#[must_use]
pub fn try_parse_uri_expression(input: &str) -> Option<Expression> {
    parse_uri_expression(input).ok()
}

/// Parses a variable specifier (`varname`, `varname*`, or `varname:n`)
/// with the defaults of simple string expansion.
pub fn parse_uri_variable(input: &str) -> Result<Variable, UriTemplateError> {
    let (variable, next) = parse_varspec(input, 0, input.len(), Operator::String)?;
    if next != input.len() {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::InvalidVariable,
            input,
            next,
        ));
    }
    Ok(variable)
}

/// Parses a variable specifier, returning `None` on failure.
#[inline]
#[must_use]
pub fn try_parse_uri_variable(input: &str) -> Option<Variable> {
    parse_uri_variable(input).ok()
}

/// Parses the inside of a `{...}`: an optional operator, then a
/// comma-separated variable list.
fn parse_expression_body(
    input: &str,
    start: usize,
    end: usize,
) -> Result<Expression, UriTemplateError> {
    let bytes = input.as_bytes();
    if start >= end {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::EmptyExpression,
            input,
            start,
        ));
    }
    let mut offset = start;
    let operator = match Operator::from_byte(bytes[offset]) {
        Some(operator) => {
            offset += 1;
            operator
        }
        None if Operator::is_reserved_byte(bytes[offset]) => {
            return Err(UriTemplateError::new(
                UriTemplateErrorKind::ReservedOperator,
                input,
                offset,
            ));
        }
        None => Operator::String,
    };

    let mut variables = Vec::new();
    loop {
        let (variable, next) = parse_varspec(input, offset, end, operator)?;
        variables.push(variable);
        if next < end && bytes[next] == b',' {
            offset = next + 1;
            continue;
        }
        if next == end {
            break;
        }
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::InvalidVariable,
            input,
            next,
        ));
    }
    Ok(Expression::new(operator, variables))
}

/// Scans `varname = varchar *( ["."] varchar )`, returning the offset past
/// the name.
fn scan_varname(input: &str, start: usize, end: usize) -> Result<usize, UriTemplateError> {
    let bytes = input.as_bytes();
    let mut offset = start;
    let mut prev_dot = false;
    while offset < end {
        match bytes[offset] {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' => {
                offset += 1;
                prev_dot = false;
            }
            b'%' => {
                if offset + 2 >= end
                    || !bytes[offset + 1].is_ascii_hexdigit()
                    || !bytes[offset + 2].is_ascii_hexdigit()
                {
                    return Err(UriTemplateError::new(
                        UriTemplateErrorKind::InvalidPctEncoding,
                        input,
                        offset,
                    ));
                }
                offset += 3;
                prev_dot = false;
            }
            b'.' => {
                if offset == start || prev_dot {
                    return Err(UriTemplateError::new(
                        UriTemplateErrorKind::InvalidVariable,
                        input,
                        offset,
                    ));
                }
                offset += 1;
                prev_dot = true;
            }
            _ => break,
        }
    }
    if offset == start {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::InvalidVariable,
            input,
            offset,
        ));
    }
    if prev_dot {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::InvalidVariable,
            input,
            offset - 1,
        ));
    }
    Ok(offset)
}

/// Validates a bare variable name (no modifiers).
pub(crate) fn validate_varname(name: &str) -> Result<(), UriTemplateError> {
    let end = scan_varname(name, 0, name.len())?;
    if end != name.len() {
        return Err(UriTemplateError::new(
            UriTemplateErrorKind::InvalidVariable,
            name,
            end,
        ));
    }
    Ok(())
}

/// Parses `varspec = varname [ "*" / ":" max-length ]`.
fn parse_varspec(
    input: &str,
    start: usize,
    end: usize,
    operator: Operator,
) -> Result<(Variable, usize), UriTemplateError> {
    let bytes = input.as_bytes();
    let mut offset = scan_varname(input, start, end)?;
    let mut variable = Variable::with_operator_defaults(&input[start..offset], operator);

    if offset < end {
        match bytes[offset] {
            b'*' => {
                variable.explode = true;
                offset += 1;
            }
            b':' => {
                offset += 1;
                // `max-length` starts with a non-zero digit and stays
                // below 10000.
                if offset >= end || !matches!(bytes[offset], b'1'..=b'9') {
                    return Err(UriTemplateError::new(
                        UriTemplateErrorKind::InvalidMaxLength,
                        input,
                        offset,
                    ));
                }
                let digits_start = offset;
                let mut value: u32 = 0;
                while offset < end && bytes[offset].is_ascii_digit() {
                    value = value * 10 + u32::from(bytes[offset] - b'0');
                    if value > 9999 {
                        return Err(UriTemplateError::new(
                            UriTemplateErrorKind::InvalidMaxLength,
                            input,
                            digits_start,
                        ));
                    }
                    offset += 1;
                }
                variable.max_length = Some(value as u16);
            }
            _ => {}
        }
    }
    Ok((variable, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::model::TemplatePart;

    #[test]
    fn splits_literals_and_expressions() {
        let template = parse_uri_template("/users/{username}{?q,lang}").unwrap();
        let parts = template.parts();
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], TemplatePart::Literal(lit) if lit == "/users/"));
        assert!(matches!(&parts[1], TemplatePart::Expression(_)));
        assert!(matches!(&parts[2], TemplatePart::Expression(_)));
    }

    #[test]
    fn literal_filter_encodes_non_uri_chars() {
        // U+00A7 SECTION SIGN is `ucschar`, so it is encoded at parse time.
        let template = parse_uri_template("\u{A7}1").unwrap();
        assert!(matches!(
            &template.parts()[0],
            TemplatePart::Literal(lit) if lit == "%C2%A71"
        ));
        // Percent triplets pass through; stray percents do not.
        let template = parse_uri_template("a%20b").unwrap();
        assert!(matches!(
            &template.parts()[0],
            TemplatePart::Literal(lit) if lit == "a%20b"
        ));
        assert_eq!(
            parse_uri_template("a%2zb").unwrap_err().kind(),
            UriTemplateErrorKind::InvalidPctEncoding
        );
    }

    #[test]
    fn literal_rejects_forbidden_ascii() {
        for input in ["a b", "a\"b", "a<b", "a>b", "a\\b", "a^b", "a`b", "a|b", "}"] {
            let err = parse_uri_template(input).unwrap_err();
            assert_eq!(err.kind(), UriTemplateErrorKind::UnexpectedChar, "{input:?}");
        }
    }

    #[test]
    fn expression_errors() {
        let err = parse_uri_template("{unclosed").unwrap_err();
        assert_eq!(err.kind(), UriTemplateErrorKind::UnclosedExpression);
        assert_eq!(err.offset(), 0);

        let err = parse_uri_template("{}").unwrap_err();
        assert_eq!(err.kind(), UriTemplateErrorKind::EmptyExpression);

        for input in ["{=a}", "{,a}", "{!a}", "{@a}", "{|a}"] {
            let err = parse_uri_template(input).unwrap_err();
            assert_eq!(err.kind(), UriTemplateErrorKind::ReservedOperator, "{input:?}");
        }
    }

    #[test]
    fn varspec_errors() {
        for input in ["{.a.}", "{a..b}", "{.}", "{a-b}", "{a,}", "{a b}"] {
            let err = parse_uri_template(input).unwrap_err();
            assert_eq!(err.kind(), UriTemplateErrorKind::InvalidVariable, "{input:?}");
        }
        assert_eq!(
            parse_uri_template("{a%2}").unwrap_err().kind(),
            UriTemplateErrorKind::InvalidPctEncoding
        );
        for input in ["{a:}", "{a:0}", "{a:10000}", "{a:x}"] {
            let err = parse_uri_template(input).unwrap_err();
            assert_eq!(err.kind(), UriTemplateErrorKind::InvalidMaxLength, "{input:?}");
        }
    }

    #[test]
    fn varspec_modifiers() {
        let variable = parse_uri_variable("name*").unwrap();
        assert!(variable.is_explode());
        assert_eq!(variable.max_length(), None);

        let variable = parse_uri_variable("name:9999").unwrap();
        assert_eq!(variable.max_length(), Some(9999));
        assert!(!variable.is_explode());

        let variable = parse_uri_variable("dotted.na_me").unwrap();
        assert_eq!(variable.name(), "dotted.na_me");

        let variable = parse_uri_variable("pct%2Dname").unwrap();
        assert_eq!(variable.name(), "pct%2Dname");

        // `*` and `:n` are mutually exclusive in the grammar.
        assert!(parse_uri_variable("name*:3").is_err());
        assert!(parse_uri_variable("name:3*").is_err());
    }

    #[test]
    fn expression_round_trip() {
        for input in ["{var}", "{+list*}", "{#x,hello,y}", "{?q,lang:8}", "{&continue}"] {
            let expression = parse_uri_expression(input).unwrap();
            assert_eq!(expression.to_string(), input);
        }
        assert!(parse_uri_expression("{a}b").is_err());
        assert!(parse_uri_expression("a").is_err());
    }
}
