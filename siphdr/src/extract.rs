//! Field extraction helpers
//!
//! Turns a raw, possibly folded header line into the fragments the header
//! codecs parse: the value after the header name, the optional display name
//! and the comma separated address list.

use std::borrow::Cow;

use util::Scanner;

use crate::error::{Error, Result};
use crate::macros::lookup_table;

/// Alphanumeric is valid in all sip message components.
pub(crate) const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Token in SIP Messages
const TOKEN: &[u8] = b"-.!%*_`'~+";
/// Scheme prefixes that mark the start of an address.
const ADDR_SCHEMES: [&[u8]; 2] = [b"sip:", b"sips:"];

lookup_table!(TOKEN_TAB => ALPHANUMERIC, TOKEN);

#[inline(always)]
pub(crate) fn is_token(b: u8) -> bool {
    TOKEN_TAB[b as usize]
}

/// Removes the embedded `\r` and `\n` of a folded header
/// line and trims one leading and one trailing space.
///
/// Inner runs of whitespace are kept as they are.
///
/// # Examples
///
/// ```
/// use siphdr::extract::normalize_newlines;
///
/// assert_eq!(normalize_newlines(" Route: <sip:a>,\r\n <sip:b>\r\n"), "Route: <sip:a>, <sip:b>");
/// ```
pub fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    let is_newline = |c: char| c == '\r' || c == '\n';

    if raw.contains(is_newline) {
        let unfolded = raw.replace(is_newline, "");
        Cow::Owned(trim_one_space(&unfolded).to_owned())
    } else {
        Cow::Borrowed(trim_one_space(raw))
    }
}

fn trim_one_space(s: &str) -> &str {
    let s = s.strip_prefix(' ').unwrap_or(s);
    s.strip_suffix(' ').unwrap_or(s)
}

/// Strips the `name:` prefix from a header line and returns
/// the header value.
///
/// The name is compared ignoring ASCII case and may be
/// followed by whitespace before the colon.
///
/// # Errors
///
/// [`Error::EmptyInput`] if `raw` is blank and
/// [`Error::WrongHeaderType`] if `raw` does not start with the
/// `name` header.
pub fn strip_header_tag<'a>(raw: &'a str, name: &'static str) -> Result<&'a str> {
    if raw.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let wrong_header = Error::WrongHeaderType { expected: name };
    let mut scanner = Scanner::new(raw.as_bytes());

    util::space!(scanner);
    let header_name = scanner.read_while(is_token);
    if !header_name.eq_ignore_ascii_case(name.as_bytes()) {
        return Err(wrong_header);
    }
    util::space!(scanner);
    if scanner.advance_if_eq(b':').is_none() {
        return Err(wrong_header);
    }
    util::space!(scanner);

    Ok(&raw[scanner.offset()..])
}

/// Splits an address list value into the optional display name
/// and the remaining addresses.
///
/// A leading quoted string is the display name. Without one,
/// everything before the first `sip:` or `sips:` is taken as
/// the display name candidate. Angle brackets, quotes and
/// spaces around the candidate are dropped; a blank candidate
/// means there is no display name.
///
/// Both slices are cut by byte offset from a single scan, so a
/// display name that also occurs inside an address never
/// affects the remainder.
///
/// # Examples
///
/// ```
/// use siphdr::extract::extract_display_name;
///
/// assert_eq!(extract_display_name("\"Bob\" sip:bob@b.com"), (Some("Bob"), " sip:bob@b.com"));
/// assert_eq!(extract_display_name("<sip:bob@b.com>"), (None, "<sip:bob@b.com>"));
/// ```
pub fn extract_display_name(tail: &str) -> (Option<&str>, &str) {
    let mut scanner = Scanner::new(tail.as_bytes());
    util::space!(scanner);

    let quoted_end = match scanner.peek() {
        Some(b'"') => scanner.read_between(b'"').ok().map(|_| scanner.offset()),
        _ => None,
    };
    let end = quoted_end
        .or_else(|| find_addr_scheme(tail))
        .unwrap_or(0);

    let display = tail[..end].trim_matches(|c: char| matches!(c, '<' | '>' | '"') || c.is_ascii_whitespace());

    match (display.is_empty(), quoted_end) {
        (false, _) => (Some(display), &tail[end..]),
        // An empty quoted string is still consumed.
        (true, Some(_)) => (None, &tail[end..]),
        (true, None) => (None, tail),
    }
}

fn find_addr_scheme(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();

    (0..bytes.len()).find(|&idx| {
        let rest = &bytes[idx..];
        ADDR_SCHEMES.iter().any(|scheme| {
            rest.get(..scheme.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        })
    })
}

/// Splits a comma separated list of values.
///
/// Surrounding whitespace and one leading or trailing comma
/// are dropped, then every comma separates two fragments.
/// Commas inside quoted strings or uri parameters are not
/// recognized as part of the value.
///
/// # Examples
///
/// ```
/// use siphdr::extract::split_value_list;
///
/// assert_eq!(split_value_list(" <sip:a@x>, <sip:b@y>,"), ["<sip:a@x>", "<sip:b@y>"]);
/// ```
pub fn split_value_list(tail: &str) -> Vec<&str> {
    let tail = tail.trim();
    let tail = tail.strip_prefix(',').unwrap_or(tail);
    let tail = tail.strip_suffix(',').unwrap_or(tail);

    tail.split(',').map(str::trim).collect()
}

/// Removes every `<` and `>` from `fragment`.
pub fn strip_angle_brackets(fragment: &str) -> Cow<'_, str> {
    let is_bracket = |c: char| c == '<' || c == '>';

    if fragment.contains(is_bracket) {
        Cow::Owned(fragment.replace(is_bracket, ""))
    } else {
        Cow::Borrowed(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("Route: <sip:a@x>\r\n"), "Route: <sip:a@x>");
        assert_eq!(normalize_newlines(" Route: <sip:a@x> "), "Route: <sip:a@x>");
        assert_eq!(normalize_newlines("  Route:  <sip:a@x>"), " Route:  <sip:a@x>");
        assert_matches!(normalize_newlines("Route: <sip:a@x>"), Cow::Borrowed(_));
    }

    #[test]
    fn test_strip_header_tag() {
        assert_eq!(strip_header_tag("Route: <sip:a@x>", "Route"), Ok("<sip:a@x>"));
        assert_eq!(strip_header_tag("route :<sip:a@x>", "Route"), Ok("<sip:a@x>"));
        assert_eq!(strip_header_tag("ROUTE:", "Route"), Ok(""));
    }

    #[test]
    fn test_strip_header_tag_errors() {
        assert_eq!(strip_header_tag("", "Route"), Err(Error::EmptyInput));
        assert_eq!(strip_header_tag(" \t ", "Route"), Err(Error::EmptyInput));
        assert_eq!(
            strip_header_tag("From: <sip:a@b>", "Route"),
            Err(Error::WrongHeaderType { expected: "Route" })
        );
        assert_eq!(
            strip_header_tag("Record-Route: <sip:a@b>", "Route"),
            Err(Error::WrongHeaderType { expected: "Route" })
        );
        assert_eq!(
            strip_header_tag("Route <sip:a@b>", "Route"),
            Err(Error::WrongHeaderType { expected: "Route" })
        );
    }

    #[test]
    fn test_extract_display_name() {
        assert_eq!(
            extract_display_name("\"Bob\" <sip:bob@b.com>"),
            (Some("Bob"), " <sip:bob@b.com>")
        );
        assert_eq!(
            extract_display_name("Bob <sip:bob@b.com>"),
            (Some("Bob"), "sip:bob@b.com>")
        );
        assert_eq!(extract_display_name("SIP:bob@b.com"), (None, "SIP:bob@b.com"));
        assert_eq!(extract_display_name("\"\" <sip:bob@b.com>"), (None, " <sip:bob@b.com>"));
        assert_eq!(extract_display_name(""), (None, ""));
    }

    #[test]
    fn test_extract_display_name_by_offset() {
        // The display name also appears in the address.
        let (display, rest) = extract_display_name("\"sip\" sip:sip@sip.com, sip:b@y");
        assert_eq!(display, Some("sip"));
        assert_eq!(rest, " sip:sip@sip.com, sip:b@y");

        let (display, rest) = extract_display_name("\"Doe, John\" sip:john@doe.com");
        assert_eq!(display, Some("Doe, John"));
        assert_eq!(rest, " sip:john@doe.com");
    }

    #[test]
    fn test_split_value_list() {
        assert_eq!(split_value_list("<sip:a@x>"), ["<sip:a@x>"]);
        assert_eq!(split_value_list(",<sip:a@x>,<sip:b@y>"), ["<sip:a@x>", "<sip:b@y>"]);
        assert_eq!(split_value_list("<sip:a@x>,,<sip:b@y>"), ["<sip:a@x>", "", "<sip:b@y>"]);
    }

    #[test]
    fn test_split_value_list_ignores_quoting() {
        let fragments = split_value_list("<sip:a@x;foo=\"1,2\">");

        assert_eq!(fragments, ["<sip:a@x;foo=\"1", "2\">"]);
    }

    #[test]
    fn test_strip_angle_brackets() {
        assert_eq!(strip_angle_brackets("<sip:a@x;lr>"), "sip:a@x;lr");
        assert_matches!(strip_angle_brackets("sip:a@x"), Cow::Borrowed("sip:a@x"));
    }
}
