// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC Parser using nom
//!
//! Zero-copy tokenization of entity instances, a quote-aware entity scanner
//! and decoding of STEP string escapes.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// STEP/IFC Token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal with escapes still encoded: 'text'
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Real: 3.14, 0., 1.E-5
    Float(f64),
    /// Enumeration: .T., .LENGTHUNIT.
    Enum(&'a str),
    /// Aggregate: (1,2,3)
    List(Vec<Token<'a>>),
    /// Typed parameter: IFCLABEL('x'), IFCLENGTHMEASURE(0.3)
    Typed(&'a str, Box<Token<'a>>),
    /// Unset value: $
    Null,
    /// Derived value: *
    Derived,
}

/// A tokenized entity instance
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity<'a> {
    pub id: u32,
    pub type_name: &'a str,
    pub args: Vec<Token<'a>>,
}

/// Skip whitespace and `/* ... */` comments
fn ws(input: &str) -> IResult<&str, ()> {
    let mut rest = input.trim_start();
    while let Some(after) = rest.strip_prefix("/*") {
        match after.find("*/") {
            Some(end) => rest = after[end + 2..].trim_start(),
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    rest,
                    nom::error::ErrorKind::TakeUntil,
                )))
            }
        }
    }
    Ok((rest, ()))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Entity or type keyword: IFCWALL, IFCLABEL
fn keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        opt(take_while1(is_name_char)),
    ))(input)
}

fn entity_id(input: &str) -> IResult<&str, u32> {
    preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>()))(input)
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(entity_id, Token::EntityRef)(input)
}

/// 'text' with '' as an escaped quote. The returned slice excludes the quotes.
fn string_literal(input: &str) -> IResult<&str, Token> {
    let (rest, _) = char('\'')(input)?;
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Ok((&rest[i + 1..], Token::String(&rest[..i])));
        }
        i += 1;
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Binary literals ("0A3F") are kept as opaque strings
fn binary_literal(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('"'), take_while1(|c: char| c.is_ascii_hexdigit()), char('"')),
        Token::String,
    )(input)
}

fn parse_real(s: &str) -> std::result::Result<f64, fast_float::Error> {
    fast_float::parse(s.strip_prefix('+').unwrap_or(s))
}

/// STEP reals always carry a decimal point: 0., -3.5, 1.E-5
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| parse_real(s).map(Token::Float),
    )(input)
}

fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.strip_prefix('+').unwrap_or(s).parse::<i64>().map(Token::Integer)
    })(input)
}

fn enum_value(input: &str) -> IResult<&str, Token> {
    map(delimited(char('.'), take_while1(is_name_char), char('.')), Token::Enum)(input)
}

fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    map(
        pair(keyword, delimited(char('('), token, preceded(ws, char(')')))),
        |(name, inner)| Token::Typed(name, Box::new(inner)),
    )(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // before integer: both start with digits
            integer,
            entity_ref,
            string_literal,
            binary_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

/// Parenthesised, comma separated parameters
fn parameters(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(char(','), token),
        preceded(ws, char(')')),
    )(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    map(parameters, Token::List)(input)
}

/// Parse a complete entity instance
/// Example: #123=IFCBEAM('guid',#5,'B1',$,$,#20,#30,'T1',.BEAM.);
pub fn parse_entity(input: &str) -> Result<RawEntity<'_>> {
    let result = tuple((
        ws,
        entity_id,
        ws,
        char('='),
        ws,
        keyword,
        ws,
        parameters,
        ws,
        char(';'),
    ))(input);

    match result {
        Ok((_, (_, id, _, _, _, type_name, _, args, _, _))) => Ok(RawEntity {
            id,
            type_name,
            args,
        }),
        Err(e) => {
            let position = match &e {
                nom::Err::Error(err) | nom::Err::Failure(err) => input.len() - err.input.len(),
                nom::Err::Incomplete(_) => input.len(),
            };
            Err(Error::parse(position, format!("Failed to parse entity: {}", e)))
        }
    }
}

/// Parse a bare parameter list such as the body of `FILE_SCHEMA(('IFC4'))`
pub fn parse_parameters(input: &str) -> Result<Vec<Token<'_>>> {
    preceded(ws, parameters)(input)
        .map(|(_, args)| args)
        .map_err(|e| Error::parse(0, format!("Failed to parse parameters: {}", e)))
}

/// Location of one entity instance in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySpan<'a> {
    pub id: u32,
    pub type_name: &'a str,
    /// Byte offset of the leading '#'
    pub start: usize,
    /// Byte offset just past the terminating ';'
    pub end: usize,
}

/// Entity scanner - walks instances without tokenizing their parameters.
///
/// The terminating ';' is searched outside string literals, so names such as
/// `'B1; level 2'` do not split an instance.
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner over the whole content
    pub fn new(content: &'a str) -> Self {
        Self::from_offset(content, 0)
    }

    /// Create a scanner that starts at `offset` (typically the DATA section)
    pub fn from_offset(content: &'a str, offset: usize) -> Self {
        Self {
            content,
            position: offset.min(content.len()),
        }
    }

    /// Scan for the next entity instance
    pub fn next_entity(&mut self) -> Option<EntitySpan<'a>> {
        let bytes = self.content.as_bytes();
        let len = bytes.len();

        loop {
            let start = self.position + memchr::memchr(b'#', &bytes[self.position..])?;
            let mut pos = start + 1;

            let id_start = pos;
            while pos < len && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let id_end = pos;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            if id_end == id_start || pos >= len || bytes[pos] != b'=' {
                // A reference or stray '#', not an instance definition
                self.position = start + 1;
                continue;
            }
            pos += 1;

            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let type_start = pos;
            while pos < len && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            let type_end = pos;

            let mut in_string = false;
            while pos < len {
                match bytes[pos] {
                    b'\'' => in_string = !in_string,
                    b';' if !in_string => break,
                    b'/' if !in_string && bytes.get(pos + 1) == Some(&b'*') => {
                        // Comments may hold quotes and semicolons
                        pos = memchr::memmem::find(&bytes[pos + 2..], b"*/")
                            .map_or(len, |i| pos + 2 + i + 2);
                        continue;
                    }
                    _ => {}
                }
                pos += 1;
            }
            if pos >= len {
                // Unterminated instance
                self.position = len;
                return None;
            }

            let end = pos + 1;
            self.position = end;

            let id = match self.content[id_start..id_end].parse::<u32>() {
                Ok(id) => id,
                Err(_) => continue,
            };

            return Some(EntitySpan {
                id,
                type_name: &self.content[type_start..type_end],
                start,
                end,
            });
        }
    }

}

impl<'a> Iterator for EntityScanner<'a> {
    type Item = EntitySpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entity()
    }
}

/// Decode STEP string escapes (ISO 10303-21 §6.4.3).
///
/// Handles `''`, `\\`, `\S\c`, `\X\hh`, `\X2\...\X0\` and `\X4\...\X0\`.
/// Code page switches (`\PA\`) are dropped. Malformed escapes are kept
/// verbatim, so decoding never fails.
pub fn decode_string(raw: &str) -> String {
    if !raw.contains('\\') && !raw.contains("''") {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if c == '\'' && rest.starts_with("''") {
            out.push('\'');
            rest = &rest[2..];
            continue;
        }
        if c == '\\' {
            if let Some((decoded, consumed)) = decode_escape(rest) {
                out.push_str(&decoded);
                rest = &rest[consumed..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn hex_units(hex: &str, width: usize) -> Option<Vec<u32>> {
    if hex.is_empty() || hex.len() % width != 0 || !hex.is_ascii() {
        return None;
    }
    hex.as_bytes()
        .chunks(width)
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|h| u32::from_str_radix(h, 16).ok())
        })
        .collect()
}

/// Returns the decoded text and the number of input bytes consumed
fn decode_escape(s: &str) -> Option<(String, usize)> {
    if s.starts_with("\\\\") {
        return Some(("\\".to_string(), 2));
    }

    if s.starts_with("\\X2\\") || s.starts_with("\\X4\\") {
        let width = if s.as_bytes()[2] == b'2' { 4 } else { 8 };
        let end = 4 + s[4..].find("\\X0\\")?;
        let units = hex_units(&s[4..end], width)?;
        let text = if width == 4 {
            let utf16: Vec<u16> = units.iter().map(|&u| u as u16).collect();
            String::from_utf16_lossy(&utf16)
        } else {
            units
                .into_iter()
                .map(char::from_u32)
                .collect::<Option<String>>()?
        };
        return Some((text, end + 4));
    }

    if s.starts_with("\\X\\") {
        let byte = u8::from_str_radix(s.get(3..5)?, 16).ok()?;
        return Some(((byte as char).to_string(), 5));
    }

    if s.starts_with("\\S\\") {
        let c = s[3..].chars().next().filter(|c| c.is_ascii())?;
        return Some((char::from_u32(c as u32 + 128)?.to_string(), 4));
    }

    let b = s.as_bytes();
    if b.len() >= 4 && b[1] == b'P' && b[2].is_ascii_uppercase() && b[3] == b'\\' {
        return Some((String::new(), 4));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref() {
        assert_eq!(entity_ref("#123"), Ok(("", Token::EntityRef(123))));
    }

    #[test]
    fn test_string_literal_keeps_escapes() {
        assert_eq!(string_literal("'hello'"), Ok(("", Token::String("hello"))));
        assert_eq!(
            string_literal("'it''s'"),
            Ok(("", Token::String("it''s")))
        );
        assert!(string_literal("'open").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(float("3.14"), Ok(("", Token::Float(3.14))));
        assert_eq!(float("0."), Ok(("", Token::Float(0.0))));
        assert_eq!(float("1.E-3"), Ok(("", Token::Float(0.001))));
        assert_eq!(float("-2.5E2"), Ok(("", Token::Float(-250.0))));
        assert_eq!(integer("42"), Ok(("", Token::Integer(42))));
        assert_eq!(integer("-7"), Ok(("", Token::Integer(-7))));
        // integers must not be swallowed as reals
        assert_eq!(token("12,"), Ok((",", Token::Integer(12))));
    }

    #[test]
    fn test_enum_null_derived() {
        assert_eq!(enum_value(".MILLI."), Ok(("", Token::Enum("MILLI"))));
        assert_eq!(token(" $ "), Ok(("", Token::Null)));
        assert_eq!(token("*"), Ok(("", Token::Derived)));
    }

    #[test]
    fn test_typed_value() {
        assert_eq!(
            token("IFCLENGTHMEASURE(0.3)"),
            Ok((
                "",
                Token::Typed("IFCLENGTHMEASURE", Box::new(Token::Float(0.3)))
            ))
        );
    }

    #[test]
    fn test_nested_and_empty_lists() {
        let (_, parsed) = list("((0.,0.,1.),(), ( #5 ))").unwrap();
        match parsed {
            Token::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[1], Token::List(vec![]));
                assert_eq!(items[2], Token::List(vec![Token::EntityRef(5)]));
            }
            other => panic!("Expected List token, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_entity() {
        let input = "#123=IFCBEAM('2O2Fr$t4X7Zf8NOew3FLOH',#5,'Beam-12',$,$,#20,#30,'300x450 mm',.BEAM.);";
        let entity = parse_entity(input).unwrap();
        assert_eq!(entity.id, 123);
        assert_eq!(entity.type_name, "IFCBEAM");
        assert_eq!(entity.args.len(), 9);
        assert_eq!(entity.args[7], Token::String("300x450 mm"));
    }

    #[test]
    fn test_parse_entity_with_spaces_and_comments() {
        let input = "#9 = IFCDIRECTION( /* up */ (0.,0.,1.) ) ;";
        let entity = parse_entity(input).unwrap();
        assert_eq!(entity.id, 9);
        assert_eq!(entity.args.len(), 1);
    }

    #[test]
    fn test_parse_entity_reports_position() {
        match parse_entity("#1=IFCBEAM('a',,);") {
            Err(Error::Parse { position, .. }) => assert!(position > 0),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_entity_scanner_respects_strings() {
        let content = r#"
#1=IFCPROJECT('guid',$,'P; #2=fake',$,$,$,$,$,$);
#2=IFCBEAM('guid2',$,$,$,$,$,$,$,$);
#3 = IFCBEAMTYPE('guid3',$,$,$,$,$,$,$,$,$);
"#;
        let spans: Vec<_> = EntityScanner::new(content).collect();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].type_name, "IFCPROJECT");
        assert_eq!(spans[1].id, 2);
        assert_eq!(spans[2].type_name, "IFCBEAMTYPE");
        assert!(content[spans[0].start..spans[0].end].ends_with(");"));
    }

    #[test]
    fn test_entity_scanner_skips_comments() {
        let content = "#9=IFCBEAM('g',$,'B',/* don't; */$,$,$,$,'300x450',$);
#10=IFCBEAM('h',$,'C',$,$,$,$,$,$);";
        let spans: Vec<_> = EntityScanner::new(content).collect();
        let ids: Vec<u32> = spans.iter().map(|s| s.id).collect();
        assert_eq!(ids, [9, 10]);
        assert!(content[spans[0].start..spans[0].end].ends_with("$);"));
        parse_entity(&content[spans[0].start..spans[0].end]).unwrap();
    }

    #[test]
    fn test_entity_scanner_skips_references() {
        let mut scanner = EntityScanner::new("see #12 then #4=IFCBEAM($);");
        let span = scanner.next_entity().unwrap();
        assert_eq!(span.id, 4);
        assert!(scanner.next_entity().is_none());
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string("plain"), "plain");
        assert_eq!(decode_string("it''s"), "it's");
        assert_eq!(decode_string("300\\X\\D7450"), "300×450");
        assert_eq!(decode_string("300\\X2\\00D7\\X0\\450"), "300×450");
        assert_eq!(decode_string("\\X4\\0001F600\\X0\\"), "\u{1F600}");
        assert_eq!(decode_string("\\S\\D"), "\u{C4}");
        assert_eq!(decode_string("a\\\\b"), "a\\b");
        assert_eq!(decode_string("\\PA\\x"), "x");
    }

    #[test]
    fn test_decode_string_keeps_malformed_escapes() {
        assert_eq!(decode_string("\\X2\\00D"), "\\X2\\00D");
        assert_eq!(decode_string("\\X\\G1"), "\\X\\G1");
        assert_eq!(decode_string("trailing\\"), "trailing\\");
    }
}
