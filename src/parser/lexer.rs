//! RTF tokenizer.

use crate::error::{Error, Result};

/// Longest control word name accepted.
const MAX_WORD_LEN: usize = 32;

/// One lexical RTF token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `{`
    GroupStart,
    /// `}`
    GroupEnd,
    /// `\word` or `\wordN`
    ControlWord { name: &'a str, param: Option<i32> },
    /// `\` followed by a single non-letter, such as `\*` or `\~`
    ControlSymbol(char),
    /// `\'hh`
    HexByte(u8),
    /// Literal text between control sequences
    Text(&'a str),
}

/// Split RTF source into tokens. Raw line breaks carry no meaning and are
/// dropped; an escaped line break is reported as `\par`.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                tokens.push(Token::GroupStart);
                pos += 1;
            }
            b'}' => {
                tokens.push(Token::GroupEnd);
                pos += 1;
            }
            b'\r' | b'\n' => pos += 1,
            b'\\' => {
                let (token, next) = control(input, pos + 1)?;
                tokens.push(token);
                pos = next;
            }
            _ => {
                let end = bytes[pos..]
                    .iter()
                    .position(|b| matches!(b, b'{' | b'}' | b'\\' | b'\r' | b'\n'))
                    .map_or(bytes.len(), |p| pos + p);
                tokens.push(Token::Text(&input[pos..end]));
                pos = end;
            }
        }
    }

    Ok(tokens)
}

/// Lex the control sequence starting right after a backslash at `start`.
fn control(input: &str, start: usize) -> Result<(Token<'_>, usize)> {
    let bytes = input.as_bytes();
    let Some(&first) = bytes.get(start) else {
        return Err(Error::RtfParse("input ends with a lone backslash".to_string()));
    };

    if first.is_ascii_alphabetic() {
        let name_len = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        if name_len > MAX_WORD_LEN {
            return Err(Error::RtfParse(format!(
                "control word too long at byte {}",
                start
            )));
        }
        let name = &input[start..start + name_len];
        let mut pos = start + name_len;

        let num_start = pos;
        if bytes.get(pos) == Some(&b'-') {
            pos += 1;
        }
        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        let param = if digits > 0 {
            pos += digits;
            input[num_start..pos].parse::<i64>().ok().map(clamp_param)
        } else {
            pos = num_start;
            None
        };

        if bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
        return Ok((Token::ControlWord { name, param }, pos));
    }

    match first {
        b'\'' => {
            let hex = input
                .get(start + 1..start + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| Error::RtfParse(format!("invalid hex escape at byte {}", start)))?;
            Ok((Token::HexByte(hex), start + 3))
        }
        b'\r' | b'\n' => Ok((
            Token::ControlWord {
                name: "par",
                param: None,
            },
            start + 1,
        )),
        _ => {
            let c = input[start..].chars().next().unwrap_or('\\');
            Ok((Token::ControlSymbol(c), start + c.len_utf8()))
        }
    }
}

fn clamp_param(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
