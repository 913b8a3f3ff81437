//! Reader for pre-versioned metadata
//!
//! Old tools stored level info as a text-protocol pickled `str -> str` dict.
//! Only the opcodes such a dict uses are understood; anything else is
//! rejected rather than interpreted. The input is untrusted: every value is
//! reference counted so memo lookups cost no copies, and the decoded map may
//! not expand past a fixed multiple of the input size.

use std::collections::BTreeMap;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::error::LegacyError;

/// Maximum decoded size relative to the input
const MAX_EXPANSION: usize = 16;

const MARK: u8 = b'(';
const DICT: u8 = b'd';
const EMPTY_DICT: u8 = b'}';
const STRING: u8 = b'S';
const UNICODE: u8 = b'V';
const PUT: u8 = b'p';
const GET: u8 = b'g';
const SETITEM: u8 = b's';
const SETITEMS: u8 = b'u';
const STOP: u8 = b'.';

type Map = BTreeMap<Rc<str>, Rc<str>>;

enum Item {
    Mark,
    Str(Rc<str>),
    Dict(Map),
}

enum Memo {
    Str(Rc<str>),
    Dict,
}

/// Parse a pickled string map.
pub(super) fn parse(data: &[u8]) -> Result<BTreeMap<String, String>, LegacyError> {
    let mut stack: Vec<Item> = Vec::new();
    let mut memo: HashMap<u32, Memo> = HashMap::new();
    let mut pos = 0;

    loop {
        let op = *data.get(pos).ok_or(LegacyError::UnexpectedEof)?;
        let at = pos;
        pos += 1;

        match op {
            MARK => stack.push(Item::Mark),
            EMPTY_DICT => stack.push(Item::Dict(Map::new())),
            DICT => {
                let items = pop_to_mark(&mut stack)?;
                let mut map = Map::new();
                insert_pairs(&mut map, items)?;
                stack.push(Item::Dict(map));
            }
            STRING => {
                let line = read_line(data, &mut pos)?;
                stack.push(Item::Str(unquote(line)?.into()));
            }
            UNICODE => {
                let line = read_line(data, &mut pos)?;
                stack.push(Item::Str(raw_unicode(line)?.into()));
            }
            PUT => {
                let slot = read_index(data, &mut pos)?;
                let entry = match stack.last() {
                    Some(Item::Str(s)) => Memo::Str(Rc::clone(s)),
                    Some(Item::Dict(_)) => Memo::Dict,
                    _ => return Err(LegacyError::StackUnderflow),
                };
                memo.insert(slot, entry);
            }
            GET => {
                let slot = read_index(data, &mut pos)?;
                match memo.get(&slot) {
                    Some(Memo::Str(s)) => stack.push(Item::Str(Rc::clone(s))),
                    Some(Memo::Dict) => return Err(LegacyError::NotAStringMap),
                    None => return Err(LegacyError::MissingMemo(slot)),
                }
            }
            SETITEM => {
                let value = pop_str(&mut stack)?;
                let key = pop_str(&mut stack)?;
                top_dict(&mut stack)?.insert(key, value);
            }
            SETITEMS => {
                let items = pop_to_mark(&mut stack)?;
                insert_pairs(top_dict(&mut stack)?, items)?;
            }
            STOP => {
                let Some(Item::Dict(map)) = stack.pop() else {
                    return Err(LegacyError::NotAStringMap);
                };
                return into_owned(map, data.len().saturating_mul(MAX_EXPANSION));
            }
            other => return Err(LegacyError::UnsupportedOpcode(other, at)),
        }
    }
}

fn into_owned(map: Map, budget: usize) -> Result<BTreeMap<String, String>, LegacyError> {
    let total: usize = map.iter().map(|(k, v)| k.len() + v.len()).sum();
    if total > budget {
        return Err(LegacyError::TooLarge(budget));
    }
    Ok(map
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect())
}

fn pop_to_mark(stack: &mut Vec<Item>) -> Result<Vec<Item>, LegacyError> {
    let mark = stack
        .iter()
        .rposition(|item| matches!(item, Item::Mark))
        .ok_or(LegacyError::StackUnderflow)?;
    let items = stack.split_off(mark + 1);
    stack.pop();
    Ok(items)
}

fn pop_str(stack: &mut Vec<Item>) -> Result<Rc<str>, LegacyError> {
    match stack.pop() {
        Some(Item::Str(s)) => Ok(s),
        Some(_) => Err(LegacyError::NotAStringMap),
        None => Err(LegacyError::StackUnderflow),
    }
}

fn top_dict(stack: &mut [Item]) -> Result<&mut Map, LegacyError> {
    match stack.last_mut() {
        Some(Item::Dict(map)) => Ok(map),
        Some(_) => Err(LegacyError::NotAStringMap),
        None => Err(LegacyError::StackUnderflow),
    }
}

fn insert_pairs(map: &mut Map, items: Vec<Item>) -> Result<(), LegacyError> {
    if items.len() % 2 != 0 {
        return Err(LegacyError::NotAStringMap);
    }
    let mut items = items.into_iter();
    while let (Some(key), Some(value)) = (items.next(), items.next()) {
        match (key, value) {
            (Item::Str(k), Item::Str(v)) => {
                map.insert(k, v);
            }
            _ => return Err(LegacyError::NotAStringMap),
        }
    }
    Ok(())
}

fn read_line<'a>(data: &'a [u8], pos: &mut usize) -> Result<&'a [u8], LegacyError> {
    let rest = data.get(*pos..).ok_or(LegacyError::UnexpectedEof)?;
    let len = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(LegacyError::UnexpectedEof)?;
    *pos += len + 1;
    Ok(&rest[..len])
}

fn read_index(data: &[u8], pos: &mut usize) -> Result<u32, LegacyError> {
    let line = read_line(data, pos)?;
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(LegacyError::BadArgument("memo index"))
}

/// Undo `repr()` quoting of a byte string.
fn unquote(line: &[u8]) -> Result<String, LegacyError> {
    let bad = LegacyError::BadArgument("STRING");
    let (&quote, rest) = line.split_first().ok_or(bad.clone())?;
    if !matches!(quote, b'\'' | b'"') || rest.last() != Some(&quote) {
        return Err(bad);
    }
    let body = &rest[..rest.len() - 1];

    let mut out = String::with_capacity(body.len());
    let mut bytes = body.iter().copied();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(char::from(b));
            continue;
        }
        let escaped = match bytes.next().ok_or(bad.clone())? {
            b'\\' => b'\\',
            b'\'' => b'\'',
            b'"' => b'"',
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'x' => {
                let hi = bytes.next().ok_or(bad.clone())?;
                let lo = bytes.next().ok_or(bad.clone())?;
                hex_byte(hi, lo).ok_or(bad.clone())?
            }
            _ => return Err(bad),
        };
        out.push(char::from(escaped));
    }
    Ok(out)
}

/// Decode `raw-unicode-escape` text; characters above U+00FF are rejected.
fn raw_unicode(line: &[u8]) -> Result<String, LegacyError> {
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < line.len() {
        let b = line[i];
        let digits = match (b, line.get(i + 1)) {
            (b'\\', Some(b'u')) => 4,
            (b'\\', Some(b'U')) => 8,
            _ => 0,
        };
        if digits == 0 {
            out.push(char::from(b));
            i += 1;
            continue;
        }

        let hex = line
            .get(i + 2..i + 2 + digits)
            .ok_or(LegacyError::BadArgument("UNICODE"))?;
        let code = std::str::from_utf8(hex)
            .ok()
            .and_then(|s| u32::from_str_radix(s, 16).ok())
            .ok_or(LegacyError::BadArgument("UNICODE"))?;
        let c = u8::try_from(code).map_err(|_| LegacyError::NotLatin1)?;
        out.push(char::from(c));
        i += 2 + digits;
    }
    Ok(out)
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    let hi = char::from(hi).to_digit(16)?;
    let lo = char::from(lo).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_zero_dict() {
        let data = b"(dp0\nS'Author'\np1\nS'abood'\np2\nsS'Group'\np3\ng2\ns.";
        let map = parse(data).unwrap();
        assert_eq!(map.get("Author").map(String::as_str), Some("abood"));
        assert_eq!(map.get("Group").map(String::as_str), Some("abood"));
    }

    #[test]
    fn test_dict_and_setitems() {
        let data = b"(S'a'\nS'1'\ndp0\n(V'b'\nV\\u00e9\nu.";
        let map = parse(data).unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(map.get("'b'").map(String::as_str), Some("\u{e9}"));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(unquote(b"'it\\'s\\x41\\n'").unwrap(), "it's\x41\n");
        assert_eq!(unquote(b"\"q\"").unwrap(), "q");
        assert!(unquote(b"'open").is_err());
        assert!(unquote(b"'bad\\q'").is_err());
    }

    #[test]
    fn test_rejects_wide_unicode() {
        assert_eq!(raw_unicode(b"\\u0101"), Err(LegacyError::NotLatin1));
    }

    #[test]
    fn test_rejects_other_opcodes() {
        assert!(matches!(
            parse(b"I42\n."),
            Err(LegacyError::UnsupportedOpcode(b'I', 0))
        ));
        assert_eq!(parse(b"(dp0\n"), Err(LegacyError::UnexpectedEof));
        assert_eq!(parse(b"S'x'\n."), Err(LegacyError::NotAStringMap));
        assert_eq!(parse(b"}g7\n."), Err(LegacyError::MissingMemo(7)));
        assert_eq!(parse(b"}p0\ng0\n."), Err(LegacyError::NotAStringMap));
    }

    #[test]
    fn test_expansion_budget() {
        // one long string referenced many times through the memo
        let mut data = b"}S'k'\nS'".to_vec();
        data.extend(std::iter::repeat_n(b'x', 1000));
        data.extend(b"'\np0\ns");
        for i in 0..200 {
            data.extend(format!("S'k{i}'\ng0\ns").as_bytes());
        }
        data.push(b'.');
        assert!(matches!(parse(&data), Err(LegacyError::TooLarge(_))));
    }
}
