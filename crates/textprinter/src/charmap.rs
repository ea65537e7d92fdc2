//! Conversion between readable text and the game's byte encoding.
//!
//! Plain characters map through the Latin character table. Markup:
//!
//! * `\n` (or a line break) newline, `\p` wait then clear, `\l` wait then
//!   scroll;
//! * `{MNEMONIC args..}` extended control codes, e.g. `{COLOR RED}`,
//!   `{PAUSE 30}`, `{PLAY_SE 0x15}`;
//! * `{A_BUTTON}` and the other keypad icon names;
//! * `{PLAYER}`, `{STR_VAR_1}`..`{STR_VAR_3}`, `{PLACEHOLDER n}`,
//!   `{DYNAMIC n}`, `{EXTRA n}`;
//! * `{0xNN}` a raw byte.

use std::collections::HashMap;
use std::fmt::Write;

use once_cell::sync::Lazy;

use crate::{
    color::*,
    control::*,
    error::{Result, TextError},
    icons::{keypad_icon, keypad_icon_by_name},
};

const LATIN: &[(char, u8)] = &[
    (' ', 0x00),
    ('À', 0x01),
    ('Á', 0x02),
    ('Â', 0x03),
    ('Ç', 0x04),
    ('È', 0x05),
    ('É', 0x06),
    ('Ê', 0x07),
    ('Ë', 0x08),
    ('Ì', 0x09),
    ('Î', 0x0B),
    ('Ï', 0x0C),
    ('Ò', 0x0D),
    ('Ó', 0x0E),
    ('Ô', 0x0F),
    ('Œ', 0x10),
    ('Ù', 0x11),
    ('Ú', 0x12),
    ('Û', 0x13),
    ('Ñ', 0x14),
    ('ß', 0x15),
    ('à', 0x16),
    ('á', 0x17),
    ('ç', 0x19),
    ('è', 0x1A),
    ('é', 0x1B),
    ('ê', 0x1C),
    ('ë', 0x1D),
    ('ì', 0x1E),
    ('î', 0x20),
    ('ï', 0x21),
    ('ò', 0x22),
    ('ó', 0x23),
    ('ô', 0x24),
    ('œ', 0x25),
    ('ù', 0x26),
    ('ú', 0x27),
    ('û', 0x28),
    ('ñ', 0x29),
    ('º', 0x2A),
    ('ª', 0x2B),
    ('&', 0x2D),
    ('+', 0x2E),
    ('=', 0x35),
    (';', 0x36),
    ('¿', 0x51),
    ('¡', 0x52),
    ('Í', 0x5A),
    ('%', 0x5B),
    ('(', 0x5C),
    (')', 0x5D),
    ('â', 0x68),
    ('í', 0x6F),
    ('<', 0x85),
    ('>', 0x86),
    ('0', 0xA1),
    ('1', 0xA2),
    ('2', 0xA3),
    ('3', 0xA4),
    ('4', 0xA5),
    ('5', 0xA6),
    ('6', 0xA7),
    ('7', 0xA8),
    ('8', 0xA9),
    ('9', 0xAA),
    ('!', 0xAB),
    ('?', 0xAC),
    ('.', 0xAD),
    ('-', 0xAE),
    ('·', 0xAF),
    ('…', 0xB0),
    ('“', 0xB1),
    ('”', 0xB2),
    ('‘', 0xB3),
    ('’', 0xB4),
    ('\'', 0xB4),
    ('♂', 0xB5),
    ('♀', 0xB6),
    ('$', 0xB7),
    (',', 0xB8),
    ('×', 0xB9),
    ('/', 0xBA),
    ('▶', 0xEF),
    (':', 0xF0),
    ('Ä', 0xF1),
    ('Ö', 0xF2),
    ('Ü', 0xF3),
    ('ä', 0xF4),
    ('ö', 0xF5),
    ('ü', 0xF6),
];

static ENCODE: Lazy<HashMap<char, u8>> = Lazy::new(|| {
    let mut map: HashMap<char, u8> = LATIN.iter().copied().collect();
    for (i, c) in ('A'..='Z').enumerate() {
        map.insert(c, 0xBB + i as u8);
    }
    for (i, c) in ('a'..='z').enumerate() {
        map.insert(c, 0xD5 + i as u8);
    }
    map
});

static DECODE: Lazy<HashMap<u8, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (&c, &b) in ENCODE.iter() {
        // ASCII apostrophe and the typographic one share a code
        if c != '\'' {
            map.insert(b, c);
        }
    }
    map
});

const COLOR_NAMES: [(&str, u8); 10] = [
    ("TRANSPARENT", TEXT_COLOR_TRANSPARENT),
    ("WHITE", TEXT_COLOR_WHITE),
    ("DARK_GRAY", TEXT_COLOR_DARK_GRAY),
    ("LIGHT_GRAY", TEXT_COLOR_LIGHT_GRAY),
    ("RED", TEXT_COLOR_RED),
    ("LIGHT_RED", TEXT_COLOR_LIGHT_RED),
    ("GREEN", TEXT_COLOR_GREEN),
    ("LIGHT_GREEN", TEXT_COLOR_LIGHT_GREEN),
    ("BLUE", TEXT_COLOR_BLUE),
    ("LIGHT_BLUE", TEXT_COLOR_LIGHT_BLUE),
];

pub fn char_code(c: char) -> Option<u8> {
    ENCODE.get(&c).copied()
}

pub fn code_char(code: u8) -> Option<char> {
    DECODE.get(&code).copied()
}

fn parse_number(arg: &str) -> Result<u16> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => arg.parse::<u16>(),
    };
    parsed.map_err(|_| TextError::Parse(format!("bad number {arg:?}")))
}

fn parse_byte(arg: &str) -> Result<u8> {
    if let Some((_, value)) = COLOR_NAMES.iter().find(|(name, _)| name.eq_ignore_ascii_case(arg)) {
        return Ok(*value);
    }
    let n = parse_number(arg)?;
    u8::try_from(n).map_err(|_| TextError::Parse(format!("{arg} does not fit in a byte")))
}

fn encode_directive(body: &str, out: &mut Vec<u8>) -> Result<()> {
    let mut words = body.split_whitespace();
    let name = words
        .next()
        .ok_or_else(|| TextError::Parse("empty {} directive".to_string()))?;
    let args: Vec<&str> = words.collect();
    let upper = name.to_ascii_uppercase();

    let single = |args: &[&str]| -> Result<u8> {
        match args {
            [arg] => parse_byte(arg),
            _ => Err(TextError::Parse(format!("{name} takes one argument"))),
        }
    };

    if let Some(code) = ExtCode::from_mnemonic(&upper) {
        out.push(EXT_CTRL_CODE_BEGIN);
        out.push(code as u8);
        match code {
            ExtCode::PlayBgm | ExtCode::PlaySe => {
                let [arg] = args.as_slice() else {
                    return Err(TextError::Parse(format!("{name} takes one argument")));
                };
                out.extend_from_slice(&parse_number(arg)?.to_le_bytes());
            }
            _ => {
                if args.len() != code.operand_len() {
                    return Err(TextError::Parse(format!(
                        "{name} takes {} argument(s), got {}",
                        code.operand_len(),
                        args.len()
                    )));
                }
                for arg in &args {
                    out.push(parse_byte(arg)?);
                }
            }
        }
        return Ok(());
    }

    if let Some(id) = keypad_icon_by_name(&upper) {
        out.extend_from_slice(&[CHAR_KEYPAD_ICON, id]);
        return Ok(());
    }

    match upper.as_str() {
        "PLAYER" => out.extend_from_slice(&[PLACEHOLDER_BEGIN, PLACEHOLDER_ID_PLAYER]),
        "STR_VAR_1" => out.extend_from_slice(&[PLACEHOLDER_BEGIN, PLACEHOLDER_ID_STRING_VAR_1]),
        "STR_VAR_2" => out.extend_from_slice(&[PLACEHOLDER_BEGIN, PLACEHOLDER_ID_STRING_VAR_2]),
        "STR_VAR_3" => out.extend_from_slice(&[PLACEHOLDER_BEGIN, PLACEHOLDER_ID_STRING_VAR_3]),
        "PLACEHOLDER" => out.extend_from_slice(&[PLACEHOLDER_BEGIN, single(&args)?]),
        "DYNAMIC" => out.extend_from_slice(&[CHAR_DYNAMIC, single(&args)?]),
        "EXTRA" => out.extend_from_slice(&[CHAR_EXTRA_SYMBOL, single(&args)?]),
        _ if args.is_empty() && upper.starts_with("0X") => out.push(parse_byte(name)?),
        _ => return Err(TextError::Parse(format!("unknown directive {{{body}}}"))),
    }
    Ok(())
}

/// Encodes `text` and appends the end marker.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() + 1);
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\n' => out.push(CHAR_NEWLINE),
            '\\' => match chars.next() {
                Some('n') => out.push(CHAR_NEWLINE),
                Some('p') => out.push(CHAR_PROMPT_CLEAR),
                Some('l') => out.push(CHAR_PROMPT_SCROLL),
                other => {
                    return Err(TextError::Parse(format!(
                        "unknown escape \\{}",
                        other.map(String::from).unwrap_or_default()
                    )))
                }
            },
            '{' => {
                let body: String = chars.by_ref().take_while(|c| *c != '}').collect();
                encode_directive(&body, &mut out)?;
            }
            c => out.push(char_code(c).ok_or(TextError::UnknownChar(c))?),
        }
    }
    out.push(EOS);
    Ok(out)
}

fn control_text(control: Control) -> String {
    let (code, args): (u8, Vec<u16>) = match control {
        Control::Color(v) => (ExtCode::Color as u8, vec![v as u16]),
        Control::Highlight(v) => (ExtCode::Highlight as u8, vec![v as u16]),
        Control::Shadow(v) => (ExtCode::Shadow as u8, vec![v as u16]),
        Control::ColorHighlightShadow { fg, bg, shadow } => (
            ExtCode::ColorHighlightShadow as u8,
            vec![fg as u16, bg as u16, shadow as u16],
        ),
        Control::Palette(v) => (ExtCode::Palette as u8, vec![v as u16]),
        Control::Font(v) => (ExtCode::Font as u8, vec![v as u16]),
        Control::ResetFont => (ExtCode::ResetFont as u8, vec![]),
        Control::Pause(v) => (ExtCode::Pause as u8, vec![v as u16]),
        Control::PauseUntilPress => (ExtCode::PauseUntilPress as u8, vec![]),
        Control::WaitSoundEffect => (ExtCode::WaitSe as u8, vec![]),
        Control::PlayMusic(id) => (ExtCode::PlayBgm as u8, vec![id]),
        Control::Escape(v) => (ExtCode::Escape as u8, vec![v as u16]),
        Control::PlaySoundEffect(id) => (ExtCode::PlaySe as u8, vec![id]),
        Control::ShiftRight(v) => (ExtCode::ShiftRight as u8, vec![v as u16]),
        Control::ShiftDown(v) => (ExtCode::ShiftDown as u8, vec![v as u16]),
        Control::FillWindow => (ExtCode::FillWindow as u8, vec![]),
        Control::Clear(v) => (ExtCode::Clear as u8, vec![v as u16]),
        Control::Skip(v) => (ExtCode::Skip as u8, vec![v as u16]),
        Control::ClearTo(v) => (ExtCode::ClearTo as u8, vec![v as u16]),
        Control::MinLetterSpacing(v) => (ExtCode::MinLetterSpacing as u8, vec![v as u16]),
        Control::Japanese => (ExtCode::Jpn as u8, vec![]),
        Control::English => (ExtCode::Eng as u8, vec![]),
        Control::PauseMusic => (ExtCode::PauseMusic as u8, vec![]),
        Control::ResumeMusic => (ExtCode::ResumeMusic as u8, vec![]),
        Control::Unknown(code) => return format!("{{0x{EXT_CTRL_CODE_BEGIN:02X}}}{{0x{code:02X}}}"),
    };
    let mut s = String::from("{");
    s.push_str(ExtCode::from_byte(code).map_or("?", ExtCode::mnemonic));
    for arg in args {
        let _ = write!(s, " {arg}");
    }
    s.push('}');
    s
}

/// Renders an encoded stream as markup accepted by [`encode`]. Stops at
/// the end marker.
pub fn decode(stream: &[u8]) -> String {
    let mut out = String::new();
    for token in StreamCursor::new(stream).tokens() {
        match token {
            Token::End => break,
            Token::Newline => out.push('\n'),
            Token::PromptClear => out.push_str("\\p"),
            Token::PromptScroll => out.push_str("\\l"),
            Token::Placeholder(id) => match id {
                PLACEHOLDER_ID_PLAYER => out.push_str("{PLAYER}"),
                PLACEHOLDER_ID_STRING_VAR_1..=PLACEHOLDER_ID_STRING_VAR_3 => {
                    let _ = write!(out, "{{STR_VAR_{}}}", id - 1);
                }
                _ => {
                    let _ = write!(out, "{{PLACEHOLDER {id}}}");
                }
            },
            Token::Dynamic(id) => {
                let _ = write!(out, "{{DYNAMIC {id}}}");
            }
            Token::ExtraSymbol(id) => {
                let _ = write!(out, "{{EXTRA {id}}}");
            }
            Token::KeypadIcon(id) => match keypad_icon(id) {
                Some(icon) => {
                    let _ = write!(out, "{{{}}}", icon.name);
                }
                None => {
                    let _ = write!(out, "{{0x{CHAR_KEYPAD_ICON:02X}}}{{0x{id:02X}}}");
                }
            },
            Token::Control(control) => out.push_str(&control_text(control)),
            Token::Glyph(b) => match code_char(b) {
                Some(c) => out.push(c),
                None => {
                    let _ = write!(out, "{{0x{b:02X}}}");
                }
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_letters_and_digits() {
        assert_eq!(encode("Hi 5!").unwrap(), vec![0xC2, 0xDD, 0x00, 0xA6, 0xAB, EOS]);
    }

    #[test]
    fn encodes_markup() {
        let bytes = encode("{COLOR RED}A\\p{PLAY_SE 0x115}{STR_VAR_2}{A_BUTTON}{0x7F}").unwrap();
        assert_eq!(
            bytes,
            vec![
                0xFC, 0x01, 0x04, 0xBB, 0xFB, 0xFC, 0x10, 0x15, 0x01, 0xFD, 0x03, 0xF8, 0x00,
                0x7F, EOS
            ]
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(encode("~"), Err(TextError::UnknownChar('~'))));
        assert!(encode("{COLOR}").is_err());
        assert!(encode("{NOPE}").is_err());
        assert!(encode("\\q").is_err());
    }

    #[test]
    fn decode_inverts_encode() {
        let text = "It’s {PLAYER}!\n{COLOR_HIGHLIGHT_SHADOW 2 1 3}{PAUSE 8}é{EXTRA 3}\\l{0x60}";
        assert_eq!(decode(&encode(text).unwrap()), text);
    }
}
