//! Control-stream grammar.
//!
//! Every interpreter in the crate (printer, width calculator, bold strip
//! renderer, charmap decoder) reads bytes exclusively through
//! [`StreamCursor`]. The number of operand bytes an extended control code
//! consumes comes from a single table, [`EXT_OPCODES`], so the interpreters
//! cannot drift apart on how far a control code advances the cursor.

pub const CHAR_DYNAMIC: u8 = 0xF7;
pub const CHAR_KEYPAD_ICON: u8 = 0xF8;
pub const CHAR_EXTRA_SYMBOL: u8 = 0xF9;
pub const CHAR_PROMPT_SCROLL: u8 = 0xFA;
pub const CHAR_PROMPT_CLEAR: u8 = 0xFB;
pub const EXT_CTRL_CODE_BEGIN: u8 = 0xFC;
pub const PLACEHOLDER_BEGIN: u8 = 0xFD;
pub const CHAR_NEWLINE: u8 = 0xFE;
pub const EOS: u8 = 0xFF;

/// Glyph codes at or above this value live in the extended half of a
/// font's table (reached through `EXTRA` markers and `ESCAPE`).
pub const EXTENDED_GLYPH_BASE: u16 = 0x100;

pub const PLACEHOLDER_ID_PLAYER: u8 = 0x01;
pub const PLACEHOLDER_ID_STRING_VAR_1: u8 = 0x02;
pub const PLACEHOLDER_ID_STRING_VAR_2: u8 = 0x03;
pub const PLACEHOLDER_ID_STRING_VAR_3: u8 = 0x04;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExtCode {
    Color = 0x01,
    Highlight = 0x02,
    Shadow = 0x03,
    ColorHighlightShadow = 0x04,
    Palette = 0x05,
    Font = 0x06,
    ResetFont = 0x07,
    Pause = 0x08,
    PauseUntilPress = 0x09,
    WaitSe = 0x0A,
    PlayBgm = 0x0B,
    Escape = 0x0C,
    ShiftRight = 0x0D,
    ShiftDown = 0x0E,
    FillWindow = 0x0F,
    PlaySe = 0x10,
    Clear = 0x11,
    Skip = 0x12,
    ClearTo = 0x13,
    MinLetterSpacing = 0x14,
    Jpn = 0x15,
    Eng = 0x16,
    PauseMusic = 0x17,
    ResumeMusic = 0x18,
}

/// One row of the extended opcode table.
#[derive(Copy, Clone, Debug)]
pub struct Opcode {
    pub code: ExtCode,
    pub mnemonic: &'static str,
    pub operands: u8,
}

const fn op(code: ExtCode, mnemonic: &'static str, operands: u8) -> Opcode {
    Opcode {
        code,
        mnemonic,
        operands,
    }
}

/// Ordered by opcode byte, starting at 0x01.
pub const EXT_OPCODES: [Opcode; 24] = [
    op(ExtCode::Color, "COLOR", 1),
    op(ExtCode::Highlight, "HIGHLIGHT", 1),
    op(ExtCode::Shadow, "SHADOW", 1),
    op(ExtCode::ColorHighlightShadow, "COLOR_HIGHLIGHT_SHADOW", 3),
    op(ExtCode::Palette, "PALETTE", 1),
    op(ExtCode::Font, "FONT", 1),
    op(ExtCode::ResetFont, "RESET_FONT", 0),
    op(ExtCode::Pause, "PAUSE", 1),
    op(ExtCode::PauseUntilPress, "PAUSE_UNTIL_PRESS", 0),
    op(ExtCode::WaitSe, "WAIT_SE", 0),
    op(ExtCode::PlayBgm, "PLAY_BGM", 2),
    op(ExtCode::Escape, "ESCAPE", 1),
    op(ExtCode::ShiftRight, "SHIFT_RIGHT", 1),
    op(ExtCode::ShiftDown, "SHIFT_DOWN", 1),
    op(ExtCode::FillWindow, "FILL_WINDOW", 0),
    op(ExtCode::PlaySe, "PLAY_SE", 2),
    op(ExtCode::Clear, "CLEAR", 1),
    op(ExtCode::Skip, "SKIP", 1),
    op(ExtCode::ClearTo, "CLEAR_TO", 1),
    op(ExtCode::MinLetterSpacing, "MIN_LETTER_SPACING", 1),
    op(ExtCode::Jpn, "JPN", 0),
    op(ExtCode::Eng, "ENG", 0),
    op(ExtCode::PauseMusic, "PAUSE_MUSIC", 0),
    op(ExtCode::ResumeMusic, "RESUME_MUSIC", 0),
];

impl ExtCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        let index = (byte as usize).checked_sub(1)?;
        EXT_OPCODES.get(index).map(|op| op.code)
    }

    pub fn from_mnemonic(name: &str) -> Option<Self> {
        EXT_OPCODES
            .iter()
            .find(|op| op.mnemonic.eq_ignore_ascii_case(name))
            .map(|op| op.code)
    }

    pub fn opcode(self) -> &'static Opcode {
        &EXT_OPCODES[self as usize - 1]
    }

    pub fn mnemonic(self) -> &'static str {
        self.opcode().mnemonic
    }

    pub fn operand_len(self) -> usize {
        self.opcode().operands as usize
    }
}

/// A decoded extended control code together with its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Color(u8),
    Highlight(u8),
    Shadow(u8),
    ColorHighlightShadow { fg: u8, bg: u8, shadow: u8 },
    Palette(u8),
    Font(u8),
    /// Consumes no operand and leaves the active font unchanged.
    ResetFont,
    Pause(u8),
    PauseUntilPress,
    WaitSoundEffect,
    PlayMusic(u16),
    /// Prints glyph `0x100 + operand`.
    Escape(u8),
    PlaySoundEffect(u16),
    ShiftRight(u8),
    ShiftDown(u8),
    FillWindow,
    Clear(u8),
    Skip(u8),
    ClearTo(u8),
    MinLetterSpacing(u8),
    Japanese,
    English,
    PauseMusic,
    ResumeMusic,
    /// Opcode byte outside the table; consumes no operands.
    Unknown(u8),
}

impl Control {
    fn decode(code: ExtCode, ops: [u8; 3]) -> Self {
        let word = u16::from_le_bytes([ops[0], ops[1]]);
        match code {
            ExtCode::Color => Control::Color(ops[0]),
            ExtCode::Highlight => Control::Highlight(ops[0]),
            ExtCode::Shadow => Control::Shadow(ops[0]),
            ExtCode::ColorHighlightShadow => Control::ColorHighlightShadow {
                fg: ops[0],
                bg: ops[1],
                shadow: ops[2],
            },
            ExtCode::Palette => Control::Palette(ops[0]),
            ExtCode::Font => Control::Font(ops[0]),
            ExtCode::ResetFont => Control::ResetFont,
            ExtCode::Pause => Control::Pause(ops[0]),
            ExtCode::PauseUntilPress => Control::PauseUntilPress,
            ExtCode::WaitSe => Control::WaitSoundEffect,
            ExtCode::PlayBgm => Control::PlayMusic(word),
            ExtCode::Escape => Control::Escape(ops[0]),
            ExtCode::ShiftRight => Control::ShiftRight(ops[0]),
            ExtCode::ShiftDown => Control::ShiftDown(ops[0]),
            ExtCode::FillWindow => Control::FillWindow,
            ExtCode::PlaySe => Control::PlaySoundEffect(word),
            ExtCode::Clear => Control::Clear(ops[0]),
            ExtCode::Skip => Control::Skip(ops[0]),
            ExtCode::ClearTo => Control::ClearTo(ops[0]),
            ExtCode::MinLetterSpacing => Control::MinLetterSpacing(ops[0]),
            ExtCode::Jpn => Control::Japanese,
            ExtCode::Eng => Control::English,
            ExtCode::PauseMusic => Control::PauseMusic,
            ExtCode::ResumeMusic => Control::ResumeMusic,
        }
    }
}

/// One unit of the control stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    End,
    Newline,
    Placeholder(u8),
    Dynamic(u8),
    PromptClear,
    PromptScroll,
    KeypadIcon(u8),
    ExtraSymbol(u8),
    Control(Control),
    Glyph(u8),
}

impl Token {
    /// Glyph code to decode for tokens that print a font glyph.
    pub fn glyph_code(&self) -> Option<u16> {
        match *self {
            Token::Glyph(b) => Some(b as u16),
            Token::ExtraSymbol(b) | Token::Control(Control::Escape(b)) => {
                Some(EXTENDED_GLYPH_BASE + b as u16)
            }
            _ => None,
        }
    }
}

/// Where a token started and how many bytes it consumed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TokenTrace {
    pub offset: usize,
    pub lead: u8,
    pub ext: Option<u8>,
    pub len: usize,
}

/// Non-owning read cursor over a caller's control stream.
///
/// Reading past the end of the slice yields [`EOS`], so an unterminated
/// slice still finishes.
#[derive(Copy, Clone, Debug)]
pub struct StreamCursor<'s> {
    bytes: &'s [u8],
    pos: usize,
}

impl<'s> StreamCursor<'s> {
    pub fn new(bytes: &'s [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn bytes(&self) -> &'s [u8] {
        self.bytes
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(EOS)
    }

    fn next_byte(&mut self) -> u8 {
        let b = self.peek();
        self.pos = self.pos.saturating_add(1);
        b
    }

    pub fn next_token(&mut self) -> Token {
        self.read().0
    }

    /// Reads one token and reports the bytes it consumed.
    pub fn read(&mut self) -> (Token, TokenTrace) {
        let offset = self.pos;
        let lead = self.next_byte();
        let mut ext = None;
        let token = match lead {
            EOS => Token::End,
            CHAR_NEWLINE => Token::Newline,
            PLACEHOLDER_BEGIN => Token::Placeholder(self.next_byte()),
            CHAR_DYNAMIC => Token::Dynamic(self.next_byte()),
            CHAR_PROMPT_CLEAR => Token::PromptClear,
            CHAR_PROMPT_SCROLL => Token::PromptScroll,
            CHAR_KEYPAD_ICON => Token::KeypadIcon(self.next_byte()),
            CHAR_EXTRA_SYMBOL => Token::ExtraSymbol(self.next_byte()),
            EXT_CTRL_CODE_BEGIN => {
                let byte = self.next_byte();
                ext = Some(byte);
                match ExtCode::from_byte(byte) {
                    Some(code) => {
                        let mut ops = [0u8; 3];
                        for slot in ops.iter_mut().take(code.operand_len()) {
                            *slot = self.next_byte();
                        }
                        Token::Control(Control::decode(code, ops))
                    }
                    None => Token::Control(Control::Unknown(byte)),
                }
            }
            other => Token::Glyph(other),
        };
        let trace = TokenTrace {
            offset,
            lead,
            ext,
            len: self.pos - offset,
        };
        (token, trace)
    }

    /// Iterates the remaining tokens up to and including [`Token::End`].
    pub fn tokens(self) -> Tokens<'s> {
        Tokens {
            cursor: self,
            done: false,
        }
    }
}

pub struct Tokens<'s> {
    cursor: StreamCursor<'s>,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.cursor.next_token();
        if token == Token::End {
            self.done = true;
        }
        Some(token)
    }
}
