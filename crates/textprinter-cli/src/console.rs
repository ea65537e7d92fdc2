use textprinter::TileBuffer;

// 256-color terminal codes for palette indices 0..=15
const ANSI_PALETTE: [u8; 16] = [
    0, 15, 240, 250, 160, 210, 34, 120, 25, 117, 94, 178, 90, 213, 8, 16,
];

/// Renders a window buffer for the terminal: one colored half block per
/// two pixel rows when `ansi` is set, hex digits otherwise.
pub fn window_to_string(buf: &TileBuffer, ansi: bool) -> String {
    if !ansi {
        return buf.to_text();
    }
    let mut out = String::new();
    for y in (0..buf.height()).step_by(2) {
        for x in 0..buf.width() {
            let top = ANSI_PALETTE[(buf.pixel(x, y) & 0xF) as usize];
            let bottom = ANSI_PALETTE[(buf.pixel(x, y + 1) & 0xF) as usize];
            out.push_str(&format!("\x1B[38;5;{top}m\x1B[48;5;{bottom}m\u{2580}"));
        }
        out.push_str("\x1B[0m\n");
    }
    out
}

/// Space separated upper case hex.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts `FC 01 02`, `fc0102` or `0xFC,0x01`.
pub fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|part| part.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    if !digits.is_ascii() || digits.len() % 2 != 0 {
        anyhow::bail!("not an even run of hex digits: {text:?}");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| anyhow::anyhow!("bad hex byte {:?}", &digits[i..i + 2]))
        })
        .collect()
}
