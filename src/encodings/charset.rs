use strum::{Display, EnumString};

/// The character sets a string encoding may name. Decoding is always
/// lossy: malformed input turns into replacement characters rather than
/// failing the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum Charset {
    #[default]
    #[strum(serialize = "UTF-8")]
    Utf8,
    #[strum(serialize = "UTF-16")]
    Utf16,
    #[strum(serialize = "UTF-16LE")]
    Utf16Le,
    #[strum(serialize = "UTF-16BE")]
    Utf16Be,
    #[strum(serialize = "US-ASCII")]
    UsAscii,
    #[strum(serialize = "ISO-8859-1")]
    Iso8859_1,
    #[strum(serialize = "Windows-1252")]
    Windows1252,
}

impl Charset {
    /// Width of one code unit in bytes; zero-padding is stripped in these
    /// steps so a null-padded UTF-16 string keeps its final code unit.
    pub fn unit_bytes(&self) -> usize {
        match self {
            Charset::Utf16 | Charset::Utf16Le | Charset::Utf16Be => 2,
            _ => 1,
        }
    }

    /// Unrepresentable characters become `?` in the single-byte sets.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => text.as_bytes().to_vec(),
            Charset::Utf16 => {
                // BOM followed by little-endian units.
                let mut out = vec![0xFF, 0xFE];
                out.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));
                out
            }
            Charset::Utf16Le => text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect(),
            Charset::Utf16Be => text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
            Charset::UsAscii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Charset::Iso8859_1 => text
                .chars()
                .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
                .collect(),
            Charset::Windows1252 => text.chars().map(windows_1252_byte).collect(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                rest => decode_utf16(rest, u16::from_le_bytes),
            },
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| if b < 0x80 { b as char } else { '\u{FFFD}' })
                .collect(),
            Charset::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
            Charset::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let mut units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    if bytes.len() % 2 != 0 {
        units.push(0xFFFD);
    }
    String::from_utf16_lossy(&units)
}

/// Code points for bytes 0x80..=0x9F, where Windows-1252 departs from
/// Latin-1. Unassigned slots map to the replacement character.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}', '\u{017D}', '\u{FFFD}',
    '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
];

fn windows_1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINDOWS_1252_HIGH[(byte - 0x80) as usize],
        other => other as char,
    }
}

fn windows_1252_byte(c: char) -> u8 {
    if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) {
        return c as u8;
    }
    WINDOWS_1252_HIGH
        .iter()
        .position(|&m| m == c && m != '\u{FFFD}')
        .map(|index| 0x80 + index as u8)
        .unwrap_or(b'?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for (name, charset) in [
            ("UTF-8", Charset::Utf8),
            ("UTF-16", Charset::Utf16),
            ("UTF-16LE", Charset::Utf16Le),
            ("UTF-16BE", Charset::Utf16Be),
            ("US-ASCII", Charset::UsAscii),
            ("ISO-8859-1", Charset::Iso8859_1),
            ("Windows-1252", Charset::Windows1252),
        ] {
            assert_eq!(name.parse::<Charset>().unwrap(), charset);
            assert_eq!(charset.to_string(), name);
        }
    }

    #[test]
    fn utf16_bom_and_order() {
        assert_eq!(
            Charset::Utf16.encode("Hi"),
            vec![0xFF, 0xFE, b'H', 0x00, b'i', 0x00]
        );
        assert_eq!(Charset::Utf16Be.encode("Hi"), vec![0x00, b'H', 0x00, b'i']);
        assert_eq!(
            Charset::Utf16.decode(&[0xFF, 0xFE, b'H', 0x00, b'i', 0x00]),
            "Hi"
        );
        assert_eq!(Charset::Utf16.decode(&[0xFE, 0xFF, 0x00, b'H']), "H");
    }

    #[test]
    fn ascii_replacement() {
        assert_eq!(Charset::UsAscii.encode("héllo"), b"h?llo".to_vec());
        assert_eq!(Charset::UsAscii.decode(&[0x41, 0xC3]), "A\u{FFFD}");
    }

    #[test]
    fn latin1_and_1252() {
        assert_eq!(Charset::Iso8859_1.encode("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(Charset::Iso8859_1.decode(&[0xE9]), "é");
        assert_eq!(Charset::Windows1252.encode("€"), vec![0x80]);
        assert_eq!(Charset::Windows1252.decode(&[0x80]), "€");
        assert_eq!(Charset::Windows1252.decode(&[0x81]), "\u{FFFD}");
    }
}
