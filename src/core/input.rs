//! Keyboard input decoding for raw terminal chunks.
//!
//! Handles legacy sequences (`\r`, `\x7f`, `ESC [ A`, `ESC O A`, control
//! bytes) and kitty keyboard protocol `CSI ... u` / `CSI 1;mods:event X`
//! reports, which carry the press/repeat/release event type.

const MOD_SHIFT: u32 = 1;
const MOD_ALT: u32 = 2;
const MOD_CTRL: u32 = 4;
const MOD_CAPS_LOCK: u32 = 64;

const CODEPOINT_TAB: u32 = 9;
const CODEPOINT_ENTER: u32 = 13;
const CODEPOINT_ESCAPE: u32 = 27;
const CODEPOINT_BACKSPACE: u32 = 127;
const CODEPOINT_KP_ENTER: u32 = 57414;
/// Private-use range kitty assigns to functional keys (modifiers, keypad, media).
const FUNCTIONAL_KEYS: std::ops::RangeInclusive<u32> = 57344..=63743;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Tab,
    Escape,
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+D.
    EndOfInput,
    /// Ctrl+L.
    ClearScreen,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub event_type: KeyEventType,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            event_type: KeyEventType::Press,
        }
    }

    pub fn repeat(key: Key) -> Self {
        Self {
            key,
            event_type: KeyEventType::Repeat,
        }
    }

    /// Held-key auto-repeat rather than a discrete press.
    pub fn is_repeat(&self) -> bool {
        self.event_type == KeyEventType::Repeat
    }
}

/// Decodes every key press/repeat in a raw chunk. Releases and unknown
/// sequences are dropped.
pub fn parse_keys(data: &str) -> Vec<KeyEvent> {
    split_sequences(data)
        .into_iter()
        .filter_map(parse_key_event)
        .filter(|event| event.event_type != KeyEventType::Release)
        .collect()
}

/// Splits a chunk into individual escape sequences and characters.
pub fn split_sequences(data: &str) -> Vec<&str> {
    let bytes = data.as_bytes();
    let mut sequences = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let end = if bytes[start] == 0x1b {
            escape_sequence_end(bytes, start)
        } else {
            start
                + data[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8)
        };
        sequences.push(&data[start..end]);
        start = end;
    }

    sequences
}

fn escape_sequence_end(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start + 1) {
        Some(b'[') => {
            let mut index = start + 2;
            while index < bytes.len() {
                let byte = bytes[index];
                index += 1;
                if (0x40..=0x7e).contains(&byte) {
                    return index;
                }
            }
            bytes.len()
        }
        Some(b'O') => match bytes.get(start + 2) {
            Some(byte) if byte.is_ascii() => start + 3,
            _ => start + 2,
        },
        Some(byte) if byte.is_ascii() && *byte != 0x1b => start + 2,
        _ => start + 1,
    }
}

/// Decodes a single sequence produced by [`split_sequences`].
pub fn parse_key_event(sequence: &str) -> Option<KeyEvent> {
    let key = match sequence {
        "\r" | "\n" => Key::Enter,
        "\x7f" | "\x08" => Key::Backspace,
        "\t" => Key::Tab,
        "\x03" => Key::Interrupt,
        "\x04" => Key::EndOfInput,
        "\x0c" => Key::ClearScreen,
        "\x1b" => Key::Escape,
        "\x1b[A" | "\x1bOA" => Key::Up,
        "\x1b[B" | "\x1bOB" => Key::Down,
        "\x1b[C" | "\x1bOC" => Key::Right,
        "\x1b[D" | "\x1bOD" => Key::Left,
        _ => {
            if let Some(body) = sequence.strip_prefix("\x1b[") {
                return parse_csi(body);
            }
            let mut chars = sequence.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if !ch.is_control() => Key::Char(ch),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::press(key))
}

fn parse_csi(body: &str) -> Option<KeyEvent> {
    let final_byte = body.chars().last()?;
    let params = &body[..body.len() - final_byte.len_utf8()];
    let mut fields = params.split(';');
    let key_field = fields.next().unwrap_or("");
    let modifier_field = fields.next().unwrap_or("");

    let (modifiers, event_type) = parse_modifier_field(modifier_field)?;

    match final_byte {
        'u' => {
            let mut codes = key_field.split(':');
            let codepoint: u32 = codes.next()?.parse().ok()?;
            let shifted: Option<u32> = codes.next().and_then(|value| value.parse().ok());
            let key = kitty_key(codepoint, shifted, modifiers)?;
            Some(KeyEvent { key, event_type })
        }
        'A' | 'B' | 'C' | 'D' => {
            if !key_field.is_empty() && key_field != "1" {
                return None;
            }
            let key = match final_byte {
                'A' => Key::Up,
                'B' => Key::Down,
                'C' => Key::Right,
                _ => Key::Left,
            };
            Some(KeyEvent { key, event_type })
        }
        _ => None,
    }
}

fn parse_modifier_field(field: &str) -> Option<(u32, KeyEventType)> {
    if field.is_empty() {
        return Some((0, KeyEventType::Press));
    }

    let mut parts = field.split(':');
    let raw_modifiers: u32 = parts.next()?.parse().ok()?;
    let event_type = match parts.next() {
        None | Some("1") => KeyEventType::Press,
        Some("2") => KeyEventType::Repeat,
        Some("3") => KeyEventType::Release,
        Some(_) => return None,
    };

    Some((raw_modifiers.saturating_sub(1), event_type))
}

fn kitty_key(codepoint: u32, shifted: Option<u32>, modifiers: u32) -> Option<Key> {
    let ctrl = modifiers & MOD_CTRL != 0;
    let alt = modifiers & MOD_ALT != 0;
    let shift = modifiers & MOD_SHIFT != 0;
    let caps_lock = modifiers & MOD_CAPS_LOCK != 0;

    match codepoint {
        CODEPOINT_ENTER | CODEPOINT_KP_ENTER => return Some(Key::Enter),
        CODEPOINT_TAB => return Some(Key::Tab),
        CODEPOINT_BACKSPACE => return Some(Key::Backspace),
        CODEPOINT_ESCAPE => return Some(Key::Escape),
        code if FUNCTIONAL_KEYS.contains(&code) => return None,
        _ => {}
    }

    if ctrl && !alt {
        return match char::from_u32(codepoint)?.to_ascii_lowercase() {
            'c' => Some(Key::Interrupt),
            'd' => Some(Key::EndOfInput),
            'l' => Some(Key::ClearScreen),
            _ => None,
        };
    }
    if ctrl || alt {
        return None;
    }

    let ch = match (shift, shifted) {
        (true, Some(shifted)) => char::from_u32(shifted)?,
        (true, None) => char::from_u32(codepoint)?.to_ascii_uppercase(),
        (false, _) if caps_lock => char::from_u32(codepoint)?.to_ascii_uppercase(),
        (false, _) => char::from_u32(codepoint)?,
    };
    if ch.is_control() {
        return None;
    }
    Some(Key::Char(ch))
}
