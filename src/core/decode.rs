use serde::Deserialize;

/// How bytes that are not valid UTF-8 are handled when captured output is decoded.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Drop invalid sequences.
    #[default]
    Ignore,
    /// Substitute U+FFFD for each invalid sequence.
    Replace,
}

impl DecodePolicy {
    pub fn to_str(&self) -> &str {
        match self {
            DecodePolicy::Ignore => "ignore",
            DecodePolicy::Replace => "replace",
        }
    }
}

/// Decode captured process output as text. Never fails.
///
/// Line endings are normalised to `\n`: both `\r\n` and a lone `\r` become `\n`.
pub fn decode_output(bytes: &[u8], policy: DecodePolicy) -> String {
    let text = match policy {
        DecodePolicy::Replace => String::from_utf8_lossy(bytes).into_owned(),
        DecodePolicy::Ignore => {
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
            }
            text
        }
    };

    normalize_newlines(&text)
}

fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}
