//! Pattern specification text format
//!
//! A specification is a `:`-separated list of `key=value` arguments. Every
//! `val` argument starts a pattern entry whose value is a comma-separated list
//! of hexadecimal byte tokens (`val=4d,5a`). An `opt` argument directly after
//! a `val` sets that entry's opacity (hexadecimal) followed by optional flag
//! words `state` (persist opacity) and `event` (emit match counts), e.g.
//! `val=de,ad:opt=80,event`. Entries without `opt` use
//! [`DEFAULT_PATTERN_ALPHA`] with the event flag. The entry index is the
//! pattern identifier.

use crate::algorithm::patterns::PatternFlags;
use crate::io::configuration::DEFAULT_PATTERN_ALPHA;
use crate::io::error::{ChannelError, Result, try_filled};

/// One parsed specification entry, ready for registration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternEntry {
    /// Identifier (the entry index)
    pub id: u32,
    /// Byte sequence to match
    pub bytes: Vec<u8>,
    /// Opacity painted on match
    pub alpha: u8,
    /// Match behavior
    pub flags: PatternFlags,
}

/// Parse a comma-separated list of hexadecimal byte tokens
///
/// The first pass validates and counts the tokens, the second allocates
/// exactly that many bytes and fills them.
///
/// # Errors
///
/// Returns [`ChannelError::MalformedPattern`] for an empty list, an empty
/// token, or a token that is not a hexadecimal value in `00..=ff`
pub fn parse_byte_tokens(entry: usize, text: &str) -> Result<Vec<u8>> {
    let mut count = 0;
    for token in text.split(',') {
        parse_hex_byte(entry, token)?;
        count += 1;
    }

    let mut bytes = try_filled(count, 0u8, "pattern bytes")?;
    for (slot, token) in bytes.iter_mut().zip(text.split(',')) {
        *slot = parse_hex_byte(entry, token)?;
    }
    Ok(bytes)
}

/// Parse an `opt` value into opacity and flags
///
/// # Errors
///
/// Returns [`ChannelError::MalformedPattern`] if the opacity is not a
/// hexadecimal byte or a flag word is unknown
pub fn parse_options(entry: usize, text: &str) -> Result<(u8, PatternFlags)> {
    let mut tokens = text.split(',');
    let alpha = parse_hex_byte(entry, tokens.next().unwrap_or_default())?;

    let mut flags = PatternFlags::NONE;
    for token in tokens {
        match token.trim() {
            "state" => flags.persist = true,
            "event" => flags.emit_event = true,
            other => {
                return Err(ChannelError::MalformedPattern {
                    entry,
                    token: other.to_string(),
                    reason: "unknown flag, expected 'state' or 'event'",
                });
            }
        }
    }
    Ok((alpha, flags))
}

/// Parse a whole specification into per-entry results
///
/// A malformed entry yields an error in its slot without affecting the
/// entries around it. Unknown keys are ignored.
pub fn parse_pattern_spec(text: &str) -> Vec<Result<PatternEntry>> {
    let mut entries: Vec<Result<PatternEntry>> = Vec::new();
    let mut awaiting_options = false;

    for argument in text.split(':').filter(|a| !a.trim().is_empty()) {
        let (key, value) = argument.split_once('=').unwrap_or((argument, ""));
        match key.trim() {
            "val" => {
                let index = entries.len();
                entries.push(parse_entry(index, value));
                awaiting_options = true;
            }
            "opt" if awaiting_options => {
                awaiting_options = false;
                let index = entries.len().saturating_sub(1);
                apply_options(&mut entries, index, value);
            }
            other => {
                log::debug!("ignoring pattern specification key '{other}'");
            }
        }
    }

    entries
}

fn apply_options(entries: &mut [Result<PatternEntry>], index: usize, value: &str) {
    let Some(slot) = entries.last_mut() else {
        return;
    };
    if slot.is_err() {
        return;
    }

    match parse_options(index, value) {
        Ok((alpha, flags)) => {
            if let Ok(entry) = slot.as_mut() {
                entry.alpha = alpha;
                entry.flags = flags;
            }
        }
        Err(e) => *slot = Err(e),
    }
}

fn parse_entry(index: usize, value: &str) -> Result<PatternEntry> {
    let bytes = parse_byte_tokens(index, value)?;
    let id = u32::try_from(index).map_err(|_e| ChannelError::MalformedPattern {
        entry: index,
        token: value.to_string(),
        reason: "too many entries",
    })?;

    Ok(PatternEntry {
        id,
        bytes,
        alpha: DEFAULT_PATTERN_ALPHA,
        flags: PatternFlags::EVENT,
    })
}

fn parse_hex_byte(entry: usize, token: &str) -> Result<u8> {
    let trimmed = token.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > 2 {
        return Err(ChannelError::MalformedPattern {
            entry,
            token: token.to_string(),
            reason: "expected one or two hexadecimal digits",
        });
    }

    u8::from_str_radix(digits, 16).map_err(|_e| ChannelError::MalformedPattern {
        entry,
        token: token.to_string(),
        reason: "not a hexadecimal byte",
    })
}
