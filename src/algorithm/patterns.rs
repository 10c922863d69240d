//! Fixed byte-sequence patterns and the single-pass streaming matcher

use crate::io::configuration::OPAQUE;
use crate::io::error::{ChannelError, Result, invalid_parameter, try_filled};

/// Behavior attached to a pattern match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PatternFlags {
    /// Make the pattern's opacity the default for the rest of the pass
    pub persist: bool,
    /// Count matches and report them after the pass
    pub emit_event: bool,
}

impl PatternFlags {
    /// No side effect besides painting the matched span
    pub const NONE: Self = Self {
        persist: false,
        emit_event: false,
    };
    /// Report match counts only
    pub const EVENT: Self = Self {
        persist: false,
        emit_event: true,
    };
    /// Persist opacity only
    pub const PERSIST: Self = Self {
        persist: true,
        emit_event: false,
    };
}

/// Match count reported for one pattern after a pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchCount {
    /// Pattern identifier
    pub id: u32,
    /// Completed matches in the pass
    pub count: u32,
}

/// Exact byte sequence tracked across a window
///
/// Progress on a mismatch falls back along the sequence's failure function,
/// so a match is always a contiguous occurrence and an occurrence that starts
/// inside a failed partial match is still found. Progress restarts from zero
/// after a completed match, so matches never overlap.
#[derive(Clone, Debug)]
pub struct Pattern {
    bytes: Vec<u8>,
    failure: Vec<usize>,
    alpha: u8,
    id: u32,
    flags: PatternFlags,
    progress: usize,
    matches: u32,
}

impl Pattern {
    /// Create a pattern from its byte sequence
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `bytes` is empty
    /// - The failure table cannot be allocated
    pub fn new(bytes: Vec<u8>, alpha: u8, id: u32, flags: PatternFlags) -> Result<Self> {
        if bytes.is_empty() {
            return Err(invalid_parameter(
                "pattern",
                &"<empty>",
                &"pattern must contain at least one byte",
            ));
        }

        let failure = failure_table(&bytes)?;
        Ok(Self {
            bytes,
            failure,
            alpha,
            id,
            flags,
            progress: 0,
            matches: 0,
        })
    }

    /// Byte sequence to match
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sequence length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty patterns are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Opacity painted over matched spans
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Identifier carried by match notifications
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Match behavior flags
    pub const fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Length of the currently matched prefix
    pub const fn progress(&self) -> usize {
        self.progress
    }

    const fn reset(&mut self) {
        self.progress = 0;
        self.matches = 0;
    }

    // Returns true when `byte` completes the sequence
    fn advance(&mut self, byte: u8) -> bool {
        while self.progress > 0 && self.bytes.get(self.progress) != Some(&byte) {
            self.progress = self.failure.get(self.progress - 1).copied().unwrap_or(0);
        }
        if self.bytes.get(self.progress) == Some(&byte) {
            self.progress += 1;
        }
        if self.progress == self.bytes.len() {
            self.progress = 0;
            return true;
        }
        false
    }
}

// failure[i] is the length of the longest proper prefix of bytes[..=i] that is also its suffix
fn failure_table(bytes: &[u8]) -> Result<Vec<usize>> {
    let mut failure = try_filled(bytes.len(), 0usize, "pattern failure table")?;
    let mut k = 0;
    for (i, &byte) in bytes.iter().enumerate().skip(1) {
        while k > 0 && bytes.get(k) != Some(&byte) {
            k = failure.get(k - 1).copied().unwrap_or(0);
        }
        if bytes.get(k) == Some(&byte) {
            k += 1;
        }
        if let Some(entry) = failure.get_mut(i) {
            *entry = k;
        }
    }
    Ok(failure)
}

/// Growable collection of registered patterns
///
/// Patterns can only be added; they are dropped together with the set.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Register a pattern
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Allocation`] if the set cannot grow; the
    /// pattern is dropped and existing patterns are untouched
    pub fn register(&mut self, pattern: Pattern) -> Result<()> {
        self.patterns
            .try_reserve(1)
            .map_err(|source| ChannelError::Allocation {
                what: "pattern set",
                requested: self.patterns.len() + 1,
                source,
            })?;
        self.patterns.push(pattern);
        Ok(())
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Test if no pattern is registered
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate registered patterns in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Run every pattern over `window` in one pass, painting `alpha`
    ///
    /// Raw byte `p` belongs to alpha sample `p / footprint`. Each sample
    /// starts at the pass's running default opacity (opaque at the start of
    /// the pass). A completed match paints every sample its span touches
    /// with the pattern's opacity; persisting patterns also replace the
    /// running default, and event patterns count the match.
    ///
    /// Returns the nonzero match counts in registration order and clears them.
    pub fn scan(
        &mut self,
        window: &[u8],
        footprint: usize,
        alpha: &mut [u8],
    ) -> Vec<MatchCount> {
        let footprint = footprint.max(1);
        for pattern in &mut self.patterns {
            pattern.reset();
        }

        let mut default_alpha = OPAQUE;
        for (position, &byte) in window.iter().enumerate() {
            if position % footprint == 0 {
                if let Some(value) = alpha.get_mut(position / footprint) {
                    *value = default_alpha;
                }
            }

            for pattern in &mut self.patterns {
                if !pattern.advance(byte) {
                    continue;
                }

                let first = (position + 1 - pattern.len()) / footprint;
                let last = position / footprint;
                if let Some(span) = alpha.get_mut(first..=last) {
                    span.fill(pattern.alpha);
                }
                if pattern.flags.persist {
                    default_alpha = pattern.alpha;
                }
                if pattern.flags.emit_event {
                    pattern.matches = pattern.matches.saturating_add(1);
                }
            }
        }

        let mut counts = Vec::new();
        for pattern in &mut self.patterns {
            if pattern.matches > 0 {
                counts.push(MatchCount {
                    id: pattern.id,
                    count: pattern.matches,
                });
                pattern.matches = 0;
            }
        }
        counts
    }
}
