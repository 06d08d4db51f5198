//! Synchronizing-literal scanning.
//!
//! The [`LiteralScanner`] walks ahead of the command parser and recognizes
//! literal announcements (`{n}`, `{n+}`, `~{n}`, `~{n+}`) without doing any
//! grammar work. A server needs this lookahead to know how many command
//! continuation requests it owes the client before the buffered bytes can
//! be parsed at all: every synchronizing literal must be answered with one
//! `+ ...` line, and the client will not send the literal bytes (nor the
//! rest of the command) until it was.
//!
//! The scanner keeps its own offset bookkeeping and never consumes from the
//! buffer; the stream layer reports parsed bytes back via
//! [`LiteralScanner::note_consumed`] so that the offsets stay aligned with
//! the buffer's read position.
//!
//! Quoted strings are tracked (including `\\` and `\"` escapes) so that a
//! brace inside a quoted string is not mistaken for a literal announcement.

use std::collections::VecDeque;

/// What the scanner knows about the buffered bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FramingStatus {
    /// The number of synchronizing literal announcements seen in the
    /// buffered bytes.
    ///
    /// This count is monotonic for a growing buffer: scanning a prefix
    /// never yields a larger count than scanning the whole buffer. The
    /// stream layer tracks how many continuation requests it has already
    /// emitted and owes the client the difference.
    pub sync_literals: usize,

    /// The offset up to which the buffered bytes form fully delimited
    /// lexical units (all announced literal bodies are present in full).
    ///
    /// Bytes up to this offset can be handed to the grammar parser without
    /// risking an ambiguous cut inside a literal.
    pub max_valid: usize,
}

/// The lexer state between two scanned bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LexState {
    /// Ordinary line material.
    Normal,
    /// Inside a quoted string.
    Quoted,
    /// Inside a quoted string, directly after a backslash.
    QuotedEscape,
    /// Saw `~`, which may start a binary literal announcement.
    Tilde,
    /// Saw `{` (or `~{`) and possibly some digits.
    Brace { length: u32, has_digit: bool },
    /// Saw `{<digits>+`.
    BracePlus { length: u32 },
    /// Saw the full announcement up to `}`.
    Announced { length: u32, sync: bool },
    /// Saw the announcement plus CR; LF completes it.
    AnnouncedCr { length: u32, sync: bool },
    /// Inside a literal body.
    Body { remaining: u32 },
}

/// Scans buffered bytes for synchronizing-literal announcements.
///
/// The scanner is resumable: [`LiteralScanner::scan`] continues where the
/// previous call stopped, so each byte is inspected exactly once even when
/// the buffer grows between calls.
#[derive(Debug)]
pub struct LiteralScanner {
    /// Scan cursor, relative to the buffer's current read position.
    pos: usize,
    /// See [`FramingStatus::max_valid`].
    max_valid: usize,
    /// See [`FramingStatus::sync_literals`].
    sync_literals: usize,
    /// Offsets (end of announcement) of the counted synchronizing literals.
    sync_marks: VecDeque<usize>,
    /// Extents of announced literal bodies, used to exempt body bytes from
    /// the lookahead limit.
    body_ranges: VecDeque<(usize, usize)>,
    state: LexState,
}

impl Default for LiteralScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LiteralScanner {
    pub fn new() -> Self {
        Self {
            pos: 0,
            max_valid: 0,
            sync_literals: 0,
            sync_marks: VecDeque::new(),
            body_ranges: VecDeque::new(),
            state: LexState::Normal,
        }
    }

    /// Scan any bytes not inspected yet and report the framing status.
    pub fn scan(&mut self, buffer: &[u8]) -> FramingStatus {
        debug_assert!(self.pos <= buffer.len());

        while self.pos < buffer.len() {
            let byte = buffer[self.pos];
            self.step(byte);
            self.pos += 1;

            // A byte that leaves the lexer in its ordinary state completes
            // a lexical unit.
            if self.state == LexState::Normal {
                self.max_valid = self.pos;
            }
        }

        FramingStatus {
            sync_literals: self.sync_literals,
            max_valid: self.max_valid,
        }
    }

    /// Report that `amount` buffered bytes were parsed and will be
    /// discarded; rebases all offsets.
    ///
    /// Returns the number of counted synchronizing literals that fell into
    /// the consumed region, so the caller can rebase its continuation
    /// accounting as well.
    pub fn note_consumed(&mut self, amount: usize) -> usize {
        debug_assert!(amount <= self.pos);

        self.pos -= amount;
        self.max_valid = self.max_valid.saturating_sub(amount);

        let mut consumed_marks = 0;
        while let Some(mark) = self.sync_marks.front() {
            if *mark <= amount {
                self.sync_marks.pop_front();
                consumed_marks += 1;
            } else {
                break;
            }
        }
        for mark in self.sync_marks.iter_mut() {
            *mark -= amount;
        }
        self.sync_literals -= consumed_marks;

        while let Some((_, end)) = self.body_ranges.front() {
            if *end <= amount {
                self.body_ranges.pop_front();
            } else {
                break;
            }
        }
        for (start, end) in self.body_ranges.iter_mut() {
            *start = start.saturating_sub(amount);
            *end -= amount;
        }

        consumed_marks
    }

    /// The number of buffered bytes that belong to announced literal
    /// bodies.
    ///
    /// Literal bodies are exempt from the lookahead limit; only line
    /// material counts against it.
    pub fn literal_body_bytes(&self, buffer_len: usize) -> usize {
        self.body_ranges
            .iter()
            .map(|(start, end)| buffer_len.min(*end).saturating_sub(*start))
            .sum()
    }

    fn step(&mut self, byte: u8) {
        self.state = match self.state {
            LexState::Normal => match byte {
                b'"' => LexState::Quoted,
                b'~' => LexState::Tilde,
                b'{' => LexState::Brace {
                    length: 0,
                    has_digit: false,
                },
                _ => LexState::Normal,
            },
            LexState::Quoted => match byte {
                b'\\' => LexState::QuotedEscape,
                b'"' => LexState::Normal,
                // A line break inside a quoted string is malformed; the
                // grammar parser reports it, the scanner just resynchronizes.
                b'\r' | b'\n' => LexState::Normal,
                _ => LexState::Quoted,
            },
            LexState::QuotedEscape => LexState::Quoted,
            LexState::Tilde => match byte {
                b'{' => LexState::Brace {
                    length: 0,
                    has_digit: false,
                },
                b'"' => LexState::Quoted,
                _ => LexState::Normal,
            },
            LexState::Brace { length, has_digit } => match byte {
                b'0'..=b'9' => {
                    let digit = u32::from(byte - b'0');
                    match length.checked_mul(10).and_then(|l| l.checked_add(digit)) {
                        Some(length) => LexState::Brace {
                            length,
                            has_digit: true,
                        },
                        // Overlong announcements are left for the grammar
                        // parser to reject.
                        None => LexState::Normal,
                    }
                }
                b'+' if has_digit => LexState::BracePlus { length },
                b'}' if has_digit => LexState::Announced {
                    length,
                    sync: true,
                },
                b'"' => LexState::Quoted,
                b'{' => LexState::Brace {
                    length: 0,
                    has_digit: false,
                },
                _ => LexState::Normal,
            },
            LexState::BracePlus { length } => match byte {
                b'}' => LexState::Announced {
                    length,
                    sync: false,
                },
                b'"' => LexState::Quoted,
                b'{' => LexState::Brace {
                    length: 0,
                    has_digit: false,
                },
                _ => LexState::Normal,
            },
            LexState::Announced { length, sync } => match byte {
                b'\r' => LexState::AnnouncedCr { length, sync },
                b'\n' => self.enter_body(length, sync),
                b'"' => LexState::Quoted,
                b'{' => LexState::Brace {
                    length: 0,
                    has_digit: false,
                },
                _ => LexState::Normal,
            },
            LexState::AnnouncedCr { length, sync } => match byte {
                b'\n' => self.enter_body(length, sync),
                b'"' => LexState::Quoted,
                b'{' => LexState::Brace {
                    length: 0,
                    has_digit: false,
                },
                _ => LexState::Normal,
            },
            LexState::Body { remaining } => {
                if remaining > 1 {
                    LexState::Body {
                        remaining: remaining - 1,
                    }
                } else {
                    LexState::Normal
                }
            }
        };
    }

    fn enter_body(&mut self, length: u32, sync: bool) -> LexState {
        // `pos` still points at the LF of the announcement here.
        let body_start = self.pos + 1;

        if sync {
            self.sync_literals += 1;
            self.sync_marks.push_back(body_start);
        }

        self.body_ranges
            .push_back((body_start, body_start + length as usize));

        if length == 0 {
            LexState::Normal
        } else {
            LexState::Body { remaining: length }
        }
    }
}
