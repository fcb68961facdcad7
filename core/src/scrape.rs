//! Pulls frame arrays out of Arduino sketches.
//!
//! Two strategies are tried in order:
//! - a `frames[][N] = { {...}, {...} };` declaration, one inner block per frame
//! - any `{ ... }` block in the file holding at least [`MIN_FRAME_VALUES`]
//!   numbers
//!
//! Only decimal literals count. A digit run glued to a letter, digit or `_`
//! (`0x1F`, `B0101`, `frame2`) is not a number.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};
use memchr::{memchr, memmem};

pub const DEFAULT_FRAME_DELAY: u32 = 100;
pub const DEFAULT_FRAME_WIDTH: u32 = 32;
pub const DEFAULT_FRAME_HEIGHT: u32 = 32;

/// Blocks with fewer numbers are not frame data when brace scanning.
pub const MIN_FRAME_VALUES: usize = 16;

const DECLARATION_NAME: &[u8] = b"frames";
const DECLARATION_END: &[u8] = b"};";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    pub delay_ms: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for FrameMetadata {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_FRAME_DELAY,
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl FrameMetadata {
    /// Reads `FRAME_DELAY(n)`, `FRAME_WIDTH(n)` and `FRAME_HEIGHT(n)`,
    /// falling back to the defaults for whichever is missing.
    pub fn from_source(text: &str) -> Self {
        let defaults = Self::default();
        Self {
            delay_ms: find_macro_arg(text, b"FRAME_DELAY").unwrap_or(defaults.delay_ms),
            width: find_macro_arg(text, b"FRAME_WIDTH").unwrap_or(defaults.width),
            height: find_macro_arg(text, b"FRAME_HEIGHT").unwrap_or(defaults.height),
        }
    }
}

/// Which strategy found the frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Declaration,
    BraceScan,
}

impl Strategy {
    pub fn repr(self) -> &'static str {
        match self {
            Strategy::Declaration => "frames declaration",
            Strategy::BraceScan => "brace scan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scraped {
    pub frames: Vec<Vec<u8>>,
    pub metadata: FrameMetadata,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeError {
    /// Neither the declaration nor the brace scan produced a frame.
    NoFrames,
    /// A frame in the declaration holds a value that is not a byte.
    ValueOutOfRange { frame: usize, value: u64 },
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::NoFrames => f.write_str("no frames found"),
            ScrapeError::ValueOutOfRange { frame, value } => {
                write!(f, "frame {frame} holds {value}, which does not fit in a byte")
            }
        }
    }
}

impl core::error::Error for ScrapeError {}

type Result<T> = core::result::Result<T, ScrapeError>;

pub fn scrape(text: &str) -> Result<Scraped> {
    let metadata = FrameMetadata::from_source(text);

    if let Some(body) = find_declaration(text) {
        let frames = declaration_frames(body)?;
        if !frames.is_empty() {
            debug!("Declaration holds {} frames", frames.len());
            return Ok(Scraped {
                frames,
                metadata,
                strategy: Strategy::Declaration,
            });
        }
        debug!("Declaration found but holds no numbers");
    }

    let frames = scanned_frames(text);
    if frames.is_empty() {
        return Err(ScrapeError::NoFrames);
    }
    Ok(Scraped {
        frames,
        metadata,
        strategy: Strategy::BraceScan,
    })
}

/// Every non-empty `{...}` section of the text, braces included.
///
/// Used to show what the scraper saw when it found nothing.
pub fn candidate_blocks(text: &str) -> Vec<&str> {
    brace_blocks(text)
        .filter(|block| block.len() > 2)
        .collect()
}

fn declaration_frames(body: &str) -> Result<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    for block in brace_blocks(body) {
        let numbers = numbers(block);
        if numbers.is_empty() {
            continue;
        }
        let frame = frames.len();
        let bytes = numbers
            .iter()
            .map(|&value| {
                u8::try_from(value).map_err(|_| ScrapeError::ValueOutOfRange { frame, value })
            })
            .collect::<Result<Vec<u8>>>()?;
        frames.push(bytes);
    }
    Ok(frames)
}

fn scanned_frames(text: &str) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    for block in brace_blocks(text) {
        let numbers = numbers(block);
        if numbers.len() < MIN_FRAME_VALUES {
            continue;
        }
        let bytes = numbers.iter().map(|&v| u8::try_from(v));
        match bytes.collect::<core::result::Result<Vec<u8>, _>>() {
            Ok(bytes) => frames.push(bytes),
            Err(_) => trace!("Skipping block of {} numbers above 255", numbers.len()),
        }
    }
    frames
}

/// Locates `frames[][N] = {` and returns everything up to the first `};`.
fn find_declaration(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    for name in memmem::find_iter(bytes, DECLARATION_NAME) {
        let Some(open) = declaration_body(bytes, name + DECLARATION_NAME.len()) else {
            continue;
        };
        // Without a terminator here no later declaration can have one either.
        let end = memmem::find(&bytes[open..], DECLARATION_END)?;
        return Some(&text[open..open + end]);
    }
    None
}

/// Matches `[ ] [ digits ] = {` at `pos` and returns the index after `{`.
fn declaration_body(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut pos = expect(bytes, skip_whitespace(bytes, pos), b'[')?;
    pos = expect(bytes, skip_whitespace(bytes, pos), b']')?;
    pos = expect(bytes, skip_whitespace(bytes, pos), b'[')?;
    pos = skip_whitespace(bytes, pos);
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos = expect(bytes, skip_whitespace(bytes, pos), b']')?;
    pos = expect(bytes, skip_whitespace(bytes, pos), b'=')?;
    expect(bytes, skip_whitespace(bytes, pos), b'{')
}

/// Matches `name ( digits )` anywhere in the text; the first match wins.
fn find_macro_arg(text: &str, name: &[u8]) -> Option<u32> {
    let bytes = text.as_bytes();
    memmem::find_iter(bytes, name).find_map(|start| {
        let pos = expect(bytes, skip_whitespace(bytes, start + name.len()), b'(')?;
        let digits_start = skip_whitespace(bytes, pos);
        let mut pos = digits_start;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        if pos == digits_start {
            return None;
        }
        expect(bytes, skip_whitespace(bytes, pos), b')')?;
        text[digits_start..pos].parse().ok()
    })
}

/// Sections from each `{` to the next `}`, scanning on after the `}`.
fn brace_blocks(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    core::iter::from_fn(move || {
        let open = pos + memchr(b'{', &bytes[pos..])?;
        let close = open + 1 + memchr(b'}', &bytes[open + 1..])?;
        pos = close + 1;
        Some(&text[open..=close])
    })
}

/// Decimal numbers in `block`, ignoring `//` comments.
fn numbers(block: &str) -> Vec<u64> {
    let mut out = Vec::new();
    for line in block.split('\n') {
        let line = match memmem::find(line.as_bytes(), b"//") {
            Some(comment) => &line.as_bytes()[..comment],
            None => line.as_bytes(),
        };
        let mut pos = 0;
        while pos < line.len() {
            if !line[pos].is_ascii_digit() {
                pos += 1;
                continue;
            }
            let start = pos;
            while pos < line.len() && line[pos].is_ascii_digit() {
                pos += 1;
            }
            let glued_before = start > 0 && is_word_byte(line[start - 1]);
            let glued_after = pos < line.len() && is_word_byte(line[pos]);
            if !glued_before && !glued_after {
                out.push(parse_saturating(&line[start..pos]));
            }
        }
    }
    out
}

fn parse_saturating(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add((d - b'0') as u64)
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

fn expect(bytes: &[u8], pos: usize, want: u8) -> Option<usize> {
    (bytes.get(pos) == Some(&want)).then_some(pos + 1)
}
