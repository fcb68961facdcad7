//! The JSON file passed between the tools.
//!
//! Written as
//! `{"metadata": {...}, "frames": [{"data": [...], "delay": n}, ...]}`.
//! Read leniently: a bare array of frames, or an object whose `frames` hold
//! bare arrays or `{data, delay}` objects, are both accepted.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use oledgif_core::{
    animation::RawFrame,
    scrape::{DEFAULT_FRAME_DELAY, Scraped},
};

use crate::{Error, Result, files};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_delay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub metadata: Metadata,
    pub frames: Vec<RawFrame>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameEntry {
    Bare(Vec<u8>),
    Full {
        data: Vec<u8>,
        #[serde(default)]
        delay: Option<u32>,
    },
}

#[derive(Deserialize)]
struct Input {
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default)]
    frames: Vec<FrameEntry>,
}

#[derive(Serialize)]
struct Output<'a> {
    metadata: &'a Metadata,
    frames: Vec<OutputFrame<'a>>,
}

#[derive(Serialize)]
struct OutputFrame<'a> {
    data: &'a [u8],
    delay: u32,
}

impl Document {
    pub fn from_scraped(scraped: &Scraped) -> Self {
        let delay = scraped.metadata.delay_ms;
        Self {
            metadata: Metadata {
                frame_delay: Some(delay),
                frame_width: Some(scraped.metadata.width),
                frame_height: Some(scraped.metadata.height),
                frame_count: Some(scraped.frames.len()),
                ..Metadata::default()
            },
            frames: scraped
                .frames
                .iter()
                .map(|data| RawFrame::with_delay(data.clone(), delay))
                .collect(),
        }
    }

    /// Parses a frame document.
    ///
    /// Frames still on the default delay take `metadata.frame_delay` when one
    /// is given. A document without frames is an error.
    pub fn parse(json: &str) -> Result<Self> {
        let (metadata, entries) = match serde_json::from_str(json)? {
            value @ Value::Array(_) => (Metadata::default(), serde_json::from_value(value)?),
            value @ Value::Object(_) => {
                let input: Input = serde_json::from_value(value)?;
                (input.metadata.unwrap_or_default(), input.frames)
            }
            _ => {
                return Err(Error::Json(serde::de::Error::custom(
                    "expected an array of frames or an object with a \"frames\" key",
                )));
            }
        };
        if entries.is_empty() {
            return Err(Error::NoFrames);
        }

        let frames = entries
            .into_iter()
            .map(|entry| {
                let (data, delay) = match entry {
                    FrameEntry::Bare(data) => (data, None),
                    FrameEntry::Full { data, delay } => (data, delay),
                };
                let delay = match (delay.unwrap_or(DEFAULT_FRAME_DELAY), metadata.frame_delay) {
                    (DEFAULT_FRAME_DELAY, Some(global)) => global,
                    (delay, _) => delay,
                };
                RawFrame::with_delay(data, delay)
            })
            .collect::<Vec<_>>();
        debug!("Parsed {} frames, metadata {:?}", frames.len(), metadata);
        Ok(Self { metadata, frames })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&files::read_text(path)?)
    }

    /// Pretty-printed JSON; identical documents give identical text.
    pub fn to_json(&self) -> Result<String> {
        let output = Output {
            metadata: &self.metadata,
            frames: self
                .frames
                .iter()
                .map(|frame| OutputFrame {
                    data: &frame.data,
                    delay: frame.delay_ms,
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        files::write_atomic(path, |w| {
            w.write_all(json.as_bytes())?;
            w.write_all(b"\n")?;
            Ok(())
        })
    }
}
