use std::path::PathBuf;

use argh::FromArgs;
use log::{error, info};

use oledgif_core::scrape::{ScrapeError, candidate_blocks, scrape};
use oledgif_desktop::{Document, Error, Result, files, init_logging};

const SAMPLE_VALUES: usize = 10;
const DIAGNOSTIC_BLOCKS: usize = 3;
const DIAGNOSTIC_LEN: usize = 100;

#[derive(FromArgs)]
/// Extract animation frames from an Arduino sketch into JSON
struct Args {
    /// sketch or header holding the frames array
    #[argh(positional)]
    input: PathBuf,

    /// output JSON path
    #[argh(option, short = 'o', default = "PathBuf::from(\"frames.json\")")]
    output: PathBuf,
}

fn main() {
    init_logging();

    let args: Args = argh::from_env();
    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    info!("Reading {}", args.input.display());
    let text = files::read_text(&args.input)?;

    let scraped = match scrape(&text) {
        Ok(scraped) => scraped,
        Err(ScrapeError::NoFrames) => {
            log_candidates(&text);
            return Err(Error::NoFrames);
        }
        Err(e) => return Err(e.into()),
    };

    let metadata = &scraped.metadata;
    info!(
        "Found {} frames ({})",
        scraped.frames.len(),
        scraped.strategy.repr()
    );
    info!("Frame delay: {} ms", metadata.delay_ms);
    info!("Frame size: {}x{}", metadata.width, metadata.height);
    if let Some(first) = scraped.frames.first() {
        let sample = &first[..first.len().min(SAMPLE_VALUES)];
        info!(
            "First frame has {} values, starting with {sample:?}",
            first.len()
        );
    }

    Document::from_scraped(&scraped).save(&args.output)?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

/// Shows what brace blocks were found, to help adjust the source.
fn log_candidates(text: &str) {
    let blocks = candidate_blocks(text);
    error!("Found {} potential array blocks", blocks.len());
    for (index, block) in blocks.iter().take(DIAGNOSTIC_BLOCKS).enumerate() {
        let shown = match block.char_indices().nth(DIAGNOSTIC_LEN) {
            Some((end, _)) => &block[..end],
            None => block,
        };
        error!("Block {index}: {shown}...");
    }
}
