use std::path::PathBuf;

use argh::FromArgs;
use log::{error, info, warn};

use oledgif_core::{
    report::FrameReport,
    unpack::{Packing, unpack},
};
use oledgif_desktop::{
    Document, Error, Result, init_logging,
    render::{save_png, to_luma, upscale},
};

const DEBUG_SCALE: u32 = 8;

#[derive(FromArgs)]
/// Decode one frame with every known bit packing, to find the one the
/// display uses
struct Args {
    /// frames JSON written by extract-frames
    #[argh(positional)]
    input: PathBuf,

    /// index of the frame to decode
    #[argh(option, default = "0")]
    frame: usize,

    /// frame width
    #[argh(option, default = "32")]
    width: u32,

    /// frame height
    #[argh(option, default = "32")]
    height: u32,

    /// directory for the PNG files
    #[argh(option, default = "PathBuf::from(\".\")")]
    out_dir: PathBuf,
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
    let document = Document::load(&args.input)?;
    let frame = document
        .frames
        .get(args.frame)
        .ok_or(Error::FrameOutOfRange {
            index: args.frame,
            count: document.frames.len(),
        })?;

    let report = FrameReport::analyze(&frame.data, args.width, args.height);
    info!("Frame {} of {}", args.frame, document.frames.len());
    for line in report.to_string().lines() {
        info!("{line}");
    }

    std::fs::create_dir_all(&args.out_dir).map_err(|source| Error::Write {
        path: args.out_dir.clone(),
        source,
    })?;
    for (n, packing) in (1..).zip(Packing::ALL) {
        let image = to_luma(&unpack(&frame.data, args.width, args.height, packing));
        let path = args.out_dir.join(format!("debug_{n}_{packing}.png"));
        save_png(&image, &path)?;
        info!("Method {n} ({packing}): {}", path.display());

        let path = args.out_dir.join(format!("debug_{n}_{packing}_scaled.png"));
        match upscale(&image, DEBUG_SCALE) {
            Ok(scaled) => save_png(&scaled, &path)?,
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }
    info!("Compare the images against the display to pick the packing");
    Ok(())
}
