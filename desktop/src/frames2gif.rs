use std::path::{Path, PathBuf};

use argh::FromArgs;
use log::{error, info};

use oledgif_core::{
    animation::{Animation, render_frame},
    unpack::Packing,
};
use oledgif_desktop::{
    Document, Error, Result,
    encode::encode_gif,
    files, init_logging,
    render::{save_preview, to_luma},
    settings::LayoutOverrides,
};

#[derive(FromArgs)]
/// Convert a frames JSON document into an animated GIF
struct Args {
    /// frames JSON written by extract-frames
    #[argh(positional)]
    input: PathBuf,

    /// output GIF path
    #[argh(option, short = 'o', default = "PathBuf::from(\"animation.gif\")")]
    output: PathBuf,

    /// display width (default 128)
    #[argh(option)]
    width: Option<u32>,

    /// display height (default 64)
    #[argh(option)]
    height: Option<u32>,

    /// frame width (default 32)
    #[argh(option)]
    frame_width: Option<u32>,

    /// frame height (default 32)
    #[argh(option)]
    frame_height: Option<u32>,

    /// horizontal offset of the frame on the display (default 48)
    #[argh(option)]
    x_offset: Option<i32>,

    /// vertical offset of the frame on the display (default 16)
    #[argh(option)]
    y_offset: Option<i32>,

    /// times to play the animation, 0 loops forever
    #[argh(option, long = "loop", default = "0")]
    loop_count: u16,

    /// nearest-neighbour scale factor
    #[argh(option, default = "4")]
    scale: u32,

    /// bit packing of the frame bytes
    #[argh(option, default = "Packing::Horizontal")]
    packing: Packing,

    /// write PNG stills of this frame instead of the GIF
    #[argh(option)]
    preview: Option<usize>,
}

impl Args {
    fn overrides(&self) -> LayoutOverrides {
        LayoutOverrides {
            width: self.width,
            height: self.height,
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            x_offset: self.x_offset,
            y_offset: self.y_offset,
        }
    }
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
    info!("Loaded {} frames", document.frames.len());

    let layout = args.overrides().resolve(&document.metadata, args.packing);
    info!(
        "{}x{} frames at ({}, {}) on a {}x{} display, {} packing",
        layout.frame_size.width,
        layout.frame_size.height,
        layout.placement.offset.x,
        layout.placement.offset.y,
        layout.placement.canvas.width,
        layout.placement.canvas.height,
        layout.packing
    );

    if let Some(index) = args.preview {
        let frame = document.frames.get(index).ok_or(Error::FrameOutOfRange {
            index,
            count: document.frames.len(),
        })?;
        let image = to_luma(&render_frame(&frame.data, &layout)?);
        let dir = args.output.parent().unwrap_or(Path::new(""));
        save_preview(&image, dir, index, args.scale)?;
        return Ok(());
    }

    let animation = Animation::compose(&document.frames, &layout, args.loop_count)?;
    files::write_atomic(&args.output, |w| encode_gif(&animation, args.scale, w))?;
    info!("Wrote {}", args.output.display());
    Ok(())
}
