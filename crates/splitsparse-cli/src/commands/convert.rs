use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use splitsparse_core::Layout;

use crate::input::{MatrixSource, load, with_layout};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: MatrixSource,

    /// Output file.
    #[arg(value_name = "OUT")]
    pub output: PathBuf,

    /// Write real and imaginary parts as separate columns.
    #[arg(long)]
    pub cplx: bool,

    /// Write the binary format instead of text.
    #[arg(long, conflicts_with = "cplx")]
    pub binary: bool,
}

pub fn convert(args: &ConvertArgs) -> Result<()> {
    with_layout!(args.source.layout, L => convert_as::<L>(args))
}

fn convert_as<L: Layout>(args: &ConvertArgs) -> Result<()> {
    let matrix = load::<L>(&args.source)?;
    let out = &args.output;

    if args.binary {
        matrix.write_to_file(out)
    } else {
        matrix.write_text_file(out, args.cplx)
    }
    .with_context(|| format!("Failed to write {}", out.display()))?;

    log::info!(
        "Wrote {} {} to {}",
        L::NAME,
        if args.binary { "binary" } else { "text" },
        out.display()
    );
    Ok(())
}
