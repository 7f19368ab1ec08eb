use anyhow::Result;
use clap::Args;
use splitsparse_core::Layout;

use crate::input::{MatrixSource, load, with_layout};
use crate::report::MatrixSummary;

#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: MatrixSource,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also validate the compressed structure.
    #[arg(long)]
    pub check: bool,
}

pub fn info(args: &InfoArgs) -> Result<()> {
    with_layout!(args.source.layout, L => summarize::<L>(args))
}

fn summarize<L: Layout>(args: &InfoArgs) -> Result<()> {
    let matrix = load::<L>(&args.source)?;
    if args.check {
        matrix.check()?;
        log::info!("Structure check passed");
    }

    let summary = MatrixSummary::new(args.source.file.display().to_string(), &matrix)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }
    Ok(())
}
