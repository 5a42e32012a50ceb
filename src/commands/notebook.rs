use super::Host;
use crate::Result;
use crate::notebook::Notebook;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct OutputsArgs {
    /// Notebook file (the `.ipynb` extension may be omitted)
    #[arg(value_name = "NOTEBOOK")]
    pub notebook: Utf8PathBuf,

    /// Execution count of the cell
    #[arg(value_name = "CELL")]
    pub cell: u64,
}

#[derive(Parser, Debug)]
pub struct FigureArgs {
    #[command(flatten)]
    pub target: OutputsArgs,

    /// Index of the output within the cell
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// File to write the PNG image to
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Utf8PathBuf,
}

#[derive(Parser, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub target: OutputsArgs,

    /// Index of the output within the cell
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

pub fn list_outputs<H: Host>(host: &mut H, args: &OutputsArgs) -> Result<()> {
    let notebook = Notebook::load(&args.notebook)?;
    let outputs = notebook.outputs(args.cell);

    let mut out = host.output();
    if outputs.is_empty() {
        let _ = writeln!(out, "No outputs for cell {}", args.cell);
        return Ok(());
    }

    for (index, output) in outputs.iter().enumerate() {
        let kinds: Vec<&str> = output.mime_types().collect();
        if kinds.is_empty() {
            let _ = writeln!(out, "{index}: {}", output.output_type);
        } else {
            let _ = writeln!(out, "{index}: {} [{}]", output.output_type, kinds.join(", "));
        }
    }

    Ok(())
}

pub fn extract_figure<H: Host>(host: &mut H, args: &FigureArgs) -> Result<()> {
    let notebook = Notebook::load(&args.target.notebook)?;
    let png = notebook.figure(args.target.cell, args.index)?;
    fs::write(&args.out, &png).into_app_err_with(|| format!("writing figure to '{}'", args.out))?;
    let _ = writeln!(host.output(), "Wrote {} bytes to {}", png.len(), args.out);
    Ok(())
}

pub fn extract_table<H: Host>(host: &mut H, args: &TableArgs) -> Result<()> {
    let notebook = Notebook::load(&args.target.notebook)?;
    let html = notebook.table(args.target.cell, args.index)?;
    let _ = writeln!(host.output(), "{html}");
    Ok(())
}
