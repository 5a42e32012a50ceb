use super::Host;
use crate::Result;
use crate::config::Config;
use crate::sheet::{client, fetch_sheet, sheet_url};
use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
pub struct SheetArgs {
    /// Spreadsheet id, as found in its URL
    #[arg(value_name = "FILE_ID")]
    pub file_id: String,

    /// Name of the sheet within the spreadsheet
    #[arg(value_name = "SHEET")]
    pub sheet: String,

    /// Fetch from this URL instead of Google Sheets
    #[arg(long, value_name = "URL", hide = true)]
    pub url: Option<Url>,
}

/// Fetch a sheet and print it as CSV.
pub async fn print_sheet<H: Host>(host: &mut H, config: &Config, args: &SheetArgs) -> Result<()> {
    let url = match &args.url {
        Some(url) => url.clone(),
        None => sheet_url(&args.file_id, &args.sheet)?,
    };

    let table = fetch_sheet(&client(config.sheets.timeout())?, &url).await?;
    table.write_csv(host.output())
}
