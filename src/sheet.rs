//! Fetching a published Google spreadsheet as a table.

use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::io::Read;
use url::Url;

const LOG_TARGET: &str = "     sheet";

const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A parsed spreadsheet: a header row and the data rows below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse CSV with a header row.
    pub fn from_csv(reader: impl Read) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

        let headers = csv_reader
            .headers()
            .into_app_err("reading CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record.into_app_err_with(|| format!("reading CSV row {}", index + 1))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Write the table back out as CSV.
    pub fn write_csv(&self, writer: impl std::io::Write) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        csv_writer.write_record(&self.headers).into_app_err("writing CSV header row")?;
        for row in &self.rows {
            csv_writer.write_record(row).into_app_err("writing CSV row")?;
        }
        csv_writer.flush().into_app_err("flushing CSV output")
    }

    /// Values of the column named `header`, if present.
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().map(|row| row.get(index).map_or("", String::as_str)).collect())
    }
}

/// CSV export URL of sheet `sheet_name` in spreadsheet `file_id`.
pub fn sheet_url(file_id: &str, sheet_name: &str) -> Result<Url> {
    if file_id.is_empty() || file_id.contains('/') {
        bail!("invalid spreadsheet id '{file_id}'");
    }

    let mut url = Url::parse(SHEETS_BASE_URL)
        .and_then(|base| base.join(&format!("{file_id}/gviz/tq")))
        .into_app_err_with(|| format!("building spreadsheet URL for '{file_id}'"))?;

    let _ = url.query_pairs_mut().append_pair("tqx", "out:csv").append_pair("sheet", sheet_name);
    Ok(url)
}

/// Download a sheet as CSV and parse it.
pub async fn fetch_sheet(client: &reqwest::Client, url: &Url) -> Result<Table> {
    log::info!(target: LOG_TARGET, "fetching spreadsheet from '{url}'");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .into_app_err_with(|| format!("requesting '{url}'"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("unexpected HTTP status {status} from '{url}'");
    }

    let body = response.bytes().await.into_app_err_with(|| format!("reading response from '{url}'"))?;
    let table = Table::from_csv(body.as_ref())?;
    log::debug!(target: LOG_TARGET, "spreadsheet has {} columns and {} rows", table.headers.len(), table.rows.len());
    Ok(table)
}

/// HTTP client used for spreadsheet downloads.
pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .into_app_err("creating HTTP client")
}
