//! Output artifacts from notebook documents on disk.
//!
//! Notebooks are read in the nbformat v4 JSON layout. Only the parts needed to
//! locate outputs are modelled; everything else in the document is ignored.

use crate::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use core::fmt::{Display, Formatter};
use ohno::{EnrichableExt, IntoAppError, app_err};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "  notebook";

pub const NOTEBOOK_EXTENSION: &str = "ipynb";
pub const PNG_MIME: &str = "image/png";
pub const HTML_MIME: &str = "text/html";

/// A notebook document.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub nbformat: u32,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default)]
    pub execution_count: Option<u64>,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// One output of a code cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub output_type: String,

    /// Mime bundle for `display_data` and `execute_result` outputs
    #[serde(default)]
    pub data: BTreeMap<String, MultilineText>,

    /// Stream name (`stdout`/`stderr`) for `stream` outputs
    #[serde(default)]
    pub name: Option<String>,

    /// Text of `stream` outputs
    #[serde(default)]
    pub text: Option<MultilineText>,
}

/// nbformat stores text either as one string or as a list of lines.
///
/// JSON mime types such as `application/json` carry structured values instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    Single(String),
    Lines(Vec<String>),
    Structured(serde_json::Value),
}

impl MultilineText {
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Single(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

impl Display for MultilineText {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Single(text) => f.write_str(text),
            Self::Lines(lines) => lines.iter().try_for_each(|line| f.write_str(line)),
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

impl Output {
    /// Mime types carried by this output, in sorted order.
    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl Notebook {
    /// Read a notebook, adding the `.ipynb` extension when `path` has none.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = notebook_path(path.as_ref());
        let text = fs::read_to_string(&path).into_app_err_with(|| format!("reading notebook '{}'", path.display()))?;
        let notebook = Self::parse(&text).map_err(|e| e.enrich_with(|| format!("parsing notebook '{}'", path.display())))?;
        log::debug!(target: LOG_TARGET, "loaded notebook '{}' with {} cells", path.display(), notebook.cells.len());
        Ok(notebook)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let notebook: Self = serde_json::from_str(text).into_app_err("invalid notebook JSON")?;
        if notebook.nbformat != 0 && notebook.nbformat < 4 {
            log::warn!(target: LOG_TARGET, "notebook uses nbformat {}, outputs may not be found", notebook.nbformat);
        }
        Ok(notebook)
    }

    /// Outputs of every code cell whose execution count is `execution_count`.
    pub fn outputs(&self, execution_count: u64) -> Vec<&Output> {
        self.cells
            .iter()
            .filter(|cell| cell.cell_type == "code" && cell.execution_count == Some(execution_count))
            .flat_map(|cell| cell.outputs.iter())
            .collect()
    }

    /// The mime payload of output `index` of cell `execution_count`.
    pub fn payload(&self, execution_count: u64, index: usize, mime: &str) -> Result<String> {
        let outputs = self.outputs(execution_count);
        if outputs.is_empty() {
            return Err(app_err!("no code cell with execution count {execution_count} has outputs"));
        }

        let output = outputs.get(index).into_app_err_with(|| {
            format!(
                "cell {execution_count} has {} output(s), no output at index {index}",
                outputs.len()
            )
        })?;

        output
            .data
            .get(mime)
            .map(MultilineText::joined)
            .into_app_err_with(|| format!("output {index} of cell {execution_count} has no '{mime}' data"))
    }

    /// Decoded PNG bytes of a figure output.
    pub fn figure(&self, execution_count: u64, index: usize) -> Result<Vec<u8>> {
        let encoded = self.payload(execution_count, index, PNG_MIME)?;
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        BASE64
            .decode(compact)
            .into_app_err_with(|| format!("decoding PNG of output {index} in cell {execution_count}"))
    }

    /// HTML of a table (or any rich HTML) output.
    pub fn table(&self, execution_count: u64, index: usize) -> Result<String> {
        self.payload(execution_count, index, HTML_MIME)
    }
}

fn notebook_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(NOTEBOOK_EXTENSION)
    }
}
