// Input loading: bytes in, decoded and tokenized content out.
//
// Every reader funnels through `read_input`, which picks a shape from the
// file name (or content), decodes text through the encoding chain and hands
// the result to the matching parser.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::decode::{self, TextEncoding};
use crate::error::ReadError;
use crate::format::FileFormat;
use crate::table::Content;
use crate::{csv, text, xlsx};

#[derive(Debug, Clone)]
pub enum InputSource {
    Path(PathBuf),
    /// Uploaded or otherwise already-buffered content.
    Bytes(Vec<u8>),
}

/// One named input file.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Display name used in warnings and reports (usually the file name).
    pub name: String,
    pub source: InputSource,
    pub encoding_hint: Option<TextEncoding>,
}

impl InputFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, source: InputSource::Path(path.to_path_buf()), encoding_hint: None }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), source: InputSource::Bytes(bytes), encoding_hint: None }
    }

    pub fn with_encoding_hint(mut self, encoding: TextEncoding) -> Self {
        self.encoding_hint = Some(encoding);
        self
    }

    fn bytes(&self) -> Result<std::borrow::Cow<'_, [u8]>, ReadError> {
        match &self.source {
            InputSource::Bytes(bytes) => Ok(std::borrow::Cow::Borrowed(bytes)),
            InputSource::Path(path) => std::fs::read(path)
                .map(std::borrow::Cow::Owned)
                .map_err(|e| ReadError::Io { file: self.name.clone(), message: e.to_string() }),
        }
    }
}

/// A successfully read input.
#[derive(Debug, Clone, Serialize)]
pub struct Loaded {
    pub name: String,
    pub format: FileFormat,
    /// `None` for workbooks, which carry their own text encoding.
    pub encoding: Option<TextEncoding>,
    pub encoding_attempts: Vec<TextEncoding>,
    #[serde(skip)]
    pub content: Content,
}

/// Read, decode and tokenize one input.
pub fn read_input(input: &InputFile, chain: &[TextEncoding]) -> Result<Loaded, ReadError> {
    let bytes = input.bytes()?;
    let name = input.name.clone();

    let format = FileFormat::detect(&name, &bytes)
        .map_err(|reason| ReadError::UnsupportedFormat { file: name.clone(), reason })?;

    if format == FileFormat::Spreadsheet {
        let table = xlsx::read_first_sheet(&bytes)
            .map_err(|message| ReadError::Spreadsheet { file: name.clone(), message })?;
        log::debug!("{name}: spreadsheet, {} data rows", table.row_count());
        return Ok(Loaded {
            name,
            format,
            encoding: None,
            encoding_attempts: Vec::new(),
            content: Content::Table(table),
        });
    }

    let decoded = decode::decode(&bytes, input.encoding_hint, chain)
        .map_err(|tried| ReadError::Encoding { file: name.clone(), tried })?;
    log::debug!(
        "{name}: decoded as {} after {} attempt(s)",
        decoded.encoding,
        decoded.attempts.len()
    );

    let content = match format {
        FileFormat::Delimited => {
            let parsed = csv::parse(&decoded.text)
                .map_err(|message| ReadError::Delimited { file: name.clone(), message })?;
            Content::Table(parsed.table)
        }
        _ => Content::Lines(text::read_lines(&decoded.text)),
    };

    Ok(Loaded {
        name,
        format,
        encoding: Some(decoded.encoding),
        encoding_attempts: decoded.attempts,
        content,
    })
}
