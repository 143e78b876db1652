//! The pairing sheet: one row per read, pairing it with the template it is
//! aligned to. The sheet is written before any alignment happens so it can
//! be corrected by hand; a later run picks it up instead of scanning the
//! sequencing directory again.

use crate::error::{Result, SeqrepError};
use crate::sequence::Sequence;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// File name of the pairing sheet inside the sequencing directory.
pub const SHEET_NAME: &str = "report.csv";

pub const COLUMNS: [&str; 5] = ["Filename", "Rev?", "Construct", "Sequence", "Template Sequence"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecord {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(
        rename = "Rev?",
        deserialize_with = "deserialize_flag",
        serialize_with = "serialize_flag"
    )]
    pub is_reverse: bool,
    #[serde(rename = "Construct")]
    pub template_name: String,
    #[serde(rename = "Sequence")]
    pub sequence: Sequence,
    #[serde(rename = "Template Sequence")]
    pub template_sequence: Sequence,
}

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "TRUE" } else { "FALSE" })
}

/// Spreadsheet programs rewrite booleans in their own spelling, so accept
/// the common ones.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(de::Error::custom(format!(
            "invalid Rev? value '{}', expected TRUE or FALSE",
            other
        ))),
    }
}

pub fn write_sheet(path: &Path, records: &[ReadRecord]) -> Result<()> {
    let csv_err = |source| SeqrepError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(COLUMNS).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| SeqrepError::io(path, e))?;
    Ok(())
}

/// Load the sheet, checking up front that every column is present.
pub fn load_sheet(path: &Path) -> Result<Vec<ReadRecord>> {
    let csv_err = |source| SeqrepError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SeqrepError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<ReadRecord>().enumerate() {
        let record = row.map_err(|e| SeqrepError::BadRow {
            path: path.to_path_buf(),
            row: i + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    log::debug!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}
