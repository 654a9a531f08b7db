//! Record codecs for persisted caches.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PersistError;

/// How a cache's flat records are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordCodec {
    /// A single JSON array of records.
    #[default]
    Json,
    /// One CSV row per record, with a header row.
    Csv,
}

impl RecordCodec {
    /// File extension used for caches written with this codec.
    pub fn extension(self) -> &'static str {
        match self {
            RecordCodec::Json => "json",
            RecordCodec::Csv => "csv",
        }
    }

    /// Encode `records` to `writer`.
    pub fn write_records<R, W>(self, writer: W, records: &[R]) -> Result<(), PersistError>
    where
        R: Serialize,
        W: Write,
    {
        match self {
            RecordCodec::Json => {
                serde_json::to_writer(writer, records)?;
            }
            RecordCodec::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                for record in records {
                    csv_writer.serialize(record)?;
                }
                csv_writer
                    .flush()
                    .map_err(|e| PersistError::Csv(csv::Error::from(e)))?;
            }
        }
        Ok(())
    }

    /// Decode every record from `reader`.
    pub fn read_records<R, Rd>(self, reader: Rd) -> Result<Vec<R>, PersistError>
    where
        R: DeserializeOwned,
        Rd: Read,
    {
        match self {
            RecordCodec::Json => Ok(serde_json::from_reader(reader)?),
            RecordCodec::Csv => {
                let mut csv_reader = csv::Reader::from_reader(reader);
                let records = csv_reader
                    .deserialize()
                    .collect::<Result<Vec<R>, csv::Error>>()?;
                Ok(records)
            }
        }
    }
}

impl FromStr for RecordCodec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(RecordCodec::Json),
            "csv" => Ok(RecordCodec::Csv),
            other => Err(format!("unknown record codec '{other}' (expected json or csv)")),
        }
    }
}

impl fmt::Display for RecordCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        index: u32,
        name: String,
        extra: Option<String>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                index: 0,
                name: "Bury".to_string(),
                extra: None,
            },
            Row {
                index: 1,
                name: "Altrincham, via Sale".to_string(),
                extra: Some("x".to_string()),
            },
        ]
    }

    #[test]
    fn json_roundtrip() {
        let mut buf = Vec::new();
        RecordCodec::Json.write_records(&mut buf, &rows()).unwrap();
        let back: Vec<Row> = RecordCodec::Json.read_records(buf.as_slice()).unwrap();
        assert_eq!(back, rows());
    }

    #[test]
    fn csv_roundtrip_with_quoting_and_optional_fields() {
        let mut buf = Vec::new();
        RecordCodec::Csv.write_records(&mut buf, &rows()).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("index,name,extra\n"));
        let back: Vec<Row> = RecordCodec::Csv.read_records(buf.as_slice()).unwrap();
        assert_eq!(back, rows());
    }

    #[test]
    fn malformed_input_is_an_error() {
        let json: Result<Vec<Row>, _> = RecordCodec::Json.read_records("[{".as_bytes());
        assert!(matches!(json, Err(PersistError::Json(_))));

        let csv: Result<Vec<Row>, _> =
            RecordCodec::Csv.read_records("index,name,extra\nnot-a-number,a,\n".as_bytes());
        assert!(matches!(csv, Err(PersistError::Csv(_))));
    }

    #[test]
    fn parse_codec_names() {
        assert_eq!("json".parse::<RecordCodec>(), Ok(RecordCodec::Json));
        assert_eq!(" CSV ".parse::<RecordCodec>(), Ok(RecordCodec::Csv));
        assert!("yaml".parse::<RecordCodec>().is_err());
        assert_eq!(RecordCodec::default(), RecordCodec::Json);
        assert_eq!(RecordCodec::Csv.to_string(), "csv");
    }
}
