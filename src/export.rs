use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;

use crate::error::{Result, StudyError};
use crate::store::{DataRecord, TestRun};

pub const CSV_MIME: &str = "text/csv";

/// A rendered CSV download for one run
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl CsvExport {
    pub fn for_run(run: &TestRun) -> Result<Self> {
        if !run.has_data() {
            return Err(StudyError::NoData(run.name.clone()));
        }
        Ok(Self {
            file_name: file_name_for(&run.name),
            mime_type: CSV_MIME,
            contents: to_csv(&run.data)?,
        })
    }

    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// `<name>.csv` with path separators neutralised
pub fn file_name_for(run_name: &str) -> String {
    let safe: String = run_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.csv", safe)
}

/// Serializes records with the first record's keys as header.
///
/// Rows are CRLF separated without a trailing terminator. Keys missing from
/// a later record and JSON nulls become empty fields.
pub fn to_csv(records: &[DataRecord]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(headers.iter().map(|h| h.as_str()))?;
    for record in records {
        writer.write_record(headers.iter().map(|h| field_text(record.get(*h))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StudyError::Io(e.into_error()))?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with("\r\n") {
        text.truncate(text.len() - 2);
    }
    Ok(text)
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RunId;
    use assert_matches::assert_matches;
    use chrono::Local;
    use serde_json::json;

    fn rec(pairs: &[(&str, Value)]) -> DataRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn run(name: &str, data: Vec<DataRecord>) -> TestRun {
        TestRun {
            id: RunId(1),
            name: name.to_string(),
            data,
            created_at: Local::now(),
        }
    }

    #[test]
    fn test_quotes_are_doubled() {
        let records = vec![rec(&[("a", json!("1")), ("b", json!("he said \"hi\""))])];
        assert_eq!(to_csv(&records).unwrap(), "a,b\r\n1,\"he said \"\"hi\"\"\"");
    }

    #[test]
    fn test_rows_joined_with_crlf() {
        let records = vec![
            rec(&[("x", json!("1"))]),
            rec(&[("x", json!("2"))]),
            rec(&[("x", json!("3"))]),
        ];
        assert_eq!(to_csv(&records).unwrap(), "x\r\n1\r\n2\r\n3");
    }

    #[test]
    fn test_missing_and_null_fields_are_empty() {
        let records = vec![
            rec(&[("a", json!("1")), ("b", json!("2"))]),
            rec(&[("a", Value::Null)]),
        ];
        assert_eq!(to_csv(&records).unwrap(), "a,b\r\n1,2\r\n,");
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let records = vec![rec(&[("n", json!(42)), ("ok", json!(true))])];
        assert_eq!(to_csv(&records).unwrap(), "n,ok\r\n42,true");
    }

    #[test]
    fn test_header_uses_first_record_only() {
        let records = vec![
            rec(&[("a", json!("1"))]),
            rec(&[("a", json!("2")), ("z", json!("ignored"))]),
        ];
        assert_eq!(to_csv(&records).unwrap(), "a\r\n1\r\n2");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let records = vec![rec(&[("a", json!("x,y"))])];
        assert_eq!(to_csv(&records).unwrap(), "a\r\n\"x,y\"");
    }

    #[test]
    fn test_export_requires_data() {
        assert_matches!(
            CsvExport::for_run(&run("Тест 1", vec![])),
            Err(StudyError::NoData(name)) if name == "Тест 1"
        );
    }

    #[test]
    fn test_export_metadata() {
        let export = CsvExport::for_run(&run("Анна", vec![rec(&[("a", json!("1"))])])).unwrap();
        assert_eq!(export.file_name, "Анна.csv");
        assert_eq!(export.mime_type, "text/csv");
        assert_eq!(export.contents, "a\r\n1");
    }

    #[test]
    fn test_file_name_replaces_separators() {
        assert_eq!(file_name_for("a/b\\c"), "a_b_c.csv");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export = CsvExport::for_run(&run("p", vec![rec(&[("a", json!("1"))])])).unwrap();
        let path = export.write_to(dir.path().join("nested")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\r\n1");
    }
}
