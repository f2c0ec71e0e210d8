//! Record files: one JSON record per line.
//!
//! Excluded scenarios are written ahead of the records as
//! `{"meta": {"model": .., "scenario": .., "exclude": true}}` lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ia_store::{Record, RecordStore, ScenarioId, ScenarioMeta};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
struct MetaRow {
    #[serde(flatten)]
    id: ScenarioId,
    #[serde(flatten)]
    meta: ScenarioMeta,
}

#[derive(Debug, Serialize, Deserialize)]
struct MetaLine {
    meta: MetaRow,
}

fn parse_error(line: usize) -> impl Fn(serde_json::Error) -> AppError {
    move |e| AppError::Parse {
        line,
        message: e.to_string(),
    }
}

/// Parse JSON lines into a store. Blank lines are skipped.
pub fn read_records(reader: impl BufRead) -> AppResult<RecordStore> {
    let mut store = RecordStore::new();
    let mut metas = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line).map_err(parse_error(index + 1))?;
        if value.get("meta").is_some() {
            let row: MetaLine = serde_json::from_value(value).map_err(parse_error(index + 1))?;
            metas.push(row.meta);
            continue;
        }
        let record: Record = serde_json::from_value(value).map_err(parse_error(index + 1))?;
        store.insert(record.key, record.value)?;
    }
    for row in metas {
        store.meta_mut().set_exclude(row.id, row.meta.exclude);
    }
    Ok(store)
}

pub fn write_records(mut writer: impl Write, store: &RecordStore) -> AppResult<()> {
    for (id, meta) in store.meta().iter().filter(|(_, m)| m.exclude) {
        let row = MetaLine {
            meta: MetaRow {
                id: id.clone(),
                meta: meta.clone(),
            },
        };
        let line = serde_json::to_string(&row)
            .map_err(|e| AppError::InvalidInput(format!("Failed to serialize meta: {e}")))?;
        writeln!(writer, "{line}")?;
    }
    for record in store.records() {
        let line = serde_json::to_string(&record)
            .map_err(|e| AppError::InvalidInput(format!("Failed to serialize record: {e}")))?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_records(path: &Path) -> AppResult<RecordStore> {
    let file = File::open(path).map_err(|e| AppError::DataFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_records(BufReader::new(file))
}

pub fn save_records(path: &Path, store: &RecordStore) -> AppResult<()> {
    let file = File::create(path).map_err(|e| AppError::DataFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_records(BufWriter::new(file), store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_years_and_extra_columns() {
        let input = r#"
{"model":"model_a","scenario":"scen_a","region":"World","variable":"Primary Energy","unit":"EJ/yr","time":2005,"value":12}
{"model":"model_a","scenario":"scen_a","region":"World","variable":"Primary Energy","unit":"EJ/yr","extra":{"subannual":"summer"},"time":2005,"value":3.5}
"#;
        let store = read_records(input.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.extra_values("subannual").len(), 1);
    }

    #[test]
    fn exclude_flags_survive_a_round_trip() {
        let input = r#"{"model":"model_a","scenario":"scen_a","region":"World","variable":"Population","unit":"m","time":2005,"value":3}
{"model":"model_a","scenario":"scen_b","region":"World","variable":"Population","unit":"m","time":2005,"value":4}
"#;
        let mut store = read_records(input.as_bytes()).unwrap();
        let failing = ScenarioId::new("model_a", "scen_a");
        store.meta_mut().set_exclude(failing.clone(), true);

        let mut buffer = Vec::new();
        write_records(&mut buffer, &store).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with(r#"{"meta":{"model":"model_a","scenario":"scen_a","exclude":true}}"#));

        let back = read_records(buffer.as_slice()).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.meta().is_excluded(&failing));
        assert!(!back.meta().is_excluded(&ScenarioId::new("model_a", "scen_b")));
        assert_eq!(back.meta().excluded().len(), 1);
    }

    #[test]
    fn reports_line_of_bad_meta() {
        let input = "{\"meta\":{\"model\":\"m\"}}\n";
        match read_records(input.as_bytes()) {
            Err(AppError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn reports_line_of_bad_record() {
        let input = "{\"model\":\"m\"}\n";
        match read_records(input.as_bytes()) {
            Err(AppError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
