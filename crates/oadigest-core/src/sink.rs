//! Output sinks: JSON Lines writer and Parquet file writer

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use serde::Serialize;

use crate::flat::{FlatRecord, FlatValue};

/// Rows per `RecordBatch` handed to the parquet writer
pub const RECORD_BATCH_SIZE: usize = 8192;

/// One JSON document per line
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
    row_count: usize,
}

impl JsonLinesSink<File> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            row_count: 0,
        }
    }

    pub fn write<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        self.row_count += 1;
        Ok(())
    }

    /// Flush buffered output and return the number of rows written
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.row_count)
    }
}

/// Column type inferred from the values seen across all rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Boolean,
    Int64,
    Float64,
    Utf8,
}

impl ColumnKind {
    fn data_type(self) -> DataType {
        match self {
            Self::Boolean => DataType::Boolean,
            Self::Int64 => DataType::Int64,
            Self::Float64 => DataType::Float64,
            Self::Utf8 => DataType::Utf8,
        }
    }

    /// Widen to fit `value`: Int + Float → Float, any other mix → Utf8
    fn widen(current: Option<Self>, value: &FlatValue) -> Self {
        let seen = match value {
            FlatValue::Bool(_) => Self::Boolean,
            FlatValue::Int(_) => Self::Int64,
            FlatValue::Float(_) => Self::Float64,
            FlatValue::Text(_) => Self::Utf8,
        };
        match (current, seen) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(Self::Int64), Self::Float64) | (Some(Self::Float64), Self::Int64) => {
                Self::Float64
            }
            _ => Self::Utf8,
        }
    }
}

/// Parquet writer for flat records with atomic tmp→rename.
///
/// Rows are written in batches of [`RECORD_BATCH_SIZE`] as they arrive. The
/// schema is fixed when the first batch is flushed: seeded text columns plus
/// every key in that batch, types inferred from its values. Later rows are
/// coerced to it: unknown keys are dropped and a value that does not fit its
/// typed column becomes null. Both are counted and logged on finalize.
pub struct ParquetSink {
    pending: Vec<FlatRecord>,
    writer: Option<ArrowWriter<File>>,
    schema: Option<Arc<Schema>>,
    columns: Vec<(String, ColumnKind)>,
    text_columns: Vec<String>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    level: ZstdLevel,
    row_count: usize,
    dropped_keys: BTreeSet<String>,
    nulled_cells: usize,
}

impl std::fmt::Debug for ParquetSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl ParquetSink {
    pub fn new(path: &Path, zstd_level: i32) -> io::Result<Self> {
        let level = ZstdLevel::try_new(zstd_level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        // Clean up stale tmp file
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        Ok(Self {
            pending: Vec::with_capacity(RECORD_BATCH_SIZE),
            writer: None,
            schema: None,
            columns: Vec::new(),
            text_columns: Vec::new(),
            tmp_path,
            final_path: path.to_path_buf(),
            level,
            row_count: 0,
            dropped_keys: BTreeSet::new(),
            nulled_cells: 0,
        })
    }

    /// Columns known up front to hold text, present in the schema even if
    /// the first batch never sets them
    pub fn with_text_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_columns.extend(names.into_iter().map(Into::into));
        self
    }

    /// Queue a row, writing a batch once [`RECORD_BATCH_SIZE`] rows are queued
    pub fn push(&mut self, row: FlatRecord) -> io::Result<()> {
        self.pending.push(row);
        if self.pending.len() >= RECORD_BATCH_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        if self.writer.is_none() && !self.open_writer()? {
            log::warn!(
                "Skipping {} rows without columns for {}",
                self.pending.len(),
                self.final_path.display()
            );
            self.pending.clear();
            return Ok(());
        }
        let rows = std::mem::take(&mut self.pending);
        let batch = self.build_batch(&rows)?;
        if let Some(writer) = self.writer.as_mut() {
            writer.write(&batch).map_err(io::Error::other)?;
        }
        self.row_count += rows.len();
        Ok(())
    }

    /// Fix the schema from the pending batch and open the tmp file.
    ///
    /// Returns false when there are still no columns to write.
    fn open_writer(&mut self) -> io::Result<bool> {
        let (schema, columns) = infer_schema(&self.pending, &self.text_columns);
        if columns.is_empty() {
            return Ok(false);
        }
        let file = File::create(&self.tmp_path)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(self.level))
            .build();
        let writer =
            ArrowWriter::try_new(file, schema.clone(), Some(props)).map_err(io::Error::other)?;
        self.writer = Some(writer);
        self.schema = Some(schema);
        self.columns = columns;
        Ok(true)
    }

    fn build_batch(&mut self, rows: &[FlatRecord]) -> io::Result<RecordBatch> {
        for row in rows {
            for key in row.keys() {
                if !self.columns.iter().any(|(name, _)| name == key)
                    && !self.dropped_keys.contains(key)
                {
                    log::debug!("Dropping column {key} not in the parquet schema");
                    self.dropped_keys.insert(key.clone());
                }
            }
        }
        let mut columns = Vec::with_capacity(self.columns.len());
        for (name, kind) in &self.columns {
            let (array, nulled) = build_column(rows, name, *kind);
            self.nulled_cells += nulled;
            columns.push(array);
        }
        let schema = self
            .schema
            .clone()
            .ok_or_else(|| io::Error::other("parquet schema not initialized"))?;
        RecordBatch::try_new(schema, columns).map_err(io::Error::other)
    }

    /// Write the remaining rows, close the file, and rename tmp → final.
    ///
    /// Writes nothing when no row ever had a column.
    pub fn finalize(mut self) -> io::Result<usize> {
        self.flush()?;
        let Some(writer) = self.writer.take() else {
            log::warn!(
                "No columns to write, skipping {}",
                self.final_path.display()
            );
            return Ok(0);
        };
        writer.close().map_err(io::Error::other)?;
        fs::rename(&self.tmp_path, &self.final_path)?;

        if !self.dropped_keys.is_empty() {
            let keys: Vec<&str> = self.dropped_keys.iter().map(String::as_str).collect();
            log::warn!(
                "Columns first seen after the schema was fixed were dropped: {}",
                keys.join(", ")
            );
        }
        if self.nulled_cells > 0 {
            log::warn!(
                "{} values did not match their column type and were written as null",
                self.nulled_cells
            );
        }
        Ok(self.row_count)
    }
}

fn infer_schema(
    rows: &[FlatRecord],
    text_columns: &[String],
) -> (Arc<Schema>, Vec<(String, ColumnKind)>) {
    let mut kinds: BTreeMap<&str, ColumnKind> = text_columns
        .iter()
        .map(|name| (name.as_str(), ColumnKind::Utf8))
        .collect();
    for row in rows {
        for (key, value) in row {
            let current = kinds.get(key.as_str()).copied();
            kinds.insert(key.as_str(), ColumnKind::widen(current, value));
        }
    }
    let fields: Vec<Field> = kinds
        .iter()
        .map(|(name, kind)| Field::new(*name, kind.data_type(), true))
        .collect();
    let kinds = kinds
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();
    (Arc::new(Schema::new(fields)), kinds)
}

/// Build one column; also returns how many present values did not fit `kind`
fn build_column(rows: &[FlatRecord], name: &str, kind: ColumnKind) -> (ArrayRef, usize) {
    let cells: Vec<Option<&FlatValue>> = rows.iter().map(|row| row.get(name)).collect();
    let present = cells.iter().filter(|v| v.is_some()).count();
    let array: ArrayRef = match kind {
        ColumnKind::Boolean => Arc::new(BooleanArray::from(
            cells
                .iter()
                .map(|v| match *v {
                    Some(FlatValue::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Int64 => Arc::new(Int64Array::from(
            cells
                .iter()
                .map(|v| match *v {
                    Some(FlatValue::Int(i)) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Float64 => Arc::new(Float64Array::from(
            cells
                .iter()
                .map(|v| match *v {
                    Some(FlatValue::Float(x)) => Some(*x),
                    Some(FlatValue::Int(i)) => Some(*i as f64),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Utf8 => Arc::new(StringArray::from(
            cells
                .iter()
                .map(|v| v.map(|v| v.to_string()))
                .collect::<Vec<_>>(),
        )),
    };
    let written = array.len() - array.null_count();
    (array, present - written)
}
