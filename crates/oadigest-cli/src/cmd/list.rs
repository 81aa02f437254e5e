//! List subcommand - one page or a full traversal, exported as JSONL or parquet

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::Args;

use oadigest_core::{JsonLinesSink, ParquetSink, SharedProgress, fmt_num, is_shutdown_requested};
use oadigest_openalex::{DigestOptions, Entity, Item, OpenAlexClient, Query, text_columns};

use super::{DigestArgs, EntityArg};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Entity type
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Filter expression, e.g. "publication_year:>2020,type:article"
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Full-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort expression, e.g. "cited_by_count:desc"
    #[arg(long)]
    pub sort: Option<String>,

    /// Comma-separated top-level fields to return
    #[arg(long)]
    pub select: Option<String>,

    /// Records per request (1-200)
    #[arg(short = 'n', long)]
    pub per_page: Option<u32>,

    /// Page number (offset paging)
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Cursor from a previous response ("*" to start)
    #[arg(long)]
    pub cursor: Option<String>,

    /// Fetch every matching record instead of one page
    #[arg(short, long)]
    pub all: bool,

    /// Stop after this many records (with --all)
    #[arg(short, long, requires = "all")]
    pub limit: Option<u64>,

    #[command(flatten)]
    pub digest: DigestArgs,

    /// Output file (.jsonl or .parquet); JSON Lines on stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ListArgs {
    fn query(&self) -> Query {
        Query {
            filter: self.filter.clone(),
            search: self.search.clone(),
            sort: self.sort.clone(),
            select: self.select.clone(),
            per_page: self.per_page,
            page: self.page,
            cursor: self.cursor.clone(),
        }
    }
}

/// Where listed records go
enum Output {
    Stdout(JsonLinesSink<io::StdoutLock<'static>>),
    File(JsonLinesSink<File>),
    Parquet(ParquetSink),
}

impl Output {
    fn open(
        path: Option<&Path>,
        entity: Entity,
        options: DigestOptions,
        zstd_level: i32,
    ) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(JsonLinesSink::new(io::stdout().lock())));
        };
        if path.extension().is_some_and(|ext| ext == "parquet") {
            ensure!(
                options.enabled,
                "Parquet output needs flat records, add --digest"
            );
            let sink = ParquetSink::new(path, zstd_level)
                .with_context(|| format!("Failed to prepare {}", path.display()))?
                .with_text_columns(text_columns(entity, options.include_abstract));
            return Ok(Self::Parquet(sink));
        }
        let sink = JsonLinesSink::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self::File(sink))
    }

    fn write(&mut self, item: Item) -> Result<()> {
        match self {
            Self::Stdout(sink) => sink.write(&item)?,
            Self::File(sink) => sink.write(&item)?,
            Self::Parquet(sink) => match item.into_digested() {
                Some(record) => sink.push(record.into_flat())?,
                None => bail!("Parquet output received an undigested record"),
            },
        }
        Ok(())
    }

    fn finish(self) -> Result<usize> {
        let written = match self {
            Self::Stdout(sink) => sink.finish()?,
            Self::File(sink) => sink.finish()?,
            Self::Parquet(sink) => sink.finalize()?,
        };
        Ok(written)
    }
}

pub fn run(args: ListArgs, client: &OpenAlexClient, config: &Config, progress: &SharedProgress) -> Result<()> {
    let entity = Entity::from(args.entity);
    let options = DigestOptions::from(args.digest);
    let query = args.query();
    let mut output = Output::open(
        args.output.as_deref(),
        entity,
        options,
        config.output.compression_level,
    )?;

    if !args.all {
        let page = client
            .list(entity, &query, options)
            .with_context(|| format!("Failed to list {entity}"))?;
        log::info!(
            "{entity}: {} of {} records",
            page.len(),
            fmt_num(page.count)
        );
        if let Some(cursor) = &page.cursor {
            log::info!("Next cursor: {cursor}");
        }
        for item in page.items {
            output.write(item)?;
        }
        output.finish()?;
        return Ok(());
    }

    let spinner = progress.spinner(entity.path());
    let mut items = client.list_all(entity, query, options);
    if let Some(limit) = args.limit {
        items = items.with_max_records(limit);
    }

    // Already-written records are kept on error or interrupt
    let mut traversal = Ok(());
    loop {
        if is_shutdown_requested() {
            log::warn!("Interrupted, stopping after {} records", fmt_num(items.records_yielded()));
            break;
        }
        let Some(item) = items.next() else {
            break;
        };
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                traversal = Err(e);
                break;
            }
        };
        output.write(item)?;
        let total = items.total_count().map(fmt_num).unwrap_or_else(|| "?".into());
        spinner.set_message(format!("{} / {total}", fmt_num(items.records_yielded())));
    }
    spinner.finish_and_clear();

    let written = output.finish()?;
    log::info!(
        "{entity}: wrote {} records in {} pages",
        fmt_num(written as u64),
        items.pages_fetched()
    );
    traversal.with_context(|| format!("Failed to list {entity} after {written} records"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        list: ListArgs,
    }

    fn parse(args: &[&str]) -> Result<ListArgs, clap::Error> {
        let argv = std::iter::once("list").chain(args.iter().copied());
        TestCli::try_parse_from(argv).map(|cli| cli.list)
    }

    #[test]
    fn query_from_args() {
        let args = parse(&["works", "-f", "is_oa:true", "--sort", "cited_by_count:desc", "-n", "50", "-p", "3"])
            .unwrap();
        let query = args.query();
        assert_eq!(query.filter.as_deref(), Some("is_oa:true"));
        assert_eq!(query.sort.as_deref(), Some("cited_by_count:desc"));
        assert_eq!(query.per_page, Some(50));
        assert_eq!(query.page, Some(3));
        assert!(!args.all);
    }

    #[test]
    fn limit_requires_all() {
        assert!(parse(&["works", "--limit", "5"]).is_err());
        assert!(parse(&["works", "--all", "--limit", "5"]).is_ok());
    }

    #[test]
    fn abstract_requires_digest() {
        assert!(parse(&["works", "--abstract"]).is_err());
        let args = parse(&["works", "--digest", "--abstract"]).unwrap();
        assert_eq!(DigestOptions::from(args.digest), DigestOptions::DIGEST_WITH_ABSTRACT);
    }

    #[test]
    fn parquet_output_requires_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.parquet");
        assert!(Output::open(Some(path.as_path()), Entity::Works, DigestOptions::RAW, 3).is_err());
        assert!(Output::open(Some(path.as_path()), Entity::Works, DigestOptions::DIGEST, 3).is_ok());
    }

    #[test]
    fn jsonl_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.jsonl");
        let mut output = Output::open(Some(path.as_path()), Entity::Works, DigestOptions::RAW, 3).unwrap();
        let record = oadigest_openalex::RawRecord::from_value(serde_json::json!({"id": "W1"})).unwrap();
        output.write(Item::Raw(record)).unwrap();
        assert_eq!(output.finish().unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"id\":\"W1\"}\n");
    }

    #[test]
    fn parquet_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.parquet");
        let mut output =
            Output::open(Some(path.as_path()), Entity::Works, DigestOptions::DIGEST, 3).unwrap();
        for id in ["W1", "W2"] {
            let record = oadigest_openalex::RawRecord::from_value(
                serde_json::json!({"id": id, "publication_date": "2020-01-01"}),
            )
            .unwrap();
            output
                .write(Item::from_raw(record, Entity::Works, DigestOptions::DIGEST))
                .unwrap();
        }
        assert_eq!(output.finish().unwrap(), 2);
        assert!(path.exists());
    }
}
