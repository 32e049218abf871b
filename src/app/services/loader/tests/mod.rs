//! Tests for discovery and the parallel load orchestration

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::app::models::{DataFileInfo, FileFormat};
use crate::app::services::loader::{FileOutcome, FilePipeline, discover_files, run_load};
use crate::app::services::sink_writer::{
    DocumentSink, MemoryDocumentSink, MemoryTableSink, TableSink,
};
use crate::config::{Config, LoadFlags, SinkMode};
use crate::{Error, Result};

const STAT_HEADER: &str = "VERSION MODEL DESC FCST_LEAD FCST_VALID_BEG FCST_VALID_END \
OBS_LEAD OBS_VALID_BEG OBS_VALID_END FCST_VAR FCST_UNITS FCST_LEV OBS_VAR OBS_UNITS OBS_LEV \
OBTYPE VX_MASK INTERP_MTHD INTERP_PNTS FCST_THRESH OBS_THRESH COV_THRESH ALPHA LINE_TYPE";

const STAT_SL1L2: &str = "V8.0 GFS NA 120000 20190601_120000 20190601_120000 000000 \
20190601_120000 20190601_120000 TMP K P500 TMP K P500 ANALYS G2 NEAREST 1 NA NA NA NA SL1L2 \
3456 273.1 272.9 74562.1 74580.2 74544.9";

const STAT_CTC: &str = "V8.0 GFS NA 120000 20190601_120000 20190601_120000 000000 \
20190601_120000 20190601_120000 TMP K P500 TMP K P500 ANALYS G2 NEAREST 1 NA NA NA NA CTC \
100 20 30 10 40";

const VSDB_SL1L2: &str =
    "V01 GFS 12 2019060112 ANALYS G2 SL1L2 TMP P500 = 3456 273.1 272.9 74562.1 74580.2 74544.9";

const CTS_FILE: &str = "VERSION MODEL FCST_LEAD FCST_VALID FIELD\n\
V8.0 GFS 120000 20190601_120000 RAW\n";

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn file_info(path: &Path) -> DataFileInfo {
    let name = path.file_name().unwrap().to_string_lossy();
    DataFileInfo {
        path: path.to_path_buf(),
        format: FileFormat::classify(&name).unwrap(),
        file_row: 0,
        size: fs::metadata(path).unwrap().len(),
        mod_date: None,
    }
}

fn test_config(input: &Path, output: &Path) -> Config {
    Config::new(input.to_path_buf())
        .with_staging_dir(output.join("staging"))
        .with_document_dir(output.join("documents"))
        .with_sink_mode(SinkMode::Both)
        .with_workers(2)
        .without_progress()
}

mod discovery_tests {
    use super::*;

    #[test]
    fn test_discovery_classifies_and_purges() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(dir.path(), "b.stat", STAT_SL1L2);
        write_file(&dir.path().join("sub"), "a.vsdb", VSDB_SL1L2);
        write_file(dir.path(), "mode_cts.txt", CTS_FILE);
        write_file(dir.path(), "notes.txt", "not a load candidate");
        write_file(dir.path(), "empty.stat", "");
        write_file(dir.path(), "mtd_2d.txt", "time domain");

        let config = test_config(dir.path(), dir.path());
        let files = discover_files(&config).unwrap();

        assert_eq!(files.len(), 3);
        // sorted by path, numbered sequentially
        for (index, file) in files.iter().enumerate() {
            assert_eq!(file.file_row, index);
        }
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert!(names.contains(&"b.stat".to_string()));
        assert!(names.contains(&"a.vsdb".to_string()));
        assert!(names.contains(&"mode_cts.txt".to_string()));
    }

    #[test]
    fn test_discovery_respects_family_flags() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.stat", STAT_SL1L2);
        write_file(dir.path(), "b.vsdb", VSDB_SL1L2);
        write_file(dir.path(), "mode_cts.txt", CTS_FILE);

        let mut config = test_config(dir.path(), dir.path());
        config.flags = LoadFlags {
            load_vsdb: false,
            load_object: false,
            ..Default::default()
        };

        let files = discover_files(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].format, FileFormat::Stat);
    }

    #[test]
    fn test_discovery_missing_input_errors() {
        let config = test_config(Path::new("/nonexistent/input"), Path::new("/tmp"));
        assert!(discover_files(&config).is_err());
    }
}

mod pipeline_tests {
    use super::*;

    async fn process_one(
        content: &str,
        name: &str,
        flags: LoadFlags,
    ) -> Result<(FileOutcome, MemoryTableSink, MemoryDocumentSink)> {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), name, content);

        let mut pipeline = FilePipeline::new(flags);
        let mut table_sink = MemoryTableSink::new();
        let mut document_sink = MemoryDocumentSink::new();

        let outcome = pipeline
            .process_file(
                &file_info(&dir.path().join(name)),
                Some(&mut table_sink as &mut dyn TableSink),
                Some(&mut document_sink as &mut dyn DocumentSink),
            )
            .await?;

        Ok((outcome, table_sink, document_sink))
    }

    #[tokio::test]
    async fn test_stat_file_feeds_both_paths() {
        let content = format!("{}\n{}\n{}\n", STAT_HEADER, STAT_SL1L2, STAT_CTC);
        let (outcome, table_sink, document_sink) =
            process_one(&content, "run.stat", LoadFlags::default())
                .await
                .unwrap();

        assert_eq!(outcome.records_loaded, 2);
        assert_eq!(outcome.records_filtered, 0);
        assert_eq!(table_sink.rows["line_data_sl1l2"].len(), 1);
        assert_eq!(table_sink.rows["line_data_ctc"].len(), 1);

        // the two records carry different line types, so two documents
        assert_eq!(outcome.documents_written, 2);
        assert_eq!(document_sink.documents.len(), 2);
    }

    #[tokio::test]
    async fn test_line_type_filter_drops_records() {
        let content = format!("{}\n{}\n{}\n", STAT_HEADER, STAT_SL1L2, STAT_CTC);
        let flags = LoadFlags {
            line_type_allow: Some(vec!["CTC".to_string()]),
            ..Default::default()
        };
        let (outcome, table_sink, _) = process_one(&content, "run.stat", flags).await.unwrap();

        assert_eq!(outcome.records_loaded, 1);
        assert_eq!(outcome.records_filtered, 1);
        assert!(table_sink.rows.contains_key("line_data_ctc"));
        assert!(!table_sink.rows.contains_key("line_data_sl1l2"));
    }

    #[tokio::test]
    async fn test_legacy_file_bridges_into_canonical_tables() {
        let content = format!("{}\n", VSDB_SL1L2);
        let (outcome, table_sink, document_sink) =
            process_one(&content, "GFS_2019060112.vsdb", LoadFlags::default())
                .await
                .unwrap();

        assert_eq!(outcome.records_loaded, 1);
        assert_eq!(table_sink.rows["line_data_sl1l2"].len(), 1);

        let document = document_sink.documents.values().next().unwrap();
        assert_eq!(document.data_type, "VSDB_V01_SL1L2");
    }

    #[tokio::test]
    async fn test_object_file_feeds_relational_path_only() {
        let (outcome, table_sink, document_sink) =
            process_one(CTS_FILE, "mode_cts.txt", LoadFlags::default())
                .await
                .unwrap();

        assert_eq!(outcome.object_records, 1);
        assert_eq!(outcome.documents_written, 0);
        assert_eq!(table_sink.rows["mode_cts"].len(), 1);
        assert!(document_sink.documents.is_empty());
    }
}

mod run_load_tests {
    use super::*;

    #[tokio::test]
    async fn test_run_load_end_to_end() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(
            input.path(),
            "run.stat",
            &format!("{}\n{}\n{}\n", STAT_HEADER, STAT_SL1L2, STAT_CTC),
        );
        write_file(
            input.path(),
            "GFS_2019060112.vsdb",
            &format!("{}\n", VSDB_SL1L2),
        );

        let config = test_config(input.path(), output.path());
        config.ensure_output_directories().unwrap();

        let files = discover_files(&config).unwrap();
        let summary = run_load(&config, files, CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_failed, 0);
        assert_eq!(summary.records_loaded, 3);
        assert!(summary.documents_written >= 2);

        // each worker stages its own files; at least one per touched table
        let staged: Vec<String> = fs::read_dir(output.path().join("staging"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(staged.iter().any(|n| n.starts_with("line_data_sl1l2_")));
        assert!(staged.iter().any(|n| n.starts_with("line_data_ctc_")));

        let documents: String = fs::read_dir(output.path().join("documents"))
            .unwrap()
            .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
            .collect();
        assert!(documents.contains("\"type\":\"DataDocument\""));
    }

    #[tokio::test]
    async fn test_run_load_empty_set_is_fatal() {
        let input = TempDir::new().unwrap();
        let config = test_config(input.path(), input.path());

        let result = run_load(&config, Vec::new(), CancellationToken::new(), None).await;
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_run_load_honours_cancellation() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(
            input.path(),
            "run.stat",
            &format!("{}\n{}\n", STAT_HEADER, STAT_SL1L2),
        );

        let config = test_config(input.path(), output.path());
        config.ensure_output_directories().unwrap();
        let files = discover_files(&config).unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let result = run_load(&config, files, token, None).await;
        assert!(matches!(result, Err(Error::ProcessingInterrupted { .. })));
    }

    #[tokio::test]
    async fn test_record_free_file_counts_as_processed() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_file(
            input.path(),
            "good.stat",
            &format!("{}\n{}\n", STAT_HEADER, STAT_SL1L2),
        );
        write_file(input.path(), "bad.stat", &format!("{}\n", STAT_HEADER));

        let config = test_config(input.path(), output.path());
        config.ensure_output_directories().unwrap();
        let files = discover_files(&config).unwrap();

        let summary = run_load(&config, files, CancellationToken::new(), None)
            .await
            .unwrap();

        // a header-only file parses to zero records but is not a failure
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.records_loaded, 1);
    }
}
