//! Data models for verification-statistics loading
//!
//! This module contains the core data structures for representing classified
//! input files, parsed positional records, the canonical fixed-width record
//! model, and the aggregate documents built from it.

use crate::constants::{self, DATA_SLOT_COUNT};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// File Classification
// =============================================================================

/// File-format families recognized by the schema registry
///
/// Classification is by file-name suffix and fails closed: an unknown suffix
/// yields no format, and the caller drops the file from the load set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Current-format statistics file (.stat)
    Stat,
    /// Legacy-format statistics file (.vsdb)
    Vsdb,
    /// Object-matching contingency file (cts.txt)
    ObjectCts,
    /// Object attribute file (obj.txt)
    ObjectObj,
    /// Time-domain object file (2d/3d variants) - recognized but not parsed
    TimeDomain,
}

impl FileFormat {
    /// Classify a file name by its suffix
    ///
    /// Returns `None` for unrecognized suffixes so the caller can purge the
    /// file from the load set with a warning.
    pub fn classify(name: &str) -> Option<FileFormat> {
        let lc_name = name.to_lowercase();

        if lc_name.ends_with(".stat") {
            Some(FileFormat::Stat)
        } else if lc_name.ends_with(".vsdb") {
            Some(FileFormat::Vsdb)
        } else if lc_name.ends_with("cts.txt") {
            Some(FileFormat::ObjectCts)
        } else if lc_name.ends_with("obj.txt") {
            Some(FileFormat::ObjectObj)
        } else if lc_name.ends_with("2d.txt")
            || lc_name.ends_with("3d_pair_cluster.txt")
            || lc_name.ends_with("3d_pair_simple.txt")
            || lc_name.ends_with("3d_single_cluster.txt")
            || lc_name.ends_with("3d_single_simple.txt")
        {
            Some(FileFormat::TimeDomain)
        } else {
            None
        }
    }

    /// Whether the loader parses this format (time-domain files are only
    /// recognized, then skipped with a warning)
    pub fn is_parsed(&self) -> bool {
        !matches!(self, FileFormat::TimeDomain)
    }

    /// Whether this format feeds the canonical statistics pipeline
    pub fn is_statistics(&self) -> bool {
        matches!(self, FileFormat::Stat | FileFormat::Vsdb)
    }

    /// Upper-case extension label used in document dataType strings
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Stat => "STAT",
            FileFormat::Vsdb => "VSDB",
            FileFormat::ObjectCts => "MODE_CTS",
            FileFormat::ObjectObj => "MODE_OBJ",
            FileFormat::TimeDomain => "MTD",
        }
    }
}

/// Metadata for one file in the load set
#[derive(Debug, Clone)]
pub struct DataFileInfo {
    /// Full path of the input file
    pub path: PathBuf,

    /// Classified file format
    pub format: FileFormat,

    /// Index of this file within the load set
    pub file_row: usize,

    /// File size in bytes at discovery time
    pub size: u64,

    /// Last-modified timestamp, if the filesystem provided one
    pub mod_date: Option<DateTime<Utc>>,
}

impl DataFileInfo {
    /// File name without its directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// =============================================================================
// Line Types
// =============================================================================

/// Canonical line-type discriminator
///
/// A closed enum over the supported record schemas. Unknown line-type tokens
/// fail classification and the line is dropped with a warning, so every
/// transform rule downstream is exhaustively checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineType {
    Fho,
    Ctc,
    Cnt,
    Sl1l2,
    Sal1l2,
    Vl1l2,
    Val1l2,
    Grad,
    Nbrcnt,
    Pct,
    Pstd,
    Eclv,
    Rhist,
    Relp,
    Enscnt,
    Rps,
    Mpr,
    Orank,
}

impl LineType {
    /// Canonical upper-case token for this line type
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Fho => "FHO",
            LineType::Ctc => "CTC",
            LineType::Cnt => "CNT",
            LineType::Sl1l2 => "SL1L2",
            LineType::Sal1l2 => "SAL1L2",
            LineType::Vl1l2 => "VL1L2",
            LineType::Val1l2 => "VAL1L2",
            LineType::Grad => "GRAD",
            LineType::Nbrcnt => "NBRCNT",
            LineType::Pct => "PCT",
            LineType::Pstd => "PSTD",
            LineType::Eclv => "ECLV",
            LineType::Rhist => "RHIST",
            LineType::Relp => "RELP",
            LineType::Enscnt => "ENSCNT",
            LineType::Rps => "RPS",
            LineType::Mpr => "MPR",
            LineType::Orank => "ORANK",
        }
    }

    /// Map a legacy line-type token (after threshold stripping) onto the
    /// canonical vocabulary
    pub fn from_legacy_token(token: &str) -> Option<LineType> {
        constants::LEGACY_TYPE_BRIDGE
            .iter()
            .find(|(legacy, _)| *legacy == token)
            .and_then(|(_, canonical)| canonical.parse().ok())
    }

    /// Staging table receiving rows of this line type
    pub fn table_name(&self) -> String {
        format!(
            "{}{}",
            constants::LINE_DATA_TABLE_PREFIX,
            self.as_str().to_lowercase()
        )
    }

    /// Ordered data field names for this line type, as tabulated by the
    /// schema registry (the fixed prefix for variable-width types)
    pub fn data_fields(&self) -> &'static [&'static str] {
        constants::data_field_names(self.as_str()).unwrap_or(&[])
    }
}

impl FromStr for LineType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FHO" => Ok(LineType::Fho),
            "CTC" => Ok(LineType::Ctc),
            "CNT" => Ok(LineType::Cnt),
            "SL1L2" => Ok(LineType::Sl1l2),
            "SAL1L2" => Ok(LineType::Sal1l2),
            "VL1L2" => Ok(LineType::Vl1l2),
            "VAL1L2" => Ok(LineType::Val1l2),
            "GRAD" => Ok(LineType::Grad),
            "NBRCNT" => Ok(LineType::Nbrcnt),
            "PCT" => Ok(LineType::Pct),
            "PSTD" => Ok(LineType::Pstd),
            "ECLV" => Ok(LineType::Eclv),
            "RHIST" => Ok(LineType::Rhist),
            "RELP" => Ok(LineType::Relp),
            "ENSCNT" => Ok(LineType::Enscnt),
            "RPS" => Ok(LineType::Rps),
            "MPR" => Ok(LineType::Mpr),
            "ORANK" => Ok(LineType::Orank),
            _ => Err(Error::configuration(format!(
                "Unknown line type token '{}'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a parsing/transform rule set: file format, schema version,
/// and line type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKind {
    pub format: FileFormat,
    pub version: String,
    pub line_type: LineType,
}

impl RecordKind {
    /// Label written into document dataType fields,
    /// e.g. `VSDB_V01_SL1L2`
    pub fn data_type_label(&self) -> String {
        format!(
            "{}_{}_{}",
            self.format.label(),
            self.version,
            self.line_type.as_str()
        )
    }
}

// =============================================================================
// Parsed Records
// =============================================================================

/// Header variants seen across historical current-format files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    /// 21 fields: no descr, no units columns
    Short,
    /// 22 fields: descr present, no units columns
    Mid,
    /// Full 24-field header
    Long,
}

impl HeaderVariant {
    /// Number of header tokens a data line carries under this variant
    pub fn field_count(&self) -> usize {
        match self {
            HeaderVariant::Short => 21,
            HeaderVariant::Mid => 22,
            HeaderVariant::Long => 24,
        }
    }
}

/// A current-format line split into positional tokens
///
/// The header tokens are already normalized to the full 24-field shape (the
/// missing-value sentinel materialized at the documented indices for short
/// variants). Data tokens missing from a truncated line are explicitly
/// `None`, never omitted - downstream code distinguishes "absent" from
/// "zero/empty".
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    /// Normalized 24-field header tokens
    pub header: Vec<String>,

    /// Positional data tokens following the header
    pub data: Vec<Option<String>>,

    /// Line number within the source file (header line counted)
    pub line_num: usize,
}

/// A legacy-format line split into its 9 header fields plus data tokens
#[derive(Debug, Clone)]
pub struct LegacyRecord {
    pub version: String,
    pub model: String,
    pub fcst_lead: String,
    pub fcst_valid_beg: String,
    pub obtype: String,
    pub vx_mask: String,
    /// Base line-type token with any embedded threshold suffix removed
    pub line_type_token: String,
    pub fcst_var: String,
    pub fcst_lev: String,

    /// Threshold suffix stripped from the line-type token, if present
    pub embedded_threshold: Option<String>,

    /// Data tokens following the header
    pub data: Vec<String>,

    /// Line number within the source file, starting at 1
    pub line_num: usize,
}

impl LegacyRecord {
    /// Data token at `index`, or `None` when the line was truncated
    pub fn token(&self, index: usize) -> Option<&str> {
        self.data.get(index).map(|s| s.as_str())
    }
}

// =============================================================================
// Canonical Records
// =============================================================================

/// Fully typed canonical header shared by every record kind
#[derive(Debug, Clone, PartialEq)]
pub struct StatHeader {
    pub version: String,
    pub model: String,
    pub descr: String,
    pub fcst_lead: i64,
    pub fcst_valid_beg: DateTime<Utc>,
    pub fcst_valid_end: DateTime<Utc>,
    pub obs_lead: i64,
    pub obs_valid_beg: DateTime<Utc>,
    pub obs_valid_end: DateTime<Utc>,
    pub fcst_var: String,
    pub fcst_units: String,
    pub fcst_lev: String,
    pub obs_var: String,
    pub obs_units: String,
    pub obs_lev: String,
    pub obtype: String,
    pub vx_mask: String,
    pub interp_mthd: String,
    pub interp_pnts: i64,
    pub fcst_thresh: String,
    pub obs_thresh: String,
    pub cov_thresh: String,
    pub alpha: String,
    pub line_type: LineType,

    // Derived fields materialized by the transform engine
    /// Forecast lead in whole hours (HHMMSS packing removed)
    pub fcst_lead_hr: i64,
    /// Forecast initialization: valid time minus lead hours
    pub fcst_init_beg: DateTime<Utc>,
    /// Percentile extracted from a parenthesized fcst_thresh
    pub fcst_perc: Option<f64>,
    /// Percentile extracted from a parenthesized obs_thresh
    pub obs_perc: Option<f64>,
}

impl StatHeader {
    /// Natural composite key grouping occurrences of the same verification
    /// identity
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            version: self.version.clone(),
            line_type: self.line_type,
            model: self.model.clone(),
            vx_mask: self.vx_mask.clone(),
            fcst_var: self.fcst_var.clone(),
            obtype: self.obtype.clone(),
            fcst_lev: self.fcst_lev.clone(),
            fcst_valid_beg: self.fcst_valid_beg,
        }
    }
}

/// One (threshold, observed-yes, observed-no) bin of a percentile record
#[derive(Debug, Clone, PartialEq)]
pub struct PctBin {
    pub thresh: f64,
    pub oy: f64,
    pub on: f64,
}

/// Canonical data payload
///
/// Most record kinds flatten to fixed positional slots directly; the
/// percentile kinds keep a variable-length list of bins per record and only
/// flatten to the fixed canonical width at serialization time.
#[derive(Debug, Clone, PartialEq)]
pub enum DataPayload {
    /// Positional slot values, at most `DATA_SLOT_COUNT` of them
    Slots(Vec<Option<String>>),

    /// Row-wise percentile bins: total, then one triple per bin
    Bins { total: f64, bins: Vec<PctBin> },
}

impl DataPayload {
    /// Flatten to exactly `DATA_SLOT_COUNT` positional slots
    ///
    /// Invariant: the output width is always the documented fixed width, via
    /// padding or truncation, for every record kind.
    pub fn flatten(&self) -> Vec<Option<String>> {
        let mut slots: Vec<Option<String>> = match self {
            DataPayload::Slots(values) => values.clone(),
            DataPayload::Bins { total, bins } => {
                let mut values = Vec::with_capacity(2 + bins.len() * 3);
                values.push(Some(format_numeric(*total)));
                values.push(Some(format!("{}", bins.len())));
                for bin in bins {
                    values.push(Some(format_numeric(bin.thresh)));
                    values.push(Some(format_numeric(bin.oy)));
                    values.push(Some(format_numeric(bin.on)));
                }
                values
            }
        };

        slots.truncate(DATA_SLOT_COUNT);
        slots.resize(DATA_SLOT_COUNT, None);
        slots
    }
}

/// A record after canonical transformation: typed header identity plus the
/// fixed-width data payload
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    /// Identity of the rule set that produced this record
    pub kind: RecordKind,

    /// Canonical header fields, fully typed
    pub header: StatHeader,

    /// Canonical data payload (fixed slots or percentile bins)
    pub data: DataPayload,

    /// Data tokens in source order, for document sub-record naming
    pub source_data: Vec<Option<String>>,

    /// Field names matching `source_data` positionally (the documented
    /// subset; empty for purely positional variable-width kinds)
    pub source_fields: &'static [&'static str],

    /// Index of the originating file within the load set
    pub file_row: usize,

    /// Line number within the originating file
    pub line_num: usize,
}

impl CanonicalRecord {
    /// Natural key of this record's verification identity
    pub fn natural_key(&self) -> NaturalKey {
        self.header.natural_key()
    }
}

/// Composite identity grouping repeated measurement occurrences
///
/// Ordering is derived so canonical record streams can be sorted into
/// key-contiguous order before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NaturalKey {
    pub version: String,
    pub line_type: LineType,
    pub model: String,
    pub vx_mask: String,
    pub fcst_var: String,
    pub obtype: String,
    pub fcst_lev: String,
    pub fcst_valid_beg: DateTime<Utc>,
}

impl NaturalKey {
    /// Document identity string:
    /// `DD::version::line_type::model::mask::variable::obs_type::level::valid_time`
    pub fn document_id(&self) -> String {
        let d = constants::DOCUMENT_ID_DELIMITER;
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
            constants::DOCUMENT_ID_PREFIX,
            self.version,
            self.line_type.as_str(),
            self.model,
            self.vx_mask,
            self.fcst_var,
            self.obtype,
            self.fcst_lev,
            self.fcst_valid_beg
                .format(constants::DOCUMENT_TS_FORMAT)
        )
    }
}

/// Format a derived numeric value without trailing zeroes
pub fn format_numeric(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Aggregate Documents
// =============================================================================

/// One per-occurrence sub-record within an aggregate document
///
/// Carries the forecast lead plus the line type's named data fields in
/// registry order; fields lost to truncation are null.
#[derive(Debug, Clone, Serialize)]
pub struct SubRecord {
    pub fcst_lead: String,

    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// An aggregate document: header snapshot plus ordered sub-records sharing a
/// natural key
#[derive(Debug, Clone, Serialize)]
pub struct StatDocument {
    pub id: String,

    #[serde(rename = "type")]
    pub doc_type: String,

    #[serde(rename = "dataType")]
    pub data_type: String,

    #[serde(rename = "dataFile_id")]
    pub data_file_id: String,

    pub version: String,
    pub model: String,

    #[serde(rename = "geoLocation_id")]
    pub geo_location_id: String,

    pub obtype: String,
    pub fcst_valid_beg: String,
    pub fcst_var: String,
    pub fcst_units: String,
    pub fcst_lev: String,

    /// Ordered per-occurrence sub-records
    pub data: Vec<SubRecord>,
}

// =============================================================================
// Object-Based Verification Records
// =============================================================================

/// Sub-classification of object records within one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Object-matching contingency record (cts files)
    Contingency,
    /// Paired object attributes (object id contains an underscore)
    Pair,
    /// Single object attributes
    Single,
}

/// One record of an object-based verification file
///
/// Object files carry their own header line, so columns are dynamic; values
/// align positionally with the owning [`ObjectFileData`] column list.
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub kind: ObjectKind,
    pub values: Vec<Option<String>>,
    pub line_num: usize,
}

/// All records parsed from one object-based verification file
#[derive(Debug, Clone)]
pub struct ObjectFileData {
    /// Normalized column names (lowercased, missing columns materialized)
    pub columns: Vec<String>,
    pub records: Vec<ObjectRecord>,
    pub file_row: usize,
}
