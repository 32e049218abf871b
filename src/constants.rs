//! Application constants for the verification statistics loader
//!
//! This module is the static half of the schema registry: header field lists
//! for every supported file family and historical variant, per-line-type data
//! field names, missing-value sentinels, timestamp formats, and processing
//! defaults used throughout the loader.

// =============================================================================
// Missing-Value Sentinels
// =============================================================================

/// Missing value indicator on input ("not available")
pub const MISSING_NA: &str = "NA";

/// Missing value sentinel written to all outputs
pub const MISSING_VALUE: &str = "-9999";

/// Missing value sentinel as a number, for derived numeric columns
pub const MISSING_VALUE_NUM: f64 = -9999.0;

/// Default token for count-style columns the legacy format never carried
pub const ZERO_VALUE: &str = "0";

// =============================================================================
// Canonical Schema Dimensions
// =============================================================================

/// Fixed number of positional data slots in every canonical record
pub const DATA_SLOT_COUNT: usize = 96;

/// Full current-format header: 24 canonical fields, in file order
pub const CURRENT_HEADER: &[&str] = &[
    "version",
    "model",
    "descr",
    "fcst_lead",
    "fcst_valid_beg",
    "fcst_valid_end",
    "obs_lead",
    "obs_valid_beg",
    "obs_valid_end",
    "fcst_var",
    "fcst_units",
    "fcst_lev",
    "obs_var",
    "obs_units",
    "obs_lev",
    "obtype",
    "vx_mask",
    "interp_mthd",
    "interp_pnts",
    "fcst_thresh",
    "obs_thresh",
    "cov_thresh",
    "alpha",
    "line_type",
];

/// Position of the descr column within the full header
pub const DESCR_INDEX: usize = 2;

/// Position of the fcst_units column within the full header
pub const FCST_UNITS_INDEX: usize = 10;

/// Position of the obs_units column within the full header
pub const OBS_UNITS_INDEX: usize = 13;

/// Legacy-format header: 9 fields, in file order
pub const LEGACY_HEADER: &[&str] = &[
    "version",
    "model",
    "fcst_lead",
    "fcst_valid_beg",
    "obtype",
    "vx_mask",
    "line_type",
    "fcst_var",
    "fcst_lev",
];

/// Position of the line-type token in a legacy line
pub const LEGACY_LINE_TYPE_INDEX: usize = 6;

/// Names of the positional data slots, used as staging-table column names
pub const DATA_SLOT_NAMES: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
    "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30", "31",
    "32", "33", "34", "35", "36", "37", "38", "39", "40", "41", "42", "43", "44", "45", "46",
    "47", "48", "49", "50", "51", "52", "53", "54", "55", "56", "57", "58", "59", "60", "61",
    "62", "63", "64", "65", "66", "67", "68", "69", "70", "71", "72", "73", "74", "75", "76",
    "77", "78", "79", "80", "81", "82", "83", "84", "85", "86", "87", "88", "89", "90", "91",
    "92", "93", "94", "95",
];

/// Derived header columns appended between the canonical header and the data
/// slots in relational output
pub const DERIVED_HEADER_COLUMNS: &[&str] =
    &["fcst_lead_hr", "fcst_init_beg", "fcst_perc", "obs_perc"];

// =============================================================================
// Line Types
// =============================================================================

/// Supported canonical line-type tokens
pub const LINE_TYPE_TOKENS: &[&str] = &[
    "FHO", "CTC", "CNT", "SL1L2", "SAL1L2", "VL1L2", "VAL1L2", "GRAD", "NBRCNT", "PCT", "PSTD",
    "ECLV", "RHIST", "RELP", "ENSCNT", "RPS", "MPR", "ORANK",
];

/// Legacy line-type vocabulary mapped onto the canonical one
pub const LEGACY_TYPE_BRIDGE: &[(&str, &str)] = &[
    ("FHO", "CTC"),
    ("FSS", "NBRCNT"),
    ("HIST", "RHIST"),
    ("RELI", "PCT"),
    ("ECON", "ECLV"),
    ("BSS", "PSTD"),
    ("RMSE", "CNT"),
    ("FSO", "ENSCNT"),
    ("SL1L2", "SL1L2"),
    ("SAL1L2", "SAL1L2"),
    ("VL1L2", "VL1L2"),
    ("VAL1L2", "VAL1L2"),
    ("GRAD", "GRAD"),
    ("RELP", "RELP"),
];

/// Legacy line types whose model field carries ensemble information
pub const LEGACY_ENSEMBLE_TYPES: &[&str] = &["BSS", "ECON", "FSO", "HIST", "RELI", "RELP"];

/// Fixed cost-loss evaluation points for the economic-value curve doubling
pub const ECON_EVALUATION_POINTS: &[f64] = &[
    0.952381, 0.909091, 0.8, 0.666667, 0.5, 0.333333, 0.2, 0.125, 0.1, 0.05, 0.02, 0.01, 0.005,
    0.002, 0.001, 0.0005, 0.0002, 0.0001,
];

// =============================================================================
// Per-Line-Type Data Field Names
// =============================================================================

/// Ordered data field names for each canonical line type, as they appear
/// positionally in the source line. Variable-width types (PCT, RHIST, RELP,
/// ORANK) list their fixed prefix; the remaining tokens are positional.
pub fn data_field_names(line_type: &str) -> Option<&'static [&'static str]> {
    match line_type {
        "FHO" => Some(&["total", "f_rate", "h_rate", "o_rate"]),
        "CTC" => Some(&["total", "fy_oy", "fy_on", "fn_oy", "fn_on"]),
        "SL1L2" => Some(&["total", "fbar", "obar", "fobar", "ffbar", "oobar", "mae"]),
        "SAL1L2" => Some(&["total", "fabar", "oabar", "foabar", "ffabar", "ooabar", "mae"]),
        "VL1L2" => Some(&[
            "total",
            "ufbar",
            "vfbar",
            "uobar",
            "vobar",
            "uvfobar",
            "uvffbar",
            "uvoobar",
            "f_speed_bar",
            "o_speed_bar",
        ]),
        "VAL1L2" => Some(&[
            "total", "ufabar", "vfabar", "uoabar", "voabar", "uvfoabar", "uvffabar", "uvooabar",
        ]),
        "GRAD" => Some(&[
            "total",
            "fgbar",
            "ogbar",
            "mgbar",
            "egbar",
            "s1",
            "s1_og",
            "fgog_ratio",
            "dx",
            "dy",
        ]),
        "NBRCNT" => Some(&["total", "fbs", "fss", "afss", "ufss", "f_rate", "o_rate"]),
        "PCT" => Some(&["total", "n_thresh"]),
        "PSTD" => Some(&[
            "total",
            "n_thresh",
            "baser",
            "baser_ncl",
            "baser_ncu",
            "reliability",
            "resolution",
            "uncertainty",
            "roc_auc",
            "brier",
            "brier_ncl",
            "brier_ncu",
            "briercl",
            "briercl_ncl",
            "briercl_ncu",
            "bss",
        ]),
        "ECLV" => Some(&["total", "baser", "value_baser", "n_pnt"]),
        "RHIST" => Some(&["total", "n_rank"]),
        "RELP" => Some(&["total", "n_ens"]),
        "ENSCNT" => Some(&["rpsf", "rpscl", "rpss", "dsev", "fmean", "omean"]),
        "RPS" => Some(&[
            "total", "n_prob", "rps_rel", "rps_res", "rps_unc", "rps", "rps_ncl", "rps_ncu",
            "rps_comp",
        ]),
        "CNT" => Some(&["total", "fbar", "obar", "me", "estdev", "mae", "rmse", "anom_corr"]),
        "MPR" => Some(&[
            "total",
            "index",
            "obs_sid",
            "obs_lat",
            "obs_lon",
            "obs_lvl",
            "obs_elv",
            "fcst",
            "obs",
            "obs_qc",
            "climo_mean",
            "climo_stdev",
            "climo_cdf",
        ]),
        "ORANK" => Some(&[
            "total",
            "index",
            "obs_sid",
            "obs_lat",
            "obs_lon",
            "obs_lvl",
            "obs_elv",
            "obs",
            "pit",
            "rank",
            "n_ens_vld",
            "n_ens",
        ]),
        _ => None,
    }
}

/// Ordered data field names for legacy source lines, keyed by the legacy
/// line-type token. Variable-width types (HIST, RELI, RELP, ECON) carry only
/// positional tokens and return an empty list.
pub fn legacy_data_field_names(legacy_type: &str) -> Option<&'static [&'static str]> {
    match legacy_type {
        "FHO" => Some(&["total", "f_rate", "h_rate", "o_rate"]),
        "SL1L2" => Some(&["total", "fbar", "obar", "fobar", "ffbar", "oobar", "mae"]),
        "SAL1L2" => Some(&["total", "fabar", "oabar", "foabar", "ffabar", "ooabar", "mae"]),
        "VL1L2" => Some(&[
            "total",
            "ufbar",
            "vfbar",
            "uobar",
            "vobar",
            "uvfobar",
            "uvffbar",
            "uvoobar",
            "f_speed_bar",
            "o_speed_bar",
        ]),
        "VAL1L2" => Some(&[
            "total", "ufabar", "vfabar", "uoabar", "voabar", "uvfoabar", "uvffabar", "uvooabar",
        ]),
        "GRAD" => Some(&[
            "total",
            "fgbar",
            "ogbar",
            "mgbar",
            "egbar",
            "s1",
            "s1_og",
            "fgog_ratio",
            "dx",
            "dy",
        ]),
        "FSS" => Some(&["total", "fbs", "fbs_worst", "fss_rem"]),
        "BSS" => Some(&[
            "brier",
            "briercl",
            "bss",
            "reliability",
            "resolution",
            "uncertainty",
        ]),
        "RMSE" => Some(&["estdev", "rmse", "me", "mae", "anom_corr"]),
        "FSO" => Some(&["rpsf", "rpscl", "rpss", "dsev", "fmean", "omean"]),
        "HIST" | "RELI" | "RELP" | "ECON" => Some(&[]),
        _ => None,
    }
}

// =============================================================================
// Timestamp Formats
// =============================================================================

/// Timestamp format in current-format files (e.g. 20190101_120000)
pub const CURRENT_TS_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format in legacy files (e.g. 2019010112)
pub const LEGACY_TS_FORMAT: &str = "%Y%m%d%H";

/// Timestamp format used in document identity strings and bodies
pub const DOCUMENT_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Timestamp format written to relational staging files
pub const STAGING_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lead times above this value are HHMMSS-packed and must be divided by
/// 10000 to recover whole hours
pub const LEAD_HHMMSS_THRESHOLD: i64 = 9999;

// =============================================================================
// Document Output Constants
// =============================================================================

/// Prefix of every document identity string
pub const DOCUMENT_ID_PREFIX: &str = "DD";

/// Delimiter joining the identity-field values in a document id
pub const DOCUMENT_ID_DELIMITER: &str = "::";

/// Document type marker written into every aggregate document
pub const DOCUMENT_TYPE: &str = "DataDocument";

// =============================================================================
// Staging Output Constants
// =============================================================================

/// Staging table name prefix for canonical line data
pub const LINE_DATA_TABLE_PREFIX: &str = "line_data_";

/// Staging table for object-matching contingency records
pub const OBJECT_CTS_TABLE: &str = "mode_cts";

/// Staging table for object attribute records
pub const OBJECT_OBJ_TABLE: &str = "mode_obj";

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Default number of parallel workers
pub const DEFAULT_PARALLEL_WORKERS: usize = 4;

/// Bounded retries when the shared work queue is found empty
pub const MAX_DEQUEUE_RETRIES: usize = 3;

/// Backoff between dequeue retries, in milliseconds
pub const DEQUEUE_RETRY_DELAY_MS: u64 = 1000;

// =============================================================================
// Object-File Column Constants
// =============================================================================

/// Column renamed to intensity_nn (the percentile after intensity_90 varies)
pub const INTENSITY_90: &str = "intensity_90";
pub const INTENSITY_NN: &str = "intensity_nn";

/// Columns materialized when absent from an object file header
pub const N_VALID: &str = "n_valid";
pub const GRID_RES: &str = "grid_res";
pub const DESCR: &str = "descr";
pub const FCST_UNITS: &str = "fcst_units";
pub const OBS_UNITS: &str = "obs_units";
pub const ASPECT_DIFF: &str = "aspect_diff";
pub const CURV_RATIO: &str = "curv_ratio";
