//! Glucotrend - time-of-day binning and statistics engine for glucose
//! trends charts
//!
//! Glucotrend transforms an irregularly-timed stream of blood-glucose
//! readings spanning 24-hour cycles into per-bin statistics records for
//! ambulatory-glucose-profile style charts, through a deterministic
//! pipeline: bin assignment → per-bin reduction (order statistics for CGM
//! data, mean/min/max for meter data) → out-of-range threshold merge.
//!
//! ## Modules
//!
//! - **binner**: Map intra-day offsets onto fixed time-of-day bins
//! - **stats**: Reduce one bin's values into a statistics record
//! - **annotations**: Collapse sensor clamp annotations into range boundaries
//! - **pipeline**: Full reading-set → per-bin record composition
//! - **bloodglucose**: Clinical classification and unit conversion
//! - **ingest**: Parse and validate reading streams

pub mod annotations;
pub mod binner;
pub mod bloodglucose;
pub mod datetime;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod stats;
pub mod types;

pub use annotations::{
    determine_range_boundaries, find_out_of_range_annotations, get_out_of_range_threshold,
};
pub use binner::{bin_centers, find_bin_for_time_of_day};
pub use error::TrendsError;
pub use pipeline::{cbg_stats_by_bin, smbg_stats_by_bin};
pub use stats::{calculate_cbg_stats_for_bin, calculate_smbg_stats_for_bin};
pub use types::{
    BinStats, CbgBinStats, OutOfRangeAnnotation, RangeBoundaries, Reading, SmbgBinStats,
};

/// Glucotrend version reported by the CLI
pub const GLUCOTREND_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "glucotrend";
