//! helmpush core - chart loading and packaging
//!
//! - `Chart`: a chart loaded from a directory or a `.tgz` archive
//! - `IgnoreRules`: `.helmignore` handling for directory charts
//! - `create_package`: writes `<name>-<version>.tgz` ready for upload

pub mod archive;
pub mod chart;
pub mod error;
pub mod ignore;

pub use archive::{create_package, package_file_name};
pub use chart::{CHART_FILE, Chart, ChartFile, ChartMetadata, ChartSource};
pub use error::{CoreError, Result};
pub use ignore::IgnoreRules;
