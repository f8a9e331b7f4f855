//! Batch pipeline that pulls job postings from the USAJobs search API,
//! flattens the nested results into `job_postings` and `user_area`
//! rows, and loads them into a Postgres warehouse schema as full-table
//! replacements. Downstream transformation runs outside this crate.

pub mod config;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod load;
pub mod pipeline;
pub mod rows;
pub mod testing;

pub use config::Config;
pub use error::{ExtractError, FlattenError, LoadError, PipelineError};
pub use extract::{Extractor, JobSearchApi};
pub use flatten::flatten;
pub use load::{LoadReport, WarehouseLoader};
pub use rows::{JobPosting, UserArea};
