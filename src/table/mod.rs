//! Tabular data module.
//!
//! The in-memory `Table` model and the codecs that read and write it:
//! - `csv` - header row plus per-column scalar inference
//! - `json` - array of flat records
//! - `parquet` - arrow record batches, column types kept exactly

pub mod codec;
pub mod model;

pub use codec::{decode, encode, TableFormat};
pub use model::*;
