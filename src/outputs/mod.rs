//! Output generation for collected article records.
//!
//! # Submodules
//!
//! - [`json`]: Writes [`ResultSet`](crate::models::ResultSet) data to dated
//!   JSON files for downstream consumers
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

pub mod json;
