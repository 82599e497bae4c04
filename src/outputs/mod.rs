//! Output generation for collected articles.
//!
//! # Submodules
//!
//! - [`xlsx`]: Writes the article table to an Excel workbook
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_data.xlsx   # sheet "News": header + one row per article
//! ├── scraper.log
//! └── <image>.jpg      # one per downloaded promo image
//! ```

pub mod xlsx;
