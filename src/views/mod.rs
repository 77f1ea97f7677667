//! Server-rendered HTML, SVG charts and the CSV report

pub mod charts;
pub mod form;
pub mod page;
pub mod report;
pub mod result;

pub use form::render_form;
pub use page::render_page;
pub use report::{render_csv, REPORT_FILE_NAME};
pub use result::render_result;
