//! HTTP protocol layer module
//!
//! MIME detection and response building, decoupled from the static file logic.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_dev_headers, build_404_response, build_405_response, build_file_response,
    build_html_response, build_options_response,
};
