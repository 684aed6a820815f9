mod api;
mod traits;

pub use api::ArchiveApiClient;
pub use traits::{download_file, ArchiveApi, DeleteRecordResponse, PageRequest};
