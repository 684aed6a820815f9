mod file;
mod listing;
mod raw;
mod record;
mod record_set;
mod sorting;
mod source;
mod thread;

pub use file::*;
pub use listing::*;
pub use raw::*;
pub use record::*;
pub use record_set::*;
pub use sorting::*;
pub use source::*;
pub use thread::*;
