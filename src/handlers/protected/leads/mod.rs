pub mod collection;
pub mod params;
pub mod record;
pub mod reports;

pub use collection::{by_source, by_status, create, list, search};
pub use record::{delete, get, patch, put};
pub use reports::{count, stats};
