pub mod files;
pub mod store;

pub use files::{ensure_data_dir, get_data_dir, init_local_data_dir, log_file};
pub use store::{Store, StoreKey};
