pub mod catalogs;
pub mod config;
pub mod error;
pub mod types;

pub use catalogs::{Catalogs, WatchPage};
pub use config::Config;
pub use error::MobiwatchError;
pub use types::*;
