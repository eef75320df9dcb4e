pub mod data_url;
pub mod error;
pub mod metadata;
pub mod symbol;

pub use data_url::*;
pub use error::*;
pub use metadata::*;
pub use symbol::*;
