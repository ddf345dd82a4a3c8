pub use visage_common::{Error, FromMessage};

pub type Result<T> = std::result::Result<T, Error>;

visage_common::impl_context!();
