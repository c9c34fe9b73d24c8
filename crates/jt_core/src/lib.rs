pub mod error;
pub mod store;
pub mod types;

pub use error::Error;
pub use store::SeenStore;
pub use types::Article;

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{Article, Error, Result, SeenStore};
}
