pub mod error;
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use schema::{Collection, FieldDefault};
pub use traits::DocumentStore;
