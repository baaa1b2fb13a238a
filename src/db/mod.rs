pub mod connection;
pub mod schema;
pub mod content_store;
pub mod link_store;

pub use connection::*;
pub use schema::*;
pub use content_store::ContentStore;
pub use link_store::LinkStore;
