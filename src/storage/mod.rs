mod catalog;
mod models;
mod sqlite;
mod store;

pub use self::{
    catalog::CATALOG,
    models::{Article, Query, SearchResult},
    sqlite::{DBPool, MEMORY_DB, migrate, new_db_pool},
    store::{Storage, StorageError},
};
