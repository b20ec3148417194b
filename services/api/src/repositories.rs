//! Repositories for database operations
//!
//! Each repository owns a pool handle. Writes that touch more than one table
//! run in a single SQL transaction; child collections are loaded with one
//! extra query per parent.

pub mod category;
pub mod lookup;
pub mod product;
pub mod transaction;
pub mod user;

pub use category::CategoryRepository;
pub use lookup::{LookupRepository, LookupTable};
pub use product::ProductRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
