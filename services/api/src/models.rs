//! API models for request and response payloads

pub mod category;
pub mod lookup;
pub mod product;
pub mod transaction;
pub mod user;

pub use category::{Category, CategoryRequest};
pub use lookup::{LookupItem, Size};
pub use product::{Product, ProductImage, ProductInput};
pub use transaction::{
    StatusUpdateRequest, Transaction, TransactionItem, TransactionUpdate, TransactionUpdateRequest,
};
pub use user::{AdminUser, UserInput};
