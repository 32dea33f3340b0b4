//! Database Models
//!
//! Serde structs for the SurrealDB tables plus their Create/Update DTOs.

pub mod address;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use address::{Address, AddressCreate};
pub use cart::{CartItem, CartItemDetail, CartItemUpsert};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{Order, OrderLine};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use review::{Review, ReviewCreate};
pub use user::{User, UserRole};
