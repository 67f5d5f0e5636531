pub mod checkout;
pub mod customer;
pub mod product;
pub mod store;

// Re-export commonly used types
pub use checkout::{Checkout, CheckoutStatus};
pub use customer::{Customer, Outcome};
pub use product::Product;
pub use store::{BusySchedule, Store};
