//! Pure trading logic: which markets to buy and at what price.
//!
//! Both functions here are side-effect free so they test without any
//! transport or venue.

pub mod pricing;
pub mod selector;

pub use pricing::adaptive_price;
pub use selector::{select, Opportunity};
