pub mod filter;
pub mod subscriber;
