pub mod aggregate;
pub mod correction;
pub mod interest;
