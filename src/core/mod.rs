pub mod competence;
pub mod error;
pub mod request;
pub mod result;
pub mod rounding;
pub mod series;
