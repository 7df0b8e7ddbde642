//! Rental properties.

mod error;
mod service;
mod types;
pub mod vocabulary;

pub use error::PropertyError;
pub use service::{PropertyRepository, PropertyService};
pub use types::{Property, PropertyInput, PropertyOrder};
pub use vocabulary::{AcquisitionType, PropertyType, TenureRight, VatRegime, YesNo};
