//! Owner profile.

mod service;
mod types;

pub use service::{ProfileError, ProfileRepository, ProfileService};
pub use types::{HoldingMode, Profile, ProfileDetails, RentalType, Sex};
