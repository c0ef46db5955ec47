//! Domain types for the API server.
//!
//! These are validated domain objects; raw database rows live inside the
//! repositories and are converted on the way out.

pub mod activity;
pub mod distribution;
pub mod donation;
pub mod resource;
pub mod user;

pub use activity::{Activity, ActivityPatch, NewActivity};
pub use distribution::{Distribution, DistributionPatch, NewDistribution};
pub use donation::{Donation, DonationPatch, DonationSummary, NewDonation};
pub use resource::{NewResource, Resource, ResourcePatch};
pub use user::{CurrentUser, ProfilePatch, User};
