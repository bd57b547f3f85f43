//! Startup seeding of the demo developer and the MED-A listing.

mod config;
mod startup;

pub use config::SeedSettings;
pub use startup::{SeedError, SeedOutcome, seed_demo_data};
