// ABOUTME: Command module aggregator for the ocideploy CLI.
// ABOUTME: Re-exports deploy, upload, and region command handlers.

mod deploy;
mod region;
mod upload;

pub use deploy::deploy;
pub use region::region;
pub use upload::upload;
