mod fixture;
mod yahoo;

pub use fixture::{FixtureDataset, FixtureProvider, FIXTURE_AS_OF};
pub use yahoo::{YahooAdapter, YahooAuthManager};
