pub mod opensanctions;

pub use opensanctions::{MatchedEntity, OpenSanctionsClient, ScreeningOutcome};
