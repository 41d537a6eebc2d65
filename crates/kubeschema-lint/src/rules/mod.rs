//! Built-in lint rules.

pub mod name_round_trip;
pub mod naming_convention;
pub mod schema_size;

pub use name_round_trip::NameRoundTripRule;
pub use naming_convention::NamingConventionRule;
pub use schema_size::SchemaSizeRule;
