pub mod lookups;
pub mod notes;
