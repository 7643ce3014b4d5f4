pub mod access;
pub mod catalog;
pub mod delivery;
pub mod parties;
