//! Delivery note ledger service ("sortie" / bon de livraison).
//!
//! Layered as domain (entities, invariants, ports), application (use cases),
//! adapters (HTTP) and infrastructure (Postgres, config, metrics).

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
