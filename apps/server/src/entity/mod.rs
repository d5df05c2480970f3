//! SeaORM entity definitions for PostgreSQL database.

pub mod analysis;
pub mod brain_document;
pub mod company_brain;
pub mod lead;
pub mod lead_group;
pub mod recording;
