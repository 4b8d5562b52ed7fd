/// Batch and snapshot ingestion.
pub mod ingest;
/// Regularization and training preparation.
pub mod prepare;
/// Reference baseline promotion.
pub mod reference;
/// Fan-out and report helpers shared by the operations.
pub mod util;
