// All core functionality is in borme-core
// This CLI acts as a thin wrapper around the core library

// Re-export core types for convenience
pub use borme_core::*;
