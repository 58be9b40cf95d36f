//! Profile data structures, normalization and loading

mod data;
pub mod loader;
pub mod normalize;

pub use data::{Allocation, ExpenseBreakdown, FinancialProfile, PlanningMode, RiskTolerance};
pub use loader::{load_block, load_block_from_reader, load_default_block, BlockProfile, ProfileError};
pub use normalize::{normalize, validate_allocation, AllocationKind, CanonicalInputs, ValidationWarning};
