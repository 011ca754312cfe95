//! Contract-violation errors.

use thiserror::Error;

use crate::types::ServiceId;

/// Result type alias for engine operations that can hit a contract
/// violation.
pub type PlanResult<T> = Result<T, ContractViolation>;

/// The caller broke a documented invariant of the planning contract.
///
/// These are programming errors in the consuming layer, not user input
/// errors; callers should treat them as fatal rather than retry. A
/// placement that merely does not fit is never an error: the engine
/// reports it as a normal `false` or empty result.
#[derive(Debug, Error)]
pub enum ContractViolation {
    #[error("unknown platform tag: {0}")]
    UnknownPlatform(String),

    #[error("service {0} does not belong to any workload")]
    OrphanService(ServiceId),

    #[error("machine set not found: {0}")]
    UnknownMachineSet(String),
}
