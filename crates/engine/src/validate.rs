// Path: crates/engine/src/validate.rs

//! The safety check before trusting a server-prepared operation.
//!
//! User-facing operations carry exactly two transfers: the main operation
//! and the service-fee transfer. Whatever the node prepared must agree with
//! the fields the task declared before the bytes are signed. The decoder
//! itself stays general over N items; the fixed shape is enforced here and
//! only on the prepare path.

use tessera_codec::{ParsedOperation, TransferKind};
use tessera_types::{OperationTask, ValidationError};

/// Checks decoded prepared bytes against the task's declared fields.
///
/// Activation operations carry no transfer records and nothing to
/// cross-check; they pass unconditionally.
pub fn validate_prepared(
    parsed: &ParsedOperation,
    task: &OperationTask,
) -> Result<(), ValidationError> {
    let header = task.header();

    let (expected_kind, expected_destination) = match task {
        OperationTask::Transfer(t) => (TransferKind::Transfer, Some(&t.destination)),
        OperationTask::Originate(_) => (TransferKind::Origination, None),
        OperationTask::Activate(_) => return Ok(()),
    };

    if parsed.transfers.len() != 2 {
        return Err(ValidationError::TransferCount {
            expected: 2,
            got: parsed.transfers.len(),
        });
    }
    let main = parsed.transfers.first().ok_or(ValidationError::TransferCount {
        expected: 2,
        got: 0,
    })?;
    let service = parsed.transfers.get(1).ok_or(ValidationError::TransferCount {
        expected: 2,
        got: 1,
    })?;

    if main.kind != expected_kind {
        return Err(ValidationError::KindMismatch);
    }
    if main.source != *task.source() {
        return Err(ValidationError::SourceMismatch {
            expected: task.source().clone(),
            got: main.source.clone(),
        });
    }
    if main.destination.as_ref() != expected_destination {
        return Err(ValidationError::DestinationMismatch);
    }
    if main.amount != header.transfer_amount {
        return Err(ValidationError::AmountMismatch);
    }
    if service.amount != header.service_fee {
        return Err(ValidationError::ServiceFeeMismatch);
    }
    if parsed.network_fees() != header.network_fee {
        return Err(ValidationError::NetworkFeeMismatch);
    }
    Ok(())
}
