/// The closed message vocabulary: kind tags, request and response
/// records, and the status enums each response carries.
pub mod message;

/// Tagged envelope codec. Purely structural; payloads stay opaque bytes
/// until the handler owning the kind decodes them.
pub mod envelope;

/// In-memory table of active logins and the token checks gating every
/// mid-session request.
pub mod session;

/// Storage port the handlers consume, plus the in-memory implementation.
///
/// NOTE: The trait is the integration point for swapping in a real
/// relational store without touching the protocol logic.
pub mod ledger;

/// Per-message-kind request handlers: validation chains and all ledger
/// mutation.
pub mod handler;

/// Transport seam and the receive-handle-send dispatch loop.
pub mod dispatch;

/// Fee routing policy for inter-bank transfers.
pub mod policy;

/// Random credential generation.
pub mod token;

/// Bootstrap helpers for the server binary (fixture loading, TCP
/// framing). Kept in the library so integration tests can reuse them.
pub mod bin_utils;
