use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::message::{MessageKind, Request, Response};

/// The outer wrapper shared by every wire message: a kind tag plus the
/// kind-specific record as opaque bytes. The tag is carried as a raw u16
/// so that an unknown kind can be reported instead of failing the parse.
#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    kind: u16,
    payload: Vec<u8>,
}

/// A decoded envelope. The payload stays opaque until the handler that
/// owns the kind decodes it into its record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub kind: MessageKind,
    pub payload: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("envelope bytes could not be parsed")]
    MalformedEnvelope(#[source] bincode::Error),
    #[error("unknown message kind tag {0}")]
    UnknownKind(u16),
    #[error("payload does not decode as {expected}")]
    PayloadMismatch {
        expected: &'static str,
        #[source]
        source: bincode::Error,
    },
    #[error("message could not be encoded")]
    Encode(#[source] bincode::Error),
}

/// Serialize an already-encoded payload under the given kind tag.
pub fn encode(kind: MessageKind, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let wire = WireEnvelope {
        kind: kind.to_wire(),
        payload: payload.to_vec(),
    };
    bincode::serialize(&wire).map_err(CodecError::Encode)
}

/// Parse the `(kind, payload)` wrapper. No business validation happens
/// here; a structurally valid envelope with garbage inside still decodes.
pub fn decode(bytes: &[u8]) -> Result<Envelope, CodecError> {
    let wire: WireEnvelope =
        bincode::deserialize(bytes).map_err(CodecError::MalformedEnvelope)?;
    let kind = MessageKind::from_wire(wire.kind).ok_or(CodecError::UnknownKind(wire.kind))?;
    Ok(Envelope {
        kind,
        payload: wire.payload,
    })
}

impl Envelope {
    /// Decode the payload into the record type its kind calls for.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        bincode::deserialize(&self.payload).map_err(|source| CodecError::PayloadMismatch {
            expected: std::any::type_name::<T>(),
            source,
        })
    }
}

fn encode_record<T: Serialize>(kind: MessageKind, record: &T) -> Result<Vec<u8>, CodecError> {
    let payload = bincode::serialize(record).map_err(CodecError::Encode)?;
    encode(kind, &payload)
}

/// Encode a request into a full envelope frame.
pub fn encode_request(request: &Request) -> Result<Vec<u8>, CodecError> {
    match request {
        Request::Ping(r) => encode_record(MessageKind::Ping, r),
        Request::BankList(r) => encode_record(MessageKind::BankListRequest, r),
        Request::Login(r) => encode_record(MessageKind::LoginRequest, r),
        Request::Logout(r) => encode_record(MessageKind::LogoutRequest, r),
        Request::AccountList(r) => encode_record(MessageKind::AccountListRequest, r),
        Request::AddBalance(r) => encode_record(MessageKind::AddBalanceRequest, r),
        Request::Transaction(r) => encode_record(MessageKind::TransactionRequest, r),
    }
}

/// Encode a response into a full envelope frame.
pub fn encode_response(response: &Response) -> Result<Vec<u8>, CodecError> {
    match response {
        Response::Ping(r) => encode_record(MessageKind::Ping, r),
        Response::BankList(r) => encode_record(MessageKind::BankListResponse, r),
        Response::Login(r) => encode_record(MessageKind::LoginResponse, r),
        Response::Logout(r) => encode_record(MessageKind::LogoutResponse, r),
        Response::AccountList(r) => encode_record(MessageKind::AccountListResponse, r),
        Response::AddBalance(r) => encode_record(MessageKind::AddBalanceResponse, r),
        Response::Transaction(r) => encode_record(MessageKind::TransactionResponse, r),
    }
}
