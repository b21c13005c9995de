use thiserror::Error;
use tracing::{debug, warn};

use crate::envelope::{self, CodecError, Envelope};
use crate::handler::Handlers;
use crate::ledger::Ledger;
use crate::message::{MessageKind, Request};
use crate::policy::FeePolicy;

/// Transport seam: deliver one outbound frame, block for one inbound
/// frame. The dispatcher is the only consumer.
pub trait Channel {
    fn send(&mut self, frame: &[u8]) -> Result<(), ChannelError>;
    fn recv(&mut self) -> Result<Vec<u8>, ChannelError>;
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("peer disconnected")]
    Disconnected,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decodes inbound envelopes, routes them to the matching handler, and
/// encodes the reply. Strict request/response pairing: every inbound
/// frame yields at most one outbound frame, and an undecodable or
/// unroutable frame yields none.
pub struct Dispatcher<L> {
    handlers: Handlers<L>,
}

impl<L: Ledger> Dispatcher<L> {
    pub fn new(ledger: L, fee_policy: FeePolicy) -> Self {
        Self {
            handlers: Handlers::new(ledger, fee_policy),
        }
    }

    pub fn handlers(&self) -> &Handlers<L> {
        &self.handlers
    }

    /// One decode-route-handle-encode cycle. `None` means the request was
    /// dropped and the peer gets silence.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Option<Vec<u8>> {
        let envelope = match envelope::decode(frame) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!("dropping frame: {err}");
                return None;
            }
        };
        debug!(kind = ?envelope.kind, "request received");

        let request = match route(&envelope) {
            Ok(request) => request,
            Err(err) => {
                warn!(kind = ?envelope.kind, "dropping frame: {err}");
                return None;
            }
        };

        let response = self.handlers.handle(request);
        match envelope::encode_response(&response) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!(kind = ?response.kind(), "dropping reply: {err}");
                None
            }
        }
    }

    /// Blocking receive-handle-send loop; returns when the peer hangs up.
    pub fn serve<C: Channel>(&mut self, channel: &mut C) -> Result<(), ChannelError> {
        loop {
            let frame = match channel.recv() {
                Ok(frame) => frame,
                Err(ChannelError::Disconnected) => return Ok(()),
                Err(err) => return Err(err),
            };
            if let Some(reply) = self.handle_frame(&frame) {
                channel.send(&reply)?;
            }
        }
    }
}

/// Typed payload decode for the kind's owning handler. Response kinds are
/// never valid inbound traffic.
fn route(envelope: &Envelope) -> Result<Request, CodecError> {
    match envelope.kind {
        MessageKind::Ping => Ok(Request::Ping(envelope.decode_payload()?)),
        MessageKind::BankListRequest => Ok(Request::BankList(envelope.decode_payload()?)),
        MessageKind::LoginRequest => Ok(Request::Login(envelope.decode_payload()?)),
        MessageKind::LogoutRequest => Ok(Request::Logout(envelope.decode_payload()?)),
        MessageKind::AccountListRequest => Ok(Request::AccountList(envelope.decode_payload()?)),
        MessageKind::AddBalanceRequest => Ok(Request::AddBalance(envelope.decode_payload()?)),
        MessageKind::TransactionRequest => Ok(Request::Transaction(envelope.decode_payload()?)),
        MessageKind::BankListResponse
        | MessageKind::LoginResponse
        | MessageKind::LogoutResponse
        | MessageKind::AccountListResponse
        | MessageKind::AddBalanceResponse
        | MessageKind::TransactionResponse => {
            Err(CodecError::UnknownKind(envelope.kind.to_wire()))
        }
    }
}
