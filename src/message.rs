use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wire tag identifying each message kind.
///
/// The numeric values are part of the protocol and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MessageKind {
    Ping = 1,
    BankListRequest = 2,
    BankListResponse = 3,
    LoginRequest = 4,
    LoginResponse = 5,
    LogoutRequest = 6,
    LogoutResponse = 7,
    AccountListRequest = 8,
    AccountListResponse = 9,
    AddBalanceRequest = 10,
    AddBalanceResponse = 11,
    TransactionRequest = 12,
    TransactionResponse = 13,
}

impl MessageKind {
    pub fn from_wire(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(Self::Ping),
            2 => Some(Self::BankListRequest),
            3 => Some(Self::BankListResponse),
            4 => Some(Self::LoginRequest),
            5 => Some(Self::LoginResponse),
            6 => Some(Self::LogoutRequest),
            7 => Some(Self::LogoutResponse),
            8 => Some(Self::AccountListRequest),
            9 => Some(Self::AccountListResponse),
            10 => Some(Self::AddBalanceRequest),
            11 => Some(Self::AddBalanceResponse),
            12 => Some(Self::TransactionRequest),
            13 => Some(Self::TransactionResponse),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u16 {
        self as u16
    }
}

/// Which endpoint produced a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PingOrigin {
    Client,
    Server,
}

/// Liveness probe. The same record travels in both directions; the server
/// echoes the token and client_time and stamps server_time on the way back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    pub origin: PingOrigin,
    pub token: String,
    pub client_time: u64,
    pub server_time: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankListRequest {}

/// One bank as presented to clients. The fee column stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    pub id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankListResponse {
    pub banks: Vec<BankEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
    pub bank_id: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginStatus {
    Success,
    ServerError,
    InvalidUsernameOrPassword,
    InvalidBankId,
    AlreadyLoggedIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: LoginStatus,
    pub user_id: u32,
    pub bank_id: u16,
    pub display_id: u32,
    pub display_name: String,
    pub login_name: String,
    pub token: String,
}

impl LoginResponse {
    /// Terminal failure response; identity fields stay at their defaults.
    pub fn failed(status: LoginStatus) -> Self {
        Self {
            status,
            user_id: 0,
            bank_id: 0,
            display_id: 0,
            display_name: String::new(),
            login_name: String::new(),
            token: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub login_name: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogoutStatus {
    Success,
    ServerError,
    NotLoggedIn,
    InvalidToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub status: LogoutStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountListRequest {
    pub user_id: u32,
    pub token: String,
    pub bank_id: u16,
}

/// One account row as presented to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub iban: String,
    pub user_id: u32,
    pub bank_id: u16,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBalanceRequest {
    pub user_id: u32,
    pub token: String,
    pub bank_id: u16,
    pub iban: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddBalanceStatus {
    Success,
    ServerError,
    NotLoggedIn,
    InvalidToken,
    UnknownIban,
}

/// Distinct record from the request; `amount` carries the balance after
/// the deposit was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBalanceResponse {
    pub status: AddBalanceStatus,
    pub user_id: u32,
    pub token: String,
    pub bank_id: u16,
    pub iban: String,
    pub amount: Decimal,
}

impl AddBalanceResponse {
    pub fn failed(status: AddBalanceStatus, request: &AddBalanceRequest) -> Self {
        Self {
            status,
            user_id: request.user_id,
            token: request.token.clone(),
            bank_id: request.bank_id,
            iban: request.iban.clone(),
            amount: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub user_id: u32,
    pub token: String,
    pub bank_id: u16,
    pub from_iban: String,
    pub to_iban: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Success,
    ServerError,
    NotLoggedIn,
    InvalidToken,
    InvalidFromIban,
    InvalidToIban,
    InvalidAmount,
    InsufficientFunds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub status: TransactionStatus,
    pub token: String,
    pub fee: Decimal,
}

impl TransactionResponse {
    pub fn failed(status: TransactionStatus) -> Self {
        Self {
            status,
            token: String::new(),
            fee: Decimal::ZERO,
        }
    }
}

/// Every message a client may send, one variant per request kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Ping(Ping),
    BankList(BankListRequest),
    Login(LoginRequest),
    Logout(LogoutRequest),
    AccountList(AccountListRequest),
    AddBalance(AddBalanceRequest),
    Transaction(TransactionRequest),
}

impl Request {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Ping(_) => MessageKind::Ping,
            Self::BankList(_) => MessageKind::BankListRequest,
            Self::Login(_) => MessageKind::LoginRequest,
            Self::Logout(_) => MessageKind::LogoutRequest,
            Self::AccountList(_) => MessageKind::AccountListRequest,
            Self::AddBalance(_) => MessageKind::AddBalanceRequest,
            Self::Transaction(_) => MessageKind::TransactionRequest,
        }
    }
}

/// Every message the server may answer with, one variant per response kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ping(Ping),
    BankList(BankListResponse),
    Login(LoginResponse),
    Logout(LogoutResponse),
    AccountList(AccountListResponse),
    AddBalance(AddBalanceResponse),
    Transaction(TransactionResponse),
}

impl Response {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Ping(_) => MessageKind::Ping,
            Self::BankList(_) => MessageKind::BankListResponse,
            Self::Login(_) => MessageKind::LoginResponse,
            Self::Logout(_) => MessageKind::LogoutResponse,
            Self::AccountList(_) => MessageKind::AccountListResponse,
            Self::AddBalance(_) => MessageKind::AddBalanceResponse,
            Self::Transaction(_) => MessageKind::TransactionResponse,
        }
    }
}
