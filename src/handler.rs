use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::ledger::{Ledger, TransactionRecord, Transfer};
use crate::message::{
    AccountEntry, AccountListRequest, AccountListResponse, AddBalanceRequest, AddBalanceResponse,
    AddBalanceStatus, BankEntry, BankListResponse, LoginRequest, LoginResponse, LoginStatus,
    LogoutRequest, LogoutResponse, LogoutStatus, Ping, PingOrigin, Request, Response,
    TransactionRequest, TransactionResponse, TransactionStatus,
};
use crate::policy::FeePolicy;
use crate::session::{AuthFailure, Session, SessionStore};
use crate::token;

/// Per-message-kind request handlers. Owns the session store; every
/// handler is a short-circuiting chain where the first failed step picks
/// the terminal status and later steps never override it.
pub struct Handlers<L> {
    ledger: L,
    sessions: SessionStore,
    fee_policy: FeePolicy,
}

impl<L: Ledger> Handlers<L> {
    pub fn new(ledger: L, fee_policy: FeePolicy) -> Self {
        Self {
            ledger,
            sessions: SessionStore::default(),
            fee_policy,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Route a request to its handler. Exhaustive over the vocabulary, so
    /// a new message kind cannot be added without a handler.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Ping(ping) => Response::Ping(self.ping(ping)),
            Request::BankList(_) => Response::BankList(self.bank_list()),
            Request::Login(req) => Response::Login(self.login(req)),
            Request::Logout(req) => Response::Logout(self.logout(req)),
            Request::AccountList(req) => Response::AccountList(self.account_list(req)),
            Request::AddBalance(req) => Response::AddBalance(self.add_balance(req)),
            Request::Transaction(req) => Response::Transaction(self.transaction(req)),
        }
    }

    /// Echo the client token and time, stamp the server time. Never fails.
    fn ping(&self, ping: Ping) -> Ping {
        Ping {
            origin: PingOrigin::Server,
            token: ping.token,
            client_time: ping.client_time,
            server_time: now_millis(),
        }
    }

    fn bank_list(&self) -> BankListResponse {
        match self.ledger.list_banks() {
            Ok(banks) => BankListResponse {
                banks: banks
                    .into_iter()
                    .map(|b| BankEntry {
                        id: b.id,
                        name: b.name,
                    })
                    .collect(),
            },
            Err(err) => {
                warn!("bank list unavailable: {err}");
                BankListResponse::default()
            }
        }
    }

    fn login(&mut self, request: LoginRequest) -> LoginResponse {
        let user = match self
            .ledger
            .user_by_credentials(&request.login_name, &request.password)
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(login_name = %request.login_name, "login rejected: bad credentials");
                return LoginResponse::failed(LoginStatus::InvalidUsernameOrPassword);
            }
            Err(err) => {
                warn!("credential lookup failed: {err}");
                return LoginResponse::failed(LoginStatus::ServerError);
            }
        };

        match self.ledger.count_accounts(user.id, request.bank_id) {
            Ok(0) => {
                warn!(user_id = user.id, bank_id = request.bank_id, "login rejected: no accounts in bank");
                return LoginResponse::failed(LoginStatus::InvalidBankId);
            }
            Ok(_) => {}
            Err(err) => {
                warn!("account count failed: {err}");
                return LoginResponse::failed(LoginStatus::ServerError);
            }
        }

        if self.sessions.find_by_user(user.id).is_some() {
            warn!(user_id = user.id, "login rejected: already logged in");
            return LoginResponse::failed(LoginStatus::AlreadyLoggedIn);
        }

        let session_token = token::generate();
        let inserted = self.sessions.insert(Session {
            user_id: user.id,
            bank_id: request.bank_id,
            display_name: user.name.clone(),
            login_name: user.login.clone(),
            token: session_token.clone(),
        });
        if let Err(err) = inserted {
            warn!("session insert failed: {err}");
            return LoginResponse::failed(LoginStatus::ServerError);
        }

        info!(user_id = user.id, login_name = %user.login, "logged in");
        LoginResponse {
            status: LoginStatus::Success,
            user_id: user.id,
            bank_id: request.bank_id,
            display_id: user.citizen,
            display_name: user.name,
            login_name: user.login,
            token: session_token,
        }
    }

    fn logout(&mut self, request: LogoutRequest) -> LogoutResponse {
        let user_id = match self.sessions.find_by_login_name(&request.login_name) {
            None => {
                warn!(login_name = %request.login_name, "logout rejected: not logged in");
                return LogoutResponse {
                    status: LogoutStatus::NotLoggedIn,
                };
            }
            Some(session) if session.token != request.token => {
                warn!(login_name = %request.login_name, "logout rejected: invalid token");
                return LogoutResponse {
                    status: LogoutStatus::InvalidToken,
                };
            }
            Some(session) => session.user_id,
        };

        if let Err(err) = self.sessions.remove(user_id) {
            warn!("session removal failed: {err}");
            return LogoutResponse {
                status: LogoutStatus::ServerError,
            };
        }
        info!(user_id, login_name = %request.login_name, "logged out");
        LogoutResponse {
            status: LogoutStatus::Success,
        }
    }

    /// An unauthorized request gets an empty list, same as a user with no
    /// accounts; the response record has no status field to say more.
    fn account_list(&self, request: AccountListRequest) -> AccountListResponse {
        if let Err(failure) = self.sessions.authorize(request.user_id, &request.token) {
            warn!(user_id = request.user_id, ?failure, "account list rejected");
            return AccountListResponse::default();
        }

        match self.ledger.list_accounts(request.user_id, request.bank_id) {
            Ok(accounts) => AccountListResponse {
                accounts: accounts
                    .into_iter()
                    .map(|a| AccountEntry {
                        iban: a.iban,
                        user_id: a.user_id,
                        bank_id: a.bank_id,
                        balance: a.balance,
                    })
                    .collect(),
            },
            Err(err) => {
                warn!("account list lookup failed: {err}");
                AccountListResponse::default()
            }
        }
    }

    /// Administrative deposit. The amount is a signed delta; a negative
    /// value withdraws. `amount` in the response is the new balance.
    fn add_balance(&mut self, request: AddBalanceRequest) -> AddBalanceResponse {
        match self.sessions.authorize(request.user_id, &request.token) {
            Err(AuthFailure::NotLoggedIn) => {
                warn!(user_id = request.user_id, "deposit rejected: not logged in");
                return AddBalanceResponse::failed(AddBalanceStatus::NotLoggedIn, &request);
            }
            Err(AuthFailure::InvalidToken) => {
                warn!(user_id = request.user_id, "deposit rejected: invalid token");
                return AddBalanceResponse::failed(AddBalanceStatus::InvalidToken, &request);
            }
            Ok(_) => {}
        }

        match self
            .ledger
            .account_owned(&request.iban, request.user_id, request.bank_id)
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(iban = %request.iban, "deposit rejected: no such owned account");
                return AddBalanceResponse::failed(AddBalanceStatus::UnknownIban, &request);
            }
            Err(err) => {
                warn!("account lookup failed: {err}");
                return AddBalanceResponse::failed(AddBalanceStatus::ServerError, &request);
            }
        }

        if let Err(err) = self.ledger.apply_balance_delta(
            &request.iban,
            request.user_id,
            request.bank_id,
            request.amount,
        ) {
            warn!("balance update failed: {err}");
            return AddBalanceResponse::failed(AddBalanceStatus::ServerError, &request);
        }

        let new_balance = match self
            .ledger
            .account_owned(&request.iban, request.user_id, request.bank_id)
        {
            Ok(Some(account)) => account.balance,
            Ok(None) | Err(_) => {
                warn!(iban = %request.iban, "balance read-back failed");
                return AddBalanceResponse::failed(AddBalanceStatus::ServerError, &request);
            }
        };

        info!(iban = %request.iban, amount = %request.amount, "balance adjusted");
        AddBalanceResponse {
            status: AddBalanceStatus::Success,
            user_id: request.user_id,
            token: request.token,
            bank_id: request.bank_id,
            iban: request.iban,
            amount: new_balance,
        }
    }

    fn transaction(&mut self, request: TransactionRequest) -> TransactionResponse {
        match self.sessions.authorize(request.user_id, &request.token) {
            Err(AuthFailure::NotLoggedIn) => {
                warn!(user_id = request.user_id, "transfer rejected: not logged in");
                return TransactionResponse::failed(TransactionStatus::NotLoggedIn);
            }
            Err(AuthFailure::InvalidToken) => {
                warn!(user_id = request.user_id, "transfer rejected: invalid token");
                return TransactionResponse::failed(TransactionStatus::InvalidToken);
            }
            Ok(_) => {}
        }

        if request.amount <= Decimal::ZERO {
            warn!(amount = %request.amount, "transfer rejected: amount not positive");
            return TransactionResponse::failed(TransactionStatus::InvalidAmount);
        }

        let source = match self.ledger.account_owned(
            &request.from_iban,
            request.user_id,
            request.bank_id,
        ) {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn!(iban = %request.from_iban, "transfer rejected: bad source iban");
                return TransactionResponse::failed(TransactionStatus::InvalidFromIban);
            }
            Err(err) => {
                warn!("source lookup failed: {err}");
                return TransactionResponse::failed(TransactionStatus::ServerError);
            }
        };

        let dest = match self.ledger.account(&request.to_iban) {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn!(iban = %request.to_iban, "transfer rejected: bad destination iban");
                return TransactionResponse::failed(TransactionStatus::InvalidToIban);
            }
            Err(err) => {
                warn!("destination lookup failed: {err}");
                return TransactionResponse::failed(TransactionStatus::ServerError);
            }
        };

        // flat fee, charged by the source bank, only across banks
        let fee = if source.bank_id != dest.bank_id {
            match self.ledger.bank(source.bank_id) {
                Ok(Some(bank)) => bank.fee,
                Ok(None) => {
                    warn!(bank_id = source.bank_id, "transfer failed: bank row missing");
                    return TransactionResponse::failed(TransactionStatus::ServerError);
                }
                Err(err) => {
                    warn!("fee lookup failed: {err}");
                    return TransactionResponse::failed(TransactionStatus::ServerError);
                }
            }
        } else {
            Decimal::ZERO
        };

        if source.balance < request.amount + fee {
            warn!(iban = %request.from_iban, "transfer rejected: insufficient funds");
            return TransactionResponse {
                status: TransactionStatus::InsufficientFunds,
                token: String::new(),
                fee,
            };
        }

        let audit_token = token::generate();
        let transfer = Transfer {
            record: TransactionRecord {
                token: audit_token.clone(),
                source_iban: request.from_iban.clone(),
                dest_iban: request.to_iban.clone(),
                amount: request.amount,
                fee,
            },
            source_user: request.user_id,
            source_bank: request.bank_id,
            fee_credit_iban: if fee > Decimal::ZERO {
                self.fee_policy.fee_credit_iban().map(str::to_string)
            } else {
                None
            },
        };
        if let Err(err) = self.ledger.apply_transfer(transfer) {
            warn!("transfer failed to apply: {err}");
            return TransactionResponse {
                status: TransactionStatus::ServerError,
                token: String::new(),
                fee,
            };
        }

        info!(
            from = %request.from_iban,
            to = %request.to_iban,
            amount = %request.amount,
            %fee,
            "transfer applied"
        );
        TransactionResponse {
            status: TransactionStatus::Success,
            token: audit_token,
            fee,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use super::*;
    use crate::ledger::in_memory::InMemoryLedger;
    use crate::ledger::{Account, Bank, BankId, StorageError, User, UserId};
    use crate::token::TOKEN_LEN;

    fn dec(value: u32) -> Decimal {
        Decimal::from_u32(value).unwrap()
    }

    fn seeded_ledger() -> InMemoryLedger {
        InMemoryLedger::new(
            [
                Bank {
                    id: 1,
                    name: "First National".to_string(),
                    fee: dec(5),
                },
                Bank {
                    id: 2,
                    name: "Harbor Savings".to_string(),
                    fee: dec(3),
                },
            ],
            [
                User {
                    id: 1,
                    login: "alice".to_string(),
                    password: "hunter2".to_string(),
                    citizen: 900100,
                    name: "Alice Doe".to_string(),
                },
                User {
                    id: 2,
                    login: "bob".to_string(),
                    password: "swordfish".to_string(),
                    citizen: 900200,
                    name: "Bob Roe".to_string(),
                },
            ],
            [
                Account {
                    iban: "IBAN-A".to_string(),
                    user_id: 1,
                    bank_id: 1,
                    balance: dec(1000),
                },
                Account {
                    iban: "IBAN-B".to_string(),
                    user_id: 2,
                    bank_id: 2,
                    balance: dec(500),
                },
                Account {
                    iban: "IBAN-C".to_string(),
                    user_id: 2,
                    bank_id: 1,
                    balance: dec(200),
                },
            ],
        )
    }

    fn handlers() -> Handlers<InMemoryLedger> {
        Handlers::new(seeded_ledger(), FeePolicy::Burn)
    }

    fn login(handlers: &mut Handlers<InMemoryLedger>, name: &str, pass: &str) -> LoginResponse {
        handlers.login(LoginRequest {
            login_name: name.to_string(),
            password: pass.to_string(),
            bank_id: 1,
        })
    }

    fn transfer_request(token: &str, to: &str, amount: Decimal) -> TransactionRequest {
        TransactionRequest {
            user_id: 1,
            token: token.to_string(),
            bank_id: 1,
            from_iban: "IBAN-A".to_string(),
            to_iban: to.to_string(),
            amount,
        }
    }

    #[test]
    fn ping_echoes_and_stamps() {
        let handlers = handlers();
        let reply = handlers.ping(Ping {
            origin: PingOrigin::Client,
            token: "probe".to_string(),
            client_time: 123,
            server_time: 0,
        });
        assert_eq!(reply.origin, PingOrigin::Server);
        assert_eq!(reply.token, "probe");
        assert_eq!(reply.client_time, 123);
        assert!(reply.server_time > 0);
    }

    #[test]
    fn bank_list_returns_all_banks() {
        let handlers = handlers();
        let reply = handlers.bank_list();
        assert_eq!(reply.banks.len(), 2);
        assert_eq!(reply.banks[0].name, "First National");
    }

    #[test]
    fn login_chain_statuses() {
        let mut handlers = handlers();

        let reply = login(&mut handlers, "alice", "wrong");
        assert_eq!(reply.status, LoginStatus::InvalidUsernameOrPassword);
        assert!(handlers.sessions().is_empty());

        // alice has no account in bank 2
        let reply = handlers.login(LoginRequest {
            login_name: "alice".to_string(),
            password: "hunter2".to_string(),
            bank_id: 2,
        });
        assert_eq!(reply.status, LoginStatus::InvalidBankId);

        let reply = login(&mut handlers, "alice", "hunter2");
        assert_eq!(reply.status, LoginStatus::Success);
        assert_eq!(reply.user_id, 1);
        assert_eq!(reply.display_id, 900100);
        assert_eq!(reply.display_name, "Alice Doe");
        assert_eq!(reply.token.len(), TOKEN_LEN);

        let reply = login(&mut handlers, "alice", "hunter2");
        assert_eq!(reply.status, LoginStatus::AlreadyLoggedIn);
        assert_eq!(handlers.sessions().len(), 1);
    }

    #[test]
    fn logout_chain_statuses() {
        let mut handlers = handlers();
        let token = login(&mut handlers, "alice", "hunter2").token;

        let reply = handlers.logout(LogoutRequest {
            login_name: "bob".to_string(),
            token: token.clone(),
        });
        assert_eq!(reply.status, LogoutStatus::NotLoggedIn);

        let reply = handlers.logout(LogoutRequest {
            login_name: "alice".to_string(),
            token: "not-the-token".to_string(),
        });
        assert_eq!(reply.status, LogoutStatus::InvalidToken);
        assert_eq!(handlers.sessions().len(), 1);

        let reply = handlers.logout(LogoutRequest {
            login_name: "alice".to_string(),
            token,
        });
        assert_eq!(reply.status, LogoutStatus::Success);
        assert!(handlers.sessions().is_empty());

        // logged out means a fresh login works again
        let reply = login(&mut handlers, "alice", "hunter2");
        assert_eq!(reply.status, LoginStatus::Success);
    }

    #[test]
    fn account_list_conflates_unauthorized_with_empty() {
        let mut handlers = handlers();
        let token = login(&mut handlers, "alice", "hunter2").token;

        let reply = handlers.account_list(AccountListRequest {
            user_id: 1,
            token: "bogus".to_string(),
            bank_id: 1,
        });
        assert!(reply.accounts.is_empty());

        let reply = handlers.account_list(AccountListRequest {
            user_id: 1,
            token,
            bank_id: 1,
        });
        assert_eq!(reply.accounts.len(), 1);
        assert_eq!(reply.accounts[0].iban, "IBAN-A");
        assert_eq!(reply.accounts[0].balance, dec(1000));
    }

    #[test]
    fn add_balance_statuses_and_new_balance() {
        let mut handlers = handlers();
        let token = login(&mut handlers, "alice", "hunter2").token;

        let unauthorized = handlers.add_balance(AddBalanceRequest {
            user_id: 1,
            token: "bogus".to_string(),
            bank_id: 1,
            iban: "IBAN-A".to_string(),
            amount: dec(50),
        });
        assert_eq!(unauthorized.status, AddBalanceStatus::InvalidToken);
        assert_eq!(handlers.ledger().balance("IBAN-A").unwrap(), dec(1000));

        let missing = handlers.add_balance(AddBalanceRequest {
            user_id: 1,
            token: token.clone(),
            bank_id: 1,
            iban: "IBAN-B".to_string(), // bob's, not alice's
            amount: dec(50),
        });
        assert_eq!(missing.status, AddBalanceStatus::UnknownIban);

        let reply = handlers.add_balance(AddBalanceRequest {
            user_id: 1,
            token: token.clone(),
            bank_id: 1,
            iban: "IBAN-A".to_string(),
            amount: dec(50),
        });
        assert_eq!(reply.status, AddBalanceStatus::Success);
        assert_eq!(reply.amount, dec(1050));

        // negative amounts are administrative withdrawals
        let reply = handlers.add_balance(AddBalanceRequest {
            user_id: 1,
            token,
            bank_id: 1,
            iban: "IBAN-A".to_string(),
            amount: -dec(70),
        });
        assert_eq!(reply.status, AddBalanceStatus::Success);
        assert_eq!(reply.amount, dec(980));
    }

    #[test]
    fn transaction_requires_login_and_token() {
        let mut handlers = handlers();
        let reply = handlers.transaction(transfer_request("whatever", "IBAN-B", dec(10)));
        assert_eq!(reply.status, TransactionStatus::NotLoggedIn);

        login(&mut handlers, "alice", "hunter2");
        let reply = handlers.transaction(transfer_request("wrong", "IBAN-B", dec(10)));
        assert_eq!(reply.status, TransactionStatus::InvalidToken);
        assert_eq!(handlers.ledger().balance("IBAN-A").unwrap(), dec(1000));
    }

    #[test]
    fn transaction_validation_chain() {
        let mut handlers = handlers();
        let token = login(&mut handlers, "alice", "hunter2").token;

        let reply = handlers.transaction(transfer_request(&token, "IBAN-B", Decimal::ZERO));
        assert_eq!(reply.status, TransactionStatus::InvalidAmount);

        let mut bad_source = transfer_request(&token, "IBAN-B", dec(10));
        bad_source.from_iban = "IBAN-B".to_string(); // exists but not alice's
        let reply = handlers.transaction(bad_source);
        assert_eq!(reply.status, TransactionStatus::InvalidFromIban);

        let reply = handlers.transaction(transfer_request(&token, "IBAN-MISSING", dec(10)));
        assert_eq!(reply.status, TransactionStatus::InvalidToIban);

        // 1000 available, 999 + 5 fee is one over
        let reply = handlers.transaction(transfer_request(&token, "IBAN-B", dec(999)));
        assert_eq!(reply.status, TransactionStatus::InsufficientFunds);
        assert_eq!(reply.fee, dec(5));
        assert_eq!(handlers.ledger().balance("IBAN-A").unwrap(), dec(1000));
        assert_eq!(handlers.ledger().balance("IBAN-B").unwrap(), dec(500));
        assert!(handlers.ledger().transactions().is_empty());
    }

    #[test]
    fn interbank_transfer_charges_source_bank_fee() {
        let mut handlers = handlers();
        let token = login(&mut handlers, "alice", "hunter2").token;

        let reply = handlers.transaction(transfer_request(&token, "IBAN-B", dec(100)));
        assert_eq!(reply.status, TransactionStatus::Success);
        assert_eq!(reply.fee, dec(5));
        assert_eq!(reply.token.len(), TOKEN_LEN);

        let ledger = handlers.ledger();
        assert_eq!(ledger.balance("IBAN-A").unwrap(), dec(895));
        assert_eq!(ledger.balance("IBAN-B").unwrap(), dec(600));
        // burned fee: the books shrink by exactly the fee
        assert_eq!(ledger.total_balance(), dec(1695));
        let record = &ledger.transactions()[0];
        assert_eq!(record.amount, dec(100));
        assert_eq!(record.fee, dec(5));
        assert_eq!(record.token, reply.token);
    }

    #[test]
    fn same_bank_transfer_is_free() {
        let mut handlers = handlers();
        let token = login(&mut handlers, "alice", "hunter2").token;

        let reply = handlers.transaction(transfer_request(&token, "IBAN-C", dec(100)));
        assert_eq!(reply.status, TransactionStatus::Success);
        assert_eq!(reply.fee, Decimal::ZERO);
        assert_eq!(handlers.ledger().balance("IBAN-A").unwrap(), dec(900));
        assert_eq!(handlers.ledger().balance("IBAN-C").unwrap(), dec(300));
        assert_eq!(handlers.ledger().total_balance(), dec(1700));
    }

    #[test]
    fn credit_policy_routes_fee_into_collection_account() {
        let mut handlers = Handlers::new(
            seeded_ledger(),
            FeePolicy::Credit {
                iban: "IBAN-C".to_string(),
            },
        );
        let token = login(&mut handlers, "alice", "hunter2").token;

        let reply = handlers.transaction(transfer_request(&token, "IBAN-B", dec(100)));
        assert_eq!(reply.status, TransactionStatus::Success);
        assert_eq!(handlers.ledger().balance("IBAN-A").unwrap(), dec(895));
        assert_eq!(handlers.ledger().balance("IBAN-B").unwrap(), dec(600));
        assert_eq!(handlers.ledger().balance("IBAN-C").unwrap(), dec(205));
        // nothing burned
        assert_eq!(handlers.ledger().total_balance(), dec(1700));
    }

    /// Ledger double whose every operation reports a storage failure.
    struct BrokenLedger;

    impl Ledger for BrokenLedger {
        fn user_by_credentials(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Option<User>, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn count_accounts(&self, _: UserId, _: BankId) -> Result<u64, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn list_banks(&self) -> Result<Vec<Bank>, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn list_accounts(&self, _: UserId, _: BankId) -> Result<Vec<Account>, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn account(&self, _: &str) -> Result<Option<Account>, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn account_owned(
            &self,
            _: &str,
            _: UserId,
            _: BankId,
        ) -> Result<Option<Account>, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn bank(&self, _: BankId) -> Result<Option<Bank>, StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn apply_balance_delta(
            &mut self,
            _: &str,
            _: UserId,
            _: BankId,
            _: Decimal,
        ) -> Result<(), StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn insert_transaction(&mut self, _: TransactionRecord) -> Result<(), StorageError> {
            Err(StorageError("down".to_string()))
        }
        fn apply_transfer(&mut self, _: Transfer) -> Result<(), StorageError> {
            Err(StorageError("down".to_string()))
        }
    }

    #[test]
    fn storage_failures_surface_as_server_error() {
        let mut handlers = Handlers::new(BrokenLedger, FeePolicy::Burn);
        let reply = handlers.login(LoginRequest {
            login_name: "alice".to_string(),
            password: "hunter2".to_string(),
            bank_id: 1,
        });
        assert_eq!(reply.status, LoginStatus::ServerError);
        // the no-status list responses degrade to empty instead
        assert!(handlers.bank_list().banks.is_empty());
    }
}
