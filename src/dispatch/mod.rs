//! Request boundary for collaborators
//!
//! Speech, language, and response layers hand the ledger a `LedgerRequest`
//! and get a `LedgerResponse` back. Every error is converted to a kind and a
//! relayable message here; nothing below this module formats replies.

pub mod request;
pub mod response;

pub use request::{AccountRef, LedgerRequest, Operation};
pub use response::{
    AccountView, BalanceView, LedgerResponse, RecordView, ResponseError, ResponseValue,
};

use crate::config::Settings;
use crate::error::{AccountRole, LedgerError, LedgerResult};
use crate::models::{AccountId, Money};
use crate::services::{LedgerService, QueryService};
use crate::storage::Storage;

/// Execute one request against the ledger
pub fn dispatch(storage: &Storage, settings: &Settings, request: &LedgerRequest) -> LedgerResponse {
    tracing::debug!(operation = ?request.operation, account = %request.account_ref, "dispatching request");

    match execute(storage, settings, request) {
        Ok(Some(value)) => LedgerResponse::success(value),
        Ok(None) => LedgerResponse::done(),
        Err(e) => LedgerResponse::failure(&e),
    }
}

/// Parse a JSON request and execute it
pub fn dispatch_json(storage: &Storage, settings: &Settings, text: &str) -> LedgerResponse {
    match LedgerRequest::from_json(text) {
        Ok(request) => dispatch(storage, settings, &request),
        Err(e) => {
            tracing::warn!(error = %e, "rejected malformed request");
            LedgerResponse::failure(&e)
        }
    }
}

fn execute(
    storage: &Storage,
    settings: &Settings,
    request: &LedgerRequest,
) -> LedgerResult<Option<ResponseValue>> {
    let ledger = LedgerService::new(storage);
    let query = QueryService::new(storage);

    match request.operation {
        Operation::CreateAccount => {
            let username = match &request.account_ref {
                AccountRef::Username(name) => name,
                AccountRef::Id(_) => {
                    return Err(LedgerError::InvalidUsername(
                        "A new account needs a username".into(),
                    ))
                }
            };
            let initial = request.amount.unwrap_or_else(Money::zero);
            let account = ledger.create_account(username, initial)?;
            Ok(Some(ResponseValue::Account(account.into())))
        }

        Operation::Deposit => {
            let amount = request.required_amount()?;
            let account_id = resolve(&query, &request.account_ref, AccountRole::Account)?;
            let balance = ledger.deposit(account_id, amount)?;
            Ok(Some(ResponseValue::Balance(BalanceView { account_id, balance })))
        }

        Operation::Withdrawal => {
            let amount = request.required_amount()?;
            let account_id = resolve(&query, &request.account_ref, AccountRole::Account)?;
            let balance = ledger.withdraw(account_id, amount)?;
            Ok(Some(ResponseValue::Balance(BalanceView { account_id, balance })))
        }

        Operation::Transfer => {
            let amount = request.required_amount()?;
            let counterparty = request.required_counterparty()?;

            ledger.transfer_parties(request.account_ref.as_party(), counterparty.as_party(), amount)?;
            Ok(None)
        }

        Operation::GetBalance => {
            let account_id = resolve(&query, &request.account_ref, AccountRole::Account)?;
            let balance = query.get_balance(account_id)?;
            Ok(Some(ResponseValue::Balance(BalanceView { account_id, balance })))
        }

        Operation::GetHistory => {
            let account_id = resolve(&query, &request.account_ref, AccountRole::Account)?;
            let limit = settings.effective_limit(request.limit);
            let records = query.get_recent_transactions(account_id, limit)?;
            Ok(Some(ResponseValue::History(
                records.into_iter().map(RecordView::from).collect(),
            )))
        }
    }
}

/// Turn a reference into an account id
///
/// Ids are passed through unchecked; the operation itself reports a missing
/// account. Usernames are looked up here.
fn resolve(query: &QueryService<'_>, reference: &AccountRef, role: AccountRole) -> LedgerResult<AccountId> {
    match reference {
        AccountRef::Id(id) => Ok(AccountId::from_raw(*id)),
        AccountRef::Username(name) => match query.resolve_user(name) {
            Ok(account) => Ok(account.id),
            Err(LedgerError::NotFound { identifier, .. }) => {
                Err(LedgerError::party_not_found(role, identifier))
            }
            Err(e) => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn setup() -> (Storage, Settings) {
        let storage = Storage::open_in_memory().unwrap();
        let settings = Settings::default();
        for text in [
            r#"{"operation": "createAccount", "accountRef": "alice", "amount": 100}"#,
            r#"{"operation": "createAccount", "accountRef": "bob"}"#,
        ] {
            assert!(dispatch_json(&storage, &settings, text).ok);
        }
        (storage, settings)
    }

    fn balance_of(response: &LedgerResponse) -> Money {
        match &response.value {
            Some(ResponseValue::Balance(view)) => view.balance,
            other => panic!("expected a balance, got {:?}", other),
        }
    }

    #[test]
    fn test_create_account_returns_view() {
        let storage = Storage::open_in_memory().unwrap();
        let response = dispatch(
            &storage,
            &Settings::default(),
            &LedgerRequest::new(Operation::CreateAccount, AccountRef::username("Carol"))
                .with_amount(Money::from_cents(1234)),
        );

        match response.value {
            Some(ResponseValue::Account(view)) => {
                assert_eq!(view.username, "carol");
                assert_eq!(view.balance.cents(), 1234);
            }
            other => panic!("expected an account, got {:?}", other),
        }
    }

    #[test]
    fn test_transfer_then_balance() {
        let (storage, settings) = setup();

        let response = dispatch_json(
            &storage,
            &settings,
            r#"{"operation": "transfer", "accountRef": "alice", "counterpartyRef": "bob", "amount": "40"}"#,
        );
        assert!(response.ok);
        assert!(response.value.is_none());

        let alice = dispatch_json(&storage, &settings, r#"{"operation": "getBalance", "accountRef": "alice"}"#);
        let bob = dispatch_json(&storage, &settings, r#"{"operation": "getBalance", "accountRef": 2}"#);
        assert_eq!(balance_of(&alice).cents(), 6000);
        assert_eq!(balance_of(&bob).cents(), 4000);
    }

    #[test]
    fn test_deposit_and_withdrawal_return_new_balance() {
        let (storage, settings) = setup();

        let response = dispatch_json(
            &storage,
            &settings,
            r#"{"operation": "deposit", "accountRef": "bob", "amount": 25.5}"#,
        );
        assert_eq!(balance_of(&response).cents(), 2550);

        let response = dispatch_json(
            &storage,
            &settings,
            r#"{"operation": "withdrawal", "accountRef": "bob", "amount": "0.50"}"#,
        );
        assert_eq!(balance_of(&response).cents(), 2500);
    }

    #[test]
    fn test_history_uses_default_limit() {
        let (storage, settings) = setup();
        for _ in 0..7 {
            assert!(dispatch_json(
                &storage,
                &settings,
                r#"{"operation": "deposit", "accountRef": "bob", "amount": 1}"#
            )
            .ok);
        }

        let response = dispatch_json(&storage, &settings, r#"{"operation": "getHistory", "accountRef": "bob"}"#);
        match response.value {
            Some(ResponseValue::History(records)) => assert_eq!(records.len(), settings.history_limit),
            other => panic!("expected history, got {:?}", other),
        }

        let response = dispatch_json(
            &storage,
            &settings,
            r#"{"operation": "getHistory", "accountRef": "bob", "limit": 2}"#,
        );
        match response.value {
            Some(ResponseValue::History(records)) => assert_eq!(records.len(), 2),
            other => panic!("expected history, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_carry_kind() {
        let (storage, settings) = setup();
        let cases = [
            (r#"{"operation": "withdrawal", "accountRef": "alice", "amount": 1000}"#, ErrorKind::InsufficientFunds),
            (r#"{"operation": "deposit", "accountRef": "alice", "amount": 0}"#, ErrorKind::InvalidAmount),
            (r#"{"operation": "deposit", "accountRef": "alice"}"#, ErrorKind::InvalidAmount),
            (r#"{"operation": "deposit", "accountRef": "zoe", "amount": 1}"#, ErrorKind::NotFound),
            (r#"{"operation": "transfer", "accountRef": "alice", "amount": 1}"#, ErrorKind::InvalidRequest),
            (r#"{"operation": "transfer", "accountRef": "alice", "counterpartyRef": "ALICE", "amount": 1}"#, ErrorKind::SelfTransfer),
            (r#"{"operation": "createAccount", "accountRef": "alice"}"#, ErrorKind::DuplicateUsername),
            (r#"{"operation": "createAccount", "accountRef": " "}"#, ErrorKind::InvalidUsername),
        ];

        for (text, kind) in cases {
            let response = dispatch_json(&storage, &settings, text);
            assert!(!response.ok, "{}", text);
            assert_eq!(response.error_kind(), Some(kind), "{}", text);
        }
    }

    #[test]
    fn test_mixed_reference_transfer_reports_side() {
        let (storage, settings) = setup();

        let request = LedgerRequest::new(Operation::Transfer, AccountRef::Id(1))
            .with_counterparty(AccountRef::username("zoe"))
            .with_amount(Money::from_cents(100));
        let response = dispatch(&storage, &settings, &request);
        assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
        assert!(response.error.unwrap().message.starts_with("Recipient account"));

        let request = LedgerRequest::new(Operation::Transfer, AccountRef::Id(1))
            .with_counterparty(AccountRef::username("bob"))
            .with_amount(Money::from_cents(100));
        assert!(dispatch(&storage, &settings, &request).ok);
    }
}
