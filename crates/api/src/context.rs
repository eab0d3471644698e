use rewards_core::AccountId;

/// Account context for a request.
///
/// Resolved once by `middleware::account_middleware` and must be present for
/// all points routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    account_id: AccountId,
}

impl AccountContext {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }
}
