//! Account lookup across the ledger's chart of accounts

use crate::types::*;

/// Criteria for [`AccountDirectory::find`]; every criterion given must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountQuery<'a> {
    pub name: Option<&'a str>,
    pub number: Option<&'a str>,
    pub account_type: Option<AccountType>,
    pub iban: Option<&'a str>,
}

impl<'a> AccountQuery<'a> {
    pub fn name(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn number(number: &'a str) -> Self {
        Self {
            number: Some(number),
            ..Self::default()
        }
    }

    pub fn iban(iban: &'a str) -> Self {
        Self {
            iban: Some(iban),
            ..Self::default()
        }
    }

    pub fn of_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// A query needs at least one identifying criterion
    fn is_identifying(&self) -> bool {
        self.name.is_some() || self.number.is_some() || self.iban.is_some()
    }

    fn matches(&self, account: &LedgerAccount) -> bool {
        self.name.is_none_or(|name| account.name == name)
            && self
                .number
                .is_none_or(|number| account.account_number.as_deref() == Some(number))
            && self
                .account_type
                .is_none_or(|account_type| account.account_type == account_type)
            && self.iban.is_none_or(|iban| account.iban.as_deref() == Some(iban))
    }
}

/// The ledger accounts that take part in reconciliation (assets and cash)
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: Vec<LedgerAccount>,
}

impl AccountDirectory {
    /// Build a directory, keeping only reconcilable accounts
    pub fn new(accounts: impl IntoIterator<Item = LedgerAccount>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .filter(|account| account.account_type.is_reconcilable())
                .collect(),
        }
    }

    pub fn accounts(&self) -> &[LedgerAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// First account satisfying the query, or `None` if the query names no
    /// name, number or IBAN
    pub fn find(&self, query: &AccountQuery<'_>) -> Option<&LedgerAccount> {
        if !query.is_identifying() {
            return None;
        }
        self.accounts.iter().find(|account| query.matches(account))
    }

    pub fn by_name(&self, name: &str) -> Option<&LedgerAccount> {
        self.find(&AccountQuery::name(name))
    }

    pub fn by_number(&self, number: &str) -> Option<&LedgerAccount> {
        self.find(&AccountQuery::number(number))
    }

    /// Look up an optional account number, as carried by transaction records
    pub fn by_optional_number(&self, number: Option<&str>) -> Option<&LedgerAccount> {
        number.and_then(|number| self.by_number(number))
    }

    /// Whether an account with this number is known
    pub fn contains_number(&self, number: &str) -> bool {
        self.by_number(number).is_some()
    }

    /// Accounts whose transactions are fetched from the ledger. The cash
    /// account mirrors movements of the asset accounts and is skipped.
    pub fn fetchable(&self) -> Vec<LedgerAccount> {
        self.accounts
            .iter()
            .filter(|account| account.account_type != AccountType::Cash)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> AccountDirectory {
        AccountDirectory::new(vec![
            LedgerAccount::new(
                "1".to_string(),
                "Checking".to_string(),
                AccountType::Asset,
                Some("0001".to_string()),
            )
            .with_iban("FR7600010001".to_string()),
            LedgerAccount::new(
                "2".to_string(),
                "Savings".to_string(),
                AccountType::Asset,
                Some("0002".to_string()),
            ),
            LedgerAccount::new("3".to_string(), "Cash".to_string(), AccountType::Cash, None),
            LedgerAccount::new(
                "4".to_string(),
                "Groceries".to_string(),
                AccountType::Expense,
                None,
            ),
        ])
    }

    #[test]
    fn test_only_reconcilable_accounts_are_kept() {
        let directory = directory();
        assert_eq!(directory.len(), 3);
        assert!(directory.by_name("Groceries").is_none());
    }

    #[test]
    fn test_lookups() {
        let directory = directory();

        assert_eq!(directory.by_name("Savings").map(|a| a.id.as_str()), Some("2"));
        assert_eq!(directory.by_number("0001").map(|a| a.id.as_str()), Some("1"));
        assert_eq!(
            directory.find(&AccountQuery::iban("FR7600010001")).map(|a| a.id.as_str()),
            Some("1")
        );
        assert!(directory.by_number("9999").is_none());
        assert!(directory.by_optional_number(None).is_none());
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let directory = directory();

        let query = AccountQuery {
            name: Some("Checking"),
            number: Some("0002"),
            ..AccountQuery::default()
        };
        assert!(directory.find(&query).is_none());

        let query = AccountQuery::name("Cash").of_type(AccountType::Cash);
        assert_eq!(directory.find(&query).map(|a| a.id.as_str()), Some("3"));
        let query = AccountQuery::name("Cash").of_type(AccountType::Asset);
        assert!(directory.find(&query).is_none());
    }

    #[test]
    fn test_query_without_identifier_finds_nothing() {
        let query = AccountQuery::default().of_type(AccountType::Asset);
        assert!(directory().find(&query).is_none());
    }

    #[test]
    fn test_cash_account_is_not_fetched() {
        let ids: Vec<String> = directory().fetchable().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
    }
}
