//! ListTransactionsHandler - Query handler for the transaction history page.

use std::sync::Arc;

use crate::domain::billing::{AccessToken, BillingError, Transaction, TransactionFilter};
use crate::ports::BillingService;

/// Query for the history.
#[derive(Debug, Clone)]
pub struct ListTransactionsQuery {
    pub access_token: AccessToken,
    pub filter: TransactionFilter,
}

impl ListTransactionsQuery {
    /// The full, unfiltered history.
    pub fn all(access_token: AccessToken) -> Self {
        Self {
            access_token,
            filter: TransactionFilter::all(),
        }
    }
}

/// One history row.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub transaction: Transaction,
}

impl TransactionRow {
    /// "Оплата" or "Зачисление".
    pub fn type_label(&self) -> &'static str {
        self.transaction.transaction_type.label()
    }

    pub fn created_at_label(&self) -> String {
        self.transaction.created_at.format_simple()
    }

    pub fn expires_at_label(&self) -> Option<String> {
        self.transaction.expires_at.map(|t| t.format_simple())
    }
}

/// Handler for the transaction history.
pub struct ListTransactionsHandler {
    billing: Arc<dyn BillingService>,
}

impl ListTransactionsHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    /// Rows sorted by creation time, oldest first.
    pub async fn handle(
        &self,
        query: ListTransactionsQuery,
    ) -> Result<Vec<TransactionRow>, BillingError> {
        let mut transactions = self
            .billing
            .list_transactions(&query.access_token, &query.filter)
            .await?;
        transactions.sort_by_key(|t| t.created_at);

        Ok(transactions
            .into_iter()
            .map(|transaction| TransactionRow { transaction })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::billing::{InMemoryBillingService, USER_EMAIL, USER_PASSWORD};
    use crate::domain::billing::{Credentials, TransactionType};
    use crate::domain::foundation::Timestamp;
    use crate::ports::BillingService;

    #[tokio::test]
    async fn history_is_sorted_and_labelled() {
        let start = Timestamp::parse_rfc3339("2024-03-01T12:00:00Z").unwrap();
        let billing = InMemoryBillingService::seeded_at(start);
        let token = billing
            .authenticate(&Credentials::new(USER_EMAIL, USER_PASSWORD))
            .await
            .unwrap()
            .access_token;
        billing.advance_secs(60);
        billing.pay_course(&token, "python-programming").await.unwrap();

        let rows = ListTransactionsHandler::new(Arc::new(billing))
            .handle(ListTransactionsQuery::all(token))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].transaction.transaction_type, TransactionType::Payment);
        assert_eq!(rows[1].type_label(), "Оплата");
        assert_eq!(rows[1].created_at_label(), "12:01:00 01.03.2024");
        assert_eq!(rows[1].expires_at_label().as_deref(), Some("12:01:00 08.03.2024"));
        assert!(rows[0].transaction.created_at <= rows[1].transaction.created_at);
    }
}
