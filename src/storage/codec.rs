use anyhow::{Context, Result};
use tracing::warn;

use crate::domain::Transaction;

/// Serialize a collection into its persisted JSON form.
pub fn encode_transactions(transactions: &[Transaction]) -> Result<Vec<u8>> {
    serde_json::to_vec(transactions).context("Failed to serialize transactions")
}

/// Deserialize a persisted collection.
///
/// Missing, `null` or unparsable data yields an empty collection: a damaged
/// blob must not prevent the ledger from starting.
pub fn decode_transactions(key: &str, data: Option<&[u8]>) -> Vec<Transaction> {
    let Some(bytes) = data else {
        return Vec::new();
    };

    match serde_json::from_slice::<Option<Vec<Transaction>>>(bytes) {
        Ok(transactions) => transactions.unwrap_or_default(),
        Err(err) => {
            warn!(key, error = %err, "unparsable persisted data, treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::TransactionId;

    fn sample(archived: bool) -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap();
        Transaction {
            id: TransactionId::generate(),
            amount: -42.75,
            whom: "Grocer".to_string(),
            created_at: date,
            archived_at: archived.then_some(date),
        }
    }

    #[test]
    fn test_round_trip() {
        let txs = vec![sample(false), sample(true)];
        let bytes = encode_transactions(&txs).unwrap();
        assert_eq!(decode_transactions("k", Some(bytes.as_slice())), txs);
    }

    #[test]
    fn test_missing_data_is_empty() {
        assert!(decode_transactions("k", None).is_empty());
    }

    #[test]
    fn test_null_and_garbage_are_empty() {
        assert!(decode_transactions("k", Some(&b"null"[..])).is_empty());
        assert!(decode_transactions("k", Some(&b"{not json"[..])).is_empty());
        assert!(decode_transactions("k", Some(&b"{\"id\":1}"[..])).is_empty());
    }

    #[test]
    fn test_decodes_browser_style_records() {
        let json = br#"[
            {"id":"0b6a7c1e-3f2d-4a5b-9c8d-1e2f3a4b5c6d","amount":50,"whom":"Alice","date":"2024-04-02T18:20:11.512Z"},
            {"id":"1c7b8d2f-4e3a-4b6c-8d9e-2f3a4b5c6d7e","amount":-20.5,"date":"2024-04-03T07:00:00.000Z"}
        ]"#;

        let txs = decode_transactions("transactions", Some(&json[..]));
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].amount, 50.0);
        assert_eq!(txs[0].whom, "Alice");
        assert_eq!(txs[1].whom, "");
        assert!(txs.iter().all(|t| t.id.is_v4_shaped()));
    }
}
