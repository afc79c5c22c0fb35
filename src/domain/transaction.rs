//! Raw ledger transactions as returned by the history endpoint.

use serde::{Deserialize, Serialize};

/// A single ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction hash
    pub hash: String,

    /// Unix timestamp in seconds
    pub time: i64,

    /// Inputs, each referencing the output it spends
    #[serde(default)]
    pub inputs: Vec<TxInput>,

    /// Outputs
    #[serde(default)]
    pub out: Vec<TxOutput>,
}

/// A transaction input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxInput {
    /// The output being spent (absent for coinbase inputs)
    pub prev_out: Option<TxOutput>,
}

/// A transaction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutput {
    /// Destination address (absent for non-standard scripts)
    pub addr: Option<String>,

    /// Value in satoshis
    pub value: i64,
}

impl RawTransaction {
    /// Net satoshi effect of this transaction on `address`:
    /// outputs paying the address minus inputs spending from it.
    pub fn net_effect(&self, address: &str) -> i64 {
        let received: i64 = self
            .out
            .iter()
            .filter(|o| o.addr.as_deref() == Some(address))
            .map(|o| o.value)
            .sum();

        let spent: i64 = self
            .inputs
            .iter()
            .filter_map(|i| i.prev_out.as_ref())
            .filter(|o| o.addr.as_deref() == Some(address))
            .map(|o| o.value)
            .sum();

        received - spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(addr: &str, value: i64) -> TxOutput {
        TxOutput {
            addr: Some(addr.to_string()),
            value,
        }
    }

    #[test]
    fn test_net_effect_received() {
        let tx = RawTransaction {
            hash: "abc".to_string(),
            time: 1_700_000_000,
            inputs: vec![TxInput {
                prev_out: Some(output("other", 200_000_000)),
            }],
            out: vec![output("1A2b3C", 150_000_000), output("other", 49_000_000)],
        };

        assert_eq!(tx.net_effect("1A2b3C"), 150_000_000);
    }

    #[test]
    fn test_net_effect_sent_with_change() {
        let tx = RawTransaction {
            hash: "def".to_string(),
            time: 1_700_000_000,
            inputs: vec![TxInput {
                prev_out: Some(output("1A2b3C", 100_000_000)),
            }],
            out: vec![output("other", 40_000_000), output("1A2b3C", 59_000_000)],
        };

        assert_eq!(tx.net_effect("1A2b3C"), -41_000_000);
    }

    #[test]
    fn test_net_effect_unrelated_address() {
        let tx = RawTransaction {
            hash: "ghi".to_string(),
            time: 1_700_000_000,
            inputs: vec![TxInput { prev_out: None }],
            out: vec![output("other", 5_000_000_000)],
        };

        assert_eq!(tx.net_effect("1A2b3C"), 0);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        // Coinbase inputs carry no prev_out, non-standard outputs no addr.
        let json = r#"{
            "hash": "aa11",
            "time": 1700000000,
            "inputs": [{"prev_out": null}],
            "out": [{"addr": null, "value": 0}, {"addr": "1A2b3C", "value": 12}]
        }"#;

        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.net_effect("1A2b3C"), 12);
    }
}
