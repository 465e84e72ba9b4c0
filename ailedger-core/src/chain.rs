//! Already-decoded on-chain transaction records, as handed over by a
//! blockchain data source.

use serde::{Deserialize, Serialize};

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Movement of funds relative to the tracked wallet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[serde(rename = "received")]
    Received,
    #[serde(rename = "sent")]
    Sent,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Received => "Received",
            Direction::Sent => "Sent",
        }
    }
}

/// One top-level instruction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainInstruction {
    pub program_id: String,
    /// Parsed instruction type when the RPC decoded it (e.g. "transfer")
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawChainTransaction {
    pub signature: String,
    pub slot: u64,
    /// Unix seconds
    #[serde(default)]
    pub block_time: Option<i64>,
    pub wallet_address: String,
    /// The other side of the transfer, when identifiable
    #[serde(default)]
    pub counterparty: Option<String>,
    /// Wallet balance before, in lamports
    pub pre_balance: u64,
    /// Wallet balance after, in lamports
    pub post_balance: u64,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub instructions: Vec<ChainInstruction>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl RawChainTransaction {
    /// Balance change in lamports (positive = received)
    pub fn lamport_delta(&self) -> i128 {
        self.post_balance as i128 - self.pre_balance as i128
    }

    /// Absolute balance change in SOL
    pub fn amount_sol(&self) -> f64 {
        self.lamport_delta().unsigned_abs() as f64 / LAMPORTS_PER_SOL
    }

    pub fn direction(&self) -> Direction {
        if self.lamport_delta() > 0 {
            Direction::Received
        } else {
            Direction::Sent
        }
    }

    /// Distinct program ids in instruction order
    pub fn program_ids(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for ix in &self.instructions {
            if !out.contains(&ix.program_id.as_str()) {
                out.push(&ix.program_id);
            }
        }
        out
    }

    pub fn memo_text(&self) -> Option<&str> {
        self.memo.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(pre: u64, post: u64) -> RawChainTransaction {
        RawChainTransaction {
            signature: "sig".to_string(),
            slot: 1,
            block_time: None,
            wallet_address: "Wallet1".to_string(),
            counterparty: None,
            pre_balance: pre,
            post_balance: post,
            fee: 5000,
            instructions: vec![
                ChainInstruction { program_id: "A".to_string(), kind: None },
                ChainInstruction { program_id: "B".to_string(), kind: None },
                ChainInstruction { program_id: "A".to_string(), kind: None },
            ],
            memo: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_amount_and_direction() {
        let sent = tx(10_000_000_000, 9_500_000_000);
        assert_eq!(sent.amount_sol(), 0.5);
        assert_eq!(sent.direction(), Direction::Sent);

        let received = tx(0, 12_500_000_000);
        assert_eq!(received.amount_sol(), 12.5);
        assert_eq!(received.direction(), Direction::Received);
    }

    #[test]
    fn test_program_ids_dedup_and_blank_memo() {
        let t = tx(1, 2);
        assert_eq!(t.program_ids(), vec!["A", "B"]);
        assert_eq!(t.memo_text(), None);
    }
}
