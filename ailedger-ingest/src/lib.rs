//! ailedger-ingest: adapters that turn collaborator output (Solana RPC JSON,
//! OCR receipt text) into parser input.

pub mod receipt;
pub mod solana;

pub use receipt::{condense_receipt, summarize_receipt, ReceiptSummary};
pub use solana::{decode_transaction, decode_transaction_str, MEMO_PROGRAM, MEMO_V1_PROGRAM};
