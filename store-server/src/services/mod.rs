//! 服务模块
//!
//! - [`proof_storage`] - 支付凭证文件存储

pub mod proof_storage;

pub use proof_storage::ProofStorage;
