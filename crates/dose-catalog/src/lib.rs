//! # Dose Catalog
//!
//! 药物目录模块：内置目录数据的加载、完整性校验与检索。
//! 目录为进程级只读数据，启动时加载一次，此后不再变更，
//! 任意并发读取无需同步。

pub mod catalog;

pub use catalog::Catalog;
