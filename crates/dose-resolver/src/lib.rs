//! # Dose Resolver
//!
//! 剂量解析核心算法：年龄分组选择、剂量表达式解析、按公斤换算与
//! 最大剂量封顶。整条解析路径为纯同步内存计算，请求之间相互独立。

pub mod age_band;
pub mod compute;
pub mod parser;
pub mod quick;
pub mod resolver;

pub use age_band::{select_band, AgeBandThresholds};
pub use parser::{DoseParser, DoseShape};
pub use quick::{QuickDoseResult, QuickDrugInfo, QuickTable};
pub use resolver::{DoseQuery, DoseResolver, ResolverConfig};
