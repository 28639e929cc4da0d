//! 实体（Entity）基础抽象
//!
//! 为聚合与实体提供统一的强类型标识。
//!
use std::{fmt::Display, hash::Hash, str::FromStr};

/// 具备唯一标识的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示、可比较与可复制
    type Id: FromStr + Copy + Eq + Hash + Display + Send + Sync;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}
