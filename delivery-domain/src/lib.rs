//! 配送领域层（delivery-domain）
//!
//! 在有界网格上跟踪订单与骑手，为待分配订单挑选最合适的骑手，
//! 并逐个节拍推动骑手前往目的地直至送达。本 crate 包含：
//! - 值对象与标识：`location`、`ids`
//! - 聚合：`order`（三态生命周期）、`courier` + `storage_place`（容量受限的存储位）
//! - 领域服务：`dispatcher`（按预计送达时间分配）
//! - 协议：`repository`（订单/骑手仓储）、`unit_of_work`（跨两个仓储的事务边界）
//! - 统一错误：`error`
//!
//! 本 crate 不依赖任何具体存储与调度实现；适配器由 `delivery-infra` 提供，
//! 命令编排由 `delivery-application` 提供。
//!
pub mod aggregate;
pub mod courier;
pub mod dispatcher;
pub mod entity;
pub mod error;
pub mod ids;
pub mod location;
pub mod order;
pub mod repository;
pub mod storage_place;
pub mod unit_of_work;

// 允许在本 crate 内部通过 ::delivery_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 内同样可解析。
extern crate self as delivery_domain;
