//! 配送领域建模用过程宏（delivery-macros）
//!
//! - `#[entity]`：为聚合/实体注入 `id` 字段并实现 `Entity`；
//! - `#[entity_id]`：为基于 `Uuid` 的标识类型生成受校验的构造与转换；
//! - `#[value_object]`：为值对象补齐派生，并可通过 `repr` 让反序列化走校验构造。
//!
use proc_macro::TokenStream;

mod entity;
mod entity_id;
mod utils;
mod value_object;

/// 实体宏
/// - 若缺失则在字段最前追加 `id: IdType`
/// - 自动实现 `::delivery_domain::entity::Entity`
/// - 参数：`#[entity(id = IdType, debug = true|false)]`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体 ID 宏
/// 仅支持 `struct XxxId(Uuid);` 形式的单字段 tuple struct。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏
/// - 参数：`#[value_object(debug = true|false, repr = "Type")]`
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
