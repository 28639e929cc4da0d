//! 强类型标识
//!
//! 统一基于 `Uuid`，nil 值视为“未构造”，只能通过 `new()` / `try_new()` / 解析获得。
//!
use delivery_macros::entity_id;
use uuid::Uuid;

/// 订单标识
#[entity_id]
pub struct OrderId(Uuid);

/// 骑手标识
#[entity_id]
pub struct CourierId(Uuid);

/// 存储位标识
#[entity_id]
pub struct StoragePlaceId(Uuid);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    #[test]
    fn nil_uuid_is_rejected() {
        let err = OrderId::try_new(Uuid::nil()).unwrap_err();
        match err {
            DomainError::Validation(v) => assert!(v.contains("OrderId")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn generated_ids_are_unique_and_not_nil() {
        let a = CourierId::new();
        let b = CourierId::new();
        assert_ne!(a, b);
        assert!(!a.value().is_nil());
    }

    #[test]
    fn display_and_from_str_agree() {
        let id = StoragePlaceId::new();
        let parsed: StoragePlaceId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        assert!("00000000-0000-0000-0000-000000000000"
            .parse::<StoragePlaceId>()
            .is_err());
        assert!(matches!(
            "garbage".parse::<StoragePlaceId>(),
            Err(DomainError::Parse { .. })
        ));
    }

    #[test]
    fn serde_goes_through_validation() {
        let id = OrderId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.value()));
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let nil = format!("\"{}\"", Uuid::nil());
        assert!(serde_json::from_str::<OrderId>(&nil).is_err());
    }
}
