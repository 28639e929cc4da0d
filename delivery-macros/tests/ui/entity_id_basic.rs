use delivery_macros::entity_id;
use uuid::Uuid;

#[entity_id]
struct ParcelId(Uuid);

#[entity_id(debug = false)]
struct DepotId(Uuid);

impl std::fmt::Debug for DepotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DepotId(..)")
    }
}

fn main() {
    let id = ParcelId::new();
    let _ = format!("{:?}", id);
    assert!(!id.value().is_nil());

    // nil 不是合法标识
    assert!(ParcelId::try_new(Uuid::nil()).is_err());

    let parsed: ParcelId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);

    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let nil = format!("\"{}\"", Uuid::nil());
    assert!(serde_json::from_str::<ParcelId>(&nil).is_err());

    let raw: Uuid = id.into();
    assert_eq!(ParcelId::try_from(raw).unwrap(), id);

    // 手写 Debug 可编译说明未自动派生
    let _ = format!("{:?}", DepotId::new());
}
