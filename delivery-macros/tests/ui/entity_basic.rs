use delivery_domain::entity::Entity;
use delivery_domain::ids::CourierId;
use delivery_macros::entity;

#[entity(id = CourierId)]
struct Vehicle {
    plate: String,
}

// 已声明的 id 字段会被移到最前并复用
#[entity(id = CourierId, debug = false)]
struct Shift {
    hours: u8,
    id: CourierId,
}

fn main() {
    let id = CourierId::new();
    let vehicle = Vehicle {
        id,
        plate: "A-1".into(),
    };
    assert_eq!(*vehicle.id(), id);
    let _ = format!("{:?}", vehicle.clone());
    assert_eq!(vehicle.plate, "A-1");

    let shift = Shift { hours: 8, id };
    assert_eq!(shift.id(), &id);
    assert_eq!(shift.hours, 8);
}
