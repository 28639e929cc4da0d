use delivery_macros::value_object;

#[value_object]
struct Volume {
    value: i32,
}

#[value_object(debug = false)]
struct Label(String);

#[value_object]
#[derive(Copy, Hash)]
enum Priority {
    Low,
    High,
}

/// 反序列化经过校验构造
#[value_object(repr = "i32")]
#[derive(Copy)]
struct Positive(i32);

impl TryFrom<i32> for Positive {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(format!("must be positive, got {value}"))
        }
    }
}

impl From<Positive> for i32 {
    fn from(value: Positive) -> Self {
        value.0
    }
}

fn main() {
    let v = Volume { value: 3 };
    let _ = format!("{:?}", v);
    assert_eq!(v.clone(), Volume { value: 3 });

    let _ = Label("bag".into());

    let p = Priority::High;
    assert_eq!(serde_json::to_string(&p).unwrap(), "\"High\"");
    assert_eq!(serde_json::from_str::<Priority>("\"Low\"").unwrap(), Priority::Low);

    assert_eq!(serde_json::to_string(&Positive(4)).unwrap(), "4");
    assert!(serde_json::from_str::<Positive>("0").is_err());
    assert_eq!(serde_json::from_str::<Positive>("7").unwrap(), Positive(7));
}
