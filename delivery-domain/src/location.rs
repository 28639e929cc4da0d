//! 网格坐标（Location）
//!
//! 有界整数网格上的不可变点，两轴取值均在 `[Location::MIN, Location::MAX]`。
//! 距离采用曼哈顿度量（只能沿网格移动，不走对角线）。
//!
use crate::error::{DomainError, DomainResult, Violations};
use delivery_macros::value_object;
use rand_core::{OsRng, RngCore};
use std::fmt;
use std::ops::RangeInclusive;

/// 网格上的坐标点
///
/// 序列化形态为 `[x, y]`，反序列化同样经过范围校验。
///
/// ```
/// use delivery_domain::location::Location;
///
/// let a = Location::new(1, 1).unwrap();
/// let b = Location::new(4, 5).unwrap();
/// assert_eq!(a.distance_to(&b), 7);
/// assert!(Location::new(0, 11).is_err());
/// ```
#[value_object(repr = "(i32, i32)")]
#[derive(Copy, Hash)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    const RANGE: RangeInclusive<i32> = Self::MIN..=Self::MAX;

    /// 创建坐标，任一轴越界即失败（两轴同时越界时两条都会报告）
    pub fn new(x: i32, y: i32) -> DomainResult<Self> {
        let mut violations = Violations::new();
        violations.check(
            Self::RANGE.contains(&x),
            "x",
            format!("must be in [{}, {}], got {x}", Self::MIN, Self::MAX),
        );
        violations.check(
            Self::RANGE.contains(&y),
            "y",
            format!("must be in [{}, {}], got {y}", Self::MIN, Self::MAX),
        );
        violations.into_result()?;

        Ok(Self { x, y })
    }

    /// 在网格内均匀随机取点
    pub fn random() -> Self {
        Self::random_with(&mut OsRng)
    }

    /// 使用给定随机源在网格内均匀取点
    pub fn random_with<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: random_coordinate(rng),
            y: random_coordinate(rng),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// 曼哈顿距离
    pub fn distance_to(&self, other: &Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

// 依赖里只有 rand_core（没有 `gen_range`），这里用拒绝采样避免取模偏差
fn random_coordinate<R: RngCore + ?Sized>(rng: &mut R) -> i32 {
    let span = (Location::MAX - Location::MIN + 1) as u32;
    let zone = u32::MAX - (u32::MAX % span);
    loop {
        let v = rng.next_u32();
        if v < zone {
            return Location::MIN + (v % span) as i32;
        }
    }
}

impl TryFrom<(i32, i32)> for Location {
    type Error = DomainError;

    fn try_from((x, y): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

impl From<Location> for (i32, i32) {
    fn from(value: Location) -> Self {
        (value.x, value.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
