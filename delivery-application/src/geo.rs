//! 地址解析端口
//!
//! 下单时把街道地址解析为网格坐标。真实实现通常调用外部地理服务，
//! 默认实现 [`RandomGeoLocator`] 在网格内随机取点。
//!
use crate::error::AppError;
use async_trait::async_trait;
use delivery_domain::location::Location;

#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, street: &str) -> Result<Location, AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGeoLocator;

#[async_trait]
impl GeoLocator for RandomGeoLocator {
    async fn locate(&self, _street: &str) -> Result<Location, AppError> {
        Ok(Location::random())
    }
}

/// 所有地址都解析到同一个点
#[derive(Debug, Clone, Copy)]
pub struct FixedGeoLocator(pub Location);

#[async_trait]
impl GeoLocator for FixedGeoLocator {
    async fn locate(&self, _street: &str) -> Result<Location, AppError> {
        Ok(self.0)
    }
}
