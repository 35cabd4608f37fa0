//! 可委托的服务定位器
//!
//! 在基础容器之外串联多个容器：前置容器先于本地注册表查询，后备容器在其后
//! 查询；或者指定单个父容器，并通过模式开关决定是否先交给父容器回答。

pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod logging;

// Re-export commonly used items for convenience
pub use config::LocatorConfig;
pub use errors::{AppError, ConfigError};
pub use infrastructure::container::{
    BaseContainer, ChainedContainer, Container, ContainerError, Lookup, Mode, OnMissing,
    ParentedContainer,
};
