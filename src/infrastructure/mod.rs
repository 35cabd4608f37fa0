//! 基础设施层
//!
//! 提供依赖注入容器及其委托机制

// 容器实现
pub mod container;

// 重新导出API
pub use container::{Container, ContainerError, DelegatingContainer, Lookup, OnMissing};
