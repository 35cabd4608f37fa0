//! 容器模块
//!
//! `Container` 是委托链上所有参与者共享的能力接口：基础容器、前置容器、
//! 后备容器和父容器只在查询顺序中的角色不同，类型上没有区别。

pub mod base;
pub mod chain;
pub mod delegating;
pub mod error;
pub mod parent;
pub mod suggest;
pub mod traversal;

use std::any::Any;
use std::sync::Arc;

pub use base::{BaseContainer, ContainerStats};
pub use chain::DelegationChain;
pub use delegating::{ChainedContainer, DelegatingContainer, DelegationStrategy, ParentedContainer};
pub use error::ContainerError;
pub use parent::{Mode, ParentDelegation};
pub use suggest::suggest_alternatives;
pub use traversal::{ContainerId, Traversal};

/// 类型擦除后的服务实例
pub type Service = Arc<dyn Any + Send + Sync>;

/// 查找结果：找到值 / 找到但为空 / 未找到
#[derive(Clone)]
pub enum Lookup {
    /// 解析出的服务实例
    Found(Service),
    /// 服务已注册，但其值就是空
    Null,
    /// 未找到（空哨兵），只会在 `OnMissing::ReturnNull` 时返回
    Missing,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Lookup::Null)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }

    /// 取出服务实例；`Null` 与 `Missing` 都返回 `None`
    pub fn into_service(self) -> Option<Service> {
        match self {
            Lookup::Found(service) => Some(service),
            Lookup::Null | Lookup::Missing => None,
        }
    }

    /// 向下转型为具体类型
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            Lookup::Found(service) => service.clone().downcast::<T>().ok(),
            Lookup::Null | Lookup::Missing => None,
        }
    }
}

impl std::fmt::Debug for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Found(_) => write!(f, "Found(..)"),
            Lookup::Null => write!(f, "Null"),
            Lookup::Missing => write!(f, "Missing"),
        }
    }
}

/// 查找失败时的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMissing {
    /// 返回 `ContainerError::NotFound`
    #[default]
    Fail,
    /// 返回 `Lookup::Missing` 哨兵
    ReturnNull,
}

/// 服务容器能力接口
pub trait Container: Send + Sync {
    /// 是否能解析该服务
    fn has(&self, id: &str) -> bool;

    /// 解析服务
    fn get(&self, id: &str, on_missing: OnMissing) -> Result<Lookup, ContainerError>;

    /// 在既有遍历上下文中查询；默认实现开启新的遍历
    fn has_in(&self, id: &str, _traversal: &mut Traversal) -> bool {
        self.has(id)
    }

    /// 在既有遍历上下文中解析
    fn get_in(
        &self,
        id: &str,
        on_missing: OnMissing,
        _traversal: &mut Traversal,
    ) -> Result<Lookup, ContainerError> {
        self.get(id, on_missing)
    }
}

impl<C: Container + ?Sized> Container for Arc<C> {
    fn has(&self, id: &str) -> bool {
        (**self).has(id)
    }

    fn get(&self, id: &str, on_missing: OnMissing) -> Result<Lookup, ContainerError> {
        (**self).get(id, on_missing)
    }

    fn has_in(&self, id: &str, traversal: &mut Traversal) -> bool {
        (**self).has_in(id, traversal)
    }

    fn get_in(
        &self,
        id: &str,
        on_missing: OnMissing,
        traversal: &mut Traversal,
    ) -> Result<Lookup, ContainerError> {
        (**self).get_in(id, on_missing, traversal)
    }
}
