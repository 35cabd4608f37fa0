//! 委托容器门面
//!
//! 把基础容器和一种委托策略组合成对外唯一的 `has`/`get` 接口。两种策略
//! （多容器委托链、单父容器 + 模式）共享同一套查找结果和失败建议逻辑。

use super::chain::DelegationChain;
use super::parent::{Mode, ParentDelegation};
use super::{BaseContainer, Container, ContainerError, ContainerId, Lookup, OnMissing, Traversal};
use crate::config::LocatorConfig;
use std::sync::Arc;

/// 委托策略
///
/// 策略只负责路由。链路全部耗尽时返回 `Lookup::Missing`，由门面决定是
/// 报错还是返回空哨兵。
pub trait DelegationStrategy: Send + Sync {
    fn has(
        &self,
        owner: ContainerId,
        base: &BaseContainer,
        id: &str,
        traversal: &mut Traversal,
    ) -> bool;

    fn get(
        &self,
        owner: ContainerId,
        base: &BaseContainer,
        id: &str,
        on_missing: OnMissing,
        traversal: &mut Traversal,
    ) -> Result<Lookup, ContainerError>;
}

/// 委托容器
pub struct DelegatingContainer<S> {
    id: ContainerId,
    base: Arc<BaseContainer>,
    strategy: S,
}

/// 多容器委托链变体
pub type ChainedContainer = DelegatingContainer<DelegationChain>;

/// 单父容器变体
pub type ParentedContainer = DelegatingContainer<ParentDelegation>;

impl<S: DelegationStrategy> DelegatingContainer<S> {
    pub fn with_strategy(base: Arc<BaseContainer>, strategy: S) -> Self {
        Self {
            id: ContainerId::new(),
            base,
            strategy,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// 被包裹的基础容器
    pub fn base(&self) -> &Arc<BaseContainer> {
        &self.base
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// 解析并向下转型。空值服务返回 `Ok(None)`。
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        id: &str,
    ) -> Result<Option<Arc<T>>, ContainerError> {
        let service = match self.get(id, OnMissing::Fail)? {
            Lookup::Found(service) => service,
            Lookup::Null => return Ok(None),
            // Fail 模式下未命中已转为 NotFound
            Lookup::Missing => return Err(ContainerError::not_found(id)),
        };

        service
            .downcast::<T>()
            .map(Some)
            .map_err(|_| ContainerError::TypeCastFailed {
                id: id.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    fn exhausted(&self, id: &str, on_missing: OnMissing) -> Result<Lookup, ContainerError> {
        match on_missing {
            OnMissing::ReturnNull => Ok(Lookup::Missing),
            OnMissing::Fail => {
                let suggestions = self.base.suggestions_for(id);
                tracing::debug!(
                    service = id,
                    container = %self.id,
                    suggestions = suggestions.len(),
                    "Service not found in any container"
                );
                Err(ContainerError::NotFound {
                    id: id.to_string(),
                    suggestions,
                })
            }
        }
    }
}

impl<S: DelegationStrategy> Container for DelegatingContainer<S> {
    fn has(&self, id: &str) -> bool {
        self.has_in(id, &mut Traversal::new())
    }

    fn get(&self, id: &str, on_missing: OnMissing) -> Result<Lookup, ContainerError> {
        self.get_in(id, on_missing, &mut Traversal::new())
    }

    fn has_in(&self, id: &str, traversal: &mut Traversal) -> bool {
        self.strategy.has(self.id, &self.base, id, traversal)
    }

    fn get_in(
        &self,
        id: &str,
        on_missing: OnMissing,
        traversal: &mut Traversal,
    ) -> Result<Lookup, ContainerError> {
        match self
            .strategy
            .get(self.id, &self.base, id, on_missing, traversal)?
        {
            Lookup::Missing => self.exhausted(id, on_missing),
            found => Ok(found),
        }
    }
}

impl DelegatingContainer<DelegationChain> {
    pub fn new(base: Arc<BaseContainer>) -> Self {
        Self::with_strategy(base, DelegationChain::new())
    }

    /// 注册前置容器：在基础容器之前查询，最近注册的最先查询
    pub fn register_prepend_container(&self, container: Arc<dyn Container>) {
        tracing::debug!(container = %self.id, "Registering prepend container");
        self.strategy.register_prepend(container);
    }

    /// 注册后备容器：基础容器未命中后按注册顺序查询
    pub fn register_fallback_container(&self, container: Arc<dyn Container>) {
        tracing::debug!(container = %self.id, "Registering fallback container");
        self.strategy.register_fallback(container);
    }

    pub fn prepend_count(&self) -> usize {
        self.strategy.prepend_count()
    }

    pub fn fallback_count(&self) -> usize {
        self.strategy.fallback_count()
    }
}

impl DelegatingContainer<ParentDelegation> {
    pub fn new(base: Arc<BaseContainer>) -> Self {
        Self::with_strategy(base, ParentDelegation::default())
    }

    pub fn from_config(base: Arc<BaseContainer>, config: &LocatorConfig) -> Self {
        Self::with_strategy(base, ParentDelegation::new(config.delegation.mode))
    }

    /// 设置或替换父容器。
    ///
    /// 两个容器互为父容器会形成 `Arc` 环，用 `clear_parent_container` 打破。
    pub fn set_parent_container(&self, parent: Arc<dyn Container>) {
        tracing::debug!(container = %self.id, "Setting parent container");
        self.strategy.set_parent(parent);
    }

    pub fn clear_parent_container(&self) -> Option<Arc<dyn Container>> {
        self.strategy.clear_parent()
    }

    pub fn has_parent(&self) -> bool {
        self.strategy.has_parent()
    }

    /// 切换模式，从下一次调用开始生效
    pub fn set_mode(&self, mode: Mode) {
        tracing::debug!(container = %self.id, mode = %mode, "Switching delegation mode");
        self.strategy.set_mode(mode);
    }

    pub fn mode(&self) -> Mode {
        self.strategy.mode()
    }
}

impl<S> std::fmt::Debug for DelegatingContainer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatingContainer")
            .field("id", &self.id)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
