//! 多容器委托链
//!
//! 查询顺序：前置容器（最近注册的最先）→ 基础容器 → 后备容器（按注册顺序），
//! 第一个命中的容器给出结果。链在委托期间会登记到 `Traversal` 上，
//! 互相委托的两条链在重入时只查询自己的基础容器。

use super::delegating::DelegationStrategy;
use super::{BaseContainer, Container, ContainerError, ContainerId, Lookup, OnMissing, Traversal};
use parking_lot::RwLock;
use std::sync::Arc;

/// 前置 / 后备容器列表
#[derive(Default)]
pub struct DelegationChain {
    /// 前置容器，下标 0 为最近注册的
    prepend: RwLock<Vec<Arc<dyn Container>>>,
    /// 后备容器，保持注册顺序
    fallback: RwLock<Vec<Arc<dyn Container>>>,
}

impl DelegationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_prepend(&self, container: Arc<dyn Container>) {
        self.prepend.write().insert(0, container);
    }

    pub fn register_fallback(&self, container: Arc<dyn Container>) {
        self.fallback.write().push(container);
    }

    pub fn prepend_count(&self) -> usize {
        self.prepend.read().len()
    }

    pub fn fallback_count(&self) -> usize {
        self.fallback.read().len()
    }

    // 调用外部容器前先拿快照，不持有锁
    fn prepend_snapshot(&self) -> Vec<Arc<dyn Container>> {
        self.prepend.read().clone()
    }

    fn fallback_snapshot(&self) -> Vec<Arc<dyn Container>> {
        self.fallback.read().clone()
    }
}

/// 在 `containers` 中找第一个声称拥有 `id` 的容器并向它取值。
///
/// 一旦某个容器的 `has` 返回 true，它的 `get` 结果（包括错误）就是最终结果，
/// 不会再尝试后面的容器。
fn first_match(
    containers: &[Arc<dyn Container>],
    role: &'static str,
    id: &str,
    traversal: &mut Traversal,
) -> Option<Result<Lookup, ContainerError>> {
    for (position, container) in containers.iter().enumerate() {
        tracing::trace!(service = id, role, position, "Consulting delegate container");
        if container.has_in(id, traversal) {
            tracing::debug!(service = id, role, position, "Delegate container claims service");
            return Some(container.get_in(id, OnMissing::Fail, traversal));
        }
    }
    None
}

/// 链上的容器互相委托时，重入的容器只查自己的基础容器
fn is_reentry(owner: ContainerId, id: &str, traversal: &Traversal) -> bool {
    let reentered = traversal.depth_of(owner) > 0;
    if reentered {
        tracing::debug!(
            service = id,
            container = %owner,
            "Re-entered through delegate chain, answering from local registry"
        );
    }
    reentered
}

impl DelegationStrategy for DelegationChain {
    fn has(
        &self,
        owner: ContainerId,
        base: &BaseContainer,
        id: &str,
        traversal: &mut Traversal,
    ) -> bool {
        if is_reentry(owner, id, traversal) {
            return base.has(id);
        }

        let prepend = self.prepend_snapshot();
        if traversal.enter(owner, |t| prepend.iter().any(|container| container.has_in(id, t))) {
            return true;
        }

        if base.has(id) {
            return true;
        }

        let fallback = self.fallback_snapshot();
        traversal.enter(owner, |t| fallback.iter().any(|container| container.has_in(id, t)))
    }

    fn get(
        &self,
        owner: ContainerId,
        base: &BaseContainer,
        id: &str,
        _on_missing: OnMissing,
        traversal: &mut Traversal,
    ) -> Result<Lookup, ContainerError> {
        if is_reentry(owner, id, traversal) {
            return base.get(id, OnMissing::ReturnNull);
        }

        let prepend = self.prepend_snapshot();
        if let Some(result) =
            traversal.enter(owner, |t| first_match(&prepend, "prepend", id, t))
        {
            return result;
        }

        match base.get(id, OnMissing::ReturnNull)? {
            Lookup::Missing => {}
            found => return Ok(found),
        }

        let fallback = self.fallback_snapshot();
        if let Some(result) =
            traversal.enter(owner, |t| first_match(&fallback, "fallback", id, t))
        {
            return result;
        }

        Ok(Lookup::Missing)
    }
}
