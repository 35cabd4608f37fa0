//! 委托遍历上下文
//!
//! 记录当前调用链上正在向其他容器委托的容器。每次顶层 `has`/`get` 都会新建
//! 一个 `Traversal` 并沿调用链传递，因此递归深度只存在于调用栈上，
//! 不会在两次调用之间泄漏，也不会被并发调用互相污染。

use std::fmt;

/// 容器实例标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(uuid::Uuid);

impl ContainerId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 遍历上下文
#[derive(Debug, Default)]
pub struct Traversal {
    delegating: Vec<ContainerId>,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定容器在当前调用链上的递归深度
    pub fn depth_of(&self, container: ContainerId) -> usize {
        self.delegating.iter().filter(|id| **id == container).count()
    }

    /// 调用链上所有容器的委托总层数
    pub fn depth(&self) -> usize {
        self.delegating.len()
    }

    /// 标记 `container` 正在委托并执行 `f`，无论 `f` 如何返回都会恢复深度
    pub fn enter<R>(&mut self, container: ContainerId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.delegating.push(container);
        let result = f(self);
        self.delegating.pop();
        result
    }
}
