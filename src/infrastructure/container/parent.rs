//! 单父容器委托
//!
//! `ActAsMaster` 模式下，最外层调用先交给父容器回答；如果父容器又把查询转回
//! 本容器（互为父容器的情况），本容器只用自己的注册表作答，不再委托。
//! `StandardCompliant` 模式或未设置父容器时，只查询自己的注册表。

use super::delegating::DelegationStrategy;
use super::{BaseContainer, Container, ContainerError, ContainerId, Lookup, OnMissing, Traversal};
use crate::errors::ConfigError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 委托模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Mode {
    /// 从不查询父容器
    StandardCompliant,
    /// 先查询父容器，带递归保护
    #[default]
    ActAsMaster,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::StandardCompliant => "standard_compliant",
            Mode::ActAsMaster => "act_as_master",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard_compliant" => Ok(Mode::StandardCompliant),
            "act_as_master" => Ok(Mode::ActAsMaster),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 查询路由
enum Route {
    /// 只查本容器
    Local,
    /// 交给父容器
    Parent(Arc<dyn Container>),
}

/// 父容器 + 模式
#[derive(Default)]
pub struct ParentDelegation {
    parent: RwLock<Option<Arc<dyn Container>>>,
    mode: RwLock<Mode>,
}

impl ParentDelegation {
    pub fn new(mode: Mode) -> Self {
        Self {
            parent: RwLock::new(None),
            mode: RwLock::new(mode),
        }
    }

    /// 设置或替换父容器
    pub fn set_parent(&self, parent: Arc<dyn Container>) {
        *self.parent.write() = Some(parent);
    }

    /// 移除父容器，返回之前的父容器
    pub fn clear_parent(&self) -> Option<Arc<dyn Container>> {
        self.parent.write().take()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.read().is_some()
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.write() = mode;
    }

    pub fn mode(&self) -> Mode {
        *self.mode.read()
    }

    // 模式和父容器在调用开始时读取一次，调用过程中的修改只影响下一次调用
    fn route(&self, owner: ContainerId, id: &str, traversal: &Traversal) -> Route {
        let mode = self.mode();
        let parent = self.parent.read().clone();

        match (mode, parent) {
            (Mode::StandardCompliant, _) | (_, None) => Route::Local,
            (Mode::ActAsMaster, Some(parent)) => {
                if traversal.depth_of(owner) == 0 {
                    Route::Parent(parent)
                } else {
                    tracing::debug!(
                        service = id,
                        container = %owner,
                        "Re-entered from parent, answering from local registry"
                    );
                    Route::Local
                }
            }
        }
    }
}

impl DelegationStrategy for ParentDelegation {
    fn has(
        &self,
        owner: ContainerId,
        base: &BaseContainer,
        id: &str,
        traversal: &mut Traversal,
    ) -> bool {
        match self.route(owner, id, traversal) {
            Route::Local => base.has(id),
            Route::Parent(parent) => traversal.enter(owner, |t| parent.has_in(id, t)),
        }
    }

    fn get(
        &self,
        owner: ContainerId,
        base: &BaseContainer,
        id: &str,
        on_missing: OnMissing,
        traversal: &mut Traversal,
    ) -> Result<Lookup, ContainerError> {
        match self.route(owner, id, traversal) {
            Route::Local => base.get(id, OnMissing::ReturnNull),
            Route::Parent(parent) => {
                tracing::debug!(service = id, container = %owner, "Delegating to parent container");
                traversal.enter(owner, |t| parent.get_in(id, on_missing, t))
            }
        }
    }
}
