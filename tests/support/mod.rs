//! 集成测试共用的容器替身

#![allow(dead_code)]

use container_chain::{BaseContainer, Container, ContainerError, Lookup, OnMissing};
use parking_lot::Mutex;
use std::sync::Arc;

/// 多个替身共享的调用日志
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// 记录每次 `has`/`get` 调用的容器
pub struct SpyContainer {
    name: &'static str,
    inner: BaseContainer,
    journal: Journal,
}

impl SpyContainer {
    pub fn new(name: &'static str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            name,
            inner: BaseContainer::new(),
            journal: journal.clone(),
        })
    }

    pub fn with<T: Send + Sync + 'static>(self: Arc<Self>, id: &str, value: T) -> Arc<Self> {
        self.inner.set(id, value);
        self
    }

    /// 本替身被调用过的记录，形如 `has:svc`
    pub fn calls(&self) -> Vec<String> {
        let prefix = format!("{}.", self.name);
        self.journal
            .lock()
            .iter()
            .filter_map(|entry| entry.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    pub fn was_queried(&self) -> bool {
        !self.calls().is_empty()
    }
}

impl Container for SpyContainer {
    fn has(&self, id: &str) -> bool {
        self.journal.lock().push(format!("{}.has:{}", self.name, id));
        self.inner.has(id)
    }

    fn get(&self, id: &str, on_missing: OnMissing) -> Result<Lookup, ContainerError> {
        self.journal.lock().push(format!("{}.get:{}", self.name, id));
        self.inner.get(id, on_missing)
    }
}

/// 声称拥有一切服务，但每次取值都失败
pub struct BrokenContainer;

impl Container for BrokenContainer {
    fn has(&self, _id: &str) -> bool {
        true
    }

    fn get(&self, id: &str, _on_missing: OnMissing) -> Result<Lookup, ContainerError> {
        Err(ContainerError::CreationFailed {
            id: id.to_string(),
            reason: "backend unavailable".to_string(),
        })
    }
}

/// 取出字符串服务
pub fn text(lookup: &Lookup) -> &'static str {
    *lookup
        .downcast::<&'static str>()
        .expect("service should be a &'static str")
}
