//! 基础服务容器
//!
//! 以字符串标识注册服务工厂或现成实例，首次解析时创建并缓存（共享实例）。
//! 委托容器包裹的就是它；它本身也实现 `Container`，可以直接挂到别的
//! 委托链上作为前置或后备容器。

use super::suggest::suggest_alternatives;
use super::{Container, ContainerError, Lookup, OnMissing, Service};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 工厂返回的错误类型
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// 服务工厂trait
pub trait ServiceFactory: Send + Sync {
    /// 创建服务实例；`Ok(None)` 表示该服务的值就是空
    fn create(&self, container: &BaseContainer) -> Result<Option<Service>, FactoryError>;

    /// 获取服务类型名称（用于日志）
    fn service_type_name(&self) -> &'static str;
}

/// 函数式服务工厂
struct FnServiceFactory<F, T> {
    factory_fn: F,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<F, T> FnServiceFactory<F, T> {
    fn new(factory_fn: F) -> Self {
        Self {
            factory_fn,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, T> ServiceFactory for FnServiceFactory<F, T>
where
    F: Fn(&BaseContainer) -> Result<Option<T>, FactoryError> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn create(&self, container: &BaseContainer) -> Result<Option<Service>, FactoryError> {
        let service = (self.factory_fn)(container)?;
        Ok(service.map(|s| Arc::new(s) as Service))
    }

    fn service_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// 内部统计信息（原子计数器）
#[derive(Default)]
struct InnerStats {
    total_resolutions: AtomicUsize,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

/// 基础容器
#[derive(Default)]
pub struct BaseContainer {
    /// 服务工厂注册表
    factories: DashMap<String, Arc<dyn ServiceFactory>>,
    /// 已创建的实例；`None` 为空值服务
    instances: DashMap<String, Option<Service>>,
    stats: InnerStats,
}

impl BaseContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册服务工厂；重复注册会替换旧工厂并丢弃已缓存的实例
    pub fn register<T, F>(&self, id: impl Into<String>, factory: F)
    where
        F: Fn(&BaseContainer) -> Result<T, FactoryError> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.register_nullable(id, move |container: &BaseContainer| factory(container).map(Some));
    }

    /// 注册可能产生空值的服务工厂
    pub fn register_nullable<T, F>(&self, id: impl Into<String>, factory: F)
    where
        F: Fn(&BaseContainer) -> Result<Option<T>, FactoryError> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let id = id.into();
        self.instances.remove(&id);
        self.factories
            .insert(id, Arc::new(FnServiceFactory::<F, T>::new(factory)));
    }

    /// 直接放入现成实例
    pub fn set<T: Send + Sync + 'static>(&self, id: impl Into<String>, value: T) {
        self.instances.insert(id.into(), Some(Arc::new(value)));
    }

    /// 放入空值服务
    pub fn set_null(&self, id: impl Into<String>) {
        self.instances.insert(id.into(), None);
    }

    /// 本容器自己注册的全部服务标识（排序、去重）
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .factories
            .iter()
            .map(|entry| entry.key().clone())
            .chain(self.instances.iter().map(|entry| entry.key().clone()))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// 针对 `id` 的候选服务名
    pub fn suggestions_for(&self, id: &str) -> Vec<String> {
        let ids = self.service_ids();
        suggest_alternatives(id, ids.iter().map(String::as_str))
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.stats.total_resolutions.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.stats.cache_misses.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, id: &str) -> Result<Option<Lookup>, ContainerError> {
        self.stats.total_resolutions.fetch_add(1, Ordering::Relaxed);

        if let Some(instance) = self.instances.get(id) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(to_lookup(instance.value().clone())));
        }

        // 先克隆工厂再调用，工厂内部可以继续解析本容器的其他服务
        let factory = match self.factories.get(id) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };

        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            service = id,
            service_type = factory.service_type_name(),
            "Creating service"
        );

        let created = factory
            .create(self)
            .map_err(|e| ContainerError::CreationFailed {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        // 并发创建时保留先写入的实例
        let instance = self
            .instances
            .entry(id.to_string())
            .or_insert(created)
            .value()
            .clone();
        Ok(Some(to_lookup(instance)))
    }
}

fn to_lookup(instance: Option<Service>) -> Lookup {
    match instance {
        Some(service) => Lookup::Found(service),
        None => Lookup::Null,
    }
}

impl Container for BaseContainer {
    fn has(&self, id: &str) -> bool {
        self.factories.contains_key(id) || self.instances.contains_key(id)
    }

    fn get(&self, id: &str, on_missing: OnMissing) -> Result<Lookup, ContainerError> {
        match self.lookup(id)? {
            Some(found) => Ok(found),
            None => match on_missing {
                OnMissing::ReturnNull => Ok(Lookup::Missing),
                OnMissing::Fail => Err(ContainerError::NotFound {
                    id: id.to_string(),
                    suggestions: self.suggestions_for(id),
                }),
            },
        }
    }
}

impl std::fmt::Debug for BaseContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseContainer")
            .field("services", &self.service_ids())
            .finish()
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStats {
    pub total_resolutions: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl ContainerStats {
    /// 获取总解析次数
    pub fn total(&self) -> usize {
        self.total_resolutions
    }

    /// 获取缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total() as f64
        }
    }
}
