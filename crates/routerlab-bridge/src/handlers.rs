//! Registry of handlers the host may call into.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use routerlab_core::prelude::*;

/// A function the host process may invoke by name.
///
/// Implemented for any `Fn(Vec<Value>) -> impl Future<Output = Result<Value>>`
/// closure, so handlers are usually registered inline:
///
/// ```ignore
/// bridge.expose("get_scan_interval", |_args| async { Ok(serde_json::json!(30)) });
/// ```
pub trait ExposedHandler: Send + Sync {
    fn invoke(&self, args: Vec<Value>) -> BoxFuture<'static, Result<Value>>;
}

impl<F, Fut> ExposedHandler for F
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    fn invoke(&self, args: Vec<Value>) -> BoxFuture<'static, Result<Value>> {
        (self)(args).boxed()
    }
}

/// Shared name → handler map.
///
/// Cloning shares the same map, so a handler exposed through any clone is
/// visible to the dispatcher immediately.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HashMap<String, Arc<dyn ExposedHandler>>>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous one.
    ///
    /// Returns `true` if an earlier handler was replaced.
    pub fn insert<F, Fut>(&self, name: impl Into<String>, handler: F) -> bool
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let handler: Arc<dyn ExposedHandler> = Arc::new(handler);
        let mut guard = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(name.into(), handler).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExposedHandler>> {
        let guard = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        guard.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let guard = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        guard.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let guard = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run the handler registered under `name`.
    ///
    /// An unregistered name is an error the host sees in its reply; it is
    /// how a call that raced ahead of `expose` is dropped.
    pub async fn dispatch(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let Some(handler) = self.get(name) else {
            debug!("Host called unregistered handler '{}', dropping", name);
            return Err(Error::protocol(format!("no handler exposed as '{name}'")));
        };
        handler.invoke(args).await
    }
}
