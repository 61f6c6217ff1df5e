//! Lifecycle hook bus
//!
//! Plugins register handlers for named lifecycle events; the owner of the bus
//! emits those events with a shared reference to itself.

use std::fmt;

use crate::{Error, Result};

/// Events an item emits over its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    MoveStart,
    MoveEnd,
    Pause,
    Resume,
    Hide,
    Show,
    CreateNode,
    AppendNode,
    RemoveNode,
    Destroy,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 10] = [
        Self::MoveStart,
        Self::MoveEnd,
        Self::Pause,
        Self::Resume,
        Self::Hide,
        Self::Show,
        Self::CreateNode,
        Self::AppendNode,
        Self::RemoveNode,
        Self::Destroy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveStart => "moveStart",
            Self::MoveEnd => "moveEnd",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Hide => "hide",
            Self::Show => "show",
            Self::CreateNode => "createNode",
            Self::AppendNode => "appendNode",
            Self::RemoveNode => "removeNode",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Handler<I> = Box<dyn FnMut(LifecycleEvent, &I)>;

/// A set of lifecycle handlers, optionally named
pub struct DanmakuPlugin<I> {
    name: Option<String>,
    handlers: Vec<(LifecycleEvent, Handler<I>)>,
}

impl<I> Default for DanmakuPlugin<I> {
    fn default() -> Self {
        Self {
            name: None,
            handlers: Vec::new(),
        }
    }
}

impl<I> fmt::Debug for DanmakuPlugin<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DanmakuPlugin")
            .field("name", &self.name)
            .field(
                "events",
                &self.handlers.iter().map(|(e, _)| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<I> DanmakuPlugin<I> {
    /// Unnamed plugin; a name is generated when it is registered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Register `handler` for `event`
    pub fn on<F>(mut self, event: LifecycleEvent, mut handler: F) -> Self
    where
        F: FnMut(&I) + 'static,
        I: 'static,
    {
        self.handlers
            .push((event, Box::new(move |_, item: &I| handler(item))));
        self
    }

    /// Register one handler for every event
    pub fn on_any<F>(mut self, handler: F) -> Self
    where
        F: FnMut(LifecycleEvent, &I) + Clone + 'static,
    {
        for event in LifecycleEvent::ALL {
            self.handlers.push((event, Box::new(handler.clone())));
        }
        self
    }
}

struct Registered<I> {
    name: String,
    handlers: Vec<(LifecycleEvent, Handler<I>)>,
}

/// Publish/subscribe bus keyed by plugin name
pub struct LifecycleHookBus<I> {
    plugins: Vec<Registered<I>>,
}

impl<I> Default for LifecycleHookBus<I> {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }
}

impl<I> fmt::Debug for LifecycleHookBus<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHookBus")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

impl<I> LifecycleHookBus<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin that already carries a name
    pub fn use_refine(&mut self, plugin: DanmakuPlugin<I>) -> Result<()> {
        let name = plugin
            .name
            .ok_or_else(|| Error::Other("plugin registered without a name".to_string()))?;
        if self.contains(&name) {
            return Err(Error::DuplicatePlugin(name));
        }
        self.plugins.push(Registered {
            name,
            handlers: plugin.handlers,
        });
        Ok(())
    }

    /// Detach a plugin; returns whether it was registered
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|p| p.name != name);
        self.plugins.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Call every handler registered for `event`, in registration order
    pub fn emit(&mut self, event: LifecycleEvent, item: &I) {
        for plugin in &mut self.plugins {
            for (e, handler) in &mut plugin.handlers {
                if *e == event {
                    handler(event, item);
                }
            }
        }
    }
}
