//! Lifecycle hooks observed while a fragment request is handled.
//!
//! Listeners attach to a [`HookBoard`] before the server starts handling
//! traffic; dispatch only reads the board, so it can be shared behind an
//! `Arc` across workers.

use std::fmt;

/// A point in the fragment lifecycle that listeners can observe.
///
/// Hooks fire in the order declared here. `End` fires only after a fragment
/// was produced; a lifecycle aborted by a fault never reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    /// Handling has started; nothing has run yet.
    Begin,
    /// Fired immediately before controller initialisation.
    BeforeInit,
    /// Initialisation succeeded; the action is about to be resolved.
    BeforeAction,
    /// The response is ready.
    End,
}

impl LifecycleHook {
    /// Stable lower-case label for logs and listener filtering.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::BeforeInit => "before_init",
            Self::BeforeAction => "before_action",
            Self::End => "end",
        }
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payload handed to hook listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookEvent<'a> {
    /// Which hook fired.
    pub hook: LifecycleHook,
    /// Name of the controller being handled.
    pub controller: &'a str,
}

type HookListener = dyn Fn(&HookEvent<'_>) + Send + Sync;

enum Subscription {
    One(LifecycleHook),
    All,
}

/// Registered lifecycle listeners.
#[derive(Default)]
pub struct HookBoard {
    listeners: Vec<(Subscription, Box<HookListener>)>,
}

impl HookBoard {
    /// A board with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener` to a single hook.
    pub fn subscribe<F>(&mut self, hook: LifecycleHook, listener: F)
    where
        F: Fn(&HookEvent<'_>) + Send + Sync + 'static,
    {
        self.listeners
            .push((Subscription::One(hook), Box::new(listener)));
    }

    /// Attach `listener` to every hook.
    pub fn subscribe_all<F>(&mut self, listener: F)
    where
        F: Fn(&HookEvent<'_>) + Send + Sync + 'static,
    {
        self.listeners.push((Subscription::All, Box::new(listener)));
    }

    /// Notify listeners of `hook` in registration order.
    pub fn notify(&self, hook: LifecycleHook, controller: &str) {
        let event = HookEvent { hook, controller };
        for (subscription, listener) in &self.listeners {
            match subscription {
                Subscription::One(subscribed) if *subscribed != hook => {}
                _ => listener(&event),
            }
        }
    }
}

impl fmt::Debug for HookBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBoard")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
