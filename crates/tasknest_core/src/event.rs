//! Typed application events and in-process publish/subscribe registry.
//!
//! # Responsibility
//! - Define the closed set of application event tags.
//! - Deliver published events to subscribers in subscription order.
//!
//! # Invariants
//! - Event wire names are stable and unique.
//! - Core invariants never depend on the bus; it is transport only.

use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Application-wide event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppEvent {
    UserHasSetup,
    UserNameChanged,
    UserAvatarChanged,
    UserAuthenticated,
    /// Shortcut needs authentication before it can run.
    UserAuthenticationRedirect,
    ShowAddCategory,
    ShowAddTodo,
    ShowSettings,
    DraggedWhileAddingTodo,
    UpdateStatusBar,
    SettingMotionEffectsChanged,
    SettingThemeChanged,
    SettingLocaleChanged,
    SettingAppIconChanged,
    SettingPasscodeSetup,
}

const ALL_EVENTS: &[AppEvent] = &[
    AppEvent::UserHasSetup,
    AppEvent::UserNameChanged,
    AppEvent::UserAvatarChanged,
    AppEvent::UserAuthenticated,
    AppEvent::UserAuthenticationRedirect,
    AppEvent::ShowAddCategory,
    AppEvent::ShowAddTodo,
    AppEvent::ShowSettings,
    AppEvent::DraggedWhileAddingTodo,
    AppEvent::UpdateStatusBar,
    AppEvent::SettingMotionEffectsChanged,
    AppEvent::SettingThemeChanged,
    AppEvent::SettingLocaleChanged,
    AppEvent::SettingAppIconChanged,
    AppEvent::SettingPasscodeSetup,
];

impl AppEvent {
    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserHasSetup => "user-has-setup",
            Self::UserNameChanged => "user-name-changed",
            Self::UserAvatarChanged => "user-avatar-changed",
            Self::UserAuthenticated => "user-authenticated",
            Self::UserAuthenticationRedirect => "user-authentication-redirect",
            Self::ShowAddCategory => "show-add-category",
            Self::ShowAddTodo => "show-add-todo",
            Self::ShowSettings => "show-settings",
            Self::DraggedWhileAddingTodo => "dragged-while-adding-todo",
            Self::UpdateStatusBar => "update-status-bar",
            Self::SettingMotionEffectsChanged => "setting-motion-effects-changed",
            Self::SettingThemeChanged => "setting-theme-changed",
            Self::SettingLocaleChanged => "setting-locale-changed",
            Self::SettingAppIconChanged => "setting-app-icon-changed",
            Self::SettingPasscodeSetup => "setting-passcode-setup",
        }
    }

    pub fn all() -> &'static [AppEvent] {
        ALL_EVENTS
    }
}

impl Display for AppEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown event wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventError(pub String);

impl Display for UnknownEventError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown app event: `{}`", self.0)
    }
}

impl Error for UnknownEventError {}

/// Parses one event from its wire name.
pub fn parse_app_event(value: &str) -> Result<AppEvent, UnknownEventError> {
    let normalized = value.trim();
    ALL_EVENTS
        .iter()
        .copied()
        .find(|event| event.as_str() == normalized)
        .ok_or_else(|| UnknownEventError(normalized.to_string()))
}

/// Handle returned by `EventBus::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type EventHandler = Arc<dyn Fn(AppEvent) + Send + Sync>;

struct Subscription {
    event: AppEvent,
    handler: EventHandler,
}

/// In-process event registry.
#[derive(Default)]
pub struct EventBus {
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`.
    pub fn subscribe<F>(&mut self, event: AppEvent, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                event,
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Removes one subscription. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Removes every subscription for `event`. Returns the removed count.
    pub fn unsubscribe_all(&mut self, event: AppEvent) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|_, subscription| subscription.event != event);
        before - self.subscriptions.len()
    }

    pub fn subscriber_count(&self, event: AppEvent) -> usize {
        self.subscriptions
            .values()
            .filter(|subscription| subscription.event == event)
            .count()
    }

    /// Notifies subscribers of `event`. Returns how many were notified.
    pub fn publish(&self, event: AppEvent) -> usize {
        let handlers: Vec<EventHandler> = self
            .subscriptions
            .values()
            .filter(|subscription| subscription.event == event)
            .map(|subscription| Arc::clone(&subscription.handler))
            .collect();

        for handler in &handlers {
            handler(event);
        }
        debug!(
            "event=bus_publish module=event status=ok name={} notified={}",
            event,
            handlers.len()
        );
        handlers.len()
    }
}
