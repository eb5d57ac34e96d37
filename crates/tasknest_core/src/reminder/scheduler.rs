//! Reminder scheduler.
//!
//! # Responsibility
//! - Derive the desired alarm action purely from task fields.
//! - Register or cancel alerts with the alarm facility.
//!
//! # Invariants
//! - Scheduled iff `remind_at` is set and the task is active; the state is
//!   never stored in core.
//! - Re-registration always cancels the previous alert first.
//! - Registration failures are logged and reported to the failure hook; they
//!   never retry and never touch task state.
//! - Log records carry identifiers only, never goals or category names.

use crate::config::ReminderSettings;
use crate::l10n::{Localizer, KEY_TODO_DUE_TITLE};
use crate::model::category::Category;
use crate::model::identifier::Identifiable;
use crate::model::task::Task;
use crate::reminder::alarm::{AlarmFacility, AlarmRequest, RegistrationError, TriggerComponents};
use chrono::{Local, TimeZone};
use log::{debug, info, warn};
use std::sync::Arc;

/// Notification grouping tag for due reminders.
pub const TODO_DUE_CATEGORY: &str = "TODO_DUE";
/// Title template token replaced by the category name.
pub const CATEGORY_NAME_PLACEHOLDER: &str = "@";

/// Desired alarm state for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderPlan {
    /// Replace any alert for the id with this request.
    Register(AlarmRequest),
    /// Remove any alert with this id.
    Cancel(String),
}

impl ReminderPlan {
    pub fn id(&self) -> &str {
        match self {
            Self::Register(request) => request.id.as_str(),
            Self::Cancel(id) => id.as_str(),
        }
    }

    pub fn is_register(&self) -> bool {
        matches!(self, Self::Register(_))
    }
}

/// Observer for rejected registrations.
pub type FailureHook = Arc<dyn Fn(&RegistrationError) + Send + Sync>;

/// Task reminder scheduler over an alarm facility.
pub struct ReminderScheduler<A, Tz = Local>
where
    Tz: TimeZone,
{
    alarms: A,
    time_zone: Tz,
    title_template: String,
    sound: String,
    failure_hook: Option<FailureHook>,
}

impl<A: AlarmFacility> ReminderScheduler<A, Local> {
    /// Scheduler firing in the system local time zone.
    pub fn new(alarms: A, settings: &ReminderSettings, localizer: &dyn Localizer) -> Self {
        Self::with_time_zone(alarms, settings, localizer, Local)
    }
}

impl<A: AlarmFacility, Tz: TimeZone> ReminderScheduler<A, Tz> {
    /// Scheduler firing in `time_zone`.
    ///
    /// The title template is resolved once: the configured template, or the
    /// localized default title.
    pub fn with_time_zone(
        alarms: A,
        settings: &ReminderSettings,
        localizer: &dyn Localizer,
        time_zone: Tz,
    ) -> Self {
        let title_template = settings
            .title_template
            .clone()
            .filter(|template| !template.trim().is_empty())
            .unwrap_or_else(|| localizer.localized_string(KEY_TODO_DUE_TITLE));

        Self {
            alarms,
            time_zone,
            title_template,
            sound: settings.sound.clone(),
            failure_hook: None,
        }
    }

    /// Installs an observer for rejected registrations.
    pub fn on_registration_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RegistrationError) + Send + Sync + 'static,
    {
        self.failure_hook = Some(Arc::new(hook));
        self
    }

    pub fn alarms(&self) -> &A {
        &self.alarms
    }

    pub fn title_template(&self) -> &str {
        &self.title_template
    }

    /// Alert title for tasks of `category`.
    pub fn title_for(&self, category: &Category) -> String {
        self.title_template
            .replace(CATEGORY_NAME_PLACEHOLDER, category.name())
    }

    /// Pure mapping from task fields to the desired alarm action.
    ///
    /// `category` fills the title and must own `task`; any other category
    /// plans a cancel.
    pub fn plan(&self, task: &Task, category: &Category) -> ReminderPlan {
        let id = task.identifier();
        if category.id() != task.category_id() {
            warn!(
                "event=reminder_plan module=reminder status=skip id={} reason=category_mismatch category={}",
                id,
                category.id()
            );
            return ReminderPlan::Cancel(id);
        }

        let Some(remind_at) = task.remind_at().filter(|_| task.is_active()) else {
            return ReminderPlan::Cancel(id);
        };

        let Some(trigger) = TriggerComponents::from_epoch_ms(remind_at, &self.time_zone) else {
            warn!(
                "event=reminder_plan module=reminder status=skip id={} reason=unrepresentable_remind_at remind_at={}",
                id, remind_at
            );
            return ReminderPlan::Cancel(id);
        };

        ReminderPlan::Register(AlarmRequest {
            id,
            trigger,
            title: self.title_for(category),
            body: task.goal().to_string(),
            sound: self.sound.clone(),
            category: TODO_DUE_CATEGORY.to_string(),
            repeats: false,
        })
    }

    /// Applies `plan(task, category)` to the alarm facility.
    pub fn sync(&self, task: &Task, category: &Category) -> ReminderPlan {
        let plan = self.plan(task, category);
        match &plan {
            ReminderPlan::Register(request) => self.register(request.clone()),
            ReminderPlan::Cancel(id) => self.cancel_ids(std::slice::from_ref(id)),
        }
        plan
    }

    /// Cancels any alert for `task`.
    pub fn cancel(&self, task: &Task) {
        self.cancel_ids(&[task.identifier()]);
    }

    /// Cancels alerts by identifier. Unknown ids are a no-op.
    pub fn cancel_ids(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        self.alarms.cancel(ids);
        debug!(
            "event=reminder_cancel module=reminder status=ok count={} ids={}",
            ids.len(),
            ids.join(",")
        );
    }

    fn register(&self, request: AlarmRequest) {
        let id = request.id.clone();
        // The facility keys purely on id: drop the old alert, never mutate it.
        self.alarms.cancel(std::slice::from_ref(&id));

        info!("event=reminder_register module=reminder status=start id={id}");
        let hook = self.failure_hook.clone();
        let callback_id = id;
        self.alarms.register(
            request,
            Box::new(move |result: Result<(), RegistrationError>| match result {
                Ok(()) => {
                    debug!("event=reminder_register module=reminder status=ok id={callback_id}");
                }
                Err(err) => {
                    warn!(
                        "event=reminder_register module=reminder status=error id={} error={}",
                        callback_id, err.reason
                    );
                    if let Some(hook) = hook {
                        hook(&err);
                    }
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{ReminderPlan, ReminderScheduler, TODO_DUE_CATEGORY};
    use crate::config::ReminderSettings;
    use crate::l10n::BundledLocalizer;
    use crate::model::category::Category;
    use crate::model::identifier::Identifiable;
    use crate::model::task::Task;
    use crate::reminder::alarm::{InMemoryAlarmFacility, TriggerComponents};
    use chrono::FixedOffset;
    use std::sync::{Arc, Mutex};

    const REMIND_AT: i64 = 1_700_000_000_000;

    fn scheduler(
        settings: &ReminderSettings,
    ) -> ReminderScheduler<InMemoryAlarmFacility, FixedOffset> {
        ReminderScheduler::with_time_zone(
            InMemoryAlarmFacility::new(),
            settings,
            &BundledLocalizer::new(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn fixture() -> (Category, Task) {
        let category = Category::new("Work", "45AAF2", "briefcase").unwrap();
        let mut task = Task::new(&category, "Send report").unwrap();
        task.set_remind_at(Some(REMIND_AT));
        (category, task)
    }

    #[test]
    fn plan_builds_request_for_eligible_task() {
        let scheduler = scheduler(&ReminderSettings::default());
        let (category, task) = fixture();

        let ReminderPlan::Register(request) = scheduler.plan(&task, &category) else {
            panic!("eligible task should register");
        };
        assert_eq!(request.id, task.identifier());
        assert_eq!(request.title, "Reminder from Work");
        assert_eq!(request.body, "Send report");
        assert_eq!(request.category, TODO_DUE_CATEGORY);
        assert_eq!(request.sound, ReminderSettings::default().sound);
        assert!(!request.repeats);
        assert_eq!(
            request.trigger,
            TriggerComponents {
                minute: 13,
                hour: 22,
                day: 14,
                month: 11,
                year: 2023
            }
        );
    }

    #[test]
    fn configured_template_overrides_localized_title() {
        let settings = ReminderSettings {
            title_template: Some("@: time's up".to_string()),
            ..ReminderSettings::default()
        };
        let scheduler = scheduler(&settings);
        let (category, _) = fixture();
        assert_eq!(scheduler.title_for(&category), "Work: time's up");
    }

    #[test]
    fn plan_cancels_ineligible_tasks() {
        let scheduler = scheduler(&ReminderSettings::default());
        let (category, mut task) = fixture();

        task.set_completed(true);
        assert_eq!(
            scheduler.plan(&task, &category),
            ReminderPlan::Cancel(task.identifier())
        );

        task.set_completed(false);
        task.set_trashed(true);
        assert!(!scheduler.plan(&task, &category).is_register());

        task.set_trashed(false);
        task.set_remind_at(None);
        assert!(!scheduler.plan(&task, &category).is_register());

        task.set_remind_at(Some(i64::MAX));
        assert!(!scheduler.plan(&task, &category).is_register());
    }

    #[test]
    fn foreign_category_never_titles_the_alert() {
        let scheduler = scheduler(&ReminderSettings::default());
        let (_, task) = fixture();
        let home = Category::new("Home", "FC5C65", "progress").unwrap();

        assert_eq!(
            scheduler.sync(&task, &home),
            ReminderPlan::Cancel(task.identifier())
        );
        assert_eq!(scheduler.alarms().register_calls(), 0);
        assert_eq!(scheduler.alarms().pending_count(), 0);
    }

    #[test]
    fn sync_replaces_previous_registration() {
        let scheduler = scheduler(&ReminderSettings::default());
        let (category, mut task) = fixture();

        scheduler.sync(&task, &category);
        task.set_remind_at(Some(REMIND_AT + 3_600_000));
        scheduler.sync(&task, &category);

        let pending = scheduler.alarms().pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, task.identifier());
        assert_eq!(pending[0].trigger.hour, 23);
        assert_eq!(scheduler.alarms().register_calls(), 2);
    }

    #[test]
    fn rejected_registration_reaches_failure_hook() {
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let scheduler = scheduler(&ReminderSettings::default())
            .on_registration_failure(move |err| sink.lock().unwrap().push(err.request_id.clone()));
        scheduler.alarms().reject_registrations("denied");

        let (category, task) = fixture();
        let plan = scheduler.sync(&task, &category);

        assert!(plan.is_register());
        assert_eq!(*failures.lock().unwrap(), vec![task.identifier()]);
        assert_eq!(scheduler.alarms().pending_count(), 0);
    }

    #[test]
    fn cancel_twice_is_harmless() {
        let scheduler = scheduler(&ReminderSettings::default());
        let (category, task) = fixture();

        scheduler.sync(&task, &category);
        scheduler.cancel(&task);
        scheduler.cancel(&task);
        scheduler.cancel_ids(&["/Task/never-registered".to_string()]);
        assert_eq!(scheduler.alarms().pending_count(), 0);
    }
}
