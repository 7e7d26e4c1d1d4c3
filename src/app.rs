use crate::clock::Clock;
use crate::domain::{
    SessionLogEntry, Settings, Task, TaskUpdate, TimerMode, TimerPhase, TimerState, UiMode, UiState,
};
use crate::notifications::Notifier;
use crate::persistence::{Store, StoreKey};
use crate::ticker::PollScheduler;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of fields in the task form (title, description, estimate)
const TASK_FORM_FIELDS: usize = 3;

/// Number of rows in the settings form
pub const SETTINGS_FORM_FIELDS: usize = 5;

/// Input form state for adding or editing a task
#[derive(Debug, Clone, Default)]
pub struct TaskFormState {
    pub title: String,
    pub description: String,
    pub estimate: String,
    pub editing_field: usize, // 0 = title, 1 = description, 2 = estimate
    /// Task being edited; None when adding
    pub editing_id: Option<Uuid>,
}

/// Draft settings being edited in the settings modal
#[derive(Debug, Clone)]
pub struct SettingsFormState {
    pub draft: Settings,
    pub selected_field: usize,
}

impl SettingsFormState {
    fn new(settings: &Settings) -> Self {
        Self {
            draft: settings.clone(),
            selected_field: 0,
        }
    }

    /// Step the selected numeric field by `delta`; toggles sound on its row
    pub fn adjust(&mut self, delta: i32) {
        let field = match self.selected_field {
            0 => &mut self.draft.work_minutes,
            1 => &mut self.draft.short_break_minutes,
            2 => &mut self.draft.long_break_minutes,
            3 => &mut self.draft.long_break_every,
            _ => {
                self.draft.sound = !self.draft.sound;
                return;
            }
        };
        *field = field.saturating_add_signed(delta);
    }
}

/// Main application state.
///
/// Owns every slice of persisted state and is the only place it is mutated.
/// Each command saves the slices it touched before returning.
pub struct AppState {
    tasks: Vec<Task>,
    /// Newest first
    sessions: Vec<SessionLogEntry>,
    settings: Settings,
    timer: TimerState,
    ui: UiState,

    pub selected_index: usize,
    pub task_form: Option<TaskFormState>,
    pub settings_form: Option<SettingsFormState>,

    store: Store,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    poll: PollScheduler,
}

impl AppState {
    /// Load every slice from `store`, falling back to defaults per slice
    pub fn new(store: Store, clock: Box<dyn Clock>, notifier: Box<dyn Notifier>) -> Self {
        let tasks = store.load(StoreKey::Tasks, Vec::new());
        let sessions = store.load(StoreKey::Sessions, Vec::new());
        let settings = store.load(StoreKey::Settings, Settings::default()).clamped();
        let mut timer = store.load(StoreKey::Timer, TimerState::default());
        let repaired = timer.repair();
        let ui: UiState = store.load(StoreKey::Ui, UiState::default());

        let settings_form = ui.show_settings.then(|| SettingsFormState::new(&settings));

        let mut app = Self {
            tasks,
            sessions,
            settings,
            timer,
            ui,
            selected_index: 0,
            task_form: None,
            settings_form,
            store,
            clock,
            notifier,
            poll: PollScheduler::default(),
        };

        info!(
            tasks = app.tasks.len(),
            sessions = app.sessions.len(),
            running = app.timer.is_running,
            paused = app.timer.is_paused,
            "state loaded"
        );
        if repaired {
            warn!(remaining = app.timer.remaining, "saved timer had no deadline, loaded as paused");
            app.persist(StoreKey::Timer);
        }
        app.sync_poll();
        app
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn sessions(&self) -> &[SessionLogEntry] {
        &self.sessions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase(&self.ui)
    }

    /// Task the timer is bound to, if it still exists
    pub fn current_task(&self) -> Option<&Task> {
        let id = self.timer.current_task_id?;
        self.find_task(id)
    }

    pub fn find_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected_index)
    }

    /// Which surface receives key presses
    pub fn ui_mode(&self) -> UiMode {
        if let Some(form) = &self.task_form {
            if form.editing_id.is_some() {
                UiMode::EditingTask
            } else {
                UiMode::AddingTask
            }
        } else if self.settings_form.is_some() {
            UiMode::Settings
        } else if self.ui.show_end_prompt {
            UiMode::EndPrompt
        } else {
            UiMode::Normal
        }
    }

    // ------------------------------------------------------------------
    // Timer commands
    // ------------------------------------------------------------------

    /// Begin a work interval on a task. No-op while running or for an unknown id.
    pub fn start_for_task(&mut self, task_id: Uuid) {
        if self.timer.is_running {
            debug!(%task_id, "start ignored, timer already running");
            return;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            debug!(%task_id, "start ignored, unknown task");
            return;
        };
        task.mark_in_progress();

        if self.ui.is_awaiting_break_choice() {
            self.ui.take_break_choice();
            self.persist(StoreKey::Ui);
        }

        let now = self.clock.now();
        self.timer.current_task_id = Some(task_id);
        self.timer.begin(TimerMode::Work, now, &self.settings);
        info!(%task_id, remaining = self.timer.remaining, "work started");

        self.persist(StoreKey::Tasks);
        self.persist(StoreKey::Timer);
        self.sync_poll();
    }

    /// Freeze the countdown. The remaining time is brought up to date first.
    pub fn pause(&mut self) {
        self.refresh();
        if self.timer.pause() {
            info!(remaining = self.timer.remaining, "timer paused");
            self.persist(StoreKey::Timer);
            self.sync_poll();
        }
    }

    pub fn resume(&mut self) {
        let now = self.clock.now();
        if self.timer.resume(now) {
            info!(remaining = self.timer.remaining, "timer resumed");
            self.persist(StoreKey::Timer);
            self.sync_poll();
        }
    }

    /// Back to idle. An unfinished work interval is discarded, not logged.
    pub fn reset(&mut self) {
        self.timer.reset();
        if self.ui.is_awaiting_break_choice() {
            self.ui.take_break_choice();
            self.persist(StoreKey::Ui);
        }
        info!("timer reset");
        self.persist(StoreKey::Timer);
        self.sync_poll();
    }

    /// Take the suggested break. Counts toward the long-break cadence.
    pub fn confirm_break(&mut self) {
        if self.phase() != TimerPhase::AwaitingBreakChoice {
            return;
        }
        let intended = self.ui.take_break_choice().unwrap_or(TimerMode::ShortBreak);
        let now = self.clock.now();
        self.timer.cycle_count = self.timer.cycle_count.saturating_add(1);
        self.timer.begin(intended, now, &self.settings);
        info!(mode = intended.to_tag(), cycle = self.timer.cycle_count, "break started");

        self.persist(StoreKey::Ui);
        self.persist(StoreKey::Timer);
        self.sync_poll();
    }

    /// Skip the break. The cycle count is left alone.
    pub fn continue_work(&mut self) {
        if self.phase() != TimerPhase::AwaitingBreakChoice {
            return;
        }
        self.ui.take_break_choice();
        let now = self.clock.now();
        self.timer.begin(TimerMode::Work, now, &self.settings);
        info!(cycle = self.timer.cycle_count, "break skipped, work started");

        self.persist(StoreKey::Ui);
        self.persist(StoreKey::Timer);
        self.sync_poll();
    }

    /// Called by the event loop every tick; recomputes when the poll is due
    pub fn tick(&mut self) {
        if !self.poll.is_armed() {
            return;
        }
        let now = self.clock.now();
        if self.poll.fire_if_due(now) {
            self.refresh();
        }
    }

    /// The terminal regained focus; time may have passed while suspended
    pub fn on_focus_gained(&mut self) {
        debug!("focus regained");
        self.refresh();
    }

    /// Re-derive remaining time from the deadline and expire if it has passed.
    /// The countdown itself is not saved; `end_time` already determines it.
    fn refresh(&mut self) {
        let now = self.clock.now();
        if self.timer.recompute(now) {
            self.poll.cancel();
            self.expire();
        }
    }

    fn expire(&mut self) {
        let now = self.clock.now();
        let finished = self.timer.mode;
        info!(mode = finished.to_tag(), "interval finished");

        if self.settings.sound {
            self.notifier.session_finished(finished);
        }

        match finished {
            TimerMode::Work => {
                let task_id = self.timer.current_task_id;
                let start = self.timer.last_start.unwrap_or(now);
                self.sessions
                    .insert(0, SessionLogEntry::new(task_id, TimerMode::Work, start, now));

                if let Some(task) = task_id.and_then(|id| self.tasks.iter_mut().find(|t| t.id == id)) {
                    task.record_completed_session();
                }

                let next = self.timer.next_break(&self.settings);
                self.timer.stop();
                self.ui.await_break_choice(next);
                debug!(next = next.to_tag(), "awaiting break choice");

                self.persist(StoreKey::Sessions);
                self.persist(StoreKey::Tasks);
                self.persist(StoreKey::Ui);
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                if finished == TimerMode::LongBreak {
                    self.timer.cycle_count = 0;
                }
                self.timer.begin(TimerMode::Work, now, &self.settings);
            }
        }

        self.persist(StoreKey::Timer);
        self.sync_poll();
    }

    /// Cancel any pending poll, then re-arm only if the countdown is live
    fn sync_poll(&mut self) {
        self.poll.cancel();
        if self.timer.is_ticking() {
            self.poll.arm(self.clock.now());
            debug!(generation = self.poll.generation(), "countdown poll armed");
        }
    }

    // ------------------------------------------------------------------
    // Task commands
    // ------------------------------------------------------------------

    /// Prepend a new pending task. A blank title is ignored.
    pub fn add_task(&mut self, title: &str, description: Option<&str>, estimate: u32) {
        if title.trim().is_empty() {
            return;
        }
        let task = Task::new(title, description, estimate);
        info!(task_id = %task.id, "task added");
        self.tasks.insert(0, task);
        self.persist(StoreKey::Tasks);
    }

    pub fn update_task(&mut self, id: Uuid, update: TaskUpdate) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.apply(update);
            self.persist(StoreKey::Tasks);
        }
    }

    /// Remove a task; the timer is reset if it was bound to it.
    /// Session entries keep their now-dangling reference.
    pub fn delete_task(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        info!(task_id = %id, "task deleted");
        self.persist(StoreKey::Tasks);
        self.clamp_selection();

        if self.timer.current_task_id == Some(id) {
            self.reset();
        }
    }

    // ------------------------------------------------------------------
    // Settings and UI flags
    // ------------------------------------------------------------------

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.clamped();
        info!(settings = ?self.settings, "settings saved");
        self.persist(StoreKey::Settings);
    }

    pub fn set_ui(&mut self, update: impl FnOnce(&mut UiState)) {
        update(&mut self.ui);
        self.persist(StoreKey::Ui);
    }

    fn persist(&self, key: StoreKey) {
        match key {
            StoreKey::Tasks => self.store.save(key, &self.tasks),
            StoreKey::Sessions => self.store.save(key, &self.sessions),
            StoreKey::Settings => self.store.save(key, &self.settings),
            StoreKey::Timer => self.store.save(key, &self.timer),
            StoreKey::Ui => self.store.save(key, &self.ui),
        }
    }

    // ------------------------------------------------------------------
    // View helpers driven by the key handler
    // ------------------------------------------------------------------

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.tasks.len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.tasks.len().saturating_sub(1));
    }

    pub fn start_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.start_for_task(id);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.delete_task(id);
        }
    }

    /// Space bar: pause, resume, or start the selected task when idle
    pub fn toggle_pause(&mut self) {
        match self.phase() {
            TimerPhase::Running => self.pause(),
            TimerPhase::Paused => self.resume(),
            TimerPhase::Idle => self.start_selected(),
            TimerPhase::AwaitingBreakChoice => {}
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.set_ui(|ui| ui.dark_mode = !ui.dark_mode);
    }

    pub fn start_add_task(&mut self) {
        self.task_form = Some(TaskFormState {
            estimate: "1".to_string(),
            ..TaskFormState::default()
        });
    }

    pub fn start_edit_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.task_form = Some(TaskFormState {
                title: task.title.clone(),
                description: task.description.clone().unwrap_or_default(),
                estimate: task.estimate.to_string(),
                editing_field: 0,
                editing_id: Some(task.id),
            });
        }
    }

    pub fn task_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.task_form {
            form.editing_field = (form.editing_field + 1) % TASK_FORM_FIELDS;
        }
    }

    pub fn task_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.task_form {
            match form.editing_field {
                0 => form.title.push(c),
                1 => form.description.push(c),
                _ if c.is_ascii_digit() => form.estimate.push(c),
                _ => {}
            }
        }
    }

    pub fn task_form_backspace(&mut self) {
        if let Some(form) = &mut self.task_form {
            match form.editing_field {
                0 => form.title.pop(),
                1 => form.description.pop(),
                _ => form.estimate.pop(),
            };
        }
    }

    /// Submit the task form. A blank title keeps the form open.
    pub fn submit_task_form(&mut self) {
        let Some(form) = self.task_form.take() else {
            return;
        };
        let title = form.title.trim();
        if title.is_empty() {
            self.task_form = Some(form);
            return;
        }
        let estimate = form.estimate.parse::<u32>().unwrap_or(1).max(1);
        let description = Some(form.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        match form.editing_id {
            Some(id) => self.update_task(
                id,
                TaskUpdate {
                    title: Some(title.to_string()),
                    description: Some(description),
                    estimate: Some(estimate),
                    ..TaskUpdate::default()
                },
            ),
            None => {
                self.add_task(title, description.as_deref(), estimate);
                self.selected_index = 0;
            }
        }
    }

    pub fn cancel_task_form(&mut self) {
        self.task_form = None;
    }

    pub fn open_settings(&mut self) {
        self.settings_form = Some(SettingsFormState::new(&self.settings));
        self.set_ui(|ui| ui.show_settings = true);
    }

    pub fn settings_form_move(&mut self, down: bool) {
        if let Some(form) = &mut self.settings_form {
            form.selected_field = if down {
                (form.selected_field + 1) % SETTINGS_FORM_FIELDS
            } else {
                (form.selected_field + SETTINGS_FORM_FIELDS - 1) % SETTINGS_FORM_FIELDS
            };
        }
    }

    pub fn settings_form_adjust(&mut self, delta: i32) {
        if let Some(form) = &mut self.settings_form {
            form.adjust(delta);
        }
    }

    pub fn settings_form_toggle_sound(&mut self) {
        if let Some(form) = &mut self.settings_form {
            form.draft.sound = !form.draft.sound;
        }
    }

    pub fn save_settings_form(&mut self) {
        if let Some(form) = self.settings_form.take() {
            self.set_settings(form.draft);
        }
        self.set_ui(|ui| ui.show_settings = false);
    }

    pub fn cancel_settings_form(&mut self) {
        self.settings_form = None;
        self.set_ui(|ui| ui.show_settings = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::TaskStatus;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        fired: Rc<RefCell<Vec<TimerMode>>>,
    }

    impl Notifier for RecordingNotifier {
        fn session_finished(&self, mode: TimerMode) {
            self.fired.borrow_mut().push(mode);
        }
    }

    struct Harness {
        app: AppState,
        clock: ManualClock,
        fired: Rc<RefCell<Vec<TimerMode>>>,
        dir: TempDir,
    }

    impl Harness {
        fn advance(&self, by: Duration) {
            self.clock.advance(by);
        }

        /// Reload from the same directory, as after a process restart
        fn reopen(&self) -> AppState {
            AppState::new(
                Store::new(self.dir.path()),
                Box::new(self.clock.clone()),
                Box::new(RecordingNotifier::default()),
            )
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(0).unwrap()
    }

    fn create_test_app() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(t0());
        let notifier = RecordingNotifier::default();
        let fired = notifier.fired.clone();
        let app = AppState::new(
            Store::new(dir.path()),
            Box::new(clock.clone()),
            Box::new(notifier),
        );
        Harness { app, clock, fired, dir }
    }

    fn app_with_task(estimate: u32) -> (Harness, Uuid) {
        let mut h = create_test_app();
        h.app.add_task("Write report", None, estimate);
        let id = h.app.tasks()[0].id;
        (h, id)
    }

    /// Run a started work interval to its deadline
    fn finish_interval(h: &mut Harness) {
        let secs = h.app.timer().remaining;
        h.app.tick();
        h.advance(Duration::seconds(i64::from(secs)));
        h.app.tick();
    }

    #[test]
    fn test_app_state_new_defaults() {
        let h = create_test_app();
        assert!(h.app.tasks().is_empty());
        assert!(h.app.sessions().is_empty());
        assert_eq!(h.app.settings(), &Settings::default());
        assert_eq!(h.app.timer(), &TimerState::default());
        assert_eq!(h.app.phase(), TimerPhase::Idle);
        assert_eq!(h.app.ui_mode(), UiMode::Normal);
    }

    #[test]
    fn test_start_for_task() {
        let (mut h, id) = app_with_task(2);
        h.app.timer.cycle_count = 2;

        h.app.start_for_task(id);

        let timer = h.app.timer();
        assert_eq!(timer.mode, TimerMode::Work);
        assert_eq!(timer.phase(h.app.ui()), TimerPhase::Running);
        assert_eq!(timer.end_time, Some(t0() + Duration::seconds(1500)));
        assert_eq!(timer.remaining, 1500);
        assert_eq!(timer.current_task_id, Some(id));
        assert_eq!(timer.cycle_count, 2);
        assert_eq!(h.app.tasks()[0].status, TaskStatus::InProgress);
    }

    #[test]
    fn test_start_unknown_task_is_noop() {
        let mut h = create_test_app();
        h.app.start_for_task(Uuid::new_v4());
        assert_eq!(h.app.timer(), &TimerState::default());
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (mut h, first) = app_with_task(1);
        h.app.add_task("Other", None, 1);
        let other = h.app.tasks()[0].id;

        h.app.start_for_task(first);
        h.advance(Duration::seconds(10));
        h.app.start_for_task(other);

        assert_eq!(h.app.timer().current_task_id, Some(first));
        assert_eq!(h.app.timer().last_start, Some(t0()));
        assert_eq!(h.app.find_task(other).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_work_expiry_logs_one_session_for_any_duration() {
        for minutes in [1, 25, 50] {
            let (mut h, id) = app_with_task(10);
            h.app.set_settings(Settings {
                work_minutes: minutes,
                ..Settings::default()
            });

            h.app.start_for_task(id);
            finish_interval(&mut h);

            assert_eq!(h.app.timer().remaining, 0);
            assert_eq!(h.app.sessions().len(), 1);
            let entry = &h.app.sessions()[0];
            assert_eq!(entry.kind, TimerMode::Work);
            assert_eq!(entry.duration(), Duration::minutes(i64::from(minutes)));
        }
    }

    #[test]
    fn test_example_scenario() {
        let (mut h, id) = app_with_task(4);
        h.app.set_settings(Settings {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_every: 4,
            ..Settings::default()
        });

        h.app.start_for_task(id);
        assert_eq!(h.app.timer().end_time, Some(t0() + Duration::seconds(1500)));

        finish_interval(&mut h);

        let entry = &h.app.sessions()[0];
        assert_eq!(entry.task_id, Some(id));
        assert_eq!(entry.start, t0());
        assert_eq!(entry.end, t0() + Duration::seconds(1500));
        assert_eq!(h.app.tasks()[0].completed_sessions, 1);
        assert_eq!(h.app.phase(), TimerPhase::AwaitingBreakChoice);
        assert_eq!(h.app.ui().intended_next_mode, Some(TimerMode::ShortBreak));
        assert_eq!(h.app.ui_mode(), UiMode::EndPrompt);
        assert_eq!(*h.fired.borrow(), vec![TimerMode::Work]);
    }

    #[test]
    fn test_poll_does_not_expire_early() {
        let (mut h, id) = app_with_task(1);
        h.app.start_for_task(id);

        h.app.tick();
        h.advance(Duration::seconds(1000));
        h.app.tick();

        assert_eq!(h.app.timer().remaining, 500);
        assert!(h.app.sessions().is_empty());
        assert_eq!(h.app.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_expiry_is_idempotent() {
        let (mut h, id) = app_with_task(5);
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.advance(Duration::seconds(5));
        h.app.tick();
        h.app.on_focus_gained();
        h.app.on_focus_gained();

        assert_eq!(h.app.sessions().len(), 1);
        assert_eq!(h.app.tasks()[0].completed_sessions, 1);
        assert_eq!(h.fired.borrow().len(), 1);
        assert!(!h.app.poll.is_armed());
    }

    #[test]
    fn test_task_completes_when_estimate_reached() {
        let (mut h, id) = app_with_task(2);

        h.app.start_for_task(id);
        finish_interval(&mut h);
        assert_eq!(h.app.tasks()[0].status, TaskStatus::InProgress);

        h.app.continue_work();
        finish_interval(&mut h);
        assert_eq!(h.app.tasks()[0].completed_sessions, 2);
        assert_eq!(h.app.tasks()[0].status, TaskStatus::Completed);
        assert_eq!(h.app.sessions().len(), 2);
        // Newest first
        assert!(h.app.sessions()[0].end > h.app.sessions()[1].end);
    }

    #[test]
    fn test_pause_resume_preserves_remaining() {
        let (mut h, id) = app_with_task(1);
        h.app.start_for_task(id);
        h.app.tick();
        h.advance(Duration::seconds(420));
        h.app.tick();
        let before_pause = h.app.timer().remaining;

        h.app.pause();
        assert_eq!(h.app.phase(), TimerPhase::Paused);
        assert!(!h.app.poll.is_armed());

        // Time passing while paused must not count
        h.advance(Duration::hours(1));
        h.app.tick();
        h.app.on_focus_gained();
        assert_eq!(h.app.timer().remaining, before_pause);

        h.app.resume();
        assert_eq!(h.app.timer().remaining, before_pause);
        h.app.tick();
        assert_eq!(h.app.timer().remaining, before_pause);
        assert_eq!(
            h.app.timer().end_time,
            Some(h.clock.now() + Duration::seconds(i64::from(before_pause)))
        );
    }

    #[test]
    fn test_focus_regain_accounts_for_background_time() {
        let (mut h, id) = app_with_task(1);
        h.app.start_for_task(id);
        h.app.tick();
        h.advance(Duration::seconds(100));
        h.app.tick();
        let previous = h.app.timer().remaining;

        // Suspended for B seconds with no ticks at all
        h.advance(Duration::seconds(300));
        h.app.on_focus_gained();

        assert_eq!(h.app.timer().remaining, previous - 300);
    }

    #[test]
    fn test_focus_regain_after_deadline_expires() {
        let (mut h, id) = app_with_task(3);
        h.app.start_for_task(id);
        h.advance(Duration::hours(2));
        h.app.on_focus_gained();

        assert_eq!(h.app.timer().remaining, 0);
        assert_eq!(h.app.sessions().len(), 1);
        assert_eq!(h.app.phase(), TimerPhase::AwaitingBreakChoice);
    }

    #[test]
    fn test_confirm_break_picks_long_on_cadence() {
        let (mut h, id) = app_with_task(10);
        h.app.timer.cycle_count = 3;
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.app.confirm_break();
        assert_eq!(h.app.timer().mode, TimerMode::LongBreak);
        assert_eq!(h.app.timer().cycle_count, 4);
        assert_eq!(h.app.timer().remaining, 15 * 60);
        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert!(!h.app.ui().show_end_prompt);
    }

    #[test]
    fn test_confirm_break_picks_short_off_cadence() {
        let (mut h, id) = app_with_task(10);
        h.app.timer.cycle_count = 2;
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.app.confirm_break();
        assert_eq!(h.app.timer().mode, TimerMode::ShortBreak);
        assert_eq!(h.app.timer().cycle_count, 3);
        assert_eq!(h.app.timer().remaining, 5 * 60);
    }

    #[test]
    fn test_long_break_completion_resets_cycle_and_resumes_work() {
        let (mut h, id) = app_with_task(10);
        h.app.timer.cycle_count = 3;
        h.app.start_for_task(id);
        finish_interval(&mut h);
        h.app.confirm_break();

        finish_interval(&mut h);

        assert_eq!(h.app.timer().cycle_count, 0);
        assert_eq!(h.app.timer().mode, TimerMode::Work);
        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert_eq!(h.app.timer().current_task_id, Some(id));
        assert_eq!(h.app.timer().remaining, 1500);
        // Break completions are not logged
        assert_eq!(h.app.sessions().len(), 1);
        assert_eq!(*h.fired.borrow(), vec![TimerMode::Work, TimerMode::LongBreak]);
    }

    #[test]
    fn test_short_break_completion_keeps_cycle() {
        let (mut h, id) = app_with_task(10);
        h.app.start_for_task(id);
        finish_interval(&mut h);
        h.app.confirm_break();
        assert_eq!(h.app.timer().cycle_count, 1);

        finish_interval(&mut h);

        assert_eq!(h.app.timer().cycle_count, 1);
        assert_eq!(h.app.timer().mode, TimerMode::Work);
        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert!(!h.app.ui().show_end_prompt);
    }

    #[test]
    fn test_continue_work_does_not_advance_cycle() {
        let (mut h, id) = app_with_task(10);
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.app.continue_work();

        assert_eq!(h.app.timer().cycle_count, 0);
        assert_eq!(h.app.timer().mode, TimerMode::Work);
        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert_eq!(h.app.ui().intended_next_mode, None);
    }

    #[test]
    fn test_break_choice_commands_need_prompt() {
        let (mut h, id) = app_with_task(10);
        h.app.confirm_break();
        h.app.continue_work();
        assert_eq!(h.app.timer(), &TimerState::default());

        h.app.start_for_task(id);
        h.app.confirm_break();
        assert_eq!(h.app.timer().mode, TimerMode::Work);
        assert_eq!(h.app.timer().cycle_count, 0);
    }

    #[test]
    fn test_reset_discards_interval() {
        let (mut h, id) = app_with_task(1);
        h.app.timer.cycle_count = 2;
        h.app.start_for_task(id);
        h.advance(Duration::seconds(1499));
        h.app.reset();

        assert_eq!(h.app.timer(), &TimerState::default());
        assert!(!h.app.poll.is_armed());

        // A stale poll must not fire after reset
        h.advance(Duration::seconds(10));
        h.app.tick();
        assert!(h.app.sessions().is_empty());
        assert!(h.fired.borrow().is_empty());
    }

    #[test]
    fn test_reset_dismisses_end_prompt() {
        let (mut h, id) = app_with_task(5);
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.app.reset();
        assert_eq!(h.app.phase(), TimerPhase::Idle);
        assert!(!h.app.ui().show_end_prompt);
    }

    #[test]
    fn test_start_from_prompt_dismisses_it() {
        let (mut h, id) = app_with_task(5);
        h.app.timer.cycle_count = 1;
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.app.start_for_task(id);
        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert_eq!(h.app.timer().cycle_count, 1);
        assert!(!h.app.ui().show_end_prompt);
    }

    #[test]
    fn test_delete_running_task_resets_timer() {
        let (mut h, id) = app_with_task(3);
        h.app.start_for_task(id);

        h.app.delete_task(id);

        assert!(h.app.tasks().is_empty());
        assert_eq!(h.app.phase(), TimerPhase::Idle);
        assert_eq!(h.app.timer().current_task_id, None);
        assert!(!h.app.poll.is_armed());
    }

    #[test]
    fn test_delete_other_task_keeps_timer() {
        let (mut h, id) = app_with_task(3);
        h.app.add_task("Other", None, 1);
        let other = h.app.tasks()[0].id;
        h.app.start_for_task(id);

        h.app.delete_task(other);

        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert_eq!(h.app.timer().current_task_id, Some(id));
    }

    #[test]
    fn test_deleted_task_leaves_session_reference() {
        let (mut h, id) = app_with_task(3);
        h.app.start_for_task(id);
        finish_interval(&mut h);

        h.app.delete_task(id);
        assert_eq!(h.app.sessions()[0].task_id, Some(id));
        assert!(h.app.find_task(id).is_none());
    }

    #[test]
    fn test_sound_off_skips_notification() {
        let (mut h, id) = app_with_task(3);
        h.app.set_settings(Settings {
            sound: false,
            ..Settings::default()
        });
        h.app.start_for_task(id);
        finish_interval(&mut h);

        assert!(h.fired.borrow().is_empty());
        assert_eq!(h.app.sessions().len(), 1);
    }

    #[test]
    fn test_add_task() {
        let mut h = create_test_app();
        h.app.add_task("First", None, 0);
        h.app.add_task("Second", Some("details"), 3);
        h.app.add_task("   ", None, 1);

        assert_eq!(h.app.tasks().len(), 2);
        assert_eq!(h.app.tasks()[0].title, "Second");
        assert_eq!(h.app.tasks()[0].description.as_deref(), Some("details"));
        assert_eq!(h.app.tasks()[1].estimate, 1);
    }

    #[test]
    fn test_update_task() {
        let (mut h, id) = app_with_task(1);
        h.app.update_task(
            id,
            TaskUpdate {
                title: Some("Renamed".to_string()),
                estimate: Some(6),
                ..TaskUpdate::default()
            },
        );
        assert_eq!(h.app.tasks()[0].title, "Renamed");
        assert_eq!(h.app.tasks()[0].estimate, 6);

        // Unknown id does nothing
        h.app.update_task(Uuid::new_v4(), TaskUpdate::default());
        assert_eq!(h.app.tasks().len(), 1);
    }

    #[test]
    fn test_set_settings_clamps() {
        let mut h = create_test_app();
        h.app.set_settings(Settings {
            work_minutes: 0,
            short_break_minutes: 0,
            long_break_minutes: 0,
            long_break_every: 0,
            sound: true,
        });
        assert_eq!(h.app.settings().work_minutes, 1);
        assert_eq!(h.app.settings().long_break_every, 1);
    }

    #[test]
    fn test_state_survives_restart_mid_interval() {
        let (mut h, id) = app_with_task(2);
        h.app.start_for_task(id);
        h.app.tick();
        h.advance(Duration::seconds(60));
        h.app.tick();
        assert_eq!(h.app.timer().remaining, 1440);

        h.advance(Duration::seconds(30));
        let mut restored = h.reopen();
        assert_eq!(restored.tasks(), h.app.tasks());
        assert_eq!(restored.timer().end_time, h.app.timer().end_time);

        restored.tick();
        let expected = restored.timer().remaining_at(h.clock.now());
        assert_eq!(restored.timer().remaining, expected);
        assert!(restored.timer().remaining.abs_diff(1410) <= 1);
        assert_eq!(restored.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_restart_after_deadline_expires_on_first_tick() {
        let (mut h, id) = app_with_task(2);
        h.app.start_for_task(id);
        h.advance(Duration::hours(1));

        let mut restored = h.reopen();
        restored.tick();

        assert_eq!(restored.sessions().len(), 1);
        assert_eq!(restored.phase(), TimerPhase::AwaitingBreakChoice);
        assert_eq!(restored.tasks()[0].completed_sessions, 1);
    }

    #[test]
    fn test_paused_state_survives_restart() {
        let (mut h, id) = app_with_task(2);
        h.app.start_for_task(id);
        h.app.tick();
        h.advance(Duration::seconds(200));
        h.app.tick();
        h.app.pause();

        h.advance(Duration::hours(5));
        let mut restored = h.reopen();
        restored.tick();

        assert_eq!(restored.phase(), TimerPhase::Paused);
        assert_eq!(restored.timer().remaining, 1300);
    }

    #[test]
    fn test_corrupt_timer_file_falls_back_to_idle() {
        let (h, _id) = app_with_task(2);
        std::fs::write(h.dir.path().join(StoreKey::Timer.file_name()), "garbage").unwrap();

        let restored = h.reopen();
        assert_eq!(restored.timer(), &TimerState::default());
        assert_eq!(restored.tasks().len(), 1);
    }

    #[test]
    fn test_toggle_pause_cycles_phases() {
        let (mut h, _id) = app_with_task(2);
        h.app.toggle_pause();
        assert_eq!(h.app.phase(), TimerPhase::Running);
        h.app.toggle_pause();
        assert_eq!(h.app.phase(), TimerPhase::Paused);
        h.app.toggle_pause();
        assert_eq!(h.app.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_task_form_add_and_edit() {
        let mut h = create_test_app();

        h.app.start_add_task();
        assert_eq!(h.app.ui_mode(), UiMode::AddingTask);
        for c in "Plan sprint".chars() {
            h.app.task_form_add_char(c);
        }
        h.app.task_form_toggle_field();
        h.app.task_form_toggle_field();
        h.app.task_form_backspace();
        h.app.task_form_add_char('x');
        h.app.task_form_add_char('3');
        h.app.submit_task_form();

        assert!(h.app.task_form.is_none());
        assert_eq!(h.app.tasks()[0].title, "Plan sprint");
        assert_eq!(h.app.tasks()[0].estimate, 3);

        h.app.start_edit_task();
        assert_eq!(h.app.ui_mode(), UiMode::EditingTask);
        h.app.task_form_toggle_field();
        for c in "with team".chars() {
            h.app.task_form_add_char(c);
        }
        h.app.submit_task_form();

        assert_eq!(h.app.tasks().len(), 1);
        assert_eq!(h.app.tasks()[0].description.as_deref(), Some("with team"));
    }

    #[test]
    fn test_task_form_blank_title_stays_open() {
        let mut h = create_test_app();
        h.app.start_add_task();
        h.app.submit_task_form();
        assert!(h.app.task_form.is_some());
        assert!(h.app.tasks().is_empty());
    }

    #[test]
    fn test_settings_form_saves_clamped() {
        let mut h = create_test_app();
        h.app.open_settings();
        assert_eq!(h.app.ui_mode(), UiMode::Settings);
        assert!(h.app.ui().show_settings);

        h.app.settings_form_move(true);
        h.app.settings_form_adjust(-10);
        h.app.settings_form_move(false);
        h.app.settings_form_adjust(5);
        h.app.settings_form_move(false);
        h.app.settings_form_adjust(1);
        h.app.save_settings_form();

        assert_eq!(h.app.settings().work_minutes, 30);
        assert_eq!(h.app.settings().short_break_minutes, 1);
        assert!(!h.app.settings().sound);
        assert!(!h.app.ui().show_settings);
        assert_eq!(h.app.ui_mode(), UiMode::Normal);
    }

    #[test]
    fn test_dark_mode_is_persisted() {
        let mut h = create_test_app();
        h.app.toggle_dark_mode();
        assert!(h.reopen().ui().dark_mode);
    }

    #[test]
    fn test_oversized_saved_settings_are_capped() {
        let h = create_test_app();
        std::fs::write(
            h.dir.path().join(StoreKey::Settings.file_name()),
            r#"{"workMinutes": 100000000}"#,
        )
        .unwrap();

        let mut restored = h.reopen();
        assert_eq!(restored.settings().work_minutes, 1440);
        restored.add_task("Deep work", None, 1);
        let id = restored.tasks()[0].id;
        restored.start_for_task(id);

        assert_eq!(restored.timer().remaining, 86_400);
        assert_eq!(restored.timer().end_time, Some(t0() + Duration::days(1)));
    }

    #[test]
    fn test_counters_at_limit_do_not_overflow() {
        let (mut h, id) = app_with_task(3);
        h.app.tasks[0].completed_sessions = u32::MAX;
        h.app.timer.cycle_count = u32::MAX;
        h.app.start_for_task(id);
        finish_interval(&mut h);

        assert_eq!(h.app.sessions().len(), 1);
        assert_eq!(h.app.tasks()[0].completed_sessions, u32::MAX);
        assert_eq!(h.app.phase(), TimerPhase::AwaitingBreakChoice);
        assert_eq!(h.app.ui().intended_next_mode, Some(TimerMode::LongBreak));

        h.app.confirm_break();
        assert_eq!(h.app.timer().cycle_count, u32::MAX);
        assert_eq!(h.app.timer().mode, TimerMode::LongBreak);
    }

    #[test]
    fn test_end_prompt_survives_restart() {
        let (mut h, id) = app_with_task(10);
        h.app.timer.cycle_count = 3;
        h.app.start_for_task(id);
        finish_interval(&mut h);
        assert_eq!(h.app.phase(), TimerPhase::AwaitingBreakChoice);

        let mut restored = h.reopen();
        assert_eq!(restored.phase(), TimerPhase::AwaitingBreakChoice);
        assert_eq!(restored.ui_mode(), UiMode::EndPrompt);

        restored.confirm_break();
        assert_eq!(restored.timer().mode, TimerMode::LongBreak);
        assert_eq!(restored.timer().cycle_count, 4);
        assert_eq!(restored.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_tick_without_armed_poll_does_nothing() {
        let (mut h, id) = app_with_task(2);
        // Running timer that no poll was armed for
        h.app.timer.begin(TimerMode::Work, t0(), &Settings::default());
        h.app.timer.current_task_id = Some(id);
        assert!(!h.app.poll.is_armed());

        h.advance(Duration::hours(1));
        h.app.tick();
        assert_eq!(h.app.phase(), TimerPhase::Running);
        assert!(h.app.sessions().is_empty());

        // Focus regain still recomputes directly
        h.app.on_focus_gained();
        assert_eq!(h.app.sessions().len(), 1);
        assert_eq!(h.app.phase(), TimerPhase::AwaitingBreakChoice);
    }

    #[test]
    fn test_running_timer_without_deadline_loads_paused() {
        let h = create_test_app();
        std::fs::write(
            h.dir.path().join(StoreKey::Timer.file_name()),
            r#"{"mode":"work","isRunning":true,"isPaused":false,"endTime":null,"remaining":300}"#,
        )
        .unwrap();

        let mut restored = h.reopen();
        assert_eq!(restored.phase(), TimerPhase::Paused);
        assert_eq!(restored.timer().remaining, 300);
        // The repair is written back
        assert_eq!(h.reopen().phase(), TimerPhase::Paused);

        restored.resume();
        assert_eq!(restored.phase(), TimerPhase::Running);
        assert_eq!(restored.timer().end_time, Some(t0() + Duration::seconds(300)));

        h.advance(Duration::seconds(300));
        restored.tick();
        assert_eq!(restored.phase(), TimerPhase::AwaitingBreakChoice);
    }

    #[test]
    fn test_countdown_does_not_rewrite_timer_file() {
        let (mut h, id) = app_with_task(2);
        h.app.start_for_task(id);
        h.app.tick();
        h.advance(Duration::seconds(60));
        h.app.tick();
        assert_eq!(h.app.timer().remaining, 1440);

        // Only the start was saved
        let mut restored = h.reopen();
        assert_eq!(restored.timer().remaining, 1500);
        assert_eq!(restored.timer().end_time, h.app.timer().end_time);

        restored.tick();
        assert_eq!(restored.timer().remaining, 1440);
    }

    #[test]
    fn test_pause_saves_up_to_date_remaining() {
        let (mut h, id) = app_with_task(2);
        h.app.start_for_task(id);
        h.app.tick();
        // Pause lands between polls
        h.advance(Duration::seconds(90));
        h.app.pause();

        assert_eq!(h.app.timer().remaining, 1410);
        assert_eq!(h.reopen().timer().remaining, 1410);
    }

}
