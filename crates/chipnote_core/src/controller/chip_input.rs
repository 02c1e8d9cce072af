//! Chip-input controller.
//!
//! # Responsibility
//! - Assemble an ordered, deduplicated token batch from discrete key events.
//! - Own panel visibility, input focus and compact-layout state.
//! - Classify the batch on submit and hand it to a `TaskStore`.
//! - Keep the displayed task list in sync with the store feed.
//!
//! # Invariants
//! - `items` holds trimmed, non-empty, unique tokens in entry order.
//! - Only a successful submit clears `items`.
//! - A failed create leaves `items` and panel state untouched.
//! - At most one create is in flight per controller, and the in-flight
//!   flag never outlives the submit call that raised it.
//! - Token values are never written to logs.

use crate::bus::MessageBus;
use crate::classifier::{classify, partition};
use crate::config::ControllerConfig;
use crate::controller::input::{ItemActivation, Key, KeyOutcome, RecognizedRegions, TaskForm};
use crate::model::category::{Category, ChipColor};
use crate::model::task::Task;
use crate::store::task_store::{StoreError, TaskFeed, TaskStore};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Transient message shown when submitting without any chip.
pub const EMPTY_ITEMS_MESSAGE: &str = "type and press enter to create the tag";

/// Result of one `submit` call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Required form field was blank; panel closed.
    InvalidForm,
    /// No chip to file; transient message shown.
    EmptyItems,
    /// A previous submit has not resolved yet.
    AlreadySubmitting,
    Created(Task),
    /// Store rejected the create; state unchanged so the user can retry.
    Failed(StoreError),
}

/// Render model for one pending chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub value: String,
    pub category: Category,
    pub color: ChipColor,
}

/// Holds `submitting` high for as long as it lives.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct ChipInputController<S: TaskStore> {
    store: S,
    bus: MessageBus,
    config: ControllerConfig,
    regions: RecognizedRegions,
    draft: String,
    items: Vec<String>,
    panel_open: bool,
    compact_layout: bool,
    input_focused: bool,
    submitting: bool,
    loading: bool,
    tasks: Vec<Task>,
    feed: Option<TaskFeed>,
    message: Arc<watch::Sender<String>>,
}

impl<S: TaskStore> ChipInputController<S> {
    pub fn new(store: S, bus: MessageBus, config: ControllerConfig) -> Self {
        let regions = RecognizedRegions::new(config.recognized_regions.iter().cloned());
        let (message, _) = watch::channel(String::new());
        Self {
            store,
            bus,
            config,
            regions,
            draft: String::new(),
            items: Vec::new(),
            panel_open: false,
            compact_layout: false,
            input_focused: false,
            submitting: false,
            loading: true,
            tasks: Vec::new(),
            feed: None,
            message: Arc::new(message),
        }
    }

    /// Applies the initial viewport width and loads the task list.
    pub async fn init(&mut self, viewport_width: u32) {
        self.on_viewport_change(viewport_width);
        self.reload().await;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn compact_layout(&self) -> bool {
        self.compact_layout
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True until the first task list arrives.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last task list received from the store.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current transient message, empty when none is shown.
    pub fn error_message(&self) -> String {
        self.message.borrow().clone()
    }

    /// Watches the transient message, including its auto-clear.
    pub fn subscribe_error_message(&self) -> watch::Receiver<String> {
        self.message.subscribe()
    }

    /// Records the widget's current draft text.
    pub fn on_input(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Handles one key-down inside the text input.
    ///
    /// Enter and comma always return `KeyOutcome::Consumed`, so their
    /// character never lands in the draft.
    pub fn on_key_down(&mut self, key: Key, draft_value: &str) -> KeyOutcome {
        if key.commits_draft() {
            self.commit_draft(draft_value);
            return KeyOutcome::Consumed;
        }

        if key == Key::Backspace && draft_value.is_empty() && self.items.pop().is_some() {
            debug!(
                "event=chip_remove module=controller status=ok item_count={}",
                self.items.len()
            );
        }
        KeyOutcome::PassThrough
    }

    fn commit_draft(&mut self, draft_value: &str) {
        let token = draft_value.trim();
        if token.is_empty() {
            return;
        }

        if self.items.iter().any(|item| item == token) {
            debug!("event=chip_add module=controller status=skipped reason=duplicate");
        } else {
            self.items.push(token.to_string());
            debug!(
                "event=chip_add module=controller status=ok category={} item_count={}",
                classify(token),
                self.items.len()
            );
        }
        self.draft.clear();
    }

    /// Click on the chip bar moves focus into the text input.
    pub fn on_activate(&mut self) {
        self.input_focused = true;
    }

    /// Enter/Space key-up on the chip bar behaves like a click.
    pub fn on_chip_bar_key_up(&mut self, key: Key) -> KeyOutcome {
        if key.activates_chip_bar() {
            self.on_activate();
            KeyOutcome::Consumed
        } else {
            KeyOutcome::PassThrough
        }
    }

    pub fn on_blur(&mut self) {
        self.input_focused = false;
    }

    /// Closes the open panel when an interaction lands outside every
    /// recognized region.
    pub fn on_outside_interaction(&mut self, inside_recognized_region: bool) {
        if self.panel_open && !inside_recognized_region {
            self.panel_open = false;
            debug!("event=panel_dismiss module=controller status=ok reason=outside_click");
        }
    }

    /// Variant of `on_outside_interaction` for callers that know the
    /// container names enclosing the interaction target.
    pub fn on_outside_click<'a>(&mut self, ancestors: impl IntoIterator<Item = &'a str>) {
        let inside = self.regions.encloses(ancestors);
        self.on_outside_interaction(inside);
    }

    pub fn on_viewport_change(&mut self, width: u32) {
        self.compact_layout = width < self.config.compact_breakpoint;
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Hides the panel; pending chips are kept.
    pub fn cancel(&mut self) {
        self.panel_open = false;
    }

    /// Label of the submit button.
    pub fn button_text(&self, form: &TaskForm) -> &'static str {
        if form.input().is_empty() {
            "Ok"
        } else {
            "Add"
        }
    }

    /// Classifies and files the pending chips as one task.
    ///
    /// The in-flight flag is released even when this future is dropped
    /// before the store answers, so a later call starts from a clean state.
    ///
    /// The empty-items path schedules the message auto-clear on the current
    /// tokio runtime; polled outside one, the message is shown but stays
    /// until replaced.
    pub async fn submit(&mut self, form: &mut TaskForm) -> SubmitOutcome {
        if self.submitting {
            warn!("event=task_submit module=controller status=rejected reason=in_flight");
            return SubmitOutcome::AlreadySubmitting;
        }

        if !form.is_valid() {
            self.panel_open = false;
            info!("event=task_submit module=controller status=rejected reason=invalid_form");
            return SubmitOutcome::InvalidForm;
        }

        if self.items.is_empty() {
            warn!(
                "event=task_submit module=controller status=rejected reason=empty_items detail=\"cannot create task: item list empty\""
            );
            self.show_transient_message(EMPTY_ITEMS_MESSAGE);
            return SubmitOutcome::EmptyItems;
        }

        let tokens = partition(&self.items);
        let result = {
            let _in_flight = InFlight::enter(&mut self.submitting);
            self.store.create_task(&tokens).await
        };

        match result {
            Ok(task) => {
                info!(
                    "event=task_submit module=controller status=ok item_count={}",
                    tokens.len()
                );
                form.reset();
                self.panel_open = false;
                self.items.clear();
                self.reload().await;
                SubmitOutcome::Created(task)
            }
            Err(err) => {
                error!(
                    "event=task_submit module=controller status=error error={}",
                    err
                );
                self.bus.send_message(format!("Error creating task: {err}"));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Replaces the displayed list with the store's current snapshot and
    /// keeps the feed for later pushes.
    pub async fn reload(&mut self) {
        match self.store.list_tasks().await {
            Ok(mut feed) => {
                self.tasks = feed.current();
                self.loading = false;
                self.feed = Some(feed);
                info!(
                    "event=task_list module=controller status=ok task_count={}",
                    self.tasks.len()
                );
            }
            Err(err) => {
                error!("event=task_list module=controller status=error error={}", err);
                self.bus.send_message(format!("Error loading tasks: {err}"));
            }
        }
    }

    /// Waits for the next pushed task list and displays it.
    ///
    /// Returns `false` when there is no open feed or the feed closed.
    pub async fn poll_tasks(&mut self) -> bool {
        let Some(feed) = self.feed.as_mut() else {
            return false;
        };

        match feed.changed().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.loading = false;
                true
            }
            Err(err) => {
                warn!("event=task_list module=controller status=closed error={}", err);
                self.feed = None;
                false
            }
        }
    }

    pub fn chip_color(&self, token: &str) -> ChipColor {
        ChipColor::for_category(classify(token))
    }

    /// Pending chips with their category and color.
    pub fn chip_views(&self) -> Vec<ChipView> {
        self.items
            .iter()
            .map(|value| {
                let category = classify(value);
                ChipView {
                    value: value.clone(),
                    category,
                    color: ChipColor::for_category(category),
                }
            })
            .collect()
    }

    /// Resolves the click on an already-submitted chip.
    ///
    /// Plain text has no target; it yields `None` and a diagnostic.
    pub fn activate_item(&self, token: &str) -> Option<ItemActivation> {
        match classify(token) {
            Category::Link => Some(ItemActivation::OpenUrl(token.to_string())),
            Category::PlainText => {
                warn!("event=chip_activate module=controller status=rejected reason=invalid_chip");
                None
            }
            category => Some(ItemActivation::Delegate {
                category,
                value: token.to_string(),
            }),
        }
    }

    /// Shows `message` and clears it after the configured delay unless a
    /// newer message replaced it meanwhile.
    ///
    /// Without a tokio runtime the message is shown but not auto-cleared.
    fn show_transient_message(&self, message: &str) {
        self.message.send_replace(message.to_string());

        let Ok(runtime) = Handle::try_current() else {
            warn!("event=message_clear module=controller status=skipped reason=no_runtime");
            return;
        };
        let sender = Arc::clone(&self.message);
        let expected = message.to_string();
        let delay = self.config.message_clear_delay();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            sender.send_if_modified(|current| {
                if *current == expected {
                    current.clear();
                    true
                } else {
                    false
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{ChipInputController, InFlight, SubmitOutcome, EMPTY_ITEMS_MESSAGE};
    use crate::bus::MessageBus;
    use crate::config::ControllerConfig;
    use crate::controller::input::{Key, TaskForm};
    use crate::store::memory_store::MemoryTaskStore;

    fn controller() -> ChipInputController<MemoryTaskStore> {
        ChipInputController::new(
            MemoryTaskStore::new(),
            MessageBus::new(),
            ControllerConfig::default(),
        )
    }

    #[test]
    fn in_flight_guard_lowers_flag_on_drop() {
        let mut flag = false;
        {
            let _guard = InFlight::enter(&mut flag);
        }
        assert!(!flag);
    }

    #[tokio::test]
    async fn submit_is_refused_while_flag_is_raised() {
        let mut controller = controller();
        controller.on_key_down(Key::Enter, "Alice");
        controller.open_panel();
        controller.submitting = true;
        let mut form = TaskForm::new();
        form.set_input("Some input");

        let outcome = controller.submit(&mut form).await;

        assert!(matches!(outcome, SubmitOutcome::AlreadySubmitting));
        assert_eq!(controller.items(), ["Alice".to_string()]);
        assert!(controller.panel_open());
        assert_eq!(form.input(), "Some input");
        assert!(controller.store().is_empty());
    }

    #[test]
    fn transient_message_without_runtime_is_shown_without_panicking() {
        let controller = controller();

        controller.show_transient_message(EMPTY_ITEMS_MESSAGE);

        assert_eq!(controller.error_message(), EMPTY_ITEMS_MESSAGE);
    }
}
