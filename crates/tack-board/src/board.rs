//! [`Board`] -- the board state engine facade.
//!
//! The board owns the unfiltered [`ColumnModel`], the active filter, the
//! selection, the drag controller and the quick-action overlay. Gestures
//! come in as method calls; notifications go out through [`BoardListener`]s.
//!
//! Every mutation that reaches the adapter is optimistic: the previous model
//! is kept as a snapshot, the change is applied and announced, and the
//! snapshot is restored (and announced again, with a notice) if the adapter
//! call fails.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use tack_config::{PreferenceStore, Preferences, TackConfig, TaskTimer};
use tack_core::column::{Column, ColumnModel, ColumnSpec};
use tack_core::filter::FilterCriteria;
use tack_core::task::{ColumnId, Task, TaskDraft, TaskId, TaskUpdates};
use tack_core::validation::{validate_draft, validate_task, validate_updates};
use tack_storage::PersistenceAdapter;

use crate::channel::ChannelSink;
use crate::clock::Clock;
use crate::drag::{
    CancelReason, ColumnDragEvent, DragController, DragOutcome, DropOutcome, MoveRequest, TaskDragEvent,
};
use crate::error::{BoardError, Result};
use crate::events::{BoardListener, Notice};
use crate::overlay::{OverlayGeometry, OverlayPosition, QuickAction, QuickActionOverlay, QuickActionValue, Rect, Viewport};
use crate::selection::{Selection, Toggle};

/// Static settings of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardOptions {
    pub project_id: String,
    /// Layout used until the user saves one.
    pub layout: Vec<ColumnSpec>,
    pub done_column: ColumnId,
    pub overlay: OverlayGeometry,
}

impl BoardOptions {
    pub fn from_config(config: &TackConfig) -> Self {
        Self {
            project_id: config.project.clone(),
            layout: config.columns.clone(),
            done_column: config.done_column.clone(),
            overlay: OverlayGeometry::from(&config.overlay),
        }
    }
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self::from_config(&TackConfig::default())
    }
}

/// The two actions of a card's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    ToggleType,
    Delete,
}

pub struct Board<A: PersistenceAdapter> {
    adapter: A,
    prefs: Box<dyn PreferenceStore>,
    clock: Box<dyn Clock>,
    listeners: Vec<Box<dyn BoardListener>>,
    options: BoardOptions,
    model: ColumnModel,
    filter: FilterCriteria,
    selection: Selection,
    drag: DragController,
    overlay: QuickActionOverlay,
    hovered: Option<TaskId>,
}

impl<A: PersistenceAdapter> Board<A> {
    /// Creates an empty board. Call [`load`](Self::load) to fill it.
    pub fn new(adapter: A, prefs: Box<dyn PreferenceStore>, clock: Box<dyn Clock>, options: BoardOptions) -> Self {
        Self {
            adapter,
            prefs,
            clock,
            listeners: Vec::new(),
            model: ColumnModel::new(&options.layout),
            overlay: QuickActionOverlay::new(options.overlay),
            options,
            filter: FilterCriteria::default(),
            selection: Selection::new(),
            drag: DragController::new(),
            hovered: None,
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn BoardListener>) {
        self.listeners.push(listener);
    }

    // -- Accessors -----------------------------------------------------------

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn model(&self) -> &ColumnModel {
        &self.model
    }

    pub fn project_id(&self) -> &str {
        &self.options.project_id
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn overlay(&self) -> &QuickActionOverlay {
        &self.overlay
    }

    pub fn hovered(&self) -> Option<&TaskId> {
        self.hovered.as_ref()
    }

    /// "Today" as the filter pipeline sees it.
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub fn done_column(&self) -> &str {
        &self.options.done_column
    }

    /// The rendered columns: the model with the active filter applied.
    pub fn columns(&self) -> Vec<Column> {
        self.model
            .view_on(&self.filter, self.clock.today(), &self.options.done_column)
    }

    /// Ids of the tasks that survive the filter, in board order.
    pub fn visible_ids(&self) -> Vec<TaskId> {
        self.columns()
            .into_iter()
            .flat_map(|c| c.tasks.into_iter().map(|t| t.id))
            .collect()
    }

    pub fn task(&self, id: &str) -> Result<&Task> {
        self.model
            .find_task(id)
            .ok_or_else(|| BoardError::not_found("task", id))
    }

    // -- Notifications -------------------------------------------------------

    fn emit_columns(&mut self) {
        let columns = self.columns();
        for listener in &mut self.listeners {
            listener.on_columns_changed(&columns);
        }
    }

    fn emit_selection(&mut self) {
        for listener in &mut self.listeners {
            listener.on_selection_changed(self.selection.ids());
        }
    }

    fn notify(&mut self, notice: Notice) {
        for listener in &mut self.listeners {
            listener.on_notice(&notice);
        }
    }

    /// Installs `next`, runs `persist`, and restores the previous model if it
    /// fails. Exactly one notice is emitted on failure.
    fn commit<T>(
        &mut self,
        next: ColumnModel,
        what: &str,
        persist: impl FnOnce(&A, &dyn PreferenceStore) -> Result<T>,
    ) -> Result<T> {
        let snapshot = std::mem::replace(&mut self.model, next);
        self.emit_columns();
        match persist(&self.adapter, self.prefs.as_ref()) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, what, "persisting change failed, rolling back");
                self.model = snapshot;
                self.emit_columns();
                self.notify(Notice::error(format!("Could not {what}: {err}")));
                Err(err)
            }
        }
    }

    // -- Loading and filtering -----------------------------------------------

    /// Loads a project's tasks, replacing the model.
    ///
    /// Switching projects clears the selection and any transient gesture
    /// state. On error the previous model is kept.
    pub fn load(&mut self, project_id: &str) -> Result<()> {
        let tasks = self.adapter.list_tasks(project_id)?;

        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id.as_str()) {
                warn!(id = %task.id, project = project_id, "adapter returned duplicate task id");
                return Err(BoardError::DuplicateTaskId(task.id.clone()));
            }
            validate_task(task).inspect_err(|err| {
                warn!(id = %task.id, project = project_id, error = %err, "adapter returned an invalid task");
            })?;
        }

        let prefs = self.prefs.load()?;
        let layout = prefs.column_layout.unwrap_or_else(|| self.options.layout.clone());

        let switching = project_id != self.options.project_id;
        self.model = ColumnModel::distribute(&layout, tasks);
        self.options.project_id = project_id.to_string();
        self.drag.reset();
        self.overlay.close();
        self.hovered = None;

        info!(
            project = project_id,
            tasks = self.model.task_count(),
            columns = self.model.columns().len(),
            "loaded board"
        );
        self.emit_columns();

        if switching {
            if self.selection.clear() {
                self.emit_selection();
            }
        } else {
            self.prune_selection();
        }
        Ok(())
    }

    /// Replaces the filter. The selection is left alone.
    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        if criteria == self.filter {
            return;
        }
        debug!(?criteria, "filter changed");
        self.filter = criteria;
        self.emit_columns();
    }

    /// Stores the active filter in the preference store.
    pub fn save_filter(&mut self) -> Result<()> {
        let mut prefs = self.prefs.load()?;
        prefs.filter = Some(self.filter.clone());
        self.prefs.save(&prefs)?;
        Ok(())
    }

    /// Applies the saved filter, if any. Returns `true` if one was found.
    pub fn restore_saved_filter(&mut self) -> Result<bool> {
        match self.prefs.load()?.filter {
            Some(criteria) => {
                self.set_filter(criteria);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // -- Task mutations ------------------------------------------------------

    /// Creates a task through the adapter and adds it to its column.
    ///
    /// Not optimistic: the task joins the model once the adapter has issued
    /// its id.
    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        validate_draft(&draft)?;
        if self.model.column(&draft.status).is_none() {
            return Err(BoardError::not_found("column", draft.status));
        }

        let task = match self.adapter.create_task(&self.options.project_id, &draft) {
            Ok(task) => task,
            Err(err) => {
                warn!(error = %err, "creating task failed");
                self.notify(Notice::error(format!("Could not create task: {err}")));
                return Err(err.into());
            }
        };

        self.model = self.model.insert_task(task.clone())?;
        info!(id = %task.id, status = %task.status, "created task");
        self.emit_columns();
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, updates: TaskUpdates) -> Result<()> {
        validate_updates(&updates)?;
        if self.model.find_task(id).is_none() {
            warn!(id, "update of a task that is not on the board");
            return Err(BoardError::not_found("task", id));
        }
        let next = self.model.update_task(id, &updates)?;
        self.commit(next, "update task", |adapter, _| {
            adapter.update_task(id, &updates).map_err(BoardError::from)
        })?;
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let (next, _) = self.model.remove_task(id).inspect_err(|_| {
            warn!(id, "delete of a task that is not on the board");
        })?;
        self.commit(next, "delete task", |adapter, _| {
            adapter.delete_task(id).map_err(BoardError::from)
        })?;

        if self.selection.remove(id) {
            self.emit_selection();
        }
        if self.overlay.anchor_task_id().is_some_and(|a| a == id) {
            self.overlay.close();
        }
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        if let Err(err) = self.drop_timer(id) {
            warn!(id, error = %err, "could not remove timer of deleted task");
        }
        info!(id, "deleted task");
        Ok(())
    }

    /// Flips a task between TASK and BUG.
    pub fn toggle_task_type(&mut self, id: &str) -> Result<()> {
        let toggled = self.task(id)?.task_type.toggled();
        self.update_task(id, TaskUpdates::task_type(toggled))
    }

    /// The actions offered by a card's secondary-click menu.
    pub fn context_menu(&self, id: &str) -> Result<[ContextAction; 2]> {
        self.task(id)?;
        Ok([ContextAction::ToggleType, ContextAction::Delete])
    }

    pub fn apply_context_action(&mut self, id: &str, action: ContextAction) -> Result<()> {
        match action {
            ContextAction::ToggleType => self.toggle_task_type(id),
            ContextAction::Delete => self.delete_task(id),
        }
    }

    /// Opens a card for detail view.
    pub fn activate_task(&mut self, id: &str) -> Result<Task> {
        let task = self.task(id)?.clone();
        for listener in &mut self.listeners {
            listener.on_task_activated(id);
        }
        Ok(task)
    }

    // -- Task drag -----------------------------------------------------------

    pub fn start_task_drag(&mut self, task_id: &str) -> Result<()> {
        let source = self
            .model
            .column_of(task_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("task", task_id))?;
        self.drag.task_event(TaskDragEvent::Start {
            task_id: task_id.to_string(),
            source_column_id: source,
        })?;
        Ok(())
    }

    pub fn drag_over_column(&mut self, column_id: &str) -> Result<()> {
        self.drag.task_event(TaskDragEvent::Hover(column_id.to_string()))?;
        Ok(())
    }

    pub fn drag_leave(&mut self) -> Result<()> {
        self.drag.task_event(TaskDragEvent::Leave)?;
        Ok(())
    }

    /// Drops the dragged task.
    ///
    /// `target` overrides the hovered column; `index` is the insertion
    /// position among the target column's visible cards.
    pub fn drop_task(&mut self, target: Option<&str>, index: usize) -> Result<DropOutcome> {
        let outcome = self.drag.task_event(TaskDragEvent::Drop {
            target: target.map(str::to_string),
            index,
        })?;
        match outcome {
            DragOutcome::Move(request) => self.reconcile_move(request),
            DragOutcome::Cancelled(reason) => {
                debug!(?reason, "task drop cancelled");
                Ok(DropOutcome::Cancelled(reason))
            }
            _ => Ok(DropOutcome::Ignored),
        }
    }

    fn reconcile_move(&mut self, request: MoveRequest) -> Result<DropOutcome> {
        let MoveRequest { task_id, from, to, index } = request;

        if self.model.column(&to).is_none() {
            warn!(target = %to, task = %task_id, "drop target is not a column");
            return Err(BoardError::DragReconciliation(to));
        }
        if self.model.column_of(&task_id) != Some(&from) {
            warn!(task = %task_id, column = %from, "dragged task is gone, cancelling drop");
            return Ok(DropOutcome::Cancelled(CancelReason::TaskGone));
        }

        let model_index = self.model_index(&to, index);
        let next = self.model.move_task(&task_id, &from, &to, model_index)?;
        let updates = TaskUpdates::status(to.clone());
        self.commit(next, "move task", |adapter, _| {
            adapter.update_task(&task_id, &updates).map_err(BoardError::from)
        })?;
        info!(task = %task_id, from = %from, to = %to, "moved task");
        Ok(DropOutcome::Moved {
            task_id,
            column_id: to,
        })
    }

    /// Translates an index among the visible cards of a column to an index in
    /// the unfiltered column.
    fn model_index(&self, column_id: &str, view_index: usize) -> usize {
        let Some(column) = self.model.column(column_id) else {
            return view_index;
        };
        let today = self.clock.today();
        let done = &self.options.done_column;
        let visible: Vec<usize> = column
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| self.filter.matches(t, today, done))
            .map(|(i, _)| i)
            .collect();

        match visible.get(view_index) {
            Some(&i) => i,
            None => visible.last().map_or(column.tasks.len(), |&i| i + 1),
        }
    }

    /// Cancels any active drag (task or column).
    pub fn cancel_drag(&mut self) -> Result<()> {
        self.drag.task_event(TaskDragEvent::Cancel)?;
        self.drag.column_event(ColumnDragEvent::Cancel)?;
        Ok(())
    }

    /// Ends the gesture. A drag that was not dropped is cancelled.
    pub fn end_drag(&mut self) -> Result<()> {
        self.drag.task_event(TaskDragEvent::End)?;
        self.drag.column_event(ColumnDragEvent::End)?;
        Ok(())
    }

    // -- Column drag and metadata --------------------------------------------

    pub fn start_column_drag(&mut self, column_id: &str) -> Result<()> {
        if self.model.column(column_id).is_none() {
            return Err(BoardError::not_found("column", column_id));
        }
        self.drag
            .column_event(ColumnDragEvent::Start(column_id.to_string()))?;
        Ok(())
    }

    pub fn drop_column(&mut self, target: &str) -> Result<DropOutcome> {
        match self.drag.column_event(ColumnDragEvent::Drop(target.to_string()))? {
            DragOutcome::Reorder { dragged, target } => {
                if self.model.column(&target).is_none() {
                    warn!(target = %target, "column drop target is not a column");
                    return Err(BoardError::DragReconciliation(target));
                }
                self.reorder_columns(&dragged, &target)?;
                Ok(DropOutcome::Reordered { column_id: dragged })
            }
            DragOutcome::Cancelled(reason) => Ok(DropOutcome::Cancelled(reason)),
            _ => Ok(DropOutcome::Ignored),
        }
    }

    pub fn reorder_columns(&mut self, dragged: &str, target: &str) -> Result<()> {
        let next = self.model.reorder_columns(dragged, target)?;
        if next == self.model {
            return Ok(());
        }
        self.commit_layout(next, "reorder columns")
    }

    pub fn rename_column(&mut self, id: &str, name: &str) -> Result<()> {
        let next = self.model.rename_column(id, name)?;
        self.commit_layout(next, "rename column")
    }

    pub fn add_column(&mut self, spec: ColumnSpec) -> Result<()> {
        let next = self.model.add_column(spec)?;
        self.commit_layout(next, "add column")
    }

    fn commit_layout(&mut self, next: ColumnModel, what: &str) -> Result<()> {
        let layout = next.layout();
        self.commit(next, what, |_, prefs| {
            let mut stored = prefs.load()?;
            stored.column_layout = Some(layout);
            prefs.save(&stored)?;
            Ok(())
        })
    }

    // -- Selection and bulk actions ------------------------------------------

    pub fn toggle_selection(&mut self, id: &str) -> Toggle {
        let visible = self.visible_ids();
        let result = self.selection.toggle(id, &visible);
        debug!(id, ?result, "toggled selection");
        if result.changed() {
            self.emit_selection();
        }
        result
    }

    /// Selects every visible task. Returns the selection size.
    pub fn select_all(&mut self) -> usize {
        let visible = self.visible_ids();
        if self.selection.select_all(&visible) {
            self.emit_selection();
        }
        self.selection.len()
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.emit_selection();
        }
    }

    /// Drops selected ids that are no longer on the board.
    fn prune_selection(&mut self) {
        let model = &self.model;
        let dropped = self.selection.retain(|id| model.find_task(id).is_some());
        if dropped.is_empty() {
            return;
        }
        for id in &dropped {
            warn!(id = %id, "selected task no longer exists, dropping from selection");
        }
        self.emit_selection();
    }

    /// Selected tasks in board order.
    fn selected_tasks(&self) -> Vec<Task> {
        self.model
            .tasks()
            .filter(|t| self.selection.contains(&t.id))
            .cloned()
            .collect()
    }

    fn bulk_update(&mut self, action: &'static str, updates: TaskUpdates) -> Result<usize> {
        validate_updates(&updates)?;
        self.prune_selection();

        let targets = self.selected_tasks();
        let attempted = targets.len();
        if attempted == 0 {
            return Ok(0);
        }

        let batch: Vec<(TaskId, TaskUpdates)> = targets
            .iter()
            .map(|t| (t.id.clone(), updates.clone()))
            .collect();

        let mut next = self.model.clone();
        for (id, u) in &batch {
            next = next.update_task(id, u)?;
        }

        let result = self.commit(next, action, |adapter, _| {
            adapter.update_tasks(&batch).map_err(BoardError::from)
        });
        if let Err(err) = result {
            return Err(BoardError::BulkFailed {
                action,
                attempted,
                source: Box::new(err),
            });
        }

        info!(action, count = attempted, "bulk action applied");
        self.clear_selection();
        Ok(attempted)
    }

    pub fn bulk_set_priority(&mut self, priority: tack_core::enums::Priority) -> Result<usize> {
        self.bulk_update("set priority", TaskUpdates::priority(priority))
    }

    pub fn bulk_assign(&mut self, assignee_id: Option<String>) -> Result<usize> {
        self.bulk_update("assign", TaskUpdates::assignee(assignee_id))
    }

    pub fn bulk_move(&mut self, column_id: &str) -> Result<usize> {
        if self.model.column(column_id).is_none() {
            return Err(BoardError::not_found("column", column_id));
        }
        self.bulk_update("move", TaskUpdates::status(column_id))
    }

    /// Shares the selected tasks with a chat channel. Nothing on the board
    /// changes.
    pub fn bulk_send_to_channel(&mut self, sink: &dyn ChannelSink, channel: &str) -> Result<usize> {
        self.prune_selection();
        let tasks = self.selected_tasks();
        if tasks.is_empty() {
            return Ok(0);
        }
        if let Err(err) = sink.send(channel, &tasks) {
            warn!(error = %err, channel, "sending tasks failed");
            self.notify(Notice::error(format!("Could not send tasks: {err}")));
            return Err(BoardError::BulkFailed {
                action: "send to channel",
                attempted: tasks.len(),
                source: Box::new(err.into()),
            });
        }
        info!(channel, count = tasks.len(), "sent tasks to channel");
        self.clear_selection();
        Ok(tasks.len())
    }

    // -- Quick actions -------------------------------------------------------

    /// Marks the card under the pointer. Shortcuts only work while a card is
    /// hovered.
    pub fn hover_task(&mut self, id: Option<&str>) -> Result<()> {
        self.hovered = match id {
            Some(id) => Some(self.task(id)?.id.clone()),
            None => None,
        };
        Ok(())
    }

    /// Handles a shortcut key. Opens the overlay for the hovered card and
    /// returns its position, or `None` when the key does nothing.
    pub fn handle_key(&mut self, key: char, anchor: &Rect, viewport: Viewport) -> Option<OverlayPosition> {
        let task_id = self.hovered.clone()?;
        let action = QuickAction::from_key(key)?;
        Some(self.overlay.open(&task_id, action, anchor, viewport))
    }

    /// Closes the overlay. Returns `true` if it was open.
    pub fn handle_escape(&mut self) -> bool {
        self.overlay.close()
    }

    /// Re-anchors the open overlay after any scroll.
    pub fn on_scroll(&mut self, anchor: &Rect, viewport: Viewport) -> Option<OverlayPosition> {
        self.overlay.reposition(anchor, viewport)
    }

    /// Commits a value from the open overlay, then closes it.
    ///
    /// On failure the overlay stays open so the value can be retried.
    pub fn apply_quick_action(&mut self, value: QuickActionValue) -> Result<()> {
        let (task_id, expected) = match (self.overlay.anchor_task_id(), self.overlay.action()) {
            (Some(id), Some(action)) => (id.clone(), action),
            _ => return Err(BoardError::OverlayNotOpen),
        };
        let got = value.action();
        if got != expected {
            return Err(BoardError::OverlayMismatch { expected, got });
        }
        self.update_task(&task_id, value.into_updates())?;
        self.overlay.close();
        Ok(())
    }

    // -- Timers --------------------------------------------------------------

    fn with_timer<T>(&mut self, id: &str, f: impl FnOnce(&mut TaskTimer) -> T) -> Result<T> {
        self.task(id)?;
        let mut prefs: Preferences = self.prefs.load()?;
        let timer = prefs.timers.entry(id.to_string()).or_default();
        let result = f(timer);
        self.prefs.save(&prefs)?;
        Ok(result)
    }

    fn drop_timer(&mut self, id: &str) -> Result<()> {
        let mut prefs: Preferences = self.prefs.load()?;
        if prefs.timers.remove(id).is_some() {
            self.prefs.save(&prefs)?;
            debug!(id, "removed timer");
        }
        Ok(())
    }

    /// Starts tracking time on a task. Returns `false` if already running.
    pub fn start_timer(&mut self, id: &str) -> Result<bool> {
        let now = self.clock.now();
        self.with_timer(id, |t| t.start(now))
    }

    /// Stops tracking time on a task. Returns `false` if it was not running.
    pub fn stop_timer(&mut self, id: &str) -> Result<bool> {
        let now = self.clock.now();
        self.with_timer(id, |t| t.stop(now))
    }

    pub fn timer(&self, id: &str) -> Result<TaskTimer> {
        self.task(id)?;
        Ok(self.prefs.load()?.timers.get(id).cloned().unwrap_or_default())
    }

    /// Tracked seconds for a task, including a running interval.
    pub fn tracked_secs(&self, id: &str) -> Result<u64> {
        Ok(self.timer(id)?.elapsed_secs(self.clock.now()))
    }

    /// Ids currently selected, for callers that render checkboxes.
    pub fn selected_ids(&self) -> &BTreeSet<TaskId> {
        self.selection.ids()
    }
}
