//! # Task Control Block
//!
//! Defines the task model for the simulator. Each task is a record of
//! identity, timing, and dynamic scheduling state, plus an ordered list of
//! actions (mutex lock/unlock, I/O start) that fire at specific points in
//! its own execution timeline.
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌─────┐  arrival_tick   ┌───────┐   dispatch()    ┌─────────┐
//!   │ New │ ──────────────► │ Ready │ ──────────────► │ Running │
//!   └─────┘                 └───────┘                 └─────────┘
//!                                ▲                        │    │
//!                                │      preempt/switch    │    │
//!                                └────────────────────────┘    │
//!                                ▲                              │
//!                                │        unblock()             │ block()
//!                           ┌─────────┐                        ▼
//!                           │ Blocked │ ◄──────────────────────┘
//!                           └─────────┘
//!
//!   Running ── executed_ticks == duration ──► Terminated
//! ```

/// Execution state of a task in the engine's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Task has been declared but has not yet reached its arrival tick.
    New,
    /// Task is ready to run and waiting in the ready queue.
    Ready,
    /// Task is currently executing on the CPU.
    Running,
    /// Task is blocked on a mutex or on I/O.
    Blocked,
    /// Task has completed execution and will not be scheduled again.
    Terminated,
}

/// One pending effect a task performs at a specific point in its own
/// executed-tick timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Attempt to acquire the mutex identified by `mutex_id`.
    MutexLock { mutex_id: u32 },
    /// Release the mutex identified by `mutex_id`.
    MutexUnlock { mutex_id: u32 },
    /// Start an I/O wait lasting `duration` ticks.
    IoStart { duration: u64 },
}

/// An action plus the executed-tick count at which it fires.
///
/// `trigger` is measured against the owning task's own `executed_ticks`,
/// never against the global clock: a task that arrives late and an
/// identical task that arrives at tick zero fire their actions at the same
/// point in their own run, not at the same wall tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub trigger: u64,
    pub kind: ActionKind,
}

/// Static description of a task, as read from a config file or supplied to
/// dynamic insertion. Distinct from [`TaskRecord`], which additionally
/// carries mutable scheduling state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub id: String,
    pub color: String,
    pub arrival_tick: u64,
    pub duration: u64,
    pub priority: i64,
    pub actions: Vec<Action>,
}

/// Per-task control block tracked by the engine for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: String,
    pub color: String,
    pub arrival_tick: u64,
    pub duration: u64,
    pub static_priority: i64,
    pub dynamic_priority: i64,
    pub state: TaskState,
    pub executed_ticks: u64,
    pub waited_ticks: u64,
    pub quantum_consumed: u64,
    pub completion_tick: Option<u64>,
    pub actions: Vec<Action>,
}

impl TaskRecord {
    /// Builds a fresh control block in the `New` state from a spec.
    pub fn from_spec(spec: &TaskSpec) -> Self {
        TaskRecord {
            id: spec.id.clone(),
            color: spec.color.clone(),
            arrival_tick: spec.arrival_tick,
            duration: spec.duration,
            static_priority: spec.priority,
            dynamic_priority: spec.priority,
            state: TaskState::New,
            executed_ticks: 0,
            waited_ticks: 0,
            quantum_consumed: 0,
            completion_tick: None,
            actions: spec.actions.clone(),
        }
    }

    /// Whether this task's remaining duration has been fully executed.
    pub fn is_complete(&self) -> bool {
        self.executed_ticks >= self.duration
    }

    /// Actions pending at the current `executed_ticks` count, in declared
    /// order. Does not remove them from `self.actions`.
    pub fn due_actions(&self) -> Vec<Action> {
        self.actions
            .iter()
            .copied()
            .filter(|a| a.trigger == self.executed_ticks)
            .collect()
    }

    /// Removes a single due action matching `action` (first occurrence).
    pub fn consume_action(&mut self, action: Action) {
        if let Some(pos) = self.actions.iter().position(|a| *a == action) {
            self.actions.remove(pos);
        }
    }

    /// Raises `dynamic_priority` to `floor` if it is currently lower.
    /// Used by priority inheritance.
    pub fn raise_priority_to(&mut self, floor: i64) -> bool {
        if floor > self.dynamic_priority {
            self.dynamic_priority = floor;
            true
        } else {
            false
        }
    }

    /// Resets `dynamic_priority` back to `static_priority`, reporting
    /// whether it actually changed.
    pub fn reset_priority(&mut self) -> bool {
        if self.dynamic_priority != self.static_priority {
            self.dynamic_priority = self.static_priority;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> TaskSpec {
        TaskSpec {
            id: "T1".into(),
            color: "red".into(),
            arrival_tick: 0,
            duration: 3,
            priority: 5,
            actions: vec![Action {
                trigger: 1,
                kind: ActionKind::IoStart { duration: 2 },
            }],
        }
    }

    #[test]
    fn from_spec_starts_new_with_matching_static_and_dynamic_priority() {
        let tr = TaskRecord::from_spec(&sample_spec());
        assert_eq!(tr.state, TaskState::New, "freshly built tasks start New");
        assert_eq!(tr.static_priority, tr.dynamic_priority);
        assert_eq!(tr.executed_ticks, 0);
        assert!(tr.completion_tick.is_none());
    }

    #[test]
    fn is_complete_tracks_executed_vs_duration() {
        let mut tr = TaskRecord::from_spec(&sample_spec());
        assert!(!tr.is_complete());
        tr.executed_ticks = tr.duration;
        assert!(tr.is_complete(), "executed_ticks == duration must complete");
    }

    #[test]
    fn due_actions_filters_by_current_executed_ticks() {
        let mut tr = TaskRecord::from_spec(&sample_spec());
        assert!(tr.due_actions().is_empty(), "no actions due at tick 0");
        tr.executed_ticks = 1;
        let due = tr.due_actions();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].trigger, 1);
    }

    #[test]
    fn consume_action_removes_exactly_one_match() {
        let mut tr = TaskRecord::from_spec(&sample_spec());
        tr.executed_ticks = 1;
        let due = tr.due_actions();
        tr.consume_action(due[0]);
        assert!(tr.actions.is_empty(), "matched action removed");
    }

    #[test]
    fn raise_priority_to_only_raises() {
        let mut tr = TaskRecord::from_spec(&sample_spec());
        assert!(!tr.raise_priority_to(5), "equal floor is not a raise");
        assert!(tr.raise_priority_to(9));
        assert_eq!(tr.dynamic_priority, 9);
        assert!(!tr.raise_priority_to(3), "lower floor never lowers priority");
        assert_eq!(tr.dynamic_priority, 9);
    }

    #[test]
    fn reset_priority_restores_static() {
        let mut tr = TaskRecord::from_spec(&sample_spec());
        tr.dynamic_priority = 42;
        assert!(tr.reset_priority());
        assert_eq!(tr.dynamic_priority, tr.static_priority);
        assert!(!tr.reset_priority(), "already-static is not a change");
    }
}
