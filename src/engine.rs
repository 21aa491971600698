//! # Tick engine
//!
//! Owns the workload, the mutex and I/O managers, the timeline logs, and
//! the undo history. [`Engine::tick`] is the only place the nine-step
//! pipeline (snapshot, I/O returns, arrivals, aging, action processing,
//! dispatch, status logging, execution, clock advance) runs; every other
//! method either reads state or performs a single atomic state change
//! between ticks.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::InsertError;
use crate::policy::{Policy, TaskView};
use crate::task::{ActionKind, TaskRecord, TaskSpec, TaskState};
use crate::timeline::{
    ExecutionEntry, IoEntry, MutexBlockEntry, MutexEventEntry, MutexEventKind, Timelines,
};

/// The portion of engine state that must round-trip through undo. Kept
/// separate from [`Engine`] itself so the history stack, the policy, and
/// the RNG — none of which ever need to be snapshotted — never have to be
/// cloned or cleared when taking or restoring a snapshot.
#[derive(Debug, Clone)]
struct EngineState {
    clock: u64,
    quantum: u64,
    tasks: Vec<TaskRecord>,
    ready: Vec<usize>,
    running: Option<usize>,
    mutex_owner: BTreeMap<u32, usize>,
    mutex_waiters: BTreeMap<u32, Vec<usize>>,
    io_remaining: BTreeMap<usize, u64>,
    timelines: Timelines,
    last_event: String,
    /// Whether the policy was actually consulted during the most recently
    /// completed tick (as opposed to the tick running to completion
    /// without ever needing a scheduling decision).
    scheduler_active_last_tick: bool,
}

impl EngineState {
    fn new(quantum: u64, tasks: Vec<TaskRecord>) -> Self {
        EngineState {
            clock: 0,
            quantum,
            tasks,
            ready: Vec::new(),
            running: None,
            mutex_owner: BTreeMap::new(),
            mutex_waiters: BTreeMap::new(),
            io_remaining: BTreeMap::new(),
            timelines: Timelines::new(),
            last_event: String::new(),
            scheduler_active_last_tick: false,
        }
    }
}

/// Drives a workload through ticks under a pluggable [`Policy`].
pub struct Engine {
    state: EngineState,
    history: Vec<EngineState>,
    policy: Box<dyn Policy>,
    rng: Box<dyn RngCore>,
}

impl Engine {
    /// Builds an engine from a workload, a policy, a quantum (ignored by
    /// policies that don't use one), and an injected RNG source.
    pub fn new(
        specs: Vec<TaskSpec>,
        policy: Box<dyn Policy>,
        quantum: u64,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let tasks = specs.iter().map(TaskRecord::from_spec).collect();
        Engine {
            state: EngineState::new(quantum, tasks),
            history: Vec::new(),
            policy,
            rng,
        }
    }

    /// Convenience constructor seeding a deterministic `StdRng`.
    pub fn with_seed(specs: Vec<TaskSpec>, policy: Box<dyn Policy>, quantum: u64, seed: u64) -> Self {
        Engine::new(specs, policy, quantum, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn clock(&self) -> u64 {
        self.state.clock
    }

    pub fn timelines(&self) -> &Timelines {
        &self.state.timelines
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.state.tasks
    }

    pub fn running_task(&self) -> Option<&TaskRecord> {
        self.state.running.map(|i| &self.state.tasks[i])
    }

    pub fn ready_ids(&self) -> Vec<&str> {
        self.state.ready.iter().map(|&i| self.state.tasks[i].id.as_str()).collect()
    }

    pub fn last_event(&self) -> &str {
        &self.state.last_event
    }

    pub fn mutex_waiters(&self) -> &BTreeMap<u32, Vec<usize>> {
        &self.state.mutex_waiters
    }

    pub fn io_remaining(&self) -> &BTreeMap<usize, u64> {
        &self.state.io_remaining
    }

    /// Whether the most recently completed tick actually consulted the
    /// policy (as opposed to running to completion with nothing to
    /// (re)schedule).
    pub fn scheduler_active(&self) -> bool {
        self.state.scheduler_active_last_tick
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.state.tasks.iter().position(|t| t.id == id)
    }

    /// Runs one full tick of the nine-step pipeline.
    pub fn tick(&mut self) {
        self.history.push(self.state.clone());

        let mut needs_scheduling = false;

        needs_scheduling |= self.step_io_returns();
        needs_scheduling |= self.step_arrivals();
        needs_scheduling |= self.step_aging();

        let mut quantum_expired = false;
        if let Some(running_idx) = self.state.running {
            let (blocked_or_terminated, expired, reschedule) =
                self.process_actions_for(running_idx);
            needs_scheduling |= reschedule;
            quantum_expired = expired;
            let _ = blocked_or_terminated;
        } else if !self.state.ready.is_empty() {
            // Nothing ran this tick to trigger a reschedule by blocking or
            // terminating, but the ready queue isn't empty (e.g. the CPU
            // went idle mid-tick, or after a prior block with no other
            // arrival this tick) -- the policy still needs a chance to
            // pick someone up rather than leaving the CPU idle forever.
            needs_scheduling = true;
        }

        let mut lottery_used = false;
        if needs_scheduling {
            lottery_used = self.dispatch(quantum_expired);
        }
        self.state.scheduler_active_last_tick = needs_scheduling;

        self.log_blocked_status();
        self.execute_tick(lottery_used);

        self.state.clock += 1;
    }

    /// Step 2: I/O returns. Decrements every outstanding counter; tasks
    /// reaching zero move Blocked -> Ready.
    fn step_io_returns(&mut self) -> bool {
        let mut done = Vec::new();
        for (&idx, remaining) in self.state.io_remaining.iter_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                done.push(idx);
            }
        }
        let mut changed = false;
        for idx in done {
            self.state.io_remaining.remove(&idx);
            self.state.tasks[idx].state = TaskState::Ready;
            self.state.ready.push(idx);
            changed = true;
        }
        changed
    }

    /// Step 3: New tasks whose arrival_tick matches the clock become Ready.
    fn step_arrivals(&mut self) -> bool {
        let clock = self.state.clock;
        let mut changed = false;
        for (idx, task) in self.state.tasks.iter_mut().enumerate() {
            if task.state == TaskState::New && task.arrival_tick == clock {
                task.state = TaskState::Ready;
                self.state.ready.push(idx);
                changed = true;
            }
        }
        changed
    }

    /// Step 4: wait-tick accounting and, for aging policies, dynamic
    /// priority growth that may preempt the running task.
    fn step_aging(&mut self) -> bool {
        let mut changed = false;
        let alpha = self.policy.aging_alpha();
        let running_prio = self.state.running.map(|i| self.state.tasks[i].dynamic_priority);

        for &idx in &self.state.ready {
            let task = &mut self.state.tasks[idx];
            task.waited_ticks += 1;
            if let Some(alpha) = alpha {
                task.dynamic_priority += alpha;
                if let Some(rp) = running_prio {
                    if task.dynamic_priority > rp {
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    /// Step 5, applied to the Running task (or, after an actual context
    /// switch in dispatch, re-applied to the newly-dispatched one).
    ///
    /// Returns `(blocked_or_terminated, quantum_expired, needs_scheduling)`.
    fn process_actions_for(&mut self, idx: usize) -> (bool, bool, bool) {
        let due = self.state.tasks[idx].due_actions();
        let mut reschedule = false;
        for action in due {
            // A lock attempt that blocks does NOT consume its action: it
            // stays pending and fires again, against the same frozen
            // executed_ticks, the next time this task actually runs. That
            // retry is how a woken waiter re-acquires the mutex, since
            // unlock() never hands ownership to the waiter it wakes.
            let (blocked, consume) = match action.kind {
                ActionKind::MutexLock { mutex_id } => {
                    let blocked = self.mutex_lock(idx, mutex_id);
                    (blocked, !blocked)
                }
                ActionKind::MutexUnlock { mutex_id } => {
                    reschedule |= self.mutex_unlock(idx, mutex_id);
                    (false, true)
                }
                ActionKind::IoStart { duration } => {
                    self.state.io_remaining.insert(idx, duration);
                    self.state.tasks[idx].state = TaskState::Blocked;
                    (true, true)
                }
            };
            if consume {
                self.state.tasks[idx].consume_action(action);
            }
            if blocked {
                self.state.running = None;
                return (true, false, true);
            }
        }

        if self.state.tasks[idx].is_complete() {
            let clock = self.state.clock;
            self.state.tasks[idx].state = TaskState::Terminated;
            self.state.tasks[idx].completion_tick = Some(clock);
            self.release_all_mutexes(idx);
            self.state.running = None;
            return (true, false, true);
        }

        if self.policy.uses_quantum() && self.state.tasks[idx].quantum_consumed >= self.state.quantum
        {
            return (false, true, true);
        }

        (false, false, reschedule)
    }

    /// Step 6: consults the policy and performs a context switch if
    /// warranted. Returns whether the winner was chosen by lottery.
    fn dispatch(&mut self, quantum_expired: bool) -> bool {
        let ready_views: Vec<TaskView<'_>> = self
            .state
            .ready
            .iter()
            .map(|&i| view_of(&self.state.tasks[i]))
            .collect();
        let current_view = self.state.running.map(|i| view_of(&self.state.tasks[i]));

        let decision = self
            .policy
            .decide(&ready_views, current_view, quantum_expired, &mut *self.rng);

        let next_idx = decision.next.as_deref().and_then(|id| self.index_of(id));

        let switching = next_idx != self.state.running;

        if switching {
            if let Some(old) = self.state.running {
                self.state.tasks[old].state = TaskState::Ready;
                self.state.tasks[old].quantum_consumed = 0;
                self.state.ready.push(old);
            }
            if let Some(new_idx) = next_idx {
                self.state.ready.retain(|&i| i != new_idx);
                self.state.tasks[new_idx].state = TaskState::Running;
                self.state.tasks[new_idx].quantum_consumed = 0;
                self.state.running = Some(new_idx);
            } else {
                self.state.running = None;
            }
        }

        if let Some(new_idx) = next_idx {
            if self.policy.aging_alpha().is_some() {
                self.state.tasks[new_idx].reset_priority();
            }
        }

        if switching {
            if let Some(new_idx) = next_idx {
                let (blocked, _, _) = self.process_actions_for(new_idx);
                let _ = blocked;
            }
        }

        decision.lottery_used
    }

    /// Step 7: appends a row to the mutex-block or I/O log for every
    /// currently Blocked task.
    fn log_blocked_status(&mut self) {
        let clock = self.state.clock;
        let blocked: Vec<usize> = self
            .state
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.state == TaskState::Blocked)
            .map(|(i, _)| i)
            .collect();
        for idx in blocked {
            if self.state.io_remaining.contains_key(&idx) {
                self.state.timelines.io.push(IoEntry {
                    tick: clock,
                    task_id: self.state.tasks[idx].id.clone(),
                });
            } else {
                self.state.timelines.mutex_block.push(MutexBlockEntry {
                    tick: clock,
                    task_id: self.state.tasks[idx].id.clone(),
                });
            }
        }
    }

    /// Step 8: executes the running task for this tick and appends the
    /// execution-log row (or an idle row).
    fn execute_tick(&mut self, lottery_used: bool) {
        let clock = self.state.clock;
        if let Some(idx) = self.state.running {
            self.state.tasks[idx].executed_ticks += 1;
            self.state.tasks[idx].quantum_consumed += 1;
            let entry = ExecutionEntry {
                tick: clock,
                task_id: Some(self.state.tasks[idx].id.clone()),
                color: self.state.tasks[idx].color.clone(),
                lottery_used,
            };
            self.state.last_event = format!(
                "tick {clock}: running {}",
                self.state.tasks[idx].id
            );
            self.state.timelines.execution.push(entry);
        } else {
            self.state.timelines.execution.push(ExecutionEntry {
                tick: clock,
                task_id: None,
                color: "white".to_string(),
                lottery_used: false,
            });
            self.state.last_event = format!("tick {clock}: idle");
        }
    }

    /// Attempts to lock `mutex_id` for `idx`. Returns true if `idx` is now
    /// blocked.
    fn mutex_lock(&mut self, idx: usize, mutex_id: u32) -> bool {
        let clock = self.state.clock;
        match self.state.mutex_owner.get(&mutex_id).copied() {
            None => {
                self.state.mutex_owner.insert(mutex_id, idx);
                self.state.timelines.mutex_event.push(MutexEventEntry {
                    tick: clock,
                    task_id: self.state.tasks[idx].id.clone(),
                    kind: MutexEventKind::Lock,
                    mutex_id,
                });
                false
            }
            Some(owner) if owner == idx => false,
            Some(owner) => {
                self.state.tasks[idx].state = TaskState::Blocked;
                self.state.mutex_waiters.entry(mutex_id).or_default().push(idx);
                self.state.timelines.mutex_event.push(MutexEventEntry {
                    tick: clock,
                    task_id: self.state.tasks[idx].id.clone(),
                    kind: MutexEventKind::LockFailed,
                    mutex_id,
                });
                let waiter_prio = self.state.tasks[idx].dynamic_priority;
                self.state.tasks[owner].raise_priority_to(waiter_prio);
                true
            }
        }
    }

    /// Releases `mutex_id` if owned by `idx`, waking the head waiter.
    /// Returns whether this unlock should force a reschedule this tick
    /// (the holder's priority reset, or a waiter was woken).
    fn mutex_unlock(&mut self, idx: usize, mutex_id: u32) -> bool {
        let clock = self.state.clock;
        match self.state.mutex_owner.get(&mutex_id).copied() {
            Some(owner) if owner == idx => {
                self.state.mutex_owner.remove(&mutex_id);
                let mut reschedule = self.state.tasks[idx].reset_priority();
                self.state.timelines.mutex_event.push(MutexEventEntry {
                    tick: clock,
                    task_id: self.state.tasks[idx].id.clone(),
                    kind: MutexEventKind::Unlock,
                    mutex_id,
                });
                if let Some(waiters) = self.state.mutex_waiters.get_mut(&mutex_id) {
                    if !waiters.is_empty() {
                        let woken = waiters.remove(0);
                        self.state.tasks[woken].state = TaskState::Ready;
                        self.state.ready.push(woken);
                        // Ownership is NOT transferred here: the mutex is
                        // free and `woken`'s still-pending MutexLock action
                        // will re-fire (and succeed, if nothing else wins
                        // the race first) the next time it actually runs.
                        reschedule = true;
                    }
                }
                reschedule
            }
            _ => {
                log::warn!(
                    "task {} attempted to unlock mutex {mutex_id} it does not own",
                    self.state.tasks[idx].id
                );
                false
            }
        }
    }

    /// Releases every mutex owned by `idx`, used on termination.
    fn release_all_mutexes(&mut self, idx: usize) {
        let owned: Vec<u32> = self
            .state
            .mutex_owner
            .iter()
            .filter(|(_, &owner)| owner == idx)
            .map(|(&m, _)| m)
            .collect();
        for mutex_id in owned {
            self.mutex_unlock(idx, mutex_id);
        }
    }

    /// Inserts a new task mid-run. Fails validation without consuming a
    /// snapshot or mutating any existing state.
    pub fn insert_task(&mut self, spec: TaskSpec) -> Result<(), InsertError> {
        if self.state.tasks.iter().any(|t| t.id == spec.id) {
            return Err(InsertError::DuplicateId(spec.id));
        }
        if spec.arrival_tick != self.state.clock {
            return Err(InsertError::ArrivalMismatch {
                current: self.state.clock,
                requested: spec.arrival_tick,
            });
        }
        if spec.duration == 0 {
            return Err(InsertError::ZeroDuration);
        }
        for action in &spec.actions {
            if action.trigger >= spec.duration {
                return Err(InsertError::ActionTriggerOutOfRange {
                    trigger: action.trigger,
                    duration: spec.duration,
                });
            }
            if let ActionKind::IoStart { duration } = action.kind {
                if duration == 0 {
                    return Err(InsertError::ZeroIoDuration);
                }
            }
        }

        self.state.tasks.push(TaskRecord::from_spec(&spec));
        Ok(())
    }

    /// Restores the previous tick's state, if any. Returns false if the
    /// history is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.state = prev;
                true
            }
            None => false,
        }
    }
}

fn view_of(task: &TaskRecord) -> TaskView<'_> {
    TaskView {
        id: &task.id,
        arrival_tick: task.arrival_tick,
        duration: task.duration,
        executed_ticks: task.executed_ticks,
        static_priority: task.static_priority,
        dynamic_priority: task.dynamic_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Fifo, PolicyKind, PreemptivePriority, PriorityAging, RoundRobin, Srtf};
    use crate::task::Action;

    fn spec(id: &str, arrival: u64, duration: u64, priority: i64) -> TaskSpec {
        TaskSpec {
            id: id.to_string(),
            color: "red".to_string(),
            arrival_tick: arrival,
            duration,
            priority,
            actions: vec![],
        }
    }

    fn exec_ids(engine: &Engine) -> Vec<String> {
        engine
            .timelines()
            .execution
            .iter()
            .map(|e| e.task_id.clone().unwrap_or_else(|| "idle".to_string()))
            .collect()
    }

    #[test]
    fn scenario_1_fifo_two_tasks() {
        let mut engine = Engine::with_seed(
            vec![spec("T1", 0, 3, 0), spec("T2", 0, 2, 0)],
            Box::new(Fifo),
            0,
            1,
        );
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(exec_ids(&engine), vec!["T1", "T1", "T1", "T2", "T2"]);
    }

    #[test]
    fn scenario_2_round_robin_quantum_2() {
        let mut engine = Engine::with_seed(
            vec![spec("T1", 0, 4, 0), spec("T2", 0, 3, 0)],
            Box::new(RoundRobin),
            2,
            1,
        );
        for _ in 0..7 {
            engine.tick();
        }
        assert_eq!(
            exec_ids(&engine),
            vec!["T1", "T1", "T2", "T2", "T1", "T1", "T2"]
        );
    }

    #[test]
    fn scenario_3_srtf_preemption_on_arrival() {
        let mut engine = Engine::with_seed(
            vec![spec("T1", 0, 5, 0), spec("T2", 2, 2, 0)],
            Box::new(Srtf),
            0,
            1,
        );
        for _ in 0..7 {
            engine.tick();
        }
        assert_eq!(
            exec_ids(&engine),
            vec!["T1", "T1", "T2", "T2", "T1", "T1", "T1"]
        );
    }

    #[test]
    fn scenario_6_io_blocks_and_returns() {
        let mut t1 = spec("T1", 0, 4, 0);
        t1.actions.push(Action {
            trigger: 2,
            kind: ActionKind::IoStart { duration: 3 },
        });
        let mut engine = Engine::with_seed(vec![t1, spec("T2", 0, 2, 0)], Box::new(Fifo), 0, 1);
        for _ in 0..7 {
            engine.tick();
        }
        assert_eq!(
            exec_ids(&engine),
            vec!["T1", "T1", "T2", "T2", "idle", "T1", "T1"]
        );
    }

    #[test]
    fn scenario_5_priority_aging_eventually_preempts_permanently_ready_high_priority() {
        // T_hi never blocks or yields; T_lo just sits in the ready queue.
        // Each tick T_lo waits, its dynamic priority climbs by alpha, and
        // once it overtakes T_hi's (unchanged, since aging only applies to
        // Ready tasks) it must preempt.
        let mut engine = Engine::with_seed(
            vec![spec("T_hi", 0, 10, 9), spec("T_lo", 0, 10, 1)],
            Box::new(PriorityAging { alpha: 3 }),
            0,
            1,
        );
        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(
            exec_ids(&engine),
            vec!["T_hi", "T_hi", "T_lo"],
            "T_lo's aged priority (1 + 3*3 = 10) overtakes T_hi's static 9 on the third tick"
        );

        let hi_idx = engine.index_of("T_hi").unwrap();
        let lo_idx = engine.index_of("T_lo").unwrap();
        assert_eq!(
            engine.state.tasks[lo_idx].dynamic_priority, 1,
            "dispatch resets the winner's dynamic priority back to static"
        );
        assert_eq!(
            engine.state.tasks[hi_idx].state,
            TaskState::Ready,
            "the preempted task returns to Ready, not Blocked or Terminated"
        );
    }

    #[test]
    fn mutex_priority_inheritance_and_reset() {
        let mut low = spec("LOW", 0, 6, 1);
        low.actions.push(Action {
            trigger: 0,
            kind: ActionKind::MutexLock { mutex_id: 1 },
        });
        low.actions.push(Action {
            trigger: 4,
            kind: ActionKind::MutexUnlock { mutex_id: 1 },
        });
        let mut high = spec("HIGH", 1, 2, 9);
        high.actions.push(Action {
            trigger: 0,
            kind: ActionKind::MutexLock { mutex_id: 1 },
        });

        let mut engine =
            Engine::with_seed(vec![low, high], Box::new(PreemptivePriority), 0, 1);

        engine.tick();
        assert_eq!(engine.running_task().unwrap().id, "LOW");

        engine.tick();
        let low_idx = engine.index_of("LOW").unwrap();
        assert_eq!(
            engine.state.tasks[low_idx].dynamic_priority,
            9,
            "low holder inherits high waiter's priority"
        );

        let mut reset = false;
        for _ in 0..8 {
            engine.tick();
            let low_idx = engine.index_of("LOW").unwrap();
            if engine.state.tasks[low_idx].dynamic_priority == 1 {
                reset = true;
                break;
            }
        }
        assert!(reset, "priority must reset to static once LOW unlocks");

        let high_idx = engine.index_of("HIGH").unwrap();
        assert_ne!(
            engine.state.tasks[high_idx].state,
            TaskState::Blocked,
            "HIGH must be woken once the mutex is free, able to retry its lock"
        );
    }

    #[test]
    fn insert_task_rejects_wrong_arrival_tick() {
        let mut engine = Engine::with_seed(vec![spec("T1", 0, 3, 0)], Box::new(Fifo), 0, 1);
        engine.tick();
        let err = engine.insert_task(spec("T2", 0, 2, 0)).unwrap_err();
        assert_eq!(
            err,
            InsertError::ArrivalMismatch {
                current: 1,
                requested: 0
            }
        );
    }

    #[test]
    fn insert_task_rejects_duplicate_id() {
        let mut engine = Engine::with_seed(vec![spec("T1", 0, 3, 0)], Box::new(Fifo), 0, 1);
        let err = engine.insert_task(spec("T1", 0, 2, 0)).unwrap_err();
        assert!(matches!(err, InsertError::DuplicateId(_)));
    }

    #[test]
    fn undo_restores_previous_tick_exactly() {
        let mut engine = Engine::with_seed(
            vec![spec("T1", 0, 3, 0), spec("T2", 0, 2, 0)],
            Box::new(Fifo),
            0,
            1,
        );
        engine.tick();
        engine.tick();
        let clock_before = engine.clock();
        let exec_before = exec_ids(&engine);

        engine.tick();
        assert!(engine.undo());

        assert_eq!(engine.clock(), clock_before);
        assert_eq!(exec_ids(&engine), exec_before);
    }

    #[test]
    fn undo_on_empty_history_returns_false() {
        let mut engine = Engine::with_seed(vec![spec("T1", 0, 1, 0)], Box::new(Fifo), 0, 1);
        assert!(!engine.undo());
    }

    #[test]
    fn execution_log_length_equals_clock() {
        let mut engine = Engine::with_seed(
            vec![spec("T1", 0, 3, 0), spec("T2", 0, 2, 0)],
            Box::new(Fifo),
            0,
            1,
        );
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(engine.timelines().execution.len() as u64, engine.clock());
    }

    #[test]
    fn at_most_one_task_running_invariant() {
        let mut engine = Engine::with_seed(
            vec![spec("T1", 0, 4, 0), spec("T2", 0, 3, 1)],
            Box::new(PolicyKind::PreemptivePriority.build(0)),
            0,
            3,
        );
        for _ in 0..8 {
            engine.tick();
            let running_count = engine
                .tasks()
                .iter()
                .filter(|t| t.state == TaskState::Running)
                .count();
            assert!(running_count <= 1);
        }
    }
}
