//! # Debug projector
//!
//! Renders a human-readable, multi-line text dump of an [`Engine`]'s state,
//! intended for step mode where a host prints it between ticks.

use std::fmt::Write;

use crate::engine::Engine;
use crate::task::TaskState;

/// Renders the current engine state as a multi-line string.
///
/// ```text
/// tick 4
/// last event: tick 4: running T1
/// running: T1
/// ready: [T2, T3]
/// scheduler active: true
/// mutex 1 waiters: [T4]
/// io remaining: T5=2
/// ---
/// T1  prio=5/5  Running     3/6  arrived=0  waited=0
/// T2  prio=2/2  Ready       0/2  arrived=0  waited=4
/// ```
pub fn render(engine: &Engine) -> String {
    let mut out = String::new();

    writeln!(out, "tick {}", engine.clock()).ok();
    writeln!(out, "last event: {}", engine.last_event()).ok();
    writeln!(
        out,
        "running: {}",
        engine
            .running_task()
            .map(|t| t.id.as_str())
            .unwrap_or("none")
    )
    .ok();
    writeln!(out, "ready: [{}]", engine.ready_ids().join(", ")).ok();
    writeln!(out, "scheduler active: {}", engine.scheduler_active()).ok();

    for (&mutex_id, waiters) in engine.mutex_waiters() {
        if waiters.is_empty() {
            continue;
        }
        let names: Vec<&str> = waiters.iter().map(|&i| engine.tasks()[i].id.as_str()).collect();
        writeln!(out, "mutex {mutex_id} waiters: [{}]", names.join(", ")).ok();
    }

    if !engine.io_remaining().is_empty() {
        let parts: Vec<String> = engine
            .io_remaining()
            .iter()
            .map(|(&idx, remaining)| format!("{}={remaining}", engine.tasks()[idx].id))
            .collect();
        writeln!(out, "io remaining: {}", parts.join(", ")).ok();
    }

    writeln!(out, "---").ok();
    for task in engine.tasks() {
        if task.state == TaskState::New {
            continue;
        }
        writeln!(
            out,
            "{:<4} prio={}/{}  {:<11} {}/{}  arrived={}  waited={}",
            task.id,
            task.dynamic_priority,
            task.static_priority,
            format!("{:?}", task.state),
            task.executed_ticks,
            task.duration,
            task.arrival_tick,
            task.waited_ticks,
        )
        .ok();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Fifo;
    use crate::task::TaskSpec;

    #[test]
    fn render_includes_running_task_and_tick() {
        let mut engine = crate::engine::Engine::with_seed(
            vec![TaskSpec {
                id: "T1".into(),
                color: "red".into(),
                arrival_tick: 0,
                duration: 2,
                priority: 0,
                actions: vec![],
            }],
            Box::new(Fifo),
            0,
            1,
        );
        engine.tick();
        let text = render(&engine);
        assert!(text.contains("tick 1"));
        assert!(text.contains("running: T1"));
    }

    #[test]
    fn render_reports_scheduler_active_flag() {
        let mut engine = crate::engine::Engine::with_seed(
            vec![TaskSpec {
                id: "T1".into(),
                color: "red".into(),
                arrival_tick: 0,
                duration: 3,
                priority: 0,
                actions: vec![],
            }],
            Box::new(Fifo),
            0,
            2,
        );

        // Tick 0: T1 arrives and is dispatched -- the scheduler ran.
        engine.tick();
        assert!(engine.scheduler_active());
        assert!(render(&engine).contains("scheduler active: true"));

        // Tick 1: T1 keeps running, nothing arrives or blocks -- no
        // scheduling decision was needed.
        engine.tick();
        assert!(!engine.scheduler_active());
        assert!(render(&engine).contains("scheduler active: false"));
    }
}
