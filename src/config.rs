//! # Configuration loader
//!
//! Parses the line-oriented text format described in SPEC_FULL.md §6 into
//! a [`PolicyKind`], a quantum, an aging alpha, and a list of
//! [`TaskSpec`]s. Kept deliberately separate from [`crate::engine::Engine`]
//! construction: a caller who does not want the text format can build a
//! workload directly.

use thiserror::Error;

use crate::policy::PolicyKind;
use crate::task::{Action, ActionKind, TaskSpec};

/// Named colors accepted without a leading `#`.
const NAMED_COLORS: &[&str] = &[
    "red", "green", "blue", "yellow", "orange", "purple", "pink", "cyan",
    "magenta", "white", "black", "gray", "grey", "brown",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config has no system line")]
    MissingSystemLine,
    #[error("unrecognized algorithm name '{0}'")]
    UnknownAlgorithm(String),
    #[error("malformed line {line_no}: '{text}'")]
    MalformedLine { line_no: usize, text: String },
    #[error("line {line_no}: expected integer field '{field}', got '{value}'")]
    NotAnInteger {
        line_no: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line_no}: invalid color '{value}'")]
    InvalidColor { line_no: usize, value: String },
    #[error("line {line_no}: action trigger {trigger} must be strictly less than duration {duration}")]
    ActionTriggerOutOfRange {
        line_no: usize,
        trigger: u64,
        duration: u64,
    },
    #[error("line {line_no}: I/O duration must be at least 1")]
    ZeroIoDuration { line_no: usize },
    #[error("duplicate task id '{0}' on line {1}")]
    DuplicateId(String, usize),
}

/// Parsed result of a config file: everything needed to build an `Engine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfig {
    pub policy: PolicyKind,
    pub quantum: u64,
    pub alpha: i64,
    pub tasks: Vec<TaskSpec>,
}

/// Parses the full text of a config file.
pub fn parse(text: &str) -> Result<ParsedConfig, ConfigError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (sys_no, sys_line) = lines.next().ok_or(ConfigError::MissingSystemLine)?;
    let (policy, quantum, alpha) = parse_system_line(sys_no, sys_line)?;

    let mut tasks = Vec::new();
    for (line_no, line) in lines {
        let spec = parse_task_line(line_no, line)?;
        if tasks.iter().any(|t: &TaskSpec| t.id == spec.id) {
            return Err(ConfigError::DuplicateId(spec.id, line_no));
        }
        tasks.push(spec);
    }

    Ok(ParsedConfig {
        policy,
        quantum,
        alpha,
        tasks,
    })
}

fn parse_system_line(line_no: usize, line: &str) -> Result<(PolicyKind, u64, i64), ConfigError> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.is_empty() || fields[0].is_empty() {
        return Err(ConfigError::MalformedLine {
            line_no,
            text: line.to_string(),
        });
    }
    let algo = fields[0].to_uppercase();
    let quantum: u64 = if fields.len() > 1 {
        parse_u64(line_no, "QUANTUM", fields[1])?
    } else {
        0
    };
    let alpha: i64 = if fields.len() > 2 {
        parse_i64(line_no, "ALPHA", fields[2])?
    } else {
        0
    };

    let policy = match algo.as_str() {
        "FIFO" if quantum > 0 => PolicyKind::RoundRobin,
        "FIFO" => PolicyKind::Fifo,
        "RR" | "ROUNDROBIN" => PolicyKind::RoundRobin,
        "SRTF" => PolicyKind::Srtf,
        "PRIORIDADEP" => PolicyKind::PreemptivePriority,
        "PRIOPENV" => PolicyKind::PriorityAging,
        other => return Err(ConfigError::UnknownAlgorithm(other.to_string())),
    };

    Ok((policy, quantum, alpha))
}

fn parse_task_line(line_no: usize, line: &str) -> Result<TaskSpec, ConfigError> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 5 {
        return Err(ConfigError::MalformedLine {
            line_no,
            text: line.to_string(),
        });
    }
    let id = fields[0].to_string();
    if id.is_empty() {
        return Err(ConfigError::MalformedLine {
            line_no,
            text: line.to_string(),
        });
    }
    let color = parse_color(line_no, fields[1])?;
    let arrival_tick = parse_u64(line_no, "ARRIVAL", fields[2])?;
    let duration = parse_u64(line_no, "DURATION", fields[3])?;
    let priority = parse_i64(line_no, "PRIORITY", fields[4])?;

    let mut actions = Vec::new();
    for raw in &fields[5..] {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if let Some(action) = parse_action(line_no, raw, duration)? {
            actions.push(action);
        }
    }

    Ok(TaskSpec {
        id,
        color,
        arrival_tick,
        duration,
        priority,
        actions,
    })
}

fn parse_action(line_no: usize, raw: &str, duration: u64) -> Result<Option<Action>, ConfigError> {
    if let Some(rest) = raw.strip_prefix("IO:") {
        let (start, dur) = split_pair(line_no, rest)?;
        let start = parse_u64(line_no, "IO start", start)?;
        let dur = parse_u64(line_no, "IO duration", dur)?;
        if dur == 0 {
            return Err(ConfigError::ZeroIoDuration { line_no });
        }
        if start >= duration {
            return Err(ConfigError::ActionTriggerOutOfRange {
                line_no,
                trigger: start,
                duration,
            });
        }
        return Ok(Some(Action {
            trigger: start,
            kind: ActionKind::IoStart { duration: dur },
        }));
    }
    if let Some(rest) = raw.strip_prefix("ML") {
        let (id, time) = split_colon(line_no, rest)?;
        let mutex_id = parse_u32(line_no, "mutex id", id)?;
        let trigger = parse_u64(line_no, "lock time", time)?;
        if trigger >= duration {
            return Err(ConfigError::ActionTriggerOutOfRange {
                line_no,
                trigger,
                duration,
            });
        }
        return Ok(Some(Action {
            trigger,
            kind: ActionKind::MutexLock { mutex_id },
        }));
    }
    if let Some(rest) = raw.strip_prefix("MU") {
        let (id, time) = split_colon(line_no, rest)?;
        let mutex_id = parse_u32(line_no, "mutex id", id)?;
        let trigger = parse_u64(line_no, "unlock time", time)?;
        if trigger >= duration {
            return Err(ConfigError::ActionTriggerOutOfRange {
                line_no,
                trigger,
                duration,
            });
        }
        return Ok(Some(Action {
            trigger,
            kind: ActionKind::MutexUnlock { mutex_id },
        }));
    }
    log::warn!("config line {line_no}: unrecognized action form '{raw}', ignoring");
    Ok(None)
}

fn split_pair<'a>(line_no: usize, s: &'a str) -> Result<(&'a str, &'a str), ConfigError> {
    s.split_once('-').ok_or(ConfigError::MalformedLine {
        line_no,
        text: s.to_string(),
    })
}

fn split_colon<'a>(line_no: usize, s: &'a str) -> Result<(&'a str, &'a str), ConfigError> {
    s.split_once(':').ok_or(ConfigError::MalformedLine {
        line_no,
        text: s.to_string(),
    })
}

fn parse_u64(line_no: usize, field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotAnInteger {
            line_no,
            field,
            value: value.to_string(),
        })
}

fn parse_u32(line_no: usize, field: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotAnInteger {
            line_no,
            field,
            value: value.to_string(),
        })
}

fn parse_i64(line_no: usize, field: &'static str, value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotAnInteger {
            line_no,
            field,
            value: value.to_string(),
        })
}

fn parse_color(line_no: usize, raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let lower = raw.to_lowercase();
    if NAMED_COLORS.contains(&lower.as_str()) {
        return Ok(lower);
    }
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(format!("#{}", hex.to_lowercase()));
    }
    Err(ConfigError::InvalidColor {
        line_no,
        value: raw.to_string(),
    })
}
