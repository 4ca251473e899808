//! Task-count heuristics and checkpoint task generation.

use serde::Serialize;

/// Human-readable form of the task-count heuristic.
pub const TASK_COUNT_FORMULA: &str = "ceil(requirements * 1.5), clamped [10, 40]";

/// Recommended implementation-task count for a requirement count.
#[derive(Debug, Clone, Serialize)]
pub struct TaskEstimate {
    pub requirements_count: u32,
    pub raw_calculation: u32,
    pub recommended: u32,
    pub formula: &'static str,
}

/// `recommended = clamp(ceil(requirements * 1.5), 10, 40)`.
pub fn recommended_task_count(requirements: u32) -> TaskEstimate {
    let raw = (f64::from(requirements) * 1.5).ceil() as u32;
    TaskEstimate {
        requirements_count: requirements,
        raw_calculation: raw,
        recommended: raw.clamp(10, 40),
        formula: TASK_COUNT_FORMULA,
    }
}

/// A synthetic user-validation checkpoint covering a 5-task window.
#[derive(Debug, Clone, Serialize)]
pub struct CheckpointTask {
    pub checkpoint_number: u32,
    pub title: String,
    pub insert_after_task: u32,
    pub covers_tasks: String,
    pub description: String,
    pub priority: &'static str,
    pub dependencies: Vec<String>,
    pub template: String,
}

/// Generate one checkpoint task per full 5-task window.
///
/// `total / 5` checkpoints are produced; a trailing remainder of fewer than
/// 5 tasks is left uncovered. Each checkpoint depends on the last task of
/// its window.
pub fn checkpoint_tasks(total: u32) -> Vec<CheckpointTask> {
    (1..=total / 5)
        .map(|n| {
            let end = n * 5;
            let start = end - 4;
            CheckpointTask {
                checkpoint_number: n,
                title: format!("User Validation Checkpoint {}", n),
                insert_after_task: end,
                covers_tasks: format!("{}-{}", start, end),
                description: format!("Manually test functionality from Tasks {} to {}", start, end),
                priority: "high",
                dependencies: vec![end.to_string()],
                template: checkpoint_template(n, start, end),
            }
        })
        .collect()
}

fn checkpoint_template(n: u32, start: u32, end: u32) -> String {
    format!(
        "# USER-TEST-{n}: User Validation Checkpoint {n}\n\n\
         ## Purpose\n\
         Manual testing of functionality implemented in Tasks {start}-{end}\n\n\
         ## Prerequisites\n\
         All subtasks in Tasks {start}-{end} must be completed and merged to main branch.\n\n\
         ## Testing Checklist\n\n\
         ### Functionality Tests\n\
         - [ ] Test each requirement covered in Tasks {start}-{end}\n\n\
         ### Integration Tests\n\
         - [ ] Test integration between components\n\
         - [ ] Verify no regressions in existing features\n\n\
         ## Acceptance Criteria\n\
         - All functionality tests pass\n\
         - No critical bugs found\n\
         - Performance meets targets\n\n\
         ## If Tests Fail\n\
         1. Document issue in .taskmaster/docs/progress.md\n\
         2. Create fix tasks before proceeding\n\
         3. Do NOT continue to next tasks until fixed\n\n\
         ## When Complete\n\
         Type \"passed\" to continue to next tasks."
    )
}
