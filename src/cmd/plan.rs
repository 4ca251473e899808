//! `calc-tasks` and `gen-test-tasks` - planning arithmetic.

use anyhow::Result;
use serde::Serialize;

use prdflow::plan::{checkpoint_tasks, recommended_task_count, CheckpointTask};

use super::emit;

pub fn calc_tasks(requirements: u32) -> Result<()> {
    emit(&recommended_task_count(requirements))
}

#[derive(Serialize)]
struct TestTasksPayload {
    total_implementation_tasks: u32,
    test_tasks_generated: usize,
    final_total: usize,
    tasks: Vec<CheckpointTask>,
}

pub fn gen_test_tasks(total: u32) -> Result<()> {
    let tasks = checkpoint_tasks(total);
    emit(&TestTasksPayload {
        total_implementation_tasks: total,
        test_tasks_generated: tasks.len(),
        final_total: total as usize + tasks.len(),
        tasks,
    })
}
