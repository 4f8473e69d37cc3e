//! Command line workflows, decoupled from argument parsing

pub mod orchestration;

pub use orchestration::{
    build_commit_message, build_log_filter, run_check, run_commit, run_list_tags, run_log,
    run_release, CommitWorkflowArgs, LogWorkflowArgs, ReleaseWorkflowArgs, WorkflowResult,
};
