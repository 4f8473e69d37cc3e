//! User interface module - terminal styling and formatting.
//!
//! - `formatter` - Message formatting and printing
//! - This module - Styles shared by the formatters

use console::Style;

use crate::domain::CommitType;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_compliance_report, display_error, display_log,
    display_release_plan, display_release_tags, display_status, display_success,
    format_commit_summary, format_log_entry,
};

/// 256-colour palette entry for each commit type
pub fn type_color(ctype: CommitType) -> u8 {
    match ctype {
        CommitType::Unknown => 0,
        CommitType::Build => 200,
        CommitType::Ci => 92,
        CommitType::Chore => 15,
        CommitType::Docs => 250,
        CommitType::Feat => 2,
        CommitType::Fix => 1,
        CommitType::Perf => 3,
        CommitType::Refactor => 30,
        CommitType::Style => 6,
        CommitType::Test => 11,
    }
}

/// Style used to print a commit type
pub fn type_style(ctype: CommitType) -> Style {
    Style::new().color256(type_color(ctype))
}
