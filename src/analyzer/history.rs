//! Filtered view of a conventional history

use chrono::{DateTime, NaiveDate};
use git2::Oid;
use log::debug;

use super::walk::Ancestry;
use crate::domain::{CommitType, ParsedCommit};
use crate::error::{Result, SemrelError};
use crate::git::{short_id, CommitInfo, Repository};

/// Criteria a commit must meet to be listed; all of them apply
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogFilter {
    /// Keep only these types; empty keeps every type
    pub types: Vec<CommitType>,
    /// Keep only these scopes; empty keeps every scope
    pub scopes: Vec<String>,
    pub breaking_only: bool,
    /// Stop at the first commit older than this time
    pub since: Option<i64>,
    /// Skip commits younger than this time
    pub until: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    Skip,
    Stop,
}

impl LogFilter {
    fn verdict(&self, commit: &CommitInfo, parsed: Option<&ParsedCommit>) -> Verdict {
        if self.since.is_some_and(|since| commit.time < since) {
            return Verdict::Stop;
        }
        if self.until.is_some_and(|until| commit.time > until) {
            return Verdict::Skip;
        }

        let keep = if self.breaking_only || !self.types.is_empty() || !self.scopes.is_empty() {
            // non-conventional commits carry nothing to match on
            parsed.is_some_and(|parsed| self.matches(parsed))
        } else {
            true
        };
        if keep {
            Verdict::Keep
        } else {
            Verdict::Skip
        }
    }

    fn matches(&self, parsed: &ParsedCommit) -> bool {
        if self.breaking_only && !parsed.is_breaking_change {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&parsed.r#type) {
            return false;
        }
        if !self.scopes.is_empty()
            && !parsed
                .scope
                .as_ref()
                .is_some_and(|scope| self.scopes.contains(scope))
        {
            return false;
        }
        true
    }
}

/// A listed commit with its parsed message, if conventional
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub commit: CommitInfo,
    pub parsed: Option<ParsedCommit>,
}

impl LogEntry {
    pub fn short_id(&self) -> String {
        short_id(self.commit.id)
    }
}

/// Collect the commits reachable from `tips` that pass `filter`, newest walk order first
pub fn collect_log<R: Repository>(
    repo: &R,
    tips: impl IntoIterator<Item = Oid>,
    filter: &LogFilter,
) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();

    for commit in Ancestry::from_tips(repo, tips) {
        let commit = repo.read_commit(commit?)?;
        let parsed = ParsedCommit::parse(&commit.message);

        match filter.verdict(&commit, parsed.as_ref()) {
            Verdict::Keep => entries.push(LogEntry { commit, parsed }),
            Verdict::Skip => {}
            Verdict::Stop => {
                debug!("{}: older than the since date, stopping", short_id(commit.id));
                break;
            }
        }
    }

    Ok(entries)
}

/// Parse a date as RFC 3339 or `YYYY-MM-DD` (midnight UTC) into epoch seconds
pub fn parse_date(input: &str) -> Result<i64> {
    let input = input.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Ok(date_time.timestamp());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| {
            SemrelError::validation(format!(
                "Invalid date '{}': expected YYYY-MM-DD or RFC 3339",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{fake_oid, MockRepository, MOCK_EPOCH};

    fn history() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.commit("chore: init");
        repo.commit("feat(api): add endpoint");
        repo.commit("fix(ui)!: drop legacy theme");
        repo.commit("Update README");
        repo.commit("feat(ui): dark mode");
        repo
    }

    fn descriptions(entries: &[LogEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| match &entry.parsed {
                Some(parsed) => parsed.description.clone(),
                None => entry.commit.message.clone(),
            })
            .collect()
    }

    fn log_of(repo: &MockRepository, filter: &LogFilter) -> Vec<String> {
        let head = repo.current_reference().unwrap();
        descriptions(&collect_log(repo, [head], filter).unwrap())
    }

    #[test]
    fn test_no_filter_lists_everything() {
        let repo = history();
        let entries = collect_log(&repo, [repo.current_reference().unwrap()], &LogFilter::default())
            .unwrap();
        assert_eq!(entries.len(), 5);
        assert!(entries[1].parsed.is_none());
        assert_eq!(entries[0].short_id().len(), 7);
    }

    #[test]
    fn test_type_filter() {
        let filter = LogFilter {
            types: vec![CommitType::Feat],
            ..Default::default()
        };
        assert_eq!(log_of(&history(), &filter), vec!["dark mode", "add endpoint"]);
    }

    #[test]
    fn test_scope_filter() {
        let filter = LogFilter {
            scopes: vec!["ui".to_string()],
            ..Default::default()
        };
        assert_eq!(
            log_of(&history(), &filter),
            vec!["dark mode", "drop legacy theme"]
        );
    }

    #[test]
    fn test_breaking_filter() {
        let filter = LogFilter {
            breaking_only: true,
            ..Default::default()
        };
        assert_eq!(log_of(&history(), &filter), vec!["drop legacy theme"]);
    }

    #[test]
    fn test_filters_combine() {
        let filter = LogFilter {
            types: vec![CommitType::Feat, CommitType::Fix],
            scopes: vec!["api".to_string()],
            ..Default::default()
        };
        assert_eq!(log_of(&history(), &filter), vec!["add endpoint"]);
    }

    #[test]
    fn test_since_stops_the_walk() {
        // third commit and younger
        let filter = LogFilter {
            since: Some(MOCK_EPOCH + 2 * 3600),
            ..Default::default()
        };
        assert_eq!(
            log_of(&history(), &filter),
            vec!["dark mode", "Update README", "drop legacy theme"]
        );
    }

    #[test]
    fn test_until_skips_younger_commits() {
        let filter = LogFilter {
            until: Some(MOCK_EPOCH + 3600),
            ..Default::default()
        };
        assert_eq!(log_of(&history(), &filter), vec!["add endpoint", "init"]);
    }

    #[test]
    fn test_side_branches_need_their_tip() {
        let mut repo = history();
        let side = fake_oid(70);
        repo.add_commit(side, "feat(cli): side work", &[fake_oid(1)]);
        repo.add_branch("side", side);

        let filter = LogFilter {
            scopes: vec!["cli".to_string()],
            ..Default::default()
        };
        assert!(log_of(&repo, &filter).is_empty());

        let entries = collect_log(&repo, repo.reference_tips().unwrap(), &filter).unwrap();
        assert_eq!(descriptions(&entries), vec!["side work"]);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1970-01-02").unwrap(), 86_400);
        assert_eq!(parse_date("2020-09-13T12:26:40Z").unwrap(), 1_600_000_000);
        assert_eq!(parse_date("2020-09-13T14:26:40+02:00").unwrap(), 1_600_000_000);
        assert!(matches!(
            parse_date("yesterday").unwrap_err(),
            SemrelError::Validation(_)
        ));
    }
}
