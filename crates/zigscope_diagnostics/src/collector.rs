use crate::Issue;

/// Accumulates issues during a single analysis pass.
///
/// [`IssueCollector::push`] is the canonical append path: a plain
/// `Vec::push`. [`IssueCollector::push_capped`] is a distinct, by-name
/// helper for the `max_issues`-aware path (spec §4.7 `options.max_issues`)
/// that calls `push` once it decides to keep the issue — it never calls
/// itself, so there is no dispatch loop between the two entry points.
#[derive(Debug, Default, Clone)]
pub struct IssueCollector {
    issues: Vec<Issue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Appends `issue` unless `max_issues` is already reached.
    /// Returns `true` if the issue was kept.
    pub fn push_capped(&mut self, issue: Issue, max_issues: Option<usize>) -> bool {
        if let Some(max) = max_issues {
            if self.issues.len() >= max {
                return false;
            }
        }
        self.push(issue);
        true
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_sorted_vec(mut self) -> Vec<Issue> {
        crate::sort_issues(&mut self.issues);
        self.issues
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.issues
    }
}
