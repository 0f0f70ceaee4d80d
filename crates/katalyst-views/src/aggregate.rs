//! Figures derived from the `/api/get_data/` snapshot.

use katalyst_protocol::{Contributor, DataSnapshot};

/// Overview page counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverviewTotals {
    pub repositories: usize,
    pub contributors: usize,
    pub commits: usize,
    pub issues: usize,
}

impl OverviewTotals {
    /// Commits and issues are counted from each contributor's works.
    pub fn from_snapshot(snapshot: &DataSnapshot) -> Self {
        let (commits, issues) = snapshot
            .contributors
            .iter()
            .flat_map(|c| c.works.iter())
            .fold((0, 0), |(commits, issues), work| {
                (commits + work.commits.len(), issues + work.issues.len())
            });
        Self {
            repositories: snapshot.repositories.len(),
            contributors: snapshot.contributors.len(),
            commits,
            issues,
        }
    }
}

/// Commits a contributor has in the snapshot.
pub fn contributor_commit_count(contributor: &Contributor) -> usize {
    contributor.works.iter().map(|w| w.commits.len()).sum()
}

/// Top `n` contributors by snapshot commit count, ties in server order.
pub fn top_contributors(snapshot: &DataSnapshot, n: usize) -> Vec<&Contributor> {
    let mut ranked: Vec<&Contributor> = snapshot.contributors.iter().collect();
    ranked.sort_by_key(|c| std::cmp::Reverse(contributor_commit_count(c)));
    ranked.truncate(n);
    ranked
}
