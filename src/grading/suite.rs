//! Suites: every group of one grading run, and the total score.
use super::context::RunContext;
use super::group::{Group, GroupResult, GroupSummary};
use super::namespace::Namespace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Ordered groups making up one full grading run.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    groups: Vec<Group>,
}

impl Suite {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn execute(&self, ctx: &RunContext, namespace: &Namespace) -> SuiteResult<'_> {
        self.execute_observed(ctx, namespace, |_| {})
    }

    /// Run every group in order, handing each result to `on_group` as soon as
    /// it is graded. A failing group never stops later groups.
    pub fn execute_observed<F>(
        &self,
        ctx: &RunContext,
        namespace: &Namespace,
        mut on_group: F,
    ) -> SuiteResult<'_>
    where
        F: FnMut(&GroupResult<'_>),
    {
        let mut group_results = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            tracing::info!(group = %group.name(), "grading group");
            let result = group.execute(ctx, namespace);
            tracing::info!(
                group = %group.name(),
                score_earned = result.score_earned(),
                score_weight = group.score_weight(),
                "group graded"
            );
            on_group(&result);
            group_results.push(result);
        }
        let result = SuiteResult { group_results };
        tracing::info!(
            score_earned = result.score_earned(),
            total_weight = result.total_weight(),
            "suite graded"
        );
        result
    }

    /// All-`skipped` result, for when the artifact could not be loaded.
    pub fn skip_all(&self) -> SuiteResult<'_> {
        SuiteResult {
            group_results: self.groups.iter().map(Group::skip_all).collect(),
        }
    }
}

/// Outcome of a suite run.
#[derive(Debug, Clone)]
pub struct SuiteResult<'a> {
    group_results: Vec<GroupResult<'a>>,
}

impl<'a> SuiteResult<'a> {
    pub fn group_results(&self) -> &[GroupResult<'a>] {
        &self.group_results
    }

    /// Widened so that no combination of `u32` weights overflows.
    pub fn total_weight(&self) -> u64 {
        self.group_results
            .iter()
            .map(|result| u64::from(result.group().score_weight()))
            .sum()
    }

    pub fn score_earned(&self) -> u64 {
        self.group_results
            .iter()
            .map(|result| u64::from(result.score_earned()))
            .sum()
    }

    pub fn is_perfect(&self) -> bool {
        self.group_results.iter().all(GroupResult::is_accepted)
    }

    pub fn summary(&self) -> SuiteSummary {
        SuiteSummary {
            total_weight: self.total_weight(),
            score_earned: self.score_earned(),
            test_groups: self
                .group_results
                .iter()
                .map(GroupResult::summary)
                .collect(),
        }
    }
}

/// Serialized report of a suite run. Field order is part of the format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuiteSummary {
    pub total_weight: u64,
    pub score_earned: u64,
    pub test_groups: Vec<GroupSummary>,
}

impl SuiteSummary {
    /// Pretty JSON with two-space indentation and unescaped Unicode.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize suite report")
    }
}
