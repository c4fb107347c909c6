//! Groups: weighted, ordered cases graded all-or-nothing.
use super::case::{Case, CaseResult, Judgement};
use super::context::RunContext;
use super::namespace::Namespace;
use serde::{Deserialize, Serialize};

/// Ordered cases sharing one score weight and a failure cascade.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    score_weight: u32,
    cases: Vec<Case>,
}

impl Group {
    pub fn new(name: impl Into<String>, score_weight: u32, cases: Vec<Case>) -> Self {
        Self {
            name: name.into(),
            score_weight,
            cases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score_weight(&self) -> u32 {
        self.score_weight
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Run cases in order. After the first non-accepted case the rest are
    /// skipped unless `force_grade_all` is set; every case yields a result.
    pub fn execute(&self, ctx: &RunContext, namespace: &Namespace) -> GroupResult<'_> {
        let mut accepted = true;
        let mut case_results = Vec::with_capacity(self.cases.len());
        for (idx, case) in self.cases.iter().enumerate() {
            if !accepted && !ctx.force_grade_all {
                case_results.push(case.do_skip());
                continue;
            }
            let result = case.execute(ctx, namespace);
            tracing::debug!(
                group = %self.name,
                case = idx + 1,
                judgement = %result.judgement(),
                "case graded"
            );
            accepted = accepted && result.is_accepted();
            case_results.push(result);
        }
        GroupResult::new(self, case_results, true)
    }

    /// Result with every case skipped, for runs where nothing can execute.
    /// Never accepted, even for a group without cases.
    pub fn skip_all(&self) -> GroupResult<'_> {
        let case_results = self.cases.iter().map(Case::do_skip).collect();
        GroupResult::new(self, case_results, false)
    }
}

/// Outcome of one group, one case result per declared case.
#[derive(Debug, Clone)]
pub struct GroupResult<'a> {
    group: &'a Group,
    case_results: Vec<CaseResult>,
    /// False when the cases were never run.
    graded: bool,
}

impl<'a> GroupResult<'a> {
    fn new(group: &'a Group, case_results: Vec<CaseResult>, graded: bool) -> Self {
        Self {
            group,
            case_results,
            graded,
        }
    }

    pub fn group(&self) -> &'a Group {
        self.group
    }

    pub fn case_results(&self) -> &[CaseResult] {
        &self.case_results
    }

    pub fn is_accepted(&self) -> bool {
        self.graded && self.case_results.iter().all(CaseResult::is_accepted)
    }

    /// Full weight when every case is accepted, otherwise zero.
    pub fn score_earned(&self) -> u32 {
        if self.is_accepted() {
            self.group.score_weight
        } else {
            0
        }
    }

    pub fn skipped_testcases(&self) -> usize {
        self.case_results
            .iter()
            .filter(|result| result.judgement() == Judgement::Skipped)
            .count()
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            group_name: self.group.name.clone(),
            score_weight: self.group.score_weight,
            score_earned: self.score_earned(),
            is_accepted: self.is_accepted(),
            sub_results: self
                .case_results
                .iter()
                .map(CaseResult::judgement)
                .collect(),
        }
    }
}

/// Serialized form of a group result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupSummary {
    pub group_name: String,
    pub score_weight: u32,
    pub score_earned: u32,
    pub is_accepted: bool,
    pub sub_results: Vec<Judgement>,
}
