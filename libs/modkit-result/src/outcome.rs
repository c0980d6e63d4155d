//! Success-or-problems outcome without a value.

use std::ops::{Add, AddAssign};

use crate::error::Error;
use crate::problem::Problem;
use crate::problems::Problems;
use crate::value_outcome::ValueOutcome;

/// Anything that contributes problems to an accumulation.
///
/// Successful outcomes contribute nothing.
pub trait ProblemSource {
    fn collect_problems(self) -> Problems;
}

impl ProblemSource for Problem {
    fn collect_problems(self) -> Problems {
        Problems::from(self)
    }
}

impl ProblemSource for Problems {
    fn collect_problems(self) -> Problems {
        self
    }
}

impl ProblemSource for Outcome {
    fn collect_problems(self) -> Problems {
        match self {
            Self::Success => Problems::new(),
            Self::Failure { problems } => problems,
        }
    }
}

impl<T> ProblemSource for ValueOutcome<T> {
    fn collect_problems(self) -> Problems {
        match self {
            Self::Success(_) => Problems::new(),
            Self::Failure { problems } => problems,
        }
    }
}

/// Either a plain success or a non-empty list of problems.
///
/// Failures are built through [`Outcome::failure`], `From<Problem>` or
/// accumulation, all of which keep the problem list non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub enum Outcome {
    #[default]
    Success,
    #[non_exhaustive]
    Failure { problems: Problems },
}

impl Outcome {
    pub fn success() -> Self {
        Self::Success
    }

    /// # Errors
    /// Returns [`Error::EmptyProblems`] if `problems` is empty.
    pub fn failure(problems: Problems) -> Result<Self, Error> {
        if problems.is_empty() {
            return Err(Error::EmptyProblems);
        }
        Ok(Self::Failure { problems })
    }

    /// Folds several outcomes, keeping every problem in order.
    pub fn combine<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        outcomes.into_iter().fold(Self::Success, Add::add)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    #[must_use]
    pub fn problems(&self) -> Option<&Problems> {
        match self {
            Self::Success => None,
            Self::Failure { problems } => Some(problems),
        }
    }

    /// Exhaustive case analysis.
    #[must_use]
    pub fn match_with<R>(
        self,
        on_success: impl FnOnce() -> R,
        on_failure: impl FnOnce(Problems) -> R,
    ) -> R {
        match self {
            Self::Success => on_success(),
            Self::Failure { problems } => on_failure(problems),
        }
    }

    /// Produces a value on success; problems pass through untouched.
    pub fn map<U>(self, f: impl FnOnce() -> U) -> ValueOutcome<U> {
        match self {
            Self::Success => ValueOutcome::Success(f()),
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Runs the next step on success, short-circuiting on failure.
    pub fn and_then(self, f: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Success => f(),
            failure @ Self::Failure { .. } => failure,
        }
    }

    /// Runs a value-producing step on success.
    pub fn and_then_value<U>(self, f: impl FnOnce() -> ValueOutcome<U>) -> ValueOutcome<U> {
        match self {
            Self::Success => f(),
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Runs a side effect on success.
    pub fn on_success(self, f: impl FnOnce()) -> Self {
        if self.is_success() {
            f();
        }
        self
    }

    /// Runs a side effect on failure.
    pub fn on_failure(self, f: impl FnOnce(&Problems)) -> Self {
        if let Self::Failure { problems } = &self {
            f(problems);
        }
        self
    }

    /// Annotates each problem of a failure in place.
    ///
    /// The closure sees one problem at a time, so a failure never loses
    /// its problems.
    pub fn map_problems(mut self, mut f: impl FnMut(&mut Problem)) -> Self {
        if let Self::Failure { problems } = &mut self {
            for problem in problems.iter_mut() {
                f(problem);
            }
        }
        self
    }

    /// Prefixes every problem's property with `parent` on failure.
    pub fn chain_property(self, parent: &str) -> Self {
        self.map_problems(|problem| problem.chain_property(parent))
    }

    /// Prefixes every problem's property with `parent[index]` on failure.
    pub fn chain_indexed_property(self, parent: &str, index: i64) -> Self {
        self.map_problems(|problem| problem.chain_indexed_property(parent, index))
    }

    /// Converts a failure into [`Error::Unsuccessful`].
    ///
    /// # Errors
    /// Returns [`Error::Unsuccessful`] carrying the problems on failure.
    pub fn ensure_success(self) -> Result<(), Error> {
        self.into_result().map_err(Error::Unsuccessful)
    }

    /// # Errors
    /// Returns the problems on failure.
    pub fn into_result(self) -> Result<(), Problems> {
        match self {
            Self::Success => Ok(()),
            Self::Failure { problems } => Err(problems),
        }
    }

    /// Appends `rhs`'s problems, turning a success into a failure when
    /// there is anything to append.
    fn accumulate(self, rhs: impl ProblemSource) -> Self {
        let incoming = rhs.collect_problems();
        if incoming.is_empty() {
            return self;
        }
        match self {
            Self::Success => Self::Failure { problems: incoming },
            Self::Failure { mut problems } => {
                problems.append(incoming);
                Self::Failure { problems }
            }
        }
    }
}

impl<R: ProblemSource> Add<R> for Outcome {
    type Output = Self;

    fn add(self, rhs: R) -> Self {
        self.accumulate(rhs)
    }
}

impl<R: ProblemSource> AddAssign<R> for Outcome {
    fn add_assign(&mut self, rhs: R) {
        *self = std::mem::take(self).accumulate(rhs);
    }
}

impl From<Problem> for Outcome {
    fn from(problem: Problem) -> Self {
        Self::Failure {
            problems: Problems::from(problem),
        }
    }
}

impl TryFrom<Problems> for Outcome {
    type Error = Error;

    fn try_from(problems: Problems) -> Result<Self, Error> {
        Self::failure(problems)
    }
}

impl From<Result<(), Problem>> for Outcome {
    fn from(result: Result<(), Problem>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(problem) => Self::from(problem),
        }
    }
}

impl From<Outcome> for Result<(), Problems> {
    fn from(outcome: Outcome) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::category::ProblemCategory;

    #[test]
    fn failure_rejects_empty_problems() {
        assert!(matches!(
            Outcome::failure(Problems::new()),
            Err(Error::EmptyProblems)
        ));
        assert!(Outcome::try_from(Problems::new()).is_err());
        assert!(Outcome::failure(Problems::from(Problem::not_found("x"))).is_ok());
    }

    #[test]
    fn accumulating_into_success_flips_to_failure() {
        let outcome = Outcome::success() + Problem::invalid_state("locked");
        assert!(outcome.is_failure());

        let outcome = Outcome::success() + (Problem::not_found("a") + Problem::not_found("b"));
        assert_eq!(outcome.problems().map(Problems::len), Some(2));

        let outcome = Outcome::success() + Outcome::from(Problem::not_allowed("no"));
        assert!(outcome.is_failure());

        let outcome =
            Outcome::success() + ValueOutcome::<u8>::from(Problem::validation_failed("bad"));
        assert_eq!(
            outcome.problems().and_then(Problems::first).map(Problem::category),
            Some(ProblemCategory::ValidationFailed)
        );
    }

    #[test]
    fn accumulating_nothing_keeps_success() {
        let outcome = Outcome::success() + Problems::new() + Outcome::success();
        assert!(outcome.is_success());
        let outcome = Outcome::success() + ValueOutcome::success(1);
        assert!(outcome.is_success());
    }

    #[test]
    fn accumulating_into_failure_appends_in_order() {
        let mut outcome = Outcome::from(Problem::not_found("a"));
        outcome += Problem::invalid_parameter("b");
        outcome += Outcome::from(Problem::internal("c"));
        let details: Vec<_> = outcome
            .problems()
            .map(|p| p.iter().map(Problem::detail).collect())
            .unwrap_or_default();
        assert_eq!(details, ["a", "b", "c"]);
    }

    #[test]
    fn combine_keeps_every_problem() {
        let outcome = Outcome::combine([
            Outcome::success(),
            Outcome::from(Problem::not_found("a")),
            Outcome::success(),
            Outcome::from(Problem::invalid_state("b")),
        ]);
        assert_eq!(outcome.problems().map(Problems::len), Some(2));
        assert!(Outcome::combine(Vec::new()).is_success());
    }

    #[test]
    fn and_then_short_circuits() {
        let mut ran = false;
        let outcome = Outcome::from(Problem::not_found("a")).and_then(|| {
            ran = true;
            Outcome::success()
        });
        assert!(!ran);
        assert!(outcome.is_failure());

        let outcome = Outcome::success().and_then(|| Outcome::from(Problem::internal("late")));
        assert_eq!(
            outcome.problems().and_then(Problems::first).map(Problem::detail),
            Some("late")
        );
    }

    #[test]
    fn map_produces_value_or_propagates() {
        assert_eq!(Outcome::success().map(|| 5).into_value(), Some(5));
        let failure = Outcome::from(Problem::not_found("a"));
        let expected = failure.problems().cloned();
        let mapped = failure.map(|| 5);
        assert_eq!(mapped.problems().cloned(), expected);
    }

    #[test]
    fn match_with_and_side_effects() {
        let mut seen = 0;
        let text = Outcome::from(Problem::not_found("a"))
            .on_success(|| seen += 1)
            .on_failure(|p| seen += p.len() * 10)
            .match_with(|| "ok".to_owned(), |p| ToString::to_string(&p));
        assert_eq!(seen, 10);
        assert_eq!(text, "Category: NotFound, Details: a");
    }

    #[test]
    fn chain_property_on_failure() {
        let outcome = Outcome::from(Problem::invalid_parameter("bad").with_property("zip"))
            .chain_property("address")
            .chain_indexed_property("people", 1);
        assert_eq!(
            outcome.problems().and_then(Problems::first).and_then(Problem::property),
            Some("people[1].address.zip")
        );
    }

    #[test]
    fn map_problems_annotates_without_emptying() {
        let outcome = (Outcome::from(Problem::not_found("a")) + Problem::internal("b"))
            .map_problems(|problem| problem.insert_extension("request", "r-1"));
        let problems = outcome.problems().unwrap();
        assert_eq!(problems.len(), 2);
        assert!(
            problems
                .iter()
                .all(|p| p.extension("request") == Some(&serde_json::json!("r-1")))
        );

        let mut calls = 0;
        let outcome = Outcome::success().map_problems(|_| calls += 1);
        assert!(outcome.is_success());
        assert_eq!(calls, 0);
    }

    #[test]
    fn ensure_success() {
        assert!(Outcome::success().ensure_success().is_ok());
        let err = Outcome::from(Problem::not_allowed("nope"))
            .ensure_success()
            .unwrap_err();
        assert_eq!(err.problems().map(Problems::len), Some(1));
    }
}
