//! Success-with-value or problems.

use crate::error::Error;
use crate::outcome::{Outcome, ProblemSource};
use crate::problem::Problem;
use crate::problems::Problems;

/// Either a value or a non-empty list of problems.
///
/// Unlike [`Outcome`], a success cannot silently absorb problems: see
/// [`ValueOutcome::try_accumulate`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ValueOutcome<T> {
    Success(T),
    #[non_exhaustive]
    Failure { problems: Problems },
}

impl<T> ValueOutcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// # Errors
    /// Returns [`Error::EmptyProblems`] if `problems` is empty.
    pub fn failure(problems: Problems) -> Result<Self, Error> {
        if problems.is_empty() {
            return Err(Error::EmptyProblems);
        }
        Ok(Self::Failure { problems })
    }

    /// Collects every value, or every problem of every failure in order.
    pub fn collect_all<I>(outcomes: I) -> ValueOutcome<Vec<T>>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut values = Vec::new();
        let mut problems = Problems::new();
        for outcome in outcomes {
            match outcome {
                Self::Success(value) => values.push(value),
                Self::Failure { problems: more } => problems.append(more),
            }
        }
        if problems.is_empty() {
            ValueOutcome::Success(values)
        } else {
            ValueOutcome::Failure { problems }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn problems(&self) -> Option<&Problems> {
        match self {
            Self::Success(_) => None,
            Self::Failure { problems } => Some(problems),
        }
    }

    /// Exhaustive case analysis.
    #[must_use]
    pub fn match_with<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Problems) -> R,
    ) -> R {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure { problems } => on_failure(problems),
        }
    }

    /// Transforms the value; problems pass through untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueOutcome<U> {
        match self {
            Self::Success(value) => ValueOutcome::Success(f(value)),
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Runs the next value-producing step on success.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> ValueOutcome<U>) -> ValueOutcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure { problems } => ValueOutcome::Failure { problems },
        }
    }

    /// Runs a step without a value on success.
    pub fn and_then_outcome(self, f: impl FnOnce(T) -> Outcome) -> Outcome {
        match self {
            Self::Success(value) => f(value),
            Self::Failure { problems } => Outcome::Failure { problems },
        }
    }

    /// Drops the value, keeping only success or failure.
    pub fn discard_value(self) -> Outcome {
        self.and_then_outcome(|_| Outcome::Success)
    }

    /// Recovers from a failure.
    pub fn or_else(self, f: impl FnOnce(Problems) -> Self) -> Self {
        match self {
            success @ Self::Success(_) => success,
            Self::Failure { problems } => f(problems),
        }
    }

    pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    pub fn inspect_failure(self, f: impl FnOnce(&Problems)) -> Self {
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

    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        self.into_value().unwrap_or(default)
    }

    #[must_use]
    pub fn unwrap_or_else(self, f: impl FnOnce(Problems) -> T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure { problems } => f(problems),
        }
    }

    /// Appends problems to a failure.
    ///
    /// Accumulating nothing (an empty collection or a successful outcome)
    /// returns `self` unchanged.
    ///
    /// # Errors
    /// Returns [`Error::AccumulateIntoSuccess`] if `self` is a success and
    /// `rhs` has problems: there is no way to keep both the value and them.
    pub fn try_accumulate(self, rhs: impl ProblemSource) -> Result<Self, Error> {
        let incoming = rhs.collect_problems();
        if incoming.is_empty() {
            return Ok(self);
        }
        match self {
            Self::Success(_) => Err(Error::AccumulateIntoSuccess),
            Self::Failure { mut problems } => {
                problems.append(incoming);
                Ok(Self::Failure { problems })
            }
        }
    }

    /// Returns the value, or raises the problems as an error.
    ///
    /// # Errors
    /// Returns [`Error::Unsuccessful`] carrying the problems on failure.
    pub fn ensure_has_value(self) -> Result<T, Error> {
        self.into_result().map_err(Error::Unsuccessful)
    }

    /// # Errors
    /// Returns the problems on failure.
    pub fn into_result(self) -> Result<T, Problems> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure { problems } => Err(problems),
        }
    }
}

impl<T> From<Problem> for ValueOutcome<T> {
    fn from(problem: Problem) -> Self {
        Self::Failure {
            problems: Problems::from(problem),
        }
    }
}

impl<T> TryFrom<Problems> for ValueOutcome<T> {
    type Error = Error;

    fn try_from(problems: Problems) -> Result<Self, Error> {
        Self::failure(problems)
    }
}

impl<T> From<Result<T, Problem>> for ValueOutcome<T> {
    fn from(result: Result<T, Problem>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(problem) => Self::from(problem),
        }
    }
}

impl<T> From<ValueOutcome<T>> for Result<T, Problems> {
    fn from(outcome: ValueOutcome<T>) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn parse(input: &str) -> ValueOutcome<u32> {
        match input.parse::<u32>() {
            Ok(n) => ValueOutcome::success(n),
            Err(_) => Problem::invalid_parameter(format!("'{input}' is not a number"))
                .with_property("input")
                .into(),
        }
    }

    #[test]
    fn map_preserves_success_state() {
        assert_eq!(parse("4").map(|n| n * 2).into_value(), Some(8));
        let failure = parse("x");
        let before = failure.problems().cloned();
        let mapped = failure.map(|n| n * 2);
        assert!(mapped.is_failure());
        assert_eq!(mapped.problems().cloned(), before);
    }

    #[test]
    fn and_then_chains_and_short_circuits() {
        let halve = |n: u32| {
            if n % 2 == 0 {
                ValueOutcome::success(n / 2)
            } else {
                ValueOutcome::from(Problem::invalid_state(format!("{n} is odd")))
            }
        };
        assert_eq!(parse("8").and_then(halve).and_then(halve).into_value(), Some(2));
        let failed = parse("3").and_then(halve);
        assert_eq!(
            failed.problems().and_then(Problems::first).map(Problem::detail),
            Some("3 is odd")
        );
        let untouched = parse("x").and_then(halve);
        assert_eq!(
            untouched.problems().and_then(Problems::first).map(Problem::detail),
            Some("'x' is not a number")
        );
    }

    #[test]
    fn try_accumulate_on_success_is_an_error() {
        let success = || ValueOutcome::success(1);
        assert!(matches!(
            success().try_accumulate(Problem::not_found("a")),
            Err(Error::AccumulateIntoSuccess)
        ));
        assert!(matches!(
            success().try_accumulate(Problem::not_found("a") + Problem::not_found("b")),
            Err(Error::AccumulateIntoSuccess)
        ));
        assert!(matches!(
            success().try_accumulate(Outcome::from(Problem::internal("c"))),
            Err(Error::AccumulateIntoSuccess)
        ));
        assert!(matches!(
            success().try_accumulate(ValueOutcome::<()>::from(Problem::internal("d"))),
            Err(Error::AccumulateIntoSuccess)
        ));
        assert!(success().try_accumulate(Outcome::success()).is_ok());
    }

    #[test]
    fn try_accumulate_on_failure_appends() {
        let outcome = parse("x")
            .try_accumulate(Problem::not_found("a"))
            .and_then(|o| o.try_accumulate(ValueOutcome::<u8>::from(Problem::internal("b"))))
            .unwrap();
        let details: Vec<_> = outcome
            .problems()
            .map(|p| p.iter().map(Problem::detail).collect())
            .unwrap_or_default();
        assert_eq!(details, ["'x' is not a number", "a", "b"]);
    }

    #[test]
    fn collect_all_gathers_every_problem() {
        let all = ValueOutcome::collect_all(["1", "2", "3"].map(parse));
        assert_eq!(all.into_value(), Some(vec![1, 2, 3]));

        let mixed = ValueOutcome::collect_all(["1", "a", "b"].map(parse));
        assert_eq!(mixed.problems().map(Problems::len), Some(2));
    }

    #[test]
    fn or_else_recovers() {
        assert_eq!(parse("x").or_else(|_| ValueOutcome::success(0)).into_value(), Some(0));
        assert_eq!(parse("x").unwrap_or(7), 7);
        assert_eq!(parse("x").unwrap_or_else(|p| u32::try_from(p.len()).unwrap()), 1);
    }

    #[test]
    fn ensure_has_value() {
        assert_eq!(parse("9").ensure_has_value().unwrap(), 9);
        let err = parse("x").ensure_has_value().unwrap_err();
        assert!(matches!(err, Error::Unsuccessful(_)));
        assert!(err.to_string().contains("'x' is not a number"));
    }

    #[test]
    fn chain_property_on_failure() {
        let outcome = parse("x").chain_indexed_property("values", 0);
        assert_eq!(
            outcome.problems().and_then(Problems::first).and_then(Problem::property),
            Some("values[0].input")
        );
    }

    #[test]
    fn map_problems_keeps_the_failure_non_empty() {
        let outcome = parse("x").map_problems(|problem| problem.replace_property(None));
        assert_eq!(outcome.problems().map(Problems::len), Some(1));
        assert_eq!(
            outcome.problems().and_then(Problems::first).and_then(Problem::property),
            None
        );
        assert_eq!(parse("2").map_problems(|p| p.replace_property(None)).into_value(), Some(2));
    }

    #[test]
    fn conversions() {
        let ok: Result<u32, Problems> = parse("1").into();
        assert_eq!(ok.ok(), Some(1));
        let from_result: ValueOutcome<u32> = Err(Problem::not_found("gone")).into();
        assert!(from_result.is_failure());
        assert!(ValueOutcome::<u32>::try_from(Problems::new()).is_err());
        assert!(parse("3").discard_value().is_success());
    }
}
