//! Ordered, append-only collection of problems.

use std::fmt;
use std::ops::{Add, AddAssign, Index};

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::category::ProblemCategory;
use crate::error::Error;
use crate::problem::Problem;

/// Failure payload of [`Outcome`](crate::Outcome) and
/// [`ValueOutcome`](crate::ValueOutcome).
///
/// Insertion order is preserved and meaningful. The first problem is stored
/// inline, so the common single-problem case does not allocate. Problems can
/// be added but never removed:
///
/// ```compile_fail
/// use modkit_result::{Problem, Problems};
///
/// let mut problems = Problems::from(Problem::not_found("gone"));
/// problems.clear();
/// ```
#[derive(Clone, Default, PartialEq)]
#[must_use]
pub struct Problems {
    items: SmallVec<[Problem; 1]>,
}

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends one problem (`add` in operator form is `problems + problem`).
    pub fn push(&mut self, problem: Problem) {
        self.items.push(problem);
    }

    pub fn add_range<I>(&mut self, problems: I)
    where
        I: IntoIterator<Item = Problem>,
    {
        self.items.extend(problems);
    }

    /// Moves every problem of `other` to the end of this collection.
    pub fn append(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.items.get(index)
    }

    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn try_get(&self, index: usize) -> Result<&Problem, Error> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    #[must_use]
    pub fn first(&self) -> Option<&Problem> {
        self.items.first()
    }

    #[must_use]
    pub fn contains(&self, problem: &Problem) -> bool {
        self.items.contains(problem)
    }

    #[must_use]
    pub fn has_category(&self, category: ProblemCategory) -> bool {
        self.items.iter().any(|p| p.category() == category)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.items.iter()
    }

    /// Mutable access for annotation; only property and extensions of a
    /// problem can change.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Problem> {
        self.items.iter_mut()
    }

    /// Clones every problem into `destination`, starting at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::InsufficientCapacity`] if fewer than `len()` slots
    /// remain after `offset`.
    pub fn copy_to(&self, destination: &mut [Problem], offset: usize) -> Result<(), Error> {
        let required = self.items.len();
        let available = destination.len().saturating_sub(offset);
        let Some(slots) = destination
            .get_mut(offset..)
            .and_then(|rest| rest.get_mut(..required))
        else {
            return Err(Error::InsufficientCapacity {
                available,
                required,
            });
        };
        slots.clone_from_slice(&self.items);
        Ok(())
    }

    /// Applies [`Problem::chain_property`] to every problem.
    pub fn chain_property(&mut self, parent: &str) {
        for problem in &mut self.items {
            problem.chain_property(parent);
        }
    }

    /// Applies [`Problem::chain_indexed_property`] to every problem.
    pub fn chain_indexed_property(&mut self, parent: &str, index: i64) {
        for problem in &mut self.items {
            problem.chain_indexed_property(parent, index);
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Problem> {
        self.items.into_vec()
    }
}

impl Index<usize> for Problems {
    type Output = Problem;

    fn index(&self, index: usize) -> &Problem {
        &self.items[index]
    }
}

impl From<Problem> for Problems {
    fn from(problem: Problem) -> Self {
        let mut items = SmallVec::new();
        items.push(problem);
        Self { items }
    }
}

impl From<Vec<Problem>> for Problems {
    fn from(problems: Vec<Problem>) -> Self {
        Self {
            items: SmallVec::from_vec(problems),
        }
    }
}

impl FromIterator<Problem> for Problems {
    fn from_iter<I: IntoIterator<Item = Problem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<Problem> for Problems {
    fn extend<I: IntoIterator<Item = Problem>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Problems {
    type Item = Problem;
    type IntoIter = smallvec::IntoIter<[Problem; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Problems {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Add<Problem> for Problems {
    type Output = Self;

    fn add(mut self, rhs: Problem) -> Self {
        self.items.push(rhs);
        self
    }
}

impl Add for Problems {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.append(rhs);
        self
    }
}

impl AddAssign<Problem> for Problems {
    fn add_assign(&mut self, rhs: Problem) {
        self.items.push(rhs);
    }
}

impl AddAssign for Problems {
    fn add_assign(&mut self, rhs: Self) {
        self.append(rhs);
    }
}

impl Add<Problem> for Problem {
    type Output = Problems;

    fn add(self, rhs: Problem) -> Problems {
        Problems::from(self) + rhs
    }
}

impl Serialize for Problems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl fmt::Debug for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(problem, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for Problems {}
