use super::payment::Payment;
use crate::error::PaymentError;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Amount,
    DebitCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Ordering requested by the caller, written as `field` or `field,direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub fn compare(&self, a: &Payment, b: &Payment) -> Ordering {
        let ordering = match self.field {
            SortField::Id => a.id().cmp(&b.id()),
            SortField::Amount => a.amount().value().cmp(&b.amount().value()),
            SortField::DebitCode => a.debit_code().cmp(b.debit_code()),
        };
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Sort {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaymentError::InvalidSort(s.to_string());
        let (field, direction) = match s.split_once(',') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s, None),
        };

        let field = match field.trim().to_lowercase().as_str() {
            "id" => SortField::Id,
            "amount" => SortField::Amount,
            "debit_code" | "debitcode" => SortField::DebitCode,
            _ => return Err(invalid()),
        };
        let direction = match direction.map(|d| d.trim().to_lowercase()) {
            None => Direction::Asc,
            Some(d) if d == "asc" => Direction::Asc,
            Some(d) if d == "desc" => Direction::Desc,
            Some(_) => return Err(invalid()),
        };

        Ok(Self { field, direction })
    }
}

/// Which slice of a result set to return. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    pub const DEFAULT_SIZE: usize = 20;

    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Sorts (when asked to) and slices a full result set.
    ///
    /// `payments` is expected in storage order; without a sort that order is
    /// preserved.
    pub fn paginate(&self, mut payments: Vec<Payment>) -> Page<Payment> {
        if let Some(sort) = self.sort {
            payments.sort_by(|a, b| sort.compare(a, b));
        }
        let total_elements = payments.len();
        let content = payments
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect();

        Page {
            content,
            page: self.page,
            size: self.size,
            total_elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.size.max(1))
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.total_pages()
    }
}
