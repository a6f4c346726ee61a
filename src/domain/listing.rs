//! Filter, sort and page logic for employee listings.
//!
//! Everything here is pure: it takes the full candidate set and returns a new one.

use std::cmp::Ordering;

use crate::models::{Department, Employee};
use crate::store::EmployeePredicate;

use super::queries::{ListEmployeesQuery, SortType};

/// Optional listing criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<Department>,
}

impl FilterCriteria {
    pub fn from_query(query: &ListEmployeesQuery) -> Self {
        Self {
            name: query.name.clone(),
            email: query.email.clone(),
            department: query.department,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.department.is_none()
    }

    /// Compose the supplied criteria in order name, email, department.
    /// No criteria means match all.
    pub fn predicate(&self) -> EmployeePredicate {
        let mut predicate = EmployeePredicate::All;
        if let Some(name) = &self.name {
            predicate = predicate.and(EmployeePredicate::NameContains(name.clone()));
        }
        if let Some(email) = &self.email {
            predicate = predicate.and(EmployeePredicate::EmailContains(email.clone()));
        }
        if let Some(department) = self.department {
            predicate = predicate.and(EmployeePredicate::DepartmentEquals(department));
        }
        predicate
    }
}

/// Keep the records matching `criteria`, preserving their order.
pub fn apply_filters(criteria: &FilterCriteria, records: Vec<Employee>) -> Vec<Employee> {
    if criteria.is_empty() {
        return records;
    }
    let predicate = criteria.predicate();
    records.into_iter().filter(|e| predicate.matches(e)).collect()
}

/// Column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Email,
    Department,
    DateOfBirth,
}

impl SortField {
    /// Case-insensitive mapping; unknown or missing names sort by name.
    pub fn parse(sort_by: Option<&str>) -> Self {
        let Some(raw) = sort_by else {
            return SortField::Name;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "department" => SortField::Department,
            "email" => SortField::Email,
            "dob" | "dateofbirth" | "date_of_birth" => SortField::DateOfBirth,
            _ => SortField::Name,
        }
    }

    fn compare(&self, a: &Employee, b: &Employee) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Department => a.department.cmp(&b.department),
            SortField::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
        }
    }
}

/// Stable sort: equal keys keep their relative order in both directions.
pub fn apply_ordering(records: &mut [Employee], field: SortField, direction: SortType) {
    match direction {
        SortType::Asc => records.sort_by(|a, b| field.compare(a, b)),
        SortType::Desc => records.sort_by(|a, b| field.compare(b, a)),
    }
}

/// Skip/take window of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: usize,
    pub take: usize,
}

impl PageWindow {
    /// `skip = page_size * page_no`, `take = page_size`.
    pub fn new(page_no: u64, page_size: u64) -> Self {
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        let page = usize::try_from(page_no).unwrap_or(usize::MAX);
        Self {
            skip: take.saturating_mul(page),
            take,
        }
    }
}

pub fn paginate(records: Vec<Employee>, window: PageWindow) -> Vec<Employee> {
    records.into_iter().skip(window.skip).take(window.take).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::employee;

    fn names(records: &[Employee]) -> Vec<&str> {
        records.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_no_criteria_matches_all() {
        let records = vec![
            employee("1", "Alice", "alice@x.com", Department::It),
            employee("2", "Bob", "bob@x.com", Department::Hr),
        ];
        let criteria = FilterCriteria::default();

        assert_eq!(criteria.predicate(), EmployeePredicate::All);
        assert_eq!(apply_filters(&criteria, records).len(), 2);
    }

    #[test]
    fn test_filters_compose() {
        let records = vec![
            employee("1", "Alice Smith", "alice@corp.com", Department::It),
            employee("2", "Alice Jones", "alice@home.com", Department::It),
            employee("3", "Alice Brown", "alice.b@corp.com", Department::Hr),
            employee("4", "Bob", "bob@corp.com", Department::It),
        ];
        let criteria = FilterCriteria {
            name: Some("Alice".to_string()),
            email: Some("corp".to_string()),
            department: Some(Department::It),
        };

        let filtered = apply_filters(&criteria, records);
        assert_eq!(names(&filtered), vec!["Alice Smith"]);
    }

    #[test]
    fn test_email_filter_matches_email_field() {
        let records = vec![
            employee("1", "corp-named", "someone@home.com", Department::It),
            employee("2", "Bob", "bob@corp.com", Department::It),
        ];
        let criteria = FilterCriteria {
            email: Some("corp".to_string()),
            ..Default::default()
        };

        assert_eq!(names(&apply_filters(&criteria, records)), vec!["Bob"]);
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!(SortField::parse(None), SortField::Name);
        assert_eq!(SortField::parse(Some("DEPARTMENT")), SortField::Department);
        assert_eq!(SortField::parse(Some("Email")), SortField::Email);
        assert_eq!(SortField::parse(Some("DoB")), SortField::DateOfBirth);
        assert_eq!(SortField::parse(Some("salary")), SortField::Name);
    }

    #[test]
    fn test_desc_sort_is_stable() {
        let mut records = vec![
            employee("1", "A", "a@x.com", Department::Hr),
            employee("2", "B", "b@x.com", Department::Marketing),
            employee("3", "C", "c@x.com", Department::Hr),
            employee("4", "D", "d@x.com", Department::Marketing),
        ];

        apply_ordering(&mut records, SortField::Department, SortType::Desc);
        assert_eq!(names(&records), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_asc_sort_by_name() {
        let mut records = vec![
            employee("1", "Carol", "c@x.com", Department::Hr),
            employee("2", "Alice", "a@x.com", Department::Hr),
            employee("3", "Bob", "b@x.com", Department::Hr),
        ];

        apply_ordering(&mut records, SortField::Name, SortType::Asc);
        assert_eq!(names(&records), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(PageWindow::new(0, 10), PageWindow { skip: 0, take: 10 });
        assert_eq!(PageWindow::new(2, 10), PageWindow { skip: 20, take: 10 });
        assert_eq!(PageWindow::new(u64::MAX, u64::MAX).skip, usize::MAX);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let records = vec![employee("1", "A", "a@x.com", Department::Hr)];
        assert!(paginate(records, PageWindow::new(1, 10)).is_empty());
    }
}
