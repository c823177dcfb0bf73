//! Order listing and reporting use cases.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, NaiveTime, Utc};

use crate::application::ports::{OrderStore, OrderWithItems};
use crate::domain::ordering::{Order, OrderError};
use crate::domain::shared::{Money, UserId};

/// Default page size for the recent-orders report.
const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Read-side use cases over the order store.
pub struct ListOrdersUseCase<S>
where
    S: OrderStore,
{
    store: Arc<S>,
}

impl<S> ListOrdersUseCase<S>
where
    S: OrderStore,
{
    /// Create a new use case.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All orders of one user with nested items, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<OrderWithItems>, OrderError> {
        self.store.list_for_user(user_id).await
    }

    /// Every order with nested items, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn all(&self) -> Result<Vec<OrderWithItems>, OrderError> {
        self.store.list_all().await
    }

    /// The latest orders, newest first.
    ///
    /// # Errors
    ///
    /// [`OrderError::Validation`] on a non-positive limit.
    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<Order>, OrderError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        if limit <= 0 {
            return Err(OrderError::Validation(
                "limit must be greater than 0".to_string(),
            ));
        }
        self.store.list_recent(limit).await
    }

    /// Orders placed in `[from, to)`.
    ///
    /// # Errors
    ///
    /// [`OrderError::Validation`] when the range is inverted or empty.
    pub async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderError> {
        if from >= to {
            return Err(OrderError::Validation(
                "'from' must be earlier than 'to'".to_string(),
            ));
        }
        self.store.list_between(from, to).await
    }

    /// Revenue (sum of totals, cancelled orders excluded) for the calendar
    /// month containing `now`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn current_month_revenue(&self, now: DateTime<Utc>) -> Result<Money, OrderError> {
        let (start, end) = month_bounds(now);
        self.store.revenue_between(start, end).await
    }
}

/// `[first day of month, first day of next month)` around `now`, in UTC.
fn month_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    // Day 1 is valid in every month; fall back to the date itself to keep the
    // function total.
    let first = today.with_day0(0).unwrap_or(today);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    (
        first.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    )
}
