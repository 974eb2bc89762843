use serde::{Deserialize, Serialize};

use crate::models::{Order, PackStatus};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Packed,
}

impl StatusFilter {
    fn matches(&self, status: PackStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == PackStatus::Pending,
            StatusFilter::Packed => status == PackStatus::Packed,
        }
    }
}

/// Pickup vs. delivery is decided by a keyword anywhere in the row, not by a
/// dedicated column.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Pickup,
    Delivery,
}

impl CategoryFilter {
    fn keyword(&self) -> Option<&'static str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Pickup => Some("pickup"),
            CategoryFilter::Delivery => Some("delivery"),
        }
    }
}

/// Search box text plus the two dropdowns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub search: String,
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

impl OrderQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            status,
            category,
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        if !self.status.matches(order.status) {
            return false;
        }

        let needle = if self.search.trim().is_empty() {
            String::new()
        } else {
            self.search.to_lowercase()
        };
        let keyword = self.category.keyword();
        if keyword.is_none() && needle.is_empty() {
            return true;
        }

        let text = order.row_text();
        if let Some(keyword) = keyword {
            if !text.contains(keyword) {
                return false;
            }
        }
        needle.is_empty() || text.contains(&needle)
    }
}

/// Status, then category, then free-text search. Surviving orders keep their
/// store order.
pub fn filter_orders<'a>(orders: &'a [Order], query: &OrderQuery) -> Vec<&'a Order> {
    orders.iter().filter(|o| query.matches(o)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use packtrack_core::Header;

    fn order(id: u64, cells: &[&str], status: PackStatus) -> Order {
        let header = Header::new((0..cells.len()).map(|i| format!("c{}", i)).collect());
        let mut o = Order::new(id, cells.iter().map(|s| s.to_string()).collect(), header);
        o.status = status;
        o
    }

    fn sample() -> Vec<Order> {
        vec![
            order(1, &["John Smith", "Self Pickup"], PackStatus::Packed),
            order(2, &["Jane Smith", "Delivery"], PackStatus::Packed),
            order(3, &["Anna SMITH", "pickup at booth"], PackStatus::Pending),
            order(4, &["Bob", "Pickup"], PackStatus::Packed),
            order(5, &["Carl Smithers", "PICKUP"], PackStatus::Packed),
        ]
    }

    fn ids(orders: &[&Order]) -> Vec<u64> {
        orders.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_empty_query_passes_everything() {
        let orders = sample();
        let result = filter_orders(&orders, &OrderQuery::default());
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_composition_is_intersection() {
        let orders = sample();
        let query = OrderQuery::new("SMITH", StatusFilter::Packed, CategoryFilter::Pickup);
        let combined = ids(&filter_orders(&orders, &query));

        let by_status = ids(&filter_orders(
            &orders,
            &OrderQuery::new("", StatusFilter::Packed, CategoryFilter::All),
        ));
        let by_category = ids(&filter_orders(
            &orders,
            &OrderQuery::new("", StatusFilter::All, CategoryFilter::Pickup),
        ));
        let by_search = ids(&filter_orders(
            &orders,
            &OrderQuery::new("smith", StatusFilter::All, CategoryFilter::All),
        ));
        let expected: Vec<u64> = by_status
            .into_iter()
            .filter(|id| by_category.contains(id) && by_search.contains(id))
            .collect();

        assert_eq!(combined, expected);
        assert_eq!(combined, vec![1, 5]);
    }

    #[test]
    fn test_category_matches_any_cell() {
        let orders = sample();
        let result = filter_orders(
            &orders,
            &OrderQuery::new("", StatusFilter::All, CategoryFilter::Delivery),
        );
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_search_spans_cell_boundary() {
        // cells are joined with a single space before matching
        let orders = sample();
        let result = filter_orders(
            &orders,
            &OrderQuery::new("bob pickup", StatusFilter::All, CategoryFilter::All),
        );
        assert_eq!(ids(&result), vec![4]);
    }

    #[test]
    fn test_pending_filter() {
        let orders = sample();
        let result = filter_orders(
            &orders,
            &OrderQuery::new("", StatusFilter::Pending, CategoryFilter::All),
        );
        assert_eq!(ids(&result), vec![3]);
    }
}
