use std::ops::RangeInclusive;

use packtrack_core::{Header, ParsedBatch, RawRow};
use tracing::{debug, info};

use crate::models::{Order, OrderStats, PackStatus};
use crate::search::{filter_orders, OrderQuery};

/// Owns every imported order, the id counter and the current display header
pub struct OrderStore {
    orders: Vec<Order>,
    next_id: u64,
    header: Option<Header>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            next_id: 1,
            header: None,
        }
    }

    /// Rebuild a store from persisted orders and counter.
    ///
    /// The counter is raised past the highest existing id so ids are never
    /// handed out twice. The current header is taken from the last order.
    pub fn from_parts(orders: Vec<Order>, next_id: u64) -> Self {
        let floor = orders.iter().map(|o| o.id).max().map_or(1, |max| max + 1);
        let header = orders.last().map(|o| o.headers.clone());
        Self {
            orders,
            next_id: next_id.max(floor),
            header,
        }
    }

    /// Append one pending order per row. Returns the ids handed out.
    pub fn import_batch(&mut self, rows: Vec<RawRow>, header: Header) -> RangeInclusive<u64> {
        let first = self.next_id;
        for row in rows {
            let id = self.next_id;
            self.next_id += 1;
            self.orders.push(Order::new(id, row, header.clone()));
        }
        let last = self.next_id - 1;
        info!("Imported orders {}..={} ({} columns)", first, last, header.len());
        self.header = Some(header);
        first..=last
    }

    pub fn import_parsed(&mut self, batch: ParsedBatch) -> RangeInclusive<u64> {
        self.import_batch(batch.rows, batch.header)
    }

    pub fn get(&self, id: u64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Unknown ids are ignored; the return value tells whether anything changed.
    pub fn set_status(&mut self, id: u64, status: PackStatus) -> bool {
        match self.get_mut(id) {
            Some(order) => {
                order.update_status(status);
                debug!("Order {} -> {}", id, status);
                true
            }
            None => false,
        }
    }

    /// Flip pending/packed. Returns the new status.
    pub fn toggle_status(&mut self, id: u64) -> Option<PackStatus> {
        let order = self.get_mut(id)?;
        let next = order.status.toggled();
        order.update_status(next);
        debug!("Order {} toggled to {}", id, next);
        Some(next)
    }

    pub fn set_notes(&mut self, id: u64, notes: &str) -> bool {
        match self.get_mut(id) {
            Some(order) => {
                order.notes = notes.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop every order and restart ids at 1.
    pub fn clear(&mut self) {
        info!("Clearing {} orders", self.orders.len());
        self.orders.clear();
        self.next_id = 1;
        self.header = None;
    }

    /// All orders in insertion order.
    pub fn snapshot(&self) -> &[Order] {
        &self.orders
    }

    pub fn filter(&self, query: &OrderQuery) -> Vec<&Order> {
        filter_orders(&self.orders, query)
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Header of the most recent import.
    pub fn current_header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn stats(&self) -> OrderStats {
        let packed = self
            .orders
            .iter()
            .filter(|o| o.status == PackStatus::Packed)
            .count();
        OrderStats {
            total: self.orders.len(),
            pending: self.orders.len() - packed,
            packed,
        }
    }

    /// Plain-text diagnostic report: counts, header preview, first two orders.
    pub fn describe(&self) -> String {
        let stats = self.stats();
        let mut lines = vec![
            format!("orders: {}", stats.total),
            format!("pending: {}", stats.pending),
            format!("packed: {}", stats.packed),
        ];

        let names: &[String] = self.header.as_ref().map(|h| h.names()).unwrap_or_default();
        lines.push(format!("columns: {}", names.len()));
        for (i, name) in names.iter().take(5).enumerate() {
            let shown = if name.is_empty() { "(empty)" } else { name.as_str() };
            lines.push(format!("  {}. {}", i + 1, shown));
        }
        if names.len() > 5 {
            lines.push(format!("  ... {} more", names.len() - 5));
        }

        for order in self.orders.iter().take(2) {
            lines.push(format!(
                "order {} [{}] {} cells",
                order.id,
                order.status,
                order.row_data.len()
            ));
            for (i, value) in order.row_data.iter().take(3).enumerate() {
                let name = order
                    .headers
                    .get(i)
                    .filter(|n| !n.is_empty())
                    .unwrap_or("(unnamed)");
                lines.push(format!("  [{}] {}: {}", i, name, preview(value, 40)));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

fn preview(value: &str, max_chars: usize) -> String {
    if value.is_empty() {
        return "(empty)".to_string();
    }
    let flat = value.replace('\n', "\\n");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Header {
        Header::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn rows(n: usize) -> Vec<RawRow> {
        (0..n).map(|i| vec![format!("row {}", i), String::new()]).collect()
    }

    #[test]
    fn test_ids_are_sequential_across_batches() {
        let mut store = OrderStore::new();
        store.import_batch(rows(2), header(&["A", "B"]));
        store.clear();

        let first = store.import_batch(rows(3), header(&["A", "B"]));
        let second = store.import_batch(rows(3), header(&["A", "B"]));

        assert_eq!(first, 1..=3);
        assert_eq!(second, 4..=6);
        let ids: Vec<u64> = store.snapshot().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_batch_shares_one_header() {
        let mut store = OrderStore::new();
        let h = header(&["A", "B"]);
        store.import_batch(rows(2), h.clone());

        let orders = store.snapshot();
        assert!(orders[0].headers.shares_with(&orders[1].headers));
        assert!(store.current_header().unwrap().shares_with(&h));
    }

    #[test]
    fn test_status_and_notes_updates() {
        let mut store = OrderStore::new();
        store.import_batch(rows(2), header(&["A", "B"]));

        assert!(store.set_status(2, PackStatus::Packed));
        assert!(store.set_notes(1, "fragile"));
        assert_eq!(store.get(2).unwrap().status, PackStatus::Packed);
        assert_eq!(store.get(1).unwrap().notes, "fragile");

        assert_eq!(store.toggle_status(2), Some(PackStatus::Pending));
        assert_eq!(store.toggle_status(1), Some(PackStatus::Packed));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut store = OrderStore::new();
        store.import_batch(rows(1), header(&["A", "B"]));

        assert!(!store.set_status(99, PackStatus::Packed));
        assert!(!store.set_notes(99, "x"));
        assert_eq!(store.toggle_status(99), None);
        assert_eq!(store.stats().pending, 1);
    }

    #[test]
    fn test_stats() {
        let mut store = OrderStore::new();
        store.import_batch(rows(3), header(&["A", "B"]));
        store.set_status(1, PackStatus::Packed);

        assert_eq!(
            store.stats(),
            OrderStats { total: 3, pending: 2, packed: 1 }
        );
    }

    #[test]
    fn test_from_parts_keeps_counter_ahead_of_ids() {
        let h = header(&["A"]);
        let orders = vec![
            Order::new(4, vec!["x".to_string()], h.clone()),
            Order::new(9, vec!["y".to_string()], h.clone()),
        ];
        let store = OrderStore::from_parts(orders, 3);

        assert_eq!(store.next_id(), 10);
        assert_eq!(store.current_header(), Some(&h));
    }

    #[test]
    fn test_describe_mentions_counts_and_columns() {
        let mut store = OrderStore::new();
        store.import_batch(
            vec![vec!["line1\nline2".to_string(), "b".to_string()]],
            header(&["Address", ""]),
        );
        let text = store.describe();

        assert!(text.contains("orders: 1"));
        assert!(text.contains("columns: 2"));
        assert!(text.contains("2. (empty)"));
        assert!(text.contains("line1\\nline2"));
    }
}
