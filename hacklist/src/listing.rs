use log::debug;

use crate::{filter, paginate, sort, Collection, Criteria, Page, PageWindow, Record, SortKey};

/// A listing query: filter, then sort, then paginate.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    criteria: Criteria,
    sort: Vec<SortKey>,
    window: PageWindow,
}

impl Query {
    /// A query for the given page that matches everything in original order.
    pub fn new(window: PageWindow) -> Self {
        Self {
            criteria: Criteria::default(),
            sort: Vec::new(),
            window,
        }
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Append a sort key. Keys added earlier take priority.
    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Run this query against a collection.
    pub fn run<'a>(&self, collection: &'a Collection) -> Page<&'a Record> {
        let mut matched = filter(collection, &self.criteria);
        sort(&mut matched, &self.sort);
        let page = paginate(&matched, self.window);
        debug!(
            "Query on {} matched {} of {} record(s), returning page {} of {}",
            collection.name(),
            page.total_items,
            collection.len(),
            page.number,
            page.total_pages
        );
        page
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Value;
    use serde_json::json;

    fn events() -> Collection {
        Collection::from_value(
            "events",
            Value::try_from(json!([
                {"id": 1, "name": "TechCrunch Delhi", "date": "2023-10-15", "location": "Delhi, India"},
                {"id": 2, "name": "HackBangalore", "date": "2023-11-05", "location": "Bangalore, India"},
                {"id": 3, "name": "Code for India", "date": "2023-12-02", "location": "Mumbai, India"},
                {"id": 4, "name": "AI & ML Summit", "date": "2024-01-20", "location": "Hyderabad, India"},
                {"id": 5, "name": "Delhi Devs", "date": "2023-09-01", "location": "Delhi, India"},
            ]))
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn filter_sort_then_paginate() {
        let events = events();
        let query = Query::new(PageWindow::first(1).unwrap())
            .with_criteria(Criteria::new().with_query("delhi").search_in(["name", "location"]))
            .sorted_by(SortKey::ascending("date"));
        let page = query.run(&events);
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].id(), &Value::from(5));

        let page = Query::new(PageWindow::new(1, 2).unwrap())
            .with_criteria(query.criteria().clone())
            .sorted_by(SortKey::ascending("date"))
            .run(&events);
        assert_eq!(page.items[0].id(), &Value::from(1));
    }

    #[test]
    fn default_query_lists_everything_in_order() {
        let events = events();
        let page = Query::new(PageWindow::first(4).unwrap()).run(&events);
        assert_eq!(page.total_pages, 2);
        let ids = page.items.iter().map(|r| r.id().clone()).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![Value::from(1), Value::from(2), Value::from(3), Value::from(4)]
        );
    }
}
