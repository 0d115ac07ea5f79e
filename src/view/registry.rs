//! Ordered, cyclable set of views with a cursor.

use super::{MetricView, ViewKind};

/// Fixed list of views built at startup; the cursor wraps both ways.
pub struct ViewRegistry {
    views: Vec<Box<dyn MetricView>>,
    cursor: usize,
}

impl ViewRegistry {
    /// Returns `None` for an empty list.
    pub fn new(views: Vec<Box<dyn MetricView>>) -> Option<Self> {
        if views.is_empty() {
            return None;
        }
        Some(Self { views, cursor: 0 })
    }

    pub fn current(&self) -> &dyn MetricView {
        self.views[self.cursor].as_ref()
    }

    pub fn current_mut(&mut self) -> &mut dyn MetricView {
        self.views[self.cursor].as_mut()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Moves to the next view. The caller must collect it before display.
    pub fn next(&mut self) {
        self.cursor = (self.cursor + 1) % self.views.len();
    }

    /// Moves to the previous view. The caller must collect it before display.
    pub fn previous(&mut self) {
        self.cursor = (self.cursor + self.views.len() - 1) % self.views.len();
    }

    /// Selects the view of the given kind; false if there is none.
    pub fn select(&mut self, kind: ViewKind) -> bool {
        match self.views.iter().position(|v| v.kind() == kind) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    /// Applies the global relative/absolute mode to every view.
    pub fn set_want_relative_stats(&mut self, want: bool) {
        for view in &mut self.views {
            view.set_want_relative_stats(want);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockSource;
    use crate::model::metric_row;
    use crate::view::common::{DomainView, RowFormat};

    metric_row! {
        pub struct KindRow {
            wait: wait;
            wait,
        }
    }

    struct KindFormat(ViewKind);

    impl RowFormat<KindRow> for KindFormat {
        fn kind(&self) -> ViewKind {
            self.0
        }

        fn title(&self) -> &'static str {
            "kind"
        }

        fn headings(&self) -> String {
            String::new()
        }

        fn content(&self, row: &KindRow, _totals: &KindRow) -> String {
            row.wait.to_string()
        }
    }

    fn registry() -> ViewRegistry {
        let views = ViewKind::all()
            .iter()
            .map(|&kind| {
                Box::new(DomainView::new(
                    KindFormat(kind),
                    Box::new(MockSource::<KindRow>::new([])),
                )) as Box<dyn MetricView>
            })
            .collect();
        ViewRegistry::new(views).unwrap()
    }

    #[test]
    fn next_wraps_after_full_cycle() {
        let mut reg = registry();
        reg.select(ViewKind::FileIoLatency);
        let start = reg.cursor();
        for _ in 0..reg.len() {
            reg.next();
        }
        assert_eq!(reg.cursor(), start);
    }

    #[test]
    fn previous_undoes_next() {
        let mut reg = registry();
        for steps in 0..=reg.len() {
            for _ in 0..steps {
                reg.next();
            }
            for _ in 0..steps {
                reg.previous();
            }
            assert_eq!(reg.cursor(), 0);
        }
    }

    #[test]
    fn previous_from_first_goes_to_last() {
        let mut reg = registry();
        reg.previous();
        assert_eq!(reg.current().kind(), ViewKind::StagesLatency);
        reg.next();
        assert_eq!(reg.current().kind(), ViewKind::TableIoLatency);
    }

    #[test]
    fn select_by_kind() {
        let mut reg = registry();
        assert!(reg.select(ViewKind::UserLatency));
        assert_eq!(reg.current().kind(), ViewKind::UserLatency);
    }

    #[test]
    fn relative_mode_applies_to_every_view() {
        let mut reg = registry();
        reg.set_want_relative_stats(true);
        for _ in 0..reg.len() {
            assert!(reg.current().want_relative_stats());
            reg.next();
        }
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(ViewRegistry::new(Vec::new()).is_none());
    }
}
