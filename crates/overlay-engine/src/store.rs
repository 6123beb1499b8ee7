//! Durable overlay reconstruction store
//!
//! The store is a superset of the overlays currently materialized on the
//! surface: deleting or clearing overlays from the chart leaves their
//! reconstruction data here so history can materialize them again. Entries
//! only ever disappear through an explicit permanent delete.

use std::collections::HashMap;

use chart_studies_shared::{Overlay, OverlayId};

#[derive(Default)]
pub struct OverlayStore {
    entries: HashMap<OverlayId, Overlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh the reconstruction data for an overlay.
    pub fn record(&mut self, overlay: &Overlay) {
        self.entries.insert(overlay.id, overlay.clone());
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Permanently drop an entry. This is the only removal path; undo never
    /// touches the store.
    pub fn remove_permanently(&mut self, id: OverlayId) -> Option<Overlay> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

    use super::*;

    fn overlay() -> Overlay {
        Overlay {
            id: OverlayId::new(),
            kind: OverlayKind::Segment,
            points: vec![
                Point::new(0.0, 0.0, 0.0, 100.0),
                Point::new(10.0, 5.0, 2.0, 105.0),
            ],
            style: OverlayStyle::default(),
            extend_data: None,
            group_id: None,
        }
    }

    #[test]
    fn test_record_and_get() {
        let mut store = OverlayStore::new();
        let o = overlay();
        store.record(&o);
        assert_eq!(store.get(o.id), Some(&o));
    }

    #[test]
    fn test_record_refreshes_existing_entry() {
        let mut store = OverlayStore::new();
        let mut o = overlay();
        store.record(&o);
        o.points[1] = Point::new(20.0, 8.0, 4.0, 108.0);
        store.record(&o);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(o.id).unwrap().points[1].x, 20.0);
    }

    #[test]
    fn test_permanent_delete_is_only_removal() {
        let mut store = OverlayStore::new();
        let o = overlay();
        store.record(&o);
        assert!(store.remove_permanently(o.id).is_some());
        assert!(!store.contains(o.id));
        assert!(store.remove_permanently(o.id).is_none());
    }
}
