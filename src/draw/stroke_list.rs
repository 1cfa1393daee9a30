//! Ordered container for committed strokes.

use super::stroke::Stroke;
use serde::{Deserialize, Serialize};

/// Which strokes a clear command removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearScope {
    /// Remove every stroke
    All,
    /// Keep restore strokes, drop everything else
    NonRestore,
}

/// All strokes in the current editing session.
///
/// Render order is draw order: the first stroke is the bottom layer and later
/// strokes draw on top. The list only grows during authoring; it can be replaced
/// wholesale for undo snapshots or cleared by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeList {
    strokes: Vec<Stroke>,
}

impl StrokeList {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a committed stroke on top of the existing ones.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Replaces the whole list, dropping strokes that cannot be drawn.
    pub fn replace(&mut self, strokes: Vec<Stroke>) {
        let before = strokes.len();
        self.strokes = strokes.into_iter().filter(Stroke::is_drawable).collect();
        if self.strokes.len() != before {
            log::warn!(
                "Dropped {} stroke(s) without points while replacing stroke list",
                before - self.strokes.len()
            );
        }
    }

    /// Removes strokes per `scope`.
    ///
    /// Returns `true` if the list was non-empty before clearing.
    pub fn clear(&mut self, scope: ClearScope) -> bool {
        let had_strokes = !self.strokes.is_empty();
        match scope {
            ClearScope::All => self.strokes.clear(),
            ClearScope::NonRestore => self.strokes.retain(Stroke::is_restore),
        }
        had_strokes
    }

    /// Overwrites the stroke at `index`, handing `stroke` back if the index is
    /// out of range.
    pub fn set_at(&mut self, index: usize, stroke: Stroke) -> Result<(), Stroke> {
        match self.strokes.get_mut(index) {
            Some(slot) => {
                *slot = stroke;
                Ok(())
            }
            None => Err(stroke),
        }
    }

    /// Removes one occurrence of each non-restore stroke in `consumed`.
    ///
    /// Returns the indices (in the list before removal) of the strokes taken
    /// out, in ascending order. Strokes added after `consumed` was captured,
    /// or changed since, stay in the list.
    pub fn remove_consumed(&mut self, consumed: &[Stroke]) -> Vec<usize> {
        let mut taken = vec![false; self.strokes.len()];
        for stroke in consumed.iter().filter(|s| !s.is_restore()) {
            let found = self
                .strokes
                .iter()
                .enumerate()
                .position(|(i, s)| !taken[i] && s == stroke);
            if let Some(index) = found {
                taken[index] = true;
            }
        }

        let removed: Vec<usize> = (0..taken.len()).filter(|i| taken[*i]).collect();
        let mut index = 0;
        self.strokes.retain(|_| {
            let keep = !taken[index];
            index += 1;
            keep
        });
        removed
    }

    /// Immutable copy suitable for handing to a background worker.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Point, StrokeMode};

    fn dot(mode: StrokeMode) -> Stroke {
        Stroke::dot(mode, 4.0, Point::new(1.0, 1.0))
    }

    #[test]
    fn clear_non_restore_keeps_restore_strokes() {
        let mut list = StrokeList::new();
        list.push(dot(StrokeMode::Paint));
        list.push(dot(StrokeMode::Restore));
        list.push(dot(StrokeMode::Erase));

        assert!(list.clear(ClearScope::NonRestore));
        assert_eq!(list.len(), 1);
        assert!(list.as_slice()[0].is_restore());
    }

    #[test]
    fn clear_reports_empty_list() {
        let mut list = StrokeList::new();
        assert!(!list.clear(ClearScope::All));
    }

    #[test]
    fn replace_drops_undrawable_strokes() {
        let json = r#"[{"mode":"paint","width":3.0,"points":[]},
                       {"mode":"erase","width":3.0,"points":[{"x":1.0,"y":2.0}]}]"#;
        let strokes: Vec<Stroke> = serde_json::from_str(json).unwrap();
        let mut list = StrokeList::new();
        list.replace(strokes);
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].mode(), StrokeMode::Erase);
    }

    #[test]
    fn remove_consumed_keeps_later_and_restore_strokes() {
        let early = Stroke::dot(StrokeMode::Paint, 4.0, Point::new(1.0, 1.0));
        let restore = dot(StrokeMode::Restore);
        let later = Stroke::dot(StrokeMode::Paint, 4.0, Point::new(9.0, 9.0));
        let mut list = StrokeList::new();
        list.push(early.clone());
        list.push(restore.clone());
        list.push(early.clone());
        let consumed = list.snapshot();
        list.push(later.clone());

        assert_eq!(list.remove_consumed(&consumed), vec![0, 2]);
        assert_eq!(list.as_slice(), &[restore, later]);
    }

    #[test]
    fn set_at_rejects_out_of_range_index() {
        let mut list = StrokeList::new();
        list.push(dot(StrokeMode::Paint));

        assert!(list.set_at(0, dot(StrokeMode::Erase)).is_ok());
        assert_eq!(list.as_slice()[0].mode(), StrokeMode::Erase);
        assert!(list.set_at(3, dot(StrokeMode::Paint)).is_err());
        assert_eq!(list.len(), 1);
    }
}
