use crate::database::models::{Shift, ShiftWindow};

/// Admits candidate windows that intersect neither the existing shifts nor
/// any candidate admitted before them.
#[derive(Debug, Clone, Default)]
pub struct OverlapGuard {
    occupied: Vec<ShiftWindow>,
}

impl OverlapGuard {
    pub fn new<'a>(existing: impl IntoIterator<Item = &'a Shift>) -> Self {
        Self {
            occupied: existing.into_iter().map(Shift::window).collect(),
        }
    }

    pub fn conflicts_with(&self, candidate: &ShiftWindow) -> bool {
        self.occupied.iter().any(|window| window.overlaps(candidate))
    }

    /// Marks `window` as taken without checking it
    pub fn record(&mut self, window: ShiftWindow) {
        self.occupied.push(window);
    }

    /// Returns `false` and records nothing on conflict
    pub fn admit(&mut self, candidate: ShiftWindow) -> bool {
        if self.conflicts_with(&candidate) {
            return false;
        }
        self.record(candidate);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn window(date: &str, start: &str, end: &str) -> ShiftWindow {
        ShiftWindow::from_template(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn disjoint_and_touching_windows_are_admitted() {
        let mut guard = OverlapGuard::default();
        assert!(guard.admit(window("2024-01-01", "08:00", "20:00")));
        assert!(guard.admit(window("2024-01-01", "20:00", "08:00")));
        assert!(guard.admit(window("2024-01-02", "08:00", "09:00")));
    }

    #[test]
    fn any_intersection_rejects_the_later_window() {
        let mut guard = OverlapGuard::default();
        assert!(guard.admit(window("2024-01-01", "07:00", "19:00")));

        // partial, contained and containing
        assert!(!guard.admit(window("2024-01-01", "18:00", "22:00")));
        assert!(!guard.admit(window("2024-01-01", "10:00", "11:00")));
        assert!(!guard.admit(window("2024-01-01", "06:00", "06:00")));
    }

    #[test]
    fn candidates_are_checked_against_each_other() {
        let mut guard = OverlapGuard::default();
        let admitted: Vec<bool> = [
            window("2024-01-01", "19:00", "07:00"),
            window("2024-01-02", "06:00", "12:00"),
            window("2024-01-02", "07:00", "12:00"),
        ]
        .into_iter()
        .map(|candidate| guard.admit(candidate))
        .collect();

        assert_eq!(admitted, vec![true, false, true]);
    }

    #[test]
    fn rejected_candidates_do_not_block_later_ones() {
        let mut guard = OverlapGuard::default();
        assert!(guard.admit(window("2024-01-01", "08:00", "12:00")));
        assert!(!guard.admit(window("2024-01-01", "10:00", "16:00")));
        assert!(guard.admit(window("2024-01-01", "12:00", "16:00")));
    }
}
