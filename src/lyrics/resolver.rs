//! Maps a playback position to the lyric line that should be highlighted.

use super::LyricLine;

/// Index of the line active at `t` seconds, if any.
///
/// Line `i` is active when `lines[i].time <= t` and the following line (if
/// any) starts after `t`. Lines sharing a timestamp resolve to the last of
/// them. Does not require sorted input.
pub fn resolve_active(lines: &[LyricLine], t: f64) -> Option<usize> {
    lines.iter().enumerate().position(|(i, line)| {
        line.time <= t && lines.get(i + 1).is_none_or(|next| t < next.time)
    })
}

/// The active line together with its neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LyricWindow {
    pub previous: Option<usize>,
    pub current: Option<usize>,
    pub next: Option<usize>,
}

impl LyricWindow {
    pub fn at(lines: &[LyricLine], t: f64) -> Self {
        Self::around(lines.len(), resolve_active(lines, t))
    }

    /// Before the first line becomes active, `next` points at line 0.
    pub fn around(len: usize, current: Option<usize>) -> Self {
        match current {
            Some(i) => Self {
                previous: i.checked_sub(1),
                current: Some(i),
                next: (i + 1 < len).then_some(i + 1),
            },
            None => Self {
                previous: None,
                current: None,
                next: (len > 0).then_some(0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(times: &[f64]) -> Vec<LyricLine> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| LyricLine::new(t, format!("line {i}")))
            .collect()
    }

    #[test]
    fn test_empty_is_none() {
        for t in [-1.0, 0.0, 3.5, 1e9] {
            assert_eq!(resolve_active(&[], t), None);
        }
    }

    #[test]
    fn test_single_line() {
        let l = lines(&[5.0]);
        assert_eq!(resolve_active(&l, 0.0), None);
        assert_eq!(resolve_active(&l, 4.999), None);
        assert_eq!(resolve_active(&l, 5.0), Some(0));
        assert_eq!(resolve_active(&l, 500.0), Some(0));
    }

    #[test]
    fn test_boundaries() {
        let l = lines(&[1.0, 2.0, 4.0]);
        assert_eq!(resolve_active(&l, 0.5), None);
        assert_eq!(resolve_active(&l, 1.0), Some(0));
        assert_eq!(resolve_active(&l, 1.999), Some(0));
        assert_eq!(resolve_active(&l, 2.0), Some(1));
        assert_eq!(resolve_active(&l, 3.0), Some(1));
        assert_eq!(resolve_active(&l, 4.0), Some(2));
        assert_eq!(resolve_active(&l, 99.0), Some(2));
    }

    #[test]
    fn test_duplicate_timestamps_last_wins() {
        let l = lines(&[1.0, 3.0, 3.0, 5.0]);
        assert_eq!(resolve_active(&l, 3.0), Some(2));
        assert_eq!(resolve_active(&l, 4.0), Some(2));
        assert_eq!(resolve_active(&l, 2.0), Some(0));
    }

    #[test]
    fn test_monotonic_in_time() {
        let l = lines(&[0.0, 0.5, 2.0, 2.0, 7.25, 9.0, 12.0]);
        let mut last: Option<usize> = None;
        for step in 0..300 {
            let t = f64::from(step) * 0.05 - 1.0;
            let active = resolve_active(&l, t);
            assert!(active >= last, "went backwards at t={t}");
            last = active;
        }
    }

    #[test]
    fn test_nan_time_is_none() {
        assert_eq!(resolve_active(&lines(&[0.0, 1.0]), f64::NAN), None);
    }

    #[test]
    fn test_window() {
        let l = lines(&[1.0, 2.0, 3.0]);
        assert_eq!(
            LyricWindow::at(&l, 0.0),
            LyricWindow { previous: None, current: None, next: Some(0) }
        );
        assert_eq!(
            LyricWindow::at(&l, 1.5),
            LyricWindow { previous: None, current: Some(0), next: Some(1) }
        );
        assert_eq!(
            LyricWindow::at(&l, 2.5),
            LyricWindow { previous: Some(0), current: Some(1), next: Some(2) }
        );
        assert_eq!(
            LyricWindow::at(&l, 9.0),
            LyricWindow { previous: Some(1), current: Some(2), next: None }
        );
        assert_eq!(LyricWindow::at(&[], 1.0), LyricWindow::default());
    }
}
