//! Scroll-triggered reveal of page sections.

use log::{debug, warn};
use vitrine_core::RevealPolicy;

/// Vertical extent of a page section, in terminal rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBounds {
    pub id: String,
    /// Row of the section's first line within the whole page.
    pub top: u32,
    pub height: u32,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Reveal state change for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    Revealed(String),
    Concealed(String),
}

/// Fraction of a section inside the window `[scroll, scroll + rows)`.
pub fn visible_fraction(bounds: &SectionBounds, scroll: u32, rows: u32) -> f32 {
    if bounds.height == 0 {
        return 0.0;
    }
    let start = bounds.top.max(scroll);
    let end = (bounds.top + bounds.height).min(scroll.saturating_add(rows));
    end.saturating_sub(start) as f32 / bounds.height as f32
}

#[derive(Debug)]
struct Observed {
    bounds: SectionBounds,
    revealed: bool,
    /// Cleared once a permanent reveal has fired.
    watching: bool,
}

/// Watches page sections and reports threshold crossings.
///
/// A section is in view while its visible fraction is at least the policy
/// threshold. Events fire only when that changes.
#[derive(Debug)]
pub struct RevealObserver {
    policy: RevealPolicy,
    sections: Vec<Observed>,
}

impl RevealObserver {
    /// Start observing every section the policy does not exclude. Observed
    /// sections start hidden.
    ///
    /// Returns `None`, after logging a warning, when nothing is left to
    /// observe.
    pub fn observe(
        policy: RevealPolicy,
        sections: impl IntoIterator<Item = SectionBounds>,
    ) -> Option<Self> {
        let sections: Vec<Observed> = sections
            .into_iter()
            .filter(|bounds| !policy.is_excluded(&bounds.id))
            .map(|bounds| Observed {
                bounds,
                revealed: false,
                watching: true,
            })
            .collect();

        if sections.is_empty() {
            warn!("no sections to reveal, scroll reveal disabled");
            return None;
        }
        debug!("observing {} sections for reveal", sections.len());
        Some(Self { policy, sections })
    }

    pub fn policy(&self) -> &RevealPolicy {
        &self.policy
    }

    /// Whether the section should be drawn. Sections that are not observed
    /// are always shown.
    pub fn is_revealed(&self, id: &str) -> bool {
        self.sections
            .iter()
            .find(|section| section.bounds.id == id)
            .is_none_or(|section| section.revealed)
    }

    /// Replace section geometry after a relayout, keeping reveal state by id.
    pub fn relayout(&mut self, sections: impl IntoIterator<Item = SectionBounds>) {
        for bounds in sections {
            if let Some(section) = self.sections.iter_mut().find(|s| s.bounds.id == bounds.id) {
                section.bounds = bounds;
            }
        }
    }

    /// Evaluate every watched section against the scroll window and return
    /// the crossings.
    pub fn on_scroll(&mut self, scroll: u32, rows: u32) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        for section in self.sections.iter_mut().filter(|s| s.watching) {
            let in_view =
                visible_fraction(&section.bounds, scroll, rows) >= self.policy.threshold;
            if in_view == section.revealed {
                continue;
            }
            if in_view {
                section.revealed = true;
                if !self.policy.reversible {
                    section.watching = false;
                }
                events.push(RevealEvent::Revealed(section.bounds.id.clone()));
            } else {
                section.revealed = false;
                events.push(RevealEvent::Concealed(section.bounds.id.clone()));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<SectionBounds> {
        vec![
            SectionBounds::new("hero", 0, 20),
            SectionBounds::new("about", 20, 10),
            SectionBounds::new("work", 30, 10),
        ]
    }

    #[test]
    fn test_visible_fraction() {
        let about = SectionBounds::new("about", 20, 10);
        assert_eq!(visible_fraction(&about, 0, 20), 0.0);
        assert_eq!(visible_fraction(&about, 0, 22), 0.2);
        assert_eq!(visible_fraction(&about, 15, 20), 1.0);
        assert_eq!(visible_fraction(&about, 28, 20), 0.2);
        assert_eq!(visible_fraction(&SectionBounds::new("x", 0, 0), 0, 10), 0.0);
    }

    #[test]
    fn test_reveals_on_crossing_only() {
        let mut observer = RevealObserver::observe(RevealPolicy::default(), page()).unwrap();
        assert!(!observer.is_revealed("about"));

        let events = observer.on_scroll(0, 20);
        assert_eq!(events, vec![RevealEvent::Revealed("hero".into())]);
        assert!(observer.on_scroll(0, 20).is_empty());

        let events = observer.on_scroll(1, 20);
        assert_eq!(events, vec![RevealEvent::Revealed("about".into())]);
        assert!(observer.is_revealed("about"));
    }

    #[test]
    fn test_reversible_conceals() {
        let mut observer = RevealObserver::observe(RevealPolicy::default(), page()).unwrap();
        observer.on_scroll(10, 20);
        assert!(observer.is_revealed("about"));

        let events = observer.on_scroll(0, 20);
        assert_eq!(events, vec![RevealEvent::Concealed("about".into())]);
        assert!(!observer.is_revealed("about"));
    }

    #[test]
    fn test_permanent_reveal_unobserves() {
        let policy = RevealPolicy::permanent(0.15);
        let mut observer = RevealObserver::observe(policy, page()).unwrap();
        observer.on_scroll(10, 20);
        assert!(observer.is_revealed("about"));
        assert!(observer.on_scroll(0, 20).is_empty());
        assert!(observer.is_revealed("about"));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = RevealPolicy {
            threshold: 0.2,
            ..RevealPolicy::default()
        };
        let mut observer = RevealObserver::observe(policy, page()).unwrap();
        observer.on_scroll(0, 21);
        assert!(!observer.is_revealed("about"));
        observer.on_scroll(0, 22);
        assert!(observer.is_revealed("about"));
    }

    #[test]
    fn test_excluded_sections_always_shown() {
        let policy = RevealPolicy {
            excluded: vec!["hero".into()],
            ..RevealPolicy::default()
        };
        let mut observer = RevealObserver::observe(policy, page()).unwrap();
        assert!(observer.is_revealed("hero"));
        let events = observer.on_scroll(0, 20);
        assert!(events.is_empty());
    }

    #[test]
    fn test_nothing_to_observe() {
        assert!(RevealObserver::observe(RevealPolicy::default(), Vec::new()).is_none());
        let policy = RevealPolicy {
            excluded: vec!["only".into()],
            ..RevealPolicy::default()
        };
        let sections = vec![SectionBounds::new("only", 0, 5)];
        assert!(RevealObserver::observe(policy, sections).is_none());
    }

    #[test]
    fn test_relayout_keeps_state() {
        let mut observer = RevealObserver::observe(RevealPolicy::default(), page()).unwrap();
        observer.on_scroll(10, 20);
        observer.relayout(vec![SectionBounds::new("about", 40, 10)]);
        assert!(observer.is_revealed("about"));
        let events = observer.on_scroll(10, 20);
        assert!(events.contains(&RevealEvent::Concealed("about".into())));
    }
}
