/// Selection, hover and overlay visibility state
use web_time::{Duration, Instant};

use crate::config::DEFAULT_HELP_TIMEOUT;
use crate::grid::GridPoint;

/// UI interaction state for one session.
///
/// Plain setters only. Selection and hover are ignored while interaction is
/// off. The help overlay hides itself once its deadline passes; `tick` must
/// be called from the host loop for that to happen.
#[derive(Debug, Clone)]
pub struct InteractionState {
    selected: Option<GridPoint>,
    hovered: Option<GridPoint>,
    interactive: bool,
    show_labels: bool,
    show_help: bool,
    help_deadline: Option<Instant>,
    help_timeout: Duration,
}

impl InteractionState {
    /// Fresh state with the help overlay up and its timer started at `now`.
    pub fn new(help_timeout: Duration, now: Instant) -> Self {
        let mut state = Self {
            selected: None,
            hovered: None,
            interactive: true,
            show_labels: false,
            show_help: false,
            help_deadline: None,
            help_timeout,
        };
        state.show_help(now);
        state
    }

    pub fn selected(&self) -> Option<GridPoint> {
        self.selected
    }

    pub fn hovered(&self) -> Option<GridPoint> {
        self.hovered
    }

    /// Point the info overlay describes: the selection, else the hover.
    pub fn focus(&self) -> Option<GridPoint> {
        self.selected.or(self.hovered)
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn labels_visible(&self) -> bool {
        self.show_labels
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    pub fn select(&mut self, point: GridPoint) {
        if self.interactive {
            self.selected = Some(point);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn hover(&mut self, point: Option<GridPoint>) {
        if self.interactive {
            self.hovered = point;
        }
    }

    /// Flip interaction mode. Either way the old highlight is stale.
    pub fn toggle_interactive(&mut self) {
        self.interactive = !self.interactive;
        self.selected = None;
        self.hovered = None;
    }

    pub fn toggle_labels(&mut self) {
        self.show_labels = !self.show_labels;
    }

    /// Show help and (re)start its one-shot timer.
    pub fn show_help(&mut self, now: Instant) {
        self.show_help = true;
        self.help_deadline = Some(now + self.help_timeout);
    }

    /// Hide help and cancel the pending timer.
    pub fn dismiss_help(&mut self) {
        self.show_help = false;
        self.help_deadline = None;
    }

    /// Fire the help timer if it is due. Returns true when help was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.help_deadline {
            Some(deadline) if now >= deadline => {
                self.dismiss_help();
                true
            }
            _ => false,
        }
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(DEFAULT_HELP_TIMEOUT, Instant::now())
    }
}
