use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use crate::catalog::{Recipe, RecipeCatalog};
use crate::meal_plan::{date_for_offset, MealType};

/// Minimum drag displacement, in pixels, for a release to count as a
/// decision instead of a cancelled gesture.
pub const COMMIT_THRESHOLD: f32 = 80.0;

#[derive(Debug)]
pub enum DeckError {
    NoPendingSchedule,
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::NoPendingSchedule => {
                write!(f, "confirm_schedule called with no pending schedule decision")
            }
        }
    }
}

impl Error for DeckError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    /// Save to favorites and advance.
    Like,
    /// Discard and advance.
    Pass,
    /// Open the plan-assignment flow; advancement waits for confirmation.
    Schedule,
}

/// What a released (or button-forced) gesture asks the orchestrator to do.
/// `Liked` and `Passed` have already advanced the queue; `SchedulePending`
/// leaves the same card current until `confirm_schedule`/`cancel_schedule`.
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutcome {
    None,
    Liked { recipe_id: String },
    Passed { recipe_id: String },
    SchedulePending { recipe_id: String },
}

/// Plan-mutation intent produced by a confirmed schedule decision; the
/// orchestrator applies it with `WeeklyPlan::set_slot`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAssignment {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Displacement {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Dragging {
        start_x: f32,
        start_y: f32,
        dx: f32,
        dy: f32,
    },
    PendingSchedule {
        recipe_id: String,
    },
}

/// First-match classification of a released drag. Horizontal thresholds are
/// checked before the vertical one, so a diagonal fling past both commits
/// horizontally.
pub fn classify(dx: f32, dy: f32, threshold: f32) -> Option<SwipeDecision> {
    if dx > threshold {
        Some(SwipeDecision::Like)
    } else if dx < -threshold {
        Some(SwipeDecision::Pass)
    } else if dy < -threshold {
        Some(SwipeDecision::Schedule)
    } else {
        None
    }
}

/// Discrete gesture state machine over the discovery deck. The queue is
/// derived on demand from (catalog − decided-set) under the prep-time filter;
/// the engine owns only the session's decided-set and the drag phase. The
/// continuous presentation mapping (rotation, indicator opacity) is a
/// rendering concern and lives outside this type; `displacement()` is the
/// only feed it needs.
#[derive(Debug)]
pub struct SwipeDeckEngine {
    threshold: f32,
    max_prep_minutes: u32,
    decided: HashSet<String>,
    phase: Phase,
}

impl SwipeDeckEngine {
    pub fn new(max_prep_minutes: u32) -> Self {
        Self::with_threshold(max_prep_minutes, COMMIT_THRESHOLD)
    }

    pub fn with_threshold(max_prep_minutes: u32, threshold: f32) -> Self {
        SwipeDeckEngine {
            threshold,
            max_prep_minutes,
            decided: HashSet::new(),
            phase: Phase::Idle,
        }
    }

    /// Deck membership under the active filter, in catalog order, minus every
    /// card already decided this session.
    pub fn active_cards<'a>(&self, catalog: &'a RecipeCatalog) -> Vec<&'a Recipe> {
        catalog
            .recipes()
            .iter()
            .filter(|r| !self.decided.contains(&r.id) && r.prep_time_minutes <= self.max_prep_minutes)
            .collect()
    }

    pub fn current_card<'a>(&self, catalog: &'a RecipeCatalog) -> Option<&'a Recipe> {
        self.active_cards(catalog).first().copied()
    }

    /// Preview of the card behind the current one.
    pub fn next_card<'a>(&self, catalog: &'a RecipeCatalog) -> Option<&'a Recipe> {
        self.active_cards(catalog).get(1).copied()
    }

    pub fn displacement(&self) -> Displacement {
        match self.phase {
            Phase::Dragging { dx, dy, .. } => Displacement { dx, dy },
            _ => Displacement::default(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn has_pending_schedule(&self) -> bool {
        matches!(self.phase, Phase::PendingSchedule { .. })
    }

    /// Tightening or relaxing the filter recomputes deck membership but never
    /// un-decides a card.
    pub fn set_max_prep_minutes(&mut self, minutes: u32) {
        self.max_prep_minutes = minutes;
    }

    pub fn max_prep_minutes(&self) -> u32 {
        self.max_prep_minutes
    }

    /// idle → dragging. No-op while a schedule decision is pending (the
    /// selection modal blocks the deck), mid-drag, or with no current card.
    pub fn begin_drag(&mut self, catalog: &RecipeCatalog, x: f32, y: f32) {
        if self.phase != Phase::Idle {
            return;
        }
        if self.current_card(catalog).is_none() {
            return;
        }
        self.phase = Phase::Dragging {
            start_x: x,
            start_y: y,
            dx: 0.0,
            dy: 0.0,
        };
    }

    /// Tracks displacement while dragging; carries no side effect until the
    /// release. Ignored in any other phase.
    pub fn update_drag(&mut self, x: f32, y: f32) {
        if let Phase::Dragging {
            start_x,
            start_y,
            ref mut dx,
            ref mut dy,
        } = self.phase
        {
            *dx = x - start_x;
            *dy = y - start_y;
        }
    }

    /// Classifies the accumulated displacement and commits the decision.
    /// A sub-threshold release snaps back: displacement resets and the same
    /// card stays current.
    pub fn end_drag(&mut self, catalog: &RecipeCatalog) -> SwipeOutcome {
        let (dx, dy) = match self.phase {
            Phase::Dragging { dx, dy, .. } => (dx, dy),
            _ => return SwipeOutcome::None,
        };
        self.phase = Phase::Idle;
        match classify(dx, dy, self.threshold) {
            Some(decision) => self.commit(catalog, decision),
            None => SwipeOutcome::None,
        }
    }

    /// Button path: applies a decision directly, without a drag. Subject to
    /// the same guards as `begin_drag`.
    pub fn decide(&mut self, catalog: &RecipeCatalog, decision: SwipeDecision) -> SwipeOutcome {
        if self.phase != Phase::Idle {
            return SwipeOutcome::None;
        }
        self.commit(catalog, decision)
    }

    fn commit(&mut self, catalog: &RecipeCatalog, decision: SwipeDecision) -> SwipeOutcome {
        let recipe_id = match self.current_card(catalog) {
            Some(recipe) => recipe.id.clone(),
            None => return SwipeOutcome::None,
        };
        match decision {
            SwipeDecision::Like => {
                self.decided.insert(recipe_id.clone());
                SwipeOutcome::Liked { recipe_id }
            }
            SwipeDecision::Pass => {
                self.decided.insert(recipe_id.clone());
                SwipeOutcome::Passed { recipe_id }
            }
            SwipeDecision::Schedule => {
                self.phase = Phase::PendingSchedule {
                    recipe_id: recipe_id.clone(),
                };
                SwipeOutcome::SchedulePending { recipe_id }
            }
        }
    }

    /// Resolves a pending schedule decision: computes the target date from the
    /// plan's week start, marks the card decided, advances the queue and
    /// returns the slot to assign. Calling this without a pending decision is
    /// a caller bug, not a data gap, and is surfaced as an error.
    pub fn confirm_schedule(
        &mut self,
        week_start: NaiveDate,
        day_offset: i64,
        meal_type: MealType,
    ) -> Result<SlotAssignment, DeckError> {
        let recipe_id = match &self.phase {
            Phase::PendingSchedule { recipe_id } => recipe_id.clone(),
            _ => return Err(DeckError::NoPendingSchedule),
        };
        self.decided.insert(recipe_id.clone());
        self.phase = Phase::Idle;
        Ok(SlotAssignment {
            date: date_for_offset(week_start, day_offset),
            meal_type,
            recipe_id,
        })
    }

    /// Abandons a pending schedule decision; the same card remains current
    /// and undecided. Harmless in any other phase.
    pub fn cancel_schedule(&mut self) {
        if matches!(self.phase, Phase::PendingSchedule { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Clears the session's decided-set so every filtered card can come back.
    /// Favorites and the plan are untouched; those live with the orchestrator.
    pub fn reset_deck(&mut self) {
        debug!("resetting deck, forgetting {} decisions", self.decided.len());
        self.decided.clear();
    }

    pub fn decided_count(&self) -> usize {
        self.decided.len()
    }
}
