use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "breakfast"),
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
        }
    }
}

/// One planning cell. (date, meal_type) is the unique key within a plan;
/// a slot with no recipe id is never stored, absence means "empty".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MealSlot {
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeeklyPlan {
    pub id: String,
    pub week_start: NaiveDate,
    pub slots: Vec<MealSlot>,
}

impl WeeklyPlan {
    pub fn new(id: impl Into<String>, week_start: NaiveDate) -> Self {
        WeeklyPlan {
            id: id.into(),
            week_start,
            slots: Vec::new(),
        }
    }

    /// Immutable update: any existing slot for (date, meal_type) is replaced,
    /// keeping at most one slot per key.
    pub fn set_slot(&self, date: NaiveDate, meal_type: MealType, recipe_id: &str) -> WeeklyPlan {
        let mut slots: Vec<MealSlot> = self
            .slots
            .iter()
            .filter(|s| !(s.date == date && s.meal_type == meal_type))
            .cloned()
            .collect();
        slots.push(MealSlot {
            date,
            meal_type,
            recipe_id: Some(recipe_id.to_string()),
            note: None,
        });
        WeeklyPlan {
            id: self.id.clone(),
            week_start: self.week_start,
            slots,
        }
    }

    /// Immutable update removing the slot for (date, meal_type); clearing a
    /// key that has no slot returns an equivalent plan.
    pub fn clear_slot(&self, date: NaiveDate, meal_type: MealType) -> WeeklyPlan {
        WeeklyPlan {
            id: self.id.clone(),
            week_start: self.week_start,
            slots: self
                .slots
                .iter()
                .filter(|s| !(s.date == date && s.meal_type == meal_type))
                .cloned()
                .collect(),
        }
    }

    pub fn slot(&self, date: NaiveDate, meal_type: MealType) -> Option<&MealSlot> {
        self.slots
            .iter()
            .find(|s| s.date == date && s.meal_type == meal_type)
    }
}

/// Calendar date `day_offset` days after the plan's week start.
pub fn date_for_offset(week_start: NaiveDate, day_offset: i64) -> NaiveDate {
    week_start + Duration::days(day_offset)
}
