use serde::{Deserialize, Serialize};

/// Goal horizon as the backend stores it in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalType {
    #[serde(rename = "long-term")]
    LongTerm,
    #[serde(rename = "short-term")]
    ShortTerm,
}

impl GoalType {
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::LongTerm => "Long-term Goals",
            GoalType::ShortTerm => "Short-term Goals",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
}

/// Request body for creating a goal.
#[derive(Debug, Clone, Serialize)]
pub struct NewGoal<'a> {
    pub title: &'a str,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
}

/// The backend returns the full shared collection; goals are split into
/// long-term and short-term panes on the client side.
pub fn filter_by_type(goals: &[Goal], goal_type: GoalType) -> Vec<&Goal> {
    goals.iter().filter(|g| g.goal_type == goal_type).collect()
}
