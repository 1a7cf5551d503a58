use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Request body for creating a todo. New todos always start incomplete.
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo<'a> {
    pub text: &'a str,
    pub completed: bool,
}

/// Partial update body for toggling completion.
#[derive(Debug, Clone, Serialize)]
pub struct TodoPatch {
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_todo() {
        let json = r#"{"id": 7, "text": "Water the plants", "completed": false}"#;
        let todo: Todo = serde_json::from_str(json).expect("Failed to parse todo");
        assert_eq!(todo.id, 7);
        assert_eq!(todo.text, "Water the plants");
        assert!(!todo.completed);
    }

    #[test]
    fn test_todo_patch_body() {
        let body = serde_json::to_string(&TodoPatch { completed: true }).unwrap();
        assert_eq!(body, r#"{"completed":true}"#);
    }
}
