use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One journal entry. The backend enforces a single entry per day and
/// assigns `date` itself on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub content: String,
    pub date: NaiveDate,
}

/// Request body for creating today's entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewJournalEntry<'a> {
    pub content: &'a str,
}

/// Partial update body for rewriting an entry's content.
#[derive(Debug, Clone, Serialize)]
pub struct JournalPatch<'a> {
    pub content: &'a str,
}

/// Find the entry for a given date, if one exists.
pub fn entry_for(entries: &[JournalEntry], date: NaiveDate) -> Option<&JournalEntry> {
    entries.iter().find(|e| e.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_journal_entry() {
        let json = r#"{"id": 12, "content": "Crushed it today", "date": "2026-02-14"}"#;
        let entry: JournalEntry = serde_json::from_str(json).expect("Failed to parse entry");
        assert_eq!(entry.id, 12);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 2, 14).unwrap());
    }

    #[test]
    fn test_entry_for_date() {
        let entries = vec![
            JournalEntry {
                id: 1,
                content: "older".into(),
                date: NaiveDate::from_ymd_opt(2026, 2, 13).unwrap(),
            },
            JournalEntry {
                id: 2,
                content: "today".into(),
                date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            },
        ];

        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        assert_eq!(entry_for(&entries, today).map(|e| e.id), Some(2));

        let missing = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert!(entry_for(&entries, missing).is_none());
    }
}
