use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One title row as persisted in the `titles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: i64,
    /// Display string, frequently Japanese
    pub name: String,
    pub available: bool,
    /// Hex string ("#ded523") or CSS color name; also keys the frame asset
    pub rarity_color: String,
    pub obtain_condition: String,
    /// Empty when the wiki row has no note
    pub tips: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TitleRecord {
    pub fn has_tips(&self) -> bool {
        !self.tips.is_empty()
    }

    /// Short one-line preview of the obtain condition, at most `max_chars` characters
    pub fn condition_preview(&self, max_chars: usize) -> String {
        if self.obtain_condition.chars().count() > max_chars {
            let head: String = self.obtain_condition.chars().take(max_chars).collect();
            format!("{}...", head)
        } else {
            self.obtain_condition.clone()
        }
    }
}

/// A title name that exists in more than one version (color or condition)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateName {
    pub name: String,
    pub count: usize,
}

/// Structured result of an image generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerateResponse {
    pub success: bool,
    pub count: usize,
    pub images: Vec<PathBuf>,
    pub message: String,
}

impl GenerateResponse {
    pub fn success(images: Vec<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: images.len(),
            images,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            images: Vec::new(),
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(condition: &str) -> TitleRecord {
        let now = Utc::now();
        TitleRecord {
            id: 1,
            name: "月下打人".to_string(),
            available: true,
            rarity_color: "#ded523".to_string(),
            obtain_condition: condition.to_string(),
            tips: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_condition_preview_counts_chars() {
        let rec = record("おにでフルコンボを10曲達成する");
        assert_eq!(rec.condition_preview(5), "おにでフル...");
        assert_eq!(rec.condition_preview(100), rec.obtain_condition);
    }

    #[test]
    fn test_failure_response_is_empty() {
        let resp = GenerateResponse::failure("nothing");
        assert!(!resp.success);
        assert_eq!(resp.count, 0);
        assert!(resp.images.is_empty());
    }

    #[test]
    fn test_response_json_fields() {
        let resp = GenerateResponse::success(vec![PathBuf::from("output/a_1.png")], "ok");
        let json = resp.to_json().unwrap();
        assert!(json.contains("\"success\": true"));
        assert!(json.contains("\"count\": 1"));
        assert!(json.contains("a_1.png"));
    }
}
