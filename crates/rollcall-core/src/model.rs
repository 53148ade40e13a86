//! Attendance snapshot model
//!
//! Mirrors the record service's JSON shape. The service is loose with
//! numeric types - percentages arrive as numbers or numeric strings - so
//! percentage fields deserialize through [`Percent`].

use serde::{Deserialize, Deserializer, Serialize};

/// One retrieved attendance record for a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub total_info: Option<TotalInfo>,
    #[serde(default)]
    pub subjectwise_summary: Vec<SubjectSummary>,
    #[serde(default)]
    pub attendance_summary: Vec<DaySummary>,
}

impl AttendanceSnapshot {
    /// Overall percentage, when the service provided one
    pub fn overall_percentage(&self) -> Option<f64> {
        self.total_info
            .as_ref()
            .and_then(|t| t.total_percentage)
            .map(|p| p.0)
    }

    /// Subjects whose percentage is below the given threshold
    pub fn subjects_below(&self, threshold: f64) -> Vec<&SubjectSummary> {
        self.subjectwise_summary
            .iter()
            .filter(|s| s.percentage.map(|p| p.0 < threshold).unwrap_or(false))
            .collect()
    }
}

/// Overall attended/held counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalInfo {
    #[serde(default)]
    pub total_attended: u32,
    #[serde(default)]
    pub total_held: u32,
    #[serde(default)]
    pub total_percentage: Option<Percent>,
}

/// Per-subject overall summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject_name: String,
    #[serde(default)]
    pub percentage: Option<Percent>,
    /// Human-readable "attended/held" text, passed through as-is
    #[serde(default)]
    pub attended_held: String,
}

/// One subject's sessions for the current day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub subject: String,
    /// One character per session held today, in session order
    #[serde(default)]
    pub attendance_today: String,
}

/// Percentage value tolerant of the service's number-or-string encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percent(pub f64);

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Percent)
                .ok_or_else(|| serde::de::Error::custom("percentage out of range")),
            serde_json::Value::String(s) => s
                .trim()
                .trim_end_matches('%')
                .parse::<f64>()
                .map(Percent)
                .map_err(serde::de::Error::custom),
            _ => Err(serde::de::Error::custom(
                "expected a number or a numeric string",
            )),
        }
    }
}

/// Status of one class session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Present,
    Absent,
    Late,
    Excused,
    /// Unrecognized status code, kept rather than failing the parse
    Unknown,
}

impl From<char> for SessionStatus {
    fn from(code: char) -> Self {
        match code {
            'P' => Self::Present,
            'A' => Self::Absent,
            'L' => Self::Late,
            'E' => Self::Excused,
            _ => Self::Unknown,
        }
    }
}

/// One parsed session entry, period numbering starts at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntry {
    pub period: usize,
    pub code: char,
    pub status: SessionStatus,
}

/// Parse a day's attendance code string, one character per session in
/// session order ("PAL" -> period 1 Present, 2 Absent, 3 Late)
pub fn parse_session_codes(codes: &str) -> Vec<SessionEntry> {
    codes
        .chars()
        .enumerate()
        .map(|(i, code)| SessionEntry {
            period: i + 1,
            code,
            status: SessionStatus::from(code),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_codes_in_order() {
        let sessions = parse_session_codes("PAL");
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].period, 1);
        assert_eq!(sessions[0].status, SessionStatus::Present);
        assert_eq!(sessions[1].period, 2);
        assert_eq!(sessions[1].status, SessionStatus::Absent);
        assert_eq!(sessions[2].period, 3);
        assert_eq!(sessions[2].status, SessionStatus::Late);
    }

    #[test]
    fn test_parse_session_codes_unknown_char() {
        let sessions = parse_session_codes("PXE");
        assert_eq!(sessions[1].status, SessionStatus::Unknown);
        assert_eq!(sessions[1].code, 'X');
        assert_eq!(sessions[2].status, SessionStatus::Excused);
    }

    #[test]
    fn test_parse_session_codes_empty() {
        assert!(parse_session_codes("").is_empty());
    }

    #[test]
    fn test_percent_accepts_number_and_string() {
        let json = r#"{
            "total_info": {"total_attended": 40, "total_held": 50, "total_percentage": 80},
            "subjectwise_summary": [
                {"subject_name": "Physics", "percentage": "72.5", "attended_held": "29/40"}
            ]
        }"#;
        let snapshot: AttendanceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.overall_percentage(), Some(80.0));
        assert_eq!(
            snapshot.subjectwise_summary[0].percentage,
            Some(Percent(72.5))
        );
    }

    #[test]
    fn test_percent_rejects_non_numeric() {
        let json = r#"{"subjectwise_summary": [{"subject_name": "X", "percentage": []}]}"#;
        assert!(serde_json::from_str::<AttendanceSnapshot>(json).is_err());
    }

    #[test]
    fn test_subjects_below_threshold() {
        let json = r#"{
            "subjectwise_summary": [
                {"subject_name": "Maths", "percentage": 91, "attended_held": ""},
                {"subject_name": "Physics", "percentage": 68, "attended_held": ""},
                {"subject_name": "Labs", "attended_held": ""}
            ]
        }"#;
        let snapshot: AttendanceSnapshot = serde_json::from_str(json).unwrap();
        let low = snapshot.subjects_below(75.0);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].subject_name, "Physics");
    }
}
