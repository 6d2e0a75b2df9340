use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// Each field is a list of patterns tried in order; the first one that captures
// a non-empty value wins. Capture group 1 is the value.
static AGE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bage[ \t]*[:\-]?[ \t]*(\d{1,2})\b").unwrap(),
        Regex::new(r"(?i)\b(\d{1,2})[ \t]*(?:years|yrs)[ \t]+old\b").unwrap(),
    ]
});
static CATEGORY_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(SC|ST|OBC|EWS|General|Minority)\b").unwrap(),
        Regex::new(r"(?i)\bcategory[ \t]*:[ \t]*([A-Za-z ]+)").unwrap(),
    ]
});
static INCOME_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bincome[ \t]*:[ \t]*([^\n,]+)").unwrap(),
        Regex::new(r"(₹[ \t]*[\d,]+)").unwrap(),
    ]
});
static STATE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bstate[ \t]*:[ \t]*([A-Za-z ]{3,})").unwrap(),
        Regex::new(r"(?i)\bin[ \t]+([A-Za-z ]{3,})").unwrap(),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    State,
    Age,
    Category,
    Income,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::State,
        ProfileField::Age,
        ProfileField::Category,
        ProfileField::Income,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::State => "state",
            ProfileField::Age => "age",
            ProfileField::Category => "category",
            ProfileField::Income => "income",
        }
    }

    fn rules(self) -> &'static [Regex] {
        match self {
            ProfileField::State => &STATE_RULES,
            ProfileField::Age => &AGE_RULES,
            ProfileField::Category => &CATEGORY_RULES,
            ProfileField::Income => &INCOME_RULES,
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Profile values recovered from a user message. `None` means not detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<String>,
}

impl ProfileAttributes {
    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::State => self.state.as_deref(),
            ProfileField::Age => self.age.as_deref(),
            ProfileField::Category => self.category.as_deref(),
            ProfileField::Income => self.income.as_deref(),
        }
    }

    fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::State => &mut self.state,
            ProfileField::Age => &mut self.age,
            ProfileField::Category => &mut self.category,
            ProfileField::Income => &mut self.income,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    Match,
    Missing,
}

pub fn extract(text: &str) -> ProfileAttributes {
    let mut profile = ProfileAttributes::default();
    for field in ProfileField::ALL {
        if let Some(value) = first_capture(field.rules(), text) {
            profile.set(field, value);
        }
    }
    profile
}

fn first_capture(rules: &[Regex], text: &str) -> Option<String> {
    rules.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

/// `match` for every field holding a non-empty value, `missing` otherwise.
pub fn field_status(profile: &ProfileAttributes) -> BTreeMap<ProfileField, FieldStatus> {
    ProfileField::ALL
        .into_iter()
        .map(|field| {
            let status = match profile.get(field) {
                Some(v) if !v.is_empty() => FieldStatus::Match,
                _ => FieldStatus::Missing,
            };
            (field, status)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_profile() {
        let p = extract("State: Bihar\nAge: 24\nCategory: OBC\nFamily income: 150000");
        assert_eq!(p.state.as_deref(), Some("Bihar"));
        assert_eq!(p.age.as_deref(), Some("24"));
        assert_eq!(p.category.as_deref(), Some("OBC"));
        assert_eq!(p.income.as_deref(), Some("150000"));
    }

    #[test]
    fn labeled_age_beats_years_old() {
        let p = extract("I am 35 years old, age: 40");
        assert_eq!(p.age.as_deref(), Some("40"));
    }

    #[test]
    fn age_fallbacks() {
        assert_eq!(extract("I'm 19 yrs old").age.as_deref(), Some("19"));
        assert_eq!(extract("age-17").age.as_deref(), Some("17"));
        assert_eq!(extract("Age 99").age.as_deref(), Some("99"));
        // Three digits are not an age.
        assert_eq!(extract("age: 123").age, None);
    }

    #[test]
    fn age_word_boundary() {
        // "page 12" must not read as an age.
        assert_eq!(extract("see page 12").age, None);
    }

    #[test]
    fn category_literal_wins_over_label() {
        let p = extract("Category: Backward class, I belong to EWS");
        assert_eq!(p.category.as_deref(), Some("EWS"));
    }

    #[test]
    fn category_first_in_text_order() {
        let p = extract("not general, actually sc");
        assert_eq!(p.category.as_deref(), Some("general"));
    }

    #[test]
    fn category_label_fallback() {
        let p = extract("category: Backward Class\nsomething");
        assert_eq!(p.category.as_deref(), Some("Backward Class"));
    }

    #[test]
    fn category_whole_word_only() {
        assert_eq!(extract("the first stage").category, None);
    }

    #[test]
    fn income_label_stops_at_comma() {
        let p = extract("income: 2 lakh per year, rural");
        assert_eq!(p.income.as_deref(), Some("2 lakh per year"));
    }

    #[test]
    fn income_currency_fallback() {
        let p = extract("we earn about ₹1,20,000 yearly");
        assert_eq!(p.income.as_deref(), Some("₹1,20,000"));
    }

    #[test]
    fn state_label_then_loose_fallback() {
        assert_eq!(extract("state: Tamil Nadu\n").state.as_deref(), Some("Tamil Nadu"));
        assert_eq!(extract("I live in Kerala").state.as_deref(), Some("Kerala"));
        // Loose by design of the pattern: any "in <words>" phrase qualifies.
        assert_eq!(
            extract("interested in scholarships").state.as_deref(),
            Some("scholarships")
        );
    }

    #[test]
    fn state_label_beats_fallback() {
        let p = extract("studying in Delhi\nState: Punjab");
        assert_eq!(p.state.as_deref(), Some("Punjab"));
    }

    #[test]
    fn nothing_detected() {
        let p = extract("");
        assert_eq!(p, ProfileAttributes::default());
        assert!(field_status(&p).values().all(|s| *s == FieldStatus::Missing));
    }

    #[test]
    fn empty_label_value_is_absent() {
        let p = extract("Income:   \nnothing else");
        assert_eq!(p.income, None);
    }

    #[test]
    fn status_per_field() {
        let p = extract("Age: 24, OBC");
        let status = field_status(&p);
        assert_eq!(status.len(), 4);
        assert_eq!(status[&ProfileField::Age], FieldStatus::Match);
        assert_eq!(status[&ProfileField::Category], FieldStatus::Match);
        assert_eq!(status[&ProfileField::State], FieldStatus::Missing);
        assert_eq!(status[&ProfileField::Income], FieldStatus::Missing);
    }

    #[test]
    fn empty_string_value_is_missing() {
        let p = ProfileAttributes {
            state: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(field_status(&p)[&ProfileField::State], FieldStatus::Missing);
    }
}
