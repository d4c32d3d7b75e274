use crate::model::Result;
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use serde_json::{from_str, Value};

pub fn entries(json_str: &str) -> Result<IndexMap<String, Value>> {
    Ok(from_str(json_str)?)
}

pub fn required_str<'a>(details: &'a Value, field: &str) -> Result<&'a str> {
    let Some(value) = details[field].as_str() else {
        return Err(format!("Not found '{field}' field").into());
    };
    Ok(value)
}

pub fn optional_str(details: &Value, field: &str) -> Option<String> {
    details[field]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

pub fn required_f64(details: &Value, field: &str) -> Result<f64> {
    let Some(value) = details[field].as_f64() else {
        return Err(format!("Not found '{field}' field").into());
    };
    Ok(value)
}

pub fn optional_f64(details: &Value, field: &str) -> Option<f64> {
    details[field].as_f64()
}

pub fn str_array(details: &Value, field: &str) -> Vec<String> {
    match details[field].as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        None => vec![],
    }
}

pub fn required_datetime(details: &Value, field: &str) -> Result<DateTime<FixedOffset>> {
    let value = required_str(details, field)?;
    let Ok(datetime) = DateTime::parse_from_rfc3339(value) else {
        return Err(format!("Not a valid date time: {}", value).into());
    };
    Ok(datetime)
}

pub fn required_utc(details: &Value, field: &str) -> Result<DateTime<Utc>> {
    required_datetime(details, field).map(|d| d.with_timezone(&Utc))
}

pub fn optional_utc(details: &Value, field: &str) -> Result<Option<DateTime<Utc>>> {
    match details[field].as_str() {
        None => Ok(None),
        Some(_) => required_utc(details, field).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_str_names_missing_field() {
        let details = json!({ "title": "x" });
        let err = required_str(&details, "status").unwrap_err();
        assert_eq!(err.to_string(), "Not found 'status' field");
    }

    #[test]
    fn optional_str_treats_empty_as_missing() {
        let details = json!({ "reason": "" });
        assert_eq!(optional_str(&details, "reason"), None);
    }

    #[test]
    fn entries_keep_file_order() {
        let map = entries(r#"{ "b": {}, "a": {}, "c": {} }"#).unwrap();
        let keys = map.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn invalid_datetime_is_rejected() {
        let details = json!({ "createdAt": "yesterday" });
        assert!(required_utc(&details, "createdAt").is_err());
    }
}
