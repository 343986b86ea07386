use foundation::geo::GeoPoint;
use serde::Deserialize;

/// One persisted journal entry as served by the backend, fetched once at
/// mount. Only the fields this subsystem consumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    pub id: String,
    pub title: String,
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl JournalRecord {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::JournalRecord;

    #[test]
    fn deserializes_backend_camel_case() {
        let body = r#"[{
            "id": "a",
            "title": "Paris Trip",
            "placeName": "Paris, France",
            "latitude": 48.8566,
            "longitude": 2.3522
        }]"#;
        let records: Vec<JournalRecord> = serde_json::from_str(body).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Paris Trip");
        assert_eq!(records[0].place_name, "Paris, France");
        assert_eq!(records[0].location().latitude, 48.8566);
    }
}
