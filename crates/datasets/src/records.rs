use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

/// A country where the service is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: String,
    pub code: String,
    /// `[latitude, longitude]` in degrees.
    pub coordinates: [f64; 2],
    pub launch_date: String,
    pub subscribers: String,
    pub coverage: String,
    pub status: String,
}

/// A field story tied to one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub people_impacted: String,
    /// Human-readable place name.
    pub location: String,
    /// `[latitude, longitude]` in degrees.
    pub coordinates: [f64; 2],
    pub cost: String,
    pub story_link: String,
    pub color: String,
}

/// Anything that sits at a point on the globe.
pub trait Located {
    fn coordinates(&self) -> [f64; 2];

    fn geo_point(&self) -> GeoPoint {
        let [lat, lon] = self.coordinates();
        GeoPoint::new(lat, lon)
    }
}

impl Located for CountryRecord {
    fn coordinates(&self) -> [f64; 2] {
        self.coordinates
    }
}

impl Located for StoryRecord {
    fn coordinates(&self) -> [f64; 2] {
        self.coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryRecord, Located, StoryRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn country_uses_camel_case_fields() {
        let json = r#"{
            "name": "Chile",
            "code": "CL",
            "coordinates": [-35.6751, -71.543],
            "launchDate": "2021-09",
            "subscribers": "50K+",
            "coverage": "Nationwide",
            "status": "Active"
        }"#;
        let country: CountryRecord = serde_json::from_str(json).expect("valid country");
        assert_eq!(country.launch_date, "2021-09");
        assert_eq!(country.geo_point().lat_deg, -35.6751);
        assert_eq!(country.geo_point().lon_deg, -71.543);

        let back = serde_json::to_value(&country).expect("serialize");
        assert!(back.get("launchDate").is_some());
    }

    #[test]
    fn story_round_trips_through_json() {
        let story = StoryRecord {
            id: 7,
            title: "Connected clinic".to_string(),
            description: "Telemedicine for a remote clinic".to_string(),
            category: "Healthcare".to_string(),
            people_impacted: "12,000".to_string(),
            location: "Turkana, Kenya".to_string(),
            coordinates: [3.1191, 35.5966],
            cost: "$599".to_string(),
            story_link: "https://example.org/stories/7".to_string(),
            color: "#FF6666".to_string(),
        };
        let json = serde_json::to_string(&story).expect("serialize");
        assert!(json.contains("\"peopleImpacted\""));
        let parsed: StoryRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, story);
    }
}
