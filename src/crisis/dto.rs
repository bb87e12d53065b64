use serde::{Deserialize, Serialize};

use super::repo::CrisisResource;

fn default_country() -> String {
    "US".into()
}

#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub title: String,
    pub description: String,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResource {
    pub title: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    pub country: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub message: &'static str,
    pub resource: CrisisResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_defaults_to_us() {
        let payload: CreateResource =
            serde_json::from_str(r#"{"title":"Lifeline","description":"24/7 hotline"}"#).unwrap();
        assert_eq!(payload.country, "US");
    }
}
