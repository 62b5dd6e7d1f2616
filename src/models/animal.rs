use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Adoption status of an animal in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalStatus {
    Available,
    Pending,
    Adopted,
    Fostered,
}

impl std::fmt::Display for AnimalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimalStatus::Available => write!(f, "Available"),
            AnimalStatus::Pending => write!(f, "Adoption pending"),
            AnimalStatus::Adopted => write!(f, "Adopted"),
            AnimalStatus::Fostered => write!(f, "In foster care"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub age_months: Option<u32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub status: AnimalStatus,
    #[serde(default)]
    pub shelter_city: Option<String>,
}

impl Animal {
    pub fn is_available(&self) -> bool {
        self.status == AnimalStatus::Available
    }

    /// Age rendered as "2 yr 3 mo" / "5 mo" / "age unknown"
    pub fn display_age(&self) -> String {
        match self.age_months {
            Some(months) if months >= 12 => {
                let years = months / 12;
                let rest = months % 12;
                if rest == 0 {
                    format!("{} yr", years)
                } else {
                    format!("{} yr {} mo", years, rest)
                }
            }
            Some(months) => format!("{} mo", months),
            None => "age unknown".to_string(),
        }
    }
}

/// Filters for the catalog listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct AnimalQuery {
    pub species: Option<String>,
    pub status: Option<AnimalStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl AnimalQuery {
    /// Render as a percent-encoded query string, empty when no filter is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(ref species) = self.species {
            serializer.append_pair("species", species);
        }
        if let Some(status) = self.status {
            let value = match status {
                AnimalStatus::Available => "available",
                AnimalStatus::Pending => "pending",
                AnimalStatus::Adopted => "adopted",
                AnimalStatus::Fostered => "fostered",
            };
            serializer.append_pair("status", value);
        }
        if let Some(ref search) = self.search {
            serializer.append_pair("search", search);
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        let encoded = serializer.finish();
        if encoded.is_empty() {
            String::new()
        } else {
            format!("?{}", encoded)
        }
    }
}
