use serde::{Serialize, Serializer};

/// One entry from a catalog search listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListItemRecord {
    pub title: String,
    pub url: String,
    pub cover_image: String,
    pub description: String,
    #[serde(serialize_with = "join_genres")]
    pub genres: Vec<String>,
    pub status: String,
    pub last_updated: String,
    pub latest_chapter: String,
}

/// Fields scraped from a single item page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub title: String,
    pub cover_image: String,
    pub description: String,
    #[serde(serialize_with = "join_genres")]
    pub genres: Vec<String>,
    pub status: String,
}

impl ListItemRecord {
    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }
}

impl DetailRecord {
    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }
}

fn join_genres<S: Serializer>(genres: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&genres.join(", "))
}
