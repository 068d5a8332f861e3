use serde::{Deserialize, Serialize};

/// One video entry from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub year: i64,
    pub rank: i64,
    pub title: String,
    pub url: String,
    pub channel: String,
    pub channel_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub run_time: String,
    pub upload_date: String,
    pub format: String,
}

impl Record {
    /// Year as the selector value used by the year filter.
    pub fn year_key(&self) -> String {
        self.year.to_string()
    }

    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.channel.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
pub(crate) fn sample(year: i64, rank: i64, title: &str, format: &str) -> Record {
    Record {
        year,
        rank,
        title: title.to_string(),
        url: format!("https://www.youtube.com/watch?v={}{}", year, rank),
        channel: "Some Channel".to_string(),
        channel_url: "https://www.youtube.com/@somechannel".to_string(),
        tags: Vec::new(),
        run_time: "0:10:00".to_string(),
        upload_date: format!("{}-01-01", year),
        format: format.to_string(),
    }
}
