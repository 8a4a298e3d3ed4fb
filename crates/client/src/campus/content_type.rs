//! Catalogue of campus content the dashboard asks the assistant for.

use std::fmt;
use std::str::FromStr;

use camply_core::Error;
use serde::{Deserialize, Serialize};

/// The institution a request is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusContext {
    pub college_name: String,
    /// Stable institution id; doubles as the cache scope.
    #[serde(default)]
    pub college_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl CampusContext {
    pub fn new(college_name: impl Into<String>) -> Self {
        Self { college_name: college_name.into(), ..Default::default() }
    }

    pub fn with_id(mut self, college_id: impl Into<String>) -> Self {
        self.college_id = Some(college_id.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    fn describe(&self) -> String {
        match self.location.as_deref().filter(|l| !l.is_empty()) {
            Some(location) => format!("{} ({location})", self.college_name),
            None => self.college_name.clone(),
        }
    }
}

/// Kinds of campus information, one cache slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    CampusNews,
    Placements,
    CampusStats,
    Events,
    Academics,
    Facilities,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::CampusNews,
        ContentType::Placements,
        ContentType::CampusStats,
        ContentType::Events,
        ContentType::Academics,
        ContentType::Facilities,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::CampusNews => "campus-news",
            ContentType::Placements => "placements",
            ContentType::CampusStats => "campus-stats",
            ContentType::Events => "events",
            ContentType::Academics => "academics",
            ContentType::Facilities => "facilities",
        }
    }

    /// User prompt sent to the assistant for this content type.
    pub fn prompt(self, campus: &CampusContext) -> String {
        let college = campus.describe();
        match self {
            ContentType::CampusNews => format!(
                "Summarize the most recent news and announcements for students at {college}. \
                 Use a short headline per item followed by one or two sentences."
            ),
            ContentType::Placements => format!(
                "Give an overview of placements at {college}: top recruiters, typical packages, \
                 placement percentage and how students prepare."
            ),
            ContentType::CampusStats => format!(
                "List key statistics for {college}: student count, faculty count, campus area, \
                 rankings and accreditations."
            ),
            ContentType::Events => format!(
                "List upcoming and annual events at {college} (fests, hackathons, cultural and sports events) \
                 with approximate dates."
            ),
            ContentType::Academics => format!(
                "Describe the academic programs at {college}: departments, popular courses, \
                 semester structure and grading."
            ),
            ContentType::Facilities => format!(
                "Describe campus facilities at {college}: library, hostels, labs, sports, \
                 transport and dining."
            ),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ContentType::ALL.iter().map(|t| t.as_str()).collect();
                Error::InvalidInput(format!("unknown content type '{s}', expected one of: {}", known.join(", ")))
            })
    }
}
