use crate::tags::TagSet;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of everything persisted under the data slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub projects: IndexMap<String, Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
        }
    }

    pub fn file(&self, file_id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|file| file.id == file_id)
    }

    pub fn file_mut(&mut self, file_id: &str) -> Option<&mut FileRecord> {
        self.files.iter_mut().find(|file| file.id == file_id)
    }

    pub fn newest_stamp(&self) -> Option<DateTime<Utc>> {
        self.files.iter().map(|file| file.created_at).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data_url: String,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl AsRef<FileRecord> for FileRecord {
    fn as_ref(&self) -> &FileRecord {
        self
    }
}

/// A file returned by global search, carrying the project it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalHit {
    #[serde(flatten)]
    pub file: FileRecord,
    pub project_name: String,
}

impl AsRef<FileRecord> for GlobalHit {
    fn as_ref(&self) -> &FileRecord {
        &self.file
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    CreatedAt,
    Name,
    Tag,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Name => "name",
            Self::Tag => "tag",
        }
    }

    /// Unknown values fall back to newest-first.
    pub fn from_client(value: &str) -> Self {
        match value {
            "name" => Self::Name,
            "tag" => Self::Tag,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Timestamps as `2024-05-01T10:00:00.123Z`, the layout browsers emit.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
