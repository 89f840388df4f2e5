//! Core types for media-catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::feed::{EpisodeInfo, ShowInfo};

/// Unique identifier for a catalog entry
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// Implement sqlx Type, Encode, and Decode for database operations
impl sqlx::Type<sqlx::Sqlite> for EntryId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for EntryId {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for EntryId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(id))
    }
}

/// Opaque identifier of a background download task
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Allocate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media category of an entry, fixed at creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Audio files with tag metadata
    Music,
    /// Images with thumbnails
    Photo,
    /// Shows (directories) and downloaded episodes (files)
    Podcast,
}

impl Category {
    /// All categories, in a stable order
    pub const ALL: [Category; 3] = [Category::Music, Category::Photo, Category::Podcast];

    /// Storage/text form of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Music => "music",
            Category::Photo => "photo",
            Category::Podcast => "podcast",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "music" => Ok(Category::Music),
            "photo" => Ok(Category::Photo),
            "podcast" => Ok(Category::Podcast),
            other => Err(crate::Error::UnsupportedCategory(other.to_string())),
        }
    }
}

/// Whether an entry is a file or a directory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory (the only kind allowed to have children)
    Directory,
}

impl EntryKind {
    /// Storage/text form of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "dir",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(EntryKind::File),
            "dir" => Ok(EntryKind::Directory),
            other => Err(crate::Error::Other(format!("unknown entry kind '{}'", other))),
        }
    }
}

// Category and EntryKind are stored as TEXT columns
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Sqlite> for $ty {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <&str as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
                sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.as_str().to_string(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $ty {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                text.parse::<$ty>().map_err(|e| Box::new(e) as sqlx::error::BoxDynError)
            }
        }
    };
}

text_column!(Category);
text_column!(EntryKind);

/// One node of the catalog as exposed to callers
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    /// Stable identifier
    pub id: EntryId,
    /// File or directory
    pub kind: EntryKind,
    /// Media category
    pub category: Category,
    /// Absolute filesystem path
    pub path: PathBuf,
    /// Display name (title for audio, stem for photos, show/episode title)
    pub display_name: Option<String>,
    /// Base64-encoded JPEG thumbnail
    pub artwork: Option<String>,
    /// Artist (music only)
    pub artist: Option<String>,
    /// Album (music only)
    pub album: Option<String>,
    /// Feed URL for shows, audio URL for episodes
    pub source_url: Option<String>,
    /// Show or episode description
    pub description: Option<String>,
    /// Containing directory entry
    pub parent_id: Option<EntryId>,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
}

/// Additions and removals applied to one category root during a full sync
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySyncReport {
    /// Category whose root was walked
    pub category: Option<Category>,
    /// Entries created for newly discovered filesystem objects
    pub added: usize,
    /// Entries deleted because their path vanished
    pub removed: usize,
}

/// Result of a full sync
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SyncReport {
    /// Per-category breakdown, in sync order
    pub categories: Vec<CategorySyncReport>,
    /// Total entries added
    pub added: usize,
    /// Total entries removed
    pub removed: usize,
}

/// Result of refreshing a single directory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Photo/music directory rescanned against disk
    Rescanned {
        /// File entries created
        added: usize,
        /// File entries removed
        removed: usize,
    },
    /// Podcast feed has nothing that is not already in the catalog
    NoNewEpisodes,
    /// Podcast feed lists episodes missing from the catalog; nothing was added
    NewEpisodes {
        /// Feed the show was subscribed from
        feed_url: String,
        /// Episodes not yet present, in feed order
        candidates: Vec<EpisodeInfo>,
        /// Titles of episodes already in the catalog
        existing: Vec<String>,
    },
}

/// Result of deleting an entry and its backing filesystem objects
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteOutcome {
    /// Whether both filesystem and catalog removals completed
    pub success: bool,
    /// Failure description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Filesystem objects removed; on failure these are not restored
    pub removed_paths: Vec<PathBuf>,
}

impl DeleteOutcome {
    pub(crate) fn failed(error: impl std::fmt::Display, removed_paths: Vec<PathBuf>) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            removed_paths,
        }
    }
}

/// Feed contents prepared for an episode selection step
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedListing {
    /// Feed URL
    pub feed_url: String,
    /// Show metadata
    pub show: ShowInfo,
    /// Episodes in feed order
    pub episodes: Vec<EpisodeInfo>,
    /// Titles already present in the catalog for this show
    pub existing: Vec<String>,
}

/// Lifecycle state of a background task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskState {
    /// Worker still running
    Running,
    /// Worker finished every unit of work
    Completed,
    /// Worker aborted; progress stays where it stalled
    Failed {
        /// Error that aborted the worker
        error: String,
    },
}

impl TaskState {
    /// Whether the worker has stopped
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskState::Running)
    }
}

/// Snapshot of a background task
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskStatus {
    /// Task identifier
    pub task_id: TaskId,
    /// Progress 0-100
    pub progress: u8,
    /// Lifecycle state
    #[serde(flatten)]
    pub state: TaskState,
    /// When the task was submitted
    pub created_at: DateTime<Utc>,
    /// When the worker stopped
    pub finished_at: Option<DateTime<Utc>>,
}
