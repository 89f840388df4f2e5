//! Podcast feed listing and background episode downloads

use futures::StreamExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::MediaLibrary;
use crate::db::{EntryRow, NewEntry};
use crate::error::{Error, FilesystemError, Result};
use crate::feed::{EpisodeInfo, ShowInfo};
use crate::tasks::ProgressReporter;
use crate::types::{Category, EntryId, EntryKind, FeedListing, TaskId};
use crate::utils::{safe_file_name, truncate_at_boundary};

const TASK_KIND: &str = "podcast_download";

/// Longest file name most filesystems accept, in bytes
const NAME_MAX: usize = 255;

/// Room left for ` (NNN)` and `.mp3.part` after the stem
const MAX_EPISODE_STEM: usize = NAME_MAX - " (999)".len() - ".mp3.part".len();

/// Candidate names tried per episode before giving up
const MAX_NAME_ATTEMPTS: usize = 999;

/// Reject anything that is not an absolute http(s) URL
fn validate_feed_url(feed_url: &str) -> Result<()> {
    let parsed = url::Url::parse(feed_url)
        .map_err(|e| Error::InvalidInput(format!("invalid feed URL '{}': {}", feed_url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::InvalidInput(format!(
            "unsupported feed URL scheme '{}'",
            scheme
        ))),
    }
}

/// File name an episode is stored under inside its show directory
///
/// `attempt` 1 is the plain title; later attempts add ` (2)`, ` (3)`, ...
/// so episodes whose titles sanitize to the same stem stay apart.
fn episode_file_name(title: &str, attempt: usize) -> String {
    let stem = truncate_at_boundary(&safe_file_name(title), MAX_EPISODE_STEM);
    if attempt <= 1 {
        format!("{}.mp3", stem)
    } else {
        format!("{} ({}).mp3", stem, attempt)
    }
}

fn partial_path(target: &Path) -> PathBuf {
    target.with_extension("mp3.part")
}

impl MediaLibrary {
    /// Start downloading the selected episodes of a feed in the background
    ///
    /// Returns as soon as the task is registered; poll its progress with
    /// [`MediaLibrary::poll_progress`]. Episodes already in the catalog (matched
    /// by title under the show directory) are skipped and do not count towards
    /// the total.
    pub async fn submit_podcast_download(
        &self,
        feed_url: &str,
        selected: Vec<String>,
    ) -> Result<TaskId> {
        validate_feed_url(feed_url)?;

        let library = self.clone();
        let feed_url = feed_url.to_string();
        let task_id = self
            .tasks
            .submit(TASK_KIND, move |progress| async move {
                library.download_episodes(&feed_url, selected, progress).await
            })
            .await;

        Ok(task_id)
    }

    /// Show metadata, the ordered episode list and the titles already downloaded
    pub async fn list_feed_episodes(&self, feed_url: &str) -> Result<FeedListing> {
        validate_feed_url(feed_url)?;

        let show = self.feeds.resolve_show(feed_url).await?;
        let episodes = self.feeds.list_episodes(feed_url).await?;

        let existing = match self.find_show_directory(feed_url, &show).await? {
            Some(dir) => self.db.child_names(dir.id).await?,
            None => Vec::new(),
        };

        Ok(FeedListing {
            feed_url: feed_url.to_string(),
            show,
            episodes,
            existing,
        })
    }

    fn show_path(&self, show: &ShowInfo) -> PathBuf {
        self.config
            .category_root(Category::Podcast)
            .join(safe_file_name(&show.title))
    }

    /// Catalog directory for a show, looked up by feed URL and then by path
    async fn find_show_directory(
        &self,
        feed_url: &str,
        show: &ShowInfo,
    ) -> Result<Option<EntryRow>> {
        if let Some(dir) = self.db.find_directory_by_source_url(feed_url).await? {
            return Ok(Some(dir));
        }
        Ok(self
            .db
            .find_by_path(&self.show_path(show))
            .await?
            .filter(EntryRow::is_directory))
    }

    /// Reuse or create the show directory on disk and in the catalog
    async fn ensure_show_directory(&self, feed_url: &str, show: &ShowInfo) -> Result<EntryRow> {
        if let Some(dir) = self.find_show_directory(feed_url, show).await? {
            tokio::fs::create_dir_all(dir.fs_path())
                .await
                .map_err(|e| FilesystemError::from_io(dir.fs_path(), e))?;
            debug!(entry_id = dir.id.0, "reusing show directory");
            return Ok(dir);
        }

        let path = self.show_path(show);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| FilesystemError::from_io(&path, e))?;

        let mut entry = NewEntry::new(EntryKind::Directory, Category::Podcast, &path)
            .with_display_name(&show.title);
        entry.source_url = Some(feed_url.to_string());
        entry.description = show.description.clone();
        entry.artwork = self.remote_artwork(show.image.as_deref()).await;

        let id = self.db.insert_entry(&entry).await?;
        info!(entry_id = id.0, show = %show.title, "show directory created");

        self.db
            .get_entry(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))
    }

    /// Best-effort thumbnail of a remote image
    async fn remote_artwork(&self, url: Option<&str>) -> Option<String> {
        let url = url?;
        match self
            .extractor
            .artwork_from_url(url, self.config.library.podcast_artwork_size)
            .await
        {
            Ok(artwork) => artwork,
            Err(e) => {
                warn!(url, error = %e, "artwork unavailable");
                None
            }
        }
    }

    /// Worker body of a podcast download task
    async fn download_episodes(
        &self,
        feed_url: &str,
        selected: Vec<String>,
        progress: ProgressReporter,
    ) -> Result<()> {
        let show = self.feeds.resolve_show(feed_url).await?;
        let show_dir = self.ensure_show_directory(feed_url, &show).await?;

        let episodes = self.feeds.list_episodes(feed_url).await?;
        let present: HashSet<String> = self.db.child_names(show_dir.id).await?.into_iter().collect();
        let selected: HashSet<String> = selected.into_iter().collect();

        let mut queued = HashSet::new();
        let pending: Vec<EpisodeInfo> = episodes
            .into_iter()
            .filter(|episode| {
                selected.contains(&episode.title)
                    && !present.contains(&episode.title)
                    && queued.insert(episode.title.clone())
            })
            .collect();

        let total = pending.len();
        info!(show = %show.title, total, "downloading episodes");

        if total == 0 {
            progress.complete();
            return Ok(());
        }

        for (index, episode) in pending.iter().enumerate() {
            self.download_episode(show_dir.id, show_dir.fs_path(), episode)
                .await?;
            progress.set_fraction(index + 1, total);
        }

        progress.complete();
        Ok(())
    }

    /// Fetch one episode into the show directory and catalog it
    async fn download_episode(
        &self,
        show_id: EntryId,
        show_dir: &Path,
        episode: &EpisodeInfo,
    ) -> Result<()> {
        let audio_url = episode.audio_url.as_deref().ok_or_else(|| {
            Error::Feed(format!("episode '{}' has no audio URL", episode.title))
        })?;

        let (target, file) = self.claim_episode_path(show_dir, &episode.title).await?;
        let bytes = self.fetch_to_file(audio_url, &target, file).await?;
        debug!(episode = %episode.title, path = %target.display(), bytes, "episode fetched");

        let mut entry = NewEntry::new(EntryKind::File, Category::Podcast, &target)
            .with_display_name(&episode.title)
            .with_parent(Some(show_id));
        entry.source_url = Some(audio_url.to_string());
        entry.description = episode.description.clone();
        entry.artwork = self.remote_artwork(episode.image.as_deref()).await;

        let id = self.db.insert_entry(&entry).await?;
        info!(entry_id = id.0, episode = %episode.title, "episode downloaded");
        Ok(())
    }

    /// Pick a file name for an episode that is neither on disk nor cataloged
    ///
    /// The name is reserved by exclusively creating its `.part` file, which
    /// is returned open for writing.
    async fn claim_episode_path(&self, show_dir: &Path, title: &str) -> Result<(PathBuf, File)> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let target = show_dir.join(episode_file_name(title, attempt));
            if tokio::fs::symlink_metadata(&target).await.is_ok()
                || self.db.find_by_path(&target).await?.is_some()
            {
                continue;
            }

            let partial = partial_path(&target);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&partial)
                .await
            {
                Ok(file) => {
                    if attempt > 1 {
                        debug!(episode = title, path = %target.display(), "episode name disambiguated");
                    }
                    return Ok((target, file));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(FilesystemError::from_io(&partial, e).into()),
            }
        }

        Err(Error::Other(format!(
            "no free file name for episode '{}' in {}",
            title,
            show_dir.display()
        )))
    }

    /// Stream a URL into the reserved `.part` file, then move it to `target`
    ///
    /// Returns the byte count. The `.part` file is removed on failure.
    async fn fetch_to_file(&self, url: &str, target: &Path, file: File) -> Result<u64> {
        let partial = partial_path(target);
        let result: Result<u64> = async {
            let response = self.episode_client.get(url).send().await?.error_for_status()?;
            write_stream(response, file, &partial).await
        }
        .await;

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, target)
            .await
            .map_err(|e| FilesystemError::from_io(target, e))?;
        Ok(bytes)
    }
}

async fn write_stream(response: reqwest::Response, mut file: File, path: &Path) -> Result<u64> {
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| FilesystemError::from_io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| FilesystemError::from_io(path, e))?;
    Ok(written)
}
