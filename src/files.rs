use crate::data_url;
use crate::errors::{silence_not_found, AppError, AppResult};
use crate::models::{Document, FileRecord};
use crate::store::Store;
use crate::tags::TagSet;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_EXTENSION_TAG: &str = "file";

/// One file handed over by the front end for ingestion.
#[derive(Debug, Clone)]
pub enum UploadSource {
    Path(PathBuf),
    Bytes {
        name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

impl UploadSource {
    pub fn bytes(name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: name.to_string(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    /// Returns the display name and the encoded data URL.
    async fn ingest(&self) -> AppResult<(String, String)> {
        match self {
            Self::Path(path) => {
                let name = path
                    .file_name()
                    .and_then(|value| value.to_str())
                    .ok_or_else(|| AppError::Validation(format!("unusable file name: {}", path.display())))?
                    .to_string();
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|error| AppError::Io(format!("failed to read {}: {}", path.display(), error)))?;
                let url = data_url::encode(&data_url::mime_for_name(&name), &bytes);
                Ok((name, url))
            }
            Self::Bytes { name, bytes, mime } => {
                let mime = mime.clone().unwrap_or_else(|| data_url::mime_for_name(name));
                Ok((name.clone(), data_url::encode(&mime, bytes)))
            }
        }
    }
}

/// Lowercased last `.`-segment of the name. A dotless name is its own
/// segment; only an empty segment falls back to `"file"`.
pub fn extension_tag(name: &str) -> String {
    let segment = name.rsplit('.').next().unwrap_or_default().trim();
    if segment.is_empty() {
        DEFAULT_EXTENSION_TAG.to_string()
    } else {
        segment.to_lowercase()
    }
}

/// Stamps are kept at millisecond precision and strictly after `floor`.
fn next_stamp(floor: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    let now = DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
    match floor {
        Some(floor) if now <= floor => floor + Duration::milliseconds(1),
        _ => now,
    }
}

fn locate_mut<'a>(doc: &'a mut Document, project_name: &str, file_id: &str) -> AppResult<&'a mut FileRecord> {
    doc.projects
        .get_mut(project_name)
        .ok_or_else(|| AppError::NotFound(format!("project '{}' not found", project_name)))?
        .file_mut(file_id)
        .ok_or_else(|| AppError::NotFound(format!("file '{}' not found in '{}'", file_id, project_name)))
}

/// Reads every source in order, then appends the whole batch in a single
/// write. A failed read aborts the batch before anything is committed.
pub async fn files_add(store: &Store, project_name: &str, sources: &[UploadSource]) -> AppResult<Vec<FileRecord>> {
    if sources.is_empty() {
        return Ok(Vec::new());
    }
    let Some(mut floor) = store.read(|doc| doc.projects.get(project_name).map(|project| project.newest_stamp()))? else {
        tracing::debug!(project = %project_name, "upload target missing");
        return Ok(Vec::new());
    };

    let mut new_files = Vec::with_capacity(sources.len());
    for source in sources {
        let (name, data_url) = source.ingest().await?;
        let created_at = next_stamp(floor);
        floor = Some(created_at);
        new_files.push(FileRecord {
            id: Uuid::new_v4().to_string(),
            tags: TagSet::normalized([extension_tag(&name)]),
            name,
            data_url,
            created_at,
        });
    }

    let committed = silence_not_found(store.apply(|doc| {
        let project = doc
            .projects
            .get_mut(project_name)
            .ok_or_else(|| AppError::NotFound(format!("project '{}' not found", project_name)))?;
        project.files.extend(new_files.iter().cloned());
        Ok(())
    }))?;
    if committed.is_none() {
        return Ok(Vec::new());
    }

    tracing::info!(project = %project_name, count = new_files.len(), "files added");
    Ok(new_files)
}

pub fn file_get(store: &Store, project_name: &str, file_id: &str) -> AppResult<Option<FileRecord>> {
    store.read(|doc| {
        doc.projects
            .get(project_name)
            .and_then(|project| project.file(file_id))
            .cloned()
    })
}

/// Returns whether a file was removed; missing targets are a silent no-op.
pub fn file_delete(store: &Store, project_name: &str, file_id: &str) -> AppResult<bool> {
    let removed = silence_not_found(store.apply(|doc| {
        let project = doc
            .projects
            .get_mut(project_name)
            .ok_or_else(|| AppError::NotFound(format!("project '{}' not found", project_name)))?;
        let index = project
            .files
            .iter()
            .position(|file| file.id == file_id)
            .ok_or_else(|| AppError::NotFound(format!("file '{}' not found in '{}'", file_id, project_name)))?;
        Ok(project.files.remove(index))
    }))?;

    if let Some(file) = &removed {
        tracing::info!(project = %project_name, file_id = %file.id, "file deleted");
    }
    Ok(removed.is_some())
}

pub fn file_rename(
    store: &Store,
    project_name: &str,
    file_id: &str,
    new_name: &str,
) -> AppResult<Option<FileRecord>> {
    let name = new_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("file name must not be blank".to_string()));
    }
    silence_not_found(store.apply(|doc| {
        let file = locate_mut(doc, project_name, file_id)?;
        file.name = name.to_string();
        Ok(file.clone())
    }))
}

fn update_tags(
    store: &Store,
    project_name: &str,
    file_id: &str,
    update: impl FnOnce(&TagSet) -> TagSet,
) -> AppResult<Option<FileRecord>> {
    silence_not_found(store.apply(|doc| {
        let file = locate_mut(doc, project_name, file_id)?;
        file.tags = update(&file.tags);
        Ok(file.clone())
    }))
}

pub fn file_set_tags<I, S>(store: &Store, project_name: &str, file_id: &str, tags: I) -> AppResult<Option<FileRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalized = TagSet::normalized(tags);
    update_tags(store, project_name, file_id, |_| normalized)
}

pub fn file_add_tag(store: &Store, project_name: &str, file_id: &str, tag: &str) -> AppResult<Option<FileRecord>> {
    update_tags(store, project_name, file_id, |current| current.with(tag))
}

pub fn file_remove_tag(store: &Store, project_name: &str, file_id: &str, tag: &str) -> AppResult<Option<FileRecord>> {
    update_tags(store, project_name, file_id, |current| current.without(tag))
}

/// Decodes the stored content into `dest_dir`, named after the file.
pub fn file_export(store: &Store, project_name: &str, file_id: &str, dest_dir: &Path) -> AppResult<Option<PathBuf>> {
    let Some(file) = file_get(store, project_name, file_id)? else {
        return Ok(None);
    };
    let file_name = Path::new(&file.name)
        .file_name()
        .ok_or_else(|| AppError::Validation(format!("cannot export file named '{}'", file.name)))?;
    let decoded = data_url::decode(&file.data_url)?;

    fs::create_dir_all(dest_dir)?;
    let target = dest_dir.join(file_name);
    fs::write(&target, &decoded.bytes)?;
    tracing::info!(project = %project_name, file_id = %file_id, path = %target.display(), "file exported");
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::projects::project_create;
    use std::sync::Arc;

    fn store_with(project: &str) -> Store {
        let store = Store::load(Arc::new(MemoryStorage::new()));
        project_create(&store, project).expect("create project");
        store
    }

    #[test]
    fn extension_tag_rules() {
        assert_eq!(extension_tag("cat.JPG"), "jpg");
        assert_eq!(extension_tag("archive.tar.GZ"), "gz");
        assert_eq!(extension_tag("README"), "readme");
        assert_eq!(extension_tag("trailing."), "file");
        assert_eq!(extension_tag(""), "file");
        assert_eq!(extension_tag(".gitignore"), "gitignore");
    }

    #[test]
    fn stamps_never_repeat() {
        let first = next_stamp(None);
        let second = next_stamp(Some(first));
        let third = next_stamp(Some(second));
        assert!(first < second && second < third);
        assert_eq!(first.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn upload_seeds_extension_tag_and_data_url() {
        let store = store_with("Photos");
        let added = files_add(&store, "Photos", &[UploadSource::bytes("cat.JPG", b"meow".to_vec())])
            .await
            .expect("add");

        assert_eq!(added.len(), 1);
        let file = &added[0];
        assert_eq!(file.name, "cat.JPG");
        assert_eq!(file.tags.to_vec(), vec!["jpg"]);
        assert_eq!(file.data_url, "data:image/jpeg;base64,bWVvdw==");
        assert!(Uuid::parse_str(&file.id).is_ok());

        let stored = file_get(&store, "Photos", &file.id).expect("get").expect("stored");
        assert_eq!(&stored, file);
    }

    #[tokio::test]
    async fn upload_reads_paths_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.TXT");
        fs::write(&path, "hello").expect("write fixture");

        let store = store_with("Docs");
        let added = files_add(&store, "Docs", &[UploadSource::Path(path)]).await.expect("add");
        assert_eq!(added[0].name, "notes.TXT");
        assert_eq!(added[0].tags.to_vec(), vec!["txt"]);
        assert_eq!(added[0].data_url, "data:text/plain;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn upload_to_missing_project_or_empty_batch_is_empty() {
        let store = store_with("Docs");
        let none = files_add(&store, "Ghost", &[UploadSource::bytes("a.txt", b"a".to_vec())])
            .await
            .expect("missing project");
        assert!(none.is_empty());

        let empty = files_add(&store, "Docs", &[]).await.expect("empty batch");
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn failed_read_commits_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with("Docs");
        let sources = vec![
            UploadSource::bytes("ok.txt", b"fine".to_vec()),
            UploadSource::Path(dir.path().join("missing.bin")),
        ];

        let error = files_add(&store, "Docs", &sources).await.expect_err("missing file must fail");
        assert!(matches!(error, AppError::Io(_)));
        let project = store.read(|doc| doc.projects["Docs"].clone()).expect("read");
        assert!(project.files.is_empty());
    }

    #[tokio::test]
    async fn batch_stamps_increase_in_order() {
        let store = store_with("Photos");
        let added = files_add(
            &store,
            "Photos",
            &[
                UploadSource::bytes("a.png", b"a".to_vec()),
                UploadSource::bytes("b.png", b"b".to_vec()),
                UploadSource::bytes("c.png", b"c".to_vec()),
            ],
        )
        .await
        .expect("add");
        assert!(added[0].created_at < added[1].created_at);
        assert!(added[1].created_at < added[2].created_at);
    }

    #[tokio::test]
    async fn rename_and_tag_updates() {
        let store = store_with("Docs");
        let added = files_add(&store, "Docs", &[UploadSource::bytes("draft.md", b"#".to_vec())])
            .await
            .expect("add");
        let id = added[0].id.clone();

        let renamed = file_rename(&store, "Docs", &id, "  final.md ").expect("rename").expect("exists");
        assert_eq!(renamed.name, "final.md");
        assert!(matches!(file_rename(&store, "Docs", &id, "  "), Err(AppError::Validation(_))));

        let tagged = file_add_tag(&store, "Docs", &id, " work ").expect("add tag").expect("exists");
        assert_eq!(tagged.tags.to_vec(), vec!["md", "work"]);
        let again = file_add_tag(&store, "Docs", &id, "work").expect("add tag").expect("exists");
        assert_eq!(again.tags.len(), 2);

        let untagged = file_remove_tag(&store, "Docs", &id, "md").expect("remove").expect("exists");
        assert_eq!(untagged.tags.to_vec(), vec!["work"]);

        let replaced = file_set_tags(&store, "Docs", &id, ["a", "A", "a ", ""]).expect("set").expect("exists");
        assert_eq!(replaced.tags.to_vec(), vec!["a", "A"]);
        let stable = file_set_tags(&store, "Docs", &id, replaced.tags.to_vec()).expect("set").expect("exists");
        assert_eq!(stable.tags.to_vec(), replaced.tags.to_vec());
    }

    #[tokio::test]
    async fn operations_on_missing_targets_are_silent() {
        let store = store_with("Docs");
        assert!(!file_delete(&store, "Docs", "nope").expect("delete"));
        assert!(!file_delete(&store, "Ghost", "nope").expect("delete"));
        assert!(file_rename(&store, "Docs", "nope", "x").expect("rename").is_none());
        assert!(file_add_tag(&store, "Ghost", "nope", "x").expect("tag").is_none());
        assert!(file_get(&store, "Docs", "nope").expect("get").is_none());
    }

    #[tokio::test]
    async fn deleted_file_is_no_longer_found() {
        let store = store_with("Docs");
        let added = files_add(&store, "Docs", &[UploadSource::bytes("a.txt", b"a".to_vec())])
            .await
            .expect("add");
        let id = added[0].id.clone();

        assert!(file_delete(&store, "Docs", &id).expect("delete"));
        assert!(file_get(&store, "Docs", &id).expect("get").is_none());
    }

    #[tokio::test]
    async fn export_writes_decoded_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with("Docs");
        let added = files_add(&store, "Docs", &[UploadSource::bytes("blob.bin", vec![0u8, 159, 255])])
            .await
            .expect("add");

        let path = file_export(&store, "Docs", &added[0].id, &dir.path().join("out"))
            .expect("export")
            .expect("exists");
        assert_eq!(path.file_name().and_then(|v| v.to_str()), Some("blob.bin"));
        assert_eq!(fs::read(&path).expect("read back"), vec![0u8, 159, 255]);

        assert!(file_export(&store, "Docs", "nope", dir.path()).expect("export").is_none());
    }
}
