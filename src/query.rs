use crate::errors::AppResult;
use crate::models::{FileRecord, GlobalHit, SortMode};
use crate::store::Store;
use std::cmp::Ordering;

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Every token must match. `#term` looks at tags only; a bare `#` matches
/// anything. Plain tokens look at the name and the tags.
pub fn matches(file: &FileRecord, tokens: &[String]) -> bool {
    let name = file.name.to_lowercase();
    let tags: Vec<String> = file.tags.iter().map(str::to_lowercase).collect();
    let in_tags = |needle: &str| tags.iter().any(|tag| tag.contains(needle));

    tokens.iter().all(|token| match token.strip_prefix('#') {
        Some(rest) => rest.is_empty() || in_tags(rest),
        None => name.contains(token.as_str()) || in_tags(token.as_str()),
    })
}

/// Case-insensitive order; on a tie lowercase sorts before uppercase.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn sort_files<T: AsRef<FileRecord>>(files: &mut [T], mode: SortMode) {
    match mode {
        SortMode::Name => files.sort_by(|a, b| compare_text(&a.as_ref().name, &b.as_ref().name)),
        SortMode::Tag => files.sort_by(|a, b| {
            compare_text(
                a.as_ref().tags.first().unwrap_or(""),
                b.as_ref().tags.first().unwrap_or(""),
            )
        }),
        SortMode::CreatedAt => files.sort_by(|a, b| b.as_ref().created_at.cmp(&a.as_ref().created_at)),
    }
}

fn filter_and_sort<T: AsRef<FileRecord>>(files: Vec<T>, tokens: &[String], mode: SortMode) -> Vec<T> {
    let mut selected: Vec<T> = if tokens.is_empty() {
        files
    } else {
        files
            .into_iter()
            .filter(|file| matches(file.as_ref(), tokens))
            .collect()
    };
    sort_files(&mut selected, mode);
    selected
}

/// Blank text lists the whole project. A missing project yields nothing.
pub fn scoped_search(store: &Store, project_name: &str, text: &str, mode: SortMode) -> AppResult<Vec<FileRecord>> {
    let files = store.read(|doc| {
        doc.projects
            .get(project_name)
            .map(|project| project.files.clone())
            .unwrap_or_default()
    })?;
    Ok(filter_and_sort(files, &tokenize(text), mode))
}

pub fn all_files(store: &Store) -> AppResult<Vec<GlobalHit>> {
    store.read(|doc| {
        doc.projects
            .iter()
            .flat_map(|(project_name, project)| {
                project.files.iter().map(move |file| GlobalHit {
                    file: file.clone(),
                    project_name: project_name.clone(),
                })
            })
            .collect()
    })
}

/// Unlike `scoped_search`, blank text returns nothing.
pub fn global_search(store: &Store, text: &str, mode: SortMode) -> AppResult<Vec<GlobalHit>> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    Ok(filter_and_sort(all_files(store)?, &tokens, mode))
}
