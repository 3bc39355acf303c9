use crate::errors::{AppError, AppResult};
use crate::models::Project;
use crate::store::Store;

fn required_name(value: &str, label: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", label)));
    }
    Ok(trimmed.to_string())
}

pub fn project_create(store: &Store, name: &str) -> AppResult<()> {
    let name = required_name(name, "project name")?;
    store.apply(|doc| {
        if doc.projects.contains_key(&name) {
            return Err(AppError::Validation(format!("project '{}' already exists", name)));
        }
        doc.projects.insert(name.clone(), Project::new(&name));
        Ok(())
    })?;
    tracing::info!(project = %name, "project created");
    Ok(())
}

pub fn projects_list(store: &Store) -> AppResult<Vec<String>> {
    store.read(|doc| doc.projects.keys().cloned().collect())
}

pub fn project_exists(store: &Store, name: &str) -> AppResult<bool> {
    store.read(|doc| doc.projects.contains_key(name))
}

pub fn project_get(store: &Store, name: &str) -> AppResult<Option<Project>> {
    store.read(|doc| doc.projects.get(name).cloned())
}

/// Renaming a project to its own (trimmed) name succeeds without a write.
pub fn project_rename(store: &Store, old_name: &str, new_name: &str) -> AppResult<()> {
    let from = required_name(old_name, "current project name")?;
    let to = required_name(new_name, "new project name")?;

    if from == to {
        return if project_exists(store, &from)? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("project '{}' not found", from)))
        };
    }

    store.apply(|doc| {
        if !doc.projects.contains_key(&from) {
            return Err(AppError::NotFound(format!("project '{}' not found", from)));
        }
        if doc.projects.contains_key(&to) {
            return Err(AppError::Validation(format!("project '{}' already exists", to)));
        }
        let Some(mut project) = doc.projects.shift_remove(&from) else {
            return Err(AppError::NotFound(format!("project '{}' not found", from)));
        };
        project.name = to.clone();
        doc.projects.insert(to.clone(), project);
        Ok(())
    })?;
    tracing::info!(from = %from, to = %to, "project renamed");
    Ok(())
}

pub fn project_delete(store: &Store, name: &str) -> AppResult<()> {
    let name = required_name(name, "project name")?;
    let removed = store.apply(|doc| {
        doc.projects
            .shift_remove(&name)
            .ok_or_else(|| AppError::NotFound(format!("project '{}' not found", name)))
    })?;
    tracing::info!(project = %name, files = removed.files.len(), "project deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use std::sync::Arc;

    fn store() -> Store {
        Store::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn create_then_exists() {
        let store = store();
        project_create(&store, "  Photos ").expect("create");
        assert!(project_exists(&store, "Photos").expect("exists"));
        let project = project_get(&store, "Photos").expect("get").expect("project");
        assert_eq!(project.name, "Photos");
        assert!(project.files.is_empty());
    }

    #[test]
    fn duplicate_create_fails_and_keeps_one_project() {
        let store = store();
        project_create(&store, "Photos").expect("create");
        let error = project_create(&store, "Photos").expect_err("duplicate must fail");
        assert!(matches!(error, AppError::Validation(_)));
        assert_eq!(projects_list(&store).expect("list"), vec!["Photos".to_string()]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let store = store();
        assert!(matches!(project_create(&store, "   "), Err(AppError::Validation(_))));
        assert!(matches!(project_delete(&store, ""), Err(AppError::Validation(_))));
        assert!(matches!(project_rename(&store, "a", " "), Err(AppError::Validation(_))));
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = store();
        project_create(&store, "docs").expect("create");
        project_create(&store, "Docs").expect("different case is a different project");
        assert_eq!(projects_list(&store).expect("list").len(), 2);
    }

    #[test]
    fn list_keeps_insertion_order() {
        let store = store();
        for name in ["zeta", "alpha", "mid"] {
            project_create(&store, name).expect("create");
        }
        assert_eq!(projects_list(&store).expect("list"), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn rename_moves_project_and_updates_name() {
        let store = store();
        project_create(&store, "one").expect("create");
        project_create(&store, "two").expect("create");
        project_rename(&store, "one", "uno").expect("rename");

        assert!(!project_exists(&store, "one").expect("exists"));
        let renamed = project_get(&store, "uno").expect("get").expect("project");
        assert_eq!(renamed.name, "uno");
        assert_eq!(projects_list(&store).expect("list"), vec!["two", "uno"]);
    }

    #[test]
    fn rename_rejects_collisions_and_missing_sources() {
        let store = store();
        project_create(&store, "a").expect("create");
        project_create(&store, "b").expect("create");
        assert!(matches!(project_rename(&store, "a", "b"), Err(AppError::Validation(_))));
        assert!(matches!(project_rename(&store, "ghost", "c"), Err(AppError::NotFound(_))));
        assert!(project_exists(&store, "a").expect("exists"));
    }

    #[test]
    fn same_name_rename_is_a_noop_success() {
        let store = store();
        project_create(&store, "keep").expect("create");
        project_rename(&store, "keep", " keep ").expect("no-op rename");
        assert_eq!(projects_list(&store).expect("list"), vec!["keep"]);
        assert!(matches!(project_rename(&store, "ghost", "ghost"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn delete_removes_project() {
        let store = store();
        project_create(&store, "tmp").expect("create");
        project_delete(&store, "tmp").expect("delete");
        assert!(!project_exists(&store, "tmp").expect("exists"));
        assert!(matches!(project_delete(&store, "tmp"), Err(AppError::NotFound(_))));
    }
}
