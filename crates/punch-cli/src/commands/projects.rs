//! Project maintenance: list, add, edit, delete.

use anyhow::{Result, bail};

use punch_core::{AVAILABLE_ICONS, Project, ProjectId, ProjectUpdate, TimerState};
use punch_store::Store;

use crate::commands::util::{resolve_project, slugify};

/// Colors handed to new projects that don't pick one, cycling in creation
/// order.
const PROJECT_COLORS: &[&str] = &[
    "#5f8eed", "#50c878", "#e8a33d", "#d96c6c", "#aa66cc", "#4db6ac", "#f06292", "#9575cd",
];

fn validate_icon(icon: Option<&str>) -> Result<Option<String>> {
    match icon {
        None => Ok(None),
        Some(name) if AVAILABLE_ICONS.contains(&name) => Ok(Some(name.to_string())),
        Some(name) => bail!(
            "unknown icon '{name}' (available: {})",
            AVAILABLE_ICONS.join(", ")
        ),
    }
}

/// Lists all projects.
pub fn list(store: &Store) -> Result<()> {
    for project in store.projects() {
        println!(
            "{:<20}{:<24}{:<10}{}",
            project.id,
            project.name,
            project.color,
            project.icon_or_default()
        );
    }
    Ok(())
}

/// Creates a project; the ID is derived from the name.
pub fn add(store: &mut Store, name: &str, color: Option<&str>, icon: Option<&str>) -> Result<()> {
    let slug = slugify(name);
    if slug.is_empty() {
        bail!("project name '{name}' has no usable characters for an ID");
    }
    let icon = validate_icon(icon)?;
    let color = color.map_or_else(
        || PROJECT_COLORS[store.projects().len() % PROJECT_COLORS.len()].to_string(),
        ToString::to_string,
    );

    let project = Project {
        id: ProjectId::new(slug.clone())?,
        name: name.to_string(),
        color,
        icon,
    };
    store.add_project(project)?;
    println!("Added project {slug}");
    Ok(())
}

/// Changes a project's name, color, or icon.
pub fn edit(
    store: &mut Store,
    key: &str,
    name: Option<&str>,
    color: Option<&str>,
    icon: Option<&str>,
) -> Result<()> {
    let id = resolve_project(store, key)?.id.clone();
    let update = ProjectUpdate {
        name: name.map(ToString::to_string),
        color: color.map(ToString::to_string),
        icon: validate_icon(icon)?,
    };
    if update.is_empty() {
        bail!("nothing to change; pass --name, --color, or --icon");
    }
    store.update_project(&id, &update)?;
    println!("Updated project {id}");
    Ok(())
}

/// Deletes a project and every session recorded against it.
///
/// Refuses to remove the last remaining project, and refuses while the
/// timer is running against it. Both guards are caller policy; the store
/// itself would allow either.
pub fn delete(store: &mut Store, key: &str, timer_state: &TimerState) -> Result<()> {
    let id = resolve_project(store, key)?.id.clone();

    if store.projects().len() <= 1 {
        bail!("cannot delete the last remaining project");
    }
    if timer_state.project_id() == Some(&id) {
        bail!("cannot delete '{id}' while its timer is running; stop or discard first");
    }

    store.delete_project(&id)?;
    println!("Deleted project {id} and its sessions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::load(dir.path().join("time-data.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn add_derives_slug_and_assigns_color() {
        let (_dir, mut store) = temp_store();
        add(&mut store, "Deep Work", None, Some("zap")).unwrap();

        let project = store
            .project(&ProjectId::new("deep-work").unwrap())
            .unwrap();
        assert_eq!(project.name, "Deep Work");
        assert_eq!(project.icon.as_deref(), Some("zap"));
        assert!(!project.color.is_empty());
    }

    #[test]
    fn add_rejects_unknown_icon() {
        let (_dir, mut store) = temp_store();
        assert!(add(&mut store, "Gym", None, Some("barbells")).is_err());
        assert_eq!(store.projects().len(), 2);
    }

    #[test]
    fn delete_refuses_last_project() {
        let (_dir, mut store) = temp_store();
        delete(&mut store, "personal", &TimerState::Idle).unwrap();
        let result = delete(&mut store, "work", &TimerState::Idle);
        assert!(result.is_err());
        assert_eq!(store.projects().len(), 1);
    }

    #[test]
    fn delete_refuses_running_project() {
        let (_dir, mut store) = temp_store();
        let running = TimerState::Running {
            project_id: ProjectId::new("work").unwrap(),
            start_time: chrono::Utc::now(),
        };
        assert!(delete(&mut store, "work", &running).is_err());
        assert_eq!(store.projects().len(), 2);
    }

    #[test]
    fn edit_requires_some_change() {
        let (_dir, mut store) = temp_store();
        assert!(edit(&mut store, "work", None, None, None).is_err());
        edit(&mut store, "work", Some("Day job"), None, None).unwrap();
        assert_eq!(
            store.project(&ProjectId::new("work").unwrap()).unwrap().name,
            "Day job"
        );
    }
}
