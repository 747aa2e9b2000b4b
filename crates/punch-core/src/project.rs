//! Projects - named buckets that sessions are tracked against.

use serde::{Deserialize, Serialize};

use crate::types::ProjectId;

/// Icon shown for projects that don't set one.
pub const FALLBACK_ICON: &str = "folder";

/// Symbolic icon names a project may pick from.
pub const AVAILABLE_ICONS: &[&str] = &[
    "briefcase", "home", "book", "code", "coffee", "heart", "star", "folder",
    "file-text", "music", "camera", "globe", "zap", "sun", "moon", "cloud",
    "pen-tool", "cpu", "database", "terminal", "graduation-cap", "dumbbell",
    "bike", "car", "plane", "shopping-cart", "dollar-sign", "clock", "calendar",
    "mail", "phone", "map-pin", "users", "user", "settings", "wrench",
];

/// A named bucket with a display color and optional icon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Stable identifier, unique within a store.
    pub id: ProjectId,

    /// Display label.
    pub name: String,

    /// Display color (hex or HSL string).
    pub color: String,

    /// Symbolic icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Project {
    /// Returns the icon name, falling back to [`FALLBACK_ICON`] when unset.
    #[must_use]
    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(FALLBACK_ICON)
    }
}

/// An explicit field-by-field patch for a project.
///
/// `None` fields are left unchanged. Clearing an icon back to the fallback is
/// not expressible through a patch; set it to [`FALLBACK_ICON`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl ProjectUpdate {
    /// Returns true when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.icon.is_none()
    }

    /// Applies the patch to a project, field by field.
    pub fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name.clone_from(name);
        }
        if let Some(color) = &self.color {
            project.color.clone_from(color);
        }
        if let Some(icon) = &self.icon {
            project.icon = Some(icon.clone());
        }
    }
}

/// The seed projects a fresh store starts with.
#[must_use]
pub fn default_projects() -> Vec<Project> {
    vec![
        Project {
            id: ProjectId::new("work").expect("literal is non-empty"),
            name: "Work".to_string(),
            color: "#5f8eed".to_string(),
            icon: Some("briefcase".to_string()),
        },
        Project {
            id: ProjectId::new("personal").expect("literal is non-empty"),
            name: "Personal".to_string(),
            color: "#50c878".to_string(),
            icon: Some("home".to_string()),
        },
    ]
}
