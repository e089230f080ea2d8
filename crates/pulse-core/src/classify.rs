// SPDX-License-Identifier: Apache-2.0

//! Topic classification from labels.

/// Label marker for topic labels; stripped from the category key.
const TOPIC_PREFIX: &str = "topic:";

/// Label fragment that is authoritative without a topic prefix.
const DOCUMENTATION: &str = "documentation";

/// Category keys with a fixed display form.
const SPECIAL_NAMES: &[(&str, &str)] = &[
    ("gui", "GUI"),
    ("3d", "3D"),
    ("2d", "2D"),
    ("vfx", "VFX"),
    ("gdscript", "GDScript"),
    ("dotnet", ".NET"),
    ("visualscript", "VisualScript"),
    ("xr", "XR"),
    ("gdextension", "GDExtension"),
    ("thirdparty", "Third-Party"),
];

/// Assigns a category key to an item from its labels.
///
/// The first label containing `topic:` (with the prefix removed) or
/// `documentation` wins. Without such a label the last label is used, and an
/// unlabelled item gets the empty key.
#[must_use]
pub fn classify<S: AsRef<str>>(labels: &[S]) -> String {
    let authoritative = labels.iter().map(AsRef::as_ref).find(|name| {
        name.contains(TOPIC_PREFIX) || name.contains(DOCUMENTATION)
    });

    match authoritative {
        Some(name) => name.replacen(TOPIC_PREFIX, "", 1),
        None => labels
            .last()
            .map(|name| name.as_ref().to_string())
            .unwrap_or_default(),
    }
}

/// Display form of a category key.
#[must_use]
pub fn display_name(key: &str) -> String {
    if key.is_empty() {
        return "General".to_string();
    }

    if let Some((_, name)) = SPECIAL_NAMES.iter().find(|(k, _)| *k == key) {
        return (*name).to_string();
    }

    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_label_after_plain_label() {
        assert_eq!(classify(&["bug", "topic:2d"]), "2d");
    }

    #[test]
    fn test_topic_label_before_plain_label() {
        assert_eq!(classify(&["topic:2d", "bug"]), "2d");
    }

    #[test]
    fn test_no_authoritative_label_takes_last() {
        assert_eq!(classify(&["bug", "enhancement"]), "enhancement");
    }

    #[test]
    fn test_first_authoritative_label_wins() {
        assert_eq!(
            classify(&["topic:rendering", "topic:3d", "bug"]),
            "rendering"
        );
    }

    #[test]
    fn test_documentation_label_is_authoritative() {
        assert_eq!(classify(&["bug", "documentation", "confirmed"]), "documentation");
    }

    #[test]
    fn test_no_labels_is_general() {
        let labels: [&str; 0] = [];
        let key = classify(&labels);
        assert_eq!(key, "");
        assert_eq!(display_name(&key), "General");
    }

    #[test]
    fn test_display_name_overrides() {
        assert_eq!(display_name("dotnet"), ".NET");
        assert_eq!(display_name("gdextension"), "GDExtension");
        assert_eq!(display_name("thirdparty"), "Third-Party");
        assert_eq!(display_name("3d"), "3D");
    }

    #[test]
    fn test_display_name_title_cases_first_char() {
        assert_eq!(display_name("rendering"), "Rendering");
        assert_eq!(display_name("audio pipeline"), "Audio pipeline");
    }
}
