//! Path safety for subsection entries (`spec.md` §4.5 "Path safety"):
//! forward-slash, relative, and unable to escape its section's subdir after
//! normalization. Native-code executable paths (`NATIVE_LIBS`/`NATIVE_CMDS`)
//! get a further single-path-element rule (`spec.md` line 139).

use crate::error::{ModuleFileError, Result};
use crate::format::SectionType;

pub fn sanitize_subsection_path(raw: &str, section_type: SectionType) -> Result<String> {
    if raw.is_empty() || raw.starts_with('/') || raw.contains('\\') || raw.contains(':') {
        return Err(ModuleFileError::PathEscape(raw.to_string()));
    }

    let mut normalized: Vec<&str> = Vec::new();
    for part in raw.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                if normalized.pop().is_none() {
                    return Err(ModuleFileError::PathEscape(raw.to_string()));
                }
            }
            p => normalized.push(p),
        }
    }

    if normalized.is_empty() {
        return Err(ModuleFileError::PathEscape(raw.to_string()));
    }

    if matches!(section_type, SectionType::NativeLibs | SectionType::NativeCmds)
        && normalized.len() > 1
    {
        return Err(ModuleFileError::PathEscape(raw.to_string()));
    }

    Ok(normalized.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_relative_path_is_accepted() {
        assert_eq!(
            sanitize_subsection_path("com/example/Widget.class", SectionType::Classes).unwrap(),
            "com/example/Widget.class"
        );
    }

    #[test]
    fn dot_segments_are_collapsed() {
        assert_eq!(
            sanitize_subsection_path(
                "./com/example/../example/Widget.class",
                SectionType::Classes
            )
            .unwrap(),
            "com/example/Widget.class"
        );
    }

    #[test]
    fn absolute_path_is_rejected() {
        assert!(sanitize_subsection_path("/etc/passwd", SectionType::Classes).is_err());
    }

    #[test]
    fn escaping_parent_traversal_is_rejected() {
        assert!(sanitize_subsection_path("../../etc/passwd", SectionType::Classes).is_err());
    }

    #[test]
    fn native_cmds_path_with_subdirectory_is_rejected() {
        assert!(sanitize_subsection_path("bin/helper", SectionType::NativeCmds).is_err());
    }

    #[test]
    fn native_libs_path_with_subdirectory_is_rejected() {
        assert!(sanitize_subsection_path("lib/libhelper.so", SectionType::NativeLibs).is_err());
    }

    #[test]
    fn native_cmds_single_segment_path_is_accepted() {
        assert_eq!(
            sanitize_subsection_path("helper", SectionType::NativeCmds).unwrap(),
            "helper"
        );
    }

    #[test]
    fn resources_path_with_subdirectory_is_still_accepted() {
        assert!(sanitize_subsection_path("icons/app.png", SectionType::Resources).is_ok());
    }
}
