use std::path::Path;

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

pub fn truncate_string(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut truncated = String::new();
    for ch in text.chars() {
        if truncated.len() + ch.len_utf8() > max_bytes {
            break;
        }
        truncated.push(ch);
    }
    truncated
}

/// `noun` with a plural `s` unless `count` is one.
pub fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_respects_char_boundaries() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello", 3), "hel");
        assert_eq!(truncate_string("👨‍🦱", 5), "👨");
    }

    #[test]
    fn display_path_strips_base() {
        let base = Path::new("/tmp/run");
        assert_eq!(
            display_path(Path::new("/tmp/run/report.json"), Some(base)),
            "report.json"
        );
        assert_eq!(display_path(Path::new("/elsewhere.json"), Some(base)), "/elsewhere.json");
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize("test", 1), "test");
        assert_eq!(pluralize("test", 0), "tests");
        assert_eq!(pluralize("test", 3), "tests");
    }
}
