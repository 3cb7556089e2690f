//! Small helpers shared by the tree constructors and the CLI

/// Join a child name onto a relative path; children of the root get no
/// leading separator.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1 << 30, "G"), (1 << 20, "M"), (1 << 10, "K")];

    for (scale, suffix) in UNITS {
        if bytes >= scale {
            return format!("{:.1}{}", bytes as f64 / scale as f64, suffix);
        }
    }
    format!("{}B", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("", "a"), "a");
        assert_eq!(join_relative("a", "b"), "a/b");
        assert_eq!(join_relative("a/b", ".c"), "a/b/.c");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0M");
        assert_eq!(format_size(3 << 30), "3.0G");
    }
}
