use crate::comparison::record::ConfigFileRecord;

pub const DEFAULT_SEPARATOR: char = '|';

/// Splits a `|`-joined path list (as stored on a deploy package) into fresh records.
pub fn parse_file_list(joined: &str, separator: char) -> Vec<ConfigFileRecord> {
    joined
        .split(separator)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ConfigFileRecord::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[ConfigFileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.filename.as_str()).collect()
    }

    #[test]
    fn splits_in_order() {
        let records = parse_file_list("bin/start.sh|conf/app.conf|bin/start.sh", DEFAULT_SEPARATOR);
        assert_eq!(names(&records), ["bin/start.sh", "conf/app.conf", "bin/start.sh"]);
        assert!(records.iter().all(|r| r.comparison_result.is_none() && r.md5.is_none()));
    }

    #[test]
    fn empty_input_gives_no_records() {
        assert!(parse_file_list("", DEFAULT_SEPARATOR).is_empty());
        assert!(parse_file_list(" | ", DEFAULT_SEPARATOR).is_empty());
    }

    #[test]
    fn segments_are_trimmed() {
        let records = parse_file_list(" a.conf ||b.conf", DEFAULT_SEPARATOR);
        assert_eq!(names(&records), ["a.conf", "b.conf"]);
    }
}
