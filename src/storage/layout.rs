pub const FIELD_NAMES_EXTENSION: &str = "fns";
pub const DOCUMENTS_EXTENSION: &str = "dcs";
pub const TERM_STATS_EXTENSION: &str = "tst";
pub const SHARD_COUNT_FILE_NAME: &str = "shard_count";

/// Path of a table in the flat (non-sharded) layout: `<name>.<ext>`.
pub fn flat_path(index_name: &str, extension: &str) -> String {
    format!("{}.{}", index_name, extension)
}

/// Path of a metadata file in the sharded layout: `<name>/<file>`.
pub fn meta_path(index_name: &str, file_name: &str) -> String {
    format!("{}/{}", index_name, file_name)
}

/// Directory of one shard: `<name>/<shard_id>`.
pub fn shard_dir(index_name: &str, shard_id: u32) -> String {
    format!("{}/{}", index_name, shard_id)
}

/// Path of a table inside one shard: `<name>/<shard_id>/<ext>`.
pub fn shard_path(index_name: &str, shard_id: u32, extension: &str) -> String {
    format!("{}/{}/{}", index_name, shard_id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_forward_slash_joined() {
        assert_eq!(flat_path("idx", DOCUMENTS_EXTENSION), "idx.dcs");
        assert_eq!(meta_path("idx", SHARD_COUNT_FILE_NAME), "idx/shard_count");
        assert_eq!(shard_path("idx", 42, TERM_STATS_EXTENSION), "idx/42/tst");
    }
}
