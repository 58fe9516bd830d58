//! Tests for FileBaselineStore

#[cfg(feature = "std")]
mod tests {
    use std::fs;

    use airguard_core::store::{BaselineStore, CalibrationBaseline, FileBaselineStore};
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FileBaselineStore::new(dir.path().join("baseline.dat"));

        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_creates_record_in_wire_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.dat");
        let mut store = FileBaselineStore::new(&path);

        store.save(&CalibrationBaseline::new(35187, 36821)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "35187,36821");
        assert_eq!(store.load(), Some(CalibrationBaseline::new(35187, 36821)));
    }

    #[test]
    fn save_overwrites_longer_record() {
        let mut temp_file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp_file, b"35187,36821").unwrap();
        let mut store = FileBaselineStore::new(temp_file.path());

        store.save(&CalibrationBaseline::new(400, 20)).unwrap();

        assert_eq!(fs::read_to_string(temp_file.path()).unwrap(), "400,20");
    }

    #[test]
    fn loading_then_saving_leaves_content_unchanged() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "400,20").unwrap();
        let mut store = FileBaselineStore::new(temp_file.path());

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(fs::read_to_string(temp_file.path()).unwrap(), "400,20");
    }

    #[test]
    fn record_with_trailing_newline_loads() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "400,20\n").unwrap();

        let store = FileBaselineStore::new(temp_file.path());
        assert_eq!(store.load(), Some(CalibrationBaseline::new(400, 20)));
    }

    #[test]
    fn empty_and_corrupt_records_are_not_found() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = FileBaselineStore::new(temp_file.path());

        for record in ["", "35187", "35187,", "garbage", "1,2,3", "99999,1"] {
            fs::write(temp_file.path(), record).unwrap();
            assert_eq!(store.load(), None, "record {record:?}");
        }
    }

    #[test]
    fn non_utf8_record_is_not_found() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), [0xff, 0xfe, b',', b'1']).unwrap();

        assert_eq!(FileBaselineStore::new(temp_file.path()).load(), None);
    }

    #[test]
    fn save_into_missing_directory_fails_without_panicking() {
        let dir = tempdir().unwrap();
        let mut store = FileBaselineStore::new(dir.path().join("missing").join("baseline.dat"));

        assert!(store.save(&CalibrationBaseline::new(1, 2)).is_err());
        assert_eq!(store.load(), None);
    }
}
