use authz_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));

        // Normalizing twice changes nothing
        let again = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, again);
    }

    #[test]
    fn test_join_keeps_segment_as_file_name(base in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", name in "[a-z]{1,8}\\.py") {
        let joined = NormalizedPath::new(&base).join(&name);
        prop_assert_eq!(joined.file_name(), Some(name.as_str()));
        prop_assert_eq!(joined.extension(), Some("py"));
    }
}
