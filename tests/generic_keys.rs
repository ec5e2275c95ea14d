mod test {
    use patricia_store::{Generic, Tree};

    #[test]
    fn generic_keys_of_different_lengths_coexist() {
        let mut t: Tree<Generic, &'static str> = Tree::new();
        t.add_generic(&[0xAB], 8, "one-byte").unwrap();
        t.add_generic(&[0xAB, 0xCD], 16, "two-byte").unwrap();

        assert_eq!(t.find_exact_generic(&[0xAB], 8), Some(&"one-byte"));
        assert_eq!(t.find_exact_generic(&[0xAB, 0xCD], 16), Some(&"two-byte"));
    }

    #[test]
    fn generic_lookup_is_exact_only_no_prefix_fallback() {
        let mut t: Tree<Generic, u32> = Tree::new();
        t.add_generic(&[0x01, 0x02, 0x03], 24, 1).unwrap();

        assert_eq!(t.find_exact_generic(&[0x01, 0x02], 16), None);
    }

    #[test]
    fn invalid_bitlen_is_rejected() {
        let mut t: Tree<Generic, u32> = Tree::new();
        assert!(t.add_generic(&[0xFF], 3, 1).is_err());
        assert!(t.add_generic(&[], 8, 1).is_err());
    }

    #[test]
    fn removing_a_generic_key_retires_it() {
        let mut t: Tree<Generic, u32> = Tree::new();
        t.add_generic(&[0x10], 8, 1).unwrap();
        t.remove_generic(&[0x10], 8);
        assert_eq!(t.find_exact_generic(&[0x10], 8), None);
    }
}
