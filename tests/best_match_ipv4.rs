mod test {
    use patricia_store::Tree;
    use std::net::Ipv4Addr;

    /// A default route plus a hierarchy of enclosing netblocks — the
    /// query always picks the most specific one.
    #[test]
    fn netblock_hierarchy_picks_the_most_specific() {
        let mut t: Tree<patricia_store::Ipv4, &'static str> = Tree::new();
        t.add_ipv4_net(Ipv4Addr::new(0, 0, 0, 0), 0, "default").unwrap();
        t.add_ipv4_net(Ipv4Addr::new(192, 171, 0, 0), 16, "/16").unwrap();
        t.add_ipv4_net(Ipv4Addr::new(192, 171, 128, 0), 24, "/24").unwrap();

        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(192, 171, 128, 53)), Some(&"/24"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(192, 171, 5, 5)), Some(&"/16"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(8, 8, 8, 8)), Some(&"default"));
    }

    /// A host route always wins over any enclosing netblock.
    #[test]
    fn host_route_wins_over_netblock() {
        let mut t: Tree<patricia_store::Ipv4, &'static str> = Tree::new();
        t.add_ipv4_net(Ipv4Addr::new(192, 171, 128, 0), 24, "/24").unwrap();
        t.add_ipv4(Ipv4Addr::new(192, 171, 128, 45), "host").unwrap();

        assert_eq!(t.find_exact_ipv4(Ipv4Addr::new(192, 171, 128, 45)), Some(&"host"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(192, 171, 128, 53)), Some(&"/24"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(192, 171, 128, 45)), Some(&"host"));
    }

    #[test]
    fn removing_the_default_route_falls_through_to_no_match() {
        let mut t: Tree<patricia_store::Ipv4, u32> = Tree::new();
        t.add_ipv4_net(Ipv4Addr::new(0, 0, 0, 0), 0, 1).unwrap();
        t.add_ipv4_net(Ipv4Addr::new(10, 0, 0, 0), 8, 2).unwrap();

        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(172, 16, 0, 1)), Some(&1));
        t.remove_ipv4_net(Ipv4Addr::new(0, 0, 0, 0), 0);
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(172, 16, 0, 1)), None);
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(10, 1, 1, 1)), Some(&2));
    }

    /// A default route inserted *after* a more specific netblock must
    /// still be reachable from outside that netblock: the default route's
    /// own subtree isn't the root here, so finding it depends on the
    /// ancestor search correctly treating netmask 0 as covering the whole
    /// address space rather than requiring a discriminator bit below 0.
    #[test]
    fn default_route_inserted_after_a_more_specific_netblock_is_still_found() {
        let mut t: Tree<patricia_store::Ipv4, &'static str> = Tree::new();
        t.add_ipv4_net(Ipv4Addr::new(10, 0, 0, 0), 8, "/8").unwrap();
        t.add_ipv4_net(Ipv4Addr::new(0, 0, 0, 0), 0, "default").unwrap();

        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(10, 1, 2, 3)), Some(&"/8"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(8, 8, 8, 8)), Some(&"default"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(192, 168, 1, 1)), Some(&"default"));
    }

    #[test]
    fn non_contiguous_siblings_do_not_leak_into_each_other() {
        let mut t: Tree<patricia_store::Ipv4, &'static str> = Tree::new();
        t.add_ipv4_net(Ipv4Addr::new(130, 55, 240, 0), 25, "low").unwrap();
        t.add_ipv4_net(Ipv4Addr::new(130, 55, 240, 128), 25, "high").unwrap();

        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(130, 55, 240, 10)), Some(&"low"));
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(130, 55, 240, 200)), Some(&"high"));
    }
}
