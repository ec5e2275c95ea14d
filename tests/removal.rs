mod test {
    use patricia_store::Tree;
    use std::cell::RefCell;
    use std::net::Ipv4Addr;
    use std::rc::Rc;

    #[test]
    fn removing_one_tenant_leaves_the_others() {
        let mut t: Tree<patricia_store::Ipv4, &'static str> = Tree::new();
        t.add_ipv4_net(Ipv4Addr::new(192, 168, 0, 0), 24, "net").unwrap();
        t.add_ipv4(Ipv4Addr::new(192, 168, 0, 0), "host").unwrap();

        t.remove_ipv4(Ipv4Addr::new(192, 168, 0, 0));

        assert_eq!(t.find_exact_ipv4(Ipv4Addr::new(192, 168, 0, 0)), None);
        assert_eq!(t.find_best_ipv4(Ipv4Addr::new(192, 168, 0, 5)), Some(&"net"));
    }

    #[test]
    fn removing_a_leaf_collapses_its_sibling_upward() {
        let mut t: Tree<patricia_store::Ipv4, &'static str> = Tree::new();
        t.add_ipv4(Ipv4Addr::new(130, 55, 240, 0), "a").unwrap();
        t.add_ipv4(Ipv4Addr::new(130, 55, 240, 255), "b").unwrap();

        t.remove_ipv4(Ipv4Addr::new(130, 55, 240, 0));

        assert_eq!(t.find_exact_ipv4(Ipv4Addr::new(130, 55, 240, 0)), None);
        assert_eq!(t.find_exact_ipv4(Ipv4Addr::new(130, 55, 240, 255)), Some(&"b"));
    }

    #[test]
    fn removing_an_absent_entry_is_a_silent_no_op() {
        let mut t: Tree<patricia_store::Ipv4, u32> = Tree::new();
        t.add_ipv4(Ipv4Addr::new(1, 1, 1, 1), 7).unwrap();
        t.remove_ipv4(Ipv4Addr::new(2, 2, 2, 2));
        assert_eq!(t.find_exact_ipv4(Ipv4Addr::new(1, 1, 1, 1)), Some(&7));
    }

    /// Tear down a whole hierarchy in reverse insertion order and confirm
    /// every payload passes through the destructor exactly once, leaving
    /// an empty tree behind.
    #[test]
    fn remove_all_reverse_order_runs_the_destructor_on_everything() {
        let dropped = Rc::new(RefCell::new(Vec::new()));
        let sink = dropped.clone();
        let mut t: Tree<patricia_store::Ipv4, u32> =
            Tree::with_destructor(move |user| sink.borrow_mut().push(user));

        let entries = [
            (Ipv4Addr::new(0, 0, 0, 0), 0u8, 1u32),
            (Ipv4Addr::new(10, 0, 0, 0), 8, 2),
            (Ipv4Addr::new(10, 1, 0, 0), 16, 3),
            (Ipv4Addr::new(10, 1, 2, 3), 32, 4),
        ];
        for (addr, len, user) in entries {
            t.add_ipv4_net(addr, len, user).unwrap();
        }

        for (addr, len, _) in entries.iter().rev() {
            t.remove_ipv4_net(*addr, *len);
        }

        assert!(t.is_empty());
        let mut seen = dropped.borrow().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn dropping_a_non_empty_tree_runs_the_destructor() {
        let dropped = Rc::new(RefCell::new(Vec::new()));
        let sink = dropped.clone();
        {
            let mut t: Tree<patricia_store::Ipv4, u32> =
                Tree::with_destructor(move |user| sink.borrow_mut().push(user));
            t.add_ipv4(Ipv4Addr::new(1, 2, 3, 4), 42).unwrap();
            t.add_ipv4(Ipv4Addr::new(5, 6, 7, 8), 99).unwrap();
        }
        let mut seen = dropped.borrow().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![42, 99]);
    }
}
