//! Dependency traversal scenarios.
//!
//! Exercises the walk over a version's dependency OR-groups: alternative
//! clauses, kind selection, version bounds, virtual targets and the
//! broken-relation filter.

use quarry_tests::prelude::*;

fn mail_fixture() -> Fixture {
    Fixture::new()
        .package("libc6", &["2.28", "2.31"])
        .package("exim4", &["4.94"])
        .package("postfix", &["3.5"])
        .package("mail-transport-agent", &[])
        .package("apt", &["2.0"])
}

mod or_groups {
    use super::*;

    #[test]
    fn test_any_alternative_satisfies_the_group() {
        // GIVEN a dependency with two alternatives
        let f = mail_fixture().depends("apt", "2.0", DepKind::Depends, &["exim4", "postfix"]);

        // WHEN only the second alternative matches the nested pattern
        let pattern = Pattern::depends(DepKind::Depends, false, Pattern::name("^postfix$").unwrap());
        let m = f.eval(&pattern, "apt").unwrap();

        // THEN the group matches, and the witness records the group head
        let (_, dep_match) = &m.matches()[0];
        match dep_match.kind() {
            MatchKind::Dependency { dep, .. } => {
                assert_eq!(dep.clause.target(), f.pkg("exim4"));
            }
            other => panic!("expected a dependency match, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_match_is_preserved() {
        let f = mail_fixture().depends("apt", "2.0", DepKind::Depends, &["exim4", "postfix"]);

        let pattern = Pattern::depends(DepKind::Depends, false, Pattern::name("postfix").unwrap());
        let m = f.eval(&pattern, "apt").unwrap();

        // The nested structural match stays navigable from the witness.
        let (_, dep_match) = &m.matches()[0];
        let sub = dep_match.sub_match().unwrap();
        assert!(sub.is_leaf());
        assert_eq!(sub.matches().len(), 1);
    }

    #[test]
    fn test_no_alternative_matching_fails_the_group() {
        let f = mail_fixture().depends("apt", "2.0", DepKind::Depends, &["exim4", "postfix"]);

        let pattern = Pattern::depends(DepKind::Depends, false, Pattern::name("^sendmail$").unwrap());
        assert!(f.eval(&pattern, "apt").is_none());
    }
}

mod kind_selection {
    use super::*;

    #[test]
    fn test_depends_query_also_sees_predepends() {
        // GIVEN a pre-dependency only
        let f = mail_fixture().depends("apt", "2.0", DepKind::PreDepends, &["libc6"]);

        // THEN a plain depends query finds it
        let as_depends =
            Pattern::depends(DepKind::Depends, false, Pattern::name("^libc6$").unwrap());
        assert!(f.eval(&as_depends, "apt").is_some());

        // AND a pre-depends query finds it too
        let as_predepends =
            Pattern::depends(DepKind::PreDepends, false, Pattern::name("^libc6$").unwrap());
        assert!(f.eval(&as_predepends, "apt").is_some());
    }

    #[test]
    fn test_predepends_query_ignores_plain_depends() {
        let f = mail_fixture().depends("apt", "2.0", DepKind::Depends, &["libc6"]);

        let pattern =
            Pattern::depends(DepKind::PreDepends, false, Pattern::name("^libc6$").unwrap());
        assert!(f.eval(&pattern, "apt").is_none());
    }

    #[test]
    fn test_other_kinds_match_exactly() {
        let f = mail_fixture()
            .depends("apt", "2.0", DepKind::Recommends, &["exim4"])
            .depends("apt", "2.0", DepKind::Conflicts, &["postfix"]);

        let recommends =
            Pattern::depends(DepKind::Recommends, false, Pattern::name("exim4").unwrap());
        assert!(f.eval(&recommends, "apt").is_some());

        let conflicts =
            Pattern::depends(DepKind::Conflicts, false, Pattern::name("exim4").unwrap());
        assert!(f.eval(&conflicts, "apt").is_none());
    }
}

mod version_bounds {
    use super::*;

    #[test]
    fn test_bound_filters_the_target_pool() {
        // GIVEN a dependency on libc6 (>= 2.30)
        let f = mail_fixture().depends_constrained(
            "apt",
            "2.0",
            DepKind::Depends,
            "libc6",
            CompareOp::GreaterEq,
            "2.30",
        );

        // THEN the excluded version is not in the target set
        let too_old =
            Pattern::depends(DepKind::Depends, false, Pattern::version("^2\\.28$").unwrap());
        assert!(f.eval(&too_old, "apt").is_none());

        let in_range =
            Pattern::depends(DepKind::Depends, false, Pattern::version("^2\\.31$").unwrap());
        assert!(f.eval(&in_range, "apt").is_some());
    }

    #[test]
    fn test_unsatisfiable_bound_empties_the_group() {
        // GIVEN a bound no version of the target meets
        let f = mail_fixture().depends_constrained(
            "apt",
            "2.0",
            DepKind::Depends,
            "libc6",
            CompareOp::Greater,
            "9.0",
        );

        // THEN even a catch-all nested pattern cannot match
        let pattern = Pattern::depends(DepKind::Depends, false, Pattern::name(".").unwrap());
        assert!(f.eval(&pattern, "apt").is_none());
    }

    #[test]
    fn test_tilde_sorts_before_release() {
        // GIVEN a pre-release version and a bound at the release
        let f = Fixture::new()
            .package("libfoo", &["1.0~rc1", "1.0"])
            .package("app", &["1.0"])
            .depends_constrained(
                "app",
                "1.0",
                DepKind::Depends,
                "libfoo",
                CompareOp::GreaterEq,
                "1.0",
            );

        // THEN the pre-release is below the bound
        let rc = Pattern::depends(DepKind::Depends, false, Pattern::version("rc1").unwrap());
        assert!(f.eval(&rc, "app").is_none());

        let release =
            Pattern::depends(DepKind::Depends, false, Pattern::version("^1\\.0$").unwrap());
        assert!(f.eval(&release, "app").is_some());
    }
}

mod virtual_targets {
    use super::*;

    #[test]
    fn test_virtual_target_enters_pool_as_bare_package() {
        let f = mail_fixture().depends("apt", "2.0", DepKind::Depends, &["mail-transport-agent"]);

        // Package-level predicates see the bare target.
        let by_name = Pattern::depends(
            DepKind::Depends,
            false,
            Pattern::name("^mail-transport").unwrap(),
        );
        assert!(f.eval(&by_name, "apt").is_some());

        // Version-level predicates cannot match it.
        let by_version =
            Pattern::depends(DepKind::Depends, false, Pattern::version(".").unwrap());
        assert!(f.eval(&by_version, "apt").is_none());
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn test_name_and_dependency_witness_shape() {
        // GIVEN foo 1.0 depending only on bar 2.0
        let f = Fixture::new()
            .package("bar", &["2.0"])
            .package("foo", &["1.0"])
            .depends("foo", "1.0", DepKind::Depends, &["bar"]);
        let pattern = Pattern::and(vec![
            Pattern::name("^foo$").unwrap(),
            Pattern::depends(
                DepKind::Depends,
                false,
                Pattern::any_version(Pattern::name("^bar").unwrap()),
            ),
        ]);

        // WHEN the conjunction is evaluated
        let m = f.eval(&pattern, "foo").unwrap();
        assert_eq!(m.children().len(), 2);

        // THEN the first child is the name-regex leaf
        let name_leaf = &m.children()[0];
        assert!(name_leaf.is_leaf());
        assert_eq!(name_leaf.matches().len(), 1);

        // AND the second records the dependency head and the nested branch
        let dep_leaf = &m.children()[1];
        let (_, dep_match) = &dep_leaf.matches()[0];
        match dep_match.kind() {
            MatchKind::Dependency { dep, sub_match } => {
                assert_eq!(dep.kind, DepKind::Depends);
                assert_eq!(dep.clause.target(), f.pkg("bar"));
                assert!(sub_match.is_branch());
                assert_eq!(sub_match.children().len(), 1);
                assert_eq!(sub_match.children()[0].matches().len(), 1);
            }
            other => panic!("expected a dependency match, got {:?}", other),
        }
    }

    #[test]
    fn test_negated_flag_rejects_the_flagged_package() {
        let f = Fixture::new()
            .package("base-files", &["11"])
            .essential("base-files");
        let pattern = Pattern::not(Pattern::atomic(Atomic::Essential));

        assert!(f.eval(&pattern, "base-files").is_none());
    }
}

mod broken_relations {
    use super::*;

    #[test]
    fn test_broken_filter_skips_satisfied_groups() {
        // GIVEN one satisfied and one unsatisfied dependency
        let f = mail_fixture()
            .depends_satisfied("apt", "2.0", DepKind::Depends, &["libc6"])
            .depends("apt", "2.0", DepKind::Depends, &["exim4"]);

        // THEN the broken query only sees the unsatisfied one
        let broken_libc =
            Pattern::depends(DepKind::Depends, true, Pattern::name("^libc6$").unwrap());
        assert!(f.eval(&broken_libc, "apt").is_none());

        let broken_exim =
            Pattern::depends(DepKind::Depends, true, Pattern::name("^exim4$").unwrap());
        assert!(f.eval(&broken_exim, "apt").is_some());

        // AND the plain query sees both
        let plain_libc =
            Pattern::depends(DepKind::Depends, false, Pattern::name("^libc6$").unwrap());
        assert!(f.eval(&plain_libc, "apt").is_some());
    }

    #[test]
    fn test_broken_kind_requires_exact_kind() {
        // GIVEN an unsatisfied pre-dependency
        let f = mail_fixture().depends("apt", "2.0", DepKind::PreDepends, &["libc6"]);

        // THEN the per-kind predicate does not alias kinds
        assert!(f
            .eval(&Pattern::broken_kind(DepKind::PreDepends), "apt")
            .is_some());
        assert!(f
            .eval(&Pattern::broken_kind(DepKind::Depends), "apt")
            .is_none());
    }

    #[test]
    fn test_broken_kind_ignores_satisfied_groups() {
        let f = mail_fixture().depends_satisfied("apt", "2.0", DepKind::Depends, &["libc6"]);

        assert!(f
            .eval(&Pattern::broken_kind(DepKind::Depends), "apt")
            .is_none());
    }
}
