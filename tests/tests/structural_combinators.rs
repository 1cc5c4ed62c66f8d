//! Combinator interplay scenarios.
//!
//! Exercises pool rebinding, membership tests and quantifier overrides in
//! combination, where the interesting behavior lives between the nodes.

use quarry_tests::prelude::*;

fn two_version_fixture() -> Fixture {
    Fixture::new().package("apt", &["1.0", "2.0"])
}

mod binding {
    use super::*;

    #[test]
    fn test_bind_reaches_the_enclosing_pool() {
        // GIVEN a pool narrowed down to the 2.x version
        let f = two_version_fixture();
        let pattern = Pattern::narrow(
            Pattern::version("^2").unwrap(),
            Pattern::bind(0, Pattern::version("^1").unwrap()),
        );

        // THEN the binding still sees the un-narrowed variable
        assert!(f.eval(&pattern, "apt").is_some());
    }

    #[test]
    fn test_bind_respects_the_initial_pool() {
        // GIVEN an evaluation started from a single version
        let f = two_version_fixture();
        let pattern = Pattern::bind(0, Pattern::version("^1").unwrap());

        // THEN variable 0 holds only that version
        assert!(f.eval_version(&pattern, "apt", "1.0").is_some());
        assert!(f.eval_version(&pattern, "apt", "2.0").is_none());
    }

    #[test]
    fn test_for_adds_a_stack_frame() {
        // GIVEN a binding introduced by ?for
        let f = two_version_fixture();
        let pattern =
            Pattern::for_binding(Pattern::bind(1, Pattern::version(".").unwrap()));

        // THEN index 1 reaches the outer variable
        assert!(f.eval(&pattern, "apt").is_some());
    }

    #[test]
    fn test_equal_tests_pool_membership() {
        // GIVEN each pool element tested against the captured pool
        let f = two_version_fixture();
        let pattern = Pattern::any_version(Pattern::equal(0));

        // THEN every element is a member of its own pool
        let m = f.eval(&pattern, "apt").unwrap();
        assert_eq!(m.children().len(), 2);

        // AND after widening a singleton pool, only the original element
        // passes the membership test
        let widened = Pattern::widen(Pattern::any_version(Pattern::equal(0)));
        let m = f.eval_version(&widened, "apt", "2.0").unwrap();
        assert_eq!(m.children()[0].children().len(), 1);
    }
}

mod widening {
    use super::*;

    #[test]
    fn test_widen_recovers_all_versions() {
        // GIVEN an evaluation pinned to one version
        let f = two_version_fixture();
        let pattern = Pattern::widen(Pattern::version(".").unwrap());

        let m = f.eval_version(&pattern, "apt", "1.0").unwrap();
        assert_eq!(m.children()[0].matches().len(), 2);
    }

    #[test]
    fn test_widen_is_stable_on_a_full_pool() {
        // GIVEN a pool that already holds every version
        let f = two_version_fixture();
        let plain = Pattern::version(".").unwrap();
        let widened = Pattern::widen(plain.clone());

        // THEN widening changes nothing
        let a = f.eval(&plain, "apt").unwrap();
        let b = f.eval(&widened, "apt").unwrap();
        assert_eq!(a.matches().len(), b.children()[0].matches().len());
    }

    #[test]
    fn test_widen_passes_virtual_packages_through() {
        let f = Fixture::new().package("mail-transport-agent", &[]);
        let pattern = Pattern::widen(Pattern::name("^mail").unwrap());

        assert!(f.eval(&pattern, "mail-transport-agent").is_some());
    }
}

mod quantifiers {
    use super::*;

    #[test]
    fn test_all_versions_passes_mode_through_or() {
        // GIVEN versions that each satisfy a different alternative
        let f = two_version_fixture();
        let pattern = Pattern::all_versions(Pattern::or(vec![
            Pattern::version("^1").unwrap(),
            Pattern::version("^2").unwrap(),
        ]));

        // THEN the disjunction does not cover the pool: each alternative is
        // itself quantified over every version, and neither holds for both
        assert!(f.eval(&pattern, "apt").is_none());

        // AND per-element coverage needs singleton pools instead
        let per_element = Pattern::any_version(Pattern::or(vec![
            Pattern::version("^1").unwrap(),
            Pattern::version("^2").unwrap(),
        ]));
        let m = f.eval(&per_element, "apt").unwrap();
        assert_eq!(m.children().len(), 2);
    }

    #[test]
    fn test_any_version_isolates_each_element() {
        // GIVEN a per-element evaluation of an "all" requirement
        let f = two_version_fixture();
        let pattern = Pattern::any_version(Pattern::all_versions(
            Pattern::version("^1").unwrap(),
        ));

        // THEN singleton pools satisfy it one at a time
        let m = f.eval(&pattern, "apt").unwrap();
        assert_eq!(m.children().len(), 1);
    }

    #[test]
    fn test_narrow_then_quantify() {
        // The classic shape: restrict the pool, then require the rest of it.
        let f = Fixture::new().package("gcc", &["10.1", "10.2", "11.1"]);
        let pattern = Pattern::narrow(
            Pattern::version("^10").unwrap(),
            Pattern::all_versions(Pattern::version("^10").unwrap()),
        );

        assert!(f.eval(&pattern, "gcc").is_some());
    }
}

mod boolean_shapes {
    use super::*;

    #[test]
    fn test_negation_wipes_inner_detail() {
        let f = two_version_fixture();
        let pattern = Pattern::not(Pattern::not(Pattern::version("^1").unwrap()));

        let m = f.eval(&pattern, "apt").unwrap();
        assert!(m.is_branch());
        assert!(m.children().is_empty());
    }

    #[test]
    fn test_disjunction_keeps_every_matching_branch() {
        let f = two_version_fixture();
        let pattern = Pattern::or(vec![
            Pattern::version("^1").unwrap(),
            Pattern::version("^9").unwrap(),
            Pattern::name("apt").unwrap(),
        ]);

        // Two of the three alternatives match.
        let m = f.eval(&pattern, "apt").unwrap();
        assert_eq!(m.children().len(), 2);
    }

    #[test]
    fn test_conjunction_orders_its_witnesses() {
        let f = two_version_fixture();
        let pattern = Pattern::and(vec![
            Pattern::name("apt").unwrap(),
            Pattern::version("^2").unwrap(),
        ]);

        let m = f.eval(&pattern, "apt").unwrap();
        assert_eq!(m.children().len(), 2);
        // First child carries both versions, second only the 2.x one.
        assert_eq!(m.children()[0].matches().len(), 2);
        assert_eq!(m.children()[1].matches().len(), 1);
    }
}
