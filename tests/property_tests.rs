use common_substring::{select, GeneralizedText, Membership, SuffixTree, TerminatorPolicy, ROOT};
use proptest::prelude::*;
use roaring::RoaringBitmap;

fn strings_strategy() -> impl Strategy<Value = Vec<Vec<u64>>> {
    prop::collection::vec(prop::collection::vec(0u64..4, 0..30), 1..5)
}

fn brute_force_len(strings: &[Vec<u64>]) -> usize {
    let shortest = strings.iter().map(Vec::len).min().unwrap_or(0);
    (1..=shortest)
        .rev()
        .find(|&len| {
            strings[0]
                .windows(len)
                .any(|window| strings.iter().all(|s| s.windows(len).any(|w| w == window)))
        })
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn test_leaf_completeness(strings in strings_strategy()) {
        let text = GeneralizedText::new(&strings, TerminatorPolicy::default()).unwrap();
        let tree = SuffixTree::build(&text);
        prop_assert_eq!(tree.leaf_count(), text.len());

        let mut starts: Vec<usize> = tree.node_ids().filter_map(|id| tree.leaf_position(id)).collect();
        starts.sort_unstable();
        prop_assert_eq!(starts, (0..text.len()).collect::<Vec<_>>());

        for id in tree.node_ids() {
            if let Some(pos) = tree.leaf_position(id) {
                prop_assert_eq!(tree.path_label(id), &text.symbols()[pos..]);
            }
        }
    }

    #[test]
    fn test_suffix_links(strings in strings_strategy()) {
        let text = GeneralizedText::new(&strings, TerminatorPolicy::default()).unwrap();
        let tree = SuffixTree::build(&text);
        for id in tree.node_ids() {
            if id == ROOT || tree.is_leaf(id) {
                continue;
            }
            let link = tree.suffix_link(id);
            prop_assert!(link.is_some());
            let label = tree.path_label(id);
            prop_assert_eq!(tree.path_label(link.unwrap()), &label[1..]);
        }
    }

    #[test]
    fn test_mask_union(strings in strings_strategy()) {
        let text = GeneralizedText::new(&strings, TerminatorPolicy::default()).unwrap();
        let tree = SuffixTree::build(&text);
        let membership = Membership::annotate(&tree);

        // Expected mask per node: the owners of every leaf below it.
        let mut expected = vec![RoaringBitmap::new(); tree.node_count()];
        for id in tree.node_ids() {
            let Some(pos) = tree.leaf_position(id) else {
                continue;
            };
            let owner = text.owner_of_position(pos).unwrap() as u32;
            let mut cur = Some(id);
            while let Some(node) = cur {
                expected[node].insert(owner);
                cur = tree.parent(node);
            }
        }
        for id in tree.node_ids() {
            prop_assert_eq!(membership.mask(id), &expected[id]);
        }
    }

    #[test]
    fn test_longest_common(strings in strings_strategy()) {
        let text = GeneralizedText::new(&strings, TerminatorPolicy::default()).unwrap();
        let tree = SuffixTree::build(&text);
        let membership = Membership::annotate(&tree);
        let found = membership.longest_common(&tree);

        prop_assert_eq!(found.length, brute_force_len(&strings));
        prop_assert_eq!(found.symbols.len(), found.length);
        for s in &strings {
            prop_assert!(found.symbols.is_empty() || s.windows(found.length).any(|w| w == &found.symbols[..]));
        }
        for id in tree.node_ids() {
            if id != ROOT && !tree.is_leaf(id) && membership.is_full(id) {
                prop_assert!(tree.depth(id) <= found.length);
            }
        }
    }

    #[test]
    fn test_idempotence(strings in strings_strategy()) {
        let first = {
            let text = GeneralizedText::new(&strings, TerminatorPolicy::default()).unwrap();
            let tree = SuffixTree::build(&text);
            (tree.render(), select(&tree))
        };
        let text = GeneralizedText::new(&strings, TerminatorPolicy::default()).unwrap();
        let tree = SuffixTree::build(&text);
        prop_assert_eq!(tree.render(), first.0);
        prop_assert_eq!(select(&tree), first.1);
    }
}
