use std::collections::VecDeque;

/// Finds a matching that saturates every vertex of the undirected graph
/// given as adjacency lists, or `None` if no such matching exists.
///
/// A greedy pass seeds the matching, visiting vertices in ascending
/// free-degree order and pairing each with its least-connected unmatched
/// neighbor; breadth-first augmenting paths then absorb the leftovers.
/// No blossom contraction is performed: delocalized subgraphs are
/// bipartite in practice, and an odd component simply fails to match.
pub(crate) fn find_perfect_matching(adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
    let n = adjacency.len();
    let mut matching: Vec<Option<usize>> = vec![None; n];

    greedy_matching(adjacency, &mut matching);

    for root in 0..n {
        if matching[root].is_none() && !augment(adjacency, root, &mut matching) {
            return None;
        }
    }

    matching.into_iter().collect()
}

fn greedy_matching(adjacency: &[Vec<usize>], matching: &mut [Option<usize>]) {
    let n = adjacency.len();
    let mut free_degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();

    loop {
        let candidate = (0..n)
            .filter(|&v| matching[v].is_none() && free_degree[v] > 0)
            .min_by_key(|&v| (free_degree[v], v));
        let Some(v) = candidate else {
            break;
        };

        let partner = adjacency[v]
            .iter()
            .copied()
            .filter(|&u| matching[u].is_none())
            .min_by_key(|&u| (free_degree[u], u));
        let Some(u) = partner else {
            break;
        };

        matching[v] = Some(u);
        matching[u] = Some(v);

        for &w in adjacency[v].iter().chain(&adjacency[u]) {
            free_degree[w] = free_degree[w].saturating_sub(1);
        }
    }
}

/// Searches for an alternating path from the unmatched `root` to another
/// unmatched vertex and flips the matching along it.
fn augment(adjacency: &[Vec<usize>], root: usize, matching: &mut [Option<usize>]) -> bool {
    let n = adjacency.len();
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut seen = vec![false; n];
    seen[root] = true;

    let mut queue = VecDeque::from([root]);

    while let Some(v) = queue.pop_front() {
        for &u in &adjacency[v] {
            match matching[u] {
                None if u != root => {
                    flip_path(v, u, &pred, matching);
                    return true;
                }
                Some(w) => {
                    if !seen[w] {
                        seen[w] = true;
                        pred[w] = Some(v);
                        queue.push_back(w);
                    }
                }
                None => {}
            }
        }
    }

    false
}

fn flip_path(
    last_even: usize,
    endpoint: usize,
    pred: &[Option<usize>],
    matching: &mut [Option<usize>],
) {
    let mut evens = vec![last_even];
    let mut cursor = last_even;
    while let Some(previous) = pred[cursor] {
        evens.push(previous);
        cursor = previous;
    }

    let mut carry = endpoint;
    for &even in &evens {
        let old = matching[even];
        matching[even] = Some(carry);
        matching[carry] = Some(even);
        match old {
            Some(odd) => carry = odd,
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cycle(n: usize) -> Vec<Vec<usize>> {
        (0..n).map(|v| vec![(v + n - 1) % n, (v + 1) % n]).collect()
    }

    fn path(n: usize) -> Vec<Vec<usize>> {
        (0..n)
            .map(|v| {
                let mut next = Vec::new();
                if v > 0 {
                    next.push(v - 1);
                }
                if v + 1 < n {
                    next.push(v + 1);
                }
                next
            })
            .collect()
    }

    fn check_perfect(adjacency: &[Vec<usize>], matching: &[usize]) {
        for (v, &u) in matching.iter().enumerate() {
            assert_ne!(v, u, "vertex {v} matched to itself");
            assert_eq!(matching[u], v);
            assert!(adjacency[v].contains(&u));
        }
    }

    #[test]
    fn empty_graph() {
        assert_eq!(find_perfect_matching(&[]), Some(vec![]));
    }

    #[test]
    fn single_edge() {
        let matching = find_perfect_matching(&[vec![1], vec![0]]).unwrap();

        assert_eq!(matching, vec![1, 0]);
    }

    #[test]
    fn six_cycle() {
        let adjacency = cycle(6);
        let matching = find_perfect_matching(&adjacency).unwrap();

        check_perfect(&adjacency, &matching);
    }

    #[test]
    fn ten_cycle() {
        let adjacency = cycle(10);
        let matching = find_perfect_matching(&adjacency).unwrap();

        check_perfect(&adjacency, &matching);
    }

    #[test]
    fn even_path() {
        let adjacency = path(8);
        let matching = find_perfect_matching(&adjacency).unwrap();

        check_perfect(&adjacency, &matching);
    }

    #[test]
    fn odd_cycle_fails() {
        assert_eq!(find_perfect_matching(&cycle(5)), None);
    }

    #[test]
    fn odd_path_fails() {
        assert_eq!(find_perfect_matching(&path(7)), None);
    }

    #[test]
    fn isolated_vertex_fails() {
        assert_eq!(find_perfect_matching(&[vec![]]), None);
    }

    #[test]
    fn greedy_dead_end_is_repaired_by_augmentation() {
        // A path of four with an extra pendant on an inner vertex. The
        // pendant forces the inner pair and the augmenting phase must
        // rearrange around it.
        //
        //   0 - 1 - 2 - 3
        //           |
        //           4
        let adjacency = vec![vec![1], vec![0, 2], vec![1, 3, 4], vec![2], vec![2]];

        assert_eq!(find_perfect_matching(&adjacency), None);

        //   0 - 1 - 2 - 3   with 4 - 5 pendant pair on 2 and 3
        let adjacency = vec![
            vec![1],
            vec![0, 2],
            vec![1, 3, 4],
            vec![2, 5],
            vec![2, 5],
            vec![3, 4],
        ];
        let matching = find_perfect_matching(&adjacency).unwrap();

        check_perfect(&adjacency, &matching);
    }
}
