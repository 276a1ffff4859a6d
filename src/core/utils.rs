use std::collections::HashSet;

use rand::Rng;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Keep only the elements of `acc` that are also present in `other`.
pub fn intersect(acc: &mut HashSet<String>, other: &HashSet<String>) {
    acc.retain(|v| other.contains(v));
}

/// Collect string references into an owned, sorted list.
pub fn sorted<'a, I>(iter: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut list: Vec<String> = iter.into_iter().cloned().collect();
    list.sort();
    list
}

/// Generate a random identifier of `n` letters drawn from `[a-zA-Z]`.
pub fn random_id(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_keeps_common_elements() {
        let mut acc: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let other: HashSet<String> = ["b", "c", "d"].iter().map(|s| s.to_string()).collect();

        intersect(&mut acc, &other);

        let expected: HashSet<String> = ["b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(acc, expected);
    }

    #[test]
    fn intersect_with_disjoint_set_is_empty() {
        let mut acc: HashSet<String> = ["a"].iter().map(|s| s.to_string()).collect();
        let other: HashSet<String> = ["b"].iter().map(|s| s.to_string()).collect();

        intersect(&mut acc, &other);
        assert!(acc.is_empty());
    }

    #[test]
    fn sorted_orders_lexicographically() {
        let set: HashSet<String> = ["two", "one", "three"].iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted(&set), vec!["one", "three", "two"]);
    }

    #[test]
    fn random_id_uses_letter_alphabet() {
        for _ in 0..32 {
            let id = random_id(8);
            assert_eq!(id.len(), 8);
            assert!(id.bytes().all(|b| b.is_ascii_alphabetic()));
        }
    }
}
