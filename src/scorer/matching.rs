use crate::types::{Edit, GoldEdit};

/// True when `a` and `b` differ only in whitespace or letter case.
pub fn equals_ignore_whitespace_casing(a: &str, b: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    normalize(a) == normalize(b)
}

/// Drops edits that only re-case or re-space their span.
pub fn drop_cosmetic_edits(edits: Vec<Edit>) -> Vec<Edit> {
    edits
        .into_iter()
        .filter(|edit| !equals_ignore_whitespace_casing(&edit.original, &edit.correction))
        .collect()
}

/// Tries to give `edit` a gold edit, moving earlier assignments along
/// alternating paths when its candidates are taken.
fn augment(
    edit: usize,
    candidates: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &g in &candidates[edit] {
        if visited[g] {
            continue;
        }
        visited[g] = true;
        let free = match owner[g] {
            None => true,
            Some(other) => augment(other, candidates, owner, visited),
        };
        if free {
            owner[g] = Some(edit);
            return true;
        }
    }
    false
}

/// Proposed edits credited as correct, in proposal order.
///
/// Proposed and gold edits are paired one-to-one with as many pairs as
/// possible, so neither side is credited twice.
pub fn match_edits(edits: &[Edit], gold: &[GoldEdit]) -> Vec<Edit> {
    let candidates: Vec<Vec<usize>> = edits
        .iter()
        .map(|edit| {
            gold.iter()
                .enumerate()
                .filter(|(_, g)| g.accepts(edit))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut owner: Vec<Option<usize>> = vec![None; gold.len()];
    for edit in 0..edits.len() {
        let mut visited = vec![false; gold.len()];
        augment(edit, &candidates, &mut owner, &mut visited);
    }

    let mut matched = vec![false; edits.len()];
    for edit in owner.into_iter().flatten() {
        matched[edit] = true;
    }
    edits
        .iter()
        .zip(matched)
        .filter(|(_, hit)| *hit)
        .map(|(edit, _)| edit.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_casing() {
        assert!(equals_ignore_whitespace_casing("New York", "new york"));
        assert!(equals_ignore_whitespace_casing("every day", "everyday"));
        assert!(!equals_ignore_whitespace_casing("are", "is"));
    }

    #[test]
    fn test_drop_cosmetic_edits() {
        let edits = vec![
            Edit::substitute(0, "the", "The"),
            Edit::substitute(2, "are", "is"),
        ];
        assert_eq!(drop_cosmetic_edits(edits), vec![Edit::substitute(2, "are", "is")]);
    }

    #[test]
    fn test_match_edits() {
        let edits = vec![Edit::substitute(1, "are", "is"), Edit::insert(3, "the")];
        let gold = vec![
            GoldEdit::new(1, 2, "are", ["is"]),
            GoldEdit::new(1, 2, "are", ["is", "was"]),
            GoldEdit::new(3, 3, "", ["a"]),
        ];
        assert_eq!(match_edits(&edits, &gold), vec![Edit::substitute(1, "are", "is")]);
        assert!(match_edits(&edits, &[]).is_empty());
    }

    #[test]
    fn test_gold_edit_credited_once() {
        let edits = vec![Edit::insert(1, "X"), Edit::insert(1, "X")];
        let gold = vec![GoldEdit::new(1, 1, "", ["X"])];
        assert_eq!(match_edits(&edits, &gold), vec![Edit::insert(1, "X")]);

        let twice = vec![GoldEdit::new(1, 1, "", ["X"]), GoldEdit::new(1, 1, "", ["X"])];
        assert_eq!(match_edits(&edits, &twice).len(), 2);
    }

    #[test]
    fn test_matching_reassigns_shared_gold() {
        // first-come pairing would leave "Y" without a gold edit
        let edits = vec![Edit::insert(0, "X"), Edit::insert(0, "Y")];
        let gold = vec![GoldEdit::new(0, 0, "", ["X", "Y"]), GoldEdit::new(0, 0, "", ["X"])];
        assert_eq!(match_edits(&edits, &gold), edits);
    }
}
