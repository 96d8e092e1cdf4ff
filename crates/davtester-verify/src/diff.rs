//! Line diff rendered as a unified diff with no context lines.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

/// Renders the changes turning `old` into `new`.
///
/// Returns an empty vector when the inputs are equal. Otherwise the output
/// starts with `--- {old_label}` / `+++ {new_label}` followed by one
/// `@@` hunk per run of changed lines.
#[must_use]
pub fn unified_diff(old: &[String], new: &[String], old_label: &str, new_label: &str) -> Vec<String> {
    let ops = edit_script(old, new);
    if ops.iter().all(|op| *op == Op::Equal) {
        return Vec::new();
    }

    let mut out = vec![format!("--- {old_label}"), format!("+++ {new_label}")];

    let (mut i, mut j) = (0, 0);
    let mut k = 0;
    while k < ops.len() {
        if ops[k] == Op::Equal {
            i += 1;
            j += 1;
            k += 1;
            continue;
        }

        let (old_start, new_start) = (i, j);
        let mut removed = Vec::new();
        let mut added = Vec::new();
        while k < ops.len() && ops[k] != Op::Equal {
            if ops[k] == Op::Delete {
                removed.push(format!("-{}", old[i]));
                i += 1;
            } else {
                added.push(format!("+{}", new[j]));
                j += 1;
            }
            k += 1;
        }

        out.push(format!(
            "@@ {} {} @@",
            range('-', old_start, removed.len()),
            range('+', new_start, added.len())
        ));
        out.extend(removed);
        out.extend(added);
    }

    out
}

/// Hunk range; an empty range names the line before the insertion point.
fn range(sign: char, start: usize, len: usize) -> String {
    match len {
        0 => format!("{sign}{start},0"),
        1 => format!("{sign}{}", start + 1),
        _ => format!("{sign}{},{len}", start + 1),
    }
}

/// Longest-common-subsequence edit script.
fn edit_script(old: &[String], new: &[String]) -> Vec<Op> {
    let (n, m) = (old.len(), new.len());

    // lcs[i][j]: LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0_usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(Op::Delete);
            i += 1;
        } else {
            ops.push(Op::Insert);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat_n(Op::Delete, n - i));
    ops.extend(std::iter::repeat_n(Op::Insert, m - j));
    ops
}
