use colored::Colorize;
use similar::{ChangeTag, DiffOp, TextDiff};

/// Renders a unified diff between the old and new content of `file_path`.
/// Returns an empty string when nothing changed.
pub fn unified_diff(file_path: &str, old_content: &str, new_content: &str) -> String {
    let diff = TextDiff::from_lines(old_content, new_content);
    let groups = diff.grouped_ops(3);
    if groups.is_empty() {
        return String::new();
    }

    let mut out = format!("--- {}\n+++ {}\n", file_path, file_path);

    for group in groups {
        let (mut old_count, mut new_count) = (0, 0);
        let (old_start, new_start) = match group.first() {
            Some(op) => (op.old_range().start, op.new_range().start),
            None => continue,
        };

        for op in &group {
            match op {
                DiffOp::Delete { old_len, .. } => old_count += old_len,
                DiffOp::Insert { new_len, .. } => new_count += new_len,
                DiffOp::Replace {
                    old_len, new_len, ..
                } => {
                    old_count += old_len;
                    new_count += new_len;
                }
                DiffOp::Equal { len, .. } => {
                    old_count += len;
                    new_count += len;
                }
            }
        }

        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_start + 1,
            old_count,
            new_start + 1,
            new_count
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                out.push(sign);
                out.push_str(change.value());
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Prints a unified diff, colouring removed and added lines
pub fn print_unified_diff(file_path: &str, old_content: &str, new_content: &str) {
    for line in unified_diff(file_path, old_content, new_content).lines() {
        if line.starts_with("---") || line.starts_with("+++") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
}
