use clap::Args;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::org::{build, EmployeeRecord, HierarchyView};
use crate::services::{EmployeeQuery, HrStore, MemoryStore};

#[derive(Debug, Args)]
pub struct OrgTreeArgs {
    #[arg(long, short, help = "Fixture file (.json, .yaml, .yml)")]
    pub input: PathBuf,

    #[arg(long, help = "Only employees in this department")]
    pub dept: Option<String>,

    #[arg(long, help = "Only employees in this unit")]
    pub unit: Option<String>,

    #[arg(long, help = "Only direct reports of this manager id")]
    pub manager: Option<String>,

    #[arg(long, help = "Case-insensitive match on name, email or title")]
    pub search: Option<String>,
}

pub async fn handle(args: OrgTreeArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = MemoryStore::load(&args.input)?;
    let query = EmployeeQuery {
        department: args.dept,
        unit: args.unit,
        manager: args.manager,
        search: args.search,
    };

    let employees = store.select_employees(&query).await?;
    let records: Vec<EmployeeRecord> = employees.iter().map(EmployeeRecord::from).collect();
    let view = build(&records);

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print!("{}", render_tree(&view)),
    }
    Ok(())
}

/// Indented text rendering of a hierarchy view.
///
/// Walks from the roots; nodes only reachable through a cycle are listed
/// afterwards so every node is printed exactly once.
pub fn render_tree(view: &HierarchyView) -> String {
    let mut out = String::new();
    if view.nodes.is_empty() {
        out.push_str("(no employees)\n");
        return out;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for root in view.roots() {
        render_node(view, root, 0, &mut seen, &mut out);
    }

    let unreached: Vec<&str> = view
        .nodes
        .keys()
        .map(String::as_str)
        .filter(|id| !seen.contains(id))
        .collect();
    if !unreached.is_empty() {
        out.push_str("\nin a management cycle:\n");
        for id in unreached {
            if !seen.contains(id) {
                render_node(view, id, 1, &mut seen, &mut out);
            }
        }
    }

    let orphans = view.orphan_manager_ids();
    if !orphans.is_empty() {
        let _ = writeln!(out, "\nmanagers outside this slice: {}", orphans.join(", "));
    }

    if !view.dept_counts.is_empty() {
        out.push_str("\ndepartments:\n");
        for (department, count) in &view.dept_counts {
            let _ = writeln!(out, "  {}: {}", department, count);
        }
    }
    out
}

/// Depth-first walk from `start` with an explicit stack, so long
/// management chains cannot exhaust the call stack.
fn render_node<'a>(view: &'a HierarchyView, start: &'a str, depth: usize, seen: &mut HashSet<&'a str>, out: &mut String) {
    let mut stack: Vec<(&str, usize)> = vec![(start, depth)];
    while let Some((id, depth)) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(node) = view.nodes.get(id) else {
            continue;
        };

        let _ = write!(out, "{}{}", "  ".repeat(depth), node.name);
        if !node.title.is_empty() {
            let _ = write!(out, " - {}", node.title);
        }
        if node.span > 0 {
            let _ = write!(out, " [{}]", node.span);
        }
        out.push('\n');

        if let Some(reports) = view.children.get(id) {
            // reversed so reports print in discovery order
            stack.extend(reports.iter().rev().map(|report| (report.as_str(), depth + 1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, manager: Option<&str>, name: &str, department: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            manager_id: manager.map(str::to_string),
            name: name.to_string(),
            title: String::new(),
            department: department.to_string(),
            unit: String::new(),
        }
    }

    #[test]
    fn renders_indented_reports_and_counts() {
        let view = build(&[
            record("a", None, "Ann", "Eng"),
            record("b", Some("a"), "Bo", "Eng"),
            record("c", Some("a"), "Cy", "Sales"),
        ]);
        let text = render_tree(&view);
        assert!(text.starts_with("Ann [2]\n  Bo\n  Cy\n"));
        assert!(text.contains("  Eng: 2\n"));
        assert!(!text.contains("outside this slice"));
    }

    #[test]
    fn orphans_are_roots_and_missing_manager_is_listed() {
        let view = build(&[record("b", Some("a"), "Bo", "Eng")]);
        let text = render_tree(&view);
        assert!(text.starts_with("Bo\n"));
        assert!(text.contains("managers outside this slice: a"));
    }

    #[test]
    fn cycle_members_are_printed_once() {
        let view = build(&[record("a", Some("b"), "Ann", ""), record("b", Some("a"), "Bo", "")]);
        let text = render_tree(&view);
        assert!(text.contains("in a management cycle:"));
        assert_eq!(text.matches("Ann").count(), 1);
        assert_eq!(text.matches("Bo").count(), 1);
    }

    #[test]
    fn deep_chain_renders_without_recursion() {
        let depth = 4_000;
        let records: Vec<EmployeeRecord> = (0..depth)
            .map(|i| {
                let manager = if i == 0 { None } else { Some(format!("e{}", i - 1)) };
                record(&format!("e{}", i), manager.as_deref(), &format!("n{}", i), "")
            })
            .collect();
        let text = render_tree(&build(&records));
        assert_eq!(text.lines().count(), depth);
        assert!(text.starts_with("n0 [1]\n  n1 [1]\n"));
    }

    #[test]
    fn nested_reports_keep_discovery_order() {
        let view = build(&[
            record("a", None, "Ann", ""),
            record("b", Some("a"), "Bo", ""),
            record("d", Some("b"), "Di", ""),
            record("c", Some("a"), "Cy", ""),
        ]);
        assert_eq!(render_tree(&view), "Ann [2]\n  Bo [1]\n    Di\n  Cy\n");
    }

    #[test]
    fn empty_view() {
        assert_eq!(render_tree(&HierarchyView::default()), "(no employees)\n");
    }
}
