use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::database::models::employee::Employee;

/// Plain employee value handed to the builder.
///
/// Decoupled from the storage row so the builder can be fed from any
/// source (database, fixture file, tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub unit: String,
}

impl From<&Employee> for EmployeeRecord {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.to_string(),
            manager_id: e.manager_id.map(|m| m.to_string()),
            name: e.name.clone(),
            title: e.title.clone(),
            department: e.department.clone(),
            unit: e.unit.clone(),
        }
    }
}

/// One employee in the tree, annotated with its direct-report count
/// within the current slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgNode {
    pub id: String,
    pub name: String,
    pub title: String,
    pub department: String,
    pub unit: String,
    pub manager_id: Option<String>,
    pub span: usize,
}

impl OrgNode {
    fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            title: record.title.clone(),
            department: record.department.clone(),
            unit: record.unit.clone(),
            manager_id: record.manager_id.clone(),
            span: 0,
        }
    }
}

/// Result of [`build`].
///
/// `children` is keyed by every manager id referenced from the slice,
/// whether or not that manager is itself present in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyView {
    pub nodes: BTreeMap<String, OrgNode>,
    pub children: BTreeMap<String, Vec<String>>,
    #[serde(rename = "deptCounts")]
    pub dept_counts: BTreeMap<String, usize>,
}

impl HierarchyView {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.children.is_empty() && self.dept_counts.is_empty()
    }

    /// Node ids with no manager inside the slice: either no manager at all
    /// or a manager that was filtered out.
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| match n.manager_id.as_deref() {
                None => true,
                Some(mid) => !self.nodes.contains_key(mid),
            })
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Manager ids that appear as `children` keys but have no node.
    pub fn orphan_manager_ids(&self) -> Vec<&str> {
        self.children
            .keys()
            .filter(|mid| !self.nodes.contains_key(mid.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Build the hierarchy view for a filtered slice of employees.
///
/// Span is collected in the first pass and applied afterwards, since a
/// manager may come after its reports in input order. Ids are expected to
/// be unique; on duplicates the later record replaces the earlier node,
/// while both still count towards `children`, span and department totals.
/// Self references and longer cycles are taken literally.
pub fn build(records: &[EmployeeRecord]) -> HierarchyView {
    let mut nodes: BTreeMap<String, OrgNode> = BTreeMap::new();
    let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut span: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if let Some(mid) = record.manager_id.as_deref() {
            children
                .entry(mid.to_string())
                .or_default()
                .push(record.id.clone());
            *span.entry(mid).or_insert(0) += 1;
        }
        nodes.insert(record.id.clone(), OrgNode::from_record(record));
    }

    for (mid, count) in span {
        if let Some(node) = nodes.get_mut(mid) {
            node.span = count;
        }
    }

    let mut dept_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.department.is_empty()) {
        *dept_counts.entry(record.department.clone()).or_insert(0) += 1;
    }

    HierarchyView {
        nodes,
        children,
        dept_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, manager: Option<&str>, dept: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            manager_id: manager.map(str::to_string),
            name: format!("Employee {}", id),
            title: "Engineer".to_string(),
            department: dept.to_string(),
            unit: "Core".to_string(),
        }
    }

    /// Small deterministic generator so the property checks run over many
    /// shapes without extra dependencies.
    fn generated(seed: u64, len: usize) -> Vec<EmployeeRecord> {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut next = move |bound: u64| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) % bound
        };
        let depts = ["", "Eng", "Sales", "FMCG"];
        (0..len)
            .map(|i| {
                let manager = match next(4) {
                    0 => None,
                    // ids beyond `len` never exist in the slice
                    1 => Some(format!("e{}", len + next(5) as usize)),
                    _ => Some(format!("e{}", next(len.max(1) as u64))),
                };
                EmployeeRecord {
                    id: format!("e{}", i),
                    manager_id: manager,
                    name: format!("n{}", i),
                    title: String::new(),
                    department: depts[next(depts.len() as u64) as usize].to_string(),
                    unit: String::new(),
                }
            })
            .collect()
    }

    #[test]
    fn manager_with_two_reports() {
        let view = build(&[
            rec("A", None, "Eng"),
            rec("B", Some("A"), "Eng"),
            rec("C", Some("A"), "Sales"),
        ]);

        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.nodes["A"].span, 2);
        assert_eq!(view.nodes["B"].span, 0);
        assert_eq!(view.nodes["C"].span, 0);
        assert_eq!(view.children.len(), 1);
        assert_eq!(view.children["A"], vec!["B", "C"]);
        assert_eq!(view.dept_counts.get("Eng"), Some(&2));
        assert_eq!(view.dept_counts.get("Sales"), Some(&1));
        assert_eq!(view.roots(), vec!["A"]);
    }

    #[test]
    fn filtered_out_manager_keeps_children_entry() {
        let view = build(&[rec("B", Some("A"), "Eng")]);

        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes["B"].span, 0);
        assert!(!view.nodes.contains_key("A"));
        assert_eq!(view.children["A"], vec!["B"]);
        assert_eq!(view.dept_counts.get("Eng"), Some(&1));
        assert_eq!(view.orphan_manager_ids(), vec!["A"]);
        assert_eq!(view.roots(), vec!["B"]);
    }

    #[test]
    fn self_manager_counts_itself() {
        let view = build(&[rec("A", Some("A"), "")]);

        assert_eq!(view.nodes["A"].span, 1);
        assert_eq!(view.children["A"], vec!["A"]);
        assert!(view.dept_counts.is_empty());
        assert!(view.roots().is_empty());
    }

    #[test]
    fn empty_input_gives_empty_maps() {
        let view = build(&[]);
        assert!(view.is_empty());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "nodes": {}, "children": {}, "deptCounts": {} })
        );
    }

    #[test]
    fn report_listed_before_manager_still_sets_span() {
        let view = build(&[
            rec("B", Some("A"), "Eng"),
            rec("C", Some("B"), "Eng"),
            rec("A", None, "Eng"),
        ]);

        assert_eq!(view.nodes["A"].span, 1);
        assert_eq!(view.nodes["B"].span, 1);
        assert_eq!(view.nodes["C"].span, 0);
    }

    #[test]
    fn children_keep_discovery_order() {
        let view = build(&[
            rec("Z", Some("M"), "Eng"),
            rec("M", None, "Eng"),
            rec("A", Some("M"), "Eng"),
            rec("Q", Some("M"), "Eng"),
        ]);

        assert_eq!(view.children["M"], vec!["Z", "A", "Q"]);
        assert_eq!(view.nodes["M"].span, 3);
    }

    // Known characteristic: mutual management is not rejected.
    #[test]
    fn two_node_cycle_passes_through() {
        let view = build(&[rec("A", Some("B"), "Eng"), rec("B", Some("A"), "Eng")]);

        assert_eq!(view.nodes["A"].span, 1);
        assert_eq!(view.nodes["B"].span, 1);
        assert_eq!(view.children["A"], vec!["B"]);
        assert_eq!(view.children["B"], vec!["A"]);
        assert!(view.roots().is_empty());
    }

    #[test]
    fn duplicate_id_later_record_wins() {
        let mut first = rec("A", None, "Eng");
        first.title = "First".to_string();
        let mut second = rec("A", Some("X"), "Sales");
        second.title = "Second".to_string();

        let view = build(&[first, second]);

        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes["A"].title, "Second");
        assert_eq!(view.nodes["A"].manager_id.as_deref(), Some("X"));
        assert_eq!(view.children["X"], vec!["A"]);
        // department totals count input records, not surviving nodes
        assert_eq!(view.dept_counts.get("Eng"), Some(&1));
        assert_eq!(view.dept_counts.get("Sales"), Some(&1));
    }

    #[test]
    fn display_fields_copied_verbatim() {
        let record = EmployeeRecord {
            id: "7".to_string(),
            manager_id: Some("3".to_string()),
            name: "Ирина Петрова".to_string(),
            title: "HR-аналитик".to_string(),
            department: "FMCG".to_string(),
            unit: "Analytics".to_string(),
        };
        let view = build(std::slice::from_ref(&record));
        let node = &view.nodes["7"];

        assert_eq!(node.name, record.name);
        assert_eq!(node.title, record.title);
        assert_eq!(node.department, record.department);
        assert_eq!(node.unit, record.unit);
        assert_eq!(node.manager_id, record.manager_id);
    }

    #[test]
    fn input_is_left_untouched() {
        let records = generated(3, 40);
        let before = records.clone();
        let _ = build(&records);
        assert_eq!(records, before);
    }

    #[test]
    fn properties_hold_over_generated_slices() {
        for seed in 0..50u64 {
            let len = (seed as usize * 7) % 60;
            let records = generated(seed, len);
            let view = build(&records);

            // every record has exactly one node
            assert_eq!(view.nodes.len(), records.len(), "seed {}", seed);
            for r in &records {
                assert!(view.nodes.contains_key(&r.id), "seed {}", seed);
            }

            // span equals the number of records naming the node as manager
            for (id, node) in &view.nodes {
                let expected = records
                    .iter()
                    .filter(|r| r.manager_id.as_deref() == Some(id.as_str()))
                    .count();
                assert_eq!(node.span, expected, "seed {} node {}", seed, id);
            }

            // each report is listed once under its manager, orphans included
            for r in &records {
                if let Some(mid) = &r.manager_id {
                    let listed = view.children[mid].iter().filter(|c| **c == r.id).count();
                    assert_eq!(listed, 1, "seed {} report {}", seed, r.id);
                }
            }
            let referenced: usize = view.children.values().map(Vec::len).sum();
            assert_eq!(
                referenced,
                records.iter().filter(|r| r.manager_id.is_some()).count()
            );

            // department totals over non-empty departments only
            assert!(!view.dept_counts.contains_key(""));
            for (dept, count) in &view.dept_counts {
                let expected = records.iter().filter(|r| &r.department == dept).count();
                assert_eq!(*count, expected, "seed {} dept {}", seed, dept);
            }

            // same input, same output
            assert_eq!(view, build(&records), "seed {}", seed);
        }
    }

    #[test]
    fn serializes_with_wire_keys() {
        let view = build(&[rec("A", None, "Eng"), rec("B", Some("A"), "Eng")]);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["nodes"]["A"]["span"], 1);
        assert_eq!(json["nodes"]["B"]["manager_id"], "A");
        assert_eq!(json["nodes"]["A"]["manager_id"], serde_json::Value::Null);
        assert_eq!(json["children"]["A"], serde_json::json!(["B"]));
        assert_eq!(json["deptCounts"]["Eng"], 2);
    }
}
