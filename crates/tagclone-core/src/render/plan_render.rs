//! Text rendering of a clone plan.
//!
//! Informational only; nothing here influences what gets applied.

use crate::diff::ClonePlan;
use crate::model::TagConfig;
use crate::operation::{EntityClass, Operation};

/// Render `plan` as one padded table per entity class
///
/// Every row starts with the bracketed action label (`[new]`, `[blk]`,
/// `[del]`). A configuration section is appended when the plan copies
/// configuration.
pub fn render_plan(plan: &ClonePlan) -> String {
    let mut out = String::new();

    for class in EntityClass::ALL {
        let (title, header) = match class {
            EntityClass::Packages => (
                "Package changes",
                vec!["action", "package", "owner", "blocked", "extra_arches"],
            ),
            EntityClass::Builds => ("Build changes", vec!["action", "nvr"]),
            EntityClass::Groups => ("Group changes", vec!["action", "group", "package"]),
        };
        out.push_str(&format!("### {}\n\n", title));
        let rows: Vec<Vec<String>> = plan.class(class).iter().map(row).collect();
        if rows.is_empty() {
            out.push_str("(no changes)\n\n");
        } else {
            push_table(&mut out, &header, &rows);
            out.push('\n');
        }
    }

    if let Some(config) = &plan.config {
        out.push_str("### Config changes\n\n");
        push_table(&mut out, &["field", "value"], &config_rows(config));
        out.push('\n');
    }

    out
}

/// One-line count of planned changes
pub fn render_summary(plan: &ClonePlan) -> String {
    format!(
        "{} package, {} build, {} group operation(s){}",
        plan.packages.len(),
        plan.builds.len(),
        plan.groups.len(),
        if plan.config.is_some() {
            ", config update"
        } else {
            ""
        }
    )
}

fn label(op: &Operation) -> String {
    format!("[{}]", op.action().label())
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn row(op: &Operation) -> Vec<String> {
    match op {
        Operation::AddPackage {
            package,
            owner,
            blocked,
            extra_arches,
        } => vec![
            label(op),
            package.clone(),
            owner.clone(),
            yes_no(*blocked),
            or_dash(extra_arches.as_deref()),
        ],
        Operation::BlockPackage { package } => vec![
            label(op),
            package.clone(),
            "-".to_string(),
            yes_no(true),
            "-".to_string(),
        ],
        Operation::TagBuild { nvr } | Operation::UntagBuild { nvr } => vec![label(op), nvr.clone()],
        Operation::AddGroup { group }
        | Operation::RemoveGroup { group }
        | Operation::BlockGroup { group } => vec![label(op), group.clone(), "-".to_string()],
        Operation::AddGroupPackage { group, package }
        | Operation::RemoveGroupPackage { group, package }
        | Operation::BlockGroupPackage { group, package } => {
            vec![label(op), group.clone(), package.clone()]
        }
    }
}

fn config_rows(config: &TagConfig) -> Vec<Vec<String>> {
    vec![
        vec!["arches".to_string(), or_dash(config.arches.as_deref())],
        vec!["locked".to_string(), yes_no(config.locked)],
        vec!["perm".to_string(), or_dash(config.perm.as_deref())],
        vec!["maven_support".to_string(), yes_no(config.maven_support)],
        vec![
            "maven_include_all".to_string(),
            yes_no(config.maven_include_all),
        ],
    ]
}

fn push_table(out: &mut String, header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for r in rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.len());
        }
    }

    let mut line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    };

    line(header.to_vec());
    for r in rows {
        line(r.iter().map(String::as_str).collect());
    }
}
