use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which of the two report sources a mapping belongs to. The two sides
/// recognize different role subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Plan,
    Mes,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Plan => write!(f, "plan"),
            SourceKind::Mes => write!(f, "MES"),
        }
    }
}

/// Abstract meaning of a column, independent of what the export calls it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    WorkOrder,
    PartCode,
    PlannedDuration,
    Operator,
    OperationNo,
    Machine,
    OperationCode,
    CycleTime,
}

impl FieldRole {
    /// Roles recognized for a given source, in display order.
    pub fn for_source(kind: SourceKind) -> &'static [FieldRole] {
        match kind {
            SourceKind::Plan => &[
                FieldRole::WorkOrder,
                FieldRole::PartCode,
                FieldRole::PlannedDuration,
            ],
            SourceKind::Mes => &[
                FieldRole::WorkOrder,
                FieldRole::Operator,
                FieldRole::OperationNo,
                FieldRole::Machine,
                FieldRole::OperationCode,
                FieldRole::CycleTime,
            ],
        }
    }
}

/// Confirmed role-to-header assignment for one source. A role with no
/// entry is unmapped; no sentinel header name exists that could collide
/// with a real column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping(HashMap<FieldRole, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, role: FieldRole, header: impl Into<String>) {
        self.0.insert(role, header.into());
    }

    pub fn unset(&mut self, role: FieldRole) {
        self.0.remove(&role);
    }

    pub fn get(&self, role: FieldRole) -> Option<&str> {
        self.0.get(&role).map(String::as_str)
    }

    pub fn is_mapped(&self, role: FieldRole) -> bool {
        self.0.contains_key(&role)
    }
}

/// One recognition rule: a role plus its header patterns in priority
/// order. All patterns are case-insensitive.
struct RoleRule {
    role: FieldRole,
    patterns: Vec<Regex>,
}

fn rule(role: FieldRole, patterns: &[&str]) -> RoleRule {
    RoleRule {
        role,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).expect("invalid role pattern"))
            .collect(),
    }
}

/// Header variants seen across plan spreadsheets and MES exports, English
/// and German. Order within a role is priority order.
static ROLE_RULES: Lazy<Vec<RoleRule>> = Lazy::new(|| {
    vec![
        rule(
            FieldRole::WorkOrder,
            &[
                r"work\s*order\s*(no|number|nr)?",
                r"^wo[\s._-]*(no|nr)?$",
                r"auftrag",
            ],
        ),
        rule(
            FieldRole::PartCode,
            &[
                r"part\s*(code|no|number|nr)",
                r"material\s*(no|number|nr)?",
                r"artikel",
                r"^part$",
            ],
        ),
        rule(
            FieldRole::PlannedDuration,
            &[
                r"plan(ned)?\s*(duration|time|min)",
                r"target\s*(duration|time)",
                r"soll\s*(zeit|dauer)?",
            ],
        ),
        rule(
            FieldRole::Operator,
            &[r"operator", r"personnel", r"bediener", r"mitarbeiter"],
        ),
        rule(
            FieldRole::OperationNo,
            &[
                r"(work\s*order\s*)?op(eration)?\.?\s*(no|number|nr)",
                r"sequence",
                r"vorgang\s*(nr)?",
            ],
        ),
        rule(
            FieldRole::Machine,
            &[r"machine", r"work\s*cent(er|re)", r"maschine", r"anlage"],
        ),
        rule(
            FieldRole::OperationCode,
            &[r"op(eration)?\.?\s*code", r"activity\s*code", r"arbeitsgang"],
        ),
        rule(
            FieldRole::CycleTime,
            &[
                r"cycle\s*time",
                r"actual\s*(time|sec)",
                r"zyklus(zeit)?",
                r"taktzeit",
            ],
        ),
    ]
});

/// Propose a mapping for one source from its header list.
///
/// Per role: try patterns in priority order, headers in document order,
/// and take the first header the first matching pattern hits; a role no
/// pattern matches stays unmapped. This is a proposal only; the confirmed
/// mapping fed to the join may come from anywhere, including a human
/// override.
pub fn detect_mapping(headers: &[String], kind: SourceKind) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    for role in FieldRole::for_source(kind) {
        let rule = ROLE_RULES
            .iter()
            .find(|r| r.role == *role)
            .expect("every role has a rule");
        'patterns: for pattern in &rule.patterns {
            for header in headers {
                if pattern.is_match(header) {
                    debug!(role = ?role, header = %header, "detected column");
                    mapping.set(*role, header.clone());
                    break 'patterns;
                }
            }
        }
    }
    mapping
}
