use serde::{Deserialize, Serialize};

/// The three physical clinic locations. The synthetic "all" aggregate is
/// not a branch; it lives as its own series on the data map.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BranchId {
    Urayasu,
    Marunouchi,
    Kunisaki,
}

pub const BRANCH_IDS: [BranchId; 3] = [
    BranchId::Urayasu,
    BranchId::Marunouchi,
    BranchId::Kunisaki,
];

impl BranchId {
    /// Parses the CSV identifier. Anything outside the fixed allow-list is
    /// rejected; callers drop such rows.
    pub fn parse(id: &str) -> Option<BranchId> {
        match id {
            "urayasu" => Some(BranchId::Urayasu),
            "marunouchi" => Some(BranchId::Marunouchi),
            "kunisaki" => Some(BranchId::Kunisaki),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchId::Urayasu => "urayasu",
            BranchId::Marunouchi => "marunouchi",
            BranchId::Kunisaki => "kunisaki",
        }
    }

    /// Display label used by the dashboard front-ends.
    pub fn label(&self) -> &'static str {
        match self {
            BranchId::Urayasu => "浦安院",
            BranchId::Marunouchi => "丸の内院",
            BranchId::Kunisaki => "国東院",
        }
    }
}

/// What the dashboard is currently looking at: the whole group or a single
/// branch. Staff selection narrows further on top of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Branch(BranchId),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::All
    }
}

impl Selection {
    pub fn parse(id: &str) -> Option<Selection> {
        if id == "all" {
            Some(Selection::All)
        } else {
            BranchId::parse(id).map(Selection::Branch)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Selection::All => "法人全体",
            Selection::Branch(b) => b.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_branches() {
        assert_eq!(BranchId::parse("urayasu"), Some(BranchId::Urayasu));
        assert_eq!(BranchId::parse("marunouchi"), Some(BranchId::Marunouchi));
        assert_eq!(BranchId::parse("kunisaki"), Some(BranchId::Kunisaki));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(BranchId::parse("shibuya"), None);
        assert_eq!(BranchId::parse(""), None);
        assert_eq!(BranchId::parse("all"), None);
    }

    #[test]
    fn selection_accepts_all() {
        assert_eq!(Selection::parse("all"), Some(Selection::All));
        assert_eq!(
            Selection::parse("kunisaki"),
            Some(Selection::Branch(BranchId::Kunisaki))
        );
        assert_eq!(Selection::parse("nowhere"), None);
    }
}
