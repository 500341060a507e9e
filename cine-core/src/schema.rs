//! Graph schema definitions for CineGraph.
//!
//! Defines node tables, relationship tables and the Cypher DDL that creates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the embedding column added to the Movie table during enrichment.
pub const VECTOR_COLUMN: &str = "vector";

/// Node tables in the movie graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeTable {
    /// Actor(name, age)
    Actor,
    /// Movie(title, year, summary)
    Movie,
    /// Director(name, age)
    Director,
    /// Character(name, description)
    Character,
    /// Writer(name, age)
    Writer,
}

impl NodeTable {
    /// All node tables in schema order.
    pub const ALL: [NodeTable; 5] = [
        NodeTable::Actor,
        NodeTable::Movie,
        NodeTable::Director,
        NodeTable::Character,
        NodeTable::Writer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeTable::Actor => "Actor",
            NodeTable::Movie => "Movie",
            NodeTable::Director => "Director",
            NodeTable::Character => "Character",
            NodeTable::Writer => "Writer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        NodeTable::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    /// `CREATE NODE TABLE IF NOT EXISTS` statement for this table.
    pub fn ddl(&self) -> &'static str {
        match self {
            NodeTable::Actor => {
                "CREATE NODE TABLE IF NOT EXISTS Actor(name STRING, age INT64, PRIMARY KEY(name));"
            }
            NodeTable::Movie => {
                "CREATE NODE TABLE IF NOT EXISTS Movie(title STRING, year INT64, summary STRING, PRIMARY KEY(title));"
            }
            NodeTable::Director => {
                "CREATE NODE TABLE IF NOT EXISTS Director(name STRING, age INT64, PRIMARY KEY(name));"
            }
            NodeTable::Character => {
                "CREATE NODE TABLE IF NOT EXISTS Character(name STRING, description STRING, PRIMARY KEY(name));"
            }
            NodeTable::Writer => {
                "CREATE NODE TABLE IF NOT EXISTS Writer(name STRING, age INT64, PRIMARY KEY(name));"
            }
        }
    }
}

impl fmt::Display for NodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directed relationship tables between node tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum RelTable {
    /// Actor→Movie
    ACTED_IN,
    /// Actor→Character
    PLAYED,
    /// Director→Movie
    DIRECTED,
    /// Character→Movie
    PLAYED_ROLE_IN,
    /// Character→Character, carries a `relationship` label
    RELATED_TO,
    /// Writer→Movie
    WROTE,
}

impl RelTable {
    /// All relationship tables in schema order.
    pub const ALL: [RelTable; 6] = [
        RelTable::ACTED_IN,
        RelTable::PLAYED,
        RelTable::DIRECTED,
        RelTable::PLAYED_ROLE_IN,
        RelTable::RELATED_TO,
        RelTable::WROTE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelTable::ACTED_IN => "ACTED_IN",
            RelTable::PLAYED => "PLAYED",
            RelTable::DIRECTED => "DIRECTED",
            RelTable::PLAYED_ROLE_IN => "PLAYED_ROLE_IN",
            RelTable::RELATED_TO => "RELATED_TO",
            RelTable::WROTE => "WROTE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RelTable::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    /// Source and destination node tables.
    pub fn endpoints(&self) -> (NodeTable, NodeTable) {
        match self {
            RelTable::ACTED_IN => (NodeTable::Actor, NodeTable::Movie),
            RelTable::PLAYED => (NodeTable::Actor, NodeTable::Character),
            RelTable::DIRECTED => (NodeTable::Director, NodeTable::Movie),
            RelTable::PLAYED_ROLE_IN => (NodeTable::Character, NodeTable::Movie),
            RelTable::RELATED_TO => (NodeTable::Character, NodeTable::Character),
            RelTable::WROTE => (NodeTable::Writer, NodeTable::Movie),
        }
    }

    /// `CREATE REL TABLE IF NOT EXISTS` statement for this table.
    pub fn ddl(&self) -> String {
        let (from, to) = self.endpoints();
        let attrs = match self {
            RelTable::RELATED_TO => ", relationship STRING",
            _ => "",
        };
        format!(
            "CREATE REL TABLE IF NOT EXISTS {}(FROM {} TO {}{});",
            self.as_str(),
            from,
            to,
            attrs
        )
    }
}

impl fmt::Display for RelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every DDL statement of the schema, node tables first.
pub fn schema_ddl() -> Vec<String> {
    NodeTable::ALL
        .iter()
        .map(|t| t.ddl().to_string())
        .chain(RelTable::ALL.iter().map(|r| r.ddl()))
        .collect()
}

/// `ALTER TABLE` statement adding the fixed-width embedding column to Movie.
pub fn vector_column_ddl(dimension: usize) -> String {
    format!(
        "ALTER TABLE {} ADD {} DOUBLE[{}];",
        NodeTable::Movie,
        VECTOR_COLUMN,
        dimension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_table_roundtrip() {
        for nt in NodeTable::ALL {
            assert_eq!(NodeTable::parse(nt.as_str()), Some(nt));
        }
        assert_eq!(NodeTable::parse("movie"), Some(NodeTable::Movie));
        assert_eq!(NodeTable::parse("Studio"), None);
    }

    #[test]
    fn test_rel_table_roundtrip() {
        for rt in RelTable::ALL {
            assert_eq!(RelTable::parse(rt.as_str()), Some(rt));
        }
        assert_eq!(RelTable::parse("wrote"), Some(RelTable::WROTE));
    }

    #[test]
    fn test_related_to_carries_label() {
        assert_eq!(
            RelTable::RELATED_TO.ddl(),
            "CREATE REL TABLE IF NOT EXISTS RELATED_TO(FROM Character TO Character, relationship STRING);"
        );
        assert_eq!(
            RelTable::WROTE.ddl(),
            "CREATE REL TABLE IF NOT EXISTS WROTE(FROM Writer TO Movie);"
        );
    }

    #[test]
    fn test_schema_ddl_is_idempotent_and_ordered() {
        let ddl = schema_ddl();
        assert_eq!(ddl.len(), 11);
        assert!(ddl.iter().all(|s| s.contains("IF NOT EXISTS")));
        assert!(ddl[..5].iter().all(|s| s.starts_with("CREATE NODE TABLE")));
        assert!(ddl[5..].iter().all(|s| s.starts_with("CREATE REL TABLE")));
    }

    #[test]
    fn test_vector_column_ddl() {
        assert_eq!(
            vector_column_ddl(1536),
            "ALTER TABLE Movie ADD vector DOUBLE[1536];"
        );
    }
}
