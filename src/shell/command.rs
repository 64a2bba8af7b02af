use crate::{
    column_family::Properties,
    util::{Result, Status},
};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        table: String,
        families: Vec<FamilySpec>,
    },
    List {
        pattern: Option<String>,
    },
    Disable {
        table: String,
    },
    Enable {
        table: String,
    },
    IsEnabled {
        table: String,
    },
    IsDisabled {
        table: String,
    },
    Alter {
        table: String,
        /// One map per `{...}` argument, applied in order.
        maps: Vec<Properties>,
    },
    Drop {
        table: String,
    },
    DropAll {
        pattern: String,
    },
    Describe {
        table: String,
    },
    Put {
        table: String,
        cells: Vec<PutCell>,
    },
    Get {
        table: String,
        row_key: String,
        column: Option<ColumnSpec>,
        versions: usize,
    },
    Scan {
        table: String,
    },
    Delete {
        table: String,
        row_key: String,
        family: String,
        qualifier: String,
    },
    DeleteAll {
        table: String,
        row_key: String,
    },
    Count {
        table: String,
    },
    Truncate {
        table: String,
    },
    Help(Option<String>),
    Exit,
    /// Input that matched no command keyword.
    Unknown(String),
    /// Blank input line.
    Empty,
}

/// Column family given to `create`, either `'name'` or a property map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySpec {
    pub name: String,
    pub properties: Properties,
}

impl FamilySpec {
    pub fn named(name: impl Into<String>) -> Self {
        FamilySpec {
            name: name.into(),
            properties: Vec::new(),
        }
    }
}

/// `family` or `family:qualifier`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub family: String,
    pub qualifier: Option<String>,
}

impl ColumnSpec {
    pub fn parse(column: &str) -> Result<ColumnSpec> {
        let (family, qualifier) = match column.split_once(':') {
            Some((family, qualifier)) => (family, Some(qualifier)),
            None => (column, None),
        };
        if family.is_empty() {
            return Err(Status::invalid_argument(format!(
                "Invalid column '{column}': column family is empty"
            )));
        }
        if qualifier.is_some_and(str::is_empty) {
            return Err(Status::invalid_argument(format!(
                "Invalid column '{column}': qualifier is empty"
            )));
        }
        Ok(ColumnSpec {
            family: family.to_string(),
            qualifier: qualifier.map(String::from),
        })
    }

    /// Parse a column that must name a qualifier.
    pub fn parse_cell(column: &str) -> Result<(String, String)> {
        let spec = ColumnSpec::parse(column)?;
        match spec.qualifier {
            Some(qualifier) => Ok((spec.family, qualifier)),
            None => Err(Status::invalid_argument(format!(
                "Invalid column '{column}': expected '<column_family>:<column_qualifier>'"
            ))),
        }
    }
}

/// One `'row', 'family:qualifier', 'value'` triple of a `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCell {
    pub row_key: String,
    pub family: String,
    pub qualifier: String,
    pub value: String,
}
