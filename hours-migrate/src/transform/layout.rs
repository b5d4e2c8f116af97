//! Destination column resolution
//!
//! Maps the four output roles (project, person, month, hours) onto column IDs
//! of the fetched destination sheet, either by column title or by position.

use std::fmt;

use crate::api::Sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Project,
    Person,
    Month,
    Hours,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Project => "project name",
            ColumnRole::Person => "person responsible",
            ColumnRole::Month => "month",
            ColumnRole::Hours => "hours per week",
        };
        f.write_str(name)
    }
}

/// Destination column titles looked up when mapping by title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTitles {
    pub project: String,
    pub person: String,
    pub month: String,
    pub hours: String,
}

impl Default for ColumnTitles {
    fn default() -> Self {
        Self {
            project: "Project".to_string(),
            person: "Person".to_string(),
            month: "Month".to_string(),
            hours: "Hours".to_string(),
        }
    }
}

impl ColumnTitles {
    pub fn title_for(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::Project => &self.project,
            ColumnRole::Person => &self.person,
            ColumnRole::Month => &self.month,
            ColumnRole::Hours => &self.hours,
        }
    }
}

/// How destination columns are picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMapping {
    /// Case-insensitive title match
    ByTitle(ColumnTitles),
    /// First four columns of the sheet, in order
    Positional,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping::ByTitle(ColumnTitles::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    MissingColumn { role: ColumnRole, title: String },
    TooFewColumns { found: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::MissingColumn { role, title } => write!(
                f,
                "destination sheet has no column titled '{}' for {}",
                title, role
            ),
            LayoutError::TooFewColumns { found } => write!(
                f,
                "destination sheet needs at least 4 columns for positional mapping, found {}",
                found
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Resolved destination column IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationLayout {
    pub project: i64,
    pub person: i64,
    pub month: i64,
    pub hours: i64,
}

impl DestinationLayout {
    pub fn resolve(destination: &Sheet, mapping: &ColumnMapping) -> Result<Self, LayoutError> {
        match mapping {
            ColumnMapping::Positional => Self::positional(destination),
            ColumnMapping::ByTitle(titles) => Self::by_title(destination, titles),
        }
    }

    fn positional(destination: &Sheet) -> Result<Self, LayoutError> {
        match destination.columns.as_slice() {
            [project, person, month, hours, ..] => Ok(Self {
                project: project.id,
                person: person.id,
                month: month.id,
                hours: hours.id,
            }),
            columns => Err(LayoutError::TooFewColumns {
                found: columns.len(),
            }),
        }
    }

    fn by_title(destination: &Sheet, titles: &ColumnTitles) -> Result<Self, LayoutError> {
        let find = |role: ColumnRole| {
            let wanted = titles.title_for(role).trim();
            destination
                .columns
                .iter()
                .find(|column| column.title.trim().eq_ignore_ascii_case(wanted))
                .map(|column| column.id)
                .ok_or_else(|| LayoutError::MissingColumn {
                    role,
                    title: wanted.to_string(),
                })
        };

        Ok(Self {
            project: find(ColumnRole::Project)?,
            person: find(ColumnRole::Person)?,
            month: find(ColumnRole::Month)?,
            hours: find(ColumnRole::Hours)?,
        })
    }
}
