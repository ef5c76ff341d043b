use crate::error::ExtractError;
use crate::extractor::PageSource;
use crate::models::VolumeDescriptor;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Inconsistency between a volume's declared first logical page and the
/// page numbering implied by the preceding volumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationIssue {
    /// Declared offset leaves logical pages unassigned.
    Gap {
        path: PathBuf,
        expected: u32,
        declared: u32,
    },
    /// Declared offset re-assigns logical pages of a preceding volume.
    Overlap {
        path: PathBuf,
        expected: u32,
        declared: u32,
    },
    /// Declared offsets do not increase along the descriptor list.
    NonMonotonic {
        path: PathBuf,
        previous: u32,
        declared: u32,
    },
}

impl fmt::Display for PaginationIssue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationIssue::Gap {
                path,
                expected,
                declared,
            } => write!(
                formatter,
                "{}: declared first page {declared} leaves a gap, expected {expected}",
                path.display()
            ),
            PaginationIssue::Overlap {
                path,
                expected,
                declared,
            } => write!(
                formatter,
                "{}: declared first page {declared} overlaps the previous volume, expected {expected}",
                path.display()
            ),
            PaginationIssue::NonMonotonic {
                path,
                previous,
                declared,
            } => write!(
                formatter,
                "{}: declared first page {declared} does not follow previous offset {previous}",
                path.display()
            ),
        }
    }
}

/// Diagnostic pass over the descriptor list: opens each present volume,
/// counts its physical pages, and checks that the next present volume's
/// declared offset continues the numbering exactly. A missing volume breaks
/// the contiguity chain (its page count is unknowable), so checking resumes
/// at the next present volume; declared offsets must still increase across
/// it. The extractor itself keeps trusting the list as given.
pub fn validate_pagination(
    volumes: &[VolumeDescriptor],
    source: &impl PageSource,
) -> Result<Vec<PaginationIssue>, ExtractError> {
    let mut issues = Vec::new();
    let mut expected_next: Option<u32> = None;
    let mut previous_declared: Option<u32> = None;

    for descriptor in volumes {
        if let Some(previous) = previous_declared {
            if descriptor.first_logical_page <= previous {
                issues.push(PaginationIssue::NonMonotonic {
                    path: descriptor.path.clone(),
                    previous,
                    declared: descriptor.first_logical_page,
                });
            }
        }
        previous_declared = Some(descriptor.first_logical_page);

        if !descriptor.path.is_file() {
            warn!(path = %descriptor.path.display(), "volume missing, contiguity unverifiable");
            expected_next = None;
            continue;
        }

        if let Some(expected) = expected_next {
            let declared = descriptor.first_logical_page;
            if declared > expected {
                issues.push(PaginationIssue::Gap {
                    path: descriptor.path.clone(),
                    expected,
                    declared,
                });
            } else if declared < expected {
                issues.push(PaginationIssue::Overlap {
                    path: descriptor.path.clone(),
                    expected,
                    declared,
                });
            }
        }

        let pages = source.page_texts(&descriptor.path)?;
        expected_next = Some(descriptor.first_logical_page + pages.len() as u32);
    }

    Ok(issues)
}
